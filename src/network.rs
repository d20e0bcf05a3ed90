// Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! Residual flow networks.
//!
//! A [`Network`] is a fixed set of vertices `0..n` together with
//! arcs stored in an arena. Vertices and arcs are addressed by plain
//! indices. Each arc may hold the index of its paired residual arc,
//! i.e. the arc in opposite direction that represents the
//! same link.
//!
//! Networks are static: they are constructed with a
//! [`NetworkBuilder`] and afterwards only the flow on the arcs and
//! the levels of the vertices change.
//!
//! # Example
//!
//! ```
//! use gridcut::network::Network;
//!
//! let net = Network::<i32>::new_with(4, |b| {
//!     b.add_one_way_edge(0, 1, 3)?;
//!     b.add_paired_edge(1, 2, 2)?;
//!     b.add_one_way_edge(2, 3, 0)?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(net.num_vertices(), 4);
//! // the zero capacity arc has not been created
//! assert_eq!(net.num_edges(), 3);
//! assert_eq!(net.vertex(2).adjacency_count(), 1);
//! assert_eq!(net.edge(1).rev(), Some(2));
//! assert_eq!(net.edge(2).rev(), Some(1));
//! ```
//!
//! The flow on the reverse of a paired arc becomes negative, hence
//! flows must be signed:
//!
//! ```compile_fail
//! use gridcut::network::Network;
//!
//! let net = Network::<u32>::new_with(2, |b| {
//!     b.add_paired_edge(0, 1, 1)?;
//!     Ok(())
//! });
//! ```

use crate::num::traits::{NumAssign, Signed};

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

use std::error;
use std::fmt;
use std::slice::Iter as SliceIter;

/// Error when constructing a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The vertex key is not in `0..size`.
    InvalidVertex { key: usize, size: usize },
    /// The vertex has already been registered.
    DuplicateVertex(usize),
    /// The vertex has not been registered.
    UnregisteredVertex(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        use self::Error::*;
        match self {
            InvalidVertex { key, size } => write!(fmt, "invalid vertex {} (must be in 0..{})", key, size),
            DuplicateVertex(key) => write!(fmt, "duplicate vertex {}", key),
            UnregisteredVertex(key) => write!(fmt, "vertex {} has not been registered", key),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// A vertex of a network.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Vertex {
    key: usize,
    level: Option<usize>,
    degree: usize,
}

impl Vertex {
    fn new(key: usize) -> Self {
        Vertex {
            key,
            level: None,
            degree: 0,
        }
    }

    /// The key of this vertex, which is its index in the network.
    pub fn key(&self) -> usize {
        self.key
    }

    /// The distance from the source in the last level graph.
    ///
    /// Returns `None` if the vertex has not been reached in the last
    /// breadth-first search.
    pub fn level(&self) -> Option<usize> {
        self.level
    }

    pub fn set_level(&mut self, level: Option<usize>) {
        self.level = level;
    }

    /// Return `true` if the vertex has been reached in the last search.
    pub fn visited(&self) -> bool {
        self.level.is_some()
    }

    /// The number of outgoing arcs.
    pub fn adjacency_count(&self) -> usize {
        self.degree
    }
}

/// An arc of a network.
///
/// The flow on an arc is changed only by the max-flow algorithms.
/// The flow on a paired arc may become negative: if `f` units are
/// sent along `u -> v`, the flow on the paired arc `v -> u` drops by
/// `f`, so its residual capacity grows by `f`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Edge<F> {
    src: usize,
    snk: usize,
    capacity: F,
    flow: F,
    rev: Option<usize>,
}

impl<F> Edge<F>
where
    F: NumAssign + Signed + Ord + Copy,
{
    /// The tail of the arc.
    pub fn src(&self) -> usize {
        self.src
    }

    /// The head of the arc.
    pub fn snk(&self) -> usize {
        self.snk
    }

    pub fn capacity(&self) -> F {
        self.capacity
    }

    pub fn flow(&self) -> F {
        self.flow
    }

    /// The index of the paired residual arc (if there is one).
    pub fn rev(&self) -> Option<usize> {
        self.rev
    }

    pub fn has_rev(&self) -> bool {
        self.rev.is_some()
    }

    /// Return `capacity - flow`.
    pub fn residual_capacity(&self) -> F {
        self.capacity - self.flow
    }

    /// Return `true` if there is residual capacity left on the arc.
    pub fn is_residual(&self) -> bool {
        self.capacity > self.flow
    }

    /// Return `true` if `other` connects the same endpoints in opposite direction.
    pub fn is_reverse_of(&self, other: &Edge<F>) -> bool {
        self.src == other.snk && self.snk == other.src
    }

    pub(crate) fn add_flow(&mut self, f: F) {
        self.flow += f;
    }

    pub(crate) fn sub_flow(&mut self, f: F) {
        self.flow -= f;
    }
}

impl<F> fmt::Display for Edge<F>
where
    F: fmt::Display,
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        write!(fmt, "{}\t{}\t{}\t{}", self.src, self.snk, self.capacity, self.flow)
    }
}

/// A builder for a [`Network`] with a fixed number of vertices.
pub struct NetworkBuilder<F> {
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Edge<F>>,
    adj: Vec<Vec<usize>>,
}

impl<F> NetworkBuilder<F>
where
    F: NumAssign + Signed + Ord + Copy,
{
    /// Create a builder for a network with `nvertices` vertices.
    ///
    /// `nedges` is a guess of the number of arcs, used to reserve
    /// memory only.
    pub fn with_capacities(nvertices: usize, nedges: usize) -> Self {
        NetworkBuilder {
            vertices: vec![None; nvertices],
            edges: Vec::with_capacity(nedges),
            adj: vec![vec![]; nvertices],
        }
    }

    /// The (fixed) number of vertices of the network.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// The number of arcs added so far.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Register the vertex with the given key.
    pub fn add_vertex(&mut self, key: usize) -> Result<usize> {
        let size = self.vertices.len();
        let slot = self.vertices.get_mut(key).ok_or(Error::InvalidVertex { key, size })?;
        if slot.is_some() {
            return Err(Error::DuplicateVertex(key));
        }
        *slot = Some(Vertex::new(key));
        Ok(key)
    }

    /// Register all vertices that have not been registered yet.
    pub fn add_vertices(&mut self) {
        for (key, slot) in self.vertices.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(Vertex::new(key));
            }
        }
    }

    fn registered(&mut self, key: usize) -> Result<&mut Vertex> {
        let size = self.vertices.len();
        self.vertices
            .get_mut(key)
            .ok_or(Error::InvalidVertex { key, size })?
            .as_mut()
            .ok_or(Error::UnregisteredVertex(key))
    }

    fn push_edge(&mut self, src: usize, snk: usize, capacity: F) -> Result<usize> {
        self.registered(snk)?;
        self.registered(src)?.degree += 1;
        let e = self.edges.len();
        self.edges.push(Edge {
            src,
            snk,
            capacity,
            flow: F::zero(),
            rev: None,
        });
        self.adj[src].push(e);
        Ok(e)
    }

    /// Add an arc `src -> snk` without a paired reverse arc.
    ///
    /// Arcs with zero capacity are not created, in this case `None`
    /// is returned.
    pub fn add_directed_edge(&mut self, src: usize, snk: usize, capacity: F) -> Result<Option<usize>> {
        debug_assert!(capacity >= F::zero(), "Capacities must be non-negative");
        if capacity.is_zero() {
            // still report unknown endpoints
            self.registered(src)?;
            self.registered(snk)?;
            return Ok(None);
        }
        self.push_edge(src, snk, capacity).map(Some)
    }

    /// Add a terminal arc, e.g. from the source or into the target.
    ///
    /// This is the same as `add_directed_edge`.
    pub fn add_one_way_edge(&mut self, src: usize, snk: usize, capacity: F) -> Result<Option<usize>> {
        self.add_directed_edge(src, snk, capacity)
    }

    /// Add the arcs `src -> snk` and `snk -> src` with the same
    /// capacity, each being the reverse of the other.
    ///
    /// Returns the pair `(forward, backward)` of arcs or `None` if
    /// the capacity is zero.
    pub fn add_paired_edge(&mut self, src: usize, snk: usize, capacity: F) -> Result<Option<(usize, usize)>> {
        let fwd = match self.add_directed_edge(src, snk, capacity)? {
            Some(e) => e,
            None => return Ok(None),
        };
        let bwd = self.push_edge(snk, src, capacity)?;
        self.set_reverse(fwd, bwd);
        Ok(Some((fwd, bwd)))
    }

    fn set_reverse(&mut self, e: usize, f: usize) {
        if self.edges[e].is_reverse_of(&self.edges[f]) {
            self.edges[e].rev = Some(f);
            self.edges[f].rev = Some(e);
        }
    }

    /// Turn the builder into a network.
    ///
    /// Fails if some vertex has never been registered.
    pub fn into_network(self) -> Result<Network<F>> {
        let vertices = self
            .vertices
            .into_iter()
            .enumerate()
            .map(|(key, v)| v.ok_or(Error::UnregisteredVertex(key)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Network {
            vertices,
            edges: self.edges,
            adj: self.adj,
        })
    }
}

/// A flow network with fixed arcs and capacities.
///
/// Vertex `0` is the source and vertex `n-1` is the target.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Network<F> {
    vertices: Vec<Vertex>,
    edges: Vec<Edge<F>>,
    // The outgoing arcs of each vertex in insertion order.
    adj: Vec<Vec<usize>>,
}

impl<F> Network<F>
where
    F: NumAssign + Signed + Ord + Copy,
{
    /// Return a builder for a network with `nvertices` vertices.
    pub fn builder(nvertices: usize) -> NetworkBuilder<F> {
        NetworkBuilder::with_capacities(nvertices, 0)
    }

    /// Create a new network by passing a builder to the callback `f`.
    ///
    /// All vertices are registered before `f` is called.
    pub fn new_with<B>(nvertices: usize, f: B) -> Result<Self>
    where
        B: FnOnce(&mut NetworkBuilder<F>) -> Result<()>,
    {
        let mut b = Self::builder(nvertices);
        b.add_vertices();
        f(&mut b)?;
        b.into_network()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// The source vertex `0`.
    pub fn source(&self) -> usize {
        0
    }

    /// The target vertex `n-1`.
    pub fn target(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn vertex(&self, v: usize) -> &Vertex {
        &self.vertices[v]
    }

    pub fn vertices(&self) -> SliceIter<'_, Vertex> {
        self.vertices.iter()
    }

    pub fn edge(&self, e: usize) -> &Edge<F> {
        &self.edges[e]
    }

    pub fn edges(&self) -> SliceIter<'_, Edge<F>> {
        self.edges.iter()
    }

    /// The outgoing arcs of `v` in insertion order.
    pub fn adjacency(&self, v: usize) -> &[usize] {
        &self.adj[v]
    }

    /// Return `true` if `e` leaves the source.
    pub fn from_source(&self, e: usize) -> bool {
        self.edges[e].src == self.source()
    }

    /// Return `true` if `e` enters the target.
    pub fn to_target(&self, e: usize) -> bool {
        self.edges[e].snk == self.target()
    }

    /// Remove all flow and all levels.
    pub fn reset_flow(&mut self) {
        for e in &mut self.edges {
            e.flow = F::zero();
        }
        self.reset_levels();
    }

    pub(crate) fn reset_levels(&mut self) {
        for v in &mut self.vertices {
            v.level = None;
        }
    }

    pub(crate) fn vertex_mut(&mut self, v: usize) -> &mut Vertex {
        &mut self.vertices[v]
    }

    /// Send `f` units along `e` and cancel them on its paired arc.
    pub(crate) fn push_flow(&mut self, e: usize, f: F) {
        self.edges[e].add_flow(f);
        if let Some(r) = self.edges[e].rev {
            self.edges[r].sub_flow(f);
        }
    }

    /// The total capacity of all arcs from visited to unvisited vertices.
    pub fn cut_capacity(&self) -> F {
        self.edges
            .iter()
            .filter(|e| self.vertices[e.src].visited() && !self.vertices[e.snk].visited())
            .fold(F::zero(), |sum, e| sum + e.capacity)
    }
}

impl<F> fmt::Display for Network<F>
where
    F: fmt::Display,
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        for (u, adj) in self.adj.iter().enumerate() {
            write!(fmt, "{:2} |", u)?;
            for &e in adj {
                write!(fmt, " {:2}", self.edges[e].snk)?;
            }
            writeln!(fmt)?;
        }
        Ok(())
    }
}
