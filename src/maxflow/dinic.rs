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

//! This module implements Dinic' max flow algorithm
//!
//! Each phase builds the level graph by a breadth-first search from
//! the source and then saturates it with a blocking flow. The
//! blocking flow is found by repeated depth-first searches along arcs
//! from level `d` to level `d+1`. Each vertex keeps a cursor to the
//! next arc to examine. Within one phase the cursor only moves
//! forward, so every arc is discarded at most once per phase.
//!
//! # Example
//!
//! ```
//! use gridcut::network::Network;
//! use gridcut::maxflow::Dinic;
//!
//! //      --4--> 1 ------4------
//! //     /                      \
//! //    0                        5
//! //     \                      /
//! //      --4--> 2 --4-- 3 --4--
//! let mut net = Network::<i32>::new_with(6, |b| {
//!     b.add_one_way_edge(0, 1, 4)?;
//!     b.add_one_way_edge(0, 2, 4)?;
//!     b.add_one_way_edge(1, 5, 4)?;
//!     b.add_paired_edge(2, 3, 4)?;
//!     b.add_one_way_edge(3, 5, 4)?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let mut d = Dinic::new(&mut net, 0, 5);
//! d.use_initial_flow = false;
//! d.init();
//! assert_eq!(d.phase(), Some(4));
//! assert_eq!(d.phase(), Some(4));
//! assert_eq!(d.phase(), None);
//! assert_eq!(d.value(), 8);
//! assert_eq!(d.mincut(), vec![0]);
//! ```

use crate::network::Network;
use crate::num::traits::{NumAssign, Signed};

use std::collections::VecDeque;
use std::fmt::Debug;

use tracing::{debug, trace};

/// The dinic max-flow algorithm.
pub struct Dinic<'a, F> {
    net: &'a mut Network<F>,
    src: usize,
    snk: usize,
    // next arc to examine, indexed by vertex
    current: Vec<usize>,
    queue: VecDeque<(usize, usize)>,
    // arcs of the current partial path
    path: Vec<usize>,
    value: F,
    /// Whether to saturate the paths of length two before the first phase.
    pub use_initial_flow: bool,
}

impl<'a, F> Dinic<'a, F>
where
    F: NumAssign + Signed + Ord + Copy + Debug,
{
    /// Create a new Dinic algorithm instance for a network.
    ///
    /// The algorithm sends flow from `src` to `snk`.
    pub fn new(net: &'a mut Network<F>, src: usize, snk: usize) -> Self {
        assert_ne!(src, snk, "Source and sink node must not be equal");
        assert!(
            src < net.num_vertices() && snk < net.num_vertices(),
            "Source and sink must be vertices of the network"
        );
        let n = net.num_vertices();
        Dinic {
            net,
            src,
            snk,
            current: vec![0; n],
            queue: VecDeque::with_capacity(n),
            path: Vec::with_capacity(n),
            value: F::zero(),
            use_initial_flow: true,
        }
    }

    /// Return the underlying network.
    pub fn as_network(&self) -> &Network<F> {
        &*self.net
    }

    /// Return the value of the current flow.
    pub fn value(&self) -> F {
        self.value
    }

    /// Return the flow value on arc `e`.
    pub fn flow(&self, e: usize) -> F {
        self.net.edge(e).flow()
    }

    /// Solve the maxflow problem.
    ///
    /// Any flow present in the network is removed first.
    pub fn solve(&mut self) -> F {
        self.init();
        let mut nphases = 0;
        while self.phase().is_some() {
            nphases += 1;
        }
        debug!(phases = nphases, value = ?self.value, "dinic finished");
        self.value
    }

    /// Reset the flow and, if enabled, send the initial flow.
    pub fn init(&mut self) {
        self.net.reset_flow();
        self.value = F::zero();
        if self.use_initial_flow {
            self.value = super::initial_flow(&mut *self.net, self.src, self.snk);
            debug!(value = ?self.value, "initial flow");
        }
    }

    /// Run a single phase.
    ///
    /// Returns the amount of flow sent in this phase or `None` if the
    /// sink is not reachable anymore, i.e. if the flow is maximal.
    pub fn phase(&mut self) -> Option<F> {
        if !self.search() {
            return None;
        }

        for c in &mut self.current {
            *c = 0;
        }

        let mut df = F::zero();
        loop {
            let f = self.augment();
            if f.is_zero() {
                break;
            }
            trace!(flow = ?f, length = self.path.len(), "augmenting path");
            df += f;
        }
        self.value += df;
        debug!(sink_level = ?self.net.vertex(self.snk).level(), flow = ?df, "phase");

        Some(df)
    }

    /// Return `true` if `v` is on the source side of the cut.
    ///
    /// After the algorithm has terminated these are exactly the
    /// vertices reachable from the source in the residual network.
    pub fn is_source_side(&self, v: usize) -> bool {
        self.net.vertex(v).visited()
    }

    /// Return the source side of the minimal cut associated with the
    /// last maximum flow.
    pub fn mincut(&self) -> Vec<usize> {
        self.net.vertices().filter(|v| v.visited()).map(|v| v.key()).collect()
    }

    /// Compute the levels of all vertices reachable from the source.
    ///
    /// Returns `true` if the sink is reachable.
    fn search(&mut self) -> bool {
        self.net.reset_levels();
        self.net.vertex_mut(self.src).set_level(Some(0));

        self.queue.clear();
        self.queue.push_back((self.src, 0));

        while let Some((u, d)) = self.queue.pop_front() {
            for i in 0..self.net.adjacency(u).len() {
                let e = self.net.adjacency(u)[i];
                let edge = self.net.edge(e);
                let v = edge.snk();
                if edge.is_residual() && !self.net.vertex(v).visited() {
                    self.net.vertex_mut(v).set_level(Some(d + 1));
                    self.queue.push_back((v, d + 1));
                }
            }
        }

        self.net.vertex(self.snk).visited()
    }

    /// Find one augmenting path in the level graph and send flow along it.
    ///
    /// Returns the amount of flow sent, zero if there is no path.
    fn augment(&mut self) -> F {
        self.path.clear();
        let mut u = self.src;
        loop {
            if u == self.snk {
                let net = &mut *self.net;
                let df = match self.path.iter().map(|&e| net.edge(e).residual_capacity()).min() {
                    Some(df) => df,
                    None => return F::zero(),
                };
                for &e in &self.path {
                    net.push_flow(e, df);
                }
                return df;
            }

            let next_level = self.net.vertex(u).level().map(|d| d + 1);
            let adj = self.net.adjacency(u);
            let mut next = None;
            while let Some(&e) = adj.get(self.current[u]) {
                let edge = self.net.edge(e);
                if edge.is_residual() && self.net.vertex(edge.snk()).level() == next_level {
                    next = Some((e, edge.snk()));
                    break;
                }
                self.current[u] += 1;
            }

            match next {
                Some((e, v)) => {
                    self.path.push(e);
                    u = v;
                }
                None => match self.path.pop() {
                    // dead end, discard the arc leading here
                    Some(e) => {
                        u = self.net.edge(e).src();
                        self.current[u] += 1;
                    }
                    None => return F::zero(),
                },
            }
        }
    }
}

/// Solve the maxflow problem using the algorithm of Dinic.
///
/// The function solves the max flow problem from the source vertex
/// `src` to the sink vertex `snk` on the capacities of `net`. The flow
/// is stored in the arcs of `net`.
///
/// The function returns the flow value and the vertices on the source
/// side of a minimal cut.
pub fn dinic<F>(net: &mut Network<F>, src: usize, snk: usize) -> (F, Vec<usize>)
where
    F: NumAssign + Signed + Ord + Copy + Debug,
{
    let mut maxflow = Dinic::new(net, src, snk);
    let value = maxflow.solve();
    (value, maxflow.mincut())
}

#[cfg(test)]
mod tests {
    use super::{dinic, Dinic};
    use crate::network::Network;

    // Terminal arcs are one-way, inner links are paired.
    fn net6() -> Network<i64> {
        Network::new_with(6, |b| {
            b.add_one_way_edge(0, 1, 10)?;
            b.add_one_way_edge(0, 2, 10)?;
            b.add_one_way_edge(1, 5, 3)?;
            b.add_paired_edge(1, 2, 2)?;
            b.add_paired_edge(1, 3, 4)?;
            b.add_paired_edge(2, 4, 8)?;
            b.add_paired_edge(3, 4, 6)?;
            b.add_one_way_edge(3, 5, 10)?;
            b.add_one_way_edge(4, 5, 10)?;
            Ok(())
        })
        .unwrap()
    }

    fn check_flow(net: &Network<i64>, src: usize, snk: usize, value: i64) {
        for e in net.edges() {
            assert!(e.flow() <= e.capacity());
            if !e.has_rev() {
                assert!(e.flow() >= 0);
            } else {
                assert!(e.flow() >= -e.capacity());
            }
        }
        for u in 0..net.num_vertices() {
            if u == src || u == snk {
                continue;
            }
            let out: i64 = net.edges().filter(|e| e.src() == u && e.flow() > 0).map(|e| e.flow()).sum();
            let inc: i64 = net.edges().filter(|e| e.snk() == u && e.flow() > 0).map(|e| e.flow()).sum();
            assert_eq!(out, inc, "conservation violated at {}", u);
        }
        assert_eq!(net.cut_capacity(), value);
    }

    #[test]
    fn test_dinic() {
        let mut net = net6();
        let (value, mincut) = dinic(&mut net, 0, 5);
        assert_eq!(value, 15);
        assert_eq!(mincut, vec![0, 1, 2]);
        check_flow(&net, 0, 5, value);
    }

    #[test]
    fn test_without_initial_flow() {
        let mut net = net6();
        let mut d = Dinic::new(&mut net, 0, 5);
        d.use_initial_flow = false;
        assert_eq!(d.solve(), 15);
        assert!(d.is_source_side(2));
        assert!(!d.is_source_side(3));
        assert!(!d.is_source_side(4));
    }

    #[test]
    fn test_unreachable() {
        let mut net = Network::<i64>::new_with(4, |b| {
            b.add_one_way_edge(0, 1, 3)?;
            b.add_one_way_edge(2, 3, 3)?;
            Ok(())
        })
        .unwrap();
        let (value, mincut) = dinic(&mut net, 0, 3);
        assert_eq!(value, 0);
        assert_eq!(mincut, vec![0, 1]);
    }

    #[test]
    fn test_resolve() {
        let mut net = net6();
        let mut d = Dinic::new(&mut net, 0, 5);
        assert_eq!(d.solve(), 15);
        assert_eq!(d.solve(), 15);
        let first = d.mincut();
        assert_eq!(first, d.mincut());
    }

    #[test]
    fn test_monotone() {
        let mut net = net6();
        let mut d = Dinic::new(&mut net, 0, 5);
        d.use_initial_flow = false;
        d.init();
        let mut last = d.value();
        let mut last_level = 0;
        while let Some(df) = d.phase() {
            assert!(df > 0);
            assert!(d.value() >= last);
            let level = d.as_network().vertex(5).level().unwrap();
            assert!(level > last_level);
            last = d.value();
            last_level = level;
        }
        assert_eq!(last, 15);
    }

    #[test]
    #[should_panic]
    fn test_same_terminals() {
        let mut net = net6();
        Dinic::new(&mut net, 2, 2);
    }
}
