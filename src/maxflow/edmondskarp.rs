/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! This module implements the max flow algorithm of Edmonds-Karp.
//!
//! In each iteration a shortest augmenting path is searched by a
//! breadth-first search and saturated.
//!
//! # Example
//!
//! ```
//! use gridcut::network::Network;
//! use gridcut::maxflow::edmondskarp;
//!
//! let mut net = Network::<i32>::new_with(4, |b| {
//!     b.add_one_way_edge(0, 1, 5)?;
//!     b.add_one_way_edge(0, 2, 1)?;
//!     b.add_paired_edge(1, 2, 2)?;
//!     b.add_one_way_edge(1, 3, 1)?;
//!     b.add_one_way_edge(2, 3, 4)?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let (value, mincut) = edmondskarp(&mut net, 0, 3);
//! assert_eq!(value, 4);
//! assert_eq!(mincut, vec![0, 1]);
//! ```

use crate::network::Network;
use crate::num::traits::{NumAssign, Signed};

use std::collections::VecDeque;
use std::fmt::Debug;

use tracing::debug;

/// Max-flow algorithm of Edmonds and Karp.
pub struct EdmondsKarp<'a, F> {
    net: &'a mut Network<F>,
    src: usize,
    snk: usize,
    // the arc used to reach each vertex in the last search
    pred: Vec<Option<usize>>,
    queue: VecDeque<usize>,
    value: F,
    /// Whether to saturate the paths of length two first.
    pub use_initial_flow: bool,
}

impl<'a, F> EdmondsKarp<'a, F>
where
    F: NumAssign + Signed + Ord + Copy + Debug,
{
    /// Create a new Edmonds-Karp algorithm instance for a network.
    pub fn new(net: &'a mut Network<F>, src: usize, snk: usize) -> Self {
        assert_ne!(src, snk, "Source and sink node must not be equal");
        assert!(
            src < net.num_vertices() && snk < net.num_vertices(),
            "Source and sink must be vertices of the network"
        );
        let n = net.num_vertices();
        EdmondsKarp {
            net,
            src,
            snk,
            pred: vec![None; n],
            queue: VecDeque::with_capacity(n),
            value: F::zero(),
            use_initial_flow: true,
        }
    }

    /// Return the underlying network.
    pub fn as_network(&self) -> &Network<F> {
        &*self.net
    }

    /// Return the value of the latest computed maximum flow.
    pub fn value(&self) -> F {
        self.value
    }

    /// Return the flow value on arc `e`.
    pub fn flow(&self, e: usize) -> F {
        self.net.edge(e).flow()
    }

    pub fn solve(&mut self) -> F {
        self.net.reset_flow();
        self.value = F::zero();
        if self.use_initial_flow {
            self.value = super::initial_flow(&mut *self.net, self.src, self.snk);
        }

        let mut npaths = 0usize;
        while self.search() {
            // compute augmentation value
            let mut df = None;
            let mut v = self.snk;
            while let Some(e) = self.pred[v] {
                let r = self.net.edge(e).residual_capacity();
                df = Some(df.map_or(r, |df: F| df.min(r)));
                v = self.net.edge(e).src();
            }
            let df = match df {
                Some(df) => df,
                None => break,
            };
            debug_assert!(!df.is_zero());

            // now augment the flow
            let mut v = self.snk;
            while let Some(e) = self.pred[v] {
                self.net.push_flow(e, df);
                v = self.net.edge(e).src();
            }

            self.value += df;
            npaths += 1;
        }

        debug!(paths = npaths, value = ?self.value, "edmonds-karp finished");
        self.value
    }

    /// Breadth-first search from the source to the sink.
    ///
    /// The search stops as soon as the sink has been reached.
    fn search(&mut self) -> bool {
        self.net.reset_levels();
        for p in &mut self.pred {
            *p = None;
        }
        self.net.vertex_mut(self.src).set_level(Some(0));

        self.queue.clear();
        self.queue.push_back(self.src);
        'bfs: while let Some(u) = self.queue.pop_front() {
            let d = self.net.vertex(u).level().unwrap_or(0);
            for i in 0..self.net.adjacency(u).len() {
                let e = self.net.adjacency(u)[i];
                let v = self.net.edge(e).snk();
                if self.net.edge(e).is_residual() && !self.net.vertex(v).visited() {
                    self.net.vertex_mut(v).set_level(Some(d + 1));
                    self.pred[v] = Some(e);
                    self.queue.push_back(v);
                    if v == self.snk {
                        break 'bfs;
                    }
                }
            }
        }

        self.net.vertex(self.snk).visited()
    }

    /// Return `true` if `v` is on the source side of the cut.
    pub fn is_source_side(&self, v: usize) -> bool {
        self.net.vertex(v).visited()
    }

    /// Return the minimal cut associated with the last maximum flow.
    pub fn mincut(&self) -> Vec<usize> {
        self.net.vertices().filter(|v| v.visited()).map(|v| v.key()).collect()
    }
}

/// Solve the maxflow problem using the algorithm of Edmonds-Karp.
///
/// The function returns the flow value and the vertices on the
/// source side of a minimal cut.
pub fn edmondskarp<F>(net: &mut Network<F>, src: usize, snk: usize) -> (F, Vec<usize>)
where
    F: NumAssign + Signed + Ord + Copy + Debug,
{
    let mut maxflow = EdmondsKarp::new(net, src, snk);
    let value = maxflow.solve();
    (value, maxflow.mincut())
}

#[cfg(test)]
mod tests {
    use super::EdmondsKarp;
    use crate::maxflow::dinic;
    use crate::network::Network;

    fn ladder(n: usize) -> Network<i32> {
        // two rails 1..=n and n+1..=2n joined by rungs
        Network::new_with(2 * n + 2, |b| {
            let t = 2 * n + 1;
            for i in 1..=n {
                b.add_one_way_edge(0, i, (i % 3 + 1) as i32)?;
                b.add_one_way_edge(n + i, t, (i % 2 + 2) as i32)?;
                b.add_paired_edge(i, n + i, 2)?;
                if i < n {
                    b.add_paired_edge(i, i + 1, 1)?;
                    b.add_paired_edge(n + i, n + i + 1, 1)?;
                }
            }
            Ok(())
        })
        .unwrap()
    }

    #[test]
    fn test_same_as_dinic() {
        for &n in &[1, 2, 5, 8] {
            for &init in &[true, false] {
                let mut g = ladder(n);
                let t = g.target();
                let mut ek = EdmondsKarp::new(&mut g, 0, t);
                ek.use_initial_flow = init;
                let value = ek.solve();
                let cut = ek.mincut();
                assert_eq!(g.cut_capacity(), value);

                let mut h = ladder(n);
                let (dvalue, dcut) = dinic(&mut h, 0, t);
                assert_eq!(value, dvalue, "ladder {} init {}", n, init);
                assert_eq!(cut, dcut);
            }
        }
    }
}
