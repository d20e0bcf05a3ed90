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

//! Maximum flow algorithms on residual networks.
//!
//! All algorithms work directly on the flow fields of a
//! [`Network`](crate::network::Network). After an algorithm has
//! terminated the levels of the vertices describe a minimum cut: a
//! vertex is on the source side iff it has been visited in the last
//! search.

pub mod dinic;
pub use self::dinic::{dinic, Dinic};

pub mod edmondskarp;
pub use self::edmondskarp::{edmondskarp, EdmondsKarp};

use crate::network::Network;
use crate::num::traits::{NumAssign, Signed};

use std::cmp::min;

/// Saturate all paths `src -> v -> snk` of length two.
///
/// For each arc `src -> v` the first arc `v -> snk` in the adjacency of
/// `v` is used. Returns the amount of flow sent.
pub(crate) fn initial_flow<F>(net: &mut Network<F>, src: usize, snk: usize) -> F
where
    F: NumAssign + Signed + Ord + Copy,
{
    let mut value = F::zero();
    for i in 0..net.adjacency(src).len() {
        let sv = net.adjacency(src)[i];
        let v = net.edge(sv).snk();
        if v == snk || v == src {
            continue;
        }
        let vt = {
            let g = &*net;
            match g.adjacency(v).iter().copied().find(|&e| g.edge(e).snk() == snk) {
                Some(e) => e,
                None => continue,
            }
        };
        let df = min(net.edge(sv).residual_capacity(), net.edge(vt).residual_capacity());
        if df > F::zero() {
            net.push_flow(sv, df);
            net.push_flow(vt, df);
            value += df;
        }
    }
    value
}
