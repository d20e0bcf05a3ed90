// Copyright (c) 2015-2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

#![forbid(unsafe_code)]

//! Maximum flows and minimum cuts on grid networks.
//!
//! Each cell of a 2-D grid is a vertex linked to a source, a target
//! and its neighbours. The maximum flow from source to target
//! partitions the cells into the two sides of a minimum cut.

mod num {
    pub use num_traits as traits;
}

// # Data structures

pub mod network;
pub use self::network::{Network, NetworkBuilder};

pub mod grid;
pub use self::grid::{GridInstance, GridSolution};

// # Algorithms

pub mod maxflow;
