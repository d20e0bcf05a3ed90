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

//! Grid instances.
//!
//! A grid instance with `m` rows and `n` columns is given as a
//! sequence of whitespace separated integers (line breaks are
//! arbitrary):
//!
//! 1. the two dimensions `m n`,
//! 2. `m*n` capacities of the arcs from the source to each cell,
//! 3. `m*n` capacities of the arcs from each cell to the target,
//! 4. `m*(n-1)` capacities of the links between each cell and its
//!    right neighbour,
//! 5. `(m-1)*n` capacities of the links between each cell and the
//!    cell below.
//!
//! All cells are given in row-major order. A capacity of `0` means
//! that there is no arc.
//!
//! The cells are the vertices `1..=m*n` of the network, vertex `0`
//! is the source and vertex `m*n+1` the target.
//!
//! # Example
//!
//! ```
//! use gridcut::grid::GridInstance;
//! use std::io::Cursor;
//!
//! let instance = GridInstance::<i64>::read(Cursor::new("2 2
//! 9 0 9 0
//! 0 9 0 9
//! 1 1
//! 5 5
//! ")).unwrap();
//!
//! let solution = instance.solve().unwrap();
//! assert_eq!(solution.value, 2);
//! assert_eq!(format!("{}", solution), "2\n\nC P \nC P \n");
//! ```

use crate::maxflow::{Dinic, EdmondsKarp};
use crate::network::{self, Network};
use crate::num::traits::{CheckedAdd, NumAssign, Signed};

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

use std::error;
use std::fmt::{self, Debug, Display};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::str::FromStr;

use tracing::{debug, info};

/// Error when reading or building a grid instance.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Format { line: usize, msg: String },
    Data { line: usize, msg: String },
    /// The capacity vectors do not match the dimensions.
    Shape(String),
    /// The total capacity is not representable by the flow type.
    Capacity(String),
    Network(network::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<network::Error> for Error {
    fn from(err: network::Error) -> Self {
        Error::Network(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        match self {
            Error::Io(err) => Display::fmt(err, fmt),
            Error::Format { line, msg } => write!(fmt, "Format error on line {}: {}", line, msg),
            Error::Data { line, msg } => write!(fmt, "Data error on line {}: {}", line, msg),
            Error::Shape(msg) => write!(fmt, "Invalid grid: {}", msg),
            Error::Capacity(msg) => write!(fmt, "Capacity overflow: {}", msg),
            Error::Network(err) => write!(fmt, "Network error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Network(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The max-flow algorithm used to solve a grid instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Dinic,
    EdmondsKarp,
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "dinic" => Ok(Algorithm::Dinic),
            "edmondskarp" | "ek" => Ok(Algorithm::EdmondsKarp),
            _ => Err(format!("unknown algorithm '{}', must be 'dinic' or 'edmondskarp'", s)),
        }
    }
}

/// Options for solving a grid instance.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub algorithm: Algorithm,
    /// Saturate the paths source -> cell -> target first.
    pub use_initial_flow: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            algorithm: Algorithm::Dinic,
            use_initial_flow: true,
        }
    }
}

/// A grid instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct GridInstance<F> {
    /// The number of rows.
    pub rows: usize,
    /// The number of columns.
    pub cols: usize,
    /// Capacity from the source to each cell.
    pub source: Vec<F>,
    /// Capacity from each cell to the target.
    pub target: Vec<F>,
    /// Capacity between each cell and its right neighbour.
    pub horizontal: Vec<F>,
    /// Capacity between each cell and the cell below.
    pub vertical: Vec<F>,
}

/// The source side of a minimum cut restricted to the cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutGrid {
    rows: usize,
    cols: usize,
    source_side: Vec<bool>,
}

impl CutGrid {
    /// Read the cut off the levels of the network's vertices.
    pub fn from_network<F>(rows: usize, cols: usize, net: &Network<F>) -> CutGrid
    where
        F: NumAssign + Signed + Ord + Copy,
    {
        CutGrid {
            rows,
            cols,
            source_side: (1..=rows * cols).map(|v| net.vertex(v).visited()).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return `true` if the cell is on the source side of the cut.
    pub fn is_source_side(&self, row: usize, col: usize) -> bool {
        self.source_side[row * self.cols + col]
    }
}

impl fmt::Display for CutGrid {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        for row in self.source_side.chunks(self.cols.max(1)) {
            for &s in row {
                write!(fmt, "{} ", if s { 'C' } else { 'P' })?;
            }
            writeln!(fmt)?;
        }
        Ok(())
    }
}

/// The maximum flow value and the cut of a grid instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSolution<F> {
    pub value: F,
    pub cut: CutGrid,
}

impl<F> fmt::Display for GridSolution<F>
where
    F: Display,
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        write!(fmt, "{}\n\n{}", self.value, self.cut)
    }
}

/// Reads whitespace separated tokens.
struct GridReader<R: Read> {
    io: BufReader<R>,

    line: String,
    line_number: usize,
    pos: usize,
}

impl<R: Read> GridReader<R> {
    fn new(reader: R) -> Self {
        GridReader {
            io: BufReader::new(reader),
            line: String::new(),
            line_number: 0,
            pos: 0,
        }
    }

    // Return the byte range of the next token in the current line.
    fn token(&mut self) -> Result<Option<(usize, usize)>> {
        loop {
            if let Some(i) = self.line[self.pos..].find(|c: char| !c.is_whitespace()) {
                let start = self.pos + i;
                let end = self.line[start..]
                    .find(char::is_whitespace)
                    .map_or(self.line.len(), |j| start + j);
                self.pos = end;
                return Ok(Some((start, end)));
            }

            self.line.clear();
            self.pos = 0;
            if self.io.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
        }
    }

    /// Returns the next token converted to a number.
    fn number<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let (start, end) = self.token()?.ok_or_else(|| Error::Format {
            line: self.line_number,
            msg: format!("unexpected end of file, expected {}", what),
        })?;
        let tok = &self.line[start..end];
        tok.parse().map_err(|e| Error::Format {
            line: self.line_number,
            msg: format!("invalid {} '{}': {}", what, tok, e),
        })
    }

    /// Read `n` non-negative capacities.
    fn capacities<F>(&mut self, n: usize, what: &str) -> Result<Vec<F>>
    where
        F: FromStr + NumAssign + Signed + Ord + Copy + Display,
        F::Err: Display,
    {
        // n comes from the header, do not trust it for allocation
        let mut caps = Vec::with_capacity(n.min(1 << 16));
        for _ in 0..n {
            let c: F = self.number(what)?;
            if c < F::zero() {
                return Err(Error::Data {
                    line: self.line_number,
                    msg: format!("negative {} {}", what, c),
                });
            }
            caps.push(c);
        }
        Ok(caps)
    }

    /// Ensures that there is no further token.
    fn end(&mut self) -> Result<()> {
        match self.token()? {
            Some((start, end)) => Err(Error::Format {
                line: self.line_number,
                msg: format!("unexpected token at end of file: {}", &self.line[start..end]),
            }),
            None => Ok(()),
        }
    }
}

impl<F> GridInstance<F>
where
    F: NumAssign + Signed + Ord + Copy + CheckedAdd,
{
    /// Create an instance where all capacities are zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        GridInstance {
            rows,
            cols,
            source: vec![F::zero(); rows * cols],
            target: vec![F::zero(); rows * cols],
            horizontal: vec![F::zero(); rows * cols.saturating_sub(1)],
            vertical: vec![F::zero(); rows.saturating_sub(1) * cols],
        }
    }

    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// The number of vertices of the network, the cells plus source and target.
    pub fn num_vertices(&self) -> usize {
        self.num_cells() + 2
    }

    /// The vertex of a cell.
    pub fn cell_vertex(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col + 1
    }

    /// The cell of a vertex, `None` for the source and the target.
    pub fn vertex_cell(&self, v: usize) -> Option<(usize, usize)> {
        if v >= 1 && v <= self.num_cells() {
            Some(((v - 1) / self.cols, (v - 1) % self.cols))
        } else {
            None
        }
    }

    fn check_shape(&self) -> Result<()> {
        let n = self.num_cells();
        let lens = [
            ("source", self.source.len(), n),
            ("target", self.target.len(), n),
            ("horizontal", self.horizontal.len(), self.rows * self.cols.saturating_sub(1)),
            ("vertical", self.vertical.len(), self.rows.saturating_sub(1) * self.cols),
        ];
        for &(what, len, expected) in &lens {
            if len != expected {
                return Err(Error::Shape(format!(
                    "{} {} capacities for a {}x{} grid (expected {})",
                    len, what, self.rows, self.cols, expected
                )));
            }
        }
        Ok(())
    }

    // Every flow value and residual capacity is bounded by the total
    // capacity of all arcs, where a link counts twice.
    fn check_capacity(&self) -> Result<()> {
        let add = |total: Option<F>, c: &F| total.and_then(|t| t.checked_add(c));
        let total = self.source.iter().chain(&self.target).fold(Some(F::zero()), add);
        let total = self
            .horizontal
            .iter()
            .chain(&self.vertical)
            .fold(total, |t, c| add(add(t, c), c));
        if total.is_none() {
            return Err(Error::Capacity(format!(
                "total capacity of the {}x{} grid exceeds the flow type",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// Build the flow network of this instance.
    ///
    /// Arcs are added in the following order: all arcs leaving the
    /// source, all arcs entering the target, the horizontal links and
    /// finally the vertical links. Links are paired arcs, the arcs at
    /// the source and the target have no reverse arc.
    ///
    /// Fails if the total capacity does not fit into `F`.
    pub fn build_network(&self) -> Result<Network<F>> {
        self.check_shape()?;
        self.check_capacity()?;

        let (m, n) = (self.rows, self.cols);
        let nedges = 2 * m * n + 2 * (self.horizontal.len() + self.vertical.len());
        let mut b = network::NetworkBuilder::with_capacities(self.num_vertices(), nedges);
        for v in 0..self.num_vertices() {
            b.add_vertex(v)?;
        }

        let src = 0;
        let snk = self.num_vertices() - 1;
        for (i, &c) in self.source.iter().enumerate() {
            b.add_one_way_edge(src, i + 1, c)?;
        }
        for (i, &c) in self.target.iter().enumerate() {
            b.add_one_way_edge(i + 1, snk, c)?;
        }
        for row in 0..m {
            for col in 0..n.saturating_sub(1) {
                let u = self.cell_vertex(row, col);
                b.add_paired_edge(u, u + 1, self.horizontal[row * (n - 1) + col])?;
            }
        }
        for row in 0..m.saturating_sub(1) {
            for col in 0..n {
                let u = self.cell_vertex(row, col);
                b.add_paired_edge(u, u + n, self.vertical[row * n + col])?;
            }
        }

        let net = b.into_network()?;
        debug!(vertices = net.num_vertices(), arcs = net.num_edges(), "built grid network");
        Ok(net)
    }

    /// Write the instance in the text format.
    pub fn write<W: Write>(&self, mut w: W) -> io::Result<()>
    where
        F: Display,
    {
        fn line<W: Write, F: Display>(w: &mut W, caps: &[F]) -> io::Result<()> {
            let strs: Vec<_> = caps.iter().map(|c| c.to_string()).collect();
            writeln!(w, "{}", strs.join(" "))
        }

        writeln!(w, "{} {}", self.rows, self.cols)?;
        line(&mut w, &self.source)?;
        line(&mut w, &self.target)?;
        line(&mut w, &self.horizontal)?;
        line(&mut w, &self.vertical)?;
        Ok(())
    }

    /// Solve the instance with Dinic' algorithm.
    pub fn solve(&self) -> Result<GridSolution<F>>
    where
        F: Debug,
    {
        self.solve_with(Config::default())
    }

    /// Solve the instance with the given options.
    pub fn solve_with(&self, config: Config) -> Result<GridSolution<F>>
    where
        F: Debug,
    {
        let mut net = self.build_network()?;
        let (src, snk) = (net.source(), net.target());
        let value = match config.algorithm {
            Algorithm::Dinic => {
                let mut d = Dinic::new(&mut net, src, snk);
                d.use_initial_flow = config.use_initial_flow;
                d.solve()
            }
            Algorithm::EdmondsKarp => {
                let mut ek = EdmondsKarp::new(&mut net, src, snk);
                ek.use_initial_flow = config.use_initial_flow;
                ek.solve()
            }
        };
        info!(?value, algorithm = ?config.algorithm, "solved grid instance");

        Ok(GridSolution {
            value,
            cut: CutGrid::from_network(self.rows, self.cols, &net),
        })
    }
}

impl<F> GridInstance<F>
where
    F: FromStr + NumAssign + Signed + Ord + Copy + CheckedAdd + Display,
    F::Err: Display,
{
    /// Read an instance in the text format.
    pub fn read<R: Read>(r: R) -> Result<Self> {
        let mut reader = GridReader::new(r);

        let rows: usize = reader.number("number of rows")?;
        let cols: usize = reader.number("number of columns")?;
        if rows == 0 || cols == 0 {
            return Err(Error::Data {
                line: reader.line_number,
                msg: format!("invalid grid size {}x{}", rows, cols),
            });
        }
        let ncells = rows.checked_mul(cols).filter(|n| n.checked_add(&2).is_some()).ok_or_else(|| {
            Error::Data {
                line: reader.line_number,
                msg: format!("grid size {}x{} too large", rows, cols),
            }
        })?;

        let source = reader.capacities(ncells, "source capacity")?;
        let target = reader.capacities(ncells, "target capacity")?;
        let horizontal = reader.capacities(rows * (cols - 1), "horizontal capacity")?;
        let vertical = reader.capacities((rows - 1) * cols, "vertical capacity")?;
        reader.end()?;

        info!(rows, cols, "read grid instance");
        Ok(GridInstance {
            rows,
            cols,
            source,
            target,
            horizontal,
            vertical,
        })
    }

    pub fn read_from_file(filename: &str) -> Result<Self> {
        Self::read(std::fs::File::open(filename)?)
    }
}
