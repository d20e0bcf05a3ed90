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

use gridcut::grid::{Algorithm, Config, CutGrid, GridInstance};
use gridcut::maxflow::{Dinic, EdmondsKarp};
use gridcut::Network;

use std::error::Error;

const TESTS: &'static [(&'static str, i64, usize)] = &[
    ("tests/grid_test1.txt", 12, 8),
    ("tests/grid_test2.txt", 2019, 18),
    ("tests/grid_test3.txt", 68859, 523),
];

fn check_flow(net: &Network<i64>, value: i64) {
    let (src, snk) = (net.source(), net.target());

    for e in net.edges() {
        assert!(e.flow() <= e.capacity());
        match e.rev() {
            Some(r) => assert_eq!(e.flow(), -net.edge(r).flow()),
            None => assert!(e.flow() >= 0),
        }
    }

    let mut excess = vec![0; net.num_vertices()];
    for e in net.edges().filter(|e| e.flow() > 0) {
        excess[e.src()] -= e.flow();
        excess[e.snk()] += e.flow();
    }
    for (u, &x) in excess.iter().enumerate() {
        if u != src && u != snk {
            assert_eq!(x, 0, "conservation violated at {}", u);
        }
    }
    assert_eq!(excess[snk], value);
    assert_eq!(-excess[src], value);

    assert!(net.vertex(src).visited());
    assert!(!net.vertex(snk).visited());
    assert_eq!(net.cut_capacity(), value);
}

#[test]
fn test_dinic() -> Result<(), Box<dyn Error>> {
    for &(file, expected, ncut) in TESTS {
        let instance = GridInstance::<i64>::read_from_file(file)?;
        for &init in &[true, false] {
            let mut net = instance.build_network()?;
            let t = net.target();
            let mut d = Dinic::new(&mut net, 0, t);
            d.use_initial_flow = init;
            let value = d.solve();
            let mincut = d.mincut();
            assert_eq!(value, expected, "Instance: {} initial flow: {}", file, init);
            assert_eq!(mincut.len(), ncut);
            check_flow(&net, value);
        }
    }

    Ok(())
}

#[test]
fn test_edmondskarp() -> Result<(), Box<dyn Error>> {
    for &(file, expected, ncut) in TESTS {
        let instance = GridInstance::<i64>::read_from_file(file)?;
        let mut net = instance.build_network()?;
        let t = net.target();
        let mut ek = EdmondsKarp::new(&mut net, 0, t);
        let value = ek.solve();
        assert_eq!(value, expected, "Instance: {}", file);
        assert_eq!(ek.mincut().len(), ncut);
        check_flow(&net, value);
    }

    Ok(())
}

#[test]
fn test_same_cut() -> Result<(), Box<dyn Error>> {
    for &(file, _, _) in TESTS {
        let instance = GridInstance::<i64>::read_from_file(file)?;
        let dinic = instance.solve()?;
        let ek = instance.solve_with(Config {
            algorithm: Algorithm::EdmondsKarp,
            use_initial_flow: false,
        })?;
        assert_eq!(dinic, ek, "Instance: {}", file);
    }

    Ok(())
}

#[test]
fn test_monotone() -> Result<(), Box<dyn Error>> {
    let instance = GridInstance::<i64>::read_from_file("tests/grid_test2.txt")?;
    let mut net = instance.build_network()?;
    let t = net.target();
    let mut d = Dinic::new(&mut net, 0, t);
    d.init();
    let mut last = d.value();
    let mut last_level = 0;
    while let Some(df) = d.phase() {
        assert!(df > 0);
        assert!(d.value() > last);
        let level = d.as_network().vertex(t).level().unwrap_or(0);
        assert!(level > last_level);
        last = d.value();
        last_level = level;
    }
    assert_eq!(last, 2019);

    Ok(())
}

#[test]
fn test_cut_extraction() -> Result<(), Box<dyn Error>> {
    let instance = GridInstance::<i64>::read_from_file("tests/grid_test1.txt")?;
    let mut net = instance.build_network()?;
    let t = net.target();
    gridcut::maxflow::dinic(&mut net, 0, t);

    let first = CutGrid::from_network(instance.rows, instance.cols, &net);
    let second = CutGrid::from_network(instance.rows, instance.cols, &net);
    assert_eq!(first, second);
    assert!(first.is_source_side(0, 0));
    assert!(!first.is_source_side(0, 2));
    assert!(first.is_source_side(2, 2));

    Ok(())
}

#[test]
fn test_output() -> Result<(), Box<dyn Error>> {
    let instance = GridInstance::<i64>::read_from_file("tests/grid_test1.txt")?;
    let expected = std::fs::read_to_string("tests/grid_test1.out")?;
    assert_eq!(format!("{}", instance.solve()?), expected);

    Ok(())
}
