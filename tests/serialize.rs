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

#![cfg(feature = "serialize")]

use gridcut::grid::GridInstance;
use gridcut::maxflow::dinic;
use gridcut::Network;

use std::io::Cursor;

#[test]
fn test_instance_json() {
    let instance = GridInstance::<i64>::read(Cursor::new("1 2\n4 4\n1 1\n10\n")).unwrap();
    let json = serde_json::to_string(&instance).unwrap();
    assert_eq!(
        json,
        r#"{"rows":1,"cols":2,"source":[4,4],"target":[1,1],"horizontal":[10],"vertical":[]}"#
    );

    let instance: GridInstance<i64> = serde_json::from_str(&json).unwrap();
    assert_eq!(instance.solve().unwrap().value, 2);
}

#[test]
fn test_solved_network_json() {
    let mut net = GridInstance::<i64>::read(Cursor::new("1 1\n5\n3\n"))
        .unwrap()
        .build_network()
        .unwrap();
    dinic(&mut net, 0, 2);

    let json = serde_json::to_string(&net).unwrap();
    let net: Network<i64> = serde_json::from_str(&json).unwrap();
    assert_eq!(net.num_edges(), 2);
    assert_eq!(net.edge(0).flow(), 3);
    assert!(net.vertex(1).visited());
    assert_eq!(net.cut_capacity(), 3);
}
