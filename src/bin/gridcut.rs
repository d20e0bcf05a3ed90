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

use rustop::opts;
use time::OffsetDateTime;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use gridcut::grid::{Algorithm, Config, GridInstance};

use std::error::Error;
use std::io::{self, BufWriter, Write};

fn run(file: Option<&str>, config: Config) -> Result<(), Box<dyn Error>> {
    let tstart = OffsetDateTime::now_utc();
    let instance: GridInstance<i64> = match file {
        Some(file) => GridInstance::read_from_file(file)?,
        None => GridInstance::read(io::stdin().lock())?,
    };
    let tend = OffsetDateTime::now_utc();
    info!(
        seconds = (tend - tstart).as_seconds_f64(),
        rows = instance.rows,
        cols = instance.cols,
        "reading"
    );

    let tstart = OffsetDateTime::now_utc();
    let solution = instance.solve_with(config)?;
    let tend = OffsetDateTime::now_utc();
    info!(seconds = (tend - tstart).as_seconds_f64(), "solving");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write!(out, "{}", solution)?;
    out.flush()?;

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("GRIDCUT_LOG")
                .from_env_lossy(),
        )
        .init();

    let (args, _) = opts! {
        synopsis "Compute a maximum flow and a minimum cut of a grid instance.";
        opt algorithm:Option<String>, desc:"The max-flow algorithm ('dinic' or 'edmondskarp').";
        opt no_initial_flow:bool, desc:"Do not saturate the paths source-cell-target first.";
        param file:Option<String>, desc:"Instance file name (read from stdin if missing)";
    }
    .parse_or_exit();

    let algorithm = match args.algorithm.as_deref().map(str::parse::<Algorithm>) {
        None => Algorithm::Dinic,
        Some(Ok(algorithm)) => algorithm,
        Some(Err(msg)) => {
            eprintln!("Error: {}", msg);
            std::process::exit(2);
        }
    };
    let config = Config {
        algorithm,
        use_initial_flow: !args.no_initial_flow,
    };

    if let Err(err) = run(args.file.as_deref(), config) {
        error!("{}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
