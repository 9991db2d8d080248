use std::io::Write;

use biplanar_rs::io;
use biplanar_rs::solver::{solve_biplanar, Outcome};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| color_eyre::eyre::eyre!("usage: solve-edge-list <edge-list-file>"))?;

    let graph = io::read_edge_list(&path)?;
    println!(
        "graph: {} vertices, {} edges",
        graph.num_vertices(),
        graph.num_edges()
    );

    match solve_biplanar(&graph)? {
        Outcome::Biplanar(partition) => {
            println!(
                "biplanar: |side 0| = {}, |side 1| = {}",
                partition.side0.len(),
                partition.side1.len()
            );
            let mut stdout = std::io::stdout().lock();
            io::write_partition(&mut stdout, &partition)?;
            stdout.flush()?;
        }
        Outcome::Infeasible => {
            println!("no biplanar partition exists");
        }
    }

    Ok(())
}
