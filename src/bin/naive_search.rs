use std::env;
use std::process::exit;

use clique::graph_utils::load_clq_file;
use clique::naive_search;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <file>", args[0]);
        exit(1);
    }

    let graph = match load_clq_file(&args[1]) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error while loading graph : {}", e);
            exit(1);
        }
    };
    if graph.order() > 25 {
        eprintln!(
            "{} vertices is too large for the naive search, use the mwc solver instead",
            graph.order()
        );
        exit(1);
    }

    let res = naive_search(&graph);
    let one_based: Vec<u64> = res.set.iter().map(|v| v + 1).collect();
    println!(
        "Maximum weight clique for the {:?} graph = {} => {:?}",
        args[1], res.weight, one_based
    );
}
