use std::env;
use std::process::exit;

use clique::branch_and_bound::{solve_mwvc, MAX_SUBSET_SIZE_LIMIT};
use clique::graph_utils::{is_vertex_cover, load_clq_file};
use clique::{default_subset_size_limit, Clock};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <file> [subset_size_limit]", args[0]);
        exit(1);
    }

    let graph = match load_clq_file(&args[1]) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error while loading graph : {}", e);
            exit(1);
        }
    };

    let limit = match args.get(2) {
        Some(arg) => parse_limit(arg).unwrap_or_else(|| default_subset_size_limit(graph.order())),
        None => default_subset_size_limit(graph.order()),
    };

    let mut clock = Clock::new(u64::MAX);
    let (weight, cover) = solve_mwvc(&graph, limit, &mut clock);
    clock.stop_timer();

    assert!(
        is_vertex_cover(&graph, &cover),
        "the derived set does not cover every edge"
    );

    println!("Minimum weight = {}", weight);
    println!(
        "The minimum weight vertex cover has {} vertices,",
        cover.len()
    );
    let one_based: Vec<String> = cover.iter().map(|v| (v + 1).to_string()).collect();
    println!(" [ {} ]", one_based.join(" "));
    println!("Time taken : {}", clock.get_time());
}

fn parse_limit(arg: &str) -> Option<usize> {
    match arg.parse::<i64>() {
        // -1 asks for the default limit, like leaving the argument out
        Ok(-1) => None,
        Ok(limit) if (1..=MAX_SUBSET_SIZE_LIMIT as i64).contains(&limit) => Some(limit as usize),
        _ => {
            eprintln!(
                "Invalid subset size limit {:?} (expected -1 or 1..={})",
                arg, MAX_SUBSET_SIZE_LIMIT
            );
            exit(1);
        }
    }
}
