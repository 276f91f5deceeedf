use std::env;
use std::process::exit;

use round::round;

use clique::branch_and_bound::MAX_SUBSET_SIZE_LIMIT;
use clique::graph_utils::{load_clq_file, WeightedGraph};
use clique::{run_algorithm, Clock};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        eprintln!("Usage: {} <file> [subset_size_limit [time_limit_sec]]", args[0]);
        exit(1);
    }

    let graph = match load_clq_file(&args[1]) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error while loading graph : {}", e);
            exit(1);
        }
    };

    let limit = args.get(2).and_then(|arg| parse_limit(arg));
    let time_limit = match args.get(3) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seconds) => seconds,
            Err(_) => {
                eprintln!("Invalid time limit {:?}", arg);
                exit(1);
            }
        },
        // without the third argument the timeout feature stays disarmed
        None => u64::MAX,
    };

    let graph_id = args[1].split('/').last().unwrap();
    find_max_clique(graph_id, &graph, limit, time_limit);
}

fn find_max_clique(graph_id: &str, graph: &WeightedGraph, limit: Option<usize>, time_limit: u64) {
    let order = graph.order();
    let density = if order < 2 {
        0.0
    } else {
        graph.size() as f64 / ((order * (order - 1)) / 2) as f64
    };
    println!(
        "Finding the max clique of the {} graph. Order = {} and size = {}. Density = {}",
        graph_id,
        order,
        graph.size(),
        round(density, 4)
    );

    let mut clock = Clock::new(time_limit);
    let res = match run_algorithm(graph_id, graph, limit, &mut clock) {
        Ok(res) => res,
        Err(e) => {
            eprintln!("Error while creating the result : {}", e);
            exit(1);
        }
    };

    println!("================ Result ===================\n{}", res);
    if clock.is_time_up() {
        println!("TIMEOUT");
    }

    let total = clock.get_time().duration.as_secs_f64();
    if total > 0.0 {
        println!("======== Details about performance ========");
        println!(
            "Time spent in precomputation : {}%",
            round(
                clock.get_subroutine_duration("precomputation").as_secs_f64() * 100.0 / total,
                4
            )
        );
        println!(
            "Time spent in branch-and-bound : {}%",
            round(
                clock.get_subroutine_duration("branch_and_bound").as_secs_f64() * 100.0 / total,
                4
            )
        );
    }
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
