//! Exact maximum weight clique (MWC) and minimum weight vertex cover (MWVC)
//! solver. The search is a branch-and-bound whose upper bounds come from
//! precomputed optimal tables: exact MWC weights over every subset of each
//! part of a colour-aligned vertex partition.
//!
//! Graphs are loaded from weighted DIMACS files ([`graph_utils::load_clq_file`]),
//! solved with [`branch_and_bound::solve`] (or [`branch_and_bound::solve_mwvc`]
//! for covers) under a wall-clock [`Clock`], and the results can be checked
//! against the known values registered in `src/resources/graph_data.yml`.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

pub mod branch_and_bound;
pub mod coloring;
pub mod dense_graph;
pub mod errors;
pub mod graph_utils;
pub mod optimal_table;

use crate::branch_and_bound::Clique;
use crate::errors::{ClockError, YamlError};
use crate::graph_utils::{is_clique, is_optimal_value, WeightedGraph};

/// Default subset size limit for a graph of the given order: large graphs get
/// a smaller limit to keep the optimal tables affordable.
pub fn default_subset_size_limit(order: usize) -> usize {
    if order <= 1500 {
        25
    } else {
        20
    }
}

/// An elapsed duration broken down for display.
#[derive(Debug, Clone, Copy)]
pub struct ElapseTime {
    pub duration: Duration,
    pub min: u64,
    pub sec: u64,
    pub ms: u32,
}

impl ElapseTime {
    pub fn new(duration: Duration) -> ElapseTime {
        let secs = duration.as_secs();
        ElapseTime {
            duration,
            min: secs / 60,
            sec: secs % 60,
            ms: duration.subsec_millis(),
        }
    }
}

impl fmt::Display for ElapseTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}m {}s {}ms", self.min, self.sec, self.ms)
    }
}

/// Wall-clock timer for one solver run: total elapsed time, a cooperative
/// time limit with a latched timeout flag, and named subroutine timers used
/// to report where the time went.
///
/// The solver polls [`Clock::check_for_timeout`] at a fixed branch-count
/// granularity; once the flag latches, [`Clock::is_time_up`] stays true and
/// the search unwinds, leaving the best solution found so far.
pub struct Clock {
    start: Instant,
    end: Option<Instant>,
    limit: Duration,
    time_up: bool,
    subroutines: HashMap<String, SubroutineTimer>,
}

struct SubroutineTimer {
    total: Duration,
    entered: Option<Instant>,
}

impl Clock {
    /// Creates a started clock with a time limit in seconds.
    pub fn new(limit_secs: u64) -> Clock {
        Clock {
            start: Instant::now(),
            end: None,
            limit: Duration::from_secs(limit_secs),
            time_up: false,
            subroutines: HashMap::new(),
        }
    }

    /// Elapsed time since creation, frozen once [`Clock::stop_timer`] is
    /// called.
    pub fn elapsed(&self) -> Duration {
        match self.end {
            Some(end) => end - self.start,
            None => self.start.elapsed(),
        }
    }

    pub fn get_time(&self) -> ElapseTime {
        ElapseTime::new(self.elapsed())
    }

    /// Freezes the clock. Subsequent `elapsed` calls return the same value.
    pub fn stop_timer(&mut self) {
        if self.end.is_none() {
            self.end = Some(Instant::now());
        }
    }

    /// Compares the elapsed time against the limit and latches the timeout
    /// flag. Kept separate from [`Clock::is_time_up`] so the hot search loop
    /// can poll the flag cheaply and only pay for a clock read every few
    /// hundred thousand branches.
    pub fn check_for_timeout(&mut self) {
        if !self.time_up && self.elapsed() >= self.limit {
            self.time_up = true;
        }
    }

    /// Whether a previous [`Clock::check_for_timeout`] hit the limit.
    pub fn is_time_up(&self) -> bool {
        self.time_up
    }

    /// Starts (or resumes) the named subroutine timer.
    pub fn enter_subroutine(&mut self, name: &str) {
        let timer = self
            .subroutines
            .entry(name.to_string())
            .or_insert(SubroutineTimer {
                total: Duration::ZERO,
                entered: None,
            });
        timer.entered = Some(Instant::now());
    }

    /// Stops the named subroutine timer and accumulates its duration.
    pub fn exit_subroutine(&mut self, name: &str) -> Result<(), ClockError> {
        let timer = self.subroutines.get_mut(name).ok_or_else(|| {
            ClockError::new(&format!("Exiting subroutine {:?} that was never entered", name))
        })?;
        let entered = timer.entered.take().ok_or_else(|| {
            ClockError::new(&format!("Exiting subroutine {:?} that is not running", name))
        })?;
        timer.total += entered.elapsed();
        Ok(())
    }

    /// Total time spent in the named subroutine, zero if it never ran.
    pub fn get_subroutine_duration(&self, name: &str) -> Duration {
        match self.subroutines.get(name) {
            Some(timer) => timer.total,
            None => Duration::ZERO,
        }
    }
}

/// Result of one MWC computation, ready for display: the clique in 1-based
/// vertex ids, the time taken, whether the time limit was hit and whether
/// the weight matches the known value registered for this graph id.
pub struct MWCResult {
    pub graph_id: String,
    pub weight: i64,
    pub set: Vec<u64>,
    pub time: ElapseTime,
    pub is_time_limit: bool,
    pub is_optimal: Option<bool>,
}

impl MWCResult {
    pub fn new(
        graph_id: String,
        clique: Clique,
        time: ElapseTime,
        is_time_limit: bool,
    ) -> Result<MWCResult, YamlError> {
        // no graph_data.yml around (e.g. running outside the repository)
        // simply means there is no known value to compare against
        let is_optimal = match is_optimal_value(&graph_id, clique.weight, None) {
            Ok(known) => known,
            Err(YamlError::IoError(..)) => None,
            Err(e) => return Err(e),
        };
        let mut set = clique.set;
        set.sort_unstable();
        Ok(MWCResult {
            graph_id,
            weight: clique.weight,
            set,
            time,
            is_time_limit,
            is_optimal,
        })
    }
}

impl fmt::Display for MWCResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Maximum weight clique for the {:?} graph = {}",
            self.graph_id, self.weight
        )?;
        let one_based: Vec<u64> = self.set.iter().map(|v| v + 1).collect();
        writeln!(f, "Clique ({} vertices) : {:?}", self.set.len(), one_based)?;
        writeln!(f, "Time taken : {}", self.time)?;
        writeln!(f, "Time limit reached : {}", self.is_time_limit)?;
        match self.is_optimal {
            Some(true) => write!(f, "Known optimal value : matched"),
            Some(false) => write!(f, "Known optimal value : NOT MATCHED"),
            None => write!(f, "Known optimal value : none registered"),
        }
    }
}

/// Loads nothing, solves everything: runs the branch-and-bound on an already
/// loaded graph, checks the returned set really is a clique, and wraps the
/// outcome in an [`MWCResult`].
///
/// `limit` of `None` picks [`default_subset_size_limit`].
pub fn run_algorithm(
    graph_id: &str,
    graph: &WeightedGraph,
    limit: Option<usize>,
    clock: &mut Clock,
) -> Result<MWCResult, YamlError> {
    let limit = limit.unwrap_or_else(|| default_subset_size_limit(graph.order()));
    let clique = branch_and_bound::solve(graph, limit, clock);
    clock.stop_timer();

    assert!(
        is_clique(graph, &clique.set),
        "the solver returned a vertex set that is not a clique"
    );
    MWCResult::new(
        graph_id.to_string(),
        clique,
        clock.get_time(),
        clock.is_time_up(),
    )
}

/// Naïve algorithm that searches for the maximum weight clique of a graph.
///
/// Lists every subset of the vertices, keeps the cliques and returns the
/// heaviest. Only usable on small graphs; the solvers' tests use it as the
/// ground truth.
///
/// # Example
/// ```rust
/// use clique::graph_utils::WeightedGraph;
/// use clique::naive_search;
///
/// let mut graph = WeightedGraph::new(4);
/// graph.add_edge(0, 1);
/// graph.add_edge(1, 2);
/// graph.add_edge(2, 0);
/// graph.add_edge(2, 3);
/// graph.set_weight(3, 5);
///
/// let best = naive_search(&graph);
/// assert_eq!(best.weight, 6);
/// assert_eq!(best.set, vec![2, 3]);
/// ```
pub fn naive_search(graph: &WeightedGraph) -> Clique {
    let n = graph.order();
    let mut best = Clique {
        set: Vec::new(),
        weight: 0,
    };
    for mask in 0..1u64 << n {
        let subset: Vec<u64> = (0..n as u64).filter(|v| mask >> v & 1 == 1).collect();
        if !is_clique(graph, &subset) {
            continue;
        }
        let weight = subset.iter().map(|&v| graph.weight(v)).sum();
        if weight > best.weight {
            best = Clique {
                set: subset,
                weight,
            };
        }
    }
    best
}
