//! Exact maximum weight clique search: precomputation (colouring, reindexing,
//! bit adjacency, optimal tables) followed by a branch-and-bound whose upper
//! bounds are sums of optimal table lookups and whose secondary bound is a
//! per-vertex cache filled by a rooted sweep over the vertex sequence.

use std::mem;

use crate::coloring::{partition_unweighted, partition_weighted, ColorPartition};
use crate::dense_graph::DenseGraph;
use crate::graph_utils::{complement, WeightedGraph};
use crate::optimal_table::build_tables;
use crate::Clock;

/// Largest supported subset size limit. A part mask must stay indexable and
/// one msb table of `2^limit` entries must stay allocatable.
pub const MAX_SUBSET_SIZE_LIMIT: usize = 30;

/// Cache value for vertices the rooted sweep has not completed; large enough
/// to never prune, small enough to never overflow when added to a weight.
const UNSWEPT: i64 = i64::MAX / 2;

/// Number of recursive calls between two deadline checks.
const TIMEOUT_CHECK_INTERVAL: u64 = 100_000;

/// A clique of the input graph: vertex ids and total weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clique {
    pub set: Vec<u64>,
    pub weight: i64,
}

impl Clique {
    pub fn size(&self) -> usize {
        self.set.len()
    }
}

/// Computes the exact maximum weight clique of `graph`.
///
/// `limit` is the subset size limit: the partition parts, the per-part masks
/// and the optimal table indices all stay below `2^limit`. Larger limits give
/// tighter bounds and bigger tables; [`crate::default_subset_size_limit`]
/// picks a reasonable value from the graph order.
///
/// The search is exact unless the clock's time limit expires, in which case
/// the best clique found so far is returned and the clock's timeout flag is
/// left set. Either way the returned vertex set is a clique of `graph`.
///
/// # Panics
/// Panics when `limit` is outside `1..=30` or when the optimal tables would
/// exceed the table memory cap.
pub fn solve(graph: &WeightedGraph, limit: usize, clock: &mut Clock) -> Clique {
    assert!(
        (1..=MAX_SUBSET_SIZE_LIMIT).contains(&limit),
        "subset size limit must be in 1..={}, got {}",
        MAX_SUBSET_SIZE_LIMIT,
        limit
    );

    let n = graph.order();
    let dense = DenseGraph::from_weighted_graph(graph);
    let weighted = match dense.weights().first() {
        Some(&first) => dense.weights().iter().any(|&w| w != first),
        None => false,
    };

    clock.enter_subroutine("precomputation");
    let partition = if weighted {
        partition_weighted(&dense, limit)
    } else {
        partition_unweighted(&dense, limit)
    };
    let slots = slotted_sequence(&partition, limit);
    let reindexed = dense.induced_subgraph(&slots);
    let bit_adj = reindexed.bit_adjacency(limit);
    let tables = build_tables(&reindexed, &partition.part_sizes, limit);
    let msb_table = build_msb_table(limit);
    clock
        .exit_subroutine("precomputation")
        .expect("precomputation timer was entered above");
    println!(
        "{} subsets created from {} vertices",
        partition.part_count(),
        n
    );

    clock.enter_subroutine("branch_and_bound");
    let mut solver = Solver {
        limit,
        part_sizes: &partition.part_sizes,
        bit_adj: &bit_adj,
        weights: reindexed.weights(),
        tables: &tables,
        msb_table: &msb_table,
        c: vec![UNSWEPT; partition.part_count() * limit],
        record: Vec::new(),
        record_weight: 0,
        current: Vec::with_capacity(n),
        current_weight: 0,
        scratch: Vec::new(),
        branch_count: 0,
        clock,
    };
    solver.search(n, weighted);
    let record = mem::take(&mut solver.record);
    let record_weight = solver.record_weight;
    let branch_count = solver.branch_count;
    clock
        .exit_subroutine("branch_and_bound")
        .expect("branch_and_bound timer was entered above");

    println!("Branch-and-bound iterations = {} (recursive calls)", branch_count);

    Clique {
        set: record.iter().map(|&v| slots[v] as u64).collect(),
        weight: record_weight,
    }
}

/// Computes the exact minimum weight vertex cover of `graph` as the
/// complement of the maximum weight clique of the complement graph.
///
/// Returns the cover weight and the cover vertex set. An independent set of
/// the complement is a clique, and the vertices outside a maximum weight
/// independent set form a minimum weight cover.
pub fn solve_mwvc(graph: &WeightedGraph, limit: usize, clock: &mut Clock) -> (i64, Vec<u64>) {
    let clique = solve(&complement(graph), limit, clock);

    let mut in_clique = vec![false; graph.order()];
    for &v in &clique.set {
        in_clique[v as usize] = true;
    }
    let cover: Vec<u64> = (0..graph.order() as u64)
        .filter(|&v| !in_clique[v as usize])
        .collect();
    (graph.total_weight() - clique.weight, cover)
}

/// Lays the partitioned sequence out in `limit`-aligned slots: part `i`
/// occupies slots `i * limit ..`, and slots past a part's size fall back to
/// vertex 0. The padding slots never enter a candidate mask; repeating a
/// vertex only keeps the reindexed graph rectangular.
fn slotted_sequence(partition: &ColorPartition, limit: usize) -> Vec<usize> {
    let mut slots = vec![0usize; partition.part_count() * limit];
    let mut next = 0;
    for (i, &size) in partition.part_sizes.iter().enumerate() {
        for j in 0..size {
            slots[i * limit + j] = partition.sequence[next];
            next += 1;
        }
    }
    slots
}

/// Flat lookup of the most significant set bit of any `limit`-bit word.
/// Entry 0 is a -1 sentinel and is never indexed by the search.
fn build_msb_table(limit: usize) -> Vec<i32> {
    let mut table = vec![-1i32; 1 << limit];
    for i in 0..limit {
        for mask in 1usize << i..1usize << (i + 1) {
            table[mask] = i as i32;
        }
    }
    table
}

/// State of one branch-and-bound run. The precomputed structures are
/// borrowed immutably; the search owns the record, the current path, the
/// per-vertex cache and the candidate-set buffers.
struct Solver<'a> {
    limit: usize,
    part_sizes: &'a [usize],
    /// strict lower triangle of the reindexed graph, `limit`-bit words
    bit_adj: &'a [Vec<u64>],
    weights: &'a [i64],
    tables: &'a [Vec<i64>],
    msb_table: &'a [i32],
    /// c[v]: once the rooted sweep has completed vertex v, the maximum
    /// weight over all cliques containing v within the swept prefix
    c: Vec<i64>,
    record: Vec<usize>,
    record_weight: i64,
    current: Vec<usize>,
    current_weight: i64,
    /// per-depth candidate-set buffers, one `part_count`-word buffer per
    /// recursion level, reused across branches
    scratch: Vec<Vec<u64>>,
    branch_count: u64,
    clock: &'a mut Clock,
}

impl<'a> Solver<'a> {
    /// Outer loop. First the rooted sweep: vertices are enumerated in
    /// sequence order, and for each vertex v the search solves the problem
    /// "best clique containing v inside the prefix 0..=v", which both grows
    /// the record and fills c[v] for the inner pruning test. The weighted
    /// case stops the sweep after 80% of the vertices, where the cache pays
    /// less than it costs. Finally the full candidate set is expanded,
    /// which makes the record the exact optimum.
    fn search(&mut self, n: usize, weighted: bool) {
        let parts = self.part_sizes.len();
        let stop = if weighted { (n as f64 * 0.8) as usize } else { n };

        let mut set = vec![0u64; parts];
        self.ensure_scratch(2);
        let mut swept = 0;
        'sweep: for i in 0..parts {
            for j in 0..self.part_sizes[i] {
                if swept == stop {
                    break 'sweep;
                }
                swept += 1;
                set[i] |= 1 << j;
                let v = i * self.limit + j;
                let words = if v == 0 { 0 } else { (v - 1) / self.limit + 1 };

                let mut set2 = mem::take(&mut self.scratch[1]);
                let adjv: &[u64] = &self.bit_adj[v];
                let tables = self.tables;
                let mut upper = 0;
                for h in 0..words {
                    set2[h] = set[h] & adjv[h];
                    upper += tables[h][set2[h] as usize];
                }
                for word in set2[words..i + 1].iter_mut() {
                    *word = 0;
                }

                self.current.clear();
                self.current.push(v);
                self.current_weight = self.weights[v];
                if self.current_weight + upper > self.record_weight {
                    self.expand(&mut set2, i + 1, upper);
                }
                self.scratch[1] = set2;
                self.c[v] = self.record_weight;
            }
        }

        // final root over the complete candidate set
        for (i, &size) in self.part_sizes.iter().enumerate() {
            for j in 0..size {
                set[i] |= 1 << j;
            }
        }
        let mut upper = 0;
        for i in 0..parts {
            upper += self.tables[i][set[i] as usize];
        }
        self.current.clear();
        self.current_weight = 0;
        if upper > self.record_weight {
            self.expand(&mut set, parts, upper);
        }
    }

    /// Branching procedure over the candidate set `set` (one mask per part,
    /// parts `0..set_size`). `upper` is the table upper bound of `set` and
    /// is maintained incrementally as candidates are excluded.
    fn expand(&mut self, set: &mut [u64], set_size: usize, mut upper: i64) {
        self.branch_count += 1;
        if self.branch_count % TIMEOUT_CHECK_INTERVAL == 0 {
            self.clock.check_for_timeout();
        }
        if self.clock.is_time_up() {
            return;
        }

        let limit = self.limit;
        let bit_adj = self.bit_adj;
        let tables = self.tables;
        let weights = self.weights;
        let msb_table = self.msb_table;

        let mut i = set_size;
        while i > 0 {
            i -= 1;
            while set[i] != 0 {
                if self.current_weight + upper <= self.record_weight {
                    return;
                }
                let msb = msb_table[set[i] as usize] as usize;
                let v = i * limit + msb;
                if self.current_weight + self.c[v] <= self.record_weight {
                    return;
                }

                // include v: candidates shrink to v's earlier neighbours
                self.current.push(v);
                self.current_weight += weights[v];
                let set2_size = if v == 0 { 0 } else { (v - 1) / limit + 1 };
                let depth = self.current.len();
                self.ensure_scratch(depth + 1);
                let mut set2 = mem::take(&mut self.scratch[depth]);
                let adjv: &[u64] = &bit_adj[v];
                let mut new_upper = 0;
                for h in 0..set2_size {
                    set2[h] = set[h] & adjv[h];
                    new_upper += tables[h][set2[h] as usize];
                }
                if self.current_weight + new_upper > self.record_weight {
                    self.expand(&mut set2, set2_size, new_upper);
                }
                self.scratch[depth] = set2;
                self.current.pop();
                self.current_weight -= weights[v];
                if self.clock.is_time_up() {
                    // unwind every frame without touching the record
                    return;
                }

                // exclude v, updating the table bound incrementally
                upper -= tables[i][set[i] as usize];
                set[i] &= !(1 << msb);
                upper += tables[i][set[i] as usize];
            }
        }

        if self.current_weight > self.record_weight {
            self.record.clear();
            self.record.extend_from_slice(&self.current);
            self.record_weight = self.current_weight;
        }
    }

    fn ensure_scratch(&mut self, len: usize) {
        let parts = self.part_sizes.len();
        while self.scratch.len() < len {
            self.scratch.push(vec![0u64; parts]);
        }
    }
}

#[cfg(test)]
mod branch_and_bound_tests {
    use super::*;
    use crate::graph_utils::{is_clique, is_vertex_cover, load_clq_file};
    use crate::naive_search;

    fn solve_fresh(graph: &WeightedGraph, limit: usize) -> Clique {
        let mut clock = Clock::new(3600);
        solve(graph, limit, &mut clock)
    }

    fn sorted(mut set: Vec<u64>) -> Vec<u64> {
        set.sort_unstable();
        set
    }

    fn complete_graph(n: usize) -> WeightedGraph {
        let mut graph = WeightedGraph::new(n);
        for u in 0..n as u64 {
            for v in u + 1..n as u64 {
                graph.add_edge(u, v);
            }
        }
        graph
    }

    /// deterministic pseudo-random graph for cross-checking
    fn scrambled_graph(n: usize, edge_mod: u64, max_weight: i64) -> WeightedGraph {
        let mut graph = WeightedGraph::new(n);
        let mut state = 0x2545F4914F6CDD1Du64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        for u in 0..n as u64 {
            for v in u + 1..n as u64 {
                if next() % edge_mod == 0 {
                    graph.add_edge(u, v);
                }
            }
        }
        for v in 0..n as u64 {
            graph.set_weight(v, (next() % max_weight as u64) as i64 + 1);
        }
        graph
    }

    #[test]
    fn test_triangle_unweighted() {
        let res = solve_fresh(&complete_graph(3), 3);
        assert_eq!(res.weight, 3);
        assert_eq!(sorted(res.set), vec![0, 1, 2]);
    }

    #[test]
    fn test_path_unweighted() {
        let mut graph = WeightedGraph::new(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        let res = solve_fresh(&graph, 3);
        assert_eq!(res.weight, 2);
        assert_eq!(res.size(), 2);
        assert!(is_clique(&graph, &res.set));
    }

    #[test]
    fn test_weighted_k4_minus_edge() {
        let mut graph = complete_graph(4);
        let _ = graph.graph.remove_edge(0, 1);
        graph.weights = vec![10, 10, 1, 1];
        let res = solve_fresh(&graph, 3);
        assert_eq!(res.weight, 12);
        let set = sorted(res.set);
        assert!(set == vec![0, 2, 3] || set == vec![1, 2, 3]);
    }

    #[test]
    fn test_isolated_vertices() {
        let mut graph = WeightedGraph::new(5);
        graph.weights = vec![3, 1, 4, 1, 5];
        let res = solve_fresh(&graph, 3);
        assert_eq!(res.weight, 5);
        assert_eq!(res.set, vec![4]);
    }

    #[test]
    fn test_complete_graph_weighted() {
        let mut graph = complete_graph(5);
        graph.weights = vec![1, 2, 3, 4, 5];
        let res = solve_fresh(&graph, 4);
        assert_eq!(res.weight, 15);
        assert_eq!(sorted(res.set), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_graph() {
        let res = solve_fresh(&WeightedGraph::new(0), 3);
        assert_eq!(res.weight, 0);
        assert!(res.set.is_empty());
    }

    #[test]
    fn test_single_vertex() {
        let mut graph = WeightedGraph::new(1);
        graph.set_weight(0, 42);
        let res = solve_fresh(&graph, 5);
        assert_eq!(res.weight, 42);
        assert_eq!(res.set, vec![0]);
    }

    #[test]
    fn test_matches_naive_search_unweighted() {
        for edge_mod in [2, 3, 5] {
            let graph = scrambled_graph(12, edge_mod, 1);
            let expected = naive_search(&graph);
            for limit in [3, 5, 12] {
                let res = solve_fresh(&graph, limit);
                assert_eq!(res.weight, expected.weight, "edge_mod {}", edge_mod);
                assert!(is_clique(&graph, &res.set));
            }
        }
    }

    #[test]
    fn test_matches_naive_search_weighted() {
        for edge_mod in [2, 3, 4] {
            let graph = scrambled_graph(13, edge_mod, 20);
            let expected = naive_search(&graph);
            for limit in [4, 7, 13] {
                let res = solve_fresh(&graph, limit);
                assert_eq!(res.weight, expected.weight, "edge_mod {}", edge_mod);
                assert!(is_clique(&graph, &res.set));
                assert_eq!(
                    res.set.iter().map(|&v| graph.weight(v)).sum::<i64>(),
                    res.weight
                );
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let graph = scrambled_graph(14, 3, 9);
        let first = solve_fresh(&graph, 6);
        let second = solve_fresh(&graph, 6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixture_instances() {
        let graph = load_clq_file("src/resources/graphs/test.clq").unwrap();
        assert_eq!(solve_fresh(&graph, 3).weight, 3);

        let graph = load_clq_file("src/resources/graphs/test_weighted.clq").unwrap();
        assert_eq!(solve_fresh(&graph, 3).weight, 12);
    }

    #[test]
    fn test_mwvc_on_square() {
        let mut graph = WeightedGraph::new(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(3, 0);
        let mut clock = Clock::new(3600);
        let (weight, cover) = solve_mwvc(&graph, 3, &mut clock);
        assert_eq!(weight, 2);
        let cover = sorted(cover);
        assert!(cover == vec![0, 2] || cover == vec![1, 3]);
        assert!(is_vertex_cover(&graph, &cover));
    }

    #[test]
    fn test_mwvc_duality_weighted() {
        let graph = scrambled_graph(11, 2, 12);
        let mut clock = Clock::new(3600);
        let (weight, cover) = solve_mwvc(&graph, 4, &mut clock);
        assert!(is_vertex_cover(&graph, &cover));
        let compl = complement(&graph);
        let mwc = naive_search(&compl);
        assert_eq!(weight, graph.total_weight() - mwc.weight);
    }

    #[test]
    fn test_expired_clock_returns_best_so_far() {
        let graph = complete_graph(6);
        let mut clock = Clock::new(0);
        clock.check_for_timeout();
        assert!(clock.is_time_up());
        let res = solve(&graph, 3, &mut clock);
        // nothing was explored, the empty clique is still a valid answer
        assert_eq!(res.weight, 0);
        assert!(is_clique(&graph, &res.set));
    }

    #[test]
    #[should_panic(expected = "subset size limit")]
    fn test_limit_zero_is_rejected() {
        solve_fresh(&complete_graph(2), 0);
    }

    #[test]
    fn test_msb_table() {
        let table = build_msb_table(5);
        assert_eq!(table.len(), 32);
        assert_eq!(table[0], -1);
        assert_eq!(table[1], 0);
        assert_eq!(table[2], 1);
        assert_eq!(table[3], 1);
        assert_eq!(table[16], 4);
        assert_eq!(table[31], 4);
    }

    #[test]
    fn test_slotted_sequence_pads_with_vertex_zero() {
        let partition = ColorPartition {
            sequence: vec![4, 2, 3, 1, 0],
            part_sizes: vec![3, 2],
        };
        assert_eq!(slotted_sequence(&partition, 4), vec![4, 2, 3, 0, 1, 0, 0, 0]);
    }
}
