//! Optimal tables: for every part of the partition, the exact maximum weight
//! clique weight of every vertex subset of that part. Table lookups are what
//! give the branch-and-bound its upper bounds.

use crate::dense_graph::DenseGraph;

/// Refuse to allocate more than this much table memory (8 GiB).
const MAX_TABLE_BYTES: u64 = 8 << 30;

/// Builds one table per part. Part `i` of size `s` covers the vertices
/// `i * limit .. i * limit + s` of the reindexed graph; its table has `2^s`
/// entries and `table[mask]` is the exact MWC weight of the subgraph induced
/// by the part vertices selected by `mask`.
///
/// # Panics
/// Panics when the tables together would exceed the memory cap, instead of
/// letting a partition with oversized parts allocate tens of gigabytes.
pub fn build_tables(
    reindexed: &DenseGraph,
    part_sizes: &[usize],
    limit: usize,
) -> Vec<Vec<i64>> {
    let entries: u64 = part_sizes.iter().map(|&s| 1u64 << s).sum();
    let bytes = entries * std::mem::size_of::<i64>() as u64;
    assert!(
        bytes <= MAX_TABLE_BYTES,
        "optimal tables would take {} entries ({} bytes), more than the {} byte cap",
        entries,
        bytes,
        MAX_TABLE_BYTES
    );

    part_sizes
        .iter()
        .enumerate()
        .map(|(i, &size)| {
            let members: Vec<usize> = (i * limit..i * limit + size).collect();
            subset_table(&reindexed.induced_subgraph(&members))
        })
        .collect()
}

/// Dynamic programming over all subsets of one part.
///
/// Vertices are processed in index order. When the highest vertex `j` of a
/// mask is reached, the mask either drops `j` (answer already computed in the
/// lower half of the table) or keeps it, in which case the remaining choices
/// are confined to `j`'s earlier neighbours and that smaller mask's answer is
/// already in the table.
fn subset_table(graph: &DenseGraph) -> Vec<i64> {
    let n = graph.order();
    let mut table = vec![0i64; 1usize << n];
    if n == 0 {
        return table;
    }

    // one word is enough here: a part never has more vertices than the
    // subset size limit
    let bit_adj = graph.bit_adjacency(n);
    for j in 0..n {
        let adjj = bit_adj[j][0];
        let weight = graph.weight(j);
        let start = 1usize << j;
        for mask in start..start << 1 {
            let unused = table[mask - start];
            let used = table[(mask as u64 & adjj) as usize] + weight;
            table[mask] = unused.max(used);
        }
    }
    table
}

#[cfg(test)]
mod optimal_table_tests {
    use super::*;
    use crate::graph_utils::WeightedGraph;

    /// exhaustive MWC of the subgraph selected by `mask`, for cross-checking
    fn brute_force(graph: &DenseGraph, mask: u64) -> i64 {
        let n = graph.order();
        let mut best = 0;
        for candidate in 0..1u64 << n {
            if candidate & !mask != 0 {
                continue;
            }
            let vertices: Vec<usize> = (0..n).filter(|&v| candidate >> v & 1 == 1).collect();
            let clique = vertices
                .iter()
                .enumerate()
                .all(|(i, &u)| vertices[i + 1..].iter().all(|&v| graph.is_adjacent(u, v)));
            if clique {
                best = best.max(vertices.iter().map(|&v| graph.weight(v)).sum());
            }
        }
        best
    }

    fn paw_graph() -> DenseGraph {
        // triangle 0-1-2 with pendant 3 on vertex 2
        let mut graph = WeightedGraph::new(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);
        graph.add_edge(2, 3);
        graph.set_weight(0, 2);
        graph.set_weight(1, 3);
        graph.set_weight(2, 5);
        graph.set_weight(3, 7);
        DenseGraph::from_weighted_graph(&graph)
    }

    #[test]
    fn test_subset_table_matches_brute_force() {
        let graph = paw_graph();
        let table = subset_table(&graph);
        assert_eq!(table.len(), 16);
        assert_eq!(table[0], 0);
        for mask in 0..16u64 {
            assert_eq!(table[mask as usize], brute_force(&graph, mask), "mask {:#b}", mask);
        }
    }

    #[test]
    fn test_subset_table_is_monotone() {
        let graph = paw_graph();
        let table = subset_table(&graph);
        for mask in 0..16usize {
            for other in 0..16usize {
                assert!(table[mask | other] >= table[mask]);
            }
        }
    }

    #[test]
    fn test_empty_part() {
        let graph = DenseGraph::from_weighted_graph(&WeightedGraph::new(0));
        assert_eq!(subset_table(&graph), vec![0]);
    }

    #[test]
    fn test_build_tables_per_part() {
        // two parts of size 2 over a reindexed square 0-1-2-3-0, limit 2
        let mut graph = WeightedGraph::new(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(3, 0);
        let dense = DenseGraph::from_weighted_graph(&graph);
        let tables = build_tables(&dense, &[2, 2], 2);
        assert_eq!(tables.len(), 2);
        // part 0 holds {0, 1}, an edge: both endpoints together form a clique
        assert_eq!(tables[0], vec![0, 1, 1, 2]);
        // part 1 holds {2, 3}, also an edge
        assert_eq!(tables[1], vec![0, 1, 1, 2]);
    }
}
