//! Dense graph representation used by the solver. The search needs constant
//! time adjacency tests, vertex-induced subgraphs and a bit-vector encoding
//! of the strict lower triangle of the adjacency matrix, none of which the
//! petgraph input representation provides directly.

use fixedbitset::FixedBitSet;

use crate::graph_utils::WeightedGraph;

/// Immutable adjacency-matrix graph with a weight vector.
#[derive(Debug, Clone)]
pub struct DenseGraph {
    n: usize,
    m: usize,
    rows: Vec<FixedBitSet>,
    weights: Vec<i64>,
}

impl DenseGraph {
    /// Materialises the input graph as a dense adjacency matrix.
    pub fn from_weighted_graph(graph: &WeightedGraph) -> Self {
        let n = graph.order();
        let mut rows = vec![FixedBitSet::with_capacity(n); n];
        for (u, v, _) in graph.graph.all_edges() {
            rows[u as usize].insert(v as usize);
            rows[v as usize].insert(u as usize);
        }
        DenseGraph {
            n,
            m: graph.size(),
            rows,
            weights: graph.weights.clone(),
        }
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.n
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.m
    }

    pub fn weight(&self, v: usize) -> i64 {
        self.weights[v]
    }

    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    pub fn is_adjacent(&self, u: usize, v: usize) -> bool {
        self.rows[u].contains(v)
    }

    pub fn degree(&self, v: usize) -> usize {
        self.rows[v].count_ones(..)
    }

    /// Produces the subgraph induced by `seq`: vertex `i` of the result is
    /// `seq[i]`, adjacency and weights are looked up in `self`.
    ///
    /// `seq` may repeat a vertex; repeated slots are never adjacent to each
    /// other (the matrix has no diagonal), which is what the solver relies on
    /// when it pads a partitioned sequence with vertex 0.
    pub fn induced_subgraph(&self, seq: &[usize]) -> DenseGraph {
        let n = seq.len();
        let mut rows = vec![FixedBitSet::with_capacity(n); n];
        let mut m = 0;
        for (i, &u) in seq.iter().enumerate() {
            for (j, &v) in seq[..i].iter().enumerate() {
                if self.rows[u].contains(v) {
                    rows[i].insert(j);
                    rows[j].insert(i);
                    m += 1;
                }
            }
        }
        DenseGraph {
            n,
            m,
            rows,
            weights: seq.iter().map(|&v| self.weights[v]).collect(),
        }
    }

    /// Bit-vector encoding of the strict lower triangle of the adjacency
    /// matrix. Row `v` has `(v - 1) / word_bits + 1` words (row 0 is a single
    /// zero word); bit `j % word_bits` of word `j / word_bits` is set iff
    /// `v` and `j` are adjacent, for `j < v` only.
    pub fn bit_adjacency(&self, word_bits: usize) -> Vec<Vec<u64>> {
        let mut bit_adj = Vec::with_capacity(self.n);
        for v in 0..self.n {
            let words = if v == 0 { 1 } else { (v - 1) / word_bits + 1 };
            let mut row = vec![0u64; words];
            for j in self.rows[v].ones() {
                if j < v {
                    row[j / word_bits] |= 1 << (j % word_bits);
                }
            }
            bit_adj.push(row);
        }
        bit_adj
    }
}

#[cfg(test)]
mod dense_graph_tests {
    use super::*;

    fn triangle_plus_pendant() -> DenseGraph {
        let mut graph = WeightedGraph::new(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);
        graph.add_edge(2, 3);
        graph.set_weight(3, 9);
        DenseGraph::from_weighted_graph(&graph)
    }

    #[test]
    fn test_from_weighted_graph() {
        let g = triangle_plus_pendant();
        assert_eq!(g.order(), 4);
        assert_eq!(g.size(), 4);
        assert!(g.is_adjacent(0, 1));
        assert!(g.is_adjacent(1, 0));
        assert!(!g.is_adjacent(0, 3));
        assert_eq!(g.degree(2), 3);
        assert_eq!(g.weight(3), 9);
    }

    #[test]
    fn test_induced_subgraph() {
        let g = triangle_plus_pendant();
        let sub = g.induced_subgraph(&[2, 3, 0]);
        assert_eq!(sub.order(), 3);
        assert_eq!(sub.size(), 2);
        assert!(sub.is_adjacent(0, 1));
        assert!(sub.is_adjacent(0, 2));
        assert!(!sub.is_adjacent(1, 2));
        assert_eq!(sub.weight(1), 9);
    }

    #[test]
    fn test_induced_subgraph_repeated_slots_are_independent() {
        let g = triangle_plus_pendant();
        let sub = g.induced_subgraph(&[1, 0, 0]);
        assert!(sub.is_adjacent(0, 1));
        assert!(sub.is_adjacent(0, 2));
        assert!(!sub.is_adjacent(1, 2));
    }

    #[test]
    fn test_bit_adjacency_row_shape() {
        let g = triangle_plus_pendant();
        let rows = g.bit_adjacency(2);
        assert_eq!(rows[0], vec![0]);
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[2].len(), 1);
        assert_eq!(rows[3].len(), 2);
        // row 1: neighbour 0
        assert_eq!(rows[1][0], 0b01);
        // row 2: neighbours 0 and 1
        assert_eq!(rows[2][0], 0b11);
        // row 3: neighbour 2 lives in the second word
        assert_eq!(rows[3], vec![0b00, 0b01]);
    }
}
