//! Greedy colouring of the input graph. The colouring produces the vertex
//! sequence and the colour-aligned partition that the optimal tables and the
//! branch-and-bound search are built on.

use crate::dense_graph::DenseGraph;

/// A reordering of the vertices together with a partition into contiguous
/// parts. Part `i` covers `sequence[offset_i .. offset_i + part_sizes[i]]`
/// where `offset_i` is the sum of the earlier part sizes.
///
/// Every part is a union of whole colour classes and never exceeds the
/// subset size limit the partition was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPartition {
    pub sequence: Vec<usize>,
    pub part_sizes: Vec<usize>,
}

impl ColorPartition {
    pub fn part_count(&self) -> usize {
        self.part_sizes.len()
    }
}

/// Builds the sequence and partition for a weighted graph.
///
/// Vertices are sorted by weight ascending (ties: degree descending) and
/// coloured greedily, heaviest first. Dense graphs get full-size colour
/// classes; on sparser graphs the class size is capped so that a part mixes
/// more, smaller colours, which tightens the per-part tables.
pub fn partition_weighted(graph: &DenseGraph, limit: usize) -> ColorPartition {
    let n = graph.order();
    if n == 0 {
        return ColorPartition {
            sequence: Vec::new(),
            part_sizes: Vec::new(),
        };
    }
    let degrees: Vec<usize> = (0..n).map(|v| graph.degree(v)).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        graph
            .weight(a)
            .cmp(&graph.weight(b))
            .then(degrees[b].cmp(&degrees[a]))
    });

    let (sequence, color_sizes) = greedy_colors(graph, color_size_cap(graph, limit), &order);
    let part_sizes = pack_colors(&color_sizes, limit);
    ColorPartition {
        sequence,
        part_sizes,
    }
}

/// Builds the sequence and partition for an unweighted graph.
///
/// Vertices are sorted by degree ascending and coloured with the full colour
/// size cap. The finished sequence and part sizes are then reversed, which
/// moves the highest-degree vertices to the front of the search order.
pub fn partition_unweighted(graph: &DenseGraph, limit: usize) -> ColorPartition {
    let n = graph.order();
    if n == 0 {
        return ColorPartition {
            sequence: Vec::new(),
            part_sizes: Vec::new(),
        };
    }
    let degrees: Vec<usize> = (0..n).map(|v| graph.degree(v)).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&v| degrees[v]);

    let (mut sequence, color_sizes) = greedy_colors(graph, limit, &order);
    let mut part_sizes = pack_colors(&color_sizes, limit);
    sequence.reverse();
    part_sizes.reverse();
    ColorPartition {
        sequence,
        part_sizes,
    }
}

/// Colour class size cap for the weighted case, derived from the edge
/// density. The cap never exceeds `limit`.
fn color_size_cap(graph: &DenseGraph, limit: usize) -> usize {
    let n = graph.order();
    if n < 2 {
        return limit;
    }
    let density = graph.size() as f64 / ((n * (n - 1) / 2) as f64);
    let cap = if density > 0.5 {
        limit
    } else if density >= 0.4 {
        8
    } else if density >= 0.3 {
        12
    } else if density >= 0.2 {
        20
    } else {
        limit
    };
    cap.min(limit)
}

/// Iterative greedy colouring over the sorted vertex order.
///
/// Each round carves one colour class out of the uncoloured vertices,
/// walking the order from its last (highest-key) entry downwards and taking
/// every vertex that is non-adjacent to the class built so far, until the
/// class reaches `color_cap`. The sequence is filled from the back, so the
/// first colour created occupies its tail and the last one its front.
///
/// Returns the sequence and the colour class sizes in creation order.
fn greedy_colors(
    graph: &DenseGraph,
    color_cap: usize,
    order: &[usize],
) -> (Vec<usize>, Vec<usize>) {
    let n = order.len();
    let mut sequence = vec![0usize; n];
    let mut uncolored = vec![true; n];
    let mut color_sizes = Vec::new();

    let mut k = n;
    while k > 0 {
        let mut i = k;
        let mut size = 0;
        for j in (0..n).rev() {
            if !uncolored[j] {
                continue;
            }
            let v = order[j];
            if sequence[i..k].iter().any(|&u| graph.is_adjacent(v, u)) {
                continue;
            }
            i -= 1;
            sequence[i] = v;
            uncolored[j] = false;
            size += 1;
            if size == color_cap {
                break;
            }
        }
        color_sizes.push(size);
        k = i;
    }
    (sequence, color_sizes)
}

/// Packs whole colour classes into parts of size at most `limit`, starting
/// from the last colour created (the front of the sequence), so that part 0
/// covers the front of the sequence.
fn pack_colors(color_sizes: &[usize], limit: usize) -> Vec<usize> {
    let mut part_sizes = vec![0usize];
    for &size in color_sizes.iter().rev() {
        if part_sizes.last().unwrap() + size > limit {
            part_sizes.push(size);
        } else {
            *part_sizes.last_mut().unwrap() += size;
        }
    }
    part_sizes
}
