//! Module containing the weighted graph type and the functions used to
//! manipulate it: DIMACS loading, complement, clique / cover predicates and
//! the YAML bookkeeping of known values and computation times.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};

use petgraph::prelude::UnGraphMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Sequence, Value};

use crate::errors::{InvalidClqFileFormat, YamlError};
use crate::ElapseTime;

/// A vertex-weighted undirected graph: a petgraph `UnGraphMap` for the
/// structure and a dense weight vector indexed by vertex id.
///
/// Vertex ids are 0-based and contiguous. Weights are positive; graphs loaded
/// from a file without `n` lines have every weight equal to 1.
///
/// # Example
/// ```rust
/// use clique::graph_utils::WeightedGraph;
///
/// let mut graph = WeightedGraph::new(3);
/// graph.add_edge(0, 1);
/// graph.set_weight(2, 5);
/// assert_eq!(graph.order(), 3);
/// assert_eq!(graph.size(), 1);
/// assert_eq!(graph.weight(2), 5);
/// assert_eq!(graph.total_weight(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    pub graph: UnGraphMap<u64, ()>,
    pub weights: Vec<i64>,
}

impl WeightedGraph {
    /// Creates a graph with `order` isolated vertices, all of weight 1.
    pub fn new(order: usize) -> Self {
        let mut graph = UnGraphMap::new();
        for i in 0..order as u64 {
            graph.add_node(i);
        }
        WeightedGraph {
            graph,
            weights: vec![1; order],
        }
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn add_edge(&mut self, u: u64, v: u64) {
        self.graph.add_edge(u, v, ());
    }

    pub fn set_weight(&mut self, v: u64, weight: i64) {
        self.weights[v as usize] = weight;
    }

    pub fn weight(&self, v: u64) -> i64 {
        self.weights[v as usize]
    }

    pub fn total_weight(&self) -> i64 {
        self.weights.iter().sum()
    }

    pub fn is_adjacent(&self, u: u64, v: u64) -> bool {
        self.graph.contains_edge(u, v)
    }
}

/// Check if a given vertex set is a clique of the graph: every pair of
/// vertices in the set must be adjacent.
///
/// # Example
/// ``` rust
/// use clique::graph_utils::{is_clique, WeightedGraph};
///
/// let mut graph = WeightedGraph::new(5);
/// graph.add_edge(0, 1);
/// graph.add_edge(0, 2);
/// graph.add_edge(1, 2);
///
/// assert!(is_clique(&graph, &[0, 1, 2]));
/// assert!(!is_clique(&graph, &[0, 1, 3]));
/// ```
pub fn is_clique(graph: &WeightedGraph, clique: &[u64]) -> bool {
    for (i, u) in clique.iter().enumerate() {
        for v in &clique[i + 1..] {
            if !graph.graph.contains_edge(*u, *v) {
                return false;
            }
        }
    }
    true
}

/// Check if a given vertex set is a vertex cover of the graph: every edge
/// must have at least one endpoint in the set.
///
/// # Example
/// ```rust
/// use clique::graph_utils::{is_vertex_cover, WeightedGraph};
///
/// let mut graph = WeightedGraph::new(3);
/// graph.add_edge(0, 1);
/// graph.add_edge(1, 2);
/// graph.add_edge(2, 0);
/// assert!(!is_vertex_cover(&graph, &[0]));
/// assert!(is_vertex_cover(&graph, &[0, 1]));
/// ```
pub fn is_vertex_cover(graph: &WeightedGraph, vertex_cover: &[u64]) -> bool {
    for (i, j, _) in graph.graph.all_edges() {
        if !vertex_cover.contains(&i) && !vertex_cover.contains(&j) {
            return false;
        }
    }
    true
}

/// Check if a given vertex set is an independent set of the graph: no two
/// vertices in the set may be adjacent.
///
/// # Example
/// ```rust
/// use clique::graph_utils::{is_independent_set, WeightedGraph};
///
/// let mut graph = WeightedGraph::new(5);
/// graph.add_edge(0, 1);
/// graph.add_edge(0, 2);
/// graph.add_edge(1, 2);
///
/// assert!(is_independent_set(&graph, &[3, 4]));
/// assert!(!is_independent_set(&graph, &[0, 1, 2]));
/// ```
pub fn is_independent_set(graph: &WeightedGraph, independent_set: &[u64]) -> bool {
    for (i, u) in independent_set.iter().enumerate() {
        for v in &independent_set[i + 1..] {
            if graph.graph.contains_edge(*u, *v) {
                return false;
            }
        }
    }
    true
}

/// Returns the complement of a given graph. Weights are copied unchanged;
/// the complement of a graph with m edges has n(n-1)/2 - m edges.
///
/// # Example
/// ```rust
/// use clique::graph_utils::{complement, WeightedGraph};
///
/// let mut g = WeightedGraph::new(4);
/// g.add_edge(0, 1);
/// g.add_edge(1, 2);
/// g.add_edge(2, 3);
///
/// let complement = complement(&g);
/// assert_eq!(complement.order(), 4);
/// assert_eq!(complement.size(), 3);
/// ```
pub fn complement(graph: &WeightedGraph) -> WeightedGraph {
    let mut complement = WeightedGraph::new(graph.order());
    complement.weights.copy_from_slice(&graph.weights);

    for a in graph.graph.nodes() {
        for b in graph.graph.nodes() {
            if a < b && !graph.graph.contains_edge(a, b) {
                complement.add_edge(a, b);
            }
        }
    }
    complement
}

/// Load a graph from a DIMACS .clq / .col file.
///
/// The supported line kinds are:
/// * `p <kind> <#vertex> <#edges>` : the number of vertices and edges
/// * `e <vertex1> <vertex2>` : an edge between two 1-based vertices
/// * `n <vertex> <weight>` : the weight of a 1-based vertex (default 1)
/// * `c`, `d`, `v`, `x` : ignored comment / metadata lines
///
/// Any other line kind is a fatal [`InvalidClqFileFormat`] error.
///
/// # Test file
/// ```text
/// c File: test.clq
/// p edge 5 6
/// e 1 2
/// e 1 3
/// e 1 4
/// e 3 4
/// e 5 1
/// e 5 2
/// ```
///
/// # Example
/// ```rust
/// use clique::graph_utils::load_clq_file;
///
/// let graph = load_clq_file("src/resources/graphs/test.clq").unwrap();
/// assert_eq!(graph.order(), 5);
/// assert!(graph.is_adjacent(0, 1));
/// assert!(graph.is_adjacent(2, 3));
/// assert!(graph.is_adjacent(4, 1));
/// assert_eq!(graph.weight(0), 1);
/// ```
pub fn load_clq_file(path: &str) -> Result<WeightedGraph, InvalidClqFileFormat> {
    let file = File::open(path).map_err(|e| {
        InvalidClqFileFormat::new(&format!("File {:?} not found \n {:?}", path, e))
    })?;
    let reader = BufReader::new(file);

    let mut g: Option<WeightedGraph> = None;
    let mut exp_edges = 0;

    for line in reader.lines() {
        let line = line?;
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.is_empty() {
            continue;
        }

        match values[0] {
            "c" | "d" | "v" | "x" => {
                continue;
            }
            "p" => {
                if values.len() < 4 {
                    return Err(InvalidClqFileFormat::new(&format!(
                        "Invalid problem line {:?}",
                        line
                    )));
                }
                let order = values[2].parse::<usize>()?;
                exp_edges = values[3].parse::<usize>()?;
                g = Some(WeightedGraph::new(order));
            }
            "e" => {
                let graph = g.as_mut().ok_or_else(|| {
                    InvalidClqFileFormat::new("Expecting graph order before edges")
                })?;
                if values.len() < 3 {
                    return Err(InvalidClqFileFormat::new(&format!(
                        "Invalid edge line {:?}",
                        line
                    )));
                }
                let i = values[1].parse::<u64>()?;
                let j = values[2].parse::<u64>()?;
                if i < 1 || j < 1 || i > graph.order() as u64 || j > graph.order() as u64 || i == j {
                    return Err(InvalidClqFileFormat::new(&format!(
                        "Invalid edge endpoints in line {:?}",
                        line
                    )));
                }
                graph.add_edge(i - 1, j - 1);
            }
            "n" => {
                let graph = g.as_mut().ok_or_else(|| {
                    InvalidClqFileFormat::new("Expecting graph order before weights")
                })?;
                if values.len() < 3 {
                    return Err(InvalidClqFileFormat::new(&format!(
                        "Invalid weight line {:?}",
                        line
                    )));
                }
                let v = values[1].parse::<usize>()?;
                let w = values[2].parse::<i64>()?;
                if v < 1 || v > graph.order() {
                    return Err(InvalidClqFileFormat::new(&format!(
                        "Weight for vertex {} out of range",
                        v
                    )));
                }
                graph.weights[v - 1] = w;
            }
            _ => {
                return Err(InvalidClqFileFormat::new(&format!(
                    "Invalid file format for line {:?}",
                    line
                )));
            }
        }
    }
    let graph = g.ok_or_else(|| InvalidClqFileFormat::new("Expecting graph order"))?;
    if graph.size() != exp_edges {
        return Err(InvalidClqFileFormat::new(&format!(
            "Expecting {} edges but read {} edges",
            exp_edges,
            graph.size()
        )));
    }
    Ok(graph)
}

/// Returns the string of a given graph in the DIMACS .clq format. Weights
/// different from 1 are written as `n` lines before the edges.
///
/// # Example
/// ```rust
/// use clique::graph_utils::{graph_to_string, WeightedGraph};
///
/// let mut graph = WeightedGraph::new(4);
/// graph.add_edge(0, 1);
/// graph.add_edge(1, 2);
/// graph.set_weight(3, 7);
///
/// let string = graph_to_string(&graph);
/// assert_eq!(string, "p edge 4 2\nn 4 7\ne 1 2\ne 2 3\n");
/// ```
pub fn graph_to_string(graph: &WeightedGraph) -> String {
    let mut string = String::new();
    string.push_str(&format!("p edge {} {}\n", graph.order(), graph.size()));
    for (v, &w) in graph.weights.iter().enumerate() {
        if w != 1 {
            string.push_str(&format!("n {} {}\n", v + 1, w));
        }
    }
    for (i, j, _) in graph.graph.all_edges() {
        string.push_str(&format!("e {} {}\n", i + 1, j + 1));
    }
    string
}

/// Structure used to store the information of a graph such as the known exact
/// value of its MWC.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphInfo {
    pub id: String,
    format: String,
    order: usize,
    size: usize,
    val: i64,
}

/// Structure used to store the information of a computation of the MWC for a
/// given graph.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct YamlTime {
    date: String,
    mwc_val: i64,
    time: String,
    is_time_limit: bool,
    algorithm: String,
    comment: String,
}

/// Add the graph id with its format in the yaml file located at
/// `src/resources/graph_data.yml`.
///
/// The default value for the MWC weight is 0, it has to be updated with
/// [`update_mwc_value`]. If the graph id is already in the file, it is not
/// added again.
pub fn add_graph_to_yaml(
    id: &str,
    format: &str,
    graph: &WeightedGraph,
    path: &str,
) -> Result<(), YamlError> {
    let file = File::open(path)?;
    let mut data: Vec<GraphInfo> = serde_yaml::from_reader(file)?;

    if data.iter().any(|x| x.id == id) {
        // Already registered
        return Ok(());
    }

    data.push(GraphInfo {
        id: id.to_string(),
        format: format.to_string(),
        order: graph.order(),
        size: graph.size(),
        val: 0,
    });

    let mut file = File::create(path)?;
    file.write_all(serde_yaml::to_string(&data)?.as_bytes())?;

    // Every registered graph also gets an (empty) history in the time file
    add_graph_to_time_file(id)
}

fn add_graph_to_time_file(id: &str) -> Result<(), YamlError> {
    let time_path = "src/resources/time_result.yml";
    let mut file = File::open(time_path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let time: Value = serde_yaml::from_str(&contents)?;
    let mut map = match time.as_mapping() {
        Some(map) => map.clone(),
        None => {
            return Err(YamlError::NotFound(
                format!("Could not parse {:?}", time_path),
                time_path.to_string(),
            ))
        }
    };

    map.insert(Value::String(id.to_string()), Value::Sequence(Vec::new()));

    let mut file = File::create(time_path)?;
    serde_yaml::to_writer(&mut file, &map)?;
    Ok(())
}

/// Update the known MWC weight for a given graph id.
///
/// # Parameters
/// - id : the id of the graph (ex: test.clq)
/// - mwc_val : the new known value of the maximum weight clique
/// - path : the path to the yaml file containing the graph info
///   (None for the default `src/resources/graph_data.yml`)
pub fn update_mwc_value(id: &str, mwc_val: i64, path: Option<&str>) -> Result<(), YamlError> {
    let path = path.unwrap_or("src/resources/graph_data.yml");
    let file = File::open(path)?;

    let mut data: Vec<GraphInfo> = serde_yaml::from_reader(file)?;

    match data.iter_mut().find(|info| info.id == id) {
        Some(info) => info.val = mwc_val,
        None => {
            return Err(YamlError::NotFound(
                format!("Graph {:?} not found in {:?}", id, path),
                id.to_string(),
            ))
        }
    }

    let mut file = File::create(path)?;
    file.write_all(serde_yaml::to_string(&data)?.as_bytes())?;
    Ok(())
}

/// Check if a given weight is the known optimal value for a given graph id.
/// Returns `None` when the graph is not registered or its value has not been
/// filled in yet.
///
/// # Example
/// ```rust
/// use clique::graph_utils::is_optimal_value;
///
/// assert_eq!(is_optimal_value("test.clq", 3, None).unwrap(), Some(true));
/// assert_eq!(is_optimal_value("test.clq", 2, None).unwrap(), Some(false));
/// assert_eq!(is_optimal_value("unknown.clq", 2, None).unwrap(), None);
/// ```
pub fn is_optimal_value(
    id: &str,
    val: i64,
    path: Option<&str>,
) -> Result<Option<bool>, YamlError> {
    Ok(get_optimal_value(id, path)?.map(|known| known == val))
}

/// Get the known optimal MWC weight for a given graph id, or `None` when the
/// graph is not registered or its value is still the placeholder 0.
///
/// # Example
/// ```rust
/// use clique::graph_utils::get_optimal_value;
///
/// assert_eq!(get_optimal_value("test.clq", None).unwrap(), Some(3));
/// assert_eq!(get_optimal_value("unknown.clq", None).unwrap(), None);
/// ```
pub fn get_optimal_value(id: &str, path: Option<&str>) -> Result<Option<i64>, YamlError> {
    let path = path.unwrap_or("src/resources/graph_data.yml");
    let file = File::open(path)?;

    let data: Vec<GraphInfo> = serde_yaml::from_reader(file)?;

    Ok(data
        .iter()
        .find(|info| info.id == id && info.val != 0)
        .map(|info| info.val))
}

/// Adds a new computation record for the given graph to the yaml file located
/// at `src/resources/time_result.yml`.
pub fn add_time_to_yaml(
    id: &str,
    mwc_val: i64,
    time: ElapseTime,
    is_time_limit: bool,
    algorithm: &str,
    comment: &str,
) -> Result<(), YamlError> {
    let path = "src/resources/time_result.yml";
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;

    let content: Value = serde_yaml::from_str(&content)?;
    let mut map = match content.as_mapping() {
        Some(map) => map.clone(),
        None => {
            return Err(YamlError::NotFound(
                format!("Could not parse {:?}", path),
                path.to_string(),
            ))
        }
    };

    let graph = match map.get(id) {
        Some(graph) => graph.clone(),
        None => {
            return Err(YamlError::NotFound(
                format!("Graph {:?} not found in {:?} to store the time", id, path),
                id.to_string(),
            ))
        }
    };

    let mut graph_data: Sequence = serde_yaml::from_value(graph).map_err(|e| {
        YamlError::YamlFormatError(
            "The content of the graph should be a vector".to_string(),
            e,
        )
    })?;

    let new_time = YamlTime {
        date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        mwc_val,
        time: time.to_string(),
        is_time_limit,
        algorithm: algorithm.to_string(),
        comment: comment.to_string(),
    };

    graph_data.push(serde_yaml::to_value(new_time)?);
    map.insert(Value::String(id.to_string()), Value::Sequence(graph_data));

    let mut file = File::create(path)?;
    serde_yaml::to_writer(&mut file, &map)?;
    Ok(())
}

/// Get all the recorded computation times for a given graph id.
pub fn get_time_data(id: &str) -> Result<Vec<YamlTime>, YamlError> {
    let path = "src/resources/time_result.yml";
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;

    let content: Value = serde_yaml::from_str(&content)?;
    let map = match content.as_mapping() {
        Some(map) => map.clone(),
        None => {
            return Err(YamlError::NotFound(
                format!("Could not parse {:?}", path),
                path.to_string(),
            ))
        }
    };

    let graph = match map.get(id) {
        Some(graph) => graph.clone(),
        None => {
            return Err(YamlError::NotFound(
                format!("Graph {:?} not found in {:?}", id, path),
                id.to_string(),
            ))
        }
    };

    let graph_data: Sequence = serde_yaml::from_value(graph).map_err(|e| {
        YamlError::YamlFormatError(
            "The content of the graph should be a vector".to_string(),
            e,
        )
    })?;

    let mut res = Vec::new();
    for time in graph_data {
        let time: YamlTime = serde_yaml::from_value(time).map_err(|e| {
            YamlError::YamlFormatError(
                "The content of the vector should be a computation record".to_string(),
                e,
            )
        })?;
        res.push(time);
    }
    Ok(res)
}

#[cfg(test)]
mod graph_utils_tests {
    use super::*;

    #[test]
    fn test_is_clique() {
        let mut graph = WeightedGraph::new(5);
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(1, 2);

        assert!(is_clique(&graph, &[0, 1, 2]));
        assert!(is_clique(&graph, &[2]));
        assert!(is_clique(&graph, &[]));
        assert!(!is_clique(&graph, &[0, 1, 2, 3]));
    }

    #[test]
    fn test_is_vertex_cover() {
        let mut graph = WeightedGraph::new(3);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);
        assert!(!is_vertex_cover(&graph, &[0]));
        assert!(is_vertex_cover(&graph, &[0, 1]));
        assert!(is_vertex_cover(&graph, &[0, 1, 2]));
    }

    #[test]
    fn test_is_independent_set() {
        let mut graph = WeightedGraph::new(5);
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(1, 2);

        assert!(is_independent_set(&graph, &[3, 4]));
        assert!(!is_independent_set(&graph, &[0, 1, 2]));
    }

    #[test]
    fn test_complement() {
        let mut g = WeightedGraph::new(4);
        g.set_weight(0, 4);
        g.add_edge(0, 1);
        g.add_edge(0, 2);
        g.add_edge(2, 3);

        let complement = complement(&g);
        assert_eq!(complement.order(), 4);
        assert_eq!(complement.size(), 3);
        assert!(complement.is_adjacent(1, 3));
        assert!(complement.is_adjacent(1, 2));
        assert!(complement.is_adjacent(0, 3));
        assert_eq!(complement.weight(0), 4);
    }

    #[test]
    fn test_complement_of_complete_graph_keeps_vertices() {
        let mut g = WeightedGraph::new(3);
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 0);

        let complement = complement(&g);
        assert_eq!(complement.order(), 3);
        assert_eq!(complement.size(), 0);
    }

    #[test]
    fn test_load_clq_file() {
        let graph = load_clq_file("src/resources/graphs/test.clq").unwrap();
        assert_eq!(graph.order(), 5);
        assert_eq!(graph.size(), 6);
        assert!(graph.is_adjacent(0, 1));
        assert!(graph.is_adjacent(0, 2));
        assert!(graph.is_adjacent(0, 3));
        assert!(graph.is_adjacent(2, 3));
        assert!(graph.is_adjacent(4, 0));
        assert!(graph.is_adjacent(4, 1));
        assert!(graph.weights.iter().all(|&w| w == 1));
    }

    #[test]
    fn test_load_weighted_clq_file() {
        let graph = load_clq_file("src/resources/graphs/test_weighted.clq").unwrap();
        assert_eq!(graph.order(), 4);
        assert_eq!(graph.size(), 5);
        assert_eq!(graph.weights, vec![10, 10, 1, 1]);
        assert!(!graph.is_adjacent(0, 1));
        assert!(graph.is_adjacent(2, 3));
    }

    #[test]
    fn test_load_rejects_unknown_line_kind() {
        assert!(load_clq_file("src/resources/graphs/bad_line.clq").is_err());
    }

    #[test]
    fn test_graph_to_string() {
        let mut graph = WeightedGraph::new(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);

        let string = graph_to_string(&graph);
        assert_eq!(string, "p edge 4 2\ne 1 2\ne 2 3\n");
    }

    #[test]
    fn test_yaml_known_values() {
        assert_eq!(get_optimal_value("test.clq", None).unwrap(), Some(3));
        assert_eq!(
            is_optimal_value("test_weighted.clq", 12, None).unwrap(),
            Some(true)
        );
        assert_eq!(get_optimal_value("never_registered.clq", None).unwrap(), None);
    }
}
