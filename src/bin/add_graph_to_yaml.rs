use std::fs::read_dir;

use clique::graph_utils::{add_graph_to_yaml, load_clq_file};

/// Registers every instance under src/resources/graphs in the graph data
/// file, with a placeholder MWC value to be filled in manually.
pub fn update_graph_info() {
    let paths = match read_dir("src/resources/graphs") {
        Ok(paths) => paths,
        Err(e) => {
            println!("Error while reading directory : {}", e);
            return;
        }
    };

    for path in paths {
        let path = path.unwrap().path();
        let path_str = path.to_str().unwrap();

        if path_str.ends_with(".col") || path_str.ends_with(".clq") {
            let graph = match load_clq_file(path_str) {
                Ok(graph) => graph,
                Err(e) => {
                    println!("Error while loading graph at {:?} : {}", path_str, e);
                    return;
                }
            };
            println!(
                "{}: {} vertices, {} edges, total weight {}",
                path_str,
                graph.order(),
                graph.size(),
                graph.total_weight()
            );
            let id = path_str.split('/').last().unwrap();
            if let Err(e) = add_graph_to_yaml(id, "clq", &graph, "src/resources/graph_data.yml") {
                println!("Error while registering {:?} : {}", id, e);
                return;
            }
        }
    }
}

fn main() {
    update_graph_info();
}
