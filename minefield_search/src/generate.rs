// Random graph synthesis.
//
// Places `node_count` nodes uniformly inside a cubic region, independently
// flags each as a mine with `mine_probability`, then links every unordered
// pair closer than `connection_radius`, weighted by Euclidean distance.
//
// The pair scan is O(N²) by design: the caller bounds N, and the scan must
// evaluate every pair against the radius anyway. No spatial index.
//
// See also: `config.rs` for the parameters, `graph.rs` for the structures
// produced, `minefield_prng` for the seeded randomness source.
//
// **Critical constraint: determinism.** Given the same config and RNG seed,
// generation produces an identical graph: ids `n0..n{N-1}` in order, links in
// ascending pair order.

use crate::config::GeneratorConfig;
use crate::graph::{Graph, Link, Node};
use crate::types::{NodeId, Point3};
use minefield_prng::SearchRng;

/// Generate a random graph from the given parameters.
///
/// Pure aside from consuming the RNG: no self-loops, no duplicate links, no
/// id collisions. Panics if `node_count`, `connection_radius`, or
/// `region_half_extent` is not positive.
pub fn generate(config: &GeneratorConfig, rng: &mut SearchRng) -> Graph {
    assert!(config.node_count > 0, "generate: node_count must be positive");
    assert!(
        config.connection_radius > 0.0,
        "generate: connection_radius must be positive"
    );
    assert!(
        config.region_half_extent > 0.0,
        "generate: region_half_extent must be positive"
    );

    let half = config.region_half_extent;
    let nodes: Vec<Node> = (0..config.node_count)
        .map(|i| Node {
            id: NodeId::new(format!("n{i}")),
            position: Point3::new(
                rng.range_f32(-half, half),
                rng.range_f32(-half, half),
                rng.range_f32(-half, half),
            ),
            mine: rng.random_bool(config.mine_probability),
        })
        .collect();

    let mut links = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let weight = nodes[i].position.distance(nodes[j].position);
            if weight < config.connection_radius {
                links.push(Link {
                    source: nodes[i].id.clone(),
                    target: nodes[j].id.clone(),
                    weight,
                });
            }
        }
    }

    Graph { nodes, links }
}
