// Data-driven generation configuration.
//
// All tunable generation parameters live here in `GeneratorConfig`, loadable
// from JSON. The generator never uses magic numbers — it reads from the
// config. This lets a caller tune graph density without recompilation.
//
// See also: `generate.rs` which consumes the config, `graph.rs` for the
// structures it produces.

use serde::{Deserialize, Serialize};

/// Parameters for random graph generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of nodes to place. Must be positive.
    pub node_count: usize,
    /// Two nodes are linked when their Euclidean distance is strictly less
    /// than this radius. Must be positive.
    pub connection_radius: f32,
    /// Probability that each node is independently flagged as a mine.
    pub mine_probability: f32,
    /// Positions are drawn uniformly from the cube
    /// `[-region_half_extent, region_half_extent]` on each axis.
    pub region_half_extent: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            node_count: 50,
            connection_radius: 25.0,
            mine_probability: 0.15,
            region_half_extent: 60.0,
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
