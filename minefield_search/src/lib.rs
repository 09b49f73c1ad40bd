// minefield_search — pure Rust graph-search library.
//
// This crate contains the whole search core for Minefield Search: random
// weighted-graph generation, adjacency construction, Dijkstra and A* engines,
// and the replayable visited-order output. It has zero rendering or timing
// dependencies and can be tested, benchmarked, and run headless.
//
// Module overview:
// - `types.rs`:    NodeId, Point3 (Euclidean distance), Algorithm selector.
// - `graph.rs`:    Node / Link / Graph model + the bidirectional adjacency index.
// - `generate.rs`: Random graph synthesis (uniform positions, radius-linked).
// - `queue.rs`:    MinQueue (binary min-heap priority queue, FIFO tie-break).
// - `search.rs`:   Dijkstra + A* engines, path reconstruction, SearchOutcome.
// - `config.rs`:   GeneratorConfig — all tunable generation parameters.
// - `prng`:        Re-exported from `minefield_prng` — xoshiro256++ PRNG with
//                  SplitMix64 seeding.
//
// The presentation layer (rendering, camera animation, step-by-step replay
// pacing) is a separate collaborator. The boundary is enforced at the crate
// level — this crate cannot depend on frame timing, wall clocks, or threads.
// A search returns its complete, ordered settlement trail eagerly; the caller
// replays it at its own pace.
//
// **Critical constraint: determinism.** A search is a pure function:
// `(graph, start, end, algorithm) -> outcome`. All randomness comes from a
// seeded xoshiro256++ PRNG and is confined to generation. Hash-map iteration
// order is never observed — every ordered output is driven by `Vec`s or the
// priority queue.

pub mod config;
pub mod generate;
pub mod graph;
pub use minefield_prng as prng;
pub mod queue;
pub mod search;
pub mod types;
