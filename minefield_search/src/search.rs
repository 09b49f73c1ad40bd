// Dijkstra and A* search engines over the adjacency index.
//
// Both engines share the same skeleton: a `MinQueue` of pending nodes, a
// per-node tentative cost map, a predecessor map, and a settled-set that
// discards stale queue entries on extraction. Every settlement appends one
// `VisitedStep`, producing the ordered trail a replay collaborator animates.
//
// The mine rule: settling a mined node that is neither start nor end aborts
// the search immediately. The outcome then carries the detonation point and
// the partial trail, not a path.
//
// See also: `queue.rs` for the priority queue, `graph.rs` for the adjacency
// index being walked, `generate.rs` for where mined graphs come from.
//
// **Critical constraint: determinism.** A search is a pure function of the
// graph snapshot, the endpoints, and the algorithm. Settlement order is fixed
// by the queue's (priority, insertion) total order; no hash-map iteration
// order ever reaches the output.

use crate::graph::{AdjacencyIndex, Graph};
use crate::queue::MinQueue;
use crate::types::{Algorithm, NodeId, Point3};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// One settlement event: the node committed, and the predecessor it was
/// reached through (`None` for the start node).
///
/// A node appears at most once per search, in the exact order the engine
/// settled it. This sequence is the replay contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitedStep {
    pub node: NodeId,
    pub from: Option<NodeId>,
}

/// The result of one search invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Ordered node ids start→end inclusive; empty when no path was found or
    /// the search detonated a mine.
    pub path: Vec<NodeId>,
    /// Settlement trail, in order. Present in every outcome, including mine
    /// aborts (where it ends at the detonation step).
    pub steps: Vec<VisitedStep>,
    /// Total path cost; 0 when `path` is empty.
    pub cost: f32,
    /// The mined node that aborted the search, if any.
    pub exploded_at: Option<NodeId>,
}

impl SearchOutcome {
    fn no_path(steps: Vec<VisitedStep>) -> Self {
        Self {
            path: Vec::new(),
            steps,
            cost: 0.0,
            exploded_at: None,
        }
    }

    fn detonation(steps: Vec<VisitedStep>, at: NodeId) -> Self {
        Self {
            path: Vec::new(),
            steps,
            cost: 0.0,
            exploded_at: Some(at),
        }
    }

    /// True when a path was found.
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// True when the search aborted on a mine.
    pub fn detonated(&self) -> bool {
        self.exploded_at.is_some()
    }
}

/// Run a shortest-path search from `start` to `end`.
///
/// Builds the adjacency index internally and dispatches on `algorithm`.
/// A start or end id missing from the graph is reported as "no path", not as
/// a distinct error — absence of a path is a value here, never a fault.
pub fn search(graph: &Graph, start: &NodeId, end: &NodeId, algorithm: Algorithm) -> SearchOutcome {
    if !graph.contains(start) || !graph.contains(end) {
        return SearchOutcome::no_path(Vec::new());
    }
    let adjacency = graph.adjacency();
    match algorithm {
        Algorithm::Dijkstra => dijkstra(graph, &adjacency, start, end),
        Algorithm::AStar => astar(graph, &adjacency, start, end),
    }
}

/// Uniform-cost search. Priority = tentative distance from start.
fn dijkstra(
    graph: &Graph,
    adjacency: &AdjacencyIndex,
    start: &NodeId,
    end: &NodeId,
) -> SearchOutcome {
    let mined = mined_ids(graph);
    let mut distance: FxHashMap<NodeId, f32> = graph
        .nodes
        .iter()
        .map(|n| (n.id.clone(), f32::INFINITY))
        .collect();
    let mut predecessor: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut settled: FxHashSet<NodeId> = FxHashSet::default();
    let mut steps: Vec<VisitedStep> = Vec::new();

    distance.insert(start.clone(), 0.0);
    let mut queue = MinQueue::new();
    queue.push(start.clone(), 0.0);

    while let Some(u) = queue.pop() {
        // Stale entry: a cheaper copy of u was already settled.
        if settled.contains(&u) {
            continue;
        }
        settled.insert(u.clone());
        steps.push(VisitedStep {
            node: u.clone(),
            from: predecessor.get(&u).cloned(),
        });

        if mined.contains(&u) && &u != start && &u != end {
            return SearchOutcome::detonation(steps, u);
        }
        if &u == end {
            break;
        }

        let du = distance[&u];
        for (v, w) in adjacency.neighbors(&u) {
            let candidate = du + *w;
            if candidate < distance[v] {
                distance.insert(v.clone(), candidate);
                predecessor.insert(v.clone(), u.clone());
                queue.push(v.clone(), candidate);
            }
        }
    }

    finish(&distance, &predecessor, start, end, graph.node_count(), steps)
}

/// Heuristic-guided search. Priority = tentative cost + straight-line
/// distance to the end position.
///
/// Precondition: edge weights are at least the Euclidean distance between
/// their endpoints (true for generated graphs, where they are equal), which
/// makes the heuristic admissible and consistent. The first extraction of
/// `end` is then optimal, so the engine stops there without draining the
/// queue.
fn astar(graph: &Graph, adjacency: &AdjacencyIndex, start: &NodeId, end: &NodeId) -> SearchOutcome {
    let mined = mined_ids(graph);
    let positions: FxHashMap<NodeId, Point3> = graph
        .nodes
        .iter()
        .map(|n| (n.id.clone(), n.position))
        .collect();
    let goal = positions[end];

    let mut g_score: FxHashMap<NodeId, f32> = graph
        .nodes
        .iter()
        .map(|n| (n.id.clone(), f32::INFINITY))
        .collect();
    let mut predecessor: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut settled: FxHashSet<NodeId> = FxHashSet::default();
    let mut steps: Vec<VisitedStep> = Vec::new();

    g_score.insert(start.clone(), 0.0);
    let mut queue = MinQueue::new();
    queue.push(start.clone(), positions[start].distance(goal));

    while let Some(u) = queue.pop() {
        // End and mine outcomes are recognized on extraction, before the
        // settled-set guard: a node enters the trail the first time it is
        // ever extracted. Both branches terminate the search, so neither can
        // re-trigger on a later duplicate extraction.
        if &u == end {
            steps.push(VisitedStep {
                node: u.clone(),
                from: predecessor.get(&u).cloned(),
            });
            break;
        }
        if mined.contains(&u) && &u != start {
            steps.push(VisitedStep {
                node: u.clone(),
                from: predecessor.get(&u).cloned(),
            });
            return SearchOutcome::detonation(steps, u);
        }
        if settled.contains(&u) {
            continue;
        }
        settled.insert(u.clone());
        steps.push(VisitedStep {
            node: u.clone(),
            from: predecessor.get(&u).cloned(),
        });

        let gu = g_score[&u];
        for (v, w) in adjacency.neighbors(&u) {
            if settled.contains(v) {
                continue;
            }
            let tentative = gu + *w;
            if tentative < g_score[v] {
                g_score.insert(v.clone(), tentative);
                predecessor.insert(v.clone(), u.clone());
                let f = tentative + positions[v].distance(goal);
                queue.push(v.clone(), f);
            }
        }
    }

    finish(&g_score, &predecessor, start, end, graph.node_count(), steps)
}

/// Shared epilogue: turn the cost/predecessor maps into an outcome.
fn finish(
    cost: &FxHashMap<NodeId, f32>,
    predecessor: &FxHashMap<NodeId, NodeId>,
    start: &NodeId,
    end: &NodeId,
    node_count: usize,
    steps: Vec<VisitedStep>,
) -> SearchOutcome {
    let total = cost.get(end).copied().unwrap_or(f32::INFINITY);
    if !total.is_finite() {
        return SearchOutcome::no_path(steps);
    }
    match reconstruct_path(predecessor, start, end, node_count) {
        Some(path) => SearchOutcome {
            path,
            steps,
            cost: total,
            exploded_at: None,
        },
        None => SearchOutcome::no_path(steps),
    }
}

/// Unwind predecessor links backward from `end`, then reverse into
/// start→end order.
///
/// Returns `None` if the chain grows past the node count (cycle guard for a
/// corrupted predecessor map) or does not terminate at `start`; the caller
/// degrades that to a no-path outcome rather than reporting a wrong path.
fn reconstruct_path(
    predecessor: &FxHashMap<NodeId, NodeId>,
    start: &NodeId,
    end: &NodeId,
    node_count: usize,
) -> Option<Vec<NodeId>> {
    let mut path = vec![end.clone()];
    let mut current = end;
    while let Some(prev) = predecessor.get(current) {
        if path.len() > node_count {
            return None;
        }
        path.push(prev.clone());
        current = prev;
    }
    if path.last() != Some(start) {
        return None;
    }
    path.reverse();
    Some(path)
}

fn mined_ids(graph: &Graph) -> FxHashSet<NodeId> {
    graph
        .nodes
        .iter()
        .filter(|n| n.mine)
        .map(|n| n.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generate::generate;
    use minefield_prng::SearchRng;

    const BOTH: [Algorithm; 2] = [Algorithm::Dijkstra, Algorithm::AStar];

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    /// a --1-- b --1-- c on the x axis; `mine_b` flags the middle node.
    fn line_graph(mine_b: bool) -> Graph {
        let mut graph = Graph::new();
        graph.add_node("a", Point3::new(0.0, 0.0, 0.0), false);
        graph.add_node("b", Point3::new(1.0, 0.0, 0.0), mine_b);
        graph.add_node("c", Point3::new(2.0, 0.0, 0.0), false);
        graph.add_link("a", "b", 1.0);
        graph.add_link("b", "c", 1.0);
        graph
    }

    /// A mine-free graph dense enough to be connected, with true-distance
    /// weights (so the A* heuristic is exact-admissible).
    fn generated_graph(seed: u64) -> Graph {
        let config = GeneratorConfig {
            node_count: 30,
            connection_radius: 80.0,
            mine_probability: 0.0,
            ..GeneratorConfig::default()
        };
        generate(&config, &mut SearchRng::new(seed))
    }

    /// Minimum path cost by exhaustive DFS over simple paths.
    fn brute_force_cost(graph: &Graph, start: &NodeId, end: &NodeId) -> Option<f32> {
        fn walk(
            adjacency: &AdjacencyIndex,
            current: &NodeId,
            end: &NodeId,
            visited: &mut Vec<NodeId>,
            cost: f32,
            best: &mut Option<f32>,
        ) {
            if current == end {
                if best.is_none() || cost < best.unwrap() {
                    *best = Some(cost);
                }
                return;
            }
            for (next, w) in adjacency.neighbors(current) {
                if visited.contains(next) {
                    continue;
                }
                visited.push(next.clone());
                walk(adjacency, next, end, visited, cost + *w, best);
                visited.pop();
            }
        }
        let adjacency = graph.adjacency();
        let mut best = None;
        let mut visited = vec![start.clone()];
        walk(&adjacency, start, end, &mut visited, 0.0, &mut best);
        best
    }

    #[test]
    fn finds_straight_line_path() {
        let graph = line_graph(false);
        for algorithm in BOTH {
            let outcome = search(&graph, &id("a"), &id("c"), algorithm);
            assert!(outcome.found());
            assert_eq!(outcome.path, vec![id("a"), id("b"), id("c")]);
            assert!((outcome.cost - 2.0).abs() < 1e-6);
            assert_eq!(outcome.exploded_at, None);
        }
    }

    #[test]
    fn prefers_cheaper_detour_over_direct_link() {
        // a --10-- c direct, but a --1-- b --1-- c is cheaper.
        let mut graph = line_graph(false);
        graph.add_link("a", "c", 10.0);
        for algorithm in BOTH {
            let outcome = search(&graph, &id("a"), &id("c"), algorithm);
            assert_eq!(outcome.path, vec![id("a"), id("b"), id("c")]);
            assert!((outcome.cost - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn mine_short_circuits_both_algorithms() {
        let graph = line_graph(true);
        for algorithm in BOTH {
            let outcome = search(&graph, &id("a"), &id("c"), algorithm);
            assert!(outcome.detonated());
            assert!(!outcome.found());
            assert!(outcome.path.is_empty());
            assert_eq!(outcome.cost, 0.0);
            assert_eq!(outcome.exploded_at, Some(id("b")));
            // The detonation step is the last entry of the trail.
            assert_eq!(outcome.steps.last().map(|s| &s.node), Some(&id("b")));
        }
    }

    #[test]
    fn mined_start_and_end_are_exempt() {
        let mut graph = Graph::new();
        graph.add_node("a", Point3::new(0.0, 0.0, 0.0), true);
        graph.add_node("b", Point3::new(1.0, 0.0, 0.0), true);
        graph.add_link("a", "b", 1.0);
        for algorithm in BOTH {
            let outcome = search(&graph, &id("a"), &id("b"), algorithm);
            assert!(outcome.found(), "{algorithm:?} must not detonate on endpoints");
            assert_eq!(outcome.exploded_at, None);
        }
    }

    #[test]
    fn unreachable_end_reports_no_path() {
        // Two disconnected components.
        let mut graph = line_graph(false);
        graph.add_node("x", Point3::new(100.0, 0.0, 0.0), false);
        graph.add_node("y", Point3::new(101.0, 0.0, 0.0), false);
        graph.add_link("x", "y", 1.0);
        for algorithm in BOTH {
            let outcome = search(&graph, &id("a"), &id("y"), algorithm);
            assert!(outcome.path.is_empty());
            assert_eq!(outcome.cost, 0.0);
            assert_eq!(outcome.exploded_at, None);
        }
    }

    #[test]
    fn missing_endpoints_report_no_path() {
        let graph = line_graph(false);
        for algorithm in BOTH {
            let outcome = search(&graph, &id("ghost"), &id("c"), algorithm);
            assert!(outcome.path.is_empty());
            assert!(outcome.steps.is_empty());
            let outcome = search(&graph, &id("a"), &id("ghost"), algorithm);
            assert!(outcome.path.is_empty());
        }
    }

    #[test]
    fn start_equals_end() {
        let graph = line_graph(false);
        for algorithm in BOTH {
            let outcome = search(&graph, &id("a"), &id("a"), algorithm);
            assert_eq!(outcome.path, vec![id("a")]);
            assert_eq!(outcome.cost, 0.0);
            assert_eq!(outcome.steps.len(), 1);
            assert_eq!(outcome.steps[0].from, None);
        }
    }

    #[test]
    fn mined_node_as_both_start_and_end() {
        let mut graph = line_graph(false);
        graph.nodes[0].mine = true;
        for algorithm in BOTH {
            let outcome = search(&graph, &id("a"), &id("a"), algorithm);
            assert!(outcome.found());
            assert_eq!(outcome.exploded_at, None);
        }
    }

    #[test]
    fn dijkstra_matches_brute_force_on_small_graphs() {
        for seed in [1, 2, 3, 4, 5] {
            let config = GeneratorConfig {
                node_count: 9,
                connection_radius: 70.0,
                mine_probability: 0.0,
                ..GeneratorConfig::default()
            };
            let graph = generate(&config, &mut SearchRng::new(seed));
            let (start, end) = (id("n0"), id("n8"));
            let outcome = search(&graph, &start, &end, Algorithm::Dijkstra);
            match brute_force_cost(&graph, &start, &end) {
                Some(best) => {
                    assert!(outcome.found(), "seed {seed}: path exists but not found");
                    assert!(
                        (outcome.cost - best).abs() < 1e-4,
                        "seed {seed}: cost {} vs brute force {}",
                        outcome.cost,
                        best
                    );
                }
                None => assert!(!outcome.found(), "seed {seed}: found a phantom path"),
            }
        }
    }

    #[test]
    fn dijkstra_and_astar_agree_on_cost() {
        for seed in [10, 20, 30, 40] {
            let graph = generated_graph(seed);
            let (start, end) = (id("n0"), id("n29"));
            let d = search(&graph, &start, &end, Algorithm::Dijkstra);
            let a = search(&graph, &start, &end, Algorithm::AStar);
            assert_eq!(d.found(), a.found(), "seed {seed}");
            if d.found() {
                assert!(
                    (d.cost - a.cost).abs() < 1e-3,
                    "seed {seed}: dijkstra {} vs astar {}",
                    d.cost,
                    a.cost
                );
            }
        }
    }

    #[test]
    fn settlement_order_is_topologically_consistent() {
        let graph = generated_graph(77);
        let (start, end) = (id("n0"), id("n29"));
        for algorithm in BOTH {
            let outcome = search(&graph, &start, &end, algorithm);
            let mut seen: Vec<&NodeId> = Vec::new();
            for step in &outcome.steps {
                assert!(!seen.contains(&&step.node), "{algorithm:?}: node settled twice");
                match &step.from {
                    Some(from) => assert!(
                        seen.contains(&from),
                        "{algorithm:?}: predecessor {from} settled after {}",
                        step.node
                    ),
                    None => assert_eq!(step.node, start, "{algorithm:?}: only start has no from"),
                }
                seen.push(&step.node);
            }
            assert_eq!(outcome.steps.first().map(|s| &s.node), Some(&start));
        }
    }

    #[test]
    fn path_is_contiguous_and_cost_consistent() {
        let graph = generated_graph(55);
        let adjacency = graph.adjacency();
        let (start, end) = (id("n0"), id("n29"));
        for algorithm in BOTH {
            let outcome = search(&graph, &start, &end, algorithm);
            assert!(outcome.found());
            assert_eq!(outcome.path.first(), Some(&start));
            assert_eq!(outcome.path.last(), Some(&end));
            let mut summed = 0.0;
            for pair in outcome.path.windows(2) {
                let weight = adjacency
                    .neighbors(&pair[0])
                    .iter()
                    .find(|(n, _)| n == &pair[1])
                    .map(|(_, w)| *w);
                let weight = weight.unwrap_or_else(|| {
                    panic!("{algorithm:?}: {} and {} not adjacent", pair[0], pair[1])
                });
                summed += weight;
            }
            assert!(
                (summed - outcome.cost).abs() < 1e-3,
                "{algorithm:?}: summed {summed} vs reported {}",
                outcome.cost
            );
        }
    }

    #[test]
    fn repeated_searches_are_identical() {
        let graph = generated_graph(123);
        let (start, end) = (id("n0"), id("n29"));
        for algorithm in BOTH {
            let first = search(&graph, &start, &end, algorithm);
            let second = search(&graph, &start, &end, algorithm);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn reconstruct_path_cycle_guard() {
        // Corrupted predecessor map: a <-> b cycle, never reaching start.
        let mut predecessor = FxHashMap::default();
        predecessor.insert(id("a"), id("b"));
        predecessor.insert(id("b"), id("a"));
        assert_eq!(reconstruct_path(&predecessor, &id("s"), &id("a"), 2), None);
    }

    #[test]
    fn reconstruct_path_rejects_chain_not_reaching_start() {
        let mut predecessor = FxHashMap::default();
        predecessor.insert(id("b"), id("orphan"));
        assert_eq!(reconstruct_path(&predecessor, &id("s"), &id("b"), 5), None);
    }

    #[test]
    fn outcome_serialization_roundtrips() {
        let graph = line_graph(false);
        let outcome = search(&graph, &id("a"), &id("c"), Algorithm::AStar);

        let json = serde_json::to_string(&outcome).unwrap();
        let from_json: SearchOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, from_json);

        let bytes = bincode::serialize(&outcome).unwrap();
        let from_bincode: SearchOutcome = bincode::deserialize(&bytes).unwrap();
        assert_eq!(outcome, from_bincode);
    }
}
