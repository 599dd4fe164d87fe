//! Cost estimates and goal predicates for the best-first planners.
//!
//! Everything here is a small strategy object injected into a planner when it is built. Plain
//! closures work too, through the blanket implementations at the bottom of each trait.

use std::collections::BTreeSet;

use crate::{
    graph::Vertex,
    state_node::{cost, Cost, StateNode},
    world::World,
};

pub type SearchNode = StateNode<Vertex>;

/// Estimate of the remaining cost once `candidate` has been entered from `parent`
pub trait Heuristic {
    fn estimate(&self, parent: &SearchNode, candidate: Vertex, world: &World) -> Cost;
}

impl<F> Heuristic for F
where
    F: Fn(&SearchNode, Vertex, &World) -> Cost,
{
    fn estimate(&self, parent: &SearchNode, candidate: Vertex, world: &World) -> Cost {
        (self)(parent, candidate, world)
    }
}

/// Produces the `f` value a child node is ordered by in the fringe
pub trait Evaluator {
    fn evaluate(&self, parent: &SearchNode, candidate: Vertex, world: &World) -> Cost;
}

impl<F> Evaluator for F
where
    F: Fn(&SearchNode, Vertex, &World) -> Cost,
{
    fn evaluate(&self, parent: &SearchNode, candidate: Vertex, world: &World) -> Cost {
        (self)(parent, candidate, world)
    }
}

/// Decides whether a node ends the search
pub trait GoalTest<L> {
    fn is_goal(&self, node: &StateNode<L>) -> bool;
}

impl<L, F> GoalTest<L> for F
where
    F: Fn(&StateNode<L>) -> bool,
{
    fn is_goal(&self, node: &StateNode<L>) -> bool {
        (self)(node)
    }
}

/// Everyone has been picked up
#[derive(Debug, Clone, Copy, Default)]
pub struct AllEvacuated;

impl<L: Clone> GoalTest<L> for AllEvacuated {
    fn is_goal(&self, node: &StateNode<L>) -> bool {
        node.is_evacuated()
    }
}

/// Distance from the candidate to the closest vertex that still has people, plus the cost of
/// the edge into the candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestOccupant;

impl Heuristic for NearestOccupant {
    fn estimate(&self, parent: &SearchNode, candidate: Vertex, world: &World) -> Cost {
        let edge = world.weight(parent.location, candidate);
        let broken = &parent.projection.broken_status;
        let occupied = parent.projection.occupied();

        if occupied.is_empty() {
            return cost(edge);
        }

        let distances = world.graph().distances_from(candidate, broken);
        let nearest = occupied
            .iter()
            .map(|v| distances.get(v).copied().unwrap_or(f64::INFINITY))
            .fold(f64::INFINITY, f64::min);

        cost(nearest + edge)
    }
}

/// Weight of the minimum spanning tree joining the candidate with every vertex that will still
/// have people once the candidate is visited. Broken vertices can't be used on the way, and a
/// broken candidate gets an infinite estimate.
///
/// Any route that picks up everyone is itself a spanning tree of those vertices, so this never
/// overestimates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MstEstimate;

impl Heuristic for MstEstimate {
    fn estimate(&self, parent: &SearchNode, candidate: Vertex, world: &World) -> Cost {
        let broken = &parent.projection.broken_status;
        if broken.contains(&candidate) {
            return cost(f64::INFINITY);
        }

        cost(mst_from(candidate, &parent.projection.occupied(), broken, world))
    }
}

/// MST size over `targets ∪ {from}` with paths avoiding `broken`
pub fn mst_from(
    from: Vertex,
    targets: &BTreeSet<Vertex>,
    broken: &BTreeSet<Vertex>,
    world: &World,
) -> f64 {
    let mut vertices = targets.clone();
    vertices.insert(from);

    world.graph().mst_size(&vertices, broken)
}

/// `f = h(candidate) + g(parent) + w(parent, candidate)`
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarEvaluator<H = MstEstimate> {
    pub heuristic: H,
}

impl<H: Heuristic> Evaluator for AStarEvaluator<H> {
    fn evaluate(&self, parent: &SearchNode, candidate: Vertex, world: &World) -> Cost {
        let step = cost(world.weight(parent.location, candidate));

        self.heuristic.estimate(parent, candidate, world) + parent.g + step
    }
}

/// `f = h(candidate)`, ignoring the cost paid so far
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyEvaluator<H = MstEstimate> {
    pub heuristic: H,
}

impl<H: Heuristic> Evaluator for GreedyEvaluator<H> {
    fn evaluate(&self, parent: &SearchNode, candidate: Vertex, world: &World) -> Cost {
        self.heuristic.estimate(parent, candidate, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{environment::Environment, graph::WeightedGraph};

    fn tour_world() -> World {
        let env = Environment::from_json(include_str!("../fixtures/tour.json")).unwrap();

        World::from_environment(&env).unwrap()
    }

    fn root_at(world: &World, name: &str) -> SearchNode {
        StateNode::root(world.vertex(name).unwrap(), world)
    }

    #[test]
    fn test_mst_estimate() {
        let world = tour_world();
        let root = root_at(&world, "S");
        let p = world.vertex("P").unwrap();
        let r = world.vertex("R").unwrap();

        // From P: P-Q (3) and Q-T (3)
        assert_eq!(MstEstimate.estimate(&root, p, &world), cost(6.0));
        // From R: R-Q (1), Q-P (3), Q-T (3)
        assert_eq!(MstEstimate.estimate(&root, r, &world), cost(7.0));
    }

    #[test]
    fn test_mst_estimate_broken_candidate_is_infinite() {
        let world = tour_world();
        let mut root = root_at(&world, "S");
        let p = world.vertex("P").unwrap();
        root.projection.broken_status.insert(p);

        assert_eq!(
            MstEstimate.estimate(&root, p, &world),
            cost(f64::INFINITY)
        );
    }

    #[test]
    fn test_mst_estimate_nothing_left() {
        let mut graph = WeightedGraph::new();
        let a = graph.add_vertex("A", 0, false);
        let b = graph.add_vertex("B", 0, false);
        graph.add_edge(a, b, 2.0);
        let world = World::new(graph);

        let root = StateNode::root(a, &world);
        assert_eq!(MstEstimate.estimate(&root, b, &world), cost(0.0));
    }

    #[test]
    fn test_nearest_occupant() {
        let world = tour_world();
        let root = root_at(&world, "S");
        let r = world.vertex("R").unwrap();
        let p = world.vertex("P").unwrap();

        // R is one step from S and one step from Q
        assert_eq!(NearestOccupant.estimate(&root, r, &world), cost(2.0));
        // P is occupied itself
        assert_eq!(NearestOccupant.estimate(&root, p, &world), cost(2.0));
    }

    #[test]
    fn test_nearest_occupant_ignores_broken_occupants() {
        let world = tour_world();
        let mut root = root_at(&world, "S");
        let r = world.vertex("R").unwrap();
        let q = world.vertex("Q").unwrap();
        root.projection.broken_status.insert(q);

        // With Q gone the closest occupant is P, back through S
        assert_eq!(NearestOccupant.estimate(&root, r, &world), cost(4.0));
    }

    #[test]
    fn test_a_star_adds_path_cost() {
        let world = tour_world();
        let mut root = root_at(&world, "S");
        root.g = cost(10.0);
        let p = world.vertex("P").unwrap();

        let evaluator: AStarEvaluator = Default::default();
        assert_eq!(evaluator.evaluate(&root, p, &world), cost(6.0 + 10.0 + 2.0));

        let greedy: GreedyEvaluator = Default::default();
        assert_eq!(greedy.evaluate(&root, p, &world), cost(6.0));
    }

    #[test]
    fn test_closures_are_heuristics() {
        let world = tour_world();
        let root = root_at(&world, "S");
        let p = world.vertex("P").unwrap();

        let flat = |_: &SearchNode, _: Vertex, _: &World| cost(1.5);
        let evaluator = AStarEvaluator { heuristic: flat };

        assert_eq!(evaluator.evaluate(&root, p, &world), cost(3.5));
    }

    #[test]
    fn test_all_evacuated() {
        let world = tour_world();
        let root = root_at(&world, "S");
        assert!(!AllEvacuated.is_goal(&root));

        let everyone: Vec<_> = world.graph().vertices().collect();
        let done = root.child(None, root.location, &everyone, cost(0.0), cost(0.0), &world);
        assert!(AllEvacuated.is_goal(&done));
    }
}
