//! Best-first graph search over [StateNode]s.
//!
//! The same loop drives A* and greedy-best-first; the only difference is the [Evaluator] the
//! search was built with. A soft cutoff turns it into the bounded variant used by the real-time
//! agent.

use std::{
    cmp::max,
    collections::{HashMap, HashSet},
};

use derivative::Derivative;
use tracing::debug;

use crate::{
    error::SearchError,
    fringe::{Fringe, FringeEntry, PriorityQueue},
    graph::Vertex,
    heuristics::{AllEvacuated, Evaluator, GoalTest, SearchNode},
    state_node::{cost, Cost, NodeId, SearchTree, StateKey, StateNode},
    world::World,
};

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// How many nodes may be expanded before the search gives up (or settles for a partial
    /// plan)
    pub node_budget: usize,
    /// Whether a soft cutoff records the chosen frontier `f` as the learned cost-to-go of the
    /// start state, for later calls to build on. Off, every call starts from nothing.
    pub learn_estimates: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            node_budget: 10_000,
            learn_estimates: false,
        }
    }
}

/// What to do when the node budget runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cutoff {
    /// Fail with [SearchError::Exhausted]
    Hard,
    /// Return a partial plan toward the most promising frontier node
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// The path ends in a goal state
    Complete,
    /// The budget ran out; the path ends at the best node on the frontier
    InProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Every vertex along the way, starting with the vertex the search started from
    pub path: Vec<Vertex>,
    pub cost: Cost,
    pub status: PlanStatus,
    pub expanded: usize,
}

impl Plan {
    /// The vertices still to be visited, without the starting vertex
    pub fn steps(&self) -> &[Vertex] {
        self.path.get(1..).unwrap_or(&[])
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct BestFirstSearch<E, G = AllEvacuated> {
    #[derivative(Debug = "ignore")]
    evaluator: E,
    #[derivative(Debug = "ignore")]
    goal_test: G,
    options: SearchOptions,
    fringe: PriorityQueue<FringeEntry>,
    closed: HashSet<StateKey<Vertex>>,
    tree: SearchTree<Vertex>,
    /// Cost-to-go learned from earlier soft cutoffs. Unlike everything else this survives
    /// between calls.
    learned: HashMap<StateKey<Vertex>, Cost>,
}

impl<E: Evaluator> BestFirstSearch<E, AllEvacuated> {
    pub fn new(evaluator: E, options: SearchOptions) -> Self {
        Self::with_goal(evaluator, AllEvacuated, options)
    }
}

impl<E, G> BestFirstSearch<E, G>
where
    E: Evaluator,
    G: GoalTest<Vertex>,
{
    pub fn with_goal(evaluator: E, goal_test: G, options: SearchOptions) -> Self {
        Self {
            evaluator,
            goal_test,
            options,
            fringe: PriorityQueue::new(),
            closed: HashSet::new(),
            tree: SearchTree::new(),
            learned: HashMap::new(),
        }
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Drops every estimate learned from earlier partial plans
    pub fn forget(&mut self) {
        self.learned.clear();
    }

    /// Searches from `start` against a snapshot of the live world.
    ///
    /// Every call starts over with an empty fringe and closed set. Goal checks happen when a
    /// node is popped, so with an admissible heuristic the A* plan is optimal.
    ///
    /// With [SearchOptions::learn_estimates] on, a soft cutoff makes the `f` of the chosen
    /// frontier node the learned cost-to-go of the start state. Later searches never estimate
    /// that state below it, which keeps a sequence of partial plans from walking in circles.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(start = world.name(start), cutoff = ?cutoff, expanded, cost)
    )]
    pub fn calculate_path(
        &mut self,
        world: &World,
        start: Vertex,
        cutoff: Cutoff,
    ) -> Result<Plan, SearchError> {
        let current_span = tracing::Span::current();

        self.fringe.initialize();
        self.closed.clear();
        self.tree.clear();

        let root = self.tree.insert(StateNode::root(start, world));
        self.fringe.push(FringeEntry {
            id: root,
            f: self.tree.get(root).f,
        });

        let mut expanded = 0;

        loop {
            let entry = self.fringe.pop().map_err(|_| SearchError::Unreachable)?;
            let node = self.tree.get(entry.id);

            if self.goal_test.is_goal(node) {
                current_span.record("expanded", expanded as u64);
                current_span.record("cost", node.g.into_inner());

                return Ok(self.plan_to(entry.id, PlanStatus::Complete, expanded));
            }

            if !self.closed.insert(node.key()) {
                continue;
            }

            self.expand(entry.id, world);
            expanded += 1;

            if expanded >= self.options.node_budget {
                current_span.record("expanded", expanded as u64);

                return match cutoff {
                    Cutoff::Hard => Err(SearchError::Exhausted { expanded }),
                    Cutoff::Soft => {
                        let best = self.fringe.pop().map_err(|_| SearchError::Unreachable)?;
                        if self.options.learn_estimates {
                            self.learn(root, best.f);
                        }
                        debug!(
                            frontier = world.name(self.tree.get(best.id).location),
                            "budget spent, settling for a partial plan"
                        );

                        Ok(self.plan_to(best.id, PlanStatus::InProgress, expanded))
                    }
                };
            }
        }
    }

    /// Pushes a child for every neighbor that isn't broken in the parent's projection
    fn expand(&mut self, id: NodeId, world: &World) {
        let parent: SearchNode = self.tree.get(id).clone();

        for neighbor in world.neighbors(parent.location) {
            if parent.projection.is_broken(neighbor) {
                continue;
            }

            let g = parent.g + cost(world.weight(parent.location, neighbor));
            let f = self.evaluator.evaluate(&parent, neighbor, world);
            let mut child = parent.child(Some(id), neighbor, &[neighbor], g, f, world);

            let key = child.key();
            if self.closed.contains(&key) {
                continue;
            }
            if let Some(learned) = self.learned.get(&key) {
                child.f = max(child.f, g + *learned);
            }

            let f = child.f;
            let child_id = self.tree.insert(child);
            self.fringe.push(FringeEntry { id: child_id, f });
        }
    }

    fn learn(&mut self, id: NodeId, estimate: Cost) {
        let key = self.tree.get(id).key();
        let learned = self.learned.entry(key).or_insert(estimate);
        *learned = max(*learned, estimate);
    }

    fn plan_to(&self, id: NodeId, status: PlanStatus, expanded: usize) -> Plan {
        Plan {
            path: self.tree.locations_to(id),
            cost: self.tree.get(id).g,
            status,
            expanded,
        }
    }
}
