//! Depth-limited game tree search for two agents sharing a world.
//!
//! The two players take turns, one ply each, starting with the searching player. Every ply is
//! either a [Action::NoOp] or a move along an edge, and moving onto a vertex rescues everyone
//! still waiting there in the projected state. How the players value the results depends on
//! the [Stance]:
//!
//! * [Stance::Adversarial] is zero sum. The searching player maximizes `mine - partner`, the
//!   partner minimizes it, and alpha-beta pruning keeps the search small.
//! * [Stance::SemiCooperative] has each player maximize its own score, using the other player's
//!   score only to break ties.
//! * [Stance::FullyCooperative] has both players maximize the combined score.
//!
//! Leaves are states where everyone has been evacuated or where the depth limit was reached. The
//! latter are scored with a [StaticEvaluator] on top of what was already rescued. Either way a
//! small tempo bonus of `1 / depth` is added so earlier results rank higher.
//!
//! ```rust
//! use evacuation_minimax::game_tree::{Action, GameTreeAgent, GameTreeOptions};
//! use evacuation_rs::{WeightedGraph, World};
//!
//! // A - B - C, with two people waiting on B
//! let mut graph = WeightedGraph::new();
//! let a = graph.add_vertex("A", 0, false);
//! let b = graph.add_vertex("B", 2, false);
//! let c = graph.add_vertex("C", 0, false);
//! graph.add_edge(a, b, 1.0);
//! graph.add_edge(b, c, 1.0);
//!
//! let mut world = World::new(graph);
//! world.set_agent_location(0, c);
//! world.set_agent_location(1, a);
//!
//! let agent = GameTreeAgent::adversarial(
//!     "adversarial",
//!     0,
//!     c,
//!     GameTreeOptions {
//!         max_depth: 4,
//!         ..Default::default()
//!     },
//! );
//!
//! // Get to B before the partner does
//! let (result, _visited) = agent.search(&world);
//! assert_eq!(result.best_action(0), Some(Action::Traverse(b)));
//! ```

mod score;
pub use score::{Action, Outcome, Stance};

mod minimax_return;
pub use minimax_return::MinMaxReturn;

mod evaluator;
pub use evaluator::{GameNode, MstPotential, NoEstimate, StaticEvaluator};

mod eval;
pub use eval::{
    AdversarialFactory, CooperativeFactory, GameTreeAgent, GameTreeOptions,
    SemiCooperativeFactory,
};
