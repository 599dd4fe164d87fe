#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! Game tree planning for two evacuation agents that share a world.
//!
//! The agents here plug into the same [evacuation_rs::agents::EvacuationAgent] interface as the
//! single agent planners, so they can be dropped into an [evacuation_rs::Simulator] next to
//! anything else. See [game_tree] for how the search works.

use evacuation_rs::agents::BoxedFactory;

pub mod game_tree;

/// Every agent factory: the ones from [evacuation_rs] followed by the game tree agents
pub fn all_factories() -> Vec<BoxedFactory> {
    let mut factories = evacuation_rs::all_factories();
    factories.push(Box::new(game_tree::AdversarialFactory {}));
    factories.push(Box::new(game_tree::SemiCooperativeFactory {}));
    factories.push(Box::new(game_tree::CooperativeFactory {}));

    factories
}
