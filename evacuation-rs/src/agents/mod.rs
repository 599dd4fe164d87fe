//! Everything that can take a turn in a simulation.
//!
//! An agent gets `&mut World` once per round and either commits a single move or stays put.
//! Search problems never escape an agent: when something goes wrong it logs and terminates
//! itself, and the simulator stops asking it to act.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::{graph::Vertex, search::SearchOptions, world::World};

pub mod human;
pub mod planning;
pub mod saboteur;
pub mod stupid_greedy;

pub use human::{HumanAgent, HumanFactory};
pub use planning::{
    AStarFactory, GreedyBestFirstFactory, PlanningAgent, PlanningMode, RealTimeFactory,
};
pub use saboteur::{Saboteur, SaboteurFactory};
pub use stupid_greedy::{StupidGreedy, StupidGreedyFactory};

pub type BoxedAgent = Box<dyn EvacuationAgent + Send>;
pub type BoxedFactory = Box<dyn AgentFactory + Send + Sync>;

pub trait EvacuationAgent {
    /// Takes one turn. Returns the vertex the agent moved to, or `None` if it stayed where it
    /// was.
    fn act(&mut self, world: &mut World) -> Option<Vertex>;

    fn stats(&self) -> &AgentStats;

    fn is_terminated(&self) -> bool {
        self.stats().terminated
    }

    /// Called once the simulation is over
    fn end(&self) {}
}

/// Knobs shared by every agent a factory can build
#[derive(Debug, Clone, Copy)]
pub struct AgentOptions {
    pub search: SearchOptions,
    /// Plies the game-tree agents look ahead
    pub max_depth: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            search: SearchOptions::default(),
            max_depth: 10,
        }
    }
}

pub trait AgentFactory {
    fn name(&self) -> String;

    /// Builds the agent that plays as `index` in the world's agent list, starting on `start`
    fn create(&self, index: usize, start: Vertex, options: &AgentOptions) -> BoxedAgent;
}

/// Score and bookkeeping every agent carries
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStats {
    pub name: String,
    pub location: Vertex,
    pub score: f64,
    pub time: f64,
    pub evacuated: u32,
    pub actions: u32,
    pub terminated: bool,
}

impl AgentStats {
    pub fn new(name: impl Into<String>, location: Vertex) -> Self {
        Self {
            name: name.into(),
            location,
            score: 0.0,
            time: 0.0,
            evacuated: 0,
            actions: 0,
            terminated: false,
        }
    }

    /// Moves to `dst` and picks up everyone waiting there.
    ///
    /// The caller has already checked the move with [World::valid_action].
    pub fn commit(&mut self, world: &mut World, dst: Vertex) -> u32 {
        let people = world.clear_people(dst);

        self.travel(world, dst);
        self.score += 1000.0 * people as f64;
        self.evacuated += people;

        people
    }

    /// Moves to `dst` without picking anyone up. Time still passes.
    pub fn travel(&mut self, world: &World, dst: Vertex) {
        let weight = world.weight(self.location, dst);

        self.score -= weight;
        self.time += weight;
        self.actions += 1;
        self.location = dst;
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    pub fn summary(&self, world: &World) -> AgentSummary {
        AgentSummary {
            name: self.name.clone(),
            score: self.score,
            location: world.name(self.location).to_owned(),
            time: self.time,
            evacuated: self.evacuated,
            actions: self.actions,
            terminated: self.terminated,
        }
    }
}

/// Printable snapshot of an agent's [AgentStats]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub score: f64,
    pub location: String,
    pub time: f64,
    pub evacuated: u32,
    pub actions: u32,
    pub terminated: bool,
}

impl Display for AgentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name: {} score: {} location: {} time: {} evacuated: {} actions: {}",
            self.name, self.score, self.location, self.time, self.evacuated, self.actions
        )
    }
}

/// Factories for every agent in this crate, keyed by [AgentFactory::name]
pub fn all_factories() -> Vec<BoxedFactory> {
    vec![
        Box::new(HumanFactory {}),
        Box::new(StupidGreedyFactory {}),
        Box::new(SaboteurFactory {}),
        Box::new(GreedyBestFirstFactory {}),
        Box::new(AStarFactory {}),
        Box::new(RealTimeFactory {}),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;

    fn line_world() -> World {
        let env = Environment::from_json(include_str!("../../fixtures/line.json")).unwrap();

        World::from_environment(&env).unwrap()
    }

    #[test]
    fn test_commit_scores_rescue() {
        let mut world = line_world();
        let a = world.vertex("A").unwrap();
        let b = world.vertex("B").unwrap();
        let mut stats = AgentStats::new("A1", a);

        assert_eq!(stats.commit(&mut world, b), 1);

        assert_eq!(stats.score, 999.0);
        assert_eq!(stats.time, 1.0);
        assert_eq!(stats.evacuated, 1);
        assert_eq!(stats.actions, 1);
        assert_eq!(stats.location, b);
        assert_eq!(world.people(b), 0);
    }

    #[test]
    fn test_travel_costs_time_only() {
        let mut world = line_world();
        let a = world.vertex("A").unwrap();
        let b = world.vertex("B").unwrap();
        let mut stats = AgentStats::new("S", a);

        stats.travel(&world, b);

        assert_eq!(stats.score, -1.0);
        assert_eq!(stats.evacuated, 0);
        assert_eq!(world.people(b), 1);

        // A second visit finds nobody left to pick up
        world.clear_people(b);
        stats.commit(&mut world, a);
        assert_eq!(stats.evacuated, 0);
        assert_eq!(stats.time, 2.0);
    }

    #[test]
    fn test_summary_format() {
        let mut world = line_world();
        let a = world.vertex("A").unwrap();
        let b = world.vertex("B").unwrap();
        let mut stats = AgentStats::new("A1", a);
        stats.commit(&mut world, b);

        assert_eq!(
            stats.summary(&world).to_string(),
            "name: A1 score: 999 location: B time: 1 evacuated: 1 actions: 1"
        );
    }

    #[test]
    fn test_factory_names_are_unique() {
        let mut names: Vec<_> = all_factories().iter().map(|f| f.name()).collect();
        let count = names.len();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), count);
        assert!(names.contains(&"a-star".to_owned()));
    }
}
