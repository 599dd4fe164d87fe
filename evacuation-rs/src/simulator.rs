use serde::Serialize;
use tracing::{info, info_span};

use crate::{
    agents::{AgentSummary, BoxedAgent},
    world::World,
};

#[derive(Debug, Clone, Copy)]
pub struct SimulatorOptions {
    pub max_rounds: usize,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self { max_rounds: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub rounds: usize,
    pub people_left: u32,
    pub broken: Vec<String>,
    pub agents: Vec<AgentSummary>,
}

/// Round-robin turn driver.
///
/// Agent `i` plays as index `i` in the world's agent list. Every round each agent that hasn't
/// terminated gets one turn, in order; a move that lands on a brittle vertex breaks it before
/// the next agent acts.
pub struct Simulator {
    world: World,
    agents: Vec<BoxedAgent>,
    options: SimulatorOptions,
}

impl Simulator {
    pub fn new(mut world: World, agents: Vec<BoxedAgent>, options: SimulatorOptions) -> Self {
        for (index, agent) in agents.iter().enumerate() {
            world.set_agent_location(index, agent.stats().location);
        }

        Self {
            world,
            agents,
            options,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn agents(&self) -> &[BoxedAgent] {
        &self.agents
    }

    /// Nobody left who can still be reached, or nobody left to reach them
    fn is_over(&self) -> bool {
        self.world.projection().occupied().is_empty()
            || self.agents.iter().all(|a| a.is_terminated())
    }

    /// Plays a single round. Returns how many agents moved.
    pub fn round(&mut self) -> usize {
        let mut moved = 0;

        for (index, agent) in self.agents.iter_mut().enumerate() {
            if agent.is_terminated() {
                continue;
            }

            if let Some(dst) = agent.act(&mut self.world) {
                self.world.handle_brittle(dst);
                self.world.set_agent_location(index, dst);
                moved += 1;
            }

            info!("{}", agent.stats().summary(&self.world));
        }

        moved
    }

    pub fn run(mut self) -> SimulationReport {
        let mut rounds = 0;

        while rounds < self.options.max_rounds && !self.is_over() {
            rounds += 1;
            info_span!("round", round = rounds).in_scope(|| self.round());
        }

        for agent in &self.agents {
            agent.end();
        }

        let report = SimulationReport {
            rounds,
            people_left: self.world.total_people(),
            broken: self
                .world
                .broken()
                .iter()
                .map(|v| self.world.name(*v).to_owned())
                .collect(),
            agents: self
                .agents
                .iter()
                .map(|a| a.stats().summary(&self.world))
                .collect(),
        };
        info!(
            rounds = report.rounds,
            people_left = report.people_left,
            "simulation finished"
        );

        report
    }
}
