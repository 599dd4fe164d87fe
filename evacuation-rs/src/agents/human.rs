use std::io::{BufRead, BufReader};

use tracing::warn;

use super::{AgentFactory, AgentOptions, AgentStats, BoxedAgent, EvacuationAgent};
use crate::{graph::Vertex, world::World};

/// Moves wherever the person at the keyboard says.
///
/// Each turn reads one line: a vertex name moves there, an empty line stays put, and a negative
/// number gives up.
pub struct HumanAgent {
    stats: AgentStats,
    input: Box<dyn BufRead + Send>,
}

impl HumanAgent {
    pub fn new(name: impl Into<String>, start: Vertex, input: Box<dyn BufRead + Send>) -> Self {
        Self {
            stats: AgentStats::new(name, start),
            input,
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();

        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_owned()),
            Err(e) => {
                warn!(error = %e, "could not read a move");
                None
            }
        }
    }
}

impl EvacuationAgent for HumanAgent {
    fn act(&mut self, world: &mut World) -> Option<Vertex> {
        if self.stats.terminated {
            return None;
        }

        // Running out of input means nobody is left to give orders
        let Some(line) = self.read_line() else {
            self.stats.terminate();
            return None;
        };

        if line.is_empty() {
            return None;
        }

        if line.parse::<i64>().map_or(false, |n| n < 0) {
            self.stats.terminate();
            return None;
        }

        let from = self.stats.location;
        let dst = world
            .vertex(&line)
            .filter(|dst| world.valid_action(from, *dst));

        match dst {
            Some(dst) => {
                self.stats.commit(world, dst);
                Some(dst)
            }
            None => {
                warn!(input = %line, from = world.name(from), "not a valid move, staying put");
                None
            }
        }
    }

    fn stats(&self) -> &AgentStats {
        &self.stats
    }
}

pub struct HumanFactory {}

impl AgentFactory for HumanFactory {
    fn name(&self) -> String {
        "human".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, _options: &AgentOptions) -> BoxedAgent {
        let input = Box::new(BufReader::new(std::io::stdin()));

        Box::new(HumanAgent::new(format!("human-{}", index), start, input))
    }
}
