use tracing::{debug, info};

use super::{AgentFactory, AgentOptions, AgentStats, BoxedAgent, EvacuationAgent};
use crate::{graph::Vertex, world::World};

/// Heads for whichever occupied vertex is closest right now, one step per turn.
///
/// No look-ahead at all: the target is picked fresh every turn from the live world, and ties
/// go to the lowest vertex index.
pub struct StupidGreedy {
    stats: AgentStats,
}

impl StupidGreedy {
    pub fn new(name: impl Into<String>, start: Vertex) -> Self {
        Self {
            stats: AgentStats::new(name, start),
        }
    }

    /// Path to the nearest occupied vertex, not counting the one the agent stands on
    fn next_path(&self, world: &World) -> Option<(f64, Vec<Vertex>)> {
        let here = self.stats.location;
        // Standing on a vertex that just broke doesn't stop the agent from leaving it
        let mut blocked = world.broken().clone();
        blocked.remove(&here);

        world
            .projection()
            .occupied()
            .into_iter()
            .filter(|v| *v != here)
            .map(|v| world.graph().shortest_path(here, v, &blocked))
            .filter(|(distance, path)| distance.is_finite() && path.len() > 1)
            .fold(None, |best: Option<(f64, Vec<Vertex>)>, candidate| match best {
                Some(best) if best.0 <= candidate.0 => Some(best),
                _ => Some(candidate),
            })
    }
}

impl EvacuationAgent for StupidGreedy {
    fn act(&mut self, world: &mut World) -> Option<Vertex> {
        if self.stats.terminated {
            return None;
        }

        let Some((distance, path)) = self.next_path(world) else {
            info!(name = %self.stats.name, "no one left within reach");
            self.stats.terminate();
            return None;
        };

        let dst = path[1];
        debug!(
            name = %self.stats.name,
            target = world.name(path[path.len() - 1]),
            distance,
            "heading for nearest occupant"
        );
        self.stats.commit(world, dst);

        Some(dst)
    }

    fn stats(&self) -> &AgentStats {
        &self.stats
    }
}

pub struct StupidGreedyFactory {}

impl AgentFactory for StupidGreedyFactory {
    fn name(&self) -> String {
        "stupid-greedy".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, _options: &AgentOptions) -> BoxedAgent {
        Box::new(StupidGreedy::new(format!("stupid-greedy-{}", index), start))
    }
}
