use tracing::debug;

use super::{AgentFactory, AgentOptions, AgentStats, BoxedAgent, EvacuationAgent};
use crate::{graph::Vertex, world::World};

/// Goes out of its way to break things.
///
/// Each turn it steps toward the closest brittle vertex that is still intact. It never picks
/// anyone up, so its score only ever goes down.
pub struct Saboteur {
    stats: AgentStats,
}

impl Saboteur {
    pub fn new(name: impl Into<String>, start: Vertex) -> Self {
        Self {
            stats: AgentStats::new(name, start),
        }
    }

    fn next_target(&self, world: &World) -> Option<Vec<Vertex>> {
        let here = self.stats.location;
        let mut blocked = world.broken().clone();
        blocked.remove(&here);

        world
            .graph()
            .vertices()
            .filter(|v| *v != here && world.is_brittle(*v) && !world.is_broken(*v))
            .map(|v| world.graph().shortest_path(here, v, &blocked))
            .filter(|(distance, path)| distance.is_finite() && path.len() > 1)
            .fold(None, |best: Option<(f64, Vec<Vertex>)>, candidate| match best {
                Some(best) if best.0 <= candidate.0 => Some(best),
                _ => Some(candidate),
            })
            .map(|(_, path)| path)
    }
}

impl EvacuationAgent for Saboteur {
    fn act(&mut self, world: &mut World) -> Option<Vertex> {
        if self.stats.terminated {
            return None;
        }

        let path = self.next_target(world)?;
        let dst = path[1];
        debug!(
            name = %self.stats.name,
            target = world.name(path[path.len() - 1]),
            "on the way to break something"
        );
        self.stats.travel(world, dst);

        Some(dst)
    }

    fn stats(&self) -> &AgentStats {
        &self.stats
    }
}

pub struct SaboteurFactory {}

impl AgentFactory for SaboteurFactory {
    fn name(&self) -> String {
        "saboteur".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, _options: &AgentOptions) -> BoxedAgent {
        Box::new(Saboteur::new(format!("saboteur-{}", index), start))
    }
}
