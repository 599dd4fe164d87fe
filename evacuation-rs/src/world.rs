use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{
    environment::{Environment, EnvironmentError},
    graph::{Vertex, WeightedGraph},
};

/// Projected occupancy and breakage. Planning code passes these around by value so that
/// speculative search never touches the live [World].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Projection {
    pub people_status: BTreeMap<Vertex, u32>,
    pub broken_status: BTreeSet<Vertex>,
}

impl Projection {
    /// The projection after the given vertices have been visited
    pub fn visit(&self, world: &World, visited: &[Vertex]) -> Projection {
        Projection {
            people_status: world.simulate_people_status(visited, &self.people_status),
            broken_status: world.simulate_broken_vertices(visited, &self.broken_status),
        }
    }

    pub fn people_at(&self, v: Vertex) -> u32 {
        self.people_status.get(&v).copied().unwrap_or(0)
    }

    pub fn total_people(&self) -> u32 {
        self.people_status.values().sum()
    }

    /// Occupied vertices that can still be entered
    pub fn occupied(&self) -> BTreeSet<Vertex> {
        self.people_status
            .iter()
            .filter(|(v, people)| **people > 0 && !self.broken_status.contains(v))
            .map(|(v, _)| *v)
            .collect()
    }

    pub fn is_broken(&self, v: Vertex) -> bool {
        self.broken_status.contains(&v)
    }
}

/// The live state of a simulation: the graph, who is still waiting where, and which vertices
/// have broken.
///
/// There are two halves to the API. The `simulate_*` and query methods take `&self` and hand
/// back fresh values; they are what the planners use. [World::clear_people] and
/// [World::handle_brittle] mutate the live state and are only called when a move is actually
/// committed.
#[derive(Debug, Clone)]
pub struct World {
    graph: WeightedGraph,
    occupancy: BTreeMap<Vertex, u32>,
    broken: BTreeSet<Vertex>,
    agents_locations: Vec<Vertex>,
}

impl World {
    pub fn new(graph: WeightedGraph) -> Self {
        let occupancy = graph
            .vertices()
            .map(|v| (v, graph.info(v).people))
            .collect();

        Self {
            graph,
            occupancy,
            broken: BTreeSet::new(),
            agents_locations: vec![],
        }
    }

    pub fn from_environment(env: &Environment) -> Result<Self, EnvironmentError> {
        Ok(Self::new(env.build_graph()?))
    }

    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    pub fn vertex(&self, name: &str) -> Option<Vertex> {
        self.graph.vertex(name)
    }

    pub fn name(&self, v: Vertex) -> &str {
        self.graph.name(v)
    }

    pub fn neighbors(&self, v: Vertex) -> Vec<Vertex> {
        self.graph.neighbors(v)
    }

    /// Weight of the edge between two vertices.
    ///
    /// Panics if there is no such edge; callers only ask about moves they have already
    /// validated.
    pub fn weight(&self, a: Vertex, b: Vertex) -> f64 {
        self.graph
            .weight(a, b)
            .unwrap_or_else(|| panic!("No edge between {:?} and {:?}", a, b))
    }

    pub fn is_brittle(&self, v: Vertex) -> bool {
        self.graph.info(v).brittle
    }

    pub fn is_broken(&self, v: Vertex) -> bool {
        self.broken.contains(&v)
    }

    pub fn broken(&self) -> &BTreeSet<Vertex> {
        &self.broken
    }

    pub fn people(&self, v: Vertex) -> u32 {
        self.occupancy.get(&v).copied().unwrap_or(0)
    }

    pub fn total_people(&self) -> u32 {
        self.occupancy.values().sum()
    }

    /// `dst` is adjacent to `src` and has not broken
    pub fn valid_action(&self, src: Vertex, dst: Vertex) -> bool {
        self.graph.is_neighbor(src, dst) && !self.is_broken(dst)
    }

    /// A copy of `prior` with every visited vertex emptied
    pub fn simulate_people_status(
        &self,
        visited: &[Vertex],
        prior: &BTreeMap<Vertex, u32>,
    ) -> BTreeMap<Vertex, u32> {
        let mut people = prior.clone();
        for v in visited {
            if let Some(count) = people.get_mut(v) {
                *count = 0;
            }
        }

        people
    }

    /// `prior` plus every visited vertex that is brittle
    pub fn simulate_broken_vertices(
        &self,
        visited: &[Vertex],
        prior: &BTreeSet<Vertex>,
    ) -> BTreeSet<Vertex> {
        let mut broken = prior.clone();
        broken.extend(visited.iter().filter(|v| self.is_brittle(**v)));

        broken
    }

    /// Snapshot of the live occupancy and breakage, used to seed a search root
    pub fn projection(&self) -> Projection {
        Projection {
            people_status: self.occupancy.clone(),
            broken_status: self.broken.clone(),
        }
    }

    /// Breaks `v` if it is brittle. Called by the simulator right after a move lands on `v`.
    pub fn handle_brittle(&mut self, v: Vertex) {
        if self.is_brittle(v) && self.broken.insert(v) {
            debug!(vertex = self.name(v), "vertex broke");
        }
    }

    /// Empties `v`, returning how many people were there
    pub fn clear_people(&mut self, v: Vertex) -> u32 {
        self.occupancy
            .get_mut(&v)
            .map(std::mem::take)
            .unwrap_or(0)
    }

    pub fn agents_locations(&self) -> &[Vertex] {
        &self.agents_locations
    }

    pub fn agent_location(&self, index: usize) -> Option<Vertex> {
        self.agents_locations.get(index).copied()
    }

    pub fn set_agent_location(&mut self, index: usize, v: Vertex) {
        if index >= self.agents_locations.len() {
            self.agents_locations.resize(index + 1, v);
        }
        self.agents_locations[index] = v;
    }
}
