use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use petgraph::{
    algo::{astar, dijkstra, min_spanning_tree},
    data::Element,
    graph::{NodeIndex, UnGraph},
    visit::{EdgeRef, NodeFiltered},
};

/// A vertex of the evacuation graph
pub type Vertex = NodeIndex;

/// Static attributes of a vertex, as read from the environment description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexInfo {
    pub name: String,
    pub people: u32,
    pub brittle: bool,
}

/// Undirected weighted graph with named vertices.
///
/// This is a thin layer over [petgraph] that speaks in terms of the queries the planners need:
/// neighbors, edge weights, shortest paths that avoid a set of vertices, and the size of the
/// minimum spanning tree over the shortest-distance closure of a vertex subset.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    graph: UnGraph<VertexInfo, f64>,
    names: HashMap<String, Vertex>,
}

impl WeightedGraph {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a vertex, or returns the existing one if the name is already known
    pub fn add_vertex(&mut self, name: &str, people: u32, brittle: bool) -> Vertex {
        if let Some(v) = self.names.get(name) {
            return *v;
        }

        let v = self.graph.add_node(VertexInfo {
            name: name.to_owned(),
            people,
            brittle,
        });
        self.names.insert(name.to_owned(), v);

        v
    }

    /// Adds an undirected edge. A second edge between the same pair keeps the lighter weight.
    pub fn add_edge(&mut self, a: Vertex, b: Vertex, weight: f64) {
        match self.graph.find_edge(a, b) {
            Some(e) => {
                if let Some(existing) = self.graph.edge_weight_mut(e) {
                    if weight < *existing {
                        *existing = weight;
                    }
                }
            }
            None => {
                self.graph.add_edge(a, b, weight);
            }
        }
    }

    pub fn vertex(&self, name: &str) -> Option<Vertex> {
        self.names.get(name).copied()
    }

    pub fn info(&self, v: Vertex) -> &VertexInfo {
        &self.graph[v]
    }

    pub fn name(&self, v: Vertex) -> &str {
        &self.graph[v].name
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.graph.node_indices()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Neighbors of `v`, in ascending vertex order so that searches expand deterministically
    pub fn neighbors(&self, v: Vertex) -> Vec<Vertex> {
        self.graph.neighbors(v).sorted().dedup().collect()
    }

    pub fn is_neighbor(&self, src: Vertex, dst: Vertex) -> bool {
        self.graph.find_edge(src, dst).is_some()
    }

    pub fn weight(&self, a: Vertex, b: Vertex) -> Option<f64> {
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    /// Shortest path from `src` to `dst` that never passes through an excluded vertex.
    ///
    /// Returns `(f64::INFINITY, vec![])` when `dst` can't be reached, or when either end is
    /// itself excluded.
    pub fn shortest_path(
        &self,
        src: Vertex,
        dst: Vertex,
        excluding: &BTreeSet<Vertex>,
    ) -> (f64, Vec<Vertex>) {
        if excluding.contains(&src) || excluding.contains(&dst) {
            return (f64::INFINITY, vec![]);
        }

        let filtered = NodeFiltered::from_fn(&self.graph, |n| !excluding.contains(&n));

        astar(&filtered, src, |n| n == dst, |e| *e.weight(), |_| 0.0)
            .unwrap_or((f64::INFINITY, vec![]))
    }

    /// Distances from `src` to every vertex reachable without touching an excluded vertex
    pub fn distances_from(&self, src: Vertex, excluding: &BTreeSet<Vertex>) -> HashMap<Vertex, f64> {
        if excluding.contains(&src) {
            return HashMap::new();
        }

        let filtered = NodeFiltered::from_fn(&self.graph, |n| !excluding.contains(&n));

        dijkstra(&filtered, src, None, |e| *e.weight())
    }

    /// Weight of the minimum spanning tree of the complete graph whose edge weights are the
    /// pairwise shortest-path distances among `vertices` (paths avoid `excluding`).
    ///
    /// Pairs with no connecting path get an infinite edge, so a subset that can't all be
    /// connected has an infinite tree.
    pub fn mst_size(&self, vertices: &BTreeSet<Vertex>, excluding: &BTreeSet<Vertex>) -> f64 {
        let members: Vec<Vertex> = vertices
            .iter()
            .filter(|v| !excluding.contains(v))
            .copied()
            .collect();

        if members.len() < 2 {
            return 0.0;
        }

        let mut closure: UnGraph<Vertex, f64> = UnGraph::default();
        let indices: Vec<NodeIndex> = members.iter().map(|v| closure.add_node(*v)).collect();

        for (i, src) in members.iter().enumerate() {
            let distances = self.distances_from(*src, excluding);

            for j in (i + 1)..members.len() {
                let d = distances
                    .get(&members[j])
                    .copied()
                    .unwrap_or(f64::INFINITY);
                closure.add_edge(indices[i], indices[j], d);
            }
        }

        min_spanning_tree(&closure)
            .filter_map(|element| match element {
                Element::Edge { weight, .. } => Some(weight),
                Element::Node { .. } => None,
            })
            .fold(0.0, |total, w| total + w)
    }
}
