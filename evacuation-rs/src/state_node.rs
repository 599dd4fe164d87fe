use std::hash::{Hash, Hasher};

use decorum::N64;

use crate::{graph::Vertex, world::Projection, world::World};

/// Path costs and priorities. A non-NaN float so that it is totally ordered and hashable;
/// infinity is allowed and means "can't get there".
pub type Cost = N64;

pub fn cost(value: f64) -> Cost {
    N64::from(value)
}

/// Index of a [StateNode] inside a [SearchTree]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A planning-time snapshot.
///
/// `L` is the location: a single [Vertex] for one agent, or `[Vertex; 2]` when two agents are
/// searched together. The projection is always derived from the parent's projection, never
/// re-read from the live [World], so a node only depends on the path that produced it.
///
/// Two nodes are equal when their location and projection are equal; cost fields and parent
/// links do not take part.
#[derive(Debug, Clone)]
pub struct StateNode<L> {
    pub location: L,
    pub projection: Projection,
    pub g: Cost,
    pub f: Cost,
    pub parent: Option<NodeId>,
}

/// What makes two states the same for the closed set
pub type StateKey<L> = (L, Projection);

impl<L: Clone> StateNode<L> {
    /// A root node seeded from the live projection. Nothing is visited by being placed at the
    /// root.
    pub fn root(location: L, world: &World) -> Self {
        Self {
            location,
            projection: world.projection(),
            g: cost(0.0),
            f: cost(0.0),
            parent: None,
        }
    }

    /// A child node after the moves landing on `visited`
    pub fn child(
        &self,
        parent: Option<NodeId>,
        location: L,
        visited: &[Vertex],
        g: Cost,
        f: Cost,
        world: &World,
    ) -> Self {
        Self {
            location,
            projection: self.projection.visit(world, visited),
            g,
            f,
            parent,
        }
    }

    pub fn key(&self) -> StateKey<L> {
        (self.location.clone(), self.projection.clone())
    }

    /// Nobody is left waiting on a vertex that can still be entered. People on broken vertices
    /// are stranded and don't count.
    pub fn is_evacuated(&self) -> bool {
        self.projection.occupied().is_empty()
    }
}

impl<L: PartialEq> PartialEq for StateNode<L> {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location && self.projection == other.projection
    }
}

impl<L: Eq> Eq for StateNode<L> {}

impl<L: Hash> Hash for StateNode<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.hash(state);
        self.projection.hash(state);
    }
}

/// Arena owning every node created by one search. Children refer to their parent by
/// [NodeId].
#[derive(Debug, Clone)]
pub struct SearchTree<L> {
    nodes: Vec<StateNode<L>>,
}

impl<L> Default for SearchTree<L> {
    fn default() -> Self {
        Self { nodes: vec![] }
    }
}

impl<L: Clone> SearchTree<L> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn insert(&mut self, node: StateNode<L>) -> NodeId {
        self.nodes.push(node);

        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &StateNode<L> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The nodes from the root down to `id`
    pub fn path_to(&self, id: NodeId) -> Vec<&StateNode<L>> {
        let mut path = vec![];
        let mut current = Some(id);

        while let Some(c) = current {
            let node = self.get(c);
            path.push(node);
            current = node.parent;
        }

        path.reverse();

        path
    }

    /// Locations from the root down to `id`
    pub fn locations_to(&self, id: NodeId) -> Vec<L> {
        self.path_to(id)
            .into_iter()
            .map(|node| node.location.clone())
            .collect()
    }
}
