use evacuation_rs::{cost, heuristics::mst_from, Cost, StateNode, Vertex, World};

/// A state in the two player game: the searching player's location first, then the partner's
pub type GameNode = StateNode<[Vertex; 2]>;

/// Guesses how many more people each player will rescue from a state the search stopped at
///
/// Closures with the same signature work too.
pub trait StaticEvaluator {
    /// One estimate per player, in the same order as the node's locations
    fn estimate(&self, node: &GameNode, world: &World) -> [Cost; 2];
}

impl<F> StaticEvaluator for F
where
    F: Fn(&GameNode, &World) -> [Cost; 2],
{
    fn estimate(&self, node: &GameNode, world: &World) -> [Cost; 2] {
        (self)(node, world)
    }
}

/// The people still waiting, discounted by how far a player is from all of them:
/// `remaining / (1 + mst)` where `mst` is the spanning tree joining the player's location with
/// every occupied vertex.
#[derive(Debug, Clone, Copy, Default)]
pub struct MstPotential;

impl StaticEvaluator for MstPotential {
    fn estimate(&self, node: &GameNode, world: &World) -> [Cost; 2] {
        let projection = &node.projection;
        let occupied = projection.occupied();
        let remaining: u32 = occupied.iter().map(|v| projection.people_at(*v)).sum();

        if remaining == 0 {
            return [cost(0.0); 2];
        }

        node.location.map(|location| {
            let mut blocked = projection.broken_status.clone();
            blocked.remove(&location);

            let mst = mst_from(location, &occupied, &blocked, world);

            cost(remaining as f64 / (1.0 + mst))
        })
    }
}

/// No estimate at all: only people actually rescued count
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEstimate;

impl StaticEvaluator for NoEstimate {
    fn estimate(&self, _node: &GameNode, _world: &World) -> [Cost; 2] {
        [cost(0.0); 2]
    }
}
