use std::fmt::{self, Display};

use crate::graph::Vertex;

/// Why a search or a planned move didn't work out.
///
/// None of these escape an agent: an agent that hits one logs it and terminates itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The fringe ran dry without reaching a goal
    Unreachable,
    /// The node budget ran out before a goal was found
    Exhausted { expanded: usize },
    /// The next step of a cached plan is no longer a valid move in the live world
    StaleMove { from: Vertex, to: Vertex },
    /// `pop` was called on an empty fringe
    EmptyFringe,
}

impl Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Unreachable => write!(f, "no reachable goal state"),
            SearchError::Exhausted { expanded } => {
                write!(f, "node budget exhausted after {} expansions", expanded)
            }
            SearchError::StaleMove { from, to } => write!(
                f,
                "planned move {} -> {} is no longer valid",
                from.index(),
                to.index()
            ),
            SearchError::EmptyFringe => write!(f, "pop from an empty fringe"),
        }
    }
}

impl std::error::Error for SearchError {}
