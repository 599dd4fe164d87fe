use std::{
    cmp::Ordering,
    fmt::{self, Display},
};

use evacuation_rs::{cost, Cost, Vertex};

/// How the two players feel about each other's rescues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    /// Zero sum: every person the partner saves counts against us. The searching player
    /// maximizes `mine - partner`, the partner minimizes it.
    Adversarial,
    /// Each player looks after its own score first and only uses the other's score to break
    /// ties
    SemiCooperative,
    /// Both players maximize the combined score
    FullyCooperative,
}

impl Stance {
    /// Whether alpha-beta pruning is sound for this stance
    pub fn can_prune(self) -> bool {
        matches!(self, Stance::Adversarial)
    }

    /// Compares two outcomes from the point of view of `mover`.
    ///
    /// [Ordering::Greater] means `mover` would rather end up in `a`.
    pub fn prefer(self, mover: usize, a: &Outcome, b: &Outcome) -> Ordering {
        match self {
            Stance::Adversarial => {
                let ordering = a.adversarial_value().cmp(&b.adversarial_value());
                if mover == 0 {
                    ordering
                } else {
                    ordering.reverse()
                }
            }
            Stance::SemiCooperative => a.selfish_key(mover).cmp(&b.selfish_key(mover)),
            Stance::FullyCooperative => a.joint_value().cmp(&b.joint_value()),
        }
    }

    /// Whether `mover` is the maximizing side of the tree
    pub fn is_maximizing(self, mover: usize) -> bool {
        match self {
            Stance::Adversarial => mover == 0,
            Stance::SemiCooperative | Stance::FullyCooperative => true,
        }
    }
}

impl Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stance::Adversarial => write!(f, "adversarial"),
            Stance::SemiCooperative => write!(f, "semi-cooperative"),
            Stance::FullyCooperative => write!(f, "cooperative"),
        }
    }
}

/// What a player can do on its ply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Stay where you are
    NoOp,
    /// Move along an edge to this vertex
    Traverse(Vertex),
}

impl Action {
    /// The vertex this action moves to, if it moves at all
    pub fn destination(self) -> Option<Vertex> {
        match self {
            Action::NoOp => None,
            Action::Traverse(v) => Some(v),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NoOp => write!(f, "no-op"),
            Action::Traverse(v) => write!(f, "traverse {}", v.index()),
        }
    }
}

/// The score at a leaf of the game tree.
///
/// `scores[0]` belongs to the searching player and `scores[1]` to its partner. `tempo` is
/// `1 / depth` of the leaf, so reaching the same scores sooner is worth a little more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outcome {
    /// People rescued (plus any static estimate) by each player
    pub scores: [Cost; 2],
    /// Bonus for getting there early
    pub tempo: Cost,
}

impl Outcome {
    /// An outcome reached at `depth` plies below the root
    pub fn at_depth(scores: [Cost; 2], depth: usize) -> Self {
        Self {
            scores,
            tempo: cost(1.0 / depth.max(1) as f64),
        }
    }

    /// `mine - partner + tempo`
    pub fn adversarial_value(&self) -> Cost {
        self.scores[0] - self.scores[1] + self.tempo
    }

    /// The mover's own score plus tempo, then the other player's score
    pub fn selfish_key(&self, mover: usize) -> (Cost, Cost) {
        (
            self.scores[mover % 2] + self.tempo,
            self.scores[(mover + 1) % 2],
        )
    }

    /// `mine + partner + tempo`
    pub fn joint_value(&self) -> Cost {
        self.scores[0] + self.scores[1] + self.tempo
    }
}
