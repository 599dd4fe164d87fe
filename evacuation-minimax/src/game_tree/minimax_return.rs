use text_trees::StringTreeNode;

use super::{Action, Outcome};

#[derive(Debug, Clone)]
/// This is returned from a run of the game tree search
/// It contains everything we generated about the tree
pub enum MinMaxReturn {
    /// A non-leaf node in the game tree
    /// We have information about all the actions we looked at as well as the chosen outcome
    Node {
        /// Whether the moving player was on the maximizing side
        is_maximizing: bool,
        /// A 'recursive' look at all the actions under us
        /// Sorted by how much the moving player likes them, so the first element is always the
        /// chosen action. Its [MinMaxReturn::score()] always equals the score of this node
        options: Vec<(Action, Self)>,
        /// Which player was moving at this node: 0 is the searching player, 1 its partner
        moving_player: usize,
        /// The chosen outcome
        score: Outcome,
        /// Whether the remaining actions were skipped because of an alpha-beta cutoff
        alpha_beta_cutoff: bool,
        /// Plies below the root
        depth: usize,
    },
    /// A leaf in the game tree
    /// This happens when everyone has been evacuated or when we reach the maximum depth
    Leaf {
        #[allow(missing_docs)]
        score: Outcome,
    },
}

impl MinMaxReturn {
    /// Returns the outcome for this node
    pub fn score(&self) -> &Outcome {
        match self {
            MinMaxReturn::Node { score, .. } => score,
            MinMaxReturn::Leaf { score } => score,
        }
    }

    /// The action the given player should take first.
    /// If we are a leaf node, this returns None
    ///
    /// Options are sorted best first, so this is just the first option at the first layer
    /// where `player` moves along the chosen route
    pub fn best_action(&self, player: usize) -> Option<Action> {
        self.first_options_for_player(player)
            .and_then(|options| options.first().map(|x| x.0))
    }

    /// Return the first set of options for the given player along the chosen route
    pub fn first_options_for_player(&self, player: usize) -> Option<&Vec<(Action, Self)>> {
        match self {
            MinMaxReturn::Leaf { .. } => None,
            MinMaxReturn::Node {
                moving_player,
                options,
                ..
            } => {
                if *moving_player == player {
                    Some(options)
                } else {
                    let chosen = options.first()?;
                    chosen.1.first_options_for_player(player)
                }
            }
        }
    }

    /// Returns all the actions in the 'route' through the game tree that the search took
    /// This is useful for debugging as it shows what each player was expected to do
    pub fn chosen_route(&self) -> Vec<(usize, Action)> {
        match self {
            MinMaxReturn::Leaf { .. } => vec![],
            MinMaxReturn::Node {
                moving_player,
                options,
                ..
            } => {
                if let Some(chosen) = options.first() {
                    let mut tail = chosen.1.chosen_route();
                    tail.insert(0, (*moving_player, chosen.0));
                    tail
                } else {
                    vec![]
                }
            }
        }
    }

    /// Number of nodes, leaves included, in this tree
    pub fn node_count(&self) -> usize {
        match self {
            MinMaxReturn::Leaf { .. } => 1,
            MinMaxReturn::Node { options, .. } => {
                1 + options
                    .iter()
                    .map(|(_, child)| child.node_count())
                    .sum::<usize>()
            }
        }
    }

    /// This returns a visual representation of the game tree the search generated
    /// It shows the chosen outcome, the moving player and the action at each level, along with
    /// the depth, which side was moving and whether the rest of a layer was pruned
    pub fn to_text_tree(&self) -> Option<String> {
        let tree_node = self.to_text_tree_node("".to_owned())?;
        Some(format!("{}", tree_node))
    }

    fn to_text_tree_node(&self, label: String) -> Option<StringTreeNode> {
        match self {
            MinMaxReturn::Leaf { .. } => None,
            MinMaxReturn::Node {
                is_maximizing,
                moving_player,
                options,
                score,
                alpha_beta_cutoff,
                depth,
            } => {
                let mut node = StringTreeNode::new(format!(
                    "{} [d{} {}] mine={} partner={} tempo={}{}",
                    label,
                    depth,
                    if *is_maximizing { "max" } else { "min" },
                    score.scores[0].into_inner(),
                    score.scores[1].into_inner(),
                    score.tempo.into_inner(),
                    if *alpha_beta_cutoff { " pruned" } else { "" }
                ));
                for (action, result) in options {
                    if let Some(next_node) =
                        result.to_text_tree_node(format!("P{} {}", moving_player, action))
                    {
                        node.push_node(next_node);
                    }
                }

                Some(node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use evacuation_rs::{cost, Vertex};

    use super::*;

    fn leaf(mine: f64, partner: f64) -> MinMaxReturn {
        MinMaxReturn::Leaf {
            score: Outcome::at_depth([cost(mine), cost(partner)], 2),
        }
    }

    fn tree() -> MinMaxReturn {
        let a = Vertex::new(1);
        let b = Vertex::new(2);

        let partner_layer = MinMaxReturn::Node {
            is_maximizing: false,
            options: vec![
                (Action::NoOp, leaf(2.0, 0.0)),
                (Action::Traverse(a), leaf(2.0, 1.0)),
            ],
            moving_player: 1,
            score: *leaf(2.0, 0.0).score(),
            alpha_beta_cutoff: true,
            depth: 1,
        };

        MinMaxReturn::Node {
            is_maximizing: true,
            options: vec![
                (Action::Traverse(b), partner_layer),
                (Action::NoOp, leaf(0.0, 0.0)),
            ],
            moving_player: 0,
            score: *leaf(2.0, 0.0).score(),
            alpha_beta_cutoff: false,
            depth: 0,
        }
    }

    #[test]
    fn test_best_action_per_player() {
        let tree = tree();

        assert_eq!(tree.best_action(0), Some(Action::Traverse(Vertex::new(2))));
        assert_eq!(tree.best_action(1), Some(Action::NoOp));
        assert_eq!(leaf(0.0, 0.0).best_action(0), None);
    }

    #[test]
    fn test_chosen_route() {
        assert_eq!(
            tree().chosen_route(),
            vec![(0, Action::Traverse(Vertex::new(2))), (1, Action::NoOp)]
        );
    }

    #[test]
    fn test_text_tree_skips_leaves() {
        let text = tree().to_text_tree().unwrap();

        assert!(text.contains("P0 traverse 2 [d1 min]"));
        assert!(text.contains("[d0 max]"));
        assert!(text.contains("pruned"));
        assert!(!text.contains("P1"));
        assert_eq!(tree().node_count(), 5);
    }
}
