use std::cmp::{max, min};

use derivative::Derivative;
use itertools::Itertools;
use evacuation_rs::{
    agents::{AgentFactory, AgentOptions, AgentStats, BoxedAgent, EvacuationAgent},
    cost,
    heuristics::{AllEvacuated, GoalTest},
    Cost, Vertex, World,
};
use tracing::{info, info_span, warn};

use super::{Action, GameNode, MinMaxReturn, MstPotential, Outcome, Stance, StaticEvaluator};

#[derive(Debug, Clone, Copy)]
/// Optional properties that can be defined for a [GameTreeAgent]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use evacuation_minimax::game_tree::GameTreeOptions;
///
/// let defaults: GameTreeOptions = Default::default();
///
/// assert_eq!(defaults.max_depth, 10);
/// assert!(defaults.pruning);
/// ```
pub struct GameTreeOptions {
    /// How many plies to look ahead before falling back to the static evaluator. One ply is a
    /// single player's action, so a depth of 2 is one full round. Anything below 1 is treated
    /// as 1, since the root has to be expanded to pick an action at all.
    ///
    /// Defaults to 10
    pub max_depth: usize,
    /// Whether to use alpha-beta pruning where the stance allows it. Turning it off gives plain
    /// minimax, which picks the same action but looks at more of the tree.
    ///
    /// Defaults to true
    pub pruning: bool,
}

impl Default for GameTreeOptions {
    fn default() -> Self {
        Self {
            max_depth: 10,
            pruning: true,
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
/// An agent that plans by searching the game tree it shares with one partner
///
/// The partner is whoever plays the next index in the world's agent list. Plies alternate
/// between the two, starting with this agent, and only the first action of the chosen route is
/// ever executed; the tree is searched again next turn.
///
/// It also outputs traces using the [tracing] crate.
pub struct GameTreeAgent<S = MstPotential, T = AllEvacuated> {
    stats: AgentStats,
    index: usize,
    stance: Stance,
    options: GameTreeOptions,
    #[derivative(Debug = "ignore")]
    evaluator: S,
    #[derivative(Debug = "ignore")]
    terminal_test: T,
}

impl GameTreeAgent {
    /// An agent that treats its partner as an opponent
    pub fn adversarial(
        name: impl Into<String>,
        index: usize,
        start: Vertex,
        options: GameTreeOptions,
    ) -> Self {
        Self::with_stance(name, index, start, Stance::Adversarial, options)
    }

    /// An agent that looks after itself first but doesn't mind helping
    pub fn semi_cooperative(
        name: impl Into<String>,
        index: usize,
        start: Vertex,
        options: GameTreeOptions,
    ) -> Self {
        Self::with_stance(name, index, start, Stance::SemiCooperative, options)
    }

    /// An agent that only cares about the combined score
    pub fn fully_cooperative(
        name: impl Into<String>,
        index: usize,
        start: Vertex,
        options: GameTreeOptions,
    ) -> Self {
        Self::with_stance(name, index, start, Stance::FullyCooperative, options)
    }

    /// Construct a new `GameTreeAgent` with the default evaluator and terminal test
    pub fn with_stance(
        name: impl Into<String>,
        index: usize,
        start: Vertex,
        stance: Stance,
        options: GameTreeOptions,
    ) -> Self {
        Self::new(
            name,
            index,
            start,
            stance,
            MstPotential,
            AllEvacuated,
            options,
        )
    }
}

impl<S, T> GameTreeAgent<S, T>
where
    S: StaticEvaluator,
    T: GoalTest<[Vertex; 2]>,
{
    /// Construct a new `GameTreeAgent`
    pub fn new(
        name: impl Into<String>,
        index: usize,
        start: Vertex,
        stance: Stance,
        evaluator: S,
        terminal_test: T,
        options: GameTreeOptions,
    ) -> Self {
        let options = GameTreeOptions {
            max_depth: options.max_depth.max(1),
            ..options
        };

        Self {
            stats: AgentStats::new(name, start),
            index,
            stance,
            options,
            evaluator,
            terminal_test,
        }
    }

    /// The stance this agent plays with
    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Where the partner is in the live world. Without a partner the agent plays against a
    /// copy of itself standing on the same vertex.
    fn partner_location(&self, world: &World) -> Vertex {
        let locations = world.agents_locations();
        if locations.len() < 2 {
            return self.stats.location;
        }

        locations[(self.index + 1) % locations.len()]
    }

    /// Searches the game tree from the live world.
    ///
    /// Returns the tree along with the number of nodes that were visited.
    pub fn search(&self, world: &World) -> (MinMaxReturn, usize) {
        let root = GameNode::root([self.stats.location, self.partner_location(world)], world);
        let mut visited = 0;

        info_span!(
            "game_tree",
            name = %self.stats.name,
            stance = %self.stance,
            max_depth = self.options.max_depth,
            pruning = self.options.pruning,
            chosen_action = tracing::field::Empty,
            chosen_route = tracing::field::Empty,
            visited = tracing::field::Empty,
        )
        .in_scope(|| {
            let result = self.minimax(
                world,
                &root,
                [cost(0.0); 2],
                0,
                cost(f64::NEG_INFINITY),
                cost(f64::INFINITY),
                &mut visited,
            );

            let current_span = tracing::Span::current();
            current_span.record(
                "chosen_action",
                format!("{:?}", result.best_action(0)).as_str(),
            );
            current_span.record(
                "chosen_route",
                result
                    .chosen_route()
                    .iter()
                    .map(|(player, action)| format!("P{} {}", player, action))
                    .join(", ")
                    .as_str(),
            );
            current_span.record("visited", visited as u64);

            (result, visited)
        })
    }

    fn actions(&self, node: &GameNode, player: usize, world: &World) -> Vec<Action> {
        let mut actions = vec![Action::NoOp];
        actions.extend(
            world
                .neighbors(node.location[player])
                .into_iter()
                .filter(|v| !node.projection.is_broken(*v))
                .map(Action::Traverse),
        );

        actions
    }

    /// The state after `player` takes `action`, and how many people it picked up doing so
    fn apply(
        &self,
        node: &GameNode,
        player: usize,
        action: Action,
        world: &World,
    ) -> (GameNode, u32) {
        match action {
            Action::NoOp => (node.child(None, node.location, &[], node.g, node.f, world), 0),
            Action::Traverse(dst) => {
                let mut location = node.location;
                location[player] = dst;
                let g = node.g + cost(world.weight(node.location[player], dst));

                (
                    node.child(None, location, &[dst], g, node.f, world),
                    node.projection.people_at(dst),
                )
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        world: &World,
        node: &GameNode,
        scores: [Cost; 2],
        depth: usize,
        mut alpha: Cost,
        mut beta: Cost,
        visited: &mut usize,
    ) -> MinMaxReturn {
        *visited += 1;

        if depth > 0 && self.terminal_test.is_goal(node) {
            return MinMaxReturn::Leaf {
                score: Outcome::at_depth(scores, depth),
            };
        }

        if depth >= self.options.max_depth {
            let [mine, partner] = self.evaluator.estimate(node, world);

            return MinMaxReturn::Leaf {
                score: Outcome::at_depth([scores[0] + mine, scores[1] + partner], depth),
            };
        }

        let player = depth % 2;
        let is_maximizing = self.stance.is_maximizing(player);
        let pruning = self.options.pruning && self.stance.can_prune();

        let mut options: Vec<(Action, MinMaxReturn)> = vec![];
        let mut alpha_beta_cutoff = false;

        for action in self.actions(node, player, world) {
            let (child, rescued) = self.apply(node, player, action, world);
            let mut child_scores = scores;
            child_scores[player] += cost(rescued as f64);

            let result = self.minimax(
                world,
                &child,
                child_scores,
                depth + 1,
                alpha,
                beta,
                visited,
            );
            let value = result.score().adversarial_value();
            options.push((action, result));

            if !pruning {
                continue;
            }

            if is_maximizing {
                if value >= beta {
                    alpha_beta_cutoff = true;
                    break;
                }

                alpha = max(alpha, value);
            } else {
                if value <= alpha {
                    alpha_beta_cutoff = true;
                    break;
                }

                beta = min(beta, value);
            }
        }

        // Stable, so among equally good actions the first one generated stays in front
        options.sort_by(|(_, a), (_, b)| self.stance.prefer(player, b.score(), a.score()));
        let chosen_score = *options[0].1.score();

        MinMaxReturn::Node {
            is_maximizing,
            options,
            moving_player: player,
            score: chosen_score,
            alpha_beta_cutoff,
            depth,
        }
    }
}

impl<S, T> EvacuationAgent for GameTreeAgent<S, T>
where
    S: StaticEvaluator,
    T: GoalTest<[Vertex; 2]>,
{
    fn act(&mut self, world: &mut World) -> Option<Vertex> {
        if self.stats.terminated {
            return None;
        }

        let here = self.stats.location;
        let root = GameNode::root([here, self.partner_location(world)], world);
        if self.terminal_test.is_goal(&root) {
            info!(name = %self.stats.name, "everyone is out, nothing left to do");
            self.stats.terminate();
            return None;
        }

        let (result, visited) = self.search(world);
        let dst = result.best_action(0)?.destination()?;

        if !world.valid_action(here, dst) {
            warn!(
                name = %self.stats.name,
                from = world.name(here),
                to = world.name(dst),
                "chosen action is not a valid move, staying put"
            );
            return None;
        }

        info!(name = %self.stats.name, to = world.name(dst), visited, "moving");
        self.stats.commit(world, dst);

        Some(dst)
    }

    fn stats(&self) -> &AgentStats {
        &self.stats
    }
}

fn game_options(options: &AgentOptions) -> GameTreeOptions {
    GameTreeOptions {
        max_depth: options.max_depth,
        ..Default::default()
    }
}

#[derive(Debug, Clone, Copy)]
/// Builds [GameTreeAgent::adversarial] agents
pub struct AdversarialFactory {}

impl AgentFactory for AdversarialFactory {
    fn name(&self) -> String {
        "adversarial".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, options: &AgentOptions) -> BoxedAgent {
        Box::new(GameTreeAgent::adversarial(
            format!("adversarial-{}", index),
            index,
            start,
            game_options(options),
        ))
    }
}

#[derive(Debug, Clone, Copy)]
/// Builds [GameTreeAgent::semi_cooperative] agents
pub struct SemiCooperativeFactory {}

impl AgentFactory for SemiCooperativeFactory {
    fn name(&self) -> String {
        "semi-cooperative".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, options: &AgentOptions) -> BoxedAgent {
        Box::new(GameTreeAgent::semi_cooperative(
            format!("semi-cooperative-{}", index),
            index,
            start,
            game_options(options),
        ))
    }
}

#[derive(Debug, Clone, Copy)]
/// Builds [GameTreeAgent::fully_cooperative] agents
pub struct CooperativeFactory {}

impl AgentFactory for CooperativeFactory {
    fn name(&self) -> String {
        "cooperative".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, options: &AgentOptions) -> BoxedAgent {
        Box::new(GameTreeAgent::fully_cooperative(
            format!("cooperative-{}", index),
            index,
            start,
            game_options(options),
        ))
    }
}

#[cfg(test)]
mod tests {
    use evacuation_rs::{Environment, Simulator, SimulatorOptions, WeightedGraph};

    use super::*;
    use crate::game_tree::NoEstimate;

    /// A - B - C in a line with one person on A and two on B
    fn line() -> (World, Vertex, Vertex, Vertex) {
        let mut graph = WeightedGraph::new();
        let a = graph.add_vertex("A", 1, false);
        let b = graph.add_vertex("B", 2, false);
        let c = graph.add_vertex("C", 0, false);
        graph.add_edge(a, b, 1.0);
        graph.add_edge(b, c, 1.0);

        (World::new(graph), a, b, c)
    }

    fn place(world: &mut World, me: Vertex, partner: Vertex) {
        world.set_agent_location(0, me);
        world.set_agent_location(1, partner);
    }

    #[test]
    fn test_pruning_picks_the_same_action() {
        let (mut world, a, _, c) = line();
        place(&mut world, c, a);

        let pruned = GameTreeAgent::adversarial(
            "pruned",
            0,
            c,
            GameTreeOptions {
                max_depth: 4,
                pruning: true,
            },
        );
        let plain = GameTreeAgent::adversarial(
            "plain",
            0,
            c,
            GameTreeOptions {
                max_depth: 4,
                pruning: false,
            },
        );

        let (pruned_result, pruned_visited) = pruned.search(&world);
        let (plain_result, plain_visited) = plain.search(&world);

        assert_eq!(pruned_result.best_action(0), plain_result.best_action(0));
        assert_eq!(
            pruned_result.score().adversarial_value(),
            plain_result.score().adversarial_value()
        );
        assert!(pruned_visited < plain_visited);
        assert_eq!(plain_visited, plain_result.node_count());
    }

    #[test]
    fn test_adversarial_grabs_the_crowd() {
        let (mut world, a, b, c) = line();
        place(&mut world, c, a);
        let mut agent = GameTreeAgent::adversarial("adv", 0, c, GameTreeOptions::default());

        assert_eq!(agent.act(&mut world), Some(b));
        assert_eq!(agent.stats().evacuated, 2);
        assert_eq!(world.people(b), 0);
    }

    #[test]
    fn test_zero_depth_still_looks_one_ply_ahead() {
        let (mut world, a, b, c) = line();
        place(&mut world, c, a);
        let mut agent = GameTreeAgent::adversarial(
            "shallow",
            0,
            c,
            GameTreeOptions {
                max_depth: 0,
                ..Default::default()
            },
        );

        let (result, _) = agent.search(&world);
        assert!(matches!(result, MinMaxReturn::Node { depth: 0, .. }));
        assert_eq!(agent.act(&mut world), Some(b));
    }

    #[test]
    fn test_semi_cooperative_rescues() {
        let (mut world, a, b, c) = line();
        place(&mut world, c, a);
        let agent = GameTreeAgent::semi_cooperative(
            "semi",
            0,
            c,
            GameTreeOptions {
                max_depth: 4,
                ..Default::default()
            },
        );

        let (result, _) = agent.search(&world);

        assert_eq!(result.best_action(0), Some(Action::Traverse(b)));
        assert!(result.chosen_route().len() >= 2);
    }

    #[test]
    fn test_fully_cooperative_splits_the_work() {
        // The partner starts on B without having picked anyone up. Fastest for the team is for
        // this agent to take B while the partner goes for A.
        let (mut world, a, b, c) = line();
        place(&mut world, c, b);
        let agent = GameTreeAgent::new(
            "coop",
            0,
            c,
            Stance::FullyCooperative,
            NoEstimate,
            AllEvacuated,
            GameTreeOptions {
                max_depth: 6,
                ..Default::default()
            },
        );

        let (result, _) = agent.search(&world);
        let score = result.score();

        assert_eq!(score.scores[0] + score.scores[1], cost(3.0));
        assert_eq!(score.tempo, cost(0.5));
        assert_eq!(
            result.chosen_route(),
            vec![(0, Action::Traverse(b)), (1, Action::Traverse(a))]
        );
    }

    #[test]
    fn test_static_evaluator_is_pluggable() {
        let (mut world, a, b, c) = line();
        place(&mut world, c, a);

        let shallow = GameTreeOptions {
            max_depth: 1,
            ..Default::default()
        };
        let flat = |_: &GameNode, _: &World| [cost(0.5), cost(0.0)];
        let agent = GameTreeAgent::new(
            "flat",
            0,
            c,
            Stance::Adversarial,
            flat,
            AllEvacuated,
            shallow,
        );
        let (result, _) = agent.search(&world);

        assert_eq!(result.best_action(0), Some(Action::Traverse(b)));
        assert_eq!(result.score().scores[0], cost(2.5));

        let blind = GameTreeAgent::new(
            "blind",
            0,
            c,
            Stance::Adversarial,
            NoEstimate,
            AllEvacuated,
            shallow,
        );
        assert_eq!(blind.search(&world).0.score().scores[0], cost(2.0));
    }

    #[test]
    fn test_terminates_when_everyone_is_out() {
        let mut graph = WeightedGraph::new();
        let a = graph.add_vertex("A", 0, false);
        let b = graph.add_vertex("B", 0, false);
        graph.add_edge(a, b, 1.0);
        let mut world = World::new(graph);
        place(&mut world, a, b);

        let mut agent = GameTreeAgent::adversarial("adv", 0, a, GameTreeOptions::default());

        assert_eq!(agent.act(&mut world), None);
        assert!(agent.is_terminated());
    }

    #[test]
    fn test_two_agents_play_a_full_game() {
        let env = Environment::from_json(include_str!(
            "../../../evacuation-rs/fixtures/crossroads.json"
        ))
        .unwrap();
        let world = World::from_environment(&env).unwrap();
        let options = AgentOptions {
            max_depth: 4,
            ..Default::default()
        };

        let agents = vec![
            SemiCooperativeFactory {}.create(0, world.vertex("0").unwrap(), &options),
            SemiCooperativeFactory {}.create(1, world.vertex("6").unwrap(), &options),
        ];
        let report = Simulator::new(world, agents, SimulatorOptions { max_rounds: 30 }).run();

        let evacuated: u32 = report.agents.iter().map(|a| a.evacuated).sum();
        assert!(evacuated > 0);
        assert_eq!(evacuated + report.people_left, 11);
    }
}
