use tracing::{info, info_span, warn};

use super::{AgentFactory, AgentOptions, AgentStats, BoxedAgent, EvacuationAgent};
use crate::{
    error::SearchError,
    graph::Vertex,
    heuristics::{AStarEvaluator, Evaluator, GreedyEvaluator},
    search::{BestFirstSearch, Cutoff, PlanStatus, SearchOptions},
    world::World,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanningMode {
    GreedyBestFirst,
    AStar,
    /// Bounded A*: a search that runs out of budget still yields a first step
    RealTime,
}

impl PlanningMode {
    fn cutoff(self) -> Cutoff {
        match self {
            PlanningMode::RealTime => Cutoff::Soft,
            PlanningMode::GreedyBestFirst | PlanningMode::AStar => Cutoff::Hard,
        }
    }
}

/// Plans a full evacuation route and then follows it one edge per turn.
///
/// A new plan is made whenever the cached one runs out. Before every step the move is checked
/// against the live world, because other agents may have broken a vertex on the route since the
/// plan was made.
#[derive(Debug)]
pub struct PlanningAgent<E> {
    stats: AgentStats,
    mode: PlanningMode,
    search: BestFirstSearch<E>,
    /// Remaining steps, next step last
    plan: Vec<Vertex>,
    expanded: usize,
}

impl PlanningAgent<GreedyEvaluator> {
    pub fn greedy(name: impl Into<String>, start: Vertex, options: SearchOptions) -> Self {
        Self::new(
            name,
            start,
            PlanningMode::GreedyBestFirst,
            GreedyEvaluator::default(),
            options,
        )
    }
}

impl PlanningAgent<AStarEvaluator> {
    pub fn a_star(name: impl Into<String>, start: Vertex, options: SearchOptions) -> Self {
        Self::new(
            name,
            start,
            PlanningMode::AStar,
            AStarEvaluator::default(),
            options,
        )
    }

    pub fn real_time(name: impl Into<String>, start: Vertex, options: SearchOptions) -> Self {
        Self::new(
            name,
            start,
            PlanningMode::RealTime,
            AStarEvaluator::default(),
            options,
        )
    }
}

impl<E: Evaluator> PlanningAgent<E> {
    pub fn new(
        name: impl Into<String>,
        start: Vertex,
        mode: PlanningMode,
        evaluator: E,
        options: SearchOptions,
    ) -> Self {
        Self {
            stats: AgentStats::new(name, start),
            mode,
            search: BestFirstSearch::new(evaluator, options),
            plan: vec![],
            expanded: 0,
        }
    }

    pub fn mode(&self) -> PlanningMode {
        self.mode
    }

    /// Nodes expanded across every search this agent has run
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    fn replan(&mut self, world: &World) -> Result<(), SearchError> {
        let plan = info_span!("replan", name = %self.stats.name, mode = ?self.mode)
            .in_scope(|| {
                self.search
                    .calculate_path(world, self.stats.location, self.mode.cutoff())
            })?;
        self.expanded += plan.expanded;

        self.plan = match plan.status {
            PlanStatus::Complete => plan.steps().iter().rev().copied().collect(),
            PlanStatus::InProgress => plan.steps().iter().take(1).copied().collect(),
        };

        Ok(())
    }

    fn give_up(&mut self, error: SearchError, world: &World) {
        warn!(
            name = %self.stats.name,
            location = world.name(self.stats.location),
            %error,
            "terminating"
        );
        self.plan.clear();
        self.stats.terminate();
    }
}

impl<E: Evaluator> EvacuationAgent for PlanningAgent<E> {
    fn act(&mut self, world: &mut World) -> Option<Vertex> {
        if self.stats.terminated {
            return None;
        }

        if self.plan.is_empty() {
            if let Err(error) = self.replan(world) {
                self.give_up(error, world);
                return None;
            }

            if self.plan.is_empty() {
                info!(name = %self.stats.name, "everyone is out, nothing left to do");
                self.stats.terminate();
                return None;
            }
        }

        let from = self.stats.location;
        let dst = self.plan.pop()?;

        if !world.valid_action(from, dst) {
            self.give_up(SearchError::StaleMove { from, to: dst }, world);
            return None;
        }

        self.stats.commit(world, dst);

        Some(dst)
    }

    fn stats(&self) -> &AgentStats {
        &self.stats
    }

    fn end(&self) {
        info!(name = %self.stats.name, expanded = self.expanded, "planner done");
    }
}

pub struct GreedyBestFirstFactory {}

impl AgentFactory for GreedyBestFirstFactory {
    fn name(&self) -> String {
        "greedy".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, options: &AgentOptions) -> BoxedAgent {
        Box::new(PlanningAgent::greedy(
            format!("greedy-{}", index),
            start,
            options.search,
        ))
    }
}

pub struct AStarFactory {}

impl AgentFactory for AStarFactory {
    fn name(&self) -> String {
        "a-star".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, options: &AgentOptions) -> BoxedAgent {
        Box::new(PlanningAgent::a_star(
            format!("a-star-{}", index),
            start,
            options.search,
        ))
    }
}

pub struct RealTimeFactory {}

impl AgentFactory for RealTimeFactory {
    fn name(&self) -> String {
        "real-time".to_owned()
    }

    fn create(&self, index: usize, start: Vertex, options: &AgentOptions) -> BoxedAgent {
        Box::new(PlanningAgent::real_time(
            format!("real-time-{}", index),
            start,
            options.search,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{environment::Environment, graph::WeightedGraph};

    fn load(json: &str) -> World {
        World::from_environment(&Environment::from_json(json).unwrap()).unwrap()
    }

    fn run_to_end(agent: &mut dyn EvacuationAgent, world: &mut World) -> Vec<Vertex> {
        let mut moves = vec![];
        for _ in 0..200 {
            if agent.is_terminated() {
                break;
            }
            if let Some(dst) = agent.act(world) {
                world.handle_brittle(dst);
                moves.push(dst);
            }
        }

        moves
    }

    #[test]
    fn test_a_star_agent_rescues() {
        let mut world = load(include_str!("../../fixtures/line.json"));
        let a = world.vertex("A").unwrap();
        let b = world.vertex("B").unwrap();
        let mut agent = PlanningAgent::a_star("A1", a, SearchOptions::default());

        assert_eq!(agent.act(&mut world), Some(b));
        assert_eq!(agent.stats().score, 999.0);
        assert_eq!(agent.stats().evacuated, 1);

        // Nothing left, so the next turn ends it
        assert_eq!(agent.act(&mut world), None);
        assert!(agent.is_terminated());
    }

    #[test]
    fn test_a_star_agent_follows_optimal_tour() {
        let mut world = load(include_str!("../../fixtures/tour.json"));
        let s = world.vertex("S").unwrap();
        let mut agent = PlanningAgent::a_star("A1", s, SearchOptions::default());

        let moves = run_to_end(&mut agent, &mut world);
        let names: Vec<_> = moves.iter().map(|v| world.name(*v)).collect();

        assert_eq!(names, vec!["P", "Q", "T"]);
        assert_eq!(agent.stats().time, 8.0);
        assert_eq!(agent.stats().evacuated, 6);
        assert_eq!(world.total_people(), 0);
    }

    #[test]
    fn test_greedy_agent_evacuates_everyone() {
        let mut world = load(include_str!("../../fixtures/tour.json"));
        let s = world.vertex("S").unwrap();
        let mut agent = PlanningAgent::greedy("G1", s, SearchOptions::default());

        run_to_end(&mut agent, &mut world);

        assert!(agent.is_terminated());
        assert_eq!(world.total_people(), 0);
        assert!(agent.stats().time >= 8.0);
    }

    #[test]
    fn test_real_time_agent_progresses_with_tiny_budget() {
        let mut world = load(include_str!("../../fixtures/tour.json"));
        let s = world.vertex("S").unwrap();
        let mut agent = PlanningAgent::real_time(
            "R1",
            s,
            SearchOptions {
                node_budget: 2,
                learn_estimates: true,
            },
        );

        let first = agent.act(&mut world);
        assert!(first.is_some());

        run_to_end(&mut agent, &mut world);

        assert_eq!(world.total_people(), 0);
        assert_eq!(agent.stats().evacuated, 6);
    }

    #[test]
    fn test_stale_plan_terminates_without_moving() {
        // A - D - B - C with people on B and C. B is brittle, which is fine for a plan that
        // ends just past it, as long as nobody else gets there first.
        let mut graph = WeightedGraph::new();
        let a = graph.add_vertex("A", 0, false);
        let b = graph.add_vertex("B", 1, true);
        let c = graph.add_vertex("C", 1, false);
        let d = graph.add_vertex("D", 0, false);
        graph.add_edge(a, d, 1.0);
        graph.add_edge(d, b, 1.0);
        graph.add_edge(b, c, 1.0);
        let mut world = World::new(graph);

        let mut agent = PlanningAgent::a_star("A1", a, SearchOptions::default());
        assert_eq!(agent.act(&mut world), Some(d));

        // Someone else breaks B before the agent gets there
        world.handle_brittle(b);

        assert_eq!(agent.act(&mut world), None);
        assert!(agent.is_terminated());
        assert_eq!(agent.stats().location, d);
        assert_eq!(agent.stats().actions, 1);
        assert_eq!(world.people(b), 1);
    }

    #[test]
    fn test_unreachable_terminates() {
        let mut graph = WeightedGraph::new();
        let a = graph.add_vertex("A", 0, false);
        let b = graph.add_vertex("B", 0, false);
        graph.add_vertex("C", 4, false);
        graph.add_edge(a, b, 1.0);
        let mut world = World::new(graph);

        let mut agent = PlanningAgent::a_star("A1", a, SearchOptions::default());

        assert_eq!(agent.act(&mut world), None);
        assert!(agent.is_terminated());
    }

    #[test]
    fn test_nothing_to_do_terminates() {
        let mut graph = WeightedGraph::new();
        let a = graph.add_vertex("A", 0, false);
        let b = graph.add_vertex("B", 0, false);
        graph.add_edge(a, b, 1.0);
        let mut world = World::new(graph);

        let mut agent = PlanningAgent::real_time("R1", a, SearchOptions::default());

        assert_eq!(agent.act(&mut world), None);
        assert!(agent.is_terminated());
        assert_eq!(agent.stats().actions, 0);
    }
}
