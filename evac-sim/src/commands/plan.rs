use std::path::PathBuf;

use color_eyre::eyre::Result;
use evacuation_rs::{
    heuristics::{AStarEvaluator, Evaluator, GreedyEvaluator, MstEstimate},
    BestFirstSearch, Cutoff, SearchOptions, Vertex, World,
};
use itertools::Itertools;

use super::{find_vertex, load_world};

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub(crate) enum Mode {
    AStar,
    Greedy,
    RealTime,
}

#[derive(clap::Args, Debug)]
pub(crate) struct Plan {
    /// Path to the environment description
    #[clap(short, long, value_parser)]
    environment: PathBuf,

    /// Vertex to plan from
    #[clap(short, long, value_parser)]
    start: String,

    /// Which planner to run
    #[clap(short, long, value_enum, default_value_t = Mode::AStar)]
    mode: Mode,

    /// Nodes the search may expand
    #[clap(long, value_parser, default_value_t = 10_000)]
    budget: usize,
}

impl Plan {
    pub(crate) fn run(self) -> Result<()> {
        let world = load_world(&self.environment)?;
        let start = find_vertex(&world, &self.start)?;
        let options = SearchOptions {
            node_budget: self.budget,
            ..Default::default()
        };

        match self.mode {
            Mode::AStar => print_plan(
                AStarEvaluator::<MstEstimate>::default(),
                &world,
                start,
                options,
                Cutoff::Hard,
            ),
            Mode::Greedy => print_plan(
                GreedyEvaluator::<MstEstimate>::default(),
                &world,
                start,
                options,
                Cutoff::Hard,
            ),
            Mode::RealTime => print_plan(
                AStarEvaluator::<MstEstimate>::default(),
                &world,
                start,
                options,
                Cutoff::Soft,
            ),
        }
    }
}

fn print_plan<E: Evaluator>(
    evaluator: E,
    world: &World,
    start: Vertex,
    options: SearchOptions,
    cutoff: Cutoff,
) -> Result<()> {
    let mut search = BestFirstSearch::new(evaluator, options);
    let plan = search.calculate_path(world, start, cutoff)?;

    println!(
        "Path: {}",
        plan.path.iter().map(|v| world.name(*v)).join(" -> ")
    );
    println!("Cost: {}", plan.cost.into_inner());
    println!("Status: {:?}", plan.status);
    println!("Expanded: {}", plan.expanded);

    Ok(())
}
