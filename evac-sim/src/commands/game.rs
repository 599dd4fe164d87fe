use std::path::PathBuf;

use color_eyre::eyre::Result;
use evacuation_minimax::game_tree::{Action, GameTreeAgent, GameTreeOptions, Stance};
use evacuation_rs::World;
use itertools::Itertools;

use super::{find_vertex, load_world};

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub(crate) enum StanceArg {
    Adversarial,
    SemiCooperative,
    Cooperative,
}

impl From<StanceArg> for Stance {
    fn from(arg: StanceArg) -> Self {
        match arg {
            StanceArg::Adversarial => Stance::Adversarial,
            StanceArg::SemiCooperative => Stance::SemiCooperative,
            StanceArg::Cooperative => Stance::FullyCooperative,
        }
    }
}

#[derive(clap::Args, Debug)]
pub(crate) struct Game {
    /// Path to the environment description
    #[clap(short, long, value_parser)]
    environment: PathBuf,

    /// Where the searching player stands
    #[clap(long, value_parser)]
    me: String,

    /// Where the partner stands
    #[clap(long, value_parser)]
    partner: String,

    /// How the two players value each other's rescues
    #[clap(short, long, value_enum, default_value_t = StanceArg::Adversarial)]
    stance: StanceArg,

    /// Plies to look ahead
    #[clap(
        short,
        long,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
        default_value_t = 6
    )]
    depth: usize,

    /// Search the whole tree even when alpha-beta pruning would be sound
    #[clap(long)]
    no_pruning: bool,
}

impl Game {
    pub(crate) fn run(self) -> Result<()> {
        let mut world = load_world(&self.environment)?;
        let me = find_vertex(&world, &self.me)?;
        let partner = find_vertex(&world, &self.partner)?;
        world.set_agent_location(0, me);
        world.set_agent_location(1, partner);

        let agent = GameTreeAgent::with_stance(
            "me",
            0,
            me,
            self.stance.into(),
            GameTreeOptions {
                max_depth: self.depth,
                pruning: !self.no_pruning,
            },
        );
        let (result, visited) = agent.search(&world);

        match result.best_action(0) {
            Some(action) => println!("First action: {}", describe(action, &world)),
            None => println!("Nothing to do, everyone is out"),
        }
        println!(
            "Route: {}",
            result
                .chosen_route()
                .iter()
                .map(|(player, action)| format!("P{player} {}", describe(*action, &world)))
                .join(", ")
        );
        println!("Visited: {visited}");

        if let Some(tree) = result.to_text_tree() {
            println!("{tree}");
        }

        Ok(())
    }
}

fn describe(action: Action, world: &World) -> String {
    match action {
        Action::NoOp => "no-op".to_owned(),
        Action::Traverse(v) => format!("traverse {}", world.name(v)),
    }
}
