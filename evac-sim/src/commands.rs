pub mod game;
pub mod plan;
pub mod run;

use std::path::Path;

use clap::Subcommand;
use color_eyre::eyre::{eyre, Result, WrapErr};
use evacuation_rs::{Environment, Vertex, World};

use game::Game;
use plan::Plan;
use run::Run;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Play a full simulation and print the report as JSON
    Run(Run),
    /// Search for a single agent plan from one vertex
    Plan(Plan),
    /// Search the two player game tree once and print what it found
    Game(Game),
}

impl Command {
    pub fn run(self) -> Result<()> {
        match self {
            Command::Run(r) => r.run()?,
            Command::Plan(p) => p.run()?,
            Command::Game(g) => g.run()?,
        }

        Ok(())
    }
}

fn load_world(path: &Path) -> Result<World> {
    let env = Environment::from_path(path)
        .wrap_err_with(|| format!("Loading {}", path.display()))?;

    Ok(World::from_environment(&env)?)
}

fn find_vertex(world: &World, name: &str) -> Result<Vertex> {
    world
        .vertex(name)
        .ok_or_else(|| eyre!("There is no vertex named '{name}'"))
}
