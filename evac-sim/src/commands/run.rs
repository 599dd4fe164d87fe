use std::{path::PathBuf, str::FromStr};

use color_eyre::eyre::{eyre, Result};
use evacuation_rs::{AgentOptions, SearchOptions, Simulator, SimulatorOptions};
use itertools::Itertools;
use tracing::info;

use super::{find_vertex, load_world};

/// An agent to add to the simulation, written as `name@vertex`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AgentSpec {
    name: String,
    start: String,
}

impl FromStr for AgentSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((name, start)) if !name.is_empty() && !start.is_empty() => Ok(Self {
                name: name.to_owned(),
                start: start.to_owned(),
            }),
            _ => Err(format!("expected name@vertex, got '{s}'")),
        }
    }
}

#[derive(clap::Args, Debug)]
pub(crate) struct Run {
    /// Path to the environment description
    #[clap(short, long, value_parser)]
    environment: PathBuf,

    /// Agents in turn order, as `name@vertex`. Repeat for more agents
    #[clap(short, long = "agent", value_parser, required = true)]
    agents: Vec<AgentSpec>,

    /// Stop after this many rounds even if people are left
    #[clap(long, value_parser, default_value_t = 100)]
    max_rounds: usize,

    /// Plies the game tree agents look ahead
    #[clap(
        long,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
        default_value_t = 10
    )]
    depth: usize,

    /// Nodes the planning agents may expand per search
    #[clap(long, value_parser, default_value_t = 10_000)]
    budget: usize,

    /// Let real-time agents keep what they learned about a state's cost-to-go between
    /// partial plans instead of starting over every turn
    #[clap(long)]
    learn_estimates: bool,
}

impl Run {
    pub(crate) fn run(self) -> Result<()> {
        let world = load_world(&self.environment)?;
        let factories = evacuation_minimax::all_factories();
        let options = AgentOptions {
            search: SearchOptions {
                node_budget: self.budget,
                learn_estimates: self.learn_estimates,
            },
            max_depth: self.depth,
        };

        let agents = self
            .agents
            .iter()
            .enumerate()
            .map(|(index, spec)| -> Result<_> {
                let factory = factories
                    .iter()
                    .find(|f| f.name() == spec.name)
                    .ok_or_else(|| {
                        eyre!(
                            "Unknown agent '{}', expected one of: {}",
                            spec.name,
                            factories.iter().map(|f| f.name()).join(", ")
                        )
                    })?;
                let start = find_vertex(&world, &spec.start)?;

                Ok(factory.create(index, start, &options))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            environment = %self.environment.display(),
            agents = agents.len(),
            max_rounds = self.max_rounds,
            "starting simulation"
        );
        let simulator = Simulator::new(
            world,
            agents,
            SimulatorOptions {
                max_rounds: self.max_rounds,
            },
        );
        let report = simulator.run();

        for summary in &report.agents {
            eprintln!("{summary}");
        }
        println!("{}", serde_json::to_string_pretty(&report)?);

        Ok(())
    }
}
