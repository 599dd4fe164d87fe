//! Evacuating people from a weighted graph whose vertices can break underneath you.
//!
//! The [world::World] is the live simulation state. Planners only ever see it through `&World`
//! and build their own [world::Projection]s of what would happen; the [agents] commit one move
//! per turn through `&mut World`, and the [simulator::Simulator] drives the turns.

pub mod agents;
pub mod environment;
pub mod error;
pub mod fringe;
pub mod graph;
pub mod heuristics;
pub mod search;
pub mod simulator;
pub mod state_node;
pub mod world;

pub use agents::{
    all_factories, AgentFactory, AgentOptions, AgentStats, AgentSummary, BoxedAgent,
    BoxedFactory, EvacuationAgent,
};
pub use environment::{Environment, EnvironmentError};
pub use error::SearchError;
pub use graph::{Vertex, WeightedGraph};
pub use search::{BestFirstSearch, Cutoff, Plan, PlanStatus, SearchOptions};
pub use simulator::{SimulationReport, Simulator, SimulatorOptions};
pub use state_node::{cost, Cost, NodeId, SearchTree, StateNode};
pub use world::{Projection, World};
