pub mod agent;
pub mod config;
pub mod constants;
pub mod metrics;
pub mod resource;
pub mod rng;
pub mod roster;
pub mod world;

pub use agent::{Agent, Species};
pub use config::{PopulationConfig, SimConfig, SimConfigError};
pub use metrics::{
    summarize, AgentRecord, PopulationCounts, RunRecord, RunSummary, Snapshot, StepStats,
};
pub use resource::ResourceGrid;
pub use world::{bootstrap_roster, ExperimentError, World, WorldInitError};
