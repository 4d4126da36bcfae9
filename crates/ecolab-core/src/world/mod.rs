use crate::agent::{Agent, Species};
use crate::config::{SimConfig, SimConfigError};
use crate::metrics::{PopulationCounts, RunRecord, RunSummary, Snapshot, StepStats};
use crate::resource::ResourceGrid;
use crate::rng::{create_rng, derive_stream};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};
use tracing::{debug, info};

/// Stream index used for initial roster placement.
const BOOTSTRAP_STREAM: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    TooManyAgents { max: usize, actual: usize },
    AgentOutOfBounds { index: usize, position: [f64; 2] },
    InvalidAgentSpeed { index: usize },
    InvalidAgentFood { index: usize },
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::TooManyAgents { max, actual } => {
                write!(f, "roster size ({actual}) exceeds supported maximum ({max})")
            }
            WorldInitError::AgentOutOfBounds { index, position } => write!(
                f,
                "agent {index} at ({}, {}) lies outside the grid",
                position[0], position[1]
            ),
            WorldInitError::InvalidAgentSpeed { index } => {
                write!(f, "agent {index} speed must be finite and non-negative")
            }
            WorldInitError::InvalidAgentFood { index } => {
                write!(f, "agent {index} food must be finite")
            }
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    TooManyIterations { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::TooManyIterations { max, actual } => {
                write!(f, "iterations ({actual}) exceed supported maximum ({max})")
            }
        }
    }
}

impl Error for ExperimentError {}

/// Place the configured initial population at uniformly random cells, prey first.
///
/// Uses a stream derived from the seed so placement does not consume draws from
/// the simulation stream.
pub fn bootstrap_roster(config: &SimConfig) -> Result<Vec<Agent>, SimConfigError> {
    config.validate()?;
    let p = &config.population;
    let (width, height) = (config.grid_width, config.grid_height);
    let mut rng = derive_stream(config.seed, BOOTSTRAP_STREAM);
    let groups = [
        (Species::Prey, p.prey_count, p.prey_speed, p.prey_food),
        (Species::Predator, p.predator_count, p.predator_speed, p.predator_food),
    ];
    let mut agents = Vec::with_capacity(p.prey_count.saturating_add(p.predator_count));
    for (species, count, speed, food) in groups {
        for _ in 0..count {
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            let mut agent = Agent::spawn(species, [x as f64, y as f64], speed, &mut rng);
            agent.food = food;
            agents.push(agent);
        }
    }
    Ok(agents)
}

/// The resource grid, the roster, and the single random stream driving them.
pub struct World {
    /// The roster, in action order.
    pub agents: Vec<Agent>,
    grid: ResourceGrid,
    config: SimConfig,
    rng: ChaCha12Rng,
    tick: usize,
    total_births: usize,
    total_deaths: usize,
    total_kills: usize,
}

impl World {
    pub const MAX_TOTAL_AGENTS: usize = SimConfig::MAX_INITIAL_AGENTS;

    pub const MAX_RUN_ITERATIONS: usize = crate::constants::MAX_RUN_ITERATIONS;

    /// Build a world over `agents`, snapping each position onto its cell.
    pub fn new(agents: Vec<Agent>, config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        if agents.len() > Self::MAX_TOTAL_AGENTS {
            return Err(WorldInitError::TooManyAgents {
                max: Self::MAX_TOTAL_AGENTS,
                actual: agents.len(),
            });
        }

        let grid = ResourceGrid::new(
            config.grid_width,
            config.grid_height,
            config.initial_resource,
            config.resource_cap,
            config.grow_rate,
        );

        let mut agents = agents;
        for (index, agent) in agents.iter_mut().enumerate() {
            if !(agent.speed.is_finite() && agent.speed >= 0.0) {
                return Err(WorldInitError::InvalidAgentSpeed { index });
            }
            if !agent.food.is_finite() {
                return Err(WorldInitError::InvalidAgentFood { index });
            }
            let (valid, snapped) = grid.check_position(agent.position);
            if !valid {
                return Err(WorldInitError::AgentOutOfBounds {
                    index,
                    position: agent.position,
                });
            }
            agent.position = snapped;
        }

        Ok(Self {
            agents,
            grid,
            rng: create_rng(config.seed),
            config,
            tick: 0,
            total_births: 0,
            total_deaths: 0,
            total_kills: 0,
        })
    }

    /// Build a world populated by [`bootstrap_roster`].
    pub fn from_config(config: SimConfig) -> Result<Self, WorldInitError> {
        let agents = bootstrap_roster(&config)?;
        Self::new(agents, config)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &ResourceGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut ResourceGrid {
        &mut self.grid
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn population_counts(&self) -> PopulationCounts {
        let prey = self.agents.iter().filter(|a| a.species.is_prey()).count();
        PopulationCounts {
            tick: self.tick,
            predators: self.agents.len() - prey,
            prey,
            resource_total: self.grid.total(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.tick, &self.grid, &self.agents)
    }

    /// Advance one tick: every agent acts, the dead are removed, the grid grows.
    pub fn step(&mut self) -> StepStats {
        self.tick = self.tick.saturating_add(1);
        let had_agents = !self.agents.is_empty();

        let (births, kills) = self.step_action_phase();
        let deaths = self.step_cull_phase();
        self.step_environment_phase();

        self.total_births += births;
        self.total_deaths += deaths;
        self.total_kills += kills;

        let counts = self.population_counts();
        debug!(
            tick = self.tick,
            prey = counts.prey,
            predators = counts.predators,
            resource = counts.resource_total,
            births,
            deaths,
            kills,
            "tick complete"
        );
        if had_agents && self.agents.is_empty() {
            info!(tick = self.tick, "roster extinct");
        }

        StepStats {
            tick: self.tick,
            births,
            deaths,
            kills,
            population: self.agents.len(),
        }
    }

    /// Run for the configured iteration count and early-stop policy.
    pub fn run(&mut self) -> Result<RunRecord, ExperimentError> {
        self.try_run(self.config.iterations, self.config.early_stop)
    }

    /// Step up to `iterations` times, recording a snapshot after every tick.
    ///
    /// With `early_stop`, the run ends after the first tick that leaves the roster
    /// empty; that tick's snapshot is still recorded.
    pub fn try_run(
        &mut self,
        iterations: usize,
        early_stop: bool,
    ) -> Result<RunRecord, ExperimentError> {
        if iterations > Self::MAX_RUN_ITERATIONS {
            return Err(ExperimentError::TooManyIterations {
                max: Self::MAX_RUN_ITERATIONS,
                actual: iterations,
            });
        }

        let births_before = self.total_births;
        let deaths_before = self.total_deaths;
        let kills_before = self.total_kills;
        let mut history = Vec::with_capacity(iterations.min(1024));
        for _ in 0..iterations {
            self.step();
            history.push(self.snapshot());
            if early_stop && self.agents.is_empty() {
                break;
            }
        }

        let ticks_run = history.len();
        let early_stopped = ticks_run < iterations;
        if early_stopped {
            info!(ticks_run, iterations, "run stopped early");
        }
        Ok(RunRecord {
            history,
            summary: RunSummary {
                ticks_run,
                early_stopped,
                total_births: self.total_births - births_before,
                total_deaths: self.total_deaths - deaths_before,
                total_kills: self.total_kills - kills_before,
                final_counts: self.population_counts(),
            },
        })
    }
}

mod phases;
#[cfg(test)]
mod tests;
