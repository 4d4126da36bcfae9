use crate::agent::{Agent, Species};
use crate::resource::ResourceGrid;
use serde::{Deserialize, Serialize};

/// Position and species of one surviving agent at the end of a tick.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentRecord {
    pub x: f64,
    pub y: f64,
    pub species: Species,
}

impl AgentRecord {
    /// Species flag as exposed to plotting code: `true` for prey.
    pub fn is_prey(&self) -> bool {
        self.species.is_prey()
    }
}

impl From<&Agent> for AgentRecord {
    fn from(agent: &Agent) -> Self {
        Self {
            x: agent.position[0],
            y: agent.position[1],
            species: agent.species,
        }
    }
}

/// Copy of the world at the end of one tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub tick: usize,
    pub width: usize,
    pub height: usize,
    /// Resource field, x-major (`x * height + y`).
    pub resource: Vec<i32>,
    pub agents: Vec<AgentRecord>,
}

impl Snapshot {
    pub fn capture(tick: usize, grid: &ResourceGrid, agents: &[Agent]) -> Self {
        Self {
            tick,
            width: grid.width(),
            height: grid.height(),
            resource: grid.data().to_vec(),
            agents: agents.iter().map(AgentRecord::from).collect(),
        }
    }

    pub fn resource_total(&self) -> i64 {
        self.resource.iter().map(|&q| i64::from(q)).sum()
    }
}

/// Per-tick population and resource series entry.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopulationCounts {
    pub tick: usize,
    pub predators: usize,
    pub prey: usize,
    pub resource_total: i64,
}

impl PopulationCounts {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let prey = snapshot.agents.iter().filter(|a| a.is_prey()).count();
        Self {
            tick: snapshot.tick,
            predators: snapshot.agents.len() - prey,
            prey,
            resource_total: snapshot.resource_total(),
        }
    }
}

/// Reduce a recorded history to `(predators, prey, resource_total)` per tick.
///
/// Works purely from the stored snapshots.
pub fn summarize(history: &[Snapshot]) -> Vec<PopulationCounts> {
    history.iter().map(PopulationCounts::from_snapshot).collect()
}

/// Bookkeeping for a single tick.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepStats {
    pub tick: usize,
    pub births: usize,
    pub deaths: usize,
    pub kills: usize,
    /// Roster size after dead agents were removed.
    pub population: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub ticks_run: usize,
    pub early_stopped: bool,
    pub total_births: usize,
    pub total_deaths: usize,
    pub total_kills: usize,
    pub final_counts: PopulationCounts,
}

/// Everything a run produces: the full snapshot history plus its summary.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub history: Vec<Snapshot>,
    pub summary: RunSummary,
}

impl RunRecord {
    pub fn counts(&self) -> Vec<PopulationCounts> {
        summarize(&self.history)
    }
}
