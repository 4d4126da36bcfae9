use serde::{Deserialize, Serialize};

/// Initial roster composition used by [`crate::world::bootstrap_roster`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of prey placed at random cells before the first tick.
    pub prey_count: usize,
    /// Number of predators placed at random cells after the prey.
    pub predator_count: usize,
    /// Speed (cells per tick) of every initial prey.
    pub prey_speed: f64,
    /// Speed (cells per tick) of every initial predator.
    pub predator_speed: f64,
    /// Starting food reserve of every initial prey.
    pub prey_food: f64,
    /// Starting food reserve of every initial predator.
    pub predator_food: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            prey_count: 150,
            predator_count: 50,
            prey_speed: 1.0,
            predator_speed: 3.0,
            prey_food: 10.0,
            predator_food: 10.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Number of grid columns.
    pub grid_width: usize,
    /// Number of grid rows.
    pub grid_height: usize,
    /// Resource placed in every cell at construction.
    pub initial_resource: i32,
    /// Growth never raises a cell above this quantity.
    pub resource_cap: i32,
    /// Cells drawn (with replacement) for growth each tick.
    pub grow_rate: usize,
    /// Ticks to run.
    pub iterations: usize,
    /// Stop as soon as the roster is empty.
    pub early_stop: bool,
    /// Initial roster used when the caller does not supply one.
    pub population: PopulationConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grid_width: 60,
            grid_height: 60,
            initial_resource: 1,
            resource_cap: 5,
            grow_rate: 60,
            iterations: 1000,
            early_stop: true,
            population: PopulationConfig::default(),
        }
    }
}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidGridWidth => "grid_width must be greater than 0";
    InvalidGridHeight => "grid_height must be greater than 0";
    GridTooLarge { max: usize, width: usize, height: usize } => "grid ({width}x{height}) exceeds supported maximum side ({max})";
    InvalidInitialResource => "initial_resource must be non-negative";
    InvalidResourceCap => "resource_cap must be non-negative";
    InitialResourceAboveCap { initial: i32, cap: i32 } => "initial_resource ({initial}) must not exceed resource_cap ({cap})";
    TooManyIterations { max: usize, actual: usize } => "iterations ({actual}) exceed supported maximum ({max})";
    InvalidPreySpeed => "prey_speed must be finite and non-negative";
    InvalidPredatorSpeed => "predator_speed must be finite and non-negative";
    InvalidPreyFood => "prey_food must be finite and positive";
    InvalidPredatorFood => "predator_food must be finite and positive";
    AgentCountOverflow => "Total agent count overflow";
    TooManyAgents { max: usize, actual: usize } => "Too many agents: {} > max {}", actual, max;
}

impl std::error::Error for SimConfigError {}

impl SimConfig {
    pub const MAX_GRID_DIM: usize = crate::constants::MAX_GRID_DIM;

    pub const MAX_INITIAL_AGENTS: usize = crate::constants::MAX_INITIAL_AGENTS;

    pub const MAX_ITERATIONS: usize = crate::constants::MAX_RUN_ITERATIONS;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_grid()?;
        self.validate_resource()?;
        self.validate_run()?;
        self.validate_population()?;
        Ok(())
    }

    fn validate_grid(&self) -> Result<(), SimConfigError> {
        if self.grid_width == 0 {
            return Err(SimConfigError::InvalidGridWidth);
        }
        if self.grid_height == 0 {
            return Err(SimConfigError::InvalidGridHeight);
        }
        if self.grid_width > Self::MAX_GRID_DIM || self.grid_height > Self::MAX_GRID_DIM {
            return Err(SimConfigError::GridTooLarge {
                max: Self::MAX_GRID_DIM,
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        Ok(())
    }

    fn validate_resource(&self) -> Result<(), SimConfigError> {
        if self.initial_resource < 0 {
            return Err(SimConfigError::InvalidInitialResource);
        }
        if self.resource_cap < 0 {
            return Err(SimConfigError::InvalidResourceCap);
        }
        if self.initial_resource > self.resource_cap {
            return Err(SimConfigError::InitialResourceAboveCap {
                initial: self.initial_resource,
                cap: self.resource_cap,
            });
        }
        Ok(())
    }

    fn validate_run(&self) -> Result<(), SimConfigError> {
        if self.iterations > Self::MAX_ITERATIONS {
            return Err(SimConfigError::TooManyIterations {
                max: Self::MAX_ITERATIONS,
                actual: self.iterations,
            });
        }
        Ok(())
    }

    fn validate_population(&self) -> Result<(), SimConfigError> {
        let p = &self.population;
        if !(p.prey_speed.is_finite() && p.prey_speed >= 0.0) {
            return Err(SimConfigError::InvalidPreySpeed);
        }
        if !(p.predator_speed.is_finite() && p.predator_speed >= 0.0) {
            return Err(SimConfigError::InvalidPredatorSpeed);
        }
        if !(p.prey_food.is_finite() && p.prey_food > 0.0) {
            return Err(SimConfigError::InvalidPreyFood);
        }
        if !(p.predator_food.is_finite() && p.predator_food > 0.0) {
            return Err(SimConfigError::InvalidPredatorFood);
        }
        let total_agents = p
            .prey_count
            .checked_add(p.predator_count)
            .ok_or(SimConfigError::AgentCountOverflow)?;
        if total_agents > Self::MAX_INITIAL_AGENTS {
            return Err(SimConfigError::TooManyAgents {
                max: Self::MAX_INITIAL_AGENTS,
                actual: total_agents,
            });
        }
        Ok(())
    }
}
