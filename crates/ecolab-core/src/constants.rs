/// Largest supported grid dimension (cells per side).
pub const MAX_GRID_DIM: usize = 4096;

/// Upper bound on the initial roster size accepted by config validation.
pub const MAX_INITIAL_AGENTS: usize = 250_000;

/// Longest run accepted by `World::try_run`.
pub const MAX_RUN_ITERATIONS: usize = 1_000_000;

/// Scale of the uniform jitter added to candidate cells during resource search.
/// Must stay well below one resource unit so it only breaks exact ties.
pub const SEARCH_JITTER: f64 = 0.01;

/// Value written into search-window cells that lie outside the vision circle.
pub const OUT_OF_SIGHT: f64 = -1.0;

/// Cooldown a newborn starts with.
pub const POST_BIRTH_COOLDOWN: u32 = 10;

/// Food a newly spawned agent carries when none is specified.
pub const DEFAULT_FOOD: f64 = 10.0;

/// Food a predator gains from a successful kill.
pub const PREDATION_FOOD_GAIN: f64 = 2.0;

/// Mixed into the base seed to derive the roster bootstrap stream.
pub const RNG_DERIVATION_PRIME: u64 = 7919;
