use super::*;
use crate::config::PopulationConfig;
use crate::constants::POST_BIRTH_COOLDOWN;

fn make_config(width: usize, height: usize, initial: i32, grow_rate: usize) -> SimConfig {
    SimConfig {
        seed: 42,
        grid_width: width,
        grid_height: height,
        initial_resource: initial,
        resource_cap: 5,
        grow_rate,
        ..SimConfig::default()
    }
}

fn make_world(agents: Vec<Agent>, config: SimConfig) -> World {
    World::new(agents, config).expect("test world should be valid")
}

fn clear_grid(world: &mut World) {
    let (width, height) = (world.grid().width(), world.grid().height());
    for x in 0..width {
        for y in 0..height {
            world.grid_mut().set([x, y], 0);
        }
    }
}

#[test]
fn single_prey_grazes_then_wanders_when_nothing_visible() {
    let prey = Agent::prey([5.0, 5.0], 1.0, 1.0);
    let mut world = make_world(vec![prey], make_config(10, 10, 1, 0));

    let stats = world.step();
    assert_eq!(stats.population, 1);
    assert_eq!(world.grid().get([5, 5]), 0);
    assert_eq!(world.agents[0].food, 2.0);
    assert_eq!(world.agents[0].position, [5.0, 5.0]);
    assert_eq!(world.agents[0].age, 1);

    clear_grid(&mut world);
    world.step();
    let prey = &world.agents[0];
    assert_eq!(prey.food, 1.0);
    let dx = (prey.position[0] - 5.0).abs();
    let dy = (prey.position[1] - 5.0).abs();
    assert!(dx <= 1.0 && dy <= 1.0);
    assert!(dx + dy >= 1.0, "prey should have taken a unit step");
}

#[test]
fn offspring_act_within_their_birth_tick() {
    // At speed 20 reproduction is certain.
    let parent = Agent::new(Species::Prey, [2.0, 2.0], 3, 20.0, 20.0, 11);
    let mut world = make_world(vec![parent], make_config(5, 5, 5, 0));

    let stats = world.step();
    assert_eq!(stats.births, 1);
    assert_eq!(world.agents.len(), 2);

    let parent = &world.agents[0];
    assert_eq!(parent.food, 10.5);
    assert_eq!(parent.cooldown, 0);
    assert_eq!(parent.age, 4);

    let child = &world.agents[1];
    assert_eq!(child.position, [2.0, 2.0]);
    assert_eq!(child.food, 11.5, "child grazed in its birth tick");
    assert_eq!(child.age, 1);
    assert_eq!(child.cooldown, POST_BIRTH_COOLDOWN + 1);
    assert_eq!(world.grid().get([2, 2]), 3);
}

#[test]
fn eaten_prey_keeps_acting_until_cull() {
    let mut saw_kill = false;
    let mut saw_miss = false;
    for seed in 0..200 {
        let agents = vec![
            Agent::predator([0.0, 0.0], 5.0, 5.0),
            Agent::prey([0.0, 0.0], 3.0, 0.0),
        ];
        let config = SimConfig {
            seed,
            ..make_config(1, 1, 1, 0)
        };
        let mut world = make_world(agents, config);
        let stats = world.step();

        // The prey grazes on its turn either way.
        assert_eq!(world.grid().get([0, 0]), 0);
        if stats.kills == 1 {
            saw_kill = true;
            assert_eq!(stats.deaths, 1);
            assert_eq!(world.agents.len(), 1);
            assert_eq!(world.agents[0].species, Species::Predator);
            assert_eq!(world.agents[0].food, 7.0);
        } else {
            saw_miss = true;
            assert_eq!(world.agents.len(), 2);
            assert_eq!(world.agents[0].food, 5.0);
            assert_eq!(world.agents[1].food, 4.0);
        }
        if saw_kill && saw_miss {
            break;
        }
    }
    assert!(saw_kill && saw_miss);
}

#[test]
fn idle_predator_neither_moves_off_grid_nor_starves() {
    let predator = Agent::predator([0.0, 0.0], 5.0, 3.0);
    let mut world = make_world(vec![predator], make_config(1, 1, 0, 0));
    for _ in 0..10 {
        world.step();
    }
    let predator = &world.agents[0];
    assert_eq!(predator.position, [0.0, 0.0]);
    assert_eq!(predator.food, 5.0);
    assert_eq!(predator.age, 10);
}

#[test]
fn cull_removes_agents_past_max_age() {
    let old = Agent::new(Species::Prey, [1.0, 1.0], 40, 5.0, 1.0, 0);
    let young = Agent::new(Species::Prey, [1.0, 1.0], 39, 5.0, 1.0, 0);
    let mut world = make_world(vec![old, young], make_config(3, 3, 5, 0));
    let stats = world.step();
    assert_eq!(stats.deaths, 1);
    assert_eq!(world.agents.len(), 1);
    assert_eq!(world.agents[0].age, 40);
}

#[test]
fn early_stop_ends_run_after_extinction() {
    let prey = Agent::prey([2.0, 2.0], 1.0, 1.0);
    let mut world = make_world(vec![prey], make_config(5, 5, 0, 0));
    let record = world.try_run(10, true).expect("run should succeed");

    assert_eq!(record.history.len(), 1);
    assert!(record.history[0].agents.is_empty());
    assert!(record.summary.early_stopped);
    assert_eq!(record.summary.ticks_run, 1);
    assert_eq!(record.summary.total_deaths, 1);
    assert_eq!(record.summary.final_counts.prey, 0);
    assert_eq!(record.summary.final_counts.predators, 0);
}

#[test]
fn extinct_world_keeps_growing_without_early_stop() {
    let prey = Agent::prey([2.0, 2.0], 1.0, 1.0);
    let mut world = make_world(vec![prey], make_config(5, 5, 0, 3));
    let record = world.try_run(10, false).expect("run should succeed");

    assert_eq!(record.history.len(), 10);
    assert!(!record.summary.early_stopped);
    let totals: Vec<i64> = record.counts().iter().map(|c| c.resource_total).collect();
    assert!(totals.windows(2).all(|w| w[0] <= w[1]));
    assert!(totals[9] > 0);
    assert!(totals[9] <= 30);
}

#[test]
fn same_seed_reproduces_history() {
    let config = SimConfig {
        grid_width: 20,
        grid_height: 20,
        grow_rate: 20,
        population: PopulationConfig {
            prey_count: 30,
            predator_count: 5,
            ..PopulationConfig::default()
        },
        ..SimConfig::default()
    };
    let mut a = World::from_config(config.clone()).expect("valid config");
    let mut b = World::from_config(config.clone()).expect("valid config");
    let record_a = a.try_run(60, true).expect("run a");
    let record_b = b.try_run(60, true).expect("run b");
    assert_eq!(record_a, record_b);

    let mut c = World::from_config(SimConfig { seed: 7, ..config }).expect("valid config");
    let record_c = c.try_run(60, true).expect("run c");
    assert_ne!(record_a.history, record_c.history);
}

#[test]
fn history_counts_match_final_summary() {
    let config = SimConfig {
        grid_width: 15,
        grid_height: 15,
        grow_rate: 15,
        population: PopulationConfig {
            prey_count: 20,
            predator_count: 4,
            ..PopulationConfig::default()
        },
        ..SimConfig::default()
    };
    let mut world = World::from_config(config).expect("valid config");
    let record = world.try_run(40, false).expect("run");
    let counts = record.counts();
    assert_eq!(counts.len(), 40);
    assert_eq!(counts.last().copied(), Some(record.summary.final_counts));
    for (tick, entry) in counts.iter().enumerate() {
        assert_eq!(entry.tick, tick + 1);
    }
}

#[test]
fn long_run_preserves_roster_and_grid_invariants() {
    let mut world = World::from_config(SimConfig::default()).expect("default config");
    let cap = world.config().resource_cap;
    for _ in 0..120 {
        world.step();
        for agent in &world.agents {
            assert!(world.grid().is_in_bounds(agent.position));
            assert_eq!(agent.position[0].fract(), 0.0);
            assert_eq!(agent.position[1].fract(), 0.0);
            assert!(!agent.is_dead());
        }
        assert!(world.grid().data().iter().all(|&q| q <= cap));
    }
}

#[test]
fn bootstrap_places_prey_then_predators() {
    let config = SimConfig {
        grid_width: 8,
        grid_height: 4,
        population: PopulationConfig {
            prey_count: 7,
            predator_count: 3,
            prey_speed: 2.0,
            predator_speed: 4.0,
            prey_food: 6.0,
            predator_food: 9.0,
        },
        ..SimConfig::default()
    };
    let world = World::from_config(config).expect("valid config");
    assert_eq!(world.agents.len(), 10);
    for (idx, agent) in world.agents.iter().enumerate() {
        if idx < 7 {
            assert_eq!(agent.species, Species::Prey);
            assert_eq!((agent.speed, agent.food), (2.0, 6.0));
        } else {
            assert_eq!(agent.species, Species::Predator);
            assert_eq!((agent.speed, agent.food), (4.0, 9.0));
        }
        assert!(agent.age < agent.traits().max_age);
        assert!(world.grid().is_in_bounds(agent.position));
    }
    let counts = world.population_counts();
    assert_eq!((counts.prey, counts.predators), (7, 3));
}

#[test]
fn new_snaps_positions_onto_cells() {
    let prey = Agent::prey([2.4, 3.6], 3.0, 1.0);
    let world = make_world(vec![prey], make_config(10, 10, 1, 0));
    assert_eq!(world.agents[0].position, [2.0, 4.0]);
}

#[test]
fn new_rejects_agents_off_grid() {
    let agents = vec![
        Agent::prey([9.4, 0.0], 3.0, 1.0),
        Agent::prey([10.0, 0.0], 3.0, 1.0),
    ];
    assert!(matches!(
        World::new(agents, make_config(10, 10, 1, 0)),
        Err(WorldInitError::AgentOutOfBounds { index: 1, .. })
    ));
}

#[test]
fn new_rejects_invalid_speed_and_food() {
    let agents = vec![
        Agent::prey([1.0, 1.0], 3.0, 1.0),
        Agent::predator([1.0, 1.0], 3.0, -1.0),
    ];
    assert_eq!(
        World::new(agents, make_config(4, 4, 1, 0)).err(),
        Some(WorldInitError::InvalidAgentSpeed { index: 1 })
    );

    let agents = vec![Agent::prey([1.0, 1.0], f64::NAN, 1.0)];
    assert_eq!(
        World::new(agents, make_config(4, 4, 1, 0)).err(),
        Some(WorldInitError::InvalidAgentFood { index: 0 })
    );
}

#[test]
fn new_surfaces_config_errors() {
    let config = SimConfig {
        grid_width: 0,
        ..SimConfig::default()
    };
    let err = World::new(Vec::new(), config).err().expect("config should be rejected");
    assert_eq!(err, WorldInitError::Config(SimConfigError::InvalidGridWidth));
    assert!(err.source().is_some());
    assert_eq!(err.to_string(), "grid_width must be greater than 0");
}

#[test]
fn empty_roster_is_a_valid_world() {
    let mut world = make_world(Vec::new(), make_config(4, 4, 0, 2));
    let stats = world.step();
    assert_eq!(stats.population, 0);
    assert_eq!(world.grid().total(), 2);
}

#[test]
fn try_run_rejects_excessive_iterations() {
    let mut world = make_world(Vec::new(), make_config(4, 4, 0, 0));
    assert_eq!(
        world.try_run(World::MAX_RUN_ITERATIONS + 1, true).err(),
        Some(ExperimentError::TooManyIterations {
            max: World::MAX_RUN_ITERATIONS,
            actual: World::MAX_RUN_ITERATIONS + 1,
        })
    );
}

#[test]
fn bootstrap_roster_rejects_invalid_config() {
    let config = SimConfig {
        grid_width: 0,
        ..SimConfig::default()
    };
    assert_eq!(bootstrap_roster(&config), Err(SimConfigError::InvalidGridWidth));

    let config = SimConfig {
        initial_resource: 6,
        resource_cap: 5,
        ..SimConfig::default()
    };
    assert!(matches!(
        World::from_config(config),
        Err(WorldInitError::Config(SimConfigError::InitialResourceAboveCap { .. }))
    ));
}

#[test]
fn bootstrap_roster_is_seeded() {
    let config = SimConfig::default();
    let a = bootstrap_roster(&config).expect("valid config");
    let b = bootstrap_roster(&config).expect("valid config");
    assert_eq!(a, b);
    assert_eq!(a.len(), 200);
}

#[test]
fn grid_reflects_resource_config() {
    let world = make_world(Vec::new(), make_config(6, 4, 2, 9));
    let grid = world.grid();
    assert_eq!((grid.width(), grid.height()), (6, 4));
    assert_eq!(grid.cap(), 5);
    assert_eq!(grid.grow_rate(), 9);
    assert_eq!(grid.total(), 48);
}
