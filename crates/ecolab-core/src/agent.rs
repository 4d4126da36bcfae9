use crate::constants::{DEFAULT_FOOD, POST_BIRTH_COOLDOWN, PREDATION_FOOD_GAIN};
use crate::resource::ResourceGrid;
use crate::roster::RosterView;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Prey,
    Predator,
}

/// Per-species constants shared by every individual of that species.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeciesTraits {
    /// Radius (cells) within which resource or prey can be detected.
    pub vision: u32,
    /// Cooldown must exceed this before reproduction is possible.
    pub min_breed_interval: u32,
    /// Food must exceed this before reproduction is possible.
    pub min_breed_food: f64,
    /// Agents older than this die at the next filtering step.
    pub max_age: u32,
}

pub const PREY_TRAITS: SpeciesTraits = SpeciesTraits {
    vision: 5,
    min_breed_interval: 10,
    min_breed_food: 10.0,
    max_age: 40,
};

pub const PREDATOR_TRAITS: SpeciesTraits = SpeciesTraits {
    vision: 7,
    min_breed_interval: 30,
    min_breed_food: 20.0,
    max_age: 80,
};

impl Species {
    pub const fn traits(self) -> &'static SpeciesTraits {
        match self {
            Species::Prey => &PREY_TRAITS,
            Species::Predator => &PREDATOR_TRAITS,
        }
    }

    pub const fn default_speed(self) -> f64 {
        match self {
            Species::Prey => 1.0,
            Species::Predator => 5.0,
        }
    }

    pub const fn is_prey(self) -> bool {
        matches!(self, Species::Prey)
    }
}

/// What an agent's forage call did this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Forage {
    /// Prey ate one unit from its cell.
    Grazed,
    /// Prey found nothing and burned one unit of food.
    Hungry,
    /// Predator caught the prey at this roster index. The caller marks it eaten.
    Kill { prey: usize },
    /// Predator found no catchable prey or missed.
    Idle,
}

/// Fraction of a predator's strike a prey avoids through speed.
pub fn evasion_factor(prey_speed: f64) -> f64 {
    (0.1 + 0.01 * prey_speed).max(0.1)
}

/// Probability a predator at `distance` kills the prey. Zero at or beyond `predator_speed`.
pub fn kill_probability(distance: f64, predator_speed: f64, prey_speed: f64) -> f64 {
    if !(distance < predator_speed) {
        return 0.0;
    }
    (1.0 - distance / predator_speed) * (1.0 - evasion_factor(prey_speed))
}

/// Offset of `speed` cells along a uniformly random heading, rounded per axis.
fn random_step<R: Rng + ?Sized>(speed: f64, rng: &mut R) -> [f64; 2] {
    let theta = rng.random::<f64>() * TAU;
    let (sin, cos) = theta.sin_cos();
    [
        (cos * speed).round_ties_even(),
        (sin * speed).round_ties_even(),
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub species: Species,
    pub position: [f64; 2],
    /// Ticks since creation.
    pub age: u32,
    /// Internal reserve; the agent dies once this reaches zero.
    pub food: f64,
    /// Cells of reach per tick.
    pub speed: f64,
    /// Ticks since the last successful reproduction.
    pub cooldown: u32,
    /// Set on prey by a successful predation.
    pub eaten: bool,
}

impl Agent {
    pub fn new(
        species: Species,
        position: [f64; 2],
        age: u32,
        food: f64,
        speed: f64,
        cooldown: u32,
    ) -> Self {
        Self {
            species,
            position,
            age,
            food,
            speed,
            cooldown,
            eaten: false,
        }
    }

    /// Fresh individual with a random age below the species maximum and default food.
    pub fn spawn<R: Rng + ?Sized>(
        species: Species,
        position: [f64; 2],
        speed: f64,
        rng: &mut R,
    ) -> Self {
        let age = rng.random_range(0..species.traits().max_age);
        Self::new(species, position, age, DEFAULT_FOOD, speed, 0)
    }

    /// [`Agent::spawn`] at the species' default speed.
    pub fn spawn_default<R: Rng + ?Sized>(species: Species, position: [f64; 2], rng: &mut R) -> Self {
        Self::spawn(species, position, species.default_speed(), rng)
    }

    pub fn prey(position: [f64; 2], food: f64, speed: f64) -> Self {
        Self::new(Species::Prey, position, 0, food, speed, 0)
    }

    pub fn predator(position: [f64; 2], food: f64, speed: f64) -> Self {
        Self::new(Species::Predator, position, 0, food, speed, 0)
    }

    pub fn traits(&self) -> &'static SpeciesTraits {
        self.species.traits()
    }

    /// Faster prey breed more readily; predators breed at a fixed rate.
    pub fn reproduction_probability(&self) -> f64 {
        match self.species {
            Species::Prey => 0.05 + 0.05 * self.speed,
            Species::Predator => 0.1,
        }
    }

    /// Commit a move to `target` if it snaps onto the grid. Returns whether the agent moved.
    pub fn try_move(&mut self, target: [f64; 2], grid: &ResourceGrid) -> bool {
        let (valid, snapped) = grid.check_position(target);
        if valid {
            self.position = snapped;
        }
        valid
    }

    /// Movement rule for this tick.
    ///
    /// Prey stay put while their cell holds resource; otherwise they head for the
    /// richest visible cell (landing on it when within reach) or wander randomly.
    /// Predators always wander; pursuit happens in [`Agent::forage`].
    pub fn move_step<R: Rng + ?Sized>(&mut self, grid: &ResourceGrid, rng: &mut R) {
        match self.species {
            Species::Prey => self.prey_move(grid, rng),
            Species::Predator => self.wander(grid, rng),
        }
    }

    fn wander<R: Rng + ?Sized>(&mut self, grid: &ResourceGrid, rng: &mut R) {
        let delta = random_step(self.speed, rng);
        self.try_move(
            [self.position[0] + delta[0], self.position[1] + delta[1]],
            grid,
        );
    }

    fn prey_move<R: Rng + ?Sized>(&mut self, grid: &ResourceGrid, rng: &mut R) {
        if grid.quantity_at(self.position) != 0 {
            return;
        }
        let Some([fx, fy]) = grid.locate_best_nearby(self.position, self.traits().vision, rng)
        else {
            self.wander(grid, rng);
            return;
        };
        let target = [fx as f64, fy as f64];
        let rel = [target[0] - self.position[0], target[1] - self.position[1]];
        let dist_sq = rel[0] * rel[0] + rel[1] * rel[1];
        if dist_sq < self.speed * self.speed {
            self.try_move(target, grid);
        } else {
            let dist = dist_sq.sqrt();
            self.try_move(
                [
                    self.position[0] + rel[0] / dist * self.speed,
                    self.position[1] + rel[1] / dist * self.speed,
                ],
                grid,
            );
        }
    }

    /// Consumption rule for this tick.
    ///
    /// `roster` is a read-only view of every other agent; a predator never
    /// mutates it and instead reports the caught prey through [`Forage::Kill`].
    pub fn forage<R: Rng + ?Sized>(
        &mut self,
        grid: &mut ResourceGrid,
        roster: &RosterView<'_>,
        rng: &mut R,
    ) -> Forage {
        match self.species {
            Species::Prey => {
                if grid.quantity_at(self.position) > 0 {
                    grid.deplete(self.position, 1);
                    self.food += 1.0;
                    Forage::Grazed
                } else {
                    self.food -= 1.0;
                    Forage::Hungry
                }
            }
            Species::Predator => {
                let Some(target) = roster.nearest_prey(self.position, self.traits().vision) else {
                    return Forage::Idle;
                };
                if !(target.distance < self.speed) {
                    return Forage::Idle;
                }
                let chance = kill_probability(target.distance, self.speed, target.speed);
                if chance > rng.random::<f64>() {
                    self.try_move(target.position, grid);
                    self.food += PREDATION_FOOD_GAIN;
                    Forage::Kill { prey: target.index }
                } else {
                    Forage::Idle
                }
            }
        }
    }

    pub fn reproduce<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Agent> {
        let probability = self.reproduction_probability();
        self.reproduce_with_probability(probability, rng)
    }

    /// Breeding rule with an explicit success probability.
    ///
    /// A draw is consumed only when the cooldown and food thresholds are exceeded.
    /// On success the child takes half the parent's food and the parent keeps the
    /// other half. Age and cooldown advance exactly once per call; a successful
    /// parent ends the call with cooldown 0.
    pub fn reproduce_with_probability<R: Rng + ?Sized>(
        &mut self,
        probability: f64,
        rng: &mut R,
    ) -> Option<Agent> {
        let traits = self.traits();
        let eligible = self.cooldown > traits.min_breed_interval && self.food > traits.min_breed_food;
        let child = if eligible && rng.random::<f64>() < probability {
            let child = Agent::new(
                self.species,
                self.position,
                0,
                self.food / 2.0,
                self.speed,
                POST_BIRTH_COOLDOWN,
            );
            self.food /= 2.0;
            Some(child)
        } else {
            None
        };
        self.age = self.age.saturating_add(1);
        self.cooldown = if child.is_some() {
            0
        } else {
            self.cooldown.saturating_add(1)
        };
        child
    }

    pub fn is_dead(&self) -> bool {
        if self.food <= 0.0 || self.age > self.traits().max_age {
            return true;
        }
        match self.species {
            Species::Prey => self.eaten,
            Species::Predator => false,
        }
    }
}
