use super::super::World;

impl World {
    /// Regrow resource at `grow_rate` random cells.
    pub(in crate::world) fn step_environment_phase(&mut self) {
        self.grid.grow(&mut self.rng);
    }
}
