use super::super::World;

impl World {
    /// Drop every agent whose death predicate holds. Returns the number removed.
    pub(in crate::world) fn step_cull_phase(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(|agent| !agent.is_dead());
        before - self.agents.len()
    }
}
