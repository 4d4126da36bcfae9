use super::super::World;
use crate::agent::Forage;
use crate::roster::RosterView;

impl World {
    /// Let every agent move, forage, and breed in roster order.
    ///
    /// Offspring are appended to the roster being walked, so they act later in
    /// the same tick. Agents already doomed this tick (eaten, starved, too old)
    /// still act; death is only checked in the cull phase. Returns
    /// `(births, kills)`.
    pub(in crate::world) fn step_action_phase(&mut self) -> (usize, usize) {
        let mut births = 0;
        let mut kills = 0;
        let mut idx = 0;
        while idx < self.agents.len() {
            let Some((agent, roster)) = RosterView::split(&mut self.agents, idx) else {
                break;
            };
            agent.move_step(&self.grid, &mut self.rng);
            let outcome = agent.forage(&mut self.grid, &roster, &mut self.rng);
            let child = agent.reproduce(&mut self.rng);

            if let Forage::Kill { prey } = outcome {
                if let Some(victim) = self.agents.get_mut(prey) {
                    victim.eaten = true;
                }
                kills += 1;
            }
            if let Some(child) = child {
                self.agents.push(child);
                births += 1;
            }
            idx += 1;
        }
        (births, kills)
    }
}
