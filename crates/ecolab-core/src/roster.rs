//! Read-only views over the roster for agents that need to see their neighbours.

use crate::agent::{Agent, Species};

/// A prey candidate located by [`RosterView::nearest_prey`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreySighting {
    /// Index of the prey in the full roster.
    pub index: usize,
    pub position: [f64; 2],
    pub speed: f64,
    pub distance: f64,
}

/// Every roster entry except the one currently acting, addressed by full-roster index.
#[derive(Clone, Copy, Debug)]
pub struct RosterView<'a> {
    before: &'a [Agent],
    after: &'a [Agent],
}

impl<'a> RosterView<'a> {
    /// View of an entire roster with nothing excluded.
    pub fn whole(roster: &'a [Agent]) -> Self {
        Self {
            before: roster,
            after: &[],
        }
    }

    /// Split `roster` into the agent at `index` and a view of everyone else.
    pub fn split(roster: &'a mut [Agent], index: usize) -> Option<(&'a mut Agent, Self)> {
        let (before, rest) = roster.split_at_mut(index);
        let (current, after) = rest.split_first_mut()?;
        Some((current, Self { before, after }))
    }

    /// Visible agents in roster order, paired with their full-roster index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Agent)> + 'a {
        let (before, after) = (self.before, self.after);
        let offset = before.len() + 1;
        before
            .iter()
            .enumerate()
            .chain(after.iter().enumerate().map(move |(i, a)| (i + offset, a)))
    }

    /// Closest living prey strictly within `vision` of `position`.
    ///
    /// Prey that are already dead (starved, too old, or eaten) are skipped.
    /// Ties go to the earliest roster entry.
    pub fn nearest_prey(&self, position: [f64; 2], vision: u32) -> Option<PreySighting> {
        let mut best: Option<(usize, &Agent, f64)> = None;
        for (index, agent) in self.iter() {
            if agent.species != Species::Prey || agent.is_dead() {
                continue;
            }
            let dx = agent.position[0] - position[0];
            let dy = agent.position[1] - position[1];
            let dist_sq = dx * dx + dy * dy;
            if best.is_none_or(|(_, _, current)| dist_sq < current) {
                best = Some((index, agent, dist_sq));
            }
        }

        let (index, prey, dist_sq) = best?;
        let vision = f64::from(vision);
        (dist_sq < vision * vision).then(|| PreySighting {
            index,
            position: prey.position,
            speed: prey.speed,
            distance: dist_sq.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Agent> {
        vec![
            Agent::prey([0.0, 0.0], 3.0, 1.0),
            Agent::predator([5.0, 5.0], 3.0, 2.0),
            Agent::prey([6.0, 5.0], 3.0, 1.5),
            Agent::prey([5.0, 7.0], 3.0, 1.0),
        ]
    }

    #[test]
    fn split_excludes_current_and_keeps_indices() {
        let mut agents = roster();
        let (current, view) = RosterView::split(&mut agents, 1).expect("index in range");
        assert_eq!(current.species, Species::Predator);
        let indices: Vec<usize> = view.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn split_out_of_range_is_none() {
        let mut agents = roster();
        assert!(RosterView::split(&mut agents, 4).is_none());
    }

    #[test]
    fn nearest_prey_picks_closest_living() {
        let mut agents = roster();
        let view = RosterView::whole(&agents);
        let sighting = view.nearest_prey([5.0, 5.0], 7).expect("prey in sight");
        assert_eq!(sighting.index, 2);
        assert_eq!(sighting.distance, 1.0);
        assert_eq!(sighting.speed, 1.5);

        agents[2].eaten = true;
        let view = RosterView::whole(&agents);
        assert_eq!(view.nearest_prey([5.0, 5.0], 7).map(|s| s.index), Some(3));

        agents[3].food = 0.0;
        let view = RosterView::whole(&agents);
        assert!(view.nearest_prey([5.0, 5.0], 7).is_none());
        assert_eq!(view.nearest_prey([5.0, 5.0], 8).map(|s| s.index), Some(0));
    }

    #[test]
    fn nearest_prey_respects_vision_strictly() {
        let agents = vec![Agent::prey([0.0, 7.0], 3.0, 1.0)];
        let view = RosterView::whole(&agents);
        assert!(view.nearest_prey([0.0, 0.0], 7).is_none());
        assert!(view.nearest_prey([0.0, 0.0], 8).is_some());
    }

    #[test]
    fn nearest_prey_prefers_first_on_ties() {
        let agents = vec![
            Agent::prey([4.0, 5.0], 3.0, 1.0),
            Agent::prey([6.0, 5.0], 3.0, 1.0),
        ];
        let view = RosterView::whole(&agents);
        assert_eq!(view.nearest_prey([5.0, 5.0], 3).map(|s| s.index), Some(0));
    }

    #[test]
    fn empty_view_sees_nothing() {
        let view = RosterView::whole(&[]);
        assert!(view.iter().next().is_none());
        assert!(view.nearest_prey([0.0, 0.0], 10).is_none());
    }
}
