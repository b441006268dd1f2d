//! Deterministic round-robin leader schedule.

use sequencer_derive::Error;

/// Errors that can occur constructing a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A schedule cannot be built over zero validators.
    #[error("empty validator set")]
    EmptyValidatorSet,
}

/// Infinite round-robin sequence over a fixed validator list.
///
/// Position `k` always yields `validators[k mod n]`, so any replica can
/// recompute the leader for a given height from the list alone, without
/// shared mutable state. Iterating the schedule advances an internal cursor;
/// [`leader_at`](LeaderSchedule::leader_at) reads a position without moving it.
#[derive(Clone, Debug)]
pub struct LeaderSchedule {
    validators: Vec<String>,
    cursor: u64,
}

impl LeaderSchedule {
    /// Creates a schedule over the given validator list.
    pub fn new(validators: Vec<String>) -> Result<Self, ScheduleError> {
        if validators.is_empty() {
            return Err(ScheduleError::EmptyValidatorSet);
        }
        Ok(Self {
            validators,
            cursor: 0,
        })
    }

    /// Returns the leader for an arbitrary position.
    pub fn leader_at(&self, position: u64) -> &str {
        let index = (position % self.validators.len() as u64) as usize;
        &self.validators[index]
    }

}

impl Iterator for LeaderSchedule {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let leader = self.leader_at(self.cursor).to_string();
        self.cursor += 1;
        Some(leader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(names: &[&str]) -> LeaderSchedule {
        LeaderSchedule::new(names.iter().map(|n| n.to_string()).collect())
            .expect("non-empty validator set")
    }

    #[test]
    fn cycles_in_original_order() {
        let leaders: Vec<String> = schedule(&["A", "B", "C"]).take(5).collect();
        assert_eq!(leaders, ["A", "B", "C", "A", "B"]);
    }

    #[test]
    fn position_is_pure_modulo() {
        let sched = schedule(&["A", "B", "C"]);
        for k in 0..20u64 {
            assert_eq!(sched.leader_at(k), sched.leader_at(k + 3));
            assert_eq!(
                sched.leader_at(k),
                ["A", "B", "C"][(k % 3) as usize]
            );
        }
    }

    #[test]
    fn fresh_schedule_restarts_from_head() {
        let first: Vec<String> = schedule(&["A", "B"]).take(4).collect();
        let second: Vec<String> = schedule(&["A", "B"]).take(4).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn iteration_agrees_with_leader_at() {
        let reference = schedule(&["A", "B", "C"]);
        for (k, leader) in schedule(&["A", "B", "C"]).take(9).enumerate() {
            assert_eq!(leader, reference.leader_at(k as u64));
        }
    }

    #[test]
    fn single_validator_always_leads() {
        let leaders: Vec<String> = schedule(&["solo"]).take(3).collect();
        assert_eq!(leaders, ["solo", "solo", "solo"]);
    }

    #[test]
    fn empty_validator_set_rejected() {
        assert!(matches!(
            LeaderSchedule::new(Vec::new()),
            Err(ScheduleError::EmptyValidatorSet)
        ));
    }
}
