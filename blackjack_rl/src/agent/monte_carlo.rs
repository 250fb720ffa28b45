use std::path::Path;

use crate::{Action, Observation, Outcome, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::value_table::{StateAction, ValueTable};
use super::{Agent, AgentKind};

/// Every-visit Monte Carlo control. Plays greedily, remembers every decision
/// of the episode and averages the final reward into each of them.
#[derive(Debug, Clone)]
pub struct MonteCarlo<R = StdRng> {
    table: ValueTable,
    trajectory: Vec<StateAction>,
    rng: R,
}

impl MonteCarlo<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for MonteCarlo<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MonteCarlo<R> {
    pub fn with_rng(rng: R) -> Self {
        MonteCarlo {
            table: ValueTable::new(),
            trajectory: Vec::new(),
            rng,
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }
}

impl<R: Rng> Agent for MonteCarlo<R> {
    fn name(&self) -> &str {
        AgentKind::MonteCarlo.name()
    }

    fn select_action(&mut self, observation: &Observation) -> Action {
        let state = observation.state;
        let action = self.table.greedy_action(&state, &mut self.rng);
        self.trajectory.push(StateAction::new(state, action));
        action
    }

    fn receive_result(&mut self, _terminal: &Observation, outcome: Outcome) {
        let reward = outcome.reward();
        for pair in self.trajectory.drain(..) {
            self.table.update_toward(pair, reward);
        }
    }

    fn load_table(&mut self, path: &Path) -> Result<()> {
        self.table = ValueTable::load(path)?;
        Ok(())
    }

    fn save_table(&self, path: &Path) -> Result<()> {
        self.table.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::value_table::LOADED_VISITS;
    use crate::State;

    fn observe(state: State) -> Observation {
        Observation {
            state,
            total: state.player_total(),
        }
    }

    #[test]
    fn identical_episodes_converge_to_their_reward() {
        let mut agent = MonteCarlo::seeded(5);
        let first = State::new(0, 12, 10);
        let second = State::new(0, 15, 10);
        for _ in 0..20 {
            agent.select_action(&observe(first));
            agent.select_action(&observe(second));
            agent.receive_result(&observe(second), Outcome::Lose);
        }
        for state in [first, second] {
            for action in [Action::Hit, Action::Stay] {
                let estimate = agent.table().get(&state, action);
                if estimate.visits > 0 {
                    assert_eq!(estimate.value, -1.0);
                }
            }
        }
        let visits: u32 = [Action::Hit, Action::Stay]
            .iter()
            .map(|&action| agent.table().get(&first, action).visits)
            .sum();
        assert_eq!(visits, 20);
    }

    #[test]
    fn greedy_after_learning() {
        let mut agent = MonteCarlo::seeded(1);
        let state = State::new(0, 20, 6);
        // Keep going until staying has been tried and rewarded.
        for _ in 0..50 {
            let action = agent.select_action(&observe(state));
            let outcome = match action {
                Action::Stay => Outcome::Win,
                Action::Hit => Outcome::Lose,
            };
            agent.receive_result(&observe(state), outcome);
        }
        assert_eq!(agent.select_action(&observe(state)), Action::Stay);
        assert_eq!(agent.table().value(&state, Action::Stay), 1.0);
    }

    #[test]
    fn trajectory_is_cleared_after_each_episode() {
        let mut agent = MonteCarlo::seeded(2);
        let state = State::new(1, 3, 4);
        agent.select_action(&observe(state));
        agent.receive_result(&observe(state), Outcome::Win);
        agent.receive_result(&observe(state), Outcome::Lose);
        let total_visits = agent.table().get(&state, Action::Hit).visits
            + agent.table().get(&state, Action::Stay).visits;
        assert_eq!(total_visits, 1);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MonteCarlo.csv");
        let mut agent = MonteCarlo::seeded(3);
        let state = State::new(0, 9, 2);
        for outcome in [Outcome::Win, Outcome::Lose, Outcome::Win] {
            agent.select_action(&observe(state));
            agent.receive_result(&observe(state), outcome);
        }
        agent.save_table(&path).unwrap();

        let mut restored = MonteCarlo::seeded(4);
        restored.load_table(&path).unwrap();
        for action in [Action::Hit, Action::Stay] {
            let original = agent.table().value(&state, action);
            let loaded = restored.table().get(&state, action);
            assert!((original - loaded.value).abs() < 0.0005);
            assert_eq!(loaded.visits, LOADED_VISITS);
        }
    }
}
