use std::path::Path;

use crate::{Action, Observation, Outcome, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::value_table::{StateAction, ValueTable};
use super::{Agent, AgentKind};

/// Off-policy one-step TD control. Acts greedily and bootstraps on the best
/// estimate of the state it lands in.
#[derive(Debug, Clone)]
pub struct QLearning<R = StdRng> {
    table: ValueTable,
    previous: Option<StateAction>,
    rng: R,
}

impl QLearning<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for QLearning<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QLearning<R> {
    pub fn with_rng(rng: R) -> Self {
        QLearning {
            table: ValueTable::new(),
            previous: None,
            rng,
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }
}

impl<R: Rng> Agent for QLearning<R> {
    fn name(&self) -> &str {
        AgentKind::QLearning.name()
    }

    fn select_action(&mut self, observation: &Observation) -> Action {
        let state = observation.state;
        let action = self.table.greedy_action(&state, &mut self.rng);

        if let Some(previous) = self.previous {
            let target = self.table.max_value(&state);
            self.table.update_toward(previous, target);
        }

        self.previous = Some(StateAction::new(state, action));
        action
    }

    /// Terminal states are worth nothing, so the last decision moves toward
    /// the reward alone. The pair stays as `previous` for the next episode.
    fn receive_result(&mut self, _terminal: &Observation, outcome: Outcome) {
        if let Some(previous) = self.previous {
            self.table.update_toward(previous, outcome.reward());
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
