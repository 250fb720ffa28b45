use std::path::Path;

use crate::{Action, Observation, Outcome, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::value_table::{StateAction, ValueTable};
use super::{random_action, Agent, AgentKind};

/// On-policy one-step TD control.
///
/// Exploration follows a GLIE schedule: in episode `k` (counting from zero)
/// the greedy action is replaced by a random one with probability `1/(k+1)`.
#[derive(Debug, Clone)]
pub struct Sarsa<R = StdRng> {
    table: ValueTable,
    previous: Option<StateAction>,
    episode_count: u64,
    rng: R,
}

impl Sarsa<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Sarsa<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Sarsa<R> {
    pub fn with_rng(rng: R) -> Self {
        Sarsa {
            table: ValueTable::new(),
            previous: None,
            episode_count: 0,
            rng,
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn episode_count(&self) -> u64 {
        self.episode_count
    }

    pub fn exploration_rate(&self) -> f64 {
        1.0 / (self.episode_count + 1) as f64
    }
}

impl<R: Rng> Agent for Sarsa<R> {
    fn name(&self) -> &str {
        AgentKind::Sarsa.name()
    }

    fn select_action(&mut self, observation: &Observation) -> Action {
        let state = observation.state;
        let mut action = self.table.greedy_action(&state, &mut self.rng);
        if self.rng.gen::<f64>() < self.exploration_rate() {
            action = random_action(&mut self.rng);
        }

        if let Some(previous) = self.previous {
            // No reward arrives before the game ends.
            let target = self.table.value(&state, action);
            self.table.update_toward(previous, target);
        }

        self.previous = Some(StateAction::new(state, action));
        action
    }

    /// The terminal state has no action of its own; its Stay estimate stands
    /// in for the next action value. The last pair is kept, so the first
    /// decision of the next episode updates it once more.
    fn receive_result(&mut self, terminal: &Observation, outcome: Outcome) {
        if let Some(previous) = self.previous {
            let target = outcome.reward() + self.table.value(&terminal.state, Action::Stay);
            self.table.update_toward(previous, target);
        }
        self.episode_count += 1;
    }

    fn load_table(&mut self, path: &Path) -> Result<()> {
        self.table = ValueTable::load(path)?;
        Ok(())
    }

    fn save_table(&self, path: &Path) -> Result<()> {
        self.table.save(path)
    }
}
