use std::path::Path;

use crate::{Action, Observation, Outcome, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::value_table::{indexed_path, StateAction, ValueTable};
use super::{argmax, Agent, AgentKind};

/// Double Q-learning. Two tables are kept; at every step one of them, chosen
/// at random, is updated using the other as its target.
///
/// Actions are chosen greedily on the sum of both tables. The last pair of an
/// episode is kept and updated again by the next episode's first decision.
#[derive(Debug, Clone)]
pub struct DoubleQLearning<R = StdRng> {
    tables: [ValueTable; 2],
    previous: Option<StateAction>,
    rng: R,
}

impl DoubleQLearning<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for DoubleQLearning<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DoubleQLearning<R> {
    pub fn with_rng(rng: R) -> Self {
        DoubleQLearning {
            tables: [ValueTable::new(), ValueTable::new()],
            previous: None,
            rng,
        }
    }

    pub fn tables(&self) -> &[ValueTable; 2] {
        &self.tables
    }

    /// Returns (update, target) table indices.
    fn split(&mut self) -> (usize, usize) {
        let update = self.rng.gen_range(0..2);
        (update, 1 - update)
    }
}

impl<R: Rng> Agent for DoubleQLearning<R> {
    fn name(&self) -> &str {
        AgentKind::DoubleQLearning.name()
    }

    fn select_action(&mut self, observation: &Observation) -> Action {
        let state = observation.state;
        let (update, target) = self.split();

        let [a, b] = &self.tables;
        let hit = a.value(&state, Action::Hit) + b.value(&state, Action::Hit);
        let stay = a.value(&state, Action::Stay) + b.value(&state, Action::Stay);
        let action = argmax(hit, stay, &mut self.rng);
        let best = self.tables[target].greedy_action(&state, &mut self.rng);

        if let Some(previous) = self.previous {
            let bootstrap = self.tables[target].value(&state, best);
            self.tables[update].update_toward(previous, bootstrap);
        }

        self.previous = Some(StateAction::new(state, action));
        action
    }

    fn receive_result(&mut self, _terminal: &Observation, outcome: Outcome) {
        let (update, _) = self.split();
        if let Some(previous) = self.previous {
            self.tables[update].update_toward(previous, outcome.reward());
        }
    }

    /// Reads `<stem>_0` and `<stem>_1` next to `path`.
    fn load_table(&mut self, path: &Path) -> Result<()> {
        for (index, table) in self.tables.iter_mut().enumerate() {
            *table = ValueTable::load(&indexed_path(path, index))?;
        }
        Ok(())
    }

    /// Writes `<stem>_0` and `<stem>_1` next to `path`.
    fn save_table(&self, path: &Path) -> Result<()> {
        for (index, table) in self.tables.iter().enumerate() {
            table.save(&indexed_path(path, index))?;
        }
        Ok(())
    }
}
