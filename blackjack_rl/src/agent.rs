mod double_q;
mod interactive;
mod monte_carlo;
mod q_learning;
mod sarsa;
pub mod value_table;

pub use double_q::DoubleQLearning;
pub use interactive::Interactive;
pub use monte_carlo::MonteCarlo;
pub use q_learning::QLearning;
pub use sarsa::Sarsa;

use std::path::Path;

use crate::{Action, Observation, Outcome, Result, STAND_THRESHOLD};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::EnumIter;

/// Anything that can sit at the table: the dealer, a baseline player, a
/// learning player or a human.
pub trait Agent {
    fn name(&self) -> &str;

    /// Chooses what to do given the current observation.
    fn select_action(&mut self, observation: &Observation) -> Action;

    /// Called once per game after it ends, with the player's final observation.
    fn receive_result(&mut self, _terminal: &Observation, _outcome: Outcome) {}

    /// Seeds the learned values from a file written by `save_table`. A missing
    /// file means no prior knowledge.
    fn load_table(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn save_table(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// The algorithms a player can be trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Serialize_enum_str, Deserialize_enum_str)]
pub enum AgentKind {
    FixedThreshold,
    MonteCarlo,
    Sarsa,
    QLearning,
    DoubleQLearning,
}

impl AgentKind {
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::FixedThreshold => "FixedThreshold",
            AgentKind::MonteCarlo => "MonteCarlo",
            AgentKind::Sarsa => "Sarsa",
            AgentKind::QLearning => "QLearning",
            AgentKind::DoubleQLearning => "DoubleQLearning",
        }
    }

    /// Builds a fresh agent. Without a seed the agent's rng is seeded from
    /// entropy.
    pub fn build(&self, seed: Option<u64>) -> Box<dyn Agent> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        match self {
            AgentKind::FixedThreshold => Box::new(FixedThreshold::new()),
            AgentKind::MonteCarlo => Box::new(MonteCarlo::with_rng(rng)),
            AgentKind::Sarsa => Box::new(Sarsa::with_rng(rng)),
            AgentKind::QLearning => Box::new(QLearning::with_rng(rng)),
            AgentKind::DoubleQLearning => Box::new(DoubleQLearning::with_rng(rng)),
        }
    }
}

/// Hits below a fixed total and stays otherwise. This is how the dealer plays,
/// and the baseline the learners are compared against.
#[derive(Debug, Clone, Copy)]
pub struct FixedThreshold {
    threshold: u8,
}

impl FixedThreshold {
    pub fn new() -> Self {
        Self::with_threshold(STAND_THRESHOLD)
    }

    pub fn with_threshold(threshold: u8) -> Self {
        FixedThreshold { threshold }
    }
}

impl Default for FixedThreshold {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for FixedThreshold {
    fn name(&self) -> &str {
        AgentKind::FixedThreshold.name()
    }

    fn select_action(&mut self, observation: &Observation) -> Action {
        if observation.total < self.threshold {
            Action::Hit
        } else {
            Action::Stay
        }
    }
}

pub(crate) fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    if rng.gen_bool(0.5) {
        Action::Hit
    } else {
        Action::Stay
    }
}

/// Picks the action with the larger estimate, flipping a coin on a tie.
pub(crate) fn argmax<R: Rng + ?Sized>(hit: f64, stay: f64, rng: &mut R) -> Action {
    if hit > stay {
        Action::Hit
    } else if hit < stay {
        Action::Stay
    } else {
        random_action(rng)
    }
}
