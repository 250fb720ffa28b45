pub mod agent;
mod error;
pub mod simulation;
pub mod training;

pub use error::{Error, Result};

use strum_macros::EnumIter;

/// Blackjack value of an ace before it gets demoted to 1.
pub const ACE: u8 = 11;
/// Anything above this busts.
pub const BLACKJACK: u8 = 21;
/// Fixed-threshold players (the dealer included) hit below this total.
pub const STAND_THRESHOLD: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Action {
    Hit,
    Stay,
}

/// Result of one game from the player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Lose,
}

impl Outcome {
    pub fn reward(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.0,
            Outcome::Lose => -1.0,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Outcome::Win => "win",
            Outcome::Draw => "draw",
            Outcome::Lose => "lose",
        };
        write!(f, "{}", text)
    }
}

/// The part of a hand an agent learns over. Two hands that project onto the
/// same state are the same thing as far as the value tables are concerned.
///
/// Field order matters: the derived `Ord` sorts by ace count, then non-ace sum,
/// then dealer card, which is the order value tables are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct State {
    pub ace_count: u8,
    pub non_ace_sum: u8,
    pub dealer_card: u8,
}

impl State {
    pub fn new(ace_count: u8, non_ace_sum: u8, dealer_card: u8) -> Self {
        State {
            ace_count,
            non_ace_sum,
            dealer_card,
        }
    }

    /// The soft total of any player hand projecting onto this state.
    pub fn player_total(&self) -> u8 {
        soft_total(self.ace_count, self.non_ace_sum)
    }
}

/// What a participant sees when asked for a decision: the learning state plus
/// its own total under its scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub state: State,
    pub total: u8,
}

pub(crate) fn soft_total(ace_count: u8, non_ace_sum: u8) -> u8 {
    let mut total = non_ace_sum + ace_count * ACE;
    let mut soft_aces = ace_count;
    while total > BLACKJACK && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total
}
