pub mod deck;
pub mod hand;

use crate::{agent::Agent, Action, Error, Observation, Outcome, Result, BLACKJACK};
use blackjack_rl_macros::allowed_phase;
use log::debug;
use rand::Rng;

use self::{deck::Deck, hand::Hand};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    Deal,
    PlayerTurn,
    DealerTurn,
    Terminal,
}

/// One game of blackjack between a player agent and a dealer agent. A game
/// owns a fresh deck and both hands, and is thrown away once it produces an
/// outcome.
///
/// Note that the dealer's hand is scored as a raw sum: dealt aces always count
/// 11 for the dealer.
pub struct Game<'a> {
    phase: GamePhase,
    deck: Deck,
    dealer_hand: Hand,
    player_hand: Hand,
    /// The dealer's face-up card, as the player sees it.
    dealer_card: u8,
    dealer: &'a mut dyn Agent,
    player: &'a mut dyn Agent,
    outcome: Option<Outcome>,
}

impl<'a> Game<'a> {
    /// Creates a game with a freshly shuffled deck.
    pub fn new<R: Rng + ?Sized>(
        dealer: &'a mut dyn Agent,
        player: &'a mut dyn Agent,
        rng: &mut R,
    ) -> Self {
        Self::with_deck(dealer, player, Deck::shuffled(rng))
    }

    pub fn with_deck(dealer: &'a mut dyn Agent, player: &'a mut dyn Agent, deck: Deck) -> Self {
        Self {
            phase: GamePhase::Deal,
            deck,
            dealer_hand: Hand::dealer(),
            player_hand: Hand::player(),
            dealer_card: 0,
            dealer,
            player,
            outcome: None,
        }
    }

    /// Plays the whole game and returns the outcome from the player's
    /// perspective. Can be called at Deal phase.
    #[allowed_phase(Deal)]
    pub fn play(&mut self) -> Result<Outcome> {
        self.deal_initial_cards()?;
        let outcome = match self.player_turn()? {
            Some(outcome) => outcome,
            None => self.dealer_turn()?,
        };
        Ok(outcome)
    }

    /// Can be called at Deal phase.
    /// Deals two cards each, alternating player and dealer, and shows the
    /// dealer's first card to the player.
    #[allowed_phase(Deal)]
    pub fn deal_initial_cards(&mut self) -> Result<()> {
        for _ in 0..2 {
            let card = self.draw()?;
            self.player_hand.add_card(card);
            let card = self.draw()?;
            self.dealer_hand.add_card(card);
        }
        self.dealer_card = self.dealer_hand.visible_card().ok_or(Error::DeckExhausted)?;
        debug!("player {} dealer {}", self.player_hand, self.dealer_hand);

        self.phase = GamePhase::PlayerTurn;
        Ok(())
    }

    /// Can be called at PlayerTurn phase.
    /// Lets the player act until the game ends or the player stays. Returns the
    /// outcome if the game ended before the dealer's turn.
    #[allowed_phase(PlayerTurn)]
    pub fn player_turn(&mut self) -> Result<Option<Outcome>> {
        loop {
            let early_end = if self.player_hand.is_bust() {
                debug!("player busts");
                Some(Outcome::Lose)
            } else if self.dealer_hand.is_bust() {
                debug!("dealer busts");
                Some(Outcome::Win)
            } else if self.player_hand.total() == BLACKJACK {
                debug!("player reaches {}", BLACKJACK);
                Some(Outcome::Win)
            } else if self.dealer_hand.total() == BLACKJACK {
                debug!("dealer reaches {}", BLACKJACK);
                Some(Outcome::Lose)
            } else {
                None
            };
            if let Some(outcome) = early_end {
                self.finish(outcome);
                return Ok(Some(outcome));
            }

            let observation = self.player_observation();
            match self.player.select_action(&observation) {
                Action::Hit => {
                    let card = self.draw()?;
                    self.player_hand.add_card(card);
                    debug!("player hits {}: {}", card, self.player_hand);
                }
                Action::Stay => {
                    debug!("player stays at {}", self.player_hand.total());
                    self.phase = GamePhase::DealerTurn;
                    return Ok(None);
                }
            }
        }
    }

    /// Can be called at DealerTurn phase.
    /// Lets the dealer draw until it stays or busts, then compares totals.
    #[allowed_phase(DealerTurn)]
    pub fn dealer_turn(&mut self) -> Result<Outcome> {
        while !self.dealer_hand.is_bust() {
            let observation = self.dealer_hand.observation(self.dealer_card);
            if self.dealer.select_action(&observation) == Action::Stay {
                debug!("dealer stays at {}", self.dealer_hand.total());
                break;
            }
            let card = self.draw()?;
            self.dealer_hand.add_card(card);
            debug!("dealer hits {}: {}", card, self.dealer_hand);
        }

        let player_total = self.player_hand.total();
        let dealer_total = self.dealer_hand.total();
        let outcome = if self.dealer_hand.is_bust() || player_total > dealer_total {
            Outcome::Win
        } else if player_total == dealer_total {
            Outcome::Draw
        } else {
            Outcome::Lose
        };
        self.finish(outcome);
        Ok(outcome)
    }

    /// What the player currently sees. After the game is over this is the
    /// terminal observation handed back to the player agent with the outcome.
    pub fn player_observation(&self) -> Observation {
        self.player_hand.observation(self.dealer_card)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    fn draw(&mut self) -> Result<u8> {
        self.deck.deal().ok_or(Error::DeckExhausted)
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!("game ends: {} ({} cards left)", outcome, self.deck.remaining());
        self.outcome = Some(outcome);
        self.phase = GamePhase::Terminal;
    }
}
