use crate::ACE;

use rand::seq::SliceRandom;
use rand::Rng;

/// Number of cards valued 10 in a deck: the tens plus every face card.
const TENS_PER_DECK: usize = 16;
const SUITS: usize = 4;

/// A single 52-card deck in blackjack values. 2 to 10 as themselves, aces as 11.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<u8>,
    current_index: usize,
}

impl Deck {
    /// Creates a deck with the standard composition, shuffled by the given rng.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut cards = Vec::with_capacity(52);
        for value in 2..=9 {
            cards.extend(std::iter::repeat(value).take(SUITS));
        }
        cards.extend(std::iter::repeat(10).take(TENS_PER_DECK));
        cards.extend(std::iter::repeat(ACE).take(SUITS));
        cards.shuffle(rng);
        Deck {
            cards,
            current_index: 0,
        }
    }

    /// Creates a deck that deals the given cards front to back.
    pub fn from_cards(cards: Vec<u8>) -> Deck {
        Deck {
            cards,
            current_index: 0,
        }
    }

    /// Deals a card if the deck is not empty. Returns None if empty.
    pub fn deal(&mut self) -> Option<u8> {
        let card = self.cards.get(self.current_index).copied()?;
        self.current_index += 1;
        Some(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }
}
