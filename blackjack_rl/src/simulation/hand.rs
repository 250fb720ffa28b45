use crate::{soft_total, Observation, State, ACE, BLACKJACK};

/// How a hand turns its cards into a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    /// Aces count 11 and are demoted to 1 one at a time while the hand busts.
    Soft,
    /// Plain sum of the card values. Used for the dealer, whose aces never
    /// demote.
    Raw,
}

/// The cards dealt to one participant of a game.
#[derive(Debug, Clone)]
pub struct Hand {
    cards: Vec<u8>,
    scoring: Scoring,
    total: u8,
}

impl Hand {
    pub fn player() -> Hand {
        Hand::with_scoring(Scoring::Soft)
    }

    pub fn dealer() -> Hand {
        Hand::with_scoring(Scoring::Raw)
    }

    fn with_scoring(scoring: Scoring) -> Hand {
        Hand {
            cards: Vec::with_capacity(5),
            scoring,
            total: 0,
        }
    }

    /// Receives a card and refreshes the total.
    pub fn add_card(&mut self, card: u8) {
        self.cards.push(card);
        self.total = match self.scoring {
            Scoring::Soft => soft_total(self.ace_count(), self.non_ace_sum()),
            Scoring::Raw => self.cards.iter().sum(),
        };
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn is_bust(&self) -> bool {
        self.total > BLACKJACK
    }

    /// The first card dealt, shown face up.
    pub fn visible_card(&self) -> Option<u8> {
        self.cards.first().copied()
    }

    pub fn cards(&self) -> &[u8] {
        &self.cards
    }

    pub fn ace_count(&self) -> u8 {
        self.cards.iter().filter(|&&card| card == ACE).count() as u8
    }

    pub fn non_ace_sum(&self) -> u8 {
        self.cards.iter().filter(|&&card| card != ACE).sum()
    }

    pub fn state(&self, dealer_card: u8) -> State {
        State::new(self.ace_count(), self.non_ace_sum(), dealer_card)
    }

    pub fn observation(&self, dealer_card: u8) -> Observation {
        Observation {
            state: self.state(dealer_card),
            total: self.total,
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self.cards, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with(cards: &[u8]) -> Hand {
        let mut hand = Hand::player();
        for &card in cards {
            hand.add_card(card);
        }
        hand
    }

    #[test]
    fn single_ace_counts_eleven_when_it_fits() {
        for rest in 0..=10u8 {
            let mut hand = Hand::player();
            hand.add_card(ACE);
            if rest > 0 {
                hand.add_card(rest);
            }
            assert_eq!(hand.total(), 11 + rest);
        }
    }

    #[test]
    fn single_ace_demotes_when_it_would_bust() {
        assert_eq!(player_with(&[ACE, 9, 5]).total(), 15);
        assert_eq!(player_with(&[ACE, 10, 10]).total(), 21);
        assert_eq!(player_with(&[ACE, 10, 10, 5]).total(), 26);
    }

    #[test]
    fn two_aces_and_nine_make_twenty_one() {
        let hand = player_with(&[ACE, ACE, 9]);
        assert_eq!(hand.total(), 21);
        assert!(!hand.is_bust());
    }

    #[test]
    fn demotes_aces_one_at_a_time() {
        assert_eq!(player_with(&[ACE, ACE]).total(), 12);
        assert_eq!(player_with(&[ACE, ACE, ACE, ACE]).total(), 14);
        assert_eq!(player_with(&[ACE, ACE, 10, 10]).total(), 22);
    }

    #[test]
    fn dealer_never_demotes_aces() {
        let mut dealer = Hand::dealer();
        dealer.add_card(ACE);
        dealer.add_card(ACE);
        assert_eq!(dealer.total(), 22);
        assert!(dealer.is_bust());
    }

    #[test]
    fn projects_onto_state() {
        let hand = player_with(&[ACE, 4, ACE, 3]);
        assert_eq!(hand.visible_card(), Some(ACE));
        assert_eq!(hand.state(9), State::new(2, 7, 9));
        let observation = hand.observation(9);
        assert_eq!(observation.total, 19);
        assert_eq!(observation.total, observation.state.player_total());
    }

    #[test]
    fn empty_hand_has_no_visible_card() {
        assert_eq!(Hand::dealer().visible_card(), None);
        assert_eq!(Hand::player().total(), 0);
    }
}
