use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Blackjack bust threshold; a hand scoring above this has busted.
pub const BLACKJACK: u8 = 21;

/// An ordered sequence of cards held by one party (player or dealer)
/// during a round.
///
/// A hand only grows, by appending cards drawn from the deck service, and
/// is reset to empty at round start. The score is always recomputed from
/// the cards, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Appends a drawn card. Hands never shrink within a round.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Empties the hand for a new round.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Blackjack point total of the hand.
    ///
    /// Every card contributes its point value (aces start at 11); while the
    /// total exceeds 21 and a soft ace remains, one ace is re-counted as 1.
    /// The result may still exceed 21 - that is a bust, which this function
    /// does not itself classify. An empty hand scores 0.
    pub fn score(&self) -> u8 {
        let mut total: u8 = self.cards.iter().map(|c| c.rank.point_value()).sum();
        let mut soft_aces = self
            .cards
            .iter()
            .filter(|c| c.rank == Rank::Ace)
            .count() as u8;

        while total > BLACKJACK && soft_aces > 0 {
            total -= 10;
            soft_aces -= 1;
        }

        total
    }

    /// A natural: exactly two cards scoring 21.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.score() == BLACKJACK
    }

    /// Over 21 after soft-ace adjustment.
    pub fn is_bust(&self) -> bool {
        self.score() > BLACKJACK
    }

    /// Readable "Value Suit" labels, comma separated, e.g.
    /// `Ace Spades, King Hearts`.
    pub fn labels(&self) -> String {
        self.cards
            .iter()
            .map(Card::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn hand_of(ranks: &[Rank]) -> Hand {
        ranks
            .iter()
            .map(|&rank| Card {
                rank,
                suit: Suit::Clubs,
            })
            .collect()
    }

    #[test]
    fn empty_hand_scores_zero() {
        assert_eq!(Hand::new().score(), 0);
    }

    #[test]
    fn hand_without_aces_sums_face_values() {
        let hand = hand_of(&[Rank::Two, Rank::Nine, Rank::King]);
        assert_eq!(hand.score(), 21);
        assert!(!hand.is_blackjack());
    }

    #[test]
    fn single_ace_counts_eleven_when_it_fits() {
        let hand = hand_of(&[Rank::Ace, Rank::Seven]);
        assert_eq!(hand.score(), 18);
    }

    #[test]
    fn two_aces_and_nine_make_twenty_one() {
        // One ace soft (11), the other adjusted to 1.
        let hand = hand_of(&[Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(hand.score(), 21);
    }

    #[test]
    fn bust_without_aces_stays_over_21() {
        let hand = hand_of(&[Rank::Ten, Rank::Ten, Rank::Five]);
        assert_eq!(hand.score(), 25);
        assert!(hand.is_bust());
    }

    #[test]
    fn all_aces_adjust_until_under_threshold() {
        let hand = hand_of(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Ace]);
        assert_eq!(hand.score(), 14);
    }

    #[test]
    fn scoring_is_idempotent_for_unmutated_hand() {
        let hand = hand_of(&[Rank::Ace, Rank::Six, Rank::Nine]);
        assert_eq!(hand.score(), hand.score());
    }

    #[test]
    fn two_card_twenty_one_is_blackjack() {
        let hand = hand_of(&[Rank::Ace, Rank::King]);
        assert!(hand.is_blackjack());
        assert!(!hand.is_bust());
    }

    #[test]
    fn three_card_twenty_one_is_not_blackjack() {
        let hand = hand_of(&[Rank::Seven, Rank::Seven, Rank::Seven]);
        assert_eq!(hand.score(), 21);
        assert!(!hand.is_blackjack());
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut hand = hand_of(&[Rank::Ten, Rank::Four]);
        hand.clear();
        assert!(hand.is_empty());
        assert_eq!(hand.score(), 0);
    }

    #[test]
    fn labels_join_cards_in_draw_order() {
        let mut hand = Hand::new();
        hand.push(Card {
            rank: Rank::Ace,
            suit: Suit::Spades,
        });
        hand.push(Card {
            rank: Rank::Ten,
            suit: Suit::Hearts,
        });
        assert_eq!(hand.labels(), "Ace Spades, 10 Hearts");
    }
}
