use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hand::{Hand, BLACKJACK};

/// Classification of a settled round. Produced once per decision point and
/// immutable after that; cleared only when a new round starts.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    DealerBlackjack,
    PlayerBlackjack,
    PlayerBust,
    DealerBust,
    PlayerWin,
    DealerWin,
    Push,
}

impl RoundOutcome {
    /// True when the player takes the round.
    pub fn player_won(&self) -> bool {
        matches!(
            self,
            RoundOutcome::PlayerBlackjack | RoundOutcome::DealerBust | RoundOutcome::PlayerWin
        )
    }

    /// Table message shown to the player.
    pub fn message(&self) -> &'static str {
        match self {
            RoundOutcome::DealerBlackjack => "Dealer has Blackjack.",
            RoundOutcome::PlayerBlackjack => "Blackjack! Player wins!",
            RoundOutcome::PlayerBust => "Player busts and loses the bet.",
            RoundOutcome::DealerBust => "Dealer busts. Player wins.",
            RoundOutcome::PlayerWin => "Player wins!",
            RoundOutcome::DealerWin => "Dealer wins.",
            RoundOutcome::Push => "Push. Player's bet is returned.",
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Compares the player's and dealer's hands and returns exactly one
/// [`RoundOutcome`], first match wins:
///
/// 1. dealer natural, 2. player natural, 3. player bust, 4. dealer bust,
/// 5. higher player score, 6. higher dealer score, 7. push.
///
/// Naturals are checked before busts because a two-card 21 can never be a
/// bust, and the dealer's natural is checked first to match house-rules
/// precedence. No side effects; the caller persists the result.
pub fn evaluate_round(player: &Hand, dealer: &Hand) -> RoundOutcome {
    let player_score = player.score();
    let dealer_score = dealer.score();

    if dealer.is_blackjack() {
        RoundOutcome::DealerBlackjack
    } else if player.is_blackjack() {
        RoundOutcome::PlayerBlackjack
    } else if player_score > BLACKJACK {
        RoundOutcome::PlayerBust
    } else if dealer_score > BLACKJACK {
        RoundOutcome::DealerBust
    } else if player_score > dealer_score {
        RoundOutcome::PlayerWin
    } else if player_score < dealer_score {
        RoundOutcome::DealerWin
    } else {
        RoundOutcome::Push
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};

    fn hand_of(ranks: &[Rank]) -> Hand {
        ranks
            .iter()
            .map(|&rank| Card {
                rank,
                suit: Suit::Diamonds,
            })
            .collect()
    }

    #[test]
    fn player_natural_beats_dealer_nineteen() {
        let player = hand_of(&[Rank::Ace, Rank::King]);
        let dealer = hand_of(&[Rank::Nine, Rank::Eight]);
        assert_eq!(evaluate_round(&player, &dealer), RoundOutcome::PlayerBlackjack);
    }

    #[test]
    fn dealer_natural_takes_precedence_over_player_natural() {
        let player = hand_of(&[Rank::Ace, Rank::Queen]);
        let dealer = hand_of(&[Rank::Ace, Rank::King]);
        assert_eq!(evaluate_round(&player, &dealer), RoundOutcome::DealerBlackjack);
    }

    #[test]
    fn dealer_bust_loses_to_standing_player() {
        let player = hand_of(&[Rank::Ten, Rank::Nine]);
        let dealer = hand_of(&[Rank::Ten, Rank::Nine, Rank::Five]);
        assert_eq!(evaluate_round(&player, &dealer), RoundOutcome::DealerBust);
    }

    #[test]
    fn player_bust_checked_before_dealer_bust() {
        let player = hand_of(&[Rank::Ten, Rank::Ten, Rank::Five]);
        let dealer = hand_of(&[Rank::Ten, Rank::Ten, Rank::Five]);
        assert_eq!(evaluate_round(&player, &dealer), RoundOutcome::PlayerBust);
    }

    #[test]
    fn three_card_twenty_one_is_not_a_natural_win() {
        let player = hand_of(&[Rank::Seven, Rank::Seven, Rank::Seven]);
        let dealer = hand_of(&[Rank::Ten, Rank::Seven]);
        assert_eq!(evaluate_round(&player, &dealer), RoundOutcome::PlayerWin);
    }

    #[test]
    fn equal_scores_push() {
        let player = hand_of(&[Rank::Ten, Rank::Eight]);
        let dealer = hand_of(&[Rank::Ten, Rank::Eight]);
        assert_eq!(evaluate_round(&player, &dealer), RoundOutcome::Push);
    }

    #[test]
    fn higher_dealer_score_wins() {
        let player = hand_of(&[Rank::Ten, Rank::Seven]);
        let dealer = hand_of(&[Rank::Ten, Rank::Nine]);
        assert_eq!(evaluate_round(&player, &dealer), RoundOutcome::DealerWin);
    }

    #[test]
    fn player_won_covers_all_winning_variants() {
        assert!(RoundOutcome::PlayerBlackjack.player_won());
        assert!(RoundOutcome::DealerBust.player_won());
        assert!(RoundOutcome::PlayerWin.player_won());
        assert!(!RoundOutcome::DealerBlackjack.player_won());
        assert!(!RoundOutcome::Push.player_won());
    }

    #[test]
    fn outcome_serializes_snake_case() {
        let json = serde_json::to_string(&RoundOutcome::DealerBlackjack).expect("serialize");
        assert_eq!(json, "\"dealer_blackjack\"");
    }
}
