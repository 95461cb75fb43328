use crate::hand::{Hand, BLACKJACK};

/// Dealer score at or above which the dealer always stands.
pub const DEALER_STAND_THRESHOLD: u8 = 17;

/// Decides whether the dealer must draw one more card.
///
/// The dealer stands on 17 or better, and also stands immediately once the
/// player has busted: the round is already decided, so further draws are
/// skipped rather than played out. The caller re-evaluates after each
/// single-card draw; the loop terminates because the dealer's score is
/// monotonically non-decreasing per draw.
pub fn dealer_should_hit(player: &Hand, dealer: &Hand) -> bool {
    if player.score() > BLACKJACK {
        return false;
    }
    dealer.score() < DEALER_STAND_THRESHOLD
}
