use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InvalidTransition;

/// Phase of the current round, as observable between requests.
///
/// The dealer's turn is transient: a stand runs the dealer-draw loop to
/// completion and settles the round inside a single transition, so no
/// request ever finds the session mid-dealer-turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// Hands are empty; the next action deals a fresh round.
    AwaitingDeal,
    /// The player is drawing or standing.
    PlayerTurn,
    /// An outcome has been recorded; shuffle starts the next round.
    RoundSettled,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundPhase::AwaitingDeal => "awaiting deal",
            RoundPhase::PlayerTurn => "player turn",
            RoundPhase::RoundSettled => "round settled",
        };
        f.write_str(name)
    }
}

/// The four round-phase triggers arriving from the request layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundAction {
    Deal,
    Hit,
    Stand,
    Shuffle,
}

impl fmt::Display for RoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundAction::Deal => "deal",
            RoundAction::Hit => "hit",
            RoundAction::Stand => "stand",
            RoundAction::Shuffle => "shuffle",
        };
        f.write_str(name)
    }
}

impl RoundPhase {
    /// The explicit phase x action table. Shuffle is permitted from every
    /// phase (it both aborts a round in progress and starts the next one);
    /// everything else is only valid in its own phase.
    pub fn permits(&self, action: RoundAction) -> bool {
        match (self, action) {
            (_, RoundAction::Shuffle) => true,
            (RoundPhase::AwaitingDeal, RoundAction::Deal) => true,
            (RoundPhase::PlayerTurn, RoundAction::Hit | RoundAction::Stand) => true,
            _ => false,
        }
    }

    /// Validates an action against the table, rejecting undefined
    /// (phase, action) pairs before any state is touched.
    pub fn check(&self, action: RoundAction) -> Result<(), InvalidTransition> {
        if self.permits(action) {
            Ok(())
        } else {
            Err(InvalidTransition {
                phase: *self,
                action,
            })
        }
    }

    /// The actions currently worth offering to the player.
    pub fn available_actions(&self) -> Vec<RoundAction> {
        match self {
            RoundPhase::AwaitingDeal => vec![RoundAction::Deal],
            RoundPhase::PlayerTurn => {
                vec![RoundAction::Hit, RoundAction::Stand, RoundAction::Shuffle]
            }
            RoundPhase::RoundSettled => vec![RoundAction::Shuffle],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deal_only_valid_while_awaiting() {
        assert!(RoundPhase::AwaitingDeal.permits(RoundAction::Deal));
        assert!(!RoundPhase::PlayerTurn.permits(RoundAction::Deal));
        assert!(!RoundPhase::RoundSettled.permits(RoundAction::Deal));
    }

    #[test]
    fn hit_and_stand_only_valid_in_player_turn() {
        for action in [RoundAction::Hit, RoundAction::Stand] {
            assert!(RoundPhase::PlayerTurn.permits(action));
            assert!(!RoundPhase::AwaitingDeal.permits(action));
            assert!(!RoundPhase::RoundSettled.permits(action));
        }
    }

    #[test]
    fn shuffle_valid_everywhere() {
        for phase in [
            RoundPhase::AwaitingDeal,
            RoundPhase::PlayerTurn,
            RoundPhase::RoundSettled,
        ] {
            assert!(phase.permits(RoundAction::Shuffle));
        }
    }

    #[test]
    fn check_reports_phase_and_action() {
        let err = RoundPhase::AwaitingDeal
            .check(RoundAction::Stand)
            .expect_err("stand should be rejected");
        assert_eq!(err.phase, RoundPhase::AwaitingDeal);
        assert_eq!(err.action, RoundAction::Stand);
        assert_eq!(
            err.to_string(),
            "action stand is not valid during awaiting deal"
        );
    }

    #[test]
    fn available_actions_match_table() {
        for phase in [
            RoundPhase::AwaitingDeal,
            RoundPhase::PlayerTurn,
            RoundPhase::RoundSettled,
        ] {
            for action in phase.available_actions() {
                assert!(phase.permits(action));
            }
        }
    }
}
