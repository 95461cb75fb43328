use thiserror::Error;

use crate::round::{RoundAction, RoundPhase};

/// Card data that failed to parse from the deck service's wire format.
///
/// All cards originate from a trusted remote source, so either variant is
/// a data-integrity failure: the computation in progress is aborted and no
/// value is ever guessed in its place.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("unrecognized card rank: {0}")]
    InvalidRank(String),
    #[error("unrecognized card suit: {0}")]
    InvalidSuit(String),
}

/// A round action requested in a phase that does not support it.
/// Rejected before any state is mutated.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("action {action} is not valid during {phase}")]
pub struct InvalidTransition {
    pub phase: RoundPhase,
    pub action: RoundAction,
}
