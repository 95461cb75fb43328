//! Round flows through the game session with a scripted deck: cards are
//! predetermined, so every outcome is exact.

mod support;

use std::sync::Arc;

use blackjack_engine::cards::Rank;
use blackjack_engine::outcome::RoundOutcome;
use blackjack_engine::round::{RoundAction, RoundPhase};
use blackjack_web::{GameSession, HistoryStore, SessionError};

use support::ScriptedDeck;

async fn session_with(ranks: &[Rank]) -> (Arc<ScriptedDeck>, GameSession) {
    let deck = Arc::new(ScriptedDeck::new(ranks));
    let session = GameSession::connect(deck.clone())
        .await
        .expect("scripted connect never fails");
    (deck, session)
}

#[tokio::test]
async fn deal_gives_two_cards_each_and_starts_player_turn() {
    // Cards leave the script in dealing order: player, dealer, player, dealer.
    let (_, session) = session_with(&[Rank::Ten, Rank::Five, Rank::Seven, Rank::Nine]).await;

    let snapshot = session.deal().await.expect("deal");

    assert_eq!(snapshot.phase, RoundPhase::PlayerTurn);
    assert_eq!(snapshot.player.cards.len(), 2);
    assert_eq!(snapshot.dealer.cards.len(), 2);
    assert_eq!(snapshot.player.score, 17);
    assert_eq!(snapshot.dealer.score, 14);
    assert!(snapshot.dealer_hole_hidden);
    assert!(snapshot.outcome.is_none());
    assert_eq!(snapshot.deck.remaining, 48);
    assert!(snapshot.available_actions.contains(&RoundAction::Hit));
    assert!(snapshot.available_actions.contains(&RoundAction::Stand));
    assert!(!snapshot.available_actions.contains(&RoundAction::Deal));
}

#[tokio::test]
async fn natural_on_deal_settles_immediately() {
    let (_, session) = session_with(&[Rank::Ace, Rank::Nine, Rank::King, Rank::Eight]).await;

    let snapshot = session.deal().await.expect("deal");

    assert_eq!(snapshot.phase, RoundPhase::RoundSettled);
    assert_eq!(snapshot.outcome, Some(RoundOutcome::PlayerBlackjack));
    assert_eq!(snapshot.message, RoundOutcome::PlayerBlackjack.message());
    assert!(!snapshot.dealer_hole_hidden);
}

#[tokio::test]
async fn dealer_natural_is_detected_at_the_deal() {
    let (_, session) = session_with(&[Rank::Seven, Rank::Ace, Rank::Eight, Rank::King]).await;

    let snapshot = session.deal().await.expect("deal");

    // The player never gets a turn against a dealer natural.
    assert_eq!(snapshot.phase, RoundPhase::RoundSettled);
    assert_eq!(snapshot.outcome, Some(RoundOutcome::DealerBlackjack));
}

#[tokio::test]
async fn hit_that_busts_settles_as_player_bust() {
    let (deck, session) = session_with(&[Rank::Ten, Rank::Five, Rank::Nine, Rank::Nine]).await;
    session.deal().await.expect("deal");

    deck.queue(&[Rank::King]);
    let snapshot = session.hit().await.expect("hit");

    assert_eq!(snapshot.player.score, 29);
    assert_eq!(snapshot.phase, RoundPhase::RoundSettled);
    assert_eq!(snapshot.outcome, Some(RoundOutcome::PlayerBust));
    // Dealer never drew against the busted player.
    assert_eq!(snapshot.dealer.cards.len(), 2);
}

#[tokio::test]
async fn stand_draws_dealer_to_seventeen_then_compares() {
    let (deck, session) = session_with(&[Rank::Ten, Rank::Five, Rank::Nine, Rank::Nine]).await;
    session.deal().await.expect("deal");

    // Dealer sits on 14 and must draw; a three reaches 17 and stops there.
    deck.queue(&[Rank::Three]);
    let snapshot = session.stand().await.expect("stand");

    assert_eq!(snapshot.dealer.cards.len(), 3);
    assert_eq!(snapshot.dealer.score, 17);
    assert_eq!(snapshot.phase, RoundPhase::RoundSettled);
    assert_eq!(snapshot.outcome, Some(RoundOutcome::PlayerWin));
}

#[tokio::test]
async fn dealer_bust_hands_the_round_to_the_player() {
    let (deck, session) = session_with(&[Rank::Ten, Rank::Ten, Rank::Eight, Rank::Six]).await;
    session.deal().await.expect("deal");

    deck.queue(&[Rank::King]);
    let snapshot = session.stand().await.expect("stand");

    assert_eq!(snapshot.dealer.score, 26);
    assert_eq!(snapshot.outcome, Some(RoundOutcome::DealerBust));
}

#[tokio::test]
async fn hit_before_deal_is_rejected_and_changes_nothing() {
    let (_, session) = session_with(&[]).await;
    let before = session.snapshot().await;

    let err = session.hit().await.expect_err("no round to hit in");
    assert!(matches!(err, SessionError::InvalidTransition(_)));

    assert_eq!(session.snapshot().await, before);
}

#[tokio::test]
async fn provider_failure_leaves_the_round_retryable() {
    let (deck, session) = session_with(&[Rank::Ten, Rank::Five, Rank::Seven, Rank::Nine]).await;
    session.deal().await.expect("deal");
    let before = session.snapshot().await;

    deck.set_failing(true);
    let err = session.hit().await.expect_err("provider is down");
    assert!(matches!(err, SessionError::Provider(_)));
    assert_eq!(session.snapshot().await, before);

    // Same action succeeds once the provider recovers.
    deck.set_failing(false);
    deck.queue(&[Rank::Two]);
    let snapshot = session.hit().await.expect("retried hit");
    assert_eq!(snapshot.player.score, 19);
    assert_eq!(snapshot.phase, RoundPhase::PlayerTurn);
}

#[tokio::test]
async fn shuffle_mid_round_resets_the_table() {
    let (_, session) = session_with(&[Rank::Ten, Rank::Five, Rank::Seven, Rank::Nine]).await;
    session.deal().await.expect("deal");

    let snapshot = session.shuffle().await.expect("shuffle");

    assert_eq!(snapshot.phase, RoundPhase::AwaitingDeal);
    assert!(snapshot.player.cards.is_empty());
    assert!(snapshot.dealer.cards.is_empty());
    assert!(snapshot.outcome.is_none());
    assert_eq!(snapshot.deck.remaining, 52);
    assert_eq!(snapshot.available_actions, vec![RoundAction::Deal]);
}

#[tokio::test]
async fn settled_rounds_land_in_history() {
    let deck = Arc::new(ScriptedDeck::new(&[
        Rank::Ace,
        Rank::Nine,
        Rank::King,
        Rank::Eight,
    ]));
    let history = Arc::new(HistoryStore::new());
    let session = GameSession::connect_with_history(deck, Some(history.clone()))
        .await
        .expect("connect");

    session.deal().await.expect("deal");

    assert_eq!(history.total_rounds().unwrap(), 1);
    let recent = history.recent_rounds(None).unwrap();
    assert_eq!(recent[0].outcome, RoundOutcome::PlayerBlackjack);
    assert_eq!(recent[0].player_score, 21);
    assert_eq!(recent[0].player_cards.len(), 2);
}

#[tokio::test]
async fn unsettled_rounds_stay_out_of_history() {
    let deck = Arc::new(ScriptedDeck::new(&[
        Rank::Ten,
        Rank::Five,
        Rank::Seven,
        Rank::Nine,
    ]));
    let history = Arc::new(HistoryStore::new());
    let session = GameSession::connect_with_history(deck, Some(history.clone()))
        .await
        .expect("connect");

    session.deal().await.expect("deal");

    assert_eq!(history.total_rounds().unwrap(), 0);
}
