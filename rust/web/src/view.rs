//! Server-rendered HTML for the table. One full page per request; the
//! only script involved is the card-reveal animation served from static
//! assets.

use blackjack_engine::round::RoundAction;

use crate::session::{GameSnapshot, SeatSnapshot};

/// Face-down image shown in place of the dealer's hole card until the
/// player's turn is over. Served by the same host as the card faces.
pub const CARD_BACK_URL: &str = "https://deckofcardsapi.com/static/img/back.png";

/// Renders the whole table page for the given snapshot.
pub fn render_page(snapshot: &GameSnapshot) -> String {
    let dealer_cards = render_seat(&snapshot.dealer, snapshot.dealer_hole_hidden);
    let player_cards = render_seat(&snapshot.player, false);
    let dealer_score = if snapshot.dealer_hole_hidden {
        "?".to_string()
    } else {
        snapshot.dealer.score.to_string()
    };
    let actions = render_actions(&snapshot.available_actions);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Blackjack</title>
    <link rel="stylesheet" href="/static/styles.css">
</head>
<body>
    <main class="table">
        <h1>Blackjack</h1>
        <section class="seat dealer">
            <h2>Dealer <span class="score">{dealer_score}</span></h2>
            <div class="cards">{dealer_cards}</div>
        </section>
        <section class="seat player">
            <h2>Player <span class="score">{player_score}</span></h2>
            <div class="cards">{player_cards}</div>
        </section>
        <p class="message">{message}</p>
        <nav class="actions">{actions}</nav>
        <footer class="deck-status">Cards remaining: {remaining}</footer>
    </main>
    <script src="/static/display.js"></script>
</body>
</html>
"##,
        dealer_score = dealer_score,
        dealer_cards = dealer_cards,
        player_score = snapshot.player.score,
        player_cards = player_cards,
        message = escape(&snapshot.message),
        actions = actions,
        remaining = snapshot.deck.remaining,
    )
}

fn render_seat(seat: &SeatSnapshot, hide_hole: bool) -> String {
    let mut html = String::new();
    for (idx, card) in seat.cards.iter().enumerate() {
        // The hole card is the dealer's first card.
        let (src, alt) = if hide_hole && idx == 0 {
            (CARD_BACK_URL, "face-down card".to_string())
        } else {
            (card.image.as_str(), card.label.clone())
        };
        html.push_str(&format!(
            r#"<img class="card" src="{}" alt="{}">"#,
            escape(src),
            escape(&alt)
        ));
    }
    html
}

fn render_actions(actions: &[RoundAction]) -> String {
    actions
        .iter()
        .map(|action| {
            let (href, label) = match action {
                RoundAction::Deal => ("/deal", "Deal"),
                RoundAction::Hit => ("/hit", "Hit"),
                RoundAction::Stand => ("/stand", "Stand"),
                RoundAction::Shuffle => ("/shuffle", "Shuffle"),
            };
            format!(r#"<a class="action" id="{}" href="{}">{}</a>"#, label.to_lowercase(), href, label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
