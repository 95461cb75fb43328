pub mod game;
pub mod health;
pub mod history;

pub use game::{api_state, deal, hit, page, shuffle, stand};
pub use health::health;
pub use history::{get_recent_rounds, get_statistics, HistoryQuery};
