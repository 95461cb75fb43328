use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging for the application. `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blackjack_web=debug"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    // A second init (e.g. across tests) is not an error worth dying for.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
