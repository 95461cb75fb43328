use std::convert::Infallible;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::{Filter, Reply};

use crate::handlers;
use crate::history::HistoryStore;
use crate::provider::{DeckApiClient, DeckProvider, ProviderError};
use crate::session::{GameSession, SessionError};
use crate::static_handler::StaticHandler;

/// Root of the production deck service.
pub const DEFAULT_DECK_API_URL: &str = "https://deckofcardsapi.com";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    static_dir: PathBuf,
    deck_api_url: String,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            static_dir: static_dir.into(),
            deck_api_url: DEFAULT_DECK_API_URL.to_string(),
        }
    }

    pub fn with_deck_api_url(mut self, url: impl Into<String>) -> Self {
        self.deck_api_url = url.into();
        self
    }

    pub fn for_tests() -> Self {
        let dir = std::env::temp_dir().join("blackjack_web_static");
        Self::new("127.0.0.1", 0, dir)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn deck_api_url(&self) -> &str {
        &self.deck_api_url
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Deck provider error: {0}")]
    ProviderError(#[from] ProviderError),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

/// Shared application wiring: the deck provider, the single game session,
/// round history and the static asset handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    session: Arc<GameSession>,
    history: Arc<HistoryStore>,
    static_handler: Arc<StaticHandler>,
}

impl AppContext {
    /// Connects to the configured deck API and initializes the session.
    /// An unreachable provider is fatal: the server refuses to start.
    pub async fn connect(config: ServerConfig) -> Result<Self, ServerError> {
        let provider: Arc<dyn DeckProvider> =
            Arc::new(DeckApiClient::new(config.deck_api_url())?);
        Self::connect_with_provider(config, provider).await
    }

    /// Same wiring with an injected provider; tests use scripted decks.
    pub async fn connect_with_provider(
        config: ServerConfig,
        provider: Arc<dyn DeckProvider>,
    ) -> Result<Self, ServerError> {
        if !config.static_dir().exists() {
            fs::create_dir_all(config.static_dir())
                .map_err(|err| ServerError::ConfigError(err.to_string()))?;
        }

        let history = Arc::new(HistoryStore::new());
        let session = Arc::new(
            GameSession::connect_with_history(provider, Some(Arc::clone(&history))).await?,
        );
        let static_handler = Arc::new(StaticHandler::new(config.static_dir().to_path_buf()));

        Ok(Self {
            config,
            session,
            history,
            static_handler,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn session(&self) -> Arc<GameSession> {
        Arc::clone(&self.session)
    }

    pub fn history(&self) -> Arc<HistoryStore> {
        Arc::clone(&self.history)
    }

    pub fn static_handler(&self) -> Arc<StaticHandler> {
        Arc::clone(&self.static_handler)
    }
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        let preflight = if bind_addr.port() != 0 {
            Some(std::net::TcpListener::bind(bind_addr).map_err(ServerError::BindError)?)
        } else {
            None
        };
        drop(preflight);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(address = %addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        match err.source().and_then(|s| s.downcast_ref::<std::io::Error>()) {
            Some(io_err) => ServerError::BindError(std::io::Error::new(
                io_err.kind(),
                io_err.to_string(),
            )),
            None => ServerError::ConfigError(err.to_string()),
        }
    }

    fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route();
        let game = Self::game_routes(context);
        let api = Self::api_routes(context);
        let statics = Self::static_routes(context);

        health
            .or(game)
            .unify()
            .or(api)
            .unify()
            .or(statics)
            .unify()
            .boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn game_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let session = context.session();

        let index = warp::path::end()
            .and(warp::get())
            .and(Self::with_session(session.clone()))
            .and_then(|session: Arc<GameSession>| async move {
                Ok::<_, Infallible>(handlers::page(session).await)
            });

        let deal = warp::path!("deal")
            .and(warp::get())
            .and(Self::with_session(session.clone()))
            .and_then(|session: Arc<GameSession>| async move {
                Ok::<_, Infallible>(handlers::deal(session).await)
            });

        let hit = warp::path!("hit")
            .and(warp::get())
            .and(Self::with_session(session.clone()))
            .and_then(|session: Arc<GameSession>| async move {
                Ok::<_, Infallible>(handlers::hit(session).await)
            });

        let stand = warp::path!("stand")
            .and(warp::get())
            .and(Self::with_session(session.clone()))
            .and_then(|session: Arc<GameSession>| async move {
                Ok::<_, Infallible>(handlers::stand(session).await)
            });

        let shuffle = warp::path!("shuffle")
            .and(warp::get())
            .and(Self::with_session(session))
            .and_then(|session: Arc<GameSession>| async move {
                Ok::<_, Infallible>(handlers::shuffle(session).await)
            });

        index
            .or(deal)
            .unify()
            .or(hit)
            .unify()
            .or(stand)
            .unify()
            .or(shuffle)
            .unify()
            .boxed()
    }

    fn api_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let session = context.session();
        let history = context.history();

        let state = warp::path!("api" / "state")
            .and(warp::get())
            .and(Self::with_session(session))
            .and_then(|session: Arc<GameSession>| async move {
                Ok::<_, Infallible>(handlers::api_state(session).await)
            });

        let stats = warp::path!("api" / "history" / "stats")
            .and(warp::get())
            .and(Self::with_history(history.clone()))
            .and_then(|history: Arc<HistoryStore>| async move {
                Ok::<_, Infallible>(handlers::get_statistics(history).await)
            });

        let recent = warp::path!("api" / "history")
            .and(warp::get())
            .and(warp::query::<handlers::HistoryQuery>())
            .and(Self::with_history(history))
            .and_then(
                |query: handlers::HistoryQuery, history: Arc<HistoryStore>| async move {
                    Ok::<_, Infallible>(handlers::get_recent_rounds(query, history).await)
                },
            );

        state.or(stats).unify().or(recent).unify().boxed()
    }

    fn static_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let handler = context.static_handler();

        warp::path("static")
            .and(warp::path::tail())
            .and(warp::get())
            .and(Self::with_static_handler(handler))
            .and_then(
                |tail: warp::path::Tail, handler: Arc<StaticHandler>| async move {
                    let response = handler
                        .asset(tail.as_str())
                        .await
                        .unwrap_or_else(|err| handler.error_response(err));
                    Ok::<_, Infallible>(response)
                },
            )
            .boxed()
    }

    fn with_session(
        session: Arc<GameSession>,
    ) -> impl Filter<Extract = (Arc<GameSession>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&session))
    }

    fn with_history(
        history: Arc<HistoryStore>,
    ) -> impl Filter<Extract = (Arc<HistoryStore>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&history))
    }

    fn with_static_handler(
        handler: Arc<StaticHandler>,
    ) -> impl Filter<Extract = (Arc<StaticHandler>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&handler))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
