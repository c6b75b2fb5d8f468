//! HTTP API over [`DomainAuthResolver`] (feature `server`).

mod config;
mod handlers;
mod wire;

pub use config::ServerConfig;
pub use handlers::{ApiError, CheckDomainParams, CheckError, HealthResponse};
pub use wire::LegacyCheckResult;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::Method, routing::get};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use crate::auth::{DomainAuthResolver, LookupTxt};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct AppState<R> {
    pub resolver: Arc<DomainAuthResolver<R>>,
    pub request_timeout: Duration,
}

pub struct ApiServer<R> {
    resolver: Arc<DomainAuthResolver<R>>,
    request_timeout: Duration,
    addr: SocketAddr,
    static_dir: Option<PathBuf>,
}

impl<R> ApiServer<R>
where
    R: LookupTxt + 'static,
{
    pub fn new(resolver: DomainAuthResolver<R>, addr: SocketAddr) -> Self {
        Self {
            resolver: Arc::new(resolver),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            addr,
            static_dir: None,
        }
    }

    pub fn from_config(resolver: DomainAuthResolver<R>, config: &ServerConfig) -> Self {
        let mut server = Self::new(resolver, config.listen_addr())
            .with_request_timeout(config.request_timeout());
        if let Some(dir) = &config.static_dir {
            server = server.with_static_dir(dir.clone());
        }
        server
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET]);

        let api_routes: Router<Arc<AppState<R>>> = Router::new()
            .route("/check-domain", get(handlers::check_domain::<R>))
            .route("/v2/check-domain", get(handlers::check_domain_tagged::<R>));

        let state = Arc::new(AppState {
            resolver: Arc::clone(&self.resolver),
            request_timeout: self.request_timeout,
        });

        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .nest("/api", api_routes)
            .with_state(state);

        if let Some(dir) = &self.static_dir {
            router = router.fallback_service(ServeDir::new(dir));
        }

        router
            .layer(CatchPanicLayer::custom(handlers::panic_response))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Serves until Ctrl-C.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);
        if let Some(dir) = &self.static_dir {
            info!("Serving static files from {}", dir.display());
        }

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
