//! Request handlers for the check-domain API.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use super::AppState;
use super::wire::LegacyCheckResult;
use crate::auth::{AuthCheckResult, AuthError, DomainAuthQuery, LookupTxt};

#[derive(Debug, Default, Deserialize)]
pub struct CheckDomainParams {
    pub domain: Option<String>,
    pub selector: Option<String>,
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Domain is required")]
    MissingDomain,
    #[error("{0}")]
    InvalidDomain(#[source] AuthError),
    #[error("{0}")]
    MalformedQuery(String),
    #[error("DNS lookups for {domain} timed out after {secs}s")]
    Timeout { domain: String, secs: u64 },
}

impl CheckError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingDomain | Self::InvalidDomain(_) | Self::MalformedQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<AuthError> for CheckError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmptyDomain => Self::MissingDomain,
            other => Self::InvalidDomain(other),
        }
    }
}

impl From<QueryRejection> for CheckError {
    fn from(rejection: QueryRejection) -> Self {
        Self::MalformedQuery(rejection.body_text())
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        warn!(error = %self, "check-domain request rejected");
        (self.status(), Json(ApiError::new(&self.to_string()))).into_response()
    }
}

async fn run_check<R>(
    state: &AppState<R>,
    params: Result<Query<CheckDomainParams>, QueryRejection>,
) -> Result<AuthCheckResult, CheckError>
where
    R: LookupTxt,
{
    let Query(params) = params?;
    let domain = params.domain.ok_or(CheckError::MissingDomain)?;
    let query = DomainAuthQuery::new(&domain, params.selector.as_deref())?;

    tokio::time::timeout(state.request_timeout, state.resolver.check_domain(&query))
        .await
        .map_err(|_| CheckError::Timeout {
            domain: query.domain().to_string(),
            secs: state.request_timeout.as_secs(),
        })
}

/// GET /api/check-domain
pub async fn check_domain<R>(
    State(state): State<Arc<AppState<R>>>,
    params: Result<Query<CheckDomainParams>, QueryRejection>,
) -> Response
where
    R: LookupTxt + 'static,
{
    match run_check(&state, params).await {
        Ok(result) => Json(LegacyCheckResult(&result)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /api/v2/check-domain
pub async fn check_domain_tagged<R>(
    State(state): State<Arc<AppState<R>>>,
    params: Result<Query<CheckDomainParams>, QueryRejection>,
) -> Result<Json<AuthCheckResult>, CheckError>
where
    R: LookupTxt + 'static,
{
    run_check(&state, params).await.map(Json)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Turns a handler panic into `500 {"error": <panic message>}`.
pub(crate) fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else {
        "unexpected failure".to_string()
    };
    error!(%message, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new(&message)),
    )
        .into_response()
}
