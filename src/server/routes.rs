//! HTTP routes over the orchestrator
//!
//! | Route | Method | Response |
//! |-------|--------|----------|
//! | `/health` | GET | `{status, service}` |
//! | `/session` | GET | `SessionView` |
//! | `/session/unlock` | POST | `SessionView`, 502 on failure |
//! | `/session/stop` | POST | `SessionView`, 502 on failure |
//! | `/session/balance` | POST | `RefreshReport` |

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::paths::{self, routes};
use crate::session::{Orchestrator, RefreshReport, SessionError, SessionView};

#[derive(Clone)]
pub struct AppState { pub orchestrator: Arc<Orchestrator>, pub app_name: String }

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, app_name: impl Into<String>) -> Self {
        Self { orchestrator, app_name: app_name.into() }
    }
}

#[derive(Serialize)]
struct ErrorResponse { error: String, session: SessionView }

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub fn create_router(orchestrator: Arc<Orchestrator>) -> Router { create_router_with_name(orchestrator, paths::SERVICE_NAME) }

pub fn create_router_with_name(orchestrator: Arc<Orchestrator>, app_name: &str) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health))
        .route(routes::SESSION, get(session))
        .route(routes::UNLOCK, post(unlock))
        .route(routes::STOP, post(stop))
        .route(routes::BALANCE, post(refresh_balance))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(orchestrator, app_name))
}

fn upstream_failure(s: &AppState, e: SessionError) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_GATEWAY, Json(ErrorResponse { error: e.to_string(), session: s.orchestrator.view() }))
}

async fn health(State(s): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": s.app_name}))
}

async fn session(State(s): State<AppState>) -> Json<SessionView> {
    Json(s.orchestrator.view())
}

async fn unlock(State(s): State<AppState>) -> ApiResult<SessionView> {
    match s.orchestrator.unlock().await {
        Ok(_) => Ok(Json(s.orchestrator.view())),
        Err(e) => Err(upstream_failure(&s, e)),
    }
}

async fn stop(State(s): State<AppState>) -> ApiResult<SessionView> {
    match s.orchestrator.stop().await {
        Ok(()) => Ok(Json(s.orchestrator.view())),
        Err(e) => Err(upstream_failure(&s, e)),
    }
}

async fn refresh_balance(State(s): State<AppState>) -> Json<RefreshReport> {
    Json(s.orchestrator.refresh_balance().await)
}
