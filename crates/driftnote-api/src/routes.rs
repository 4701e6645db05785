use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use driftnote_core::db::{Database, SqliteSyncStore};
use driftnote_core::protocol::{v1, v2};
use driftnote_core::sync::{SyncBatch, SyncEngine, SyncOutcome};
use driftnote_core::{validation, UserId};

use crate::auth::{extract_bearer_token, AuthenticatedUser, TokenVerifier};
use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    verifier: Arc<TokenVerifier>,
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: Database) -> Self {
        Self {
            verifier: Arc::new(TokenVerifier::new(config.clone())),
            db: Arc::new(Mutex::new(db)),
            config,
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/v1/sync", post(sync_v1))
        .route("/v2/sync", post(sync_v2))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
    })
}

async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let user = state.verifier.verify_access_token(token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn sync_v1(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<v1::SyncRequestV1>,
) -> Result<Json<v1::SyncResponseV1>, AppError> {
    let batch = request.into_batch();
    let mut db = state.db.lock().await;
    let outcome = run_sync(&mut db, user.user_id, &batch)?;
    tracing::info!(
        endpoint = "sync_v1",
        user = %user.user_id,
        applied = outcome.applied_notes.len(),
        conflicts = outcome.note_conflicts.len(),
        changes = outcome.note_changes.len(),
        "Sync call completed"
    );
    Ok(Json(v1::encode_response(&outcome)))
}

async fn sync_v2(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<v2::SyncRequestV2>,
) -> Result<Json<v2::SyncResponseV2>, AppError> {
    let batch = request.into_batch();
    let mut db = state.db.lock().await;
    let outcome = run_sync(&mut db, user.user_id, &batch)?;
    tracing::info!(
        endpoint = "sync_v2",
        user = %user.user_id,
        applied = outcome.applied_notes.len(),
        conflicts = outcome.note_conflicts.len(),
        changes = outcome.note_changes.len(),
        applied_reminders = outcome.applied_reminders.len(),
        reminder_changes = outcome.reminder_changes.len(),
        "Sync call completed"
    );
    Ok(Json(v2::encode_response(&outcome)))
}

/// Validate, then reconcile inside one store transaction. A failure at any
/// point before commit leaves the store exactly as it was; the client can
/// retry with the same cursor.
fn run_sync(db: &mut Database, owner: UserId, batch: &SyncBatch) -> Result<SyncOutcome, AppError> {
    validation::validate_batch(batch)?;

    let tx = db.transaction()?;
    let outcome = SyncEngine::sync(&SqliteSyncStore::new(&tx), owner, batch)?;
    tx.commit().map_err(driftnote_core::Error::from)?;

    Ok(outcome)
}
