//! HTTP API for labbot
//!
//! Endpoints:
//! - POST /chat - Ask a question
//! - GET /history/{session} - Session transcript
//! - DELETE /history/{session} - Forget a session
//! - GET /health - Health check

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::orchestrator::ChatOrchestrator;
use crate::core::rate_limit::RateLimiter;
use crate::error::LabbotError;
use crate::types::{ConversationRecord, ReplyStatus};
use crate::SWEEP_INTERVAL_SECS;

/// Returned with 429 when a client exceeds the rate limit
pub const MSG_RATE_LIMITED: &str = "Terlalu banyak permintaan. Coba lagi sebentar lagi.";

/// Rate-limit key for requests with neither a peer address nor X-Forwarded-For
pub const UNKNOWN_CLIENT: &str = "unknown";

/// App state
pub struct AppState {
    pub orchestrator: ChatOrchestrator,
    pub limiter: RateLimiter,
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<String>,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub category: Option<String>,
    pub session_id: String,
    pub status: Option<ReplyStatus>,
}

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub records: Vec<ConversationRecord>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub kb_loaded: bool,
    pub categories: Vec<String>,
    pub sessions_active: usize,
}

/// Create the API router
pub fn create_router(orchestrator: ChatOrchestrator, limiter: RateLimiter) -> Router {
    routes(Arc::new(AppState { orchestrator, limiter }))
}

fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/history/:session", get(get_history).delete(delete_history))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let orchestrator = &state.orchestrator;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        kb_loaded: orchestrator.engine().has_knowledge(),
        categories: orchestrator.engine().categories(),
        sessions_active: orchestrator.store().session_count(),
    })
}

/// Answer a question
async fn chat(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let session_id = req
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let client = client_key(peer, &headers);
    if !state.limiter.check(&client) {
        warn!(client = %client, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ChatResponse {
                response: MSG_RATE_LIMITED.to_string(),
                category: None,
                session_id,
                status: None,
            }),
        );
    }

    let reply = state.orchestrator.handle(&session_id, &req.message);
    let code = match reply.status {
        ReplyStatus::Invalid => StatusCode::BAD_REQUEST,
        ReplyStatus::Answered | ReplyStatus::Failed => StatusCode::OK,
    };

    (
        code,
        Json(ChatResponse {
            response: reply.response,
            category: reply.category,
            session_id,
            status: Some(reply.status),
        }),
    )
}

/// Get session transcript
async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(session): Path<String>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let records = state.orchestrator.history(&session);
    if records.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(HistoryResponse { session_id: session, records }))
}

/// Forget a session
async fn delete_history(
    State(state): State<Arc<AppState>>,
    Path(session): Path<String>,
) -> StatusCode {
    if state.orchestrator.clear_history(&session) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Peer IP, else first X-Forwarded-For entry, else one shared bucket
fn client_key(peer: Option<ConnectInfo<SocketAddr>>, headers: &HeaderMap) -> String {
    if let Some(ConnectInfo(addr)) = peer {
        return addr.ip().to_string();
    }
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Periodically drop expired sessions and idle rate-limit entries
fn spawn_sweeper(state: Arc<AppState>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let sessions = state.orchestrator.evict_expired_sessions();
            let clients = state.limiter.sweep();
            if sessions + clients > 0 {
                debug!(sessions, clients, "swept idle state");
            }
        }
    })
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    orchestrator: ChatOrchestrator,
    limiter: RateLimiter,
) -> Result<(), LabbotError> {
    let rate_limit = limiter.is_enabled();
    let state = Arc::new(AppState { orchestrator, limiter });
    spawn_sweeper(Arc::clone(&state), Duration::from_secs(SWEEP_INTERVAL_SECS));
    let router = routes(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, rate_limit, "labbot API listening");
    info!("  POST   /chat              - Ask a question");
    info!("  GET    /history/:session  - Session transcript");
    info!("  DELETE /history/:session  - Forget session");
    info!("  GET    /health            - Health check");
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;
    use crate::core::knowledge::KnowledgeBase;
    use crate::core::transcript::InMemoryTranscriptStore;
    use crate::core::vocabulary::VocabularyTable;

    #[test]
    fn test_client_key_prefers_peer_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.0.0.9, 10.0.0.1".parse().unwrap());

        let peer = ConnectInfo("192.168.1.5:40000".parse::<SocketAddr>().unwrap());
        assert_eq!(client_key(Some(peer), &headers), "192.168.1.5");
        assert_eq!(client_key(None, &headers), "10.0.0.9");
        assert_eq!(client_key(None, &HeaderMap::new()), UNKNOWN_CLIENT);
    }

    #[tokio::test]
    async fn test_sweeper_evicts_idle_state() {
        let orchestrator = ChatOrchestrator::new(
            &ChatConfig::default(),
            Arc::new(KnowledgeBase::empty()),
            Arc::new(VocabularyTable::default()),
            Arc::new(InMemoryTranscriptStore::with_lifetime(Duration::from_millis(30))),
        );
        let limiter = RateLimiter::new(5, Duration::from_millis(30));
        let state = Arc::new(AppState { orchestrator, limiter });

        state.orchestrator.handle("s1", "jam buka lab");
        assert!(state.limiter.check("10.0.0.1"));

        let sweeper = spawn_sweeper(Arc::clone(&state), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(120)).await;
        sweeper.abort();

        assert_eq!(state.orchestrator.store().session_count(), 0);
        assert_eq!(state.orchestrator.evict_expired_sessions(), 0);
        assert_eq!(state.limiter.sweep(), 0);
    }
}
