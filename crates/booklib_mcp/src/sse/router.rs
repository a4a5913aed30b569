//! Axum router for the SSE transport.
//! Routes: `GET /sse` (event stream), `POST /messages/` (client messages),
//! `GET /health` (liveness).

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use booklib_core::SERVER_NAME;
use futures::stream::{self, Stream, StreamExt};
use log::{debug, error, warn};
use serde::Deserialize;
use serde_json::json;

use crate::handler::McpHandler;
use crate::protocol::IncomingMessage;
use crate::sse::session::{SessionGuard, SessionRegistry};

pub const SSE_PATH: &str = "/sse";
pub const MESSAGES_PATH: &str = "/messages/";

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct SseState {
    pub handler: Arc<McpHandler>,
    pub sessions: SessionRegistry,
}

impl SseState {
    pub fn new(handler: McpHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            sessions: SessionRegistry::new(),
        }
    }
}

/// Builds the axum `Router` with all SSE transport routes.
pub fn build_router(state: SseState) -> Router {
    Router::new()
        .route(SSE_PATH, get(handle_sse))
        .route(MESSAGES_PATH, post(handle_message))
        .route("/health", get(handle_health))
        .with_state(state)
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": SERVER_NAME}))
}

async fn handle_sse(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (session_id, rx) = state.sessions.open();
    let endpoint = format!("{MESSAGES_PATH}?session_id={session_id}");
    let guard = SessionGuard::new(session_id, state.sessions.clone());

    let announce = stream::once(async move { Ok(Event::default().event("endpoint").data(endpoint)) });
    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let message = rx.recv().await?;
        Some((Ok(Event::default().event("message").data(message)), (rx, guard)))
    });

    Sse::new(announce.chain(messages)).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: Option<String>,
}

async fn handle_message(
    State(state): State<SseState>,
    Query(query): Query<SessionQuery>,
    body: String,
) -> Response {
    let Some(session_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };
    let Some(outbox) = state.sessions.sender(&session_id) else {
        warn!("event=mcp_request module=mcp transport=sse status=unknown_session session_id={session_id}");
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    match IncomingMessage::parse(&body) {
        Ok(IncomingMessage::Request(request)) => {
            debug!(
                "event=mcp_request module=mcp transport=sse method={} id={:?} session_id={session_id}",
                request.method, request.id
            );
            let output = state.handler.dispatch(&request).await;
            match output.to_json() {
                Ok(json) => {
                    if outbox.send(json).is_err() {
                        debug!("event=mcp_response module=mcp transport=sse status=stream_closed session_id={session_id}");
                    }
                }
                Err(e) => {
                    error!("event=mcp_response module=mcp transport=sse status=encode_error error={e}");
                }
            }
        }
        Ok(IncomingMessage::Notification(notification)) => {
            state.handler.handle_notification(&notification);
        }
        Err(e) => {
            warn!("event=mcp_request module=mcp transport=sse status=parse_error error={e}");
            return (StatusCode::BAD_REQUEST, "Could not parse message").into_response();
        }
    }

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
