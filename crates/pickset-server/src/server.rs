// crates/pickset-server/src/server.rs
// ============================================================================
// Module: Pickset HTTP Server
// Description: JSON HTTP API over the selection service.
// Purpose: Expose available/selected listings and queued mutations.
// Dependencies: axum, pickset-config, pickset-core, tokio
// ============================================================================

//! ## Overview
//! The server exposes the selection engine as a small JSON API under `/api`.
//! Writes are acknowledged as soon as they are queued; reads flush pending
//! work first, so a client always sees its own earlier writes. Every request
//! produces one `http_request` audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use pickset_config::PaginationConfig;
use pickset_config::PicksetConfig;
use pickset_config::ServerAuditConfig;
use pickset_core::Identifier;
use pickset_core::Page;
use pickset_core::PageRequest;
use pickset_core::SelectionEngine;
use pickset_core::SystemClock;
use serde::Serialize;
use tokio::net::TcpListener;

use crate::audit::AuditSink;
use crate::audit::EngineAuditBridge;
use crate::audit::FileAuditSink;
use crate::audit::HttpRequestEvent;
use crate::audit::HttpRequestEventParams;
use crate::audit::NoopAuditSink;
use crate::audit::RequestOutcome;
use crate::audit::StderrAuditSink;
use crate::boundary::BoundaryError;
use crate::boundary::ListQuery;
use crate::boundary::ReorderRequest;
use crate::boundary::SelectRequest;
use crate::boundary::parse_add_item;
use crate::boundary::parse_json_body;
use crate::boundary::parse_path_id;
use crate::boundary::parse_reorder;
use crate::boundary::parse_select;
use crate::service::SelectionService;
use crate::service::ServiceError;

// ============================================================================
// SECTION: Pickset Server
// ============================================================================

/// Pickset HTTP server instance.
pub struct PicksetServer {
    /// Server configuration.
    config: PicksetConfig,
    /// Shared engine handle.
    service: SelectionService,
    /// Request and flush audit sink.
    audit: Arc<dyn AuditSink>,
}

impl PicksetServer {
    /// Builds a new server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the audit log
    /// cannot be opened.
    pub fn from_config(mut config: PicksetConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let audit = build_audit_sink(&config.server.audit)?;
        let engine_config =
            config.engine_config().map_err(|err| ServerError::Config(err.to_string()))?;
        let engine = SelectionEngine::new(
            engine_config,
            Arc::new(SystemClock),
            Arc::new(EngineAuditBridge::new(Arc::clone(&audit))),
        );
        Ok(Self {
            config,
            service: SelectionService::new(engine),
            audit,
        })
    }

    /// Returns a handle to the selection service.
    #[must_use]
    pub fn service(&self) -> SelectionService {
        self.service.clone()
    }

    /// Builds the HTTP router.
    #[must_use]
    pub fn router(&self) -> Router {
        let state = Arc::new(ServerState {
            service: self.service.clone(),
            pagination: self.config.pagination,
            audit: Arc::clone(&self.audit),
        });
        Router::new()
            .route("/health", get(handle_health))
            .route("/api/available", get(handle_available))
            .route("/api/selected", get(handle_selected).post(handle_select))
            .route("/api/selected/order", get(handle_order))
            .route("/api/selected/reorder", put(handle_reorder))
            .route("/api/selected/{id}", delete(handle_deselect))
            .route("/api/items", post(handle_add_item))
            .layer(DefaultBodyLimit::max(self.config.server.max_body_bytes))
            .with_state(state)
    }

    /// Binds the configured address and serves until the process exits.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        emit_bind_warning(addr);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_with_shutdown(listener, std::future::pending()).await
    }

    /// Serves on an existing listener until `shutdown` resolves.
    ///
    /// Pending mutations are flushed before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the server fails.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let app = self.router();
        let driver = self.service.spawn_driver();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")));
        driver.abort();
        let _ = self.service.flush();
        result
    }
}

/// Builds the audit sink from configuration.
fn build_audit_sink(config: &ServerAuditConfig) -> Result<Arc<dyn AuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = FileAuditSink::new(std::path::Path::new(path.trim()))
                .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Warns when the listener is reachable beyond loopback.
fn emit_bind_warning(addr: SocketAddr) {
    if !addr.ip().is_loopback() {
        let _ = writeln!(
            std::io::stderr(),
            "pickset-server: WARNING: listening on non-loopback address {addr} without \
             authentication"
        );
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Shared state for HTTP handlers.
struct ServerState {
    /// Engine handle.
    service: SelectionService,
    /// Page size bounds.
    pagination: PaginationConfig,
    /// Request audit sink.
    audit: Arc<dyn AuditSink>,
}

/// Listing response body.
#[derive(Debug, Serialize)]
struct ListResponse {
    /// Identifiers on the page.
    ids: Vec<Identifier>,
    /// Matching identifiers across all pages.
    total: u64,
    /// Page number served.
    page: u64,
    /// Page size served.
    limit: usize,
}

impl ListResponse {
    /// Combines a page with the request that produced it.
    fn new(page: Page, request: PageRequest) -> Self {
        Self {
            ids: page.ids,
            total: page.total,
            page: request.page(),
            limit: request.limit(),
        }
    }
}

/// Selection order response body.
#[derive(Debug, Serialize)]
struct OrderResponse {
    /// Full selection in order.
    order: Vec<Identifier>,
}

/// Acknowledgement body for queued writes.
#[derive(Debug, Serialize)]
struct AckResponse {
    /// Always true.
    ok: bool,
}

/// Acknowledgement for an accepted request.
const ACK: AckResponse = AckResponse {
    ok: true,
};

impl From<ServiceError> for BoundaryError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable => Self::Unavailable,
        }
    }
}

/// Handles `GET /health`.
async fn handle_health() -> Json<AckResponse> {
    Json(ACK)
}

/// Handles `GET /api/available`.
async fn handle_available(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let request = resolve_query(query, &state.pagination);
    let result = state
        .service
        .available(request)
        .map(|page| ListResponse::new(page, request))
        .map_err(BoundaryError::from);
    respond(&state, "GET", "/api/available", result)
}

/// Handles `GET /api/selected`.
async fn handle_selected(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let request = resolve_query(query, &state.pagination);
    let result = state
        .service
        .selected(request)
        .map(|page| ListResponse::new(page, request))
        .map_err(BoundaryError::from);
    respond(&state, "GET", "/api/selected", result)
}

/// Handles `GET /api/selected/order`.
async fn handle_order(State(state): State<Arc<ServerState>>) -> Response {
    let result = state
        .service
        .order()
        .map(|order| OrderResponse {
            order,
        })
        .map_err(BoundaryError::from);
    respond(&state, "GET", "/api/selected/order", result)
}

/// Handles `POST /api/items`.
async fn handle_add_item(
    State(state): State<Arc<ServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = parse_json_body(body)
        .and_then(|value| parse_add_item(&value))
        .and_then(|id| state.service.add_element(id).map_err(BoundaryError::from))
        .map(|()| ACK);
    respond(&state, "POST", "/api/items", result)
}

/// Handles `POST /api/selected`.
async fn handle_select(
    State(state): State<Arc<ServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = parse_json_body(body)
        .and_then(|value| parse_select(&value))
        .and_then(|request| {
            match request {
                SelectRequest::One(id) => state.service.select(id),
                SelectRequest::Batch(ids) => state.service.select_batch(ids),
            }
            .map_err(BoundaryError::from)
        })
        .map(|()| ACK);
    respond(&state, "POST", "/api/selected", result)
}

/// Handles `DELETE /api/selected/{id}`.
async fn handle_deselect(
    State(state): State<Arc<ServerState>>,
    Path(raw): Path<String>,
) -> Response {
    let result = parse_path_id(&raw)
        .and_then(|id| state.service.deselect(id).map_err(BoundaryError::from))
        .map(|()| ACK);
    respond(&state, "DELETE", "/api/selected/{id}", result)
}

/// Handles `PUT /api/selected/reorder`.
async fn handle_reorder(
    State(state): State<Arc<ServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = parse_json_body(body)
        .and_then(|value| parse_reorder(&value))
        .and_then(|request| {
            match request {
                ReorderRequest::Order(order) => state.service.reorder(order),
                ReorderRequest::Move {
                    move_id,
                    before_id,
                } => state.service.move_selected(move_id, before_id),
            }
            .map_err(BoundaryError::from)
        })
        .map(|()| ACK);
    respond(&state, "PUT", "/api/selected/reorder", result)
}

/// Resolves an optional query, treating an unparsable query string as empty.
fn resolve_query(
    query: Result<Query<ListQuery>, QueryRejection>,
    pagination: &PaginationConfig,
) -> PageRequest {
    query.map(|Query(query)| query).unwrap_or_default().resolve(pagination)
}

/// Renders a handler result and records the request audit event.
fn respond<T: Serialize>(
    state: &ServerState,
    method: &'static str,
    route: &'static str,
    result: Result<T, BoundaryError>,
) -> Response {
    let (response, outcome, error) = match result {
        Ok(body) => ((StatusCode::OK, Json(body)).into_response(), RequestOutcome::Ok, None),
        Err(err) => {
            let outcome = match err {
                BoundaryError::Unavailable => RequestOutcome::Unavailable,
                BoundaryError::MalformedInput(_) | BoundaryError::PayloadTooLarge => {
                    RequestOutcome::Rejected
                }
            };
            let message = err.to_string();
            (err.into_response(), outcome, Some(message))
        }
    };
    state.audit.record_request(&HttpRequestEvent::new(HttpRequestEventParams {
        method,
        route,
        status: response.status().as_u16(),
        outcome,
        error,
    }));
    response
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pickset server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
