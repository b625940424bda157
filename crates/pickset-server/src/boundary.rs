// crates/pickset-server/src/boundary.rs
// ============================================================================
// Module: Request Boundary
// Description: Parsing of untrusted HTTP inputs into engine operations.
// Purpose: Keep lenient and strict input rules in one place.
// Dependencies: axum, pickset-config, pickset-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Query strings are parsed leniently: bad `page` and `limit` values fall back
//! to defaults. Request bodies are parsed strictly for single identifiers and
//! leniently for lists, where invalid entries are dropped. Identifiers are
//! accepted as JSON numbers or numeric strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use pickset_config::PaginationConfig;
use pickset_core::IdFilter;
use pickset_core::Identifier;
use pickset_core::PageRequest;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    /// Request input could not be interpreted.
    #[error("{0}")]
    MalformedInput(String),
    /// Request body exceeded the configured limit.
    #[error("request body too large")]
    PayloadTooLarge,
    /// Engine state is temporarily unavailable.
    #[error("service temporarily unavailable")]
    Unavailable,
}

impl BoundaryError {
    /// Returns the HTTP status for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable error message.
    error: String,
}

impl IntoResponse for BoundaryError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// SECTION: Query Parsing
// ============================================================================

/// Raw list query string.
///
/// Fields stay strings so unparsable values can fall back instead of failing
/// extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Exact-match identifier filter.
    pub filter: Option<String>,
}

impl ListQuery {
    /// Resolves the query into a page request.
    #[must_use]
    pub fn resolve(&self, pagination: &PaginationConfig) -> PageRequest {
        let page = match self.page.as_deref().and_then(parse_i64) {
            Some(page) if page > 0 => page.unsigned_abs(),
            _ => 1,
        };
        let limit = pagination.resolve_limit(self.limit.as_deref().and_then(parse_i64));
        let filter = self.filter.as_deref().and_then(IdFilter::parse);
        PageRequest::new(page, limit, filter)
    }
}

/// Parses a trimmed signed integer.
fn parse_i64(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Parses a trimmed unsigned integer.
fn parse_u64(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

// ============================================================================
// SECTION: Body Parsing
// ============================================================================

/// Selection request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectRequest {
    /// Select one identifier.
    One(Identifier),
    /// Select several identifiers in order.
    Batch(Vec<Identifier>),
}

/// Reorder request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderRequest {
    /// Move one identifier before another, or to the end.
    Move {
        /// Identifier to move.
        move_id: Identifier,
        /// Anchor identifier; `None` moves to the end.
        before_id: Option<Identifier>,
    },
    /// Partial reorder from the front.
    Order(Vec<Identifier>),
}

/// Turns an extracted body into JSON, mapping size and syntax failures.
///
/// # Errors
///
/// Returns [`BoundaryError::PayloadTooLarge`] when the body limit was hit and
/// [`BoundaryError::MalformedInput`] when the body is not a JSON object.
pub fn parse_json_body(body: Result<Bytes, BytesRejection>) -> Result<Value, BoundaryError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            BoundaryError::PayloadTooLarge
        } else {
            BoundaryError::MalformedInput("unreadable request body".to_string())
        }
    })?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|_| BoundaryError::MalformedInput("invalid JSON body".to_string()))?;
    if !value.is_object() {
        return Err(BoundaryError::MalformedInput("body must be a JSON object".to_string()));
    }
    Ok(value)
}

/// Parses `{ "id": .. }` for `POST /api/items`.
///
/// # Errors
///
/// Returns [`BoundaryError::MalformedInput`] when `id` is missing or invalid.
pub fn parse_add_item(body: &Value) -> Result<Identifier, BoundaryError> {
    required_id(body, "id")
}

/// Parses `{ "id": .. }` or `{ "ids": [..] }` for `POST /api/selected`.
///
/// # Errors
///
/// Returns [`BoundaryError::MalformedInput`] when neither form is usable.
pub fn parse_select(body: &Value) -> Result<SelectRequest, BoundaryError> {
    if let Some(ids) = body.get("ids").and_then(Value::as_array) {
        return Ok(SelectRequest::Batch(id_list(ids)));
    }
    required_id(body, "id").map(SelectRequest::One)
}

/// Parses `{ "moveId", "beforeId"? }` or `{ "order": [..] }`.
///
/// # Errors
///
/// Returns [`BoundaryError::MalformedInput`] when neither form is usable or
/// a present `beforeId` is invalid.
pub fn parse_reorder(body: &Value) -> Result<ReorderRequest, BoundaryError> {
    if let Some(order) = body.get("order").and_then(Value::as_array) {
        return Ok(ReorderRequest::Order(id_list(order)));
    }
    if body.get("moveId").is_none() {
        return Err(BoundaryError::MalformedInput("moveId or order is required".to_string()));
    }
    let move_id = required_id(body, "moveId")?;
    let before_id = match body.get("beforeId") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            parse_id(raw)
                .ok_or_else(|| BoundaryError::MalformedInput("invalid beforeId".to_string()))?,
        ),
    };
    Ok(ReorderRequest::Move {
        move_id,
        before_id,
    })
}

/// Parses a path segment identifier.
///
/// # Errors
///
/// Returns [`BoundaryError::MalformedInput`] when the segment is not a
/// positive integer.
pub fn parse_path_id(raw: &str) -> Result<Identifier, BoundaryError> {
    parse_u64(raw)
        .and_then(Identifier::new)
        .ok_or_else(|| BoundaryError::MalformedInput("invalid id".to_string()))
}

/// Reads a required identifier field.
fn required_id(body: &Value, field: &str) -> Result<Identifier, BoundaryError> {
    body.get(field)
        .and_then(parse_id)
        .ok_or_else(|| BoundaryError::MalformedInput(format!("invalid {field}")))
}

/// Keeps the valid identifiers of a JSON array, in order.
fn id_list(values: &[Value]) -> Vec<Identifier> {
    values.iter().filter_map(parse_id).collect()
}

/// Parses a JSON number or numeric string as a positive identifier.
fn parse_id(value: &Value) -> Option<Identifier> {
    let raw = match value {
        Value::Number(number) => number.as_u64()?,
        Value::String(text) => parse_u64(text)?,
        _ => return None,
    };
    Identifier::new(raw)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
