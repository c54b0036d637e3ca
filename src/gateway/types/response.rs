//! API response types and error codes
//!
//! - `ApiResponse<T>`: unified response wrapper
//! - `ApiResult<T>`: type alias for handler return types
//! - `ApiError`: unified error type with IntoResponse
//! - `error_codes`: standard error code constants

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::transfer::TransferError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
/// - from_cache: only on write responses; true when the idempotency
///   layer replayed an earlier commit
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Whether the result came from the idempotency cache
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
            from_cache: None,
        }
    }

    /// Create success response for a write, carrying the cache flag
    pub fn committed(data: T, from_cache: bool) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
            from_cache: Some(from_cache),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
            from_cache: None,
        }
    }
}

// ============================================================================
// ApiResult: DRY Type Alias for Handlers
// ============================================================================

/// Type alias for handler return types - reduces boilerplate
pub type ApiResult<T> =
    Result<(StatusCode, Json<ApiResponse<T>>), (StatusCode, Json<ApiResponse<()>>)>;

/// Helper to create success response (200 OK)
#[inline]
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

// ============================================================================
// ApiError: Unified Error Type
// ============================================================================

/// Unified API error type with automatic IntoResponse
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 400 Bad Request with INVALID_PARAMETER code
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    /// 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg)
    }

    /// 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    /// 503 Service Unavailable (retry later)
    pub fn retry_later(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::RETRY_LATER,
            msg,
        )
    }

    /// Convert to handler error tuple
    pub fn into_err<T>(self) -> ApiResult<T> {
        Err((
            self.status,
            Json(ApiResponse::<()>::error(self.code, self.message)),
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ApiResponse::<()>::error(self.code, self.message));
        (self.status, body).into_response()
    }
}

/// Enable ? operator for ApiError in handler functions
impl From<ApiError> for (StatusCode, Json<ApiResponse<()>>) {
    fn from(err: ApiError) -> Self {
        (
            err.status,
            Json(ApiResponse::<()>::error(err.code, err.message)),
        )
    }
}

/// Map the transfer error taxonomy onto HTTP statuses and stable codes.
/// Messages are enumerated-kind + human text; storage details never leak
/// past the 5xx boundary.
impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::BadRequest(msg) => ApiError::bad_request(msg),
            TransferError::NotFound(msg) => ApiError::not_found(msg),
            TransferError::Conflict(msg) => ApiError::new(
                StatusCode::CONFLICT,
                error_codes::IDEMPOTENCY_CONFLICT,
                msg,
            ),
            TransferError::Unprocessable(msg) => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                error_codes::INSUFFICIENT_BALANCE,
                msg,
            ),
            TransferError::Transient(e) => {
                tracing::warn!("Transfer retries exhausted: {}", e);
                ApiError::retry_later("Storage contention, please retry")
            }
            TransferError::Timeout(e) => {
                tracing::warn!("Statement timed out: {}", e);
                ApiError::retry_later("Storage timeout, please retry")
            }
            TransferError::Internal(e) => {
                tracing::error!("Storage error: {}", e);
                ApiError::internal("Internal error")
            }
            TransferError::Encoding(e) => {
                tracing::error!("Response encoding error: {}", e);
                ApiError::internal("Internal error")
            }
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const IDEMPOTENCY_CONFLICT: i32 = 1009;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4004;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const RETRY_LATER: i32 = 5003;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_maps_to_expected_statuses() {
        let cases: Vec<(TransferError, StatusCode)> = vec![
            (
                TransferError::BadRequest("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (TransferError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (TransferError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                TransferError::Unprocessable("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                TransferError::Timeout(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                TransferError::Internal(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let api = ApiError::from(TransferError::Internal(sqlx::Error::RowNotFound));
        assert_eq!(api.message, "Internal error");
    }
}
