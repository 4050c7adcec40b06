//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of `utoipa` derives; these wrappers describe their
//! JSON shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "too_many_requests")]
    TooManyRequests,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Validation failures put field messages under `details.fields`; rejected
/// bulk batches list them per record under `details.records`.
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "invalid deck")]
    message: String,
    /// Correlation id, also sent as the `trace-id` header.
    #[schema(example = "6f1c2d9e-3b8a-4e57-9d0c-1a2b3c4d5e6f")]
    trace_id: Option<String>,
    /// Structured validation details.
    #[schema(example = json!({"fields": {"name": ["name must not be empty"]}}))]
    details: Option<serde_json::Value>,
}
