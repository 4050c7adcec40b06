//! Turns flashcard service failures into JSON responses.
//!
//! Every non-2xx reply carries the same envelope: `code`, `message`, optional
//! `details` and `traceId`. Server faults keep their trace id but lose their
//! message and details before they leave the process, so storage errors never
//! reach a browser.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result returned by every flashcard handler.
pub type ApiResult<T> = Result<T, Error>;

const SERVER_FAULT_MESSAGE: &str = "Internal server error";

/// HTTP status announced for each failure category.
const fn http_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The envelope a client is allowed to see for `failure`.
fn client_envelope(failure: &Error) -> Error {
    if failure.code() != ErrorCode::InternalError {
        return failure.clone();
    }
    let scrubbed = Error::internal(SERVER_FAULT_MESSAGE);
    match failure.trace_id() {
        Some(trace_id) => scrubbed.with_trace_id(trace_id.to_owned()),
        None => scrubbed,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        http_status(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut reply = HttpResponse::build(self.status_code());
        if let Some(trace_id) = self.trace_id() {
            reply.insert_header((TRACE_ID_HEADER, trace_id.to_owned()));
        }
        reply.json(client_envelope(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced in a handler");
        Error::internal(SERVER_FAULT_MESSAGE)
    }
}

/// `JsonConfig` hook: an unreadable card or deck body becomes `invalid_request`.
pub(crate) fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    Error::invalid_request(format!("malformed JSON body: {err}")).into()
}

/// `QueryConfig` hook: unreadable paging parameters become `invalid_request`.
pub(crate) fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    Error::invalid_request(format!("malformed query string: {err}")).into()
}

#[cfg(test)]
mod tests;
