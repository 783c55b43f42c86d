//! Request-level errors and their HTTP status mapping.
//!
//! Store errors map onto the usual static-server statuses. Response bodies
//! are the bare status line so that store paths never leak to clients.

use adhoc_httpd_core::FsError;
use axum::http::StatusCode;
use axum::http::header::{ALLOW, CONTENT_TYPE, HeaderValue};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that end a request before a body is produced.
#[derive(Error, Debug)]
pub enum ServeError {
    /// The underlying store rejected the operation
    #[error(transparent)]
    Store(#[from] FsError),

    /// Request method other than GET or HEAD
    #[error("Method not allowed: {method}")]
    MethodNotAllowed {
        /// The rejected method
        method: String,
    },

    /// Request target could not be decoded
    #[error("Bad request: {reason}")]
    BadRequest {
        /// What was wrong with the request
        reason: String,
    },

    /// A blocking store task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A computed header value was not valid
    #[error("Invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

impl ServeError {
    /// HTTP status this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                FsError::NotFound { .. } | FsError::NotADirectory { .. } => StatusCode::NOT_FOUND,
                FsError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
                FsError::InvalidPath { .. }
                | FsError::PathNotAbsolute { .. }
                | FsError::InvalidPathComponent { .. } => StatusCode::BAD_REQUEST,
                FsError::IsADirectory { .. } | FsError::Io { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Task(_) | Self::Header(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if the error is the client's fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let body = format!(
            "{} {}\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error")
        );
        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        if matches!(self, Self::MethodNotAllowed { .. }) {
            headers.insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}
