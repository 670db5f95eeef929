use crate::error::PrintedError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum WebError {
    #[error(transparent)]
    Printed(#[from] PrintedError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Shared state is unavailable after a panic")]
    Poisoned,
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Printed(err) => match err {
                PrintedError::NotFound { .. } => StatusCode::NOT_FOUND,
                PrintedError::NameCollision { .. } => StatusCode::CONFLICT,
                PrintedError::UnknownMaterial { .. }
                | PrintedError::InvalidInput(_)
                | PrintedError::IndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            WebError::Template(_) | WebError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(%status, "{}", message);
        } else {
            warn!(%status, "{}", message);
        }
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let cases = [
            (
                PrintedError::NotFound {
                    kind: "Print",
                    name: "x".into(),
                    available: String::new(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                PrintedError::NameCollision {
                    kind: "Print",
                    name: "x".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                PrintedError::IndexOutOfRange {
                    kind: "history entry",
                    index: 4,
                    len: 1,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                PrintedError::InvalidInput("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PrintedError::Server("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(WebError::from(err).status(), status);
        }
    }
}
