use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use dg_core::Error;

/// Status + JSON body pair every handler resolves to. Keeping it a plain
/// value lets tests inspect the outcome without an HTTP round trip.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": message.into() }),
        }
    }

    /// Boundary mapping of the error taxonomy: validation problems are the
    /// caller's fault, everything else is a dependency failure.
    pub fn from_error(err: &Error) -> Self {
        if err.is_validation() {
            Self::bad_request(err.to_string())
        } else {
            Self::server_error(err.to_string())
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let validation = Error::InvalidPayload("bad".to_string());
        assert_eq!(
            ApiResponse::from_error(&validation).status,
            StatusCode::BAD_REQUEST
        );

        let upstream = Error::Mail("down".to_string());
        let response = ApiResponse::from_error(&upstream);
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body["error"].as_str().unwrap().contains("down"));
    }
}
