// --- File: crates/payflow_common/src/http.rs ---
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, PayflowError};

// Include the client module
pub mod client;

/// Extension trait for PayflowError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for PayflowError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_message = self.to_string();

        let mut error = json!({
            "message": error_message,
            "code": status_code.as_u16(),
        });
        // The upstream status and raw body are what a caller needs to debug a
        // rejected call; neither ever contains our credentials.
        if let PayflowError::UpstreamRejected {
            status_code: upstream_status,
            body,
            ..
        } = &self
        {
            error["upstream_status"] = json!(upstream_status);
            error["upstream_body"] = json!(body);
        }

        let body = Json(json!({
            "success": false,
            "error": error,
        }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for PayflowError to make it easier to use in Axum handlers.
impl IntoResponse for PayflowError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Malformed or mistyped JSON bodies answer with the same error envelope as
/// every other failure instead of axum's plain-text rejection.
impl From<JsonRejection> for PayflowError {
    fn from(rejection: JsonRejection) -> Self {
        PayflowError::ValidationError(rejection.body_text())
    }
}

/// Converts a `Result<T, E>` to a `Result<Json<T>, Response>` using `f` to map
/// domain-specific errors.
pub fn map_json_error<T, E, F>(result: Result<T, E>, f: F) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
    F: FnOnce(E) -> PayflowError,
{
    result.map(Json).map_err(|err| f(err).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::upstream_rejected;

    #[test]
    fn test_upstream_rejection_maps_to_bad_gateway() {
        let response = upstream_rejected("PayU", 401, "{\"message\":\"bad signature\"}")
            .into_http_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_map_json_error_passes_success_through() {
        let result: Result<u32, &str> = Ok(7);
        let mapped = map_json_error(result, |e| PayflowError::InternalError(e.to_string()));
        assert_eq!(mapped.unwrap().0, 7);
    }

    #[test]
    fn test_map_json_error_uses_mapper_status() {
        let result: Result<u32, &str> = Err("nope");
        let mapped = map_json_error(result, |e| PayflowError::ValidationError(e.to_string()));
        assert_eq!(mapped.unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
