use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body of every error response.
///
/// `error` carries diagnostic detail and is only populated by debug builds.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub success: bool,
    pub kind: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Render the error envelope `{success: false, kind, message}`.
pub fn error_response(
    status: StatusCode,
    kind: &str,
    message: &str,
    detail: Option<String>,
) -> Response {
    let body = ErrorBody {
        success: false,
        kind,
        message,
        error: detail.filter(|_| cfg!(debug_assertions)),
    };
    (status, axum::Json(body)).into_response()
}

/// Fallback handler for unmatched routes.
pub async fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND", "route not found", None)
}
