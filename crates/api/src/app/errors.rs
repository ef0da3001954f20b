use std::sync::LazyLock;

use axum::http::StatusCode;
use axum::response::IntoResponse;

use catalog_infra::ServiceError;
use regex::Regex;

use crate::app::dto::ApiResponse;

const GENERIC_INTERNAL_MESSAGE: &str = "internal server error";

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(msg) => {
            tracing::warn!(error = %msg, "validation error");
            json_error(StatusCode::BAD_REQUEST, &msg)
        }
        ServiceError::NotFound(msg) => {
            tracing::warn!(error = %msg, "not found");
            json_error(StatusCode::NOT_FOUND, &msg)
        }
        ServiceError::Internal => json_error(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_INTERNAL_MESSAGE),
    }
}

pub fn json_error(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        axum::Json(ApiResponse::error(message, status.as_u16())),
    )
        .into_response()
}

static BACKTRACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\n(?:stack backtrace:|\tat |\s*\d+: ).*").expect("backtrace pattern is valid")
});

static SOURCE_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w./\\-]*\.rs:\d+(?::\d+)?").expect("source location pattern is valid")
});

static CRATE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bcatalog_\w+(?:::\w+)*::").expect("crate path pattern is valid")
});

/// Strip internal detail from a message before it leaves the process.
///
/// - everything from a backtrace marker on is dropped
/// - source locations (`src/x.rs:12`) become `[file]`
/// - crate-qualified paths (`catalog_infra::store::StoreError`) keep only the last segment
pub fn sanitize_message(message: &str) -> String {
    let cut = BACKTRACE.replace(message, "");
    let located = SOURCE_LOCATION.replace_all(&cut, "[file]");
    let cleaned = CRATE_PATH.replace_all(&located, "");

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}
