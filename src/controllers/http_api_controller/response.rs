//! JSON envelopes shared by every endpoint.
//!
//! Success: `{success: true, data}`. Failure: `{success: false, message, error}`
//! where `error` is a stable machine-readable kind.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use hyper::StatusCode;
use serde::Serialize;
use validator::ValidationErrors;

use crate::application::OrchestratorError;

#[derive(Serialize, Debug)]
pub(crate) struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize, Debug)]
pub(crate) struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

pub(crate) fn ok<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            data,
        }),
    )
        .into_response()
}

pub(crate) fn message(text: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            success: true,
            message: text.into(),
        }),
    )
        .into_response()
}

pub(crate) fn failure(status: StatusCode, message: String, error: Option<&'static str>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            message,
            error,
        }),
    )
        .into_response()
}

fn status_and_kind(error: &OrchestratorError) -> (StatusCode, &'static str) {
    match error {
        OrchestratorError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        OrchestratorError::UnsupportedChain(_) => (StatusCode::BAD_REQUEST, "unsupported_chain"),
        OrchestratorError::InvalidCall(_) => (StatusCode::BAD_REQUEST, "invalid_call"),
        OrchestratorError::SimulationRejected(_) => {
            (StatusCode::BAD_REQUEST, "simulation_rejected")
        }
        OrchestratorError::ConfirmationRequired { .. } => {
            (StatusCode::BAD_REQUEST, "confirmation_required")
        }
        OrchestratorError::MisconfiguredAccount(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "misconfigured_account")
        }
        OrchestratorError::ReadFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "read_failed"),
        OrchestratorError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_failure"),
        OrchestratorError::SubmissionFailed { .. } => (StatusCode::BAD_GATEWAY, "submission_failed"),
    }
}

pub(crate) fn error_response(error: OrchestratorError) -> Response {
    let (status, kind) = status_and_kind(&error);
    if status.is_server_error() {
        tracing::error!(kind, error = %error, "Request failed");
    } else {
        tracing::debug!(kind, error = %error, "Request rejected");
    }
    failure(status, error.to_string(), Some(kind))
}

/// 400 with every field error flattened into one message.
pub(crate) fn validation_error(errors: &ValidationErrors) -> Response {
    let error_messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect();

    failure(
        StatusCode::BAD_REQUEST,
        format!("Validation error: {}", error_messages.join("; ")),
        Some("validation"),
    )
}

/// Shorthand for handlers returning `Result<T, OrchestratorError>`.
pub(crate) fn respond<T: Serialize>(result: Result<T, OrchestratorError>) -> Response {
    match result {
        Ok(data) => ok(data),
        Err(error) => error_response(error),
    }
}
