// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use consult_common::{AppointmentId, SpecialistId};
use thiserror::Error;

/// Per-request outcomes of coordinator operations. None of these are fatal
/// to the process; busy/unavailable are reported back to the requesting
/// connection as events, stale/unauthorized are silently dropped.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("specialist {specialist_id} already has an outstanding invitation")]
    SpecialistBusy {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },

    #[error("specialist {specialist_id} has no live connections")]
    SpecialistUnavailable {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },

    #[error("no live invitation for appointment {0}")]
    StaleOrUnknownSession(AppointmentId),

    #[error("specialist {actor} is not the target of the invitation for {appointment_id}")]
    NotAuthorizedActor {
        appointment_id: AppointmentId,
        actor: SpecialistId,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SpecialistBusy { .. } => StatusCode::CONFLICT,
            AppError::SpecialistUnavailable { .. } => StatusCode::NOT_FOUND,
            AppError::StaleOrUnknownSession(_) | AppError::NotAuthorizedActor { .. } => {
                StatusCode::GONE
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::SpecialistBusy { .. } => "CALL_001",
            AppError::SpecialistUnavailable { .. } => "CALL_002",
            AppError::StaleOrUnknownSession(_) => "CALL_003",
            AppError::NotAuthorizedActor { .. } => "CALL_004",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::SpecialistBusy { .. } => "Specialist is busy".to_string(),
            AppError::SpecialistUnavailable { .. } => "Specialist is unavailable".to_string(),
            AppError::StaleOrUnknownSession(_) | AppError::NotAuthorizedActor { .. } => {
                "Invitation is no longer active".to_string()
            },
            AppError::Json(_) => "Invalid request format".to_string(),
            AppError::Internal(_) | AppError::Io(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for AppError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        AppError::Internal("Failed to send message".to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
