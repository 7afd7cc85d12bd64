//! HTTP mapping of pipeline errors

use crate::approval::ApprovalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl ResponseError for ApprovalError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApprovalError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApprovalError::InvalidStateTransition(_) => StatusCode::CONFLICT,
            ApprovalError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Database details stay in the log
        let message = match self {
            ApprovalError::Database(e) => {
                log::error!("Database error in approval pipeline: {}", e);
                "Database error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            message,
        })
    }
}
