use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::utils::error::RegistrarError;

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl RegistrarError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistrarError::ValidationError { .. } | RegistrarError::DuplicateEnrollment { .. } => {
                StatusCode::BAD_REQUEST
            }
            RegistrarError::NotFound { .. } => StatusCode::NOT_FOUND,
            RegistrarError::Unauthenticated => StatusCode::UNAUTHORIZED,
            RegistrarError::Forbidden { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistrarError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, category = ?self.category(), "request failed");
        }

        let field = match &self {
            RegistrarError::ValidationError { field, .. } => Some(field.clone()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.kind(),
            message: self.user_friendly_message(),
            field,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RegistrarError::validation("status", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistrarError::DuplicateEnrollment {
                student_id: 1,
                course_id: 2
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistrarError::NotFound {
                entity: "Course",
                id: 2
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RegistrarError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RegistrarError::storage("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
