use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use underwrite_core::UnderwriteError;

/// Failures of the service process and of the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("underwrite API error: {status} {body}")]
    Api { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("credentials error: {0}")]
    Credentials(String),

    #[error(transparent)]
    Engine(#[from] UnderwriteError),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        ServiceError::Network(e.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Engine failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub UnderwriteError);

impl From<UnderwriteError> for ApiError {
    fn from(e: UnderwriteError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            UnderwriteError::InvalidInput { .. } | UnderwriteError::DegenerateInvestment => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            UnderwriteError::Overflow { .. } | UnderwriteError::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({
            "error": self.0.kind(),
            "field": self.0.field(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_unprocessable() {
        let err = ApiError(UnderwriteError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "must be positive".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_overflow_is_server_error() {
        let err = ApiError(UnderwriteError::Overflow {
            context: "annuity".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_engine_error_passes_through() {
        let err: ServiceError = UnderwriteError::DegenerateInvestment.into();
        assert_eq!(err.to_string(), UnderwriteError::DegenerateInvestment.to_string());
    }
}
