use crate::config::ConfigError;
use crate::store::RepositoryError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Closed set of business failures surfaced by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorCode {
    #[error("user not found")]
    UserNotFound,
    #[error("requester is not allowed to access this user")]
    UnauthorizedUser,
    #[error("post not found")]
    PostNotFound,
    #[error("recruitment is already closed")]
    RecruitmentClosed,
    #[error("already applied to this recruitment")]
    AlreadyRecruitment,
    #[error("recruitment application not found")]
    RecruitmentNotFound,
    #[error("recruitment status is not supported")]
    RecruitmentStatusNotSupport,
    #[error("application status cannot change from its current state")]
    InvalidStatusTransition,
}

impl ErrorCode {
    /// Stable identifier clients can switch on.
    pub const fn code(self) -> &'static str {
        match self {
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::UnauthorizedUser => "UNAUTHORIZATION_USER",
            ErrorCode::PostNotFound => "POST_NOT_FOUND",
            ErrorCode::RecruitmentClosed => "RECRUITMENT_CLOSED",
            ErrorCode::AlreadyRecruitment => "ALREADY_RECRUITMENT",
            ErrorCode::RecruitmentNotFound => "RECRUITMENT_NOT_FOUND",
            ErrorCode::RecruitmentStatusNotSupport => "RECRUITMENT_STATUS_NOT_SUPPORT",
            ErrorCode::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
        }
    }

    pub const fn status_code(self) -> StatusCode {
        match self {
            ErrorCode::UserNotFound
            | ErrorCode::PostNotFound
            | ErrorCode::RecruitmentNotFound => StatusCode::NOT_FOUND,
            ErrorCode::UnauthorizedUser => StatusCode::UNAUTHORIZED,
            ErrorCode::RecruitmentClosed
            | ErrorCode::AlreadyRecruitment
            | ErrorCode::InvalidStatusTransition => StatusCode::CONFLICT,
            ErrorCode::RecruitmentStatusNotSupport => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ErrorCode {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code(),
            "message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}

/// Error raised by the recruitment and user services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Rejected(#[from] ErrorCode),
    #[error("invalid page request: {reason}")]
    InvalidPage { reason: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Business code carried by the error, if any.
    ///
    /// Commit-time store rejections map onto the code the service check would have raised.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ServiceError::Rejected(code) => Some(*code),
            ServiceError::Repository(RepositoryError::Conflict) => {
                Some(ErrorCode::AlreadyRecruitment)
            }
            ServiceError::Repository(RepositoryError::Closed) => Some(ErrorCode::RecruitmentClosed),
            ServiceError::Repository(RepositoryError::ApplicationNotFound) => {
                Some(ErrorCode::RecruitmentNotFound)
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let Some(code) = self.code() {
            return code.into_response();
        }
        match self {
            ServiceError::InvalidPage { .. } => {
                let body = Json(json!({
                    "code": "INVALID_PAGE",
                    "message": self.to_string(),
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ServiceError::Repository(err) => {
                tracing::error!(error = %err, "repository failure");
                let body = Json(json!({
                    "code": "INTERNAL_ERROR",
                    "message": err.to_string(),
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            ServiceError::Rejected(code) => code.into_response(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Fixture(serde_json::Error),
    Service(ServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Fixture(err) => write!(f, "fixture error: {}", err),
            AppError::Service(err) => write!(f, "service error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Fixture(err) => Some(err),
            AppError::Service(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Service(err) => err.into_response(),
            other => {
                let body = Json(json!({ "error": other.to_string() }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Fixture(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Service(ServiceError::Repository(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_transport_statuses() {
        assert_eq!(
            ErrorCode::UnauthorizedUser.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::PostNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::RecruitmentStatusNotSupport.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::AlreadyRecruitment.code(), "ALREADY_RECRUITMENT");
    }

    #[test]
    fn service_error_exposes_code() {
        let err = ServiceError::from(ErrorCode::RecruitmentClosed);
        assert_eq!(err.code(), Some(ErrorCode::RecruitmentClosed));
        assert_eq!(err.to_string(), "recruitment is already closed");

        let err = ServiceError::from(RepositoryError::NotFound);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn conflict_renders_as_duplicate_application() {
        let response = ServiceError::Repository(RepositoryError::Conflict).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn commit_rejections_carry_business_codes() {
        let closed = ServiceError::from(RepositoryError::Closed);
        assert_eq!(closed.code(), Some(ErrorCode::RecruitmentClosed));
        assert_eq!(
            closed.into_response().status(),
            ErrorCode::RecruitmentClosed.status_code()
        );

        let missing = ServiceError::from(RepositoryError::ApplicationNotFound);
        assert_eq!(missing.code(), Some(ErrorCode::RecruitmentNotFound));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }
}
