use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Serialize;

/// Why a booking request was rejected. Returned as a value; a rejected
/// request never produces a partial booking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("the field {field} is required")]
    MissingField { field: &'static str },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("invalid contact {field}")]
    InvalidContact { field: &'static str },

    #[error("invalid payment: {0}")]
    InvalidPayment(&'static str),

    #[error("the slot {time} on {date} is not available")]
    SlotUnavailable { date: NaiveDate, time: String },

    #[error("service not found: {0}")]
    UnknownService(String),

    #[error("service option not found: {0}")]
    UnknownOption(String),

    #[error("cannot verify availability: {0}")]
    AvailabilityUnknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    MissingField,
    InvalidDate,
    InvalidTime,
    InvalidContact,
    InvalidPayment,
    SlotUnavailable,
    UnknownService,
    UnknownOption,
    AvailabilityUnknown,
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::MissingField { .. } => ValidationErrorKind::MissingField,
            ValidationError::InvalidDate(_) => ValidationErrorKind::InvalidDate,
            ValidationError::InvalidTime(_) => ValidationErrorKind::InvalidTime,
            ValidationError::InvalidContact { .. } => ValidationErrorKind::InvalidContact,
            ValidationError::InvalidPayment(_) => ValidationErrorKind::InvalidPayment,
            ValidationError::SlotUnavailable { .. } => ValidationErrorKind::SlotUnavailable,
            ValidationError::UnknownService(_) => ValidationErrorKind::UnknownService,
            ValidationError::UnknownOption(_) => ValidationErrorKind::UnknownOption,
            ValidationError::AvailabilityUnknown(_) => ValidationErrorKind::AvailabilityUnknown,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField { field } | ValidationError::InvalidContact { field } => {
                Some(*field)
            }
            ValidationError::InvalidDate(_) => Some("date"),
            ValidationError::InvalidTime(_) | ValidationError::SlotUnavailable { .. } => {
                Some("time")
            }
            ValidationError::InvalidPayment(_) => Some("payment"),
            ValidationError::UnknownService(_) => Some("service_id"),
            ValidationError::UnknownOption(_) => Some("option_id"),
            ValidationError::AvailabilityUnknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("cannot move a {from} booking to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("catalog error: {0:#}")]
    Upstream(anyhow::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(ValidationError::AvailabilityUnknown(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Price(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = match &self {
            AppError::Validation(e) => serde_json::json!({
                "error": self.to_string(),
                "kind": e.kind(),
                "field": e.field(),
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_field() {
        let err = ValidationError::InvalidContact { field: "email" };
        assert_eq!(err.kind(), ValidationErrorKind::InvalidContact);
        assert_eq!(err.field(), Some("email"));

        let err = ValidationError::AvailabilityUnknown("store down".to_string());
        assert_eq!(err.kind(), ValidationErrorKind::AvailabilityUnknown);
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ValidationErrorKind::SlotUnavailable).unwrap();
        assert_eq!(json, "\"slot_unavailable\"");
    }

    #[test]
    fn test_status_codes() {
        let res = AppError::from(ValidationError::MissingField { field: "date" }).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = AppError::from(ValidationError::AvailabilityUnknown("x".into())).into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        let res = AppError::InvalidTransition {
            from: "cancelled",
            to: "cancelled",
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = AppError::NotFound("booking x".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
