use actix_web::HttpResponse;
use chrono::NaiveDate;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

/// Field-level input failures. These are detected before any storage call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("service_name must not be empty")]
    InvalidServiceName,

    #[error("price must be a positive integer, got {0}")]
    InvalidPrice(i32),

    #[error("user_id must be a non-nil UUID")]
    InvalidUserId,

    #[error("invalid {field}: expected MM-YYYY, got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("end date {end} is earlier than start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("limit must be between 1 and {max}, got {limit}")]
    InvalidLimit { limit: i64, max: i64 },

    #[error("offset must not be negative, got {0}")]
    InvalidOffset(i64),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid {field} format: '{value}'")]
    InvalidId { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // === APPLICATION ERRORS ===
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("No matches found: {0}")]
    NoMatchesFound(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_json = |err_msg: &str| {
            if is_dev {
                serde_json::json!({ "error": err_msg })
            } else {
                serde_json::json!({ "error": "Internal server error" })
            }
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::Validation(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }

            // === APPLICATION ERRORS ===
            AppError::BadRequest(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::NotFound(_) | AppError::NoMatchesFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": self.to_string() }))
            }

            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(error))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::NoMatchesFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{ResponseError, body::to_bytes, http::StatusCode};

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::from(ValidationError::InvalidServiceName).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("subscription".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NoMatchesFound("total".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_validation_error_body_names_the_field() {
        let err = AppError::from(ValidationError::InvalidDate {
            field: "start_date",
            value: "13-2024".to_string(),
        });
        let res = err.error_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(res.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            "Validation error: invalid start_date: expected MM-YYYY, got '13-2024'"
        );
    }

    #[test]
    fn test_date_range_message() {
        let err = ValidationError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "end date 2024-01-01 is earlier than start date 2024-03-01"
        );
    }
}
