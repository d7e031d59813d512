use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use sqlx::mysql::MySqlDatabaseError;

/// Errors surfaced to API callers as `{ "error": "..." }`.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    BadRequest(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "{}", _0)]
    Conflict(String),

    /// Details are logged where the failure happens; callers only see the message.
    #[display(fmt = "{}", _0)]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Constraint failures the handlers answer with a client error.
///
/// MySQL reports all of these as SQLSTATE 23000, so they are told apart by error number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// ER_DUP_ENTRY
    DuplicateKey,
    /// ER_NO_REFERENCED_ROW / ER_NO_REFERENCED_ROW_2
    MissingReference,
}

impl IntegrityViolation {
    pub fn from_mysql_number(number: u16) -> Option<Self> {
        match number {
            1062 => Some(IntegrityViolation::DuplicateKey),
            1216 | 1452 => Some(IntegrityViolation::MissingReference),
            _ => None,
        }
    }
}

pub fn integrity_violation(e: &sqlx::Error) -> Option<IntegrityViolation> {
    match e {
        sqlx::Error::Database(db_err) => db_err
            .try_downcast_ref::<MySqlDatabaseError>()
            .and_then(|mysql_err| IntegrityViolation::from_mysql_number(mysql_err.number())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn renders_error_body_with_status() {
        let err = ApiError::NotFound("User not found".into());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "User not found" }));
    }

    #[test]
    fn maps_each_variant_to_status() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_and_foreign_key_numbers_are_distinguished() {
        assert_eq!(
            IntegrityViolation::from_mysql_number(1062),
            Some(IntegrityViolation::DuplicateKey)
        );
        assert_eq!(
            IntegrityViolation::from_mysql_number(1452),
            Some(IntegrityViolation::MissingReference)
        );
        assert_eq!(
            IntegrityViolation::from_mysql_number(1216),
            Some(IntegrityViolation::MissingReference)
        );
        // NOT NULL and CHECK failures share SQLSTATE 23000 but are not mapped
        assert_eq!(IntegrityViolation::from_mysql_number(1048), None);
        assert_eq!(IntegrityViolation::from_mysql_number(3819), None);
    }

    #[test]
    fn non_database_errors_are_not_integrity_violations() {
        assert_eq!(integrity_violation(&sqlx::Error::RowNotFound), None);
    }
}
