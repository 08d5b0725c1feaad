use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::store::USERS_EMAIL_KEY;

/// Persistence-level failures shared by every `Store` implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateHandle,
    #[error("email already registered")]
    DuplicateContact,
    /// A referenced user or movie does not exist.
    #[error("referenced record does not exist")]
    MissingReference,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return match db.constraint() {
                    Some(USERS_EMAIL_KEY) => StoreError::DuplicateContact,
                    _ => StoreError::DuplicateHandle,
                };
            }
            if db.is_foreign_key_violation() {
                return StoreError::MissingReference;
            }
        }
        StoreError::Backend(e.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    MissingField(String),
    #[error("Username already exists")]
    DuplicateHandle,
    #[error("Email already registered")]
    DuplicateContact,
    #[error("Invalid username or password")]
    AuthFailure,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn missing(msg: impl Into<String>) -> Self {
        Self::MissingField(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_)
            | AppError::DuplicateHandle
            | AppError::DuplicateContact
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthFailure | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateHandle => AppError::DuplicateHandle,
            StoreError::DuplicateContact => AppError::DuplicateContact,
            StoreError::MissingReference => AppError::NotFound("Movie not found".into()),
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

/// Body of every JSON response that only carries a message.
#[derive(Debug, Serialize)]
pub struct MsgResponse {
    pub msg: String,
}

impl MsgResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = match &self {
            AppError::Internal(e) => {
                error!(error = %e, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(MsgResponse { msg })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Violation {
        Unique,
        ForeignKey,
        Other,
    }

    #[derive(Debug)]
    struct FakeDbError {
        violation: Violation,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake database error")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            match self.violation {
                Violation::Unique => ErrorKind::UniqueViolation,
                Violation::ForeignKey => ErrorKind::ForeignKeyViolation,
                Violation::Other => ErrorKind::Other,
            }
        }
    }

    fn db_error(violation: Violation, constraint: Option<&'static str>) -> StoreError {
        sqlx::Error::Database(Box::new(FakeDbError {
            violation,
            constraint,
        }))
        .into()
    }

    #[test]
    fn unique_violation_on_username_is_duplicate_handle() {
        let err = db_error(Violation::Unique, Some("users_username_key"));
        assert!(matches!(err, StoreError::DuplicateHandle));
    }

    #[test]
    fn unique_violation_on_email_is_duplicate_contact() {
        let err = db_error(Violation::Unique, Some(USERS_EMAIL_KEY));
        assert!(matches!(err, StoreError::DuplicateContact));
    }

    #[test]
    fn foreign_key_violation_is_missing_reference() {
        let err = db_error(Violation::ForeignKey, Some("reviews_movie_id_fkey"));
        assert!(matches!(err, StoreError::MissingReference));
    }

    #[test]
    fn other_database_errors_are_backend() {
        let err = db_error(Violation::Other, None);
        assert!(matches!(err, StoreError::Backend(_)));
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn migration_declares_the_email_constraint() {
        let sql = include_str!("../migrations/20240101000000_init.sql");
        assert!(sql.contains(&format!("CONSTRAINT {USERS_EMAIL_KEY} UNIQUE (email)")));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::missing("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DuplicateHandle.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::AuthFailure.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("Movie not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_reference_maps_to_not_found() {
        let err: AppError = StoreError::MissingReference.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn msg_response_serialization() {
        let json = serde_json::to_string(&MsgResponse::new("Movie created")).unwrap();
        assert_eq!(json, r#"{"msg":"Movie created"}"#);
    }
}
