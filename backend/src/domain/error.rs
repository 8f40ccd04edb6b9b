//! Application error taxonomy.
//!
//! [`AppError`] covers failures that services raise deliberately: a missing
//! record, a malformed request, or a broken business rule. [`Failure`] is the
//! tagged union every handler returns; the HTTP adapter pattern-matches on its
//! variants to pick a status, machine code and message. Errors here stay free
//! of transport types so the service layer can be exercised without Actix.

use std::fmt::Display;

use crate::domain::ports::RepositoryError;
use crate::domain::validation::ValidationFailure;

/// Stable machine-readable codes emitted in error bodies.
pub mod codes {
    /// Input failed schema validation.
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    /// The addressed record does not exist.
    pub const NOT_FOUND: &str = "NOT_FOUND";
    /// The request is malformed in a way validation does not cover.
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    /// Default code for business rule violations.
    pub const BUSINESS_RULE_VIOLATION: &str = "BUSINESS_RULE_VIOLATION";
    /// Unexpected failure.
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    /// Storage failure without a known classification.
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    /// Request body is not valid JSON.
    pub const INVALID_JSON: &str = "INVALID_JSON";
    /// Request body exceeds the configured limit.
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    /// Request body has an unsupported content type.
    pub const UNSUPPORTED_MEDIA_TYPE: &str = "UNSUPPORTED_MEDIA_TYPE";
}

/// Failure raised on purpose by services or request plumbing.
///
/// ## Invariants
/// - `status` is a valid HTTP status code.
/// - `message` is safe to show to clients.
///
/// # Examples
/// ```
/// use sac_backend::domain::AppError;
///
/// let err = AppError::not_found("Departamento", 999);
/// assert_eq!(err.status(), 404);
/// assert_eq!(err.message(), "Departamento 999 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AppError {
    status: u16,
    code: &'static str,
    message: String,
}

impl AppError {
    /// Build an error with an explicit status and code.
    pub fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Record `id` of `resource` does not exist.
    pub fn not_found(resource: &str, id: impl Display) -> Self {
        Self::new(404, codes::NOT_FOUND, format!("{resource} {id} not found"))
    }

    /// Malformed request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, codes::BAD_REQUEST, message)
    }

    /// Business rule violation using the default code.
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::business_rule_with_code(codes::BUSINESS_RULE_VIOLATION, message)
    }

    /// Business rule violation with a caller-supplied code.
    pub fn business_rule_with_code(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(422, code, message)
    }

    /// HTTP status the error maps to.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Every way a request can fail once it reaches a handler.
///
/// Variants are checked in declaration order by the HTTP error responder.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    /// Input rejected by a validation schema.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    /// Repository call failed.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    /// Deliberate application error.
    #[error(transparent)]
    App(#[from] AppError),
    /// Anything else.
    #[error(transparent)]
    Unexpected(Box<dyn std::error::Error + Send + Sync>),
}

impl Failure {
    /// Wrap an arbitrary error as [`Failure::Unexpected`].
    pub fn unexpected(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unexpected(error.into())
    }
}
