//! Translation of relational storage failures into client-facing errors.
//!
//! Adapters describe a failed statement as a driver-neutral [`DatabaseError`]
//! carrying the PostgreSQL SQLSTATE and whatever diagnostics the server sent.
//! [`map_database_error`] turns it into a [`StorageErrorMapping`] using a
//! static code table, a method-sensitive branch for foreign-key violations and
//! a class fallback for the integrity family (`23xxx`). Codes outside all
//! three yield `None`, leaving the caller to answer with a generic 500.

use std::error::Error as StdError;

use serde::Serialize;

/// SQLSTATE reported for failures to reach the server at all.
pub const CONNECTION_FAILURE: &str = "08006";
/// SQLSTATE for foreign-key violations.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE class prefix of integrity constraint violations.
const INTEGRITY_CLASS: &str = "23";

/// A failed statement as reported by the storage engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("database error {code}: {message}")]
pub struct DatabaseError {
    code: String,
    message: String,
    schema: Option<String>,
    table: Option<String>,
    constraint: Option<String>,
    column: Option<String>,
    detail: Option<String>,
}

impl DatabaseError {
    /// Create an error from a SQLSTATE code and server message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            schema: None,
            table: None,
            constraint: None,
            column: None,
            detail: None,
        }
    }

    /// Failure to reach or keep a connection to the server.
    pub fn connection_failure(message: impl Into<String>) -> Self {
        Self::new(CONNECTION_FAILURE, message)
    }

    /// Attach the schema named by the server.
    #[must_use]
    pub fn with_schema(mut self, schema: Option<&str>) -> Self {
        self.schema = schema.map(str::to_owned);
        self
    }

    /// Attach the table named by the server.
    #[must_use]
    pub fn with_table(mut self, table: Option<&str>) -> Self {
        self.table = table.map(str::to_owned);
        self
    }

    /// Attach the constraint named by the server.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Option<&str>) -> Self {
        self.constraint = constraint.map(str::to_owned);
        self
    }

    /// Attach the column named by the server.
    #[must_use]
    pub fn with_column(mut self, column: Option<&str>) -> Self {
        self.column = column.map(str::to_owned);
        self
    }

    /// Attach the server's detail line.
    #[must_use]
    pub fn with_detail(mut self, detail: Option<&str>) -> Self {
        self.detail = detail.map(str::to_owned);
        self
    }

    /// Five-character SQLSTATE; empty when the driver supplied none.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Primary server message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Schema of the offending object.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Table of the offending object.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Violated constraint.
    #[must_use]
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    /// Offending column.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Server detail line, which may quote row values.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// Request method that triggered the storage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// Any other method.
    Other,
}

impl HttpMethod {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Other => "OTHER",
        }
    }
}

/// Diagnostic fields attached to mapped storage errors outside production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageDiagnostics {
    /// SQLSTATE reported by the server.
    pub sqlstate: String,
    /// Schema of the offending object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Table of the offending object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Violated constraint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    /// Offending column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl From<&DatabaseError> for StorageDiagnostics {
    fn from(error: &DatabaseError) -> Self {
        Self {
            sqlstate: error.code.clone(),
            schema: error.schema.clone(),
            table: error.table.clone(),
            constraint: error.constraint.clone(),
            column: error.column.clone(),
        }
    }
}

/// Client-facing classification of a storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageErrorMapping {
    /// HTTP status.
    pub status: u16,
    /// Machine-readable code.
    pub code: &'static str,
    /// Client-facing message.
    pub message: &'static str,
    /// Seconds the client should wait before retrying, if the failure is transient.
    pub retry_after: Option<u32>,
    /// Diagnostics for development responses.
    pub details: StorageDiagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rule {
    status: u16,
    code: &'static str,
    message: &'static str,
    retry_after: Option<u32>,
}

impl Rule {
    const fn new(status: u16, code: &'static str, message: &'static str) -> Self {
        Self {
            status,
            code,
            message,
            retry_after: None,
        }
    }
}

const SERVICE_UNAVAILABLE: Rule = Rule {
    status: 503,
    code: "SERVICE_UNAVAILABLE",
    message: "Temporary database issue. Please retry.",
    retry_after: Some(1),
};
const FORBIDDEN: Rule = Rule::new(403, "FORBIDDEN", "Access denied");
const DUPLICATE: Rule = Rule::new(409, "DUPLICATE", "Resource already exists.");
const HAS_DEPENDENCIES: Rule = Rule::new(
    409,
    "HAS_DEPENDENCIES",
    "Cannot delete: dependent records exist.",
);
const INVALID_REFERENCE: Rule = Rule::new(
    422,
    "INVALID_REFERENCE",
    "Referenced entity does not exist.",
);
const REQUIRED_FIELD: Rule = Rule::new(422, "REQUIRED_FIELD", "Field is required.");
const CHECK_FAILED: Rule = Rule::new(422, "CHECK_FAILED", "Value failed validation.");
const INVALID_FORMAT: Rule = Rule::new(422, "INVALID_FORMAT", "Invalid input.");
const INTEGRITY_VIOLATION: Rule = Rule::new(
    400,
    "INTEGRITY_VIOLATION",
    "Data integrity constraint violated",
);

const CODE_TABLE: &[(&str, Rule)] = &[
    // deadlock, serialization failure, lock not available
    ("40P01", SERVICE_UNAVAILABLE),
    ("40001", SERVICE_UNAVAILABLE),
    ("55P03", SERVICE_UNAVAILABLE),
    // connection exception, connection failure, cannot connect now
    ("08000", SERVICE_UNAVAILABLE),
    (CONNECTION_FAILURE, SERVICE_UNAVAILABLE),
    ("57P03", SERVICE_UNAVAILABLE),
    // too many connections, out of memory, disk full
    ("53300", SERVICE_UNAVAILABLE),
    ("53200", SERVICE_UNAVAILABLE),
    ("53100", SERVICE_UNAVAILABLE),
    // read-only transaction
    ("25006", SERVICE_UNAVAILABLE),
    ("42501", FORBIDDEN),
    ("23505", DUPLICATE),
    ("23502", REQUIRED_FIELD),
    ("23514", CHECK_FAILED),
    ("22P02", INVALID_FORMAT),
    ("22001", INVALID_FORMAT),
    ("22003", INVALID_FORMAT),
    ("22007", INVALID_FORMAT),
    ("22008", INVALID_FORMAT),
];

fn rule_for(code: &str, method: HttpMethod) -> Option<Rule> {
    if let Some((_, rule)) = CODE_TABLE.iter().find(|(known, _)| *known == code) {
        return Some(*rule);
    }
    if code == FOREIGN_KEY_VIOLATION {
        return Some(if method == HttpMethod::Delete {
            HAS_DEPENDENCIES
        } else {
            INVALID_REFERENCE
        });
    }
    if code.len() == 5 && code.starts_with(INTEGRITY_CLASS) {
        return Some(INTEGRITY_VIOLATION);
    }
    None
}

/// Classify a storage failure raised while serving a `method` request.
///
/// Returns `None` when the SQLSTATE is not recognised.
///
/// # Examples
/// ```
/// use sac_backend::domain::{DatabaseError, HttpMethod, map_database_error};
///
/// let duplicate = DatabaseError::new("23505", "duplicate key value");
/// let mapping = map_database_error(&duplicate, HttpMethod::Post).expect("mapped");
/// assert_eq!((mapping.status, mapping.code), (409, "DUPLICATE"));
///
/// let unknown = DatabaseError::new("99999", "mystery");
/// assert!(map_database_error(&unknown, HttpMethod::Get).is_none());
/// ```
#[must_use]
pub fn map_database_error(error: &DatabaseError, method: HttpMethod) -> Option<StorageErrorMapping> {
    let rule = rule_for(error.code(), method)?;
    Some(StorageErrorMapping {
        status: rule.status,
        code: rule.code,
        message: rule.message,
        retry_after: rule.retry_after,
        details: StorageDiagnostics::from(error),
    })
}

/// Locate a [`DatabaseError`] either as `error` itself or as its direct cause.
///
/// Only one level of wrapping is unwrapped; deeper chains are treated as
/// unrelated failures.
#[must_use]
pub fn find_database_error<'a>(error: &'a (dyn StdError + 'static)) -> Option<&'a DatabaseError> {
    error.downcast_ref::<DatabaseError>().or_else(|| {
        error
            .source()
            .and_then(|cause| cause.downcast_ref::<DatabaseError>())
    })
}
