//! Declarative input validation.
//!
//! Every operation that accepts client input declares a schema type
//! implementing [`FromInput`]. Schemas are assembled from `const` field
//! descriptors (see [`fields`]) that trim, coerce and bound individual values.
//! A schema records every violated constraint in an [`Issues`] accumulator
//! before giving up, so clients see all problems with a payload at once.
//!
//! Raw input is a JSON object. Query strings and path segments are converted
//! into objects of JSON strings, and numeric descriptors coerce those strings.

pub mod common;
pub mod fields;

use serde::Serialize;
use serde_json::{Map, Value};

pub use common::{IdParam, ListQuery, SearchTerm, escape_like};
pub use fields::{
    BoolField, ChoiceField, DateField, Field, IntField, SearchField, TextField, TextFormat,
};

/// Untyped input handed to a schema.
pub type RawInput = Map<String, Value>;

/// Build raw input from decoded `key=value` pairs.
///
/// Later duplicates overwrite earlier ones.
pub fn raw_from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> RawInput
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), Value::String(value.into())))
        .collect()
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Input key the constraint applies to; empty for the input as a whole.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Issue {
    /// Create an issue for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Input rejected by a schema, listing every violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("input failed validation with {} issue(s)", issues.len())]
pub struct ValidationFailure {
    issues: Vec<Issue>,
}

impl ValidationFailure {
    /// Wrap a list of issues.
    #[must_use]
    pub const fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Failure with a single issue.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![Issue::new(field, message)])
    }

    /// Violated constraints in the order they were detected.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

/// Accumulates issues while a schema inspects its fields.
#[derive(Debug, Default)]
pub struct Issues(Vec<Issue>);

impl Issues {
    /// Record the outcome of a field check, keeping the value on success.
    pub fn take<T>(&mut self, result: Result<T, Issue>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(issue) => {
                self.0.push(issue);
                None
            }
        }
    }

    /// Record the outcome of a nested schema, keeping its issues on failure.
    pub fn absorb<T>(&mut self, result: Result<T, ValidationFailure>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(failure) => {
                self.0.extend(failure.issues);
                None
            }
        }
    }

    /// Record a free-standing issue.
    pub fn push(&mut self, issue: Issue) {
        self.0.push(issue);
    }

    /// Finish validation, building the value only when no issue was recorded.
    ///
    /// # Errors
    /// Returns a [`ValidationFailure`] listing every recorded issue.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationFailure> {
        if self.0.is_empty() {
            if let Some(value) = build() {
                return Ok(value);
            }
        }
        Err(ValidationFailure::new(self.0))
    }
}

/// A typed value that can be parsed from raw input.
pub trait FromInput: Sized {
    /// Validate `input`, returning the typed value or every violated constraint.
    ///
    /// # Errors
    /// Returns [`ValidationFailure`] when any constraint is violated.
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure>;
}

/// Requested change to a nullable column in an update payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Change<T> {
    /// Key absent: keep the stored value.
    #[default]
    Keep,
    /// Explicit `null` or blank: clear the stored value.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> Change<T> {
    /// Whether the payload left the column untouched.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// New column value, or `None` when the column is kept.
    #[must_use]
    pub const fn as_update(&self) -> Option<Option<&T>> {
        match self {
            Self::Keep => None,
            Self::Clear => Some(None),
            Self::Set(value) => Some(Some(value)),
        }
    }

    /// Value being set, if any.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Keep | Self::Clear => None,
        }
    }
}
