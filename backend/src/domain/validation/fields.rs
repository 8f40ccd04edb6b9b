//! Reusable field descriptors.
//!
//! Descriptors are `const` values naming an input key and its constraints.
//! The [`Field`] trait supplies the presence policies shared by all of them:
//! required, optional, defaulted, and the two update flavours (`patch` for
//! non-nullable columns and `change` for nullable ones).

use std::marker::PhantomData;

use chrono::NaiveDate;
use serde_json::Value;

use super::{Change, Issue, RawInput, SearchTerm};

/// Largest value of a PostgreSQL `integer` column.
pub const INTEGER_MAX: i64 = 2_147_483_647;
/// Largest value of a PostgreSQL `smallint` column.
pub const SMALLINT_MAX: i64 = 32_767;

const REQUIRED: &str = "Required";
const NOT_NULL: &str = "must not be null";

enum Slot<'a> {
    Absent,
    Null,
    Present(&'a Value),
}

fn slot<'a>(input: &'a RawInput, name: &str) -> Slot<'a> {
    match input.get(name) {
        None => Slot::Absent,
        Some(Value::Null) => Slot::Null,
        Some(value) => Slot::Present(value),
    }
}

/// Presence policies shared by every descriptor.
pub trait Field {
    /// Typed value produced by the descriptor.
    type Output;

    /// Input key the descriptor reads.
    fn name(&self) -> &'static str;

    /// Convert a present, non-null value. `Ok(None)` means the value is blank.
    ///
    /// # Errors
    /// Returns an [`Issue`] when the value violates the descriptor.
    fn parse(&self, value: &Value) -> Result<Option<Self::Output>, Issue>;

    /// Build an issue against this field.
    fn issue(&self, message: impl Into<String>) -> Issue {
        Issue::new(self.name(), message)
    }

    /// Value that must be present and non-blank.
    ///
    /// # Errors
    /// Returns an [`Issue`] when the value is missing, blank or invalid.
    fn required(&self, input: &RawInput) -> Result<Self::Output, Issue> {
        match slot(input, self.name()) {
            Slot::Present(value) => self.parse(value)?.ok_or_else(|| self.issue(REQUIRED)),
            Slot::Absent | Slot::Null => Err(self.issue(REQUIRED)),
        }
    }

    /// Value that may be missing, null or blank.
    ///
    /// # Errors
    /// Returns an [`Issue`] when a supplied value is invalid.
    fn optional(&self, input: &RawInput) -> Result<Option<Self::Output>, Issue> {
        match slot(input, self.name()) {
            Slot::Present(value) => self.parse(value),
            Slot::Absent | Slot::Null => Ok(None),
        }
    }

    /// Value that falls back to `default` when missing, null or blank.
    ///
    /// # Errors
    /// Returns an [`Issue`] when a supplied value is invalid.
    fn or_default(&self, input: &RawInput, default: Self::Output) -> Result<Self::Output, Issue> {
        Ok(self.optional(input)?.unwrap_or(default))
    }

    /// Update of a non-nullable column: absent keeps, anything else must be valid.
    ///
    /// # Errors
    /// Returns an [`Issue`] when the value is null, blank or invalid.
    fn patch(&self, input: &RawInput) -> Result<Option<Self::Output>, Issue> {
        match slot(input, self.name()) {
            Slot::Absent => Ok(None),
            Slot::Null => Err(self.issue(NOT_NULL)),
            Slot::Present(value) => self
                .parse(value)?
                .map(Some)
                .ok_or_else(|| self.issue(REQUIRED)),
        }
    }

    /// Update of a nullable column: absent keeps, null or blank clears.
    ///
    /// # Errors
    /// Returns an [`Issue`] when a supplied value is invalid.
    fn change(&self, input: &RawInput) -> Result<Change<Self::Output>, Issue> {
        match slot(input, self.name()) {
            Slot::Absent => Ok(Change::Keep),
            Slot::Null => Ok(Change::Clear),
            Slot::Present(value) => Ok(self.parse(value)?.map_or(Change::Clear, Change::Set)),
        }
    }
}

/// Format constraint applied to text after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Any characters.
    Plain,
    /// `local@domain.tld` without whitespace.
    Email,
}

/// Trimmed text bounded by a maximum character count.
#[derive(Debug, Clone, Copy)]
pub struct TextField {
    name: &'static str,
    max: usize,
    format: TextFormat,
}

impl TextField {
    /// Plain text of at most `max` characters.
    #[must_use]
    pub const fn new(name: &'static str, max: usize) -> Self {
        Self {
            name,
            max,
            format: TextFormat::Plain,
        }
    }

    /// Email address of at most `max` characters.
    #[must_use]
    pub const fn email(name: &'static str, max: usize) -> Self {
        Self {
            name,
            max,
            format: TextFormat::Email,
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
        && !value.chars().any(char::is_whitespace)
}

impl Field for TextField {
    type Output = String;

    fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, value: &Value) -> Result<Option<String>, Issue> {
        let Value::String(raw) = value else {
            return Err(self.issue("must be a string"));
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > self.max {
            return Err(self.issue(format!("must be at most {} characters", self.max)));
        }
        if self.format == TextFormat::Email && !looks_like_email(trimmed) {
            return Err(self.issue("must be a valid email address"));
        }
        Ok(Some(trimmed.to_owned()))
    }
}

/// Integer within `min..=max`, coerced from numbers or numeric strings.
#[derive(Debug)]
pub struct IntField<T> {
    name: &'static str,
    min: i64,
    max: i64,
    target: PhantomData<fn() -> T>,
}

impl<T> Clone for IntField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IntField<T> {}

impl<T> IntField<T> {
    /// Integer bounded by `min` and `max` inclusive.
    #[must_use]
    pub const fn new(name: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            min,
            max,
            target: PhantomData,
        }
    }

    /// Positive `integer` identifier.
    #[must_use]
    pub const fn id(name: &'static str) -> Self {
        Self::new(name, 1, INTEGER_MAX)
    }

    /// Non-negative `smallint` quantity.
    #[must_use]
    pub const fn count(name: &'static str) -> Self {
        Self::new(name, 0, SMALLINT_MAX)
    }
}

impl<T: TryFrom<i64>> Field for IntField<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, value: &Value) -> Result<Option<T>, Issue> {
        let number = match value {
            Value::Number(number) => number.as_i64(),
            Value::String(raw) if raw.trim().is_empty() => return Ok(None),
            Value::String(raw) => raw.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| self.issue("must be an integer"))?;

        if number < self.min {
            return Err(if self.min == 1 {
                self.issue("must be a positive integer")
            } else {
                self.issue(format!("must be at least {}", self.min))
            });
        }
        if number > self.max {
            return Err(self.issue(format!("must be at most {}", self.max)));
        }
        T::try_from(number)
            .map(Some)
            .map_err(|_| self.issue("is out of range"))
    }
}

/// Boolean, accepting JSON booleans or the strings `true` and `false`.
#[derive(Debug, Clone, Copy)]
pub struct BoolField {
    name: &'static str,
}

impl BoolField {
    /// Boolean read from `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Field for BoolField {
    type Output = bool;

    fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, value: &Value) -> Result<Option<bool>, Issue> {
        match value {
            Value::Bool(flag) => Ok(Some(*flag)),
            Value::String(raw) => match raw.trim() {
                "" => Ok(None),
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(self.issue("must be a boolean")),
            },
            _ => Err(self.issue("must be a boolean")),
        }
    }
}

/// Calendar date written as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy)]
pub struct DateField {
    name: &'static str,
}

impl DateField {
    /// Date read from `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Field for DateField {
    type Output = NaiveDate;

    fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, value: &Value) -> Result<Option<NaiveDate>, Issue> {
        let Value::String(raw) = value else {
            return Err(self.issue("must be a date in YYYY-MM-DD format"));
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| self.issue("must be a date in YYYY-MM-DD format"))
    }
}

/// One of a fixed set of labels.
#[derive(Debug)]
pub struct ChoiceField<T: 'static> {
    name: &'static str,
    options: &'static [(&'static str, T)],
}

impl<T: 'static> Clone for ChoiceField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for ChoiceField<T> {}

impl<T: 'static> ChoiceField<T> {
    /// Choice among `options`, matched by exact label.
    #[must_use]
    pub const fn new(name: &'static str, options: &'static [(&'static str, T)]) -> Self {
        Self { name, options }
    }

    fn allowed(&self) -> String {
        self.options
            .iter()
            .map(|(label, _)| *label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<T: Copy + 'static> Field for ChoiceField<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, value: &Value) -> Result<Option<T>, Issue> {
        let Value::String(raw) = value else {
            return Err(self.issue(format!("must be one of: {}", self.allowed())));
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        self.options
            .iter()
            .find(|(label, _)| *label == trimmed)
            .map(|(_, choice)| Some(*choice))
            .ok_or_else(|| self.issue(format!("must be one of: {}", self.allowed())))
    }
}

/// Free-text search term with LIKE wildcards escaped.
#[derive(Debug, Clone, Copy)]
pub struct SearchField {
    name: &'static str,
    max: usize,
}

impl SearchField {
    /// Search term of at most `max` characters.
    #[must_use]
    pub const fn new(name: &'static str, max: usize) -> Self {
        Self { name, max }
    }
}

impl Field for SearchField {
    type Output = SearchTerm;

    fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, value: &Value) -> Result<Option<SearchTerm>, Issue> {
        let Value::String(raw) = value else {
            return Err(self.issue("must be a string"));
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > self.max {
            return Err(self.issue(format!("must be at most {} characters", self.max)));
        }
        Ok(Some(SearchTerm::new(trimmed)))
    }
}
