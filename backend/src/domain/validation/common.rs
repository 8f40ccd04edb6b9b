//! Schemas shared by every resource: id path parameters, search terms and
//! paginated list queries.

use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageRequest};

use super::fields::{Field, INTEGER_MAX, IntField, SearchField};
use super::{FromInput, Issue, Issues, RawInput, ValidationFailure};

/// Longest accepted free-text search term.
pub const SEARCH_MAX_CHARS: usize = 100;

/// `q` query parameter.
pub const SEARCH: SearchField = SearchField::new("q", SEARCH_MAX_CHARS);

const ID: IntField<i32> = IntField::id("id");
const PAGE: IntField<u32> = IntField::new("page", 1, INTEGER_MAX);
const LIMIT: IntField<u32> = IntField::new("limit", 1, MAX_LIMIT as i64);

/// Escape `LIKE` metacharacters so user input only ever matches literally.
///
/// The escape character itself is doubled first so that the escapes added
/// for `%` and `_` are not re-escaped.
///
/// # Examples
/// ```
/// use sac_backend::domain::validation::escape_like;
///
/// assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
/// ```
#[must_use]
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Trimmed search text together with its escaped `LIKE` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    text: String,
    escaped: String,
}

impl SearchTerm {
    /// Wrap already-trimmed search text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let escaped = escape_like(&text);
        Self { text, escaped }
    }

    /// Search text as entered, minus surrounding whitespace.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text with `LIKE` metacharacters escaped.
    #[must_use]
    pub fn escaped(&self) -> &str {
        &self.escaped
    }

    /// `%escaped%`, matching the term anywhere in a column.
    #[must_use]
    pub fn contains_pattern(&self) -> String {
        format!("%{}%", self.escaped)
    }

    /// Whether `candidate` contains the term, ignoring case.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        candidate
            .to_lowercase()
            .contains(&self.text.to_lowercase())
    }
}

/// Positive record identifier taken from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParam(i32);

impl IdParam {
    /// Identifier value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl FromInput for IdParam {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        ID.required(input)
            .map(Self)
            .map_err(|issue| ValidationFailure::new(vec![issue]))
    }
}

/// Paginated list query combining page coordinates with a resource filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<F> {
    /// Page coordinates; `page` defaults to 1 and `limit` to 10.
    pub page: PageRequest,
    /// Resource-specific filter.
    pub filter: F,
}

impl<F: FromInput> FromInput for ListQuery<F> {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let page = issues.take(PAGE.or_default(input, DEFAULT_PAGE));
        let limit = issues.take(LIMIT.or_default(input, DEFAULT_LIMIT));
        let filter = issues.absorb(F::from_input(input));
        let request = match (page, limit) {
            (Some(number), Some(size)) => issues.take(
                PageRequest::new(number, size).map_err(|err| Issue::new("limit", err.to_string())),
            ),
            _ => None,
        };
        issues.finish(|| {
            Some(Self {
                page: request?,
                filter: filter?,
            })
        })
    }
}
