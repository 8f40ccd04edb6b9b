//! OpenAPI schema definitions for types owned by other crates or layers.
//!
//! The pagination crate and the validation layer stay free of utoipa. This
//! module mirrors their wire shapes so the document can reference them.

use utoipa::ToSchema;

/// OpenAPI schema for [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = PageMeta, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetaSchema {
    /// One-based page number.
    #[schema(example = 2)]
    page: u32,
    /// Page size.
    #[schema(example = 10)]
    limit: u32,
    /// Rows matching the query across all pages.
    #[schema(example = 15)]
    total: u64,
    /// `ceil(total / limit)`; zero when there are no rows.
    #[schema(example = 2)]
    total_pages: u64,
}

/// OpenAPI schema for [`crate::domain::validation::Issue`].
#[derive(ToSchema)]
#[schema(as = ValidationIssue)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct IssueSchema {
    /// Offending input key; empty for the input as a whole.
    #[schema(example = "nombre")]
    field: String,
    /// Violated constraint.
    #[schema(example = "Required")]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn page_meta_schema_uses_camel_case() {
        let schema_json = schema_to_json::<PageMetaSchema>();
        assert_eq!(PageMetaSchema::name(), "PageMeta");
        assert!(
            schema_json.contains("totalPages"),
            "schema should expose totalPages"
        );
    }

    #[test]
    fn issue_schema_has_expected_fields() {
        let schema_json = schema_to_json::<IssueSchema>();
        assert_eq!(IssueSchema::name(), "ValidationIssue");
        assert!(schema_json.contains("field"));
        assert!(schema_json.contains("message"));
    }
}
