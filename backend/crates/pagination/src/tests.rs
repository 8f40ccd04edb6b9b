//! Unit tests for offset pagination primitives.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn default_request_uses_first_page_of_ten() {
    let request = PageRequest::default();
    assert_eq!(request.page(), DEFAULT_PAGE);
    assert_eq!(request.limit(), DEFAULT_LIMIT);
    assert_eq!(request.offset(), 0);
}

#[rstest]
#[case(0, 10, PageRequestError::InvalidPage)]
#[case(1, 0, PageRequestError::InvalidLimit)]
#[case(1, 501, PageRequestError::InvalidLimit)]
fn rejects_out_of_range_coordinates(
    #[case] page: u32,
    #[case] limit: u32,
    #[case] expected: PageRequestError,
) {
    assert_eq!(PageRequest::new(page, limit), Err(expected));
}

#[rstest]
fn accepts_the_maximum_limit() {
    let request = PageRequest::new(1, MAX_LIMIT).expect("max limit is valid");
    assert_eq!(request.limit(), 500);
}

#[rstest]
#[case(1, 10, 0)]
#[case(2, 10, 10)]
#[case(3, 25, 50)]
fn offset_skips_preceding_pages(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
    let request = PageRequest::new(page, limit).expect("valid request");
    assert_eq!(request.offset(), offset);
}

#[rstest]
#[case(0, 10, 0)]
#[case(1, 10, 1)]
#[case(10, 10, 1)]
#[case(11, 10, 2)]
#[case(15, 10, 2)]
#[case(1000, 500, 2)]
#[case(7, 1, 7)]
fn total_pages_is_ceiling_of_total_over_limit(
    #[case] total: u64,
    #[case] limit: u32,
    #[case] expected: u64,
) {
    let request = PageRequest::new(1, limit).expect("valid request");
    assert_eq!(PageMeta::new(request, total).total_pages, expected);
}

#[rstest]
fn empty_total_forces_empty_data() {
    let request = PageRequest::default();
    let page = Paginated::new(vec![1, 2, 3], request, 0);
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total_pages, 0);
}

#[rstest]
fn metadata_serialises_in_camel_case() {
    let request = PageRequest::new(2, 10).expect("valid request");
    let page = Paginated::new(vec!["x"], request, 15);
    let value = serde_json::to_value(&page).expect("serialise envelope");
    assert_eq!(
        value,
        json!({
            "data": ["x"],
            "pagination": { "page": 2, "limit": 10, "total": 15, "totalPages": 2 }
        })
    );
}
