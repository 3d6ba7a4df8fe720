//! Query-string validation helpers for the todo endpoints.
//!
//! Actix's typed extractors reject bad input with their own error shapes, so
//! handlers take loosely-typed optional strings and validate them here. Every
//! rejection is an `invalid_request` carrying structured details naming the
//! offending field.

use chrono::NaiveDate;
use pagination::{DEFAULT_PAGE, DEFAULT_SIZE, PageRequest, SortDirection};
use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{TodoSort, TodoSortField};

fn rejection(field: &str, value: &str, code: &str) -> Error {
    Error::invalid_request(format!("invalid value for query parameter '{field}'"))
        .with_details(json!({ "field": field, "value": value, "code": code }))
}

fn parse_u32(field: &str, value: Option<&str>, default: u32) -> Result<u32, Error> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| rejection(field, raw, "not_a_non_negative_integer")),
    }
}

/// Resolve `page` and `size` query parameters into a validated page request.
///
/// Missing parameters fall back to the documented defaults; a zero `size` is
/// rejected.
pub fn parse_page_request(page: Option<&str>, size: Option<&str>) -> Result<PageRequest, Error> {
    let page = parse_u32("page", page, DEFAULT_PAGE)?;
    let size_value = parse_u32("size", size, DEFAULT_SIZE)?;
    PageRequest::new(page, size_value)
        .map_err(|_| rejection("size", &size_value.to_string(), "zero_size"))
}

/// Resolve the `sort` query parameter into a field/direction pair.
///
/// The syntax is `field` or `field,direction`. Unknown fields are rejected;
/// unknown direction tokens fall back to ascending.
pub fn parse_sort(sort: Option<&str>) -> Result<TodoSort, Error> {
    let Some(raw) = sort else {
        return Ok(TodoSort::default());
    };
    let (field_token, direction) = match raw.split_once(',') {
        Some((field, direction)) => (field, SortDirection::from_token(direction)),
        None => (raw, SortDirection::Asc),
    };
    let field: TodoSortField = field_token.parse().map_err(|_| {
        Error::invalid_request("invalid value for query parameter 'sort'").with_details(json!({
            "field": "sort",
            "value": raw,
            "code": "unknown_sort_field",
            "allowed": TodoSortField::TOKENS,
        }))
    })?;
    Ok(TodoSort { field, direction })
}

/// Parse an optional ISO-8601 (`YYYY-MM-DD`) date parameter, substituting the
/// given bound when absent.
pub fn parse_date_or(field: &str, value: Option<&str>, bound: NaiveDate) -> Result<NaiveDate, Error> {
    match value {
        None => Ok(bound),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| rejection(field, raw, "not_an_iso_date")),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn absent_parameters_use_defaults() {
        let request = parse_page_request(None, None).expect("defaults");
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.size(), DEFAULT_SIZE);
    }

    #[rstest]
    #[case(Some("3"), Some("25"), 3, 25)]
    #[case(Some("0"), None, 0, DEFAULT_SIZE)]
    #[case(None, Some("1"), DEFAULT_PAGE, 1)]
    fn numeric_parameters_parse(
        #[case] page: Option<&str>,
        #[case] size: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_size: u32,
    ) {
        let request = parse_page_request(page, size).expect("valid request");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.size(), expected_size);
    }

    #[rstest]
    #[case(Some("-1"), None)]
    #[case(Some("abc"), None)]
    #[case(None, Some("0"))]
    #[case(None, Some("ten"))]
    fn bad_numeric_parameters_are_rejected(#[case] page: Option<&str>, #[case] size: Option<&str>) {
        let error = parse_page_request(page, size).expect_err("rejection");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert!(error.details().is_some());
    }

    #[rstest]
    #[case(None, TodoSortField::DueDate, SortDirection::Asc)]
    #[case(Some("title"), TodoSortField::Title, SortDirection::Asc)]
    #[case(Some("dueDate,desc"), TodoSortField::DueDate, SortDirection::Desc)]
    #[case(Some("createdAt,DESC"), TodoSortField::CreatedAt, SortDirection::Desc)]
    #[case(Some("updatedAt,sideways"), TodoSortField::UpdatedAt, SortDirection::Asc)]
    fn sort_parameters_parse(
        #[case] sort: Option<&str>,
        #[case] field: TodoSortField,
        #[case] direction: SortDirection,
    ) {
        let parsed = parse_sort(sort).expect("valid sort");
        assert_eq!(parsed.field, field);
        assert_eq!(parsed.direction, direction);
    }

    #[rstest]
    #[case("due_date,asc")]
    #[case("owner")]
    #[case("")]
    fn unknown_sort_fields_are_rejected(#[case] sort: &str) {
        let error = parse_sort(Some(sort)).expect_err("rejection");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details["code"], "unknown_sort_field");
        assert!(details["allowed"].as_array().is_some());
    }

    #[rstest]
    fn absent_dates_use_the_supplied_bound() {
        let parsed = parse_date_or("start", None, NaiveDate::MIN).expect("bound");
        assert_eq!(parsed, NaiveDate::MIN);
    }

    #[rstest]
    fn iso_dates_parse() {
        let parsed = parse_date_or("end", Some("2025-06-30"), NaiveDate::MAX).expect("date");
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"));
    }

    #[rstest]
    #[case("30-06-2025")]
    #[case("2025-13-01")]
    #[case("tomorrow")]
    fn malformed_dates_are_rejected(#[case] value: &str) {
        let error = parse_date_or("start", Some(value), NaiveDate::MIN).expect_err("rejection");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.details().expect("details")["code"], "not_an_iso_date");
    }
}
