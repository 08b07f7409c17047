//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become `invalid_request` errors whose details name the offending
//! field and a machine-readable code.

use std::str::FromStr;

use chrono::NaiveDate;
use pagination::{PageRequest, PageRequestError};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{Error, parse_stay_date};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidPage => "invalid_page",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a UUID-backed identifier taken from a path or body field.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

/// Parse a stay date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    parse_stay_date(value).map_err(|_| {
        field_error(
            field,
            format!(
                "{} must be a calendar date or RFC 3339 timestamp",
                field.as_str()
            ),
            ErrorCode::InvalidDate,
            value,
        )
    })
}

/// `?page=&pageSize=` query parameters of paged listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Items per page; at most 100.
    pub page_size: Option<u32>,
}

impl PageQuery {
    /// Validate into a page request using `default_size` when none is given.
    pub(crate) fn into_request(self, default_size: u32) -> Result<PageRequest, Error> {
        PageRequest::from_query(self.page, self.page_size, default_size).map_err(|err| {
            let field = match err {
                PageRequestError::ZeroPage => "page",
                PageRequestError::ZeroPageSize | PageRequestError::PageSizeTooLarge { .. } => {
                    "pageSize"
                }
            };
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": field,
                "code": ErrorCode::InvalidPage.as_str(),
            }))
        })
    }
}
