//! Filter key parsing
//!
//! Parses wire keys of the form `property[_operator[_date]]` plus a raw value
//! into a leaf [`Condition`]. The operator defaults to `custom` when omitted;
//! a third segment equal to `date` dispatches to the date-literal sub-parser.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::{debug, error};

use crate::error::SearchError;
use crate::filter::{Condition, SEPARATOR};
use crate::operator::SearchOperator;
use crate::value::SearchValue;

/// Date-only literal, `yyyy-MM-dd` with optional `-`, `/` or `.` separators.
/// Day-of-month and leap-year aware; the Feb-29 alternative only accepts leap
/// years. Year 0000 is rejected separately in code.
static DATE_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[0-9]{4}([-/.]?)(?:(?:0?[1-9]|1[0-2])([-/.]?)(?:0?[1-9]|1[0-9]|2[0-8])|(?:0?[13-9]|1[0-2])([-/.]?)(?:29|30)|(?:0?[13578]|1[02])([-/.]?)31)|(?:[0-9]{2}(?:0[48]|[2468][048]|[13579][26])|(?:0[48]|[2468][048]|[13579][26])00)([-/.]?)0?2([-/.]?)29)$",
    )
    .expect("Invalid regex")
});

/// Full timestamp literal, `yyyy-MM-dd HH:mm:ss` with mandatory dashes, same
/// calendar validation as [`DATE_ONLY`].
static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[0-9]{4}-(?:(?:0[1-9]|1[0-2])-(?:0[1-9]|1[0-9]|2[0-8])|(?:0[13-9]|1[0-2])-(?:29|30)|(?:0[13578]|1[02])-31)|(?:[0-9]{2}(?:0[48]|[2468][048]|[13579][26])|(?:0[48]|[2468][048]|[13579][26])00)-02-29)\s([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]$",
    )
    .expect("Invalid regex")
});

/// Parse a wire key and raw value into a condition.
///
/// Returns `Ok(None)` when the value is blank and the operator does not
/// tolerate blanks; the caller must treat that as "omit", not as an error.
pub fn parse_condition(
    key: &str,
    value: impl Into<SearchValue>,
) -> Result<Option<Condition>, SearchError> {
    let value = value.into();
    let segments: Vec<&str> = key.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(SearchError::MalformedKey {
            key: key.to_string(),
        });
    }

    let property = segments[0];
    let operator = match segments.get(1) {
        None => SearchOperator::Custom,
        Some(token) => SearchOperator::by_name(token).ok_or_else(|| {
            error!(property, token, "invalid search operator");
            SearchError::InvalidOperator {
                property: property.to_string(),
                token: token.to_string(),
            }
        })?,
    };

    // Blank values do not participate in the query at all
    if value.is_blank() && !operator.allows_blank_value() {
        debug!(key, "dropping search condition with blank value");
        return Ok(None);
    }

    if let Some(tag) = segments.get(2) {
        if tag.eq_ignore_ascii_case("date") {
            let parsed = parse_date_literal(&value, operator)?;
            return Ok(Some(Condition::new(property, operator, parsed)));
        }
    }

    Ok(Some(Condition::new(property, operator, value)))
}

/// Parse a date literal according to the `_date` sub-grammar.
///
/// A date-only literal is widened to the inclusive end of the day for
/// less-than operators and to midnight otherwise, so clients can express day
/// ranges without knowing the entity's timestamp granularity.
fn parse_date_literal(
    value: &SearchValue,
    operator: SearchOperator,
) -> Result<SearchValue, SearchError> {
    let bad = || SearchError::BadDateLiteral {
        value: value.as_text(),
    };

    let text = match value {
        SearchValue::Text(text) => text.trim(),
        _ => return Err(bad()),
    };
    if text.starts_with("0000") {
        return Err(bad());
    }

    if DATE_ONLY.is_match(text) {
        let date = parse_calendar_date(text).ok_or_else(bad)?;
        let (hour, minute, second) = match operator {
            SearchOperator::Gt | SearchOperator::Gte => (0, 0, 0),
            SearchOperator::Lt | SearchOperator::Lte => (23, 59, 59),
            _ => (0, 0, 0),
        };
        let datetime = date.and_hms_opt(hour, minute, second).ok_or_else(bad)?;
        Ok(SearchValue::DateTime(datetime))
    } else if DATE_TIME.is_match(text) {
        let datetime = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
            .map_err(|_| bad())?;
        Ok(SearchValue::DateTime(datetime))
    } else {
        Err(bad())
    }
}

/// Parse a date-only literal, normalizing `/` and `.` separators to `-`.
fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let normalized = text.replace(['/', '.'], "-");
    if normalized.contains('-') {
        NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()
    } else {
        NaiveDate::parse_from_str(&normalized, "%Y%m%d").ok()
    }
}
