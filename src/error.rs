//! Error types for the search engine
//!
//! Every fatal case is surfaced immediately to the caller; inputs are
//! deterministic, so there is no retry path. A blank value on an operator
//! that does not tolerate blanks is a silent omission, not an error.

use thiserror::Error;

use crate::operator::SearchOperator;
use crate::value::SearchValue;

/// Errors raised while parsing, converting, or compiling a search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Key failed to split into at least one segment
    #[error("malformed search key {key:?}, expected property or property_op")]
    MalformedKey { key: String },

    /// Symbol lookup failed against the operator registry
    #[error("unknown operator symbol {symbol:?}, must be one of [{}]", SearchOperator::describe_all())]
    UnknownOperator { symbol: String },

    /// Second key segment does not name a registered operator
    #[error("invalid operator {token:?} for search property {property:?}, must be one of [{}]", SearchOperator::describe_all())]
    InvalidOperator { property: String, token: String },

    /// Date literal matches neither accepted pattern or is not a calendar date
    #[error("bad date literal {value:?}, expected 'yyyy-MM-dd' or 'yyyy-MM-dd HH:mm:ss'")]
    BadDateLiteral { value: String },

    /// Property path cannot be resolved on the target schema
    #[error("invalid search property {property:?}")]
    InvalidSearchProperty { property: String },

    /// Property resolved but the value cannot be coerced to its declared type
    #[error("invalid search value {value:?} for property {property:?}")]
    InvalidSearchValue { property: String, value: SearchValue },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_operator_message_enumerates_operators() {
        let err = SearchError::InvalidOperator {
            property: "name".to_string(),
            token: "likee".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("\"likee\""));
        assert!(message.contains("\"name\""));
        assert!(message.contains("eq"));
        assert!(message.contains("customFragment"));
    }

    #[test]
    fn invalid_search_value_carries_property_and_value() {
        let err = SearchError::InvalidSearchValue {
            property: "age".to_string(),
            value: SearchValue::Text("abc".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("age"));
        assert!(message.contains("abc"));
    }
}
