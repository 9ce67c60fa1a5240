//! Operator registry
//!
//! Closed enumeration of comparison/match operators. Each operator carries a
//! human-readable label, the symbol it renders to in a query fragment, and a
//! flag saying whether a blank value is meaningful for it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Comparison/match operator for a single filter condition.
///
/// `Custom` and `CustomFragment` are pseudo-operators with no render symbol:
/// `Custom` conditions are resolved by the caller out-of-band, and
/// `CustomFragment` conditions carry a raw query fragment in their property
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    PrefixLike,
    PrefixNotLike,
    SuffixLike,
    SuffixNotLike,
    Like,
    NotLike,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Custom,
    CustomFragment,
}

impl SearchOperator {
    /// Every registered operator, in declaration order.
    pub const ALL: &'static [SearchOperator] = &[
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::PrefixLike,
        Self::PrefixNotLike,
        Self::SuffixLike,
        Self::SuffixNotLike,
        Self::Like,
        Self::NotLike,
        Self::IsNull,
        Self::IsNotNull,
        Self::In,
        Self::NotIn,
        Self::Custom,
        Self::CustomFragment,
    ];

    /// Wire name, as it appears in filter keys (`name_like`, `id_in`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::PrefixLike => "prefixLike",
            Self::PrefixNotLike => "prefixNotLike",
            Self::SuffixLike => "suffixLike",
            Self::SuffixNotLike => "suffixNotLike",
            Self::Like => "like",
            Self::NotLike => "notLike",
            Self::IsNull => "isNull",
            Self::IsNotNull => "isNotNull",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Custom => "custom",
            Self::CustomFragment => "customFragment",
        }
    }

    /// Render symbol used in the compiled query fragment.
    ///
    /// Empty for the pseudo-operators.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::PrefixLike | Self::SuffixLike | Self::Like => "like",
            Self::PrefixNotLike | Self::SuffixNotLike | Self::NotLike => "not like",
            Self::IsNull => "is null",
            Self::IsNotNull => "is not null",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Custom | Self::CustomFragment => "",
        }
    }

    /// Display label for user-facing operator pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Eq => "equals",
            Self::Ne => "not equals",
            Self::Gt => "greater than",
            Self::Gte => "greater than or equals",
            Self::Lt => "less than",
            Self::Lte => "less than or equals",
            Self::PrefixLike => "prefix like",
            Self::PrefixNotLike => "prefix not like",
            Self::SuffixLike => "suffix like",
            Self::SuffixNotLike => "suffix not like",
            Self::Like => "like",
            Self::NotLike => "not like",
            Self::IsNull => "is null",
            Self::IsNotNull => "is not null",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Custom => "custom",
            Self::CustomFragment => "custom query fragment",
        }
    }

    /// True only for operators that are meaningful with no value at all.
    pub fn allows_blank_value(self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Unary operators render no bound parameter.
    pub fn is_unary(self) -> bool {
        self.symbol().starts_with("is")
    }

    /// Wire-name lookup used by the key parser.
    pub fn by_name(token: &str) -> Option<SearchOperator> {
        Self::ALL.iter().copied().find(|op| op.name() == token)
    }

    /// Symbol lookup, normalizing the input first (trim, lowercase, collapse
    /// runs of double spaces). Pseudo-operators are not reachable this way.
    pub fn by_symbol(symbol: &str) -> Result<SearchOperator, SearchError> {
        let normalized = normalize_symbol(symbol);
        Self::ALL
            .iter()
            .copied()
            .filter(|op| !op.symbol().is_empty())
            .find(|op| op.symbol() == normalized)
            .ok_or_else(|| SearchError::UnknownOperator {
                symbol: symbol.to_string(),
            })
    }

    /// All wire names joined for error messages.
    pub fn describe_all() -> String {
        Self::ALL
            .iter()
            .map(|op| op.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SearchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize_symbol(symbol: &str) -> String {
    let mut normalized = symbol.trim().to_lowercase();
    while normalized.contains("  ") {
        normalized = normalized.replace("  ", " ");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_resolves_wire_names() {
        assert_eq!(SearchOperator::by_name("eq"), Some(SearchOperator::Eq));
        assert_eq!(
            SearchOperator::by_name("prefixLike"),
            Some(SearchOperator::PrefixLike)
        );
        assert_eq!(
            SearchOperator::by_name("isNotNull"),
            Some(SearchOperator::IsNotNull)
        );
        assert_eq!(SearchOperator::by_name("bogus"), None);
    }

    #[test]
    fn by_symbol_normalizes_input() {
        assert_eq!(
            SearchOperator::by_symbol("  >=  ").unwrap(),
            SearchOperator::Gte
        );
        assert_eq!(
            SearchOperator::by_symbol("IS   NOT   NULL").unwrap(),
            SearchOperator::IsNotNull
        );
    }

    #[test]
    fn by_symbol_unknown_lists_operators() {
        let err = SearchOperator::by_symbol("~").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("\"~\""));
        assert!(message.contains("notIn"));
    }

    #[test]
    fn pseudo_operators_have_no_symbol() {
        assert_eq!(SearchOperator::Custom.symbol(), "");
        assert_eq!(SearchOperator::CustomFragment.symbol(), "");
        assert!(SearchOperator::by_symbol("").is_err());
    }

    #[test]
    fn blank_allowed_only_for_null_checks() {
        for op in SearchOperator::ALL {
            let expected = matches!(op, SearchOperator::IsNull | SearchOperator::IsNotNull);
            assert_eq!(op.allows_blank_value(), expected, "operator {op}");
        }
    }

    #[test]
    fn unary_matches_null_checks() {
        assert!(SearchOperator::IsNull.is_unary());
        assert!(SearchOperator::IsNotNull.is_unary());
        assert!(!SearchOperator::In.is_unary());
        assert!(!SearchOperator::Custom.is_unary());
    }
}
