//! Filter tree model
//!
//! A polymorphic predicate tree: leaf conditions (property, operator, value)
//! and and/or groups with ordered children. Rendering wraps groups in
//! parentheses and joins children with `and`/`or`.

pub mod parser;

use serde::{Deserialize, Serialize};

use crate::operator::SearchOperator;
use crate::value::SearchValue;

/// Separator between property and operator in wire keys (`name_like`).
pub const SEPARATOR: &str = "_";

/// A single leaf predicate.
///
/// Identity is the `key` (`property` + `_` + operator wire name): two
/// conditions are equal iff their keys are equal, which is what lets the
/// aggregate replace a re-added condition in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    property: String,
    operator: SearchOperator,
    value: SearchValue,
    key: String,
}

impl Condition {
    /// Build a condition from property, operator, and value.
    pub fn new(
        property: impl Into<String>,
        operator: SearchOperator,
        value: impl Into<SearchValue>,
    ) -> Condition {
        let property = property.into();
        let key = format!("{property}{SEPARATOR}{operator}");
        Condition {
            property,
            operator,
            value: value.into(),
            key,
        }
    }

    /// Build a condition whose property slot stores a raw query fragment,
    /// bound to one optional parameter.
    ///
    /// The fragment is emitted verbatim by the compiler; pass
    /// [`SearchValue::Null`] for a fragment with no parameter.
    pub fn custom_fragment(
        fragment: impl Into<String>,
        value: impl Into<SearchValue>,
    ) -> Condition {
        Condition::new(fragment, SearchOperator::CustomFragment, value)
    }

    /// Identity key, `property` + `_` + operator wire name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Dotted path into the target entity (or the raw fragment text for
    /// custom-fragment conditions).
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn operator(&self) -> SearchOperator {
        self.operator
    }

    pub fn value(&self) -> &SearchValue {
        &self.value
    }

    /// Rewrite the value in place; used by the conversion engine.
    pub fn set_value(&mut self, value: SearchValue) {
        self.value = value;
    }

    /// Unary conditions (`is null`, `is not null`) never carry a parameter.
    pub fn is_unary(&self) -> bool {
        self.operator.is_unary()
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Condition) -> bool {
        self.key == other.key
    }
}

impl Eq for Condition {}

/// A node of the filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchFilter {
    /// Leaf predicate
    Condition(Condition),
    /// Conjunction of ordered children
    And(Vec<SearchFilter>),
    /// Disjunction of ordered children
    Or(Vec<SearchFilter>),
}

impl SearchFilter {
    /// Group filters under a conjunction. Nested groups are kept as-is, not
    /// flattened.
    pub fn and_group(
        first: impl Into<SearchFilter>,
        others: impl IntoIterator<Item = SearchFilter>,
    ) -> SearchFilter {
        let mut children = vec![first.into()];
        children.extend(others);
        SearchFilter::And(children)
    }

    /// Group filters under a disjunction.
    pub fn or_group(
        first: impl Into<SearchFilter>,
        others: impl IntoIterator<Item = SearchFilter>,
    ) -> SearchFilter {
        let mut children = vec![first.into()];
        children.extend(others);
        SearchFilter::Or(children)
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            SearchFilter::Condition(condition) => Some(condition),
            _ => None,
        }
    }

    /// Whether this node or any nested leaf matches the key (by condition key
    /// or bare property). Terminates on leaves.
    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            SearchFilter::Condition(condition) => {
                condition.key() == key || condition.property() == key
            }
            SearchFilter::And(children) | SearchFilter::Or(children) => {
                children.iter().any(|child| child.contains_key(key))
            }
        }
    }
}

impl From<Condition> for SearchFilter {
    fn from(condition: Condition) -> Self {
        SearchFilter::Condition(condition)
    }
}
