//! Pagination and ordering
//!
//! A zero-based page plus an ordered sort list. After the aggregate merges
//! them, the sort is embedded into the page so pagination and ordering travel
//! together into the compiled query.

use serde::{Deserialize, Serialize};

/// Sort direction, rendered lowercase in the ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// One ordering entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

/// An ordered list of `(property, direction)` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    orders: Vec<SortOrder>,
}

impl Sort {
    pub fn by(direction: Direction, property: impl Into<String>) -> Sort {
        Sort {
            orders: vec![SortOrder {
                property: property.into(),
                direction,
            }],
        }
    }

    pub fn asc(property: impl Into<String>) -> Sort {
        Sort::by(Direction::Asc, property)
    }

    pub fn desc(property: impl Into<String>) -> Sort {
        Sort::by(Direction::Desc, property)
    }

    /// Concatenate, keeping `self`'s entries first.
    pub fn and(mut self, other: Sort) -> Sort {
        self.orders.extend(other.orders);
        self
    }

    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// A zero-based page with an optional embedded sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    number: u32,
    size: u32,
    sort: Option<Sort>,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Page {
        Page {
            number,
            size,
            sort: None,
        }
    }

    pub fn with_sort(number: u32, size: u32, sort: Option<Sort>) -> Page {
        Page { number, size, sort }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// First row to return, `number * size`.
    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }

    /// Maximum rows to return.
    pub fn limit(&self) -> u32 {
        self.size
    }
}
