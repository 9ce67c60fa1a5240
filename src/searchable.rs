//! Searchable aggregate
//!
//! Per-request aggregate owning the ordered filter tree plus pagination and
//! ordering state. A `Searchable` is built once from a parameter map, mutated
//! synchronously while filters and paging are assembled, converted exactly
//! once against an entity schema, compiled, and then discarded. It is not
//! designed for concurrent mutation.

use std::collections::HashMap;

use crate::error::SearchError;
use crate::filter::parser::parse_condition;
use crate::filter::{Condition, SEPARATOR, SearchFilter};
use crate::operator::SearchOperator;
use crate::page::{Direction, Page, Sort};
use crate::schema::EntitySchema;
use crate::schema::convert::convert_search_values;
use crate::value::SearchValue;

/// The per-request search aggregate.
///
/// Top-level leaves are indexed by key so that re-adding a condition with an
/// existing key replaces it **in place at its original position** rather than
/// appending. Group members are opaque to the index: they can only be removed
/// by removing the owning group.
#[derive(Debug, Clone, Default)]
pub struct Searchable {
    /// Ordered top-level nodes; insertion order decides compile order.
    filters: Vec<SearchFilter>,
    /// Key -> position in `filters`, top-level leaves only.
    index: HashMap<String, usize>,
    page: Option<Page>,
    sort: Option<Sort>,
    converted: bool,
}

impl Searchable {
    pub fn new() -> Searchable {
        Searchable::default()
    }

    /// Build from an ordered sequence of raw `(key, value)` parameters.
    pub fn from_params<K, V>(
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Searchable, SearchError>
    where
        K: AsRef<str>,
        V: Into<SearchValue>,
    {
        let mut search = Searchable::new();
        search.add_search_params(params)?;
        Ok(search)
    }

    /// Build from a JSON object map, in key order.
    pub fn from_json(
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Searchable, SearchError> {
        let mut search = Searchable::new();
        for (key, value) in params {
            search.add_search_param(key, SearchValue::from_json(value))?;
        }
        Ok(search)
    }

    /// Parse and add one raw parameter. Blank values on operators that do not
    /// tolerate them are dropped silently.
    pub fn add_search_param(
        &mut self,
        key: &str,
        value: impl Into<SearchValue>,
    ) -> Result<&mut Searchable, SearchError> {
        if let Some(condition) = parse_condition(key, value)? {
            self.add_filter(condition.into());
        }
        Ok(self)
    }

    /// Parse and add a batch of raw parameters.
    pub fn add_search_params<K, V>(
        &mut self,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<&mut Searchable, SearchError>
    where
        K: AsRef<str>,
        V: Into<SearchValue>,
    {
        for (key, value) in params {
            self.add_search_param(key.as_ref(), value)?;
        }
        Ok(self)
    }

    /// Add a condition built from its parts, bypassing the key grammar.
    pub fn add_condition(
        &mut self,
        property: impl Into<String>,
        operator: SearchOperator,
        value: impl Into<SearchValue>,
    ) -> &mut Searchable {
        self.add_filter(Condition::new(property, operator, value).into())
    }

    /// Add a filter node. Leaves upsert into the key index and replace in
    /// place on key collision; groups always append.
    pub fn add_filter(&mut self, filter: SearchFilter) -> &mut Searchable {
        match filter {
            SearchFilter::Condition(condition) => {
                if let Some(&position) = self.index.get(condition.key()) {
                    self.filters[position] = SearchFilter::Condition(condition);
                } else {
                    self.index
                        .insert(condition.key().to_string(), self.filters.len());
                    self.filters.push(SearchFilter::Condition(condition));
                }
            }
            group => self.filters.push(group),
        }
        self
    }

    /// Add several filter nodes in order.
    pub fn add_filters(
        &mut self,
        filters: impl IntoIterator<Item = SearchFilter>,
    ) -> &mut Searchable {
        for filter in filters {
            self.add_filter(filter);
        }
        self
    }

    /// Append a disjunction group.
    pub fn or(
        &mut self,
        first: impl Into<SearchFilter>,
        others: impl IntoIterator<Item = SearchFilter>,
    ) -> &mut Searchable {
        self.add_filter(SearchFilter::or_group(first, others))
    }

    /// Append a conjunction group.
    pub fn and(
        &mut self,
        first: impl Into<SearchFilter>,
        others: impl IntoIterator<Item = SearchFilter>,
    ) -> &mut Searchable {
        self.add_filter(SearchFilter::and_group(first, others))
    }

    /// Remove a top-level leaf by key. When the raw key misses, retries with
    /// the `custom` operator suffix so that conditions added with a bare
    /// property key stay removable by that bare key.
    pub fn remove(&mut self, key: &str) -> &mut Searchable {
        let position = self
            .index
            .remove(key)
            .or_else(|| self.index.remove(&custom_key(key)));
        if let Some(position) = position {
            self.filters.remove(position);
            for indexed in self.index.values_mut() {
                if *indexed > position {
                    *indexed -= 1;
                }
            }
        }
        self
    }

    /// Remove a top-level leaf by property and operator.
    pub fn remove_filter(
        &mut self,
        property: &str,
        operator: SearchOperator,
    ) -> &mut Searchable {
        self.remove(&format!("{property}{SEPARATOR}{operator}"))
    }

    /// Set the page, merging with any previously supplied sort.
    pub fn set_page(&mut self, number: u32, size: u32) -> &mut Searchable {
        self.merge(None, Some(Page::new(number, size)));
        self
    }

    /// Add ordering. A newly supplied sort takes priority: it is concatenated
    /// before the existing one, and the merged sort is embedded into the page.
    pub fn add_sort(&mut self, sort: Sort) -> &mut Searchable {
        self.merge(Some(sort), None);
        self
    }

    /// Add a single ordering entry.
    pub fn add_sort_by(
        &mut self,
        direction: Direction,
        property: impl Into<String>,
    ) -> &mut Searchable {
        self.add_sort(Sort::by(direction, property))
    }

    /// Drop the sort, also from the embedded page copy.
    pub fn remove_sort(&mut self) {
        self.sort = None;
        if let Some(page) = &self.page {
            self.page = Some(Page::new(page.number(), page.size()));
        }
    }

    /// Drop pagination; ordering is kept.
    pub fn remove_page(&mut self) {
        self.page = None;
    }

    /// Whether any top-level or nested leaf matches the key (raw or with the
    /// `custom` suffix, by condition key or bare property).
    pub fn contains_key(&self, key: &str) -> bool {
        if self.index.contains_key(key) || self.index.contains_key(&custom_key(key)) {
            return true;
        }
        self.filters.iter().any(|filter| filter.contains_key(key))
    }

    /// Raw value of a **top-level** leaf. Values inside groups are
    /// intentionally unreachable through this accessor.
    pub fn value(&self, key: &str) -> Option<&SearchValue> {
        let position = self
            .index
            .get(key)
            .or_else(|| self.index.get(&custom_key(key)))?;
        self.filters[*position].as_condition().map(Condition::value)
    }

    pub fn filters(&self) -> &[SearchFilter] {
        &self.filters
    }

    pub(crate) fn filters_mut(&mut self) -> &mut [SearchFilter] {
        &mut self.filters
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn has_sort(&self) -> bool {
        self.sort.as_ref().is_some_and(|sort| !sort.is_empty())
    }

    pub fn has_page(&self) -> bool {
        self.page.as_ref().is_some_and(|page| page.size() > 0)
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn is_converted(&self) -> bool {
        self.converted
    }

    /// Mark the aggregate converted so further conversion passes are no-ops.
    pub fn mark_converted(&mut self) -> &mut Searchable {
        self.converted = true;
        self
    }

    /// Coerce every leaf value to the schema's declared field types. No-op
    /// once converted.
    pub fn convert(&mut self, schema: &EntitySchema) -> Result<&mut Searchable, SearchError> {
        convert_search_values(self, schema)?;
        Ok(self)
    }

    /// Merge newly supplied sort/page with existing state. The new sort is
    /// prepended to the sort already embedded in the page, and the merged
    /// sort travels inside the page from then on.
    fn merge(&mut self, sort: Option<Sort>, page: Option<Page>) {
        let sort = sort.or_else(|| self.sort.clone());
        let page = page.or_else(|| self.page.clone());

        let merged = match (sort, page.as_ref().and_then(|p| p.sort().cloned())) {
            (None, page_sort) => page_sort,
            (Some(sort), None) => Some(sort),
            (Some(sort), Some(page_sort)) => Some(sort.and(page_sort)),
        };

        self.sort = merged.clone();
        self.page = page.map(|p| Page::with_sort(p.number(), p.size(), merged));
    }
}

fn custom_key(key: &str) -> String {
    format!("{key}{SEPARATOR}{}", SearchOperator::Custom)
}
