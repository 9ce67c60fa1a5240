//! Query compiler
//!
//! Recursively walks the filter tree and emits a query-language fragment with
//! positional `:param_N` placeholders, the ordered bound values aligned 1:1
//! with them, and trailing ordering/pagination metadata. The caller attaches
//! the fragment to a base query whose where-clause already ends in a
//! tautology (`where 1=1`), so every top-level condition is prefixed with
//! ` and `.

use crate::filter::SearchFilter;
use crate::operator::SearchOperator;
use crate::searchable::Searchable;
use crate::value::SearchValue;

const PARAM_PREFIX: &str = "param_";

/// Result of compiling a [`Searchable`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Where-clause fragment, starting with ` and ` when any condition
    /// emitted. Empty when nothing did.
    pub clause: String,
    /// Bound values, ordered to match the `:param_N` placeholders.
    pub params: Vec<SearchValue>,
    /// `order by ...` fragment, present when the search carries ordering.
    pub order_clause: Option<String>,
    /// `(offset, limit)`, present when the search carries pagination.
    pub page: Option<(u64, u32)>,
}

/// Compiles filter trees into query fragments.
///
/// An optional entity alias is prepended to property paths and ordering
/// properties (`o` renders `o.name like :param_1`).
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    alias_with_dot: String,
}

impl QueryCompiler {
    pub fn new() -> QueryCompiler {
        QueryCompiler::default()
    }

    pub fn with_alias(alias: impl Into<String>) -> QueryCompiler {
        let alias = alias.into();
        let alias_with_dot = if alias.is_empty() {
            String::new()
        } else {
            format!("{alias}.")
        };
        QueryCompiler { alias_with_dot }
    }

    /// Compile the search into a fragment plus ordered bindings.
    ///
    /// One parameter counter is threaded through the entire traversal, so
    /// sibling and nested conditions receive strictly increasing, gap-free
    /// placeholder numbers in tree order.
    pub fn compile(&self, search: &Searchable) -> CompiledQuery {
        let mut clause = String::new();
        let mut params = Vec::new();
        let mut param_index = 1usize;

        for filter in search.filters() {
            let rendered = self.render(filter, &mut param_index, &mut params);
            if rendered.is_empty() {
                continue;
            }
            clause.push_str(" and ");
            clause.push_str(&rendered);
        }

        CompiledQuery {
            clause,
            params,
            order_clause: self.order_clause(search),
            page: search
                .page()
                .filter(|page| page.size() > 0)
                .map(|page| (page.offset(), page.limit())),
        }
    }

    fn render(
        &self,
        filter: &SearchFilter,
        param_index: &mut usize,
        params: &mut Vec<SearchValue>,
    ) -> String {
        match filter {
            SearchFilter::Condition(condition) => {
                self.render_condition(condition, param_index, params)
            }
            SearchFilter::And(children) => {
                self.render_group(children, " and ", param_index, params)
            }
            SearchFilter::Or(children) => self.render_group(children, " or ", param_index, params),
        }
    }

    fn render_group(
        &self,
        children: &[SearchFilter],
        joiner: &str,
        param_index: &mut usize,
        params: &mut Vec<SearchValue>,
    ) -> String {
        let parts: Vec<String> = children
            .iter()
            .map(|child| self.render(child, param_index, params))
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            return String::new();
        }
        format!("({})", parts.join(joiner))
    }

    fn render_condition(
        &self,
        condition: &crate::filter::Condition,
        param_index: &mut usize,
        params: &mut Vec<SearchValue>,
    ) -> String {
        match condition.operator() {
            // emitted by the caller out-of-band
            SearchOperator::Custom => String::new(),
            SearchOperator::CustomFragment => {
                let mut text = condition.property().to_string();
                if condition.value() != &SearchValue::Null {
                    text.push_str(&format!(" :{PARAM_PREFIX}{param_index}"));
                    params.push(condition.value().clone());
                    *param_index += 1;
                }
                text
            }
            operator => {
                let mut text = format!(
                    "{}{} {}",
                    self.alias_with_dot,
                    condition.property(),
                    operator.symbol()
                );
                if !condition.is_unary() {
                    text.push_str(&format!(" :{PARAM_PREFIX}{param_index}"));
                    params.push(format_value(operator, condition.value()));
                    *param_index += 1;
                }
                text
            }
        }
    }

    fn order_clause(&self, search: &Searchable) -> Option<String> {
        let sort = search.sort().filter(|sort| !sort.is_empty())?;
        let rendered: Vec<String> = sort
            .orders()
            .iter()
            .map(|order| {
                format!(
                    "{}{} {}",
                    self.alias_with_dot,
                    order.property,
                    order.direction.as_str()
                )
            })
            .collect();
        Some(format!("order by {}", rendered.join(", ")))
    }
}

/// Wrap like-family values in wildcards; everything else passes unchanged.
fn format_value(operator: SearchOperator, value: &SearchValue) -> SearchValue {
    match operator {
        SearchOperator::Like | SearchOperator::NotLike => {
            SearchValue::Text(format!("%{}%", value.as_text()))
        }
        SearchOperator::PrefixLike | SearchOperator::PrefixNotLike => {
            SearchValue::Text(format!("{}%", value.as_text()))
        }
        SearchOperator::SuffixLike | SearchOperator::SuffixNotLike => {
            SearchValue::Text(format!("%{}", value.as_text()))
        }
        _ => value.clone(),
    }
}
