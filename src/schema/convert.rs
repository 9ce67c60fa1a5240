//! Value conversion engine
//!
//! One-time coercion of raw string-typed filter values into the entity
//! schema's native field types, following dotted nested-property paths.
//! The aggregate's `converted` flag makes a second pass a no-op, so
//! already-typed values are never re-coerced.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::SearchError;
use crate::filter::{Condition, SearchFilter};
use crate::operator::SearchOperator;
use crate::schema::{EntitySchema, FieldType};
use crate::searchable::Searchable;
use crate::value::SearchValue;

/// Coerce every leaf value in the aggregate to its declared field type.
///
/// Skips leaves with `custom`/`customFragment` operators and unary leaves.
/// Collections convert elementwise and rebuild the same container kind.
pub fn convert_search_values(
    search: &mut Searchable,
    schema: &EntitySchema,
) -> Result<(), SearchError> {
    if search.is_converted() {
        return Ok(());
    }

    for filter in search.filters_mut() {
        convert_filter(filter, schema)?;
    }

    search.mark_converted();
    debug!("converted search values to entity field types");
    Ok(())
}

fn convert_filter(filter: &mut SearchFilter, schema: &EntitySchema) -> Result<(), SearchError> {
    match filter {
        SearchFilter::Condition(condition) => convert_condition(condition, schema),
        SearchFilter::And(children) | SearchFilter::Or(children) => {
            for child in children {
                convert_filter(child, schema)?;
            }
            Ok(())
        }
    }
}

fn convert_condition(
    condition: &mut Condition,
    schema: &EntitySchema,
) -> Result<(), SearchError> {
    match condition.operator() {
        SearchOperator::Custom | SearchOperator::CustomFragment => return Ok(()),
        operator if operator.is_unary() => return Ok(()),
        _ => {}
    }

    let property = condition.property();
    let field_type =
        schema
            .resolve(property)
            .ok_or_else(|| SearchError::InvalidSearchProperty {
                property: property.to_string(),
            })?;

    let converted = match condition.value() {
        SearchValue::List(items) => {
            let items = items
                .iter()
                .map(|item| coerce(item, field_type, property))
                .collect::<Result<Vec<_>, _>>()?;
            SearchValue::List(items)
        }
        value => coerce(value, field_type, property)?,
    };
    condition.set_value(converted);
    Ok(())
}

fn coerce(
    value: &SearchValue,
    field_type: FieldType,
    property: &str,
) -> Result<SearchValue, SearchError> {
    try_coerce(value, field_type).ok_or_else(|| SearchError::InvalidSearchValue {
        property: property.to_string(),
        value: value.clone(),
    })
}

fn try_coerce(value: &SearchValue, field_type: FieldType) -> Option<SearchValue> {
    match (value, field_type) {
        (SearchValue::Null, _) => Some(SearchValue::Null),

        (SearchValue::Text(_), FieldType::Text) => Some(value.clone()),
        (SearchValue::Text(text), FieldType::Int | FieldType::BigInt) => {
            text.trim().parse::<i64>().ok().map(SearchValue::Int)
        }
        (SearchValue::Text(text), FieldType::Float) => {
            text.trim().parse::<f64>().ok().map(SearchValue::Float)
        }
        (SearchValue::Text(text), FieldType::Bool) => match text.trim() {
            "true" | "1" => Some(SearchValue::Bool(true)),
            "false" | "0" => Some(SearchValue::Bool(false)),
            _ => None,
        },
        (SearchValue::Text(text), FieldType::Date) => {
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .ok()
                .map(SearchValue::Date)
        }
        (SearchValue::Text(text), FieldType::DateTime) => {
            let text = text.trim();
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .or_else(|| {
                    // date-only literals promote to midnight
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .map(SearchValue::DateTime)
        }

        (SearchValue::Int(_), FieldType::Int | FieldType::BigInt) => Some(value.clone()),
        (SearchValue::Int(i), FieldType::Float) => Some(SearchValue::Float(*i as f64)),
        (SearchValue::Float(_), FieldType::Float) => Some(value.clone()),
        (SearchValue::Bool(_), FieldType::Bool) => Some(value.clone()),

        (SearchValue::Date(_), FieldType::Date) => Some(value.clone()),
        (SearchValue::Date(date), FieldType::DateTime) => {
            date.and_hms_opt(0, 0, 0).map(SearchValue::DateTime)
        }
        (SearchValue::DateTime(_), FieldType::DateTime) => Some(value.clone()),
        (SearchValue::DateTime(datetime), FieldType::Date) => {
            Some(SearchValue::Date(datetime.date()))
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> EntitySchema {
        let parent = EntitySchema::builder()
            .field("id", FieldType::BigInt)
            .build();
        EntitySchema::builder()
            .field("name", FieldType::Text)
            .field("age", FieldType::Int)
            .field("score", FieldType::Float)
            .field("active", FieldType::Bool)
            .field("modified", FieldType::DateTime)
            .nested("parent", parent)
            .build()
    }

    #[test]
    fn converts_text_to_declared_types() {
        let mut search = Searchable::new();
        search.add_search_param("age_gte", "18").unwrap();
        search.add_search_param("score_gt", "3.5").unwrap();
        search.add_search_param("active_eq", "true").unwrap();
        search.convert(&schema()).unwrap();

        assert_eq!(search.value("age_gte"), Some(&SearchValue::Int(18)));
        assert_eq!(search.value("score_gt"), Some(&SearchValue::Float(3.5)));
        assert_eq!(search.value("active_eq"), Some(&SearchValue::Bool(true)));
    }

    #[test]
    fn converts_nested_property_path() {
        let mut search = Searchable::new();
        search.add_search_param("parent.id_eq", "42").unwrap();
        search.convert(&schema()).unwrap();
        assert_eq!(search.value("parent.id_eq"), Some(&SearchValue::Int(42)));
    }

    #[test]
    fn converts_collections_elementwise() {
        let mut search = Searchable::new();
        search
            .add_search_param("age_in", SearchValue::from(vec!["1", "2", "3"]))
            .unwrap();
        search.convert(&schema()).unwrap();
        assert_eq!(
            search.value("age_in"),
            Some(&SearchValue::List(vec![
                SearchValue::Int(1),
                SearchValue::Int(2),
                SearchValue::Int(3),
            ]))
        );
    }

    #[test]
    fn converts_leaves_inside_groups() {
        let mut search = Searchable::new();
        let a = crate::filter::parser::parse_condition("age_gte", "18")
            .unwrap()
            .unwrap();
        let b = crate::filter::parser::parse_condition("age_lte", "60")
            .unwrap()
            .unwrap();
        search.or(a, vec![b.into()]);
        search.convert(&schema()).unwrap();

        match &search.filters()[0] {
            SearchFilter::Or(children) => {
                for child in children {
                    let condition = child.as_condition().unwrap();
                    assert!(matches!(condition.value(), SearchValue::Int(_)));
                }
            }
            other => panic!("expected or group, got {other:?}"),
        }
    }

    #[test]
    fn skips_custom_and_unary_leaves() {
        let mut search = Searchable::new();
        search.add_search_param("whatever", "raw").unwrap();
        search.add_search_param("name_isNull", "").unwrap();
        search
            .add_filter(Condition::custom_fragment("length(name) >", "5").into());
        search.convert(&schema()).unwrap();

        // custom property does not exist on the schema, conversion must not
        // have tried to resolve it
        assert_eq!(search.value("whatever"), Some(&SearchValue::from("raw")));
    }

    #[test]
    fn unknown_property_fails() {
        let mut search = Searchable::new();
        search.add_search_param("bogus_eq", "1").unwrap();
        let err = search.convert(&schema()).unwrap_err();
        assert!(matches!(
            err,
            SearchError::InvalidSearchProperty { property } if property == "bogus"
        ));
    }

    #[test]
    fn uncoercible_value_fails() {
        let mut search = Searchable::new();
        search.add_search_param("age_eq", "abc").unwrap();
        let err = search.convert(&schema()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidSearchValue { .. }));
    }

    #[test]
    fn convert_is_idempotent() {
        let mut search = Searchable::new();
        search.add_search_param("age_gte", "18").unwrap();
        search.convert(&schema()).unwrap();
        assert!(search.is_converted());

        // a second pass must not re-coerce; with the schema swapped out from
        // under it, re-coercion would fail loudly
        let hostile = EntitySchema::builder().build();
        search.convert(&hostile).unwrap();
        assert_eq!(search.value("age_gte"), Some(&SearchValue::Int(18)));
    }

    #[test]
    fn date_only_text_promotes_to_midnight() {
        let mut search = Searchable::new();
        search.add_search_param("modified_eq", "2024-01-15").unwrap();
        search.convert(&schema()).unwrap();
        assert_eq!(
            search.value("modified_eq"),
            Some(&SearchValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            ))
        );
    }
}
