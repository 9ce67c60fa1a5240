//! Search value model
//!
//! Raw client values arrive as strings, string arrays, or collections. The
//! conversion engine later rewrites them in place into the entity schema's
//! native types, so one sum type covers both the raw and the typed form.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A filter value, untyped at parse time and schema-typed after conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<SearchValue>),
}

impl SearchValue {
    /// A value is blank if it is null, a blank string, or an empty list.
    ///
    /// Blank values are silently dropped at parse time unless the operator
    /// tolerates them.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Map a JSON value onto the search value model.
    ///
    /// JSON objects are not valid filter values and map to `Null`, which the
    /// parser then drops as blank.
    pub fn from_json(value: &serde_json::Value) -> SearchValue {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    Self::Null
                }
            }
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Array(items) => {
                Self::List(items.iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(_) => Self::Null,
        }
    }

    /// Render the value as plain text, without quoting.
    ///
    /// Used by the compiler when wrapping like-family values in wildcards.
    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::List(items) => items
                .iter()
                .map(Self::as_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for SearchValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SearchValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SearchValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for SearchValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for SearchValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SearchValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for SearchValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for SearchValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Vec<SearchValue>> for SearchValue {
    fn from(value: Vec<SearchValue>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<String>> for SearchValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value.into_iter().map(Self::Text).collect())
    }
}

impl From<Vec<i64>> for SearchValue {
    fn from(value: Vec<i64>) -> Self {
        Self::List(value.into_iter().map(Self::Int).collect())
    }
}

impl From<Vec<&str>> for SearchValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(Self::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values() {
        assert!(SearchValue::Null.is_blank());
        assert!(SearchValue::from("").is_blank());
        assert!(SearchValue::from("   ").is_blank());
        assert!(SearchValue::List(vec![]).is_blank());
        assert!(!SearchValue::from("x").is_blank());
        assert!(!SearchValue::Int(0).is_blank());
        assert!(!SearchValue::Bool(false).is_blank());
    }

    #[test]
    fn from_json_maps_scalars_and_arrays() {
        let json = serde_json::json!(["1", 2, 3.5, true, null]);
        assert_eq!(
            SearchValue::from_json(&json),
            SearchValue::List(vec![
                SearchValue::Text("1".to_string()),
                SearchValue::Int(2),
                SearchValue::Float(3.5),
                SearchValue::Bool(true),
                SearchValue::Null,
            ])
        );
    }

    #[test]
    fn from_json_drops_objects_as_null() {
        let json = serde_json::json!({"nested": 1});
        assert_eq!(SearchValue::from_json(&json), SearchValue::Null);
    }

    #[test]
    fn as_text_renders_scalars() {
        assert_eq!(SearchValue::from("foo").as_text(), "foo");
        assert_eq!(SearchValue::Int(18).as_text(), "18");
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(SearchValue::Date(date).as_text(), "2024-01-15");
    }
}
