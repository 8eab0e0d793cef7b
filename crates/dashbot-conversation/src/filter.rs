//! Filter clauses appended to report links.
//!
//! Values are written between single quotes as-is. Embedded quotes are not
//! escaped and nothing is percent-encoded, which holds only while values come
//! from the closed catalog. A user-extensible catalog would need escaping here.

use std::fmt;

/// A `<table>/<dimension>` filter over one or more values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpression {
    /// `<table>/<dimension> eq '<value>'`
    Eq {
        table: String,
        dimension: String,
        value: String,
    },
    /// `<table>/<dimension> in ('<v1>','<v2>',...)`
    In {
        table: String,
        dimension: String,
        values: Vec<String>,
    },
}

impl FilterExpression {
    /// Build the expression for `values`, or `None` when there is nothing to filter by
    pub fn new<S: AsRef<str>>(table: &str, dimension: &str, values: &[S]) -> Option<Self> {
        match values {
            [] => None,
            [value] => Some(Self::Eq {
                table: table.to_string(),
                dimension: dimension.to_string(),
                value: value.as_ref().to_string(),
            }),
            _ => Some(Self::In {
                table: table.to_string(),
                dimension: dimension.to_string(),
                values: values.iter().map(|v| v.as_ref().to_string()).collect(),
            }),
        }
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq {
                table,
                dimension,
                value,
            } => write!(f, "{table}/{dimension} eq '{value}'"),
            Self::In {
                table,
                dimension,
                values,
            } => {
                let list = values
                    .iter()
                    .map(|v| format!("'{v}'"))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{table}/{dimension} in ({list})")
            }
        }
    }
}

/// Append a `&filter=` clause for `values` to `base_link`.
///
/// An empty value list returns the link unchanged.
pub fn append_filter<S: AsRef<str>>(
    base_link: &str,
    table_id: &str,
    dimension: &str,
    values: &[S],
) -> String {
    match FilterExpression::new(table_id, dimension, values) {
        Some(expression) => format!("{base_link}&filter={expression}"),
        None => base_link.to_string(),
    }
}
