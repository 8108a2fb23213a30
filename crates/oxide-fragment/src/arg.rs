//! Formatting arguments.
//!
//! Each `?` in a template is paired with one [`Arg`]. The variant decides how
//! the placeholder expands; conversions from common Rust types pick the
//! variant, and the capability constructors ([`Arg::raw`], [`Arg::driver`],
//! [`Arg::json`]) select the others explicitly.

use std::fmt;

use serde::Serialize;

use crate::expr::Expression;
use crate::query::Query;
use crate::value::{SqlValue, ToSqlValue};

/// Supplies SQL text to be spliced into a statement as is.
///
/// The text is neither escaped nor parameterized. Only use this for trusted
/// SQL such as identifiers chosen by the application.
pub trait RawLiteral {
    /// Returns the text to splice.
    fn raw_value(&self) -> String;
}

/// Supplies its own driver-level value.
pub trait DriverValue: fmt::Debug + Send + Sync {
    /// Returns the value to bind.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] if the value cannot be produced.
    fn value(&self) -> Result<SqlValue, ValueError>;
}

/// A driver value failed to produce its value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValueError(pub String);

impl ValueError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Raw SQL text, the stock [`RawLiteral`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedded(pub String);

impl Embedded {
    /// Wraps trusted SQL text.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }
}

impl RawLiteral for Embedded {
    fn raw_value(&self) -> String {
        self.0.clone()
    }
}

/// A JSON-encoded argument.
///
/// Encoding happens when the argument is built; a failure is kept and
/// reported by the fragment that consumes the argument.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonArg {
    encoded: Result<String, String>,
}

impl JsonArg {
    /// Encodes any serializable value.
    #[must_use]
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Self {
        Self {
            encoded: serde_json::to_string(value).map_err(|e| e.to_string()),
        }
    }

    /// Returns the encoded text, or the encoding failure.
    ///
    /// # Errors
    ///
    /// Returns the serializer's message if encoding failed.
    pub fn encoded(&self) -> Result<&str, &str> {
        self.encoded.as_deref().map_err(String::as_str)
    }
}

/// A JSON object argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonMap(pub serde_json::Map<String, serde_json::Value>);

/// A JSON array argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonList(pub Vec<serde_json::Value>);

/// One argument of a formatted fragment.
#[derive(Debug)]
pub enum Arg {
    /// A scalar: one placeholder.
    Value(SqlValue),
    /// A sequence: one placeholder per element, comma-joined.
    List(Vec<SqlValue>),
    /// A nested query: its text inlined, its parameters spliced in.
    Query(Query),
    /// A JSON value: one placeholder bound to the encoded text.
    Json(JsonArg),
    /// Raw SQL text: spliced, no placeholder.
    Raw(String),
    /// A value supplied by the caller's type: one placeholder.
    Driver(Box<dyn DriverValue>),
}

impl Arg {
    /// Creates a raw-literal argument.
    #[must_use]
    pub fn raw(literal: &impl RawLiteral) -> Self {
        Self::Raw(literal.raw_value())
    }

    /// Creates a driver-value argument.
    #[must_use]
    pub fn driver(value: impl DriverValue + 'static) -> Self {
        Self::Driver(Box::new(value))
    }

    /// Creates a JSON argument from any serializable value.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::Json(JsonArg::new(value))
    }

    /// Creates a sequence argument.
    #[must_use]
    pub fn list<T: ToSqlValue>(values: impl IntoIterator<Item = T>) -> Self {
        Self::List(values.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

macro_rules! scalar_into_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Value(value.to_sql_value())
                }
            }
        )*
    };
}

scalar_into_arg!(
    SqlValue, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    &str, &String
);

impl<T: ToSqlValue> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        Self::Value(value.to_sql_value())
    }
}

impl<T: ToSqlValue> From<Vec<T>> for Arg {
    fn from(values: Vec<T>) -> Self {
        Self::list(values)
    }
}

impl<T: ToSqlValue + Clone> From<&[T]> for Arg {
    fn from(values: &[T]) -> Self {
        Self::list(values.iter().cloned())
    }
}

impl<T: ToSqlValue, const N: usize> From<[T; N]> for Arg {
    fn from(values: [T; N]) -> Self {
        Self::list(values)
    }
}

impl From<Query> for Arg {
    fn from(query: Query) -> Self {
        Self::Query(query)
    }
}

impl From<&Query> for Arg {
    fn from(query: &Query) -> Self {
        Self::Query(query.clone())
    }
}

impl From<Expression> for Arg {
    fn from(expr: Expression) -> Self {
        Self::Query(Query::from(expr))
    }
}

impl From<JsonArg> for Arg {
    fn from(json: JsonArg) -> Self {
        Self::Json(json)
    }
}

impl From<JsonMap> for Arg {
    fn from(map: JsonMap) -> Self {
        Self::json(&map.0)
    }
}

impl From<JsonList> for Arg {
    fn from(list: JsonList) -> Self {
        Self::json(&list.0)
    }
}

impl From<Embedded> for Arg {
    fn from(embedded: Embedded) -> Self {
        Self::Raw(embedded.0)
    }
}

impl From<Box<dyn DriverValue>> for Arg {
    fn from(value: Box<dyn DriverValue>) -> Self {
        Self::Driver(value)
    }
}
