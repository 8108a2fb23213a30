//! # oxide-fragment
//!
//! Assemble SQL statements from fragments with positional placeholders and
//! render them for a specific dialect.
//!
//! This crate provides:
//! - [`Expression`], a piece of SQL text with its ordered parameters, and the
//!   [`and`], [`or`] and [`group`] combinators
//! - A formatted-fragment builder ([`valf!`], [`Expression::format`]) that
//!   expands `?` according to the argument: scalars, sequences, nested
//!   queries, JSON values, raw literals and driver values
//! - [`Query`], an ordered list of fragments forming one statement
//! - [`Dialect`] rendering to `?`, `$n` or inlined literals
//!
//! ## Templates
//!
//! `?` is a placeholder consuming one argument, `??` is a literal question
//! mark (written back as `?` by dialects that number their placeholders):
//!
//! ```rust
//! use oxide_fragment::{SqlValue, query};
//!
//! let q = query!("SELECT * FROM docs WHERE tags ?? ? AND id IN (?)", "draft", vec![1, 2]);
//!
//! let rendered = q.to_pgsql().unwrap();
//! assert_eq!(rendered.sql, "SELECT * FROM docs WHERE tags ? $1 AND id IN ($2, $3)");
//! assert_eq!(
//!     rendered.params,
//!     vec![SqlValue::Text(String::from("draft")), SqlValue::Int(1), SqlValue::Int(2)]
//! );
//! ```
//!
//! ## Errors
//!
//! Expansion problems (a `?` without argument, an argument without `?`, a
//! failed JSON encoding...) do not panic. They are recorded on the fragment
//! and returned, all together, when the statement is rendered:
//!
//! ```rust
//! use oxide_fragment::query;
//!
//! let err = query!("SELECT ? = ?", 1).to_sql().unwrap_err();
//! assert_eq!(err.to_string(), "extra ? in text: SELECT ? = ? (1 args)");
//! ```

pub mod arg;
pub mod dialect;
pub mod error;
pub mod expr;
mod format;
pub mod placeholder;
pub mod query;
pub mod scan;
pub mod value;

pub use arg::{Arg, DriverValue, Embedded, JsonArg, JsonList, JsonMap, RawLiteral, ValueError};
pub use dialect::{Dialect, RenderError, Rendered};
pub use error::{Error, ErrorList, Result};
pub use expr::{Expression, QueryPart, and, group, or};
pub use query::Query;
pub use value::{SqlValue, ToSqlValue};

/// Builds an [`Expression`] from a template and its arguments.
///
/// Each argument is converted with [`Arg::from`].
///
/// ```rust
/// use oxide_fragment::valf;
///
/// let expr = valf!("id IN (?)", vec![1, 2, 3]);
/// assert_eq!(expr.values().len(), 3);
/// ```
#[macro_export]
macro_rules! valf {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::Expression::format($template, vec![$($crate::Arg::from($arg)),*])
    };
}

/// Builds a [`Query`] from a template and its arguments.
#[macro_export]
macro_rules! query {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::Query::new($template, vec![$($crate::Arg::from($arg)),*])
    };
}

/// Builds the argument list for [`Query::space`] and friends.
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::Arg::from($arg)),*]
    };
}

/// Joins fragments and plain strings with `AND`.
#[macro_export]
macro_rules! and {
    ($($part:expr),+ $(,)?) => {
        $crate::and([$($crate::Expression::from($part)),+])
    };
}

/// Joins fragments and plain strings with `OR`.
#[macro_export]
macro_rules! or {
    ($($part:expr),+ $(,)?) => {
        $crate::or([$($crate::Expression::from($part)),+])
    };
}
