//! Fragment model and combinators.

use std::fmt;

use crate::arg::Arg;
use crate::error::{self, Error, Result};
use crate::format;
use crate::placeholder;
use crate::value::SqlValue;

/// A SQL fragment and the parameters it carries.
///
/// The text holds one internal placeholder marker per value, in the same
/// left-to-right order. Problems found while building the fragment are
/// carried along with it and reported when the statement is assembled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    text: String,
    values: Vec<SqlValue>,
    errors: Vec<Error>,
}

/// The result of expanding one formatted fragment.
pub type QueryPart = Expression;

impl Expression {
    pub(crate) const fn from_parts(text: String, values: Vec<SqlValue>, errors: Vec<Error>) -> Self {
        Self {
            text,
            values,
            errors,
        }
    }

    /// Expands a template against its arguments.
    ///
    /// Each `?` consumes one argument; `??` is a literal question mark.
    /// Count mismatches and argument failures are recorded on the returned
    /// fragment, see [`Expression::errors`].
    #[must_use]
    pub fn format(template: &str, args: Vec<Arg>) -> Self {
        format::expand(template, args)
    }

    /// Creates a fragment from plain SQL text without parameters.
    ///
    /// # Panics
    ///
    /// Panics if `text` contains a `?` not escaped as `??`. Parameterized text
    /// must go through [`Expression::format`].
    #[must_use]
    pub fn text(text: &str) -> Self {
        match Self::text_checked(text) {
            Ok(expr) => expr,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a fragment from plain SQL text without parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnescapedPlaceholder`] if `text` contains a `?` not
    /// escaped as `??`.
    pub fn text_checked(text: &str) -> Result<Self> {
        if placeholder::has_unescaped(text) {
            return Err(Error::UnescapedPlaceholder {
                text: String::from(text),
            });
        }
        Ok(Self {
            text: String::from(text),
            values: vec![],
            errors: vec![],
        })
    }

    /// Returns the fragment text, with internal placeholder markers.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.text
    }

    /// Returns the parameters in placeholder order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Returns the problems recorded while building the fragment.
    #[must_use]
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Returns the recorded problems joined into one error, if any.
    ///
    /// # Errors
    ///
    /// Returns the single recorded error, or [`Error::Multiple`].
    pub fn check(&self) -> Result<()> {
        error::join(self.errors.clone())
    }

    /// Returns true if the fragment has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends another fragment with a separator.
    #[must_use]
    pub fn append(mut self, sep: &str, other: Self) -> Self {
        self.text.push_str(sep);
        self.text.push_str(&other.text);
        self.values.extend(other.values);
        self.errors.extend(other.errors);
        self
    }

    /// Wraps the fragment in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self {
            text: format!("({})", self.text),
            ..self
        }
    }

    /// Consumes the fragment and returns its text, values and errors.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>, Vec<Error>) {
        (self.text, self.values, self.errors)
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Self::text(&text)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Joins fragments with `sep`.
///
/// The result is wrapped in parentheses when more than one fragment is
/// given. Values and errors are concatenated in argument order.
#[must_use]
pub fn group<I, E>(sep: &str, exprs: I) -> Expression
where
    I: IntoIterator<Item = E>,
    E: Into<Expression>,
{
    let mut texts = Vec::new();
    let mut values = Vec::new();
    let mut errors = Vec::new();

    for expr in exprs {
        let (text, v, e) = expr.into().into_parts();
        texts.push(text);
        values.extend(v);
        errors.extend(e);
    }

    let text = if texts.len() > 1 {
        format!("({})", texts.join(sep))
    } else {
        texts.join(sep)
    };

    Expression::from_parts(text, values, errors)
}

/// Joins fragments with `AND`.
#[must_use]
pub fn and<I, E>(exprs: I) -> Expression
where
    I: IntoIterator<Item = E>,
    E: Into<Expression>,
{
    group(" AND ", exprs)
}

/// Joins fragments with `OR`.
#[must_use]
pub fn or<I, E>(exprs: I) -> Expression
where
    I: IntoIterator<Item = E>,
    E: Into<Expression>,
{
    group(" OR ", exprs)
}
