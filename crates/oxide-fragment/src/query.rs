//! Statement assembly.
//!
//! A [`Query`] is an ordered list of fragments rendered as one statement.
//! It is also what a nested-query argument expands: its assembled text is
//! inlined into the outer fragment and its parameters spliced in.
//!
//! # Example
//!
//! ```rust
//! use oxide_fragment::{Query, query};
//!
//! let mut where_ = Query::optional("WHERE");
//! where_.space("name = ?", vec!["Alice".into()]);
//!
//! let q = query!("SELECT * FROM users ?", where_);
//! let rendered = q.to_pgsql().unwrap();
//! assert_eq!(rendered.sql, "SELECT * FROM users WHERE name = $1");
//! ```

use std::fmt;

use tracing::debug;

use crate::arg::Arg;
use crate::dialect::{Dialect, RenderError, Rendered};
use crate::error::{self, Result};
use crate::expr::Expression;
use crate::value::SqlValue;

/// An ordered list of fragments forming one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    parts: Vec<Expression>,
    dialect: Dialect,
    optional_prefix: Option<String>,
}

impl Query {
    /// Creates a query from one formatted fragment.
    #[must_use]
    pub fn new(template: &str, args: Vec<Arg>) -> Self {
        Self {
            parts: vec![Expression::format(template, args)],
            ..Self::default()
        }
    }

    /// Creates an empty query whose `prefix` is emitted only once a part
    /// has been added.
    #[must_use]
    pub fn optional(prefix: &str) -> Self {
        Self {
            optional_prefix: Some(String::from(prefix)),
            ..Self::default()
        }
    }

    /// Sets the dialect used by [`Query::to_sql`].
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Returns the dialect used by [`Query::to_sql`].
    #[must_use]
    pub const fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Appends a formatted fragment, separated by `sep` from earlier parts.
    pub fn join(&mut self, sep: &str, template: &str, args: Vec<Arg>) -> &mut Self {
        self.push_with(sep, Expression::format(template, args))
    }

    /// Appends a formatted fragment, separated by a space.
    pub fn space(&mut self, template: &str, args: Vec<Arg>) -> &mut Self {
        self.join(" ", template, args)
    }

    /// Appends a formatted fragment, separated by a comma.
    pub fn comma(&mut self, template: &str, args: Vec<Arg>) -> &mut Self {
        self.join(",", template, args)
    }

    /// Appends a formatted fragment with no separator.
    pub fn concat(&mut self, template: &str, args: Vec<Arg>) -> &mut Self {
        self.join("", template, args)
    }

    /// Appends a pre-built fragment, separated by a space.
    pub fn push(&mut self, expr: Expression) -> &mut Self {
        self.push_with(" ", expr)
    }

    fn push_with(&mut self, sep: &str, expr: Expression) -> &mut Self {
        let part = if self.parts.is_empty() || sep.is_empty() {
            expr
        } else {
            Expression::from_parts(String::from(sep), vec![], vec![]).append("", expr)
        };
        self.parts.push(part);
        self
    }

    /// Returns true if no part has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Concatenates the parts into one fragment, prefix included.
    #[must_use]
    pub fn into_expression(self) -> Expression {
        let mut expr = self
            .parts
            .into_iter()
            .fold(Expression::default(), |acc, part| acc.append("", part));

        if let Some(prefix) = self.optional_prefix {
            if !expr.is_empty() {
                expr = Expression::from_parts(prefix, vec![], vec![]).append(" ", expr);
            }
        }
        expr
    }

    /// Returns the assembled text (with internal placeholder markers), the
    /// parameters and the joined errors of all parts.
    #[must_use]
    pub fn assemble(&self) -> (String, Vec<SqlValue>, Result<()>) {
        let (text, values, errors) = self.clone().into_expression().into_parts();
        (text, values, error::join(errors))
    }

    /// Renders with the query's dialect.
    ///
    /// # Errors
    ///
    /// Returns the joined expansion errors, or the dialect's render errors,
    /// along with the partial text.
    pub fn to_sql(&self) -> std::result::Result<Rendered, RenderError> {
        self.render(&self.dialect)
    }

    /// Renders with `$n` placeholders.
    ///
    /// # Errors
    ///
    /// See [`Query::to_sql`].
    pub fn to_pgsql(&self) -> std::result::Result<Rendered, RenderError> {
        self.render(&Dialect::Postgres)
    }

    /// Renders with `?` placeholders.
    ///
    /// # Errors
    ///
    /// See [`Query::to_sql`].
    pub fn to_mysql(&self) -> std::result::Result<Rendered, RenderError> {
        self.render(&Dialect::MySql)
    }

    /// Renders with every parameter inlined as a SQL literal.
    ///
    /// # Errors
    ///
    /// See [`Query::to_sql`].
    pub fn to_raw(&self) -> std::result::Result<Rendered, RenderError> {
        self.render(&Dialect::Raw)
    }

    /// Renders for `dialect`.
    ///
    /// # Errors
    ///
    /// See [`Query::to_sql`].
    pub fn render(&self, dialect: &Dialect) -> std::result::Result<Rendered, RenderError> {
        let (text, params, result) = self.assemble();
        if let Err(error) = result {
            debug!(%dialect, %error, "Query has expansion errors");
            return Err(RenderError { sql: text, error });
        }
        dialect.render(&text, params)
    }

    /// Returns the statement with parameters inlined, for debugging.
    ///
    /// Falls back to the assembled text when inlining fails.
    #[must_use]
    pub fn print(&self) -> String {
        match self.to_raw() {
            Ok(rendered) => rendered.sql,
            Err(e) => e.sql,
        }
    }
}

impl From<Expression> for Query {
    fn from(expr: Expression) -> Self {
        Self {
            parts: vec![expr],
            ..Self::default()
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}
