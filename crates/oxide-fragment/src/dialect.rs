//! SQL dialect rendering.
//!
//! Databases disagree on how bound parameters are written. Assembled text
//! marks each parameter with an internal placeholder; a [`Dialect`] rewrites
//! those markers into its own syntax.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, ErrorList};
use crate::placeholder::{self, ESCAPED_QUESTION_MARK, PARAM_PLACEHOLDER, QUESTION_MARK};
use crate::scan::{Scan, replace_with_scans};
use crate::value::SqlValue;

/// A target parameter-passing convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Dialect {
    /// Generic SQL with `?` placeholders.
    #[default]
    Sql,
    /// MySQL, `?` placeholders.
    MySql,
    /// PostgreSQL, `$1`, `$2`, ... placeholders.
    Postgres,
    /// Every parameter inlined as a SQL literal.
    Raw,
    /// A tag without a known convention; text is passed through unchanged.
    Custom(String),
}

impl Dialect {
    /// All dialects with a known convention.
    pub const KNOWN: [Self; 4] = [Self::Sql, Self::MySql, Self::Postgres, Self::Raw];

    /// Returns the dialect tag.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Sql => "sql",
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Raw => "raw",
            Self::Custom(name) => name,
        }
    }

    /// Returns an example of the parameter placeholder style.
    #[must_use]
    pub const fn parameter_placeholder(&self) -> &'static str {
        match self {
            Self::Sql | Self::MySql => "?",
            Self::Postgres => "$1",
            Self::Raw => "<literal>",
            Self::Custom(_) => PARAM_PLACEHOLDER,
        }
    }

    /// Rewrites assembled text and its parameters for this dialect.
    ///
    /// # Errors
    ///
    /// Returns every conversion and placeholder failure, joined, together
    /// with the partially rendered text. Parameters left without a marker
    /// are reported as [`Error::UnbalancedPlaceholders`].
    pub fn render(&self, sql: &str, params: Vec<SqlValue>) -> Result<Rendered, RenderError> {
        debug!(dialect = %self, params = params.len(), "Rendering statement");

        let count = params.len();
        let markers = placeholder::count(sql);
        let unbalanced = Error::UnbalancedPlaceholders {
            markers,
            params: count,
        };
        let out_of_range = move |index: usize| Error::ParameterOutOfRange { index, count };

        let mut errors = ErrorList::new();
        if markers < count {
            errors.push(unbalanced.clone());
        }

        let (sql, params) = match self {
            Self::Sql | Self::MySql => {
                let (sql, result) = replace_with_scans(
                    sql,
                    &[Scan::new(PARAM_PLACEHOLDER, |i| {
                        if i < count {
                            Ok(String::from(QUESTION_MARK))
                        } else {
                            Err(out_of_range(i))
                        }
                    })],
                );
                errors.check(result);
                (sql, params)
            }
            Self::Postgres => {
                let (sql, result) = replace_with_scans(
                    sql,
                    &[
                        Scan::constant(ESCAPED_QUESTION_MARK, QUESTION_MARK),
                        Scan::new(PARAM_PLACEHOLDER, |i| {
                            if i < count {
                                Ok(format!("${}", i + 1))
                            } else {
                                Err(out_of_range(i))
                            }
                        }),
                    ],
                );
                errors.check(result);
                (sql, params)
            }
            Self::Raw => {
                let literals: Vec<Option<String>> = params
                    .iter()
                    .map(|p| p.to_sql_literal().map_err(|e| errors.push(e)).ok())
                    .collect();

                let (sql, result) = replace_with_scans(
                    sql,
                    &[Scan::new(PARAM_PLACEHOLDER, |i| match literals.get(i) {
                        Some(Some(literal)) => Ok(literal.clone()),
                        // Already reported as a conversion failure
                        Some(None) => Ok(String::from(PARAM_PLACEHOLDER)),
                        None => Err(out_of_range(i)),
                    })],
                );
                errors.check(result);
                (sql, vec![])
            }
            Self::Custom(name) => {
                warn!(dialect = %name, "No placeholder replacement for dialect, passing through");
                if markers > count {
                    errors.push(unbalanced);
                }
                (String::from(sql), params)
            }
        };

        match errors.into_result() {
            Ok(()) => Ok(Rendered { sql, params }),
            Err(error) => Err(RenderError { sql, error }),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "sql" => Self::Sql,
            "mysql" => Self::MySql,
            "postgres" => Self::Postgres,
            "raw" => Self::Raw,
            other => Self::Custom(String::from(other)),
        })
    }
}

impl From<String> for Dialect {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(dialect) => dialect,
            Err(never) => match never {},
        }
    }
}

impl From<Dialect> for String {
    fn from(dialect: Dialect) -> Self {
        dialect.to_string()
    }
}

/// A statement ready for a parameterized-execution API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// The statement text in the dialect's syntax.
    pub sql: String,
    /// Parameters in placeholder order; empty for [`Dialect::Raw`].
    pub params: Vec<SqlValue>,
}

/// Rendering failed.
///
/// The partial text is kept for diagnostics; it must not be executed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct RenderError {
    /// The partially rendered text.
    pub sql: String,
    /// The joined failures.
    pub error: Error,
}

impl RenderError {
    /// Returns the individual failures.
    #[must_use]
    pub fn errors(&self) -> Vec<&Error> {
        self.error.flatten()
    }
}

impl From<RenderError> for Error {
    fn from(e: RenderError) -> Self {
        e.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::PARAM_PLACEHOLDER as P;

    fn ints(values: &[i64]) -> Vec<SqlValue> {
        values.iter().map(|v| SqlValue::Int(*v)).collect()
    }

    #[test]
    fn test_native_placeholders() {
        let sql = format!("a = {P} AND b ?? {P}");
        for dialect in [Dialect::Sql, Dialect::MySql] {
            let rendered = dialect.render(&sql, ints(&[1, 2])).unwrap();
            assert_eq!(rendered.sql, "a = ? AND b ?? ?");
            assert_eq!(rendered.params, ints(&[1, 2]));
        }
    }

    #[test]
    fn test_numbered_placeholders() {
        let sql = format!("a = {P} AND b ?? {P} AND c = {P}");
        let rendered = Dialect::Postgres.render(&sql, ints(&[5, 5, 5])).unwrap();
        assert_eq!(rendered.sql, "a = $1 AND b ? $2 AND c = $3");
        assert_eq!(rendered.params, ints(&[5, 5, 5]));
    }

    #[test]
    fn test_raw_inlines_literals() {
        let sql = format!("a = {P} AND b = {P} AND c IS {P} AND d = {P}");
        let params = vec![
            SqlValue::Int(1),
            SqlValue::Text(String::from("x")),
            SqlValue::Null,
            SqlValue::Bool(true),
        ];
        let rendered = Dialect::Raw.render(&sql, params).unwrap();
        assert_eq!(rendered.sql, "a = 1 AND b = 'x' AND c IS NULL AND d = true");
        assert!(rendered.params.is_empty());
    }

    #[test]
    fn test_raw_unsupported_type() {
        let sql = format!("a = {P} AND b = {P} AND c = {P}");
        let params = vec![
            SqlValue::Blob(vec![1]),
            SqlValue::Int(2),
            SqlValue::Blob(vec![3]),
        ];
        let err = Dialect::Raw.render(&sql, params).unwrap_err();
        assert_eq!(err.sql, format!("a = {P} AND b = 2 AND c = {P}"));
        assert_eq!(
            err.errors(),
            vec![
                &Error::UnsupportedLiteral { kind: "blob" },
                &Error::UnsupportedLiteral { kind: "blob" }
            ]
        );
    }

    #[test]
    fn test_more_placeholders_than_params() {
        let sql = format!("{P} {P}");
        let err = Dialect::Postgres.render(&sql, ints(&[1])).unwrap_err();
        assert_eq!(err.sql, format!("$1 {P}"));
        assert_eq!(err.error, Error::ParameterOutOfRange { index: 1, count: 1 });

        assert!(Dialect::Raw.render(&sql, vec![]).is_err());
        assert!(Dialect::MySql.render(&sql, vec![]).is_err());
    }

    #[test]
    fn test_custom_passes_through() {
        let sql = format!("a = {P}");
        let dialect: Dialect = "oracle".parse().unwrap();
        assert_eq!(dialect, Dialect::Custom(String::from("oracle")));
        let rendered = dialect.render(&sql, ints(&[1])).unwrap();
        assert_eq!(rendered.sql, sql);
        assert_eq!(rendered.params, ints(&[1]));
    }

    #[test]
    fn test_tags_round_trip() {
        for dialect in Dialect::KNOWN {
            assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
        }
        assert_eq!(Dialect::default(), Dialect::Sql);
        assert_eq!(Dialect::Postgres.to_string(), "postgres");
    }

    #[test]
    fn test_serde_as_tag() {
        assert_eq!(
            serde_json::to_string(&Dialect::MySql).unwrap(),
            r#""mysql""#
        );
        let dialect: Dialect = serde_json::from_str(r#""postgres""#).unwrap();
        assert_eq!(dialect, Dialect::Postgres);
    }

    #[test]
    fn test_params_without_marker_are_reported() {
        for dialect in [Dialect::Sql, Dialect::Postgres, Dialect::Raw] {
            let err = dialect.render("a = 1", ints(&[9])).unwrap_err();
            assert_eq!(err.sql, "a = 1");
            assert_eq!(
                err.error,
                Error::UnbalancedPlaceholders {
                    markers: 0,
                    params: 1
                }
            );
        }
    }

    #[test]
    fn test_custom_reports_unbalanced_text() {
        let sql = format!("a = {P} AND b = {P}");
        let dialect = Dialect::Custom(String::from("oracle"));
        let err = dialect.render(&sql, ints(&[1])).unwrap_err();
        assert_eq!(err.sql, sql);
        assert_eq!(
            err.errors(),
            vec![&Error::UnbalancedPlaceholders {
                markers: 2,
                params: 1
            }]
        );
    }

    #[test]
    fn test_render_error_displays_once() {
        let err = Dialect::Raw.render("a = 1", ints(&[9])).unwrap_err();
        assert_eq!(err.to_string(), "1 params for 0 placeholders");
        assert!(std::error::Error::source(&err).is_none());
    }
}
