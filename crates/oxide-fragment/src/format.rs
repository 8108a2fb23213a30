//! Formatted-fragment builder.
//!
//! Expands a template's `?` slots against a list of arguments. The template
//! is tokenized once up front, so escaped `??` marks and text spliced in from
//! raw literals or nested queries are never taken for new slots.

use tracing::trace;

use crate::arg::Arg;
use crate::error::{Error, ErrorList};
use crate::expr::Expression;
use crate::placeholder::{self, ESCAPED_QUESTION_MARK, PARAM_PLACEHOLDER, QUESTION_MARK, TemplateToken};
use crate::value::SqlValue;

/// Accumulates the expansion of one template.
struct Expansion {
    text: String,
    values: Vec<SqlValue>,
    errors: ErrorList,
    /// Markers and values spliced in from nested queries, which check their
    /// own balance.
    nested_markers: usize,
    nested_values: usize,
}

impl Expansion {
    fn new(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            values: vec![],
            errors: ErrorList::new(),
            nested_markers: 0,
            nested_values: 0,
        }
    }

    /// Binds one placeholder to `value`.
    fn bind(&mut self, value: SqlValue) {
        self.text.push_str(PARAM_PLACEHOLDER);
        self.values.push(value);
    }

    /// Binds one placeholder to NULL and records why the real value is
    /// missing.
    fn bind_failed(&mut self, error: Error) {
        self.errors.push(error);
        self.bind(SqlValue::Null);
    }

    fn expand(&mut self, arg: Arg) {
        match arg {
            Arg::Value(value) => self.bind(value),
            Arg::List(values) if values.is_empty() => self.bind(SqlValue::Null),
            Arg::List(values) => {
                self.text.push_str(&placeholder::repeat(values.len()));
                self.values.extend(values);
            }
            Arg::Query(query) => {
                let (text, values, errors) = query.into_expression().into_parts();
                self.nested_markers += placeholder::count(&text);
                self.nested_values += values.len();
                self.text.push_str(&text);
                self.values.extend(values);
                self.errors.extend(errors);
            }
            Arg::Json(json) => match json.encoded() {
                Ok(encoded) => self.bind(SqlValue::Text(String::from(encoded))),
                Err(message) => self.bind_failed(Error::Json(String::from(message))),
            },
            Arg::Raw(sql) => self.text.push_str(&sql),
            Arg::Driver(driver) => match driver.value() {
                Ok(value) => self.bind(value),
                Err(e) => self.bind_failed(Error::DriverValue(e.0)),
            },
        }
    }
}

/// Expands `template` against `args`.
pub(crate) fn expand(template: &str, args: Vec<Arg>) -> Expression {
    let arg_count = args.len();
    let mut args = args.into_iter();
    let mut out = Expansion::new(template.len());
    let mut unfilled = 0_usize;

    for token in placeholder::tokenize(template) {
        match token {
            TemplateToken::Text(text) => out.text.push_str(text),
            TemplateToken::Escaped => out.text.push_str(ESCAPED_QUESTION_MARK),
            TemplateToken::Slot => match args.next() {
                Some(arg) => out.expand(arg),
                None => {
                    unfilled += 1;
                    out.text.push_str(QUESTION_MARK);
                }
            },
        }
    }

    if unfilled > 0 {
        out.errors.push(Error::MissingArgument {
            template: String::from(template),
            args: arg_count,
        });
    }
    if args.next().is_some() {
        out.errors.push(Error::MismatchedParameters {
            template: String::from(template),
            args: arg_count,
        });
    }

    // Markers written in the template or spliced from raw text
    let markers = placeholder::count(&out.text).saturating_sub(out.nested_markers);
    let params = out.values.len() - out.nested_values;
    if markers != params {
        out.errors.push(Error::UnbalancedPlaceholders { markers, params });
    }

    trace!(
        template,
        params = out.values.len(),
        errors = out.errors.len(),
        "Expanded fragment"
    );

    Expression::from_parts(out.text, out.values, out.errors.into())
}
