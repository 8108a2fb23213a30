#![allow(dead_code)]

use oxide_fragment::placeholder::{self, PARAM_PLACEHOLDER};
use oxide_fragment::{Dialect, Expression, Query, Rendered, SqlValue};

pub fn render(query: &Query, dialect: &Dialect) -> Rendered {
    query
        .render(dialect)
        .unwrap_or_else(|e| panic!("Failed to render for {dialect}: {e}\nPartial SQL: {}", e.sql))
}

pub fn assert_balanced(expr: &Expression) {
    assert_eq!(
        placeholder::count(expr.sql()),
        expr.values().len(),
        "Unbalanced fragment: {}",
        expr.sql()
    );
}

/// Substitutes literal forms of `params` into `?` placeholders, by hand.
pub fn inline_native(sql: &str, params: &[SqlValue]) -> String {
    let mut params = params.iter();
    let mut out = String::new();
    for c in sql.chars() {
        if c == '?' {
            let param = params.next().expect("more placeholders than params");
            out.push_str(&param.to_sql_literal().unwrap());
        } else {
            out.push(c);
        }
    }
    assert!(params.next().is_none(), "more params than placeholders");
    out
}

pub fn marker() -> &'static str {
    PARAM_PLACEHOLDER
}
