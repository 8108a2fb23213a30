//! Placeholder markers and template tokenizing.
//!
//! Between expansion and dialect rendering, every bound parameter is marked
//! in the statement text by [`PARAM_PLACEHOLDER`]. The marker is not escaped;
//! it is assumed never to occur in caller SQL.

/// Marks "exactly one parameter belongs here" in assembled text.
pub const PARAM_PLACEHOLDER: &str = "xX_PARAM_Xx";

/// A literal question mark, escaped in templates and assembled text.
pub const ESCAPED_QUESTION_MARK: &str = "??";

/// The template placeholder and the native placeholder of `?` dialects.
pub const QUESTION_MARK: &str = "?";

/// One piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateToken<'a> {
    /// Text copied as is.
    Text(&'a str),
    /// An escaped `??`.
    Escaped,
    /// A `?` waiting for an argument.
    Slot,
}

/// Splits a template into text, escaped `??` and `?` slots.
///
/// Pairs are matched left to right, so `???` is an escaped mark followed by
/// a slot.
#[must_use]
pub fn tokenize(template: &str) -> Vec<TemplateToken<'_>> {
    let mut tokens = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find('?') {
        if pos > 0 {
            tokens.push(TemplateToken::Text(&rest[..pos]));
        }
        if rest[pos..].starts_with(ESCAPED_QUESTION_MARK) {
            tokens.push(TemplateToken::Escaped);
            rest = &rest[pos + ESCAPED_QUESTION_MARK.len()..];
        } else {
            tokens.push(TemplateToken::Slot);
            rest = &rest[pos + QUESTION_MARK.len()..];
        }
    }
    if !rest.is_empty() {
        tokens.push(TemplateToken::Text(rest));
    }

    tokens
}

/// Returns true if `text` holds a `?` that is not part of a `??` pair.
#[must_use]
pub fn has_unescaped(text: &str) -> bool {
    tokenize(text)
        .iter()
        .any(|t| matches!(t, TemplateToken::Slot))
}

/// Counts the parameter markers in assembled text.
#[must_use]
pub fn count(text: &str) -> usize {
    text.matches(PARAM_PLACEHOLDER).count()
}

/// Returns `n` parameter markers joined by `, `.
#[must_use]
pub fn repeat(n: usize) -> String {
    vec![PARAM_PLACEHOLDER; n].join(", ")
}
