//! Token-scanning replacer.
//!
//! A single forward pass splits text at exact occurrences of a marker and
//! replaces each occurrence with the output of a render function, which
//! receives the zero-based occurrence index. Everything else is copied.

use crate::error::{Error, ErrorList, Result};

/// Renders the replacement for one marker occurrence.
pub type RenderFn<'a> = dyn Fn(usize) -> Result<String> + 'a;

/// One marker to replace and how to render it.
pub struct Scan<'a> {
    pattern: &'a str,
    render: Box<RenderFn<'a>>,
}

impl<'a> Scan<'a> {
    /// Creates a scan that replaces `pattern` with the output of `render`.
    #[must_use]
    pub fn new<F>(pattern: &'a str, render: F) -> Self
    where
        F: Fn(usize) -> Result<String> + 'a,
    {
        Self {
            pattern,
            render: Box::new(render),
        }
    }

    /// Creates a scan that replaces every occurrence with the same text.
    #[must_use]
    pub fn constant(pattern: &'a str, replacement: &'a str) -> Self {
        Self::new(pattern, move |_| Ok(String::from(replacement)))
    }
}

/// Replaces every occurrence of `pattern` in `input`.
///
/// On failure the text is still fully scanned: occurrences whose render
/// failed are left as the marker, and the failures are joined.
///
/// # Errors
///
/// Returns [`Error::EmptyPattern`] for an empty marker (the input is returned
/// untouched alongside it), or the joined render failures.
pub fn scan_replace<F>(input: &str, pattern: &str, render: F) -> (String, Result<()>)
where
    F: Fn(usize) -> Result<String>,
{
    if pattern.is_empty() {
        return (String::from(input), Err(Error::EmptyPattern));
    }

    let mut out = String::with_capacity(input.len());
    let mut errors = ErrorList::new();
    let mut rest = input;
    let mut index = 0;

    while let Some(pos) = rest.find(pattern) {
        out.push_str(&rest[..pos]);
        match render(index) {
            Ok(replacement) => out.push_str(&replacement),
            Err(e) => {
                errors.push(e);
                out.push_str(pattern);
            }
        }
        index += 1;
        rest = &rest[pos + pattern.len()..];
    }
    out.push_str(rest);

    (out, errors.into_result())
}

/// Applies scans in order, feeding each one the output of the previous.
///
/// Every scan runs even if an earlier one failed; all failures are joined
/// into one error.
pub fn replace_with_scans(input: &str, scans: &[Scan<'_>]) -> (String, Result<()>) {
    let mut errors = ErrorList::new();
    let mut text = String::from(input);

    for scan in scans {
        let (out, result) = scan_replace(&text, scan.pattern, &*scan.render);
        errors.check(result);
        text = out;
    }

    (text, errors.into_result())
}
