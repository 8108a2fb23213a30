//! Error types for fragment expansion and rendering.

/// Errors produced while expanding fragments or rendering them for a dialect.
///
/// Expansion never stops at the first problem: errors are collected on the
/// fragment and joined when the statement is assembled, so a caller sees
/// every problem in a statement at once.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Plain text contained a `?` that was not escaped as `??`.
    #[error("string value without parameters: {text}")]
    UnescapedPlaceholder {
        /// The offending text.
        text: String,
    },

    /// The template has more `?` placeholders than arguments.
    #[error("extra ? in text: {template} ({args} args)")]
    MissingArgument {
        /// The template as written by the caller.
        template: String,
        /// Number of arguments supplied.
        args: usize,
    },

    /// More arguments were supplied than the template has placeholders.
    #[error("missing ? in text: {template} ({args} args)")]
    MismatchedParameters {
        /// The template as written by the caller.
        template: String,
        /// Number of arguments supplied.
        args: usize,
    },

    /// A JSON argument could not be encoded.
    #[error("cannot jsonify value: {0}")]
    Json(String),

    /// A driver value failed to report its underlying value.
    #[error("driver value error: {0}")]
    DriverValue(String),

    /// The literal-inlining dialect cannot express this value as SQL text.
    #[error("unsupported type for raw query: {kind}")]
    UnsupportedLiteral {
        /// Name of the value kind.
        kind: &'static str,
    },

    /// A placeholder had no parameter to bind.
    #[error("no parameter for placeholder {index} ({count} params)")]
    ParameterOutOfRange {
        /// Zero-based placeholder occurrence.
        index: usize,
        /// Number of parameters available.
        count: usize,
    },

    /// The text carries a different number of placeholder markers than it
    /// has parameters.
    #[error("{params} params for {markers} placeholders")]
    UnbalancedPlaceholders {
        /// Markers found in the text.
        markers: usize,
        /// Parameters carried with the text.
        params: usize,
    },

    /// The scanner was asked to replace an empty marker.
    #[error("cannot scan for an empty pattern")]
    EmptyPattern,

    /// Multiple errors occurred.
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<Error>),
}

impl Error {
    /// Returns the individual errors, flattening joined ones.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Self> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

/// Result type for fragment operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Accumulates zero or more errors and exposes them as a single one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorList {
    errors: Vec<Error>,
}

impl ErrorList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error.
    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Records the error of a failed result, if any.
    pub fn check(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Joins the recorded errors: `Ok` when empty, the error itself when
    /// there is exactly one, `Error::Multiple` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the recorded errors when the list is not empty.
    pub fn into_result(self) -> Result<()> {
        join(self.errors)
    }
}

impl Extend<Error> for ErrorList {
    fn extend<T: IntoIterator<Item = Error>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl From<ErrorList> for Vec<Error> {
    fn from(list: ErrorList) -> Self {
        list.errors
    }
}

/// Joins a set of errors into one.
///
/// # Errors
///
/// Returns the single error, or [`Error::Multiple`] when there are several.
pub fn join(mut errors: Vec<Error>) -> Result<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(Error::Multiple(errors)),
    }
}
