use thiserror::Error;

/// The result type for the `faground` crate.
pub type Result<T> = std::result::Result<T, FaError>;

/// A macro that constructs a new FaErrorKind::InvariantViolation error.
macro_rules! invariant {
    ($($arg:tt)*) => {
        $crate::errors::FaError::new($crate::errors::FaErrorKind::InvariantViolation(format!(
            $($arg)*
        )))
    };
}
pub(crate) use invariant;

/// The error type for the `faground` crate.
#[derive(Error, Debug)]
pub struct FaError {
    /// The source of the error.
    pub source: Box<FaErrorKind>,
}

impl FaError {
    /// Create a new `FaError`.
    pub fn new(kind: FaErrorKind) -> Self {
        FaError {
            source: Box::new(kind),
        }
    }

    /// Get the kind of the error.
    pub fn kind(&self) -> &FaErrorKind {
        &self.source
    }
}

impl std::fmt::Display for FaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum FaErrorKind {
    /// An automaton does not satisfy its structural contract, e.g. an edge weight outside the
    /// declared alphabet or a query against a state that is not part of the graph.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The subset construction produced more states than the configured ceiling allows.
    #[error("Resource limit exceeded: more than {limit} DFA states")]
    ResourceLimit {
        /// The configured maximum number of DFA states.
        limit: usize,
    },

    /// An error occurred during the parsing of the regex syntax.
    #[cfg(feature = "syntax")]
    #[error(transparent)]
    RegexSyntaxError(regex_syntax::ast::Error),

    /// Used regex features that can't be expressed with the automaton combinators.
    #[cfg(feature = "syntax")]
    #[error("Unsupported regex feature: {0}")]
    UnsupportedFeature(String),
}

#[cfg(feature = "syntax")]
impl From<regex_syntax::ast::Error> for FaError {
    fn from(error: regex_syntax::ast::Error) -> Self {
        FaError::new(FaErrorKind::RegexSyntaxError(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_macro() {
        let error = invariant!("state {} is missing", 7);
        assert!(matches!(
            error.kind(),
            FaErrorKind::InvariantViolation(msg) if msg == "state 7 is missing"
        ));
        assert_eq!(error.to_string(), "Invariant violation: state 7 is missing");
    }

    #[test]
    fn test_resource_limit_display() {
        let error = FaError::new(FaErrorKind::ResourceLimit { limit: 3 });
        assert_eq!(
            error.to_string(),
            "Resource limit exceeded: more than 3 DFA states"
        );
    }
}
