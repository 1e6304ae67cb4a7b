use crate::{FaError, FaErrorKind, Result};

/// Options for the conversion of an NFA into a DFA.
///
/// The subset construction can produce exponentially many DFA states. Callers that don't control
/// the size of their input should set a ceiling with [`DeterminizeOptions::with_max_states`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeterminizeOptions {
    /// The maximum number of DFA states. `None` means no limit.
    pub max_states: Option<usize>,
}

impl DeterminizeOptions {
    /// Create options without a state limit.
    pub fn new() -> Self {
        DeterminizeOptions::default()
    }

    /// Set the maximum number of DFA states.
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = Some(max_states);
        self
    }

    // Fails if a DFA with the given number of states exceeds the limit.
    pub(crate) fn check_state_count(&self, states: usize) -> Result<()> {
        match self.max_states {
            Some(limit) if states > limit => {
                Err(FaError::new(FaErrorKind::ResourceLimit { limit }))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_state_count() {
        assert!(DeterminizeOptions::new()
            .check_state_count(usize::MAX)
            .is_ok());
        let options = DeterminizeOptions::new().with_max_states(3);
        assert!(options.check_state_count(3).is_ok());
        let error = options.check_state_count(4).unwrap_err();
        assert!(matches!(
            error.kind(),
            FaErrorKind::ResourceLimit { limit: 3 }
        ));
    }
}
