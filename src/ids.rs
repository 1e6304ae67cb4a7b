macro_rules! impl_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(usize);

        impl $name {
            /// Create a new id.
            #[inline]
            pub const fn new(index: usize) -> Self {
                $name(index)
            }

            /// Get the id as usize.
            #[inline]
            pub fn as_usize(&self) -> usize {
                self.0
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;

            #[inline]
            fn index(&self, index: $name) -> &Self::Output {
                &self[index.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, index: $name) -> &mut T {
                &mut self[index.0]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                $name::new(index)
            }
        }
    };
}

impl_id!(
    /// The label of an NFA state. Labels are handed out by a [`crate::Session`] and are unique
    /// within it.
    StateId
);
impl_id!(
    /// The id of a DFA state, i.e. of a canonical subset of NFA states.
    /// It can be used as index into the states of the DFA.
    DfaStateId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_indexing() {
        let mut v = vec!["a", "b", "c"];
        assert_eq!(v[DfaStateId::new(1)], "b");
        v[DfaStateId::new(2)] = "d";
        assert_eq!(v[DfaStateId::new(2)], "d");
        assert_eq!(StateId::from(4).as_usize(), 4);
        assert_eq!(StateId::new(12).to_string(), "12");
    }
}
