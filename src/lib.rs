#![forbid(missing_docs)]
//! The `faground` crate builds nondeterministic finite automata from symbol fragments with
//! Thompson-style combinators and converts them into deterministic finite automata with the
//! subset construction.
//!
//! ```
//! use faground::Session;
//!
//! let session = Session::new();
//! // (a|b)*abb
//! let nfa = session
//!     .literal('a')
//!     .union(session.literal('b'))?
//!     .closure()
//!     .concat(session.literal('a'))?
//!     .concat(session.literal('b'))?
//!     .concat(session.literal('b'))?;
//! let dfa = nfa.determinize()?;
//! assert!(dfa.accepts("babb".chars()));
//! assert!(!dfa.accepts("abba".chars()));
//! # Ok::<(), faground::FaError>(())
//! ```

/// Module with error definitions
mod errors;
pub use errors::{FaError, FaErrorKind, Result};

/// Module that provides the id types for NFA and DFA states.
mod ids;
pub use ids::{DfaStateId, StateId};

/// Module with the directed multigraph the automata are built on.
mod graph;
pub use graph::{Edge, Graph};

/// Module with the construction session that hands out state labels.
mod session;
pub use session::Session;

/// The nfa module contains the NFA fragments and their combinators.
mod nfa;
pub use nfa::{Label, Nfa, StateSet, Symbol};

/// Module with the options of the subset construction.
mod config;
pub use config::DeterminizeOptions;

/// Module that provides the DFA and the subset construction.
mod dfa;
pub use dfa::{Dfa, DfaState};

/// Module with conversion to graphviz dot format
#[cfg(feature = "dot")]
mod dot;
#[cfg(feature = "dot")]
pub use dot::{dfa_render, nfa_render};

/// The syntax module builds NFA fragments from regular expressions.
#[cfg(feature = "syntax")]
mod syntax;
#[cfg(feature = "syntax")]
pub use syntax::parse_regex_syntax;
