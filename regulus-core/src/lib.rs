//! Regulus Core
//!
//! A finite-automaton algebra: immutable DFA and NFA values with boolean
//! combination (union, difference, complement), structural combination
//! (concatenation), canonicalization, minimization, and interconversion.
//!
//! Automata are plain values. Every transforming operation builds and
//! returns a new automaton; nothing is ever mutated in place, so values can
//! be shared across threads without synchronization. Automata are supplied
//! pre-built by the caller (directly or via `create`, which infers the state
//! and alphabet sets from the transitions); there is no regex front-end
//! here.

pub mod dfa;
pub mod nfa;
pub mod state;

pub use dfa::Dfa;
pub use nfa::Nfa;
pub use state::{State, Symbol};

use thiserror::Error;

/// Errors raised when building or stepping automata
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AutomatonError {
    /// A construction input violates a structural invariant
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),

    /// `Dfa::step` was asked for a (state, symbol) pair outside the
    /// transition domain. `accept` folds this into rejection instead.
    #[error("no transition from state '{state}' on symbol '{symbol}'")]
    UndefinedTransition {
        /// Source state of the failed lookup
        state: State,
        /// Symbol of the failed lookup
        symbol: Symbol,
    },

    /// An operation that requires a deterministic automaton was given a
    /// genuinely nondeterministic one
    #[error("automaton is not deterministic: {0}")]
    NotDeterministic(String),
}

/// Result type for automaton operations
pub type AutomatonResult<T> = Result<T, AutomatonError>;
