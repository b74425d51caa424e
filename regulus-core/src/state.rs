// Automaton labels
//
// This module defines the shared vocabulary of both engines:
// - State: an opaque state label
// - Symbol: an opaque input symbol, with the empty label reserved as epsilon

use std::collections::BTreeSet;
use std::fmt;

/// An opaque state label.
///
/// States only need equality, hashing, and a total order (the order is what
/// makes canonical renaming deterministic). The label itself carries no
/// meaning to the engines.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State(String);

impl State {
    /// Create a state from any string-like label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The underlying label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for State {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for State {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// An opaque input symbol.
///
/// The empty label is reserved as the epsilon marker: it may key NFA
/// transitions but never appears in an alphabet and never labels a DFA
/// transition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol from any string-like label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The reserved epsilon marker (the empty label)
    pub fn epsilon() -> Self {
        Self(String::new())
    }

    /// Whether this symbol is the reserved epsilon marker
    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for Symbol {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Pick the reserved sink label for completion.
///
/// The sink is `-`, extended with further dashes until it is distinct from
/// every existing state, so it can never collide with caller-supplied labels.
pub(crate) fn fresh_sink_label(states: &BTreeSet<State>) -> State {
    let mut label = String::from("-");
    while states.contains(&State::new(label.as_str())) {
        label.push('-');
    }
    State::new(label)
}
