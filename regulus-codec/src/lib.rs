//! Regulus Codec
//!
//! JSON persistence for regulus automata. Both automaton kinds share one
//! document shape (`alphabet`, `states`, `initial_state`, `transitions`,
//! `final_states`); a DFA transition carries a single target where an NFA
//! transition carries a non-empty target list. Epsilon is encoded as the
//! empty string.
//!
//! Encoding is deterministic (sets and mappings are emitted in sorted
//! order) and decoding reconstructs the exact set/mapping structure, so
//! `decode(encode(x)) == x` structurally for every valid automaton.

mod wire;

use regulus_core::{AutomatonError, Dfa, Nfa, State, Symbol};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use thiserror::Error;
use wire::{DfaWire, NfaWire};

/// Errors raised while encoding or decoding an automaton document
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document is not valid JSON or is missing a field
    #[error("malformed automaton document: {0}")]
    Json(#[from] serde_json::Error),

    /// Two transition entries share the same (state, symbol) key
    #[error("duplicate transition key ({state}, '{symbol}')")]
    DuplicateTransition {
        /// Source state of the duplicated key
        state: String,
        /// Symbol of the duplicated key
        symbol: String,
    },

    /// An NFA transition entry has no targets
    #[error("transition ({state}, '{symbol}') has an empty target list")]
    EmptyTargetList {
        /// Source state of the offending entry
        state: String,
        /// Symbol of the offending entry
        symbol: String,
    },

    /// A DFA transition entry uses the reserved epsilon marker
    #[error("epsilon may not label a DFA transition (from state '{state}')")]
    EpsilonInDfa {
        /// Source state of the offending entry
        state: String,
    },

    /// The alphabet list contains the reserved epsilon marker
    #[error("the epsilon marker may not be listed in the alphabet")]
    EpsilonInAlphabet,

    /// The decoded fields violate a structural invariant (dangling state
    /// reference, unlisted symbol, initial state outside `states`, ...)
    #[error("decoded automaton is structurally invalid: {0}")]
    Invalid(#[from] AutomatonError),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Encode a DFA as a JSON string.
pub fn encode_dfa(dfa: &Dfa) -> CodecResult<String> {
    Ok(serde_json::to_string_pretty(&dfa_to_wire(dfa))?)
}

/// Decode a DFA from a JSON string.
pub fn decode_dfa(document: &str) -> CodecResult<Dfa> {
    dfa_from_wire(serde_json::from_str(document)?)
}

/// Encode a DFA as JSON into a writer.
pub fn write_dfa<W: Write>(writer: W, dfa: &Dfa) -> CodecResult<()> {
    Ok(serde_json::to_writer_pretty(writer, &dfa_to_wire(dfa))?)
}

/// Decode a DFA from a JSON reader.
pub fn read_dfa<R: Read>(reader: R) -> CodecResult<Dfa> {
    dfa_from_wire(serde_json::from_reader(reader)?)
}

/// Encode an NFA as a JSON string.
pub fn encode_nfa(nfa: &Nfa) -> CodecResult<String> {
    Ok(serde_json::to_string_pretty(&nfa_to_wire(nfa))?)
}

/// Decode an NFA from a JSON string.
pub fn decode_nfa(document: &str) -> CodecResult<Nfa> {
    nfa_from_wire(serde_json::from_str(document)?)
}

/// Encode an NFA as JSON into a writer.
pub fn write_nfa<W: Write>(writer: W, nfa: &Nfa) -> CodecResult<()> {
    Ok(serde_json::to_writer_pretty(writer, &nfa_to_wire(nfa))?)
}

/// Decode an NFA from a JSON reader.
pub fn read_nfa<R: Read>(reader: R) -> CodecResult<Nfa> {
    nfa_from_wire(serde_json::from_reader(reader)?)
}

fn dfa_to_wire(dfa: &Dfa) -> DfaWire {
    DfaWire {
        alphabet: dfa.alphabet.iter().map(|s| s.as_str().to_string()).collect(),
        states: dfa.states.iter().map(|s| s.as_str().to_string()).collect(),
        initial_state: dfa.initial_state.as_str().to_string(),
        transitions: dfa
            .transitions
            .iter()
            .map(|((source, symbol), target)| {
                (
                    source.as_str().to_string(),
                    symbol.as_str().to_string(),
                    target.as_str().to_string(),
                )
            })
            .collect(),
        final_states: dfa
            .final_states
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
    }
}

fn dfa_from_wire(wire: DfaWire) -> CodecResult<Dfa> {
    if wire.alphabet.iter().any(String::is_empty) {
        return Err(CodecError::EpsilonInAlphabet);
    }
    let mut transitions: BTreeMap<(State, Symbol), State> = BTreeMap::new();
    for (source, symbol, target) in wire.transitions {
        if symbol.is_empty() {
            return Err(CodecError::EpsilonInDfa { state: source });
        }
        let key = (State::from(source), Symbol::from(symbol));
        if transitions.contains_key(&key) {
            return Err(CodecError::DuplicateTransition {
                state: key.0.as_str().to_string(),
                symbol: key.1.as_str().to_string(),
            });
        }
        transitions.insert(key, State::from(target));
    }
    Ok(Dfa::new(
        wire.alphabet.into_iter().map(Symbol::from).collect(),
        wire.states.into_iter().map(State::from).collect(),
        State::from(wire.initial_state),
        transitions,
        wire.final_states.into_iter().map(State::from).collect(),
    )?)
}

fn nfa_to_wire(nfa: &Nfa) -> NfaWire {
    NfaWire {
        alphabet: nfa.alphabet.iter().map(|s| s.as_str().to_string()).collect(),
        states: nfa.states.iter().map(|s| s.as_str().to_string()).collect(),
        initial_state: nfa.initial_state.as_str().to_string(),
        transitions: nfa
            .transitions
            .iter()
            .map(|((source, symbol), targets)| {
                (
                    source.as_str().to_string(),
                    symbol.as_str().to_string(),
                    targets.iter().map(|t| t.as_str().to_string()).collect(),
                )
            })
            .collect(),
        final_states: nfa
            .final_states
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
    }
}

fn nfa_from_wire(wire: NfaWire) -> CodecResult<Nfa> {
    if wire.alphabet.iter().any(String::is_empty) {
        return Err(CodecError::EpsilonInAlphabet);
    }
    let mut transitions: BTreeMap<(State, Symbol), BTreeSet<State>> = BTreeMap::new();
    for (source, symbol, targets) in wire.transitions {
        if targets.is_empty() {
            return Err(CodecError::EmptyTargetList {
                state: source,
                symbol,
            });
        }
        let key = (State::from(source), Symbol::from(symbol));
        if transitions.contains_key(&key) {
            return Err(CodecError::DuplicateTransition {
                state: key.0.as_str().to_string(),
                symbol: key.1.as_str().to_string(),
            });
        }
        transitions.insert(key, targets.into_iter().map(State::from).collect());
    }
    Ok(Nfa::new(
        wire.alphabet.into_iter().map(Symbol::from).collect(),
        wire.states.into_iter().map(State::from).collect(),
        State::from(wire.initial_state),
        transitions,
        wire.final_states.into_iter().map(State::from).collect(),
    )?)
}
