// Wire format
//
// serde view of the persisted JSON document. Transitions are encoded as
// [state, symbol, target] triples for DFAs and [state, symbol, [targets]]
// for NFAs; the epsilon marker is the empty string, which is disjoint from
// every real symbol value.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DfaWire {
    pub alphabet: Vec<String>,
    pub states: Vec<String>,
    pub initial_state: String,
    pub transitions: Vec<(String, String, String)>,
    pub final_states: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct NfaWire {
    pub alphabet: Vec<String>,
    pub states: Vec<String>,
    pub initial_state: String,
    pub transitions: Vec<(String, String, Vec<String>)>,
    pub final_states: Vec<String>,
}
