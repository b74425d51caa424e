// NFA engine
//
// Nondeterministic finite automata with epsilon transitions, as immutable
// values. Epsilon is the reserved empty symbol label: it may key the
// transition relation but never appears in the alphabet. All closure and
// subset computations run as explicit worklist loops.

use crate::dfa::Dfa;
use crate::state::{fresh_sink_label, State, Symbol};
use crate::{AutomatonError, AutomatonResult};
use ahash::AHashMap;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::{Add, BitOr, Sub};
use tracing::debug;

/// A nondeterministic finite automaton with epsilon transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    /// Input symbols; the epsilon marker is never an element
    pub alphabet: BTreeSet<Symbol>,
    /// All states
    pub states: BTreeSet<State>,
    /// Start state, always an element of `states`
    pub initial_state: State,
    /// Relation (state, symbol-or-epsilon) -> non-empty set of states
    pub transitions: BTreeMap<(State, Symbol), BTreeSet<State>>,
    /// Accepting states, a subset of `states`
    pub final_states: BTreeSet<State>,
}

impl Nfa {
    /// Build an NFA from explicit sets, validating every structural
    /// invariant eagerly.
    pub fn new(
        alphabet: BTreeSet<Symbol>,
        states: BTreeSet<State>,
        initial_state: State,
        transitions: BTreeMap<(State, Symbol), BTreeSet<State>>,
        final_states: BTreeSet<State>,
    ) -> AutomatonResult<Self> {
        if alphabet.iter().any(Symbol::is_epsilon) {
            return Err(AutomatonError::InvalidAutomaton(
                "the epsilon marker may not be an element of the alphabet".to_string(),
            ));
        }
        if !states.contains(&initial_state) {
            return Err(AutomatonError::InvalidAutomaton(format!(
                "initial state '{initial_state}' is not an element of states"
            )));
        }
        for ((source, symbol), targets) in &transitions {
            if targets.is_empty() {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "transition ({source}, '{symbol}') has an empty target set"
                )));
            }
            if !states.contains(source) {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "transition source '{source}' is not an element of states"
                )));
            }
            for target in targets {
                if !states.contains(target) {
                    return Err(AutomatonError::InvalidAutomaton(format!(
                        "transition target '{target}' is not an element of states"
                    )));
                }
            }
            if !symbol.is_epsilon() && !alphabet.contains(symbol) {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "transition symbol '{symbol}' is not an element of the alphabet"
                )));
            }
        }
        for state in &final_states {
            if !states.contains(state) {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "final state '{state}' is not an element of states"
                )));
            }
        }
        Ok(Self {
            alphabet,
            states,
            initial_state,
            transitions,
            final_states,
        })
    }

    /// Build an NFA from transitions alone, inferring `states` as every
    /// mentioned state and `alphabet` as every non-epsilon transition
    /// symbol.
    pub fn create(
        initial_state: State,
        transitions: BTreeMap<(State, Symbol), BTreeSet<State>>,
        final_states: BTreeSet<State>,
    ) -> AutomatonResult<Self> {
        let mut states: BTreeSet<State> = [initial_state.clone()].into();
        let mut alphabet = BTreeSet::new();
        for ((source, symbol), targets) in &transitions {
            if targets.is_empty() {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "transition ({source}, '{symbol}') has an empty target set"
                )));
            }
            states.insert(source.clone());
            states.extend(targets.iter().cloned());
            if !symbol.is_epsilon() {
                alphabet.insert(symbol.clone());
            }
        }
        states.extend(final_states.iter().cloned());
        Ok(Self {
            alphabet,
            states,
            initial_state,
            transitions,
            final_states,
        })
    }

    /// All states reachable from `state` via zero or more epsilon
    /// transitions; always contains `state` itself.
    pub fn epsilon_closure(&self, state: &State) -> BTreeSet<State> {
        let mut closure: BTreeSet<State> = [state.clone()].into();
        let mut queue: VecDeque<State> = [state.clone()].into();
        while let Some(current) = queue.pop_front() {
            if let Some(targets) = self.transitions.get(&(current, Symbol::epsilon())) {
                for target in targets {
                    if closure.insert(target.clone()) {
                        queue.push_back(target.clone());
                    }
                }
            }
        }
        closure
    }

    /// The subset-construction step: close `states` under epsilon, follow
    /// `symbol`, close again. Empty when no state in the closure moves on
    /// `symbol`.
    pub fn step(&self, states: &BTreeSet<State>, symbol: &Symbol) -> BTreeSet<State> {
        let mut moved = BTreeSet::new();
        for state in self.epsilon_closure_set(states) {
            if let Some(targets) = self.transitions.get(&(state, symbol.clone())) {
                moved.extend(targets.iter().cloned());
            }
        }
        if moved.is_empty() {
            return moved;
        }
        self.epsilon_closure_set(&moved)
    }

    /// Run the automaton over `input` from the initial state.
    ///
    /// Returns true iff the set of states reachable after the whole input
    /// intersects the final states.
    pub fn accept(&self, input: &[Symbol]) -> bool {
        let mut current = self.epsilon_closure(&self.initial_state);
        for symbol in input {
            current = self.step(&current, symbol);
        }
        !current.is_disjoint(&self.final_states)
    }

    /// Route every `(state, symbol)` pair without targets to a fresh sink,
    /// for every non-epsilon alphabet symbol.
    ///
    /// An automaton over the empty alphabet has nothing to complete over,
    /// so no sink is added.
    pub fn complete(&self) -> Nfa {
        if self.alphabet.is_empty() {
            return self.clone();
        }
        let missing: Vec<(State, Symbol)> = self
            .states
            .iter()
            .flat_map(|state| self.alphabet.iter().map(move |symbol| (state, symbol)))
            .filter(|(state, symbol)| {
                !self
                    .transitions
                    .contains_key(&((*state).clone(), (*symbol).clone()))
            })
            .map(|(state, symbol)| (state.clone(), symbol.clone()))
            .collect();
        if missing.is_empty() {
            return self.clone();
        }

        let sink = fresh_sink_label(&self.states);
        debug!(sink = %sink, missing = missing.len(), "completing transition relation");

        let mut states = self.states.clone();
        states.insert(sink.clone());
        let mut transitions = self.transitions.clone();
        for (state, symbol) in missing {
            transitions.insert((state, symbol), [sink.clone()].into());
        }
        for symbol in &self.alphabet {
            transitions.insert((sink.clone(), symbol.clone()), [sink.clone()].into());
        }
        Nfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: self.initial_state.clone(),
            transitions,
            final_states: self.final_states.clone(),
        }
    }

    /// The automaton accepting exactly the words this one rejects.
    ///
    /// Only defined for automata that are deterministic in the non-epsilon
    /// sense; genuinely nondeterministic input is rejected with
    /// [`AutomatonError::NotDeterministic`] rather than silently "fixed".
    pub fn complement(&self) -> AutomatonResult<Nfa> {
        for ((source, symbol), targets) in &self.transitions {
            if symbol.is_epsilon() {
                return Err(AutomatonError::NotDeterministic(format!(
                    "state '{source}' has an epsilon transition"
                )));
            }
            if targets.len() > 1 {
                return Err(AutomatonError::NotDeterministic(format!(
                    "state '{source}' has {} targets on symbol '{symbol}'",
                    targets.len()
                )));
            }
        }
        let complete = self.complete();
        let final_states = complete
            .states
            .iter()
            .filter(|state| !complete.final_states.contains(*state))
            .cloned()
            .collect();
        Ok(Nfa {
            final_states,
            ..complete
        })
    }

    /// The automaton accepting a word of `self` followed by a word of
    /// `other`.
    ///
    /// Both operands are relabeled with distinguishing suffixes (`_0` for
    /// `self`, `_1` for `other`); each final state of `self` gets an epsilon
    /// edge to `other`'s initial state and loses its final marking.
    pub fn concatenate(&self, other: &Nfa) -> Nfa {
        let left = self.with_suffix(0);
        let right = other.with_suffix(1);

        let mut transitions = left.transitions;
        transitions.extend(right.transitions);
        for final_state in &left.final_states {
            transitions
                .entry((final_state.clone(), Symbol::epsilon()))
                .or_default()
                .insert(right.initial_state.clone());
        }

        Nfa {
            alphabet: left.alphabet.union(&right.alphabet).cloned().collect(),
            states: left.states.union(&right.states).cloned().collect(),
            initial_state: left.initial_state,
            transitions,
            final_states: right.final_states,
        }
    }

    /// The automaton accepting words of `self` or of `other`.
    ///
    /// Both operands are suffix-relabeled as in `concatenate`; a fresh
    /// initial state (labeled `q0`, which cannot collide because every
    /// suffixed label contains `_`) epsilon-branches to both operands.
    pub fn union(&self, other: &Nfa) -> Nfa {
        let left = self.with_suffix(0);
        let right = other.with_suffix(1);
        let initial = State::new("q0");

        let mut transitions = left.transitions;
        transitions.extend(right.transitions);
        transitions.insert(
            (initial.clone(), Symbol::epsilon()),
            [left.initial_state, right.initial_state].into(),
        );

        let mut states: BTreeSet<State> = left.states.union(&right.states).cloned().collect();
        states.insert(initial.clone());

        Nfa {
            alphabet: left.alphabet.union(&right.alphabet).cloned().collect(),
            states,
            initial_state: initial,
            transitions,
            final_states: left
                .final_states
                .union(&right.final_states)
                .cloned()
                .collect(),
        }
    }

    /// An equivalent automaton without epsilon transitions.
    ///
    /// Every state gets the direct transitions of its whole epsilon closure
    /// and becomes final iff its closure meets the original final states.
    pub fn remove_epsilon_transitions(&self) -> Nfa {
        let mut transitions = BTreeMap::new();
        let mut final_states = BTreeSet::new();
        for state in &self.states {
            let closure = self.epsilon_closure(state);
            if !closure.is_disjoint(&self.final_states) {
                final_states.insert(state.clone());
            }
            for symbol in &self.alphabet {
                let mut targets = BTreeSet::new();
                for member in &closure {
                    if let Some(direct) = self.transitions.get(&(member.clone(), symbol.clone())) {
                        targets.extend(direct.iter().cloned());
                    }
                }
                if !targets.is_empty() {
                    transitions.insert((state.clone(), symbol.clone()), targets);
                }
            }
        }
        Nfa {
            alphabet: self.alphabet.clone(),
            states: self.states.clone(),
            initial_state: self.initial_state.clone(),
            transitions,
            final_states,
        }
    }

    /// Determinize via subset construction.
    ///
    /// Discovered state-sets are labeled `q0, q1, ...` in discovery order
    /// (the worklist starts from the epsilon closure of the initial state
    /// and visits symbols in sorted order, so labeling is deterministic).
    /// The empty set is never materialized: transitions into it are simply
    /// absent from the result.
    pub fn to_dfa(&self) -> Dfa {
        let initial_set = self.epsilon_closure(&self.initial_state);
        let initial_label = State::new("q0");

        let mut labels: AHashMap<BTreeSet<State>, State> = AHashMap::new();
        labels.insert(initial_set.clone(), initial_label.clone());
        let mut queue: VecDeque<BTreeSet<State>> = [initial_set].into();
        let mut next_id = 1usize;

        let mut states: BTreeSet<State> = [initial_label.clone()].into();
        let mut transitions = BTreeMap::new();
        let mut final_states = BTreeSet::new();

        while let Some(subset) = queue.pop_front() {
            let label = labels[&subset].clone();
            if !subset.is_disjoint(&self.final_states) {
                final_states.insert(label.clone());
            }
            for symbol in &self.alphabet {
                let target_set = self.step(&subset, symbol);
                if target_set.is_empty() {
                    continue;
                }
                let target_label = match labels.get(&target_set) {
                    Some(existing) => existing.clone(),
                    None => {
                        let fresh = State::new(format!("q{next_id}"));
                        next_id += 1;
                        labels.insert(target_set.clone(), fresh.clone());
                        states.insert(fresh.clone());
                        queue.push_back(target_set);
                        fresh
                    }
                };
                transitions.insert((label.clone(), symbol.clone()), target_label);
            }
        }
        debug!(
            nfa_states = self.states.len(),
            dfa_states = states.len(),
            "subset construction finished"
        );

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: initial_label,
            transitions,
            final_states,
        }
    }

    /// The automaton accepting words of `self` that `other` rejects.
    ///
    /// Computed by determinizing both operands, taking the DFA difference,
    /// and embedding the result back.
    pub fn difference(&self, other: &Nfa) -> Nfa {
        self.to_dfa().difference(&other.to_dfa()).to_nfa()
    }

    /// Whether `self` and `other` accept the same language.
    pub fn equivalent(&self, other: &Nfa) -> bool {
        self.difference(other).final_states.is_empty()
            && other.difference(self).final_states.is_empty()
    }

    fn epsilon_closure_set(&self, states: &BTreeSet<State>) -> BTreeSet<State> {
        states
            .iter()
            .flat_map(|state| self.epsilon_closure(state))
            .collect()
    }

    fn with_suffix(&self, tag: usize) -> Nfa {
        let renamed = |state: &State| State::new(format!("{state}_{tag}"));
        Nfa {
            alphabet: self.alphabet.clone(),
            states: self.states.iter().map(renamed).collect(),
            initial_state: renamed(&self.initial_state),
            transitions: self
                .transitions
                .iter()
                .map(|((source, symbol), targets)| {
                    (
                        (renamed(source), symbol.clone()),
                        targets.iter().map(renamed).collect(),
                    )
                })
                .collect(),
            final_states: self.final_states.iter().map(renamed).collect(),
        }
    }
}

/// `a | b` is the union.
impl BitOr for &Nfa {
    type Output = Nfa;

    fn bitor(self, other: &Nfa) -> Nfa {
        self.union(other)
    }
}

/// `a - b` is the difference.
impl Sub for &Nfa {
    type Output = Nfa;

    fn sub(self, other: &Nfa) -> Nfa {
        self.difference(other)
    }
}

/// `a + b` is the concatenation.
impl Add for &Nfa {
    type Output = Nfa;

    fn add(self, other: &Nfa) -> Nfa {
        self.concatenate(other)
    }
}
