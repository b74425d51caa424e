// DFA engine
//
// Deterministic finite automata as immutable values. The transition mapping
// is allowed to be partial; `complete` is the only place where missing
// entries are materialized into real sink transitions. Every transforming
// operation builds and returns a new automaton.

use crate::nfa::Nfa;
use crate::state::{fresh_sink_label, State, Symbol};
use crate::{AutomatonError, AutomatonResult};
use ahash::AHashMap;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::{Add, BitOr, Not, Sub};
use tracing::debug;

/// A deterministic finite automaton.
///
/// `transitions` is a partial mapping: a missing `(state, symbol)` key means
/// the automaton rejects there. The automaton is "complete" only when every
/// pair in `states x alphabet` is mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    /// Input symbols (never contains the epsilon marker)
    pub alphabet: BTreeSet<Symbol>,
    /// All states
    pub states: BTreeSet<State>,
    /// Start state, always an element of `states`
    pub initial_state: State,
    /// Partial mapping (state, symbol) -> state
    pub transitions: BTreeMap<(State, Symbol), State>,
    /// Accepting states, a subset of `states`
    pub final_states: BTreeSet<State>,
}

impl Dfa {
    /// Build a DFA from explicit sets, validating every structural
    /// invariant eagerly.
    pub fn new(
        alphabet: BTreeSet<Symbol>,
        states: BTreeSet<State>,
        initial_state: State,
        transitions: BTreeMap<(State, Symbol), State>,
        final_states: BTreeSet<State>,
    ) -> AutomatonResult<Self> {
        if !states.contains(&initial_state) {
            return Err(AutomatonError::InvalidAutomaton(format!(
                "initial state '{initial_state}' is not an element of states"
            )));
        }
        for ((source, symbol), target) in &transitions {
            if symbol.is_epsilon() {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "epsilon may not label a DFA transition (from state '{source}')"
                )));
            }
            if !states.contains(source) {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "transition source '{source}' is not an element of states"
                )));
            }
            if !states.contains(target) {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "transition target '{target}' is not an element of states"
                )));
            }
            if !alphabet.contains(symbol) {
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

    /// Build a DFA from transitions alone, inferring `states` as every
    /// mentioned state and `alphabet` as every transition symbol.
    pub fn create(
        initial_state: State,
        transitions: BTreeMap<(State, Symbol), State>,
        final_states: BTreeSet<State>,
    ) -> AutomatonResult<Self> {
        let mut states: BTreeSet<State> = [initial_state.clone()].into();
        let mut alphabet = BTreeSet::new();
        for ((source, symbol), target) in &transitions {
            if symbol.is_epsilon() {
                return Err(AutomatonError::InvalidAutomaton(format!(
                    "epsilon may not label a DFA transition (from state '{source}')"
                )));
            }
            states.insert(source.clone());
            states.insert(target.clone());
            alphabet.insert(symbol.clone());
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

    /// Look up the transition for `(state, symbol)`.
    ///
    /// Unlike `accept`, a missing entry is reported as
    /// [`AutomatonError::UndefinedTransition`] rather than folded into a
    /// rejection.
    pub fn step(&self, state: &State, symbol: &Symbol) -> AutomatonResult<&State> {
        self.transitions
            .get(&(state.clone(), symbol.clone()))
            .ok_or_else(|| AutomatonError::UndefinedTransition {
                state: state.clone(),
                symbol: symbol.clone(),
            })
    }

    /// Run the automaton over `input` from the initial state.
    ///
    /// Returns true iff the whole input is consumed and the run ends in a
    /// final state. Hitting an undefined transition rejects immediately.
    pub fn accept(&self, input: &[Symbol]) -> bool {
        let mut current = &self.initial_state;
        for symbol in input {
            match self.transitions.get(&(current.clone(), symbol.clone())) {
                Some(target) => current = target,
                None => return false,
            }
        }
        self.final_states.contains(current)
    }

    /// Make the transition mapping total over `states x alphabet`.
    ///
    /// If nothing is missing the automaton is returned unchanged. Otherwise
    /// a single fresh sink state is added, self-looping on every symbol, and
    /// every missing pair is routed to it.
    pub fn complete(&self) -> Dfa {
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
        debug!(sink = %sink, missing = missing.len(), "completing transition table");

        let mut states = self.states.clone();
        states.insert(sink.clone());
        let mut transitions = self.transitions.clone();
        for (state, symbol) in missing {
            transitions.insert((state, symbol), sink.clone());
        }
        for symbol in &self.alphabet {
            transitions.insert((sink.clone(), symbol.clone()), sink.clone());
        }
        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: self.initial_state.clone(),
            transitions,
            final_states: self.final_states.clone(),
        }
    }

    /// The automaton accepting exactly the words this one rejects.
    ///
    /// Works on the completed automaton: a state is final in the result iff
    /// it was non-final after completion.
    pub fn complement(&self) -> Dfa {
        let complete = self.complete();
        let final_states = complete
            .states
            .iter()
            .filter(|state| !complete.final_states.contains(*state))
            .cloned()
            .collect();
        Dfa {
            final_states,
            ..complete
        }
    }

    /// The automaton accepting words accepted by `self` or by `other`.
    pub fn union(&self, other: &Dfa) -> Dfa {
        self.product(other, |a, b| a || b)
    }

    /// The automaton accepting words accepted by both `self` and `other`.
    pub fn intersection(&self, other: &Dfa) -> Dfa {
        self.product(other, |a, b| a && b)
    }

    /// The automaton accepting words accepted by `self` but not by `other`.
    pub fn difference(&self, other: &Dfa) -> Dfa {
        self.product(other, |a, b| a && !b)
    }

    /// Synchronous product over the pairs reachable from the initial pair.
    ///
    /// Both operands are widened to the union alphabet and completed first,
    /// so every pair transition is defined.
    fn product<F>(&self, other: &Dfa, is_final: F) -> Dfa
    where
        F: Fn(bool, bool) -> bool,
    {
        let alphabet: BTreeSet<Symbol> = self.alphabet.union(&other.alphabet).cloned().collect();
        let left = self.widened(alphabet.clone()).complete();
        let right = other.widened(alphabet.clone()).complete();

        let initial_pair = (left.initial_state.clone(), right.initial_state.clone());
        let mut discovered: BTreeSet<(State, State)> = [initial_pair.clone()].into();
        let mut queue: VecDeque<(State, State)> = [initial_pair.clone()].into();
        let mut states = BTreeSet::new();
        let mut transitions = BTreeMap::new();
        let mut final_states = BTreeSet::new();

        while let Some((l, r)) = queue.pop_front() {
            let label = pair_label(&l, &r);
            states.insert(label.clone());
            if is_final(left.final_states.contains(&l), right.final_states.contains(&r)) {
                final_states.insert(label.clone());
            }
            for symbol in &alphabet {
                let next_l = left.transitions.get(&(l.clone(), symbol.clone()));
                let next_r = right.transitions.get(&(r.clone(), symbol.clone()));
                // Both lookups succeed on completed operands.
                if let (Some(next_l), Some(next_r)) = (next_l, next_r) {
                    transitions.insert(
                        (label.clone(), symbol.clone()),
                        pair_label(next_l, next_r),
                    );
                    let pair = (next_l.clone(), next_r.clone());
                    if discovered.insert(pair.clone()) {
                        queue.push_back(pair);
                    }
                }
            }
        }

        Dfa {
            alphabet,
            states,
            initial_state: pair_label(&initial_pair.0, &initial_pair.1),
            transitions,
            final_states,
        }
    }

    /// The automaton accepting words that split into a prefix accepted by
    /// `self` and a suffix accepted by `other`.
    ///
    /// Determinism is not preserved by a direct product for sequential
    /// composition, so both operands are lifted to NFAs, epsilon-linked, and
    /// determinized back; the result is canonically renamed.
    pub fn concatenate(&self, other: &Dfa) -> Dfa {
        self.to_nfa().concatenate(&other.to_nfa()).to_dfa().rename()
    }

    /// Relabel states canonically.
    ///
    /// Labels are assigned by a breadth-first traversal from the initial
    /// state, visiting symbols in sorted order; the n-th discovered state
    /// receives the n-th label of the sequence `A, B, ..., Z, AA, AB, ...`.
    /// States the traversal cannot reach are appended afterwards in sorted
    /// order so the relabeling stays a bijection. Two automata built by
    /// different code paths become structurally comparable after renaming.
    pub fn rename(&self) -> Dfa {
        let mut discovered: BTreeSet<State> = [self.initial_state.clone()].into();
        let mut queue: VecDeque<State> = [self.initial_state.clone()].into();
        let mut order = Vec::with_capacity(self.states.len());
        while let Some(state) = queue.pop_front() {
            for symbol in &self.alphabet {
                if let Some(target) = self.transitions.get(&(state.clone(), symbol.clone())) {
                    if discovered.insert(target.clone()) {
                        queue.push_back(target.clone());
                    }
                }
            }
            order.push(state);
        }
        for state in &self.states {
            if discovered.insert(state.clone()) {
                order.push(state.clone());
            }
        }

        let mapping: AHashMap<&State, State> = order
            .iter()
            .enumerate()
            .map(|(position, state)| (state, canonical_label(position)))
            .collect();
        let renamed = |state: &State| mapping[state].clone();

        Dfa {
            alphabet: self.alphabet.clone(),
            states: self.states.iter().map(renamed).collect(),
            initial_state: renamed(&self.initial_state),
            transitions: self
                .transitions
                .iter()
                .map(|((source, symbol), target)| {
                    ((renamed(source), symbol.clone()), renamed(target))
                })
                .collect(),
            final_states: self.final_states.iter().map(renamed).collect(),
        }
    }

    /// Drop every state unreachable from the initial state.
    ///
    /// The alphabet is recomputed from the surviving transitions, not simply
    /// preserved.
    pub fn remove_unreachable(&self) -> Dfa {
        let mut reachable: BTreeSet<State> = [self.initial_state.clone()].into();
        let mut queue: VecDeque<State> = [self.initial_state.clone()].into();
        while let Some(state) = queue.pop_front() {
            for ((source, _), target) in &self.transitions {
                if *source == state && reachable.insert(target.clone()) {
                    queue.push_back(target.clone());
                }
            }
        }

        let transitions: BTreeMap<(State, Symbol), State> = self
            .transitions
            .iter()
            .filter(|((source, _), _)| reachable.contains(source))
            .map(|(key, target)| (key.clone(), target.clone()))
            .collect();
        let alphabet = transitions
            .keys()
            .map(|(_, symbol)| symbol.clone())
            .collect();
        Dfa {
            alphabet,
            final_states: self
                .final_states
                .intersection(&reachable)
                .cloned()
                .collect(),
            states: reachable,
            initial_state: self.initial_state.clone(),
            transitions,
        }
    }

    /// Drop every state from which no final state is reachable.
    ///
    /// All transitions into dead states are removed first; the dead states
    /// themselves disappear once they become unreachable. The alphabet is
    /// recomputed from the surviving transitions and may end up empty.
    pub fn remove_dead(&self) -> Dfa {
        let mut alive = self.final_states.clone();
        loop {
            let mut changed = false;
            for ((source, _), target) in &self.transitions {
                if alive.contains(target) && alive.insert(source.clone()) {
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let pruned = Dfa {
            alphabet: self.alphabet.clone(),
            states: self.states.clone(),
            initial_state: self.initial_state.clone(),
            transitions: self
                .transitions
                .iter()
                .filter(|(_, target)| alive.contains(target))
                .map(|(key, target)| (key.clone(), target.clone()))
                .collect(),
            final_states: self.final_states.clone(),
        };
        pruned.remove_unreachable()
    }

    /// Merge states that no input can tell apart (table-filling
    /// minimization).
    ///
    /// Runs on the completed automaton so undefined transitions land in the
    /// implicit dead class. Pairs of (final, non-final) states seed the
    /// distinguishability relation, which is then iterated to a fixed point.
    /// The equivalence classes become the result's states, sorted by their
    /// minimal member and named `q0, q1, ...`.
    pub fn merge_nondistinguishable(&self) -> Dfa {
        let complete = self.complete();
        let states: Vec<State> = complete.states.iter().cloned().collect();
        let index: AHashMap<&State, usize> = states
            .iter()
            .enumerate()
            .map(|(position, state)| (state, position))
            .collect();
        let count = states.len();

        let mut distinguishable = vec![vec![false; count]; count];
        for i in 0..count {
            for j in (i + 1)..count {
                if complete.final_states.contains(&states[i])
                    != complete.final_states.contains(&states[j])
                {
                    distinguishable[i][j] = true;
                }
            }
        }
        loop {
            let mut changed = false;
            for i in 0..count {
                for j in (i + 1)..count {
                    if distinguishable[i][j] {
                        continue;
                    }
                    for symbol in &complete.alphabet {
                        let next_i = complete
                            .transitions
                            .get(&(states[i].clone(), symbol.clone()));
                        let next_j = complete
                            .transitions
                            .get(&(states[j].clone(), symbol.clone()));
                        if let (Some(next_i), Some(next_j)) = (next_i, next_j) {
                            let (a, b) = ordered(index[next_i], index[next_j]);
                            if a != b && distinguishable[a][b] {
                                distinguishable[i][j] = true;
                                changed = true;
                                break;
                            }
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        // Group into equivalence classes; states come sorted, so class ids
        // follow the order of each class's minimal member.
        let mut class_of = vec![0usize; count];
        let mut class_count = 0usize;
        for i in 0..count {
            let earlier = (0..i).find(|&j| !distinguishable[j][i]);
            class_of[i] = match earlier {
                Some(j) => class_of[j],
                None => {
                    class_count += 1;
                    class_count - 1
                }
            };
        }
        debug!(
            states = count,
            classes = class_count,
            "table-filling minimization finished"
        );

        let class_label = |state: &State| State::new(format!("q{}", class_of[index[state]]));
        Dfa {
            alphabet: complete.alphabet.clone(),
            states: (0..class_count)
                .map(|class| State::new(format!("q{class}")))
                .collect(),
            initial_state: class_label(&complete.initial_state),
            transitions: complete
                .transitions
                .iter()
                .map(|((source, symbol), target)| {
                    ((class_label(source), symbol.clone()), class_label(target))
                })
                .collect(),
            final_states: complete.final_states.iter().map(class_label).collect(),
        }
    }

    /// Embed into an NFA: every target becomes a singleton set, no epsilon
    /// transitions are introduced.
    pub fn to_nfa(&self) -> Nfa {
        Nfa {
            alphabet: self.alphabet.clone(),
            states: self.states.clone(),
            initial_state: self.initial_state.clone(),
            transitions: self
                .transitions
                .iter()
                .map(|(key, target)| (key.clone(), [target.clone()].into()))
                .collect(),
            final_states: self.final_states.clone(),
        }
    }

    /// Whether `self` and `other` accept the same language.
    ///
    /// Both differences are built over reachable pairs only, so an empty
    /// final-state set means no accepted word separates the two.
    pub fn equivalent(&self, other: &Dfa) -> bool {
        self.difference(other).final_states.is_empty()
            && other.difference(self).final_states.is_empty()
    }

    fn widened(&self, alphabet: BTreeSet<Symbol>) -> Dfa {
        Dfa {
            alphabet,
            ..self.clone()
        }
    }
}

/// `!dfa` is the complement.
impl Not for &Dfa {
    type Output = Dfa;

    fn not(self) -> Dfa {
        self.complement()
    }
}

/// `a | b` is the union.
impl BitOr for &Dfa {
    type Output = Dfa;

    fn bitor(self, other: &Dfa) -> Dfa {
        self.union(other)
    }
}

/// `a - b` is the difference.
impl Sub for &Dfa {
    type Output = Dfa;

    fn sub(self, other: &Dfa) -> Dfa {
        self.difference(other)
    }
}

/// `a + b` is the concatenation.
impl Add for &Dfa {
    type Output = Dfa;

    fn add(self, other: &Dfa) -> Dfa {
        self.concatenate(other)
    }
}

fn pair_label(left: &State, right: &State) -> State {
    State::new(format!("({left},{right})"))
}

/// The n-th canonical label: A, B, ..., Z, AA, AB, ...
fn canonical_label(mut index: usize) -> State {
    let mut label = String::new();
    loop {
        label.insert(0, (b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    State::new(label)
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(label: &str) -> State {
        State::new(label)
    }

    fn sy(label: &str) -> Symbol {
        Symbol::new(label)
    }

    fn word(input: &str) -> Vec<Symbol> {
        input.chars().map(|c| Symbol::new(c.to_string())).collect()
    }

    // Accepts binary words whose value is congruent to 1, 2 or 3 mod 6.
    fn sample_automaton() -> Dfa {
        Dfa::new(
            [sy("0"), sy("1")].into(),
            ["q0", "q1", "q2", "q3", "q4", "q5"].map(st).into(),
            st("q0"),
            [
                ((st("q0"), sy("0")), st("q0")),
                ((st("q0"), sy("1")), st("q1")),
                ((st("q1"), sy("0")), st("q2")),
                ((st("q1"), sy("1")), st("q3")),
                ((st("q2"), sy("0")), st("q4")),
                ((st("q2"), sy("1")), st("q5")),
                ((st("q3"), sy("0")), st("q0")),
                ((st("q3"), sy("1")), st("q1")),
                ((st("q4"), sy("0")), st("q2")),
                ((st("q4"), sy("1")), st("q3")),
                ((st("q5"), sy("0")), st("q4")),
                ((st("q5"), sy("1")), st("q5")),
            ]
            .into(),
            [st("q1"), st("q2"), st("q3")].into(),
        )
        .unwrap()
    }

    fn one_transition(symbol: &str) -> Dfa {
        Dfa::create(
            st("q0"),
            [((st("q0"), sy(symbol)), st("q1"))].into(),
            [st("q1")].into(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_infers_states_and_alphabet() {
        let automaton = one_transition("a");
        assert_eq!(BTreeSet::from([sy("a")]), automaton.alphabet);
        assert_eq!(BTreeSet::from([st("q0"), st("q1")]), automaton.states);
    }

    #[test]
    fn test_create_rejects_epsilon() {
        let result = Dfa::create(
            st("q0"),
            [((st("q0"), Symbol::epsilon()), st("q1"))].into(),
            [st("q1")].into(),
        );
        assert!(matches!(result, Err(AutomatonError::InvalidAutomaton(_))));
    }

    #[test]
    fn test_new_rejects_foreign_initial_state() {
        let result = Dfa::new(
            [sy("a")].into(),
            [st("q0")].into(),
            st("q9"),
            BTreeMap::new(),
            BTreeSet::new(),
        );
        assert!(matches!(result, Err(AutomatonError::InvalidAutomaton(_))));
    }

    #[test]
    fn test_new_rejects_unlisted_symbol() {
        let result = Dfa::new(
            [sy("a")].into(),
            [st("q0"), st("q1")].into(),
            st("q0"),
            [((st("q0"), sy("b")), st("q1"))].into(),
            BTreeSet::new(),
        );
        assert!(matches!(result, Err(AutomatonError::InvalidAutomaton(_))));
    }

    #[test]
    fn test_step() {
        let automaton = sample_automaton();
        assert_eq!(&st("q0"), automaton.step(&st("q0"), &sy("0")).unwrap());
    }

    #[test]
    fn test_step_reports_undefined_transition() {
        let automaton = one_transition("a");
        assert_eq!(
            Err(AutomatonError::UndefinedTransition {
                state: st("q1"),
                symbol: sy("a"),
            }),
            automaton.step(&st("q1"), &sy("a")).map(State::clone)
        );
    }

    #[test]
    fn test_accept() {
        let automaton = sample_automaton();
        assert!(!automaton.accept(&word("101")));
        assert!(automaton.accept(&word("111")));
    }

    #[test]
    fn test_accept_rejects_on_undefined_transition() {
        let automaton = one_transition("a");
        assert!(automaton.accept(&word("a")));
        assert!(!automaton.accept(&word("aa")));
        assert!(!automaton.accept(&word("")));
    }

    #[test]
    fn test_complete() {
        let complete = one_transition("a").complete();
        assert_eq!(
            BTreeSet::from([st("q0"), st("q1"), st("-")]),
            complete.states
        );
        assert_eq!(&st("-"), &complete.transitions[&(st("q1"), sy("a"))]);
        assert_eq!(&st("-"), &complete.transitions[&(st("-"), sy("a"))]);
    }

    #[test]
    fn test_complete_is_identity_on_total_automata() {
        let automaton = sample_automaton();
        assert_eq!(automaton, automaton.complete());
    }

    #[test]
    fn test_complement() {
        let complement = !&one_transition("a");
        assert_eq!(st("q0"), complement.initial_state);
        assert_eq!(
            BTreeMap::from([
                ((st("q0"), sy("a")), st("q1")),
                ((st("q1"), sy("a")), st("-")),
                ((st("-"), sy("a")), st("-")),
            ]),
            complement.transitions
        );
        assert_eq!(BTreeSet::from([st("q0"), st("-")]), complement.final_states);
    }

    #[test]
    fn test_concatenate() {
        let concatenation = &one_transition("a") + &one_transition("b");
        assert!(concatenation.accept(&word("ab")));
        assert!(!concatenation.accept(&word("aa")));
        assert!(!concatenation.accept(&word("bb")));
        assert!(!concatenation.accept(&word("")));

        let expected = Dfa::create(
            st("q0"),
            [
                ((st("q0"), sy("a")), st("q1")),
                ((st("q1"), sy("b")), st("q2")),
            ]
            .into(),
            [st("q2")].into(),
        )
        .unwrap();
        assert!(concatenation.equivalent(&expected));
    }

    #[test]
    fn test_union() {
        let union = &one_transition("a") | &one_transition("b");
        assert!(union.accept(&word("a")));
        assert!(union.accept(&word("b")));
        assert!(!union.accept(&word("aa")));
        assert!(!union.accept(&word("ab")));

        let expected = Dfa::create(
            st("q0"),
            [
                ((st("q0"), sy("a")), st("q1")),
                ((st("q0"), sy("b")), st("q1")),
            ]
            .into(),
            [st("q1")].into(),
        )
        .unwrap();
        assert!(union.equivalent(&expected));
    }

    #[test]
    fn test_difference() {
        // a* minus a = empty word or two-and-more a's
        let all = Dfa::create(
            st("q0"),
            [((st("q0"), sy("a")), st("q0"))].into(),
            [st("q0")].into(),
        )
        .unwrap();
        let single = one_transition("a");

        let difference = &all - &single;
        assert!(difference.accept(&word("")));
        assert!(difference.accept(&word("aa")));
        assert!(!difference.accept(&word("a")));

        let expected = Dfa::create(
            st("q0"),
            [
                ((st("q0"), sy("a")), st("q1")),
                ((st("q1"), sy("a")), st("q2")),
                ((st("q2"), sy("a")), st("q2")),
            ]
            .into(),
            [st("q0"), st("q2")].into(),
        )
        .unwrap();
        assert!(difference.equivalent(&expected));
    }

    #[test]
    fn test_intersection() {
        // (a|b)* with at least one a, intersected with single-symbol words
        let single = &one_transition("a") | &one_transition("b");
        let with_a = Dfa::create(
            st("q0"),
            [
                ((st("q0"), sy("a")), st("q1")),
                ((st("q0"), sy("b")), st("q0")),
                ((st("q1"), sy("a")), st("q1")),
                ((st("q1"), sy("b")), st("q1")),
            ]
            .into(),
            [st("q1")].into(),
        )
        .unwrap();

        let intersection = single.intersection(&with_a);
        assert!(intersection.accept(&word("a")));
        assert!(!intersection.accept(&word("b")));
        assert!(!intersection.accept(&word("ab")));
    }

    #[test]
    fn test_rename() {
        let automaton = Dfa::create(
            st("C"),
            [((st("C"), sy("a")), st("B")), ((st("C"), sy("b")), st("A"))].into(),
            [st("A")].into(),
        )
        .unwrap();

        let renamed = automaton.rename();
        assert_eq!(st("A"), renamed.initial_state);
        assert_eq!(
            BTreeMap::from([
                ((st("A"), sy("a")), st("B")),
                ((st("A"), sy("b")), st("C")),
            ]),
            renamed.transitions
        );
        assert_eq!(BTreeSet::from([st("C")]), renamed.final_states);
    }

    #[test]
    fn test_rename_is_idempotent() {
        let renamed = sample_automaton().rename();
        assert_eq!(renamed, renamed.rename());
    }

    #[test]
    fn test_remove_unreachable() {
        let automaton = Dfa::new(
            [sy("0"), sy("1")].into(),
            [st("q0"), st("q1"), st("q2")].into(),
            st("q0"),
            [
                ((st("q0"), sy("0")), st("q1")),
                ((st("q2"), sy("1")), st("q2")),
            ]
            .into(),
            [st("q1"), st("q2")].into(),
        )
        .unwrap();

        let cleaned = automaton.remove_unreachable();
        assert_eq!(BTreeSet::from([sy("0")]), cleaned.alphabet);
        assert_eq!(BTreeSet::from([st("q0"), st("q1")]), cleaned.states);
        assert_eq!(st("q0"), cleaned.initial_state);
        assert_eq!(
            BTreeMap::from([((st("q0"), sy("0")), st("q1"))]),
            cleaned.transitions
        );
        assert_eq!(BTreeSet::from([st("q1")]), cleaned.final_states);
    }

    #[test]
    fn test_remove_dead() {
        let automaton = Dfa::create(
            st("q0"),
            [
                ((st("q0"), sy("a")), st("q1")),
                ((st("q0"), sy("b")), st("q2")),
                ((st("q2"), sy("b")), st("q2")),
            ]
            .into(),
            [st("q1")].into(),
        )
        .unwrap();

        let cleaned = automaton.remove_dead();
        assert_eq!(BTreeSet::from([sy("a")]), cleaned.alphabet);
        assert_eq!(BTreeSet::from([st("q0"), st("q1")]), cleaned.states);
        assert_eq!(
            BTreeMap::from([((st("q0"), sy("a")), st("q1"))]),
            cleaned.transitions
        );
        assert_eq!(BTreeSet::from([st("q1")]), cleaned.final_states);
    }

    #[test]
    fn test_remove_dead_can_empty_the_alphabet() {
        let automaton = Dfa::create(
            st("q0"),
            [((st("q0"), sy("a")), st("q1"))].into(),
            BTreeSet::new(),
        )
        .unwrap();

        let cleaned = automaton.remove_dead();
        assert_eq!(BTreeSet::new(), cleaned.alphabet);
        assert_eq!(BTreeSet::from([st("q0")]), cleaned.states);
        assert!(cleaned.transitions.is_empty());
    }

    #[test]
    fn test_merge_nondistinguishable() {
        // Bloated six-state automaton for 0*10*, taken from the
        // minimization literature; it collapses to three states.
        let automaton = Dfa::create(
            st("q0"),
            [
                ((st("q0"), sy("0")), st("q1")),
                ((st("q0"), sy("1")), st("q2")),
                ((st("q1"), sy("0")), st("q0")),
                ((st("q1"), sy("1")), st("q3")),
                ((st("q2"), sy("0")), st("q4")),
                ((st("q2"), sy("1")), st("q5")),
                ((st("q3"), sy("0")), st("q4")),
                ((st("q3"), sy("1")), st("q5")),
                ((st("q4"), sy("0")), st("q4")),
                ((st("q4"), sy("1")), st("q5")),
                ((st("q5"), sy("0")), st("q5")),
                ((st("q5"), sy("1")), st("q5")),
            ]
            .into(),
            [st("q2"), st("q3"), st("q4")].into(),
        )
        .unwrap();

        let cleaned = automaton.merge_nondistinguishable();
        assert_eq!(
            BTreeSet::from([st("q0"), st("q1"), st("q2")]),
            cleaned.states
        );
        assert_eq!(1, cleaned.final_states.len());

        let initial = cleaned.initial_state.clone();
        let final_state = cleaned.final_states.iter().next().unwrap().clone();
        let other = cleaned
            .states
            .iter()
            .find(|s| **s != initial && **s != final_state)
            .unwrap()
            .clone();
        assert_eq!(
            BTreeMap::from([
                ((initial.clone(), sy("0")), initial.clone()),
                ((initial.clone(), sy("1")), final_state.clone()),
                ((final_state.clone(), sy("0")), final_state.clone()),
                ((final_state.clone(), sy("1")), other.clone()),
                ((other.clone(), sy("0")), other.clone()),
                ((other.clone(), sy("1")), other.clone()),
            ]),
            cleaned.transitions
        );
    }

    #[test]
    fn test_to_nfa() {
        let automaton = one_transition("a");
        let nfa = automaton.to_nfa();
        assert_eq!(automaton.initial_state, nfa.initial_state);
        assert_eq!(
            BTreeMap::from([((st("q0"), sy("a")), BTreeSet::from([st("q1")]))]),
            nfa.transitions
        );
        assert_eq!(automaton.final_states, nfa.final_states);
    }

    #[test]
    fn test_equivalent() {
        let automaton = sample_automaton();
        assert!(automaton.equivalent(&automaton.rename()));
        assert!(automaton.equivalent(&automaton.merge_nondistinguishable()));
        assert!(!automaton.equivalent(&one_transition("0")));
    }

    #[test]
    fn test_canonical_label_sequence() {
        assert_eq!(st("A"), canonical_label(0));
        assert_eq!(st("Z"), canonical_label(25));
        assert_eq!(st("AA"), canonical_label(26));
        assert_eq!(st("AZ"), canonical_label(51));
        assert_eq!(st("BA"), canonical_label(52));
    }
}
