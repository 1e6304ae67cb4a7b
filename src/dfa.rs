//! This module contains the DFA implementation.
//! The DFA is generated from an NFA using the subset construction algorithm. Each DFA state
//! stands for a set of NFA states. Two derivations that arrive at the same set of NFA states
//! end up in the same DFA state.

use itertools::Itertools;
use log::{debug, trace};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    time::Instant,
};

use crate::{
    nfa::{StateSet, Symbol},
    DeterminizeOptions, DfaStateId, Graph, Nfa, Result, StateId,
};

// The type definitions for the minimization.
pub(crate) type StateGroup = BTreeSet<DfaStateId>;
pub(crate) type Partition = Vec<StateGroup>;

// For each symbol of the alphabet the index of the partition group the transition leads to.
// States with equal keys can't be distinguished by the current partition.
type TransitionsToGroups = Vec<Option<usize>>;

/// Render a set of NFA states as `{1,2,3}`.
pub(crate) fn format_state_set(states: &StateSet) -> String {
    format!("{{{}}}", states.iter().join(","))
}

// All strings over the alphabet up to the given length.
#[cfg(test)]
pub(crate) fn strings(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut result = vec![String::new()];
    let mut current = vec![String::new()];
    for _ in 0..max_len {
        current = current
            .iter()
            .flat_map(|prefix| {
                alphabet.iter().map(move |c| {
                    let mut s = prefix.clone();
                    s.push(*c);
                    s
                })
            })
            .collect();
        result.extend(current.iter().cloned());
    }
    result
}

/// A state of the DFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    id: DfaStateId,
    // The NFA states that constitute this DFA state.
    nfa_states: StateSet,
}

impl DfaState {
    fn new(id: DfaStateId, nfa_states: StateSet) -> Self {
        DfaState { id, nfa_states }
    }

    /// Get the id of the DFA state.
    pub fn id(&self) -> DfaStateId {
        self.id
    }

    /// Get the NFA states that constitute the DFA state.
    pub fn nfa_states(&self) -> &StateSet {
        &self.nfa_states
    }
}

/// The DFA implementation.
///
/// The transition function is partial: a missing edge for a symbol means the input is rejected.
/// There is at most one outgoing edge per symbol from each state.
#[derive(Debug, Clone)]
pub struct Dfa<S> {
    // The states of the DFA. The start state is always the first state in the vector, i.e. state 0.
    states: Vec<DfaState>,
    // Every state that contains the end state of the NFA.
    accepting_states: BTreeSet<DfaStateId>,
    // The alphabet of the NFA the DFA was created from.
    alphabet: BTreeSet<S>,
    graph: Graph<DfaStateId, S>,
}

impl<S: Symbol> Dfa<S> {
    /// Create a DFA from an NFA.
    /// The DFA is created using the subset construction algorithm. The NFA is left untouched.
    pub fn from_nfa(nfa: &Nfa<S>, options: &DeterminizeOptions) -> Result<Self> {
        let now = Instant::now();
        nfa.validate()?;

        let mut dfa = Dfa {
            states: Vec::new(),
            accepting_states: BTreeSet::new(),
            alphabet: nfa.alphabet().clone(),
            graph: Graph::new(),
        };
        // Maps the canonical set of NFA states to its DFA state.
        let mut known_states: HashMap<StateSet, DfaStateId> = HashMap::new();

        // The initial state of the DFA is the epsilon closure of the start state of the NFA.
        let initial_states = nfa.epsilon_closure(&StateSet::from([nfa.start()]))?;
        dfa.add_state_if_new(initial_states, nfa.end(), &mut known_states, options)?;

        // The states are processed in the order they were added. New states are appended, so
        // every state with an index below `next_state` is complete.
        let mut next_state = 0;
        while next_state < dfa.states.len() {
            let state_id = DfaStateId::new(next_state);
            next_state += 1;
            let nfa_states = dfa.states[state_id].nfa_states.clone();
            for symbol in nfa.alphabet() {
                let target_states =
                    nfa.epsilon_closure(&nfa.move_set(&nfa_states, symbol)?)?;
                if target_states.is_empty() {
                    continue;
                }
                let target_state =
                    dfa.add_state_if_new(target_states, nfa.end(), &mut known_states, options)?;
                dfa.graph.add_edge(state_id, target_state, symbol.clone());
            }
        }

        debug!(
            "DFA with {} states ({} accepting) from NFA with {} states",
            dfa.states.len(),
            dfa.accepting_states.len(),
            nfa.graph().len()
        );
        trace!(
            "Subset construction took {} milliseconds.",
            now.elapsed().as_millis()
        );
        Ok(dfa)
    }

    /// Add a state to the DFA if it does not already exist.
    /// The state is identified by the set of NFA states that constitute the DFA state.
    fn add_state_if_new(
        &mut self,
        nfa_states: StateSet,
        nfa_end: StateId,
        known_states: &mut HashMap<StateSet, DfaStateId>,
        options: &DeterminizeOptions,
    ) -> Result<DfaStateId> {
        if let Some(state_id) = known_states.get(&nfa_states) {
            return Ok(*state_id);
        }
        options.check_state_count(self.states.len() + 1)?;

        let state_id = DfaStateId::new(self.states.len());
        trace!("Add state: {}: {}", state_id, format_state_set(&nfa_states));
        if nfa_states.contains(&nfa_end) {
            self.accepting_states.insert(state_id);
        }
        known_states.insert(nfa_states.clone(), state_id);
        self.graph.add_vertex(state_id);
        self.states.push(DfaState::new(state_id, nfa_states));
        Ok(state_id)
    }

    /// Get the start state.
    pub fn start(&self) -> DfaStateId {
        DfaStateId::default()
    }

    /// Get the number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the DFA has no states. This is never the case for a DFA created from an
    /// NFA because it has at least its start state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Get the states of the DFA.
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Get the NFA states that constitute the given DFA state.
    pub fn members(&self, state_id: DfaStateId) -> Option<&StateSet> {
        self.states
            .get(state_id.as_usize())
            .map(|state| &state.nfa_states)
    }

    /// Get the transition graph.
    pub fn graph(&self) -> &Graph<DfaStateId, S> {
        &self.graph
    }

    /// Get the alphabet.
    pub fn alphabet(&self) -> &BTreeSet<S> {
        &self.alphabet
    }

    /// Get the accepting states.
    pub fn accepting_states(&self) -> &BTreeSet<DfaStateId> {
        &self.accepting_states
    }

    /// Returns true if the given state is an accepting state.
    pub fn is_accepting(&self, state_id: DfaStateId) -> bool {
        self.accepting_states.contains(&state_id)
    }

    /// Get the target of the transition from `state_id` on `symbol`, if there is one.
    pub fn transition(&self, state_id: DfaStateId, symbol: &S) -> Option<DfaStateId> {
        self.graph
            .edges_of(state_id)
            .iter()
            .find(|edge| edge.weight() == symbol)
            .map(|edge| edge.to())
    }

    /// Run the DFA on the given input.
    /// Returns true if an accepting state is reached after consuming the whole input.
    pub fn accepts<I>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = S>,
    {
        let mut current = self.start();
        for symbol in input {
            match self.transition(current, &symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_accepting(current)
    }

    /// Minimize the DFA.
    ///
    /// Each state of the minimized DFA is a group of indistinguishable states of this DFA. Its
    /// NFA states are the union of the NFA states of the group. The start state stays state 0.
    ///
    /// States from which no accepting state can be reached are dropped together with the edges
    /// leading to them, except for the start state. A missing transition and a transition into
    /// such a dead state reject the same inputs.
    pub fn minimize(&self) -> Self {
        let now = Instant::now();
        let live = self.live_states();
        let mut partition = self.calculate_initial_partition(&live);
        // Groups are only ever split, so an unchanged number of groups means a stable partition.
        loop {
            let new_partition = self.calculate_new_partition(&partition, &live);
            let changed = new_partition.len() != partition.len();
            partition = new_partition;
            if !changed {
                break;
            }
        }
        let dfa = self.create_from_partition(partition, &live);
        debug!(
            "Minimized DFA from {} to {} states",
            self.states.len(),
            dfa.states.len()
        );
        trace!(
            "Minimization took {} milliseconds.",
            now.elapsed().as_millis()
        );
        dfa
    }

    // For each state whether an accepting state can be reached from it.
    fn live_states(&self) -> Vec<bool> {
        let mut predecessors: Vec<Vec<DfaStateId>> = vec![Vec::new(); self.states.len()];
        for (source_id, edges) in self.graph.iter() {
            for edge in edges {
                predecessors[edge.to()].push(source_id);
            }
        }
        let mut live = vec![false; self.states.len()];
        let mut stack: Vec<DfaStateId> = self.accepting_states.iter().copied().collect();
        for state_id in &stack {
            live[state_id.as_usize()] = true;
        }
        while let Some(state_id) = stack.pop() {
            for predecessor in &predecessors[state_id] {
                if !live[predecessor.as_usize()] {
                    live[predecessor.as_usize()] = true;
                    stack.push(*predecessor);
                }
            }
        }
        live
    }

    // Like `transition`, but a transition into a dead state counts as missing.
    fn live_transition(
        &self,
        state_id: DfaStateId,
        symbol: &S,
        live: &[bool],
    ) -> Option<DfaStateId> {
        self.transition(state_id, symbol)
            .filter(|target| live[target.as_usize()])
    }

    // Accepting states form one group, all other states form another one. Dead states are left
    // out, apart from the start state.
    fn calculate_initial_partition(&self, live: &[bool]) -> Partition {
        let (accepting, non_accepting): (StateGroup, StateGroup) = self
            .states
            .iter()
            .map(|state| state.id)
            .filter(|state_id| live[state_id.as_usize()] || *state_id == self.start())
            .partition(|state_id| self.is_accepting(*state_id));
        [non_accepting, accepting]
            .into_iter()
            .filter(|group| !group.is_empty())
            .collect()
    }

    fn calculate_new_partition(&self, partition: &[StateGroup], live: &[bool]) -> Partition {
        let group_of = Self::group_index(self.states.len(), partition);
        partition
            .iter()
            .flat_map(|group| self.split_group(group, &group_of, live))
            .collect()
    }

    // Split a group into subgroups of states whose transitions lead into the same groups.
    fn split_group(&self, group: &StateGroup, group_of: &[usize], live: &[bool]) -> Partition {
        if group.len() == 1 {
            return vec![group.clone()];
        }
        let mut transition_map_to_states: BTreeMap<TransitionsToGroups, StateGroup> =
            BTreeMap::new();
        for state_id in group {
            let key = self
                .alphabet
                .iter()
                .map(|symbol| {
                    self.live_transition(*state_id, symbol, live)
                        .map(|target| group_of[target.as_usize()])
                })
                .collect::<TransitionsToGroups>();
            transition_map_to_states
                .entry(key)
                .or_default()
                .insert(*state_id);
        }
        transition_map_to_states.into_values().collect()
    }

    // For each state the index of the group it belongs to.
    fn group_index(state_count: usize, partition: &[StateGroup]) -> Vec<usize> {
        let mut group_of = vec![0; state_count];
        for (index, group) in partition.iter().enumerate() {
            for state_id in group {
                group_of[state_id.as_usize()] = index;
            }
        }
        group_of
    }

    // Each group becomes one state. The groups are numbered by their smallest member, so the
    // group of the start state becomes the new start state.
    fn create_from_partition(&self, partition: Partition, live: &[bool]) -> Self {
        let partition = partition
            .into_iter()
            .sorted_by_key(|group| group.first().copied())
            .collect::<Partition>();
        let group_of = Self::group_index(self.states.len(), &partition);

        let mut dfa = Dfa {
            states: Vec::with_capacity(partition.len()),
            accepting_states: BTreeSet::new(),
            alphabet: self.alphabet.clone(),
            graph: Graph::new(),
        };
        for (index, group) in partition.iter().enumerate() {
            let state_id = DfaStateId::new(index);
            let nfa_states = group
                .iter()
                .flat_map(|member| self.states[*member].nfa_states.iter().copied())
                .collect::<StateSet>();
            if group.iter().any(|member| self.is_accepting(*member)) {
                dfa.accepting_states.insert(state_id);
            }
            dfa.graph.add_vertex(state_id);
            dfa.states.push(DfaState::new(state_id, nfa_states));

            // All members of a group behave the same, the first one represents the group.
            if let Some(representative) = group.first() {
                for edge in self
                    .graph
                    .edges_of(*representative)
                    .iter()
                    .filter(|edge| live[edge.to().as_usize()])
                {
                    let target = DfaStateId::new(group_of[edge.to().as_usize()]);
                    dfa.graph.add_edge(state_id, target, edge.weight().clone());
                }
            }
        }
        dfa
    }
}

impl<S: Symbol> TryFrom<&Nfa<S>> for Dfa<S> {
    type Error = crate::FaError;

    fn try_from(nfa: &Nfa<S>) -> Result<Self> {
        Dfa::from_nfa(nfa, &DeterminizeOptions::default())
    }
}

impl<S: Symbol> std::fmt::Display for Dfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DFA")?;
        writeln!(f, "States:")?;
        for state in &self.states {
            writeln!(f, "{}: {}", state.id, format_state_set(&state.nfa_states))?;
        }
        writeln!(f, "Accepting states:")?;
        writeln!(f, "{}", self.accepting_states.iter().join(", "))?;
        writeln!(f, "Transitions:")?;
        for (source_id, edges) in self.graph.iter() {
            if edges.is_empty() {
                continue;
            }
            write!(f, "{} ->", source_id)?;
            for edge in edges {
                write!(f, " {}:{}", edge.weight(), edge.to())?;
            }
            writeln!(f)?
        }
        Ok(())
    }
}
