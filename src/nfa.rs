//! This module contains the NFA (Non-deterministic Finite Automaton) implementation.
//! NFA fragments are created from single symbols and combined Thompson-style into larger
//! fragments. The finished fragment is later converted to a DFA (Deterministic Finite Automaton).

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Debug, Display},
};

use crate::{
    errors::invariant, graph::Edge, DeterminizeOptions, Dfa, Graph, Result, Session, StateId,
};

/// The bound for the symbols of an alphabet.
pub trait Symbol: Clone + Ord + Debug + Display {}

impl<T: Clone + Ord + Debug + Display> Symbol for T {}

/// The weight of an NFA edge.
/// Epsilon is its own variant and therefore can never be mistaken for a symbol of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label<S> {
    /// A transition that doesn't consume input.
    Epsilon,
    /// A transition that consumes the given symbol.
    Symbol(S),
}

impl<S> Label<S> {
    /// Returns true if this is the epsilon label.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Get the symbol of a non-epsilon label.
    pub fn symbol(&self) -> Option<&S> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(s) => Some(s),
        }
    }
}

impl<S: Display> Display for Label<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Epsilon => write!(f, "ε"),
            Label::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// A set of NFA states. The ordering makes the set its own canonical key.
pub type StateSet = BTreeSet<StateId>;

/// An NFA fragment with a distinguished start and end state.
///
/// Fragments are consumed by the combinators, so a fragment that has been merged into another
/// one can't be used anymore.
#[derive(Debug)]
pub struct Nfa<S> {
    session: Session,
    graph: Graph<StateId, Label<S>>,
    start: StateId,
    end: StateId,
    // The non-epsilon symbols used on the edges.
    alphabet: BTreeSet<S>,
}

impl<S: Symbol> Nfa<S> {
    pub(crate) fn literal(session: &Session, symbol: S) -> Self {
        let start = session.state();
        let end = session.state();
        let mut graph = Graph::new();
        graph.add_edge(start, end, Label::Symbol(symbol.clone()));
        Nfa {
            session: session.clone(),
            graph,
            start,
            end,
            alphabet: BTreeSet::from([symbol]),
        }
    }

    pub(crate) fn epsilon(session: &Session) -> Self {
        let start = session.state();
        let end = session.state();
        let mut graph = Graph::new();
        graph.add_edge(start, end, Label::Epsilon);
        Nfa {
            session: session.clone(),
            graph,
            start,
            end,
            alphabet: BTreeSet::new(),
        }
    }

    /// Assemble a fragment from a hand-built graph.
    ///
    /// The parts are validated, see [`Nfa::validate`]. The session won't hand out any label used
    /// in the graph afterwards.
    pub fn from_parts(
        session: &Session,
        graph: Graph<StateId, Label<S>>,
        start: StateId,
        end: StateId,
        alphabet: BTreeSet<S>,
    ) -> Result<Self> {
        let nfa = Nfa {
            session: session.clone(),
            graph,
            start,
            end,
            alphabet,
        };
        nfa.validate()?;
        if let Some(max) = nfa.graph.vertices().max() {
            session.reserve_through(max);
        }
        Ok(nfa)
    }

    /// Get the start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Get the end state. It is the only accepting state of the fragment.
    pub fn end(&self) -> StateId {
        self.end
    }

    /// Get the symbols used on the edges of the fragment.
    pub fn alphabet(&self) -> &BTreeSet<S> {
        &self.alphabet
    }

    /// Get the underlying graph.
    pub fn graph(&self) -> &Graph<StateId, Label<S>> {
        &self.graph
    }

    /// Get the session the fragment belongs to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Check the structural contract of the fragment:
    /// * start and end state are part of the graph
    /// * every edge points to a state of the graph
    /// * every edge weight is epsilon or a member of the alphabet
    pub fn validate(&self) -> Result<()> {
        for state in [self.start, self.end] {
            if !self.graph.contains(state) {
                return Err(invariant!("state {} is not part of the NFA", state));
            }
        }
        for (state, edges) in self.graph.iter() {
            for edge in edges {
                if !self.graph.contains(edge.to()) {
                    return Err(invariant!(
                        "edge {} -> {} points to a state outside the NFA",
                        state,
                        edge.to()
                    ));
                }
                if let Label::Symbol(symbol) = edge.weight() {
                    if !self.alphabet.contains(symbol) {
                        return Err(invariant!(
                            "edge {} -> {} is labeled with {:?} which is not in the alphabet",
                            state,
                            edge.to(),
                            symbol
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Kleene closure: the resulting fragment accepts zero or more repetitions of the language
    /// of this fragment.
    pub fn closure(mut self) -> Self {
        let start = self.session.state();
        let end = self.session.state();
        self.graph.add_edge(start, self.start, Label::Epsilon);
        self.graph.add_edge(start, end, Label::Epsilon);
        self.graph.add_edge(self.end, end, Label::Epsilon);
        // Enables the repetition
        self.graph.add_edge(self.end, self.start, Label::Epsilon);
        self.start = start;
        self.end = end;
        self
    }

    /// Sequential composition with `other`.
    ///
    /// No epsilon edge is inserted. Instead the outgoing edges of the start state of `other` are
    /// copied onto the end state of this fragment and the start state of `other` is dropped.
    pub fn concat(mut self, other: Nfa<S>) -> Result<Self> {
        let (other_start, other_end) = (other.start, other.end);
        self.merge(other)?;
        let bridge = self
            .graph
            .edges_of(other_start)
            .iter()
            .map(|edge| (edge.to(), edge.weight().clone()))
            .collect::<Vec<_>>();
        for (to, weight) in bridge {
            self.graph.add_edge(self.end, to, weight);
        }
        self.graph.remove(other_start);
        self.end = other_end;
        Ok(self)
    }

    /// Like [`Nfa::concat`], but an absent fragment leaves this one unchanged.
    pub fn maybe_concat(self, other: Option<Nfa<S>>) -> Result<Self> {
        match other {
            Some(other) => self.concat(other),
            None => Ok(self),
        }
    }

    /// Alternation: the resulting fragment accepts the language of this fragment as well as the
    /// language of `other`.
    pub fn union(mut self, other: Nfa<S>) -> Result<Self> {
        let (other_start, other_end) = (other.start, other.end);
        self.merge(other)?;
        let start = self.session.state();
        let end = self.session.state();
        self.graph.add_edge(start, self.start, Label::Epsilon);
        self.graph.add_edge(start, other_start, Label::Epsilon);
        self.graph.add_edge(self.end, end, Label::Epsilon);
        self.graph.add_edge(other_end, end, Label::Epsilon);
        self.start = start;
        self.end = end;
        Ok(self)
    }

    /// Like [`Nfa::union`], but an absent fragment leaves this one unchanged.
    pub fn maybe_union(self, other: Option<Nfa<S>>) -> Result<Self> {
        match other {
            Some(other) => self.union(other),
            None => Ok(self),
        }
    }

    // Move the states and edges of the given fragment into this one and thereby consume it.
    fn merge(&mut self, other: Nfa<S>) -> Result<()> {
        if !self.session.is_same(&other.session) {
            return Err(invariant!(
                "fragments of different sessions can't be combined"
            ));
        }
        // Absorbing a shared state would replace its edges with the edges of `other`.
        if let Some(state) = other.graph.vertices().find(|state| self.graph.contains(*state)) {
            return Err(invariant!("state {} is part of both fragments", state));
        }
        self.graph.absorb(other.graph);
        self.alphabet.extend(other.alphabet);
        Ok(())
    }

    /// Create a copy of this fragment with fresh state labels from the same session.
    pub fn replicate(&self) -> Self {
        let mut renumbered: BTreeMap<StateId, StateId> = BTreeMap::new();
        let mut relabel = |state: StateId| -> StateId {
            *renumbered
                .entry(state)
                .or_insert_with(|| self.session.state())
        };
        let mut graph = Graph::new();
        for (state, edges) in self.graph.iter() {
            let from = relabel(state);
            graph.add_vertex(from);
            for edge in edges {
                graph.add_edge(from, relabel(edge.to()), edge.weight().clone());
            }
        }
        Nfa {
            session: self.session.clone(),
            graph,
            start: relabel(self.start),
            end: relabel(self.end),
            alphabet: self.alphabet.clone(),
        }
    }

    fn edges_checked(&self, state: StateId) -> Result<&[Edge<StateId, Label<S>>]> {
        if !self.graph.contains(state) {
            return Err(invariant!("state {} is not part of the NFA", state));
        }
        Ok(self.graph.edges_of(state))
    }

    /// Get all states reachable from the given states using only epsilon edges.
    /// The given states are part of the result.
    pub fn epsilon_closure(&self, states: &StateSet) -> Result<StateSet> {
        let mut stack: Vec<StateId> = states.iter().copied().collect();
        let mut result = states.clone();
        while let Some(state) = stack.pop() {
            for edge in self.edges_checked(state)? {
                if edge.weight().is_epsilon() && result.insert(edge.to()) {
                    stack.push(edge.to());
                }
            }
        }
        Ok(result)
    }

    /// Get all states reachable from the given states via exactly one edge labeled `symbol`.
    pub fn move_set(&self, states: &StateSet, symbol: &S) -> Result<StateSet> {
        let mut result = StateSet::new();
        for state in states {
            for edge in self.edges_checked(*state)? {
                if edge.weight().symbol() == Some(symbol) {
                    result.insert(edge.to());
                }
            }
        }
        Ok(result)
    }

    /// Simulate the NFA on the given input.
    /// Returns true if the end state is reached after consuming the whole input.
    pub fn accepts<I>(&self, input: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
    {
        let mut current = self.epsilon_closure(&StateSet::from([self.start]))?;
        for symbol in input {
            if current.is_empty() {
                break;
            }
            current = self.epsilon_closure(&self.move_set(&current, &symbol)?)?;
        }
        Ok(current.contains(&self.end))
    }

    /// Convert the NFA into a DFA without a limit on the number of DFA states.
    pub fn determinize(&self) -> Result<Dfa<S>> {
        Dfa::from_nfa(self, &DeterminizeOptions::default())
    }

    /// Convert the NFA into a DFA with the given options.
    pub fn determinize_with(&self, options: &DeterminizeOptions) -> Result<Dfa<S>> {
        Dfa::from_nfa(self, options)
    }
}
