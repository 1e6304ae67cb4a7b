//! The `dot` module contains the conversion of automata to the graphviz dot format.
//! The start state is drawn in blue, accepting states are drawn in red.

use std::io::Write;

use dot_writer::{Attributes, Color, DotWriter, RankDirection, Shape};

use crate::{dfa::format_state_set, nfa::Symbol, Dfa, Nfa};

/// Render the NFA to a graphviz dot format.
pub fn nfa_render<S: Symbol, W: Write>(nfa: &Nfa<S>, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for (state, edges) in nfa.graph().iter() {
        {
            let mut source_node = digraph.node_named(format!("s{}", state));
            source_node.set_label(&state.to_string());
            if state == nfa.start() {
                source_node
                    .set_shape(Shape::Circle)
                    .set_color(Color::Blue)
                    .set_pen_width(3.0);
            }
            if state == nfa.end() {
                source_node
                    .set_shape(Shape::Circle)
                    .set_color(Color::Red)
                    .set_pen_width(3.0);
            }
        }
        for edge in edges {
            digraph
                .edge(format!("s{}", state), format!("s{}", edge.to()))
                .attributes()
                .set_label(&edge.weight().to_string().escape_debug().to_string());
        }
    }
}

/// Render the DFA to a graphviz dot format.
/// Each state is labeled with its id and the NFA states it consists of.
pub fn dfa_render<S: Symbol, W: Write>(dfa: &Dfa<S>, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for state in dfa.states() {
        let mut source_node = digraph.node_named(format!("d{}", state.id()));
        source_node.set_label(&format!(
            "{}\n{}",
            state.id(),
            format_state_set(state.nfa_states())
        ));
        if state.id() == dfa.start() {
            source_node
                .set_shape(Shape::Circle)
                .set_color(Color::Blue)
                .set_pen_width(3.0);
        }
        if dfa.is_accepting(state.id()) {
            source_node.set_color(Color::Red).set_pen_width(3.0);
        }
    }
    for (source_id, edges) in dfa.graph().iter() {
        for edge in edges {
            digraph
                .edge(format!("d{}", source_id), format!("d{}", edge.to()))
                .attributes()
                .set_label(&edge.weight().to_string().escape_debug().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Session;

    #[test]
    fn test_nfa_render() {
        let session = Session::new();
        let nfa = session.literal('a').union(session.literal('b')).unwrap();
        let mut output = Vec::new();
        nfa_render(&nfa, "a_or_b", &mut output);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("digraph"));
        assert!(text.contains("a_or_b"));
        assert!(text.contains("ε"));
        for state in nfa.graph().vertices() {
            assert!(text.contains(&format!("s{}", state)));
        }
    }

    #[test]
    fn test_dfa_render() {
        let session = Session::new();
        let dfa = session
            .literal('a')
            .concat(session.literal('b').closure())
            .unwrap()
            .determinize()
            .unwrap();
        let mut output = Vec::new();
        dfa_render(&dfa, "ab_many", &mut output);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("digraph"));
        assert!(text.contains("ab_many"));
        assert!(!text.contains("ε"));
        for state in dfa.states() {
            assert!(text.contains(&format!("d{}", state.id())));
        }
    }
}
