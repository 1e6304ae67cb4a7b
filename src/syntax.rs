//! This module builds NFA fragments from regular expressions.
//! We use the `regex_syntax` crate to parse the regex syntax. Only the subset of the syntax that
//! can be expressed with literals, concatenation, alternation and closure is supported.

use log::trace;
use regex_syntax::ast::{parse::Parser, Ast, GroupKind, RepetitionKind, RepetitionRange};
use std::time::Instant;

use crate::{FaError, FaErrorKind, Nfa, Result, Session};

macro_rules! unsupported {
    ($feature:expr) => {
        FaError::new(FaErrorKind::UnsupportedFeature($feature.to_string()))
    };
}

/// Parse the regex syntax into an abstract syntax tree (AST).
/// # Errors
/// An error is returned if the regex syntax is invalid.
pub fn parse_regex_syntax(input: &str) -> Result<Ast> {
    let now = Instant::now();
    let syntax_tree = Parser::new().parse(input)?;
    trace!("Parsing took {} milliseconds.", now.elapsed().as_millis());
    Ok(syntax_tree)
}

impl Session {
    /// Parse the pattern and build an NFA fragment for it.
    /// # Errors
    /// An error is returned if the regex syntax is invalid or uses features that are not
    /// supported, like character classes, anchors or flags.
    pub fn compile_regex(&self, pattern: &str) -> Result<Nfa<char>> {
        let ast = parse_regex_syntax(pattern)?;
        self.compile_ast(&ast)
    }

    /// Build an NFA fragment for the given AST.
    pub fn compile_ast(&self, ast: &Ast) -> Result<Nfa<char>> {
        match ast {
            Ast::Empty(_) => Ok(self.epsilon()),
            Ast::Literal(l) => Ok(self.literal(l.c)),
            Ast::Group(g) => {
                if let GroupKind::NonCapturing(flags) = &g.kind {
                    if !flags.items.is_empty() {
                        return Err(unsupported!(format!("Group flags {:?}", flags.items)));
                    }
                }
                self.compile_ast(&g.ast)
            }
            Ast::Concat(c) => {
                let parts = c
                    .asts
                    .iter()
                    .map(|ast| self.compile_ast(ast))
                    .collect::<Result<Vec<_>>>()?;
                self.concat_all(parts)
            }
            Ast::Alternation(a) => {
                let mut alternatives = a.asts.iter();
                let mut nfa = match alternatives.next() {
                    Some(ast) => self.compile_ast(ast)?,
                    None => return Ok(self.epsilon()),
                };
                for ast in alternatives {
                    nfa = nfa.union(self.compile_ast(ast)?)?;
                }
                Ok(nfa)
            }
            Ast::Repetition(r) => {
                let nfa = self.compile_ast(&r.ast)?;
                match &r.op.kind {
                    RepetitionKind::ZeroOrOne => self.repeat(nfa, 0, Some(1)),
                    RepetitionKind::ZeroOrMore => Ok(nfa.closure()),
                    RepetitionKind::OneOrMore => self.repeat(nfa, 1, None),
                    RepetitionKind::Range(range) => match range {
                        RepetitionRange::Exactly(c) => self.repeat(nfa, *c, Some(*c)),
                        RepetitionRange::AtLeast(c) => self.repeat(nfa, *c, None),
                        RepetitionRange::Bounded(least, most) => {
                            self.repeat(nfa, *least, Some(*most))
                        }
                    },
                }
            }
            Ast::Flags(_) => Err(unsupported!(format!("{:?}", ast))),
            Ast::Dot(_) => Err(unsupported!("Dot")),
            Ast::Assertion(a) => Err(unsupported!(format!("Assertion {:?}", a.kind))),
            Ast::ClassUnicode(_) | Ast::ClassPerl(_) | Ast::ClassBracketed(_) => {
                Err(unsupported!(format!("Character class {}", ast)))
            }
        }
    }

    // At least `least` copies of the fragment followed by either a closure (no upper bound) or
    // `most - least` optional copies.
    fn repeat(&self, nfa: Nfa<char>, least: u32, most: Option<u32>) -> Result<Nfa<char>> {
        let mut parts = (0..least).map(|_| nfa.replicate()).collect::<Vec<_>>();
        match most {
            None => parts.push(nfa.replicate().closure()),
            Some(most) => {
                for _ in least..most {
                    parts.push(nfa.replicate().union(self.epsilon())?);
                }
            }
        }
        self.concat_all(parts)
    }

    fn concat_all(&self, parts: Vec<Nfa<char>>) -> Result<Nfa<char>> {
        let mut parts = parts.into_iter();
        let Some(mut nfa) = parts.next() else {
            return Ok(self.epsilon());
        };
        for part in parts {
            nfa = nfa.concat(part)?;
        }
        Ok(nfa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dfa::{format_state_set, strings},
        Dfa,
    };
    use regex::Regex;

    // Initialize the logger for the tests
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_parse_regex_syntax_valid() {
        let ast = parse_regex_syntax("a(b|c)*").unwrap();
        assert!(matches!(ast, Ast::Concat(_)));
    }

    #[test]
    fn test_parse_regex_syntax_invalid() {
        for input in ["(a", "a{3,2}", "*"] {
            let error = parse_regex_syntax(input).unwrap_err();
            assert!(
                matches!(error.kind(), FaErrorKind::RegexSyntaxError(_)),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_unsupported_features() {
        let session = Session::new();
        for pattern in ["[a-z]", ".", "^a", r"\d", "(?i)a", "(?i:a)"] {
            let error = session.compile_regex(pattern).unwrap_err();
            assert!(
                matches!(error.kind(), FaErrorKind::UnsupportedFeature(_)),
                "{}",
                pattern
            );
        }
    }

    #[test]
    fn test_nfa_from_regex() {
        let session = Session::new();
        let nfa = session.compile_regex("a").unwrap();
        assert_eq!(nfa.graph().len(), 2);
        assert_eq!(nfa.graph().edge_count(), 1);

        let session = Session::new();
        let nfa = session.compile_regex("ab").unwrap();
        assert_eq!(nfa.graph().len(), 3);

        let session = Session::new();
        let nfa = session.compile_regex("a|b").unwrap();
        assert_eq!(nfa.graph().len(), 6);
        assert_eq!(nfa.start().as_usize(), 4);
        assert_eq!(nfa.end().as_usize(), 5);
    }

    #[test]
    fn test_same_numbering_in_fresh_sessions() {
        let first = Session::new().compile_regex("(a|b)*abb").unwrap();
        let second = Session::new().compile_regex("(a|b)*abb").unwrap();
        assert_eq!(first.graph(), second.graph());
        assert_eq!(first.start(), second.start());
        assert_eq!(first.end(), second.end());
    }

    #[test]
    fn test_counted_repetition() {
        let session = Session::new();
        let dfa = session.compile_regex("ba{0}").unwrap().determinize().unwrap();
        assert!(dfa.accepts("b".chars()));
        assert!(!dfa.accepts("ba".chars()));

        let dfa = session.compile_regex("a{2,3}").unwrap().determinize().unwrap();
        assert!(!dfa.accepts("a".chars()));
        assert!(dfa.accepts("aa".chars()));
        assert!(dfa.accepts("aaa".chars()));
        assert!(!dfa.accepts("aaaa".chars()));
    }

    #[test]
    fn test_dragon_dfa() {
        init();
        let session = Session::new();
        let nfa = session.compile_regex("(a|b)*abb").unwrap();
        let dfa = Dfa::try_from(&nfa).unwrap();
        assert_eq!(dfa.len(), 5);
        assert_eq!(dfa.minimize().len(), 4);
        assert_eq!(
            format_state_set(dfa.members(dfa.start()).unwrap()),
            format_state_set(&nfa.epsilon_closure(&[nfa.start()].into()).unwrap())
        );
    }

    #[test]
    fn test_equivalence_with_regex() {
        init();
        const PATTERNS: &[&str] = &[
            "(a|b)*abb",
            "a{2,3}b?",
            "(ab|c)+",
            "a{3,}",
            "a{2}|b*c",
            "(a|)b",
            "((a|b)c)*",
            "(a*b*)*c",
            "a+b+|c",
        ];
        let alphabet = ['a', 'b', 'c'];
        let inputs = strings(&alphabet, 6);
        for pattern in PATTERNS {
            let session = Session::new();
            let nfa = session.compile_regex(pattern).unwrap();
            let dfa = nfa.determinize().unwrap();
            let minimized = dfa.minimize();
            let regex = Regex::new(&format!("^(?:{})$", pattern)).unwrap();
            for input in &inputs {
                let expected = regex.is_match(input);
                assert_eq!(
                    nfa.accepts(input.chars()).unwrap(),
                    expected,
                    "NFA of {} on {:?}",
                    pattern,
                    input
                );
                assert_eq!(
                    dfa.accepts(input.chars()),
                    expected,
                    "DFA of {} on {:?}",
                    pattern,
                    input
                );
                assert_eq!(
                    minimized.accepts(input.chars()),
                    expected,
                    "minimized DFA of {} on {:?}",
                    pattern,
                    input
                );
            }
        }
    }
}
