//! # Parser Module
//!
//! This module implements the parsing pipeline for the Impala-style front end: turning source
//! text into the generic `Expression`/`Statement` AST that the type checker later annotates.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Code  →  Token Stream  →  AST  →  Type Checker
//!    (String)       (Lexer)      (Generic)   (Validated)
//! ```
//!
//! Parsing itself is hand-rolled: [`crate::lexer::Lexer`] turns source text into a flat
//! `Vec<Token>`, and [`FromTokens`] implementations walk a [`ParseState`] cursor over that
//! stream, building combinators out of the primitives in [`combinators`] (`Comb::Sequence`,
//! `Comb::Either`, `Comb::Repitition`, ...). There is no separate grammar crate or codegen step;
//! every AST node knows how to parse itself directly from tokens.
//!
//! ### AST Types (`ast/`)
//! Generic AST nodes that support type information progression:
//! - **`Expression<T>`**: Expressions parameterized by type information stage
//! - **`Statement<T>`**: Statements parameterized by type information stage
//! - **Type Parameters**: `()` → `TypeInformation` → `ValidatedTypeInformation`
//! - **Serializable**: All AST nodes support serde for debugging and tooling
//!
//! ### Error Handling
//! Comprehensive error reporting with source position information:
//! - **`ParseError`**: Structured error type with message and position
//! - **Position Tracking**: Errors include exact source location (`Span`)
//! - **EOF Handling**: Special handling for end-of-file errors

use std::{error::Error, fmt::Display};

pub mod ast;
pub mod combinators;
pub mod parse_state;

#[cfg(test)]
pub mod test_helpers;

use crate::lexer::{Lexer, Span, Token};

pub use self::parse_state::ParseState;
use self::ast::{AstNode, TopLevelStatement};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseError {
    pub message: String,
    pub position: Option<Span>,
}

impl ParseError {
    pub fn eof(item: &str) -> ParseError {
        ParseError {
            message: format!("hit EOF while parsing {item}"),
            position: None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(pos) = &self.position {
            f.write_str(pos.to_string(&self.message).as_str())
        } else {
            f.write_str(&self.message)
        }
    }
}

impl Error for ParseError {}

/// Implemented by every AST node that can parse itself from a token stream.
///
/// Each implementation consumes as many tokens as it needs from `tokens`, returning the
/// resulting node wrapped in [`AstNode`] (via the node's own `From` impl) so it can be stored
/// inside a `Comb::Node` combinator's homogeneous result vector.
pub trait FromTokens<Tok> {
    fn parse(tokens: &mut ParseState<Tok>) -> Result<AstNode, ParseError>
    where
        Self: Sized;
}

/// Parses a whole module/compilation unit: repeatedly parses top-level statements until the
/// token stream is exhausted. A malformed item does not abort the parse; see
/// [`parse_mod_contents`]. Any accumulated recovery errors are discarded here — use
/// [`parse_program_with_diagnostics`] to see them.
pub fn parse_program(source: &str) -> Result<Vec<TopLevelStatement<()>>, ParseError> {
    parse_program_with_diagnostics(source).map(|(statements, _)| statements)
}

/// Like [`parse_program`], but also returns every recovery error collected while skipping
/// malformed top-level items.
pub fn parse_program_with_diagnostics(
    source: &str,
) -> Result<(Vec<TopLevelStatement<()>>, Vec<ParseError>), ParseError> {
    let tokens = Lexer::new(source).lex().map_err(|e| ParseError {
        message: e.to_string(),
        position: None,
    })?;

    let mut tokens: ParseState<Token> = tokens.into();
    let statements = parse_mod_contents(&mut tokens);
    Ok((statements, tokens.errors.clone()))
}

/// Parses the contents of a module (the top level of a file, or the body of a `mod { .. }`
/// block once that syntax is wired up) until the stream is exhausted.
///
/// A top-level item that fails to parse is diagnosed (recorded via
/// [`ParseState::add_error`]) rather than aborting the whole parse: the cursor is advanced past
/// the offending token(s) until the next token that can plausibly start a new item, and parsing
/// resumes from there. This keeps one malformed declaration from hiding every diagnostic after
/// it in the same file.
fn parse_mod_contents(tokens: &mut ParseState<Token>) -> Vec<TopLevelStatement<()>> {
    let mut statements = vec![];

    while tokens.peek().is_some() {
        let start_index = tokens.get_index();
        match TopLevelStatement::parse(tokens) {
            Ok(stm) => statements.push(stm),
            Err(e) => {
                tokens.add_error(e);
                if tokens.get_index() <= start_index {
                    tokens.next();
                }
                skip_to_next_item_boundary(tokens);
            }
        }
    }

    statements
}

/// Advances `tokens` until the next token that can start a [`TopLevelStatement`], or EOF.
/// Used by [`parse_mod_contents`] to resynchronize after a malformed top-level item.
fn skip_to_next_item_boundary(tokens: &mut ParseState<Token>) {
    while let Some(token) = tokens.peek() {
        if matches!(
            token,
            Token::FnKeyword { .. }
                | Token::Const { .. }
                | Token::DeclareKeyword { .. }
                | Token::StructKeyword { .. }
                | Token::InstanceKeyword { .. }
                | Token::TraitKeyword { .. }
                | Token::ImplKeyword { .. }
                | Token::Comment { .. }
        ) {
            break;
        }
        tokens.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_from_a_malformed_top_level_item_and_keeps_parsing() {
        let (statements, errors) = parse_program_with_diagnostics(
            "fn broken( {} fn ok(): i64 { 42 }",
        )
        .expect("lexing should succeed");

        assert!(!errors.is_empty());
        assert_eq!(statements.len(), 1);
        let TopLevelStatement::Function(f) = &statements[0] else {
            panic!("expected the well-formed function to survive recovery");
        };
        assert_eq!(f.id.name, "ok");
    }

    #[test]
    fn parse_program_still_succeeds_on_fully_valid_input() {
        let result = parse_program("fn main(): void {}");
        assert!(result.is_ok());
    }
}
