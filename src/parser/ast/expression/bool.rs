
use crate::lexer::{Span, Token};
use crate::parser::{FromTokens, ParseError, ParseState};

use super::AstNode;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Bool<T> {
    pub value: bool,
    pub position: Span,
    pub info: T,
}

impl FromTokens<Token> for Bool<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        match tokens.next() {
            Some(Token::True { .. }) => Ok(Bool {
                value: true,
                position,
                info: (),
            }
            .into()),
            Some(Token::False { .. }) => Ok(Bool {
                value: false,
                position,
                info: (),
            }
            .into()),
            Some(token) => Err(ParseError {
                message: format!("Tried to parse Bool from non Bool token ({token:?})"),
                position: Some(position),
            }),
            None => Err(ParseError::eof("Bool")),
        }
    }
}

impl From<Bool<()>> for AstNode {
    fn from(bool: Bool<()>) -> AstNode {
        AstNode::Bool(bool)
    }
}
