
use crate::lexer::{Span, Token};
use crate::parser::{FromTokens, ParseError, ParseState};

use super::AstNode;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AstString<T> {
    pub value: String,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for AstString<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        match tokens.next() {
            Some(Token::Str { value, .. }) => Ok(AstString {
                value,
                info: (),
                position,
            }
            .into()),
            Some(_) => Err(ParseError {
                message: "Tried to parse AstString from non string token".into(),
                position: Some(position),
            }),
            None => Err(ParseError::eof("AstString")),
        }
    }
}

impl From<AstString<()>> for AstNode {
    fn from(string: AstString<()>) -> AstNode {
        AstNode::AstString(string)
    }
}
