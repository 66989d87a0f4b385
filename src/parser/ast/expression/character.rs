
use crate::lexer::{Span, Token};
use crate::parser::ast::AstNode;
use crate::parser::{FromTokens, ParseError, ParseState};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Character<T> {
    pub character: char,
    pub position: Span,
    pub info: T,
}



impl FromTokens<Token> for Character<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        if let Some(Token::Character { value, .. }) = tokens.next() {
            assert_eq!(value.len(), 3);

            let character: char = value
                .strip_prefix('\'')
                .unwrap()
                .strip_suffix('\'')
                .unwrap()
                .parse()
                .unwrap();
            Ok(Character {
                character,
                position,
                info: (),
            }
            .into())
        } else {
            Err(ParseError {
                message: "Tried to parse Character from non Character token".into(),
                position: Some(position),
            })
        }
    }
}

impl From<Character<()>> for AstNode {
    fn from(character: Character<()>) -> AstNode {
        AstNode::Character(character)
    }
}
