use crate::{
    lexer::{Span, Token},
    parser::{
        ast::{AstNode, Id, TypeName},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Declaration<T> {
    pub name: Id<T>,
    pub type_name: TypeName,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for Declaration<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::DECLARE_KEYWORD >> Comb::ID >> Comb::COLON >> Comb::TYPE_NAME;
        let result = matcher.parse(tokens)?;

        let [AstNode::Id(name), AstNode::TypeName(type_name)] = result.as_slice() else {
            unreachable!()
        };

        let end = tokens.prev_span()?;

        Ok(Declaration {
            name: name.clone(),
            type_name: type_name.clone(),
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<Declaration<()>> for AstNode {
    fn from(value: Declaration<()>) -> Self {
        AstNode::Declaration(value)
    }
}
