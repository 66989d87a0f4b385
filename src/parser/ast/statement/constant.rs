use crate::{
    lexer::{Span, Token},
    parser::{
        ast::{AstNode, Expression, Id, TypeName},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Constant<T> {
    pub id: Id<T>,
    pub type_name: TypeName,
    pub value: Expression<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for Constant<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::CONST_KEYWORD
            >> Comb::ID
            >> Comb::COLON
            >> Comb::TYPE_NAME
            >> Comb::ASSIGN
            >> Comb::EXPR;

        let result = matcher.parse(tokens)?;

        let [AstNode::Id(id), AstNode::TypeName(type_name), AstNode::Expression(value)] =
            result.as_slice()
        else {
            unreachable!()
        };

        let end = tokens.prev_span()?;

        Ok(Constant {
            id: id.clone(),
            type_name: type_name.clone(),
            value: value.clone(),
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<Constant<()>> for AstNode {
    fn from(value: Constant<()>) -> Self {
        AstNode::Constant(value)
    }
}
