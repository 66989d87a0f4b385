use crate::{
    lexer::{Span, Token},
    parser::{combinators::Comb, FromTokens, ParseError, ParseState},
};

use super::{AstNode, Expression, Id};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Lambda<T> {
    pub parameters: Vec<LambdaParameter<T>>,
    pub expression: Box<Expression<T>>,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for Lambda<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::BACKSLASH
            >> Comb::LPAREN
            >> (Comb::LAMBDA_PARAMETER % Comb::COMMA)
            >> Comb::RPAREN
            >> Comb::BIG_RIGHT_ARROW
            >> Comb::EXPR;

        let mut result = matcher.parse(tokens)?;

        let Some(AstNode::Expression(expression)) = result.pop() else {
            unreachable!()
        };

        let mut parameters = vec![];
        for node in result {
            let AstNode::LambdaParameter(parameter) = node else {
                unreachable!()
            };
            parameters.push(parameter);
        }

        let end = tokens.prev_span()?;

        Ok(Lambda {
            parameters,
            expression: Box::new(expression),
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<Lambda<()>> for AstNode {
    fn from(value: Lambda<()>) -> Self {
        AstNode::Lambda(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LambdaParameter<T> {
    pub name: Id<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for LambdaParameter<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let AstNode::Id(name) = Id::parse(tokens)? else {
            unreachable!()
        };

        Ok(LambdaParameter {
            name,
            info: (),
            position,
        }
        .into())
    }
}

impl From<LambdaParameter<()>> for AstNode {
    fn from(value: LambdaParameter<()>) -> Self {
        AstNode::LambdaParameter(value)
    }
}
