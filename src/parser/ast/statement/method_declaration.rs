use crate::{
    lexer::{Span, Token},
    parser::{
        ast::{AstNode, Id, TypeName},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MethodDeclaration<T> {
    pub id: Id<T>,
    pub parameter_types: Vec<TypeName>,
    pub return_type: TypeName,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for MethodDeclaration<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::DECLARE_KEYWORD
            >> Comb::ID
            >> Comb::LPAREN
            >> (Comb::TYPE_NAME % Comb::COMMA)
            >> Comb::RPAREN
            >> Comb::COLON
            >> Comb::TYPE_NAME
            >> Comb::SEMI;

        let result = matcher.parse(tokens)?;

        let Some(AstNode::Id(id)) = result.first().cloned() else {
            unreachable!()
        };

        let Some(AstNode::TypeName(return_type)) = result.last().cloned() else {
            unreachable!()
        };

        let mut parameter_types = vec![];
        for node in &result[1..result.len() - 1] {
            let AstNode::TypeName(type_name) = node else {
                unreachable!()
            };
            parameter_types.push(type_name.clone());
        }

        let end = tokens.prev_span()?;

        Ok(MethodDeclaration {
            id,
            parameter_types,
            return_type,
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<MethodDeclaration<()>> for AstNode {
    fn from(value: MethodDeclaration<()>) -> Self {
        AstNode::MethodDeclaration(value)
    }
}
