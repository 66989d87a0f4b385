use crate::{
    lexer::{Span, Token},
    parser::{
        ast::{AstNode, Function, TypeName},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

use super::MethodDeclaration;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Instance<T> {
    pub name: TypeName,
    pub functions: Vec<Function<T>>,
    pub declarations: Vec<MethodDeclaration<T>>,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for Instance<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::INSTANCE_KEYWORD
            >> Comb::TYPE_NAME
            >> Comb::LBRACE
            >> ((Comb::FUNCTION | Comb::METHOD_DECLARATION) ^ Comb::RBRACE);

        let mut result = matcher.parse(tokens)?.into_iter();

        let Some(AstNode::TypeName(name)) = result.next() else {
            unreachable!()
        };

        let mut functions = vec![];
        let mut declarations = vec![];
        for node in result {
            match node {
                AstNode::Function(function) => functions.push(function),
                AstNode::MethodDeclaration(declaration) => declarations.push(declaration),
                _ => unreachable!(),
            }
        }

        let end = tokens.prev_span()?;

        Ok(Instance {
            name,
            functions,
            declarations,
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<Instance<()>> for AstNode {
    fn from(value: Instance<()>) -> Self {
        AstNode::Instance(value)
    }
}
