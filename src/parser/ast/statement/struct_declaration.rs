use crate::{
    lexer::{Span, Token},
    parser::{
        ast::{AstNode, Id, TypeName},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StructDeclaration<T> {
    pub id: Id<T>,
    pub fields: Vec<StructFieldDeclaration<T>>,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for StructDeclaration<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::STRUCT_KEYWORD
            >> Comb::ID
            >> Comb::LBRACE
            >> (Comb::STRUCT_FIELD_DECLARATION % Comb::COMMA)
            >> Comb::RBRACE;

        let mut result = matcher.parse(tokens)?.into_iter();

        let Some(AstNode::Id(id)) = result.next() else {
            unreachable!()
        };

        let mut fields = vec![];
        for node in result {
            let AstNode::StructFieldDeclaration(field) = node else {
                unreachable!()
            };
            fields.push(field);
        }

        let end = tokens.prev_span()?;

        Ok(StructDeclaration {
            id,
            fields,
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<StructDeclaration<()>> for AstNode {
    fn from(value: StructDeclaration<()>) -> Self {
        Self::StructDeclaration(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StructFieldDeclaration<T> {
    pub name: Id<T>,
    pub type_name: TypeName,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for StructFieldDeclaration<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::ID >> Comb::COLON >> Comb::TYPE_NAME;
        let result = matcher.parse(tokens)?;

        let [AstNode::Id(name), AstNode::TypeName(type_name)] = result.as_slice() else {
            unreachable!()
        };

        let end = tokens.prev_span()?;

        Ok(StructFieldDeclaration {
            name: name.clone(),
            type_name: type_name.clone(),
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<StructFieldDeclaration<()>> for AstNode {
    fn from(value: StructFieldDeclaration<()>) -> Self {
        Self::StructFieldDeclaration(value)
    }
}
