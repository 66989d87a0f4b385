use crate::{
    lexer::{Span, Token},
    parser::{
        ast::{AstNode, Expression, Id, TypeName},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Initialisation<T> {
    pub id: Id<T>,
    pub mutable: bool,
    pub type_name: Option<TypeName>,
    pub value: Expression<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for Initialisation<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        Comb::LET.parse(tokens)?;

        let mutable = matches!(tokens.peek(), Some(Token::Mut { .. }));
        if mutable {
            tokens.next();
        }

        let AstNode::Id(id) = Comb::ID.parse(tokens)?.remove(0) else {
            unreachable!()
        };

        let type_name = if matches!(tokens.peek(), Some(Token::Colon { .. })) {
            tokens.next();
            let AstNode::TypeName(type_name) = Comb::TYPE_NAME.parse(tokens)?.remove(0) else {
                unreachable!()
            };
            Some(type_name)
        } else {
            None
        };

        Comb::ASSIGN.parse(tokens)?;

        let AstNode::Expression(value) = Expression::parse(tokens)? else {
            unreachable!()
        };

        let end = tokens.prev_span()?;

        Ok(Initialisation {
            id,
            mutable,
            type_name,
            value,
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<Initialisation<()>> for AstNode {
    fn from(value: Initialisation<()>) -> Self {
        AstNode::Initialization(value)
    }
}
