use crate::{
    lexer::Token,
    parser::{
        ast::{AstNode, Function, TypeName},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

/// `impl Trait for Type { fn ...  }` — binds a trait to a concrete target
/// type together with the method bodies realising it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImplBlock<T> {
    pub trait_name: String,
    pub target: TypeName,
    pub functions: Vec<Function<T>>,
    pub info: T,
    pub position: crate::lexer::Span,
}

impl FromTokens<Token> for ImplBlock<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::IMPL_KEYWORD
            >> Comb::ID
            >> Comb::FOR_KEYWORD
            >> Comb::TYPE_NAME
            >> Comb::LBRACE
            >> (Comb::FUNCTION ^ Comb::RBRACE);

        let mut result = matcher.parse(tokens)?.into_iter();

        let Some(AstNode::Id(trait_name)) = result.next() else {
            unreachable!()
        };

        let Some(AstNode::TypeName(target)) = result.next() else {
            unreachable!()
        };

        let mut functions = vec![];
        for node in result {
            let AstNode::Function(function) = node else {
                unreachable!()
            };
            functions.push(function);
        }

        let end = tokens.prev_span()?;

        Ok(ImplBlock {
            trait_name: trait_name.name,
            target,
            functions,
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<ImplBlock<()>> for AstNode {
    fn from(value: ImplBlock<()>) -> Self {
        AstNode::ImplBlock(value)
    }
}
