use crate::{
    lexer::{Span, Token},
    parser::{
        ast::{AstNode, Statement},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Block<T> {
    pub statements: Vec<Statement<T>>,
    pub info: T,
    pub position: Span,
}



impl FromTokens<Token> for Block<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::LBRACE >> (Comb::STATEMENT ^ Comb::RBRACE);

        let mut result = matcher.parse(tokens)?.into_iter().peekable();

        let mut statements = vec![];

        while let Some(AstNode::Statement(statement)) = result.next() {
            statements.push(statement.clone());
            if let Statement::YieldingExpression(exp) = statement {
                if result.peek().is_some() {
                    let err = ParseError {
                        position: Some(exp.position()),
                        message: "A YieldingExpression is only allowed at the end of a block"
                            .into(),
                    };
                    tokens.add_error(err.clone());
                    return Err(err);
                }
            }
        }

        Ok(Block {
            statements,
            info: (),
            position,
        }
        .into())
    }
}

impl From<Block<()>> for AstNode {
    fn from(value: Block<()>) -> Self {
        AstNode::Block(value)
    }
}
