use crate::{
    lexer::{Span, Token},
    parser::{
        ast::{AstNode, Block, Expression},
        combinators::Comb,
        FromTokens, ParseError, ParseState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhileLoop<T> {
    pub condition: Expression<T>,
    pub block: Block<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens<Token> for WhileLoop<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher =
            Comb::WHILE_KEYWORD >> Comb::LPAREN >> Comb::EXPR >> Comb::RPAREN >> Comb::BLOCK;

        let result = matcher.parse(tokens)?;

        let [AstNode::Expression(condition), AstNode::Block(block)] = result.as_slice() else {
            unreachable!()
        };

        let end = tokens.prev_span()?;

        Ok(WhileLoop {
            condition: condition.clone(),
            block: block.clone(),
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<WhileLoop<()>> for AstNode {
    fn from(value: WhileLoop<()>) -> Self {
        AstNode::WhileLoop(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::Statement;
    use crate::parser::test_helpers::*;

    #[test]
    fn test_simple_while_loop() {
        let Statement::WhileLoop(result) = parse_statement("while (true) {}").unwrap() else {
            panic!("expected while loop")
        };
        assert_eq!(result.block.statements.len(), 0);
    }

    #[test]
    fn test_while_loop_with_body() {
        let Statement::WhileLoop(result) = parse_statement("while (x) { 42; }").unwrap() else {
            panic!("expected while loop")
        };
        assert!(matches!(result.condition, Expression::Id(ref id) if id.name == "x"));
        assert_eq!(result.block.statements.len(), 1);
        assert!(matches!(result.block.statements[0], Statement::Expression(_)));
    }
}
