use crate::{
    lexer::{Span, Token},
    parser::{ast::AstNode, combinators::Comb, FromTokens, ParseError, ParseState},
};

use super::{Block, Expression};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct If<T> {
    pub condition: Box<Expression<T>>,
    pub then_block: Block<T>,
    pub else_block: Block<T>,
    pub info: T,
    pub position: Span,
}



impl FromTokens<Token> for If<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::IF_KEYWORD
            >> Comb::LPAREN
            >> Comb::EXPR
            >> Comb::RPAREN
            >> Comb::BLOCK
            >> !(Comb::ELSE_KEYWORD >> Comb::BLOCK);

        let result = matcher.parse(tokens)?;

        let Some(AstNode::Expression(condition)) = result.first().cloned() else {
            unreachable!()
        };

        let Some(AstNode::Block(then_block)) = result.get(1).cloned() else {
            unreachable!()
        };

        let end = tokens.prev_span()?;

        let else_block = match result.get(2).cloned() {
            Some(AstNode::Block(block)) => block,
            _ => Block {
                statements: vec![],
                info: (),
                position: end.clone(),
            },
        };

        Ok(If {
            condition: Box::new(condition),
            then_block,
            else_block,
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl From<If<()>> for AstNode {
    fn from(value: If<()>) -> Self {
        AstNode::If(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ast::Statement, test_helpers::*};

    #[test]
    fn test_simple_if() {
        let result = parse_if("if (true) {}").unwrap();
        // assert!(matches!(*result.condition, Expression::Bool(_)));
        assert_eq!(result.then_block.statements.len(), 0);
        assert_eq!(result.else_block.statements.len(), 0);
    }

    #[test]
    fn test_if_with_identifier_condition() {
        let result = parse_if("if (x) {}").unwrap();
        assert!(matches!(*result.condition, Expression::Id(_)));
        assert_eq!(result.then_block.statements.len(), 0);
        assert_eq!(result.else_block.statements.len(), 0);
    }

    #[test]
    fn test_simple_if_else() {
        let result = parse_if("if (true) {} else {}").unwrap();
        // assert!(matches!(*result.condition, Expression::Bool(_)));
        assert_eq!(result.then_block.statements.len(), 0);
        assert_eq!(result.else_block.statements.len(), 0);
    }

    #[test]
    fn test_if_with_statements() {
        let result = parse_if("if (true) { 42; }").unwrap();
        // assert!(matches!(*result.condition, Expression::Bool(_)));
        assert_eq!(result.then_block.statements.len(), 1);
        assert!(matches!(
            result.then_block.statements[0],
            Statement::Expression(_)
        ));
        assert_eq!(result.else_block.statements.len(), 0);
    }

    #[test]
    fn test_if_else_with_statements() {
        let result = parse_if("if (true) { 42; } else { 1337; }").unwrap();
        // assert!(matches!(*result.condition, Expression::Bool(_)));
        assert_eq!(result.then_block.statements.len(), 1);
        assert!(matches!(
            result.then_block.statements[0],
            Statement::Expression(_)
        ));
        assert_eq!(result.else_block.statements.len(), 1);
        assert!(matches!(
            result.else_block.statements[0],
            Statement::Expression(_)
        ));
    }

    #[test]
    fn test_if_with_yielding_expression() {
        let result = parse_if("if (true) { 42 }").unwrap();
        // assert!(matches!(*result.condition, Expression::Bool(_)));
        assert_eq!(result.then_block.statements.len(), 1);
        assert!(matches!(
            result.then_block.statements[0],
            Statement::YieldingExpression(_)
        ));
    }

    #[test]
    fn test_error_on_invalid_syntax() {
        // Test that invalid if formats fail gracefully
        assert!(parse_if("if").is_err()); // Incomplete if
        assert!(parse_if("if true {}").is_err()); // Missing parentheses
        assert!(parse_if("").is_err()); // Empty string
    }
}
