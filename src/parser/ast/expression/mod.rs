mod array;
mod binary;
mod block;
mod bool;
mod character;
mod function;
mod id;
mod if_expression;
mod lambda;
mod num;
mod postfix;
mod prefix;
mod string;
mod struct_initialisation;

pub use self::array::*;
pub use self::binary::*;
pub use self::block::*;
pub use self::bool::*;
pub use self::character::*;
pub use self::function::*;
pub use self::id::*;
pub use self::if_expression::*;
pub use self::lambda::*;
pub use self::num::*;
pub use self::postfix::*;
pub use self::prefix::*;
pub use self::string::*;
pub use self::struct_initialisation::*;

use crate::lexer::{GetPosition, Span, Token};
use crate::parser::{combinators::Comb, FromTokens, ParseError, ParseState};

use super::{AstNode, TypeName};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Expression<T> {
    Id(Id<T>),
    Num(Num<T>),
    Character(Character<T>),
    AstString(AstString<T>),
    Bool(Bool<T>),
    Function(Function<T>),
    Lambda(Lambda<T>),
    If(If<T>),
    Block(Block<T>),
    Parens(Box<Expression<T>>),
    Postfix(Postfix<T>),
    Prefix(Prefix<T>),
    Binary(Box<BinaryExpression<T>>),
    Array(Array<T>),
    StructInitialisation(StructInitialisation<T>),
    /// `sizeof(type_name)` — always yields the pointer-width unsigned integer type.
    Sizeof(TypeName, T, Span),
    /// `condition ? true_branch : false_branch`, right-associative.
    Ternary {
        condition: Box<Expression<T>>,
        true_branch: Box<Expression<T>>,
        false_branch: Box<Expression<T>>,
        info: T,
        position: Span,
    },
}

impl<T> Expression<T>
where
    T: Clone,
{
    pub fn get_info(&self) -> T {
        match self {
            Expression::Id(Id { name: _, info, .. }) => info.clone(),
            Expression::Num(num) => num.get_info(),
            Expression::Character(Character { info, .. }) => info.clone(),
            Expression::AstString(AstString { info, .. }) => info.clone(),
            Expression::Bool(Bool { info, .. }) => info.clone(),
            Expression::Function(Function { info, .. }) => info.clone(),
            Expression::Lambda(Lambda { info, .. }) => info.clone(),
            Expression::If(If { info, .. }) => info.clone(),
            Expression::Block(Block { info, .. }) => info.clone(),
            Expression::Parens(expr) => expr.get_info(),
            Expression::Postfix(postfix) => postfix.get_info(),
            Expression::Prefix(prefix) => prefix.get_info(),
            Expression::Binary(binary) => binary.get_info(),
            Expression::Array(arr) => arr.get_info(),
            Expression::StructInitialisation(StructInitialisation { info, .. }) => info.clone(),
            Expression::Sizeof(_, info, _) => info.clone(),
            Expression::Ternary { info, .. } => info.clone(),
        }
    }

    pub fn position(&self) -> Span {
        match self {
            Expression::Id(Id { position, .. }) => position.clone(),
            Expression::Num(num) => num.position(),
            Expression::Character(Character { position, .. }) => position.clone(),
            Expression::AstString(AstString { position, .. }) => position.clone(),
            Expression::Bool(Bool { position, .. }) => position.clone(),
            Expression::Function(Function { position, .. }) => position.clone(),
            Expression::Lambda(Lambda { position, .. }) => position.clone(),
            Expression::If(If { position, .. }) => position.clone(),
            Expression::Block(Block { position, .. }) => position.clone(),
            Expression::Parens(expr) => expr.position(),
            Expression::Postfix(postfix_expr) => postfix_expr.position(),
            Expression::Prefix(prefix_expr) => prefix_expr.position(),
            Expression::Binary(binary_exp) => binary_exp.position(),
            Expression::Array(arr) => arr.position(),
            Expression::StructInitialisation(StructInitialisation { position, .. }) => {
                position.clone()
            }
            Expression::Sizeof(_, _, position) => position.clone(),
            Expression::Ternary { position, .. } => position.clone(),
        }
    }
}



impl From<Expression<()>> for AstNode {
    fn from(value: Expression<()>) -> Self {
        AstNode::Expression(value)
    }
}

impl FromTokens<Token> for Expression<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;
        let left = Self::parse_unary(tokens)?;
        Self::parse_binary_rhs(tokens, left, position)
    }
}

impl Expression<()> {
    fn parse_unary(tokens: &mut ParseState<Token>) -> Result<Expression<()>, ParseError> {
        match tokens.peek() {
            Some(Token::Minus { position }) => {
                tokens.next();
                let expr = Self::parse_unary(tokens)?;
                Ok(Expression::Prefix(Prefix::Minus {
                    expr: Box::new(expr),
                    position,
                }))
            }
            Some(Token::ExclamationMark { position }) => {
                tokens.next();
                let expr = Self::parse_unary(tokens)?;
                Ok(Expression::Prefix(Prefix::Negation {
                    expr: Box::new(expr),
                    position,
                }))
            }
            // `&[` starts an array literal/default, not a reference expression -
            // let that fall through to `parse_postfix`/`parse_primary`.
            Some(Token::Ampersand { .. }) if Self::peeks_array_literal(tokens) => {
                Self::parse_postfix(tokens)
            }
            Some(Token::Ampersand { position }) => {
                tokens.next();
                let expr = Self::parse_unary(tokens)?;
                Ok(Expression::Prefix(Prefix::Reference {
                    expr: Box::new(expr),
                    info: (),
                    position,
                }))
            }
            Some(Token::Tilde { position }) => {
                tokens.next();
                let expr = Self::parse_unary(tokens)?;
                Ok(Expression::Prefix(Prefix::Owned {
                    expr: Box::new(expr),
                    info: (),
                    position,
                }))
            }
            Some(Token::Star { position }) => {
                tokens.next();
                let expr = Self::parse_unary(tokens)?;
                Ok(Expression::Prefix(Prefix::Deref {
                    expr: Box::new(expr),
                    info: (),
                    position,
                }))
            }
            Some(Token::RunKeyword { position }) => {
                tokens.next();
                let expr = Self::parse_unary(tokens)?;
                Ok(Expression::Prefix(Prefix::Run {
                    expr: Box::new(expr),
                    info: (),
                    position,
                }))
            }
            Some(Token::HaltKeyword { position }) => {
                tokens.next();
                let expr = Self::parse_unary(tokens)?;
                Ok(Expression::Prefix(Prefix::Halt {
                    expr: Box::new(expr),
                    info: (),
                    position,
                }))
            }
            _ => Self::parse_postfix(tokens),
        }
    }

    /// Lookahead used to tell `&expr` (a reference) apart from `&[..]` (an
    /// array literal/default), which also starts with `Token::Ampersand`.
    fn peeks_array_literal(tokens: &mut ParseState<Token>) -> bool {
        let index = tokens.get_index();
        tokens.next();
        let is_array = matches!(tokens.peek(), Some(Token::LBracket { .. }));
        tokens.set_index(index);
        is_array
    }

    pub(crate) fn parse_postfix(tokens: &mut ParseState<Token>) -> Result<Expression<()>, ParseError> {
        let start = tokens.span()?;
        let mut expr = Self::parse_atom(tokens)?;

        loop {
            match tokens.peek() {
                Some(Token::LParen { .. }) => {
                    tokens.next();
                    let args = Self::parse_call_args(tokens)?;
                    let end = tokens.prev_span()?;
                    expr = Expression::Postfix(Postfix::Call {
                        expr: Box::new(expr),
                        args,
                        info: (),
                        position: start.merge(&end),
                    });
                }
                Some(Token::LBracket { .. }) => {
                    tokens.next();
                    let AstNode::Expression(index) = Self::parse(tokens)? else {
                        unreachable!()
                    };
                    Comb::RBRACKET.parse(tokens)?;
                    let end = tokens.prev_span()?;
                    expr = Expression::Postfix(Postfix::Index {
                        expr: Box::new(expr),
                        index: Box::new(index),
                        info: (),
                        position: start.merge(&end),
                    });
                }
                Some(Token::Dot { .. }) => {
                    tokens.next();
                    let property_position = tokens.span()?;
                    let Some(Token::Id { value, position }) = tokens.next() else {
                        return Err(ParseError {
                            message: "expected a property name after `.`".into(),
                            position: Some(property_position),
                        });
                    };
                    expr = Expression::Postfix(Postfix::PropertyAccess {
                        expr: Box::new(expr),
                        property: Id {
                            name: value,
                            info: (),
                            position,
                        },
                        info: (),
                        position: start.merge(&position),
                    });
                }
                Some(Token::AsKeyword { .. }) => {
                    tokens.next();
                    let AstNode::TypeName(type_name) = TypeName::parse(tokens)? else {
                        unreachable!()
                    };
                    let end = tokens.prev_span()?;
                    expr = Expression::Postfix(Postfix::Cast {
                        expr: Box::new(expr),
                        type_name,
                        info: (),
                        position: start.merge(&end),
                    });
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_call_args(
        tokens: &mut ParseState<Token>,
    ) -> Result<Vec<Expression<()>>, ParseError> {
        let mut args = vec![];

        if matches!(tokens.peek(), Some(Token::RParen { .. })) {
            tokens.next();
            return Ok(args);
        }

        loop {
            let AstNode::Expression(arg) = Self::parse(tokens)? else {
                unreachable!()
            };
            args.push(arg);

            match tokens.next() {
                Some(Token::Comma { .. }) => continue,
                Some(Token::RParen { .. }) => break,
                Some(token) => {
                    return Err(ParseError {
                        message: format!("expected `,` or `)` in call arguments, got {token:?}"),
                        position: Some(token.position()),
                    })
                }
                None => return Err(ParseError::eof("call arguments")),
            }
        }

        Ok(args)
    }

    fn parse_atom(tokens: &mut ParseState<Token>) -> Result<Expression<()>, ParseError> {
        let position = tokens.span()?;

        match tokens.peek() {
            Some(Token::Integer { .. }) | Some(Token::FloatingPoint { .. }) => {
                let AstNode::Num(num) = Num::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::Num(num))
            }
            Some(Token::Character { .. }) => {
                let AstNode::Character(character) = Character::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::Character(character))
            }
            Some(Token::Str { .. }) => {
                let AstNode::AstString(string) = AstString::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::AstString(string))
            }
            Some(Token::True { .. }) | Some(Token::False { .. }) => {
                let AstNode::Bool(b) = Bool::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::Bool(b))
            }
            Some(Token::FnKeyword { .. }) => {
                let AstNode::Function(function) = Function::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::Function(function))
            }
            Some(Token::Backslash { .. }) => {
                let AstNode::Lambda(lambda) = Lambda::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::Lambda(lambda))
            }
            Some(Token::IfKeyword { .. }) => {
                let AstNode::If(if_expr) = If::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::If(if_expr))
            }
            Some(Token::LBrace { .. }) => {
                let AstNode::Block(block) = Block::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::Block(block))
            }
            Some(Token::Ampersand { .. }) => {
                let AstNode::Array(array) = Array::parse(tokens)? else {
                    unreachable!()
                };
                Ok(Expression::Array(array))
            }
            Some(Token::SizeofKeyword { .. }) => {
                tokens.next();
                Comb::LPAREN.parse(tokens)?;
                let AstNode::TypeName(type_name) = TypeName::parse(tokens)? else {
                    unreachable!()
                };
                Comb::RPAREN.parse(tokens)?;
                let end = tokens.prev_span()?;
                Ok(Expression::Sizeof(type_name, (), position.merge(&end)))
            }
            Some(Token::LParen { .. }) => {
                tokens.next();
                let AstNode::Expression(inner) = Self::parse(tokens)? else {
                    unreachable!()
                };
                Comb::RPAREN.parse(tokens)?;
                Ok(Expression::Parens(Box::new(inner)))
            }
            Some(Token::Id { .. }) => {
                let index = tokens.get_index();
                tokens.next();
                let is_struct_init = matches!(tokens.peek(), Some(Token::LBrace { .. }));
                tokens.set_index(index);

                if is_struct_init {
                    let AstNode::StructInitialisation(init) = StructInitialisation::parse(tokens)?
                    else {
                        unreachable!()
                    };
                    Ok(Expression::StructInitialisation(init))
                } else {
                    let AstNode::Id(id) = Id::parse(tokens)? else {
                        unreachable!()
                    };
                    Ok(Expression::Id(id))
                }
            }
            Some(token) => Err(ParseError {
                message: format!("unexpected {token:?} while trying to parse an expression"),
                position: Some(token.position()),
            }),
            None => Err(ParseError::eof("expression")),
        }
    }

    fn parse_binary_rhs(
        tokens: &mut ParseState<Token>,
        left: Expression<()>,
        start: Span,
    ) -> Result<AstNode, ParseError> {
        if matches!(tokens.peek(), Some(Token::Question { .. })) {
            tokens.next();
            let AstNode::Expression(true_branch) = Self::parse(tokens)? else {
                unreachable!()
            };
            Comb::COLON.parse(tokens)?;
            // Right-associative: the false branch may itself be a ternary.
            let AstNode::Expression(false_branch) = Self::parse(tokens)? else {
                unreachable!()
            };
            let end = tokens.prev_span()?;

            return Ok(Expression::Ternary {
                condition: Box::new(left),
                true_branch: Box::new(true_branch),
                false_branch: Box::new(false_branch),
                info: (),
                position: start.merge(&end),
            }
            .into());
        }

        let operator = match tokens.peek() {
            Some(Token::Plus { .. }) => BinaryOperator::Add,
            Some(Token::Minus { .. }) => BinaryOperator::Substract,
            Some(Token::Star { .. }) => BinaryOperator::Multiply,
            Some(Token::Slash { .. }) => BinaryOperator::Divide,
            Some(Token::EqEq { .. }) => BinaryOperator::Equals,
            Some(Token::Gt { .. }) => BinaryOperator::GreaterThan,
            Some(Token::Lt { .. }) => BinaryOperator::LessThan,
            Some(Token::Ge { .. }) => BinaryOperator::GreaterOrEqual,
            Some(Token::Le { .. }) => BinaryOperator::LessOrEqual,
            _ => return Ok(left.into()),
        };

        tokens.next();

        let AstNode::Expression(right) = Self::parse(tokens)? else {
            unreachable!()
        };

        let end = tokens.prev_span()?;

        let binary = BinaryExpression {
            left,
            right,
            operator,
            info: (),
            position: start.merge(&end),
        }
        .balance();

        Ok(Expression::Binary(Box::new(binary)).into())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{BinaryOperator, Expression};
    use crate::parser::test_helpers::*;

    #[test]
    fn test_parse_basic_expressions() {
        // Test identifier
        let result = parse_expression("some_id").unwrap();
        assert!(matches!(result, Expression::Id(ref id) if id.name == "some_id"));

        // Test number
        let result = parse_expression("42").unwrap();
        assert!(matches!(
            result,
            Expression::Num(crate::parser::ast::Num::Integer(42, (), _))
        ));

        // Test string
        let result = parse_expression("\"hello\"").unwrap();
        assert!(matches!(result, Expression::AstString(_)));
    }

    #[test]
    fn test_parse_complex_expressions() {
        // Test binary expression
        let result = parse_expression("1 + 2").unwrap();
        if let Expression::Binary(binary) = result {
            assert!(matches!(binary.operator, BinaryOperator::Add));
        } else {
            panic!("Expected binary expression");
        }

        // Test function call
        let result = parse_expression("foo()").unwrap();
        assert!(matches!(result, Expression::Postfix(_)));

        // Test array literal
        let result = parse_expression("&[1, 2, 3]").unwrap();
        assert!(matches!(result, Expression::Array(_)));
    }
}
