mod array;
mod binary;
mod block;
mod bool;
mod character;
mod function;
mod id;
mod if_expression;
pub mod lambda;
mod num;
mod postfix;
mod prefix;
mod string;
mod struct_initialisation;

use std::{cell::RefCell, rc::Rc};

use crate::typechecker::{TypeValidationError, ValidatedTypeInformation};
use crate::{
    parser::ast::Expression,
    typechecker::{
        context::Context,
        error::{TypeCheckError, TypeMismatch, UndefinedType},
        types::Type,
        TypeCheckable, TypeInformation, TypeResult, TypedConstruct,
    },
};

impl TypeCheckable for Expression<()> {
    type Typed = Expression<TypeInformation>;

    fn check(self, ctx: &mut Context) -> TypeResult<Self::Typed> {
        match self {
            Expression::Id(id) => Ok(Expression::Id(id.check(ctx)?)),
            Expression::Num(num) => Ok(Expression::Num(num.check(ctx)?)),
            Expression::Bool(bool) => Ok(Expression::Bool(bool.check(ctx)?)),
            Expression::Character(character) => Ok(Expression::Character(character.check(ctx)?)),
            Expression::AstString(string) => Ok(Expression::AstString(string.check(ctx)?)),
            Expression::Function(func) => Ok(Expression::Function(func.check(ctx)?)),
            Expression::Lambda(lambda) => Ok(Expression::Lambda(lambda.check(ctx)?)),
            Expression::If(if_exp) => Ok(Expression::If(if_exp.check(ctx)?)),
            Expression::Block(block) => Ok(Expression::Block(block.check(ctx)?)),
            Expression::Parens(exp) => Ok(Expression::Parens(Box::new(exp.check(ctx)?))),
            Expression::Postfix(post) => Ok(Expression::Postfix(post.check(ctx)?)),
            Expression::Prefix(pref) => Ok(Expression::Prefix(pref.check(ctx)?)),
            Expression::Binary(bin) => Ok(Expression::Binary(Box::new(bin.check(ctx)?))),
            Expression::Array(arr) => Ok(Expression::Array(arr.check(ctx)?)),
            Expression::StructInitialisation(init) => {
                Ok(Expression::StructInitialisation(init.check(ctx)?))
            }
            Expression::Sizeof(type_name, _, position) => {
                let context = ctx.clone();

                Type::try_from((&type_name, &*ctx)).map_err(|_| {
                    TypeCheckError::UndefinedType(
                        UndefinedType {
                            type_name: type_name.clone(),
                        },
                        position.clone(),
                    )
                })?;

                Ok(Expression::Sizeof(
                    type_name,
                    TypeInformation {
                        type_id: Rc::new(RefCell::new(Some(Type::Integer))),
                        context,
                    },
                    position,
                ))
            }
            Expression::Ternary {
                condition,
                true_branch,
                false_branch,
                position,
                ..
            } => {
                let context = ctx.clone();
                let condition = condition.check(ctx)?;

                let cond_type = condition.get_info().type_id.borrow().clone();
                if !matches!(cond_type, Some(Type::Boolean)) {
                    return Err(TypeCheckError::TypeMismatch(
                        TypeMismatch {
                            expected: Type::Boolean,
                            actual: cond_type.unwrap_or(Type::Unknown),
                        },
                        condition.position(),
                    ));
                }

                let true_branch = true_branch.check(ctx)?;
                let false_branch = false_branch.check(ctx)?;

                let true_type = true_branch
                    .get_info()
                    .type_id
                    .borrow()
                    .clone()
                    .unwrap_or(Type::Unknown);
                let false_type = false_branch
                    .get_info()
                    .type_id
                    .borrow()
                    .clone()
                    .unwrap_or(Type::Unknown);

                let result_type = if true_type == Type::NoReturn {
                    false_type
                } else if false_type == Type::NoReturn {
                    true_type
                } else if true_type == false_type {
                    true_type
                } else {
                    return Err(TypeCheckError::TypeMismatch(
                        TypeMismatch {
                            expected: true_type,
                            actual: false_type,
                        },
                        false_branch.position(),
                    ));
                };

                Ok(Expression::Ternary {
                    condition: Box::new(condition),
                    true_branch: Box::new(true_branch),
                    false_branch: Box::new(false_branch),
                    info: TypeInformation {
                        type_id: Rc::new(RefCell::new(Some(result_type))),
                        context,
                    },
                    position,
                })
            }
        }
    }

    fn revert(this: &Self::Typed) -> Self {
        match this {
            Expression::Id(id) => Expression::Id(TypeCheckable::revert(id)),
            Expression::Num(num) => Expression::Num(TypeCheckable::revert(num)),
            Expression::Bool(bool) => Expression::Bool(TypeCheckable::revert(bool)),
            Expression::Character(character) => {
                Expression::Character(TypeCheckable::revert(character))
            }
            Expression::AstString(string) => Expression::AstString(TypeCheckable::revert(string)),
            Expression::Function(func) => Expression::Function(TypeCheckable::revert(func)),
            Expression::Lambda(lambda) => Expression::Lambda(TypeCheckable::revert(lambda)),
            Expression::If(if_exp) => Expression::If(TypeCheckable::revert(if_exp)),
            Expression::Block(block) => Expression::Block(TypeCheckable::revert(block)),
            Expression::Parens(exp) => {
                Expression::Parens(Box::new(TypeCheckable::revert(exp.as_ref())))
            }
            Expression::Postfix(post) => Expression::Postfix(TypeCheckable::revert(post)),
            Expression::Prefix(pref) => Expression::Prefix(TypeCheckable::revert(pref)),
            Expression::Binary(bin) => {
                Expression::Binary(Box::new(TypeCheckable::revert(bin.as_ref())))
            }
            Expression::Array(arr) => Expression::Array(TypeCheckable::revert(arr)),
            Expression::StructInitialisation(_) => todo!(),
            Expression::Sizeof(type_name, _, position) => {
                Expression::Sizeof(type_name.clone(), (), position.clone())
            }
            Expression::Ternary {
                condition,
                true_branch,
                false_branch,
                position,
                ..
            } => Expression::Ternary {
                condition: Box::new(TypeCheckable::revert(condition.as_ref())),
                true_branch: Box::new(TypeCheckable::revert(true_branch.as_ref())),
                false_branch: Box::new(TypeCheckable::revert(false_branch.as_ref())),
                info: (),
                position: position.clone(),
            },
        }
    }
}

impl TypedConstruct for Expression<TypeInformation> {
    type Validated = Expression<ValidatedTypeInformation>;

    fn update_type(&mut self, type_id: Type) -> Result<(), TypeCheckError> {
        match self {
            Expression::Id(_) => unreachable!(),
            Expression::Num(num) => num.update_type(type_id),
            Expression::Bool(_) => unreachable!(),
            Expression::Character(_) => unreachable!(),
            Expression::AstString(_) => unreachable!(),
            Expression::Function(_) => unreachable!(),
            Expression::Lambda(lambda) => lambda.update_type(type_id),
            Expression::If(_) => unreachable!(),
            Expression::Block(_) => unreachable!(),
            Expression::Parens(inner_expression) => inner_expression.update_type(type_id),
            Expression::Postfix(_) => unreachable!(),
            Expression::Prefix(_) => unreachable!(),
            Expression::Binary(_) => unreachable!(),
            Expression::Array(array) => array.update_type(type_id),
            Expression::StructInitialisation(_) => unreachable!(),
            Expression::Sizeof(..) => unreachable!(),
            Expression::Ternary { .. } => unreachable!(),
        }
    }

    fn validate(self) -> Result<Self::Validated, TypeValidationError> {
        match self {
            Expression::Id(id) => Ok(Expression::Id(id.validate()?)),
            Expression::Num(num) => Ok(Expression::Num(num.validate()?)),
            Expression::Bool(bool) => Ok(Expression::Bool(bool.validate()?)),
            Expression::Character(character) => Ok(Expression::Character(character.validate()?)),
            Expression::AstString(string) => Ok(Expression::AstString(string.validate()?)),
            Expression::Function(function) => Ok(Expression::Function(function.validate()?)),
            Expression::Lambda(lambda) => Ok(Expression::Lambda(lambda.validate()?)),
            Expression::If(if_expression) => Ok(Expression::If(if_expression.validate()?)),
            Expression::Block(block) => Ok(Expression::Block(block.validate()?)),
            Expression::Parens(parens) => Ok(Expression::Parens(Box::new(parens.validate()?))),
            Expression::Postfix(postfix) => Ok(Expression::Postfix(postfix.validate()?)),
            Expression::Prefix(prefix) => Ok(Expression::Prefix(prefix.validate()?)),
            Expression::Binary(binary) => Ok(Expression::Binary(Box::new(binary.validate()?))),
            Expression::Array(array) => Ok(Expression::Array(array.validate()?)),
            Expression::StructInitialisation(struct_initialisation) => Ok(
                Expression::StructInitialisation(struct_initialisation.validate()?),
            ),
            Expression::Sizeof(type_name, info, position) => Ok(Expression::Sizeof(
                type_name,
                info.validate(&position)?,
                position,
            )),
            Expression::Ternary {
                condition,
                true_branch,
                false_branch,
                info,
                position,
            } => Ok(Expression::Ternary {
                condition: Box::new(condition.validate()?),
                true_branch: Box::new(true_branch.validate()?),
                false_branch: Box::new(false_branch.validate()?),
                info: info.validate(&position)?,
                position,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::{
        lexer::Span,
        parser::ast::{Bool, Expression, Num, TypeName},
        typechecker::{context::Context, error::TypeCheckError, types::Type, TypeCheckable},
    };

    #[test]
    fn test_sizeof_always_yields_integer() -> Result<()> {
        let mut ctx = Context::default();

        let sizeof = Expression::Sizeof(TypeName::Literal("i64".into(), Span::default()), (), Span::default());
        let checked = sizeof.check(&mut ctx)?;

        let Expression::Sizeof(_, info, _) = checked else {
            panic!("expected a sizeof expression")
        };
        assert_eq!(info.type_id.borrow().clone(), Some(Type::Integer));

        Ok(())
    }

    #[test]
    fn test_sizeof_of_undefined_type_errors() {
        let mut ctx = Context::default();

        let sizeof = Expression::Sizeof(TypeName::Literal("Bogus".into(), Span::default()), (), Span::default());
        assert!(sizeof.check(&mut ctx).is_err());
    }

    #[test]
    fn test_ternary_resolves_matching_branch_types() -> Result<()> {
        let mut ctx = Context::default();

        let ternary = Expression::Ternary {
            condition: Box::new(Expression::Bool(Bool {
                value: true,
                info: (),
                position: Span::default(),
            })),
            true_branch: Box::new(Expression::Num(Num::Integer(1, (), Span::default()))),
            false_branch: Box::new(Expression::Num(Num::Integer(2, (), Span::default()))),
            info: (),
            position: Span::default(),
        };

        let checked = ternary.check(&mut ctx)?;
        let Expression::Ternary { info, .. } = checked else {
            panic!("expected a ternary expression")
        };
        assert_eq!(info.type_id.borrow().clone(), Some(Type::Integer));

        Ok(())
    }

    #[test]
    fn test_ternary_requires_boolean_condition() {
        let mut ctx = Context::default();

        let ternary = Expression::Ternary {
            condition: Box::new(Expression::Num(Num::Integer(1, (), Span::default()))),
            true_branch: Box::new(Expression::Num(Num::Integer(1, (), Span::default()))),
            false_branch: Box::new(Expression::Num(Num::Integer(2, (), Span::default()))),
            info: (),
            position: Span::default(),
        };

        let result = ternary.check(&mut ctx);
        assert!(matches!(result, Err(TypeCheckError::TypeMismatch(_, _))));
    }

    #[test]
    fn test_ternary_rejects_mismatched_branch_types() {
        let mut ctx = Context::default();

        let ternary = Expression::Ternary {
            condition: Box::new(Expression::Bool(Bool {
                value: true,
                info: (),
                position: Span::default(),
            })),
            true_branch: Box::new(Expression::Num(Num::Integer(1, (), Span::default()))),
            false_branch: Box::new(Expression::Num(Num::FloatingPoint(2.0, (), Span::default()))),
            info: (),
            position: Span::default(),
        };

        let result = ternary.check(&mut ctx);
        assert!(matches!(result, Err(TypeCheckError::TypeMismatch(_, _))));
    }
}
