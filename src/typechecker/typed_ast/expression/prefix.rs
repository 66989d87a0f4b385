use std::{cell::RefCell, rc::Rc};

use crate::typechecker::{TypeValidationError, TypedConstruct, ValidatedTypeInformation};
use crate::{
    parser::ast::Prefix,
    typechecker::{
        context::Context,
        error::{TypeCheckError, TypeMismatch},
        types::Type,
        TypeCheckable, TypeInformation, TypeResult,
    },
};

impl TypeCheckable for Prefix<()> {
    type Typed = Prefix<TypeInformation>;

    fn check(self, ctx: &mut Context) -> TypeResult<Self::Typed> {
        // Prefix operators modify their operand expressions in specific ways
        // Both negation (!) and minus (-) have strict type requirements for their operands
        match self {
            // Logical negation operator (!expr) - requires boolean operand
            Prefix::Negation { expr, position } => {
                // First type check the operand expression
                let expr = expr.check(ctx)?;

                // Extract the operand's type to verify it's boolean
                let info = expr.get_info();
                let type_id_ref = info.type_id;
                let type_id = type_id_ref.borrow().clone();

                // Verify the operand has boolean type - negation only works on booleans
                if let Some(type_id) = type_id {
                    if type_id != Type::Boolean {
                        // Operand is not boolean - this is a type error
                        return Err(TypeCheckError::TypeMismatch(
                            TypeMismatch {
                                expected: Type::Boolean,
                                actual: type_id,
                            },
                            expr.position(),
                        ));
                    }
                }

                // Negation result inherits the boolean type from its operand
                Ok(Prefix::Negation {
                    expr: Box::new(expr),
                    position,
                })
            }
            // Arithmetic negation operator (-expr) - requires numeric operand
            Prefix::Minus { expr, position } => {
                // First type check the operand expression
                let expr = expr.check(ctx)?;

                // Extract the operand's type to verify it's numeric
                let info = expr.get_info();
                let type_id_ref = info.type_id;
                let type_id = type_id_ref.borrow().clone();

                // Verify the operand has numeric type - minus only works on numbers
                if let Some(type_id) = type_id {
                    if type_id != Type::Integer && type_id != Type::FloatingPoint {
                        // Operand is not numeric - this is a type error
                        return Err(TypeCheckError::TypeMismatch(
                            TypeMismatch {
                                expected: Type::Integer,
                                actual: type_id,
                            },
                            expr.position(),
                        ));
                    }
                }

                // Minus result inherits the numeric type from its operand
                Ok(Prefix::Minus {
                    expr: Box::new(expr),
                    position,
                })
            }
            // `&expr` - borrowed pointer to the operand's storage
            Prefix::Reference {
                expr,
                position,
                info: (),
            } => {
                let expr = expr.check(ctx)?;
                let operand_type = expr.get_info().type_id.borrow().clone();
                let result_type = Type::Pointer {
                    owned: false,
                    referent: Box::new(operand_type.unwrap_or(Type::Unknown)),
                    address_space: 0,
                };

                Ok(Prefix::Reference {
                    expr: Box::new(expr),
                    info: TypeInformation {
                        type_id: Rc::new(RefCell::new(Some(result_type))),
                        context: ctx.clone(),
                    },
                    position,
                })
            }
            // `~expr` - owned pointer to the operand's storage
            Prefix::Owned {
                expr,
                position,
                info: (),
            } => {
                let expr = expr.check(ctx)?;
                let operand_type = expr.get_info().type_id.borrow().clone();
                let result_type = Type::Pointer {
                    owned: true,
                    referent: Box::new(operand_type.unwrap_or(Type::Unknown)),
                    address_space: 0,
                };

                Ok(Prefix::Owned {
                    expr: Box::new(expr),
                    info: TypeInformation {
                        type_id: Rc::new(RefCell::new(Some(result_type))),
                        context: ctx.clone(),
                    },
                    position,
                })
            }
            // `*expr` - dereference a pointer, yielding its referent type
            Prefix::Deref {
                expr,
                position,
                info: (),
            } => {
                let expr = expr.check(ctx)?;
                let operand_type = expr.get_info().type_id.borrow().clone();

                let result_type = match operand_type {
                    Some(Type::Pointer { referent, .. }) => *referent,
                    Some(other) => {
                        return Err(TypeCheckError::TypeMismatch(
                            TypeMismatch {
                                expected: Type::Pointer {
                                    owned: false,
                                    referent: Box::new(Type::Unknown),
                                    address_space: 0,
                                },
                                actual: other,
                            },
                            expr.position(),
                        ))
                    }
                    None => Type::Unknown,
                };

                Ok(Prefix::Deref {
                    expr: Box::new(expr),
                    info: TypeInformation {
                        type_id: Rc::new(RefCell::new(Some(result_type))),
                        context: ctx.clone(),
                    },
                    position,
                })
            }
            // `run expr` - evaluate for side effects only, result is always void
            Prefix::Run {
                expr,
                position,
                info: (),
            } => {
                let expr = expr.check(ctx)?;

                Ok(Prefix::Run {
                    expr: Box::new(expr),
                    info: TypeInformation {
                        type_id: Rc::new(RefCell::new(Some(Type::Void))),
                        context: ctx.clone(),
                    },
                    position,
                })
            }
            // `halt expr` - abort; never hands control back to the caller
            Prefix::Halt {
                expr,
                position,
                info: (),
            } => {
                let expr = expr.check(ctx)?;

                Ok(Prefix::Halt {
                    expr: Box::new(expr),
                    info: TypeInformation {
                        type_id: Rc::new(RefCell::new(Some(Type::NoReturn))),
                        context: ctx.clone(),
                    },
                    position,
                })
            }
        }
    }

    fn revert(this: &Self::Typed) -> Self {
        match this {
            Prefix::Negation { expr, position } => Prefix::Negation {
                expr: Box::new(TypeCheckable::revert(expr.as_ref())),
                position: position.clone(),
            },
            Prefix::Minus { expr, position } => Prefix::Minus {
                expr: Box::new(TypeCheckable::revert(expr.as_ref())),
                position: position.clone(),
            },
            Prefix::Reference {
                expr, position, ..
            } => Prefix::Reference {
                expr: Box::new(TypeCheckable::revert(expr.as_ref())),
                info: (),
                position: position.clone(),
            },
            Prefix::Owned {
                expr, position, ..
            } => Prefix::Owned {
                expr: Box::new(TypeCheckable::revert(expr.as_ref())),
                info: (),
                position: position.clone(),
            },
            Prefix::Deref {
                expr, position, ..
            } => Prefix::Deref {
                expr: Box::new(TypeCheckable::revert(expr.as_ref())),
                info: (),
                position: position.clone(),
            },
            Prefix::Run {
                expr, position, ..
            } => Prefix::Run {
                expr: Box::new(TypeCheckable::revert(expr.as_ref())),
                info: (),
                position: position.clone(),
            },
            Prefix::Halt {
                expr, position, ..
            } => Prefix::Halt {
                expr: Box::new(TypeCheckable::revert(expr.as_ref())),
                info: (),
                position: position.clone(),
            },
        }
    }
}

impl TypedConstruct for Prefix<TypeInformation> {
    type Validated = Prefix<ValidatedTypeInformation>;

    fn validate(self) -> Result<Self::Validated, TypeValidationError> {
        match self {
            Prefix::Negation { expr, position } => Ok(Prefix::Negation {
                expr: Box::new(expr.validate()?),
                position,
            }),
            Prefix::Minus { expr, position } => Ok(Prefix::Minus {
                expr: Box::new(expr.validate()?),
                position,
            }),
            Prefix::Reference {
                expr,
                info,
                position,
            } => Ok(Prefix::Reference {
                expr: Box::new(expr.validate()?),
                info: info.validate(&position)?,
                position,
            }),
            Prefix::Owned {
                expr,
                info,
                position,
            } => Ok(Prefix::Owned {
                expr: Box::new(expr.validate()?),
                info: info.validate(&position)?,
                position,
            }),
            Prefix::Deref {
                expr,
                info,
                position,
            } => Ok(Prefix::Deref {
                expr: Box::new(expr.validate()?),
                info: info.validate(&position)?,
                position,
            }),
            Prefix::Run {
                expr,
                info,
                position,
            } => Ok(Prefix::Run {
                expr: Box::new(expr.validate()?),
                info: info.validate(&position)?,
                position,
            }),
            Prefix::Halt {
                expr,
                info,
                position,
            } => Ok(Prefix::Halt {
                expr: Box::new(expr.validate()?),
                info: info.validate(&position)?,
                position,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use anyhow::Result;

    use crate::{
        lexer::Span,
        parser::ast::{BinaryExpression, BinaryOperator, Expression, Num, Prefix},
        typechecker::{
            context::Context,
            error::{TypeCheckError, TypeMismatch},
            types::Type,
            TypeCheckable,
        },
    };

    #[test]
    fn test_simple_prefix_minus() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Minus {
            expr: Box::new(Expression::Num(Num::Integer(42, (), Span::default()))),
            position: Span::default(),
        };

        let pref = pref.check(&mut ctx)?;

        assert_eq!(
            pref.get_info().type_id,
            Rc::new(RefCell::new(Some(Type::Integer)))
        );
        Ok(())
    }

    #[test]
    fn test_simple_prefix_negation() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Negation {
            expr: Box::new(Expression::Binary(Box::new(BinaryExpression {
                left: Expression::Num(Num::Integer(42, (), Span::default())),
                right: Expression::Num(Num::Integer(1337, (), Span::default())),
                operator: BinaryOperator::LessThan,
                info: (),
                position: Span::default(),
            }))),
            position: Span::default(),
        };

        let pref = pref.check(&mut ctx)?;

        assert_eq!(
            pref.get_info().type_id,
            Rc::new(RefCell::new(Some(Type::Boolean)))
        );
        Ok(())
    }

    #[test]
    fn test_error_in_non_numeric_minus() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Minus {
            expr: Box::new(Expression::Binary(Box::new(BinaryExpression {
                left: Expression::Num(Num::Integer(42, (), Span::default())),
                right: Expression::Num(Num::Integer(1337, (), Span::default())),
                operator: BinaryOperator::LessThan,
                info: (),
                position: Span::default(),
            }))),
            position: Span::default(),
        };

        let res = pref.check(&mut ctx);

        assert_eq!(
            res,
            Err(TypeCheckError::TypeMismatch(
                TypeMismatch {
                    expected: Type::Integer,
                    actual: Type::Boolean
                },
                Span::default()
            ))
        );
        Ok(())
    }

    #[test]
    fn test_error_in_non_boolean_negation() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Negation {
            expr: Box::new(Expression::Num(Num::Integer(42, (), Span::default()))),
            position: Span::default(),
        };

        let res = pref.check(&mut ctx);

        assert_eq!(
            res,
            Err(TypeCheckError::TypeMismatch(
                TypeMismatch {
                    expected: Type::Boolean,
                    actual: Type::Integer
                },
                Span::default()
            ))
        );
        Ok(())
    }

    #[test]
    fn test_reference_wraps_operand_in_borrowed_pointer() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Reference {
            expr: Box::new(Expression::Num(Num::Integer(42, (), Span::default()))),
            info: (),
            position: Span::default(),
        };

        let pref = pref.check(&mut ctx)?;

        assert_eq!(
            pref.get_info().type_id,
            Rc::new(RefCell::new(Some(Type::Pointer {
                owned: false,
                referent: Box::new(Type::Integer),
                address_space: 0,
            })))
        );
        Ok(())
    }

    #[test]
    fn test_owned_wraps_operand_in_owned_pointer() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Owned {
            expr: Box::new(Expression::Num(Num::Integer(42, (), Span::default()))),
            info: (),
            position: Span::default(),
        };

        let pref = pref.check(&mut ctx)?;

        assert_eq!(
            pref.get_info().type_id,
            Rc::new(RefCell::new(Some(Type::Pointer {
                owned: true,
                referent: Box::new(Type::Integer),
                address_space: 0,
            })))
        );
        Ok(())
    }

    #[test]
    fn test_deref_unwraps_pointer_referent() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Deref {
            expr: Box::new(Expression::Prefix(Prefix::Reference {
                expr: Box::new(Expression::Num(Num::Integer(42, (), Span::default()))),
                info: (),
                position: Span::default(),
            })),
            info: (),
            position: Span::default(),
        };

        let pref = pref.check(&mut ctx)?;

        assert_eq!(
            pref.get_info().type_id,
            Rc::new(RefCell::new(Some(Type::Integer)))
        );
        Ok(())
    }

    #[test]
    fn test_deref_rejects_non_pointer_operand() {
        let mut ctx = Context::default();

        let pref = Prefix::Deref {
            expr: Box::new(Expression::Num(Num::Integer(42, (), Span::default()))),
            info: (),
            position: Span::default(),
        };

        let res = pref.check(&mut ctx);

        assert!(matches!(
            res,
            Err(TypeCheckError::TypeMismatch(
                TypeMismatch {
                    actual: Type::Integer,
                    ..
                },
                _
            ))
        ));
    }

    #[test]
    fn test_run_discards_operand_type() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Run {
            expr: Box::new(Expression::Num(Num::Integer(42, (), Span::default()))),
            info: (),
            position: Span::default(),
        };

        let pref = pref.check(&mut ctx)?;

        assert_eq!(
            pref.get_info().type_id,
            Rc::new(RefCell::new(Some(Type::Void)))
        );
        Ok(())
    }

    #[test]
    fn test_halt_never_returns() -> Result<()> {
        let mut ctx = Context::default();

        let pref = Prefix::Halt {
            expr: Box::new(Expression::Num(Num::Integer(42, (), Span::default()))),
            info: (),
            position: Span::default(),
        };

        let pref = pref.check(&mut ctx)?;

        assert_eq!(
            pref.get_info().type_id,
            Rc::new(RefCell::new(Some(Type::NoReturn)))
        );
        Ok(())
    }
}
