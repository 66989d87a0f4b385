//! # Impl Block Type Checking: Binding a Trait Application to a Concrete Type
//!
//! An `impl Trait for Target { .. }` block realises a trait for a concrete
//! target type. Checking it resolves the target type, binds `this` to it for
//! the method bodies (mirroring instance blocks), verifies every method the
//! trait requires is actually implemented, and registers the resulting
//! `ImplEntry` into the shared trait store so later calls can dispatch
//! through it.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::typechecker::{
    error::{IncompleteImpl, RedefinedConstant, UndefinedTrait},
    trait_store::ImplEntry,
    TypeValidationError, TypedConstruct, ValidatedTypeInformation,
};
use crate::{
    parser::ast::ImplBlock,
    typechecker::{
        context::Context, types::Type, ShallowCheck, TypeCheckError, TypeCheckable,
        TypeInformation, TypeResult,
    },
};

impl ImplBlock<()> {
    fn check_completeness(&self, ctx: &Context) -> TypeResult<()> {
        let store = ctx.trait_store.borrow();
        let Some(trait_def) = store.get_trait(&self.trait_name) else {
            return Err(TypeCheckError::UndefinedTrait(
                UndefinedTrait {
                    trait_name: self.trait_name.clone(),
                },
                self.position.clone(),
            ));
        };

        for required in trait_def.methods.keys() {
            if !self.functions.iter().any(|f| &f.id.name == required) {
                return Err(TypeCheckError::IncompleteImpl(
                    IncompleteImpl {
                        trait_name: self.trait_name.clone(),
                        target: Type::try_from((&self.target, ctx))
                            .unwrap_or(Type::Unknown),
                        missing_method: required.clone(),
                    },
                    self.position.clone(),
                ));
            }
        }

        Ok(())
    }
}

impl TypeCheckable for ImplBlock<()> {
    type Typed = ImplBlock<TypeInformation>;

    fn check(self, ctx: &mut Context) -> TypeResult<Self::Typed> {
        let context = ctx.clone();

        self.check_completeness(ctx)?;

        let ImplBlock {
            trait_name,
            target,
            functions,
            position,
            ..
        } = self;

        let target_type = Type::try_from((&target, &*ctx))?;

        ctx.scope.enter_scope();
        if ctx
            .scope
            .add_constant("this", target_type.clone())
            .is_err()
        {
            return Err(TypeCheckError::RedefinedConstant(
                RedefinedConstant {
                    constant_name: "this".into(),
                },
                position,
            ));
        };

        let mut checked_functions = vec![];
        for function in functions.into_iter() {
            checked_functions.push(function.check(ctx)?);
        }

        ctx.scope.exit_scope();

        Ok(ImplBlock {
            trait_name,
            target,
            functions: checked_functions,
            info: TypeInformation {
                type_id: Rc::new(RefCell::new(Some(Type::Void))),
                context,
            },
            position,
        })
    }

    fn revert(this: &Self::Typed) -> Self {
        let ImplBlock {
            trait_name,
            target,
            functions,
            position,
            ..
        } = this;

        ImplBlock {
            trait_name: trait_name.clone(),
            target: target.clone(),
            functions: functions.iter().map(TypeCheckable::revert).collect(),
            info: (),
            position: position.clone(),
        }
    }
}

impl ShallowCheck for ImplBlock<()> {
    /// Registers the impl's method signatures both on the target type (so
    /// ordinary method-call resolution sees them regardless of declaration
    /// order) and in the trait store (so `implements`/`find_impl_method`
    /// work for the whole module before any impl body is actually checked).
    /// This is what lets an impl declared after its first caller in the
    /// source still dispatch correctly.
    fn shallow_check(&self, ctx: &mut Context) -> TypeResult<()> {
        self.check_completeness(ctx)?;

        let target_type = Type::try_from((&self.target, &*ctx))?;

        let mut methods = HashMap::new();
        for function in &self.functions {
            let function_type = function.simple_shallow_check(ctx)?;
            // An impl re-implementing the same method name on the same type
            // twice is already caught by `RedefinedMethod` here.
            let _ = ctx.scope.add_method_to_type(
                target_type.clone(),
                &function.id.name,
                function_type.clone(),
            );
            methods.insert(function.id.name.clone(), function_type);
        }

        ctx.trait_store.borrow_mut().add_impl(ImplEntry {
            trait_name: self.trait_name.clone(),
            target: target_type,
            methods,
        });

        Ok(())
    }
}

impl TypedConstruct for ImplBlock<TypeInformation> {
    type Validated = ImplBlock<ValidatedTypeInformation>;

    fn validate(self) -> Result<Self::Validated, TypeValidationError> {
        let ImplBlock {
            trait_name,
            target,
            functions,
            info,
            position,
        } = self;

        let mut validated_functions = vec![];
        for function in functions {
            validated_functions.push(function.validate()?);
        }

        Ok(ImplBlock {
            trait_name,
            target,
            functions: validated_functions,
            info: info.validate(&position)?,
            position,
        })
    }
}
