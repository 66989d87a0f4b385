//! # Trait Declaration Type Checking: Nominal Interface Registration
//!
//! A trait declaration introduces a named set of method signatures, optionally
//! extending one or more super-traits. Checking a trait declaration does not
//! check any bodies (traits carry none); it registers the trait's signature
//! into the shared trait store so that `impl` blocks and bound checks later
//! in the module can refer to it.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::typechecker::{
    trait_store::TraitStoreError, TypeValidationError, TypedConstruct, ValidatedTypeInformation,
};
use crate::{
    parser::ast::TraitDeclaration,
    typechecker::{
        context::Context, types::Type, ShallowCheck, TypeCheckError, TypeCheckable,
        TypeInformation, TypeResult,
    },
};

impl TraitDeclaration<()> {
    fn method_signatures(&self, ctx: &Context) -> TypeResult<HashMap<String, Type>> {
        let mut methods = HashMap::new();
        for method in &self.methods {
            methods.insert(method.id.name.clone(), method.simple_shallow_check(ctx)?);
        }
        Ok(methods)
    }
}

impl TypeCheckable for TraitDeclaration<()> {
    type Typed = TraitDeclaration<TypeInformation>;

    /// Trait declarations carry no executable code; checking them just
    /// produces typed signatures for every declared method so downstream
    /// tooling (and `revert`) sees consistent type information.
    fn check(self, ctx: &mut Context) -> TypeResult<Self::Typed> {
        let context = ctx.clone();

        let TraitDeclaration {
            name,
            super_traits,
            methods,
            position,
            ..
        } = self;

        let mut checked_methods = vec![];
        for method in methods.into_iter() {
            checked_methods.push(method.check(ctx)?);
        }

        Ok(TraitDeclaration {
            name,
            super_traits,
            methods: checked_methods,
            info: TypeInformation {
                type_id: Rc::new(RefCell::new(Some(Type::Void))),
                context,
            },
            position,
        })
    }

    fn revert(this: &Self::Typed) -> Self {
        let TraitDeclaration {
            name,
            super_traits,
            methods,
            position,
            ..
        } = this;

        TraitDeclaration {
            name: name.clone(),
            super_traits: super_traits.clone(),
            methods: methods.iter().map(TypeCheckable::revert).collect(),
            info: (),
            position: position.clone(),
        }
    }
}

impl ShallowCheck for TraitDeclaration<()> {
    /// Registers the trait's method signatures into the shared trait store so
    /// `impl` blocks parsed anywhere in the module can look it up, regardless
    /// of declaration order.
    fn shallow_check(&self, ctx: &mut Context) -> TypeResult<()> {
        let methods = self.method_signatures(ctx)?;

        ctx.trait_store
            .borrow_mut()
            .add_trait(self.name.clone(), self.super_traits.clone(), methods)
            .map_err(|e| to_type_check_error(e, self.position.clone()))
    }
}

fn to_type_check_error(e: TraitStoreError, position: crate::lexer::Span) -> TypeCheckError {
    TypeCheckError::TraitStore(e, position)
}

impl TypedConstruct for TraitDeclaration<TypeInformation> {
    type Validated = TraitDeclaration<ValidatedTypeInformation>;

    fn validate(self) -> Result<Self::Validated, TypeValidationError> {
        let TraitDeclaration {
            name,
            super_traits,
            methods,
            info,
            position,
        } = self;

        let mut validated_methods = vec![];
        for method in methods {
            validated_methods.push(method.validate()?);
        }

        Ok(TraitDeclaration {
            name,
            super_traits,
            methods: validated_methods,
            info: info.validate(&position)?,
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        lexer::Span,
        parser::ast::{Id, MethodDeclaration, TraitDeclaration, TypeName},
        typechecker::{
            context::Context, trait_store::TraitStoreError, ShallowCheck, TypeCheckError,
            TypeCheckable,
        },
    };

    fn method(name: &str) -> MethodDeclaration<()> {
        MethodDeclaration {
            id: Id {
                name: name.into(),
                info: (),
                position: Span::default(),
            },
            parameter_types: vec![],
            return_type: TypeName::Literal("void".into(), Span::default()),
            info: (),
            position: Span::default(),
        }
    }

    #[test]
    fn registers_trait_with_its_methods() -> anyhow::Result<()> {
        let mut ctx = Context::default();

        let decl = TraitDeclaration {
            name: "Speak".into(),
            super_traits: vec![],
            methods: vec![method("speak")],
            info: (),
            position: Span::default(),
        };

        decl.shallow_check(&mut ctx)?;

        assert!(ctx
            .trait_store
            .borrow()
            .find_method("Speak", "speak")
            .is_some());

        Ok(())
    }

    #[test]
    fn rejects_undefined_super_trait() {
        let mut ctx = Context::default();

        let decl = TraitDeclaration {
            name: "Derived".into(),
            super_traits: vec!["Ghost".into()],
            methods: vec![],
            info: (),
            position: Span::default(),
        };

        let result = decl.shallow_check(&mut ctx);

        assert!(matches!(
            result,
            Err(TypeCheckError::TraitStore(
                TraitStoreError::UndefinedSuperTrait(_),
                _
            ))
        ));
    }

    #[test]
    fn checking_produces_typed_methods() -> anyhow::Result<()> {
        let mut ctx = Context::default();

        let decl = TraitDeclaration {
            name: "Speak".into(),
            super_traits: vec![],
            methods: vec![method("speak")],
            info: (),
            position: Span::default(),
        };

        let checked = decl.check(&mut ctx)?;
        assert_eq!(checked.methods.len(), 1);

        Ok(())
    }
}
