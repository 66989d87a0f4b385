//! Trait and impl store.
//!
//! Traits are nominal templates with a self type and a set of method
//! signatures; they may list super-traits which must themselves already be
//! defined (and not repeated). Impls bind a trait application to a concrete
//! target type together with the method bodies realising it. Method lookup
//! walks super-traits transitively; `implements` answers whether some
//! concrete type has a matching impl for a trait application.

use std::collections::HashMap;

use super::types::Type;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateSuperTrait {
    pub trait_name: String,
    pub super_trait: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedSuperTrait {
    pub trait_name: String,
    pub super_trait: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedefinedTrait {
    pub trait_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraitDef {
    pub name: String,
    pub super_traits: Vec<String>,
    pub methods: HashMap<String, Type>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplEntry {
    pub trait_name: String,
    pub target: Type,
    pub methods: HashMap<String, Type>,
}

#[derive(Clone, Debug, Default)]
pub struct TraitStore {
    traits: HashMap<String, TraitDef>,
    impls: Vec<ImplEntry>,
}

impl TraitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trait. Rejects a duplicate trait name, an undefined
    /// super-trait, or the same super-trait listed twice.
    pub fn add_trait(
        &mut self,
        name: impl ToString,
        super_traits: Vec<String>,
        methods: HashMap<String, Type>,
    ) -> Result<(), TraitStoreError> {
        let name = name.to_string();

        if self.traits.contains_key(&name) {
            return Err(TraitStoreError::RedefinedTrait(RedefinedTrait {
                trait_name: name,
            }));
        }

        let mut seen = std::collections::HashSet::new();
        for super_trait in &super_traits {
            if !seen.insert(super_trait.clone()) {
                return Err(TraitStoreError::DuplicateSuperTrait(DuplicateSuperTrait {
                    trait_name: name,
                    super_trait: super_trait.clone(),
                }));
            }

            if !self.traits.contains_key(super_trait) {
                return Err(TraitStoreError::UndefinedSuperTrait(UndefinedSuperTrait {
                    trait_name: name,
                    super_trait: super_trait.clone(),
                }));
            }
        }

        self.traits.insert(
            name.clone(),
            TraitDef {
                name,
                super_traits,
                methods,
            },
        );

        Ok(())
    }

    pub fn get_trait(&self, name: &str) -> Option<&TraitDef> {
        self.traits.get(name)
    }

    /// Resolve a method signature on a trait, walking super-traits
    /// transitively when it is not declared directly on `trait_name`.
    pub fn find_method(&self, trait_name: &str, method: &str) -> Option<Type> {
        let def = self.traits.get(trait_name)?;

        if let Some(ty) = def.methods.get(method) {
            return Some(ty.clone());
        }

        for super_trait in &def.super_traits {
            if let Some(ty) = self.find_method(super_trait, method) {
                return Some(ty);
            }
        }

        None
    }

    pub fn add_impl(&mut self, impl_entry: ImplEntry) {
        self.impls.push(impl_entry);
    }

    /// Does `target` have a registered impl for `trait_name`?
    pub fn implements(&self, target: &Type, trait_name: &str) -> bool {
        self.impls
            .iter()
            .any(|entry| entry.trait_name == trait_name && entry.target.does_eq(target))
    }

    /// Resolve a method through an impl for `(target, trait_name)`, falling
    /// back to the trait's own default-less signature lookup.
    pub fn find_impl_method(&self, target: &Type, trait_name: &str, method: &str) -> Option<Type> {
        self.impls
            .iter()
            .find(|entry| entry.trait_name == trait_name && entry.target.does_eq(target))
            .and_then(|entry| entry.methods.get(method).cloned())
            .or_else(|| self.find_method(trait_name, method))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraitStoreError {
    DuplicateSuperTrait(DuplicateSuperTrait),
    UndefinedSuperTrait(UndefinedSuperTrait),
    RedefinedTrait(RedefinedTrait),
}

impl std::fmt::Display for TraitStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraitStoreError::DuplicateSuperTrait(e) => write!(
                f,
                "super-trait '{}' is listed more than once for trait '{}'",
                e.super_trait, e.trait_name
            ),
            TraitStoreError::UndefinedSuperTrait(e) => write!(
                f,
                "trait '{}' has undefined super-trait '{}'",
                e.trait_name, e.super_trait
            ),
            TraitStoreError::RedefinedTrait(e) => {
                write!(f, "trait '{}' is already defined", e.trait_name)
            }
        }
    }
}

impl std::error::Error for TraitStoreError {}
