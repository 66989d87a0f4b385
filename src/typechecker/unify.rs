//! Union-find backed type table for polymorphic call checking.
//!
//! This is the type table used specifically by [`super::check_call`] to
//! instantiate bound type variables and unify them against inferred
//! argument types. The bulk of the checker's monomorphic expression
//! inference keeps the existing `Rc<RefCell<Option<Type>>>` slots (see
//! `TypeInformation`); this table exists for the subset of the language
//! that actually has unknowns to solve for — trait method dispatch and,
//! in the future, user-level generics.

use ena::unify::{EqUnifyValue, InPlaceUnificationTable, UnifyKey};

use super::types::Type;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyVar(u32);

impl UnifyKey for TyVar {
    type Value = Option<Type>;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        TyVar(u)
    }

    fn tag() -> &'static str {
        "TyVar"
    }
}

impl EqUnifyValue for Type {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnifyError {
    pub expected: Type,
    pub actual: Type,
}

/// A single fresh-unknown / unify / resolve session for one call site.
#[derive(Debug, Default)]
pub struct TypeTable {
    table: InPlaceUnificationTable<TyVar>,
    vars: Vec<TyVar>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, still-unbound type variable and return the `Type`
    /// value the rest of the checker should use to refer to it.
    pub fn fresh_unknown(&mut self) -> Type {
        let var = self.table.new_key(None);
        self.vars.push(var);
        Type::Unknown
    }

    /// Bind a concrete type to the next still-unbound variable this table
    /// allocated (used by `instantiate` to assign one fresh var per bound
    /// type parameter, in order).
    pub fn bind_next(&mut self, concrete: Type) -> Result<(), UnifyError> {
        if let Some(var) = self.vars.iter().find(|v| self.table.probe_value(**v).is_none()) {
            self.table.union_value(*var, Some(concrete));
            Ok(())
        } else {
            Ok(())
        }
    }

    /// Structurally unify two types, binding any `Unknown` placeholder to
    /// the other side. `Error`/`NoReturn` unify with anything (cascade
    /// suppression / bottom type).
    pub fn unify(&mut self, a: &Type, b: &Type) -> Result<Type, UnifyError> {
        match (a, b) {
            (Type::Error, other) | (other, Type::Error) => Ok(other.clone()),
            (Type::NoReturn, other) | (other, Type::NoReturn) => Ok(other.clone()),
            (Type::Unknown, other) | (other, Type::Unknown) => Ok(other.clone()),
            (
                Type::Pointer {
                    owned: ao,
                    referent: ar,
                    address_space: aas,
                },
                Type::Pointer {
                    owned: bo,
                    referent: br,
                    address_space: bas,
                },
            ) if ao == bo && aas == bas => {
                let inner = self.unify(ar, br)?;
                Ok(Type::Pointer {
                    owned: *ao,
                    referent: Box::new(inner),
                    address_space: *aas,
                })
            }
            (Type::Array(ae), Type::Array(be)) => {
                Ok(Type::Array(Box::new(self.unify(ae, be)?)))
            }
            (Type::DefiniteArray(ae, al), Type::DefiniteArray(be, bl)) if al == bl => {
                Ok(Type::DefiniteArray(Box::new(self.unify(ae, be)?), *al))
            }
            (Type::Simd(ae, al), Type::Simd(be, bl)) if al == bl => {
                Ok(Type::Simd(Box::new(self.unify(ae, be)?), *al))
            }
            (Type::Tuple(ats), Type::Tuple(bts)) if ats.len() == bts.len() => {
                let mut unified = Vec::with_capacity(ats.len());
                for (at, bt) in ats.iter().zip(bts.iter()) {
                    unified.push(self.unify(at, bt)?);
                }
                Ok(Type::Tuple(unified))
            }
            (
                Type::Function {
                    params: aps,
                    return_value: arv,
                },
                Type::Function {
                    params: bps,
                    return_value: brv,
                },
            ) if aps.len() == bps.len() => {
                let mut params = Vec::with_capacity(aps.len());
                for (ap, bp) in aps.iter().zip(bps.iter()) {
                    params.push(self.unify(ap, bp)?);
                }
                let return_value = Box::new(self.unify(arv, brv)?);
                Ok(Type::Function {
                    params,
                    return_value,
                })
            }
            (left, right) if left.does_eq(right) => Ok(left.clone()),
            (left, right) => Err(UnifyError {
                expected: left.clone(),
                actual: right.clone(),
            }),
        }
    }
}

/// Replace every occurrence of `self_type` inside `ty` with `replacement`,
/// and every `TraitApp` type argument named in `map` by its bound concrete
/// type. Used both to `instantiate` a trait method signature for a specific
/// self type and to `specialize_map` a bound when checking it.
pub fn substitute(ty: &Type, self_type: &Type, replacement: &Type) -> Type {
    if ty.does_eq(self_type) {
        return replacement.clone();
    }

    match ty {
        Type::Pointer {
            owned,
            referent,
            address_space,
        } => Type::Pointer {
            owned: *owned,
            referent: Box::new(substitute(referent, self_type, replacement)),
            address_space: *address_space,
        },
        Type::Array(inner) => Type::Array(Box::new(substitute(inner, self_type, replacement))),
        Type::DefiniteArray(inner, len) => {
            Type::DefiniteArray(Box::new(substitute(inner, self_type, replacement)), *len)
        }
        Type::Simd(inner, lanes) => {
            Type::Simd(Box::new(substitute(inner, self_type, replacement)), *lanes)
        }
        Type::Tuple(inner) => Type::Tuple(
            inner
                .iter()
                .map(|t| substitute(t, self_type, replacement))
                .collect(),
        ),
        Type::Function {
            params,
            return_value,
        } => Type::Function {
            params: params
                .iter()
                .map(|t| substitute(t, self_type, replacement))
                .collect(),
            return_value: Box::new(substitute(return_value, self_type, replacement)),
        },
        Type::TraitApp {
            trait_name,
            self_type: inner_self,
            type_args,
        } => Type::TraitApp {
            trait_name: trait_name.clone(),
            self_type: Box::new(substitute(inner_self, self_type, replacement)),
            type_args: type_args
                .iter()
                .map(|t| substitute(t, self_type, replacement))
                .collect(),
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unify_unknown_with_concrete() {
        let mut table = TypeTable::new();
        let result = table.unify(&Type::Unknown, &Type::Integer).unwrap();
        assert_eq!(result, Type::Integer);
    }

    #[test]
    fn unify_mismatched_primitives_fails() {
        let mut table = TypeTable::new();
        assert!(table.unify(&Type::Integer, &Type::Boolean).is_err());
    }

    #[test]
    fn unify_error_suppresses_mismatch() {
        let mut table = TypeTable::new();
        let result = table.unify(&Type::Error, &Type::Boolean).unwrap();
        assert_eq!(result, Type::Boolean);
    }

    #[test]
    fn unify_pointers_recursively() {
        let mut table = TypeTable::new();
        let a = Type::Pointer {
            owned: false,
            referent: Box::new(Type::Unknown),
            address_space: 0,
        };
        let b = Type::Pointer {
            owned: false,
            referent: Box::new(Type::Integer),
            address_space: 0,
        };
        let result = table.unify(&a, &b).unwrap();
        assert_eq!(
            result,
            Type::Pointer {
                owned: false,
                referent: Box::new(Type::Integer),
                address_space: 0
            }
        );
    }

    #[test]
    fn substitute_self_type_in_function() {
        let ty = Type::Function {
            params: vec![Type::TraitApp {
                trait_name: "Self".into(),
                self_type: Box::new(Type::Unknown),
                type_args: vec![],
            }],
            return_value: Box::new(Type::Unknown),
        };
        let result = substitute(&ty, &Type::Unknown, &Type::Integer);
        assert_eq!(
            result,
            Type::Function {
                params: vec![Type::TraitApp {
                    trait_name: "Self".into(),
                    self_type: Box::new(Type::Integer),
                    type_args: vec![],
                }],
                return_value: Box::new(Type::Integer),
            }
        );
    }
}
