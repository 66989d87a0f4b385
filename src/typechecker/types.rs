use std::{borrow::Borrow, error::Error, fmt::Display};

use crate::{lexer::Span, parser::ast::TypeName};

use super::{
    context::Context,
    error::{TypeCheckError, UndefinedType},
};

#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Canonical semantic type representation used throughout inference,
/// validation and code generation.
pub enum Type {
    /// 64-bit signed integer primitive
    Integer,
    /// 64-bit IEEE 754 floating point primitive
    FloatingPoint,
    /// Boolean truth value primitive
    Boolean,
    /// Unicode scalar value (character) primitive
    Character,
    /// Immutable UTF-8 string value
    String,
    /// Unit / no-value type used for statements or functions that do not return a value
    Void,
    /// Placeholder used during inference when a concrete type has not yet been determined
    Unknown,
    /// A pointer to an underlying type. `owned` distinguishes an owning (`~`)
    /// pointer from a borrowed (`&`) one; `address_space` tags which memory
    /// space the pointee lives in (`0` for the default/generic space).
    Pointer {
        owned: bool,
        referent: Box<Type>,
        address_space: i64,
    },
    /// Fixed-length heterogeneous ordered collection
    Tuple(Vec<Type>),
    /// Homogeneous sequential collection of elements with a single element type,
    /// of unspecified (runtime-determined) length
    Array(Box<Type>),
    /// Homogeneous sequential collection of a statically known, fixed length
    DefiniteArray(Box<Type>, usize),
    /// Fixed-width SIMD vector of a primitive element type
    Simd(Box<Type>, usize),
    /// User defined struct with name and ordered list of (field_name, field_type) pairs
    Struct(String, Vec<(String, Type)>),
    /// Function signature with parameter types and return type
    Function {
        /// Ordered parameter types
        params: Vec<Type>,
        /// Return value type
        return_value: Box<Type>,
    },
    /// A fn-expression that captures free variables from its enclosing
    /// function. Distinct from `Function` so call sites and codegen know the
    /// value carries captured state (by reference, per the enclosing
    /// function's no-SSA capture decision) alongside its code pointer.
    Closure {
        params: Vec<Type>,
        return_value: Box<Type>,
        captures: Vec<(String, Type)>,
    },
    /// A trait applied to a concrete self type and (possibly empty) type
    /// arguments, e.g. the bound `T: Comparable<T>` instantiated for some `T`.
    TraitApp {
        trait_name: String,
        self_type: Box<Type>,
        type_args: Vec<Type>,
    },
    /// The type of an expression whose checking already failed; unifies with
    /// anything so a single mistake does not cascade into unrelated errors.
    Error,
    /// The type of an expression that never produces control flow normally
    /// (`halt`, a diverging `run`). Unifies with any expected type.
    NoReturn,
}

impl Type {
    /// Structural semantic equality with lightweight reference collapsing.
    ///
    /// Behaviour summary:
    /// - `Reference(T)` equals `T` (one level transparent indirection)
    /// - Function, tuple, array and struct variants compare their contained types structurally
    /// - All other primitives compare by discriminant only
    /// - Does not perform recursive dereferencing of nested `Reference(Reference(T))` chains
    ///   (only a single layer is collapsed) which is sufficient for current language semantics.
    pub fn does_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Error, _) | (_, Self::Error) => true,
            (Self::NoReturn, _) | (_, Self::NoReturn) => true,
            (Self::Tuple(l0), Self::Tuple(r0)) => l0 == r0,
            (Self::Array(l0), Self::Array(r0)) => l0 == r0,
            (Self::DefiniteArray(l0, l1), Self::DefiniteArray(r0, r1)) => l0 == r0 && l1 == r1,
            (Self::Simd(l0, l1), Self::Simd(r0, r1)) => l0 == r0 && l1 == r1,
            (Self::Struct(l0, l1), Self::Struct(r0, r1)) => l0 == r0 && l1 == r1,
            (
                Self::Pointer {
                    owned: l_owned,
                    referent: l_referent,
                    address_space: l_space,
                },
                Self::Pointer {
                    owned: r_owned,
                    referent: r_referent,
                    address_space: r_space,
                },
            ) => l_owned == r_owned && l_referent == r_referent && l_space == r_space,
            (
                Self::Function {
                    params: l_params,
                    return_value: l_return_value,
                },
                Self::Function {
                    params: r_params,
                    return_value: r_return_value,
                },
            ) => l_params == r_params && l_return_value == r_return_value,
            // A closure and a plain function are interchangeable as call
            // targets as long as their signatures match; captures only
            // affect codegen, not call-site type checking.
            (
                Self::Closure {
                    params: l_params,
                    return_value: l_return_value,
                    ..
                },
                Self::Function {
                    params: r_params,
                    return_value: r_return_value,
                },
            )
            | (
                Self::Function {
                    params: l_params,
                    return_value: l_return_value,
                },
                Self::Closure {
                    params: r_params,
                    return_value: r_return_value,
                    ..
                },
            )
            | (
                Self::Closure {
                    params: l_params,
                    return_value: l_return_value,
                    ..
                },
                Self::Closure {
                    params: r_params,
                    return_value: r_return_value,
                    ..
                },
            ) => l_params == r_params && l_return_value == r_return_value,
            (
                Self::TraitApp {
                    trait_name: l_name,
                    self_type: l_self,
                    type_args: l_args,
                },
                Self::TraitApp {
                    trait_name: r_name,
                    self_type: r_self,
                    type_args: r_args,
                },
            ) => l_name == r_name && l_self == r_self && l_args == r_args,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }

    /// Does this type implement the given trait application, per the impl
    /// store recorded for `trait_name`? See [`super::trait_store::TraitStore`].
    pub fn implements(&self, trait_name: &str, store: &super::trait_store::TraitStore) -> bool {
        store.implements(self, trait_name)
    }
}

impl std::fmt::Debug for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "Integer"),
            Self::FloatingPoint => write!(f, "FloatingPoint"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Void => write!(f, "Void"),
            Self::Character => write!(f, "Character"),
            Self::String => write!(f, "String"),
            Self::Unknown => write!(f, "Unknown"),
            Self::Pointer {
                owned,
                referent,
                address_space,
            } => {
                let sigil = if *owned { "~" } else { "&" };
                if *address_space != 0 {
                    write!(f, "{sigil}<{address_space}>{referent:?}")
                } else {
                    write!(f, "{sigil}{referent:?}")
                }
            }
            Self::Tuple(arg0) => f.debug_tuple("Tuple").field(arg0).finish(),
            Self::Array(arg0) => f.debug_tuple("Array").field(arg0).finish(),
            Self::DefiniteArray(arg0, len) => {
                f.write_fmt(format_args!("[{arg0:?} * {len}]"))
            }
            Self::Simd(arg0, lanes) => f.write_fmt(format_args!("<{arg0:?} * {lanes}>")),
            Self::Struct(arg0, _) => f.write_fmt(format_args!("struct {arg0}")),
            Self::Function {
                params,
                return_value,
            } => f.write_fmt(format_args!(
                "({}) -> {return_value:?}",
                params
                    .iter()
                    .map(|i| format!("{i:?}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Self::Closure {
                params,
                return_value,
                captures,
            } => f.write_fmt(format_args!(
                "closure({}) -> {return_value:?} [captures: {}]",
                params
                    .iter()
                    .map(|i| format!("{i:?}"))
                    .collect::<Vec<_>>()
                    .join(", "),
                captures
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty:?}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Self::TraitApp {
                trait_name,
                self_type,
                type_args,
            } => {
                if type_args.is_empty() {
                    write!(f, "{trait_name} for {self_type:?}")
                } else {
                    write!(
                        f,
                        "{trait_name}<{}> for {self_type:?}",
                        type_args
                            .iter()
                            .map(|i| format!("{i:?}"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                }
            }
            Self::Error => write!(f, "Error"),
            Self::NoReturn => write!(f, "noret"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Error converting a parsed `TypeName` AST node into a concrete `Type`.
/// Usually indicates an undefined user type or unsupported literal.
pub struct TypeFromTypeNameError {
    source: TypeName,
}

impl Display for TypeFromTypeNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Failed to convert '{:?}' to a qualified type",
            self.source
        ))
    }
}

impl Error for TypeFromTypeNameError {}

impl From<TypeFromTypeNameError> for TypeCheckError {
    fn from(value: TypeFromTypeNameError) -> Self {
        TypeCheckError::UndefinedType(
            UndefinedType {
                type_name: value.source,
            },
            Span::default(),
        )
    }
}

/// Convert a parsed `TypeName` (or convertible) plus current `Context` into
/// a fully resolved `Type`, performing recursive resolution of nested types
/// and validating user defined type references.
impl<T> TryFrom<(T, &Context)> for Type
where
    T: Into<TypeName>,
{
    type Error = TypeCheckError;

    fn try_from((value, ctx): (T, &Context)) -> Result<Self, Self::Error> {
        let value = value.into();
        match &value {
            TypeName::Literal(lit, span) => match lit.as_str() {
                "i64" => Ok(Type::Integer),
                "f64" => Ok(Type::FloatingPoint),
                "void" => Ok(Type::Void),
                "bool" => Ok(Type::Boolean),
                "char" => Ok(Type::Character),
                "str" => Ok(Type::String),
                "error" => Ok(Type::Error),
                "noret" => Ok(Type::NoReturn),
                literal => match ctx.scope.get_type(literal) {
                    Some(type_id) => Ok(type_id),
                    None => Err(TypeCheckError::UndefinedType(
                        UndefinedType {
                            type_name: value.clone(),
                        },
                        span.clone(),
                    )),
                },
            },
            TypeName::Fn {
                params,
                return_type,
                ..
            } => {
                let mut new_params = vec![];

                for p in params.iter() {
                    new_params.push((p, ctx).try_into()?)
                }

                Ok(Type::Function {
                    params: new_params,
                    return_value: Box::new((return_type.borrow(), ctx).try_into()?),
                })
            }
            TypeName::Tuple(inner, _) => {
                let mut elements = vec![];

                for el in inner.iter() {
                    elements.push((el, ctx).try_into()?);
                }

                Ok(Type::Tuple(elements))
            }
            TypeName::Array(inner, _) => {
                Ok(Type::Array(Box::new((inner.borrow(), ctx).try_into()?)))
            }
            TypeName::DefiniteArray(inner, length, _) => Ok(Type::DefiniteArray(
                Box::new((inner.borrow(), ctx).try_into()?),
                *length,
            )),
            TypeName::Simd(inner, lanes, _) => Ok(Type::Simd(
                Box::new((inner.borrow(), ctx).try_into()?),
                *lanes,
            )),
            TypeName::Reference(inner, _) => Ok(Type::Pointer {
                owned: false,
                referent: Box::new((inner.borrow(), ctx).try_into()?),
                address_space: 0,
            }),
            TypeName::Owned(inner, _) => Ok(Type::Pointer {
                owned: true,
                referent: Box::new((inner.borrow(), ctx).try_into()?),
                address_space: 0,
            }),
        }
    }
}
