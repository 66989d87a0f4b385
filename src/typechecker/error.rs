use std::{error::Error, fmt::Display};

use crate::{lexer::Span, parser::ast::TypeName};

use super::trait_store::TraitStoreError;
use super::types::Type;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeCheckError {
    TypeMismatch(TypeMismatch, Span),
    UndefinedVariable(UndefinedVariable, Span),
    UndefinedType(UndefinedType, Span),
    InvalidConstantType(InvalidConstantType, Span),
    RedefinedConstant(RedefinedConstant, Span),
    ImmutableReassign(ImmutableReassign, Span),
    RedefinedFunction(RedefinedFunction, Span),
    RedefinedMethod(RedefinedMethod, Span),
    MissingInitialisationType(MissingInitialisationType, Span),
    UnsupportedBinaryOperation(UnsupportedBinaryOperation, Span),
    MissingMainFunction(MissingMainFunction),
    InvalidMainSignature(InvalidMainSignature, Span),
    TraitStore(TraitStoreError, Span),
    UndefinedTrait(UndefinedTrait, Span),
    IncompleteImpl(IncompleteImpl, Span),
    RedefinedType(RedefinedType, Span),
}

impl Display for TypeCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.span().to_string(self.err()).as_str())
    }
}

impl TypeCheckError {
    fn span(&self) -> Span {
        match self {
            TypeCheckError::TypeMismatch(_, span) => span.clone(),
            TypeCheckError::UndefinedVariable(_, span) => span.clone(),
            TypeCheckError::UndefinedType(_, span) => span.clone(),
            TypeCheckError::InvalidConstantType(_, span) => span.clone(),
            TypeCheckError::RedefinedConstant(_, span) => span.clone(),
            TypeCheckError::ImmutableReassign(_, span) => span.clone(),
            TypeCheckError::RedefinedFunction(_, span) => span.clone(),
            TypeCheckError::RedefinedMethod(_, span) => span.clone(),
            TypeCheckError::MissingInitialisationType(_, span) => span.clone(),
            TypeCheckError::UnsupportedBinaryOperation(_, span) => span.clone(),
            TypeCheckError::MissingMainFunction(_) => Span::default(),
            TypeCheckError::InvalidMainSignature(_, span) => span.clone(),
            TypeCheckError::TraitStore(_, span) => span.clone(),
            TypeCheckError::UndefinedTrait(_, span) => span.clone(),
            TypeCheckError::IncompleteImpl(_, span) => span.clone(),
            TypeCheckError::RedefinedType(_, span) => span.clone(),
        }
    }

    fn err(&self) -> Box<dyn Error> {
        match self {
            TypeCheckError::TypeMismatch(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedVariable(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedType(e, _) => Box::new(e.clone()),
            TypeCheckError::InvalidConstantType(e, _) => Box::new(e.clone()),
            TypeCheckError::RedefinedConstant(e, _) => Box::new(e.clone()),
            TypeCheckError::ImmutableReassign(e, _) => Box::new(e.clone()),
            TypeCheckError::RedefinedFunction(e, _) => Box::new(e.clone()),
            TypeCheckError::RedefinedMethod(e, _) => Box::new(e.clone()),
            TypeCheckError::MissingInitialisationType(e, _) => Box::new(e.clone()),
            TypeCheckError::UnsupportedBinaryOperation(e, _) => Box::new(e.clone()),
            TypeCheckError::MissingMainFunction(e) => Box::new(e.clone()),
            TypeCheckError::InvalidMainSignature(e, _) => Box::new(e.clone()),
            TypeCheckError::TraitStore(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedTrait(e, _) => Box::new(e.clone()),
            TypeCheckError::IncompleteImpl(e, _) => Box::new(e.clone()),
            TypeCheckError::RedefinedType(e, _) => Box::new(e.clone()),
        }
    }
}

impl Error for TypeCheckError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedTrait {
    pub trait_name: String,
}

impl Display for UndefinedTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Undefined trait '{}'", self.trait_name))
    }
}

impl Error for UndefinedTrait {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncompleteImpl {
    pub trait_name: String,
    pub target: Type,
    pub missing_method: String,
}

impl Display for IncompleteImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Impl of trait '{}' for '{:?}' is missing method '{}'",
            self.trait_name, self.target, self.missing_method
        ))
    }
}

impl Error for IncompleteImpl {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: Type,
    pub actual: Type,
}

impl Display for TypeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Expected type '{:?}' but got '{:?}'",
            self.expected, self.actual
        ))
    }
}

impl Error for TypeMismatch {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedVariable {
    pub variable_name: String,
}

impl Display for UndefinedVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Tried to access undefined variable {}",
            self.variable_name
        ))
    }
}

impl Error for UndefinedVariable {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedType {
    pub type_name: TypeName,
}

impl Display for UndefinedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Undefined type {}", self.type_name))
    }
}

impl Error for UndefinedType {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidConstantType {
    pub constant_name: String,
}

impl Display for InvalidConstantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Constant '{}' needs to have a valid annotated type",
            self.constant_name
        ))
    }
}

impl Error for InvalidConstantType {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedefinedConstant {
    pub constant_name: String,
}

impl Display for RedefinedConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Constant '{}' is already defined",
            self.constant_name
        ))
    }
}

impl Error for RedefinedConstant {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedefinedType {
    pub type_name: String,
}

impl Display for RedefinedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Type '{}' is already defined", self.type_name))
    }
}

impl Error for RedefinedType {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImmutableReassign {
    pub variable_name: String,
}

impl Display for ImmutableReassign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Can not reassign immutable variable '{}'",
            self.variable_name
        ))
    }
}

impl Error for ImmutableReassign {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedefinedFunction {
    pub function_name: String,
}

impl Display for RedefinedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Function '{}' is already defined",
            self.function_name
        ))
    }
}

impl Error for RedefinedFunction {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedefinedMethod {
    pub type_id: Type,
    pub function_name: String,
}

impl Display for RedefinedMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Method '{}' is already defined for type '{:?}'",
            self.function_name, self.type_id
        ))
    }
}

impl Error for RedefinedMethod {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingInitialisationType;

impl Display for MissingInitialisationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Can not infer type of initialisation; an explicit type annotation is required")
    }
}

impl Error for MissingInitialisationType {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsupportedBinaryOperation {
    pub operands: (Type, Type),
}

impl Display for UnsupportedBinaryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (lhs, rhs) = &self.operands;
        f.write_fmt(format_args!(
            "Unsupported binary operation between '{lhs:?}' and '{rhs:?}'"
        ))
    }
}

impl Error for UnsupportedBinaryOperation {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingMainFunction;

impl Display for MissingMainFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Program is missing a 'main' function")
    }
}

impl Error for MissingMainFunction {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidMainSignature;

impl Display for InvalidMainSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("'main' function must take no parameters and return 'void' or 'i32'")
    }
}

impl Error for InvalidMainSignature {}
