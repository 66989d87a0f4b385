use crate::lexer::Span;

use super::Expression;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Prefix<T> {
    Negation {
        expr: Box<Expression<T>>,
        position: Span,
    },
    Minus {
        expr: Box<Expression<T>>,
        position: Span,
    },
    /// `&e` — take a borrowed pointer to `e`. Unlike `Negation`/`Minus`
    /// (whose result type always equals the operand's), the pointer type
    /// differs from `e`'s own type, so this variant carries its own `info`
    /// slot rather than delegating to `expr.get_info()`.
    Reference {
        expr: Box<Expression<T>>,
        info: T,
        position: Span,
    },
    /// `~e` — take an owned pointer to `e`.
    Owned {
        expr: Box<Expression<T>>,
        info: T,
        position: Span,
    },
    /// `*e` — dereference a pointer.
    Deref {
        expr: Box<Expression<T>>,
        info: T,
        position: Span,
    },
    /// `run e` — evaluate `e` for its side effects, discarding a `void` result.
    Run {
        expr: Box<Expression<T>>,
        info: T,
        position: Span,
    },
    /// `halt e` — abort execution; never returns control to the caller.
    Halt {
        expr: Box<Expression<T>>,
        info: T,
        position: Span,
    },
}

impl<T> Prefix<T>
where
    T: Clone,
{
    pub fn get_info(&self) -> T {
        match self {
            Prefix::Negation { expr, .. } => expr.get_info(),
            Prefix::Minus { expr, .. } => expr.get_info(),
            Prefix::Reference { info, .. } => info.clone(),
            Prefix::Owned { info, .. } => info.clone(),
            Prefix::Deref { info, .. } => info.clone(),
            Prefix::Run { info, .. } => info.clone(),
            Prefix::Halt { info, .. } => info.clone(),
        }
    }

    pub fn position(&self) -> Span {
        match self {
            Prefix::Negation { position, .. } => position.clone(),
            Prefix::Minus { position, .. } => position.clone(),
            Prefix::Reference { position, .. } => position.clone(),
            Prefix::Owned { position, .. } => position.clone(),
            Prefix::Deref { position, .. } => position.clone(),
            Prefix::Run { position, .. } => position.clone(),
            Prefix::Halt { position, .. } => position.clone(),
        }
    }
}
