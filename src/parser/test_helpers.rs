use crate::{
    lexer::{Lexer, Token},
    parser::{
        ast::{
            Array, Assignment, AstNode, Bool, Declaration, Expression, Function, If,
            Initialisation, Lambda, Statement, StructInitialisation, TopLevelStatement, TypeName,
        },
        parse_program, FromTokens, ParseState,
    },
};

fn lex(code: &str) -> Result<ParseState<Token>, String> {
    Lexer::new(code)
        .lex()
        .map(Into::into)
        .map_err(|e| format!("Lex error: {e}"))
}

/// Parses `code` directly via a node's own `FromTokens` impl, without wrapping it in any
/// surrounding statement/function context, and unwraps the matching `AstNode` variant.
macro_rules! node_helper {
    ($fn_name:ident, $node:ty, $variant:ident, $ret:ty) => {
        pub fn $fn_name(code: &str) -> Result<$ret, String> {
            let mut tokens = lex(code)?;
            match <$node as FromTokens<Token>>::parse(&mut tokens)
                .map_err(|e| format!("Parse error: {e}"))?
            {
                AstNode::$variant(node) => Ok(node),
                other => Err(format!("Expected {}, got {other:?}", stringify!($variant))),
            }
        }
    };
}

node_helper!(parse_block, crate::parser::ast::Block<()>, Block, crate::parser::ast::Block<()>);
node_helper!(parse_if, If<()>, If, If<()>);
node_helper!(parse_array, Array<()>, Array, Array<()>);
node_helper!(parse_lambda, Lambda<()>, Lambda, Lambda<()>);
node_helper!(
    parse_struct_init,
    StructInitialisation<()>,
    StructInitialisation,
    StructInitialisation<()>
);
node_helper!(parse_assignment, Assignment<()>, Assignment, Assignment<()>);

/// Helper to parse a single expression by wrapping it in a minimal function context.
pub fn parse_expression(code: &str) -> Result<Expression<()>, String> {
    let wrapped = format!("fn main(): void {{ {code}; }}");
    match first_body_statement(&wrapped)? {
        Statement::Expression(expr) => Ok(expr),
        other => Err(format!("Expected an expression statement, got {other:?}")),
    }
}

/// Helper to parse an expression that should be wrapped in yielding (tail) position.
pub fn parse_yielding_expression(code: &str) -> Result<Expression<()>, String> {
    let wrapped = format!("fn main(): void {{ {code} }}");
    match first_body_statement(&wrapped)? {
        Statement::YieldingExpression(expr) => Ok(expr),
        other => Err(format!(
            "Expected a yielding expression statement, got {other:?}"
        )),
    }
}

/// Helper function to parse a single statement by wrapping it in a minimal function context.
pub fn parse_statement(code: &str) -> Result<Statement<()>, String> {
    let wrapped = format!("fn main(): void {{ {code} }}");
    first_body_statement(&wrapped)
}

fn first_body_statement(wrapped: &str) -> Result<Statement<()>, String> {
    let function = parse_function(wrapped)?;
    function
        .body
        .statements
        .first()
        .cloned()
        .ok_or_else(|| "function body was empty".to_string())
}

/// Helper function to parse a type name by wrapping it in a declaration context.
pub fn parse_type_name(code: &str) -> Result<TypeName, String> {
    let wrapped = format!("declare x: {code};");
    let program = parse_program(&wrapped).map_err(|e| format!("Parse error: {e}"))?;

    match program.into_iter().next() {
        Some(TopLevelStatement::Declaration(declaration)) => Ok(declaration.type_name),
        other => Err(format!("Expected a declaration, got {other:?}")),
    }
}

/// Helper function to parse a complete function.
pub fn parse_function(code: &str) -> Result<Function<()>, String> {
    let program = parse_program(code).map_err(|e| format!("Parse error: {e}"))?;

    match program.into_iter().next() {
        Some(TopLevelStatement::Function(function)) => Ok(function),
        other => Err(format!("Expected a function, got {other:?}")),
    }
}

/// Helper function to parse a program and extract the first statement of a specific type.
pub fn parse_program_single<T>(code: &str) -> Result<T, String>
where
    T: TryFrom<TopLevelStatement<()>>,
{
    let program = parse_program(code).map_err(|e| format!("Parse error: {e}"))?;

    let Some(statement) = program.into_iter().next() else {
        return Err("No statements found in program".to_string());
    };

    T::try_from(statement).map_err(|_| "Failed to convert to target type".to_string())
}

/// Helper to parse a full `declare ...;` statement.
pub fn parse_declaration(code: &str) -> Result<Declaration<()>, String> {
    let program = parse_program(code).map_err(|e| format!("Parse error: {e}"))?;

    match program.into_iter().next() {
        Some(TopLevelStatement::Declaration(declaration)) => Ok(declaration),
        other => Err(format!("Expected a declaration, got {other:?}")),
    }
}

/// Helper to parse a full `let ...;` statement.
pub fn parse_initialization(code: &str) -> Result<Initialisation<()>, String> {
    match parse_statement(code)? {
        Statement::Initialization(init) => Ok(init),
        other => Err(format!("Expected an initialisation, got {other:?}")),
    }
}

/// Helper to parse a number literal directly.
pub fn parse_number(code: &str) -> Result<crate::parser::ast::Num<()>, String> {
    match parse_expression(code)? {
        Expression::Num(num) => Ok(num),
        _ => Err("Expected number expression".to_string()),
    }
}

/// Helper to parse an identifier directly.
pub fn parse_id(code: &str) -> Result<crate::parser::ast::Id<()>, String> {
    match parse_expression(code)? {
        Expression::Id(id) => Ok(id),
        _ => Err("Expected identifier expression".to_string()),
    }
}

/// Helper to parse a string literal directly.
pub fn parse_string(code: &str) -> Result<crate::parser::ast::AstString<()>, String> {
    match parse_expression(code)? {
        Expression::AstString(string) => Ok(string),
        _ => Err("Expected string expression".to_string()),
    }
}

/// Helper to parse a boolean literal directly.
pub fn parse_bool(code: &str) -> Result<Bool<()>, String> {
    match parse_expression(code)? {
        Expression::Bool(b) => Ok(b),
        _ => Err("Expected boolean expression".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        let result = parse_number("42").unwrap();
        assert!(matches!(
            result,
            crate::parser::ast::Num::Integer(42, (), _)
        ));
    }

    #[test]
    fn test_parse_id() {
        let result = parse_id("foo").unwrap();
        assert_eq!(result.name, "foo");
    }

    #[test]
    fn test_parse_type_name() {
        let result = parse_type_name("i32").unwrap();
        assert!(matches!(result, TypeName::Literal(ref name, _) if name == "i32"));
    }
}
