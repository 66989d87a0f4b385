use crate::{
    lexer::Token,
    parser::{ast::AstNode, combinators::Comb, FromTokens, ParseError, ParseState},
};

use super::MethodDeclaration;

/// `trait Name : Super1 + Super2 { declare ...; }` — a nominal set of method
/// signatures a type may implement, optionally extending other traits.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TraitDeclaration<T> {
    pub name: String,
    pub super_traits: Vec<String>,
    pub methods: Vec<MethodDeclaration<T>>,
    pub info: T,
    pub position: crate::lexer::Span,
}

impl FromTokens<Token> for TraitDeclaration<()> {
    fn parse(tokens: &mut ParseState<Token>) -> Result<AstNode, ParseError> {
        let position = tokens.span()?;

        let matcher = Comb::TRAIT_KEYWORD >> Comb::ID;
        let result = matcher.parse(tokens)?;

        let Some(AstNode::Id(name)) = result.first().cloned() else {
            unreachable!()
        };

        let super_traits = Self::parse_super_traits(tokens)?;

        let matcher = Comb::LBRACE >> (Comb::METHOD_DECLARATION ^ Comb::RBRACE);
        let result = matcher.parse(tokens)?;

        let mut methods = vec![];
        for node in result {
            let AstNode::MethodDeclaration(declaration) = node else {
                unreachable!()
            };
            methods.push(declaration);
        }

        let end = tokens.prev_span()?;

        Ok(TraitDeclaration {
            name: name.name,
            super_traits,
            methods,
            info: (),
            position: position.merge(&end),
        }
        .into())
    }
}

impl TraitDeclaration<()> {
    /// Parses an optional `: Super1 + Super2` super-trait list. Not finding
    /// one is not an error — traits are allowed to have none.
    fn parse_super_traits(tokens: &mut ParseState<Token>) -> Result<Vec<String>, ParseError> {
        let index = tokens.get_index();

        let matcher = Comb::COLON >> (Comb::ID % Comb::PLUS);
        let Ok(result) = matcher.parse(tokens) else {
            tokens.set_index(index);
            return Ok(vec![]);
        };

        let mut names = vec![];
        for node in result {
            let AstNode::Id(id) = node else {
                unreachable!()
            };
            names.push(id.name);
        }
        Ok(names)
    }
}

impl From<TraitDeclaration<()>> for AstNode {
    fn from(value: TraitDeclaration<()>) -> Self {
        AstNode::TraitDeclaration(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ast::TopLevelStatement, parse_program};

    fn parse_trait(code: &str) -> TraitDeclaration<()> {
        match parse_program(code).unwrap().into_iter().next() {
            Some(TopLevelStatement::Trait(decl)) => decl,
            other => panic!("expected a trait declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_trait() {
        let result = parse_trait("trait Comparable {}");
        assert_eq!(result.name, "Comparable");
        assert_eq!(result.super_traits.len(), 0);
        assert_eq!(result.methods.len(), 0);
    }

    #[test]
    fn test_trait_with_method() {
        let result = parse_trait("trait Comparable { declare compare(i64): i64; }");
        assert_eq!(result.methods.len(), 1);
        assert_eq!(result.methods[0].id.name, "compare");
    }

    #[test]
    fn test_trait_with_super_traits() {
        let result = parse_trait("trait Ord : Eq + Comparable {}");
        assert_eq!(result.super_traits, vec!["Eq".to_string(), "Comparable".to_string()]);
    }
}
