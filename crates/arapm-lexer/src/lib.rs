//! arapm Lexer - Solidity tokenization using logos
//!
//! Lexes flattened Solidity source into declaration-level tokens. Body
//! keywords (`if`, `return`, `emit`, ...) deliberately lex as plain
//! identifiers: the parser skips function bodies by brace matching, so
//! only tokens that shape declarations need their own kind.

mod token;

pub use token::*;

use arapm_ast::Span;
use logos::Logos;

/// Tokenize a source string into a vector of tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        let kind = match result {
            Ok(kind) => kind,
            Err(_) => TokenKind::Error,
        };
        tokens.push(Token { kind, span });
    }

    // Add EOF token
    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    });

    tokens
}

/// A token with its span
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_header() {
        let tokens = tokenize("contract Counter is AragonApp {");
        assert_eq!(tokens[0].kind, TokenKind::Contract);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[2].kind, TokenKind::Is);
        assert_eq!(tokens[3].kind, TokenKind::Ident);
        assert_eq!(tokens[4].kind, TokenKind::LBrace);
    }

    #[test]
    fn test_function_header() {
        let source = "function transfer(address _to, uint256 _amount) external auth(TRANSFER_ROLE);";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Function);
        assert_eq!(tokens[1].text(source), "transfer");
        assert_eq!(tokens[3].text(source), "address");
        // `address` is classified as elementary by the parser, not the lexer
        assert_eq!(tokens[3].kind, TokenKind::Ident);
    }

    #[test]
    fn test_comments_are_trivia() {
        let tokens = tokenize("// line\n/* block */ /** natspec */ contract C {}");
        assert_eq!(tokens[0].kind, TokenKind::Contract);
    }

    #[test]
    fn test_assembly_assign_lexes() {
        // `:=` appears inside assembly blocks; bodies must lex cleanly
        let tokens = tokenize("x := mload(0x40)");
        assert_eq!(tokens[1].kind, TokenKind::ColonEq);
        assert_eq!(tokens[4].kind, TokenKind::HexNumber);
    }

    #[test]
    fn test_eof_sentinel() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }
}
