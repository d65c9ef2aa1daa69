//! Recursive descent parser implementation
//!
//! Parses flattened Solidity at the declaration level: contract headers,
//! inheritance lists and function signatures are parsed precisely, while
//! function bodies and non-function members are skipped by balanced
//! delimiter scanning. Extraction never needs anything inside a body.

use arapm_ast::*;
use arapm_lexer::{Token, TokenKind};

use crate::ParseError;

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // === Utilities ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens.last().expect("tokens should have at least EOF")
        })
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_ahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        // Return the token we just passed
        self.tokens[self.pos - 1]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(
                kind.describe(),
                self.peek(),
                self.current().span,
            ))
        }
    }

    fn text(&self, token: Token) -> &'a str {
        token.text(self.source)
    }

    fn span(&self) -> Span {
        self.current().span
    }

    /// Advance past the next semicolon (pragma, import, state variable,
    /// event, using-for all end this way)
    fn skip_to_semicolon(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                TokenKind::Semicolon => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof { span: self.span() });
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip a `{ ... }` block with balanced braces (function/modifier
    /// bodies, struct and enum definitions)
    fn skip_block(&mut self) -> Result<(), ParseError> {
        self.consume(TokenKind::LBrace)?;
        let mut depth = 1usize;
        loop {
            match self.peek() {
                TokenKind::LBrace => {
                    depth += 1;
                }
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof { span: self.span() });
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip a `( ... )` group with balanced parentheses
    fn skip_parens(&mut self) -> Result<(), ParseError> {
        self.consume(TokenKind::LParen)?;
        let mut depth = 1usize;
        loop {
            match self.peek() {
                TokenKind::LParen => {
                    depth += 1;
                }
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof { span: self.span() });
                }
                _ => {}
            }
            self.advance();
        }
    }

    // === Source unit ===

    pub fn parse_source_unit(&mut self) -> Result<SourceUnit, ParseError> {
        let start = self.span();
        let mut items = Vec::new();

        while !self.at(TokenKind::Eof) {
            match self.peek() {
                TokenKind::Pragma => {
                    self.advance();
                    self.skip_to_semicolon()?;
                    items.push(SourceItem::Pragma);
                }
                TokenKind::Import => {
                    self.advance();
                    self.skip_to_semicolon()?;
                    items.push(SourceItem::Import);
                }
                TokenKind::Abstract => {
                    self.advance();
                    items.push(SourceItem::Contract(
                        self.parse_contract(ContractKind::Contract)?,
                    ));
                }
                TokenKind::Contract => {
                    items.push(SourceItem::Contract(
                        self.parse_contract(ContractKind::Contract)?,
                    ));
                }
                TokenKind::Interface => {
                    items.push(SourceItem::Contract(
                        self.parse_contract(ContractKind::Interface)?,
                    ));
                }
                TokenKind::Library => {
                    items.push(SourceItem::Contract(
                        self.parse_contract(ContractKind::Library)?,
                    ));
                }
                _ => {
                    return Err(ParseError::ExpectedSourceItem { span: self.span() });
                }
            }
        }

        let end = self.span();
        Ok(SourceUnit {
            items,
            span: start.merge(end),
        })
    }

    // === Contract definitions ===

    fn parse_contract(&mut self, kind: ContractKind) -> Result<ContractDefinition, ParseError> {
        let start = self.span();
        match kind {
            ContractKind::Contract => self.consume(TokenKind::Contract)?,
            ContractKind::Interface => self.consume(TokenKind::Interface)?,
            ContractKind::Library => self.consume(TokenKind::Library)?,
        };
        let name_token = self.consume(TokenKind::Ident)?;
        let name = self.text(name_token).to_string();

        let bases = if self.at(TokenKind::Is) {
            self.advance();
            self.parse_inheritance_list()?
        } else {
            Vec::new()
        };

        self.consume(TokenKind::LBrace)?;
        let mut parts = Vec::new();
        while !self.at(TokenKind::RBrace) {
            parts.push(self.parse_contract_part(&name)?);
        }
        self.consume(TokenKind::RBrace)?;

        let end = self.span();
        Ok(ContractDefinition {
            name,
            kind,
            bases,
            parts,
            span: start.merge(end),
        })
    }

    fn parse_inheritance_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut bases = Vec::new();
        loop {
            let name_token = self.consume(TokenKind::Ident)?;
            let mut base = self.text(name_token).to_string();
            while self.at(TokenKind::Dot) {
                self.advance();
                let seg = self.consume(TokenKind::Ident)?;
                base.push('.');
                base.push_str(self.text(seg));
            }
            // Base constructor arguments, e.g. `is Ownable(msg.sender)`
            if self.at(TokenKind::LParen) {
                self.skip_parens()?;
            }
            bases.push(base);
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(bases)
    }

    fn parse_contract_part(&mut self, contract_name: &str) -> Result<ContractPart, ParseError> {
        match self.peek() {
            TokenKind::Function
            | TokenKind::Constructor
            | TokenKind::Receive
            | TokenKind::Fallback => Ok(ContractPart::Function(
                self.parse_function(contract_name)?,
            )),
            TokenKind::Modifier => {
                self.advance();
                self.consume(TokenKind::Ident)?;
                if self.at(TokenKind::LParen) {
                    self.skip_parens()?;
                }
                while matches!(self.peek(), TokenKind::Virtual | TokenKind::Override) {
                    self.advance();
                    if self.at(TokenKind::LParen) {
                        self.skip_parens()?;
                    }
                }
                if self.at(TokenKind::Semicolon) {
                    self.advance();
                } else {
                    self.skip_block()?;
                }
                Ok(ContractPart::Other)
            }
            TokenKind::Struct | TokenKind::Enum => {
                self.advance();
                self.consume(TokenKind::Ident)?;
                self.skip_block()?;
                Ok(ContractPart::Other)
            }
            TokenKind::Event | TokenKind::Using => {
                self.advance();
                self.skip_to_semicolon()?;
                Ok(ContractPart::Other)
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEof { span: self.span() }),
            // State variables (elementary, user-defined or mapping typed)
            // and anything else declaration-like: scan to the semicolon
            _ => {
                self.skip_to_semicolon()?;
                Ok(ContractPart::Other)
            }
        }
    }

    // === Functions ===

    fn parse_function(&mut self, contract_name: &str) -> Result<FunctionDefinition, ParseError> {
        let start = self.span();
        let mut is_constructor = false;

        let name = match self.peek() {
            TokenKind::Function => {
                self.advance();
                if self.at(TokenKind::Ident) {
                    let token = self.advance();
                    let name = token.text(self.source).to_string();
                    // Pre-0.4.22 constructor: function named like its contract
                    if name == contract_name {
                        is_constructor = true;
                    }
                    Some(name)
                } else {
                    // `function() public payable {}` - the fallback function
                    None
                }
            }
            TokenKind::Constructor => {
                self.advance();
                is_constructor = true;
                None
            }
            TokenKind::Receive => {
                self.advance();
                Some("receive".to_string())
            }
            TokenKind::Fallback => {
                self.advance();
                None
            }
            other => {
                return Err(ParseError::unexpected(
                    "function definition",
                    other,
                    self.span(),
                ));
            }
        };

        let params = self.parse_parameter_list()?;

        let mut visibility = None;
        let mut mutability = None;
        let mut modifiers = Vec::new();
        let mut returns = Vec::new();

        loop {
            match self.peek() {
                TokenKind::Public => {
                    self.advance();
                    visibility = Some(Visibility::Public);
                }
                TokenKind::External => {
                    self.advance();
                    visibility = Some(Visibility::External);
                }
                TokenKind::Internal => {
                    self.advance();
                    visibility = Some(Visibility::Internal);
                }
                TokenKind::Private => {
                    self.advance();
                    visibility = Some(Visibility::Private);
                }
                TokenKind::Pure => {
                    self.advance();
                    mutability = Some(StateMutability::Pure);
                }
                TokenKind::View => {
                    self.advance();
                    mutability = Some(StateMutability::View);
                }
                TokenKind::Constant => {
                    self.advance();
                    mutability = Some(StateMutability::Constant);
                }
                TokenKind::Payable => {
                    self.advance();
                    mutability = Some(StateMutability::Payable);
                }
                TokenKind::Virtual => {
                    self.advance();
                }
                TokenKind::Override => {
                    self.advance();
                    if self.at(TokenKind::LParen) {
                        self.skip_parens()?;
                    }
                }
                TokenKind::Returns => {
                    self.advance();
                    returns = self.parse_parameter_list()?;
                }
                TokenKind::Ident => {
                    modifiers.push(self.parse_modifier_invocation()?);
                }
                TokenKind::LBrace => {
                    self.skip_block()?;
                    break;
                }
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                other => {
                    return Err(ParseError::unexpected(
                        "function header item",
                        other,
                        self.span(),
                    ));
                }
            }
        }

        let end = self.span();
        Ok(FunctionDefinition {
            name,
            params,
            visibility,
            mutability,
            modifiers,
            returns,
            is_constructor,
            span: start.merge(end),
        })
    }

    fn parse_parameter_list(&mut self) -> Result<Vec<Parameter>, ParseError> {
        self.consume(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                params.push(self.parse_parameter()?);
                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let start = self.span();
        let type_name = self.parse_type_name()?;

        while matches!(
            self.peek(),
            TokenKind::Memory | TokenKind::Storage | TokenKind::Calldata | TokenKind::Indexed
        ) {
            self.advance();
        }

        let name = if self.at(TokenKind::Ident) {
            let token = self.advance();
            Some(token.text(self.source).to_string())
        } else {
            None
        };

        let end = self.span();
        Ok(Parameter {
            type_name,
            name,
            span: start.merge(end),
        })
    }

    // === Type names ===

    fn parse_type_name(&mut self) -> Result<TypeName, ParseError> {
        let mut base = match self.peek() {
            TokenKind::Mapping => {
                self.advance();
                self.skip_parens()?;
                TypeName::Opaque
            }
            TokenKind::Function => {
                self.advance();
                self.skip_parens()?;
                // Function types carry their own header noise
                loop {
                    match self.peek() {
                        TokenKind::Internal
                        | TokenKind::External
                        | TokenKind::Pure
                        | TokenKind::View
                        | TokenKind::Payable
                        | TokenKind::Constant => {
                            self.advance();
                        }
                        TokenKind::Returns => {
                            self.advance();
                            self.skip_parens()?;
                        }
                        _ => break,
                    }
                }
                TypeName::Opaque
            }
            TokenKind::Ident => {
                let token = self.advance();
                let mut name = token.text(self.source).to_string();
                let mut qualified = false;
                while self.at(TokenKind::Dot) {
                    self.advance();
                    let seg = self.consume(TokenKind::Ident)?;
                    name.push('.');
                    name.push_str(self.text(seg));
                    qualified = true;
                }
                if !qualified && is_elementary_type(&name) {
                    // `address payable` collapses to `address`
                    if name == "address" && self.at(TokenKind::Payable) {
                        self.advance();
                    }
                    TypeName::Elementary(name)
                } else {
                    TypeName::UserDefined(name)
                }
            }
            _ => {
                return Err(ParseError::InvalidType { span: self.span() });
            }
        };

        while self.at(TokenKind::LBracket) {
            self.advance();
            let length = if self.at(TokenKind::RBracket) {
                None
            } else {
                Some(self.capture_array_length()?)
            };
            self.consume(TokenKind::RBracket)?;
            base = TypeName::Array {
                base: Box::new(base),
                length,
            };
        }

        Ok(base)
    }

    /// Capture the raw text of an array length expression up to the
    /// matching `]`, without consuming the `]` itself
    fn capture_array_length(&mut self) -> Result<String, ParseError> {
        let start = self.span().start;
        let mut end = start;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::LBracket | TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::RBracket => {
                    if depth == 0 {
                        return Ok(self.source[start..end].trim().to_string());
                    }
                    depth -= 1;
                }
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof { span: self.span() });
                }
                _ => {}
            }
            end = self.span().end;
            self.advance();
        }
    }

    // === Modifier invocations ===

    fn parse_modifier_invocation(&mut self) -> Result<ModifierInvocation, ParseError> {
        let start = self.span();
        let name_token = self.consume(TokenKind::Ident)?;
        let name = self.text(name_token).to_string();

        let args = if self.at(TokenKind::LParen) {
            self.parse_modifier_args()?
        } else {
            Vec::new()
        };

        let end = self.span();
        Ok(ModifierInvocation {
            name,
            args,
            span: start.merge(end),
        })
    }

    fn parse_modifier_args(&mut self) -> Result<Vec<ModifierArg>, ParseError> {
        self.consume(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_modifier_arg()?);
                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen)?;
        Ok(args)
    }

    /// Classify a single modifier argument into the shapes role extraction
    /// cares about. Anything beyond a bare identifier or a direct call to
    /// one is opaque.
    fn parse_modifier_arg(&mut self) -> Result<ModifierArg, ParseError> {
        if self.at(TokenKind::Ident) {
            if self.peek_ahead(1) == TokenKind::LParen {
                let token = self.advance();
                let callee = token.text(self.source).to_string();
                let arg_count = self.count_call_args()?;
                if self.at(TokenKind::Comma) || self.at(TokenKind::RParen) {
                    return Ok(ModifierArg::Call { callee, arg_count });
                }
                // Trailing member access or operator: a larger expression
                self.skim_arg_rest()?;
                return Ok(ModifierArg::Other);
            }
            let token = self.advance();
            let name = token.text(self.source).to_string();
            if self.at(TokenKind::Comma) || self.at(TokenKind::RParen) {
                return Ok(ModifierArg::Identifier(name));
            }
            self.skim_arg_rest()?;
            return Ok(ModifierArg::Other);
        }
        self.skim_arg_rest()?;
        Ok(ModifierArg::Other)
    }

    /// Consume a balanced `( ... )` call argument list, returning how many
    /// top-level arguments it holds
    fn count_call_args(&mut self) -> Result<usize, ParseError> {
        self.consume(TokenKind::LParen)?;
        if self.at(TokenKind::RParen) {
            self.advance();
            return Ok(0);
        }
        let mut depth = 1usize;
        let mut count = 1usize;
        loop {
            match self.peek() {
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RParen => {
                    if depth <= 1 {
                        self.advance();
                        return Ok(count);
                    }
                    depth -= 1;
                }
                TokenKind::Comma if depth == 1 => count += 1,
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof { span: self.span() });
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skim the remainder of a modifier argument up to (but not past) the
    /// next top-level `,` or the closing `)`
    fn skim_arg_rest(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Comma if depth == 0 => return Ok(()),
                TokenKind::RParen if depth == 0 => return Ok(()),
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof { span: self.span() });
                }
                _ => {}
            }
            self.advance();
        }
    }
}

/// Elementary type names as the ABI knows them
pub fn is_elementary_type(name: &str) -> bool {
    match name {
        "address" | "bool" | "string" | "byte" | "bytes" => true,
        _ => {
            if let Some(rest) = name.strip_prefix("bytes") {
                return rest.parse::<u8>().map_or(false, |n| (1..=32).contains(&n));
            }
            for prefix in ["uint", "int"] {
                if let Some(rest) = name.strip_prefix(prefix) {
                    if rest.is_empty() {
                        return true;
                    }
                    return rest
                        .parse::<u16>()
                        .map_or(false, |n| n >= 8 && n <= 256 && n % 8 == 0);
                }
            }
            for prefix in ["ufixed", "fixed"] {
                if let Some(rest) = name.strip_prefix(prefix) {
                    return rest.is_empty() || rest.contains('x');
                }
            }
            false
        }
    }
}
