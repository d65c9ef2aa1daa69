//! Token definitions for the Solidity subset the extractor parses

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]                  // Skip whitespace
#[logos(skip r"//[^\n]*")]                      // Skip line comments (incl. ///)
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]  // Skip block comments (incl. /** */)
pub enum TokenKind {
    // === Keywords needed at declaration level ===
    // Everything else (if, for, emit, return, ...) only occurs inside
    // function bodies, which are skipped token-wise, so it lexes as Ident.
    #[token("pragma")]
    Pragma,
    #[token("import")]
    Import,
    #[token("contract")]
    Contract,
    #[token("interface")]
    Interface,
    #[token("library")]
    Library,
    #[token("abstract")]
    Abstract,
    #[token("is")]
    Is,
    #[token("function")]
    Function,
    #[token("constructor")]
    Constructor,
    #[token("modifier")]
    Modifier,
    #[token("event")]
    Event,
    #[token("struct")]
    Struct,
    #[token("enum")]
    Enum,
    #[token("mapping")]
    Mapping,
    #[token("using")]
    Using,
    #[token("returns")]
    Returns,
    #[token("receive")]
    Receive,
    #[token("fallback")]
    Fallback,

    // Visibility
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("internal")]
    Internal,
    #[token("external")]
    External,

    // State mutability
    #[token("pure")]
    Pure,
    #[token("view")]
    View,
    #[token("payable")]
    Payable,
    #[token("constant")]
    Constant,

    // Data location and header noise
    #[token("memory")]
    Memory,
    #[token("storage")]
    Storage,
    #[token("calldata")]
    Calldata,
    #[token("indexed")]
    Indexed,
    #[token("anonymous")]
    Anonymous,
    #[token("virtual")]
    Virtual,
    #[token("override")]
    Override,

    // === Operators ===
    #[token("=>")]
    FatArrow,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token(":=")]
    ColonEq,
    #[token("!=")]
    Ne,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("**")]
    StarStar,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // === Punctuation ===
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F]+", priority = 3)]
    HexNumber,

    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?([eE][+-]?[0-9]+)?", priority = 2)]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r#"'([^'\\]|\\.)*'"#)]
    String,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    // === Special ===
    Error,
    Eof,
}

impl TokenKind {
    /// Whether this token can start a type name
    pub fn starts_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident | TokenKind::Mapping | TokenKind::Function
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Pragma => "'pragma'",
            TokenKind::Import => "'import'",
            TokenKind::Contract => "'contract'",
            TokenKind::Interface => "'interface'",
            TokenKind::Library => "'library'",
            TokenKind::Abstract => "'abstract'",
            TokenKind::Is => "'is'",
            TokenKind::Function => "'function'",
            TokenKind::Constructor => "'constructor'",
            TokenKind::Modifier => "'modifier'",
            TokenKind::Event => "'event'",
            TokenKind::Struct => "'struct'",
            TokenKind::Enum => "'enum'",
            TokenKind::Mapping => "'mapping'",
            TokenKind::Using => "'using'",
            TokenKind::Returns => "'returns'",
            TokenKind::Receive => "'receive'",
            TokenKind::Fallback => "'fallback'",
            TokenKind::Public => "'public'",
            TokenKind::Private => "'private'",
            TokenKind::Internal => "'internal'",
            TokenKind::External => "'external'",
            TokenKind::Pure => "'pure'",
            TokenKind::View => "'view'",
            TokenKind::Payable => "'payable'",
            TokenKind::Constant => "'constant'",
            TokenKind::Memory => "'memory'",
            TokenKind::Storage => "'storage'",
            TokenKind::Calldata => "'calldata'",
            TokenKind::Indexed => "'indexed'",
            TokenKind::Anonymous => "'anonymous'",
            TokenKind::Virtual => "'virtual'",
            TokenKind::Override => "'override'",
            TokenKind::FatArrow => "'=>'",
            TokenKind::EqEq => "'=='",
            TokenKind::Eq => "'='",
            TokenKind::ColonEq => "':='",
            TokenKind::Ne => "'!='",
            TokenKind::ShlEq => "'<<='",
            TokenKind::ShrEq => "'>>='",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::Le => "'<='",
            TokenKind::Ge => "'>='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::AmpEq => "'&='",
            TokenKind::PipeEq => "'|='",
            TokenKind::CaretEq => "'^='",
            TokenKind::StarStar => "'**'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Dot => "'.'",
            TokenKind::Question => "'?'",
            TokenKind::HexNumber => "hex number",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Ident => "identifier",
            TokenKind::Error => "error",
            TokenKind::Eof => "end of file",
        }
    }
}
