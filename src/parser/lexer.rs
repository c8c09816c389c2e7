//! Lexer (tokenizer) for script source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Each token remembers whether a line break preceded it, which is all the
//! parser needs to apply automatic semicolon insertion.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Token variants produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Str(String),
    Template(Vec<RawTemplatePart>),

    // Identifiers
    Ident(String),

    // Keywords
    Let,
    Const,
    Var,
    Function,
    Return,
    If,
    Else,
    While,
    Do,
    For,
    In,
    Break,
    Continue,
    Throw,
    Try,
    Catch,
    Finally,
    New,
    Typeof,
    True,
    False,
    Null,
    Undefined,

    // Arithmetic
    Plus,     // +
    Minus,    // -
    Star,     // *
    StarStar, // **
    Slash,    // /
    Percent,  // %

    // Comparison
    EqEq,     // ==
    EqEqEq,   // ===
    NotEq,    // !=
    NotEqEq,  // !==
    Lt,       // <
    Le,       // <=
    Gt,       // >
    Ge,       // >=

    // Logical
    AndAnd,           // &&
    OrOr,             // ||
    QuestionQuestion, // ??
    Bang,             // !

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    Dot,      // .
    Arrow,    // =>
    Question, // ?
    Colon,    // :

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,

    Eof,
}

/// Unparsed piece of a template literal; `${...}` bodies are parsed later
#[derive(Debug, Clone, PartialEq)]
pub enum RawTemplatePart {
    Text(String),
    Expr(String, SourceLocation),
}

/// A token with its position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
    /// Whether at least one line break separates this token from the previous one
    pub newline_before: bool,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset just past the last character
    pub end: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Str(s) => write!(f, "string \"{}\"", s),
            TokenKind::Template(_) => write!(f, "template literal"),
            TokenKind::Ident(s) => write!(f, "identifier '{}'", s),
            TokenKind::Let => write!(f, "'let'"),
            TokenKind::Const => write!(f, "'const'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::Function => write!(f, "'function'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Do => write!(f, "'do'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::In => write!(f, "'in'"),
            TokenKind::Break => write!(f, "'break'"),
            TokenKind::Continue => write!(f, "'continue'"),
            TokenKind::Throw => write!(f, "'throw'"),
            TokenKind::Try => write!(f, "'try'"),
            TokenKind::Catch => write!(f, "'catch'"),
            TokenKind::Finally => write!(f, "'finally'"),
            TokenKind::New => write!(f, "'new'"),
            TokenKind::Typeof => write!(f, "'typeof'"),
            TokenKind::True => write!(f, "'true'"),
            TokenKind::False => write!(f, "'false'"),
            TokenKind::Null => write!(f, "'null'"),
            TokenKind::Undefined => write!(f, "'undefined'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::StarStar => write!(f, "'**'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::EqEqEq => write!(f, "'==='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::NotEqEq => write!(f, "'!=='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::OrOr => write!(f, "'||'"),
            TokenKind::QuestionQuestion => write!(f, "'??'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::PlusEq => write!(f, "'+='"),
            TokenKind::MinusEq => write!(f, "'-='"),
            TokenKind::StarEq => write!(f, "'*='"),
            TokenKind::SlashEq => write!(f, "'/='"),
            TokenKind::PercentEq => write!(f, "'%='"),
            TokenKind::PlusPlus => write!(f, "'++'"),
            TokenKind::MinusMinus => write!(f, "'--'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Arrow => write!(f, "'=>'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Error)]
#[error("{message} (line {}, column {})", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for script source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    byte_offset: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            byte_offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let newline_before = self.skip_whitespace_and_comments()?;
            let location = self.current_location();
            let start = self.byte_offset;

            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    location,
                    newline_before: true,
                    start,
                    end: start,
                });
                break;
            }

            let kind = self.next_token()?;
            tokens.push(Token {
                kind,
                location,
                newline_before,
                start,
                end: self.byte_offset,
            });
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<TokenKind, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input".to_string(),
            location: loc,
        })?;

        match ch {
            '"' | '\'' => self.string_literal(ch, loc),
            '`' => self.template_literal(loc),
            '0'..='9' => self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(ch, loc)
            }
            c if is_ident_start(c) => Ok(self.identifier_or_keyword(c)),

            '+' => Ok(if self.eat('+') {
                TokenKind::PlusPlus
            } else if self.eat('=') {
                TokenKind::PlusEq
            } else {
                TokenKind::Plus
            }),
            '-' => Ok(if self.eat('-') {
                TokenKind::MinusMinus
            } else if self.eat('=') {
                TokenKind::MinusEq
            } else {
                TokenKind::Minus
            }),
            '*' => Ok(if self.eat('*') {
                TokenKind::StarStar
            } else if self.eat('=') {
                TokenKind::StarEq
            } else {
                TokenKind::Star
            }),
            '/' => Ok(if self.eat('=') {
                TokenKind::SlashEq
            } else {
                TokenKind::Slash
            }),
            '%' => Ok(if self.eat('=') {
                TokenKind::PercentEq
            } else {
                TokenKind::Percent
            }),
            '=' => Ok(if self.eat('=') {
                if self.eat('=') {
                    TokenKind::EqEqEq
                } else {
                    TokenKind::EqEq
                }
            } else if self.eat('>') {
                TokenKind::Arrow
            } else {
                TokenKind::Eq
            }),
            '!' => Ok(if self.eat('=') {
                if self.eat('=') {
                    TokenKind::NotEqEq
                } else {
                    TokenKind::NotEq
                }
            } else {
                TokenKind::Bang
            }),
            '<' => Ok(if self.eat('=') {
                TokenKind::Le
            } else {
                TokenKind::Lt
            }),
            '>' => Ok(if self.eat('=') {
                TokenKind::Ge
            } else {
                TokenKind::Gt
            }),
            '&' if self.eat('&') => Ok(TokenKind::AndAnd),
            '|' if self.eat('|') => Ok(TokenKind::OrOr),
            '?' => Ok(if self.eat('?') {
                TokenKind::QuestionQuestion
            } else {
                TokenKind::Question
            }),
            '.' => Ok(TokenKind::Dot),
            ':' => Ok(TokenKind::Colon),
            '(' => Ok(TokenKind::LParen),
            ')' => Ok(TokenKind::RParen),
            '{' => Ok(TokenKind::LBrace),
            '}' => Ok(TokenKind::RBrace),
            '[' => Ok(TokenKind::LBracket),
            ']' => Ok(TokenKind::RBracket),
            ';' => Ok(TokenKind::Semicolon),
            ',' => Ok(TokenKind::Comma),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse a quoted string literal; the opening quote is already consumed
    fn string_literal(&mut self, quote: char, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.advance();
                return Ok(TokenKind::Str(string));
            }
            if ch == '\n' {
                break;
            }
            self.advance();
            if ch == '\\' {
                let escaped = self.escape_sequence()?;
                if let Some(c) = escaped {
                    string.push(c);
                }
            } else {
                string.push(ch);
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Decode the character after a backslash. `None` means a line continuation.
    fn escape_sequence(&mut self) -> Result<Option<char>, LexError> {
        let loc = self.current_location();
        let escaped = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input in escape sequence".to_string(),
            location: loc,
        })?;

        let c = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            '\n' => return Ok(None),
            'x' => {
                let digits = self.take_hex_digits(2, loc)?;
                self.char_from_code(&digits, loc)?
            }
            'u' => {
                let digits = if self.eat('{') {
                    let mut digits = String::new();
                    while let Some(c) = self.peek() {
                        if c == '}' {
                            break;
                        }
                        digits.push(c);
                        self.advance();
                    }
                    if !self.eat('}') {
                        return Err(LexError {
                            message: "Unterminated unicode escape".to_string(),
                            location: loc,
                        });
                    }
                    digits
                } else {
                    self.take_hex_digits(4, loc)?
                };
                self.char_from_code(&digits, loc)?
            }
            // \\ \' \" \` and any other character stand for themselves
            other => other,
        };
        Ok(Some(c))
    }

    fn take_hex_digits(&mut self, count: usize, loc: SourceLocation) -> Result<String, LexError> {
        let mut digits = String::with_capacity(count);
        for _ in 0..count {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    digits.push(c);
                    self.advance();
                }
                _ => {
                    return Err(LexError {
                        message: "Invalid hexadecimal escape sequence".to_string(),
                        location: loc,
                    })
                }
            }
        }
        Ok(digits)
    }

    fn char_from_code(&self, digits: &str, loc: SourceLocation) -> Result<char, LexError> {
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| LexError {
                message: format!("Invalid escape sequence code point: {}", digits),
                location: loc,
            })
    }

    /// Parse a template literal; the opening backtick is already consumed
    fn template_literal(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let mut parts = Vec::new();
        let mut text = String::new();

        loop {
            let ch = self.advance().ok_or_else(|| LexError {
                message: "Unterminated template literal".to_string(),
                location: loc,
            })?;

            match ch {
                '`' => break,
                '\\' => {
                    if let Some(c) = self.escape_sequence()? {
                        text.push(c);
                    }
                }
                '$' if self.peek() == Some('{') => {
                    self.advance();
                    if !text.is_empty() {
                        parts.push(RawTemplatePart::Text(std::mem::take(&mut text)));
                    }
                    let expr_loc = self.current_location();
                    let source = self.template_expression_source(loc)?;
                    parts.push(RawTemplatePart::Expr(source, expr_loc));
                }
                c => text.push(c),
            }
        }

        if !text.is_empty() {
            parts.push(RawTemplatePart::Text(text));
        }
        Ok(TokenKind::Template(parts))
    }

    /// Collect the raw source of a `${...}` substitution up to its closing brace
    fn template_expression_source(&mut self, loc: SourceLocation) -> Result<String, LexError> {
        let mut source = String::new();
        let mut depth = 0usize;

        while let Some(ch) = self.advance() {
            match ch {
                '}' if depth == 0 => return Ok(source),
                '{' => depth += 1,
                '}' => depth -= 1,
                '"' | '\'' | '`' => {
                    // Copy nested quoted text verbatim so braces inside it don't count
                    source.push(ch);
                    while let Some(inner) = self.advance() {
                        source.push(inner);
                        if inner == '\\' {
                            if let Some(next) = self.advance() {
                                source.push(next);
                            }
                        } else if inner == ch {
                            break;
                        }
                    }
                    continue;
                }
                _ => {}
            }
            source.push(ch);
        }

        Err(LexError {
            message: "Unterminated template substitution".to_string(),
            location: loc,
        })
    }

    /// Parse numeric literal: decimal with optional fraction/exponent, or 0x/0o/0b
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<TokenKind, LexError> {
        if first == '0' {
            let radix = match self.peek() {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                let mut digits = String::new();
                while let Some(c) = self.peek() {
                    if c.is_digit(radix) {
                        digits.push(c);
                        self.advance();
                    } else if c == '_' {
                        self.advance();
                    } else {
                        break;
                    }
                }
                return u64::from_str_radix(&digits, radix)
                    .map(|n| TokenKind::Number(n as f64))
                    .map_err(|_| LexError {
                        message: format!("Invalid numeric literal: 0{}", digits),
                        location: loc,
                    });
            }
        }

        let mut num_str = String::new();
        num_str.push(first);
        let mut seen_dot = first == '.';
        let mut seen_exp = false;

        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => num_str.push(ch),
                '_' => {}
                '.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    num_str.push(ch);
                }
                'e' | 'E' if !seen_exp => {
                    seen_exp = true;
                    num_str.push(ch);
                    if let Some(sign @ ('+' | '-')) = self.peek_ahead(1) {
                        self.advance();
                        num_str.push(sign);
                    }
                }
                _ => break,
            }
            self.advance();
        }

        if is_ident_start(self.peek().unwrap_or(' ')) {
            return Err(LexError {
                message: "Identifier starts immediately after numeric literal".to_string(),
                location: self.current_location(),
            });
        }

        num_str
            .parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| LexError {
                message: format!("Invalid numeric literal: {}", num_str),
                location: loc,
            })
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if is_ident_part(ch) {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "let" => TokenKind::Let,
            "const" => TokenKind::Const,
            "var" => TokenKind::Var,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "throw" => TokenKind::Throw,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "finally" => TokenKind::Finally,
            "new" => TokenKind::New,
            "typeof" => TokenKind::Typeof,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "undefined" => TokenKind::Undefined,
            _ => TokenKind::Ident(ident),
        }
    }

    /// Skip whitespace and comments, reporting whether a line break was crossed
    fn skip_whitespace_and_comments(&mut self) -> Result<bool, LexError> {
        let mut saw_newline = false;
        loop {
            match self.peek() {
                Some('\n') => {
                    saw_newline = true;
                    self.advance();
                }
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        saw_newline |= self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(saw_newline)
    }

    /// Skip single-line comment (// ...), leaving the newline in place
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<bool, LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'
        let mut saw_newline = false;

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(saw_newline);
            }
            if self.advance() == Some('\n') {
                saw_newline = true;
            }
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;
        self.byte_offset += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds("console.log(\"hi\");");

        assert_eq!(tokens[0], TokenKind::Ident("console".to_string()));
        assert_eq!(tokens[1], TokenKind::Dot);
        assert_eq!(tokens[2], TokenKind::Ident("log".to_string()));
        assert_eq!(tokens[3], TokenKind::LParen);
        assert_eq!(tokens[4], TokenKind::Str("hi".to_string()));
        assert_eq!(tokens[5], TokenKind::RParen);
        assert_eq!(tokens[6], TokenKind::Semicolon);
        assert_eq!(tokens[7], TokenKind::Eof);
    }

    #[test]
    fn test_operators() {
        let tokens = kinds("=== !== == != => ** ?? && || ++ --");

        assert_eq!(
            tokens[..11],
            [
                TokenKind::EqEqEq,
                TokenKind::NotEqEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Arrow,
                TokenKind::StarStar,
                TokenKind::QuestionQuestion,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("42 3.5 .5 1e3 2E-2 0xff 1_000");

        assert_eq!(tokens[0], TokenKind::Number(42.0));
        assert_eq!(tokens[1], TokenKind::Number(3.5));
        assert_eq!(tokens[2], TokenKind::Number(0.5));
        assert_eq!(tokens[3], TokenKind::Number(1000.0));
        assert_eq!(tokens[4], TokenKind::Number(0.02));
        assert_eq!(tokens[5], TokenKind::Number(255.0));
        assert_eq!(tokens[6], TokenKind::Number(1000.0));
    }

    #[test]
    fn test_comments_and_newlines() {
        let tokens = Lexer::new("a // comment\nb /* block\ncomment */ c /* same line */ d")
            .tokenize()
            .unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Ident("a".to_string()));
        assert!(tokens[1].newline_before);
        assert_eq!(tokens[1].kind, TokenKind::Ident("b".to_string()));
        assert!(tokens[2].newline_before);
        assert!(!tokens[3].newline_before);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = kinds(r#"'it\'s' "a\nb" "\u{1F600}" "\x41""#);

        assert_eq!(tokens[0], TokenKind::Str("it's".to_string()));
        assert_eq!(tokens[1], TokenKind::Str("a\nb".to_string()));
        assert_eq!(tokens[2], TokenKind::Str("\u{1F600}".to_string()));
        assert_eq!(tokens[3], TokenKind::Str("A".to_string()));
    }

    #[test]
    fn test_template_literal() {
        let tokens = kinds("`sum: ${a + {b: 1}.b} done`");

        match &tokens[0] {
            TokenKind::Template(parts) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[0], RawTemplatePart::Text("sum: ".to_string()));
                assert!(matches!(&parts[1], RawTemplatePart::Expr(s, _) if s == "a + {b: 1}.b"));
                assert_eq!(parts[2], RawTemplatePart::Text(" done".to_string()));
            }
            other => panic!("Expected template literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"abc").tokenize().unwrap_err();
        assert_eq!(err.message, "Unterminated string literal");
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_byte_spans_cover_source() {
        let source = "let é = 1";
        let tokens = Lexer::new(source).tokenize().unwrap();

        assert_eq!(&source[tokens[1].start..tokens[1].end], "é");
        assert_eq!(&source[tokens[3].start..tokens[3].end], "1");
    }
}
