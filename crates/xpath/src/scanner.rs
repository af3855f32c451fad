//! A context-sensitive scanner for constraint expressions.
//!
//! XPath cannot be tokenized without context: `or`, `and`, `div`, `mod` and `*` are
//! operators only when something that can be an operand precedes them, a name
//! followed by `::` is an axis, and a name followed by `(` may be a function call.
//! The scanner keeps the previous token kind to make those calls and exposes one
//! current token at a time. Lexeme shapes are recognized with `nom`.

use crate::ast::Axis;
use crate::error::XPathError;
use crate::token::{Token, TokenKind};
use nom::{
    IResult, Parser,
    bytes::complete::take_while,
    character::complete::{char, digit0, one_of, satisfy},
    combinator::opt,
    sequence::pair,
};

// --- Lexemes ---

/// The consumed prefix of `input`, measured from what the parser left over.
fn consumed<'i>(input: &'i str, rest: &'i str) -> &'i str {
    &input[..input.len() - rest.len()]
}

fn number_lexeme(input: &str) -> IResult<&str, &str> {
    let (rest, _) = pair(
        pair(digit0, opt(pair(char('.'), digit0))),
        opt(pair(one_of("eE"), pair(opt(one_of("+-")), digit0))),
    )
    .parse(input)?;
    Ok((rest, consumed(input, rest)))
}

fn nc_name(input: &str) -> IResult<&str, &str> {
    let (rest, _) = pair(
        satisfy(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_')),
    )
    .parse(input)?;
    Ok((rest, consumed(input, rest)))
}

// --- Scanner ---

pub struct Scanner<'s> {
    expr: &'s str,
    pos: usize,
    token: Token,
    prev_kind: TokenKind,
    issues: Vec<XPathError>,
}

impl<'s> Scanner<'s> {
    /// Creates a scanner positioned on the first token of `expr`.
    pub fn new(expr: &'s str) -> Self {
        let mut scanner = Self {
            expr,
            pos: 0,
            token: Token::new(TokenKind::Unknown, 0),
            prev_kind: TokenKind::Unknown,
            issues: Vec::new(),
        };
        scanner.next_kind();
        scanner
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    /// Byte offset of the current token.
    pub fn offset(&self) -> usize {
        self.token.start
    }

    pub fn name(&self) -> Option<&str> {
        self.token.name.as_deref()
    }

    /// The current name's qualifier, `None` when it has none.
    pub fn prefix(&self) -> Option<&str> {
        self.token.prefix.as_deref().filter(|p| !p.is_empty())
    }

    pub fn string_value(&self) -> Option<&str> {
        self.token.string_value.as_deref()
    }

    pub fn axis(&self) -> Option<Axis> {
        self.token.axis
    }

    pub fn can_be_function(&self) -> bool {
        if self.token.kind != TokenKind::Name {
            log::debug!(
                "Function lookahead requested on non-name token {:?} at {}",
                self.token.kind,
                self.token.start
            );
            return false;
        }
        self.token.can_be_function
    }

    /// Moves the current name out of the token.
    pub fn take_name(&mut self) -> Option<String> {
        self.token.name.take()
    }

    /// Moves the current qualifier out of the token, `None` when it has none.
    pub fn take_prefix(&mut self) -> Option<String> {
        self.token.prefix.take().filter(|p| !p.is_empty())
    }

    pub fn take_string_value(&mut self) -> Option<String> {
        self.token.string_value.take()
    }

    /// The source text of the current token. Empty at end of input.
    pub fn raw_value(&self) -> &'s str {
        &self.expr[self.token.start..self.token.end]
    }

    fn describe_current(&self) -> String {
        match self.token.kind {
            TokenKind::Eof => "<eof>".to_string(),
            _ => self.raw_value().to_string(),
        }
    }

    /// Records a diagnostic; it is also logged at debug level.
    pub fn record(&mut self, issue: XPathError) {
        log::debug!("{issue}");
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[XPathError] {
        &self.issues
    }

    pub fn take_issues(&mut self) -> Vec<XPathError> {
        std::mem::take(&mut self.issues)
    }

    /// Checks the current token kind, recording a diagnostic on mismatch.
    pub fn check_token(&mut self, expected: TokenKind) -> bool {
        if self.token.kind == expected {
            return true;
        }
        let issue = XPathError::UnexpectedToken {
            offset: self.token.start,
            expected,
            found: self.token.kind,
            text: self.describe_current(),
        };
        self.record(issue);
        false
    }

    /// Checks the current token kind and moves past it either way.
    pub fn pass_token(&mut self, expected: TokenKind) -> bool {
        let matched = self.check_token(expected);
        self.next_kind();
        matched
    }

    fn rest(&self) -> &'s str {
        &self.expr[self.pos..]
    }

    fn peek_byte(&self) -> Option<u8> {
        self.expr.as_bytes().get(self.pos).copied()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.expr.as_bytes().get(self.pos + offset).copied()
    }

    /// Only the ASCII space separates tokens.
    fn skip_spaces(&mut self) {
        while self.peek_byte() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn emit(&mut self, len: usize, kind: TokenKind) {
        self.pos += len;
        self.token.kind = kind;
    }

    /// Advances to the next token and returns its kind.
    pub fn next_kind(&mut self) -> TokenKind {
        self.prev_kind = self.token.kind;
        self.skip_spaces();
        self.token = Token::new(TokenKind::Eof, self.pos);

        if let Some(c) = self.rest().chars().next() {
            match c {
                '(' => self.emit(1, TokenKind::LParens),
                ')' => self.emit(1, TokenKind::RParens),
                '[' => self.emit(1, TokenKind::LBracket),
                ']' => self.emit(1, TokenKind::RBracket),
                '}' => self.emit(1, TokenKind::RBrace),
                '@' => self.emit(1, TokenKind::At),
                ',' => self.emit(1, TokenKind::Comma),
                '$' => self.emit(1, TokenKind::Dollar),
                '+' => self.emit(1, TokenKind::Plus),
                '-' => self.emit(1, TokenKind::Minus),
                '=' => self.emit(1, TokenKind::Equal),
                '|' => self.emit(1, TokenKind::Union),
                '.' => match self.byte_at(1) {
                    Some(b'.') => self.emit(2, TokenKind::DotDot),
                    Some(b) if b.is_ascii_digit() => self.scan_number(),
                    _ => self.emit(1, TokenKind::Dot),
                },
                ':' => {
                    if self.byte_at(1) == Some(b':') {
                        self.emit(2, TokenKind::ColonColon);
                    } else {
                        self.unknown(1);
                    }
                }
                '!' => {
                    if self.byte_at(1) == Some(b'=') {
                        self.emit(2, TokenKind::NotEqual);
                    } else {
                        self.unknown(1);
                    }
                }
                '<' => match self.byte_at(1) {
                    Some(b'=') => self.emit(2, TokenKind::Le),
                    _ => self.emit(1, TokenKind::Lt),
                },
                '>' => match self.byte_at(1) {
                    Some(b'=') => self.emit(2, TokenKind::Ge),
                    _ => self.emit(1, TokenKind::Gt),
                },
                '/' => match self.byte_at(1) {
                    Some(b'/') => self.emit(2, TokenKind::SlashSlash),
                    _ => self.emit(1, TokenKind::Slash),
                },
                '*' => {
                    self.pos += 1;
                    if !self.check_operator(true) {
                        self.token.kind = TokenKind::Star;
                    }
                }
                '"' | '\'' => self.scan_string(c),
                '0'..='9' => self.scan_number(),
                _ => self.scan_name(c),
            }
        }

        self.token.end = self.pos;
        self.token.kind
    }

    fn unknown(&mut self, len: usize) {
        let start = self.pos;
        self.emit(len, TokenKind::Unknown);
        let issue = XPathError::UnknownCharacter {
            offset: start,
            text: self.expr[start..self.pos].to_string(),
        };
        self.record(issue);
    }

    fn scan_string(&mut self, quote: char) {
        let start = self.pos;
        let body = start + 1;
        self.token.kind = TokenKind::String;
        match self.expr[body..].find(quote) {
            Some(len) => {
                self.token.string_value = Some(self.expr[body..body + len].to_string());
                self.pos = body + len + 1;
            }
            None => {
                self.token.string_value = Some(self.expr[body..].to_string());
                self.pos = self.expr.len();
                self.record(XPathError::UnterminatedString(start));
            }
        }
    }

    fn scan_number(&mut self) {
        match number_lexeme(self.rest()) {
            Ok((_, text)) if !text.is_empty() => {
                if text.ends_with(['e', 'E', '+', '-']) {
                    log::debug!("Number '{text}' at {} has an empty exponent", self.pos);
                }
                self.emit(text.len(), TokenKind::Number);
            }
            _ => self.unknown(1),
        }
    }

    fn scan_name(&mut self, first: char) {
        let Ok((_, name)) = nc_name(self.rest()) else {
            self.unknown(first.len_utf8());
            return;
        };
        self.pos += name.len();
        self.token.kind = TokenKind::Name;
        self.token.name = Some(name.to_string());
        self.token.prefix = Some(String::new());

        let after_name = self.pos;
        let mut colon_colon = false;
        if self.peek_byte() == Some(b':') {
            self.pos += 1;
            if self.peek_byte() == Some(b':') {
                colon_colon = true;
                self.pos = after_name;
            } else if let Ok((_, local)) = nc_name(self.rest()) {
                self.pos += local.len();
                self.token.prefix = Some(name.to_string());
                self.token.name = Some(local.to_string());
                self.token.can_be_function = self.rest().trim_start_matches(' ').starts_with('(');
            } else if self.peek_byte() == Some(b'*') {
                self.pos += 1;
                self.token.prefix = Some(name.to_string());
                self.token.name = Some("*".to_string());
            } else {
                self.pos = after_name;
            }
        } else {
            let ahead = self.rest().trim_start_matches(' ');
            if ahead.starts_with("::") {
                colon_colon = true;
            } else if !ahead.starts_with(':') {
                self.token.can_be_function = ahead.starts_with('(');
            }
        }

        if !self.check_operator(false) && colon_colon {
            if let Some(axis) = Axis::from_name(name) {
                self.token.kind = TokenKind::Axis;
                self.token.axis = Some(axis);
            }
        }
    }

    /// Turns the current name or `*` into an operator when an operand precedes it.
    fn check_operator(&mut self, star: bool) -> bool {
        let op = if star {
            TokenKind::Multiply
        } else {
            if self.prefix().is_some() {
                return false;
            }
            match self.token.name.as_deref() {
                Some("or") => TokenKind::Or,
                Some("and") => TokenKind::And,
                Some("div") => TokenKind::Divide,
                Some("mod") => TokenKind::Modulo,
                _ => return false,
            }
        };

        let prev = self.prev_kind;
        if prev == TokenKind::Unknown
            || prev.is_operator()
            || matches!(
                prev,
                TokenKind::Slash
                    | TokenKind::SlashSlash
                    | TokenKind::At
                    | TokenKind::ColonColon
                    | TokenKind::LParens
                    | TokenKind::LBracket
                    | TokenKind::Comma
                    | TokenKind::Dollar
            )
        {
            return false;
        }
        self.token.kind = op;
        true
    }
}
