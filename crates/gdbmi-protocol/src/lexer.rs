use crate::error::{ParseError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Leading digits correlating a record with the command that caused it
    TokenNum,
    /// `^done`, `^error`, ...
    ResultClass,
    /// `*stopped`, `*running`, ...
    ExecClass,
    /// `+download`, ...
    StatusClass,
    /// `=breakpoint-created`, ...
    NotifyClass,
    ConsoleMarker,
    TargetMarker,
    LogMarker,
    TupleOpen,
    TupleClose,
    ListOpen,
    ListClose,
    /// `name=` introducing a value
    Variable,
    /// Double-quoted, backslash-escaped string
    Const,
    Prompt,
    Comma,
    Newline,
    Assign,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::TokenNum => "command token",
            TokenKind::ResultClass => "result class",
            TokenKind::ExecClass => "exec class",
            TokenKind::StatusClass => "status class",
            TokenKind::NotifyClass => "notify class",
            TokenKind::ConsoleMarker => "'~'",
            TokenKind::TargetMarker => "'@'",
            TokenKind::LogMarker => "'&'",
            TokenKind::TupleOpen => "'{'",
            TokenKind::TupleClose => "'}'",
            TokenKind::ListOpen => "'['",
            TokenKind::ListClose => "']'",
            TokenKind::Variable => "variable",
            TokenKind::Const => "quoted string",
            TokenKind::Prompt => "prompt",
            TokenKind::Comma => "','",
            TokenKind::Newline => "newline",
            TokenKind::Assign => "'='",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

static RULES: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    [
        (TokenKind::TokenNum, r"^\d+"),
        (TokenKind::ResultClass, r"^\^[\w-]+"),
        (TokenKind::ExecClass, r"^\*[\w-]+"),
        (TokenKind::StatusClass, r"^\+[\w-]+"),
        (TokenKind::NotifyClass, r"^=[\w-]+"),
        (TokenKind::ConsoleMarker, r"^~"),
        (TokenKind::TargetMarker, r"^@"),
        (TokenKind::LogMarker, r"^&"),
        (TokenKind::TupleOpen, r"^\{"),
        (TokenKind::TupleClose, r"^\}"),
        (TokenKind::ListOpen, r"^\["),
        (TokenKind::ListClose, r"^\]"),
        (TokenKind::Variable, r"^[A-Za-z_][\w-]*="),
        (TokenKind::Const, r#"^"(?s:[^"\\]|\\.)*""#),
        (TokenKind::Prompt, r"^\(gdb\)[ \t]*"),
        (TokenKind::Comma, r"^,"),
        (TokenKind::Newline, r"^\r?\n"),
        (TokenKind::Assign, r"^="),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid token pattern")))
    .collect()
});

/// Splits one line of MI output into tokens, taking the longest matching
/// rule at each position. Stops after the first unmatched character.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            failed: false,
        }
    }

    fn longest_match(&self, rest: &str) -> Option<(TokenKind, usize)> {
        let at_line_start = self.offset == 0;
        RULES
            .iter()
            .filter(|(kind, _)| *kind != TokenKind::TokenNum || at_line_start)
            .filter_map(|(kind, re)| re.find(rest).map(|m| (*kind, m.end())))
            .filter(|(_, len)| *len > 0)
            .fold(None, |best, (kind, len)| match best {
                Some((_, best_len)) if best_len >= len => best,
                _ => Some((kind, len)),
            })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.input.len() {
            return None;
        }

        let rest = &self.input[self.offset..];
        match self.longest_match(rest) {
            Some((kind, len)) => {
                let token = Token {
                    kind,
                    text: &rest[..len],
                    offset: self.offset,
                };
                self.offset += len;
                Some(Ok(token))
            }
            None => {
                self.failed = true;
                Some(Err(ParseError::UnexpectedChar {
                    offset: self.offset,
                    fragment: rest.chars().take(16).collect(),
                }))
            }
        }
    }
}
