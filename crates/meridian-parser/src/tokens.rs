//! Token types for the Meridian sequence language.

use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Actor,
    Component,
    Return,

    // Literals
    StringLiteral(String),
    Identifier(&'src str),

    // Operators
    Arrow,      // -> synchronous message
    AsyncArrow, // ~> asynchronous message
    Star,       // *  diagram-boundary marker
    Colon,      // :

    // Punctuation
    LeftBrace,  // {
    RightBrace, // }
    Semicolon,  // ;

    // Trivia
    LineComment(&'src str), // // comment
    Whitespace,
    Newline,
}

/// A token with position information for winnow integration.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl<'src> AsRef<Token<'src>> for PositionedToken<'src> {
    fn as_ref(&self) -> &Token<'src> {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Actor => write!(f, "actor"),
            Token::Component => write!(f, "component"),
            Token::Return => write!(f, "return"),

            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::Arrow => write!(f, "->"),
            Token::AsyncArrow => write!(f, "~>"),
            Token::Star => write!(f, "*"),
            Token::Colon => write!(f, ":"),

            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),

            Token::LineComment(comment) => write!(f, "//{comment}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}

impl Token<'_> {
    /// Returns `true` for tokens that carry no syntactic meaning.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_)
        )
    }
}
