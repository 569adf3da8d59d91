//! Error codes for the Meridian diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Grammar errors
//! - `E2xx` - Statement and species errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but never closed.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that is not valid in this context.
    E002,

    /// Invalid escape sequence.
    ///
    /// An unrecognized escape sequence was used in a string literal.
    /// Valid escapes are: `\n`, `\r`, `\t`, `\\`, `\"`.
    E003,

    // =========================================================================
    // Grammar Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token it did not expect at this position.
    E100,

    /// Incomplete input.
    ///
    /// The input ended before a complete construct was parsed, such as a
    /// block that was never closed.
    E101,

    /// Unrecognized statement.
    ///
    /// The statement's shape was not claimed by any message species.
    E102,

    /// Misplaced return.
    ///
    /// A `return` statement must be the final item of a call body.
    E103,

    // =========================================================================
    // Statement and Species Errors (E2xx)
    // =========================================================================
    /// Undeclared participant.
    ///
    /// A message names a participant that has not been declared.
    E200,

    /// Duplicate participant declaration.
    ///
    /// A participant with this identifier has already been declared.
    E201,

    /// Lost message with an asynchronous arrow.
    ///
    /// Lost messages must be synchronous.
    E210,

    /// Lost message outside a call body.
    ///
    /// Lost messages need an active entity to act as their sender.
    E211,

    /// Lost message with a nested block.
    ///
    /// A message with no receiver cannot open an activation.
    E212,

    /// Found message with an asynchronous arrow.
    ///
    /// Found messages must be synchronous.
    E220,

    /// Found message outside a call body.
    ///
    /// Found messages need an active entity to act as their receiver.
    E221,

    /// Found message with a nested block.
    ///
    /// A message from outside the diagram cannot open an activation.
    E222,

    /// Found message with a named target.
    ///
    /// Found messages are delivered to the active entity, never to a
    /// named participant.
    E223,

    /// Asynchronous call with a nested block.
    ///
    /// Only synchronous calls can open an activation body.
    E230,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            // Grammar errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            // Statement and species errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E210 => "E210",
            ErrorCode::E211 => "E211",
            ErrorCode::E212 => "E212",
            ErrorCode::E220 => "E220",
            ErrorCode::E221 => "E221",
            ErrorCode::E222 => "E222",
            ErrorCode::E223 => "E223",
            ErrorCode::E230 => "E230",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            // Grammar errors
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "unrecognized statement",
            ErrorCode::E103 => "misplaced return",
            // Statement and species errors
            ErrorCode::E200 => "undeclared participant",
            ErrorCode::E201 => "duplicate participant",
            ErrorCode::E210 => "lost message must be synchronous",
            ErrorCode::E211 => "lost message has no active sender",
            ErrorCode::E212 => "lost message cannot open an activation",
            ErrorCode::E220 => "found message must be synchronous",
            ErrorCode::E221 => "found message has no active receiver",
            ErrorCode::E222 => "found message cannot open an activation",
            ErrorCode::E223 => "found message cannot name a target",
            ErrorCode::E230 => "asynchronous call cannot open an activation",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
