//! Statement parser for Meridian source tokens.
//!
//! This module drives a token stream from the [`lexer`](crate::lexer)
//! through the sequence grammar, assembling [`MessageDescription`]s with
//! per-field evidence tokens and handing them to the
//! [`species`](crate::species) matchers. The public entry point is
//! [`parse_sequence`].
//!
//! # Algorithm
//!
//! The parser consumes the stream strictly left to right with one token of
//! lookahead. Top-level items are participant declarations and statements;
//! call bodies are parsed by recursion, carrying the call's target as the
//! new active entity. All grammar violations are raised at the failure
//! site as complete [`Diagnostic`]s (carried through winnow's error
//! context), so every reported error points at the offending token.
//!
//! Parsing halts on the first error: no partial sequence is ever produced
//! from input that failed validation.

use indexmap::IndexMap;
use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{peek, repeat},
    error::{ContextError, ErrMode},
    stream::TokenSlice,
    token::any,
};

use meridian_core::{
    identifier::Id,
    sequence::{Activation, Entity, EntityKind, Sequence},
};

use crate::{
    description::{MessageDescription, MessageKind, NestedBlock, StatementEvidence},
    error::{Diagnostic, ErrorCode, ParseError},
    species,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context attached to parser errors: a fully formed diagnostic produced
/// at the failure site, carried through winnow's error machinery.
#[derive(Debug, Clone)]
pub(crate) struct DiagnosticContext(Box<Diagnostic>);

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<DiagnosticContext>>>;

/// Create a hard error carrying a complete diagnostic.
///
/// Hard errors never backtrack: once a construct is recognized well enough
/// to diagnose, no other interpretation is tried.
fn cut_diag(diagnostic: Diagnostic) -> ErrMode<ContextError<DiagnosticContext>> {
    let mut err = ContextError::new();
    err.push(DiagnosticContext(Box::new(diagnostic)));
    ErrMode::Cut(err)
}

/// Extract the diagnostic from a parser error.
///
/// Errors raised by this module always carry a [`DiagnosticContext`]; the
/// fallback covers raw winnow failures that slipped through without one
/// (a plain "unexpected token" at the failure position).
fn convert_err_mode(
    err: ErrMode<ContextError<DiagnosticContext>>,
    fallback_span: Span,
) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(DiagnosticContext(diagnostic)) = context_error.context().next() {
        return (**diagnostic).clone();
    }

    Diagnostic::error("unexpected token")
        .with_code(ErrorCode::E100)
        .with_label(fallback_span, ErrorCode::E100.description())
}

/// Parse one trivia token (whitespace, newline, or comment).
fn trivia(input: &mut Input<'_>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more trivia tokens.
fn trivia0(input: &mut Input<'_>) -> IResult<()> {
    repeat(0.., trivia).parse_next(input)
}

/// Peek the next token without consuming it.
fn peek_token<'src>(input: &mut Input<'src>) -> Option<PositionedToken<'src>> {
    let result: IResult<&PositionedToken<'src>> = peek(any).parse_next(input);
    result.ok().cloned()
}

/// Consume and return the next token.
fn take_token<'src>(input: &mut Input<'src>) -> IResult<PositionedToken<'src>> {
    any.map(|token: &PositionedToken<'src>| token.clone())
        .parse_next(input)
}

/// Consume the next token, requiring it to satisfy `expected`.
///
/// On mismatch, raises an E100 diagnostic built from `what` at the next
/// token (or end of input).
fn expect_token<'src>(
    input: &mut Input<'src>,
    expected: impl Fn(&Token<'src>) -> bool,
    what: &str,
    eof: Span,
) -> IResult<PositionedToken<'src>> {
    trivia0(input)?;
    let span = peek_token(input).map_or(eof, |token| token.span);
    any.verify(|token: &PositionedToken<'src>| expected(&token.token))
        .map(|token: &PositionedToken<'src>| token.clone())
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError<DiagnosticContext>>| {
            cut_diag(
                Diagnostic::error(format!("expected {what}"))
                    .with_code(ErrorCode::E100)
                    .with_label(span, ErrorCode::E100.description()),
            )
        })
}

/// Tracks declared participants while a sequence is being parsed.
///
/// Owns the entity set invariant: every id referenced by a message was
/// declared first, and ids are unique. Both violations are diagnostics
/// raised here, so invalid references never reach the model.
struct SequenceAssembler {
    entities: IndexMap<Id, Entity>,
    declaration_spans: IndexMap<Id, Span>,
    /// Zero-width span at the end of input, used for end-of-file errors.
    eof: Span,
}

impl SequenceAssembler {
    fn new(eof: Span) -> Self {
        Self {
            entities: IndexMap::new(),
            declaration_spans: IndexMap::new(),
            eof,
        }
    }

    /// Register a declared participant, rejecting duplicates.
    fn declare(
        &mut self,
        kind: EntityKind,
        ident: Spanned<&str>,
        display_name: Option<String>,
    ) -> IResult<()> {
        let name = *ident.inner();
        let id = Id::new(name);

        if let Some(first) = self.declaration_spans.get(&id) {
            return Err(cut_diag(
                Diagnostic::error(format!("participant `{name}` is declared multiple times"))
                    .with_code(ErrorCode::E201)
                    .with_label(ident.span(), "duplicate declaration")
                    .with_secondary_label(*first, "first declared here")
                    .with_help("remove the duplicate or use a different name"),
            ));
        }

        trace!(participant = name; "Declared participant");
        self.declaration_spans.insert(id, ident.span());
        let display_name = display_name.unwrap_or_else(|| name.to_string());
        self.entities.insert(id, Entity::new(id, kind, display_name));
        Ok(())
    }

    /// Resolve a referenced participant name against the declared set.
    fn resolve(&self, ident: &Spanned<&str>) -> IResult<Entity> {
        let name = *ident.inner();
        self.entities.get(&Id::new(name)).cloned().ok_or_else(|| {
            cut_diag(
                Diagnostic::error(format!("undeclared participant `{name}`"))
                    .with_code(ErrorCode::E200)
                    .with_label(ident.span(), "not declared")
                    .with_help(format!("declare it first: `component {name};`")),
            )
        })
    }

    fn finish(self, activations: Vec<Activation>) -> Sequence {
        Sequence::new(self.entities, activations)
    }
}

/// Parse a participant declaration: `actor name "Display";`.
///
/// The leading keyword has already been seen by the caller's lookahead.
fn entity_decl<'src>(
    input: &mut Input<'src>,
    assembler: &mut SequenceAssembler,
) -> IResult<()> {
    let keyword = take_token(input)?;
    let kind = match keyword.token {
        Token::Actor => EntityKind::Actor,
        Token::Component => EntityKind::Component,
        _ => unreachable!("caller dispatched on the declaration keyword"),
    };

    trivia0(input)?;
    let ident_span = peek_token(input).map_or(assembler.eof, |token| token.span);
    let ident = any
        .verify_map(|token: &PositionedToken<'src>| match &token.token {
            Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
            _ => None,
        })
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError<DiagnosticContext>>| {
            cut_diag(
                Diagnostic::error("expected a participant name")
                    .with_code(ErrorCode::E100)
                    .with_label(ident_span, ErrorCode::E100.description())
                    .with_help("declarations look like `actor user;` or `component db \"Database\";`"),
            )
        })?;

    trivia0(input)?;
    let display_name = match peek_token(input) {
        Some(token) => match token.token {
            Token::StringLiteral(name) => {
                take_token(input)?;
                Some(name)
            }
            _ => None,
        },
        None => None,
    };

    expect_token(
        input,
        |token| matches!(token, Token::Semicolon),
        "`;` after the declaration",
        assembler.eof,
    )?;

    assembler.declare(kind, ident, display_name)
}

/// Parse one message statement, returning its validated activation.
///
/// `active` is the entity whose call body is being parsed, or `None` at
/// the top level. The statement's evidence tokens are recorded field by
/// field as the grammar consumes them, then the description goes through
/// the species matchers; a matcher rejection aborts the parse.
fn statement<'src>(
    input: &mut Input<'src>,
    assembler: &mut SequenceAssembler,
    active: Option<&Entity>,
) -> IResult<Activation> {
    trivia0(input)?;

    // Optional leading boundary marker: the message arrives from outside.
    let star = match peek_token(input) {
        Some(token) if matches!(token.token, Token::Star) => {
            take_token(input)?;
            Some(token)
        }
        _ => None,
    };

    let arrow = expect_token(
        input,
        |token| matches!(token, Token::Arrow | Token::AsyncArrow),
        "`->` or `~>`",
        assembler.eof,
    )?;
    let kind = match arrow.token {
        Token::Arrow => MessageKind::Sync,
        Token::AsyncArrow => MessageKind::Async,
        _ => unreachable!("expect_token only accepts arrows here"),
    };
    // When no marker is present, the arrow itself is the evidence that the
    // message originates inside the diagram.
    let from_outside = star.is_some();
    let from_outside_evidence = star.unwrap_or_else(|| arrow.clone());

    // Target: a declared participant, or `*` for "leaves the diagram".
    let target_evidence = expect_token(
        input,
        |token| matches!(token, Token::Identifier(_) | Token::Star),
        "a participant name or `*`",
        assembler.eof,
    )?;
    let target = match &target_evidence.token {
        Token::Identifier(name) => {
            Some(assembler.resolve(&Spanned::new(*name, target_evidence.span))?)
        }
        _ => None,
    };

    // Optional label. When absent, the token observed in its place is the
    // recorded evidence of absence.
    trivia0(input)?;
    let (label, label_evidence) = match peek_token(input) {
        Some(token) if matches!(token.token, Token::Colon) => {
            take_token(input)?;
            let literal = expect_token(
                input,
                |token| matches!(token, Token::StringLiteral(_)),
                "a string label after `:`",
                assembler.eof,
            )?;
            let Token::StringLiteral(text) = literal.token.clone() else {
                unreachable!("expect_token only accepts string literals here");
            };
            (text, literal)
        }
        Some(token) => (String::new(), token),
        None => {
            return Err(cut_diag(
                Diagnostic::error("incomplete statement")
                    .with_code(ErrorCode::E101)
                    .with_label(assembler.eof, ErrorCode::E101.description())
                    .with_help("finish the statement with `;`"),
            ));
        }
    };

    // Optional body. The callee becomes the active entity inside it.
    trivia0(input)?;
    let (block, opening_brace) = match peek_token(input) {
        Some(token) if matches!(token.token, Token::LeftBrace) => {
            take_token(input)?;
            let body_active = target.as_ref().or(active);
            let block = block_body(input, assembler, body_active)?;
            (Some(block), Some(token))
        }
        _ => (None, None),
    };

    let semicolon = expect_token(
        input,
        |token| matches!(token, Token::Semicolon),
        "`;` to end the statement",
        assembler.eof,
    )?;
    // With no block, the `;` is what proved the block absent.
    let block_evidence = opening_brace.unwrap_or(semicolon);

    let description = MessageDescription {
        kind,
        from_outside,
        target,
        label,
        block,
        evidence: StatementEvidence {
            kind: arrow.clone(),
            from_outside: from_outside_evidence,
            target: target_evidence,
            label: label_evidence,
            block: block_evidence,
        },
    };

    match species::classify(description, active) {
        Ok(Some(activation)) => Ok(activation),
        Ok(None) => Err(cut_diag(
            Diagnostic::error("unrecognized statement")
                .with_code(ErrorCode::E102)
                .with_label(arrow.span, "no message species matches this statement"),
        )),
        Err(diagnostic) => Err(cut_diag(diagnostic)),
    }
}

/// Parse the inside of a call body, after the `{` has been consumed.
///
/// Returns once the matching `}` is seen. A `return` statement, if
/// present, must be the final item.
fn block_body<'src>(
    input: &mut Input<'src>,
    assembler: &mut SequenceAssembler,
    active: Option<&Entity>,
) -> IResult<NestedBlock<'src>> {
    let mut activations = Vec::new();
    let mut return_value: Option<String> = None;
    let mut return_evidence: Option<PositionedToken<'src>> = None;

    loop {
        trivia0(input)?;
        let Some(next) = peek_token(input) else {
            return Err(cut_diag(
                Diagnostic::error("unclosed call body")
                    .with_code(ErrorCode::E101)
                    .with_label(assembler.eof, ErrorCode::E101.description())
                    .with_help("add the missing `}`"),
            ));
        };

        // Once a return was seen, only the closing brace may follow.
        if return_value.is_some() && !matches!(next.token, Token::RightBrace) {
            return Err(cut_diag(
                Diagnostic::error("a call body cannot continue after `return`")
                    .with_code(ErrorCode::E103)
                    .with_label(next.span, "statement after the return")
                    .with_secondary_label(
                        return_evidence
                            .as_ref()
                            .expect("return evidence recorded with the value")
                            .span,
                        "return is here",
                    )
                    .with_help("move the `return` to the end of the body"),
            ));
        }

        match next.token {
            Token::RightBrace => {
                take_token(input)?;
                return Ok(NestedBlock {
                    return_value,
                    activations,
                    return_evidence,
                });
            }
            Token::Return => {
                let keyword = take_token(input)?;
                let literal = expect_token(
                    input,
                    |token| matches!(token, Token::StringLiteral(_)),
                    "a string value after `return`",
                    assembler.eof,
                )?;
                let Token::StringLiteral(value) = literal.token else {
                    unreachable!("expect_token only accepts string literals here");
                };
                expect_token(
                    input,
                    |token| matches!(token, Token::Semicolon),
                    "`;` after the return value",
                    assembler.eof,
                )?;
                return_value = Some(value);
                return_evidence = Some(keyword);
            }
            Token::Star | Token::Arrow | Token::AsyncArrow => {
                activations.push(statement(input, assembler, active)?);
            }
            Token::Actor | Token::Component => {
                return Err(cut_diag(
                    Diagnostic::error("participants must be declared at the top level")
                        .with_code(ErrorCode::E100)
                        .with_label(next.span, "declaration inside a call body"),
                ));
            }
            _ => {
                return Err(cut_diag(
                    Diagnostic::error(format!("unexpected token `{next}`"))
                        .with_code(ErrorCode::E100)
                        .with_label(next.span, ErrorCode::E100.description())
                        .with_help("statements start with `->`, `~>`, or `*`"),
                ));
            }
        }
    }
}

/// Parse a full token stream into a validated [`Sequence`].
///
/// The stream is consumed exactly once; parsing stops at the first error.
pub fn parse_sequence(tokens: &[PositionedToken<'_>]) -> Result<Sequence, ParseError> {
    let eof = tokens
        .last()
        .map(|token| Span::new(token.span.end()..token.span.end()))
        .unwrap_or_default();

    let mut input = Input::new(tokens);
    let mut assembler = SequenceAssembler::new(eof);
    let mut activations = Vec::new();

    loop {
        trivia0(&mut input).expect("trivia parsing never fails");
        let Some(next) = peek_token(&mut input) else {
            break;
        };

        let result = match next.token {
            Token::Actor | Token::Component => entity_decl(&mut input, &mut assembler),
            Token::Star | Token::Arrow | Token::AsyncArrow => {
                statement(&mut input, &mut assembler, None).map(|activation| {
                    activations.push(activation);
                })
            }
            Token::Return => Err(cut_diag(
                Diagnostic::error("`return` outside a call body")
                    .with_code(ErrorCode::E103)
                    .with_label(next.span, "no call body is open here"),
            )),
            Token::RightBrace => Err(cut_diag(
                Diagnostic::error("unmatched `}`")
                    .with_code(ErrorCode::E100)
                    .with_label(next.span, "no open block to close"),
            )),
            _ => Err(cut_diag(
                Diagnostic::error(format!("unexpected token `{next}`"))
                    .with_code(ErrorCode::E100)
                    .with_label(next.span, ErrorCode::E100.description())
                    .with_help("expected a declaration or a statement"),
            )),
        };

        if let Err(err) = result {
            return Err(convert_err_mode(err, next.span).into());
        }
    }

    debug!(
        entities_len = assembler.entities.len(),
        activations_len = activations.len();
        "Parsed sequence",
    );
    Ok(assembler.finish(activations))
}
