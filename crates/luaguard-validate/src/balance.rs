//! Block and bracket balance checking
//!
//! Consumes the token stream from [`crate::lexer`] and maintains two
//! independent stacks: one for block constructs keyed by keyword, one for
//! `(`/`{` brackets keyed by character. Tie-break rule: the `do` that
//! follows a `for` or `while` header belongs to that construct and does
//! not open a generic do-block.

use crate::lexer::{self, Keyword, Token, TokenKind};
use crate::result::ValidationError;
use std::fmt::{self, Display, Formatter};

/// An open block construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Construct {
    Function,
    If,
    For,
    While,
    Do,
    Repeat,
}

impl Construct {
    fn from_opener(kw: Keyword) -> Option<Self> {
        match kw {
            Keyword::Function => Some(Self::Function),
            Keyword::If => Some(Self::If),
            Keyword::For => Some(Self::For),
            Keyword::While => Some(Self::While),
            Keyword::Do => Some(Self::Do),
            Keyword::Repeat => Some(Self::Repeat),
            Keyword::End | Keyword::Until => None,
        }
    }

    fn closer(self) -> &'static str {
        match self {
            Self::Repeat => "until",
            _ => "end",
        }
    }
}

impl Display for Construct {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Function => "function",
            Self::If => "if",
            Self::For => "for",
            Self::While => "while",
            Self::Do => "do",
            Self::Repeat => "repeat",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug)]
struct BlockFrame {
    construct: Construct,
    line: u32,
    offset: usize,
    /// `for`/`while` headers still waiting for their `do`
    needs_do: bool,
    /// byte offset just past the construct's `do`, once seen
    body_start: Option<usize>,
    tracked: bool,
}

#[derive(Debug)]
struct BracketFrame {
    open: u8,
    line: u32,
}

fn closing(open: u8) -> u8 {
    match open {
        b'(' => b')',
        _ => b'}',
    }
}

/// Balance state machine over one token stream
#[derive(Debug, Default)]
struct Machine {
    blocks: Vec<BlockFrame>,
    brackets: Vec<BracketFrame>,
    errors: Vec<ValidationError>,
    /// byte offset of a `while`/`for` opener whose body span is requested
    track_offset: Option<usize>,
    tracked_span: Option<(usize, usize)>,
}

impl Machine {
    fn feed(&mut self, token: &Token) {
        match token.kind {
            TokenKind::Keyword(Keyword::End) => self.close_block(token),
            TokenKind::Keyword(Keyword::Until) => self.close_repeat(token),
            TokenKind::Keyword(Keyword::Do) => {
                if let Some(top) = self.blocks.last_mut() {
                    if top.needs_do {
                        top.needs_do = false;
                        top.body_start = Some(token.offset + 2);
                        return;
                    }
                }
                self.push_block(Construct::Do, token);
            }
            TokenKind::Keyword(kw) => {
                if let Some(construct) = Construct::from_opener(kw) {
                    self.push_block(construct, token);
                }
            }
            TokenKind::Open(open) => self.brackets.push(BracketFrame {
                open,
                line: token.line,
            }),
            TokenKind::Close(close) => self.close_bracket(close, token),
        }
    }

    fn push_block(&mut self, construct: Construct, token: &Token) {
        let needs_do = matches!(construct, Construct::For | Construct::While);
        self.blocks.push(BlockFrame {
            construct,
            line: token.line,
            offset: token.offset,
            needs_do,
            body_start: (!needs_do).then_some(token.offset),
            tracked: self.track_offset == Some(token.offset),
        });
    }

    fn close_block(&mut self, token: &Token) {
        match self.blocks.pop() {
            None => self.errors.push(ValidationError::structure(
                token.line,
                "orphan 'end' with no open block",
            )),
            Some(frame) if frame.construct == Construct::Repeat => {
                self.errors.push(ValidationError::structure(
                    token.line,
                    format!(
                        "expected 'until' to close repeat opened at line {}, found 'end'",
                        frame.line
                    ),
                ));
            }
            Some(frame) => {
                if frame.tracked {
                    let start = frame.body_start.unwrap_or(frame.offset);
                    self.tracked_span = Some((start, token.offset));
                }
            }
        }
    }

    fn close_repeat(&mut self, token: &Token) {
        match self.blocks.pop() {
            None => self.errors.push(ValidationError::structure(
                token.line,
                "orphan 'until' with no matching 'repeat'",
            )),
            Some(frame) if frame.construct == Construct::Repeat => {}
            Some(frame) => {
                self.errors.push(ValidationError::structure(
                    token.line,
                    format!(
                        "expected 'end' to close {} opened at line {}, found 'until'",
                        frame.construct, frame.line
                    ),
                ));
            }
        }
    }

    fn close_bracket(&mut self, close: u8, token: &Token) {
        match self.brackets.pop() {
            None => self.errors.push(ValidationError::structure(
                token.line,
                format!("unmatched '{}' with no open bracket", close as char),
            )),
            Some(frame) if closing(frame.open) != close => {
                self.errors.push(ValidationError::structure(
                    token.line,
                    format!(
                        "expected '{}' to close '{}' opened at line {}, found '{}'",
                        closing(frame.open) as char,
                        frame.open as char,
                        frame.line,
                        close as char
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    fn finish(mut self) -> (Vec<ValidationError>, Option<(usize, usize)>) {
        for frame in &self.blocks {
            self.errors.push(ValidationError::structure(
                frame.line,
                format!(
                    "missing close for {} opened at line {} (expected '{}')",
                    frame.construct,
                    frame.line,
                    frame.construct.closer()
                ),
            ));
        }
        for frame in &self.brackets {
            self.errors.push(ValidationError::structure(
                frame.line,
                format!(
                    "missing '{}' for '{}' opened at line {}",
                    closing(frame.open) as char,
                    frame.open as char,
                    frame.line
                ),
            ));
        }
        (self.errors, self.tracked_span)
    }
}

fn run(content: &str, track_offset: Option<usize>) -> (Vec<ValidationError>, Option<(usize, usize)>) {
    let lexed = lexer::lex(content);
    let mut machine = Machine {
        track_offset,
        ..Machine::default()
    };
    for token in &lexed.tokens {
        machine.feed(token);
    }
    let (mut errors, span) = machine.finish();
    errors.extend(lexed.errors);
    errors.sort_by_key(|e| e.line.unwrap_or(0));
    (errors, span)
}

/// Check block/bracket balance of `content`
///
/// Returns findings in line order. Empty means balanced.
#[must_use]
pub(crate) fn check(content: &str) -> Vec<ValidationError> {
    run(content, None).0
}

/// Byte span of a loop body, given the offset of its `while`/`for` keyword
///
/// The span runs from just past the construct's `do` to its matching
/// `end`. Returns `None` when the offset is not an actual loop keyword in
/// code position (e.g. inside a comment) or the loop is never closed.
#[must_use]
pub fn loop_body_span(content: &str, loop_offset: usize) -> Option<(usize, usize)> {
    run(content, Some(loop_offset)).1
}
