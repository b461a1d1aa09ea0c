//! Lexical scanner for Luau/Lua content
//!
//! Produces the token stream the balance checker consumes: block keywords
//! and `(`/`{` bracket characters, with everything inside line comments,
//! block comments, quoted strings, and long-bracket literals skipped.
//! Long brackets track their `=` level depth, so `[==[ ... ]==]` nests
//! correctly around `]]`.

use crate::result::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Block-structure keywords recognized by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// `function` definition opener
    Function,
    /// `if` opener (its `then` is not tracked)
    If,
    /// `for` opener, closed via its `do` block
    For,
    /// `while` opener, closed via its `do` block
    While,
    /// Generic `do` block opener
    Do,
    /// `repeat` opener, closed by `until`
    Repeat,
    /// Block closer for everything except `repeat`
    End,
    /// Block closer for `repeat`
    Until,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Function => "function",
            Self::If => "if",
            Self::For => "for",
            Self::While => "while",
            Self::Do => "do",
            Self::Repeat => "repeat",
            Self::End => "end",
            Self::Until => "until",
        };
        write!(f, "{name}")
    }
}

/// What a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A block keyword in code position
    Keyword(Keyword),
    /// `(` or `{`
    Open(u8),
    /// `)` or `}`
    Close(u8),
}

/// A structural token with its source position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// 1-based line number
    pub line: u32,
    /// Byte offset of the token start
    pub offset: usize,
}

/// Result of lexing: structural tokens plus any unterminated-mode findings
#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    /// Structural tokens in source order
    pub tokens: Vec<Token>,
    /// `syntax` findings for unterminated strings/comments/long brackets
    pub errors: Vec<ValidationError>,
}

fn keyword(word: &str) -> Option<Keyword> {
    match word {
        "function" => Some(Keyword::Function),
        "if" => Some(Keyword::If),
        "for" => Some(Keyword::For),
        "while" => Some(Keyword::While),
        "do" => Some(Keyword::Do),
        "repeat" => Some(Keyword::Repeat),
        "end" => Some(Keyword::End),
        "until" => Some(Keyword::Until),
        _ => None,
    }
}

#[inline]
fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Try to read a long-bracket opener `[`, `=`*level, `[` starting at `i`.
///
/// Returns `(level, index_after_opener)` on success.
fn long_bracket_open(bytes: &[u8], i: usize) -> Option<(usize, usize)> {
    if bytes.get(i) != Some(&b'[') {
        return None;
    }
    let mut j = i + 1;
    while bytes.get(j) == Some(&b'=') {
        j += 1;
    }
    if bytes.get(j) == Some(&b'[') {
        Some((j - i - 1, j + 1))
    } else {
        None
    }
}

/// Scan forward for the matching `]`, `=`*level, `]` close token.
///
/// Returns the index just past the close, updating `line` for every
/// newline crossed. `None` means the literal runs to end-of-input.
fn scan_long_close(bytes: &[u8], mut i: usize, level: usize, line: &mut u32) -> Option<usize> {
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                *line += 1;
                i += 1;
            }
            b']' => {
                let mut j = i + 1;
                let mut eqs = 0;
                while bytes.get(j) == Some(&b'=') {
                    eqs += 1;
                    j += 1;
                }
                if eqs == level && bytes.get(j) == Some(&b']') {
                    return Some(j + 1);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Lex `content` into structural tokens
///
/// Never fails: unterminated lexical modes are reported as `syntax`
/// findings in [`LexOutput::errors`] and scanning resumes where possible.
#[must_use]
pub fn lex(content: &str) -> LexOutput {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut out = LexOutput::default();
    let mut i = 0;
    let mut line: u32 = 1;

    while i < len {
        match bytes[i] {
            b'\n' => {
                line += 1;
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                let open_line = line;
                if let Some((level, after)) = long_bracket_open(bytes, i + 2) {
                    match scan_long_close(bytes, after, level, &mut line) {
                        Some(next) => i = next,
                        None => {
                            out.errors.push(ValidationError::syntax(
                                open_line,
                                "unterminated block comment",
                            ));
                            i = len;
                        }
                    }
                } else {
                    i += 2;
                    while i < len && bytes[i] != b'\n' {
                        i += 1;
                    }
                }
            }
            quote @ (b'\'' | b'"') => {
                let open_line = line;
                i += 1;
                let mut closed = false;
                while i < len {
                    match bytes[i] {
                        b'\\' => {
                            if bytes.get(i + 1) == Some(&b'\n') {
                                line += 1;
                            }
                            i += 2;
                        }
                        b'\n' => break,
                        b if b == quote => {
                            closed = true;
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
                if !closed {
                    out.errors.push(ValidationError::syntax(
                        open_line,
                        "unterminated string literal",
                    ));
                }
            }
            b'[' => {
                if let Some((level, after)) = long_bracket_open(bytes, i) {
                    let open_line = line;
                    match scan_long_close(bytes, after, level, &mut line) {
                        Some(next) => i = next,
                        None => {
                            out.errors.push(ValidationError::syntax(
                                open_line,
                                "unterminated long string literal",
                            ));
                            i = len;
                        }
                    }
                } else {
                    // plain `[` is indexing syntax, not a tracked bracket
                    i += 1;
                }
            }
            bracket @ (b'(' | b'{') => {
                out.tokens.push(Token {
                    kind: TokenKind::Open(bracket),
                    line,
                    offset: i,
                });
                i += 1;
            }
            bracket @ (b')' | b'}') => {
                out.tokens.push(Token {
                    kind: TokenKind::Close(bracket),
                    line,
                    offset: i,
                });
                i += 1;
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let start = i;
                while i < len && is_ident(bytes[i]) {
                    i += 1;
                }
                // the slice is ASCII identifier bytes, always valid UTF-8
                if let Some(kw) = keyword(&content[start..i]) {
                    out.tokens.push(Token {
                        kind: TokenKind::Keyword(kw),
                        line,
                        offset: start,
                    });
                }
            }
            _ => i += 1,
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keywords(content: &str) -> Vec<Keyword> {
        lex(content)
            .tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Keyword(kw) => Some(kw),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn keywords_in_code_are_tokenized() {
        assert_eq!(
            keywords("function f() if x then end end"),
            vec![Keyword::Function, Keyword::If, Keyword::End, Keyword::End]
        );
    }

    #[test]
    fn keywords_inside_line_comment_are_skipped() {
        assert_eq!(keywords("-- end function\nif x then end"), vec![
            Keyword::If,
            Keyword::End
        ]);
    }

    #[test]
    fn keywords_inside_strings_are_skipped() {
        assert_eq!(keywords("local s = 'end function do'"), vec![]);
        assert_eq!(keywords("local s = \"while true do\""), vec![]);
    }

    #[test]
    fn keywords_inside_block_comment_are_skipped() {
        assert_eq!(keywords("--[[\nend\nfunction\n]]\ndo end"), vec![
            Keyword::Do,
            Keyword::End
        ]);
    }

    #[test]
    fn long_string_levels_nest() {
        // `]]` inside a level-1 long string does not close it
        assert_eq!(keywords("local s = [==[ end ]] still inside ]==] do end"), vec![
            Keyword::Do,
            Keyword::End
        ]);
    }

    #[test]
    fn identifier_containing_keyword_is_not_a_token() {
        assert_eq!(keywords("local ending = backend"), vec![]);
        assert_eq!(keywords("local do_thing = 1"), vec![]);
    }

    #[test]
    fn escaped_quote_does_not_close_string() {
        assert_eq!(keywords("local s = 'a\\'end' do end"), vec![
            Keyword::Do,
            Keyword::End
        ]);
    }

    #[test]
    fn unterminated_string_reports_syntax_error() {
        let out = lex("local s = 'never closed");
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].message.contains("unterminated string"));
        assert_eq!(out.errors[0].line, Some(1));
    }

    #[test]
    fn newline_terminates_short_string_with_error() {
        let out = lex("local s = 'broken\nend");
        assert_eq!(out.errors.len(), 1);
        // scanning resumes on the next line
        assert_eq!(
            out.tokens
                .iter()
                .filter(|t| matches!(t.kind, TokenKind::Keyword(Keyword::End)))
                .count(),
            1
        );
    }

    #[test]
    fn unterminated_block_comment_reports_line_of_opener() {
        let out = lex("do end\n--[[ never closed");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].line, Some(2));
        assert!(out.errors[0].message.contains("block comment"));
    }

    #[test]
    fn unterminated_long_string_reports_syntax_error() {
        let out = lex("local s = [[\nno close");
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].message.contains("long string"));
    }

    #[test]
    fn brackets_are_tracked_with_lines() {
        let out = lex("f(\n{\n}\n)");
        let kinds: Vec<_> = out.tokens.iter().map(|t| (t.kind, t.line)).collect();
        assert_eq!(kinds, vec![
            (TokenKind::Open(b'('), 1),
            (TokenKind::Open(b'{'), 2),
            (TokenKind::Close(b'}'), 3),
            (TokenKind::Close(b')'), 4),
        ]);
    }

    #[test]
    fn square_brackets_are_not_tracked() {
        let out = lex("t[1] = t[2]");
        assert!(out.tokens.is_empty());
    }

    #[test]
    fn token_offsets_point_at_source() {
        let src = "x = 1\nwhile true do end";
        let out = lex(src);
        let while_tok = out
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Keyword(Keyword::While))
            .unwrap();
        assert_eq!(&src[while_tok.offset..while_tok.offset + 5], "while");
        assert_eq!(while_tok.line, 2);
    }
}
