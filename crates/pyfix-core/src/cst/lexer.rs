//! CST-aware lexer that preserves all trivia (whitespace, comments)
//!
//! Every byte of the input ends up in exactly one token, so concatenating the
//! token texts reproduces the source. Newlines are split in two kinds: a
//! `Newline` ends a logical line, a `LineBreak` is trivia (inside brackets,
//! on blank or comment-only lines).

use crate::cst::PySyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: PySyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: PySyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

const THREE_CHAR_OPERATORS: &[(&str, PySyntaxKind)] = &[
    ("**=", PySyntaxKind::AugAssign),
    ("//=", PySyntaxKind::AugAssign),
    (">>=", PySyntaxKind::AugAssign),
    ("<<=", PySyntaxKind::AugAssign),
    ("...", PySyntaxKind::Ellipsis),
];

const TWO_CHAR_OPERATORS: &[(&str, PySyntaxKind)] = &[
    ("**", PySyntaxKind::DoubleStar),
    ("//", PySyntaxKind::DoubleSlash),
    ("<<", PySyntaxKind::LeftShift),
    (">>", PySyntaxKind::RightShift),
    ("<=", PySyntaxKind::LessEqual),
    (">=", PySyntaxKind::GreaterEqual),
    ("==", PySyntaxKind::EqEqual),
    ("!=", PySyntaxKind::NotEqual),
    ("<>", PySyntaxKind::NotEqual),
    ("->", PySyntaxKind::RArrow),
    ("+=", PySyntaxKind::AugAssign),
    ("-=", PySyntaxKind::AugAssign),
    ("*=", PySyntaxKind::AugAssign),
    ("/=", PySyntaxKind::AugAssign),
    ("%=", PySyntaxKind::AugAssign),
    ("&=", PySyntaxKind::AugAssign),
    ("|=", PySyntaxKind::AugAssign),
    ("^=", PySyntaxKind::AugAssign),
    ("@=", PySyntaxKind::AugAssign),
];

/// Lex input preserving ALL trivia for CST construction
///
/// - Preserves whitespace as `Whitespace` tokens
/// - Preserves comments as `Comment` tokens
/// - Preserves non-logical newlines as `LineBreak` tokens
///
/// This enables lossless round-tripping: parse(source).text() == source
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;
    let mut depth = 0usize;
    let mut line_has_tokens = false;

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        let kind = match current {
            '\n' | '\r' => {
                let mut end = i + size;
                if current == '\r'
                    && let Some(('\n', nl_size)) = next_char(input, end)
                {
                    end += nl_size;
                }
                let kind = if depth == 0 && line_has_tokens {
                    line_has_tokens = false;
                    PySyntaxKind::Newline
                } else {
                    PySyntaxKind::LineBreak
                };
                tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
                i = end;
                continue;
            }

            // Byte order mark of a UTF-8 encoded file
            '\u{feff}' if start == 0 => {
                tokens.push(CstToken::new(
                    PySyntaxKind::Whitespace,
                    &input[start..start + size],
                    span(start, start + size),
                ));
                i += size;
                continue;
            }

            c if c.is_whitespace() => {
                let mut end = i + size;
                while let Some((next_ch, next_size)) = next_char(input, end) {
                    if next_ch.is_whitespace() && next_ch != '\n' && next_ch != '\r' {
                        end += next_size;
                    } else {
                        break;
                    }
                }
                tokens.push(CstToken::new(
                    PySyntaxKind::Whitespace,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                continue;
            }

            '#' => {
                let end = input[start..]
                    .find(['\n', '\r'])
                    .map_or(len, |offset| start + offset);
                tokens.push(CstToken::new(
                    PySyntaxKind::Comment,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                continue;
            }

            '\\' => {
                let after = i + size;
                let newline_len = match next_char(input, after) {
                    Some(('\n', n)) => Some(n),
                    Some(('\r', n)) => match next_char(input, after + n) {
                        Some(('\n', m)) => Some(n + m),
                        _ => Some(n),
                    },
                    _ => None,
                };
                match newline_len {
                    Some(n) => {
                        let end = after + n;
                        tokens.push(CstToken::new(
                            PySyntaxKind::Continuation,
                            &input[start..end],
                            span(start, end),
                        ));
                        i = end;
                        continue;
                    }
                    None => {
                        errors.push(LexerError::new(
                            "unexpected character after line continuation character",
                            span(start, after),
                        ));
                        tokens.push(CstToken::new(
                            PySyntaxKind::ErrorToken,
                            "\\",
                            span(start, after),
                        ));
                        i = after;
                        PySyntaxKind::ErrorToken
                    }
                }
            }

            '"' | '\'' => {
                let (end, string_error) = lex_string(input, start);
                if let Some(err) = string_error {
                    errors.push(err);
                }
                tokens.push(CstToken::new(
                    PySyntaxKind::String,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                PySyntaxKind::String
            }

            c if c.is_ascii_digit() => {
                let end = lex_number(input, start);
                tokens.push(CstToken::new(
                    PySyntaxKind::Number,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                PySyntaxKind::Number
            }

            '.' if next_char(input, i + size).is_some_and(|(c, _)| c.is_ascii_digit()) => {
                let end = lex_number(input, start);
                tokens.push(CstToken::new(
                    PySyntaxKind::Number,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                PySyntaxKind::Number
            }

            c if is_identifier_start(c) => {
                let word_end = read_identifier(input, start);
                let word = &input[start..word_end];
                let quote_follows =
                    matches!(next_char(input, word_end), Some(('"', _)) | Some(('\'', _)));

                if quote_follows && is_string_prefix(word) {
                    let (end, string_error) = lex_string(input, word_end);
                    if let Some(err) = string_error {
                        errors.push(err);
                    }
                    tokens.push(CstToken::new(
                        PySyntaxKind::String,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                    PySyntaxKind::String
                } else {
                    tokens.push(CstToken::new(
                        PySyntaxKind::Name,
                        word,
                        span(start, word_end),
                    ));
                    i = word_end;
                    PySyntaxKind::Name
                }
            }

            _ => match lex_operator(input, start) {
                Some((kind, end)) => {
                    match kind {
                        PySyntaxKind::LParen | PySyntaxKind::LSqb | PySyntaxKind::LBrace => {
                            depth += 1;
                        }
                        PySyntaxKind::RParen | PySyntaxKind::RSqb | PySyntaxKind::RBrace => {
                            depth = depth.saturating_sub(1);
                        }
                        _ => {}
                    }
                    tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
                    i = end;
                    kind
                }
                None => {
                    let end = i + size;
                    errors.push(LexerError::new(
                        format!("unexpected character '{current}'"),
                        span(start, end),
                    ));
                    tokens.push(CstToken::new(
                        PySyntaxKind::ErrorToken,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                    PySyntaxKind::ErrorToken
                }
            },
        };

        if !kind.is_trivia() {
            line_has_tokens = true;
        }
    }

    (tokens, errors)
}

/// Lex a string literal whose opening quote sits at `quote_start`
///
/// Returns the end offset and an error when the literal is unterminated.
fn lex_string(input: &str, quote_start: usize) -> (usize, Option<LexerError>) {
    let len = input.len();
    let Some((quote, quote_size)) = next_char(input, quote_start) else {
        return (quote_start, None);
    };
    let triple = quote.to_string().repeat(3);
    let is_triple = input[quote_start..].starts_with(&triple);

    let mut end = if is_triple {
        quote_start + 3 * quote_size
    } else {
        quote_start + quote_size
    };

    while end < len {
        let Some((c, step)) = next_char(input, end) else {
            break;
        };
        match c {
            '\\' => {
                end += step;
                if let Some((_, escaped)) = next_char(input, end) {
                    end += escaped;
                }
            }
            _ if is_triple && input[end..].starts_with(&triple) => {
                return (end + triple.len(), None);
            }
            _ if !is_triple && c == quote => {
                return (end + step, None);
            }
            '\n' | '\r' if !is_triple => {
                return (
                    end,
                    Some(LexerError::new(
                        "unterminated string literal",
                        span(quote_start, end),
                    )),
                );
            }
            _ => end += step,
        }
    }

    let message = if is_triple {
        "unterminated triple-quoted string literal"
    } else {
        "unterminated string literal"
    };
    (len, Some(LexerError::new(message, span(quote_start, len))))
}

/// Lex a numeric literal (ints, floats, hex/octal, exponents, `L`/`j` suffixes)
fn lex_number(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let is_hex = input[start..].starts_with("0x") || input[start..].starts_with("0X");
    let mut end = start;

    while end < bytes.len() {
        let b = bytes[end];
        if b.is_ascii_alphanumeric() || b == b'_' {
            end += 1;
        } else if b == b'.' && !input[end..].starts_with("...") {
            end += 1;
        } else if (b == b'+' || b == b'-')
            && !is_hex
            && end > start
            && matches!(bytes[end - 1], b'e' | b'E')
            && bytes.get(end + 1).is_some_and(u8::is_ascii_digit)
        {
            end += 1;
        } else {
            break;
        }
    }

    end
}

/// Longest-match operator lexing
fn lex_operator(input: &str, start: usize) -> Option<(PySyntaxKind, usize)> {
    let rest = &input[start..];

    for (text, kind) in THREE_CHAR_OPERATORS.iter().chain(TWO_CHAR_OPERATORS) {
        if rest.starts_with(text) {
            return Some((*kind, start + text.len()));
        }
    }

    let kind = match rest.chars().next()? {
        '(' => PySyntaxKind::LParen,
        ')' => PySyntaxKind::RParen,
        '[' => PySyntaxKind::LSqb,
        ']' => PySyntaxKind::RSqb,
        '{' => PySyntaxKind::LBrace,
        '}' => PySyntaxKind::RBrace,
        ',' => PySyntaxKind::Comma,
        ':' => PySyntaxKind::Colon,
        ';' => PySyntaxKind::Semicolon,
        '.' => PySyntaxKind::Dot,
        '=' => PySyntaxKind::Equal,
        '`' => PySyntaxKind::Backquote,
        '+' => PySyntaxKind::Plus,
        '-' => PySyntaxKind::Minus,
        '*' => PySyntaxKind::Star,
        '/' => PySyntaxKind::Slash,
        '%' => PySyntaxKind::Percent,
        '@' => PySyntaxKind::At,
        '&' => PySyntaxKind::Amper,
        '|' => PySyntaxKind::VBar,
        '^' => PySyntaxKind::Circumflex,
        '~' => PySyntaxKind::Tilde,
        '<' => PySyntaxKind::Less,
        '>' => PySyntaxKind::Greater,
        _ => return None,
    };
    Some((kind, start + 1))
}

fn is_string_prefix(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "r" | "u" | "b" | "f" | "br" | "rb" | "ur" | "fr" | "rf"
    )
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn read_identifier(input: &str, start: usize) -> usize {
    let mut end = start;
    while let Some((c, size)) = next_char(input, end) {
        if c.is_alphanumeric() || c == '_' {
            end += size;
        } else {
            break;
        }
    }
    end
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input.get(pos..)?.chars().next().map(|c| (c, c.len_utf8()))
}

fn span(start: usize, end: usize) -> CstSpan {
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<PySyntaxKind> {
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lossless_reconstruction() {
        let source = "x = apply(f,  # why\n    args)  \\\n  + 1\n\n# done\n";
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty());
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_leading_byte_order_mark_is_trivia() {
        use PySyntaxKind::*;
        assert_eq!(kinds("\u{feff}x\n"), vec![Whitespace, Name, Newline]);

        let (tokens, errors) = lex_with_trivia("x\u{feff}\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[0].kind, Name);
    }

    #[test]
    fn test_logical_newlines() {
        use PySyntaxKind::*;
        assert_eq!(
            kinds("a\n\nb\n"),
            vec![Name, Newline, LineBreak, Name, Newline]
        );
    }

    #[test]
    fn test_newline_inside_brackets_is_trivia() {
        use PySyntaxKind::*;
        assert_eq!(
            kinds("f(a,\n  b)\n"),
            vec![
                Name, LParen, Name, Comma, LineBreak, Whitespace, Name, RParen, Newline
            ]
        );
    }

    #[test]
    fn test_comment_only_line_is_trivia() {
        use PySyntaxKind::*;
        assert_eq!(kinds("# hi\nx\n"), vec![Comment, LineBreak, Name, Newline]);
    }

    #[test]
    fn test_backslash_continuation() {
        use PySyntaxKind::*;
        assert_eq!(
            kinds("a + \\\n b\n"),
            vec![
                Name,
                Whitespace,
                Plus,
                Whitespace,
                Continuation,
                Whitespace,
                Name,
                Newline
            ]
        );
    }

    #[test]
    fn test_operators_use_longest_match() {
        use PySyntaxKind::*;
        assert_eq!(
            kinds("a**b**=c<>d...//"),
            vec![
                Name, DoubleStar, Name, AugAssign, Name, NotEqual, Name, Ellipsis, DoubleSlash
            ]
        );
    }

    #[test]
    fn test_string_prefixes_and_triple_quotes() {
        let source = "ur'a\\'b' b\"x\" '''multi\nline'''\n";
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty());
        let strings: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == PySyntaxKind::String)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(strings, vec!["ur'a\\'b'", "b\"x\"", "'''multi\nline'''"]);
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let (tokens, errors) = lex_with_trivia("x = 'oops\ny\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unterminated string literal");
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, "x = 'oops\ny\n");
    }

    #[test]
    fn test_numbers() {
        let (tokens, _) = lex_with_trivia("1e-5 0xFFL 3.14j .5 10L");
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == PySyntaxKind::Number)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(numbers, vec!["1e-5", "0xFFL", "3.14j", ".5", "10L"]);
    }

    #[test]
    fn test_unknown_character() {
        let (tokens, errors) = lex_with_trivia("a $ b");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[2].kind, PySyntaxKind::ErrorToken);
        assert_eq!(tokens[2].text, "$");
    }
}
