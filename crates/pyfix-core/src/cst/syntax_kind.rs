//! Syntax kind enumeration for the Python CST
//!
//! This module defines all possible node and token types in the syntax tree.
//! Node kinds follow the lib2to3 grammar symbols so that fixers can reason
//! about shapes like `power< NAME trailer >` directly.

use std::fmt;

/// Syntax kind for Python language elements
///
/// It includes:
/// - Trivia (whitespace, comments, non-logical line breaks)
/// - Literal tokens (names, numbers, strings)
/// - Punctuation and operators
/// - Structural nodes (statements, expressions, trailers, arguments)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum PySyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Spaces, tabs and form feeds
    Whitespace = 0,
    /// Comment starting with `#`, up to the end of the line
    Comment = 1,
    /// Newline that does not end a logical line (inside brackets, blank lines)
    LineBreak = 2,
    /// Backslash line continuation, including its newline
    Continuation = 3,

    // ==================
    // Literals (10-19)
    // ==================
    /// Identifier or keyword
    Name = 10,
    /// Integer, float, imaginary or long literal
    Number = 11,
    /// String literal, including its prefix and quotes
    String = 12,

    // ==================
    // Structure tokens (20-29)
    // ==================
    /// Newline ending a logical line
    Newline = 20,
    /// Character the lexer could not classify
    ErrorToken = 21,
    /// End of input (never stored in the tree)
    Eof = 22,

    // ==================
    // Punctuation & operators (100-199)
    // ==================
    LParen = 100,
    RParen = 101,
    LSqb = 102,
    RSqb = 103,
    LBrace = 104,
    RBrace = 105,
    Comma = 106,
    Colon = 107,
    Semicolon = 108,
    Dot = 109,
    Ellipsis = 110,
    /// `=`
    Equal = 111,
    /// Augmented assignment such as `+=` or `**=`
    AugAssign = 112,
    /// `->`
    RArrow = 113,
    /// Python 2 repr quote
    Backquote = 114,
    Plus = 120,
    Minus = 121,
    /// `*`, also the single-splat marker at call sites
    Star = 122,
    /// `**`, also the double-splat marker at call sites
    DoubleStar = 123,
    Slash = 124,
    DoubleSlash = 125,
    Percent = 126,
    At = 127,
    Amper = 128,
    VBar = 129,
    Circumflex = 130,
    Tilde = 131,
    LeftShift = 132,
    RightShift = 133,
    Less = 140,
    Greater = 141,
    LessEqual = 142,
    GreaterEqual = 143,
    EqEqual = 144,
    /// `!=` or the Python 2 spelling `<>`
    NotEqual = 145,

    // ==================
    // Nodes (200-299)
    // ==================
    /// File root
    Root = 200,
    /// One logical line
    Stmt = 201,
    /// `def name(params) [-> test]:` header
    FuncDef = 202,
    /// Parenthesized parameter list of a `def`
    Parameters = 203,
    /// `lambda args: test`
    Lambda = 204,
    /// Conditional expression `a if b else c`
    Test = 205,
    OrTest = 206,
    AndTest = 207,
    NotTest = 208,
    Comparison = 209,
    /// Bitwise or expression
    Expr = 210,
    XorExpr = 211,
    AndExpr = 212,
    ShiftExpr = 213,
    ArithExpr = 214,
    Term = 215,
    /// Unary `+`, `-` or `~`
    Factor = 216,
    /// Atom followed by trailers and an optional `** factor`
    Power = 217,
    /// `(args)`, `[subscript]` or `.name`
    Trailer = 218,
    /// Bracketed expression or concatenated strings
    Atom = 219,
    /// Comma separated contents inside brackets
    TestList = 220,
    /// Arguments of a call trailer
    ArgList = 221,
    /// Keyword argument or splat-prefixed argument
    Argument = 222,
    /// Comprehension clause `for x in y [if z]`
    CompFor = 223,
    /// Tokens the parser could not place
    Error = 299,
}

impl PySyntaxKind {
    /// Check if this is trivia (whitespace, comments, non-logical newlines)
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Comment | Self::LineBreak | Self::Continuation
        )
    }

    /// Check if this is an operator or punctuation token
    pub const fn is_punctuation(self) -> bool {
        (self as u16) >= 100 && (self as u16) < 200
    }

    /// Check if this is a node kind (not a token)
    pub const fn is_node(self) -> bool {
        (self as u16) >= 200
    }

    /// Check if this token closes a bracket
    pub const fn is_closing_bracket(self) -> bool {
        matches!(self, Self::RParen | Self::RSqb | Self::RBrace)
    }

    /// Fixed source text for punctuation kinds with a single spelling
    pub const fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LSqb => "[",
            Self::RSqb => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Ellipsis => "...",
            Self::Equal => "=",
            Self::RArrow => "->",
            Self::Backquote => "`",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::DoubleStar => "**",
            Self::Slash => "/",
            Self::DoubleSlash => "//",
            Self::Percent => "%",
            Self::At => "@",
            Self::Amper => "&",
            Self::VBar => "|",
            Self::Circumflex => "^",
            Self::Tilde => "~",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::EqEqual => "==",
            _ => return None,
        };
        Some(text)
    }
}

impl From<PySyntaxKind> for rowan::SyntaxKind {
    fn from(kind: PySyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl fmt::Display for PySyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fixed_text() {
            Some(text) => write!(f, "'{text}'"),
            None => write!(f, "{self:?}"),
        }
    }
}
