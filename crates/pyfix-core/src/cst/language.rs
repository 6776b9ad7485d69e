//! Rowan language implementation for Python
//!
//! This module implements the `rowan::Language` trait, which connects
//! our PySyntaxKind enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::PySyntaxKind;

/// Language implementation for Python source
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonLanguage;

impl Language for PythonLanguage {
    type Kind = PySyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => PySyntaxKind::Whitespace,
            1 => PySyntaxKind::Comment,
            2 => PySyntaxKind::LineBreak,
            3 => PySyntaxKind::Continuation,

            // Literals (10-19)
            10 => PySyntaxKind::Name,
            11 => PySyntaxKind::Number,
            12 => PySyntaxKind::String,

            // Structure tokens (20-29)
            20 => PySyntaxKind::Newline,
            21 => PySyntaxKind::ErrorToken,
            22 => PySyntaxKind::Eof,

            // Punctuation (100-199)
            100 => PySyntaxKind::LParen,
            101 => PySyntaxKind::RParen,
            102 => PySyntaxKind::LSqb,
            103 => PySyntaxKind::RSqb,
            104 => PySyntaxKind::LBrace,
            105 => PySyntaxKind::RBrace,
            106 => PySyntaxKind::Comma,
            107 => PySyntaxKind::Colon,
            108 => PySyntaxKind::Semicolon,
            109 => PySyntaxKind::Dot,
            110 => PySyntaxKind::Ellipsis,
            111 => PySyntaxKind::Equal,
            112 => PySyntaxKind::AugAssign,
            113 => PySyntaxKind::RArrow,
            114 => PySyntaxKind::Backquote,
            120 => PySyntaxKind::Plus,
            121 => PySyntaxKind::Minus,
            122 => PySyntaxKind::Star,
            123 => PySyntaxKind::DoubleStar,
            124 => PySyntaxKind::Slash,
            125 => PySyntaxKind::DoubleSlash,
            126 => PySyntaxKind::Percent,
            127 => PySyntaxKind::At,
            128 => PySyntaxKind::Amper,
            129 => PySyntaxKind::VBar,
            130 => PySyntaxKind::Circumflex,
            131 => PySyntaxKind::Tilde,
            132 => PySyntaxKind::LeftShift,
            133 => PySyntaxKind::RightShift,
            140 => PySyntaxKind::Less,
            141 => PySyntaxKind::Greater,
            142 => PySyntaxKind::LessEqual,
            143 => PySyntaxKind::GreaterEqual,
            144 => PySyntaxKind::EqEqual,
            145 => PySyntaxKind::NotEqual,

            // Nodes (200-299)
            200 => PySyntaxKind::Root,
            201 => PySyntaxKind::Stmt,
            202 => PySyntaxKind::FuncDef,
            203 => PySyntaxKind::Parameters,
            204 => PySyntaxKind::Lambda,
            205 => PySyntaxKind::Test,
            206 => PySyntaxKind::OrTest,
            207 => PySyntaxKind::AndTest,
            208 => PySyntaxKind::NotTest,
            209 => PySyntaxKind::Comparison,
            210 => PySyntaxKind::Expr,
            211 => PySyntaxKind::XorExpr,
            212 => PySyntaxKind::AndExpr,
            213 => PySyntaxKind::ShiftExpr,
            214 => PySyntaxKind::ArithExpr,
            215 => PySyntaxKind::Term,
            216 => PySyntaxKind::Factor,
            217 => PySyntaxKind::Power,
            218 => PySyntaxKind::Trailer,
            219 => PySyntaxKind::Atom,
            220 => PySyntaxKind::TestList,
            221 => PySyntaxKind::ArgList,
            222 => PySyntaxKind::Argument,
            223 => PySyntaxKind::CompFor,
            299 => PySyntaxKind::Error,

            // Unknown value - only reachable through foreign green trees
            _ => {
                tracing::warn!("Unknown syntax kind: {}", raw.0);
                PySyntaxKind::ErrorToken
            }
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}
