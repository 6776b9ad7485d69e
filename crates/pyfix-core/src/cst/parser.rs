//! Hierarchical parser for Python source
//!
//! Builds a lossless CST whose expression nodes follow the lib2to3 grammar
//! (`test` down to `power`/`atom`/`trailer`). Productions with a single child
//! collapse, so a bare name stays a `Name` token instead of a chain of nodes.
//!
//! Statements are parsed permissively: fixers only rewrite expressions, so a
//! logical line is kept as a `Stmt` holding expressions and raw keyword or
//! punctuation tokens. Indentation is ordinary whitespace trivia.
//!
//! Trivia is emitted lazily, right before the next significant token. A node
//! that starts at a token therefore owns the trivia in front of it, which is
//! what "leading trivia of a node" means throughout the crate.

use rowan::GreenNode;

use super::lexer::{CstSpan, LexerError};
use super::{CstBuilder, CstToken, PySyntaxKind, PySyntaxNode, lex_with_trivia};

/// Keywords that never start an expression, plus `not` and `lambda` which do
/// but are handled by dedicated productions.
const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not",
    "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// A syntax error found while lexing or parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: CstSpan,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        Self::new(err.message, err.span)
    }
}

/// Result of parsing a source file
///
/// Holds the green tree, which is `Send + Sync`, so parse results can cross
/// threads; red nodes are created on demand with [`Parse::syntax`].
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Root node of the tree
    pub fn syntax(&self) -> PySyntaxNode {
        PySyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// True when the source lexed and parsed without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse Python source into a lossless CST
///
/// # Example
///
/// ```rust,ignore
/// use pyfix_core::cst::parse_python;
///
/// let source = "x = apply(f, args)\n";
/// let parse = parse_python(source);
/// assert!(parse.ok());
/// assert_eq!(parse.syntax().text().to_string(), source);
/// ```
pub fn parse_python(source: &str) -> Parse {
    let (tokens, lexer_errors) = lex_with_trivia(source);
    let mut parser = Parser::new(&tokens, source.len());
    parser.parse_file();

    let (green, mut errors) = parser.finish();
    errors.extend(lexer_errors.into_iter().map(ParseError::from));
    errors.sort_by_key(|e| e.span.start);

    Parse { green, errors }
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    source_len: usize,
    builder: CstBuilder,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken], source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            source_len,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (GreenNode, Vec<ParseError>) {
        (self.builder.finish_green(), self.errors)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_file(&mut self) {
        self.builder.start_node(PySyntaxKind::Root);

        while !self.at_end() {
            self.parse_stmt();
        }

        // Trailing comments and blank lines
        self.emit_trivia();
        self.builder.finish_node(); // ROOT
    }

    /// Parse one logical line
    fn parse_stmt(&mut self) {
        self.builder.start_node(PySyntaxKind::Stmt);

        loop {
            match self.current_kind() {
                PySyntaxKind::Eof => break,
                PySyntaxKind::Newline => {
                    self.bump();
                    break;
                }
                PySyntaxKind::Name if self.at_keyword("def") => self.parse_funcdef(),
                PySyntaxKind::Name if self.at_keyword("class") => {
                    self.bump();
                    if self.at(PySyntaxKind::Name) {
                        self.bump();
                    }
                }
                kind if kind.is_closing_bracket() => {
                    self.error_token(format!("unmatched {kind}"));
                }
                _ if self.at_expression_start() => self.parse_test(),
                _ => self.bump(),
            }
        }

        self.builder.finish_node(); // STMT
    }

    /// Parse a `def` header; parameter names stay out of expression position
    ///
    /// Grammar: 'def' NAME parameters ['->' test] ':'
    fn parse_funcdef(&mut self) {
        self.builder.start_node(PySyntaxKind::FuncDef);

        self.bump(); // def
        if self.at(PySyntaxKind::Name) {
            self.bump();
        } else {
            self.error("expected function name");
        }

        if self.at(PySyntaxKind::LParen) {
            self.parse_parameters();
        } else {
            self.error("expected '('");
        }

        if self.at(PySyntaxKind::RArrow) {
            self.bump();
            if self.at_expression_start() {
                self.parse_test();
            }
        }
        self.expect(PySyntaxKind::Colon);

        self.builder.finish_node(); // FUNCDEF
    }

    fn parse_parameters(&mut self) {
        self.builder.start_node(PySyntaxKind::Parameters);
        self.bump(); // (

        loop {
            match self.current_kind() {
                PySyntaxKind::RParen | PySyntaxKind::Eof => break,
                kind if kind.is_closing_bracket() => break,
                PySyntaxKind::Equal => {
                    self.bump();
                    if self.at_expression_start() {
                        self.parse_test();
                    }
                }
                // Python 2 tuple parameters
                PySyntaxKind::LParen => self.parse_parameters(),
                _ => self.bump(),
            }
        }

        self.expect(PySyntaxKind::RParen);
        self.builder.finish_node(); // PARAMETERS
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Grammar: or_test ['if' or_test 'else' test] | lambdef
    fn parse_test(&mut self) {
        if self.at_keyword("lambda") {
            self.parse_lambda();
            return;
        }

        let checkpoint = self.builder.checkpoint();
        self.parse_or_test();

        if self.at_keyword("if") {
            self.builder.start_node_at(checkpoint, PySyntaxKind::Test);
            self.bump(); // if
            self.parse_or_test();
            if self.at_keyword("else") {
                self.bump();
                self.parse_test();
            } else {
                self.error("expected 'else' in conditional expression");
            }
            self.builder.finish_node(); // TEST
        }
    }

    /// Grammar: 'lambda' [varargslist] ':' test
    fn parse_lambda(&mut self) {
        self.builder.start_node(PySyntaxKind::Lambda);
        self.bump(); // lambda

        loop {
            match self.current_kind() {
                PySyntaxKind::Colon | PySyntaxKind::Newline | PySyntaxKind::Eof => break,
                kind if kind.is_closing_bracket() => break,
                PySyntaxKind::Equal => {
                    self.bump();
                    if self.at_expression_start() {
                        self.parse_test();
                    }
                }
                PySyntaxKind::LParen => self.parse_parameters(),
                _ => self.bump(),
            }
        }

        self.expect(PySyntaxKind::Colon);
        if self.at_expression_start() {
            self.parse_test();
        } else {
            self.error("expected expression");
        }
        self.builder.finish_node(); // LAMBDA
    }

    fn parse_or_test(&mut self) {
        self.parse_binary(
            PySyntaxKind::OrTest,
            |p| p.at_keyword("or"),
            Self::parse_and_test,
        );
    }

    fn parse_and_test(&mut self) {
        self.parse_binary(
            PySyntaxKind::AndTest,
            |p| p.at_keyword("and"),
            Self::parse_not_test,
        );
    }

    fn parse_not_test(&mut self) {
        if self.at_keyword("not") {
            self.builder.start_node(PySyntaxKind::NotTest);
            self.bump();
            self.parse_not_test();
            self.builder.finish_node();
        } else {
            self.parse_comparison();
        }
    }

    fn parse_comparison(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_expr();

        if self.at_comparison_operator() {
            self.builder
                .start_node_at(checkpoint, PySyntaxKind::Comparison);
            while self.at_comparison_operator() {
                self.bump_comparison_operator();
                self.parse_expr();
            }
            self.builder.finish_node();
        }
    }

    fn parse_expr(&mut self) {
        self.parse_binary(
            PySyntaxKind::Expr,
            |p| p.at(PySyntaxKind::VBar),
            Self::parse_xor_expr,
        );
    }

    fn parse_xor_expr(&mut self) {
        self.parse_binary(
            PySyntaxKind::XorExpr,
            |p| p.at(PySyntaxKind::Circumflex),
            Self::parse_and_expr,
        );
    }

    fn parse_and_expr(&mut self) {
        self.parse_binary(
            PySyntaxKind::AndExpr,
            |p| p.at(PySyntaxKind::Amper),
            Self::parse_shift_expr,
        );
    }

    fn parse_shift_expr(&mut self) {
        self.parse_binary(
            PySyntaxKind::ShiftExpr,
            |p| p.at(PySyntaxKind::LeftShift) || p.at(PySyntaxKind::RightShift),
            Self::parse_arith_expr,
        );
    }

    fn parse_arith_expr(&mut self) {
        self.parse_binary(
            PySyntaxKind::ArithExpr,
            |p| p.at(PySyntaxKind::Plus) || p.at(PySyntaxKind::Minus),
            Self::parse_term,
        );
    }

    fn parse_term(&mut self) {
        self.parse_binary(
            PySyntaxKind::Term,
            |p| {
                matches!(
                    p.current_kind(),
                    PySyntaxKind::Star
                        | PySyntaxKind::Slash
                        | PySyntaxKind::Percent
                        | PySyntaxKind::DoubleSlash
                        | PySyntaxKind::At
                )
            },
            Self::parse_factor,
        );
    }

    fn parse_factor(&mut self) {
        if matches!(
            self.current_kind(),
            PySyntaxKind::Plus | PySyntaxKind::Minus | PySyntaxKind::Tilde
        ) {
            self.builder.start_node(PySyntaxKind::Factor);
            self.bump();
            self.parse_factor();
            self.builder.finish_node();
        } else {
            self.parse_power();
        }
    }

    /// Grammar: atom trailer* ['**' factor]
    fn parse_power(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_atom();

        let mut wrapped = false;
        while matches!(
            self.current_kind(),
            PySyntaxKind::LParen | PySyntaxKind::LSqb | PySyntaxKind::Dot
        ) {
            if !wrapped {
                self.builder.start_node_at(checkpoint, PySyntaxKind::Power);
                wrapped = true;
            }
            self.parse_trailer();
        }

        if self.at(PySyntaxKind::DoubleStar) {
            if !wrapped {
                self.builder.start_node_at(checkpoint, PySyntaxKind::Power);
                wrapped = true;
            }
            self.bump();
            self.parse_factor();
        }

        if wrapped {
            self.builder.finish_node(); // POWER
        }
    }

    fn parse_atom(&mut self) {
        match self.current_kind() {
            PySyntaxKind::Name if !is_keyword(self.current_text()) => self.bump(),
            PySyntaxKind::Number | PySyntaxKind::Ellipsis => self.bump(),
            PySyntaxKind::String => {
                // Implicit concatenation groups the strings into an atom
                if self.nth_kind(1) == PySyntaxKind::String {
                    self.builder.start_node(PySyntaxKind::Atom);
                    while self.at(PySyntaxKind::String) {
                        self.bump();
                    }
                    self.builder.finish_node();
                } else {
                    self.bump();
                }
            }
            PySyntaxKind::LParen => self.parse_bracketed_atom(PySyntaxKind::RParen),
            PySyntaxKind::LSqb => self.parse_bracketed_atom(PySyntaxKind::RSqb),
            PySyntaxKind::LBrace => self.parse_bracketed_atom(PySyntaxKind::RBrace),
            PySyntaxKind::Backquote => self.parse_bracketed_atom(PySyntaxKind::Backquote),
            PySyntaxKind::Newline | PySyntaxKind::Eof => self.error("expected expression"),
            _ => self.error_token("expected expression"),
        }
    }

    fn parse_bracketed_atom(&mut self, close: PySyntaxKind) {
        self.builder.start_node(PySyntaxKind::Atom);
        self.bump(); // opening bracket
        self.parse_contents(close);
        self.expect(close);
        self.builder.finish_node(); // ATOM
    }

    /// Contents of brackets: tuples, lists, dicts, sets, slices, comprehensions
    ///
    /// A single expression stays a direct child; anything with separators or
    /// comprehension clauses is grouped into a `TestList`.
    fn parse_contents(&mut self, close: PySyntaxKind) {
        let checkpoint = self.builder.checkpoint();
        let mut items = 0usize;
        let mut compound = false;

        loop {
            let kind = self.current_kind();
            if kind == close || kind == PySyntaxKind::Eof || kind.is_closing_bracket() {
                break;
            }

            match kind {
                PySyntaxKind::Comma | PySyntaxKind::Colon => {
                    compound = true;
                    self.bump();
                }
                PySyntaxKind::Name if self.at_keyword("for") => {
                    compound = true;
                    self.parse_comp_for();
                }
                _ if self.at_expression_start() => {
                    items += 1;
                    self.parse_test();
                }
                _ => {
                    compound = true;
                    self.bump();
                }
            }
        }

        if compound || items > 1 {
            self.builder.start_node_at(checkpoint, PySyntaxKind::TestList);
            self.builder.finish_node();
        }
    }

    /// Grammar: 'for' exprlist 'in' or_test ('if' or_test | comp_for)*
    fn parse_comp_for(&mut self) {
        self.builder.start_node(PySyntaxKind::CompFor);
        self.bump(); // for

        loop {
            let kind = self.current_kind();
            if self.at_keyword("in")
                || kind == PySyntaxKind::Eof
                || kind == PySyntaxKind::Newline
                || kind.is_closing_bracket()
            {
                break;
            }
            if self.at_expression_start() {
                self.parse_expr();
            } else {
                self.bump();
            }
        }

        if self.at_keyword("in") {
            self.bump();
            self.parse_or_test();
        } else {
            self.error("expected 'in' in comprehension");
        }

        loop {
            if self.at_keyword("if") {
                self.bump();
                self.parse_or_test();
            } else if self.at_keyword("for") {
                self.parse_comp_for();
            } else {
                break;
            }
        }

        self.builder.finish_node(); // COMPFOR
    }

    /// Grammar: '(' [arglist] ')' | '[' subscriptlist ']' | '.' NAME
    fn parse_trailer(&mut self) {
        self.builder.start_node(PySyntaxKind::Trailer);

        match self.current_kind() {
            PySyntaxKind::LParen => {
                self.bump();
                if !self.at(PySyntaxKind::RParen) {
                    self.parse_arglist();
                }
                self.expect(PySyntaxKind::RParen);
            }
            PySyntaxKind::LSqb => {
                self.bump();
                self.parse_contents(PySyntaxKind::RSqb);
                self.expect(PySyntaxKind::RSqb);
            }
            _ => {
                self.bump(); // .
                if self.at(PySyntaxKind::Name) {
                    self.bump();
                } else {
                    self.error("expected attribute name");
                }
            }
        }

        self.builder.finish_node(); // TRAILER
    }

    /// Grammar: argument (',' argument)* [',']
    fn parse_arglist(&mut self) {
        self.builder.start_node(PySyntaxKind::ArgList);

        loop {
            let kind = self.current_kind();
            if kind == PySyntaxKind::Eof || kind.is_closing_bracket() {
                break;
            }

            if self.at_argument_start() {
                self.parse_argument();
                if self.at(PySyntaxKind::Comma) {
                    self.bump();
                } else if !self.current_kind().is_closing_bracket() && !self.at_end() {
                    self.error("expected ',' or ')'");
                }
            } else {
                self.error_token("unexpected token in argument list");
            }
        }

        self.builder.finish_node(); // ARGLIST
    }

    /// Grammar: test [comp_for] | test '=' test | '*' test | '**' test
    fn parse_argument(&mut self) {
        if self.at(PySyntaxKind::Star) || self.at(PySyntaxKind::DoubleStar) {
            self.builder.start_node(PySyntaxKind::Argument);
            self.bump();
            self.parse_test();
            self.builder.finish_node();
            return;
        }

        let checkpoint = self.builder.checkpoint();
        self.parse_test();

        if self.at(PySyntaxKind::Equal) {
            self.builder.start_node_at(checkpoint, PySyntaxKind::Argument);
            self.bump();
            self.parse_test();
            self.builder.finish_node();
        } else if self.at_keyword("for") {
            self.builder.start_node_at(checkpoint, PySyntaxKind::Argument);
            self.parse_comp_for();
            self.builder.finish_node();
        }
    }

    /// Parse `operand (op operand)*`, wrapping in `kind` only when an operator
    /// is present
    fn parse_binary(
        &mut self,
        kind: PySyntaxKind,
        at_operator: fn(&Self) -> bool,
        operand: fn(&mut Self),
    ) {
        let checkpoint = self.builder.checkpoint();
        operand(self);

        if at_operator(self) {
            self.builder.start_node_at(checkpoint, kind);
            while at_operator(self) {
                self.bump();
                operand(self);
            }
            self.builder.finish_node();
        }
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    /// Index of the `n`th significant token at or after the cursor
    fn nth_index(&self, n: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.pos)
            .filter(|(_, token)| !token.kind.is_trivia())
            .nth(n)
            .map(|(idx, _)| idx)
    }

    fn nth_kind(&self, n: usize) -> PySyntaxKind {
        self.nth_index(n)
            .map_or(PySyntaxKind::Eof, |idx| self.tokens[idx].kind)
    }

    fn nth_text(&self, n: usize) -> &'a str {
        let tokens = self.tokens;
        self.nth_index(n).map_or("", |idx| tokens[idx].text.as_str())
    }

    fn current_kind(&self) -> PySyntaxKind {
        self.nth_kind(0)
    }

    fn current_text(&self) -> &'a str {
        self.nth_text(0)
    }

    fn at(&self, kind: PySyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_end(&self) -> bool {
        self.nth_index(0).is_none()
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.at(PySyntaxKind::Name) && self.current_text() == keyword
    }

    fn at_expression_start(&self) -> bool {
        match self.current_kind() {
            PySyntaxKind::Name => {
                let text = self.current_text();
                !is_keyword(text) || text == "not" || text == "lambda"
            }
            PySyntaxKind::Number
            | PySyntaxKind::String
            | PySyntaxKind::LParen
            | PySyntaxKind::LSqb
            | PySyntaxKind::LBrace
            | PySyntaxKind::Backquote
            | PySyntaxKind::Ellipsis
            | PySyntaxKind::Plus
            | PySyntaxKind::Minus
            | PySyntaxKind::Tilde => true,
            _ => false,
        }
    }

    fn at_argument_start(&self) -> bool {
        self.at(PySyntaxKind::Star) || self.at(PySyntaxKind::DoubleStar) || self.at_expression_start()
    }

    fn at_comparison_operator(&self) -> bool {
        match self.current_kind() {
            PySyntaxKind::Less
            | PySyntaxKind::Greater
            | PySyntaxKind::EqEqual
            | PySyntaxKind::GreaterEqual
            | PySyntaxKind::LessEqual
            | PySyntaxKind::NotEqual => true,
            PySyntaxKind::Name => match self.current_text() {
                "in" | "is" => true,
                "not" => self.nth_kind(1) == PySyntaxKind::Name && self.nth_text(1) == "in",
                _ => false,
            },
            _ => false,
        }
    }

    /// Bump `<`, `in`, `not in`, `is`, `is not`, ...
    fn bump_comparison_operator(&mut self) {
        let first = self.current_text();
        self.bump();
        if first == "not" || (first == "is" && self.at_keyword("not")) {
            self.bump();
        }
    }

    /// Emit pending trivia, then the next significant token
    fn bump(&mut self) {
        let tokens = self.tokens;
        while self.pos < tokens.len() {
            let token = &tokens[self.pos];
            self.builder.add_token(token);
            self.pos += 1;
            if !token.kind.is_trivia() {
                break;
            }
        }
    }

    /// Emit pending trivia without consuming a significant token
    fn emit_trivia(&mut self) {
        let tokens = self.tokens;
        while self.pos < tokens.len() && tokens[self.pos].kind.is_trivia() {
            self.builder.add_token(&tokens[self.pos]);
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: PySyntaxKind) {
        if self.at(kind) {
            self.bump();
        } else {
            self.error(format!("expected {kind}"));
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let span = self
            .nth_index(0)
            .map_or(self.source_len..self.source_len, |idx| {
                self.tokens[idx].span.clone()
            });
        self.errors.push(ParseError::new(message, span));
    }

    /// Record an error and wrap the offending token in an `Error` node
    fn error_token(&mut self, message: impl Into<String>) {
        self.error(message);
        self.builder.start_node(PySyntaxKind::Error);
        self.bump();
        self.builder.finish_node();
    }
}

fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}
