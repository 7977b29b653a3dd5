//! Parser for the Logo-derived language.
//!
//! Recursive descent over the token stream, producing one [`Program`] root
//! node or failing with a fatal syntax error. There is no error recovery and
//! no multi-error batching: the first token that matches no grammar
//! continuation aborts the parse, reporting the offending token value.
//!
//! Declarations are registered in the symbol table while parsing: a `to`
//! declaration creates (or upgrades a forward reference to) a `Func` entry at
//! its declaration line; calls and condition identifiers create forward
//! references on first sight and bump usage counters. Parameter scoping is
//! left to the code generator; the parser only captures parameter lists in
//! the nodes.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::lexer::{Token, TokenKind};
use crate::frontend::symbols::{SymbolAttrs, SymbolClass, SymbolTable};

/// Parser state.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    symbols: &'a mut SymbolTable,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], symbols: &'a mut SymbolTable) -> Self {
        Self { tokens, pos: 0, symbols }
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// The first syntax error aborts the parse; symbol redefinitions
    /// discovered while registering declarations are fatal too.
    pub fn parse(mut self) -> Result<Program, CompileError> {
        let statements = self.statements()?;
        self.expect_eof()?;
        Ok(Program { statements })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn peek(&self) -> &Token {
        // Lexer output always ends with Eof; the fallback only matters for
        // hand-built token slices.
        static EOF: Token = Token {
            kind: TokenKind::Eof,
            line: 0,
        };
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, msg: &str) -> Result<&Token, CompileError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.syntax_error(msg))
        }
    }

    fn expect_eof(&mut self) -> Result<(), CompileError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.syntax_error("Expected statement"))
        }
    }

    fn expect_ident(&mut self, msg: &str) -> Result<(String, u32), CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let line = self.peek().line;
                self.advance();
                Ok((name, line))
            }
            _ => Err(self.syntax_error(msg)),
        }
    }

    fn syntax_error(&self, msg: &str) -> CompileError {
        let token = self.peek();
        CompileError::syntax(
            format!("{}, found '{}'", msg, token.kind.display_value()),
            token.line,
        )
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// `statement*`, up to (not consuming) `end`, `else`, or end of input.
    /// An empty sequence is an empty vector.
    fn statements(&mut self) -> Result<Vec<Statement>, CompileError> {
        let mut statements = Vec::new();
        while !self.is_at_end() && !self.check(&TokenKind::End) && !self.check(&TokenKind::Else) {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    fn statement(&mut self) -> Result<Statement, CompileError> {
        match &self.peek().kind {
            TokenKind::To => self.proc_decl(),
            TokenKind::If => self.conditional(),
            TokenKind::While => self.while_loop(),
            TokenKind::Ident(_) => self.call(),
            TokenKind::Number(_) | TokenKind::LParen | TokenKind::Plus | TokenKind::Minus => {
                Ok(Statement::Expr(self.expression()?))
            }
            _ => Err(self.syntax_error("Expected statement")),
        }
    }

    /// `'to' IDENT parameter* statement* 'end'`
    fn proc_decl(&mut self) -> Result<Statement, CompileError> {
        self.expect(&TokenKind::To, "Expected 'to'")?;
        let (name, line) = self.expect_ident("Expected procedure name after 'to'")?;

        // Declares the procedure at its declaration line; an earlier forward
        // reference (from a call parsed before this point) is upgraded.
        self.symbols
            .add_symbol(&name, SymbolClass::Func, SymbolAttrs::at_line(line))?;

        let params = self.parameters();
        let body = self.statements()?;
        self.expect(&TokenKind::End, "Expected 'end' to close procedure declaration")?;

        Ok(Statement::ProcDecl { name, line, params, body })
    }

    /// `IDENT parameter*`
    fn call(&mut self) -> Result<Statement, CompileError> {
        let (name, line) = self.expect_ident("Expected procedure name")?;

        if self.symbols.get_symbol(&name).is_none() {
            // Called before declared: forward reference.
            self.symbols
                .add_symbol(&name, SymbolClass::Func, SymbolAttrs::default())?;
        }
        self.symbols.increment_usage(&name, line, 1)?;

        let args = self.parameters();
        Ok(Statement::Call { name, line, args })
    }

    /// `parameter := ':' IDENT | NUMBER`
    ///
    /// A bare number is ambiguous between a parameter and the start of an
    /// expression statement; one token of lookahead resolves it (a number
    /// followed by an arithmetic operator starts an expression).
    fn parameters(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::Colon => {
                    if let Some(Token {
                        kind: TokenKind::Ident(name),
                        ..
                    }) = self.peek_next()
                    {
                        let name = name.clone();
                        self.advance(); // ':'
                        self.advance(); // identifier
                        params.push(Param::Name(name));
                    } else {
                        // Malformed named reference; leave it for the
                        // statement parser to report.
                        break;
                    }
                }
                TokenKind::Number(value) => {
                    let value = *value;
                    if matches!(
                        self.peek_next().map(|t| &t.kind),
                        Some(TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash)
                    ) {
                        break;
                    }
                    self.advance();
                    params.push(Param::Number(value));
                }
                _ => break,
            }
        }
        params
    }

    /// `'if' IDENT 'then' statement* 'end'`
    /// or `'if' IDENT 'then' statement* 'else' statement* 'end'`
    ///
    /// The condition is restricted to a bare identifier, not a general
    /// expression.
    fn conditional(&mut self) -> Result<Statement, CompileError> {
        self.expect(&TokenKind::If, "Expected 'if'")?;
        let (cond, line) = self.expect_ident("Expected condition identifier after 'if'")?;
        self.reference_condition(&cond, line)?;
        self.expect(&TokenKind::Then, "Expected 'then' after condition")?;

        let then_body = self.statements()?;
        if self.match_token(&TokenKind::Else) {
            let else_body = self.statements()?;
            self.expect(&TokenKind::End, "Expected 'end' to close conditional")?;
            Ok(Statement::IfElse {
                cond,
                line,
                then_body,
                else_body,
            })
        } else {
            self.expect(&TokenKind::End, "Expected 'end' to close conditional")?;
            Ok(Statement::If {
                cond,
                line,
                body: then_body,
            })
        }
    }

    /// `'while' IDENT statement* 'end'`
    fn while_loop(&mut self) -> Result<Statement, CompileError> {
        self.expect(&TokenKind::While, "Expected 'while'")?;
        let (cond, line) = self.expect_ident("Expected condition identifier after 'while'")?;
        self.reference_condition(&cond, line)?;
        let body = self.statements()?;
        self.expect(&TokenKind::End, "Expected 'end' to close loop")?;
        Ok(Statement::While { cond, line, body })
    }

    /// Record a boolean-valued symbol reference in a condition position.
    fn reference_condition(&mut self, name: &str, line: u32) -> Result<(), CompileError> {
        if self.symbols.get_symbol(name).is_none() {
            self.symbols
                .add_symbol(name, SymbolClass::Var, SymbolAttrs::default())?;
        }
        self.symbols.increment_usage(name, line, 1)?;
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// `expression := term (('+' | '-') term)*`, left-associative.
    fn expression(&mut self) -> Result<Expr, CompileError> {
        let mut expr = self.term()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    /// `term := factor (('*' | '/') factor)*`, left-associative.
    fn term(&mut self) -> Result<Expr, CompileError> {
        let mut expr = self.factor()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.factor()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    /// `factor := NUMBER | '(' expression ')' | ('+' | '-') factor`
    fn factor(&mut self) -> Result<Expr, CompileError> {
        match &self.peek().kind {
            TokenKind::Number(value) => {
                let value = *value;
                self.advance();
                Ok(Expr::Number(value))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(&TokenKind::RParen, "Expected ')' to close grouping")?;
                Ok(expr)
            }
            TokenKind::Plus => {
                self.advance();
                Ok(Expr::Unary {
                    op: UnaryOp::Plus,
                    operand: Box::new(self.factor()?),
                })
            }
            TokenKind::Minus => {
                self.advance();
                Ok(Expr::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(self.factor()?),
                })
            }
            _ => Err(self.syntax_error("Expected expression")),
        }
    }
}

/// Convenience function to parse a token stream.
///
/// This is a shorthand for `Parser::new(tokens, symbols).parse()`.
#[tracing::instrument(skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token], symbols: &mut SymbolTable) -> Result<Program, CompileError> {
    Parser::new(tokens, symbols).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::diagnostics::ErrorKind;
    use crate::frontend::lexer;
    use crate::frontend::symbols::DeclSite;

    fn parse_str(source: &str) -> Result<Program, CompileError> {
        let mut symbols = SymbolTable::new();
        parse_str_with(source, &mut symbols)
    }

    fn parse_str_with(source: &str, symbols: &mut SymbolTable) -> Result<Program, CompileError> {
        let (tokens, lex_errors) = lexer::lex(source);
        assert!(lex_errors.is_empty(), "unexpected lexical errors: {lex_errors:?}");
        parse(&tokens, symbols)
    }

    #[test]
    fn test_four_statement_program() {
        let source = "to v1 :length end\nv1 80\nif x then v1 80 end\n3 + 2\n";
        let mut symbols = SymbolTable::new();
        let program = parse_str_with(source, &mut symbols).unwrap();
        assert_eq!(program.statements.len(), 4);

        match &program.statements[0] {
            Statement::ProcDecl { name, params, body, .. } => {
                assert_eq!(name, "v1");
                assert_eq!(params, &vec![Param::Name("length".to_string())]);
                assert!(body.is_empty(), "empty body is an empty vector");
            }
            other => panic!("expected procedure declaration, got {other:?}"),
        }

        match &program.statements[1] {
            Statement::Call { name, args, .. } => {
                assert_eq!(name, "v1");
                assert_eq!(args, &vec![Param::Number(80)]);
            }
            other => panic!("expected call, got {other:?}"),
        }

        match &program.statements[2] {
            Statement::If { cond, body, .. } => {
                assert_eq!(cond, "x");
                assert!(matches!(
                    &body[..],
                    [Statement::Call { name, args, .. }] if name == "v1" && args == &vec![Param::Number(80)]
                ));
            }
            other => panic!("expected single-branch conditional, got {other:?}"),
        }

        match &program.statements[3] {
            Statement::Expr(Expr::Binary { op: BinOp::Add, lhs, rhs }) => {
                assert_eq!(**lhs, Expr::Number(3));
                assert_eq!(**rhs, Expr::Number(2));
            }
            other => panic!("expected arithmetic expression, got {other:?}"),
        }

        // Declaration registered at line 1, then called twice.
        let v1 = symbols.get_symbol("v1").unwrap();
        assert_eq!(v1.site(), DeclSite::Line(1));
        assert_eq!(v1.usage(), 2);
    }

    #[test]
    fn test_empty_program() {
        let program = parse_str("").unwrap();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_if_else_is_distinct_variant() {
        let program = parse_str("if x then v1 else v2 end").unwrap();
        match &program.statements[0] {
            Statement::IfElse { cond, then_body, else_body, .. } => {
                assert_eq!(cond, "x");
                assert_eq!(then_body.len(), 1);
                assert_eq!(else_body.len(), 1);
            }
            other => panic!("expected two-branch conditional, got {other:?}"),
        }
    }

    #[test]
    fn test_while_loop() {
        let program = parse_str("while running forward 10 end").unwrap();
        match &program.statements[0] {
            Statement::While { cond, body, .. } => {
                assert_eq!(cond, "running");
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn test_chained_operators_left_associative() {
        let program = parse_str("1 + 2 + 3").unwrap();
        match &program.statements[0] {
            Statement::Expr(expr) => assert_eq!(expr.to_string(), "((1 + 2) + 3)"),
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence_and_grouping() {
        let program = parse_str("1 + 2 * 3").unwrap();
        match &program.statements[0] {
            Statement::Expr(expr) => assert_eq!(expr.to_string(), "(1 + (2 * 3))"),
            other => panic!("expected expression, got {other:?}"),
        }

        let program = parse_str("(1 + 2) * 3").unwrap();
        match &program.statements[0] {
            Statement::Expr(expr) => assert_eq!(expr.to_string(), "((1 + 2) * 3)"),
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_factor() {
        let program = parse_str("-3 + +2").unwrap();
        match &program.statements[0] {
            Statement::Expr(expr) => assert_eq!(expr.to_string(), "((-3) + (+2))"),
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn test_number_after_params_starts_expression() {
        // The trailing `3 + 2` must not be swallowed as a declaration
        // parameter.
        let program = parse_str("to f :x 3 + 2 end").unwrap();
        match &program.statements[0] {
            Statement::ProcDecl { params, body, .. } => {
                assert_eq!(params, &vec![Param::Name("x".to_string())]);
                assert!(matches!(&body[..], [Statement::Expr(_)]));
            }
            other => panic!("expected procedure declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_is_fatal_and_names_token() {
        let err = parse_str("if x v1 end").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("'v1'"), "got: {}", err.message);

        let err = parse_str("to 5 end").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("'5'"), "got: {}", err.message);
    }

    #[test]
    fn test_unclosed_declaration_reports_eof() {
        let err = parse_str("to f :x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("end of input"), "got: {}", err.message);
    }

    #[test]
    fn test_forward_reference_then_declaration() {
        let mut symbols = SymbolTable::new();
        parse_str_with("square 10\nto square :side end\n", &mut symbols).unwrap();
        let square = symbols.get_symbol("square").unwrap();
        assert_eq!(square.site(), DeclSite::Line(2));
        assert_eq!(square.usage(), 1);
    }

    #[test]
    fn test_redefinition_is_fatal() {
        let err = parse_str("to f end\nto f end\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition);
        assert!(err.message.contains("original declaration at line 1"), "got: {}", err.message);
    }

    #[test]
    fn test_condition_identifier_tracked_as_var() {
        let mut symbols = SymbolTable::new();
        parse_str_with("while flag end\nif flag then end\n", &mut symbols).unwrap();
        let flag = symbols.get_symbol("flag").unwrap();
        assert_eq!(flag.class(), SymbolClass::Var);
        assert_eq!(flag.site(), DeclSite::Forward);
        assert_eq!(flag.usage(), 2);
    }

    #[test]
    fn test_nested_declaration_body() {
        let source = "to spiral :len\nwhile more\nforward 10\nend\nend\n";
        let mut symbols = SymbolTable::new();
        let program = parse_str_with(source, &mut symbols).unwrap();
        match &program.statements[0] {
            Statement::ProcDecl { body, .. } => {
                assert!(matches!(&body[..], [Statement::While { .. }]));
            }
            other => panic!("expected procedure declaration, got {other:?}"),
        }
        // `forward` was called inside the loop body before any declaration.
        let forward = symbols.get_symbol("forward").unwrap();
        assert_eq!(forward.class(), SymbolClass::Func);
        assert_eq!(forward.site(), DeclSite::Forward);
    }

    #[test]
    fn test_trailing_garbage_after_program() {
        let err = parse_str("v1 80 )").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("')'"), "got: {}", err.message);
    }
}
