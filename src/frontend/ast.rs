//! Abstract syntax tree definitions.
//!
//! The tree mirrors the grammar productions exactly: one [`Program`] root per
//! parse, statements in source order, single- and two-branch conditionals as
//! distinct variants. An empty body is an empty statement vector.
//!
//! The `Display` impls print an indented one-node-per-line dump of the tree;
//! this is a debugging convenience only and not part of the compiler's
//! contract.

use std::fmt;

/// Identifier.
pub type Ident = String;

/// A program is a sequence of statements in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Statement forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `to NAME param* body* end`
    ProcDecl {
        name: Ident,
        line: u32,
        params: Vec<Param>,
        body: Vec<Statement>,
    },
    /// `NAME param*`
    Call {
        name: Ident,
        line: u32,
        args: Vec<Param>,
    },
    /// `if COND then body* end`
    If {
        cond: Ident,
        line: u32,
        body: Vec<Statement>,
    },
    /// `if COND then body* else body* end`
    IfElse {
        cond: Ident,
        line: u32,
        then_body: Vec<Statement>,
        else_body: Vec<Statement>,
    },
    /// `while COND body* end`
    While {
        cond: Ident,
        line: u32,
        body: Vec<Statement>,
    },
    /// Bare arithmetic expression.
    Expr(Expr),
}

/// A procedure parameter or call argument: a colon-prefixed named reference
/// or a literal default value. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Number(i64),
    Name(Ident),
}

/// Arithmetic expressions. Parenthesized grouping folds into the inner
/// expression; it carries no node of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Minus => write!(f, "-"),
        }
    }
}

// ============================================================================
// Debug dump
// ============================================================================

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program")?;
        for stmt in &self.statements {
            stmt.dump(f, 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, 0)
    }
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = depth * 2)
}

impl Statement {
    fn dump(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        indent(f, depth)?;
        match self {
            Statement::ProcDecl { name, params, body, .. } => {
                writeln!(f, "ProcDecl {name}")?;
                for param in params {
                    param.dump(f, depth + 1)?;
                }
                for stmt in body {
                    stmt.dump(f, depth + 1)?;
                }
                Ok(())
            }
            Statement::Call { name, args, .. } => {
                writeln!(f, "Call {name}")?;
                for arg in args {
                    arg.dump(f, depth + 1)?;
                }
                Ok(())
            }
            Statement::If { cond, body, .. } => {
                writeln!(f, "If {cond}")?;
                for stmt in body {
                    stmt.dump(f, depth + 1)?;
                }
                Ok(())
            }
            Statement::IfElse {
                cond,
                then_body,
                else_body,
                ..
            } => {
                writeln!(f, "IfElse {cond}")?;
                indent(f, depth + 1)?;
                writeln!(f, "Then")?;
                for stmt in then_body {
                    stmt.dump(f, depth + 2)?;
                }
                indent(f, depth + 1)?;
                writeln!(f, "Else")?;
                for stmt in else_body {
                    stmt.dump(f, depth + 2)?;
                }
                Ok(())
            }
            Statement::While { cond, body, .. } => {
                writeln!(f, "While {cond}")?;
                for stmt in body {
                    stmt.dump(f, depth + 1)?;
                }
                Ok(())
            }
            Statement::Expr(expr) => {
                writeln!(f, "Expr {expr}")?;
                Ok(())
            }
        }
    }
}

impl Param {
    fn dump(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        indent(f, depth)?;
        match self {
            Param::Number(n) => writeln!(f, "Param {n}"),
            Param::Name(name) => writeln!(f, "Param :{name}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Unary { op, operand } => write!(f, "({op}{operand})"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_display() {
        let expr = Expr::Binary {
            op: BinOp::Add,
            lhs: Box::new(Expr::Number(3)),
            rhs: Box::new(Expr::Binary {
                op: BinOp::Mul,
                lhs: Box::new(Expr::Number(2)),
                rhs: Box::new(Expr::Number(4)),
            }),
        };
        assert_eq!(expr.to_string(), "(3 + (2 * 4))");
    }

    #[test]
    fn test_program_dump_shape() {
        let program = Program {
            statements: vec![
                Statement::Call {
                    name: "v1".to_string(),
                    line: 1,
                    args: vec![Param::Number(80)],
                },
                Statement::Expr(Expr::Number(3)),
            ],
        };
        let dump = program.to_string();
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines[0], "Program");
        assert_eq!(lines[1], "  Call v1");
        assert_eq!(lines[2], "    Param 80");
        assert_eq!(lines[3], "  Expr 3");
    }
}
