//! Per-reason emission state and the generated-statement IR.

use std::collections::HashSet;
use std::fmt::Write as _;

use ibex_dsl::ast::Op;

/// Canonical generated-code key for each surface operator.
///
/// Totality over the eight operators is compiler-checked by the match;
/// injectivity is covered by test.
pub(crate) fn op_key(op: Op) -> &'static str {
    match op {
        Op::Add => "BinaryPlus",
        Op::Sub => "BinaryMinus",
        Op::Ne => "BinaryNotEq",
        Op::Lt => "BinaryLessThan",
        Op::Le => "BinaryLessEq",
        Op::Eq => "BinaryEqEq",
        Op::Ge => "BinaryGreaterEq",
        Op::Gt => "BinaryGreaterThan",
    }
}

/// A compiled operand position.
///
/// The tag records what the position resolved to: an opaque leaf, or a
/// nested relation that later steps recurse into or construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    /// The constant zero.
    Zero,
    /// A named source variable.
    Var(String),
    /// A synthetic temp standing for a nested binary expression.
    Temp(String),
}

impl Operand {
    /// Identifier bound at a claim destructuring position.
    pub(crate) fn bind_name(&self) -> String {
        match self {
            Operand::Zero => "zero".to_owned(),
            Operand::Var(v) => format!("x_{v}"),
            Operand::Temp(t) => t.clone(),
        }
    }

    /// Expression handed to a collaborator call. Extracted variables and
    /// claim bindings are already references; constructed temps are owned
    /// and borrowed at the call site.
    pub(crate) fn use_expr(&self) -> String {
        match self {
            Operand::Zero => "zero_expr()".to_owned(),
            Operand::Var(v) => format!("x_{v}"),
            Operand::Temp(t) => format!("&{t}"),
        }
    }
}

/// One generated statement. The compiler passes build these; rendering to
/// target text happens only at the very end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Stmt {
    /// Destructure `scrutinee` as a binary expression, failing the
    /// procedure unless its operator key matches `key`.
    MatchBinary {
        scrutinee: String,
        key: &'static str,
        lhs: Operand,
        rhs: Operand,
    },
    /// Pull the named argument out of the assertion's argument list,
    /// failing the procedure when no such name is present.
    Extract { var: String },
    /// Construct an intermediate proof term.
    Build {
        name: String,
        key: &'static str,
        lhs: Operand,
        rhs: Operand,
    },
    /// Invoke the prover on the root relation of a requirement.
    Prove {
        key: &'static str,
        lhs: Operand,
        rhs: Operand,
    },
}

impl Stmt {
    fn render(&self, out: &mut String) {
        match self {
            Stmt::MatchBinary {
                scrutinee,
                key,
                lhs,
                rhs,
            } => {
                writeln!(
                    out,
                    "let Some((op, {}, {})) = parse_binary_op({scrutinee}) else {{ return Err(ProofFailed); }};",
                    lhs.bind_name(),
                    rhs.bind_name()
                )
                .unwrap();
                writeln!(out, "if op != Key::{key} {{ return Err(ProofFailed); }}").unwrap();
            }
            Stmt::Extract { var } => {
                writeln!(
                    out,
                    "let Some(x_{var}) = arg_value(n.args(), \"{var}\") else {{ return Err(ProofFailed); }};"
                )
                .unwrap();
            }
            Stmt::Build {
                name,
                key,
                lhs,
                rhs,
            } => {
                writeln!(
                    out,
                    "let {name} = Expr::new_binary(Key::{key}, {}, {});",
                    lhs.use_expr(),
                    rhs.use_expr()
                )
                .unwrap();
            }
            Stmt::Prove { key, lhs, rhs } => {
                writeln!(
                    out,
                    "prove_binary(q, Key::{key}, {}, {})?;",
                    lhs.use_expr(),
                    rhs.use_expr()
                )
                .unwrap();
            }
        }
    }
}

/// Mutable state for compiling a single reason.
///
/// The driver constructs a fresh session per catalogue entry; the temp
/// counter, extraction registry, and statement list never outlive one
/// reason.
#[derive(Debug, Default)]
pub(crate) struct Session {
    next_temp: usize,
    extracted: HashSet<String>,
    stmts: Vec<Stmt>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocate the next synthetic name: `t0`, `t1`, …
    pub(crate) fn fresh_temp(&mut self) -> String {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    /// Record that `var` now has an extraction statement. Returns false
    /// when one was already emitted for this reason.
    pub(crate) fn mark_extracted(&mut self, var: &str) -> bool {
        self.extracted.insert(var.to_owned())
    }

    pub(crate) fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    /// Render the accumulated statements as one procedure body.
    pub(crate) fn render_body(&self) -> String {
        let mut out = String::new();
        for stmt in &self.stmts {
            stmt.render(&mut out);
        }
        out
    }
}
