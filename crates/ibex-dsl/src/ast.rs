use std::fmt;

/// Source span for error reporting (byte offsets into the parent reason).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Binary operator of a relation or arithmetic term.
///
/// These are the eight surface symbols a reason clause may use. The
/// symbol→operator map is total: an operator run the lexer accepts but
/// this map rejects is a parse error, not a silent fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Op {
    Add,
    Sub,
    Ne,
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Op {
    pub const ALL: [Op; 8] = [
        Op::Add,
        Op::Sub,
        Op::Ne,
        Op::Lt,
        Op::Le,
        Op::Eq,
        Op::Ge,
        Op::Gt,
    ];

    /// Map a surface operator symbol to its operator, if recognized.
    pub fn from_symbol(s: &str) -> Option<Op> {
        match s {
            "+" => Some(Op::Add),
            "-" => Some(Op::Sub),
            "!=" => Some(Op::Ne),
            "<" => Some(Op::Lt),
            "<=" => Some(Op::Le),
            "==" => Some(Op::Eq),
            ">=" => Some(Op::Ge),
            ">" => Some(Op::Gt),
            _ => None,
        }
    }

    /// The surface symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Eq => "==",
            Op::Ge => ">=",
            Op::Gt => ">",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Expression node of a reason clause.
///
/// Leaves are constants (raw token text; only `0` is meaningful to the
/// emitters) and single-letter variables. Binary nodes always have exactly
/// two children, which the enum makes structural rather than checked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Expr {
    Const(String),
    Var(String),
    Binary {
        op: Op,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Whether this node is a binary relation or arithmetic term.
    pub fn is_binary(&self) -> bool {
        matches!(self, Expr::Binary { .. })
    }
}

/// Format a child position: nested relations keep their parentheses so the
/// rendering reparses to the same tree.
fn fmt_operand(e: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if e.is_binary() {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(tok) => write!(f, "{tok}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Binary { op, lhs, rhs } => {
                fmt_operand(lhs, f)?;
                write!(f, " {op} ")?;
                fmt_operand(rhs, f)
            }
        }
    }
}

/// One parsed catalogue entry: the claim and its requirement clauses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Reason {
    /// The original reason text, verbatim.
    pub text: String,
    /// The relation the generated procedure matches the condition against.
    pub claim: Expr,
    /// The sub-obligations proved once the claim's shape matched.
    pub requirements: Vec<Expr>,
}
