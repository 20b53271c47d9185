//! Structural-matcher emission for the claim side of a reason.

use ibex_dsl::ast::Expr;

use crate::session::{op_key, Operand, Session, Stmt};
use crate::CodegenError;

/// Scrutinee of the outermost claim match in generated code.
pub(crate) const CONDITION: &str = "n.condition()";

/// Emit the matcher confirming the condition under test has the claimed
/// shape, binding sub-positions on the way down.
///
/// Matching is top-down and short-circuits: the early return rendered for
/// each level means a key mismatch fails the procedure before any deeper
/// level is inspected. Leaf positions are only named, never re-validated.
pub(crate) fn compile_claim(
    sess: &mut Session,
    claim: &Expr,
    scrutinee: &str,
) -> Result<(), CodegenError> {
    let Expr::Binary { op, lhs, rhs } = claim else {
        return Err(CodegenError::NotARelation {
            clause: claim.to_string(),
        });
    };
    let l = bind(sess, lhs, claim)?;
    let r = bind(sess, rhs, claim)?;
    sess.push(Stmt::MatchBinary {
        scrutinee: scrutinee.to_owned(),
        key: op_key(*op),
        lhs: l.clone(),
        rhs: r.clone(),
    });
    if let Operand::Temp(name) = &l {
        compile_claim(sess, lhs, name)?;
    }
    if let Operand::Temp(name) = &r {
        compile_claim(sess, rhs, name)?;
    }
    Ok(())
}

/// Name one claim position: leaves get semantic names, nested relations a
/// fresh temp for the recursion to destructure next.
fn bind(sess: &mut Session, node: &Expr, clause: &Expr) -> Result<Operand, CodegenError> {
    match node {
        Expr::Const(tok) if tok == "0" => Ok(Operand::Zero),
        Expr::Const(tok) => Err(CodegenError::BadConstant {
            token: tok.clone(),
            clause: clause.to_string(),
        }),
        Expr::Var(name) => Ok(Operand::Var(name.clone())),
        Expr::Binary { .. } => Ok(Operand::Temp(sess.fresh_temp())),
    }
}
