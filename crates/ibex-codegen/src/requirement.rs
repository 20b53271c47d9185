//! Proof-obligation emission for the requirement side of a reason.

use ibex_dsl::ast::Expr;

use crate::session::{op_key, Operand, Session, Stmt};
use crate::CodegenError;

/// Emit extraction and proof statements for one requirement clause.
///
/// Extractions for every newly-seen variable in the clause come first, so
/// no construction step ever references an unbound name. Proof terms are
/// then constructed bottom-up and only the root relation is handed to the
/// prover; failure propagates unchanged.
pub(crate) fn compile_requirement(sess: &mut Session, req: &Expr) -> Result<(), CodegenError> {
    let Expr::Binary { op, lhs, rhs } = req else {
        return Err(CodegenError::NotARelation {
            clause: req.to_string(),
        });
    };
    extract_vars(sess, req);
    let l = operand(sess, lhs, req)?;
    let r = operand(sess, rhs, req)?;
    sess.push(Stmt::Prove {
        key: op_key(*op),
        lhs: l,
        rhs: r,
    });
    Ok(())
}

/// Depth-first, left before right: one extraction per variable not yet
/// extracted in this reason.
fn extract_vars(sess: &mut Session, node: &Expr) {
    match node {
        Expr::Var(name) => {
            if sess.mark_extracted(name) {
                sess.push(Stmt::Extract { var: name.clone() });
            }
        }
        Expr::Binary { lhs, rhs, .. } => {
            extract_vars(sess, lhs);
            extract_vars(sess, rhs);
        }
        Expr::Const(_) => {}
    }
}

/// Resolve one operand position. Nested relations are constructed as proof
/// terms bottom-up, so a term's children always exist before the term
/// itself; the temp is allocated when its construction statement is
/// emitted.
fn operand(sess: &mut Session, node: &Expr, clause: &Expr) -> Result<Operand, CodegenError> {
    match node {
        Expr::Const(tok) if tok == "0" => Ok(Operand::Zero),
        Expr::Const(tok) => Err(CodegenError::BadConstant {
            token: tok.clone(),
            clause: clause.to_string(),
        }),
        Expr::Var(name) => Ok(Operand::Var(name.clone())),
        Expr::Binary { op, lhs, rhs } => {
            let l = operand(sess, lhs, clause)?;
            let r = operand(sess, rhs, clause)?;
            let name = sess.fresh_temp();
            sess.push(Stmt::Build {
                name: name.clone(),
                key: op_key(*op),
                lhs: l,
                rhs: r,
            });
            Ok(Operand::Temp(name))
        }
    }
}
