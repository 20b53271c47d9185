#![doc = include_str!("../README.md")]

//! Code generation for the ibex reason catalogue.
//!
//! The driver walks the catalogue exactly once, in order. Each entry is
//! parsed by `ibex-dsl`, compiled by the claim and requirement passes into
//! a per-reason statement list, rendered as one record of the reason
//! table, and the whole module is normalized before the caller persists
//! it. Any error aborts the run with no partial output.

mod claim;
mod normalize;
mod requirement;
mod session;

pub mod catalogue;

pub use catalogue::CATALOGUE;

use std::fmt::Write as _;

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use ibex_dsl::ast::Reason;
use ibex_dsl::parse_reason;

use crate::claim::{compile_claim, CONDITION};
use crate::requirement::compile_requirement;
use crate::session::Session;

/// Errors aborting a generation run.
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    /// A catalogue entry failed lexical or structural parsing.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ibex_dsl::errors::ParseError),

    /// A clause used a constant other than the literal zero.
    #[error("bad constant {token:?} in {clause:?}: only the literal zero is supported")]
    #[diagnostic(code(ibex::codegen::bad_constant))]
    BadConstant { token: String, clause: String },

    /// A clause compiled as a claim or requirement was not a binary
    /// relation.
    #[error("clause {clause:?} is not a binary relation")]
    #[diagnostic(code(ibex::codegen::not_a_relation))]
    NotARelation { clause: String },

    /// Wrapper attaching the failing catalogue entry to a clause-level
    /// error.
    #[error("bad reason {reason:?}: {source}")]
    #[diagnostic(code(ibex::codegen::reason))]
    Reason {
        reason: String,
        #[source]
        source: Box<CodegenError>,
    },

    /// The rendered module failed the formatting pass.
    #[error("generated code failed normalization: {message}")]
    #[diagnostic(code(ibex::codegen::normalize))]
    Normalize { message: String },
}

/// Fixed preamble of the generated module: collaborator imports, the
/// procedure type, and the opening of the reason table.
const HEADER: &str = r#"#![allow(unused)]

use crate::check::{arg_value, parse_binary_op, prove_binary, zero_expr, Assert, Checker, ProofFailed};
use crate::expr::{Expr, Key};

pub type ReasonFn = fn(&mut Checker, &Assert) -> Result<(), ProofFailed>;

pub static REASONS: &[(&str, ReasonFn)] = &[
"#;

/// Fixed closing of the reason table.
const FOOTER: &str = "];\n";

/// Compile a reason catalogue into the normalized reason-table module.
///
/// Entries are processed exactly once, in catalogue order; the generated
/// table preserves that order because later checker stages index into it
/// positionally.
pub fn generate(catalogue: &[&str]) -> Result<String, CodegenError> {
    let mut out = String::from(HEADER);
    for (index, &text) in catalogue.iter().enumerate() {
        debug!(index, reason = text, "compiling reason");
        let record = compile_entry(index, text).map_err(|e| CodegenError::Reason {
            reason: text.to_owned(),
            source: Box::new(e),
        })?;
        out.push_str(&record);
    }
    out.push_str(FOOTER);
    normalize::normalize(&out)
}

fn compile_entry(index: usize, text: &str) -> Result<String, CodegenError> {
    let reason = parse_reason(text, &format!("reason[{index}]"))?;
    generate_reason(&reason)
}

/// Compile one reason into a record pairing its text with the generated
/// procedure.
fn generate_reason(reason: &Reason) -> Result<String, CodegenError> {
    let mut sess = Session::new();
    compile_claim(&mut sess, &reason.claim, CONDITION)?;
    for req in &reason.requirements {
        compile_requirement(&mut sess, req)?;
    }

    let mut out = String::new();
    writeln!(out, "({:?}, |q, n| {{", reason.text).unwrap();
    out.push_str(&sess.render_body());
    writeln!(out, "Ok(())").unwrap();
    writeln!(out, "}}),").unwrap();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibex_dsl::errors::ParseError;

    // ---------------------------------------------------------------
    // End-to-end over the production catalogue
    // ---------------------------------------------------------------

    #[test]
    fn production_catalogue_compiles() {
        let code = generate(CATALOGUE).expect("catalogue must compile");
        assert!(code.starts_with("// Code generated by ibex-gen. DO NOT EDIT."));
        assert!(code.contains("pub static REASONS"));
        assert!(code.contains("pub type ReasonFn"));
        for reason in CATALOGUE {
            assert!(
                code.contains(&format!("{reason:?}")),
                "artifact must embed reason {reason:?}"
            );
        }
    }

    #[test]
    fn artifact_is_valid_rust() {
        let code = generate(CATALOGUE).unwrap();
        syn::parse_file(&code).expect("generated artifact must reparse");
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(CATALOGUE).unwrap(), generate(CATALOGUE).unwrap());
    }

    #[test]
    fn empty_catalogue_yields_an_empty_table() {
        let code = generate(&[]).unwrap();
        assert!(code.contains("pub static REASONS"));
        assert!(
            !code.contains("parse_binary_op("),
            "no procedure bodies expected"
        );
    }

    // ---------------------------------------------------------------
    // Claim emission (first catalogue entry, end to end)
    // ---------------------------------------------------------------

    #[test]
    fn first_reason_matches_condition_shape() {
        let code = generate(&["a < (b + c): a < c; 0 <= b"]).unwrap();
        // Outer match: `<` with `a` named and the sum bound to a temp.
        assert!(code.contains("parse_binary_op(n.condition())"));
        assert!(code.contains("(op, x_a, t0)"));
        assert!(code.contains("if op != Key::BinaryLessThan {"));
        // Inner match destructures the temp against `+`.
        assert!(code.contains("parse_binary_op(t0)"));
        assert!(code.contains("(op, x_b, x_c)"));
        assert!(code.contains("if op != Key::BinaryPlus {"));
    }

    #[test]
    fn first_reason_proves_both_requirements() {
        let code = generate(&["a < (b + c): a < c; 0 <= b"]).unwrap();
        // `a < c`: both variables extracted, then proved.
        assert!(code.contains("arg_value(n.args(), \"a\")"));
        assert!(code.contains("arg_value(n.args(), \"c\")"));
        assert!(code.contains("prove_binary(q, Key::BinaryLessThan, x_a, x_c)?;"));
        // `0 <= b`: the zero side uses the fixed representation, no
        // extraction.
        assert!(code.contains("arg_value(n.args(), \"b\")"));
        assert!(!code.contains("arg_value(n.args(), \"0\")"));
        assert!(code.contains("prove_binary(q, Key::BinaryLessEq, zero_expr(), x_b)?;"));
    }

    #[test]
    fn extractions_precede_construction_and_proof() {
        let code = generate(&["a < b: a < (c + d)"]).unwrap();
        let extract_c = code.find("arg_value(n.args(), \"c\")").unwrap();
        let extract_d = code.find("arg_value(n.args(), \"d\")").unwrap();
        let build = code.find("Expr::new_binary(").unwrap();
        let prove = code.find("prove_binary(q,").unwrap();
        assert!(extract_c < build && extract_d < build);
        assert!(build < prove);
    }

    // ---------------------------------------------------------------
    // Requirement emission with nested terms (fifth catalogue entry)
    // ---------------------------------------------------------------

    #[test]
    fn nested_requirement_builds_a_proof_term() {
        let code = generate(&["a < (b + c): a < (b0 + c0); b0 <= b; c0 <= c"]).unwrap();
        // The claim consumed t0, so the constructed sum is t1.
        assert!(code.contains("let t1 = Expr::new_binary(Key::BinaryPlus, x_b0, x_c0);"));
        assert!(code.contains("prove_binary(q, Key::BinaryLessThan, x_a, &t1)?;"));
        // Only root relations reach the prover: one per requirement.
        assert_eq!(code.matches("prove_binary").count(), 4);
    }

    // ---------------------------------------------------------------
    // Session state across reasons
    // ---------------------------------------------------------------

    #[test]
    fn temp_counter_restarts_for_each_reason() {
        let code = generate(&["a < (b + c): 0 <= b", "c < (d + e): 0 <= d"]).unwrap();
        assert_eq!(code.matches("parse_binary_op(t0)").count(), 2);
        assert!(!code.contains("t1"));
    }

    #[test]
    fn shared_variable_is_extracted_once_per_reason() {
        let code = generate(&["a < b: a < b; b <= c"]).unwrap();
        assert_eq!(code.matches("arg_value(n.args(), \"b\")").count(), 1);
        assert_eq!(code.matches("arg_value(n.args(), \"a\")").count(), 1);
        assert_eq!(code.matches("arg_value(n.args(), \"c\")").count(), 1);
    }

    #[test]
    fn extraction_registry_does_not_leak_across_reasons() {
        let code = generate(&["a < b: a < c", "a <= b: a <= c"]).unwrap();
        // `a` and `c` appear in both reasons; each reason extracts its own.
        assert_eq!(code.matches("arg_value(n.args(), \"a\")").count(), 2);
        assert_eq!(code.matches("arg_value(n.args(), \"c\")").count(), 2);
    }

    #[test]
    fn claim_bindings_do_not_satisfy_requirement_extraction() {
        // `a` is named by the claim matcher but the requirement still
        // extracts it from the argument list.
        let code = generate(&["a < b: a < c"]).unwrap();
        assert!(code.contains("arg_value(n.args(), \"a\")"));
    }

    // ---------------------------------------------------------------
    // Failure modes
    // ---------------------------------------------------------------

    fn unwrap_reason(err: CodegenError) -> (String, CodegenError) {
        match err {
            CodegenError::Reason { reason, source } => (reason, *source),
            other => panic!("expected Reason wrapper, got {other:?}"),
        }
    }

    #[test]
    fn nonzero_constant_aborts_generation() {
        let (reason, source) = unwrap_reason(generate(&["a < b: 1 <= b"]).unwrap_err());
        assert_eq!(reason, "a < b: 1 <= b");
        assert!(matches!(
            source,
            CodegenError::BadConstant { token, .. } if token == "1"
        ));
    }

    #[test]
    fn unknown_operator_aborts_generation() {
        let err = generate(&["a <<< b: a < b"]).unwrap_err();
        assert!(err.to_string().contains("a <<< b"));
        let (_, source) = unwrap_reason(err);
        assert!(matches!(
            source,
            CodegenError::Parse(ParseError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn control_byte_aborts_before_parsing() {
        let (_, source) = unwrap_reason(generate(&["a <\tb: a < b"]).unwrap_err());
        assert!(matches!(
            source,
            CodegenError::Parse(ParseError::ControlByte { byte: 0x09, .. })
        ));
    }

    #[test]
    fn missing_delimiter_aborts_generation() {
        let (_, source) = unwrap_reason(generate(&["a < b"]).unwrap_err());
        assert!(matches!(
            source,
            CodegenError::Parse(ParseError::MissingDelimiter { .. })
        ));
    }

    #[test]
    fn one_bad_entry_fails_the_whole_run() {
        let err = generate(&["a < b: a < c", "a <<< b: a < b"]).unwrap_err();
        assert!(err.to_string().contains("a <<< b"));
    }
}
