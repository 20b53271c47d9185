use pest::Parser;
use pest_derive::Parser;

use crate::ast::{Expr, Op, Reason, Span};
use crate::errors::ParseError;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct ClauseParser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;

fn named_source(origin: &str, text: &str) -> miette::NamedSource<String> {
    miette::NamedSource::new(origin, text.to_owned())
}

/// Parse one catalogue reason into its claim and requirement trees.
///
/// The string must be printable ASCII throughout; it is partitioned at the
/// first `:` into the claim and the `;`-separated requirements, and each
/// clause is parsed on its own. `origin` names the catalogue entry in
/// diagnostics (e.g. `reason[3]`).
pub fn parse_reason(text: &str, origin: &str) -> Result<Reason, ParseError> {
    if let Some((offset, byte)) = text
        .bytes()
        .enumerate()
        .find(|&(_, b)| !(0x20..=0x7e).contains(&b))
    {
        return Err(ParseError::ControlByte {
            byte,
            span: (offset, 1).into(),
            src: named_source(origin, text),
        });
    }

    let colon = text.find(':').ok_or_else(|| ParseError::MissingDelimiter {
        src: named_source(origin, text),
    })?;

    let claim = parse_clause_at(text, 0, colon, origin)?;
    let mut requirements = Vec::new();
    let mut start = colon + 1;
    for chunk in text[colon + 1..].split(';') {
        requirements.push(parse_clause_at(text, start, start + chunk.len(), origin)?);
        start += chunk.len() + 1;
    }

    Ok(Reason {
        text: text.to_owned(),
        claim,
        requirements,
    })
}

/// Parse a single claim or requirement clause into an expression tree.
pub fn parse_clause(clause: &str, origin: &str) -> Result<Expr, ParseError> {
    parse_clause_at(clause, 0, clause.len(), origin)
}

/// Parse `text[start..end]`. Spans are reported relative to the whole of
/// `text` so diagnostics label the clause inside its parent reason.
fn parse_clause_at(text: &str, start: usize, end: usize, origin: &str) -> Result<Expr, ParseError> {
    let clause = &text[start..end];
    let pairs = ClauseParser::parse(Rule::clause, clause).map_err(|e| {
        let (s, e2) = match e.location {
            pest::error::InputLocation::Pos(p) => (p, p + 1),
            pest::error::InputLocation::Span((s, e2)) => (s, e2),
        };
        let s = s.min(clause.len());
        let e2 = e2.min(clause.len());
        ParseError::syntax(
            e.variant.message(),
            Span::new(start + s, start + e2),
            text,
            origin,
        )
    })?;

    let clause_pair = pairs.into_iter().next().unwrap();
    let expr_pair = clause_pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::expr)
        .unwrap();
    build_expr(expr_pair, start, text, origin)
}

fn build_expr(pair: Pair<'_>, base: usize, text: &str, origin: &str) -> Result<Expr, ParseError> {
    let mut inner = pair.into_inner();
    let lhs = build_operand(inner.next().unwrap(), base, text, origin)?;
    let op_pair = inner.next().unwrap();
    let op = Op::from_symbol(op_pair.as_str()).ok_or_else(|| ParseError::UnknownOperator {
        op: op_pair.as_str().to_owned(),
        span: (base + op_pair.as_span().start(), op_pair.as_str().len()).into(),
        src: named_source(origin, text),
    })?;
    let rhs = build_operand(inner.next().unwrap(), base, text, origin)?;
    Ok(Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

fn build_operand(pair: Pair<'_>, base: usize, text: &str, origin: &str) -> Result<Expr, ParseError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::constant => Ok(Expr::Const(inner.as_str().to_owned())),
        Rule::variable => Ok(Expr::Var(inner.as_str().to_owned())),
        Rule::expr => build_expr(inner, base, text, origin),
        rule => unreachable!("operand cannot contain {rule:?}"),
    }
}
