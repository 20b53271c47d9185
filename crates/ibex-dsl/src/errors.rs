use miette::Diagnostic;
use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(ibex::parse::syntax))]
    Syntax {
        message: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("unknown operator `{op}`")]
    #[diagnostic(
        code(ibex::parse::unknown_operator),
        help("valid operators are: + - != < <= == >= >")
    )]
    UnknownOperator {
        op: String,
        #[label("not a recognized operator")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("reason contains non-printable byte 0x{byte:02x}")]
    #[diagnostic(code(ibex::parse::control_byte))]
    ControlByte {
        byte: u8,
        #[label("control character")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("missing `:` between claim and requirements")]
    #[diagnostic(code(ibex::parse::missing_delimiter))]
    MissingDelimiter {
        #[source_code]
        src: miette::NamedSource<String>,
    },
}

impl ParseError {
    /// Build a syntax error whose label points into the parent reason.
    ///
    /// `span` carries raw byte offsets relative to `source`; `origin` names
    /// the catalogue entry so diagnostics identify where the clause came
    /// from.
    pub fn syntax(message: impl Into<String>, span: Span, source: &str, origin: &str) -> Self {
        ParseError::Syntax {
            message: message.into(),
            span: (span.start, span.end - span.start).into(),
            src: miette::NamedSource::new(origin, source.to_owned()),
        }
    }
}
