mod gc_error;
mod parse_error;

pub use gc_error::GcError;
pub use parse_error::ParseError;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type wrapping all babygc errors.
#[derive(Debug, Error, Diagnostic)]
pub enum BabyGcError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Gc(#[from] GcError),

    #[error("line {line}: {source}")]
    Execution {
        line: usize,
        #[source]
        source: GcError,
    },
}
