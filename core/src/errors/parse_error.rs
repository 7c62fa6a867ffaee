use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("line {line}, column {column}: {message}")]
#[diagnostic(help("instructions are: push <int>, pair, pop, gc, count, sethead <i> <j>, settail <i> <j>"))]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,

    #[label("here")]
    pub span: miette::SourceSpan,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            message: message.into(),
            line: 1,
            column: offset + 1,
            span: (offset, length).into(),
        }
    }

    /// Rebases the error onto `line`, shifting the span by the byte offset
    /// at which that line starts in the full source.
    pub fn at_line(mut self, line: usize, line_offset: usize) -> Self {
        self.line = line;
        self.span = (line_offset + self.span.offset(), self.span.len()).into();
        self
    }
}
