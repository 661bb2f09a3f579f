use thiserror::Error;

/// Rejected arguments to value constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("invalid tag name {0:?}")]
    InvalidTagName(String),
    #[error("invalid ref id {0:?}")]
    InvalidRef(String),
    #[error("invalid symbol {0:?}")]
    InvalidSymbol(String),
    #[error("invalid xstr type {0:?}")]
    InvalidXStrType(String),
    #[error("coord out of range ({lat}, {lng})")]
    InvalidCoord { lat: f64, lng: f64 },
}

/// Grid construction invariant violations raised by
/// [`GridBuilder`](crate::grid::GridBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("column {0:?} added after rows")]
    ColumnAfterRows(String),
    #[error("duplicate column {0:?}")]
    DuplicateColumn(String),
    #[error("unknown column {0:?}")]
    UnknownColumn(String),
    #[error("row has {found} cells but grid has {expected} columns")]
    RowWidth { expected: usize, found: usize },
    #[error("invalid name {0:?}")]
    InvalidName(String),
    #[error("grid has no columns")]
    NoColumns,
}

/// Lexical and structural errors raised while reading Zinc text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZincError {
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },
    #[error("line {line}: unterminated uri")]
    UnterminatedUri { line: usize },
    #[error("line {line}: unterminated block comment")]
    UnterminatedComment { line: usize },
    #[error("line {line}: invalid escape sequence")]
    InvalidEscape { line: usize },
    #[error("line {line}: invalid hex literal {text:?}")]
    InvalidHex { text: String, line: usize },
    #[error("line {line}: invalid number {text:?}")]
    InvalidNumber { text: String, line: usize },
    #[error("line {line}: invalid date {text:?}")]
    InvalidDate { text: String, line: usize },
    #[error("line {line}: invalid time {text:?}")]
    InvalidTime { text: String, line: usize },
    #[error("line {line}: invalid date time {text:?}")]
    InvalidDateTime { text: String, line: usize },
    #[error("line {line}: invalid timezone after {text:?}")]
    InvalidTimezone { text: String, line: usize },
    #[error("line {line}: unexpected character {ch:?}")]
    UnexpectedChar { ch: char, line: usize },
    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        line: usize,
    },
    #[error("line {line}: invalid name {name:?}")]
    InvalidName { name: String, line: usize },
    #[error("line {line}: grid has no columns")]
    NoColumns { line: usize },
    #[error("line {line}: unsupported version {version:?}")]
    UnsupportedVersion { version: String, line: usize },
    #[error("line {line}: values nested deeper than {max} levels")]
    TooDeep { max: usize, line: usize },
    #[error("line {line}: {source}")]
    Value { source: ValueError, line: usize },
    #[error("line {line}: {source}")]
    Grid { source: GridError, line: usize },
}

impl ZincError {
    /// Line the error was raised on, 1-based.
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line }
            | Self::UnterminatedUri { line }
            | Self::UnterminatedComment { line }
            | Self::InvalidEscape { line }
            | Self::InvalidHex { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::InvalidDate { line, .. }
            | Self::InvalidTime { line, .. }
            | Self::InvalidDateTime { line, .. }
            | Self::InvalidTimezone { line, .. }
            | Self::UnexpectedChar { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::InvalidName { line, .. }
            | Self::NoColumns { line }
            | Self::UnsupportedVersion { line, .. }
            | Self::TooDeep { line, .. }
            | Self::Value { line, .. }
            | Self::Grid { line, .. } => *line,
        }
    }
}

/// Errors raised while decoding the `_kind`-tagged JSON encoding.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("json syntax: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("expected {expected}, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: String,
    },
    #[error("unknown _kind {0:?}")]
    UnknownKind(String),
    #[error("{kind} is missing field {field:?}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("{kind} has invalid field {field:?}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
    },
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Errors raised while parsing filter text. Evaluation itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Lex(#[from] ZincError),
    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        line: usize,
    },
    #[error("line {line}: invalid path segment {segment:?}")]
    InvalidPath { segment: String, line: usize },
    #[error("line {line}: filter nested deeper than {max} levels")]
    TooDeep { max: usize, line: usize },
    #[error("{text:?} is not a filter literal")]
    InvalidLiteral { text: String },
}
