use crate::model::Mode;
use std::fmt;
use thiserror::Error;

/// What went wrong while inferring a header or contact line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogErrorKind {
    #[error("empty QSO")]
    EmptyRecord,
    #[error("invalid change from previous QSO")]
    InvalidChange,
    #[error("missing {0}")]
    MissingRequiredField(&'static str),
    #[error("invalid RST for mode {mode}, expected {expected} digits")]
    InvalidReportLength { mode: Mode, expected: usize },
    #[error("error in activation definition, {0}")]
    MalformedHeader(String),
}

/// A line-level failure with the offset of the first token involved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct LogError {
    pub kind: LogErrorKind,
    pub column: usize,
}

impl LogError {
    pub fn new(kind: LogErrorKind, column: usize) -> Self {
        Self { kind, column }
    }

    pub fn missing(field: &'static str, column: usize) -> Self {
        Self::new(LogErrorKind::MissingRequiredField(field), column)
    }

    pub fn header(reason: impl Into<String>, column: usize) -> Self {
        Self::new(LogErrorKind::MalformedHeader(reason.into()), column)
    }
}

/// A collected failure, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line_number: usize,
    pub message: String,
    pub text: String,
    pub column: usize,
    pub kind: LogErrorKind,
}

impl LineError {
    pub fn from_log_error(line_number: usize, text: &str, err: LogError) -> Self {
        Self {
            line_number,
            message: err.kind.to_string(),
            text: text.to_string(),
            column: err.column,
            kind: err.kind,
        }
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // caret sits under the first character of the offending token
        write!(
            f,
            "{}: {}\n {}\n {:>width$}",
            self.line_number,
            self.message,
            self.text,
            '^',
            width = self.column + 1
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IO(String),
    #[error("{source_name}: {} error(s) in log", .errors.len())]
    Log {
        source_name: String,
        errors: Vec<LineError>,
    },
    #[error("output error: {0}")]
    Output(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::IO(format!("{}", e)) }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self { AppError::Output(format!("json: {}", e)) }
}
