//! JSON syntax validation with positional error reporting

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

/// Why a file failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorType {
    /// File does not exist
    FileNotFound,
    /// File exists but could not be read
    FileReadError,
    /// Content is empty, whitespace-only, or malformed JSON
    ParseError,
}

impl ValidationErrorType {
    /// Stable code string
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::FileReadError => "FILE_READ_ERROR",
            Self::ParseError => "PARSE_ERROR",
        }
    }
}

/// Structured syntax error
///
/// `line` and `column` are 1-based; both are 0 when the failure has no
/// position in the content (missing or unreadable file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable message
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

/// Timing and size of a successful parse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Read plus parse time in seconds
    pub parse_time: f64,
    /// File size in bytes
    pub file_size: u64,
}

/// Outcome of a syntax check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the file parsed as JSON
    pub valid: bool,
    /// File that was checked
    pub file: String,
    /// Failure category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ValidationErrorType>,
    /// Failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
    /// Only present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,
}

impl ValidationResult {
    fn valid(file: String, metrics: PerformanceMetrics) -> Self {
        Self {
            valid: true,
            file,
            error_type: None,
            error: None,
            performance: Some(metrics),
        }
    }

    fn invalid(
        file: String,
        error_type: ValidationErrorType,
        message: impl Into<String>,
        (line, column): (usize, usize),
    ) -> Self {
        Self {
            valid: false,
            file,
            error_type: Some(error_type),
            error: Some(ValidationError {
                message: message.into(),
                line,
                column,
            }),
            performance: None,
        }
    }
}

/// Check that the file at `path` is syntactically valid JSON
///
/// Any root type is accepted. Never fails: every problem is encoded in the
/// returned [`ValidationResult`].
#[must_use]
pub fn validate_file(path: &Path) -> ValidationResult {
    let file = path.display().to_string();

    let start = Instant::now();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return ValidationResult::invalid(
                file.clone(),
                ValidationErrorType::FileNotFound,
                format!("File {file} not found"),
                (0, 0),
            );
        }
        Err(e) => {
            return ValidationResult::invalid(
                file,
                ValidationErrorType::FileReadError,
                format!("Failed to read file: {e}"),
                (0, 0),
            );
        }
    };

    if bytes.is_empty() {
        return ValidationResult::invalid(file, ValidationErrorType::ParseError, "File is empty", (1, 1));
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return ValidationResult::invalid(
            file,
            ValidationErrorType::ParseError,
            "File contains only whitespace",
            (1, 1),
        );
    }

    match serde_json::from_slice::<serde::de::IgnoredAny>(&bytes) {
        Ok(_) => {
            let metrics = PerformanceMetrics {
                parse_time: start.elapsed().as_secs_f64(),
                file_size: bytes.len() as u64,
            };
            tracing::debug!(%file, size = metrics.file_size, "valid JSON");
            ValidationResult::valid(file, metrics)
        }
        Err(e) => {
            let position = error_position(&bytes, &e);
            tracing::debug!(%file, error = %e, "invalid JSON");
            ValidationResult::invalid(file, ValidationErrorType::ParseError, e.to_string(), position)
        }
    }
}

/// 1-based line/column of a parser failure
fn error_position(bytes: &[u8], err: &serde_json::Error) -> (usize, usize) {
    line_column(bytes, failure_offset(bytes, err))
}

/// Byte offset at which the parser stopped, clamped to the content
fn failure_offset(bytes: &[u8], err: &serde_json::Error) -> usize {
    let line_start = match err.line() {
        0 | 1 => 0,
        line => bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .nth(line - 2)
            .map_or(bytes.len(), |(idx, _)| idx + 1),
    };
    (line_start + err.column().saturating_sub(1)).min(bytes.len())
}

/// 1-based line/column of a byte offset, counting line feeds before it
#[must_use]
pub fn line_column(bytes: &[u8], offset: usize) -> (usize, usize) {
    let consumed = &bytes[..offset.min(bytes.len())];
    let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = match consumed.iter().rposition(|&b| b == b'\n') {
        Some(newline) => offset.min(bytes.len()) - newline,
        None => consumed.len() + 1,
    };
    (line, column)
}
