//! Error types for path parsing, augmentation and repair

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in path data
pub type Span = std::ops::Range<usize>;

/// A path `d` attribute that could not be parsed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathDataError {
    #[error("Path data error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl PathDataError {
    pub fn syntax(span: Span, message: impl Into<String>, expected: &[&str]) -> Self {
        PathDataError::Syntax {
            span,
            message: message.into(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            PathDataError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            PathDataError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);

                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Errors from the augmentation entry points
#[derive(Error, Debug)]
pub enum AugmentError {
    #[error("Failed to read SVG file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from markup normalization
#[derive(Error, Debug)]
pub enum RepairError {
    #[error("Malformed SVG markup: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid {attribute} value '{value}'")]
    InvalidDimension { attribute: String, value: String },
}
