//! Error types for the transform pipeline

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::datauri::DataUriError;
use crate::filter::FilterError;

/// Error raised by an external optimizer or compiler, passed through as-is
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum TransformError {
    /// The markup has no `<svg ...>` opening tag to inject props into
    #[error("svg file did not start with <svg> tag. Unable to convert to Svelte component")]
    MissingSvgRoot { path: String },

    /// The data-URI export wrapper could not be decoded
    #[error("failed to decode data URI export in {path}: {source}")]
    DataUri {
        path: String,
        #[source]
        source: DataUriError,
    },

    /// The optimizer failed
    #[error(transparent)]
    Optimizer(CollaboratorError),

    /// The component compiler failed
    #[error(transparent)]
    Compiler(CollaboratorError),
}

impl TransformError {
    /// Format the error with source context using ariadne
    ///
    /// `source` is the markup that was being transformed when the error was
    /// raised. Errors coming from collaborators have no location and are
    /// rendered as their plain message.
    pub fn format(&self, source: &str) -> String {
        self.format_with_color(source, true)
    }

    /// Same as [`TransformError::format`], optionally without ANSI colors
    pub fn format_with_color(&self, source: &str, color: bool) -> String {
        let path = match self {
            TransformError::MissingSvgRoot { path } => path.as_str(),
            TransformError::DataUri { path, .. } => path.as_str(),
            _ => return self.to_string(),
        };

        let span = leading_span(source);
        let message = self.to_string();
        let label = match self {
            TransformError::MissingSvgRoot { .. } => "expected an <svg> element here".to_string(),
            _ => message.clone(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, path, span.start)
            .with_config(Config::default().with_color(color))
            .with_message(&message)
            .with_label(
                Label::new((path, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((path, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}

/// Span of the first non-blank line of the source, where the root tag was expected
fn leading_span(source: &str) -> std::ops::Range<usize> {
    let start = source.len() - source.trim_start().len();
    let end = source[start..]
        .find('\n')
        .map(|i| start + i)
        .unwrap_or(source.len());
    start..end.max(start)
}

/// Errors from [`crate::pipeline::transform`], which also compiles the filter
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Errors that can occur when loading or parsing a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error(transparent)]
    Filter(#[from] FilterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_message() {
        let err = TransformError::MissingSvgRoot {
            path: "icons/a.svg".into(),
        };
        assert_eq!(
            err.to_string(),
            "svg file did not start with <svg> tag. Unable to convert to Svelte component"
        );
    }

    #[test]
    fn test_collaborator_message_unchanged() {
        let err = TransformError::Compiler("ParseError: unexpected token".into());
        assert_eq!(err.to_string(), "ParseError: unexpected token");
    }

    #[test]
    fn test_format_points_at_source() {
        let err = TransformError::MissingSvgRoot {
            path: "icons/a.svg".into(),
        };
        let report = err.format_with_color("\n<div>not svg</div>\n", false);
        assert!(report.contains("icons/a.svg"));
        assert!(report.contains("<div>not svg</div>"));
        assert!(report.contains("expected an <svg> element here"));
    }

    #[test]
    fn test_format_collaborator_error_is_plain() {
        let err = TransformError::Optimizer("boom".into());
        assert_eq!(err.format("<svg/>"), "boom");
    }

    #[test]
    fn test_leading_span() {
        assert_eq!(leading_span("  <div>\n<p>"), 2..7);
        assert_eq!(leading_span("<div>"), 0..5);
        assert_eq!(leading_span(""), 0..0);
    }
}
