use std::ops::Range;

use ariadne::{Label, Report, ReportKind, Source};
use thiserror::Error;

/// Errors from loading an [`ExplorerConfig`](crate::config::ExplorerConfig).
///
/// The numerical engines never fail; configuration is the only fallible
/// surface of the crate.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the schema.
    #[error("config parse error at {line}:{column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A field parsed but holds an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Render a plain-text diagnostic pointing into `source`.
    ///
    /// Parse errors are labelled at their line/column. Validation errors are
    /// labelled at the field's key when it appears in the document, and at
    /// the document start otherwise.
    pub fn render_report(&self, source: &str) -> String {
        const ID: &str = "config.json";
        let (span, label) = match self {
            ConfigError::Parse {
                message,
                line,
                column,
            } => {
                let at = offset_of(source, *line, *column).min(source.len().saturating_sub(1));
                (at..(at + 1).min(source.len()), message.clone())
            }
            ConfigError::Invalid { field, reason } => (key_span(source, field), reason.clone()),
        };

        let mut out = Vec::new();
        let written = Report::build(ReportKind::Error, (ID, span.clone()))
            .with_config(ariadne::Config::default().with_color(false))
            .with_message(self.to_string())
            .with_label(Label::new((ID, span)).with_message(label))
            .finish()
            .write((ID, Source::from(source)), &mut out);
        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }
    }
}

/// Byte offset of a 1-based line/column pair, clamped to the source length.
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Span of the last path segment of `field` as a quoted JSON key.
fn key_span(source: &str, field: &str) -> Range<usize> {
    let key = field.rsplit('.').next().unwrap_or(field);
    let quoted = format!("\"{key}\"");
    match source.find(&quoted) {
        Some(start) => start..start + quoted.len(),
        None => 0..source.len().min(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplorerConfig;

    #[test]
    fn offset_of_counts_lines() {
        let src = "ab\ncde\nf";
        assert_eq!(offset_of(src, 1, 1), 0);
        assert_eq!(offset_of(src, 2, 2), 4);
        assert_eq!(offset_of(src, 3, 1), 7);
        assert_eq!(offset_of(src, 9, 9), src.len());
    }

    #[test]
    fn key_span_finds_last_segment() {
        let src = r#"{ "sampling": { "max_samples": 0 } }"#;
        let span = key_span(src, "sampling.max_samples");
        assert_eq!(&src[span], "\"max_samples\"");
    }

    #[test]
    fn invalid_field_report_names_field() {
        let src = "{\n  \"sampling\": { \"max_samples\": 0 }\n}";
        let err = ExplorerConfig::from_json_str(src).unwrap_err();
        let report = err.render_report(src);
        assert!(report.contains("sampling.max_samples"), "{report}");
        assert!(report.contains("must be at least 1"), "{report}");
    }

    #[test]
    fn parse_error_report_is_rendered() {
        let src = "{\n  \"basis\": [\n}";
        let err = ExplorerConfig::from_json_str(src).unwrap_err();
        let report = err.render_report(src);
        assert!(report.contains("config parse error"), "{report}");
    }

    #[test]
    fn display_messages() {
        let e = ConfigError::invalid("signum.x_extent", "must be positive");
        assert_eq!(e.to_string(), "invalid config field `signum.x_extent`: must be positive");
    }
}
