//! Error and diagnostic types

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Fatal errors raised by the engine and its template sources
#[derive(Debug, Error)]
pub enum EngineError {
    /// No template directory was given
    #[error("template directory must be specified")]
    MissingDirectory,

    /// The template directory does not exist or is not a directory
    #[error("template directory does not exist: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A top-level template could not be found
    #[error("template not found: {name} ({location})")]
    TemplateNotFound { name: String, location: String },
}

/// A problem found in template text by [`crate::lint`]
///
/// Rendering never fails on these; they describe text the engine will leave
/// unexpanded, strip, or evaluate as false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format the diagnostic with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let mut report = Report::build(ReportKind::Warning, filename, self.span.start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(&self.message)
                    .with_color(Color::Yellow),
            );
        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        if let Err(e) = report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
        {
            return format!("{}: {} ({})", filename, self.message, e);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {:?}", self.message, self.span)
    }
}
