//! Unified error types for sbom-compose.
//!
//! I/O and decode failures are fatal at the command boundary. Structural and
//! referential problems are typed so callers can abort, warn or repair.

use crate::parsers::{ParseError, WriteError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-compose operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ComposeError {
    /// Malformed document content
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    /// A document could not be encoded
    #[error("Failed to encode SBOM: {context}")]
    Write {
        context: String,
        #[source]
        source: WriteError,
    },

    /// An expected graph edge or component is missing
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    /// Referential integrity findings promoted to an error
    #[error("Document failed integrity validation with {} issue(s)", .issues.len())]
    Integrity { issues: Vec<IntegrityIssue> },

    /// Errors while mapping between the two schemas
    #[error("Translation failed: {context}")]
    Translate {
        context: String,
        #[source]
        source: TranslateErrorKind,
    },

    /// Errors while loading a chart or its scan results
    #[error("Chart composition failed: {context}")]
    Chart {
        context: String,
        #[source]
        source: ChartErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A graph edge or component that an operation relies on is absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StructuralError {
    #[error("no dependency edge for root component '{bom_ref}'")]
    MissingRootEdge { bom_ref: String },

    #[error("no dependency edge with source '{bom_ref}'")]
    MissingEdge { bom_ref: String },

    #[error("{role} document has no root component")]
    MissingRootComponent { role: String },
}

/// A referential integrity finding on a single document.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[non_exhaustive]
pub enum IntegrityIssue {
    #[error("ref '{bom_ref}' is used by more than one component")]
    DuplicateRef { bom_ref: String },

    #[error("dependency edge names unknown ref '{bom_ref}'{}", .from.as_ref().map(|f| format!(" (child of '{f}')")).unwrap_or_default())]
    DanglingRef {
        from: Option<String>,
        bom_ref: String,
    },
}

/// Specific translation error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TranslateErrorKind {
    #[error("CPE '{cpe}' has fewer than four fields")]
    MalformedCpe { cpe: String },

    #[error("image reference '{image}' is not of the form name:tag")]
    MalformedImageRef { image: String },
}

/// Specific chart error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChartErrorKind {
    #[error("Invalid chart metadata: {0}")]
    InvalidMetadata(String),

    #[error("No scan result available for image '{image}'")]
    MissingScan { image: String },

    #[error("Invalid scan mapping '{0}' (expected IMAGE=PATH)")]
    InvalidScanMapping(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-compose operations
pub type Result<T> = std::result::Result<T, ComposeError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl ComposeError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an encode error with context
    pub fn write(context: impl Into<String>, source: WriteError) -> Self {
        Self::Write {
            context: context.into(),
            source,
        }
    }

    /// Create a translation error with context
    pub fn translate(context: impl Into<String>, source: TranslateErrorKind) -> Self {
        Self::Translate {
            context: context.into(),
            source,
        }
    }

    /// Create a chart error with context
    pub fn chart(context: impl Into<String>, source: ChartErrorKind) -> Self {
        Self::Chart {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for errors the caller may choose to downgrade to a warning.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Structural(_) | Self::Integrity { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for ComposeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<ParseError> for ComposeError {
    fn from(err: ParseError) -> Self {
        Self::parse(String::new(), err)
    }
}

impl From<WriteError> for ComposeError {
    fn from(err: WriteError) -> Self {
        Self::write(String::new(), err)
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost first, so an error raised while
/// decoding a leaf document during attach reads
/// `"loading leaf: decoding tag-value: <detail>"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<ComposeError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: ComposeError, new_ctx: &str) -> ComposeError {
    match err {
        ComposeError::Parse {
            context: existing,
            source,
        } => ComposeError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ComposeError::Write {
            context: existing,
            source,
        } => ComposeError::Write {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ComposeError::Translate {
            context: existing,
            source,
        } => ComposeError::Translate {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ComposeError::Chart {
            context: existing,
            source,
        } => ComposeError::Chart {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ComposeError::Io {
            path,
            message,
            source,
        } => ComposeError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        ComposeError::Config(msg) => ComposeError::Config(chain_context(new_ctx, &msg)),
        other @ (ComposeError::Structural(_) | ComposeError::Integrity { .. }) => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ComposeError::parse(
            "reading root.xml",
            ParseError::MissingField("SPDXVersion".to_string()),
        );
        let display = err.to_string();
        assert!(display.contains("reading root.xml"), "{display}");

        let err = ComposeError::from(StructuralError::MissingRootEdge {
            bom_ref: "chart".to_string(),
        });
        assert!(err.to_string().contains("chart"));
    }

    #[test]
    fn test_io_error_carries_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ComposeError::io("/path/to/bom.xml", io_err);

        assert!(err.to_string().contains("/path/to/bom.xml"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(ComposeError::parse("base", ParseError::XmlError("eof".into())))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(ComposeError::Parse { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_leaves_typed_conditions_untouched() {
        let result: Result<()> = Err(StructuralError::MissingRootComponent {
            role: "leaf".to_string(),
        }
        .into());
        let err = result.context("attaching").unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(
            err,
            ComposeError::Structural(StructuralError::MissingRootComponent { .. })
        ));
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(ComposeError::config("bad"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_dangling_ref_display() {
        let issue = IntegrityIssue::DanglingRef {
            from: Some("image-nginx:1.21".to_string()),
            bom_ref: "pkg-a".to_string(),
        };
        let text = issue.to_string();
        assert!(text.contains("pkg-a"));
        assert!(text.contains("image-nginx:1.21"));

        let root_level = IntegrityIssue::DanglingRef {
            from: None,
            bom_ref: "ghost".to_string(),
        };
        assert_eq!(root_level.to_string(), "dependency edge names unknown ref 'ghost'");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
