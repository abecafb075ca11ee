//! Pipeline orchestration shared by the command handlers.
//!
//! load → compose → validate → encode → write. Loading and encoding failures
//! are fatal; integrity findings are warnings unless `--strict` is set.

mod output;
mod parse;

pub use output::{emit, write_output, ComposedBom, OutputSettings, OutputTarget};
pub use parse::{load_document, load_documents, LoadedBom};

use crate::error::ComposeError;

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// The result failed integrity validation under `--strict`
    pub const INTEGRITY_FAILURE: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Exit code for an error returned by a command handler.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ComposeError>() {
        Some(ComposeError::Integrity { .. }) => exit_codes::INTEGRITY_FAILURE,
        _ => exit_codes::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntegrityIssue;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::INTEGRITY_FAILURE, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_exit_code_for() {
        let integrity: anyhow::Error = ComposeError::Integrity {
            issues: vec![IntegrityIssue::DuplicateRef {
                bom_ref: "a".to_string(),
            }],
        }
        .into();
        assert_eq!(exit_code_for(&integrity), exit_codes::INTEGRITY_FAILURE);

        let other = anyhow::anyhow!("boom");
        assert_eq!(exit_code_for(&other), exit_codes::ERROR);

        let wrapped = anyhow::Error::from(ComposeError::config("bad")).context("outer");
        assert_eq!(exit_code_for(&wrapped), exit_codes::ERROR);
    }
}
