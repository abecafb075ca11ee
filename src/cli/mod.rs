//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs, one per composing subcommand.

mod attach;
mod combine;
mod create;

pub use attach::{run_attach, AttachCommand};
pub use combine::{run_combine, CombineCommand};
pub use create::{run_create, CreateCommand};

use crate::model::BomFormat;
use clap::ValueEnum;

/// Input format selector; `auto` detects from content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    #[default]
    Auto,
    Spdx,
    #[value(name = "cyclonedx")]
    CycloneDx,
}

impl InputFormat {
    /// The explicit format, or `None` for detection.
    #[must_use]
    pub const fn resolve(self) -> Option<BomFormat> {
        match self {
            Self::Auto => None,
            Self::Spdx => Some(BomFormat::Spdx),
            Self::CycloneDx => Some(BomFormat::CycloneDx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_resolve() {
        assert_eq!(InputFormat::Auto.resolve(), None);
        assert_eq!(InputFormat::Spdx.resolve(), Some(BomFormat::Spdx));
        assert_eq!(InputFormat::CycloneDx.resolve(), Some(BomFormat::CycloneDx));
        assert_eq!(
            InputFormat::from_str("cyclonedx", true).unwrap(),
            InputFormat::CycloneDx
        );
    }
}
