// src/commands/mod.rs
//! Command handlers for the recipe converter CLI

mod convert;
mod validate;

pub use convert::cmd_convert;
pub use validate::cmd_validate;

use anyhow::{Context, Result};
use recipe_converter::ReleaseVersion;

/// How a command that did not fail completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// Some recipes of a batch failed, the others were converted
    PartialFailure,
}

/// Exit code of a batch where some recipes failed
const PARTIAL_FAILURE_EXIT_CODE: u8 = 2;

impl CommandStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::PartialFailure => PARTIAL_FAILURE_EXIT_CODE,
        }
    }
}

/// Parse an optional `--agp-version` value
fn parse_agp_version(value: Option<&str>) -> Result<Option<ReleaseVersion>> {
    value
        .map(|v| ReleaseVersion::parse(v).with_context(|| format!("Invalid --agp-version '{}'", v)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandStatus::Success.exit_code(), 0);
        assert_eq!(CommandStatus::PartialFailure.exit_code(), 2);
    }

    #[test]
    fn test_parse_agp_version() {
        assert!(parse_agp_version(None).unwrap().is_none());
        assert_eq!(
            parse_agp_version(Some("8.1.0")).unwrap().map(|v| v.to_string()),
            Some("8.1.0".to_string())
        );
        assert!(parse_agp_version(Some("8.1")).is_err());
    }
}
