// src/commands/validate.rs

//! Validate command - build recipes with Gradle at their supported versions

use super::{parse_agp_version, CommandStatus};
use crate::cli::ModeArg;
use anyhow::{bail, Context, Result};
use recipe_converter::validate::{InternalCiValidator, MinMaxValidator, WorkingCopyValidator};
use recipe_converter::{ContextConfig, ConversionContext};
use std::path::Path;

/// Validate recipes
///
/// - `--mode working-copy --source <dir>` validates a working copy
/// - `--agp-version`, `--repo-location`, `--gradle-path` and `--source-all`
///   together run the internal CI validation
/// - otherwise every recipe under `--source-all` (or the one in `--source`)
///   is validated at its minimum and maximum supported release
pub fn cmd_validate(
    config: ContextConfig,
    source: Option<&Path>,
    source_all: Option<&Path>,
    agp_version: Option<&str>,
    mode: Option<ModeArg>,
    tmp: Option<&Path>,
) -> Result<CommandStatus> {
    let agp_version = parse_agp_version(agp_version)?;
    let internal_ci = config.repo_location.is_some() && config.gradle_path.is_some();
    let ctx = ConversionContext::load(config).context("Failed to load conversion context")?;

    match mode {
        Some(ModeArg::WorkingCopy) => {
            let Some(source) = source else {
                bail!("--source is required to validate a working copy");
            };
            WorkingCopyValidator::new(&ctx, agp_version)
                .validate(source)
                .with_context(|| format!("Validation of {} failed", source.display()))?;
            println!("Validated working copy {}", source.display());
        }
        Some(other) => {
            bail!("Validation does not support mode {:?}, only working-copy", other);
        }
        None => match (agp_version, source_all) {
            (Some(agp), Some(source_all)) if internal_ci => {
                let count = InternalCiValidator::new(&ctx, agp)
                    .validate(source_all, tmp)
                    .with_context(|| format!("Validation of {} failed", source_all.display()))?;
                println!("Validated {} recipe(s) with AGP {}", count, agp);
            }
            (_, Some(source_all)) => {
                let count = MinMaxValidator::new(&ctx)
                    .with_agp_version(agp_version)
                    .validate_all(source_all)
                    .with_context(|| format!("Validation of {} failed", source_all.display()))?;
                println!("Validated {} recipe(s)", count);
            }
            (_, None) => {
                let Some(source) = source else {
                    bail!("Either --source or --source-all must be specified");
                };
                MinMaxValidator::new(&ctx)
                    .with_agp_version(agp_version)
                    .validate(source, None)
                    .with_context(|| format!("Validation of {} failed", source.display()))?;
                println!("Validated {}", source.display());
            }
        },
    }

    Ok(CommandStatus::Success)
}
