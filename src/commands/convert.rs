// src/commands/convert.rs

//! Convert command - turn recipes into source, working copy or release form

use super::{parse_agp_version, CommandStatus};
use crate::cli::ModeArg;
use anyhow::{bail, Context, Result};
use recipe_converter::convert::{clear_directory, is_empty_dir};
use recipe_converter::{
    ContextConfig, ConversionContext, ConversionMode, RecipeConverter, RecursiveConverter,
    ReleaseTarget,
};
use std::path::Path;
use tracing::info;

/// Convert one recipe (`source`) or all recipes under `source_all`
///
/// # Arguments
/// * `config` - Context configuration built from the global options
/// * `destination` - Existing folder receiving the converted recipe(s)
/// * `agp_version` - Target release, required in release mode
/// * `gradle_version` - Gradle version overriding the mapped one
#[allow(clippy::too_many_arguments)]
pub fn cmd_convert(
    config: ContextConfig,
    source: Option<&Path>,
    source_all: Option<&Path>,
    destination: &Path,
    agp_version: Option<&str>,
    mode: ModeArg,
    overwrite: bool,
    gradle_version: Option<&str>,
) -> Result<CommandStatus> {
    if !destination.is_dir() {
        bail!("Destination {} does not exist or is not a folder", destination.display());
    }

    let agp_version = parse_agp_version(agp_version)?;
    let ctx = ConversionContext::load(config).context("Failed to load conversion context")?;

    let mode = match mode {
        ModeArg::Source => ConversionMode::Source,
        ModeArg::WorkingCopy => ConversionMode::WorkingCopy,
        ModeArg::Release => {
            let Some(agp) = agp_version else {
                bail!("--agp-version is required in release mode");
            };
            let target = ReleaseTarget::resolve(agp, gradle_version, &ctx)
                .with_context(|| format!("Unable to resolve release target for AGP {}", agp))?;
            ConversionMode::Release(target)
        }
    };

    let converter = RecipeConverter::new(mode, &ctx).overwrite(overwrite);

    if let Some(source) = source {
        let result = converter
            .convert(source, destination)
            .and_then(|result| result.require_converted(converter.mode()))
            .with_context(|| format!("Failed to convert {}", source.display()))?;

        println!("Converted {} to {}", source.display(), result.destination.display());
        return Ok(CommandStatus::Success);
    }

    let Some(source_all) = source_all else {
        bail!("Either --source or --source-all must be specified");
    };

    if !is_empty_dir(destination, true)? {
        if !overwrite {
            bail!(
                "Destination {} is not empty, use --overwrite to overwrite it",
                destination.display()
            );
        }
        info!("Clearing {}", destination.display());
        clear_directory(destination)
            .with_context(|| format!("Failed to clear {}", destination.display()))?;
    }

    let report = RecursiveConverter::new(converter)
        .convert_all(source_all, destination)
        .with_context(|| format!("Failed to convert recipes from {}", source_all.display()))?;

    println!(
        "Converted {} recipe(s), skipped {}, failed {}",
        report.converted.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for (name, reason) in &report.failed {
        println!("  [FAILED] {}: {}", name, reason);
    }
    if let Some(index) = &report.index_path {
        println!("Index written to {}", index.display());
    }

    if report.has_failures() {
        Ok(CommandStatus::PartialFailure)
    } else {
        Ok(CommandStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_recipe(root: &Path, name: &str, descriptor: &str) {
        let recipe = root.join(name);
        fs::create_dir_all(&recipe).unwrap();
        fs::write(recipe.join("recipe_metadata.toml"), descriptor).unwrap();
        fs::write(recipe.join("build.gradle"), "plugins { id 'x' version $AGP_VERSION }\n").unwrap();
    }

    fn batch(malformed: bool) -> CommandStatus {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("version_mappings.txt"), "8.1;8.0;1.8.10\n").unwrap();
        let recipes = root.path().join("recipes");
        write_recipe(&recipes, "good", "[agpVersion]\nmin = \"8.1.0\"\n");
        if malformed {
            write_recipe(&recipes, "broken", "[agpVersion]\nmax = \"8.1\"\n");
        }
        let out = tempfile::tempdir().unwrap();

        cmd_convert(
            ContextConfig::with_root(root.path()),
            None,
            Some(&recipes),
            out.path(),
            None,
            ModeArg::Source,
            false,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_batch_with_malformed_descriptor_is_partial_failure() {
        assert_eq!(batch(false), CommandStatus::Success);

        let status = batch(true);
        assert_eq!(status, CommandStatus::PartialFailure);
        assert_eq!(status.exit_code(), 2);
    }
}
