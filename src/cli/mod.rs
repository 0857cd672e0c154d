// src/cli/mod.rs
//! CLI definitions for the recipe converter
//!
//! - `convert` - Convert one recipe (`--source`) or every recipe under a
//!   folder (`--source-all`) into source, working copy or release form
//! - `validate` - Build converted recipes with Gradle at the AGP versions
//!   they declare
//!
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipe-converter")]
#[command(version)]
#[command(about = "Convert and validate Android Gradle Plugin recipes", long_about = None)]
pub struct Cli {
    /// Root of the recipes repository (version mappings, gradle resources)
    #[arg(long, global = true, env = "RECIPES_ROOT", default_value = ".")]
    pub recipes_root: PathBuf,

    /// Local maven-metadata.xml to use instead of downloading it
    #[arg(long, global = true, env = "RECIPES_MAVEN_METADATA")]
    pub maven_metadata: Option<PathBuf>,

    /// Running on the internal CI
    #[arg(long, global = true)]
    pub ci: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Conversion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Restore placeholders from a working copy
    Source,
    /// Fill placeholders with the minimum supported versions, keeping the
    /// originals in comments
    WorkingCopy,
    /// Replace placeholders for one AGP release
    Release,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one recipe or all recipes under a folder
    Convert {
        /// Recipe folder to convert
        #[arg(short, long, conflicts_with = "source_all", required_unless_present = "source_all")]
        source: Option<PathBuf>,

        /// Folder containing all the recipes to convert
        #[arg(long)]
        source_all: Option<PathBuf>,

        /// Existing folder receiving the converted recipe(s)
        #[arg(short, long)]
        destination: PathBuf,

        /// AGP release to convert to (required in release mode)
        #[arg(short, long)]
        agp_version: Option<String>,

        /// Conversion mode
        #[arg(short, long, value_enum, default_value_t = ModeArg::Release)]
        mode: ModeArg,

        /// Replace the content of non-empty destinations
        #[arg(short, long)]
        overwrite: bool,

        /// Gradle version (defaults to the one mapped to the AGP version)
        #[arg(long)]
        gradle_version: Option<String>,

        /// Local AGP maven repository replacing $AGP_REPOSITORY
        #[arg(long)]
        repo_location: Option<String>,

        /// Gradle distribution used for distributionUrl
        #[arg(long)]
        gradle_path: Option<String>,
    },

    /// Validate recipes by running their Gradle tasks
    Validate {
        /// Recipe folder (or working copy) to validate
        #[arg(short, long, conflicts_with = "source_all")]
        source: Option<PathBuf>,

        /// Folder containing all the recipes to validate
        #[arg(long)]
        source_all: Option<PathBuf>,

        /// Validate at this AGP release only
        #[arg(short, long)]
        agp_version: Option<String>,

        /// Only `working-copy` is supported
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Local AGP maven repository
        #[arg(long)]
        repo_location: Option<String>,

        /// Local Gradle distribution
        #[arg(long)]
        gradle_path: Option<String>,

        /// Java home used to run Gradle
        #[arg(long)]
        java_home: Option<PathBuf>,

        /// Android SDK location
        #[arg(long)]
        android_home: Option<PathBuf>,

        /// Folder receiving the converted recipes (internal CI validation)
        #[arg(long)]
        tmp: Option<PathBuf>,

        /// Kill Gradle runs after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}
