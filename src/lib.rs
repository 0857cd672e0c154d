// src/lib.rs

//! Android Gradle Plugin recipe converter
//!
//! Converts directories of versioned recipe templates into runnable Gradle
//! projects for a given AGP release, and validates that recipes build
//! across the AGP range they declare.
//!
//! # Architecture
//!
//! - Versions: totally ordered AGP releases, including previews
//! - Placeholders: pure line transforms between source, working copy and
//!   release forms
//! - Descriptors: `recipe_metadata.toml` gates conversion by AGP range
//! - Context: version mapping table and published releases, resolved once
//! - Conversion: per-recipe and batch conversion with a keyword index
//! - Validation: Gradle runs of converted recipes

pub mod context;
pub mod convert;
mod error;
pub mod recipe;
pub mod release;
pub mod validate;
pub mod version;

pub use context::{ContextConfig, ConversionContext};
pub use convert::{
    BatchReport, ConversionMode, ConversionOutcome, ConversionResult, KeywordIndex,
    RecipeConverter, RecursiveConverter, ReleaseTarget,
};
pub use error::{Error, Result};
pub use recipe::{RecipeDescriptor, ReleaseLookup};
pub use version::{PreviewKind, ReleaseVersion, ShortVersion, VersionMapping};
