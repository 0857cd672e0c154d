// src/convert/mod.rs

//! Recipe conversion
//!
//! A recipe moves between three forms:
//!
//! - **Source**: build files hold `$MARKER` placeholders, as committed
//! - **Working copy**: placeholders filled with the recipe's minimum AGP
//!   values, originals kept in commented blocks so the recipe can be
//!   opened and edited in an IDE, then converted back
//! - **Release**: placeholders replaced for one target AGP release
//!
//! [`RecipeConverter`] converts one recipe folder, [`RecursiveConverter`]
//! every recipe under a root and writes a [`KeywordIndex`] of the result.

mod batch;
mod converter;
mod index;
pub mod mode;
pub mod placeholder;

pub use batch::{BatchReport, RecursiveConverter};
pub use converter::{
    clear_directory, is_empty_dir, ConversionOutcome, ConversionResult, RecipeConverter,
};
pub use index::{KeywordIndex, INDEX_FILE};
pub use mode::{ConversionMode, PlaceholderValues, ReleaseTarget, TransformPlan};
