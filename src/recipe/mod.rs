// src/recipe/mod.rs

//! Recipe folders and their descriptors
//!
//! A recipe is a folder holding a small Gradle project whose build files
//! use placeholders (`$AGP_VERSION`, ...) and a `recipe_metadata.toml`
//! declaring the AGP range it supports.

mod descriptor;
mod format;

pub use descriptor::{split_keyword, RecipeDescriptor, ReleaseLookup, DEFAULT_CATEGORY};
pub use format::{AgpVersionSection, GradleTasksSection, IndexMetadataSection, RecipeMetadata};

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Name of the descriptor file inside every recipe folder
pub const RECIPE_METADATA_FILE: &str = "recipe_metadata.toml";

/// Whether `folder` contains a recipe descriptor
pub fn is_recipe_folder(folder: &Path) -> bool {
    folder.join(RECIPE_METADATA_FILE).is_file()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Call `callback` for every recipe folder below `root`
///
/// The root itself is never reported and hidden directories are not
/// entered. Folders are visited in file-name order.
pub fn visit_recipes<F>(root: &Path, mut callback: F) -> Result<()>
where
    F: FnMut(&Path),
{
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && is_hidden(e)));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::io(path, e.into())
        })?;

        if entry.file_type().is_dir() && is_recipe_folder(entry.path()) {
            callback(entry.path());
        }
    }

    Ok(())
}

/// Collect every recipe folder below `root`
pub fn find_recipes(root: &Path) -> Result<Vec<PathBuf>> {
    let mut recipes = Vec::new();
    visit_recipes(root, |folder| recipes.push(folder.to_path_buf()))?;
    Ok(recipes)
}
