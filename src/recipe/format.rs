// src/recipe/format.rs

//! Recipe descriptor file format
//!
//! Every recipe folder carries a `recipe_metadata.toml`:
//!
//! ```toml
//! indexName = "Add a custom source folder"
//! destinationFolder = "addCustomSourceFolders"
//!
//! [agpVersion]
//! min = "8.1.0"
//! max = "8.4"
//!
//! [gradleTasks]
//! tasks = ["assembleDebug"]
//! validationTasks = ["displayAllSources"]
//!
//! [indexMetadata]
//! index = ["Themes/Sources", "APIs/Variant.sources"]
//! ```
//!
//! Unknown keys are ignored.

use serde::Deserialize;

/// Raw content of a descriptor, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeMetadata {
    /// Supported AGP range
    #[serde(default)]
    pub agp_version: AgpVersionSection,

    /// Name of the folder the recipe is released into
    #[serde(default)]
    pub destination_folder: Option<String>,

    /// Title shown in the generated index
    #[serde(default)]
    pub index_name: Option<String>,

    #[serde(default)]
    pub gradle_tasks: GradleTasksSection,

    #[serde(default)]
    pub index_metadata: IndexMetadataSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgpVersionSection {
    /// Full release (`8.1.0`) or `major.minor` resolved to the latest
    /// published release
    #[serde(default)]
    pub min: Option<String>,

    /// `major.minor`, inclusive
    #[serde(default)]
    pub max: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradleTasksSection {
    #[serde(default)]
    pub tasks: Vec<String>,

    #[serde(default)]
    pub validation_tasks: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexMetadataSection {
    /// `category/keyword` or bare `keyword` entries
    #[serde(default)]
    pub index: Vec<String>,
}

/// Treat blank strings as absent
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
