// src/recipe/descriptor.rs

//! Validated recipe descriptor and compliance check

use crate::error::{Error, Result};
use crate::recipe::format::{non_blank, RecipeMetadata};
use crate::recipe::RECIPE_METADATA_FILE;
use crate::version::{ReleaseVersion, ShortVersion};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Category of index keywords that do not name one
pub const DEFAULT_CATEGORY: &str = "Others";

/// Resolves a `major.minor` version to its latest published release
pub trait ReleaseLookup {
    fn latest_release(&self, short: ShortVersion) -> Result<ReleaseVersion>;
}

impl ReleaseLookup for BTreeMap<ShortVersion, ReleaseVersion> {
    fn latest_release(&self, short: ShortVersion) -> Result<ReleaseVersion> {
        self.get(&short)
            .copied()
            .ok_or_else(|| Error::MissingPublishedRelease(short.to_string()))
    }
}

/// Split an index keyword into `(category, keyword)`
///
/// Returns `None` when the keyword contains more than one `/`.
pub fn split_keyword(keyword: &str) -> Option<(&str, &str)> {
    let mut parts = keyword.splitn(3, '/');
    let first = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (None, _) => Some((DEFAULT_CATEGORY, first)),
        (Some(second), None) => Some((first, second)),
        (Some(_), Some(_)) => None,
    }
}

/// Parsed `recipe_metadata.toml` of one recipe folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDescriptor {
    /// Name of the recipe folder
    pub folder_name: String,
    /// Title used in the generated index
    pub index_name: String,
    /// Folder name used by release output
    pub destination_folder: String,
    pub min_version: ReleaseVersion,
    pub max_version: Option<ShortVersion>,
    pub tasks: Vec<String>,
    pub validation_tasks: Option<Vec<String>>,
    pub keywords: Vec<String>,
}

impl RecipeDescriptor {
    /// Load and validate the descriptor of `folder`
    ///
    /// A short `agpVersion.min` is resolved through `lookup`.
    pub fn load(folder: &Path, lookup: &impl ReleaseLookup) -> Result<Self> {
        let path = folder.join(RECIPE_METADATA_FILE);
        if !path.is_file() {
            return Err(Error::MissingDescriptor(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let folder_name = folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::parse(&content, &folder_name, &path, lookup)
    }

    /// Validate descriptor `content` for a recipe folder named `folder_name`
    ///
    /// `path` is only used in error messages.
    pub fn parse(
        content: &str,
        folder_name: &str,
        path: &Path,
        lookup: &impl ReleaseLookup,
    ) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedDescriptor {
            path: path.to_path_buf(),
            reason,
        };

        let metadata: RecipeMetadata =
            toml::from_str(content).map_err(|e| malformed(e.to_string()))?;

        let min_text = non_blank(&metadata.agp_version.min)
            .ok_or_else(|| malformed("did not find mandatory 'agpVersion.min'".to_string()))?;

        let min_version = match ShortVersion::parse(min_text) {
            Some(short) => lookup.latest_release(short).map_err(|e| {
                malformed(format!("unable to resolve 'agpVersion.min' ({min_text}): {e}"))
            })?,
            None => ReleaseVersion::parse(min_text)
                .map_err(|e| malformed(format!("invalid 'agpVersion.min': {e}")))?,
        };

        let max_version = match non_blank(&metadata.agp_version.max) {
            Some(max_text) => Some(ShortVersion::parse(max_text).ok_or_else(|| {
                malformed(format!(
                    "invalid 'agpVersion.max' ({max_text}), expected \"X.Y\""
                ))
            })?),
            None => None,
        };

        let destination_folder = match non_blank(&metadata.destination_folder) {
            Some(value) if value.contains(['/', '\\']) => {
                return Err(Error::InvalidDestination {
                    value: value.to_string(),
                    recipe: path.parent().unwrap_or(path).to_path_buf(),
                });
            }
            Some(value) => value.to_string(),
            None => folder_name.to_string(),
        };

        let index_name = non_blank(&metadata.index_name)
            .unwrap_or(folder_name)
            .to_string();

        let keywords = metadata.index_metadata.index;
        if let Some(bad) = keywords.iter().find(|k| split_keyword(k).is_none()) {
            return Err(malformed(format!(
                "index entries should contain at most one '/' character: {bad}"
            )));
        }

        debug!(
            "Loaded descriptor for {}: min {}, max {:?}",
            folder_name, min_version, max_version
        );

        Ok(Self {
            folder_name: folder_name.to_string(),
            index_name,
            destination_folder,
            min_version,
            max_version,
            tasks: metadata.gradle_tasks.tasks,
            validation_tasks: metadata.gradle_tasks.validation_tasks,
            keywords,
        })
    }

    /// Whether `candidate` falls within `[min_version, max_version]`
    ///
    /// The maximum is a `major.minor` bound, so every release of that line
    /// is accepted.
    pub fn is_compliant(&self, candidate: &ReleaseVersion) -> bool {
        *candidate >= self.min_version
            && self
                .max_version
                .is_none_or(|max| candidate.to_short() <= max)
    }
}
