// src/convert/batch.rs

//! Batch conversion of every recipe under a root folder

use crate::convert::converter::RecipeConverter;
use crate::convert::index::{KeywordIndex, INDEX_FILE};
use crate::error::{Error, Result};
use crate::recipe::find_recipes;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Summary of a batch conversion
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Folder names of converted recipes
    pub converted: Vec<String>,
    /// Recipes skipped because they do not support the target release
    pub skipped: Vec<String>,
    /// Recipes that failed, with the error message
    pub failed: Vec<(String, String)>,
    /// Location of the written index
    pub index_path: Option<PathBuf>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Converts all recipes below a folder and writes the index
pub struct RecursiveConverter<'a> {
    converter: RecipeConverter<'a>,
}

impl<'a> RecursiveConverter<'a> {
    pub fn new(converter: RecipeConverter<'a>) -> Self {
        Self { converter }
    }

    /// Convert every recipe under `source_all` into `destination`
    ///
    /// A failing recipe does not stop the batch: the error is logged and
    /// recorded in the report. Only converted recipes are indexed.
    pub fn convert_all(&self, source_all: &Path, destination: &Path) -> Result<BatchReport> {
        if !source_all.is_dir() {
            return Err(Error::NotADirectory(source_all.to_path_buf()));
        }
        fs::create_dir_all(destination).map_err(|e| Error::io(destination, e))?;

        let mut index = KeywordIndex::new();
        let mut report = BatchReport::default();

        for folder in find_recipes(source_all)? {
            let name = folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.converter.convert(&folder, destination) {
                Ok(result) if result.succeeded() => {
                    index.add(&result.descriptor);
                    report.converted.push(name);
                }
                Ok(_) => report.skipped.push(name),
                Err(e) => {
                    error!("Failed to convert {}: {}", folder.display(), e);
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        let target = self.converter.mode().target().map(|t| &t.agp);
        index.write(destination, target)?;
        report.index_path = Some(destination.join(INDEX_FILE));

        info!(
            "Converted {} recipes ({} skipped, {} failed)",
            report.converted.len(),
            report.skipped.len(),
            report.failed.len()
        );

        Ok(report)
    }
}
