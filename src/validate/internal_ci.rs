// src/validate/internal_ci.rs

//! Validation of all recipes against a locally built AGP

use crate::context::ConversionContext;
use crate::convert::{ConversionMode, RecipeConverter, ReleaseTarget};
use crate::error::{Error, Result};
use crate::recipe::find_recipes;
use crate::validate::executor::GradleTasksExecutor;
use crate::version::ReleaseVersion;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

/// Converts every recipe for one AGP version, using the local AGP
/// repository and Gradle distribution of the context, and runs the tasks
/// of the compliant ones
pub struct InternalCiValidator<'a> {
    ctx: &'a ConversionContext,
    agp_version: ReleaseVersion,
}

impl<'a> InternalCiValidator<'a> {
    pub fn new(ctx: &'a ConversionContext, agp_version: ReleaseVersion) -> Self {
        Self { ctx, agp_version }
    }

    /// Validate every recipe under `source_all`
    ///
    /// Recipes are converted into `tmp` when given, otherwise into a
    /// temporary folder. Returns the number of validated recipes.
    pub fn validate(&self, source_all: &Path, tmp: Option<&Path>) -> Result<usize> {
        let gradle_path = self.ctx.gradle_path().ok_or_else(|| {
            Error::InvalidOptions("internal CI validation requires a Gradle path".to_string())
        })?;

        let target = ReleaseTarget::resolve(self.agp_version, None, self.ctx)?;
        let converter =
            RecipeConverter::new(ConversionMode::Release(target), self.ctx).overwrite(true);

        let scratch;
        let destination = match tmp {
            Some(path) => path,
            None => {
                scratch = TempDir::new().map_err(|e| Error::io(std::env::temp_dir(), e))?;
                scratch.path()
            }
        };

        let mut validated = 0;
        for folder in find_recipes(source_all)? {
            let result = converter.convert(&folder, destination)?;
            if !result.succeeded() {
                continue;
            }

            info!(
                "Validating: {} with AGP: {} and Gradle: {}",
                result.destination.display(),
                self.agp_version,
                gradle_path
            );

            let executor = GradleTasksExecutor::new(&result.destination, self.ctx)?;
            executor.execute(&result.descriptor.tasks)?;
            if let Some(validation_tasks) = &result.descriptor.validation_tasks {
                executor.execute(validation_tasks)?;
            }
            validated += 1;
        }

        Ok(validated)
    }
}
