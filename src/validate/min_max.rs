// src/validate/min_max.rs

//! Validation of recipes at the bounds of their supported range

use crate::context::ConversionContext;
use crate::convert::{ConversionMode, RecipeConverter, ReleaseTarget};
use crate::error::{Error, Result};
use crate::recipe::{find_recipes, RecipeDescriptor};
use crate::validate::executor::GradleTasksExecutor;
use crate::version::ReleaseVersion;
use std::path::Path;
use tempfile::TempDir;
use tracing::{info, warn};

/// Builds each recipe at its minimum and maximum supported release
///
/// The maximum is the latest published release of `agpVersion.max`, or the
/// latest published release overall when the recipe has no upper bound.
/// With a fixed AGP version only that version is validated.
pub struct MinMaxValidator<'a> {
    ctx: &'a ConversionContext,
    agp_version: Option<ReleaseVersion>,
}

impl<'a> MinMaxValidator<'a> {
    pub fn new(ctx: &'a ConversionContext) -> Self {
        Self {
            ctx,
            agp_version: None,
        }
    }

    /// Validate only at `agp_version`
    pub fn with_agp_version(mut self, agp_version: Option<ReleaseVersion>) -> Self {
        self.agp_version = agp_version;
        self
    }

    /// Validate the recipe in `recipe_folder`; `name` defaults to the
    /// folder name
    pub fn validate(&self, recipe_folder: &Path, name: Option<&str>) -> Result<()> {
        let descriptor = RecipeDescriptor::load(recipe_folder, self.ctx)?;
        let name = name.unwrap_or(&descriptor.folder_name);

        if let Some(version) = self.agp_version {
            return self.validate_at(name, recipe_folder, version);
        }

        let min = descriptor.min_version;
        self.validate_at(name, recipe_folder, min)?;

        let max = match descriptor.max_version {
            Some(max) => self.ctx.published_release(max)?,
            None => self.ctx.max_published_release()?,
        };
        if max != min {
            self.validate_at(name, recipe_folder, max)?;
        }

        Ok(())
    }

    /// Validate every recipe under `root`, stopping at the first failure
    ///
    /// Returns the number of validated recipes.
    pub fn validate_all(&self, root: &Path) -> Result<usize> {
        let recipes = find_recipes(root)?;
        for folder in &recipes {
            self.validate(folder, None)?;
        }
        Ok(recipes.len())
    }

    fn validate_at(&self, name: &str, recipe_folder: &Path, agp: ReleaseVersion) -> Result<()> {
        let gradle_version = self.ctx.gradle_version(agp.to_short())?;
        let target = ReleaseTarget::resolve(agp, Some(gradle_version), self.ctx)?;
        let converter = RecipeConverter::new(ConversionMode::Release(target), self.ctx);

        let destination = TempDir::new().map_err(|e| Error::io(std::env::temp_dir(), e))?;
        let result = converter.convert(recipe_folder, destination.path())?;

        if !result.succeeded() {
            warn!("Recipe {} does not support AGP {}, not validated", name, agp);
            return Ok(());
        }

        info!(
            "Validating: Recipe {} ({}) with AGP: {} and Gradle: {}",
            name,
            result.destination.display(),
            agp,
            gradle_version
        );

        let executor = GradleTasksExecutor::new(&result.destination, self.ctx)?;
        executor.execute(&result.descriptor.tasks)?;
        if let Some(validation_tasks) = &result.descriptor.validation_tasks {
            executor.execute(validation_tasks)?;
        }

        Ok(())
    }
}
