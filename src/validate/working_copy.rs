// src/validate/working_copy.rs

//! Validation of a recipe working copy

use crate::context::ConversionContext;
use crate::convert::{ConversionMode, RecipeConverter};
use crate::error::{Error, Result};
use crate::validate::min_max::MinMaxValidator;
use crate::version::ReleaseVersion;
use std::path::Path;
use tempfile::TempDir;
use tracing::debug;

/// Restores a working copy to its source form, then validates it at its
/// minimum and maximum supported releases
pub struct WorkingCopyValidator<'a> {
    ctx: &'a ConversionContext,
    agp_version: Option<ReleaseVersion>,
}

impl<'a> WorkingCopyValidator<'a> {
    pub fn new(ctx: &'a ConversionContext, agp_version: Option<ReleaseVersion>) -> Self {
        Self { ctx, agp_version }
    }

    pub fn validate(&self, working_copy: &Path) -> Result<()> {
        let destination = TempDir::new().map_err(|e| Error::io(std::env::temp_dir(), e))?;

        let result = RecipeConverter::new(ConversionMode::Source, self.ctx)
            .convert(working_copy, destination.path())?;
        debug!(
            "Restored {} to {}",
            working_copy.display(),
            result.destination.display()
        );

        MinMaxValidator::new(self.ctx)
            .with_agp_version(self.agp_version)
            .validate(&result.destination, Some(&result.descriptor.folder_name))
    }
}
