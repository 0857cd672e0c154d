// src/convert/converter.rs

//! Single recipe conversion

use crate::context::ConversionContext;
use crate::convert::mode::{ConversionMode, TransformPlan};
use crate::error::{Error, Result};
use crate::recipe::RecipeDescriptor;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Files never copied into a converted recipe
const SKIPPED_FILES: &[&str] = &["gradlew", "gradlew.bat", "local.properties"];

/// Gradle and IDE output folders, skipped with their content
const SKIPPED_FOLDERS: &[&str] = &["build", ".idea", ".gradle", "out", "wrapper"];

/// Wrapper properties, relative to the recipe root
const WRAPPER_PROPERTIES: &str = "gradle/wrapper/gradle-wrapper.properties";

/// Outcome of one conversion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted,
    /// The recipe does not support the target release, nothing was written
    NonCompliant,
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub descriptor: RecipeDescriptor,
    /// Folder the recipe was (or would have been) written to
    pub destination: PathBuf,
    pub outcome: ConversionOutcome,
}

impl ConversionResult {
    pub fn succeeded(&self) -> bool {
        self.outcome == ConversionOutcome::Converted
    }

    /// Turn a non-compliant outcome into [`Error::NonCompliantRecipe`]
    pub fn require_converted(self, mode: &ConversionMode) -> Result<Self> {
        if self.succeeded() {
            return Ok(self);
        }
        Err(Error::NonCompliantRecipe {
            recipe: self.descriptor.folder_name,
            version: mode
                .target()
                .map(|target| target.agp.to_string())
                .unwrap_or_else(|| mode.to_string()),
        })
    }
}

/// How a file of the recipe is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileRoute {
    Skip,
    BuildFile,
    SettingsFile,
    VersionCatalog,
    Copy,
}

fn route(file_name: &str) -> FileRoute {
    match file_name {
        name if SKIPPED_FILES.contains(&name) => FileRoute::Skip,
        "build.gradle" | "build.gradle.kts" => FileRoute::BuildFile,
        "settings.gradle" | "settings.gradle.kts" => FileRoute::SettingsFile,
        "libs.versions.toml" | "build.libs.versions.toml" => FileRoute::VersionCatalog,
        _ => FileRoute::Copy,
    }
}

/// Converts recipe folders into one mode
pub struct RecipeConverter<'a> {
    mode: ConversionMode,
    ctx: &'a ConversionContext,
    overwrite: bool,
    generate_wrapper: bool,
}

impl<'a> RecipeConverter<'a> {
    pub fn new(mode: ConversionMode, ctx: &'a ConversionContext) -> Self {
        Self {
            mode,
            ctx,
            overwrite: false,
            generate_wrapper: true,
        }
    }

    /// Replace the non-hidden content of existing destinations
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Copy the Gradle wrapper into non-source outputs (default: true)
    pub fn generate_wrapper(mut self, generate_wrapper: bool) -> Self {
        self.generate_wrapper = generate_wrapper;
        self
    }

    pub fn mode(&self) -> &ConversionMode {
        &self.mode
    }

    /// Convert the recipe in `source` into a new folder inside `destination`
    pub fn convert(&self, source: &Path, destination: &Path) -> Result<ConversionResult> {
        if !source.is_dir() {
            return Err(Error::NotADirectory(source.to_path_buf()));
        }

        let descriptor = RecipeDescriptor::load(source, self.ctx)?;
        let recipe_destination = destination.join(self.mode.destination_name(&descriptor));

        if recipe_destination.is_file() {
            return Err(Error::NotADirectory(recipe_destination));
        }

        if recipe_destination.is_dir() && !is_empty_dir(&recipe_destination, false)? {
            if !self.overwrite {
                return Err(Error::DestinationNotEmpty(recipe_destination));
            }
            clear_directory(&recipe_destination)?;
        }

        if !self.mode.is_compliant(&descriptor) {
            warn!(
                "Skipping {}: not compliant with {} (supports {} to {})",
                source.display(),
                self.mode,
                descriptor.min_version,
                descriptor
                    .max_version
                    .map(|max| max.to_string())
                    .unwrap_or_else(|| "latest".to_string())
            );
            return Ok(ConversionResult {
                descriptor,
                destination: recipe_destination,
                outcome: ConversionOutcome::NonCompliant,
            });
        }

        info!(
            "Converting {} to {} ({})",
            source.display(),
            recipe_destination.display(),
            self.mode
        );

        let plan = self.mode.plan(&descriptor, self.ctx)?;
        self.convert_tree(source, &recipe_destination, &plan)?;

        if self.generate_wrapper && !self.mode.is_source() {
            self.copy_gradle_resources(&recipe_destination, &plan)?;
        }

        Ok(ConversionResult {
            descriptor,
            destination: recipe_destination,
            outcome: ConversionOutcome::Converted,
        })
    }

    fn convert_tree(&self, source: &Path, destination: &Path, plan: &TransformPlan) -> Result<()> {
        let walker = WalkDir::new(source)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !SKIPPED_FOLDERS.contains(&e.file_name().to_string_lossy().as_ref())
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(source).to_path_buf();
                Error::io(path, e.into())
            })?;

            let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
            let target = destination.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let route = route(&file_name);
            debug!("{}: {:?}", relative.display(), route);

            match route {
                FileRoute::Skip => {}
                FileRoute::BuildFile => {
                    transform_file(entry.path(), &target, |lines| plan.build_file(lines))?
                }
                FileRoute::SettingsFile => {
                    transform_file(entry.path(), &target, |lines| plan.settings_file(lines))?
                }
                FileRoute::VersionCatalog => {
                    transform_file(entry.path(), &target, |lines| plan.version_catalog(lines))?
                }
                FileRoute::Copy => {
                    fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
                }
            }
        }

        Ok(())
    }

    /// Copy the wrapper resources into `destination` and fill in the
    /// distribution location
    fn copy_gradle_resources(&self, destination: &Path, plan: &TransformPlan) -> Result<()> {
        let resources = self.ctx.gradle_resources();
        if !resources.is_dir() {
            return Err(Error::MissingFile(resources));
        }

        copy_dir_all(&resources, destination)?;

        let properties = destination.join(WRAPPER_PROPERTIES);
        if !properties.is_file() {
            return Err(Error::MissingFile(resources.join(WRAPPER_PROPERTIES)));
        }
        transform_file(&properties, &properties, |lines| plan.wrapper_properties(lines))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let gradlew = destination.join("gradlew");
            if gradlew.is_file() {
                let mut permissions = fs::metadata(&gradlew)
                    .map_err(|e| Error::io(&gradlew, e))?
                    .permissions();
                permissions.set_mode(permissions.mode() | 0o100);
                fs::set_permissions(&gradlew, permissions).map_err(|e| Error::io(&gradlew, e))?;
            }
        }

        Ok(())
    }
}

/// Rewrite a text file line by line, normalizing line endings to `\n`
fn transform_file<F>(source: &Path, target: &Path, transform: F) -> Result<()>
where
    F: FnOnce(&[String]) -> Vec<String>,
{
    let content = fs::read_to_string(source).map_err(|e| Error::io(source, e))?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();

    let mut output = String::with_capacity(content.len());
    for line in transform(&lines) {
        output.push_str(&line);
        output.push('\n');
    }

    fs::write(target, output).map_err(|e| Error::io(target, e))
}

fn copy_dir_all(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            Error::io(path, e.into())
        })?;

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Whether `dir` has no entries, optionally ignoring hidden ones
pub fn is_empty_dir(dir: &Path, ignore_hidden: bool) -> Result<bool> {
    let mut entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let found = entries.try_fold(false, |found, entry| {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        Ok::<bool, Error>(found || !(ignore_hidden && hidden))
    })?;
    Ok(!found)
}

/// Delete every non-hidden entry of `dir`
pub fn clear_directory(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| Error::io(&path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        }
    }
    Ok(())
}
