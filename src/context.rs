// src/context.rs

//! Conversion context
//!
//! Holds the process-wide configuration of a conversion or validation run
//! and the version lookups derived from it: the static version mapping
//! table and the latest published release of every mapped `major.minor`.

use crate::error::{Error, Result};
use crate::recipe::ReleaseLookup;
use crate::release::{find_latest_versions, MetadataClient};
use crate::version::{ReleaseVersion, ShortVersion, VersionMapping, VERSION_MAPPING_FILE};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Folder holding the Gradle wrapper copied into converted projects
pub const GRADLE_RESOURCES_FOLDER: &str = "gradle-resources";

/// Value of `$COMPILE_SDK` in converted projects
pub const DEFAULT_COMPILE_SDK: &str = "34";

/// Value of `$MINIMUM_SDK` in converted projects
pub const DEFAULT_MINIMUM_SDK: &str = "21";

/// Configuration of a conversion run
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Root of the recipes repository
    pub recipes_root: PathBuf,
    /// Version mapping table, `<root>/version_mappings.txt` when unset
    pub version_mapping_file: Option<PathBuf>,
    /// Gradle wrapper resources, `<root>/gradle-resources` when unset
    pub gradle_resources: Option<PathBuf>,
    /// Local copy of the release metadata feed; downloaded when unset
    pub maven_metadata: Option<PathBuf>,
    /// Running on the internal CI
    pub ci: bool,
    /// Replaces `$AGP_REPOSITORY`; also injected into Gradle runs
    pub repo_location: Option<String>,
    /// Gradle distribution used for `distributionUrl`
    pub gradle_path: Option<String>,
    pub java_home: Option<PathBuf>,
    pub android_home: Option<PathBuf>,
    pub compile_sdk: String,
    pub minimum_sdk: String,
    /// Kill Gradle runs that take longer than this
    pub task_timeout: Option<Duration>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            recipes_root: PathBuf::from("."),
            version_mapping_file: None,
            gradle_resources: None,
            maven_metadata: None,
            ci: false,
            repo_location: None,
            gradle_path: None,
            java_home: None,
            android_home: None,
            compile_sdk: DEFAULT_COMPILE_SDK.to_string(),
            minimum_sdk: DEFAULT_MINIMUM_SDK.to_string(),
            task_timeout: None,
        }
    }
}

impl ContextConfig {
    /// Default configuration rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            recipes_root: root.into(),
            ..Self::default()
        }
    }

    pub fn version_mapping_path(&self) -> PathBuf {
        self.version_mapping_file
            .clone()
            .unwrap_or_else(|| self.recipes_root.join(VERSION_MAPPING_FILE))
    }

    pub fn gradle_resources_path(&self) -> PathBuf {
        self.gradle_resources
            .clone()
            .unwrap_or_else(|| self.recipes_root.join(GRADLE_RESOURCES_FOLDER))
    }
}

/// Configuration plus resolved version lookups
///
/// The published-release map is resolved on first use, from the local feed
/// file when configured, otherwise by downloading the feed.
#[derive(Debug)]
pub struct ConversionContext {
    config: ContextConfig,
    mapping: VersionMapping,
    published: OnceCell<BTreeMap<ShortVersion, ReleaseVersion>>,
}

impl ConversionContext {
    /// Load the version mapping table named by `config`
    pub fn load(config: ContextConfig) -> Result<Self> {
        let mapping_path = config.version_mapping_path();
        let mapping = VersionMapping::load(&mapping_path)?;
        debug!(
            "Loaded {} version mappings from {}",
            mapping.len(),
            mapping_path.display()
        );

        Ok(Self {
            config,
            mapping,
            published: OnceCell::new(),
        })
    }

    /// Build a context from an already loaded mapping, optionally with a
    /// pre-resolved published-release map
    pub fn from_parts(
        config: ContextConfig,
        mapping: VersionMapping,
        published: Option<BTreeMap<ShortVersion, ReleaseVersion>>,
    ) -> Self {
        let cell = OnceCell::new();
        if let Some(map) = published {
            let _ = cell.set(map);
        }
        Self {
            config,
            mapping,
            published: cell,
        }
    }

    pub fn gradle_resources(&self) -> PathBuf {
        self.config.gradle_resources_path()
    }

    pub fn ci(&self) -> bool {
        self.config.ci
    }

    pub fn repo_location(&self) -> Option<&str> {
        self.config.repo_location.as_deref()
    }

    pub fn gradle_path(&self) -> Option<&str> {
        self.config.gradle_path.as_deref()
    }

    pub fn java_home(&self) -> Option<&Path> {
        self.config.java_home.as_deref()
    }

    pub fn android_home(&self) -> Option<&Path> {
        self.config.android_home.as_deref()
    }

    pub fn compile_sdk(&self) -> &str {
        &self.config.compile_sdk
    }

    pub fn minimum_sdk(&self) -> &str {
        &self.config.minimum_sdk
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.config.task_timeout
    }

    fn published_releases(&self) -> Result<&BTreeMap<ShortVersion, ReleaseVersion>> {
        if let Some(map) = self.published.get() {
            return Ok(map);
        }

        let map = self.resolve_published_releases()?;
        Ok(self.published.get_or_init(|| map))
    }

    fn resolve_published_releases(&self) -> Result<BTreeMap<ShortVersion, ReleaseVersion>> {
        let xml = match &self.config.maven_metadata {
            Some(path) => {
                if !path.is_file() {
                    return Err(Error::MissingFile(path.clone()));
                }
                info!("Reading release metadata from {}", path.display());
                std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?
            }
            None => MetadataClient::new()?.fetch_agp_metadata()?,
        };

        let shorts: Vec<ShortVersion> = self.mapping.shorts().collect();
        let published = find_latest_versions(&xml, &shorts)?;

        for short in shorts.iter().filter(|s| !published.contains_key(s)) {
            debug!("No published release for mapped version {}", short);
        }

        Ok(published)
    }

    /// Latest published release of `short`
    pub fn published_release(&self, short: ShortVersion) -> Result<ReleaseVersion> {
        self.published_releases()?
            .get(&short)
            .copied()
            .ok_or_else(|| Error::MissingPublishedRelease(short.to_string()))
    }

    /// Highest published release across all mapped versions
    pub fn max_published_release(&self) -> Result<ReleaseVersion> {
        self.published_releases()?
            .values()
            .max()
            .copied()
            .ok_or_else(|| Error::MissingPublishedRelease("any mapped AGP version".to_string()))
    }

    /// Gradle version paired with `short`
    pub fn gradle_version(&self, short: ShortVersion) -> Result<&str> {
        self.mapping
            .gradle_version(short)
            .ok_or_else(|| Error::MissingVersionMapping(short.to_string()))
    }

    /// Kotlin version paired with `short`
    pub fn kotlin_version(&self, short: ShortVersion) -> Result<&str> {
        self.mapping
            .kotlin_version(short)
            .ok_or_else(|| Error::MissingVersionMapping(short.to_string()))
    }
}

impl ReleaseLookup for ConversionContext {
    fn latest_release(&self, short: ShortVersion) -> Result<ReleaseVersion> {
        self.published_release(short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FEED: &str = "<metadata><versioning><versions>\
        <version>8.1.0</version>\
        <version>8.1.4</version>\
        <version>8.2.0-rc01</version>\
        </versions></versioning></metadata>";

    fn write_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(VERSION_MAPPING_FILE),
            "# agp;gradle;kotlin\n8.1;8.0;1.8.10\n8.2;8.2;1.8.10\n8.3;8.4;1.9.20\n",
        )
        .unwrap();
        fs::write(dir.path().join("maven-metadata.xml"), FEED).unwrap();
        dir
    }

    fn context(root: &Path) -> ConversionContext {
        let config = ContextConfig {
            maven_metadata: Some(root.join("maven-metadata.xml")),
            ..ContextConfig::with_root(root)
        };
        ConversionContext::load(config).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ContextConfig::default();
        assert_eq!(config.compile_sdk, "34");
        assert_eq!(config.minimum_sdk, "21");
        assert_eq!(config.version_mapping_path(), Path::new("./version_mappings.txt"));
        assert_eq!(config.gradle_resources_path(), Path::new("./gradle-resources"));
    }

    #[test]
    fn test_published_releases_from_local_feed() {
        let root = write_root();
        let ctx = context(root.path());

        assert_eq!(
            ctx.published_release(ShortVersion::new(8, 1)).unwrap().to_string(),
            "8.1.4"
        );
        assert_eq!(ctx.max_published_release().unwrap().to_string(), "8.2.0-rc01");
        assert!(matches!(
            ctx.published_release(ShortVersion::new(8, 3)),
            Err(Error::MissingPublishedRelease(_))
        ));
    }

    #[test]
    fn test_companion_versions() {
        let root = write_root();
        let ctx = context(root.path());

        assert_eq!(ctx.gradle_version(ShortVersion::new(8, 3)).unwrap(), "8.4");
        assert_eq!(ctx.kotlin_version(ShortVersion::new(8, 1)).unwrap(), "1.8.10");
        assert!(matches!(
            ctx.gradle_version(ShortVersion::new(7, 0)),
            Err(Error::MissingVersionMapping(_))
        ));
    }

    #[test]
    fn test_missing_local_feed() {
        let root = write_root();
        let config = ContextConfig {
            maven_metadata: Some(root.path().join("absent.xml")),
            ..ContextConfig::with_root(root.path())
        };
        let ctx = ConversionContext::load(config).unwrap();
        assert!(matches!(
            ctx.max_published_release(),
            Err(Error::MissingFile(_))
        ));
    }

    #[test]
    fn test_missing_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConversionContext::load(ContextConfig::with_root(dir.path())).unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }
}
