// src/version/mapping.rs

//! AGP to Gradle/Kotlin version mapping table
//!
//! The table is a line-oriented file, one AGP `major.minor` per line:
//!
//! ```text
//! # mapping of AGP versions to Gradle and Kotlin Versions, separated by ';'
//! 8.1;8.0;1.8.10
//! 8.2;8.2;1.8.10
//! ```

use crate::error::{Error, Result};
use crate::version::ShortVersion;
use std::collections::BTreeMap;
use std::path::Path;

/// Default name of the mapping file at the recipes root
pub const VERSION_MAPPING_FILE: &str = "version_mappings.txt";

/// Companion tool versions for one AGP `major.minor`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub gradle: String,
    pub kotlin: String,
}

/// Read-only mapping from AGP short version to companion tool versions
#[derive(Debug, Clone, Default)]
pub struct VersionMapping {
    entries: BTreeMap<ShortVersion, VersionInfo>,
}

impl VersionMapping {
    /// Parse the content of a mapping file
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = |reason: String| Error::MalformedVersionMapping {
                line: index + 1,
                reason,
            };

            let fields: Vec<&str> = line.split(';').map(str::trim).collect();
            if fields.len() < 3 {
                return Err(malformed(format!(
                    "expected 'agp;gradle;kotlin', found '{line}'"
                )));
            }

            let short = ShortVersion::parse(fields[0])
                .ok_or_else(|| malformed(format!("unable to parse short AGP version '{}'", fields[0])))?;

            entries.insert(
                short,
                VersionInfo {
                    gradle: fields[1].to_string(),
                    kotlin: fields[2].to_string(),
                },
            );
        }

        Ok(Self { entries })
    }

    /// Load the mapping file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content)
    }

    pub fn get(&self, short: ShortVersion) -> Option<&VersionInfo> {
        self.entries.get(&short)
    }

    pub fn gradle_version(&self, short: ShortVersion) -> Option<&str> {
        self.get(short).map(|info| info.gradle.as_str())
    }

    pub fn kotlin_version(&self, short: ShortVersion) -> Option<&str> {
        self.get(short).map(|info| info.kotlin.as_str())
    }

    /// All mapped short versions, ascending
    pub fn shorts(&self) -> impl Iterator<Item = ShortVersion> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
