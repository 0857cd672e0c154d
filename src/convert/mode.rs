// src/convert/mode.rs

//! Conversion modes
//!
//! | Mode        | Placeholders                              | Compliance        |
//! |-------------|-------------------------------------------|-------------------|
//! | Source      | restored from working-copy blocks         | always            |
//! | WorkingCopy | wrapped, filled with the minimum version  | always            |
//! | Release     | replaced with the target release values   | target in range   |

use crate::context::ConversionContext;
use crate::convert::placeholder::{self, CommentStyle};
use crate::error::{Error, Result};
use crate::recipe::RecipeDescriptor;
use crate::version::ReleaseVersion;
use std::fmt;

pub const AGP_VERSION: &str = "$AGP_VERSION";
pub const KOTLIN_VERSION: &str = "$KOTLIN_VERSION";
pub const COMPILE_SDK: &str = "$COMPILE_SDK";
pub const MINIMUM_SDK: &str = "$MINIMUM_SDK";
pub const AGP_REPOSITORY: &str = "$AGP_REPOSITORY";
pub const PLUGIN_REPOSITORIES: &str = "$PLUGIN_REPOSITORIES";
pub const DEPENDENCY_REPOSITORIES: &str = "$DEPENDENCY_REPOSITORIES";
pub const GRADLE_LOCATION: &str = "$GRADLE_LOCATION";

const DEFAULT_PLUGIN_REPOSITORIES: &[&str] = &[
    "        gradlePluginPortal()",
    "        google()",
    "        mavenCentral()",
];

const DEFAULT_DEPENDENCY_REPOSITORIES: &[&str] = &["        google()", "        mavenCentral()"];

fn to_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

/// `distributionUrl` value of a public Gradle release
///
/// The colon is escaped as required by the properties format.
pub fn gradle_download_url(gradle_version: &str) -> String {
    format!("https\\://services.gradle.org/distributions/gradle-{gradle_version}-bin.zip")
}

/// Release being converted to, with the locations it is fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub agp: ReleaseVersion,
    /// Value of `$GRADLE_LOCATION`
    pub gradle_location: String,
    /// Value of `$AGP_REPOSITORY`, empty to drop the line
    pub agp_repository: String,
    pub plugin_repositories: Vec<String>,
    pub dependency_repositories: Vec<String>,
}

impl ReleaseTarget {
    /// Resolve the locations used for a release of `agp`
    ///
    /// Without an explicit Gradle version but with a Gradle path in the
    /// context, the internal CI form is used: local Gradle distribution,
    /// mandatory local AGP repository and no public repositories.
    /// Otherwise the Gradle version is `gradle_version` or the one mapped
    /// to `agp`, downloaded from services.gradle.org.
    pub fn resolve(
        agp: ReleaseVersion,
        gradle_version: Option<&str>,
        ctx: &ConversionContext,
    ) -> Result<Self> {
        if let (None, Some(gradle_path)) = (gradle_version, ctx.gradle_path()) {
            let repo = ctx.repo_location().ok_or_else(|| {
                Error::InvalidOptions(
                    "a repository location is required when using a local Gradle path".to_string(),
                )
            })?;

            return Ok(Self {
                agp,
                gradle_location: gradle_path.to_string(),
                agp_repository: repo.to_string(),
                plugin_repositories: Vec::new(),
                dependency_repositories: Vec::new(),
            });
        }

        let gradle_version = match gradle_version {
            Some(version) => version,
            None => ctx.gradle_version(agp.to_short())?,
        };

        Ok(Self {
            agp,
            gradle_location: gradle_download_url(gradle_version),
            agp_repository: ctx.repo_location().unwrap_or_default().to_string(),
            plugin_repositories: to_lines(DEFAULT_PLUGIN_REPOSITORIES),
            dependency_repositories: to_lines(DEFAULT_DEPENDENCY_REPOSITORIES),
        })
    }
}

/// Target form of a conversion, selected once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionMode {
    Source,
    WorkingCopy,
    Release(ReleaseTarget),
}

impl ConversionMode {
    /// Whether the recipe can be converted in this mode
    pub fn is_compliant(&self, descriptor: &RecipeDescriptor) -> bool {
        match self {
            ConversionMode::Release(target) => descriptor.is_compliant(&target.agp),
            _ => true,
        }
    }

    /// Name of the folder the recipe is written to
    ///
    /// Only released recipes honour `destinationFolder`; source and working
    /// copies keep the recipe folder name so round trips land in place.
    pub fn destination_name<'a>(&self, descriptor: &'a RecipeDescriptor) -> &'a str {
        match self {
            ConversionMode::Release(_) => &descriptor.destination_folder,
            _ => &descriptor.folder_name,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, ConversionMode::Source)
    }

    pub fn target(&self) -> Option<&ReleaseTarget> {
        match self {
            ConversionMode::Release(target) => Some(target),
            _ => None,
        }
    }

    /// Resolve the file transforms for one recipe
    pub fn plan(&self, descriptor: &RecipeDescriptor, ctx: &ConversionContext) -> Result<TransformPlan> {
        match self {
            ConversionMode::Source => Ok(TransformPlan::Unwrap),
            ConversionMode::WorkingCopy => {
                let min = descriptor.min_version;
                let short = min.to_short();
                Ok(TransformPlan::Wrap(PlaceholderValues {
                    agp_version: format!("\"{min}\""),
                    kotlin_version: format!("\"{}\"", ctx.kotlin_version(short)?),
                    compile_sdk: ctx.compile_sdk().to_string(),
                    minimum_sdk: ctx.minimum_sdk().to_string(),
                    agp_repository: String::new(),
                    plugin_repositories: to_lines(DEFAULT_PLUGIN_REPOSITORIES),
                    dependency_repositories: to_lines(DEFAULT_DEPENDENCY_REPOSITORIES),
                    gradle_location: gradle_download_url(ctx.gradle_version(short)?),
                }))
            }
            ConversionMode::Release(target) => {
                let kotlin = ctx.kotlin_version(target.agp.to_short())?;
                Ok(TransformPlan::Replace(PlaceholderValues {
                    agp_version: format!("\"{}\"", target.agp),
                    kotlin_version: format!("\"{kotlin}\""),
                    compile_sdk: ctx.compile_sdk().to_string(),
                    minimum_sdk: ctx.minimum_sdk().to_string(),
                    agp_repository: target.agp_repository.clone(),
                    plugin_repositories: target.plugin_repositories.clone(),
                    dependency_repositories: target.dependency_repositories.clone(),
                    gradle_location: target.gradle_location.clone(),
                }))
            }
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionMode::Source => write!(f, "source"),
            ConversionMode::WorkingCopy => write!(f, "working copy"),
            ConversionMode::Release(target) => write!(f, "release {}", target.agp),
        }
    }
}

/// Concrete placeholder values for one recipe
///
/// Version values are quoted, SDK levels are bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderValues {
    pub agp_version: String,
    pub kotlin_version: String,
    pub compile_sdk: String,
    pub minimum_sdk: String,
    pub agp_repository: String,
    pub plugin_repositories: Vec<String>,
    pub dependency_repositories: Vec<String>,
    pub gradle_location: String,
}

/// Pure file transforms of a mode, resolved for one recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformPlan {
    Unwrap,
    Wrap(PlaceholderValues),
    Replace(PlaceholderValues),
}

impl TransformPlan {
    /// `build.gradle` / `build.gradle.kts`
    pub fn build_file(&self, lines: &[String]) -> Vec<String> {
        let style = CommentStyle::Gradle;
        match self {
            TransformPlan::Unwrap => placeholder::unwrap(lines, style),
            TransformPlan::Wrap(values) => {
                let lines = placeholder::wrap_inline(lines, AGP_VERSION, &values.agp_version, style);
                let lines = placeholder::wrap_inline(&lines, KOTLIN_VERSION, &values.kotlin_version, style);
                let lines = placeholder::wrap_inline(&lines, COMPILE_SDK, &values.compile_sdk, style);
                placeholder::wrap_inline(&lines, MINIMUM_SDK, &values.minimum_sdk, style)
            }
            TransformPlan::Replace(values) => {
                let lines = placeholder::replace_inline(lines, AGP_VERSION, &values.agp_version);
                let lines = placeholder::replace_inline(&lines, KOTLIN_VERSION, &values.kotlin_version);
                let lines = placeholder::replace_inline(&lines, COMPILE_SDK, &values.compile_sdk);
                placeholder::replace_inline(&lines, MINIMUM_SDK, &values.minimum_sdk)
            }
        }
    }

    /// `settings.gradle` / `settings.gradle.kts`
    pub fn settings_file(&self, lines: &[String]) -> Vec<String> {
        let style = CommentStyle::Gradle;
        match self {
            TransformPlan::Unwrap => placeholder::unwrap(lines, style),
            TransformPlan::Wrap(values) => {
                let lines = placeholder::wrap_inline(lines, AGP_REPOSITORY, &values.agp_repository, style);
                let lines = placeholder::wrap_list(
                    &lines,
                    PLUGIN_REPOSITORIES,
                    &values.plugin_repositories,
                    style,
                );
                placeholder::wrap_list(
                    &lines,
                    DEPENDENCY_REPOSITORIES,
                    &values.dependency_repositories,
                    style,
                )
            }
            TransformPlan::Replace(values) => {
                let lines = placeholder::replace_with_line(lines, AGP_REPOSITORY, &values.agp_repository);
                let lines =
                    placeholder::replace_with_list(&lines, PLUGIN_REPOSITORIES, &values.plugin_repositories);
                placeholder::replace_with_list(
                    &lines,
                    DEPENDENCY_REPOSITORIES,
                    &values.dependency_repositories,
                )
            }
        }
    }

    /// `libs.versions.toml` / `build.libs.versions.toml`
    pub fn version_catalog(&self, lines: &[String]) -> Vec<String> {
        let style = CommentStyle::Properties;
        match self {
            TransformPlan::Unwrap => placeholder::unwrap(lines, style),
            TransformPlan::Wrap(values) => {
                let lines = placeholder::wrap_inline(lines, AGP_VERSION, &values.agp_version, style);
                placeholder::wrap_inline(&lines, KOTLIN_VERSION, &values.kotlin_version, style)
            }
            TransformPlan::Replace(values) => {
                let lines = placeholder::replace_inline(lines, AGP_VERSION, &values.agp_version);
                placeholder::replace_inline(&lines, KOTLIN_VERSION, &values.kotlin_version)
            }
        }
    }

    /// `gradle/wrapper/gradle-wrapper.properties`
    pub fn wrapper_properties(&self, lines: &[String]) -> Vec<String> {
        let style = CommentStyle::Properties;
        match self {
            TransformPlan::Unwrap => placeholder::unwrap(lines, style),
            TransformPlan::Wrap(values) => {
                placeholder::wrap_inline(lines, GRADLE_LOCATION, &values.gradle_location, style)
            }
            TransformPlan::Replace(values) => {
                placeholder::replace_inline(lines, GRADLE_LOCATION, &values.gradle_location)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextConfig;
    use crate::version::{ShortVersion, VersionMapping};
    use std::collections::BTreeMap;

    fn context(config: ContextConfig) -> ConversionContext {
        let mapping = VersionMapping::parse("8.1;8.0;1.8.10\n8.3;8.4;1.9.20\n").unwrap();
        let mut published = BTreeMap::new();
        published.insert(ShortVersion::new(8, 1), ReleaseVersion::new(8, 1, 4));
        ConversionContext::from_parts(config, mapping, Some(published))
    }

    fn descriptor() -> RecipeDescriptor {
        RecipeDescriptor {
            folder_name: "customRecipe".to_string(),
            index_name: "Custom".to_string(),
            destination_folder: "custom".to_string(),
            min_version: ReleaseVersion::new(8, 1, 0),
            max_version: Some(ShortVersion::new(8, 2)),
            tasks: vec!["assembleDebug".to_string()],
            validation_tasks: None,
            keywords: Vec::new(),
        }
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    fn release(agp: ReleaseVersion, ctx: &ConversionContext) -> ConversionMode {
        ConversionMode::Release(ReleaseTarget::resolve(agp, None, ctx).unwrap())
    }

    #[test]
    fn test_resolve_public_target() {
        let ctx = context(ContextConfig::default());
        let target = ReleaseTarget::resolve(ReleaseVersion::new(8, 3, 0), None, &ctx).unwrap();
        assert_eq!(
            target.gradle_location,
            "https\\://services.gradle.org/distributions/gradle-8.4-bin.zip"
        );
        assert_eq!(target.agp_repository, "");
        assert_eq!(target.plugin_repositories.len(), 3);
        assert_eq!(target.dependency_repositories.len(), 2);

        let explicit = ReleaseTarget::resolve(ReleaseVersion::new(9, 0, 0), Some("9.1"), &ctx).unwrap();
        assert!(explicit.gradle_location.ends_with("gradle-9.1-bin.zip"));

        assert!(matches!(
            ReleaseTarget::resolve(ReleaseVersion::new(9, 0, 0), None, &ctx),
            Err(Error::MissingVersionMapping(_))
        ));
    }

    #[test]
    fn test_resolve_internal_ci_target() {
        let ctx = context(ContextConfig {
            gradle_path: Some("file:///opt/gradle.zip".to_string()),
            repo_location: Some("maven { url = uri(\"/repo\") }".to_string()),
            ..ContextConfig::default()
        });
        let target = ReleaseTarget::resolve(ReleaseVersion::new(8, 3, 0), None, &ctx).unwrap();
        assert_eq!(target.gradle_location, "file:///opt/gradle.zip");
        assert_eq!(target.agp_repository, "maven { url = uri(\"/repo\") }");
        assert!(target.plugin_repositories.is_empty());
        assert!(target.dependency_repositories.is_empty());

        let no_repo = context(ContextConfig {
            gradle_path: Some("file:///opt/gradle.zip".to_string()),
            ..ContextConfig::default()
        });
        assert!(matches!(
            ReleaseTarget::resolve(ReleaseVersion::new(8, 3, 0), None, &no_repo),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_compliance_and_destination() {
        let ctx = context(ContextConfig::default());
        let descriptor = descriptor();

        assert!(ConversionMode::Source.is_compliant(&descriptor));
        assert!(ConversionMode::WorkingCopy.is_compliant(&descriptor));
        assert!(release(ReleaseVersion::new(8, 1, 4), &ctx).is_compliant(&descriptor));
        assert!(!release(ReleaseVersion::new(8, 3, 0), &ctx).is_compliant(&descriptor));

        assert_eq!(ConversionMode::WorkingCopy.destination_name(&descriptor), "customRecipe");
        assert_eq!(
            release(ReleaseVersion::new(8, 1, 4), &ctx).destination_name(&descriptor),
            "custom"
        );
    }

    #[test]
    fn test_release_build_file() {
        let ctx = context(ContextConfig::default());
        let plan = release(ReleaseVersion::new(8, 1, 4), &ctx)
            .plan(&descriptor(), &ctx)
            .unwrap();

        let source = lines(&[
            "plugins {",
            "    id 'com.android.application' version $AGP_VERSION apply false",
            "    id 'org.jetbrains.kotlin.android' version $KOTLIN_VERSION apply false",
            "}",
            "android {",
            "    compileSdk $COMPILE_SDK",
            "    defaultConfig { minSdk $MINIMUM_SDK }",
            "}",
        ]);
        assert_eq!(
            plan.build_file(&source),
            lines(&[
                "plugins {",
                "    id 'com.android.application' version \"8.1.4\" apply false",
                "    id 'org.jetbrains.kotlin.android' version \"1.8.10\" apply false",
                "}",
                "android {",
                "    compileSdk 34",
                "    defaultConfig { minSdk 21 }",
                "}",
            ])
        );
    }

    #[test]
    fn test_release_settings_file() {
        let ctx = context(ContextConfig::default());
        let plan = release(ReleaseVersion::new(8, 1, 4), &ctx)
            .plan(&descriptor(), &ctx)
            .unwrap();

        let source = lines(&[
            "pluginManagement {",
            "    repositories {",
            "        $AGP_REPOSITORY",
            "        $PLUGIN_REPOSITORIES",
            "    }",
            "}",
            "dependencyResolutionManagement {",
            "    repositories {",
            "        $AGP_REPOSITORY",
            "        $DEPENDENCY_REPOSITORIES",
            "    }",
            "}",
        ]);
        assert_eq!(
            plan.settings_file(&source),
            lines(&[
                "pluginManagement {",
                "    repositories {",
                "        gradlePluginPortal()",
                "        google()",
                "        mavenCentral()",
                "    }",
                "}",
                "dependencyResolutionManagement {",
                "    repositories {",
                "        google()",
                "        mavenCentral()",
                "    }",
                "}",
            ])
        );
    }

    #[test]
    fn test_working_copy_round_trips_through_source() {
        let ctx = context(ContextConfig::default());
        let wrap = ConversionMode::WorkingCopy.plan(&descriptor(), &ctx).unwrap();
        let unwrap = ConversionMode::Source.plan(&descriptor(), &ctx).unwrap();

        let build = lines(&[
            "plugins { id 'com.android.library' version $AGP_VERSION }",
            "android { compileSdk = $COMPILE_SDK }",
            "kotlin { jvmToolchain(17) }",
        ]);
        let wrapped = wrap.build_file(&build);
        assert!(wrapped.contains(&"plugins { id 'com.android.library' version \"8.1.0\" }".to_string()));
        assert_eq!(unwrap.build_file(&wrapped), build);

        let settings = lines(&["repositories {", "    $AGP_REPOSITORY", "    $PLUGIN_REPOSITORIES", "}"]);
        assert_eq!(unwrap.settings_file(&wrap.settings_file(&settings)), settings);

        let catalog = lines(&["[versions]", "agp = $AGP_VERSION", "kotlin = $KOTLIN_VERSION"]);
        let wrapped_catalog = wrap.version_catalog(&catalog);
        assert_eq!(wrapped_catalog[1], "#  >>> WORKING_COPY >>>");
        assert_eq!(unwrap.version_catalog(&wrapped_catalog), catalog);

        let properties = lines(&["distributionUrl=$GRADLE_LOCATION"]);
        let wrapped_properties = wrap.wrapper_properties(&properties);
        assert_eq!(
            wrapped_properties[2],
            "distributionUrl=https\\://services.gradle.org/distributions/gradle-8.0-bin.zip"
        );
        assert_eq!(unwrap.wrapper_properties(&wrapped_properties), properties);
    }
}
