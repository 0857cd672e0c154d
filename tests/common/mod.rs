// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use recipe_converter::{ContextConfig, ConversionContext};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

pub const VERSION_MAPPINGS: &str = "\
# mapping of AGP versions to Gradle and Kotlin Versions, separated by ';'
8.1;8.0;1.8.10
8.2;8.2;1.9.0
8.3;8.4;1.9.20
";

pub const MAVEN_METADATA: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<metadata>
  <groupId>com.android.tools.build</groupId>
  <artifactId>gradle</artifactId>
  <versioning>
    <versions>
      <version>8.1.0</version>
      <version>8.1.4</version>
      <version>8.2.0</version>
      <version>8.2.2</version>
      <version>8.3.0-alpha01</version>
      <version>8.3.0-beta02</version>
    </versions>
  </versioning>
</metadata>"#;

pub const GRADLEW: &str = "#!/bin/sh\necho gradle\n";

pub const WRAPPER_PROPERTIES: &str = "\
distributionBase=GRADLE_USER_HOME
distributionPath=wrapper/dists
distributionUrl=$GRADLE_LOCATION
zipStoreBase=GRADLE_USER_HOME
zipStorePath=wrapper/dists
";

pub const SETTINGS_GRADLE: &str = "\
pluginManagement {
    repositories {
        $AGP_REPOSITORY
        $PLUGIN_REPOSITORIES
    }
}
dependencyResolutionManagement {
    repositories {
        $AGP_REPOSITORY
        $DEPENDENCY_REPOSITORIES
    }
}
rootProject.name = \"recipe\"
include(\":app\")
";

pub const BUILD_GRADLE: &str = "\
plugins {
    id 'com.android.application' version $AGP_VERSION apply false
    id 'org.jetbrains.kotlin.android' version $KOTLIN_VERSION apply false
}
";

pub const APP_BUILD_GRADLE_KTS: &str = "\
plugins {
    id(\"com.android.application\")
}

android {
    namespace = \"com.example.recipe\"
    compileSdk = $COMPILE_SDK
    defaultConfig {
        minSdk = $MINIMUM_SDK
    }
}
";

pub const VERSION_CATALOG: &str = "\
[versions]
agp = $AGP_VERSION
kotlin = $KOTLIN_VERSION
";

pub const MAIN_ACTIVITY: &str = "package com.example.recipe\n\nclass MainActivity\n";

/// Create a recipes root with a version mapping, a local release feed and
/// the Gradle wrapper resources.
///
/// Returns the TempDir - keep it alive to prevent cleanup.
pub fn setup_recipes_root() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("version_mappings.txt"), VERSION_MAPPINGS).unwrap();
    fs::write(root.path().join("maven-metadata.xml"), MAVEN_METADATA).unwrap();

    let resources = root.path().join("gradle-resources");
    fs::create_dir_all(resources.join("gradle/wrapper")).unwrap();
    fs::write(resources.join("gradlew"), GRADLEW).unwrap();
    fs::write(resources.join("gradlew.bat"), "@echo gradle\r\n").unwrap();
    fs::write(
        resources.join("gradle/wrapper/gradle-wrapper.properties"),
        WRAPPER_PROPERTIES,
    )
    .unwrap();
    fs::write(resources.join("gradle/wrapper/gradle-wrapper.jar"), [0xCA, 0xFE, 0xBA, 0xBE]).unwrap();

    fs::create_dir_all(root.path().join("recipes")).unwrap();
    root
}

/// Context reading the local feed of a recipes root
pub fn context(root: &Path) -> ConversionContext {
    let config = ContextConfig {
        maven_metadata: Some(root.join("maven-metadata.xml")),
        ..ContextConfig::with_root(root)
    };
    ConversionContext::load(config).unwrap()
}

/// Descriptor content for the given range and keywords
pub fn descriptor(min: &str, max: Option<&str>, keywords: &[&str]) -> String {
    let mut content = String::from("[agpVersion]\n");
    content.push_str(&format!("min = \"{}\"\n", min));
    if let Some(max) = max {
        content.push_str(&format!("max = \"{}\"\n", max));
    }
    content.push_str("\n[gradleTasks]\ntasks = [\"assembleDebug\"]\n");
    let keywords: Vec<String> = keywords.iter().map(|k| format!("\"{}\"", k)).collect();
    content.push_str(&format!("\n[indexMetadata]\nindex = [{}]\n", keywords.join(", ")));
    content
}

/// Write a recipe folder `name` under `parent` with the given descriptor
pub fn write_recipe(parent: &Path, name: &str, descriptor: &str) -> PathBuf {
    let recipe = parent.join(name);
    fs::create_dir_all(recipe.join("app/src/main/kotlin")).unwrap();
    fs::create_dir_all(recipe.join("gradle")).unwrap();

    fs::write(recipe.join("recipe_metadata.toml"), descriptor).unwrap();
    fs::write(recipe.join("settings.gradle"), SETTINGS_GRADLE).unwrap();
    fs::write(recipe.join("build.gradle"), BUILD_GRADLE).unwrap();
    fs::write(recipe.join("app/build.gradle.kts"), APP_BUILD_GRADLE_KTS).unwrap();
    fs::write(recipe.join("gradle/libs.versions.toml"), VERSION_CATALOG).unwrap();
    fs::write(recipe.join("app/src/main/kotlin/MainActivity.kt"), MAIN_ACTIVITY).unwrap();
    recipe
}

/// Add the local files an IDE or a Gradle build leaves in a recipe
pub fn add_build_leftovers(recipe: &Path) {
    fs::create_dir_all(recipe.join("build/outputs")).unwrap();
    fs::create_dir_all(recipe.join("app/build")).unwrap();
    fs::create_dir_all(recipe.join(".gradle")).unwrap();
    fs::create_dir_all(recipe.join(".idea")).unwrap();
    fs::write(recipe.join("build/outputs/app.apk"), "apk").unwrap();
    fs::write(recipe.join("app/build/classes.txt"), "classes").unwrap();
    fs::write(recipe.join(".gradle/cache"), "cache").unwrap();
    fs::write(recipe.join(".idea/workspace.xml"), "<project/>").unwrap();
    fs::write(recipe.join("local.properties"), "sdk.dir=/sdk\n").unwrap();
    fs::write(recipe.join("gradlew"), "#!/bin/sh\necho stale\n").unwrap();
}

/// Every file below `root`, keyed by relative path
pub fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
