// src/convert/index.rs

//! Markdown index of converted recipes
//!
//! Recipes list keywords as `category/keyword` (or bare `keyword`, filed
//! under `Others`). The index groups recipes by category, then keyword.

use crate::error::{Error, Result};
use crate::recipe::{split_keyword, RecipeDescriptor};
use crate::version::ReleaseVersion;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::warn;

/// File name of the generated index
pub const INDEX_FILE: &str = "README.md";

/// Categories listed first, in this order; the rest follow alphabetically
const THEME_ORDER: &[&str] = &["Themes", "APIs", "Call chains"];

const LICENSE_FOOTER: &str = r#"# License
```
Copyright 2022 The Android Open Source Project

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    https://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
```
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexLink {
    title: String,
    link: String,
}

/// Keywords of converted recipes, accumulated over one batch
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    categories: BTreeMap<String, BTreeMap<String, Vec<IndexLink>>>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every keyword of a converted recipe, linking to its
    /// destination folder
    pub fn add(&mut self, descriptor: &RecipeDescriptor) {
        for keyword in &descriptor.keywords {
            let Some((category, name)) = split_keyword(keyword) else {
                warn!(
                    "Ignoring index entry '{}' of {}: more than one '/'",
                    keyword, descriptor.folder_name
                );
                continue;
            };

            self.categories
                .entry(category.to_string())
                .or_default()
                .entry(name.to_string())
                .or_default()
                .push(IndexLink {
                    title: descriptor.index_name.clone(),
                    link: descriptor.destination_folder.clone(),
                });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in rendering order
    pub fn categories(&self) -> Vec<&str> {
        let known = THEME_ORDER
            .iter()
            .copied()
            .filter(|c| self.categories.contains_key(*c));
        let others = self
            .categories
            .keys()
            .map(String::as_str)
            .filter(|c| !THEME_ORDER.contains(c));
        known.chain(others).collect()
    }

    /// Render the index; `target` names the release in the header
    pub fn render(&self, target: Option<&ReleaseVersion>) -> String {
        let mut out = String::new();

        match target {
            Some(version) => {
                let _ = writeln!(out, "# Recipes for AGP version `{version}`");
                let _ = writeln!(
                    out,
                    "This branch contains recipes compatible with AGP {version}. If you want to find recipes"
                );
                out.push_str("for other AGP versions, switch to the corresponding `agp-*` branch.\n\n");
                out.push_str(
                    "This branch is read only. Contributions are only accepted on the `studio-main` branch. See `CONTRIBUTION.md`\n",
                );
                out.push_str("there.\n");
            }
            None => out.push_str("# Recipes\n"),
        }

        out.push_str("# Recipes Index\n");
        out.push_str(
            "Index is organized in categories, offering different ways to reach the recipe you want.\n",
        );

        for category in self.categories() {
            let Some(keywords) = self.categories.get(category) else {
                continue;
            };
            let _ = writeln!(out, "## {category}");
            for (keyword, links) in keywords {
                let links: Vec<String> = links
                    .iter()
                    .map(|l| format!("[{}]({})", l.title, l.link))
                    .collect();
                let _ = writeln!(out, "* {keyword} - {}", links.join(", "));
            }
        }

        out.push_str(LICENSE_FOOTER);
        out
    }

    /// Write the rendered index as `README.md` in `destination`
    pub fn write(&self, destination: &Path, target: Option<&ReleaseVersion>) -> Result<()> {
        let path = destination.join(INDEX_FILE);
        std::fs::write(&path, self.render(target)).map_err(|e| Error::io(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(folder: &str, title: &str, keywords: &[&str]) -> RecipeDescriptor {
        RecipeDescriptor {
            folder_name: folder.to_string(),
            index_name: title.to_string(),
            destination_folder: folder.to_string(),
            min_version: ReleaseVersion::new(8, 1, 0),
            max_version: None,
            tasks: Vec::new(),
            validation_tasks: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn sample() -> KeywordIndex {
        let mut index = KeywordIndex::new();
        index.add(&recipe("a", "Recipe A", &["Themes/Sources", "APIs/onVariants", "zeta"]));
        index.add(&recipe("b", "Recipe B", &["APIs/onVariants", "Call chains/x", "Build/y"]));
        index
    }

    #[test]
    fn test_category_order() {
        assert_eq!(
            sample().categories(),
            vec!["Themes", "APIs", "Call chains", "Build", "Others"]
        );
    }

    #[test]
    fn test_render() {
        let rendered = sample().render(Some(&ReleaseVersion::new(8, 1, 0)));

        assert!(rendered.starts_with("# Recipes for AGP version `8.1.0`\n"));
        assert!(rendered.contains("## APIs\n* onVariants - [Recipe A](a), [Recipe B](b)\n"));
        assert!(rendered.contains("## Others\n* zeta - [Recipe A](a)\n"));
        assert!(rendered.ends_with("```\n"));

        let themes = rendered.find("## Themes").unwrap();
        let apis = rendered.find("## APIs").unwrap();
        let build = rendered.find("## Build").unwrap();
        assert!(themes < apis && apis < build);
    }

    #[test]
    fn test_keywords_sorted_within_category() {
        let mut index = KeywordIndex::new();
        index.add(&recipe("a", "A", &["Themes/zz", "Themes/aa"]));
        let rendered = index.render(None);
        assert!(rendered.starts_with("# Recipes\n"));
        assert!(rendered.find("* aa").unwrap() < rendered.find("* zz").unwrap());
    }

    #[test]
    fn test_empty_index() {
        let index = KeywordIndex::new();
        assert!(index.is_empty());
        assert!(!index.render(None).contains("## "));
    }
}
