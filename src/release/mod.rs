// src/release/mod.rs

//! Published AGP releases
//!
//! Resolves `major.minor` versions to the latest release published in the
//! maven feed, either from a local `maven-metadata.xml` or by downloading it.

mod client;
pub mod feed;

pub use client::{AGP_MAVEN_METADATA_URL, MetadataClient};
pub use feed::{find_latest_version, find_latest_versions, published_versions};
