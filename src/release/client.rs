// src/release/client.rs

//! HTTP client for the AGP release metadata feed
//!
//! Wraps a blocking reqwest client with retry support.

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Location of the AGP artifact metadata in Google's maven repository
pub const AGP_MAVEN_METADATA_URL: &str =
    "https://dl.google.com/dl/android/maven2/com/android/tools/build/gradle/maven-metadata.xml";

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts for failed downloads
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Downloads the release metadata feed
pub struct MetadataClient {
    client: Client,
    max_retries: u32,
}

impl MetadataClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::DownloadFailure(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Fetch the AGP metadata feed from Google's maven repository
    pub fn fetch_agp_metadata(&self) -> Result<String> {
        self.fetch(AGP_MAVEN_METADATA_URL)
    }

    /// Fetch a document as text, retrying transport errors
    pub fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching release metadata from {}", url);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url).send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        return Err(Error::DownloadFailure(format!(
                            "HTTP {} from {}",
                            response.status(),
                            url
                        )));
                    }

                    return response.text().map_err(|e| {
                        Error::DownloadFailure(format!("Failed to read response from {url}: {e}"))
                    });
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::DownloadFailure(format!(
                            "Failed to fetch {url} after {attempt} attempts: {e}"
                        )));
                    }
                    warn!("Attempt {} to fetch {} failed: {}, retrying", attempt, url, e);
                    thread::sleep(Duration::from_millis(RETRY_DELAY_MS));
                }
            }
        }
    }
}
