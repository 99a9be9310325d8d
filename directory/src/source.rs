//! Fetching directory documents.

use fleet_types::DirectoryEntry;
use std::time::Duration;

use crate::parser::{parse_directory, DirectoryKind};
use crate::DirectoryError;

/// Default location of the published directory documents; `{feature}` selects the branch.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/alastria/alastria-node/feature/{feature}";

const VALIDATOR_DOCUMENT: &str = "DIRECTORY_VALIDATOR.md";
const REGULAR_DOCUMENT: &str = "DIRECTORY_REGULAR.md";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Yields the fleet's directory entries, validators before regular nodes.
#[allow(async_fn_in_trait)]
pub trait DirectoryAdapter {
    async fn entries(&self) -> Result<Vec<DirectoryEntry>, DirectoryError>;
}

/// Where the two directory documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUrls {
    pub validators: String,
    pub regulars: String,
}

impl DirectoryUrls {
    /// Build both URLs from a base template containing `{feature}`.
    pub fn for_feature(base_url: &str, feature: &str) -> Self {
        let base = base_url.replace("{feature}", feature);
        let base = base.trim_end_matches('/');
        Self {
            validators: format!("{base}/{VALIDATOR_DOCUMENT}"),
            regulars: format!("{base}/{REGULAR_DOCUMENT}"),
        }
    }
}

/// [`DirectoryAdapter`] reading the markdown registries over HTTPS.
pub struct MarkdownDirectory {
    http: reqwest::Client,
    urls: DirectoryUrls,
}

impl MarkdownDirectory {
    pub fn new(urls: DirectoryUrls) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| DirectoryError::Client(e.to_string()))?;
        Ok(Self { http, urls })
    }

    pub fn urls(&self) -> &DirectoryUrls {
        &self.urls
    }

    async fn fetch(&self, url: &str) -> Result<String, DirectoryError> {
        let fetch_err = |reason: String| DirectoryError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP status {}", response.status())));
        }
        response.text().await.map_err(|e| fetch_err(e.to_string()))
    }
}

impl DirectoryAdapter for MarkdownDirectory {
    async fn entries(&self) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        let validators = parse_directory(
            &self.fetch(&self.urls.validators).await?,
            DirectoryKind::Validator,
        );
        if validators.is_empty() {
            return Err(DirectoryError::Empty(self.urls.validators.clone()));
        }
        let regulars = parse_directory(
            &self.fetch(&self.urls.regulars).await?,
            DirectoryKind::Regular,
        );
        tracing::info!(
            validators = validators.len(),
            regulars = regulars.len(),
            "directory loaded"
        );

        let mut entries = validators;
        entries.extend(regulars);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_substitute_feature_branch() {
        let urls = DirectoryUrls::for_feature(DEFAULT_BASE_URL, "ibft");
        assert_eq!(
            urls.validators,
            "https://raw.githubusercontent.com/alastria/alastria-node/feature/ibft/DIRECTORY_VALIDATOR.md"
        );
        assert!(urls.regulars.ends_with("/feature/ibft/DIRECTORY_REGULAR.md"));
    }

    #[test]
    fn urls_tolerate_trailing_slash() {
        let urls = DirectoryUrls::for_feature("http://mirror.local/dir/", "x");
        assert_eq!(urls.validators, "http://mirror.local/dir/DIRECTORY_VALIDATOR.md");
    }

    #[test]
    fn client_keeps_configured_urls() {
        let urls = DirectoryUrls::for_feature("http://mirror.local", "ibft");
        let dir = MarkdownDirectory::new(urls.clone()).unwrap();
        assert_eq!(dir.urls(), &urls);
    }

    #[tokio::test]
    async fn unreachable_document_is_a_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let dir = MarkdownDirectory::new(DirectoryUrls::for_feature(
            &format!("http://127.0.0.1:{port}"),
            "ibft",
        ))
        .unwrap();
        let err = dir.entries().await.unwrap_err();
        assert!(matches!(err, DirectoryError::Fetch { .. }));
    }
}
