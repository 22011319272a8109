use super::config::{ID_PLACEHOLDER, ProviderConfig, QUERY_PLACEHOLDER};
use crate::Result;
use crate::fetch::Fetcher;
use std::sync::Arc;

const ARCHIVE_FLAG: &str = "Archives";

/// Builds federation URLs from the configured templates and fetches pages.
pub struct FfdanseClient {
    config: ProviderConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl FfdanseClient {
    pub fn new(config: ProviderConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Results listing; past seasons live behind the `?Archives` variant.
    pub fn listing_url(&self, archive: bool) -> String {
        let url = self.config.endpoint(&self.config.list);
        if !archive {
            return url;
        }
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", url, separator, ARCHIVE_FLAG)
    }

    pub fn clubs_url(&self) -> String {
        self.config.endpoint(&self.config.clubs)
    }

    pub fn couples_url(&self, club_id: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(club_id.as_bytes()).collect();
        self.config
            .endpoint(&self.config.couples.replace(ID_PLACEHOLDER, &encoded))
    }

    /// Name search; the site matches on upper-cased surnames.
    pub fn search_url(&self, query: &str) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(query.trim().to_uppercase().as_bytes()).collect();
        self.config
            .endpoint(&self.config.search.replace(QUERY_PLACEHOLDER, &encoded))
    }

    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        let page = self.fetcher.fetch(url).await?;
        Ok(page.html())
    }
}
