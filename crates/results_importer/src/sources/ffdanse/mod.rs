mod client;
mod config;
mod extract;

pub use client::FfdanseClient;
pub use config::ProviderConfig;
pub use extract::{
    clean_place, extract_clubs, extract_header, extract_headers, extract_names, extract_ranking,
    extract_ranking_links, repair_markup,
};

use crate::canonical::{ClubGroup, Competition};
use crate::fetch::{FetchSettings, Fetcher, HttpFetcher};
use crate::merge::merge_competitions;
use crate::runner::map_serial;
use crate::season::season_of;
use crate::{ImporterError, Result, traits::ResultsProvider};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Tag stored on every competition read from the federation site.
pub const PROVIDER_TAG: &str = "ffdanse";

#[derive(Default)]
struct ProviderState {
    groups: Vec<ClubGroup>,
}

/// Results provider for the French dance sport federation's public pages.
///
/// Every operation holds the instance state lock for its whole duration,
/// so calls into one provider never overlap on the network, even when made
/// from several tasks.
pub struct FfdanseProvider {
    client: FfdanseClient,
    state: Mutex<ProviderState>,
}

impl FfdanseProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(FetchSettings::default())?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    pub fn with_fetcher(config: ProviderConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: FfdanseClient::new(config, fetcher),
            state: Mutex::new(ProviderState::default()),
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        self.client.config()
    }

    /// Season `year` results as seen on `today`. The archive listing is used
    /// whenever `year` is not the season containing `today`.
    pub async fn list_results_at(&self, year: i32, today: NaiveDate) -> Result<Vec<Competition>> {
        let _queue = self.state.lock().await;
        self.fetch_results(year, today)
            .await
            .map_err(|e| e.within("list results", self.name(), format!("for season {}", year)))
    }

    /// Drops the cached club directory; the next group lookup refetches it.
    pub async fn reset_groups(&self) {
        self.state.lock().await.groups.clear();
    }

    async fn fetch_results(&self, year: i32, today: NaiveDate) -> Result<Vec<Competition>> {
        let archive = year != season_of(today);
        let url = self.client.listing_url(archive);
        info!("Listing season {} results (archive: {})", year, archive);

        let body = self.client.fetch_html(&url).await?;
        let candidates = extract_headers(&body, self.config(), year)?;
        let competitions = merge_competitions(candidates);

        info!("Found {} competition(s) for season {}", competitions.len(), year);
        Ok(competitions)
    }

    async fn fetch_details(&self, mut competition: Competition) -> Result<Competition> {
        let pages = map_serial(competition.data_urls.clone(), |url| async move {
            let body = self.client.fetch_html(&url).await?;
            extract_ranking_links(&body, &url)
        })
        .await?;

        let mut ranking_urls: Vec<String> = Vec::new();
        for url in pages.into_iter().flatten() {
            if !ranking_urls.contains(&url) {
                ranking_urls.push(url);
            }
        }

        if ranking_urls.is_empty() {
            warn!(
                "No ranking pages found for {} on {}",
                competition.place, competition.date
            );
            competition.contests = Vec::new();
            return Ok(competition);
        }

        info!(
            "Fetching {} ranking page(s) for {} on {}",
            ranking_urls.len(),
            competition.place,
            competition.date
        );
        competition.contests = map_serial(ranking_urls, |url| async move {
            let body = self.client.fetch_html(&url).await?;
            extract_ranking(&body)
        })
        .await?;

        Ok(competition)
    }

    async fn ensure_groups<'a>(&self, state: &'a mut ProviderState) -> Result<&'a [ClubGroup]> {
        if state.groups.is_empty() {
            let body = self.client.fetch_html(&self.client.clubs_url()).await?;
            state.groups = extract_clubs(&body)?;
            info!("Cached {} club(s)", state.groups.len());
        }
        Ok(&state.groups)
    }

    async fn fetch_group_couples(&self, state: &mut ProviderState, group: &str) -> Result<Vec<String>> {
        let wanted = group.trim().to_lowercase();
        let club_id = self
            .ensure_groups(state)
            .await?
            .iter()
            .find(|club| club.name.to_lowercase() == wanted)
            .map(|club| club.id.clone())
            .ok_or_else(|| ImporterError::GroupNotFound(group.to_string()))?;

        let body = self.client.fetch_html(&self.client.couples_url(&club_id)).await?;
        extract_names(&body)
    }

    async fn fetch_couples(&self, query: &str) -> Result<Vec<String>> {
        let body = self.client.fetch_html(&self.client.search_url(query)).await?;
        extract_names(&body)
    }
}

#[async_trait::async_trait]
impl ResultsProvider for FfdanseProvider {
    async fn list_results(&self, year: i32) -> Result<Vec<Competition>> {
        self.list_results_at(year, chrono::Local::now().date_naive())
            .await
    }

    async fn get_details(&self, competition: Competition) -> Result<Competition> {
        let _queue = self.state.lock().await;
        let context = format!("for {} on {}", competition.place, competition.date);
        self.fetch_details(competition)
            .await
            .map_err(|e| e.within("get details", self.name(), context))
    }

    async fn search_groups(&self, query: &str) -> Result<Vec<String>> {
        let mut state = self.state.lock().await;
        let needle = query.trim().to_lowercase();

        let groups = self
            .ensure_groups(&mut state)
            .await
            .map_err(|e| e.within("search groups", self.name(), format!("matching '{}'", query)))?;

        Ok(groups
            .iter()
            .filter(|club| club.name.to_lowercase().contains(&needle))
            .map(|club| club.name.clone())
            .collect())
    }

    async fn get_group_couples(&self, group: &str) -> Result<Vec<String>> {
        let mut state = self.state.lock().await;
        self.fetch_group_couples(&mut state, group)
            .await
            .map_err(|e| e.within("get couples", self.name(), format!("for group '{}'", group)))
    }

    async fn search_couples(&self, query: &str) -> Result<Vec<String>> {
        let _queue = self.state.lock().await;
        self.fetch_couples(query)
            .await
            .map_err(|e| e.within("search couples", self.name(), format!("matching '{}'", query)))
    }

    fn name(&self) -> &str {
        &self.config().name
    }
}
