use crate::Result;
use crate::canonical::Competition;

/// Capabilities every federation results provider offers to the viewer.
#[async_trait::async_trait]
pub trait ResultsProvider: Send + Sync {
    /// Competitions of the season starting in `year`, deduplicated.
    async fn list_results(&self, year: i32) -> Result<Vec<Competition>>;

    /// Fills in the contests of a competition returned by `list_results`.
    async fn get_details(&self, competition: Competition) -> Result<Competition>;

    /// Club names containing `query`, case-insensitively. An empty query matches all.
    async fn search_groups(&self, query: &str) -> Result<Vec<String>>;

    async fn get_group_couples(&self, group: &str) -> Result<Vec<String>>;

    async fn search_couples(&self, query: &str) -> Result<Vec<String>>;

    fn name(&self) -> &str;
}
