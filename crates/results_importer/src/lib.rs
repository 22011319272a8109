pub mod canonical;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod normalize;
pub mod runner;
pub mod season;
pub mod sources;
pub mod traits;

pub use canonical::{ClubGroup, Competition, Contest};
pub use error::{ImporterError, Result};
pub use fetch::{FetchSettings, FetchedPage, Fetcher, HttpFetcher};
pub use traits::ResultsProvider;

pub use sources::ffdanse::{FfdanseProvider, ProviderConfig as FfdanseConfig};
