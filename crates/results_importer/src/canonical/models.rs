use crate::normalize::text::slugify;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Display string for a couple the federation did not identify.
pub const UNKNOWN_COUPLE: &str = "couple inconnu";

/// A single event occurrence, identified by where and when it took place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub provider: String,
    pub place: String,
    pub date: NaiveDate,
    pub data_urls: Vec<String>,
    #[serde(default)]
    pub contests: Vec<Contest>,
}

impl Competition {
    pub fn new(
        provider: impl Into<String>,
        place: impl Into<String>,
        date: NaiveDate,
        data_url: impl Into<String>,
    ) -> Self {
        let place = place.into();
        Self {
            id: competition_id(&place, date),
            provider: provider.into(),
            place,
            date,
            data_urls: vec![data_url.into()],
            contests: Vec::new(),
        }
    }

    /// Adds a detail URL unless it is already known.
    pub fn add_data_url(&mut self, url: &str) {
        if !self.data_urls.iter().any(|known| known == url) {
            self.data_urls.push(url.to_string());
        }
    }
}

/// One ranked event within a competition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contest {
    pub title: String,
    pub results: BTreeMap<String, u32>,
}

impl Contest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            results: BTreeMap::new(),
        }
    }

    /// Records `rank` for `couple` unless the couple already has one.
    /// Returns whether the rank was stored.
    pub fn record(&mut self, couple: String, rank: u32) -> bool {
        match self.results.entry(couple) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(rank);
                true
            }
        }
    }
}

/// Club directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubGroup {
    pub id: String,
    pub name: String,
}

/// Content hash of the slugified place and the `YYYYMMDD` date.
///
/// Independent of the detail URL or fetch order, so listings of the same
/// physical competition always collide.
pub fn competition_id(place: &str, date: NaiveDate) -> String {
    let mut hasher = Sha256::new();
    hasher.update(slugify(place).as_bytes());
    hasher.update(date.format("%Y%m%d").to_string().as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
