use crate::{ImporterError, Result};
use serde::Deserialize;

pub const ID_PLACEHOLDER: &str = "{id}";
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Endpoints and parsing options for the federation site.
///
/// Paths are relative to `url`. `details` and `couples` take an `{id}`
/// placeholder, `search` takes `{query}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub url: String,
    pub list: String,
    pub details: String,
    pub clubs: String,
    pub couples: String,
    pub search: String,
    pub date_format: String,
    pub name: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: "https://www.ffdanse.fr".to_string(),
            list: "/competitions/resultats.php".to_string(),
            details: "/competitions/resultats.php?NumManif={id}".to_string(),
            clubs: "/clubs/annuaire.php".to_string(),
            couples: "/clubs/couples.php?NumClub={id}".to_string(),
            search: "/couples/recherche.php?Nom={query}".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            name: "FFDanse".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Defaults, overridden field by field from `FFDANSE_*` variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let overrides: [(&str, &mut String); 8] = [
            ("FFDANSE_URL", &mut config.url),
            ("FFDANSE_LIST", &mut config.list),
            ("FFDANSE_DETAILS", &mut config.details),
            ("FFDANSE_CLUBS", &mut config.clubs),
            ("FFDANSE_COUPLES", &mut config.couples),
            ("FFDANSE_SEARCH", &mut config.search),
            ("FFDANSE_DATE_FORMAT", &mut config.date_format),
            ("FFDANSE_NAME", &mut config.name),
        ];

        for (key, field) in overrides {
            if let Ok(value) = std::env::var(key) {
                *field = value;
            }
        }

        config
    }

    /// Absolute URL of `path` on the configured site.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let required = [
            ("url", &self.url),
            ("list", &self.list),
            ("details", &self.details),
            ("clubs", &self.clubs),
            ("couples", &self.couples),
            ("search", &self.search),
            ("dateFormat", &self.date_format),
            ("name", &self.name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(format!("'{}' is required", field));
            }
        }

        if !self.url.trim().is_empty() {
            match url::Url::parse(&self.url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => errors.push(format!(
                    "'url' must use http or https, got '{}'",
                    parsed.scheme()
                )),
                Err(e) => errors.push(format!("'url' is not a valid URL: {}", e)),
            }
        }

        for (field, template, placeholder) in [
            ("details", &self.details, ID_PLACEHOLDER),
            ("couples", &self.couples, ID_PLACEHOLDER),
            ("search", &self.search, QUERY_PLACEHOLDER),
        ] {
            if !template.trim().is_empty() && !template.contains(placeholder) {
                errors.push(format!("'{}' must contain {}", field, placeholder));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ImporterError::Configuration(format!(
                "{} invalid option(s): {}",
                errors.len(),
                errors.join("; ")
            )))
        }
    }
}
