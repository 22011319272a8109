use crate::{ImporterError, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("results_importer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Raw response body plus the declared content type.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchedPage {
    pub fn html(&self) -> String {
        decode_html(&self.bytes, self.content_type.as_deref())
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        tracing::info!("Fetching HTML from: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ImporterError::HttpStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);

        Ok(FetchedPage {
            url: url.to_string(),
            bytes,
            content_type,
        })
    }
}

/// Decodes a page body: BOM first, then the Content-Type charset, then
/// UTF-8 when the bytes are valid, and windows-1252 otherwise.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        let (text, _, _) = encoding.decode(bytes);
        return text.into_owned();
    }

    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        let (text, _) = encoding.decode_without_bom_handling(bytes);
        return text.into_owned();
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        key.eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches(&[' ', '"', '\''][..]).to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_utf8() {
        assert_eq!(decode_html("Épinal".as_bytes(), None), "Épinal");
    }

    #[test]
    fn test_falls_back_to_windows_1252() {
        // "Épinal" in Latin-1
        let bytes = [0xC9, b'p', b'i', b'n', b'a', b'l'];
        assert_eq!(decode_html(&bytes, None), "Épinal");
    }

    #[test]
    fn test_honours_declared_charset() {
        let bytes = [b'C', 0xF4, b't', 0xE9];
        assert_eq!(
            decode_html(&bytes, Some("text/html; charset=ISO-8859-1")),
            "Côté"
        );
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; Charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }
}
