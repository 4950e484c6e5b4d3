//! Page fetching and selector-based extraction

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::domain::price::parse_price;
use crate::shared::errors::FetchError;
use crate::shared::types::Observation;

// Shop frontends serve bot-looking clients a captcha page, so present a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Capability to turn a url plus two selectors into an observation.
/// The orchestrator only sees this seam, so tests can substitute stubs
/// and a rendering backend could replace the plain HTTP one.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        name_selector: &str,
        price_selector: &str,
    ) -> Result<Observation, FetchError>;
}

/// HTTP fetcher backed by reqwest and scraper
pub struct HttpPageFetcher {
    http_client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(
        &self,
        url: &str,
        name_selector: &str,
        price_selector: &str,
    ) -> Result<Observation, FetchError> {
        let response = self
            .http_client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        extract_observation(url, &body, name_selector, price_selector)
    }
}

/// Extract the first match of each selector from the document
pub(crate) fn extract_observation(
    url: &str,
    html: &str,
    name_selector: &str,
    price_selector: &str,
) -> Result<Observation, FetchError> {
    let document = Html::parse_document(html);
    let name = select_first_text(&document, name_selector)?;
    let price_text = select_first_text(&document, price_selector)?;
    let price = parse_price(&price_text)?;
    Ok(Observation::new(url, name, price))
}

fn select_first_text(document: &Html, selector: &str) -> Result<String, FetchError> {
    let parsed =
        Selector::parse(selector).map_err(|_| FetchError::InvalidSelector(selector.to_string()))?;
    let element = document
        .select(&parsed)
        .next()
        .ok_or_else(|| FetchError::NoMatch(selector.to_string()))?;
    let text: String = element.text().collect::<Vec<_>>().join(" ");
    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}
