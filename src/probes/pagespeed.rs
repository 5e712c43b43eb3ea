use crate::models::PageSpeedScores;
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_PAGESPEED_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

const CATEGORIES: [&str; 4] = ["performance", "accessibility", "seo", "best-practices"];

/// Client for the Lighthouse-based performance scoring API
pub struct PageSpeedClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PageSpeedClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Fetches the four category scores, all zero when the provider fails
    pub async fn fetch(&self, url: &str) -> PageSpeedScores {
        match self.request(url).await {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "PageSpeed lookup failed, using zero scores");
                PageSpeedScores::default()
            }
        }
    }

    async fn request(&self, url: &str) -> Result<PageSpeedScores> {
        let mut query: Vec<(&str, &str)> = vec![("url", url), ("strategy", "mobile")];
        if let Some(key) = &self.api_key {
            query.push(("key", key.as_str()));
        }
        query.extend(CATEGORIES.iter().map(|category| ("category", *category)));

        let body: Value = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_scores(&body)
    }
}

/// Extracts 0-100 scores from a Lighthouse result; absent categories score 0
pub fn parse_scores(body: &Value) -> Result<PageSpeedScores> {
    let categories = body
        .get("lighthouseResult")
        .and_then(|result| result.get("categories"))
        .context("Response has no lighthouseResult.categories")?;

    let score = |name: &str| -> u32 {
        let raw = categories[name]["score"].as_f64().unwrap_or(0.0);
        (raw * 100.0).round() as u32
    };

    Ok(PageSpeedScores {
        performance: score("performance"),
        accessibility: score("accessibility"),
        seo: score("seo"),
        best_practices: score("best-practices"),
    })
}
