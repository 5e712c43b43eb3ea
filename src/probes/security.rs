use crate::models::SecurityReport;
use crate::scoring::{SECURITY_HEADERS, security_grade, security_score};
use reqwest::Client;
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;

/// Checks which of the tracked security headers the site sends.
/// Any status code is accepted; only a failed request yields the empty report.
pub async fn fetch_security(client: &Client, url: &str) -> SecurityReport {
    match client.get(url).send().await {
        Ok(response) => security_report(response.headers()),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Security header probe failed");
            security_report(&HeaderMap::new())
        }
    }
}

pub fn security_report(headers: &HeaderMap) -> SecurityReport {
    let found: BTreeMap<String, String> = SECURITY_HEADERS
        .iter()
        .filter_map(|name| {
            let value = headers.get(*name)?.to_str().ok()?;
            (!value.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect();

    let score = security_score(found.len(), SECURITY_HEADERS.len());

    SecurityReport {
        present_count: found.len(),
        total_checks: SECURITY_HEADERS.len(),
        headers: found,
        score,
        grade: security_grade(score),
    }
}
