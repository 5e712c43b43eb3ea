use anyhow::Result;
use reqwest::{Client, ClientBuilder, header, redirect};
use std::time::Duration;

/// Identifying user agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; AuditBot/1.0)";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Creates a reqwest client with the audit headers, a request timeout and a redirect cap.
/// A `max_redirects` of 0 disables redirect following entirely.
pub fn build_http_client(timeout_secs: u64, max_redirects: usize) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );

    let policy = if max_redirects == 0 {
        redirect::Policy::none()
    } else {
        redirect::Policy::limited(max_redirects)
    };

    let client = ClientBuilder::new()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(policy)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;

    Ok(client)
}
