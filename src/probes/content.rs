use crate::html::{
    CANONICAL_SELECTOR, CONTENT_STRIPPED_TAGS, H1_SELECTOR, HEADING_SELECTORS, IMG_SELECTOR,
    META_DESC_SELECTOR, OG_SELECTOR, SCHEMA_SELECTOR, TITLE_SELECTOR, count_words, element_text,
    select_content, visible_text,
};
use crate::models::ContentReport;
use crate::scoring::{ContentSignals, content_score};
use reqwest::Client;
use scraper::Html;

/// Fetches one page and reports its on-page content signals.
/// Non-2xx responses and network failures yield the default (empty) report.
pub async fn fetch_content(client: &Client, url: &str) -> ContentReport {
    match fetch_html(client, url).await {
        Ok(html) => analyze_content(&html),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Content probe failed");
            ContentReport::default()
        }
    }
}

async fn fetch_html(client: &Client, url: &str) -> reqwest::Result<String> {
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

pub fn analyze_content(html: &str) -> ContentReport {
    let document = Html::parse_document(html);
    let stripped = CONTENT_STRIPPED_TAGS;

    let title = select_content(&document, &TITLE_SELECTOR, stripped)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();
    let meta_description = select_content(&document, &META_DESC_SELECTOR, stripped)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string();
    let h1_count = select_content(&document, &H1_SELECTOR, stripped).count();
    let image_without_alt = select_content(&document, &IMG_SELECTOR, stripped)
        .filter(|img| img.value().attr("alt").is_none())
        .count();
    let word_count = count_words(&visible_text(&document, stripped));

    // Deepest heading level in use, 0 when there are none
    let heading_depth = HEADING_SELECTORS
        .iter()
        .enumerate()
        .filter(|(_, selector)| select_content(&document, selector, stripped).next().is_some())
        .map(|(level, _)| level + 1)
        .max()
        .unwrap_or(0);

    // Structured data lives in script tags, so it is checked on the full document
    let schema_detected = document.select(&SCHEMA_SELECTOR).next().is_some();
    let og_tags_detected = document.select(&OG_SELECTOR).next().is_some();
    let canonical_detected = document.select(&CANONICAL_SELECTOR).next().is_some();

    let content_score = content_score(ContentSignals {
        word_count,
        h1_count,
        heading_depth,
        schema_detected,
        og_tags_detected,
        canonical_detected,
    });

    ContentReport {
        title,
        meta_description,
        h1_count,
        image_without_alt,
        word_count,
        heading_depth,
        schema_detected,
        og_tags_detected,
        canonical_detected,
        content_score,
    }
}
