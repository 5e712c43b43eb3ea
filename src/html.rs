use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Elements whose subtree is not page content when analyzing crawled pages
pub const CRAWL_STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer"];

/// Elements whose subtree is not page content for the single-page content probe
pub const CONTENT_STRIPPED_TAGS: &[&str] =
    &["script", "style", "nav", "footer", "header", "noscript"];

// Cached selectors to avoid repeated parsing and eliminate unwrap() calls
pub static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
pub static META_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='description']").expect("meta description selector should be valid")
});
pub static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("h1 selector should be valid"));
pub static CANONICAL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("link[rel='canonical']").expect("canonical selector should be valid")
});
pub static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));
pub static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));
pub static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
pub static SCHEMA_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script[type='application/ld+json']")
        .expect("json-ld selector should be valid")
});
pub static OG_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property^='og:']").expect("open graph selector should be valid")
});
pub static HEADING_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["h1", "h2", "h3", "h4", "h5", "h6"]
        .iter()
        .map(|tag| Selector::parse(tag).expect("heading selector should be valid"))
        .collect()
});

/// True when neither the element nor any of its ancestors is one of `stripped`
pub fn is_content(element: &ElementRef, stripped: &[&str]) -> bool {
    !stripped.contains(&element.value().name())
        && !element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| stripped.contains(&ancestor.value().name()))
}

/// Selects the elements matching `selector` that are page content
pub fn select_content<'a>(
    document: &'a Html,
    selector: &'a Selector,
    stripped: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    document
        .select(selector)
        .filter(move |element| is_content(element, stripped))
}

/// Concatenated text of the document body, skipping stripped subtrees
pub fn visible_text(document: &Html, stripped: &[&str]) -> String {
    let mut text = String::new();

    if let Some(body) = document.select(&BODY_SELECTOR).next() {
        for node in body.descendants() {
            if let Some(fragment) = node.value().as_text() {
                let hidden = node
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|ancestor| stripped.contains(&ancestor.value().name()));
                if !hidden {
                    text.push_str(fragment);
                }
            }
        }
    }

    text
}

/// Counts whitespace-separated tokens longer than two characters
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .count()
}

pub fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
