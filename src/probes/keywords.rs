use crate::models::KeywordRank;
use anyhow::Result;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_SERP_ENDPOINT: &str = "https://serpapi.com/search";
/// Keywords checked per request; extra keywords are ignored
pub const MAX_KEYWORDS: usize = 20;

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    link: String,
}

/// Search-results client used to find where a domain ranks for keywords
pub struct SerpClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SerpClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Looks up every keyword concurrently; keywords whose lookup fails are left out
    pub async fn fetch_rankings(&self, domain: &str, keywords: &[String]) -> Vec<KeywordRank> {
        let lookups = keywords
            .iter()
            .take(MAX_KEYWORDS)
            .map(|keyword| self.fetch_one(domain, keyword));

        join_all(lookups)
            .await
            .into_iter()
            .zip(keywords)
            .filter_map(|(result, keyword)| match result {
                Ok(rank) => Some(rank),
                Err(e) => {
                    tracing::warn!(keyword = %keyword, error = %e, "Keyword lookup failed");
                    None
                }
            })
            .collect()
    }

    async fn fetch_one(&self, domain: &str, keyword: &str) -> Result<KeywordRank> {
        let response: SerpResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", keyword),
                ("api_key", self.api_key.as_str()),
                ("engine", "google"),
                ("num", "100"),
                ("gl", "us"),
                ("hl", "en"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let links: Vec<String> = response
            .organic_results
            .into_iter()
            .map(|result| result.link)
            .collect();
        let found = find_rank(domain, &links);

        Ok(KeywordRank {
            keyword: keyword.to_string(),
            rank: found.map(|(rank, _)| rank),
            url: found.map(|(_, link)| link.to_string()),
            checked_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// 1-based position of the first result linking to `domain`
pub fn find_rank<'a>(domain: &str, links: &'a [String]) -> Option<(usize, &'a str)> {
    links
        .iter()
        .position(|link| link.contains(domain))
        .map(|i| (i + 1, links[i].as_str()))
}

/// Mean rank over the keywords that ranked at all
pub fn average_rank(rankings: &[KeywordRank]) -> Option<f64> {
    let ranked: Vec<usize> = rankings.iter().filter_map(|r| r.rank).collect();
    if ranked.is_empty() {
        return None;
    }
    Some(ranked.iter().sum::<usize>() as f64 / ranked.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(keyword: &str, rank: Option<usize>) -> KeywordRank {
        KeywordRank {
            keyword: keyword.to_string(),
            rank,
            url: None,
            checked_at: String::new(),
        }
    }

    #[test]
    fn test_find_rank_is_one_based() {
        let links = vec![
            "https://other.com/".to_string(),
            "https://blog.example.com/post".to_string(),
            "https://example.com/".to_string(),
        ];
        assert_eq!(
            find_rank("example.com", &links),
            Some((2, "https://blog.example.com/post"))
        );
        assert_eq!(find_rank("missing.org", &links), None);
    }

    #[test]
    fn test_average_rank_ignores_unranked() {
        assert_eq!(average_rank(&[]), None);
        assert_eq!(average_rank(&[rank("a", None)]), None);
        assert_eq!(
            average_rank(&[rank("a", Some(2)), rank("b", None), rank("c", Some(5))]),
            Some(3.5)
        );
    }
}
