use crate::models::DomainAge;
use crate::scoring::{age_in_years, domain_age_score};
use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_RDAP_ENDPOINT: &str = "https://rdap.org/domain";

#[derive(Debug, Deserialize)]
struct RdapResponse {
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    event_action: String,
    #[serde(rename = "eventDate")]
    event_date: Option<String>,
}

/// Looks up domain registration dates over RDAP
pub struct RdapClient {
    client: Client,
    endpoint: String,
}

impl RdapClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn lookup(&self, domain: &str) -> DomainAge {
        let domain = domain.strip_prefix("www.").unwrap_or(domain);

        match self.registration_date(domain).await {
            Ok(created) => domain_age(domain, created, Utc::now()),
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "RDAP lookup failed");
                domain_age(domain, None, Utc::now())
            }
        }
    }

    async fn registration_date(&self, domain: &str) -> Result<Option<String>> {
        let response: RdapResponse = self
            .client
            .get(format!("{}/{}", self.endpoint, domain))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .events
            .into_iter()
            .find(|event| event.event_action == "registration")
            .and_then(|event| event.event_date))
    }
}

/// Builds the age report from a raw registration date string
pub fn domain_age(domain: &str, created_date: Option<String>, now: DateTime<Utc>) -> DomainAge {
    let created = created_date
        .as_deref()
        .and_then(|date| DateTime::parse_from_rfc3339(date).ok())
        .map(|date| date.with_timezone(&Utc));

    DomainAge {
        domain: domain.to_string(),
        age_years: created.map(|created| (age_in_years(created, now) * 10.0).round() / 10.0),
        domain_age_score: domain_age_score(created, now),
        created_date,
    }
}
