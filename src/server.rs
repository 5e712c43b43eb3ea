//! JSON HTTP API over the crawler and the authority audit.
//!
//! Routes:
//! - `POST /api/crawl` - crawl a site and return its health report
//! - `POST /api/audit` - run the single-page authority audit
//! - `POST /api/keywords` - keyword rank lookup (needs a search API key)
//! - `POST /api/competitor` - authority summary of up to three competitor sites
//! - `GET /health` - liveness check

use crate::audit::{AuditConfig, Auditor};
use crate::crawler::{Crawler, CrawlerConfig};
use crate::error::ApiError;
use crate::rate_limit::ClientRateLimiter;
use crate::store::{RecordKind, ReportStore, persist_best_effort};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared state behind every request
pub struct AppState {
    pub crawler: Crawler,
    pub auditor: Auditor,
    pub limiter: ClientRateLimiter,
    pub store: Option<Arc<dyn ReportStore>>,
}

impl AppState {
    pub fn new(
        crawler_config: CrawlerConfig,
        audit_config: &AuditConfig,
        requests_per_minute: u32,
        store: Option<Arc<dyn ReportStore>>,
    ) -> Result<Self> {
        Ok(Self {
            crawler: Crawler::new(crawler_config)?,
            auditor: Auditor::new(audit_config)?,
            limiter: ClientRateLimiter::per_minute(requests_per_minute),
            store,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CrawlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompetitorRequest {
    #[serde(default)]
    pub competitors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Registers the API routes. State must be added by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    }))
    .route("/health", web::get().to(health))
    .service(
        web::scope("/api")
            .route("/crawl", web::post().to(crawl))
            .route("/audit", web::post().to(audit))
            .route("/keywords", web::post().to(keywords))
            .route("/competitor", web::post().to(competitor)),
    );
}

/// Serves the API on `bind` until the process is stopped
pub async fn run_server(bind: &str, state: AppState) -> Result<()> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind)
        .with_context(|| format!("Failed to bind API server to {}", bind))?;

    for addr in server.addrs() {
        tracing::info!(addr = %addr, "API server listening");
    }

    server.run().await.context("API server error")
}

/// Rate-limit key: first `x-forwarded-for` entry, then the peer IP
pub fn client_key(req: &HttpRequest) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match forwarded {
        Some(client) => client.to_string(),
        None => req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

fn check_rate_limit(req: &HttpRequest, state: &AppState) -> Result<(), ApiError> {
    if state.limiter.check(&client_key(req)) {
        Ok(())
    } else {
        Err(ApiError::RateLimited)
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn crawl(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CrawlRequest>,
) -> Result<HttpResponse, ApiError> {
    check_rate_limit(&req, &state)?;
    let url = required(body.into_inner().url, "URL required")?;

    let report = state.crawler.crawl_site(&url).await.map_err(|e| {
        tracing::error!(url = %url, error = %e, "Crawl failed");
        ApiError::Upstream {
            context: "Crawl failed".to_string(),
            details: e.to_string(),
        }
    })?;

    persist_best_effort(state.store.clone(), RecordKind::Crawl, &url, &report).await;
    Ok(HttpResponse::Ok().json(report))
}

async fn audit(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<AuditRequest>,
) -> Result<HttpResponse, ApiError> {
    check_rate_limit(&req, &state)?;
    let AuditRequest { url, keywords } = body.into_inner();
    let url = required(url, "URL required")?;

    let report = state
        .auditor
        .run_full_audit(&url, &keywords)
        .await
        .map_err(|e| {
            tracing::error!(url = %url, error = %e, "Audit failed");
            ApiError::Upstream {
                context: "Audit failed".to_string(),
                details: e.to_string(),
            }
        })?;

    persist_best_effort(state.store.clone(), RecordKind::Audit, &url, &report).await;
    Ok(HttpResponse::Ok().json(report))
}

async fn keywords(
    state: web::Data<AppState>,
    body: web::Json<KeywordsRequest>,
) -> Result<HttpResponse, ApiError> {
    let KeywordsRequest { domain, keywords } = body.into_inner();
    let domain = required(domain, "domain required")?;

    let Some(serp) = state.auditor.keywords() else {
        return Err(ApiError::Unavailable {
            error: "SERPAPI_KEY not configured".to_string(),
            hint: "Set SERPAPI_KEY or serpapi_key in the config file to enable keyword tracking."
                .to_string(),
        });
    };

    let rankings = serp.fetch_rankings(&domain, &keywords).await;
    if !rankings.is_empty() {
        persist_best_effort(
            state.store.clone(),
            RecordKind::Keywords,
            &domain,
            &rankings,
        )
        .await;
    }

    Ok(HttpResponse::Ok().json(rankings))
}

async fn competitor(
    state: web::Data<AppState>,
    body: web::Json<CompetitorRequest>,
) -> Result<HttpResponse, ApiError> {
    let competitors = body
        .into_inner()
        .competitors
        .filter(|urls| !urls.is_empty())
        .ok_or_else(|| ApiError::BadRequest("competitors array required".to_string()))?;

    let results = state.auditor.run_competitor_audits(&competitors).await;
    Ok(HttpResponse::Ok().json(results))
}
