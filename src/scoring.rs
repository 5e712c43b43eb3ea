//! Health and authority scoring.
//!
//! Page and crawl health penalize issues by severity. The authority score blends
//! five component scores, each built from probe results by the helpers below.

use crate::models::{Issue, IssueSummary, PageResult, Severity};
use chrono::{DateTime, Utc};

/// Header checklist used by the security probe
pub const SECURITY_HEADERS: [&str; 6] = [
    "strict-transport-security",
    "x-frame-options",
    "x-content-type-options",
    "content-security-policy",
    "referrer-policy",
    "permissions-policy",
];

/// Score assumed when a domain's registration date is unknown
pub const UNKNOWN_DOMAIN_AGE_SCORE: u32 = 40;

const DAYS_PER_YEAR: f64 = 365.25;

/// 100 minus the per-severity penalty of every issue, floored at 0
pub fn page_health_score(issues: &[Issue]) -> u32 {
    let penalty: u32 = issues.iter().map(|issue| issue.severity.penalty()).sum();
    100u32.saturating_sub(penalty)
}

/// Rounded mean of the page health scores, 0 for an empty crawl
pub fn overall_health_score(pages: &[PageResult]) -> u32 {
    if pages.is_empty() {
        return 0;
    }
    let total: u64 = pages.iter().map(|page| u64::from(page.health_score)).sum();
    (total as f64 / pages.len() as f64).round() as u32
}

/// Site-level health from aggregated issues; each type counts at most five pages
pub fn crawl_health_score(summaries: &[IssueSummary]) -> u32 {
    let penalty: usize = summaries
        .iter()
        .map(|summary| {
            let weight = match summary.severity {
                Severity::Critical => 20,
                Severity::Warning => 8,
                Severity::Info => 3,
            };
            weight * summary.count.min(5)
        })
        .sum();
    100usize.saturating_sub(penalty) as u32
}

pub fn security_score(present: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (present as f64 / total as f64 * 100.0).round() as u32
}

pub fn security_grade(score: u32) -> char {
    match score {
        83.. => 'A',
        66.. => 'B',
        50.. => 'C',
        33.. => 'D',
        _ => 'F',
    }
}

/// Fractional years between `created` and `now`
pub fn age_in_years(created: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created).num_seconds() as f64 / (DAYS_PER_YEAR * 24.0 * 60.0 * 60.0)
}

pub fn domain_age_score(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(created) = created else {
        return UNKNOWN_DOMAIN_AGE_SCORE;
    };
    let years = age_in_years(created, now);
    if years > 10.0 {
        100
    } else if years > 5.0 {
        80
    } else if years > 1.0 {
        60
    } else {
        UNKNOWN_DOMAIN_AGE_SCORE
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSignals {
    pub word_count: usize,
    pub h1_count: usize,
    pub heading_depth: usize,
    pub schema_detected: bool,
    pub og_tags_detected: bool,
    pub canonical_detected: bool,
}

pub fn content_score(signals: ContentSignals) -> u32 {
    let mut score = 0;

    score += match signals.word_count {
        1001.. => 25,
        501.. => 15,
        201.. => 8,
        _ => 0,
    };
    score += match signals.h1_count {
        0 => 0,
        1 => 20,
        _ => 10,
    };
    score += match signals.heading_depth {
        3.. => 15,
        2 => 8,
        _ => 0,
    };
    if signals.schema_detected {
        score += 20;
    }
    if signals.og_tags_detected {
        score += 10;
    }
    if signals.canonical_detected {
        score += 10;
    }

    score.min(100)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalSignals {
    pub performance: u32,
    pub accessibility: u32,
    pub best_practices: u32,
    pub security_score: u32,
    pub has_sitemap: bool,
    pub has_robots: bool,
    pub ttfb: Option<u64>,
    pub redirect_count: usize,
}

pub fn technical_health(signals: TechnicalSignals) -> u32 {
    let mut score = f64::from(
        signals.performance + signals.accessibility + signals.best_practices + signals.security_score,
    ) / 4.0;

    if signals.has_sitemap {
        score = (score + 4.0).min(100.0);
    }
    if signals.has_robots {
        score = (score + 2.0).min(100.0);
    }
    if let Some(ttfb) = signals.ttfb {
        if ttfb < 200 {
            score = (score + 4.0).min(100.0);
        } else if ttfb > 800 {
            score = (score - 8.0).max(0.0);
        }
    }
    if signals.redirect_count > 1 {
        score = (score - signals.redirect_count as f64 * 3.0).max(0.0);
    }

    score.round() as u32
}

/// Blends the SEO score with keyword rank; rank 1 maps to 100, rank 20 to roughly 0
pub fn search_visibility(seo: u32, avg_keyword_rank: Option<f64>) -> u32 {
    let Some(avg_rank) = avg_keyword_rank else {
        return seo;
    };
    let rank_score = (100.0 - (avg_rank - 1.0) * 5.3).round().max(0.0);
    (f64::from(seo) * 0.6 + rank_score * 0.4).round() as u32
}

pub fn brand_signals(domain_age_score: u32, schema_detected: bool, og_tags_detected: bool) -> u32 {
    let mut score = f64::from(domain_age_score) * 0.5;
    if schema_detected {
        score += 30.0;
    }
    if og_tags_detected {
        score += 20.0;
    }
    (score.round() as u32).min(100)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorityInputs {
    pub technical_health: u32,
    pub search_visibility: u32,
    pub content_depth: u32,
    pub backlink_authority: u32,
    pub brand_signals: u32,
}

pub fn authority_score(inputs: AuthorityInputs) -> u32 {
    (f64::from(inputs.technical_health) * 0.25
        + f64::from(inputs.search_visibility) * 0.25
        + f64::from(inputs.content_depth) * 0.2
        + f64::from(inputs.backlink_authority) * 0.2
        + f64::from(inputs.brand_signals) * 0.1)
        .round() as u32
}
