use crate::models::{IssueSummary, PageResult};
use std::collections::HashMap;

/// Merges every page's issues into one summary per issue type.
///
/// Severity and message come from the first occurrence. The result is sorted by
/// severity (critical first), then by descending count; ties keep first-seen order.
pub fn summarize_issues(pages: &[PageResult]) -> Vec<IssueSummary> {
    let mut summaries: Vec<IssueSummary> = Vec::new();
    let mut index = HashMap::new();

    for page in pages {
        for issue in &page.issues {
            let i = *index.entry(issue.issue_type).or_insert_with(|| {
                summaries.push(IssueSummary {
                    issue_type: issue.issue_type,
                    severity: issue.severity,
                    message: issue.message.clone(),
                    count: 0,
                    pages: Vec::new(),
                });
                summaries.len() - 1
            });

            let summary = &mut summaries[i];
            summary.count += 1;
            summary.pages.push(page.url.clone());
        }
    }

    summaries.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| b.count.cmp(&a.count))
    });
    summaries
}
