use crate::models::{DuplicateTitleGroup, Issue, IssueType, PageResult, Severity};
use std::collections::{HashMap, HashSet};

/// Longest title excerpt quoted in a duplicate title message
const TITLE_PREVIEW_CHARS: usize = 50;

/// Groups pages by non-empty title, keeping groups shared by two or more pages.
/// Groups appear in order of first occurrence.
pub fn find_duplicate_titles(pages: &[PageResult]) -> Vec<DuplicateTitleGroup> {
    let mut groups: Vec<DuplicateTitleGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for page in pages.iter().filter(|page| !page.title.is_empty()) {
        match index.get(page.title.as_str()) {
            Some(&i) => groups[i].pages.push(page.url.clone()),
            None => {
                index.insert(page.title.as_str(), groups.len());
                groups.push(DuplicateTitleGroup {
                    title: page.title.clone(),
                    pages: vec![page.url.clone()],
                });
            }
        }
    }

    groups.retain(|group| group.pages.len() > 1);
    groups
}

/// Detects duplicate titles and appends a critical issue to every page involved.
/// Health scores are left untouched.
pub fn flag_duplicate_titles(pages: &mut [PageResult]) -> Vec<DuplicateTitleGroup> {
    let groups = find_duplicate_titles(pages);
    let duplicated: HashSet<&str> = groups.iter().map(|group| group.title.as_str()).collect();

    for page in pages.iter_mut() {
        if duplicated.contains(page.title.as_str()) {
            let preview: String = page.title.chars().take(TITLE_PREVIEW_CHARS).collect();
            page.issues.push(Issue::new(
                IssueType::DuplicateTitle,
                Severity::Critical,
                format!("Duplicate title: \"{}\"", preview),
            ));
        }
    }

    groups
}
