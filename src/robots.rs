use std::collections::HashMap;

/// Represents a robots.txt rule (either Allow or Disallow)
#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    is_allow: bool,
}

/// Represents a parsed robots.txt file
#[derive(Debug, Default)]
pub struct RobotsTxt {
    /// Rules grouped by user-agent (lowercased)
    rules: HashMap<String, Vec<Rule>>,
    sitemaps: Vec<String>,
}

impl RobotsTxt {
    /// Parses robots.txt content
    pub fn parse(content: &str) -> Self {
        let mut robots = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules: Vec<Rule> = Vec::new();
        let mut in_rules = false;

        for line in content.lines() {
            // Strip trailing comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if in_rules {
                        robots.save_group(&current_agents, &current_rules);
                        current_agents.clear();
                        current_rules.clear();
                        in_rules = false;
                    }
                    current_agents.push(value.to_lowercase());
                }
                "disallow" | "allow" => {
                    in_rules = true;
                    if !value.is_empty() {
                        current_rules.push(Rule {
                            pattern: value.to_string(),
                            is_allow: field == "allow",
                        });
                    }
                }
                "sitemap" => robots.sitemaps.push(value.to_string()),
                _ => {
                    // Ignore other directives (Crawl-delay, Host, etc.)
                }
            }
        }

        robots.save_group(&current_agents, &current_rules);
        robots
    }

    fn save_group(&mut self, agents: &[String], rules: &[Rule]) {
        for agent in agents {
            self.rules
                .entry(agent.clone())
                .or_default()
                .extend(rules.iter().cloned());
        }
    }

    /// Checks if a path may be crawled by `user_agent`, falling back to the `*` group
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        let rules = self
            .rules
            .get(&user_agent.to_lowercase())
            .or_else(|| self.rules.get("*"));

        match rules {
            Some(rules) => Self::check_rules(rules, path),
            None => true,
        }
    }

    /// True when the whole site is closed to `user_agent`
    pub fn disallows_all(&self, user_agent: &str) -> bool {
        !self.is_allowed("/", user_agent)
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// The most specific (longest) matching rule wins; ties go to the later rule
    fn check_rules(rules: &[Rule], path: &str) -> bool {
        let mut allowed = true;
        let mut most_specific_length = 0;

        for rule in rules {
            if Self::path_matches(&rule.pattern, path) && rule.pattern.len() >= most_specific_length {
                most_specific_length = rule.pattern.len();
                allowed = rule.is_allow;
            }
        }

        allowed
    }

    /// Prefix match with support for a trailing `$` end marker
    fn path_matches(pattern: &str, path: &str) -> bool {
        match pattern.strip_suffix('$') {
            Some(exact) => path == exact,
            None => path.starts_with(pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matches() {
        assert!(RobotsTxt::path_matches("/admin", "/admin/page"));
        assert!(RobotsTxt::path_matches("/admin", "/admin"));
        assert!(!RobotsTxt::path_matches("/admin", "/user"));
        assert!(RobotsTxt::path_matches("/admin$", "/admin"));
        assert!(!RobotsTxt::path_matches("/admin$", "/admin/"));
    }

    #[test]
    fn test_disallow_all_for_wildcard_agent() {
        let robots = RobotsTxt::parse("User-agent: *\nDisallow: /\n");
        assert!(robots.disallows_all("*"));
        assert!(robots.disallows_all("AuditBot"));
    }

    #[test]
    fn test_partial_disallow_is_not_disallow_all() {
        let content = r#"
User-agent: *
Disallow: /admin
Allow: /public/

User-agent: googlebot
Disallow: /

Sitemap: https://example.com/sitemap.xml
"#;
        let robots = RobotsTxt::parse(content);

        assert!(!robots.disallows_all("*"));
        assert!(robots.disallows_all("Googlebot"));
        assert!(!robots.is_allowed("/admin/users", "*"));
        assert!(robots.is_allowed("/public/page", "*"));
        assert_eq!(robots.sitemaps(), ["https://example.com/sitemap.xml".to_string()]);
    }

    #[test]
    fn test_grouped_user_agents_share_rules() {
        let content = "User-agent: a\nUser-agent: b\nDisallow: /\n";
        let robots = RobotsTxt::parse(content);

        assert!(robots.disallows_all("a"));
        assert!(robots.disallows_all("b"));
        assert!(!robots.disallows_all("*"));
    }

    #[test]
    fn test_allow_overrides_same_length_disallow() {
        let robots = RobotsTxt::parse("User-agent: *\nDisallow: /\nAllow: /\n");
        assert!(!robots.disallows_all("*"));
    }
}
