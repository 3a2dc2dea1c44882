//! Domain selector table.
//!
//! Maps a host name to the [`SelectorRule`] used to scrape its pages. Built
//! once from the built-in rules merged with an optional JSON override file,
//! then shared read-only.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::SelectorRule;

/// Key of the rule used when a domain has no entry of its own.
pub const DEFAULT_KEY: &str = "default";

/// Per-domain extraction rules with a mandatory fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTable {
    default: SelectorRule,
    domains: HashMap<String, SelectorRule>,
}

impl SelectorTable {
    /// Create a table from a fallback rule and no domain entries.
    pub fn new(default: SelectorRule) -> Self {
        Self {
            default,
            domains: HashMap::new(),
        }
    }

    /// Built-in rules. The fallback targets the Open Graph `og:image` tag.
    pub fn builtin() -> Self {
        let mut table = Self::new(SelectorRule::new("meta", "content").with_attr("property", "og:image"));
        table.insert(
            "imgur.com",
            SelectorRule::new("link", "href").with_attr("rel", "image_src"),
        );
        table.insert(
            "tinypic.com",
            SelectorRule::new("a", "href").with_attr("class", "thickbox"),
        );
        table.insert(
            "gfycat.com",
            SelectorRule::new("meta", "content").with_attr("property", "og:url"),
        );
        table
    }

    /// Insert or replace a rule. The `default` key replaces the fallback.
    pub fn insert(&mut self, domain: impl AsRef<str>, rule: SelectorRule) {
        let key = domain.as_ref().trim().to_lowercase();
        if key == DEFAULT_KEY {
            self.default = rule;
        } else {
            self.domains.insert(key, rule);
        }
    }

    /// Merge overrides key by key. Domains absent from `overrides` keep
    /// their current rule.
    pub fn merge(&mut self, overrides: HashMap<String, SelectorRule>) {
        for (domain, rule) in overrides {
            self.insert(domain, rule);
        }
    }

    /// Parse an override document: `{ domain: {name, <attr>: <value>, link} }`.
    pub fn parse_overrides(json: &str) -> Result<HashMap<String, SelectorRule>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Built-in rules merged with the override file at `path`.
    ///
    /// A missing file yields the built-ins; an unreadable or malformed file
    /// is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut table = Self::builtin();
        let path = path.as_ref();
        if !path.is_file() {
            log::debug!("No selector overrides at {}", path.display());
            return Ok(table);
        }

        let content = fs::read_to_string(path)?;
        let overrides = Self::parse_overrides(&content)?;
        log::debug!(
            "Loaded {} selector override(s) from {}",
            overrides.len(),
            path.display()
        );
        table.merge(overrides);
        Ok(table)
    }

    /// Like [`SelectorTable::load`], but falls back to the built-ins on error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "[-] Failed to load selectors from {}: {}. Using built-in selectors.",
                path.as_ref().display(),
                e
            );
            Self::builtin()
        })
    }

    /// Rule for `domain`, falling back to the default rule.
    ///
    /// Lookup is case-insensitive; a leading `www.` is ignored when the exact
    /// host has no entry.
    pub fn rule_for(&self, domain: &str) -> &SelectorRule {
        let domain = domain.trim().to_lowercase();
        self.domains
            .get(&domain)
            .or_else(|| {
                domain
                    .strip_prefix("www.")
                    .and_then(|bare| self.domains.get(bare))
            })
            .unwrap_or(&self.default)
    }

    /// The fallback rule.
    pub fn default_rule(&self) -> &SelectorRule {
        &self.default
    }

    /// Number of domain-specific rules.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_default_is_og_image() {
        let table = SelectorTable::builtin();
        let rule = table.rule_for("example.com");
        assert_eq!(rule.name, "meta");
        assert_eq!(rule.attrs.get("property").map(String::as_str), Some("og:image"));
        assert_eq!(rule.link_attr(), Some("content"));
    }

    #[test]
    fn test_builtin_imgur_rule() {
        let table = SelectorTable::builtin();
        let rule = table.rule_for("imgur.com");
        assert_eq!(rule.name, "link");
        assert_eq!(rule.link_attr(), Some("href"));
    }

    #[test]
    fn test_www_prefix_ignored() {
        let table = SelectorTable::builtin();
        assert_eq!(table.rule_for("www.imgur.com"), table.rule_for("imgur.com"));
        assert_eq!(table.rule_for("IMGUR.com"), table.rule_for("imgur.com"));
    }

    #[test]
    fn test_merge_is_keywise() {
        let mut table = SelectorTable::builtin();
        let overrides = SelectorTable::parse_overrides(
            r#"{"gfycat.com": {"name": "video", "id": "main", "link": "src"}}"#,
        )
        .unwrap();
        table.merge(overrides);

        assert_eq!(table.rule_for("gfycat.com").name, "video");
        assert_eq!(table.rule_for("imgur.com"), SelectorTable::builtin().rule_for("imgur.com"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_override_default_key() {
        let mut table = SelectorTable::builtin();
        table.insert("default", SelectorRule::new("img", "src"));
        assert_eq!(table.rule_for("unknown.org").name, "img");
    }

    #[test]
    fn test_load_missing_file_uses_builtins() {
        let table = SelectorTable::load("/nonexistent/selectors.json").unwrap();
        assert_eq!(table, SelectorTable::builtin());
    }

    #[test]
    fn test_load_or_default_on_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(SelectorTable::load(file.path()).is_err());
        assert_eq!(SelectorTable::load_or_default(file.path()), SelectorTable::builtin());
    }

    #[test]
    fn test_load_merges_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"example.com": {{"name": "img", "class": "hero", "link": "src"}}}}"#
        )
        .unwrap();

        let table = SelectorTable::load(file.path()).unwrap();
        assert_eq!(table.rule_for("example.com").name, "img");
        assert_eq!(table.len(), 4);
    }
}
