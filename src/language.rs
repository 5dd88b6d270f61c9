//! Language inference: pick a highlighter tag for a tab.
//!
//! Explicit tag wins. Otherwise the lower-cased tab id is checked against an
//! ordered rule table by substring containment; first matching rule wins.
//! Order matters: `nextjs` must hit the TSX rule before the JavaScript one
//! sees `js`, and `postgresql` must hit SQL.

use serde::{Deserialize, Serialize};

use crate::player::Tab;

/// Tag returned when no rule matches.
pub const DEFAULT_LANGUAGE: &str = "jsx";

/// One row of the table: a tag and the substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRule {
    pub tag: String,
    #[serde(rename = "match")]
    pub patterns: Vec<String>,
}

impl LanguageRule {
    pub fn new(tag: &str, patterns: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    fn matches(&self, id_lower: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| id_lower.contains(p.to_lowercase().as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTable {
    #[serde(default)]
    pub rules: Vec<LanguageRule>,
    #[serde(default = "default_language")]
    pub default: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.into()
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self {
            rules: vec![
                LanguageRule::new("sql", &["sql", "postgres", "mariadb", "dbms", "database"]),
                LanguageRule::new("tsx", &["next", "react", "tsx"]),
                LanguageRule::new("typescript", &["typescript", "deno", "ts"]),
                LanguageRule::new("graphql", &["graphql", "gql", "apollo"]),
                LanguageRule::new(
                    "javascript",
                    &["javascript", "express", "node", "redux", "prisma", "mongo", "jest", "vitest", "js"],
                ),
                LanguageRule::new("docker", &["docker", "compose"]),
                LanguageRule::new("yaml", &["yaml", "yml", "k8s", "kubernetes", "amplify"]),
                LanguageRule::new("rust", &["rust", "cargo"]),
                LanguageRule::new("python", &["python", "django", "flask", "py"]),
                LanguageRule::new("bash", &["bash", "shell", "zsh"]),
                LanguageRule::new("json", &["json"]),
            ],
            default: default_language(),
        }
    }
}

impl LanguageTable {
    pub fn new(rules: Vec<LanguageRule>, default: impl Into<String>) -> Self {
        Self {
            rules,
            default: default.into(),
        }
    }

    /// Resolve the tag for `id`, honouring an explicit override.
    pub fn infer<'a>(&'a self, id: &str, explicit: Option<&'a str>) -> &'a str {
        if let Some(tag) = explicit.filter(|t| !t.is_empty()) {
            return tag;
        }
        let id_lower = id.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&id_lower))
            .map(|rule| rule.tag.as_str())
            .unwrap_or(&self.default)
    }

    pub fn for_tab<'a>(&'a self, tab: &'a Tab) -> &'a str {
        self.infer(&tab.id, tab.language.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgresql_is_sql() {
        assert_eq!(LanguageTable::default().infer("postgresql", None), "sql");
    }

    #[test]
    fn nextjs_is_tsx_not_javascript() {
        assert_eq!(LanguageTable::default().infer("nextjs", None), "tsx");
    }

    #[test]
    fn explicit_language_wins() {
        let table = LanguageTable::default();
        assert_eq!(table.infer("custom", Some("rust")), "rust");
        assert_eq!(table.infer("postgresql", Some("rust")), "rust");
    }

    #[test]
    fn empty_explicit_falls_back_to_inference() {
        assert_eq!(LanguageTable::default().infer("express", Some("")), "javascript");
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let table = LanguageTable::default();
        assert_eq!(table.infer("My-MySQL-Demo", None), "sql");
        assert_eq!(table.infer("graphql", None), "graphql");
        assert_eq!(table.infer("mongoose", None), "javascript");
    }

    #[test]
    fn unmatched_id_gets_default() {
        assert_eq!(LanguageTable::default().infer("custom", None), DEFAULT_LANGUAGE);
    }

    #[test]
    fn declaration_order_breaks_ties() {
        let table = LanguageTable::new(
            vec![LanguageRule::new("first", &["ab"]), LanguageRule::new("second", &["abc"])],
            "plain",
        );
        assert_eq!(table.infer("abc", None), "first");
        assert_eq!(table.infer("zzz", None), "plain");
    }

    #[test]
    fn for_tab_uses_tab_fields() {
        let table = LanguageTable::default();
        let tab = Tab::new("redux", "Redux", "");
        assert_eq!(table.for_tab(&tab), "javascript");
        let tab = tab.with_language("ts");
        assert_eq!(table.for_tab(&tab), "ts");
    }

    #[test]
    fn table_parses_from_yaml() {
        let yaml = r#"
rules:
  - tag: sql
    match: [sql]
default: text
"#;
        let table: LanguageTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.infer("mysql", None), "sql");
        assert_eq!(table.infer("other", None), "text");
    }
}
