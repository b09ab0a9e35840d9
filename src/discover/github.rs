//! GitHub repository search via `gh search repos`.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use super::Discover;
use crate::{gh, model::Item, vocabulary::REPO_RELEVANCE_TERMS};

/// Star-sorted repository search for one language.
///
/// Tries each topic in turn, then the bare language, and returns the
/// first search that yields relevant repositories.
#[derive(Debug, Clone)]
pub struct GitHubRepoSource {
    pub language: String,
    pub topics: Vec<String>,
    pub limit: usize,
    pub gh_config: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhRepo {
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl GitHubRepoSource {
    fn queries(&self) -> Vec<String> {
        let bare = format!("language:{}", self.language);
        self.topics
            .iter()
            .map(|topic| format!("{topic} {bare}"))
            .chain(std::iter::once(bare.clone()))
            .collect()
    }

    fn search(&self, query: &str) -> Result<Vec<Item>, String> {
        let limit = self.limit.to_string();
        let json = gh::run(
            &[
                "search",
                "repos",
                query,
                "--sort",
                "stars",
                "--limit",
                &limit,
                "--json",
                "fullName,description,stargazersCount,language,url",
            ],
            self.gh_config.as_deref(),
        )?;
        parse_search_results(&json)
    }
}

impl Discover for GitHubRepoSource {
    fn name(&self) -> String {
        format!("github:{}", self.language)
    }

    fn discover(&self) -> Result<Vec<Item>, String> {
        let mut last_error = None;
        let mut searched = false;

        for query in self.queries() {
            match self.search(&query) {
                Ok(items) => {
                    searched = true;
                    let relevant: Vec<Item> = items.into_iter().filter(is_relevant).collect();
                    if !relevant.is_empty() {
                        debug!(query = %query, found = relevant.len(), "repo search hit");
                        return Ok(relevant);
                    }
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "repo search failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !searched => Err(e),
            _ => Ok(Vec::new()),
        }
    }
}

/// Converts `gh search repos --json` output into items.
fn parse_search_results(json: &str) -> Result<Vec<Item>, String> {
    let repos: Vec<GhRepo> =
        serde_json::from_str(json).map_err(|e| format!("failed to parse search results: {e}"))?;

    Ok(repos
        .into_iter()
        .filter(|r| !r.full_name.is_empty())
        .map(|r| {
            Item::repo(
                &r.full_name,
                r.description.as_deref().unwrap_or_default(),
                r.url.filter(|u| !u.is_empty()),
                r.stargazers_count,
                r.language.filter(|l| !l.is_empty()),
            )
        })
        .collect())
}

fn is_relevant(item: &Item) -> bool {
    let text = item.text().to_lowercase();
    REPO_RELEVANCE_TERMS.iter().any(|term| text.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gh_json() {
        let json = r#"[
            {"fullName": "octo/agentkit", "description": "Agent toolkit",
             "stargazersCount": 812, "language": "Rust",
             "url": "https://github.com/octo/agentkit"},
            {"fullName": "octo/bare", "description": null,
             "stargazersCount": 3, "language": "", "url": ""}
        ]"#;

        let items = parse_search_results(json).unwrap();

        assert_eq!(
            items,
            vec![
                Item::repo(
                    "octo/agentkit",
                    "Agent toolkit",
                    Some("https://github.com/octo/agentkit".into()),
                    812,
                    Some("Rust".into()),
                ),
                Item::repo("octo/bare", "", None, 3, None),
            ]
        );
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_search_results("{not json").is_err());
    }

    #[test]
    fn relevance_filter() {
        assert!(is_relevant(&Item::repo("octo/agentkit", "", None, 0, None)));
        assert!(is_relevant(&Item::repo("octo/x", "Machine Learning utils", None, 0, None)));
        assert!(!is_relevant(&Item::repo("octo/web", "a static site", None, 0, None)));
    }

    #[test]
    fn queries_end_with_bare_language() {
        let source = GitHubRepoSource {
            language: "rust".into(),
            topics: vec!["ai".into(), "autonomous".into()],
            limit: 3,
            gh_config: None,
        };
        assert_eq!(
            source.queries(),
            vec!["ai language:rust", "autonomous language:rust", "language:rust"]
        );
    }
}
