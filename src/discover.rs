//! Discovery: where new items come from.
//!
//! Each source kind has its own submodule. A source failing is never
//! fatal to a cycle: the error is logged and the source counts as having
//! found nothing.

mod arxiv;
mod github;

use std::path::Path;

use tracing::{debug, warn};

use crate::{config::DiscoveryConfig, model::Item};

pub use arxiv::ArxivSource;
pub use github::GitHubRepoSource;

/// A discovery source: one source kind with fixed parameters.
pub trait Discover {
    /// Short label for logs, e.g. `github:rust`.
    fn name(&self) -> String;

    /// Fetch candidate items. Blocking; no partial results.
    fn discover(&self) -> Result<Vec<Item>, String>;
}

/// Runs every source in order and concatenates what they found.
///
/// Failed sources are logged and skipped.
pub fn discover_all(sources: &[Box<dyn Discover>]) -> Vec<Item> {
    let mut items = Vec::new();
    for source in sources {
        match source.discover() {
            Ok(found) => {
                debug!(source = %source.name(), found = found.len(), "source fetched");
                items.extend(found);
            }
            Err(e) => warn!(source = %source.name(), error = %e, "source failed, skipping"),
        }
    }
    items
}

/// The configured sources: one repository search per language, then one
/// paper search per query. Paper sources share one HTTP client.
pub fn default_sources(config: &DiscoveryConfig, gh_config: Option<&Path>) -> Vec<Box<dyn Discover>> {
    let mut sources: Vec<Box<dyn Discover>> = Vec::new();
    for language in &config.languages {
        sources.push(Box::new(GitHubRepoSource {
            language: language.clone(),
            topics: config.repo_topics.clone(),
            limit: config.repos_per_search,
            gh_config: gh_config.map(Path::to_path_buf),
        }));
    }

    let queries = config.paper_queries.iter().take(config.paper_queries_per_cycle);
    match arxiv::http_client() {
        Ok(client) => {
            for query in queries {
                sources.push(Box::new(ArxivSource {
                    query: query.clone(),
                    max_results: config.papers_per_query,
                    client: client.clone(),
                }));
            }
        }
        Err(e) => warn!(error = %e, "http client unavailable, paper search disabled"),
    }
    sources
}
