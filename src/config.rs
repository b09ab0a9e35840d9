//! Lookout configuration.
//!
//! Loaded from `~/.lookout/config.toml`. Every key is optional; a missing
//! file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::vocabulary::Vocabulary;

/// Lookout configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Tracker repository as `owner/name`.
    /// When unset, `gh` uses the repository of the working directory.
    pub repo: Option<String>,

    /// Default identity when neither `--as` nor `LOOKOUT_IDENTITY` is set.
    pub identity: Option<String>,

    /// Pause between completed cycles in continuous mode.
    pub cycle_interval_minutes: u64,

    /// Most ready items considered per cycle.
    pub ready_limit: usize,

    /// Claim the selected item at the end of a cycle.
    pub auto_claim: bool,

    /// Labels put on published tasks. Empty leaves triage to a human.
    pub publish_labels: Vec<String>,

    pub labels: Labels,
    pub discovery: DiscoveryConfig,
    pub vocabulary: Vocabulary,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: None,
            identity: None,
            cycle_interval_minutes: 120,
            ready_limit: 50,
            auto_claim: false,
            publish_labels: Vec::new(),
            labels: Labels::default(),
            discovery: DiscoveryConfig::default(),
            vocabulary: Vocabulary::default(),
        }
    }
}

/// Tracker labels that encode work-item state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Labels {
    pub ready: String,
    pub in_progress: String,
    pub blocked: String,
    pub completed: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            ready: "ready-for-work".to_string(),
            in_progress: "in-progress".to_string(),
            blocked: "blocked".to_string(),
            completed: "completed".to_string(),
        }
    }
}

/// What the default discovery sources search for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiscoveryConfig {
    /// One repository search per language.
    pub languages: Vec<String>,

    /// Topics tried in order before falling back to the bare language.
    pub repo_topics: Vec<String>,

    pub repos_per_search: usize,
    pub paper_queries: Vec<String>,

    /// Only the first N paper queries run each cycle.
    pub paper_queries_per_cycle: usize,

    pub papers_per_query: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            languages: vec!["python".into(), "rust".into(), "javascript".into()],
            repo_topics: vec!["ai".into(), "autonomous".into(), "distributed".into()],
            repos_per_search: 3,
            paper_queries: vec![
                "artificial intelligence agents".into(),
                "autonomous AI systems".into(),
                "AI governance".into(),
                "distributed AI".into(),
            ],
            paper_queries_per_cycle: 2,
            papers_per_query: 3,
        }
    }
}

impl Config {
    /// Load config from `~/.lookout/config.toml`.
    /// A missing file yields defaults; an unreadable or invalid one is an error.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.lookout/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".lookout").join("config.toml"))
    }
}
