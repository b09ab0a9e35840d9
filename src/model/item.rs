//! Items: artifacts discovered by a learning cycle.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where an item came from.
///
/// Patterns need two distinct kinds to exist, so the set stays small
/// and closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    /// A source code repository.
    Repo,

    /// A research paper.
    Paper,
}

impl ItemKind {
    /// Namespace mixed into the item id digest.
    pub fn id_namespace(self) -> &'static str {
        match self {
            Self::Repo => "github",
            Self::Paper => "arxiv",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Repo => "repo",
            Self::Paper => "paper",
        })
    }
}

/// A discovered external artifact with a stable identity.
///
/// Immutable once built. The `id` is derived from the source kind and
/// the artifact's natural key, so the same repository or paper maps to
/// the same id on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,

    /// Repository description or paper abstract.
    pub description: String,

    pub url: Option<String>,

    #[serde(flatten)]
    pub source: Source,
}

/// Source-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Source {
    Repo {
        stars: u64,
        language: Option<String>,
    },
    Paper {
        authors: Vec<String>,
        categories: Vec<String>,
    },
}

impl Item {
    /// Builds a repository item keyed by `owner/name`.
    pub fn repo(
        full_name: &str,
        description: &str,
        url: Option<String>,
        stars: u64,
        language: Option<String>,
    ) -> Self {
        Self {
            id: derive_id(ItemKind::Repo, full_name),
            title: full_name.to_string(),
            description: description.to_string(),
            url,
            source: Source::Repo { stars, language },
        }
    }

    /// Builds a paper item keyed by its arXiv abstract id.
    pub fn paper(
        arxiv_id: &str,
        title: &str,
        summary: &str,
        url: Option<String>,
        authors: Vec<String>,
        categories: Vec<String>,
    ) -> Self {
        Self {
            id: derive_id(ItemKind::Paper, arxiv_id),
            title: title.to_string(),
            description: summary.to_string(),
            url,
            source: Source::Paper {
                authors,
                categories,
            },
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self.source {
            Source::Repo { .. } => ItemKind::Repo,
            Source::Paper { .. } => ItemKind::Paper,
        }
    }

    /// Title and description joined by a space; the text keyword matching runs over.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Deterministic id: hex SHA-256 of `"<namespace>:<natural key>"`.
pub fn derive_id(kind: ItemKind, natural_key: &str) -> String {
    let digest = Sha256::digest(format!("{}:{natural_key}", kind.id_namespace()).as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_stable_for_same_key() {
        let a = Item::repo("octo/widget", "first description", None, 1, None);
        let b = Item::repo("octo/widget", "changed description", None, 900, None);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.len(), 64);
    }

    #[test]
    fn id_depends_on_source_kind() {
        assert_ne!(
            derive_id(ItemKind::Repo, "2401.00001"),
            derive_id(ItemKind::Paper, "2401.00001")
        );
    }

    #[test]
    fn serializes_kind_inline() {
        let item = Item::paper(
            "2401.00001",
            "Agents",
            "A survey.",
            None,
            vec!["Ada".into()],
            vec!["cs.AI".into()],
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "paper");
        assert_eq!(json["authors"][0], "Ada");

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), ItemKind::Paper);
    }
}
