//! arXiv paper search via the public Atom export API.

use std::time::Duration;

use quick_xml::de::from_str;
use reqwest::blocking::{Client, Request};
use serde::Deserialize;

use super::Discover;
use crate::model::Item;

const API_URL: &str = "https://export.arxiv.org/api/query";

/// Builds the HTTP client every paper source shares.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("lookout/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
}

/// Newest-first paper search for one free-text query.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    pub query: String,
    pub max_results: usize,
    pub client: Client,
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
    #[serde(rename = "category", default)]
    categories: Vec<AtomCategory>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AtomCategory {
    #[serde(rename = "@term", default)]
    term: String,
}

impl ArxivSource {
    /// The search request. The query text is passed through as-is and
    /// percent-encoded by the client.
    fn request(&self) -> reqwest::Result<Request> {
        let search = format!("all:{}", self.query.split_whitespace().collect::<Vec<_>>().join(" "));
        let max_results = self.max_results.to_string();
        self.client
            .get(API_URL)
            .query(&[
                ("search_query", search.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
                ("max_results", max_results.as_str()),
            ])
            .build()
    }
}

impl Discover for ArxivSource {
    fn name(&self) -> String {
        format!("arxiv:{}", self.query)
    }

    fn discover(&self) -> Result<Vec<Item>, String> {
        let request = self
            .request()
            .map_err(|e| format!("failed to build arxiv request: {e}"))?;
        let body = self
            .client
            .execute(request)
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(|e| format!("arxiv fetch failed: {e}"))?;

        parse_feed(&body)
    }
}

/// Converts an Atom feed into paper items, dropping entries with no title
/// or no id.
fn parse_feed(xml: &str) -> Result<Vec<Item>, String> {
    let feed: Feed = from_str(xml).map_err(|e| format!("failed to parse arxiv feed: {e}"))?;

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = collapse(&entry.title);
            let arxiv_id = arxiv_id(&entry.id)?;
            if title.is_empty() {
                return None;
            }
            Some(Item::paper(
                &arxiv_id,
                &title,
                &collapse(&entry.summary),
                Some(entry.id.trim().to_string()),
                entry.authors.into_iter().map(|a| collapse(&a.name)).collect(),
                entry.categories.into_iter().map(|c| c.term).collect(),
            ))
        })
        .collect())
}

/// `http://arxiv.org/abs/2401.01234v2` → `2401.01234`.
///
/// The version suffix is dropped so revisions of one paper share an id.
fn arxiv_id(url: &str) -> Option<String> {
    let (_, tail) = url.trim().split_once("/abs/")?;
    let id = tail
        .rsplit_once('v')
        .filter(|(base, version)| {
            !base.is_empty() && !version.is_empty() && version.chars().all(|c| c.is_ascii_digit())
        })
        .map_or(tail, |(base, _)| base);
    (!id.is_empty()).then(|| id.to_string())
}

/// Atom text fields wrap across lines; fold all whitespace runs to one space.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query</title>
  <id>http://arxiv.org/api/abc</id>
  <entry>
    <id>http://arxiv.org/abs/2401.01234v2</id>
    <updated>2024-01-03T00:00:00Z</updated>
    <title>Governance for
      Autonomous Agents</title>
    <summary>  We study distributed
      oversight.  </summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <link href="http://arxiv.org/abs/2401.01234v2" rel="alternate" type="text/html"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.MA" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2401.09999v1</id>
    <title></title>
    <summary>untitled</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_atom_entries() {
        let items = parse_feed(FEED).unwrap();

        assert_eq!(
            items,
            vec![Item::paper(
                "2401.01234",
                "Governance for Autonomous Agents",
                "We study distributed oversight.",
                Some("http://arxiv.org/abs/2401.01234v2".into()),
                vec!["Ada Lovelace".into(), "Alan Turing".into()],
                vec!["cs.AI".into(), "cs.MA".into()],
            )]
        );
    }

    #[test]
    fn empty_feed_is_no_items() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>x</title></feed>"#;
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn version_suffix_is_stripped() {
        assert_eq!(arxiv_id("http://arxiv.org/abs/2401.01234v12").as_deref(), Some("2401.01234"));
        assert_eq!(arxiv_id("http://arxiv.org/abs/cs/0112017").as_deref(), Some("cs/0112017"));
        assert_eq!(arxiv_id("http://example.com/nothing"), None);
    }

    #[test]
    fn request_encodes_query_text() {
        let source = ArxivSource {
            query: "C++  agents".into(),
            max_results: 3,
            client: http_client().unwrap(),
        };

        let request = source.request().unwrap();
        let url = request.url();
        assert_eq!(url.host_str(), Some("export.arxiv.org"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("search_query".into(), "all:C++ agents".into()),
                ("sortBy".into(), "submittedDate".into()),
                ("sortOrder".into(), "descending".into()),
                ("max_results".into(), "3".into()),
            ]
        );
    }
}
