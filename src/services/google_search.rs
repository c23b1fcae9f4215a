use std::time::Duration;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::search_result::SearchResult;

const CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";
const RESULTS_PER_PAGE: u8 = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Google Custom Search JSON API.
pub struct GoogleSearchClient {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    key: &'a str,
    cx: &'a str,
    q: &'a str,
    num: u8,
    start: u32,
    #[serde(rename = "dateRestrict", skip_serializing_if = "Option::is_none")]
    date_restrict: Option<&'a str>,
}

#[derive(Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    display_link: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: String, cse_id: String) -> anyhow::Result<Self> {
        if api_key.is_empty() || cse_id.is_empty() {
            anyhow::bail!(
                "Google API key and CSE ID are required. \
                 Set them in configuration.yaml or via APP__API_KEYS__* environment variables."
            );
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest client");

        Ok(GoogleSearchClient {
            client,
            api_key,
            cse_id,
        })
    }

    /// One page of results. Upstream failures degrade to an empty page so
    /// that pagination stops early instead of aborting the run.
    pub async fn search(
        &self,
        query: &str,
        num_results: u8,
        start_index: u32,
        date_restrict: Option<&str>,
    ) -> Vec<SearchResult> {
        let params = SearchQuery {
            key: &self.api_key,
            cx: &self.cse_id,
            q: query,
            num: num_results.min(RESULTS_PER_PAGE),
            start: start_index,
            date_restrict,
        };

        let response = match self.client.get(CSE_URL).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Search request failed: {:?}", e);
                return vec![];
            }
        };

        if !response.status().is_success() {
            log::error!("Search returned status {} for query", response.status());
            return vec![];
        }

        match response.json::<CseResponse>().await {
            Ok(data) => data
                .items
                .into_iter()
                .map(|item| SearchResult {
                    title: item.title,
                    snippet: item.snippet,
                    link: item.link,
                    display_link: item.display_link,
                })
                .collect(),
            Err(e) => {
                log::error!("Failed to parse search response: {:?}", e);
                vec![]
            }
        }
    }

    /// Sequential pagination with a fixed politeness delay, stopping early
    /// on the first empty page.
    pub async fn search_multiple_pages(
        &self,
        query: &str,
        total_results: u32,
        delay: Duration,
    ) -> Vec<SearchResult> {
        let pages_needed = total_results.div_ceil(RESULTS_PER_PAGE as u32);
        let mut all_results = vec![];

        for page in 0..pages_needed {
            let start_index = page * RESULTS_PER_PAGE as u32 + 1;
            log::info!("Fetching search page {}/{}", page + 1, pages_needed);

            let results = self
                .search(query, RESULTS_PER_PAGE, start_index, None)
                .await;
            if results.is_empty() {
                log::info!("No more results at page {}", page + 1);
                break;
            }
            all_results.extend(results);

            if page + 1 < pages_needed {
                tokio::time::sleep(delay).await;
            }
        }

        log::info!("Retrieved {} total results", all_results.len());
        all_results
    }
}

/// Compose a boolean query from facets. Each non-empty facet becomes a
/// parenthesized OR-group; groups are ANDed by juxtaposition; exclusions
/// trail as bare `-term` tokens. Deterministic for identical inputs.
pub fn build_query(
    keywords: &[String],
    locations: &[String],
    sites: &[String],
    email_domains: Option<&[String]>,
    exclude_terms: Option<&[String]>,
    intent_phrases: Option<&[String]>,
    reddit_subreddits: Option<&[String]>,
) -> String {
    let mut groups: Vec<String> = vec![];

    if !sites.is_empty() {
        let tokens: Vec<String> = sites
            .iter()
            .flat_map(|site| {
                let subs = reddit_subreddits.unwrap_or_default();
                if site == "reddit.com" && !subs.is_empty() {
                    subs.iter()
                        .map(|sub| format!("site:reddit.com/r/{}", sub))
                        .collect::<Vec<_>>()
                } else {
                    vec![format!("site:{}", site)]
                }
            })
            .collect();
        groups.push(format!("({})", tokens.iter().join(" OR ")));
    }

    for facet in [
        Some(keywords),
        intent_phrases,
        email_domains,
        Some(locations),
    ]
    .into_iter()
    .flatten()
    {
        if !facet.is_empty() {
            groups.push(quoted_or_group(facet));
        }
    }

    let mut query = groups.iter().join(" ");

    if let Some(terms) = exclude_terms {
        if !terms.is_empty() {
            let exclusions = terms.iter().map(|t| format!("-{}", t)).join(" ");
            query = format!("{} {}", query, exclusions);
        }
    }

    query.trim().to_string()
}

fn quoted_or_group(items: &[String]) -> String {
    format!("({})", items.iter().map(|i| format!("\"{}\"", i)).join(" OR "))
}
