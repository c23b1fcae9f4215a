use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::search_result::SearchResult;

const LOOKUP_USER_AGENT: &str = "LeadFinderBot/1.0";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(20);
const LOOKUP_DELAY: Duration = Duration::from_millis(200);

/// Resolves the true creation time of reddit posts via the public
/// `<post_url>.json` endpoint.
pub struct RedditClient {
    client: reqwest::Client,
}

pub fn is_reddit_link(url: &str) -> bool {
    url.contains("reddit.com")
}

impl RedditClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(LOOKUP_USER_AGENT)
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .expect("Failed to build reqwest client");

        RedditClient { client }
    }

    /// Single fire-and-forget lookup. Any failure, timeout or shape
    /// mismatch resolves to None.
    pub async fn fetch_post_created_at(&self, url: &str) -> Option<DateTime<Utc>> {
        if !is_reddit_link(url) {
            return None;
        }

        let json_url = format!("{}.json", url.trim_end_matches('/'));
        let response = match self.client.get(&json_url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                log::error!("Reddit lookup for {} returned {}", url, response.status());
                return None;
            }
            Err(e) => {
                log::error!("Reddit lookup failed for {}: {:?}", url, e);
                return None;
            }
        };

        let value: serde_json::Value = response.json().await.ok()?;
        let created_utc = value
            .get(0)?
            .get("data")?
            .get("children")?
            .get(0)?
            .get("data")?
            .get("created_utc")?
            .as_f64()?;

        if created_utc <= 0.0 {
            return None;
        }
        DateTime::from_timestamp(created_utc as i64, 0)
    }
}

impl Default for RedditClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Unverifiable age disqualifies: a missing timestamp is stale, not fresh.
pub fn is_stale(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>, max_age_days: i64) -> bool {
    match created_at {
        Some(created) => (now - created).num_days() > max_age_days,
        None => true,
    }
}

/// Drop reddit results older than `max_age_days` (or with unresolvable
/// post times), passing everything else through untouched. Returns the
/// survivors plus a link -> post-time map for downstream scoring.
pub async fn filter_by_recency(
    client: &RedditClient,
    results: Vec<SearchResult>,
    max_age_days: i64,
    now: DateTime<Utc>,
) -> (Vec<SearchResult>, HashMap<String, DateTime<Utc>>) {
    let mut kept = vec![];
    let mut origin_times = HashMap::new();

    for result in results {
        if !is_reddit_link(&result.link) {
            kept.push(result);
            continue;
        }

        let created_at = client.fetch_post_created_at(&result.link).await;
        // Politeness throttle between successive lookups.
        tokio::time::sleep(LOOKUP_DELAY).await;

        if is_stale(created_at, now, max_age_days) {
            log::info!("Dropping stale or undatable reddit post: {}", result.link);
            continue;
        }

        if let Some(created) = created_at {
            origin_times.insert(result.link.clone(), created);
        }
        kept.push(result);
    }

    (kept, origin_times)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn unresolvable_age_is_stale() {
        assert!(is_stale(None, fixed_now(), 60));
    }

    #[test]
    fn age_cutoff_is_inclusive() {
        let now = fixed_now();
        assert!(!is_stale(Some(now - Duration::days(60)), now, 60));
        assert!(is_stale(Some(now - Duration::days(61)), now, 60));
    }

    #[test]
    fn reddit_links_are_recognized() {
        assert!(is_reddit_link("https://www.reddit.com/r/RealEstate/comments/x"));
        assert!(!is_reddit_link("https://www.facebook.com/groups/boston"));
    }
}
