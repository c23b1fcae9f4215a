use chrono::{DateTime, Utc};
use serde::Serialize;

use super::candidate::LeadSource;

/// A persisted lead, uniquely identified by the hash of its normalized URL.
///
/// Contact fields use the empty string for "not known" so that repeat
/// sightings can merge without clobbering (see the store's update SQL).
/// Scores are never stored; they are recomputed at read time because
/// recency moves with the wall clock.
#[derive(Debug, Clone, Serialize)]
pub struct Lead {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub website_url: String,
    pub email: String,
    pub phone: String,
    pub template: String,
    pub locations: String,
    pub url_hash: String,
    pub lead_source: LeadSource,
    pub location_match: bool,
    pub intent_match: bool,
    pub keyword_match: Option<bool>,
    pub post_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub times_seen: i64,
}

impl Lead {
    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }

    pub fn has_phone(&self) -> bool {
        !self.phone.is_empty()
    }

    pub fn has_website(&self) -> bool {
        !self.website_url.is_empty()
    }
}

/// Append-only audit row, one per ingestion batch.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHistoryEntry {
    pub template: String,
    pub locations: String,
    pub num_results: i64,
    pub new_leads: i64,
    pub duplicate_leads: i64,
    pub api_queries: i64,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters for the dashboard header.
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub total_leads: i64,
    pub leads_with_email: i64,
    pub leads_with_phone: i64,
    pub new_today: i64,
    pub total_searches: i64,
    pub most_used_template: String,
    pub total_api_queries: i64,
    pub api_queries_today: i64,
}
