use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::configuration::SearchSettings;
use crate::dal::lead_store::{BatchMeta, LeadStore, StoreError};
use crate::domain::candidate::{Candidate, LeadSource};
use crate::domain::location::LocationFilter;
use crate::domain::search_result::SearchResult;
use crate::domain::templates::{self, SearchTemplate};
use crate::domain::{contact, relevance};
use crate::services::google_places::{
    normalize_place, places_query_for_template, GooglePlacesClient,
};
use crate::services::google_search::{build_query, GoogleSearchClient};
use crate::services::reddit::{filter_by_recency, RedditClient};

const RESULTS_PER_API_QUERY: u32 = 10;
const PLACES_RADIUS_MILES: f64 = 25.0;
const PLACES_PAGE_DELAY: Duration = Duration::from_secs(2);
const PLACES_DETAIL_DELAY: Duration = Duration::from_millis(200);

/// One user-triggered search action.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub template: String,
    pub locations: Vec<String>,
    /// Overrides the template's default site roster when present.
    pub sites: Option<Vec<String>>,
    pub max_results: u32,
    pub include_email_domains: bool,
    pub strict: bool,
    pub use_places: bool,
}

/// The pipeline's sole externally visible output per run.
#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    pub template: String,
    pub query: String,
    pub num_results: usize,
    pub new_leads: Vec<Candidate>,
    pub duplicate_leads: Vec<Candidate>,
    pub failed_urls: Vec<String>,
    pub api_queries_used: u32,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("unknown search template: {0}")]
    UnknownTemplate(String),

    #[error("enter at least one location")]
    NoLocations,

    #[error("select at least one site to search")]
    NoSites,

    #[error("no results found; try different parameters")]
    NoResults,

    #[error("no candidates with usable contact info survived filtering")]
    NoCandidates,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SearchError {
    /// Empty-input and empty-result conditions are user-facing warnings,
    /// not failures of the run itself.
    pub fn is_user_warning(&self) -> bool {
        !matches!(self, SearchError::Store(_))
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The full ingestion run: query, fetch, filter, extract, score-ready
/// annotation, and deduplicating persistence.
pub async fn run_search(
    search_client: &GoogleSearchClient,
    places_client: Option<&GooglePlacesClient>,
    reddit_client: &RedditClient,
    store: &LeadStore,
    settings: &SearchSettings,
    request: SearchRequest,
) -> Result<SearchOutcome, SearchError> {
    let template = templates::get_template(&request.template)
        .ok_or_else(|| SearchError::UnknownTemplate(request.template.clone()))?;

    if request.locations.iter().all(|l| l.trim().is_empty()) {
        return Err(SearchError::NoLocations);
    }

    let sites = match &request.sites {
        Some(sites) if sites.is_empty() => return Err(SearchError::NoSites),
        Some(sites) => sites.clone(),
        None => owned(template.sites()),
    };

    let keywords = owned(template.keywords);
    let intent_phrases = owned(template.intent_phrases);
    let exclude_terms = owned(template.exclude_terms);
    let subreddits = owned(template.subreddits);
    let email_domains = owned(templates::EMAIL_DOMAINS);

    let query = build_query(
        &keywords,
        &request.locations,
        &sites,
        request
            .include_email_domains
            .then_some(email_domains.as_slice()),
        Some(&exclude_terms),
        Some(&intent_phrases),
        Some(&subreddits),
    );
    log::info!("Running template {} with query: {}", template.name, query);

    let results = search_client
        .search_multiple_pages(
            &query,
            request.max_results,
            Duration::from_millis(settings.page_delay_ms),
        )
        .await;
    let api_queries_used = (results.len() as u32).div_ceil(RESULTS_PER_API_QUERY);

    if results.is_empty() && !request.use_places {
        return Err(SearchError::NoResults);
    }

    let results = if request.strict {
        let kept = relevance::strict_filter(results, template.keywords, template.intent_phrases);
        log::info!("Strict filter kept {} results", kept.len());
        kept
    } else {
        results
    };

    let now = Utc::now();
    let (results, origin_times) =
        filter_by_recency(reddit_client, results, settings.reddit_max_age_days, now).await;

    let location_filter = LocationFilter::parse(&request.locations);
    let results = location_filter.rank_by_location(results);

    let mut candidates: Vec<Candidate> = results
        .iter()
        .filter(|result| !result.link.is_empty())
        .map(|result| annotate(result, template, &location_filter, &origin_times))
        .collect();

    if request.use_places {
        match places_client {
            Some(places) => {
                let from_places =
                    places_candidates(places, template, &request, &location_filter).await;
                log::info!("Places search contributed {} candidates", from_places.len());
                candidates.extend(from_places);
            }
            None => log::info!("Places search requested but no Places API key is configured"),
        }
    }

    if candidates.is_empty() {
        return Err(SearchError::NoResults);
    }

    let gated: Vec<Candidate> = candidates
        .into_iter()
        .filter(|candidate| passes_gate(candidate, template))
        .collect();
    if gated.is_empty() {
        return Err(SearchError::NoCandidates);
    }

    let stored = store
        .add_leads(
            &gated,
            template.name,
            &request.locations,
            &BatchMeta { api_queries_used },
        )
        .await?;

    Ok(SearchOutcome {
        template: template.name.to_string(),
        query,
        num_results: gated.len(),
        new_leads: stored.new_leads,
        duplicate_leads: stored.duplicate_leads,
        failed_urls: stored.failed_urls,
        api_queries_used,
    })
}

/// Layer the match flags and resolved post time onto an extracted hit.
fn annotate(
    result: &SearchResult,
    template: &SearchTemplate,
    location_filter: &LocationFilter,
    origin_times: &HashMap<String, DateTime<Utc>>,
) -> Candidate {
    let mut candidate = contact::extract(&result.title, &result.snippet, &result.link);
    candidate.location_match = location_filter.matches(result);
    candidate.intent_match =
        relevance::intent_match(&result.combined_text(), template.intent_phrases);
    candidate.keyword_match = Some(relevance::keyword_match(result, template.keywords));
    candidate.post_created_at = origin_times.get(&result.link).copied();
    candidate
}

/// Persistence gate: a usable candidate carries contact info, unless the
/// template hunts for private people, in which case an intent or keyword
/// hit is enough.
fn passes_gate(candidate: &Candidate, template: &SearchTemplate) -> bool {
    if candidate.website_url.trim().is_empty() {
        return false;
    }
    if candidate.has_contact_info() {
        return true;
    }
    template.is_people_category()
        && (candidate.intent_match || candidate.keyword_match == Some(true))
}

/// Geo-targeted Places pass: detail-enrich each place and shape it like
/// any other candidate. These bypass the strict and recency filters; they
/// have no post text or timestamps to judge.
async fn places_candidates(
    places: &GooglePlacesClient,
    template: &SearchTemplate,
    request: &SearchRequest,
    location_filter: &LocationFilter,
) -> Vec<Candidate> {
    let base_query = places_query_for_template(template.name);
    let (items, stats) = places
        .search_locations(
            &base_query,
            &request.locations,
            request.max_results as usize,
            PLACES_RADIUS_MILES,
            PLACES_PAGE_DELAY,
        )
        .await;
    log::info!(
        "Places geocoded {}/{} locations",
        stats.locations_geocoded,
        stats.locations_total
    );

    let mut candidates = vec![];
    for place in &items {
        let result = normalize_place(place);
        if result.link.is_empty() {
            continue;
        }

        let details = places.place_details(&place.id).await;
        tokio::time::sleep(PLACES_DETAIL_DELAY).await;

        let website_url = details
            .website_uri
            .unwrap_or_else(|| result.link.clone());
        let phone = details
            .international_phone_number
            .map(|raw| contact::extract_phone(&raw).unwrap_or(raw));

        candidates.push(Candidate {
            first_name: None,
            last_name: None,
            company_name: (!result.title.is_empty()).then(|| result.title.clone()),
            website_url,
            email: None,
            phone,
            location_match: location_filter.matches(&result),
            intent_match: false,
            keyword_match: None,
            lead_source: LeadSource::Places,
            post_created_at: None,
        });
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boston_filter() -> LocationFilter {
        LocationFilter::parse(&["Boston MA".to_string()])
    }

    fn result(title: &str, snippet: &str, link: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            snippet: snippet.to_string(),
            link: link.to_string(),
            display_link: "".to_string(),
        }
    }

    #[test]
    fn annotate_sets_all_match_flags() {
        let template = templates::get_template("home_sellers").unwrap();
        let hit = result(
            "Selling my house soon",
            "need a realtor in Boston, call 617-555-0101",
            "https://www.facebook.com/groups/boston/posts/1",
        );

        let candidate = annotate(&hit, template, &boston_filter(), &HashMap::new());
        assert!(candidate.location_match);
        assert!(candidate.intent_match);
        assert_eq!(candidate.keyword_match, Some(true));
        assert_eq!(candidate.lead_source, LeadSource::Facebook);
        assert_eq!(candidate.phone.as_deref(), Some("(617) 555-0101"));
        assert_eq!(candidate.post_created_at, None);
    }

    #[test]
    fn annotate_attaches_resolved_post_time() {
        let template = templates::get_template("home_sellers").unwrap();
        let link = "https://www.reddit.com/r/RealEstate/comments/x";
        let hit = result("selling my house", "in Boston", link);

        let posted = Utc::now();
        let mut origin_times = HashMap::new();
        origin_times.insert(link.to_string(), posted);

        let candidate = annotate(&hit, template, &boston_filter(), &origin_times);
        assert_eq!(candidate.post_created_at, Some(posted));
        assert_eq!(candidate.lead_source, LeadSource::Reddit);
    }

    #[test]
    fn service_provider_gate_requires_contact_info() {
        let template = templates::get_template("realtors").unwrap();
        let hit = result(
            "Top realtor in Boston",
            "looking for a realtor",
            "https://example.com/agent",
        );
        let mut candidate = annotate(&hit, template, &boston_filter(), &HashMap::new());
        assert!(!candidate.has_contact_info());
        assert!(!passes_gate(&candidate, template));

        candidate.email = Some("jane@gmail.com".to_string());
        assert!(passes_gate(&candidate, template));
    }

    #[test]
    fn people_gate_accepts_intent_without_contact_info() {
        let template = templates::get_template("home_sellers").unwrap();
        let hit = result(
            "advice please",
            "need to sell my house in Boston soon",
            "https://www.reddit.com/r/RealEstate/comments/y",
        );
        let candidate = annotate(&hit, template, &boston_filter(), &HashMap::new());
        assert!(!candidate.has_contact_info());
        assert!(passes_gate(&candidate, template));
    }

    #[test]
    fn gate_rejects_empty_urls() {
        let template = templates::get_template("home_sellers").unwrap();
        let hit = result("need to sell my house", "in Boston", "");
        let candidate = annotate(&hit, template, &boston_filter(), &HashMap::new());
        assert!(!passes_gate(&candidate, template));
    }
}
