use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::dal::lead_store::{LeadStore, StoreError};
use crate::domain::candidate::LeadSource;
use crate::services::reddit::{is_reddit_link, is_stale, RedditClient};

const LOOKUP_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Serialize)]
pub struct CleanupCandidate {
    pub id: String,
    pub website_url: String,
    pub template: String,
    pub reason: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CleanupReport {
    pub scanned: usize,
    pub candidates: Vec<CleanupCandidate>,
    pub deleted: usize,
    pub applied: bool,
}

/// Out-of-band maintenance sweep, not part of the live pipeline: re-check
/// every stored reddit lead against the recency rule and report (or, with
/// `apply`, delete) the ones that are too old or can no longer be dated.
pub async fn sweep_stale_reddit_leads(
    store: &LeadStore,
    reddit_client: &RedditClient,
    max_age_days: i64,
    apply: bool,
) -> Result<CleanupReport, StoreError> {
    let leads = store.get_all_leads(None).await?;
    let now = Utc::now();

    let mut report = CleanupReport {
        scanned: leads.len(),
        candidates: vec![],
        deleted: 0,
        applied: apply,
    };

    for lead in &leads {
        if lead.lead_source != LeadSource::Reddit && !is_reddit_link(&lead.website_url) {
            continue;
        }

        let created_at = reddit_client.fetch_post_created_at(&lead.website_url).await;
        tokio::time::sleep(LOOKUP_DELAY).await;

        if !is_stale(created_at, now, max_age_days) {
            continue;
        }
        let reason = if created_at.is_none() {
            "reddit_missing_date"
        } else {
            "reddit_too_old"
        };

        report.candidates.push(CleanupCandidate {
            id: lead.id.clone(),
            website_url: lead.website_url.clone(),
            template: lead.template.clone(),
            reason,
        });
    }

    if apply {
        for candidate in &report.candidates {
            if store.delete_lead(&candidate.id).await? {
                report.deleted += 1;
            }
        }
        log::info!("Cleanup deleted {} stale reddit leads", report.deleted);
    } else {
        log::info!(
            "Cleanup dry-run: {} of {} leads would be deleted",
            report.candidates.len(),
            report.scanned
        );
    }

    Ok(report)
}
