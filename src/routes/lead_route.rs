use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Utc;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::configuration::SearchSettings;
use crate::dal::lead_store::LeadStore;
use crate::domain::lead::Lead;
use crate::domain::scoring::{score_lead, LeadScore};
use crate::services::{sweep_stale_reddit_leads, RedditClient};

#[derive(Serialize)]
struct ScoredLead {
    #[serde(flatten)]
    lead: Lead,
    lead_score: i64,
    contact_score: i64,
    good_lead: bool,
}

#[derive(Deserialize)]
struct LeadQuery {
    template: Option<String>,
    #[serde(default)]
    good_only: bool,
}

#[get("")]
async fn get_leads(query: web::Query<LeadQuery>, store: web::Data<LeadStore>) -> HttpResponse {
    let leads = match store.get_all_leads(query.template.as_deref()).await {
        Ok(leads) => leads,
        Err(e) => {
            log::error!("Failed to load leads: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    // Scores depend on "days since", so they are computed per request.
    let now = Utc::now();
    let scored: Vec<ScoredLead> = leads
        .into_iter()
        .map(|lead| {
            let LeadScore {
                score,
                contact_score,
                good_lead,
            } = score_lead(&lead, now);
            ScoredLead {
                lead,
                lead_score: score,
                contact_score,
                good_lead,
            }
        })
        .filter(|scored| !query.good_only || scored.good_lead)
        .collect();

    HttpResponse::Ok().json(scored)
}

#[get("/stats")]
async fn get_stats(store: web::Data<LeadStore>) -> HttpResponse {
    match store.get_stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            log::error!("Failed to load stats: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    limit: i64,
}

fn default_history_limit() -> i64 {
    50
}

#[get("/history")]
async fn get_history(
    query: web::Query<HistoryQuery>,
    store: web::Data<LeadStore>,
) -> HttpResponse {
    match store.get_search_history(query.limit).await {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(e) => {
            log::error!("Failed to load search history: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/export")]
async fn export_leads(
    query: web::Query<LeadQuery>,
    store: web::Data<LeadStore>,
) -> HttpResponse {
    match store.get_all_leads(query.template.as_deref()).await {
        Ok(leads) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(leads_to_csv(&leads)),
        Err(e) => {
            log::error!("Failed to export leads: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/{id}")]
async fn delete_lead(path: web::Path<String>, store: web::Data<LeadStore>) -> HttpResponse {
    match store.delete_lead(&path).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "deleted": true })),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({ "deleted": false })),
        Err(e) => {
            log::error!("Failed to delete lead {}: {:?}", path, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct ClearBody {
    #[serde(default)]
    confirm: bool,
}

#[post("/clear")]
async fn clear_leads(body: web::Json<ClearBody>, store: web::Data<LeadStore>) -> HttpResponse {
    if !body.confirm {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "warning": "clearing the database is irreversible; pass confirm: true"
        }));
    }

    match store.clear_all().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "cleared": true })),
        Err(e) => {
            log::error!("Failed to clear database: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct CleanupBody {
    #[serde(default)]
    apply: bool,
    max_age_days: Option<i64>,
}

#[post("/cleanup")]
async fn cleanup_leads(
    body: web::Json<CleanupBody>,
    store: web::Data<LeadStore>,
    reddit_client: web::Data<RedditClient>,
    settings: web::Data<SearchSettings>,
) -> HttpResponse {
    let max_age_days = body.max_age_days.unwrap_or(settings.reddit_max_age_days);

    match sweep_stale_reddit_leads(&store, &reddit_client, max_age_days, body.apply).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            log::error!("Cleanup sweep failed: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

const EXPORT_COLUMNS: &str = "first_name,last_name,company_name,website_url,email,phone";

fn leads_to_csv(leads: &[Lead]) -> String {
    let mut out = String::from(EXPORT_COLUMNS);
    out.push('\n');

    for lead in leads {
        let row = [
            &lead.first_name,
            &lead.last_name,
            &lead.company_name,
            &lead.website_url,
            &lead.email,
            &lead.phone,
        ]
        .iter()
        .map(|field| csv_escape(field))
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::candidate::LeadSource;

    fn lead(first: &str, company: &str) -> Lead {
        Lead {
            id: "id".to_string(),
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            company_name: company.to_string(),
            website_url: "https://example.com".to_string(),
            email: "jane@gmail.com".to_string(),
            phone: "".to_string(),
            template: "realtors".to_string(),
            locations: "Boston MA".to_string(),
            url_hash: "hash".to_string(),
            lead_source: LeadSource::Cse,
            location_match: true,
            intent_match: false,
            keyword_match: None,
            post_created_at: None,
            created_at: Utc::now(),
            last_seen: Utc::now(),
            times_seen: 1,
        }
    }

    #[test]
    fn csv_escapes_commas_and_quotes() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("Doe, Jane"), "\"Doe, Jane\"");
        assert_eq!(csv_escape("the \"best\" agent"), "\"the \"\"best\"\" agent\"");
    }

    #[test]
    fn csv_export_has_header_and_one_row_per_lead() {
        let csv = leads_to_csv(&[lead("Jane", "Acme Realty"), lead("Bob", "Doe, Roe & Co")]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], EXPORT_COLUMNS);
        assert!(lines[1].starts_with("Jane,Doe,Acme Realty,"));
        assert!(lines[2].contains("\"Doe, Roe & Co\""));
    }
}
