use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::configuration::SearchSettings;
use crate::dal::lead_store::LeadStore;
use crate::services::{
    run_search, GooglePlacesClient, GoogleSearchClient, RedditClient, SearchRequest,
};

#[derive(Deserialize)]
pub struct SearchBody {
    template: String,
    locations: Vec<String>,
    sites: Option<Vec<String>>,
    #[serde(default = "default_max_results")]
    max_results: u32,
    #[serde(default = "default_include_email_domains")]
    include_email_domains: bool,
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    use_places: bool,
}

fn default_max_results() -> u32 {
    30
}

fn default_include_email_domains() -> bool {
    true
}

#[post("")]
async fn search(
    body: web::Json<SearchBody>,
    store: web::Data<LeadStore>,
    search_client: web::Data<GoogleSearchClient>,
    places_client: web::Data<Option<GooglePlacesClient>>,
    reddit_client: web::Data<RedditClient>,
    settings: web::Data<SearchSettings>,
) -> HttpResponse {
    let body = body.into_inner();
    let request = SearchRequest {
        template: body.template,
        locations: body.locations,
        sites: body.sites,
        max_results: body.max_results,
        include_email_domains: body.include_email_domains,
        strict: body.strict,
        use_places: body.use_places,
    };

    match run_search(
        &search_client,
        places_client.get_ref().as_ref(),
        &reddit_client,
        &store,
        &settings,
        request,
    )
    .await
    {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) if e.is_user_warning() => {
            HttpResponse::BadRequest().json(serde_json::json!({ "warning": e.to_string() }))
        }
        Err(e) => {
            log::error!("Search run failed: {:?}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}
