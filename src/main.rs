use std::net::TcpListener;

use env_logger::Env;
use prospect::{
    configuration::get_configuration,
    dal::lead_store::LeadStore,
    services::{GooglePlacesClient, GoogleSearchClient, RedditClient},
    startup::run,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let store = LeadStore::connect(&configuration.database)
        .await
        .expect("Failed to initialize the lead store.");

    let search_client = GoogleSearchClient::new(
        configuration.api_keys.google_api_key,
        configuration.api_keys.google_cse_id,
    )
    .expect("Google Custom Search credentials are required.");

    let places_client = configuration
        .api_keys
        .google_places_api_key
        .filter(|key| !key.is_empty())
        .map(GooglePlacesClient::new);
    if places_client.is_none() {
        log::info!("No Places API key configured; places searches are disabled");
    }

    let reddit_client = RedditClient::new();

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    run(
        listener,
        store,
        search_client,
        places_client,
        reddit_client,
        configuration.search,
    )?
    .await
}
