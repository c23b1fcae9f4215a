use std::net::TcpListener;

use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::{
    configuration::SearchSettings,
    dal::lead_store::LeadStore,
    routes::{default_route, lead_route, search_route, template_route},
    services::{GooglePlacesClient, GoogleSearchClient, RedditClient},
};

pub fn run(
    listener: TcpListener,
    store: LeadStore,
    search_client: GoogleSearchClient,
    places_client: Option<GooglePlacesClient>,
    reddit_client: RedditClient,
    search_settings: SearchSettings,
) -> Result<Server, std::io::Error> {
    let store = Data::new(store);
    let search_client = Data::new(search_client);
    let places_client = Data::new(places_client);
    let reddit_client = Data::new(reddit_client);
    let search_settings = Data::new(search_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(web::scope("/search").service(search_route::search))
            .service(
                web::scope("/lead")
                    .service(lead_route::get_leads)
                    .service(lead_route::get_stats)
                    .service(lead_route::get_history)
                    .service(lead_route::export_leads)
                    .service(lead_route::clear_leads)
                    .service(lead_route::cleanup_leads)
                    .service(lead_route::delete_lead),
            )
            .service(web::scope("/template").service(template_route::list_templates))
            .app_data(store.clone())
            .app_data(search_client.clone())
            .app_data(places_client.clone())
            .app_data(reddit_client.clone())
            .app_data(search_settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
