use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::search_result::SearchResult;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const PLACES_SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const PLACE_DETAILS_URL: &str = "https://places.googleapis.com/v1/places/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const METERS_PER_MILE: f64 = 1609.34;

/// Client for the Google Places API (Text Search + Details) with the
/// Geocoding API for location biasing.
pub struct GooglePlacesClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub id: String,
    pub display_name: Option<DisplayName>,
    #[serde(default)]
    pub formatted_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayName {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchResponse {
    #[serde(default)]
    pub places: Vec<Place>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub website_uri: Option<String>,
    pub international_phone_number: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct PlacesStats {
    pub locations_total: usize,
    pub locations_geocoded: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextSearchPayload<'a> {
    text_query: &'a str,
    max_result_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_bias: Option<LocationBias>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Serialize)]
struct LocationBias {
    circle: Circle,
}

#[derive(Serialize)]
struct Circle {
    center: LatLng,
    radius: f64,
}

#[derive(Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl GooglePlacesClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest client");

        GooglePlacesClient { client, api_key }
    }

    pub async fn geocode(&self, location: &str) -> Option<(f64, f64)> {
        if location.is_empty() {
            return None;
        }

        #[derive(Deserialize)]
        struct GeocodeResponse {
            #[serde(default)]
            results: Vec<GeocodeResult>,
        }
        #[derive(Deserialize)]
        struct GeocodeResult {
            geometry: Geometry,
        }
        #[derive(Deserialize)]
        struct Geometry {
            location: GeocodeLocation,
        }
        #[derive(Deserialize)]
        struct GeocodeLocation {
            lat: f64,
            lng: f64,
        }

        let response = self
            .client
            .get(GEOCODE_URL)
            .query(&[("address", location), ("key", &self.api_key)])
            .send()
            .await;

        match response {
            Ok(response) => match response.json::<GeocodeResponse>().await {
                Ok(data) => data
                    .results
                    .first()
                    .map(|r| (r.geometry.location.lat, r.geometry.location.lng)),
                Err(e) => {
                    log::error!("Failed to parse geocode response for {}: {:?}", location, e);
                    None
                }
            },
            Err(e) => {
                log::error!("Geocode request failed for {}: {:?}", location, e);
                None
            }
        }
    }

    pub async fn text_search(
        &self,
        query: &str,
        location: Option<(f64, f64)>,
        radius_meters: f64,
        page_token: Option<&str>,
        max_results: u32,
    ) -> TextSearchResponse {
        let payload = TextSearchPayload {
            text_query: query,
            max_result_count: max_results,
            location_bias: location.map(|(lat, lng)| LocationBias {
                circle: Circle {
                    center: LatLng {
                        latitude: lat,
                        longitude: lng,
                    },
                    radius: radius_meters,
                },
            }),
            page_token,
        };

        let response = self
            .client
            .post(PLACES_SEARCH_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header(
                "X-Goog-FieldMask",
                "places.id,places.displayName,places.formattedAddress,nextPageToken",
            )
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) => response.json::<TextSearchResponse>().await.unwrap_or_else(|e| {
                log::error!("Failed to parse places response: {:?}", e);
                TextSearchResponse::default()
            }),
            Err(e) => {
                log::error!("Places text search failed: {:?}", e);
                TextSearchResponse::default()
            }
        }
    }

    pub async fn place_details(&self, place_id: &str) -> PlaceDetails {
        let response = self
            .client
            .get(format!("{}{}", PLACE_DETAILS_URL, place_id))
            .header("X-Goog-Api-Key", &self.api_key)
            .header(
                "X-Goog-FieldMask",
                "id,displayName,formattedAddress,websiteUri,internationalPhoneNumber",
            )
            .send()
            .await;

        match response {
            Ok(response) => response.json::<PlaceDetails>().await.unwrap_or_else(|e| {
                log::error!("Failed to parse place details for {}: {:?}", place_id, e);
                PlaceDetails::default()
            }),
            Err(e) => {
                log::error!("Place details request failed for {}: {:?}", place_id, e);
                PlaceDetails::default()
            }
        }
    }

    /// Geocode each location and page through text search around it,
    /// deduplicating by place id, until `max_results` places are
    /// collected. Sequential, with a fixed delay before each token fetch.
    pub async fn search_locations(
        &self,
        base_query: &str,
        locations: &[String],
        max_results: usize,
        radius_miles: f64,
        delay: Duration,
    ) -> (Vec<Place>, PlacesStats) {
        let mut results: Vec<Place> = vec![];
        let mut seen_place_ids = HashSet::new();
        let radius_meters = radius_miles * METERS_PER_MILE;

        let mut stats = PlacesStats {
            locations_total: locations.len(),
            locations_geocoded: 0,
        };

        for location in locations {
            let Some(coords) = self.geocode(location).await else {
                continue;
            };
            stats.locations_geocoded += 1;

            let query = format!("{} in {}", base_query, location);
            let mut page_token: Option<String> = None;

            while results.len() < max_results {
                let remaining = (max_results - results.len()).min(20) as u32;
                let data = self
                    .text_search(
                        &query,
                        Some(coords),
                        radius_meters,
                        page_token.as_deref(),
                        remaining,
                    )
                    .await;

                for place in data.places {
                    if place.id.is_empty() || !seen_place_ids.insert(place.id.clone()) {
                        continue;
                    }
                    results.push(place);
                    if results.len() >= max_results {
                        break;
                    }
                }

                page_token = data.next_page_token;
                if page_token.is_none() || results.len() >= max_results {
                    break;
                }
                tokio::time::sleep(delay).await;
            }

            if results.len() >= max_results {
                break;
            }
        }

        (results, stats)
    }
}

/// Tight Places query for a template; the keyword lists are tuned for
/// social text, not business directories.
pub fn places_query_for_template(template_name: &str) -> String {
    match template_name {
        "realtors" => "realtor".to_string(),
        "contractors" => "contractor".to_string(),
        "investors" => "real estate investor".to_string(),
        other => other.replace('_', " "),
    }
}

/// Shape a place into the common result form the rest of the pipeline
/// understands. The maps link doubles as the dedup identity.
pub fn normalize_place(place: &Place) -> SearchResult {
    let maps_url = if place.id.is_empty() {
        String::new()
    } else {
        format!("https://www.google.com/maps/place/?q=place_id:{}", place.id)
    };

    SearchResult {
        title: place
            .display_name
            .as_ref()
            .map(|n| n.text.clone())
            .unwrap_or_default(),
        link: maps_url,
        snippet: place.formatted_address.clone(),
        display_link: "google.com".to_string(),
    }
}
