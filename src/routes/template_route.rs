use actix_web::{get, HttpResponse};

use crate::domain::templates;

#[get("")]
async fn list_templates() -> HttpResponse {
    let categories: Vec<serde_json::Value> = templates::list_by_category()
        .into_iter()
        .map(|(category, templates)| {
            serde_json::json!({
                "category": category,
                "templates": templates,
            })
        })
        .collect();

    HttpResponse::Ok().json(categories)
}
