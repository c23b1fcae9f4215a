pub mod default_route;
pub mod lead_route;
pub mod search_route;
pub mod template_route;
