pub mod candidate;
pub mod contact;
pub mod lead;
pub mod location;
pub mod relevance;
pub mod scoring;
pub mod search_result;
pub mod templates;
