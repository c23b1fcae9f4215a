use serde::{Deserialize, Serialize};

/// One raw hit from a search collaborator (Custom Search page or a
/// normalized Places item). Consumed once per pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub display_link: String,
}

impl SearchResult {
    /// Lowercased title + snippet + link, the haystack every matching
    /// heuristic runs against.
    pub fn combined_text(&self) -> String {
        format!("{} {} {}", self.title, self.snippet, self.link).to_lowercase()
    }
}
