use std::cmp::Reverse;
use std::collections::HashSet;

use super::search_result::SearchResult;

/// Abbreviation/name pairs for the 50 US states. Lookups are
/// case-insensitive; both columns are stored lowercased.
const US_STATES: &[(&str, &str)] = &[
    ("al", "alabama"),
    ("ak", "alaska"),
    ("az", "arizona"),
    ("ar", "arkansas"),
    ("ca", "california"),
    ("co", "colorado"),
    ("ct", "connecticut"),
    ("de", "delaware"),
    ("fl", "florida"),
    ("ga", "georgia"),
    ("hi", "hawaii"),
    ("id", "idaho"),
    ("il", "illinois"),
    ("in", "indiana"),
    ("ia", "iowa"),
    ("ks", "kansas"),
    ("ky", "kentucky"),
    ("la", "louisiana"),
    ("me", "maine"),
    ("md", "maryland"),
    ("ma", "massachusetts"),
    ("mi", "michigan"),
    ("mn", "minnesota"),
    ("ms", "mississippi"),
    ("mo", "missouri"),
    ("mt", "montana"),
    ("ne", "nebraska"),
    ("nv", "nevada"),
    ("nh", "new hampshire"),
    ("nj", "new jersey"),
    ("nm", "new mexico"),
    ("ny", "new york"),
    ("nc", "north carolina"),
    ("nd", "north dakota"),
    ("oh", "ohio"),
    ("ok", "oklahoma"),
    ("or", "oregon"),
    ("pa", "pennsylvania"),
    ("ri", "rhode island"),
    ("sc", "south carolina"),
    ("sd", "south dakota"),
    ("tn", "tennessee"),
    ("tx", "texas"),
    ("ut", "utah"),
    ("vt", "vermont"),
    ("va", "virginia"),
    ("wa", "washington"),
    ("wv", "west virginia"),
    ("wi", "wisconsin"),
    ("wy", "wyoming"),
];

fn state_name_for_abbrev(abbrev: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(a, _)| *a == abbrev)
        .map(|(_, name)| *name)
}

fn abbrev_for_state_name(name: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(a, _)| *a)
}

/// The set of location tokens a search run considers "allowed", parsed
/// from free-form strings like "Boston MA" or "Nashua, New Hampshire".
#[derive(Debug, Default, Clone)]
pub struct LocationFilter {
    cities: HashSet<String>,
    state_abbrevs: HashSet<String>,
    state_names: HashSet<String>,
}

impl LocationFilter {
    pub fn parse(raw_locations: &[String]) -> Self {
        let mut filter = LocationFilter::default();

        for raw in raw_locations {
            let cleaned = raw.replace(',', " ").to_lowercase();
            let tokens: Vec<&str> = cleaned.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            // "Boston MA": trailing two-letter state abbreviation.
            let last = tokens[tokens.len() - 1];
            if last.len() == 2 {
                if let Some(name) = state_name_for_abbrev(last) {
                    filter.state_abbrevs.insert(last.to_string());
                    filter.state_names.insert(name.to_string());
                    if tokens.len() > 1 {
                        filter.cities.insert(tokens[..tokens.len() - 1].join(" "));
                    }
                    continue;
                }
            }

            // "Nashua New Hampshire" / "Boston Massachusetts": trailing
            // full state name, two tokens first, then one.
            let mut matched_name_len = None;
            if tokens.len() >= 2 {
                let last_two = tokens[tokens.len() - 2..].join(" ");
                if abbrev_for_state_name(&last_two).is_some() {
                    matched_name_len = Some(2);
                }
            }
            if matched_name_len.is_none() && abbrev_for_state_name(last).is_some() {
                matched_name_len = Some(1);
            }

            match matched_name_len {
                Some(n) => {
                    let name = tokens[tokens.len() - n..].join(" ");
                    let abbrev = abbrev_for_state_name(&name).unwrap();
                    filter.state_names.insert(name);
                    filter.state_abbrevs.insert(abbrev.to_string());
                    let city = tokens[..tokens.len() - n].join(" ");
                    if !city.is_empty() {
                        filter.cities.insert(city);
                    }
                }
                None => {
                    // No recognizable state: the whole string is a city.
                    filter.cities.insert(tokens.join(" "));
                }
            }
        }

        filter
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.state_abbrevs.is_empty() && self.state_names.is_empty()
    }

    /// True when the result's combined text mentions an allowed city or
    /// state name as a whole-word phrase, or an allowed abbreviation with
    /// non-letter boundaries.
    pub fn matches(&self, result: &SearchResult) -> bool {
        let text = result.combined_text();

        self.cities.iter().any(|city| contains_phrase(&text, city))
            || self.state_names.iter().any(|name| contains_phrase(&text, name))
            || self
                .state_abbrevs
                .iter()
                .any(|abbrev| contains_abbrev(&text, abbrev))
    }

    /// Stable descending sort: allowed location (2) ahead of no state
    /// mentioned at all (1) ahead of a different state mentioned (0).
    /// Ties keep their original relative order.
    pub fn rank_by_location(&self, mut results: Vec<SearchResult>) -> Vec<SearchResult> {
        results.sort_by_cached_key(|result| Reverse(self.location_rank(result)));
        results
    }

    fn location_rank(&self, result: &SearchResult) -> u8 {
        if self.matches(result) {
            return 2;
        }
        let text = result.combined_text();
        let mentions_any_state = US_STATES
            .iter()
            .any(|(abbrev, name)| contains_phrase(&text, name) || contains_abbrev(&text, abbrev));
        if mentions_any_state {
            0
        } else {
            1
        }
    }
}

/// Whole-word containment: the phrase occurs with no alphanumeric
/// character on either side.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(phrase) {
        let at = start + pos;
        let end = at + phrase.len();
        let before_ok = haystack[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = at + phrase.chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Like `contains_phrase` but only letters break a match, so "ma" still
/// matches inside "boston, ma 02114" while staying out of "mansion".
fn contains_abbrev(haystack: &str, abbrev: &str) -> bool {
    if abbrev.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(abbrev) {
        let at = start + pos;
        let end = at + abbrev.len();
        let before_ok = haystack[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphabetic());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphabetic());
        if before_ok && after_ok {
            return true;
        }
        start = at + abbrev.chars().next().map_or(1, char::len_utf8);
    }
    false
}
