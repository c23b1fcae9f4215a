use std::sync::LazyLock;

use regex::Regex;

use super::candidate::{Candidate, LeadSource};

/// Only consumer mail providers count: a personal inbox in a snippet is a
/// reachable human, an info@ corporate address usually is not.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b[A-Za-z0-9._%+-]+@(?:gmail|outlook|hotmail|live|yahoo|icloud|me|aol|comcast|verizon|att)\.(?:com|net)\b",
    )
    .expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("valid regex")
});

static TITLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[|—\-]+.*$").expect("valid regex"));

static TITLE_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[@()]\s*.*$").expect("valid regex"));

static CAPITALIZED_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("valid regex"));

static COMPANY_AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:at|with|@)\s+([A-Z][A-Za-z\s&]+(?:Realty|Properties|Homes|Group|Team|Real Estate))")
        .expect("valid regex")
});

static COMPANY_BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][A-Za-z\s&]+(?:Realty|Properties|Homes|Group|Team|Real Estate))")
        .expect("valid regex")
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const NAME_STOPWORDS: &[&str] = &[
    "inc", "llc", "ltd", "corp", "company", "group", "team", "realty", "properties", "homes",
    "real estate", "realtor",
];

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First North American number in the text, reformatted for display.
/// Only 10-digit and 11-digit-with-leading-1 numbers qualify.
pub fn extract_phone(text: &str) -> Option<String> {
    let raw = PHONE_RE.find(text)?;
    let digits: String = raw.as_str().chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => Some(format!(
            "({}) {}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..]
        )),
        11 if digits.starts_with('1') => Some(format!(
            "+1 ({}) {}-{}",
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        )),
        _ => None,
    }
}

/// Best-effort name guess: capitalized words from the title, with business
/// terms filtered out and everything after a separator discarded.
pub fn extract_name(title: &str) -> (Option<String>, Option<String>) {
    if title.is_empty() {
        return (None, None);
    }

    let trimmed = TITLE_SEPARATOR_RE.replace(title, "");
    let trimmed = TITLE_PAREN_RE.replace(&trimmed, "");

    let names: Vec<&str> = CAPITALIZED_WORD_RE
        .find_iter(&trimmed)
        .map(|m| m.as_str())
        .filter(|word| !NAME_STOPWORDS.contains(&word.to_lowercase().as_str()))
        .collect();

    match names.as_slice() {
        [] => (None, None),
        [first] => (Some(first.to_string()), None),
        [first, last, ..] => (Some(first.to_string()), Some(last.to_string())),
    }
}

/// Looks for "at/with/@ Acme Realty" style mentions, then bare
/// "Acme Realty" as a fallback.
pub fn extract_company(text: &str) -> Option<String> {
    for re in [&*COMPANY_AT_RE, &*COMPANY_BARE_RE] {
        if let Some(captures) = re.captures(text) {
            let company = WHITESPACE_RE
                .replace_all(captures[1].trim(), " ")
                .to_string();
            if company.len() > 3 {
                return Some(company);
            }
        }
    }
    None
}

/// The single extraction entry point: one search hit in, one un-annotated
/// candidate out. Match flags and post timestamps are filled in by the
/// pipeline afterwards.
pub fn extract(title: &str, snippet: &str, link: &str) -> Candidate {
    let combined = format!("{} {}", title, snippet);
    let (first_name, last_name) = extract_name(title);

    Candidate {
        first_name,
        last_name,
        company_name: extract_company(&combined),
        website_url: link.to_string(),
        email: extract_email(&combined),
        phone: extract_phone(&combined),
        location_match: false,
        intent_match: false,
        keyword_match: None,
        lead_source: LeadSource::from_link(link),
        post_created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_whitelisted_email_only() {
        assert_eq!(
            extract_email("reach me at jane.doe99@gmail.com anytime"),
            Some("jane.doe99@gmail.com".to_string())
        );
        assert_eq!(extract_email("contact info@acmerealty.com"), None);
    }

    #[test]
    fn normalizes_ten_digit_phone() {
        assert_eq!(
            extract_phone("call 617-555-0101 today"),
            Some("(617) 555-0101".to_string())
        );
        assert_eq!(
            extract_phone("call (617) 555.0101 today"),
            Some("(617) 555-0101".to_string())
        );
    }

    #[test]
    fn normalizes_eleven_digit_phone_with_country_code() {
        assert_eq!(
            extract_phone("+1 617 555 0101"),
            Some("+1 (617) 555-0101".to_string())
        );
    }

    #[test]
    fn rejects_text_without_phone() {
        assert_eq!(extract_phone("no number here"), None);
    }

    #[test]
    fn name_from_title_skips_business_words() {
        let (first, last) = extract_name("Jane Doe Realty | Greater Boston");
        assert_eq!(first.as_deref(), Some("Jane"));
        assert_eq!(last.as_deref(), Some("Doe"));
    }

    #[test]
    fn name_truncates_at_separator() {
        let (first, last) = extract_name("Bob — Somerville Handyman Services");
        assert_eq!(first.as_deref(), Some("Bob"));
        assert_eq!(last, None);
    }

    #[test]
    fn extracts_company_after_at() {
        assert_eq!(
            extract_company("Jane Doe, agent at Beacon Hill Realty since 2019"),
            Some("Beacon Hill Realty".to_string())
        );
    }

    #[test]
    fn extract_builds_a_full_candidate() {
        let candidate = extract(
            "Jane Doe - Boston Realtor",
            "Email jane@yahoo.com or call 617-555-0101",
            "https://www.instagram.com/janedoe",
        );
        assert_eq!(candidate.first_name.as_deref(), Some("Jane"));
        assert_eq!(candidate.last_name.as_deref(), Some("Doe"));
        assert_eq!(candidate.email.as_deref(), Some("jane@yahoo.com"));
        assert_eq!(candidate.phone.as_deref(), Some("(617) 555-0101"));
        assert_eq!(candidate.lead_source, LeadSource::Instagram);
        assert!(!candidate.location_match);
        assert_eq!(candidate.keyword_match, None);
    }
}
