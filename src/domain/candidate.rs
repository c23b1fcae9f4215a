use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Where a lead was sighted, derived from the host of its link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadSource {
    Cse,
    Places,
    Reddit,
    Facebook,
    Instagram,
    Linkedin,
    Nextdoor,
    Tiktok,
    Youtube,
    Pinterest,
    Craigslist,
}

impl LeadSource {
    pub fn from_link(link: &str) -> Self {
        let host = Url::parse(link)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_default();

        if host.contains("reddit.com") {
            LeadSource::Reddit
        } else if host.contains("facebook.com") {
            LeadSource::Facebook
        } else if host.contains("instagram.com") {
            LeadSource::Instagram
        } else if host.contains("linkedin.com") {
            LeadSource::Linkedin
        } else if host.contains("nextdoor.com") {
            LeadSource::Nextdoor
        } else if host.contains("tiktok.com") {
            LeadSource::Tiktok
        } else if host.contains("youtube.com") {
            LeadSource::Youtube
        } else if host.contains("pinterest.com") {
            LeadSource::Pinterest
        } else if host.contains("craigslist.org") {
            LeadSource::Craigslist
        } else if host.contains("google.com") {
            // Places items are normalized to a maps.google.com place link
            LeadSource::Places
        } else {
            LeadSource::Cse
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Cse => "cse",
            LeadSource::Places => "places",
            LeadSource::Reddit => "reddit",
            LeadSource::Facebook => "facebook",
            LeadSource::Instagram => "instagram",
            LeadSource::Linkedin => "linkedin",
            LeadSource::Nextdoor => "nextdoor",
            LeadSource::Tiktok => "tiktok",
            LeadSource::Youtube => "youtube",
            LeadSource::Pinterest => "pinterest",
            LeadSource::Craigslist => "craigslist",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "places" => LeadSource::Places,
            "reddit" => LeadSource::Reddit,
            "facebook" => LeadSource::Facebook,
            "instagram" => LeadSource::Instagram,
            "linkedin" => LeadSource::Linkedin,
            "nextdoor" => LeadSource::Nextdoor,
            "tiktok" => LeadSource::Tiktok,
            "youtube" => LeadSource::Youtube,
            "pinterest" => LeadSource::Pinterest,
            "craigslist" => LeadSource::Craigslist,
            _ => LeadSource::Cse,
        }
    }
}

/// An in-flight extraction result from one search hit, annotated by the
/// pipeline filters but not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub website_url: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location_match: bool,
    pub intent_match: bool,
    /// None when the source carries no text to match against (Places).
    pub keyword_match: Option<bool>,
    pub lead_source: LeadSource,
    pub post_created_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn has_contact_info(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
            || self.phone.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::LeadSource;

    #[test]
    fn source_from_link_by_host() {
        let cases = [
            ("https://www.reddit.com/r/RealEstate/comments/abc", LeadSource::Reddit),
            ("https://www.facebook.com/groups/boston", LeadSource::Facebook),
            ("https://www.linkedin.com/in/jane-doe", LeadSource::Linkedin),
            ("https://www.google.com/maps/place/?q=place_id:xyz", LeadSource::Places),
            ("https://www.janedoerealty.com/contact", LeadSource::Cse),
        ];
        for (link, expected) in cases {
            assert_eq!(LeadSource::from_link(link), expected);
        }
    }

    #[test]
    fn source_from_unparsable_link_defaults_to_cse() {
        assert_eq!(LeadSource::from_link("not a url"), LeadSource::Cse);
    }

    #[test]
    fn source_round_trips_through_str() {
        assert_eq!(LeadSource::parse(LeadSource::Nextdoor.as_str()), LeadSource::Nextdoor);
        assert_eq!(LeadSource::parse("unknown"), LeadSource::Cse);
    }
}
