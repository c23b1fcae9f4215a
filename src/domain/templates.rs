use serde::Serialize;

/// Consumer email providers worth surfacing in queries and extraction.
pub const EMAIL_DOMAINS: &[&str] = &[
    "@gmail.com",
    "@outlook.com",
    "@hotmail.com",
    "@live.com",
    "@yahoo.com",
    "@icloud.com",
    "@me.com",
    "@aol.com",
    "@comcast.net",
    "@verizon.net",
    "@att.net",
];

pub const SOCIAL_SITES: &[&str] = &[
    "instagram.com",
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "reddit.com",
    "tiktok.com",
    "nextdoor.com",
    "youtube.com",
    "pinterest.com",
    "craigslist.org",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemplateCategory {
    ServiceProviders,
    HomeBuyers,
    HomeSellers,
    HomeImprovement,
    Other,
}

impl TemplateCategory {
    pub fn label(&self) -> &'static str {
        match self {
            TemplateCategory::ServiceProviders => "Service Providers",
            TemplateCategory::HomeBuyers => "Home Buyers",
            TemplateCategory::HomeSellers => "Home Sellers",
            TemplateCategory::HomeImprovement => "Home Improvement",
            TemplateCategory::Other => "Other",
        }
    }
}

/// A named lead-finding strategy: what to search for, where, and what
/// phrasing signals an active request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SearchTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub category: TemplateCategory,
    pub keywords: &'static [&'static str],
    pub intent_phrases: &'static [&'static str],
    pub exclude_terms: &'static [&'static str],
    /// Subreddits worth restricting reddit.com to, instead of the whole site.
    pub subreddits: &'static [&'static str],
}

impl SearchTemplate {
    pub fn sites(&self) -> &'static [&'static str] {
        SOCIAL_SITES
    }

    /// Templates hunting for private people rather than professionals.
    /// Their candidates rarely publish contact info, so the persistence
    /// gate accepts an intent or keyword hit instead.
    pub fn is_people_category(&self) -> bool {
        self.category != TemplateCategory::ServiceProviders
    }
}

const TEMPLATES: &[SearchTemplate] = &[
    SearchTemplate {
        name: "realtors",
        description: "Find real estate agents and realtors",
        category: TemplateCategory::ServiceProviders,
        keywords: &[
            "realtor",
            "real estate agent",
            "listing agent",
            "buyer's agent",
            "broker",
            "real estate broker",
        ],
        intent_phrases: &[
            "looking for a realtor",
            "need a realtor",
            "recommend a realtor",
            "real estate agent recommendations",
            "seeking a realtor",
            "looking for a real estate agent",
        ],
        exclude_terms: &["job", "hiring", "career"],
        subreddits: &["RealEstate", "realtors"],
    },
    SearchTemplate {
        name: "contractors",
        description: "Find contractors and home improvement professionals",
        category: TemplateCategory::ServiceProviders,
        keywords: &[
            "contractor",
            "general contractor",
            "licensed contractor",
            "home improvement",
            "handyman",
            "remodeling",
            "renovation",
            "home renovation",
        ],
        intent_phrases: &[
            "looking for a contractor",
            "need a contractor",
            "recommend a contractor",
            "any contractor recommendations",
            "looking for a handyman",
            "need a handyman",
        ],
        exclude_terms: &["job", "hiring", "career"],
        subreddits: &["Contractor", "HomeImprovement"],
    },
    SearchTemplate {
        name: "home_buyers",
        description: "Find people who recently bought homes",
        category: TemplateCategory::HomeBuyers,
        keywords: &[
            "just bought a house",
            "new homeowner",
            "bought my first home",
            "closed on my house",
            "new home purchase",
            "house closing",
            "finally a homeowner",
            "offer accepted",
            "under contract",
        ],
        intent_phrases: &[
            "looking to buy a home",
            "house hunting",
            "first time buyer",
            "buying a house",
            "pre-approved for mortgage",
        ],
        exclude_terms: &["realtor", "agent", "for sale", "listing"],
        subreddits: &["RealEstate", "FirstTimeHomeBuyer", "homeowners"],
    },
    SearchTemplate {
        name: "first_time_buyers",
        description: "Find first-time home buyers",
        category: TemplateCategory::HomeBuyers,
        keywords: &[
            "first time home buyer",
            "first home",
            "buying my first house",
            "looking to buy a home",
            "house hunting",
            "pre-approved for mortgage",
            "mortgage pre-approval",
        ],
        intent_phrases: &[
            "first time buyer",
            "buying my first home",
            "looking to buy a home",
            "house hunting",
            "need a mortgage",
        ],
        exclude_terms: &["realtor", "agent", "tips", "advice"],
        subreddits: &["FirstTimeHomeBuyer", "Mortgages"],
    },
    SearchTemplate {
        name: "home_sellers",
        description: "Find people looking to sell their homes",
        category: TemplateCategory::HomeSellers,
        keywords: &[
            "selling my house",
            "need to sell my home",
            "house for sale",
            "looking for a realtor",
            "need a real estate agent",
            "want to list my house",
            "sell my home",
            "list my home",
        ],
        intent_phrases: &[
            "need to sell my house",
            "looking to sell my home",
            "want to list my house",
            "selling my home",
            "need a realtor",
        ],
        exclude_terms: &["realtor", "agent", "I can help"],
        subreddits: &["RealEstate", "homeowners"],
    },
    SearchTemplate {
        name: "downsizing",
        description: "Find people downsizing/selling homes",
        category: TemplateCategory::HomeSellers,
        keywords: &[
            "downsizing our home",
            "empty nester",
            "moving to smaller house",
            "selling family home",
            "too much house",
            "retiring and moving",
            "downsizing house",
        ],
        intent_phrases: &[
            "looking to downsize",
            "downsizing our home",
            "moving to a smaller house",
            "sell family home",
            "empty nest downsizing",
        ],
        exclude_terms: &["realtor", "agent"],
        subreddits: &["RealEstate", "retirement"],
    },
    SearchTemplate {
        name: "renovation_needed",
        description: "Find people needing home renovations",
        category: TemplateCategory::HomeImprovement,
        keywords: &[
            "need renovation",
            "fixer upper",
            "home improvement needed",
            "need to remodel",
            "kitchen renovation",
            "bathroom remodel",
            "need contractor",
            "home remodel",
            "renovation project",
        ],
        intent_phrases: &[
            "need a contractor",
            "looking for a contractor",
            "need renovation",
            "need to remodel",
            "remodeling contractor",
        ],
        exclude_terms: &["contractor", "business", "hire me"],
        subreddits: &["HomeImprovement", "Renovations"],
    },
    SearchTemplate {
        name: "home_repair",
        description: "Find people needing home repairs",
        category: TemplateCategory::HomeImprovement,
        keywords: &[
            "need handyman",
            "home repair needed",
            "roof repair",
            "roof leak",
            "leaking roof",
            "plumbing leak",
            "plumbing issue",
            "water heater",
            "pipe burst",
            "electrical problem",
            "electrical repair",
            "hvac repair",
            "ac repair",
            "furnace repair",
            "sump pump",
            "foundation crack",
            "drywall repair",
            "water damage",
        ],
        intent_phrases: &[
            "need repair",
            "need a handyman",
            "looking for repair",
            "fix my",
            "repair needed",
            "plumber recommendation",
            "electrician recommendation",
            "roof repair",
            "plumbing issue",
            "hvac repair",
            "water heater repair",
        ],
        exclude_terms: &["contractor", "business", "hire me"],
        subreddits: &["HomeImprovement", "Plumbing", "hvacadvice"],
    },
    SearchTemplate {
        name: "relocating",
        description: "Find people relocating to new areas",
        category: TemplateCategory::Other,
        keywords: &[
            "moving to",
            "relocating to",
            "transferring to",
            "new job in",
            "just moved to",
            "looking for housing in",
            "moving for work",
            "relocation",
        ],
        intent_phrases: &[
            "moving to",
            "relocating to",
            "just moved to",
            "looking for housing",
            "relocation assistance",
        ],
        exclude_terms: &["realtor", "agent", "moving company"],
        subreddits: &["relocating", "moving"],
    },
    SearchTemplate {
        name: "investors",
        description: "Find real estate investors",
        category: TemplateCategory::Other,
        keywords: &[
            "investment property",
            "rental property",
            "looking to invest in real estate",
            "building portfolio",
            "fix and flip",
            "house flipping",
            "cash buyer",
            "real estate investor",
        ],
        intent_phrases: &[
            "looking to invest",
            "seeking investment property",
            "buying rental property",
            "fix and flip",
            "real estate investor",
        ],
        exclude_terms: &["course", "coaching", "mentor"],
        subreddits: &["realestateinvesting", "Landlord"],
    },
    SearchTemplate {
        name: "urgent_sellers",
        description: "Find people who need to sell quickly",
        category: TemplateCategory::HomeSellers,
        keywords: &[
            "need to sell fast",
            "quick sale needed",
            "divorce selling house",
            "inherited house",
            "foreclosure",
            "sell house quickly",
            "motivated seller",
            "need to sell quickly",
        ],
        intent_phrases: &[
            "need to sell fast",
            "sell my house quickly",
            "urgent sale",
            "motivated seller",
            "sell fast",
        ],
        exclude_terms: &["buy houses", "we buy", "cash offer"],
        subreddits: &["RealEstate"],
    },
];

pub fn all_templates() -> &'static [SearchTemplate] {
    TEMPLATES
}

pub fn get_template(name: &str) -> Option<&'static SearchTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}

pub fn list_by_category() -> Vec<(&'static str, Vec<&'static SearchTemplate>)> {
    [
        TemplateCategory::ServiceProviders,
        TemplateCategory::HomeBuyers,
        TemplateCategory::HomeSellers,
        TemplateCategory::HomeImprovement,
        TemplateCategory::Other,
    ]
    .iter()
    .map(|category| {
        (
            category.label(),
            TEMPLATES.iter().filter(|t| t.category == *category).collect(),
        )
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_is_reachable_by_name() {
        for template in all_templates() {
            assert!(get_template(template.name).is_some());
        }
        assert!(get_template("nope").is_none());
    }

    #[test]
    fn categories_cover_all_templates() {
        let listed: usize = list_by_category().iter().map(|(_, t)| t.len()).sum();
        assert_eq!(listed, all_templates().len());
    }

    #[test]
    fn only_service_providers_require_contact_info() {
        assert!(!get_template("realtors").unwrap().is_people_category());
        assert!(!get_template("contractors").unwrap().is_people_category());
        assert!(get_template("home_sellers").unwrap().is_people_category());
        assert!(get_template("relocating").unwrap().is_people_category());
    }
}
