use chrono::{DateTime, Utc};
use serde::Serialize;

use super::candidate::LeadSource;
use super::lead::Lead;

/// Reddit leads whose post time was never resolved are treated as
/// arbitrarily old rather than fresh.
const UNKNOWN_POST_AGE_DAYS: i64 = 9999;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LeadScore {
    pub score: i64,
    pub contact_score: i64,
    pub good_lead: bool,
}

/// Additive 0-100 quality score. Pure and order-independent: the same
/// lead fields and the same `now` always produce the same output, which
/// is why `now` is a parameter instead of being read from the clock.
pub fn score_lead(lead: &Lead, now: DateTime<Utc>) -> LeadScore {
    let days_old = recency_days(lead, now);

    let mut score: i64 = 0;
    if lead.location_match {
        score += 35;
    }
    if lead.intent_match {
        score += 30;
    }

    score += match days_old {
        d if d <= 7 => 20,
        d if d <= 30 => 15,
        d if d <= 60 => 10,
        d if d <= 90 => 5,
        _ => 0,
    };

    let mut contact_score: i64 = 0;
    if lead.has_email() {
        contact_score += 7;
    }
    if lead.has_phone() {
        contact_score += 7;
    }
    if lead.has_website() {
        contact_score += 6;
    }
    score += contact_score;

    // Tri-state keyword signal: an explicit miss is worse than unknown.
    match lead.keyword_match {
        Some(true) => score += 8,
        Some(false) => score -= 5,
        None => {}
    }

    let matches_neither = !lead.intent_match && lead.keyword_match != Some(true);
    if matches_neither
        && lead.lead_source != LeadSource::Reddit
        && lead.lead_source != LeadSource::Places
    {
        score -= 12;
    }

    score += match lead.lead_source {
        LeadSource::Places => 8,
        LeadSource::Linkedin => 5,
        LeadSource::Facebook => 4,
        LeadSource::Instagram => 3,
        LeadSource::Reddit => 2,
        _ => 3,
    };

    let good_lead = lead.intent_match && lead.location_match && days_old <= 60;
    if good_lead {
        score += 10;
    }

    // Contact and source bonuses alone must not produce a top score.
    if !lead.intent_match {
        score = score.min(60);
    }

    LeadScore {
        score: score.clamp(0, 100),
        contact_score,
        good_lead,
    }
}

fn recency_days(lead: &Lead, now: DateTime<Utc>) -> i64 {
    match lead.post_created_at {
        Some(posted) => (now - posted).num_days(),
        None if lead.lead_source == LeadSource::Reddit => UNKNOWN_POST_AGE_DAYS,
        None => (now - lead.created_at).num_days(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn lead(days_old: i64) -> Lead {
        let created = fixed_now() - Duration::days(days_old);
        Lead {
            id: "test".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            company_name: "".to_string(),
            website_url: "https://example.com".to_string(),
            email: "".to_string(),
            phone: "".to_string(),
            template: "home_sellers".to_string(),
            locations: "Boston MA".to_string(),
            url_hash: "abc".to_string(),
            lead_source: LeadSource::Cse,
            location_match: false,
            intent_match: false,
            keyword_match: None,
            post_created_at: None,
            created_at: created,
            last_seen: created,
            times_seen: 1,
        }
    }

    #[test]
    fn score_stays_within_bounds() {
        let mut best = lead(0);
        best.location_match = true;
        best.intent_match = true;
        best.keyword_match = Some(true);
        best.email = "jane@gmail.com".to_string();
        best.phone = "(617) 555-0101".to_string();
        best.lead_source = LeadSource::Places;
        let scored = score_lead(&best, fixed_now());
        assert!(scored.score <= 100);
        assert!(scored.good_lead);

        let mut worst = lead(400);
        worst.website_url = "".to_string();
        worst.keyword_match = Some(false);
        let scored = score_lead(&worst, fixed_now());
        assert!(scored.score >= 0);
    }

    #[test]
    fn no_intent_caps_score_at_sixty() {
        let mut l = lead(0);
        l.location_match = true;
        l.keyword_match = Some(true);
        l.email = "jane@gmail.com".to_string();
        l.phone = "(617) 555-0101".to_string();
        l.lead_source = LeadSource::Places;
        let scored = score_lead(&l, fixed_now());
        assert!(scored.score <= 60);
        assert!(!scored.good_lead);
    }

    #[test]
    fn recency_ladder_steps_down() {
        // Baseline for the fixture: website +6, source +3, neither-match -12.
        for (days, bonus) in [(3, 20), (20, 15), (45, 10), (80, 5)] {
            let scored = score_lead(&lead(days), fixed_now());
            assert_eq!(scored.score, 6 + 3 - 12 + bonus);
        }
        // Past the ladder the raw total goes negative and clamps to zero.
        assert_eq!(score_lead(&lead(200), fixed_now()).score, 0);
    }

    #[test]
    fn reddit_without_post_time_gets_no_recency_bonus() {
        let mut l = lead(0);
        l.lead_source = LeadSource::Reddit;
        let scored = score_lead(&l, fixed_now());
        // website +6, reddit +2, no recency despite a fresh created_at
        assert_eq!(scored.score, 8);

        l.post_created_at = Some(fixed_now() - Duration::days(2));
        let scored = score_lead(&l, fixed_now());
        assert_eq!(scored.score, 28);
    }

    #[test]
    fn post_time_overrides_record_age() {
        let mut l = lead(0);
        l.post_created_at = Some(fixed_now() - Duration::days(75));
        let scored = score_lead(&l, fixed_now());
        // 75-day-old post lands on the +5 rung even though the record is new.
        assert_eq!(scored.score, 6 + 3 - 12 + 5);
    }

    #[test]
    fn good_lead_requires_intent_location_and_recency() {
        let mut l = lead(10);
        l.intent_match = true;
        l.location_match = true;
        assert!(score_lead(&l, fixed_now()).good_lead);

        let mut stale = lead(70);
        stale.intent_match = true;
        stale.location_match = true;
        assert!(!score_lead(&stale, fixed_now()).good_lead);
    }

    #[test]
    fn keyword_miss_and_keyword_hit_flatten_under_the_cap() {
        let mut hit = lead(3);
        hit.location_match = true;
        hit.keyword_match = Some(true);
        hit.email = "jane@gmail.com".to_string();
        hit.phone = "(617) 555-0101".to_string();

        let mut miss = hit.clone();
        miss.keyword_match = Some(false);

        let hit_score = score_lead(&hit, fixed_now()).score;
        let miss_score = score_lead(&miss, fixed_now()).score;
        assert_eq!(hit_score, 60);
        assert_eq!(miss_score, 60);
    }
}
