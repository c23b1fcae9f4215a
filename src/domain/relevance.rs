use super::search_result::SearchResult;

/// True when the result text contains any template keyword. An empty
/// keyword list admits everything.
pub fn keyword_match(result: &SearchResult, keywords: &[&str]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let text = result.combined_text();
    keywords.iter().any(|kw| text.contains(&kw.to_lowercase()))
}

/// Substring containment for intent phrases. Deliberately looser than
/// location matching: phrases are multi-word, so no word boundaries.
pub fn intent_match(text: &str, phrases: &[&str]) -> bool {
    let text = text.to_lowercase();
    phrases.iter().any(|phrase| text.contains(&phrase.to_lowercase()))
}

/// Strict-mode filter: keep a result iff it matches a keyword or an
/// intent phrase. Callers must not feed place-sourced results through
/// this; those carry no title/snippet text to match against.
pub fn strict_filter(
    results: Vec<SearchResult>,
    keywords: &[&str],
    intent_phrases: &[&str],
) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|result| {
            keyword_match(result, keywords)
                || intent_match(&result.combined_text(), intent_phrases)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, snippet: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            snippet: snippet.to_string(),
            link: "https://example.com".to_string(),
            display_link: "example.com".to_string(),
        }
    }

    #[test]
    fn empty_keyword_list_is_vacuously_true() {
        assert!(keyword_match(&result("anything", "at all"), &[]));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let r = result("Top REALTOR in town", "");
        assert!(keyword_match(&r, &["realtor"]));
        assert!(!keyword_match(&r, &["contractor"]));
    }

    #[test]
    fn intent_match_needs_no_word_boundary() {
        assert!(intent_match(
            "hi all, Looking for a Realtor recommendation",
            &["looking for a realtor"]
        ));
        assert!(!intent_match("just sold my house", &["looking for a realtor"]));
    }

    #[test]
    fn strict_filter_keeps_keyword_or_intent_hits() {
        let keep_keyword = result("best realtor in boston", "");
        let keep_intent = result("", "we are looking for a realtor asap");
        let drop_me = result("cat pictures", "nothing relevant here");

        let kept = strict_filter(
            vec![keep_keyword, keep_intent, drop_me],
            &["realtor"],
            &["looking for a realtor"],
        );

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.snippet != "nothing relevant here"));
    }
}
