use url::form_urlencoded;

use crate::intent::SearchIntent;

pub const SEARCH_ENDPOINT: &str = "https://www.google.com/search";

/// Query clauses in their fixed order: main query, exact phrases, site,
/// file type, exclusions, date.
pub fn query_clauses(intent: &SearchIntent) -> Vec<String> {
    let mut clauses = Vec::new();

    if !intent.main_query.is_empty() {
        clauses.push(intent.main_query.clone());
    }

    clauses.extend(
        intent
            .exact_phrases
            .iter()
            .filter(|phrase| !phrase.is_empty())
            .map(|phrase| format!("\"{phrase}\"")),
    );

    if !intent.site_filter.is_empty() {
        clauses.push(format!("site:{}", intent.site_filter));
    }

    if !intent.file_type.is_empty() {
        clauses.push(format!("filetype:{}", intent.file_type));
    }

    clauses.extend(
        intent
            .exclude_words
            .iter()
            .filter(|word| !word.is_empty())
            .map(|word| format!("-{word}")),
    );

    if !intent.date_range.is_empty() {
        clauses.push(format!("after:{}", intent.date_range));
    }

    clauses
}

pub fn query_string(intent: &SearchIntent) -> String {
    query_clauses(intent).join(" ")
}

/// Render the search URL for `intent`. Never fails; an empty intent gives an
/// empty `q`.
pub fn build(intent: &SearchIntent) -> String {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", &query_string(intent))
        .finish();
    format!("{SEARCH_ENDPOINT}?{encoded}")
}

#[test]
fn test_build_encodes_operators() {
    let intent = SearchIntent {
        main_query: "machine learning".into(),
        exact_phrases: vec!["research papers".into()],
        site_filter: "arxiv.org".into(),
        file_type: "pdf".into(),
        exclude_words: vec!["blog".into()],
        date_range: "2024".into(),
    };
    assert_eq!(
        build(&intent),
        "https://www.google.com/search?q=machine+learning+%22research+papers%22+site%3Aarxiv.org+filetype%3Apdf+-blog+after%3A2024"
    );
}

#[test]
fn test_build_empty_intent() {
    assert_eq!(
        build(&SearchIntent::default()),
        "https://www.google.com/search?q="
    );
}

#[test]
fn test_clauses_skip_empty_entries() {
    let intent = SearchIntent {
        exact_phrases: vec!["".into(), "a b".into(), "".into()],
        exclude_words: vec!["".into()],
        ..Default::default()
    };
    assert_eq!(query_clauses(&intent), vec!["\"a b\""]);
}
