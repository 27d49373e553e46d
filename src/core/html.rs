//! Helpers over workshop page HTML.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("anchor selector"))
}

fn sharedfile_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(r#"[id^="sharedfile_"]"#).expect("sharedfile selector"))
}

fn digits() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new("[0-9]+").expect("digit regex"))
}

/// `href` targets of every anchor, in document order.
pub fn anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(anchor_selector())
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

pub fn count_links_containing(html: &str, pattern: &str) -> usize {
    anchor_hrefs(html).iter().filter(|href| href.contains(pattern)).count()
}

pub fn first_link_containing(html: &str, pattern: &str) -> Option<String> {
    anchor_hrefs(html).into_iter().find(|href| href.contains(pattern))
}

pub fn first_digit_run(text: &str) -> Option<&str> {
    digits().find(text).map(|m| m.as_str())
}

/// Workshop ID of an item link: the numeric `id` query parameter, or the first digit run
/// of the link when there is none.
pub fn workshop_id_from_url(link: &str) -> Option<String> {
    let from_query = Url::parse(link).ok().and_then(|u| {
        u.query_pairs()
            .find(|(k, v)| k == "id" && !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
            .map(|(_, v)| v.into_owned())
    });
    from_query.or_else(|| first_digit_run(link).map(str::to_string))
}

/// IDs of the items listed on a collection page, first occurrence only.
pub fn collection_children(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut ids: Vec<String> = Vec::new();
    for el in document.select(sharedfile_selector()) {
        let Some(id) = el.value().id().and_then(|id| id.strip_prefix("sharedfile_")) else {
            continue;
        };
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
