use httptest::{all_of, matchers::*, responders::*, Expectation, Server};

use scmd_list_manager::core::html;
use scmd_list_manager::{analyze_link, classify_link, classify_links, HttpFetcher, LinkKind, PageError, PageFetcher, Settings};

const ITEM_HTML: &str = r#"<html><body>
    <a href="https://steamcommunity.com/app/4000/workshop/">Garry's Mod Workshop</a>
</body></html>"#;

fn settings() -> Settings {
    Settings { user_agent: "scmd-test/1.0".to_string(), ..Settings::default() }
}

#[test]
fn fetches_page_body_with_user_agent() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/sharedfiles/filedetails/"),
            request::headers(contains(("user-agent", "scmd-test/1.0"))),
        ])
        .respond_with(status_code(200).body(ITEM_HTML)),
    );

    let fetcher = HttpFetcher::new(&settings());
    let body = fetcher.fetch(&server.url_str("/sharedfiles/filedetails/")).unwrap();
    assert_eq!(html::first_link_containing(&body, "/app/").as_deref(), Some("https://steamcommunity.com/app/4000/workshop/"));
}

#[test]
fn error_status_pages_are_still_classified() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/missing"))
            .times(2)
            .respond_with(status_code(404).body(ITEM_HTML)),
    );

    let fetcher = HttpFetcher::new(&settings());
    let url = server.url_str("/missing");
    assert!(fetcher.fetch(&url).unwrap().contains("/app/4000/"));

    let classification = classify_links(&fetcher, &[url.clone()]);
    assert_eq!(classification.items, vec![url]);
    assert_eq!((classification.success, classification.errors), (1, 0));
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let fetcher = HttpFetcher::new(&settings());
    match fetcher.fetch("http://127.0.0.1:1/closed") {
        Err(PageError::Transport { url, .. }) => assert_eq!(url, "http://127.0.0.1:1/closed"),
        other => panic!("expected transport error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn classifies_and_analyzes_over_http() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/sharedfiles/filedetails/"))
            .times(2)
            .respond_with(status_code(200).body(ITEM_HTML)),
    );

    let fetcher = HttpFetcher::new(&settings());
    let url = format!("{}?id=2817251111", server.url_str("/sharedfiles/filedetails/"));
    assert_eq!(classify_link(&fetcher, &url).unwrap(), LinkKind::Item);

    let pair = analyze_link(&fetcher, &url).unwrap();
    assert_eq!(pair.game_id, "4000");
    assert_eq!(pair.workshop_id, "2817251111");
}
