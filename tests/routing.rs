//! Router and search classifier through the public API.

use pivex::router::{block_path, BlockParam};
use pivex::search::INVALID_QUERY_MESSAGE;
use pivex::{classify, resolve, Page, Route, SearchTarget};

#[test]
fn unknown_and_partial_paths_fall_back_home() {
    for path in ["/", "", "/address", "/foo/bar", "/tx/", "/?q=1", "#/block/1"] {
        assert_eq!(resolve(path).page(), Page::Home, "{path}");
    }
}

#[test]
fn block_routes() {
    assert_eq!(
        resolve("/block/123").route,
        Route::Block {
            number: BlockParam::Number(123)
        }
    );
    // parsed strictly, the page reports not found instead of guessing
    let route = resolve("/block/12abc").route;
    assert_eq!(route.page(), Page::Block);
    assert_eq!(
        route,
        Route::Block {
            number: BlockParam::NotANumber("12abc".into())
        }
    );
}

#[test]
fn query_and_fragment_are_ignored() {
    let addr = format!("0x{}", "1".repeat(40));
    let state = resolve(&format!("/address/{addr}?tab=tokens#top"));
    assert_eq!(state.route, Route::Address { address: addr });
    assert_eq!(state.segments.len(), 2);
}

#[test]
fn search_targets_route_back_to_their_page() {
    let tx = format!("0x{}", "f".repeat(64));
    let addr = format!("0x{}", "e".repeat(40));
    let cases = [
        (tx.as_str(), Page::Transaction),
        (addr.as_str(), Page::Address),
        ("0", Page::Block),
        ("18446744073709551615", Page::Block),
    ];
    for (query, page) in cases {
        let path = classify(query).route_path().expect(query);
        assert_eq!(resolve(&path).page(), page, "{query}");
    }
    assert_eq!(classify("42").route_path(), Some(block_path(42)));
}

#[test]
fn search_rejects_everything_else() {
    for query in ["", "hello", "0x123", "-1", "1.5", "18446744073709551616", "0x"] {
        assert_eq!(classify(query), SearchTarget::Invalid, "{query}");
    }
    assert!(INVALID_QUERY_MESSAGE.starts_with("Invalid search query"));
}
