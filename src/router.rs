//! Client-side path router for the explorer pages
//!
//! Maps a browser path to one of four pages. Unknown or incomplete paths fall
//! back to the home page; nothing here ever fails.
//!
//! ## Supported Routes
//!
//! - `/` - Home (network stats, latest blocks, latest transactions)
//! - `/address/<addr>` - Address overview and recent transactions
//! - `/tx/<hash>` - Transaction details
//! - `/block/<number>` - Block details
//!
//! Query strings and fragments are ignored, as are empty segments, so
//! `//block//42/?tab=txs` resolves to block 42.
//!
//! ## Example
//!
//! ```rust
//! use pivex::router::{resolve, BlockParam, Route};
//!
//! let state = resolve("/block/123");
//! assert_eq!(state.route, Route::Block { number: BlockParam::Number(123) });
//! ```

use serde::Serialize;

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'?' || b == b'#' {
            return &s[..i];
        }
    }
    s
}

/// The four pages the explorer can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Page {
    Home,
    Address,
    Transaction,
    Block,
}

impl Page {
    /// DOM id of the page container.
    pub fn element_id(self) -> &'static str {
        match self {
            Page::Home => "home-page",
            Page::Address => "address-page",
            Page::Transaction => "transaction-page",
            Page::Block => "block-page",
        }
    }
}

/// Block route parameter.
///
/// A non-numeric segment is kept rather than rejected so the block loader can
/// report "not found" for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum BlockParam {
    Number(u64),
    NotANumber(String),
}

impl BlockParam {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(n) => BlockParam::Number(n),
            Err(_) => BlockParam::NotANumber(raw.to_string()),
        }
    }

    pub fn number(&self) -> Option<u64> {
        match self {
            BlockParam::Number(n) => Some(*n),
            BlockParam::NotANumber(_) => None,
        }
    }
}

impl std::fmt::Display for BlockParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockParam::Number(n) => write!(f, "{n}"),
            BlockParam::NotANumber(raw) => f.write_str(raw),
        }
    }
}

/// Resolved route with its parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Route {
    /// `/`
    Home,
    /// `/address/<addr>`, address taken verbatim
    Address { address: String },
    /// `/tx/<hash>`
    Tx { hash: String },
    /// `/block/<number>`
    Block { number: BlockParam },
}

impl Route {
    pub fn page(&self) -> Page {
        match self {
            Route::Home => Page::Home,
            Route::Address { .. } => Page::Address,
            Route::Tx { .. } => Page::Transaction,
            Route::Block { .. } => Page::Block,
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Address { address } => address_path(address),
            Route::Tx { hash } => tx_path(hash),
            Route::Block { number } => format!("/block/{number}"),
        }
    }
}

/// Result of resolving one navigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteState {
    pub segments: Vec<String>,
    pub route: Route,
}

impl RouteState {
    pub fn home() -> Self {
        RouteState {
            segments: Vec::new(),
            route: Route::Home,
        }
    }

    #[inline]
    pub fn page(&self) -> Page {
        self.route.page()
    }
}

impl Default for RouteState {
    fn default() -> Self {
        Self::home()
    }
}

/// Resolve a browser path into a [`RouteState`].
pub fn resolve(path: &str) -> RouteState {
    let path = strip_query_frag(path.trim());
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let route = match segments.as_slice() {
        [] => Route::Home,
        [page, param, ..] => match page.as_str() {
            "address" => Route::Address {
                address: param.clone(),
            },
            "tx" => Route::Tx {
                hash: param.clone(),
            },
            "block" => Route::Block {
                number: BlockParam::parse(param),
            },
            _ => Route::Home,
        },
        // a lone segment is never a complete route
        [_] => Route::Home,
    };

    RouteState { segments, route }
}

pub fn address_path(address: &str) -> String {
    format!("/address/{address}")
}

pub fn tx_path(hash: &str) -> String {
    format!("/tx/{hash}")
}

pub fn block_path(number: u64) -> String {
    format!("/block/{number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_home() {
        assert_eq!(resolve("/").route, Route::Home);
        assert_eq!(resolve("").route, Route::Home);
        assert_eq!(resolve("/bogus").route, Route::Home);
        assert_eq!(resolve("/bogus/thing").route, Route::Home);
        assert!(resolve("/").segments.is_empty());
    }

    #[test]
    fn test_resolve_incomplete_routes_fall_back_home() {
        assert_eq!(resolve("/address").route, Route::Home);
        assert_eq!(resolve("/tx/").route, Route::Home);
        assert_eq!(resolve("/block").route, Route::Home);
    }

    #[test]
    fn test_resolve_address() {
        let state = resolve("/address/0xAbC0000000000000000000000000000000000001");
        assert_eq!(
            state.route,
            Route::Address {
                address: "0xAbC0000000000000000000000000000000000001".to_string()
            }
        );
        assert_eq!(state.page(), Page::Address);

        // not validated
        let state = resolve("/address/not-an-address");
        assert_eq!(
            state.route,
            Route::Address {
                address: "not-an-address".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_tx() {
        let state = resolve("/tx/0xdeadbeef");
        assert_eq!(
            state.route,
            Route::Tx {
                hash: "0xdeadbeef".to_string()
            }
        );
        assert_eq!(state.segments, vec!["tx", "0xdeadbeef"]);
    }

    #[test]
    fn test_resolve_block() {
        assert_eq!(
            resolve("/block/123").route,
            Route::Block {
                number: BlockParam::Number(123)
            }
        );
        assert_eq!(
            resolve("/block/abc").route,
            Route::Block {
                number: BlockParam::NotANumber("abc".to_string())
            }
        );
        assert_eq!(resolve("/block/abc").page(), Page::Block);
    }

    #[test]
    fn test_resolve_query_fragment_and_slashes() {
        assert_eq!(
            resolve("//block//42/?tab=txs").route,
            Route::Block {
                number: BlockParam::Number(42)
            }
        );
        assert_eq!(
            resolve("/tx/0xabc#logs").route,
            Route::Tx {
                hash: "0xabc".to_string()
            }
        );
    }

    #[test]
    fn test_route_path_round_trip() {
        for path in ["/", "/address/0x01", "/tx/0xff", "/block/7", "/block/abc"] {
            assert_eq!(resolve(path).route.path(), path);
        }
    }

    #[test]
    fn test_page_element_ids() {
        assert_eq!(Page::Home.element_id(), "home-page");
        assert_eq!(Page::Transaction.element_id(), "transaction-page");
    }
}
