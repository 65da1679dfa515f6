//! Search box classification.

use crate::router::{address_path, block_path, tx_path};

/// Length of a `0x`-prefixed 32-byte transaction hash.
pub const TX_HASH_LEN: usize = 66;
/// Length of a `0x`-prefixed 20-byte address.
pub const ADDRESS_LEN: usize = 42;

pub const INVALID_QUERY_MESSAGE: &str =
    "Invalid search query. Please enter a valid address, transaction hash, or block number.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchTarget {
    Transaction(String),
    Address(String),
    Block(u64),
    Invalid,
}

impl SearchTarget {
    /// Path to navigate to, `None` for invalid input.
    pub fn route_path(&self) -> Option<String> {
        match self {
            SearchTarget::Transaction(hash) => Some(tx_path(hash)),
            SearchTarget::Address(addr) => Some(address_path(addr)),
            SearchTarget::Block(n) => Some(block_path(*n)),
            SearchTarget::Invalid => None,
        }
    }
}

/// Classify a search query. Rules apply in order: tx hash, address, block number.
pub fn classify(query: &str) -> SearchTarget {
    let len = query.chars().count();
    if query.starts_with("0x") && len == TX_HASH_LEN {
        SearchTarget::Transaction(query.to_string())
    } else if query.starts_with("0x") && len == ADDRESS_LEN {
        SearchTarget::Address(query.to_string())
    } else if !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()) {
        match query.parse::<u64>() {
            Ok(n) => SearchTarget::Block(n),
            Err(_) => SearchTarget::Invalid,
        }
    } else {
        SearchTarget::Invalid
    }
}
