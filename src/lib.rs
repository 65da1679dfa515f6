//! Pivex - lightweight EVM block explorer
//!
//! Reads everything it shows straight from an Ethereum-compatible JSON-RPC
//! node: network stats, recent blocks and transactions, address overviews,
//! transaction and block details. Pages are selected by a path router and
//! rendered into named display regions.
//!
//! ## Architecture
//!
//! The same core drives two front ends:
//! - **Native** (`pivex`): renders one route or search into text, optionally
//!   refreshing the home page on a timer
//! - **Web** (`pivex-web-dom`): wasm32 binary writing into the page DOM and
//!   driving the History API
//!
//! ## Usage
//!
//! For native builds:
//! ```bash
//! cargo run -- /block/1234
//! ```
//!
//! For web builds:
//! ```bash
//! cargo build --target wasm32-unknown-unknown --no-default-features --features dom-web --bin pivex-web-dom
//! ```

// Core modules (available on all platforms)
pub mod config;
pub mod router;
pub mod search;
pub mod types;
pub mod util_text;

// JSON-RPC transport and typed eth_* client
pub mod rpc_utils;

// Loaders and view models
pub mod explorer;
pub mod scan;
pub mod ui_snapshot;

// Rendering
pub mod html;
pub mod render;

pub mod app;
pub mod refresh;
pub mod verify;

// Browser glue (wasm32 only)
pub mod platform;

#[cfg(test)]
mod fake_node;

pub use app::{App, AppState, History, ListView, MemoryHistory, SearchOutcome};
pub use config::Config;
pub use explorer::{Explorer, LoadError};
pub use render::{MemoryTarget, RenderTarget};
pub use router::{resolve, Page, Route, RouteState};
pub use rpc_utils::{EthClient, HttpTransport, RpcError, RpcTransport};
pub use search::{classify, SearchTarget};
