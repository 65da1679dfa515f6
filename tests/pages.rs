//! Page behaviour through the public API against a scripted node.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use pivex::render::ids;
use pivex::rpc_utils::RpcResult;
use pivex::search::INVALID_QUERY_MESSAGE;
use pivex::{App, Explorer, MemoryHistory, MemoryTarget, RpcError, RpcTransport, SearchOutcome};

/// Answers by method name; anything unscripted fails like a dead endpoint.
#[derive(Default)]
struct ScriptedNode {
    answers: HashMap<&'static str, Value>,
    seen: RefCell<Vec<String>>,
}

impl ScriptedNode {
    fn answer(mut self, method: &'static str, value: Value) -> Self {
        self.answers.insert(method, value);
        self
    }
}

#[async_trait(?Send)]
impl RpcTransport for ScriptedNode {
    async fn call(&self, method: &str, _params: Vec<Value>) -> RpcResult<Value> {
        self.seen.borrow_mut().push(method.to_string());
        self.answers
            .get(method)
            .cloned()
            .ok_or_else(|| RpcError::Transport("connection refused".into()))
    }
}

fn app(node: ScriptedNode, path: &str) -> App<ScriptedNode, MemoryTarget, MemoryHistory> {
    App::new(
        Explorer::new(node).with_clock(|| 1_700_000_000),
        MemoryTarget::new(),
        MemoryHistory::new(path),
    )
}

#[tokio::test]
async fn dead_endpoint_fills_home_with_error_placeholders() {
    let app = app(ScriptedNode::default(), "/");
    app.start().await;
    let t = app.target();
    assert_eq!(t.active_page().as_deref(), Some("home-page"));
    assert!(t.html(ids::LATEST_BLOCKS_TABLE).unwrap().contains("Error loading blocks"));
    assert!(t
        .html(ids::LATEST_TXS_TABLE)
        .unwrap()
        .contains("Error loading transactions"));
    assert_eq!(app.state().latest_block_number, 0);
}

#[tokio::test]
async fn null_block_is_not_found() {
    let node = ScriptedNode::default()
        .answer("eth_blockNumber", json!("0x10"))
        .answer("eth_getBlockByNumber", Value::Null);
    let app = app(node, "/block/99999");
    app.start().await;
    assert_eq!(
        app.target().text(ids::BLOCK_TIMESTAMP).as_deref(),
        Some("Block not found")
    );
}

#[tokio::test]
async fn failing_block_lookup_is_reported_as_error() {
    let app = app(ScriptedNode::default(), "/block/5");
    app.start().await;
    assert_eq!(
        app.target().text(ids::BLOCK_TIMESTAMP).as_deref(),
        Some("Error loading block")
    );
}

#[tokio::test]
async fn empty_blocks_show_no_data_rows() {
    let block = json!({
        "number": "0x3",
        "hash": format!("0x{}", "3".repeat(64)),
        "parentHash": format!("0x{}", "2".repeat(64)),
        "timestamp": "0x6553f100",
        "miner": format!("0x{}", "0".repeat(40)),
        "gasUsed": "0x0",
        "gasLimit": "0x0",
        "transactions": [],
    });
    let node = ScriptedNode::default()
        .answer("eth_blockNumber", json!("0x3"))
        .answer("eth_getBlockByNumber", block);
    let app = app(node, "/");
    app.start().await;
    let t = app.target();
    assert_eq!(t.text(ids::LATEST_BLOCK).as_deref(), Some("3"));
    // zero gas limit renders 0.0 rather than NaN
    assert!(t.html(ids::LATEST_BLOCKS_TABLE).unwrap().contains("0 (0.0%)"));
    assert!(t
        .html(ids::LATEST_TXS_TABLE)
        .unwrap()
        .contains("No transactions found"));

    app.navigate("/block/3").await;
    assert!(app
        .target()
        .html(ids::BLOCK_TXS_TABLE)
        .unwrap()
        .contains("No transactions in this block"));
}

#[tokio::test]
async fn invalid_search_alerts_without_rpc() {
    let app = app(ScriptedNode::default(), "/block/1");
    assert_eq!(app.search("not a thing").await, SearchOutcome::Rejected);
    assert_eq!(app.target().alerts(), vec![INVALID_QUERY_MESSAGE.to_string()]);
    assert!(app.explorer().client().transport().seen.borrow().is_empty());
}

#[tokio::test]
async fn malformed_inline_tx_only_drops_its_own_row() {
    let good = format!("0x{}", "a".repeat(64));
    let bad = format!("0x{}", "b".repeat(64));
    let block = json!({
        "number": "0x0",
        "hash": format!("0x{}", "0".repeat(64)),
        "parentHash": format!("0x{}", "0".repeat(64)),
        "timestamp": "0x6553f100",
        "miner": format!("0x{}", "1".repeat(40)),
        "gasUsed": "0x5208",
        "gasLimit": "0x989680",
        "transactions": [
            // chain-specific type without a nonce
            {"hash": bad.clone(), "from": format!("0x{}", "c".repeat(40)), "value": "0x0", "gas": "0x5208"},
            {
                "hash": good.clone(),
                "from": format!("0x{}", "d".repeat(40)),
                "to": format!("0x{}", "e".repeat(40)),
                "value": "0xde0b6b3a7640000",
                "gasPrice": "0x4a817c800",
                "gas": "0x5208",
                "nonce": "0x7",
                "input": "0x",
                "blockNumber": "0x0"
            }
        ],
    });
    let node = ScriptedNode::default()
        .answer("eth_blockNumber", json!("0x0"))
        .answer("eth_getBlockByNumber", block);
    let app = app(node, "/");
    app.start().await;
    let t = app.target();
    let blocks = t.html(ids::LATEST_BLOCKS_TABLE).unwrap();
    assert_eq!(blocks.matches("<tr>").count(), 1);
    let txs = t.html(ids::LATEST_TXS_TABLE).unwrap();
    assert_eq!(txs.matches("<tr>").count(), 1);
    assert!(txs.contains(&format!("/tx/{good}")));
    assert!(!txs.contains(&format!("/tx/{bad}")));

    app.navigate("/block/0").await;
    let t = app.target();
    assert_eq!(t.text(ids::BLOCK_TX_COUNT).as_deref(), Some("2"));
    let rows = t.html(ids::BLOCK_TXS_TABLE).unwrap();
    assert_eq!(rows.matches("<tr>").count(), 1);
    assert!(rows.contains(&format!("/tx/{good}")));
}
