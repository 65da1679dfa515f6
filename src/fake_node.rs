//! In-memory JSON-RPC node for tests.
//!
//! Serves a synthetic chain: block `n` has `txs_per_block` transactions, the
//! first sent by [`ADDR_A`] to [`ADDR_B`], the rest from [`ADDR_B`] to
//! [`ADDR_C`]. Every call yields to the executor once before answering so
//! concurrently awaited loaders interleave the way they would over a network.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::rpc_utils::{RpcError, RpcResult, RpcTransport};
use crate::util_text::{parse_hex_u64, to_hex_quantity};

pub const NOW: i64 = 1_700_000_000;
pub const ADDR_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const ADDR_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const ADDR_C: &str = "0xcccccccccccccccccccccccccccccccccccccccc";
pub const ADDR_TOKEN: &str = "0x7070707070707070707070707070707070707070";
pub const ADDR_MINER: &str = "0x0000000000000000000000000000000000000001";
pub const TOKEN_CODE: &str = "0x6080604052";
/// Contract whose `name()` returns an offset word of `u64::MAX`
pub const ADDR_GARBLED_TOKEN: &str = "0x7171717171717171717171717171717171717171";

/// ABI-encoded `"Pivex Token"`
const TOKEN_NAME_RESULT: &str = concat!(
    "0x",
    "0000000000000000000000000000000000000000000000000000000000000020",
    "000000000000000000000000000000000000000000000000000000000000000b",
    "506976657820546f6b656e000000000000000000000000000000000000000000"
);

pub struct FakeNode {
    blocks: u64,
    txs_per_block: usize,
    heads: RefCell<VecDeque<u64>>,
    failing_blocks: RefCell<HashSet<u64>>,
    calls: Cell<usize>,
}

impl FakeNode {
    /// Chain of blocks `0..blocks`, head at `blocks - 1`.
    pub fn chain(blocks: u64, txs_per_block: usize) -> Self {
        FakeNode {
            blocks,
            txs_per_block,
            heads: RefCell::new(VecDeque::new()),
            failing_blocks: RefCell::new(HashSet::new()),
            calls: Cell::new(0),
        }
    }

    /// Heads reported by successive `eth_blockNumber` calls; afterwards the
    /// real head is reported.
    pub fn with_heads(self, heads: impl IntoIterator<Item = u64>) -> Self {
        self.heads.borrow_mut().extend(heads);
        self
    }

    /// Make `eth_getBlockByNumber` fail for `number`.
    pub fn fail_block(&self, number: u64) {
        self.failing_blocks.borrow_mut().insert(number);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn head(&self) -> u64 {
        self.blocks.saturating_sub(1)
    }

    pub fn tx_hash(&self, block: u64, index: usize) -> String {
        format!("0x{block:062x}{index:02x}")
    }

    fn timestamp(&self, block: u64) -> u64 {
        (NOW as u64).saturating_sub((self.head().saturating_sub(block)) * 12)
    }

    fn tx(&self, block: u64, index: usize) -> Value {
        let (from, to) = if index == 0 {
            (ADDR_A, ADDR_B)
        } else {
            (ADDR_B, ADDR_C)
        };
        json!({
            "hash": self.tx_hash(block, index),
            "from": from,
            "to": to,
            "value": "0xde0b6b3a7640000",
            "gasPrice": "0x4a817c800",
            "gas": "0x5208",
            "nonce": to_hex_quantity(block),
            "input": "0x",
            "blockNumber": to_hex_quantity(block),
        })
    }

    fn block(&self, number: u64, full: bool) -> Value {
        if number >= self.blocks {
            return Value::Null;
        }
        let txs: Vec<Value> = (0..self.txs_per_block)
            .map(|i| {
                if full {
                    self.tx(number, i)
                } else {
                    json!(self.tx_hash(number, i))
                }
            })
            .collect();
        json!({
            "number": to_hex_quantity(number),
            "hash": format!("0x{number:064x}"),
            "parentHash": format!("0x{:064x}", number.saturating_sub(1)),
            "timestamp": to_hex_quantity(self.timestamp(number)),
            "miner": ADDR_MINER,
            "gasUsed": "0x4c4b40",
            "gasLimit": "0x989680",
            "transactions": txs,
        })
    }

    /// Find `(block, index)` for a hash produced by [`FakeNode::tx_hash`].
    fn locate(&self, hash: &str) -> Option<(u64, usize)> {
        let digits = hash.strip_prefix("0x")?;
        if digits.len() != 64 {
            return None;
        }
        let block = u64::from_str_radix(&digits[..62], 16).ok()?;
        let index = usize::from_str_radix(&digits[62..], 16).ok()?;
        (block < self.blocks && index < self.txs_per_block).then_some((block, index))
    }

    fn answer(&self, method: &str, params: &[Value]) -> RpcResult<Value> {
        let str_param = |i: usize| params.get(i).and_then(|v| v.as_str()).unwrap_or_default();
        match method {
            "eth_blockNumber" => {
                let head = self.heads.borrow_mut().pop_front().unwrap_or(self.head());
                Ok(json!(to_hex_quantity(head)))
            }
            "eth_getBlockByNumber" => {
                let number = parse_hex_u64(str_param(0))
                    .ok_or_else(|| RpcError::Rpc {
                        code: -32602,
                        message: "invalid block number".into(),
                    })?;
                if self.failing_blocks.borrow().contains(&number) {
                    return Err(RpcError::Transport("connection reset".into()));
                }
                let full = params.get(1).and_then(|v| v.as_bool()).unwrap_or(false);
                Ok(self.block(number, full))
            }
            "eth_getBalance" => Ok(json!(if str_param(0).eq_ignore_ascii_case(ADDR_A) {
                "0x22b1c8c1227a0000" // 2.5 ETH
            } else {
                "0x0"
            })),
            "eth_getTransactionCount" => Ok(json!("0x2a")),
            "eth_getCode" => Ok(json!(if str_param(0).eq_ignore_ascii_case(ADDR_TOKEN) {
                TOKEN_CODE
            } else {
                "0x"
            })),
            "eth_call" => {
                let to = params
                    .first()
                    .and_then(|v| v.get("to"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                if to.eq_ignore_ascii_case(ADDR_TOKEN) {
                    Ok(json!(TOKEN_NAME_RESULT))
                } else if to.eq_ignore_ascii_case(ADDR_GARBLED_TOKEN) {
                    Ok(json!(format!("0x{}{}", "0".repeat(48), "f".repeat(16))))
                } else {
                    Err(RpcError::Rpc {
                        code: 3,
                        message: "execution reverted".into(),
                    })
                }
            }
            "eth_getTransactionByHash" => Ok(match self.locate(str_param(0)) {
                Some((block, index)) => self.tx(block, index),
                None => Value::Null,
            }),
            "eth_getTransactionReceipt" => Ok(match self.locate(str_param(0)) {
                Some((block, index)) => json!({
                    "gasUsed": "0x5208",
                    "status": "0x1",
                    "logs": [{
                        "address": ADDR_TOKEN,
                        "topics": [format!("0x{:064x}", block), format!("0x{:064x}", index)],
                        "data": "0x",
                    }],
                }),
                None => Value::Null,
            }),
            other => Err(RpcError::Rpc {
                code: -32601,
                message: format!("the method {other} does not exist"),
            }),
        }
    }
}

#[async_trait(?Send)]
impl RpcTransport for FakeNode {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        self.calls.set(self.calls.get() + 1);
        tokio::task::yield_now().await;
        self.answer(method, &params)
    }
}
