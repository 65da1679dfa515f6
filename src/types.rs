use serde::{Deserialize, Serialize};

use crate::util_text::{
    deserialize_hex_u128, deserialize_hex_u64, deserialize_option_hex_u128,
    deserialize_option_hex_u64,
};

/// Block as returned by `eth_getBlockByNumber`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub timestamp: u64,
    #[serde(default)]
    pub miner: String,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub gas_used: u64,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub gas_limit: u64,
    #[serde(default)]
    pub transactions: Vec<BlockTx>,
}

impl Block {
    /// Full transaction objects (empty when the block was fetched with hashes only).
    pub fn full_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter_map(|t| match t {
            BlockTx::Full(tx) => Some(tx),
            BlockTx::Hash(_) | BlockTx::Other(_) => None,
        })
    }

    pub fn into_full_transactions(self) -> Vec<Transaction> {
        self.transactions
            .into_iter()
            .filter_map(|t| match t {
                BlockTx::Full(tx) => Some(tx),
                BlockTx::Hash(_) | BlockTx::Other(_) => None,
            })
            .collect()
    }
}

/// Block transaction entry: full object or bare hash, depending on the
/// `includeTxObjects` flag of the request.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum BlockTx {
    Full(Transaction),
    Hash(String),
    /// An inline object that does not decode as a [`Transaction`]; skipped by the lists
    Other(serde_json::Value),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    /// `None` for contract creation
    #[serde(default)]
    pub to: Option<String>,
    #[serde(deserialize_with = "deserialize_hex_u128")]
    pub value: u128,
    // Some nodes omit gasPrice on typed transactions
    #[serde(default, deserialize_with = "deserialize_option_hex_u128")]
    pub gas_price: Option<u128>,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub gas: u64,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub nonce: u64,
    #[serde(default)]
    pub input: String,
    /// `None` while pending
    #[serde(default, deserialize_with = "deserialize_option_hex_u64")]
    pub block_number: Option<u64>,
}

impl Transaction {
    #[inline]
    pub fn gas_price_wei(&self) -> u128 {
        self.gas_price.unwrap_or(0)
    }

    /// Case-insensitive sender/recipient match.
    pub fn involves(&self, address: &str) -> bool {
        self.from.eq_ignore_ascii_case(address)
            || self
                .to
                .as_deref()
                .is_some_and(|to| to.eq_ignore_ascii_case(address))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub gas_used: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() == Some("0x1")
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Log {
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TxStatus {
    Success,
    Failed,
    Pending,
}

impl TxStatus {
    pub fn from_receipt(receipt: Option<&Receipt>) -> Self {
        match receipt {
            Some(r) if r.succeeded() => TxStatus::Success,
            Some(_) => TxStatus::Failed,
            None => TxStatus::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TxStatus::Success => "Success",
            TxStatus::Failed => "Failed",
            TxStatus::Pending => "Pending",
        }
    }

    /// CSS class for the status badge.
    pub fn badge_class(self) -> String {
        format!("status-badge status-{}", self.label().to_ascii_lowercase())
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
