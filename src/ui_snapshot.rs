//! Display-ready view models produced by the loaders.
//!
//! Every field is already formatted; the markup layer only escapes and places
//! them. Rows serialize to JSON so the native binary can dump them as-is.

use serde::Serialize;

use crate::types::{Log, TxStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub latest_block: u64,
    /// Rough estimate: head × 2
    pub estimated_total_txs: u64,
}

/// One row of a block list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockRow {
    pub number: u64,
    pub age: String,
    pub tx_count: usize,
    pub gas_used: String,
    pub gas_percent: String,
    pub miner: String,
}

/// One row of a transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxRow {
    pub hash: String,
    pub block_number: u64,
    pub from: String,
    /// `None` for contract creation
    pub to: Option<String>,
    pub value_eth: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressOverview {
    pub address: String,
    pub balance_eth: String,
    pub tx_count: String,
    pub is_contract: bool,
    /// Deployed bytecode (`0x` for externally owned accounts)
    pub code: String,
}

impl AddressOverview {
    pub fn kind_label(&self) -> &'static str {
        if self.is_contract {
            "Contract"
        } else {
            "EOA"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractInfo {
    /// Decoded `name()` or the generic token label; `None` when the call failed
    /// or returned nothing
    pub name: Option<String>,
    pub is_token: bool,
    pub code: String,
}

/// One row of the address history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressTxRow {
    pub hash: String,
    pub block_number: u64,
    pub age: String,
    pub from: String,
    pub to: Option<String>,
    pub value_eth: String,
    pub fee_eth: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxDetails {
    pub hash: String,
    pub status: TxStatus,
    pub block_number: Option<u64>,
    pub timestamp: String,
    pub from: String,
    pub to: Option<String>,
    pub value_eth: String,
    pub fee_eth: String,
    pub gas_price_gwei: String,
    pub gas_used: String,
    pub gas_limit: String,
    pub nonce: u64,
    pub input: String,
    pub logs: Vec<Log>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDetails {
    pub number: u64,
    pub timestamp: String,
    pub tx_count: usize,
    pub miner: String,
    /// `"5,000,000 (50.00%)"`
    pub gas_used: String,
    pub gas_limit: String,
    pub hash: String,
    pub parent_hash: String,
}

/// One row of the block transactions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockTxRow {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value_eth: String,
    pub gas_used: String,
}
