//! Chain data loaders.
//!
//! Each loader issues a short burst of RPC calls, strictly one after another,
//! and returns formatted view models. Per-item failures inside a list (a block
//! that would not load, a missing receipt) drop or zero that item; the loader
//! as a whole only fails when its primary lookup fails.

use crate::router::BlockParam;
use crate::rpc_utils::{EthClient, RpcError, RpcTransport, ERC20_NAME_SELECTOR};
use crate::scan::{Scan, ScanPlan};
use crate::types::{Block, Transaction, TxStatus};
use crate::ui_snapshot::{
    AddressOverview, AddressTxRow, BlockDetails, BlockRow, BlockTxRow, ContractInfo,
    NetworkStats, TxDetails, TxRow,
};
use crate::util_text::{
    fee_wei, format_eth, format_gwei, format_thousands, format_timestamp, gas_percent,
    hex_to_string, now_unix, time_ago, GENERIC_TOKEN_LABEL,
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("{0} not found")]
    NotFound(&'static str),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Which block list is being filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockListView {
    /// Home page widget, 10 blocks
    Latest,
    /// "All Blocks" page, 25 blocks
    All,
}

impl BlockListView {
    pub fn plan(self) -> ScanPlan {
        match self {
            BlockListView::Latest => ScanPlan::LATEST_BLOCKS,
            BlockListView::All => ScanPlan::ALL_BLOCKS,
        }
    }
}

/// Which transaction list is being filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxListView {
    /// Home page widget: 10 txs, at most 5 per block, 5 blocks
    Latest,
    /// "All Transactions" page: 25 txs, whole blocks, 10 blocks
    All,
}

impl TxListView {
    pub fn plan(self) -> ScanPlan {
        match self {
            TxListView::Latest => ScanPlan::LATEST_TXS,
            TxListView::All => ScanPlan::ALL_TXS,
        }
    }

    /// Decimals shown in the value column.
    pub fn value_decimals(self) -> u32 {
        4
    }
}

pub struct Explorer<T> {
    client: EthClient<T>,
    clock: Box<dyn Fn() -> i64>,
}

impl<T: RpcTransport> Explorer<T> {
    pub fn new(transport: T) -> Self {
        Explorer {
            client: EthClient::new(transport),
            clock: Box::new(now_unix),
        }
    }

    /// Replace the wall clock used for ages.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn client(&self) -> &EthClient<T> {
        &self.client
    }

    #[inline]
    fn now(&self) -> i64 {
        (self.clock)()
    }

    pub async fn network_stats(&self) -> LoadResult<NetworkStats> {
        let latest_block = self.client.block_number().await?;
        Ok(NetworkStats {
            latest_block,
            estimated_total_txs: latest_block.saturating_mul(2),
        })
    }

    /// Fetch a block with inline transactions, logging and swallowing failures.
    async fn scan_block(&self, number: u64) -> Option<Block> {
        match self.client.block_by_number(number, true).await {
            Ok(Some(block)) => Some(block),
            Ok(None) => {
                log::debug!("block {number} not found, skipping");
                None
            }
            Err(e) => {
                log::warn!("⚠️ Failed to fetch block {number}: {e}");
                None
            }
        }
    }

    pub async fn latest_blocks(&self, head: u64, view: BlockListView) -> Vec<BlockRow> {
        let plan = view.plan();
        let now = self.now();
        let mut acc = Scan::new(plan);
        for number in plan.block_numbers(head) {
            if acc.is_done() {
                break;
            }
            acc.next_block();
            if let Some(block) = self.scan_block(number).await {
                acc.push(BlockRow {
                    number,
                    age: time_ago(block.timestamp, now),
                    tx_count: block.transactions.len(),
                    gas_used: format_thousands(block.gas_used as u128),
                    gas_percent: gas_percent(block.gas_used, block.gas_limit, 1),
                    miner: block.miner,
                });
            }
        }
        acc.into_items()
    }

    pub async fn latest_transactions(&self, head: u64, view: TxListView) -> Vec<TxRow> {
        let plan = view.plan();
        let mut acc = Scan::new(plan);
        for number in plan.block_numbers(head) {
            if acc.is_done() {
                break;
            }
            acc.next_block();
            let Some(block) = self.scan_block(number).await else {
                continue;
            };
            for tx in block.into_full_transactions() {
                let row = TxRow {
                    block_number: number,
                    value_eth: format_eth(tx.value, view.value_decimals()),
                    hash: tx.hash,
                    from: tx.from,
                    to: tx.to,
                };
                if !acc.push(row) {
                    break;
                }
            }
        }
        acc.into_items()
    }

    pub async fn address_overview(&self, address: &str) -> LoadResult<AddressOverview> {
        let balance = self.client.balance(address).await?;
        let tx_count = self.client.transaction_count(address).await?;
        let code = self.client.code(address).await?;
        let is_contract = !code.is_empty() && code != "0x";
        Ok(AddressOverview {
            address: address.to_string(),
            balance_eth: format_eth(balance, 6),
            tx_count: format_thousands(tx_count as u128),
            is_contract,
            code,
        })
    }

    /// Best-effort ERC-20 `name()` probe. Never fails.
    pub async fn contract_info(&self, address: &str, code: &str) -> ContractInfo {
        let name = match self.client.eth_call(address, ERC20_NAME_SELECTOR).await {
            Ok(result) if !result.is_empty() && result != "0x" => Some(
                hex_to_string(&result)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| GENERIC_TOKEN_LABEL.to_string()),
            ),
            Ok(_) => None,
            Err(e) => {
                log::debug!("name() probe on {address} failed: {e}");
                None
            }
        };
        ContractInfo {
            is_token: name.is_some(),
            name,
            code: code.to_string(),
        }
    }

    pub async fn address_transactions(&self, head: u64, address: &str) -> Vec<AddressTxRow> {
        let plan = ScanPlan::ADDRESS_TXS;
        let now = self.now();
        let mut acc = Scan::new(plan);
        for number in plan.block_numbers(head) {
            if acc.is_done() {
                break;
            }
            acc.next_block();
            let Some(block) = self.scan_block(number).await else {
                continue;
            };
            let age = time_ago(block.timestamp, now);
            for tx in block.full_transactions().filter(|tx| tx.involves(address)) {
                if !acc.accepts() {
                    break;
                }
                let gas_used = self.receipt_gas_used(&tx.hash).await;
                acc.push(AddressTxRow {
                    hash: tx.hash.clone(),
                    block_number: number,
                    age: age.clone(),
                    from: tx.from.clone(),
                    to: tx.to.clone(),
                    value_eth: format_eth(tx.value, 6),
                    fee_eth: format_eth(fee_wei(gas_used, tx.gas_price_wei()), 6),
                });
            }
        }
        acc.into_items()
    }

    /// Gas used from the receipt, zero when the receipt is missing or fails.
    async fn receipt_gas_used(&self, hash: &str) -> u64 {
        match self.client.transaction_receipt(hash).await {
            Ok(Some(r)) => r.gas_used,
            Ok(None) => 0,
            Err(e) => {
                log::debug!("receipt {hash} unavailable: {e}");
                0
            }
        }
    }

    pub async fn transaction_details(&self, hash: &str) -> LoadResult<TxDetails> {
        let tx = self.client.transaction_by_hash(hash).await?;
        // a failed receipt lookup reads as pending, same as a missing one
        let receipt = self
            .client
            .transaction_receipt(hash)
            .await
            .unwrap_or_else(|e| {
                log::debug!("receipt {hash} unavailable: {e}");
                None
            });
        let tx = tx.ok_or(LoadError::NotFound("Transaction"))?;

        let timestamp = match tx.block_number {
            Some(n) => match self.client.block_by_number(n, false).await {
                Ok(Some(block)) => Some(block.timestamp),
                _ => None,
            },
            None => None,
        };

        let status = TxStatus::from_receipt(receipt.as_ref());
        let gas_used = receipt.as_ref().map_or(0, |r| r.gas_used);
        let logs = receipt.map(|r| r.logs).unwrap_or_default();
        let gas_price = tx.gas_price_wei();

        Ok(TxDetails {
            status,
            block_number: tx.block_number,
            timestamp: timestamp.map_or_else(|| "-".to_string(), format_timestamp),
            value_eth: format_eth(tx.value, 6),
            fee_eth: format_eth(fee_wei(gas_used, gas_price), 6),
            gas_price_gwei: format_gwei(gas_price, 2),
            gas_used: format_thousands(gas_used as u128),
            gas_limit: format_thousands(tx.gas as u128),
            nonce: tx.nonce,
            input: if tx.input.is_empty() {
                "0x".to_string()
            } else {
                tx.input
            },
            hash: tx.hash,
            from: tx.from,
            to: tx.to,
            logs,
        })
    }

    /// Block header view plus its full transactions for the follow-up table.
    pub async fn block_details(
        &self,
        param: &BlockParam,
    ) -> LoadResult<(BlockDetails, Vec<Transaction>)> {
        let number = param.number().ok_or(LoadError::NotFound("Block"))?;
        let block = self
            .client
            .block_by_number(number, true)
            .await?
            .ok_or(LoadError::NotFound("Block"))?;

        let details = BlockDetails {
            number: block.number,
            timestamp: format_timestamp(block.timestamp),
            tx_count: block.transactions.len(),
            miner: block.miner.clone(),
            gas_used: format!(
                "{} ({}%)",
                format_thousands(block.gas_used as u128),
                gas_percent(block.gas_used, block.gas_limit, 2)
            ),
            gas_limit: format_thousands(block.gas_limit as u128),
            hash: block.hash.clone(),
            parent_hash: block.parent_hash.clone(),
        };
        Ok((details, block.into_full_transactions()))
    }

    /// One receipt lookup per transaction, in block order.
    pub async fn block_transactions(&self, txs: &[Transaction]) -> Vec<BlockTxRow> {
        let mut rows = Vec::with_capacity(txs.len());
        for tx in txs {
            let gas_used = self.receipt_gas_used(&tx.hash).await;
            rows.push(BlockTxRow {
                hash: tx.hash.clone(),
                from: tx.from.clone(),
                to: tx.to.clone(),
                value_eth: format_eth(tx.value, 6),
                gas_used: format_thousands(gas_used as u128),
            });
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_node::{FakeNode, ADDR_A, ADDR_GARBLED_TOKEN, ADDR_TOKEN, NOW, TOKEN_CODE};

    fn explorer(node: FakeNode) -> Explorer<FakeNode> {
        Explorer::new(node).with_clock(|| NOW)
    }

    #[tokio::test]
    async fn test_latest_blocks_descending() {
        let ex = explorer(FakeNode::chain(30, 2));
        let rows = ex.latest_blocks(29, BlockListView::Latest).await;
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].number, 29);
        assert_eq!(rows[9].number, 20);
        assert_eq!(rows[0].tx_count, 2);
        assert_eq!(rows[0].gas_percent, "50.0");
        assert_eq!(rows[0].gas_used, "5,000,000");

        let all = ex.latest_blocks(29, BlockListView::All).await;
        assert_eq!(all.len(), 25);
    }

    #[tokio::test]
    async fn test_latest_blocks_skip_failures() {
        let node = FakeNode::chain(30, 1);
        node.fail_block(27);
        let ex = explorer(node);
        let rows = ex.latest_blocks(29, BlockListView::Latest).await;
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.number != 27));
    }

    #[tokio::test]
    async fn test_latest_transactions_views_differ() {
        let ex = explorer(FakeNode::chain(30, 8));
        let latest = ex.latest_transactions(29, TxListView::Latest).await;
        assert_eq!(latest.len(), 10);
        assert_eq!(latest.iter().filter(|r| r.block_number == 29).count(), 5);

        let all = ex.latest_transactions(29, TxListView::All).await;
        assert_eq!(all.len(), 25);
        assert_eq!(all.iter().filter(|r| r.block_number == 29).count(), 8);
        assert_eq!(all[0].value_eth, "1.0000");
    }

    #[tokio::test]
    async fn test_address_overview_and_contract_probe() {
        let ex = explorer(FakeNode::chain(5, 1));
        let eoa = ex.address_overview(ADDR_A).await.unwrap();
        assert!(!eoa.is_contract);
        assert_eq!(eoa.kind_label(), "EOA");
        assert_eq!(eoa.balance_eth, "2.500000");

        let token = ex.address_overview(ADDR_TOKEN).await.unwrap();
        assert!(token.is_contract);
        let info = ex.contract_info(ADDR_TOKEN, &token.code).await;
        assert_eq!(info.name.as_deref(), Some("Pivex Token"));
        assert!(info.is_token);

        // undecodable name falls back to the generic label
        let info = ex.contract_info(ADDR_GARBLED_TOKEN, TOKEN_CODE).await;
        assert_eq!(info.name.as_deref(), Some(GENERIC_TOKEN_LABEL));
        assert!(info.is_token);

        // a failing probe is tolerated
        let info = ex.contract_info(ADDR_A, "0x6080").await;
        assert_eq!(info.name, None);
        assert!(!info.is_token);
    }

    #[tokio::test]
    async fn test_address_transactions_case_insensitive_with_fee() {
        let ex = explorer(FakeNode::chain(30, 2));
        let rows = ex
            .address_transactions(29, &ADDR_A.to_ascii_uppercase().replace("0X", "0x"))
            .await;
        // ADDR_A sends the first tx of every block
        assert_eq!(rows.len(), 25);
        assert_eq!(rows[0].block_number, 29);
        assert_eq!(rows[0].fee_eth, "0.000420");
        assert_eq!(rows[24].block_number, 5);
    }

    #[tokio::test]
    async fn test_transaction_details() {
        let node = FakeNode::chain(10, 2);
        let hash = node.tx_hash(4, 0);
        let ex = explorer(node);
        let d = ex.transaction_details(&hash).await.unwrap();
        assert_eq!(d.status, TxStatus::Success);
        assert_eq!(d.block_number, Some(4));
        assert_eq!(d.value_eth, "1.000000");
        assert_eq!(d.gas_price_gwei, "20.00");
        assert_eq!(d.gas_used, "21,000");
        assert_eq!(d.logs.len(), 1);

        let missing = ex.transaction_details("0xnope").await;
        assert!(matches!(missing, Err(LoadError::NotFound("Transaction"))));
    }

    #[tokio::test]
    async fn test_block_details_not_found() {
        let ex = explorer(FakeNode::chain(10, 1));
        assert!(matches!(
            ex.block_details(&BlockParam::Number(999)).await,
            Err(LoadError::NotFound("Block"))
        ));
        assert!(matches!(
            ex.block_details(&BlockParam::NotANumber("abc".into())).await,
            Err(LoadError::NotFound("Block"))
        ));

        let (details, txs) = ex.block_details(&BlockParam::Number(3)).await.unwrap();
        assert_eq!(details.number, 3);
        assert_eq!(details.gas_used, "5,000,000 (50.00%)");
        let rows = ex.block_transactions(&txs).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gas_used, "21,000");
    }
}
