//! Where page content goes.
//!
//! The explorer writes into named display regions (DOM element ids in the
//! browser). A region that does not exist is silently skipped, so results that
//! arrive after the user navigated away cannot fail.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::router::Page;

/// Element ids used by the explorer pages.
pub mod ids {
    // home
    pub const LATEST_BLOCK: &str = "latestBlock";
    pub const TOTAL_TXS: &str = "totalTxs";
    pub const LATEST_BLOCKS_TABLE: &str = "latestBlocksTable";
    pub const LATEST_TXS_TABLE: &str = "latestTxsTable";

    // address
    pub const ADDRESS_VALUE: &str = "addressValue";
    pub const ADDRESS_BALANCE: &str = "addressBalance";
    pub const ADDRESS_TX_COUNT: &str = "addressTxCount";
    pub const ADDRESS_TYPE: &str = "addressType";
    pub const ADDRESS_TXS_TABLE: &str = "addressTxsTable";
    pub const CONTRACT_TAB: &str = "contractTab";
    pub const TOKENS_TAB: &str = "tokensTab";
    pub const CONTRACT_NAME: &str = "contractName";
    pub const CONTRACT_COMPILER: &str = "contractCompiler";
    pub const CONTRACT_OPTIMIZATION: &str = "contractOptimization";
    pub const CONTRACT_CODE: &str = "contractCode";
    pub const VERIFY_MODAL: &str = "verifyModal";

    // transaction
    pub const TX_HASH: &str = "txHash";
    pub const TX_STATUS_TEXT: &str = "txStatusText";
    pub const STATUS_BADGE: &str = "statusBadge";
    pub const TX_BLOCK: &str = "txBlock";
    pub const TX_TIMESTAMP: &str = "txTimestamp";
    pub const TX_FROM: &str = "txFrom";
    pub const TX_TO: &str = "txTo";
    pub const TX_VALUE: &str = "txValue";
    pub const TX_FEE: &str = "txFee";
    pub const TX_GAS_PRICE: &str = "txGasPrice";
    pub const TX_GAS_USED: &str = "txGasUsed";
    pub const TX_GAS_LIMIT: &str = "txGasLimit";
    pub const TX_NONCE: &str = "txNonce";
    pub const TX_INPUT_DATA: &str = "txInputData";
    pub const LOGS_TAB: &str = "logsTab";
    pub const TX_LOGS: &str = "txLogs";

    // block
    pub const BLOCK_NUMBER: &str = "blockNumber";
    pub const BLOCK_HEIGHT: &str = "blockHeight";
    pub const BLOCK_TIMESTAMP: &str = "blockTimestamp";
    pub const BLOCK_TX_COUNT: &str = "blockTxCount";
    pub const BLOCK_MINER: &str = "blockMiner";
    pub const BLOCK_GAS_USED: &str = "blockGasUsed";
    pub const BLOCK_GAS_LIMIT: &str = "blockGasLimit";
    pub const BLOCK_HASH: &str = "blockHash";
    pub const BLOCK_PARENT_HASH: &str = "blockParentHash";
    pub const BLOCK_TXS_TABLE: &str = "blockTxsTable";

    // list pages
    pub const BLOCKS_LIST_PAGE: &str = "blocks-list-page";
    pub const TXS_LIST_PAGE: &str = "txs-list-page";
    pub const CONTRACTS_LIST_PAGE: &str = "contracts-list-page";
    pub const TOKENS_LIST_PAGE: &str = "tokens-list-page";
    pub const ALL_BLOCKS_TABLE: &str = "allBlocksTable";
    pub const ALL_TXS_TABLE: &str = "allTxsTable";
    pub const CONTRACTS_TABLE: &str = "contractsTable";
    pub const TOKENS_TABLE: &str = "tokensTable";

    /// Every content region, in page order.
    pub const ALL: &[&str] = &[
        LATEST_BLOCK,
        TOTAL_TXS,
        LATEST_BLOCKS_TABLE,
        LATEST_TXS_TABLE,
        ADDRESS_VALUE,
        ADDRESS_BALANCE,
        ADDRESS_TX_COUNT,
        ADDRESS_TYPE,
        ADDRESS_TXS_TABLE,
        CONTRACT_TAB,
        TOKENS_TAB,
        CONTRACT_NAME,
        CONTRACT_COMPILER,
        CONTRACT_OPTIMIZATION,
        CONTRACT_CODE,
        VERIFY_MODAL,
        TX_HASH,
        TX_STATUS_TEXT,
        STATUS_BADGE,
        TX_BLOCK,
        TX_TIMESTAMP,
        TX_FROM,
        TX_TO,
        TX_VALUE,
        TX_FEE,
        TX_GAS_PRICE,
        TX_GAS_USED,
        TX_GAS_LIMIT,
        TX_NONCE,
        TX_INPUT_DATA,
        LOGS_TAB,
        TX_LOGS,
        BLOCK_NUMBER,
        BLOCK_HEIGHT,
        BLOCK_TIMESTAMP,
        BLOCK_TX_COUNT,
        BLOCK_MINER,
        BLOCK_GAS_USED,
        BLOCK_GAS_LIMIT,
        BLOCK_HASH,
        BLOCK_PARENT_HASH,
        BLOCK_TXS_TABLE,
        ALL_BLOCKS_TABLE,
        ALL_TXS_TABLE,
        CONTRACTS_TABLE,
        TOKENS_TABLE,
    ];

    /// Regions shown on each page, for text dumps.
    pub fn for_page(page_id: &str) -> &'static [&'static str] {
        match page_id {
            "home-page" => &ALL[0..4],
            "address-page" => &ALL[4..16],
            "transaction-page" => &ALL[16..32],
            "block-page" => &ALL[32..42],
            BLOCKS_LIST_PAGE => &[ALL_BLOCKS_TABLE],
            TXS_LIST_PAGE => &[ALL_TXS_TABLE],
            CONTRACTS_LIST_PAGE => &[CONTRACTS_TABLE],
            TOKENS_LIST_PAGE => &[TOKENS_TABLE],
            _ => &[],
        }
    }
}

/// Display surface the pages write into.
pub trait RenderTarget {
    fn set_text(&self, id: &str, text: &str);
    fn set_html(&self, id: &str, html: &str);
    fn set_visible(&self, id: &str, visible: bool);
    fn set_class(&self, id: &str, class: &str);
    /// Deactivate every page container and activate `page_id`.
    fn show_page(&self, page_id: &str);
    /// Blocking user notification.
    fn alert(&self, message: &str);

    fn show(&self, page: Page) {
        self.show_page(page.element_id());
    }
}

/// Content of one region in a [`MemoryTarget`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    pub text: Option<String>,
    pub html: Option<String>,
    pub visible: Option<bool>,
    pub class: Option<String>,
}

impl Region {
    /// Whatever was written last, as text or markup.
    pub fn content(&self) -> Option<&str> {
        self.html.as_deref().or(self.text.as_deref())
    }
}

/// In-memory render target used by the native binary and tests.
///
/// Only registered regions accept writes; everything else is dropped, like a
/// missing DOM element.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    regions: RefCell<BTreeMap<String, Region>>,
    active_page: RefCell<Option<String>>,
    alerts: RefCell<Vec<String>>,
}

impl MemoryTarget {
    /// Target with every explorer region registered.
    pub fn new() -> Self {
        Self::with_regions(ids::ALL.iter().copied())
    }

    pub fn with_regions<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let regions = ids
            .into_iter()
            .map(|id| (id.to_string(), Region::default()))
            .collect();
        MemoryTarget {
            regions: RefCell::new(regions),
            ..Default::default()
        }
    }

    pub fn remove_region(&self, id: &str) {
        self.regions.borrow_mut().remove(id);
    }

    pub fn region(&self, id: &str) -> Option<Region> {
        self.regions.borrow().get(id).cloned()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.regions.borrow().get(id).and_then(|r| r.text.clone())
    }

    pub fn html(&self, id: &str) -> Option<String> {
        self.regions.borrow().get(id).and_then(|r| r.html.clone())
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.regions.borrow().get(id).and_then(|r| r.visible)
    }

    pub fn active_page(&self) -> Option<String> {
        self.active_page.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    fn update(&self, id: &str, f: impl FnOnce(&mut Region)) {
        match self.regions.borrow_mut().get_mut(id) {
            Some(region) => f(region),
            None => log::trace!("no region {id}, write dropped"),
        }
    }
}

impl RenderTarget for MemoryTarget {
    fn set_text(&self, id: &str, text: &str) {
        self.update(id, |r| {
            r.text = Some(text.to_string());
            r.html = None;
        });
    }

    fn set_html(&self, id: &str, html: &str) {
        self.update(id, |r| {
            r.html = Some(html.to_string());
            r.text = None;
        });
    }

    fn set_visible(&self, id: &str, visible: bool) {
        self.update(id, |r| r.visible = Some(visible));
    }

    fn set_class(&self, id: &str, class: &str) {
        self.update(id, |r| r.class = Some(class.to_string()));
    }

    fn show_page(&self, page_id: &str) {
        *self.active_page.borrow_mut() = Some(page_id.to_string());
    }

    fn alert(&self, message: &str) {
        log::info!("alert: {message}");
        self.alerts.borrow_mut().push(message.to_string());
    }
}
