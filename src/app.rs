//! Explorer application: navigation state and page drivers.
//!
//! [`App`] owns the loaders, the render target and the history stack. All of
//! its state lives in one explicit [`AppState`]; the `RefCell` around it is
//! never held across an `.await`, so overlapping loads (a refresh tick firing
//! while the previous one is still running, a page load outliving a
//! navigation) simply take turns writing their own sections.

use std::cell::{Cell, RefCell};

use crate::explorer::{BlockListView, Explorer, LoadError, TxListView};
use crate::html;
use crate::render::{ids, RenderTarget};
use crate::router::{block_path, resolve, BlockParam, Page, Route, RouteState};
use crate::rpc_utils::RpcTransport;
use crate::search::{classify, INVALID_QUERY_MESSAGE};
use crate::types::TxStatus;
use crate::util_text::format_thousands;
use crate::verify::{self, VerificationRequest};

/// Browser-style history stack.
pub trait History {
    /// Push a new entry without reloading.
    fn push(&self, path: &str);
    fn current_path(&self) -> String;
}

/// History kept in memory (native binary and tests).
#[derive(Debug)]
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
    cursor: Cell<usize>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        MemoryHistory {
            entries: RefCell::new(vec![initial.to_string()]),
            cursor: Cell::new(0),
        }
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&self) -> bool {
        let c = self.cursor.get();
        if c == 0 {
            return false;
        }
        self.cursor.set(c - 1);
        true
    }

    pub fn forward(&self) -> bool {
        let c = self.cursor.get();
        if c + 1 >= self.entries.borrow().len() {
            return false;
        }
        self.cursor.set(c + 1);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl History for MemoryHistory {
    fn push(&self, path: &str) {
        let mut entries = self.entries.borrow_mut();
        // pushing drops any forward entries, like the browser does
        entries.truncate(self.cursor.get() + 1);
        entries.push(path.to_string());
        self.cursor.set(entries.len() - 1);
    }

    fn current_path(&self) -> String {
        self.entries
            .borrow()
            .get(self.cursor.get())
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }
}

/// Non-routed list pages reachable from the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ListView {
    #[value(name = "blocks")]
    AllBlocks,
    #[value(name = "txs")]
    AllTransactions,
    Contracts,
    Tokens,
}

impl ListView {
    pub fn page_id(self) -> &'static str {
        match self {
            ListView::AllBlocks => ids::BLOCKS_LIST_PAGE,
            ListView::AllTransactions => ids::TXS_LIST_PAGE,
            ListView::Contracts => ids::CONTRACTS_LIST_PAGE,
            ListView::Tokens => ids::TOKENS_LIST_PAGE,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "blocks" => Some(ListView::AllBlocks),
            "txs" | "transactions" => Some(ListView::AllTransactions),
            "contracts" => Some(ListView::Contracts),
            "tokens" => Some(ListView::Tokens),
            _ => None,
        }
    }
}

/// Everything the explorer remembers between navigations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    pub route: RouteState,
    /// Last head seen from the node, 0 until the first successful lookup
    pub latest_block_number: u64,
    /// Set while a list page is shown instead of the routed page
    pub list_view: Option<ListView>,
}

impl AppState {
    /// Home is on screen (auto refresh only runs then).
    pub fn is_home_active(&self) -> bool {
        self.list_view.is_none() && self.route.page() == Page::Home
    }

    /// Neighbouring block for prev/next buttons, within `0..=latest`.
    pub fn adjacent_block(&self, direction: i64) -> Option<u64> {
        let Route::Block {
            number: BlockParam::Number(current),
        } = &self.route.route
        else {
            return None;
        };
        let next = (*current as i128) + direction as i128;
        (0..=self.latest_block_number as i128)
            .contains(&next)
            .then_some(next as u64)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty query, nothing happened
    Ignored,
    Navigated(String),
    /// Not a hash, address or block number; the user was alerted
    Rejected,
}

pub struct App<T, R, H> {
    explorer: Explorer<T>,
    target: R,
    history: H,
    state: RefCell<AppState>,
}

impl<T, R, H> App<T, R, H>
where
    T: RpcTransport,
    R: RenderTarget,
    H: History,
{
    pub fn new(explorer: Explorer<T>, target: R, history: H) -> Self {
        App {
            explorer,
            target,
            history,
            state: RefCell::new(AppState::default()),
        }
    }

    pub fn explorer(&self) -> &Explorer<T> {
        &self.explorer
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Initial page load.
    pub async fn start(&self) {
        self.handle_route().await;
    }

    /// Push `path` and render it.
    pub async fn navigate(&self, path: &str) -> Route {
        self.history.push(path);
        self.handle_route().await
    }

    /// Render whatever the history currently points at. Also the back/forward handler.
    pub async fn handle_route(&self) -> Route {
        let path = self.history.current_path();
        let resolved = resolve(&path);
        let route = resolved.route.clone();
        {
            let mut state = self.state.borrow_mut();
            state.route = resolved;
            state.list_view = None;
        }
        log::info!("🧭 {path} -> {:?}", route.page());
        self.target.show(route.page());

        match &route {
            Route::Home => self.refresh_home().await,
            Route::Address { address } => self.load_address(address).await,
            Route::Tx { hash } => self.load_transaction(hash).await,
            Route::Block { number } => self.load_block(number).await,
        }
        route
    }

    /// Search box submit.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Ignored;
        }
        match classify(query).route_path() {
            Some(path) => {
                self.navigate(&path).await;
                SearchOutcome::Navigated(path)
            }
            None => {
                log::info!("rejected search {query:?}");
                self.target.alert(INVALID_QUERY_MESSAGE);
                SearchOutcome::Rejected
            }
        }
    }

    /// One 30 s timer tick. Returns whether anything was reloaded.
    pub async fn auto_refresh_tick(&self) -> bool {
        if !self.state.borrow().is_home_active() {
            log::debug!("auto refresh skipped, home not active");
            return false;
        }
        self.refresh_home().await;
        true
    }

    /// Prev/next block buttons.
    pub async fn navigate_block(&self, direction: i64) -> Option<u64> {
        if self.state.borrow().latest_block_number == 0 {
            self.current_head().await;
        }
        let next = self.state.borrow().adjacent_block(direction)?;
        self.navigate(&block_path(next)).await;
        Some(next)
    }

    /// Show one of the menu list pages. The URL is left untouched.
    pub async fn show_list(&self, view: ListView) {
        self.state.borrow_mut().list_view = Some(view);
        self.target.show_page(view.page_id());
        match view {
            ListView::AllBlocks => {
                let head = self.current_head().await;
                self.render_block_list(ids::ALL_BLOCKS_TABLE, head, BlockListView::All)
                    .await;
            }
            ListView::AllTransactions => {
                let head = self.current_head().await;
                self.render_tx_list(ids::ALL_TXS_TABLE, head, TxListView::All)
                    .await;
            }
            ListView::Contracts => self.target.set_html(
                ids::CONTRACTS_TABLE,
                &html::no_data_row(4, "No verified contracts found"),
            ),
            ListView::Tokens => self
                .target
                .set_html(ids::TOKENS_TABLE, &html::no_data_row(4, "No tokens found")),
        }
    }

    pub fn show_verify_contract(&self) {
        self.target.set_visible(ids::VERIFY_MODAL, true);
    }

    pub fn close_verify_modal(&self) {
        self.target.set_visible(ids::VERIFY_MODAL, false);
    }

    /// Contract verification form submit. Nothing is compiled.
    pub fn verify_contract(&self, request: &VerificationRequest) {
        let verified = verify::submit(request);
        self.target.alert(verify::DEMO_NOTICE);
        self.target.set_text(ids::CONTRACT_NAME, &verified.name);
        self.target.set_text(ids::CONTRACT_COMPILER, &verified.compiler);
        self.target
            .set_text(ids::CONTRACT_OPTIMIZATION, verified.optimization_label());
        self.target.set_text(ids::CONTRACT_CODE, &verified.source_code);
        self.close_verify_modal();
    }

    // ---- page loaders ----

    /// Fresh head from the node, falling back to the last one seen.
    async fn current_head(&self) -> Option<u64> {
        match self.explorer.client().block_number().await {
            Ok(head) => {
                self.state.borrow_mut().latest_block_number = head;
                Some(head)
            }
            Err(e) => {
                log::warn!("⚠️ head lookup failed: {e}");
                let cached = self.state.borrow().latest_block_number;
                (cached > 0).then_some(cached)
            }
        }
    }

    /// Network stats, latest blocks and latest transactions, in that order.
    pub async fn refresh_home(&self) {
        let head = match self.explorer.network_stats().await {
            Ok(stats) => {
                self.state.borrow_mut().latest_block_number = stats.latest_block;
                self.target.set_text(
                    ids::LATEST_BLOCK,
                    &format_thousands(stats.latest_block as u128),
                );
                self.target.set_text(
                    ids::TOTAL_TXS,
                    &format_thousands(stats.estimated_total_txs as u128),
                );
                Some(stats.latest_block)
            }
            Err(e) => {
                log::warn!("⚠️ Error loading network stats: {e}");
                let cached = self.state.borrow().latest_block_number;
                (cached > 0).then_some(cached)
            }
        };
        self.render_block_list(ids::LATEST_BLOCKS_TABLE, head, BlockListView::Latest)
            .await;
        self.render_tx_list(ids::LATEST_TXS_TABLE, head, TxListView::Latest)
            .await;
    }

    async fn render_block_list(&self, id: &str, head: Option<u64>, view: BlockListView) {
        let with_miner = view == BlockListView::All;
        let colspan = if with_miner { 5 } else { 4 };
        let Some(head) = head else {
            self.target
                .set_html(id, &html::no_data_row(colspan, "Error loading blocks"));
            return;
        };
        self.target
            .set_html(id, &html::loading_row(colspan, "Loading blocks..."));
        let rows = self.explorer.latest_blocks(head, view).await;
        self.target.set_html(id, &html::block_rows(&rows, with_miner));
    }

    async fn render_tx_list(&self, id: &str, head: Option<u64>, view: TxListView) {
        let with_block = view == TxListView::All;
        let colspan = if with_block { 5 } else { 4 };
        let Some(head) = head else {
            self.target
                .set_html(id, &html::no_data_row(colspan, "Error loading transactions"));
            return;
        };
        self.target
            .set_html(id, &html::loading_row(colspan, "Loading transactions..."));
        let rows = self.explorer.latest_transactions(head, view).await;
        self.target.set_html(id, &html::tx_rows(&rows, with_block));
    }

    async fn load_address(&self, address: &str) {
        self.target.set_text(ids::ADDRESS_VALUE, address);

        match self.explorer.address_overview(address).await {
            Ok(overview) => {
                self.target.set_text(
                    ids::ADDRESS_BALANCE,
                    &format!("{} ETH", overview.balance_eth),
                );
                self.target
                    .set_text(ids::ADDRESS_TX_COUNT, &overview.tx_count);
                self.target
                    .set_text(ids::ADDRESS_TYPE, overview.kind_label());
                self.target
                    .set_visible(ids::CONTRACT_TAB, overview.is_contract);

                if overview.is_contract {
                    let info = self.explorer.contract_info(address, &overview.code).await;
                    if let Some(name) = &info.name {
                        self.target.set_text(ids::CONTRACT_NAME, name);
                    }
                    self.target.set_visible(ids::TOKENS_TAB, info.is_token);
                    self.target.set_text(ids::CONTRACT_CODE, &info.code);
                } else {
                    self.target.set_visible(ids::TOKENS_TAB, false);
                }
            }
            Err(e) => {
                log::warn!("⚠️ Error loading address details for {address}: {e}");
                self.target
                    .set_text(ids::ADDRESS_BALANCE, "Error loading address");
            }
        }

        self.load_address_transactions(address).await;
    }

    async fn load_address_transactions(&self, address: &str) {
        let id = ids::ADDRESS_TXS_TABLE;
        self.target
            .set_html(id, &html::loading_row(7, "Loading transactions..."));
        let Some(head) = self.current_head().await else {
            self.target
                .set_html(id, &html::no_data_row(7, "Error loading transactions"));
            return;
        };
        let rows = self.explorer.address_transactions(head, address).await;
        self.target.set_html(id, &html::address_tx_rows(&rows));
    }

    async fn load_transaction(&self, hash: &str) {
        self.target.set_text(ids::TX_HASH, hash);

        let details = match self.explorer.transaction_details(hash).await {
            Ok(d) => d,
            Err(LoadError::NotFound(_)) => {
                self.target
                    .set_text(ids::TX_STATUS_TEXT, "Transaction not found");
                self.target.set_visible(ids::LOGS_TAB, false);
                return;
            }
            Err(e) => {
                log::warn!("⚠️ Error loading transaction {hash}: {e}");
                self.target
                    .set_text(ids::TX_STATUS_TEXT, "Error loading transaction");
                return;
            }
        };

        let t = &self.target;
        t.set_text(ids::TX_STATUS_TEXT, details.status.label());
        t.set_text(ids::STATUS_BADGE, details.status.label());
        t.set_class(ids::STATUS_BADGE, &details.status.badge_class());
        match details.block_number {
            Some(n) => t.set_html(ids::TX_BLOCK, &html::block_link(n)),
            None => t.set_text(ids::TX_BLOCK, TxStatus::Pending.label()),
        }
        t.set_text(ids::TX_TIMESTAMP, &details.timestamp);
        t.set_html(ids::TX_FROM, &html::address_link(&details.from, true));
        t.set_html(ids::TX_TO, &html::tx_recipient(details.to.as_deref()));
        t.set_text(ids::TX_VALUE, &format!("{} ETH", details.value_eth));
        t.set_text(ids::TX_FEE, &format!("{} ETH", details.fee_eth));
        t.set_text(ids::TX_GAS_PRICE, &format!("{} Gwei", details.gas_price_gwei));
        t.set_text(ids::TX_GAS_USED, &details.gas_used);
        t.set_text(ids::TX_GAS_LIMIT, &details.gas_limit);
        t.set_text(ids::TX_NONCE, &details.nonce.to_string());
        t.set_text(ids::TX_INPUT_DATA, &details.input);

        t.set_visible(ids::LOGS_TAB, !details.logs.is_empty());
        if !details.logs.is_empty() {
            t.set_html(ids::TX_LOGS, &html::logs(&details.logs));
        }
    }

    async fn load_block(&self, param: &BlockParam) {
        let label = param.to_string();
        self.target.set_text(ids::BLOCK_NUMBER, &label);
        self.target.set_text(ids::BLOCK_HEIGHT, &label);

        let (details, txs) = match self.explorer.block_details(param).await {
            Ok(found) => found,
            Err(LoadError::NotFound(_)) => {
                self.target
                    .set_text(ids::BLOCK_TIMESTAMP, "Block not found");
                self.target.set_html(
                    ids::BLOCK_TXS_TABLE,
                    &html::no_data_row(5, "No transactions in this block"),
                );
                return;
            }
            Err(e) => {
                log::warn!("⚠️ Error loading block {label}: {e}");
                self.target
                    .set_text(ids::BLOCK_TIMESTAMP, "Error loading block");
                return;
            }
        };

        let t = &self.target;
        t.set_text(ids::BLOCK_TIMESTAMP, &details.timestamp);
        t.set_text(ids::BLOCK_TX_COUNT, &details.tx_count.to_string());
        t.set_html(ids::BLOCK_MINER, &html::address_link(&details.miner, true));
        t.set_text(ids::BLOCK_GAS_USED, &details.gas_used);
        t.set_text(ids::BLOCK_GAS_LIMIT, &details.gas_limit);
        t.set_text(ids::BLOCK_HASH, &details.hash);
        t.set_text(ids::BLOCK_PARENT_HASH, &details.parent_hash);

        if txs.is_empty() {
            t.set_html(ids::BLOCK_TXS_TABLE, &html::block_tx_rows(&[]));
            return;
        }
        t.set_html(
            ids::BLOCK_TXS_TABLE,
            &html::loading_row(5, "Loading transactions..."),
        );
        let rows = self.explorer.block_transactions(&txs).await;
        t.set_html(ids::BLOCK_TXS_TABLE, &html::block_tx_rows(&rows));
    }
}
