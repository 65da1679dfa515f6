//! Bounded backward block scans.
//!
//! Recent-block and recent-transaction views walk blocks from the head down and
//! stop at whichever comes first: the target item count or the block budget.
//! This module holds the stop rules; the loaders in [`crate::explorer`] drive
//! them with RPC calls, and [`scan`] drives them with a plain closure so the
//! rules can be tested without a node.

/// Limits of one scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanPlan {
    /// Maximum number of blocks visited, head included
    pub depth: u64,
    /// Stop once this many items are collected
    pub target: usize,
    /// Maximum items taken from a single block
    pub per_block_cap: Option<usize>,
}

impl ScanPlan {
    /// Home page "Latest Blocks"
    pub const LATEST_BLOCKS: ScanPlan = ScanPlan {
        depth: 10,
        target: 10,
        per_block_cap: None,
    };
    /// "All Blocks" list
    pub const ALL_BLOCKS: ScanPlan = ScanPlan {
        depth: 25,
        target: 25,
        per_block_cap: None,
    };
    /// Home page "Latest Transactions": at most 5 per block
    pub const LATEST_TXS: ScanPlan = ScanPlan {
        depth: 5,
        target: 10,
        per_block_cap: Some(5),
    };
    /// "All Transactions" list: every tx of a block until 25
    pub const ALL_TXS: ScanPlan = ScanPlan {
        depth: 10,
        target: 25,
        per_block_cap: None,
    };
    /// Address history
    pub const ADDRESS_TXS: ScanPlan = ScanPlan {
        depth: 100,
        target: 25,
        per_block_cap: None,
    };

    /// Block numbers visited, newest first. Never goes below genesis.
    pub fn block_numbers(&self, head: u64) -> impl Iterator<Item = u64> {
        let visited = self.depth.min(head.saturating_add(1));
        (0..visited).map(move |i| head - i)
    }
}

/// Accumulator enforcing a [`ScanPlan`].
#[derive(Debug)]
pub struct Scan<T> {
    plan: ScanPlan,
    items: Vec<T>,
    in_block: usize,
}

impl<T> Scan<T> {
    pub fn new(plan: ScanPlan) -> Self {
        Scan {
            plan,
            items: Vec::with_capacity(plan.target),
            in_block: 0,
        }
    }

    /// Target count reached.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.items.len() >= self.plan.target
    }

    /// Start taking items from the next block.
    #[inline]
    pub fn next_block(&mut self) {
        self.in_block = 0;
    }

    /// Whether another item from the current block would be kept.
    pub fn accepts(&self) -> bool {
        !self.is_done() && self.plan.per_block_cap.map_or(true, |cap| self.in_block < cap)
    }

    /// Keep `item` if the plan allows it. Returns whether it was kept.
    pub fn push(&mut self, item: T) -> bool {
        if !self.accepts() {
            return false;
        }
        self.items.push(item);
        self.in_block += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Run a scan from `head` downwards.
///
/// `fetch` yields the candidate items of one block, or `None` when that block
/// could not be loaded; a missing block still counts against the depth.
pub fn scan<T, F>(plan: &ScanPlan, head: u64, mut fetch: F) -> Vec<T>
where
    F: FnMut(u64) -> Option<Vec<T>>,
{
    let mut acc = Scan::new(*plan);
    for number in plan.block_numbers(head) {
        if acc.is_done() {
            break;
        }
        acc.next_block();
        let Some(items) = fetch(number) else {
            continue;
        };
        for item in items {
            if !acc.push(item) {
                break;
            }
        }
    }
    acc.into_items()
}
