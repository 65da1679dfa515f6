//! Table markup for the explorer pages.
//!
//! Links carry a `data-route` attribute; the browser glue intercepts clicks on
//! them and routes in-app instead of reloading.

use crate::router::{address_path, block_path, tx_path};
use crate::types::Log;
use crate::ui_snapshot::{AddressTxRow, BlockRow, BlockTxRow, TxRow};
use crate::util_text::truncate_hash;

pub const CONTRACT_CREATION: &str = "Contract Creation";

/// Escape text for HTML element content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// In-app link.
pub fn link(path: &str, class: &str, label: &str) -> String {
    let path = escape(path);
    format!(
        r#"<a href="{path}" class="{class}" data-route="{path}">{}</a>"#,
        escape(label)
    )
}

pub fn block_link(number: u64) -> String {
    link(&block_path(number), "clickable", &number.to_string())
}

pub fn tx_link(hash: &str) -> String {
    link(&tx_path(hash), "clickable hash", &truncate_hash(hash))
}

/// Address link; `full` shows the whole address instead of the short form.
pub fn address_link(address: &str, full: bool) -> String {
    let label = if full {
        address.to_string()
    } else {
        truncate_hash(address)
    };
    link(&address_path(address), "address", &label)
}

fn recipient(to: Option<&str>, full: bool) -> String {
    match to {
        Some(to) => address_link(to, full),
        None => CONTRACT_CREATION.to_string(),
    }
}

/// Single full-width row for loading/empty/error states.
pub fn placeholder_row(colspan: usize, class: &str, message: &str) -> String {
    format!(
        r#"<tr><td colspan="{colspan}" class="{class}">{}</td></tr>"#,
        escape(message)
    )
}

pub fn loading_row(colspan: usize, message: &str) -> String {
    placeholder_row(colspan, "loading", message)
}

pub fn no_data_row(colspan: usize, message: &str) -> String {
    placeholder_row(colspan, "no-data", message)
}

fn rows_or<T>(items: &[T], colspan: usize, empty: &str, row: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return no_data_row(colspan, empty);
    }
    items.iter().map(row).collect()
}

/// Block list; the miner column only appears on the "All Blocks" page.
pub fn block_rows(rows: &[BlockRow], with_miner: bool) -> String {
    let colspan = if with_miner { 5 } else { 4 };
    rows_or(rows, colspan, "No blocks found", |b| {
        let miner = if with_miner {
            format!("<td>{}</td>", address_link(&b.miner, false))
        } else {
            String::new()
        };
        format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} ({}%)</td>{miner}</tr>",
            block_link(b.number),
            escape(&b.age),
            b.tx_count,
            escape(&b.gas_used),
            escape(&b.gas_percent),
        )
    })
}

/// Transaction list; the block column only appears on the "All Transactions" page.
pub fn tx_rows(rows: &[TxRow], with_block: bool) -> String {
    let colspan = if with_block { 5 } else { 4 };
    rows_or(rows, colspan, "No transactions found", |t| {
        let block = if with_block {
            format!("<td>{}</td>", block_link(t.block_number))
        } else {
            String::new()
        };
        format!(
            "<tr><td>{}</td>{block}<td>{}</td><td>{}</td><td>{} ETH</td></tr>",
            tx_link(&t.hash),
            address_link(&t.from, false),
            recipient(t.to.as_deref(), false),
            escape(&t.value_eth),
        )
    })
}

pub fn address_tx_rows(rows: &[AddressTxRow]) -> String {
    rows_or(rows, 7, "No transactions found", |t| {
        format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{} ETH</td><td>{} ETH</td></tr>",
            tx_link(&t.hash),
            block_link(t.block_number),
            escape(&t.age),
            address_link(&t.from, false),
            recipient(t.to.as_deref(), false),
            escape(&t.value_eth),
            escape(&t.fee_eth),
        )
    })
}

pub fn block_tx_rows(rows: &[BlockTxRow]) -> String {
    rows_or(rows, 5, "No transactions in this block", |t| {
        format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} ETH</td><td>{}</td></tr>",
            tx_link(&t.hash),
            address_link(&t.from, false),
            recipient(t.to.as_deref(), false),
            escape(&t.value_eth),
            escape(&t.gas_used),
        )
    })
}

/// Full-length recipient link for the transaction page.
pub fn tx_recipient(to: Option<&str>) -> String {
    recipient(to, true)
}

pub fn logs(logs: &[Log]) -> String {
    logs.iter()
        .enumerate()
        .map(|(index, log)| {
            let topics: String = log
                .topics
                .iter()
                .map(|t| format!(r#"<div class="topic hash">{}</div>"#, escape(t)))
                .collect();
            format!(
                concat!(
                    r#"<div class="log-entry"><h4>Log {}</h4><div class="log-details">"#,
                    r#"<div class="detail-row"><span class="detail-label">Address:</span>"#,
                    r#"<span class="detail-value address">{}</span></div>"#,
                    r#"<div class="detail-row"><span class="detail-label">Topics:</span>"#,
                    r#"<div class="topics">{}</div></div>"#,
                    r#"<div class="detail-row"><span class="detail-label">Data:</span>"#,
                    r#"<span class="detail-value hash">{}</span></div></div></div>"#,
                ),
                index,
                escape(&log.address),
                topics,
                escape(&log.data),
            )
        })
        .collect()
}

/// Flatten markup to plain text: cells become tabs, rows and blocks become
/// newlines, tags are dropped and entities decoded.
pub fn to_plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            rest = &rest[start..];
            break;
        };
        let tag = rest[start + 1..start + end].trim_start_matches('/');
        let name = tag
            .split(|c: char| c.is_whitespace())
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let closing = rest[start + 1..].starts_with('/');
        match name.as_str() {
            "td" | "th" if closing => out.push('\t'),
            "tr" | "div" | "h4" if closing => out.push('\n'),
            _ => {}
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);

    let text = out
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.lines()
        .map(|l| l.trim_end_matches('\t').trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
