//! Display helpers for chain quantities.
//!
//! Everything the node returns is a `0x`-prefixed hex quantity. These helpers
//! parse those quantities and derive the strings shown in tables: ETH and Gwei
//! amounts, gas percentages, relative ages, truncated hashes and ASCII decoded
//! from `eth_call` return data.

use serde::{Deserialize, Deserializer};

pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;
pub const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Label used when a contract answers `name()` but the payload is unreadable.
pub const GENERIC_TOKEN_LABEL: &str = "ERC-20 Token";

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Parse a hex quantity (`0x1a`) into a `u128`.
///
/// Returns `None` for an empty digit string (`"0x"`), non-hex digits or overflow.
pub fn parse_hex_u128(s: &str) -> Option<u128> {
    let digits = strip_0x(s.trim());
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}

/// Parse a hex quantity into a `u64` (block numbers, gas, nonces).
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    let digits = strip_0x(s.trim());
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Encode a block number as the hex quantity the node expects.
#[inline]
pub fn to_hex_quantity(n: u64) -> String {
    format!("0x{n:x}")
}

/// Format `value / unit` with exactly `decimals` fractional digits, rounding half up.
///
/// Integer arithmetic only, so large wei values never lose precision.
pub fn format_units(value: u128, unit: u128, decimals: u32) -> String {
    let unit = unit.max(1);
    let scale = 10u128.saturating_pow(decimals);
    let whole = value / unit;
    let rem = value % unit;

    // rem < unit, so rem * scale only overflows for absurd unit/decimal pairs
    let (mut frac, carry_rem) = match rem.checked_mul(scale) {
        Some(scaled) => (scaled / unit, scaled % unit),
        None => (0, 0),
    };
    let mut whole = whole;
    if carry_rem * 2 >= unit && carry_rem != 0 {
        frac += 1;
        if frac == scale {
            frac = 0;
            whole += 1;
        }
    }

    if decimals == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{frac:0width$}", width = decimals as usize)
    }
}

/// Wei → ETH with a fixed number of decimals (e.g. `"1.000000"`).
pub fn format_eth(wei: u128, decimals: u32) -> String {
    format_units(wei, WEI_PER_ETH, decimals)
}

/// Wei per gas → Gwei with a fixed number of decimals.
pub fn format_gwei(wei: u128, decimals: u32) -> String {
    format_units(wei, WEI_PER_GWEI, decimals)
}

/// Transaction fee in wei: `gas_used × gas_price`.
#[inline]
pub fn fee_wei(gas_used: u64, gas_price: u128) -> u128 {
    (gas_used as u128).saturating_mul(gas_price)
}

/// Gas used as a percentage of the gas limit (`"50.0"` at one decimal).
///
/// A zero gas limit renders as zero rather than NaN.
pub fn gas_percent(gas_used: u64, gas_limit: u64, decimals: usize) -> String {
    let pct = if gas_limit == 0 {
        0.0
    } else {
        gas_used as f64 / gas_limit as f64 * 100.0
    };
    format!("{pct:.decimals$}")
}

/// Relative age of a unix timestamp: `45s ago`, `1m ago`, `2h ago`, `2d ago`.
pub fn time_ago(timestamp: u64, now: i64) -> String {
    // timestamps past i64::MAX are nonsense; show them as brand new
    let diff = i64::try_from(timestamp).map_or(0, |t| now.saturating_sub(t).max(0));
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3_600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86_400 {
        format!("{}h ago", diff / 3_600)
    } else {
        format!("{}d ago", diff / 86_400)
    }
}

/// Shorten a hash or address to `first10...last8`.
///
/// Inputs shorter than 18 characters are returned unchanged.
pub fn truncate_hash(hash: &str) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() < 18 {
        return hash.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{head}...{tail}")
}

/// Decode hex-encoded bytes (`0x…`). `None` for odd length or non-hex digits.
pub fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    let digits = strip_0x(hex.trim());
    if digits.len() % 2 != 0 {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Decode the return data of a `string`-returning call into readable ASCII.
///
/// Tries the ABI layout first (offset word, length word, bytes). When that does
/// not fit, keeps every printable byte of the payload. Zero and control bytes are
/// dropped either way. Returns `None` when the payload is not hex at all.
pub fn hex_to_string(hex: &str) -> Option<String> {
    let bytes = decode_hex(hex)?;
    let payload = abi_string_payload(&bytes).unwrap_or(&bytes);
    let text: String = payload
        .iter()
        .filter(|b| (0x20..=0x7e).contains(*b))
        .map(|&b| b as char)
        .collect();
    Some(text.trim().to_string())
}

fn abi_string_payload(bytes: &[u8]) -> Option<&[u8]> {
    let word = |at: usize| -> Option<usize> {
        let w = bytes.get(at..at.checked_add(32)?)?;
        // Only the low 8 bytes can hold a sane offset/length
        if w[..24].iter().any(|&b| b != 0) {
            return None;
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&w[24..]);
        usize::try_from(u64::from_be_bytes(buf)).ok()
    };
    let offset = word(0)?;
    let len = word(offset)?;
    let start = offset.checked_add(32)?;
    bytes.get(start..start.checked_add(len)?)
}

/// Group digits with commas the way `toLocaleString` does for en-US.
pub fn format_thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Local wall-clock rendering of a unix timestamp.
pub fn format_timestamp(timestamp: u64) -> String {
    use chrono::{Local, TimeZone};
    let Ok(secs) = i64::try_from(timestamp) else {
        return "-".to_string();
    };
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Current unix time in seconds (works on wasm through chrono's `wasmbind`).
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

// ---- serde helpers for hex quantities ----

pub fn deserialize_hex_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_hex_u64(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid hex quantity {s:?}")))
}

pub fn deserialize_hex_u128<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_hex_u128(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid hex quantity {s:?}")))
}

pub fn deserialize_option_hex_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    match s {
        None => Ok(None),
        Some(s) => parse_hex_u64(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex quantity {s:?}"))),
    }
}

pub fn deserialize_option_hex_u128<'de, D>(deserializer: D) -> Result<Option<u128>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    match s {
        None => Ok(None),
        Some(s) => parse_hex_u128(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex quantity {s:?}"))),
    }
}
