use crate::types::{Block, Receipt, Transaction};
use crate::util_text::{parse_hex_u128, parse_hex_u64, to_hex_quantity};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// 4-byte selector of ERC-20 `name()`.
pub const ERC20_NAME_SELECTOR: &str = "0x06fdde03";

/// Why a JSON-RPC call produced no result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// Network failure, DNS, refused connection, unreadable body
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http {0}")]
    Status(u16),
    /// The node answered with a JSON-RPC `error` object
    #[error("rpc {code} {message}")]
    Rpc { code: i64, message: String },
    /// Response was JSON but not the shape we asked for
    #[error("invalid rpc payload: {0}")]
    InvalidPayload(String),
}

pub type RpcResult<T> = Result<T, RpcError>;

/// A single JSON-RPC round trip.
///
/// Implementations must report every failure through [`RpcError`]; callers never
/// see a panic from the transport. No retry, no backoff.
#[async_trait(?Send)]
pub trait RpcTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value>;
}

#[async_trait(?Send)]
impl<T: RpcTransport + ?Sized> RpcTransport for std::rc::Rc<T> {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        (**self).call(method, params).await
    }
}

/// JSON-RPC 2.0 request body. The id is constant; calls are never pipelined.
pub fn request_body(method: &str, params: &[Value]) -> Value {
    json!({"jsonrpc":"2.0","id":1,"method":method,"params":params})
}

/// Extract `result` from a JSON-RPC response, or the error it carries.
pub fn parse_response(v: Value) -> RpcResult<Value> {
    if let Some(err) = v.get("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("rpc error")
            .to_string();
        return Err(RpcError::Rpc { code, message });
    }
    match v {
        Value::Object(mut obj) => obj
            .remove("result")
            .ok_or_else(|| RpcError::InvalidPayload("no result".into())),
        _ => Err(RpcError::InvalidPayload("response is not an object".into())),
    }
}

/// HTTP POST transport backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    #[cfg(not(target_arch = "wasm32"))]
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        HttpTransport {
            url: url.into(),
            client: reqwest::Client::new(),
            #[cfg(not(target_arch = "wasm32"))]
            timeout: None,
        }
    }

    /// Per-request timeout (native only; the browser fetch has its own).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout = timeout_ms.map(Duration::from_millis);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl RpcTransport for HttpTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        let body = request_body(method, &params);
        log::debug!("📡 {method} {params:?}");

        #[allow(unused_mut)]
        let mut req = self.client.post(&self.url).json(&body);
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(t) = self.timeout {
                req = req.timeout(t);
            }
        }

        let res = req
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let status = res.status();
        // JSON-RPC errors may come back with a non-2xx status; prefer the body
        let v: Value = match res.json().await {
            Ok(v) => v,
            Err(_) if !status.is_success() => return Err(RpcError::Status(status.as_u16())),
            Err(e) => return Err(RpcError::Transport(e.to_string())),
        };
        let out = parse_response(v);
        if let Err(e) = &out {
            log::warn!("⚠️ {method} failed: {e}");
        }
        out
    }
}

fn decode<T: DeserializeOwned>(method: &str, v: Value) -> RpcResult<Option<T>> {
    if v.is_null() {
        return Ok(None);
    }
    serde_json::from_value(v)
        .map(Some)
        .map_err(|e| RpcError::InvalidPayload(format!("{method}: {e}")))
}

fn quantity_u64(method: &str, v: &Value) -> RpcResult<u64> {
    v.as_str()
        .and_then(parse_hex_u64)
        .ok_or_else(|| RpcError::InvalidPayload(format!("{method}: expected hex quantity, got {v}")))
}

fn quantity_u128(method: &str, v: &Value) -> RpcResult<u128> {
    v.as_str()
        .and_then(parse_hex_u128)
        .ok_or_else(|| RpcError::InvalidPayload(format!("{method}: expected hex quantity, got {v}")))
}

fn data_string(method: &str, v: Value) -> RpcResult<String> {
    match v {
        Value::String(s) => Ok(s),
        Value::Null => Ok("0x".to_string()),
        other => Err(RpcError::InvalidPayload(format!(
            "{method}: expected hex data, got {other}"
        ))),
    }
}

/// Typed wrappers over the `eth_*` methods the explorer consumes.
#[derive(Clone, Debug)]
pub struct EthClient<T> {
    transport: T,
}

impl<T: RpcTransport> EthClient<T> {
    pub fn new(transport: T) -> Self {
        EthClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn block_number(&self) -> RpcResult<u64> {
        let v = self.transport.call("eth_blockNumber", vec![]).await?;
        quantity_u64("eth_blockNumber", &v)
    }

    pub async fn block_by_number(&self, number: u64, full_txs: bool) -> RpcResult<Option<Block>> {
        let v = self
            .transport
            .call(
                "eth_getBlockByNumber",
                vec![json!(to_hex_quantity(number)), json!(full_txs)],
            )
            .await?;
        decode("eth_getBlockByNumber", v)
    }

    pub async fn balance(&self, address: &str) -> RpcResult<u128> {
        let v = self
            .transport
            .call("eth_getBalance", vec![json!(address), json!("latest")])
            .await?;
        quantity_u128("eth_getBalance", &v)
    }

    pub async fn transaction_count(&self, address: &str) -> RpcResult<u64> {
        let v = self
            .transport
            .call("eth_getTransactionCount", vec![json!(address), json!("latest")])
            .await?;
        quantity_u64("eth_getTransactionCount", &v)
    }

    pub async fn code(&self, address: &str) -> RpcResult<String> {
        let v = self
            .transport
            .call("eth_getCode", vec![json!(address), json!("latest")])
            .await?;
        data_string("eth_getCode", v)
    }

    /// Static call against `latest`.
    pub async fn eth_call(&self, to: &str, data: &str) -> RpcResult<String> {
        let v = self
            .transport
            .call(
                "eth_call",
                vec![json!({"to": to, "data": data}), json!("latest")],
            )
            .await?;
        data_string("eth_call", v)
    }

    pub async fn transaction_by_hash(&self, hash: &str) -> RpcResult<Option<Transaction>> {
        let v = self
            .transport
            .call("eth_getTransactionByHash", vec![json!(hash)])
            .await?;
        decode("eth_getTransactionByHash", v)
    }

    pub async fn transaction_receipt(&self, hash: &str) -> RpcResult<Option<Receipt>> {
        let v = self
            .transport
            .call("eth_getTransactionReceipt", vec![json!(hash)])
            .await?;
        decode("eth_getTransactionReceipt", v)
    }
}
