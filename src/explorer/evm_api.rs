//! Etherscan-style EVM explorer client.
//!
//! The account API answers by address, not by hash. Hash lookups therefore
//! pull the address's recent history and select the matching entry, which is
//! exactly the shape the `EvmSource` trait exposes.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::chains::source::{EvmSource, EvmTokenTransfer, EvmTransfer};
use crate::chains::types::{ChainError, ChainResult};
use crate::explorer::http;

/// Client for an Etherscan-compatible account API.
pub struct EvmExplorer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    status: String,
    #[serde(default)]
    message: String,
    result: Value,
}

/// Entry of `action=txlist`. Every field arrives as a string.
#[derive(Debug, Deserialize)]
struct NativeTxEntry {
    hash: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    confirmations: String,
    #[serde(default, rename = "isError")]
    is_error: String,
}

/// Entry of `action=tokentx`.
#[derive(Debug, Deserialize)]
struct TokenTxEntry {
    hash: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    confirmations: String,
    #[serde(default, rename = "contractAddress")]
    contract_address: String,
    #[serde(default, rename = "tokenSymbol")]
    token_symbol: String,
    #[serde(default, rename = "tokenDecimal")]
    token_decimal: String,
}

impl EvmExplorer {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> ChainResult<Self> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
        })
    }

    /// Runs one `module=account` query and unwraps the status/result envelope.
    async fn account_query<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        address: &str,
    ) -> ChainResult<Vec<T>> {
        let mut query = vec![
            ("module", "account"),
            ("action", action),
            ("address", address),
            ("startblock", "0"),
            ("endblock", "99999999"),
            ("sort", "desc"),
        ];
        if !self.api_key.is_empty() {
            query.push(("apikey", self.api_key.as_str()));
        }

        let response = http::get(&self.client, &self.base_url, &query, self.timeout_secs).await?;
        if !response.status().is_success() {
            return Err(ChainError::Api(format!(
                "EVM explorer returned status {}",
                response.status()
            )));
        }

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| http::request_error(e, self.timeout_secs))?;

        match envelope.result {
            // "No transactions found" arrives as status 0 with an empty array.
            Value::Array(entries) => entries
                .into_iter()
                .map(|entry| {
                    serde_json::from_value(entry)
                        .map_err(|e| ChainError::Decode(format!("EVM explorer entry: {}", e)))
                })
                .collect(),
            Value::String(reason) if envelope.status != "1" => Err(ChainError::Api(format!(
                "EVM explorer rejected the request: {} ({})",
                envelope.message, reason
            ))),
            other => Err(ChainError::Decode(format!(
                "unexpected EVM explorer result shape: {}",
                other
            ))),
        }
    }
}

/// The hash extractor strips a `0x` prefix when it scans a raw hex run;
/// Etherscan entries always carry one.
fn normalize_hash(tx_id: &str) -> String {
    if tx_id.starts_with("0x") || tx_id.starts_with("0X") {
        tx_id.to_string()
    } else {
        format!("0x{}", tx_id)
    }
}

fn map_native(entry: NativeTxEntry) -> ChainResult<EvmTransfer> {
    let confirmations = entry
        .confirmations
        .parse()
        .map_err(|_| ChainError::Decode(format!("confirmations {:?}", entry.confirmations)))?;
    Ok(EvmTransfer {
        tx_id: entry.hash,
        to: if entry.to.is_empty() {
            None
        } else {
            Some(entry.to)
        },
        value_wei: entry.value,
        confirmations,
        failed: entry.is_error == "1",
    })
}

fn map_token(entry: TokenTxEntry) -> ChainResult<EvmTokenTransfer> {
    let token_decimals = entry
        .token_decimal
        .parse()
        .map_err(|_| ChainError::Decode(format!("tokenDecimal {:?}", entry.token_decimal)))?;
    let confirmations = entry
        .confirmations
        .parse()
        .map_err(|_| ChainError::Decode(format!("confirmations {:?}", entry.confirmations)))?;
    Ok(EvmTokenTransfer {
        tx_id: entry.hash,
        to: entry.to,
        contract: entry.contract_address,
        symbol: entry.token_symbol,
        value_raw: entry.value,
        token_decimals,
        confirmations,
    })
}

#[async_trait]
impl EvmSource for EvmExplorer {
    async fn transaction(&self, tx_id: &str, address: &str) -> ChainResult<Option<EvmTransfer>> {
        let wanted = normalize_hash(tx_id);
        let entries: Vec<NativeTxEntry> = self.account_query("txlist", address).await?;
        entries
            .into_iter()
            .find(|entry| entry.hash.eq_ignore_ascii_case(&wanted))
            .map(map_native)
            .transpose()
    }

    async fn transfer_events(
        &self,
        tx_id: &str,
        address: &str,
    ) -> ChainResult<Vec<EvmTokenTransfer>> {
        let wanted = normalize_hash(tx_id);
        let entries: Vec<TokenTxEntry> = self.account_query("tokentx", address).await?;
        entries
            .into_iter()
            .filter(|entry| entry.hash.eq_ignore_ascii_case(&wanted))
            .map(map_token)
            .collect()
    }

    async fn address_transactions(&self, address: &str) -> ChainResult<Vec<EvmTransfer>> {
        let entries: Vec<NativeTxEntry> = self.account_query("txlist", address).await?;
        entries.into_iter().map(map_native).collect()
    }

    async fn token_transfers(&self, address: &str) -> ChainResult<Vec<EvmTokenTransfer>> {
        let entries: Vec<TokenTxEntry> = self.account_query("tokentx", address).await?;
        entries.into_iter().map(map_token).collect()
    }
}
