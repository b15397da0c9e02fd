//! Tronscan-style explorer client.
//!
//! Two endpoints cover everything the verifier needs: `transaction-info`
//! for hash lookups (TRC-20 transfers arrive pre-decoded) and
//! `token_trc20/transfers` for an address's incoming history.

use async_trait::async_trait;
use serde::Deserialize;

use crate::chains::source::{TronSource, TronTokenTransfer, TronTransfer, TronTx};
use crate::chains::types::{ChainError, ChainResult};
use crate::explorer::http;

const TRANSFER_PAGE_SIZE: &str = "50";

/// Client for a Tronscan-compatible API.
pub struct TronExplorer {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct TxInfoResponse {
    /// Empty when the chain does not know the hash.
    #[serde(default)]
    hash: String,
    #[serde(default, rename = "contractRet")]
    contract_ret: String,
    #[serde(default)]
    confirmed: bool,
    #[serde(default)]
    confirmations: Option<u64>,
    #[serde(default, rename = "trc20TransferInfo")]
    trc20_transfers: Vec<Trc20TransferInfo>,
}

#[derive(Debug, Deserialize)]
struct Trc20TransferInfo {
    #[serde(default)]
    to_address: String,
    #[serde(default)]
    contract_address: String,
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    amount_str: String,
    #[serde(default)]
    decimals: u32,
}

#[derive(Debug, Deserialize)]
struct TransferListResponse {
    #[serde(default)]
    token_transfers: Vec<TransferEntry>,
}

#[derive(Debug, Deserialize)]
struct TransferEntry {
    #[serde(default)]
    transaction_id: String,
    #[serde(default)]
    to_address: String,
    #[serde(default)]
    contract_address: String,
    #[serde(default)]
    quant: String,
    #[serde(default)]
    confirmed: bool,
    #[serde(default, rename = "tokenInfo")]
    token_info: TokenInfo,
}

#[derive(Debug, Default, Deserialize)]
struct TokenInfo {
    #[serde(default, rename = "tokenAbbr")]
    token_abbr: String,
    #[serde(default, rename = "tokenDecimal")]
    token_decimal: u32,
}

impl TronExplorer {
    pub fn new(base_url: &str, timeout_secs: u64) -> ChainResult<Self> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }
}

/// An empty `contractRet` means the contract list carried no result slot,
/// which Tronscan uses for plain successful transfers.
fn is_success(contract_ret: &str) -> bool {
    contract_ret.is_empty() || contract_ret == "SUCCESS"
}

fn map_tx(body: TxInfoResponse) -> TronTx {
    TronTx {
        tx_id: body.hash,
        success: is_success(&body.contract_ret),
        confirmed: body.confirmed,
        confirmations: body.confirmations,
        transfers: body
            .trc20_transfers
            .into_iter()
            .map(|info| TronTransfer {
                to: info.to_address,
                contract: info.contract_address,
                symbol: info.symbol,
                amount_raw: info.amount_str,
                token_decimals: info.decimals,
            })
            .collect(),
    }
}

fn map_transfer(entry: TransferEntry) -> TronTokenTransfer {
    TronTokenTransfer {
        tx_id: entry.transaction_id,
        to: entry.to_address,
        contract: entry.contract_address,
        symbol: entry.token_info.token_abbr,
        amount_raw: entry.quant,
        token_decimals: entry.token_info.token_decimal,
        confirmed: entry.confirmed,
    }
}

#[async_trait]
impl TronSource for TronExplorer {
    async fn transaction(&self, tx_id: &str) -> ChainResult<Option<TronTx>> {
        let url = format!("{}/transaction-info", self.base_url);
        let response =
            http::get(&self.client, &url, &[("hash", tx_id)], self.timeout_secs).await?;
        if !response.status().is_success() {
            return Err(ChainError::Api(format!(
                "Tron explorer returned status {}",
                response.status()
            )));
        }

        let body: TxInfoResponse = response
            .json()
            .await
            .map_err(|e| http::request_error(e, self.timeout_secs))?;
        // Unknown hashes come back as 200 with an empty body.
        if body.hash.is_empty() {
            return Ok(None);
        }
        Ok(Some(map_tx(body)))
    }

    async fn token_transfers(&self, address: &str) -> ChainResult<Vec<TronTokenTransfer>> {
        let url = format!("{}/token_trc20/transfers", self.base_url);
        let query = [
            ("toAddress", address),
            ("limit", TRANSFER_PAGE_SIZE),
            ("start", "0"),
        ];
        let response = http::get(&self.client, &url, &query, self.timeout_secs).await?;
        if !response.status().is_success() {
            return Err(ChainError::Api(format!(
                "Tron explorer returned status {}",
                response.status()
            )));
        }

        let body: TransferListResponse = response
            .json()
            .await
            .map_err(|e| http::request_error(e, self.timeout_secs))?;
        Ok(body.token_transfers.into_iter().map(map_transfer).collect())
    }
}
