//! BlockCypher-style UTXO explorer client (BTC and LTC).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::chains::source::{AddressRef, UtxoOutput, UtxoSource, UtxoTx};
use crate::chains::types::{ChainError, ChainResult};
use crate::explorer::http;
use crate::request::currency::Chain;

/// Client for a BlockCypher-compatible API serving both UTXO chains.
pub struct UtxoExplorer {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    hash: String,
    #[serde(default)]
    outputs: Vec<OutputEntry>,
    #[serde(default)]
    confirmations: u64,
}

#[derive(Debug, Deserialize)]
struct OutputEntry {
    #[serde(default)]
    addresses: Vec<String>,
    #[serde(default)]
    value: u64,
}

#[derive(Debug, Deserialize)]
struct AddressResponse {
    #[serde(default)]
    txrefs: Vec<TxRefEntry>,
    #[serde(default)]
    unconfirmed_txrefs: Vec<TxRefEntry>,
}

#[derive(Debug, Deserialize)]
struct TxRefEntry {
    tx_hash: String,
    #[serde(default)]
    value: u64,
    #[serde(default)]
    confirmations: u64,
    /// Output index when the address is credited; inputs carry -1.
    #[serde(default = "spend_marker")]
    tx_output_n: i64,
}

fn spend_marker() -> i64 {
    -1
}

impl UtxoExplorer {
    pub fn new(base_url: &str, timeout_secs: u64) -> ChainResult<Self> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn chain_path(chain: Chain) -> ChainResult<&'static str> {
        match chain {
            Chain::Btc => Ok("btc/main"),
            Chain::Ltc => Ok("ltc/main"),
            Chain::Eth | Chain::Tron => Err(ChainError::Api(format!(
                "chain {} is not served by the UTXO explorer",
                chain
            ))),
        }
    }

    /// Ids and addresses become URL path segments; anything non-alphanumeric
    /// cannot exist on these chains.
    fn valid_segment(value: &str) -> bool {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

fn map_tx(tx: TxResponse) -> UtxoTx {
    UtxoTx {
        tx_id: tx.hash,
        outputs: tx
            .outputs
            .into_iter()
            .map(|output| UtxoOutput {
                addresses: output.addresses,
                value_sats: output.value,
            })
            .collect(),
        confirmations: tx.confirmations,
    }
}

/// Incoming credits only, unconfirmed entries first. The payment being
/// checked is usually the newest thing on the address.
fn map_refs(body: AddressResponse) -> Vec<AddressRef> {
    let mut refs = Vec::new();
    for (entries, confirmed) in [(body.unconfirmed_txrefs, false), (body.txrefs, true)] {
        for entry in entries {
            if entry.tx_output_n < 0 {
                continue;
            }
            refs.push(AddressRef {
                tx_id: entry.tx_hash,
                value_sats: entry.value,
                confirmations: entry.confirmations,
                confirmed,
            });
        }
    }
    refs
}

#[async_trait]
impl UtxoSource for UtxoExplorer {
    async fn transaction(&self, chain: Chain, tx_id: &str) -> ChainResult<Option<UtxoTx>> {
        let path = Self::chain_path(chain)?;
        if !Self::valid_segment(tx_id) {
            return Ok(None);
        }

        let url = format!("{}/{}/txs/{}", self.base_url, path, tx_id);
        let response = http::get(&self.client, &url, &[], self.timeout_secs).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ChainError::Api(format!(
                "UTXO explorer returned status {}",
                response.status()
            )));
        }

        let tx: TxResponse = response
            .json()
            .await
            .map_err(|e| http::request_error(e, self.timeout_secs))?;
        Ok(Some(map_tx(tx)))
    }

    async fn address_activity(&self, chain: Chain, address: &str) -> ChainResult<Vec<AddressRef>> {
        let path = Self::chain_path(chain)?;
        if !Self::valid_segment(address) {
            return Ok(Vec::new());
        }

        let url = format!("{}/{}/addrs/{}", self.base_url, path, address);
        let response = http::get(&self.client, &url, &[], self.timeout_secs).await?;
        // A never-used address is not an error.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(ChainError::Api(format!(
                "UTXO explorer returned status {}",
                response.status()
            )));
        }

        let body: AddressResponse = response
            .json()
            .await
            .map_err(|e| http::request_error(e, self.timeout_secs))?;
        Ok(map_refs(body))
    }
}
