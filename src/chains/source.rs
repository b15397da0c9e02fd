//! Chain data-source contracts.
//!
//! One trait per chain family, shaped by what the public explorer APIs can
//! actually answer. Production implementations live in `crate::explorer`;
//! tests substitute in-memory fakes. Value fields stay in the source's
//! native integer units; adapters own the conversion to decimals.

use async_trait::async_trait;

use crate::chains::types::ChainResult;
use crate::request::currency::Chain;

/// One output of a UTXO transaction.
#[derive(Debug, Clone)]
pub struct UtxoOutput {
    /// Addresses credited by this output (usually exactly one).
    pub addresses: Vec<String>,
    pub value_sats: u64,
}

/// A UTXO transaction with its outputs.
#[derive(Debug, Clone)]
pub struct UtxoTx {
    pub tx_id: String,
    pub outputs: Vec<UtxoOutput>,
    pub confirmations: u64,
}

/// One incoming credit in an address's history.
#[derive(Debug, Clone)]
pub struct AddressRef {
    pub tx_id: String,
    pub value_sats: u64,
    pub confirmations: u64,
    pub confirmed: bool,
}

/// Data source for UTXO chains (BTC, LTC).
#[async_trait]
pub trait UtxoSource: Send + Sync {
    /// Fetch a transaction by id. `Ok(None)` when the chain has no such
    /// transaction.
    async fn transaction(&self, chain: Chain, tx_id: &str) -> ChainResult<Option<UtxoTx>>;

    /// Outputs credited to an address, unconfirmed entries first.
    async fn address_activity(&self, chain: Chain, address: &str) -> ChainResult<Vec<AddressRef>>;
}

/// A native-value EVM transaction.
#[derive(Debug, Clone)]
pub struct EvmTransfer {
    pub tx_id: String,
    /// `None` for contract creation.
    pub to: Option<String>,
    /// Value in wei, as the decimal string the API returns.
    pub value_wei: String,
    pub confirmations: u64,
    /// Execution reverted.
    pub failed: bool,
}

/// One decoded ERC-20 transfer event.
#[derive(Debug, Clone)]
pub struct EvmTokenTransfer {
    pub tx_id: String,
    pub to: String,
    pub contract: String,
    pub symbol: String,
    /// Value in token base units, as a decimal string.
    pub value_raw: String,
    pub token_decimals: u32,
    pub confirmations: u64,
}

/// Data source for EVM chains.
///
/// Account-indexed explorer APIs answer by address, not by hash, so hash
/// lookups carry the destination address too.
#[async_trait]
pub trait EvmSource: Send + Sync {
    /// Native transaction by hash, looked up through the address's history.
    async fn transaction(&self, tx_id: &str, address: &str) -> ChainResult<Option<EvmTransfer>>;

    /// Token transfer events carried by one transaction, scoped to the address.
    async fn transfer_events(&self, tx_id: &str, address: &str)
        -> ChainResult<Vec<EvmTokenTransfer>>;

    /// Recent native transactions involving an address, most recent first.
    async fn address_transactions(&self, address: &str) -> ChainResult<Vec<EvmTransfer>>;

    /// Recent token transfers involving an address, most recent first.
    async fn token_transfers(&self, address: &str) -> ChainResult<Vec<EvmTokenTransfer>>;
}

/// One TRC-20 transfer inside a transaction.
#[derive(Debug, Clone)]
pub struct TronTransfer {
    pub to: String,
    pub contract: String,
    pub symbol: String,
    /// Value in token base units, as a decimal string.
    pub amount_raw: String,
    pub token_decimals: u32,
}

/// A Tron transaction with its decoded token transfers.
#[derive(Debug, Clone)]
pub struct TronTx {
    pub tx_id: String,
    /// Contract execution result.
    pub success: bool,
    pub confirmed: bool,
    /// Not every endpoint reports a count alongside the confirmed flag.
    pub confirmations: Option<u64>,
    pub transfers: Vec<TronTransfer>,
}

/// One entry of an address's TRC-20 transfer history.
#[derive(Debug, Clone)]
pub struct TronTokenTransfer {
    pub tx_id: String,
    pub to: String,
    pub contract: String,
    pub symbol: String,
    pub amount_raw: String,
    pub token_decimals: u32,
    pub confirmed: bool,
}

/// Data source for Tron.
#[async_trait]
pub trait TronSource: Send + Sync {
    /// Transaction detail by hash. `Ok(None)` when unknown to the chain.
    async fn transaction(&self, tx_id: &str) -> ChainResult<Option<TronTx>>;

    /// Recent TRC-20 transfers received by an address, most recent first.
    async fn token_transfers(&self, address: &str) -> ChainResult<Vec<TronTokenTransfer>>;
}
