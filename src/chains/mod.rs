//! Chain verification adapters.
//!
//! # Data Flow
//! ```text
//! Chain enum
//!     → ChainAdapters::adapter_for (one registry lookup per request)
//!     → UtxoAdapter | EvmAdapter | TronAdapter
//!     → chain data source (explorer client or test fake)
//!     → VerifiedTransfer / DiscoveredTransaction
//! ```
//!
//! # Design Decisions
//! - Closed adapter set behind one trait; chain selection happens exactly
//!   once, never as string comparisons inside the orchestrator
//! - Adapters return typed errors; the orchestrator decides what callers see
//! - Sources are trait objects so tests run without any network

use std::sync::Arc;

use async_trait::async_trait;

pub mod evm;
pub mod source;
pub mod tron;
pub mod types;
pub mod utxo;

pub use types::{
    ChainError, ChainResult, DiscoveredTransaction, ScanQuery, TxQuery, TxStatus, VerifiedTransfer,
};

use crate::config::schema::CurrencyTable;
use crate::request::currency::Chain;
use evm::EvmAdapter;
use source::{EvmSource, TronSource, UtxoSource};
use tron::TronAdapter;
use utxo::UtxoAdapter;

/// One chain family's verification capability.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Confirm a known transaction pays the queried address and report its
    /// amount and depth.
    async fn check_tx(&self, query: &TxQuery<'_>) -> ChainResult<VerifiedTransfer>;

    /// Scan address activity for the first transfer matching the expected
    /// amount.
    async fn discover(&self, query: &ScanQuery<'_>) -> ChainResult<Option<DiscoveredTransaction>>;
}

/// Registry holding one adapter per chain family.
pub struct ChainAdapters {
    utxo: Box<dyn ChainAdapter>,
    evm: Box<dyn ChainAdapter>,
    tron: Box<dyn ChainAdapter>,
}

impl ChainAdapters {
    pub fn new(
        utxo: Arc<dyn UtxoSource>,
        evm: Arc<dyn EvmSource>,
        tron: Arc<dyn TronSource>,
        rules: Arc<CurrencyTable>,
    ) -> Self {
        Self::from_adapters(
            Box::new(UtxoAdapter::new(utxo)),
            Box::new(EvmAdapter::new(evm, rules.clone())),
            Box::new(TronAdapter::new(tron, rules)),
        )
    }

    /// Assemble a registry from prebuilt adapters, one per chain family.
    pub fn from_adapters(
        utxo: Box<dyn ChainAdapter>,
        evm: Box<dyn ChainAdapter>,
        tron: Box<dyn ChainAdapter>,
    ) -> Self {
        Self { utxo, evm, tron }
    }

    /// Select the adapter responsible for a chain.
    pub fn adapter_for(&self, chain: Chain) -> &dyn ChainAdapter {
        match chain {
            Chain::Btc | Chain::Ltc => self.utxo.as_ref(),
            Chain::Eth => self.evm.as_ref(),
            Chain::Tron => self.tron.as_ref(),
        }
    }
}
