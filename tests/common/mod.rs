//! Shared mock chain sources for integration testing.
//!
//! Each mock serves pre-seeded data, counts its calls, and can inject a
//! transport failure. Tests keep an `Arc` to the mock so counters stay
//! readable after the verifier takes its copy.

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use txverify::chains::source::{
    AddressRef, EvmSource, EvmTokenTransfer, EvmTransfer, TronSource, TronTokenTransfer, TronTx,
    UtxoSource, UtxoTx,
};
use txverify::chains::types::{ChainError, ChainResult};
use txverify::config::CurrencyRule;
use txverify::request::currency::Chain;

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Currency rule with a symmetric tolerance band and no token contracts.
pub fn rule(symbol: &str, min_confirmations: u64, tolerance: &str) -> CurrencyRule {
    CurrencyRule {
        symbol: symbol.to_string(),
        min_confirmations,
        tolerance_under: dec(tolerance),
        tolerance_over: dec(tolerance),
        eth_contract: None,
        tron_contract: None,
    }
}

/// Explorer clients prefix hashes with `0x`; extracted ids may lack it.
fn hash_matches(entry: &str, wanted: &str) -> bool {
    entry
        .trim_start_matches("0x")
        .eq_ignore_ascii_case(wanted.trim_start_matches("0x"))
}

fn injected_failure() -> ChainError {
    ChainError::Http("injected explorer failure".to_string())
}

#[derive(Default)]
pub struct MockUtxoSource {
    pub tx: Option<UtxoTx>,
    pub refs: Vec<AddressRef>,
    pub fail: bool,
    pub tx_calls: AtomicU32,
    pub scan_calls: AtomicU32,
}

#[async_trait]
impl UtxoSource for MockUtxoSource {
    async fn transaction(&self, _chain: Chain, tx_id: &str) -> ChainResult<Option<UtxoTx>> {
        self.tx_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self.tx.clone().filter(|tx| hash_matches(&tx.tx_id, tx_id)))
    }

    async fn address_activity(
        &self,
        _chain: Chain,
        _address: &str,
    ) -> ChainResult<Vec<AddressRef>> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self.refs.clone())
    }
}

#[derive(Default)]
pub struct MockEvmSource {
    pub native: Vec<EvmTransfer>,
    pub tokens: Vec<EvmTokenTransfer>,
    pub fail: bool,
    pub tx_calls: AtomicU32,
    pub scan_calls: AtomicU32,
}

#[async_trait]
impl EvmSource for MockEvmSource {
    async fn transaction(&self, tx_id: &str, _address: &str) -> ChainResult<Option<EvmTransfer>> {
        self.tx_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self
            .native
            .iter()
            .find(|tx| hash_matches(&tx.tx_id, tx_id))
            .cloned())
    }

    async fn transfer_events(
        &self,
        tx_id: &str,
        _address: &str,
    ) -> ChainResult<Vec<EvmTokenTransfer>> {
        self.tx_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self
            .tokens
            .iter()
            .filter(|event| hash_matches(&event.tx_id, tx_id))
            .cloned()
            .collect())
    }

    async fn address_transactions(&self, _address: &str) -> ChainResult<Vec<EvmTransfer>> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self.native.clone())
    }

    async fn token_transfers(&self, _address: &str) -> ChainResult<Vec<EvmTokenTransfer>> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self.tokens.clone())
    }
}

#[derive(Default)]
pub struct MockTronSource {
    pub tx: Option<TronTx>,
    pub transfers: Vec<TronTokenTransfer>,
    pub fail: bool,
    pub tx_calls: AtomicU32,
    pub scan_calls: AtomicU32,
}

#[async_trait]
impl TronSource for MockTronSource {
    async fn transaction(&self, tx_id: &str) -> ChainResult<Option<TronTx>> {
        self.tx_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self.tx.clone().filter(|tx| hash_matches(&tx.tx_id, tx_id)))
    }

    async fn token_transfers(&self, _address: &str) -> ChainResult<Vec<TronTokenTransfer>> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self.transfers.clone())
    }
}
