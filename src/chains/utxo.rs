//! UTXO chain adapter (BTC and LTC).
//!
//! A UTXO transaction pays many outputs at once; the amount that matters is
//! the sum of the outputs credited to the queried address. Fees come out of
//! the inputs, so the credited value is exactly what the receiver keeps.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::amount::units;
use crate::chains::source::{UtxoSource, UtxoTx};
use crate::chains::types::{
    ChainError, ChainResult, DiscoveredTransaction, ScanQuery, TxQuery, TxStatus, VerifiedTransfer,
};
use crate::chains::ChainAdapter;

/// Adapter over a BlockCypher-style UTXO data source.
pub struct UtxoAdapter {
    source: Arc<dyn UtxoSource>,
}

impl UtxoAdapter {
    pub fn new(source: Arc<dyn UtxoSource>) -> Self {
        Self { source }
    }

    /// Total value the transaction credits to `address`.
    fn credited_amount(tx: &UtxoTx, address: &str) -> ChainResult<Decimal> {
        let sats: u64 = tx
            .outputs
            .iter()
            .filter(|output| output.addresses.iter().any(|a| a == address))
            .try_fold(0u64, |total, output| {
                total
                    .checked_add(output.value_sats)
                    .ok_or_else(|| ChainError::Decode("summed output values overflow".to_string()))
            })?;
        if sats == 0 {
            return Err(ChainError::WrongRecipient);
        }
        units::from_base_units(u128::from(sats), units::SATOSHI_DECIMALS)
            .ok_or_else(|| ChainError::Decode(format!("output value {} sats", sats)))
    }
}

#[async_trait]
impl ChainAdapter for UtxoAdapter {
    async fn check_tx(&self, query: &TxQuery<'_>) -> ChainResult<VerifiedTransfer> {
        let address = query.address.ok_or(ChainError::RecipientRequired)?;
        let tx = self
            .source
            .transaction(query.chain, query.tx_id)
            .await?
            .ok_or_else(|| ChainError::NotFound(query.tx_id.to_string()))?;

        let amount = Self::credited_amount(&tx, address)?;

        Ok(VerifiedTransfer {
            tx_id: tx.tx_id,
            amount: Some(amount),
            confirmations: Some(tx.confirmations),
            status: None,
        })
    }

    async fn discover(&self, query: &ScanQuery<'_>) -> ChainResult<Option<DiscoveredTransaction>> {
        let refs = self.source.address_activity(query.chain, query.address).await?;

        for entry in refs {
            let Some(amount) =
                units::from_base_units(u128::from(entry.value_sats), units::SATOSHI_DECIMALS)
            else {
                continue;
            };
            if query.band.accepts(query.expected, amount) {
                let status = if entry.confirmed {
                    TxStatus::Confirmed
                } else {
                    TxStatus::Pending
                };
                return Ok(Some(DiscoveredTransaction {
                    tx_id: entry.tx_id,
                    amount,
                    confirmations: Some(entry.confirmations),
                    status,
                }));
            }
        }

        Ok(None)
    }
}
