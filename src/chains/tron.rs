//! Tron chain adapter (TRC-20 tokens).
//!
//! Tron is account-based: a transaction carries a list of decoded token
//! transfers, and address history comes from the token-transfer index.
//! Base58check addresses are case-sensitive, so recipient comparison is
//! exact, unlike the EVM adapter.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::amount::units;
use crate::chains::source::{TronSource, TronTransfer};
use crate::chains::types::{
    ChainError, ChainResult, DiscoveredTransaction, ScanQuery, TxQuery, TxStatus, VerifiedTransfer,
};
use crate::chains::ChainAdapter;
use crate::config::schema::CurrencyTable;
use crate::request::currency::CanonicalCurrency;

/// Adapter over a Tronscan-style API.
pub struct TronAdapter {
    source: Arc<dyn TronSource>,
    rules: Arc<CurrencyTable>,
}

impl TronAdapter {
    pub fn new(source: Arc<dyn TronSource>, rules: Arc<CurrencyTable>) -> Self {
        Self { source, rules }
    }

    fn transfer_matches(
        &self,
        to: &str,
        contract: &str,
        symbol: &str,
        address: &str,
        currency: &CanonicalCurrency,
    ) -> bool {
        if to != address {
            return false;
        }
        match self.rules.tron_contract(currency) {
            Some(configured) => contract == configured,
            None => CanonicalCurrency::normalize(symbol).as_str() == currency.as_str(),
        }
    }

    fn decode_amount(raw: &str, decimals: u32) -> Option<Decimal> {
        units::parse_base_units(raw, decimals)
    }

    /// Matching transfers with decoded amounts, preserving source order.
    fn decode_matching(
        &self,
        transfers: &[TronTransfer],
        address: &str,
        currency: &CanonicalCurrency,
    ) -> (bool, Vec<Decimal>) {
        let mut matched = false;
        let mut decoded = Vec::new();
        for transfer in transfers {
            if !self.transfer_matches(
                &transfer.to,
                &transfer.contract,
                &transfer.symbol,
                address,
                currency,
            ) {
                continue;
            }
            matched = true;
            if let Some(amount) = Self::decode_amount(&transfer.amount_raw, transfer.token_decimals)
            {
                decoded.push(amount);
            }
        }
        (matched, decoded)
    }
}

#[async_trait]
impl ChainAdapter for TronAdapter {
    async fn check_tx(&self, query: &TxQuery<'_>) -> ChainResult<VerifiedTransfer> {
        let address = query.address.ok_or(ChainError::RecipientRequired)?;
        let tx = self
            .source
            .transaction(query.tx_id)
            .await?
            .ok_or_else(|| ChainError::NotFound(query.tx_id.to_string()))?;

        if !tx.success {
            return Err(ChainError::Reverted);
        }

        let (matched, decoded) = self.decode_matching(&tx.transfers, address, query.currency);
        let selected = decoded
            .iter()
            .position(|amount| query.band.accepts(query.expected, *amount))
            .unwrap_or(0);
        let amount = match decoded.into_iter().nth(selected) {
            Some(amount) => amount,
            None if matched => return Err(ChainError::Decode("token transfer value".to_string())),
            None => return Err(ChainError::WrongRecipient),
        };

        let status = if tx.confirmed {
            TxStatus::Confirmed
        } else {
            TxStatus::Pending
        };

        Ok(VerifiedTransfer {
            tx_id: tx.tx_id,
            amount: Some(amount),
            confirmations: tx.confirmations,
            status: Some(status),
        })
    }

    async fn discover(&self, query: &ScanQuery<'_>) -> ChainResult<Option<DiscoveredTransaction>> {
        let transfers = self.source.token_transfers(query.address).await?;

        for transfer in transfers {
            if !self.transfer_matches(
                &transfer.to,
                &transfer.contract,
                &transfer.symbol,
                query.address,
                query.currency,
            ) {
                continue;
            }
            let Some(amount) = Self::decode_amount(&transfer.amount_raw, transfer.token_decimals)
            else {
                continue;
            };
            if query.band.accepts(query.expected, amount) {
                let status = if transfer.confirmed {
                    TxStatus::Confirmed
                } else {
                    TxStatus::Pending
                };
                return Ok(Some(DiscoveredTransaction {
                    tx_id: transfer.tx_id,
                    amount,
                    // The transfer index reports a confirmed flag, not a depth;
                    // re-verification fills the count in when the chain has one.
                    confirmations: None,
                    status,
                }));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::tolerance::ToleranceBand;
    use crate::chains::source::{TronTokenTransfer, TronTx};
    use crate::config::schema::default_currency_rules;
    use crate::request::currency::Chain;
    use std::str::FromStr;

    const TX_ID: &str = "7c2d4206c03a883dd9066d620335dc1be272a8dc733cfa3f6d10308faa37facc";
    const DEST: &str = "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL";
    const USDT_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

    struct StaticSource {
        tx: Option<TronTx>,
        transfers: Vec<TronTokenTransfer>,
    }

    #[async_trait]
    impl TronSource for StaticSource {
        async fn transaction(&self, tx_id: &str) -> ChainResult<Option<TronTx>> {
            Ok(self.tx.clone().filter(|tx| tx.tx_id == tx_id))
        }

        async fn token_transfers(&self, _address: &str) -> ChainResult<Vec<TronTokenTransfer>> {
            Ok(self.transfers.clone())
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn adapter(source: StaticSource) -> TronAdapter {
        let rules = Arc::new(CurrencyTable::from_rules(&default_currency_rules()));
        TronAdapter::new(Arc::new(source), rules)
    }

    fn usdt_tx(amount_raw: &str, to: &str) -> TronTx {
        TronTx {
            tx_id: TX_ID.to_string(),
            success: true,
            confirmed: true,
            confirmations: Some(45),
            transfers: vec![TronTransfer {
                to: to.to_string(),
                contract: USDT_CONTRACT.to_string(),
                symbol: "USDT".to_string(),
                amount_raw: amount_raw.to_string(),
                token_decimals: 6,
            }],
        }
    }

    fn query<'a>(currency: &'a CanonicalCurrency, expected: Decimal) -> TxQuery<'a> {
        TxQuery {
            chain: Chain::Tron,
            tx_id: TX_ID,
            address: Some(DEST),
            expected,
            currency,
            band: ToleranceBand::symmetric(dec("0.05")),
        }
    }

    #[tokio::test]
    async fn test_check_tx_verifies_trc20_transfer() {
        let adapter = adapter(StaticSource { tx: Some(usdt_tx("49980000", DEST)), transfers: vec![] });
        let usdt = CanonicalCurrency::normalize("USDT-TRC20");

        let transfer = adapter.check_tx(&query(&usdt, dec("50"))).await.unwrap();
        assert_eq!(transfer.amount, Some(dec("49.98")));
        assert_eq!(transfer.confirmations, Some(45));
        assert_eq!(transfer.status, Some(TxStatus::Confirmed));
    }

    #[tokio::test]
    async fn test_check_tx_recipient_is_case_sensitive() {
        let wrong_case = DEST.to_ascii_lowercase();
        let adapter = adapter(StaticSource { tx: Some(usdt_tx("49980000", &wrong_case)), transfers: vec![] });
        let usdt = CanonicalCurrency::normalize("USDT");

        assert!(matches!(
            adapter.check_tx(&query(&usdt, dec("50"))).await,
            Err(ChainError::WrongRecipient)
        ));
    }

    #[tokio::test]
    async fn test_check_tx_rejects_failed_execution() {
        let mut tx = usdt_tx("49980000", DEST);
        tx.success = false;
        let adapter = adapter(StaticSource { tx: Some(tx), transfers: vec![] });
        let usdt = CanonicalCurrency::normalize("USDT");

        assert!(matches!(
            adapter.check_tx(&query(&usdt, dec("50"))).await,
            Err(ChainError::Reverted)
        ));
    }

    #[tokio::test]
    async fn test_check_tx_ignores_other_contracts() {
        let mut tx = usdt_tx("49980000", DEST);
        tx.transfers[0].contract = "TXYZabcdefghijklmnopqrstuvwxyz1234".to_string();
        let adapter = adapter(StaticSource { tx: Some(tx), transfers: vec![] });
        let usdt = CanonicalCurrency::normalize("USDT");

        assert!(matches!(
            adapter.check_tx(&query(&usdt, dec("50"))).await,
            Err(ChainError::WrongRecipient)
        ));
    }

    #[tokio::test]
    async fn test_discover_finds_in_band_transfer() {
        let transfers = vec![
            TronTokenTransfer {
                tx_id: "other".to_string(),
                to: DEST.to_string(),
                contract: USDT_CONTRACT.to_string(),
                symbol: "USDT".to_string(),
                amount_raw: "120000000".to_string(),
                token_decimals: 6,
                confirmed: true,
            },
            TronTokenTransfer {
                tx_id: TX_ID.to_string(),
                to: DEST.to_string(),
                contract: USDT_CONTRACT.to_string(),
                symbol: "USDT".to_string(),
                amount_raw: "49980000".to_string(),
                token_decimals: 6,
                confirmed: false,
            },
        ];
        let adapter = adapter(StaticSource { tx: None, transfers });
        let usdt = CanonicalCurrency::normalize("USDT");
        let scan = ScanQuery {
            chain: Chain::Tron,
            address: DEST,
            expected: dec("50"),
            currency: &usdt,
            band: ToleranceBand::symmetric(dec("0.05")),
        };

        let found = adapter.discover(&scan).await.unwrap().unwrap();
        assert_eq!(found.tx_id, TX_ID);
        assert_eq!(found.amount, dec("49.98"));
        assert_eq!(found.status, TxStatus::Pending);
        assert_eq!(found.confirmations, None);
    }
}
