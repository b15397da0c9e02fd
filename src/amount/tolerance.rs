//! Amount tolerance matching.
//!
//! A received amount rarely equals the expected amount to the last digit:
//! UTXO senders deduct fees from the paid value, and source APIs round.
//! Each currency gets its own configured band because fee magnitudes differ
//! by orders of magnitude between chains. Too strict rejects legitimate
//! payments; too loose accepts underpayment.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::config::schema::CurrencyTable;
use crate::request::currency::CanonicalCurrency;

/// Allowed deviation around an expected amount.
///
/// `under` and `over` are independent so an operator can, for example,
/// tighten underpayment while accepting any overpayment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceBand {
    pub under: Decimal,
    pub over: Decimal,
}

impl ToleranceBand {
    /// Band extending the same absolute width in both directions.
    pub fn symmetric(width: Decimal) -> Self {
        let width = width.abs();
        Self { under: width, over: width }
    }

    /// Whether `received` falls inside the band around `expected`.
    pub fn accepts(&self, expected: Decimal, received: Decimal) -> bool {
        received >= expected - self.under && received <= expected + self.over
    }
}

/// Per-currency tolerance lookup over the configured rule table.
#[derive(Clone)]
pub struct ToleranceMatcher {
    rules: Arc<CurrencyTable>,
}

impl ToleranceMatcher {
    pub fn new(rules: Arc<CurrencyTable>) -> Self {
        Self { rules }
    }

    /// The band to apply for a currency.
    ///
    /// An explicit width overrides configuration with a symmetric band.
    /// Unknown currencies fall back to 0.1% of the expected amount each
    /// way, which absorbs rounding without leaving underpayment open.
    pub fn band_for(
        &self,
        currency: &CanonicalCurrency,
        expected: Decimal,
        explicit: Option<Decimal>,
    ) -> ToleranceBand {
        if let Some(width) = explicit {
            return ToleranceBand::symmetric(width);
        }
        if let Some(rule) = self.rules.rule(currency) {
            return ToleranceBand {
                under: rule.tolerance_under,
                over: rule.tolerance_over,
            };
        }
        ToleranceBand::symmetric(expected.abs() * Decimal::new(1, 3))
    }

    /// Whether `received` counts as matching `expected` for this currency.
    pub fn matches(
        &self,
        received: Decimal,
        expected: Decimal,
        explicit: Option<Decimal>,
        currency: &CanonicalCurrency,
    ) -> bool {
        self.band_for(currency, expected, explicit)
            .accepts(expected, received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CurrencyRule;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn matcher() -> ToleranceMatcher {
        let rules = vec![
            CurrencyRule {
                symbol: "BTC".to_string(),
                min_confirmations: 2,
                tolerance_under: dec("0.0001"),
                tolerance_over: dec("0.0001"),
                eth_contract: None,
                tron_contract: None,
            },
            CurrencyRule {
                symbol: "USDT".to_string(),
                min_confirmations: 20,
                tolerance_under: dec("0.05"),
                tolerance_over: dec("0.05"),
                eth_contract: None,
                tron_contract: None,
            },
        ];
        ToleranceMatcher::new(Arc::new(CurrencyTable::from_rules(&rules)))
    }

    #[test]
    fn test_band_is_symmetric_for_symmetric_config() {
        let matcher = matcher();
        let usdt = CanonicalCurrency::normalize("USDT");
        let expected = dec("50");

        for delta in ["0.01", "0.05"] {
            let delta = dec(delta);
            assert!(matcher.matches(expected - delta, expected, None, &usdt));
            assert!(matcher.matches(expected + delta, expected, None, &usdt));
        }
        // One step past the band fails in both directions.
        assert!(!matcher.matches(dec("49.94"), expected, None, &usdt));
        assert!(!matcher.matches(dec("50.06"), expected, None, &usdt));
    }

    #[test]
    fn test_band_boundary_is_inclusive() {
        let matcher = matcher();
        let btc = CanonicalCurrency::normalize("BTC");
        assert!(matcher.matches(dec("0.0499"), dec("0.05"), None, &btc));
        assert!(matcher.matches(dec("0.0501"), dec("0.05"), None, &btc));
        assert!(!matcher.matches(dec("0.04989"), dec("0.05"), None, &btc));
    }

    #[test]
    fn test_explicit_tolerance_overrides_config() {
        let matcher = matcher();
        let btc = CanonicalCurrency::normalize("BTC");
        // Configured band for BTC is 0.0001; the explicit band is wider.
        assert!(!matcher.matches(dec("0.98"), dec("1"), None, &btc));
        assert!(matcher.matches(dec("0.98"), dec("1"), Some(dec("0.05")), &btc));
    }

    #[test]
    fn test_unknown_currency_uses_relative_fallback() {
        let matcher = matcher();
        let doge = CanonicalCurrency::normalize("DOGE");
        // 0.1% of 1000 is 1.
        assert!(matcher.matches(dec("999"), dec("1000"), None, &doge));
        assert!(matcher.matches(dec("1001"), dec("1000"), None, &doge));
        assert!(!matcher.matches(dec("998.9"), dec("1000"), None, &doge));
    }

    #[test]
    fn test_asymmetric_band() {
        let band = ToleranceBand {
            under: dec("0.01"),
            over: dec("100"),
        };
        assert!(band.accepts(dec("10"), dec("9.99")));
        assert!(!band.accepts(dec("10"), dec("9.98")));
        assert!(band.accepts(dec("10"), dec("110")));
    }
}
