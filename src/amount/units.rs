//! Conversion from native integer ledger units to decimal amounts.
//!
//! Every chain reports value as an integer in its smallest unit (satoshi,
//! wei, token base units). Amount comparison happens in decimal, never in
//! floating point.

use rust_decimal::Decimal;

/// Satoshis per BTC/LTC: 10^8.
pub const SATOSHI_DECIMALS: u32 = 8;

/// Wei per ETH: 10^18.
pub const WEI_DECIMALS: u32 = 18;

/// Convert an integer base-unit value to a decimal amount.
///
/// Returns `None` when the value does not fit a `Decimal` (more than 96
/// mantissa bits, or a scale beyond 28 digits). Callers surface that as a
/// decode failure rather than truncating.
pub fn from_base_units(raw: u128, decimals: u32) -> Option<Decimal> {
    let mantissa = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, decimals).ok()
}

/// Parse an integer base-unit string (the form explorer APIs use) into a
/// decimal amount.
pub fn parse_base_units(raw: &str, decimals: u32) -> Option<Decimal> {
    let value: u128 = raw.trim().parse().ok()?;
    from_base_units(value, decimals)
}
