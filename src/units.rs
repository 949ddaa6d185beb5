//! Ether <-> wei conversion and display helpers

use alloy_primitives::utils::{format_ether, parse_ether};
use alloy_primitives::{Address, U256};

use crate::error::WalletError;

/// Fractional digits of one ether
pub const ETHER_DECIMALS: usize = 18;

/// Parse a user-entered ether amount into wei.
///
/// Accepts non-negative decimals with at most 18 fractional digits.
pub fn parse_amount(input: &str) -> Result<U256, WalletError> {
    let amount = input.trim();

    if amount.starts_with('-') || amount.starts_with('+') {
        return Err(WalletError::Validation(format!(
            "invalid amount: {} (expected a non-negative decimal)",
            amount
        )));
    }

    if let Some((_, fraction)) = amount.split_once('.') {
        if fraction.len() > ETHER_DECIMALS {
            return Err(WalletError::Validation(format!(
                "invalid amount: {} (more than {} decimals)",
                amount, ETHER_DECIMALS
            )));
        }
    }

    parse_ether(amount).map_err(|e| WalletError::Validation(format!("invalid amount: {}", e)))
}

/// Format wei as ether with trailing zeros trimmed, e.g. `2.5`
pub fn format_balance(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => formatted,
    }
}

/// `0x1234...abcd`
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_fixed_point() {
        assert_eq!(
            parse_amount("1.5").unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(
            parse_amount(" 2 ").unwrap(),
            U256::from(2_000_000_000_000_000_000u128)
        );
        assert_eq!(parse_amount("0.000000000000000001").unwrap(), U256::from(1u64));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(matches!(parse_amount("-1"), Err(WalletError::Validation(_))));
        assert!(matches!(parse_amount("abc"), Err(WalletError::Validation(_))));
        assert!(matches!(
            parse_amount("0.0000000000000000001"),
            Err(WalletError::Validation(_))
        ));
    }

    #[test]
    fn test_format_balance_trims_zeros() {
        assert_eq!(format_balance(U256::from(2_500_000_000_000_000_000u128)), "2.5");
        assert_eq!(format_balance(U256::ZERO), "0.0");
        assert_eq!(format_balance(U256::from(3_000_000_000_000_000_000u128)), "3.0");
    }

    #[test]
    fn test_short_address() {
        let address = Address::repeat_byte(0xaa);
        let short = short_address(&address);
        assert!(short.starts_with("0x"));
        assert_eq!(short.len(), 13);
    }
}
