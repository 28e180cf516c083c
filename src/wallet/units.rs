// src/wallet/units.rs
//! Ether <-> wei conversion

pub const ETHER_DECIMALS: u32 = 18;
const WEI_PER_ETHER: u128 = 10u128.pow(ETHER_DECIMALS);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("invalid ether amount: {0:?}")]
    Invalid(String),

    #[error("too many decimal places in {0:?}")]
    TooPrecise(String),

    #[error("amount out of range: {0:?}")]
    Overflow(String),
}

/// Parse a decimal ether string (`"0.001"`) into wei
pub fn parse_ether(value: &str) -> Result<u128, UnitsError> {
    let trimmed = value.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(UnitsError::Invalid(value.to_string()));
    }
    if fraction.len() > ETHER_DECIMALS as usize {
        return Err(UnitsError::TooPrecise(value.to_string()));
    }

    let overflow = || UnitsError::Overflow(value.to_string());

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(WEI_PER_ETHER)
            .ok_or_else(overflow)?
    };

    let fraction_wei = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = ETHER_DECIMALS as usize);
        padded.parse::<u128>().map_err(|_| overflow())?
    };

    whole_wei.checked_add(fraction_wei).ok_or_else(overflow)
}

/// Format wei as ether with trailing zeros trimmed, keeping one decimal
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;

    let digits = format!("{:0width$}", fraction, width = ETHER_DECIMALS as usize);
    let digits = digits.trim_end_matches('0');

    if digits.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, digits)
    }
}
