// src/wallet/models.rs

use serde::{Deserialize, Serialize};
use std::env;

use super::error::WalletError;
use super::units::parse_ether;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const EMPTY_BALANCE: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub state: TransactionState,
    pub hash: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    pub address: Option<String>,
    pub chain_id: Option<u64>,
    /// Formatted ether, `"0"` when unknown
    pub balance: String,
    pub connected: bool,
}

impl Default for WalletSession {
    fn default() -> Self {
        Self {
            address: None,
            chain_id: None,
            balance: EMPTY_BALANCE.to_string(),
            connected: false,
        }
    }
}

/// Everything a view needs to render wallet state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub installed: bool,
    pub session: WalletSession,
    pub transaction: PaymentTransaction,
    pub is_processing: bool,
}

impl WalletSnapshot {
    pub fn network_name(&self) -> String {
        network_name(self.session.chain_id)
    }

    pub fn short_address(&self) -> Option<String> {
        self.session.address.as_deref().map(short_address)
    }
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Decimal ether string
    pub amount_eth: String,
    pub receiver: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            amount_eth: "0.001".to_string(),
            receiver: ZERO_ADDRESS.to_string(),
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(amount) = env::var("PAYMENT_AMOUNT_ETH") {
            if !amount.trim().is_empty() {
                config.amount_eth = amount.trim().to_string();
            }
        }

        if let Ok(receiver) = env::var("PAYMENT_RECEIVER_ADDRESS") {
            if !receiver.trim().is_empty() {
                config.receiver = receiver.trim().to_string();
            }
        }

        config
    }

    pub fn amount_wei(&self) -> Result<u128, WalletError> {
        parse_ether(&self.amount_eth).map_err(|e| WalletError::InvalidConfig(e.to_string()))
    }
}

pub fn network_name(chain_id: Option<u64>) -> String {
    match chain_id {
        None => "Unknown".to_string(),
        Some(1) => "Ethereum Mainnet".to_string(),
        Some(5) => "Goerli Testnet".to_string(),
        Some(11155111) => "Sepolia Testnet".to_string(),
        Some(137) => "Polygon Mainnet".to_string(),
        Some(80001) => "Mumbai Testnet".to_string(),
        Some(id) => format!("Chain ID: {}", id),
    }
}

/// `0x1234...abcd`; addresses too short to abbreviate are returned as is
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
