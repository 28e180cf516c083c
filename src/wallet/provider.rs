// src/wallet/provider.rs
//! Contract with the injected browser wallet (EIP-1193 style provider)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// EIP-1193 code for "user rejected the request"
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderErrorCode {
    ActionRejected,
    InsufficientFunds,
    Rpc(i64),
    Other,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ActionRejected, message)
    }

    pub fn insufficient_funds(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InsufficientFunds, message)
    }

    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Rpc(code), message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Other, message)
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(
            self.code,
            ProviderErrorCode::ActionRejected | ProviderErrorCode::Rpc(USER_REJECTED_CODE)
        )
    }

    pub fn is_insufficient_funds(&self) -> bool {
        self.code == ProviderErrorCode::InsufficientFunds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub to: String,
    /// Amount in wei
    pub value: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub hash: String,
    pub block_number: Option<u64>,
}

/// Events pushed by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    /// Hex chain id, e.g. `0x89`
    ChainChanged(String),
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether the injected object identifies itself as a wallet
    fn is_wallet_provider(&self) -> bool;

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    async fn get_network(&self) -> Result<Network, ProviderError>;

    /// Balance in wei
    async fn get_balance(&self, address: &str) -> Result<u128, ProviderError>;

    /// Sign and submit through the provider's signer, returning the hash
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<String, ProviderError>;

    /// Resolve once the transaction is confirmed; errors on revert
    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionReceipt, ProviderError>;

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}

/// Parse a hex chain id (`0x1`) as pushed by `chainChanged`
pub fn parse_chain_id(hex: &str) -> Option<u64> {
    let digits = hex
        .trim()
        .strip_prefix("0x")
        .or_else(|| hex.trim().strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}
