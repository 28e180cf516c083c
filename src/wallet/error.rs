// src/wallet/error.rs

use super::provider::ProviderError;

/// Wallet failures. Never returned past the store; their text ends up in
/// the transaction's error message.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("Wallet provider is not installed. Please install a browser wallet extension.")]
    ProviderUnavailable,

    #[error("No accounts found. Please connect your wallet.")]
    NoAccounts,

    #[error("{0}")]
    ConnectionFailed(String),

    #[error("Transaction was rejected by user")]
    UserRejected,

    #[error("Insufficient funds for transaction")]
    InsufficientFunds,

    #[error("{0}")]
    TransactionFailed(String),

    #[error("A payment is already in progress")]
    PaymentInProgress,

    #[error("Invalid payment configuration: {0}")]
    InvalidConfig(String),
}

impl WalletError {
    pub fn connection(err: ProviderError) -> Self {
        if err.message.trim().is_empty() {
            WalletError::ConnectionFailed("Failed to connect wallet".to_string())
        } else {
            WalletError::ConnectionFailed(err.message)
        }
    }

    /// Classify a failed send or confirmation
    pub fn payment(err: ProviderError) -> Self {
        if err.is_user_rejection() {
            WalletError::UserRejected
        } else if err.is_insufficient_funds() {
            WalletError::InsufficientFunds
        } else if err.message.trim().is_empty() {
            WalletError::TransactionFailed("Transaction failed".to_string())
        } else {
            WalletError::TransactionFailed(err.message)
        }
    }
}
