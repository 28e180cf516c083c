//! # Wallet Module
//!
//! Browser wallet connection, balance tracking and the single in-flight
//! payment transaction. The wallet itself sits behind [`WalletProvider`].

pub mod error;
pub mod models;
pub mod provider;
pub mod store;
pub mod units;

#[cfg(test)]
mod tests;

pub use error::WalletError;
pub use models::{
    network_name, short_address, PaymentConfig, PaymentTransaction, TransactionState,
    WalletSession, WalletSnapshot,
};
pub use provider::{
    Network, ProviderError, ProviderErrorCode, ProviderEvent, TransactionReceipt,
    TransactionRequest, WalletProvider,
};
pub use store::WalletStore;
pub use units::{format_ether, parse_ether};
