// src/wallet/store.rs
//! Process-wide wallet state and the payment state machine

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};

use super::error::WalletError;
use super::models::{
    short_address, PaymentConfig, PaymentTransaction, TransactionState, WalletSession,
    WalletSnapshot,
};
use super::provider::{parse_chain_id, ProviderEvent, TransactionRequest, WalletProvider};
use super::units::format_ether;

/// Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct WalletStore {
    inner: Arc<WalletInner>,
}

struct WalletInner {
    provider: Option<Arc<dyn WalletProvider>>,
    config: PaymentConfig,
    state: RwLock<WalletSnapshot>,
    updates: watch::Sender<WalletSnapshot>,
    listening: AtomicBool,
    /// Bumped whenever the active account changes
    account_epoch: AtomicU64,
    balance_seq: AtomicU64,
    payment_seq: AtomicU64,
}

impl WalletStore {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, config: PaymentConfig) -> Self {
        let installed = provider
            .as_ref()
            .map(|p| p.is_wallet_provider())
            .unwrap_or(false);
        let snapshot = WalletSnapshot {
            installed,
            ..Default::default()
        };
        let (updates, _) = watch::channel(snapshot.clone());

        Self {
            inner: Arc::new(WalletInner {
                provider,
                config,
                state: RwLock::new(snapshot),
                updates,
                listening: AtomicBool::new(false),
                account_epoch: AtomicU64::new(0),
                balance_seq: AtomicU64::new(0),
                payment_seq: AtomicU64::new(0),
            }),
        }
    }

    pub async fn snapshot(&self) -> WalletSnapshot {
        self.inner.state.read().await.clone()
    }

    /// Receives a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<WalletSnapshot> {
        self.inner.updates.subscribe()
    }

    pub fn payment_amount(&self) -> &str {
        &self.inner.config.amount_eth
    }

    /// Detect the provider and record the result in state
    pub async fn check_provider_installed(&self) -> bool {
        let installed = self.provider().is_some();
        self.mutate(|s| s.installed = installed).await;
        installed
    }

    pub async fn connect(&self) -> bool {
        self.connect_recorded().await.is_ok()
    }

    /// Best-effort balance refresh for the current address
    pub async fn update_balance(&self) {
        let (address, epoch) = {
            let state = self.inner.state.read().await;
            match state.session.address.clone() {
                Some(address) => (address, self.inner.account_epoch.load(Ordering::SeqCst)),
                None => return,
            }
        };

        let provider = match self.provider() {
            Some(provider) => provider,
            None => return,
        };

        let token = self.inner.balance_seq.fetch_add(1, Ordering::SeqCst) + 1;

        match provider.get_balance(&address).await {
            Ok(wei) => {
                let balance = format_ether(wei);
                let applied = self
                    .mutate(|s| {
                        let current = self.inner.balance_seq.load(Ordering::SeqCst) == token
                            && self.inner.account_epoch.load(Ordering::SeqCst) == epoch;
                        if current {
                            s.session.balance = balance;
                        }
                        current
                    })
                    .await;

                if !applied {
                    debug!(address = %short_address(&address), token, "Discarding stale balance refresh");
                }
            }
            Err(e) => {
                warn!(address = %short_address(&address), error = %e, "Failed to fetch wallet balance");
            }
        }
    }

    /// Reset the session; the provider subscription stays registered
    pub async fn disconnect(&self) {
        self.mutate(|s| {
            self.inner.account_epoch.fetch_add(1, Ordering::SeqCst);
            s.session = WalletSession::default();
        })
        .await;
        info!("Wallet disconnected");
    }

    /// Send the configured payment to `receiver`, or to the configured
    /// default. Only one payment may be pending at a time.
    pub async fn pay(&self, receiver: Option<&str>) -> bool {
        let token = self
            .mutate(|s| {
                if s.transaction.state == TransactionState::Pending {
                    return None;
                }
                s.is_processing = true;
                s.transaction = PaymentTransaction {
                    state: TransactionState::Pending,
                    hash: None,
                    error_message: None,
                };
                Some(self.inner.payment_seq.fetch_add(1, Ordering::SeqCst) + 1)
            })
            .await;

        let token = match token {
            Some(token) => token,
            None => {
                warn!(error = %WalletError::PaymentInProgress, "Payment request rejected");
                return false;
            }
        };

        match self.submit_payment(receiver, token).await {
            Ok(hash) => {
                let applied = self
                    .finish_payment(token, |tx| tx.state = TransactionState::Success)
                    .await;
                if applied {
                    info!(hash = %hash, "Payment confirmed");
                } else {
                    debug!(hash = %hash, token, "Payment confirmed after reset, result discarded");
                }
                self.update_balance().await;
                true
            }
            Err(err) => {
                error!(error = %err, "Payment failed");
                let message = err.to_string();
                self.finish_payment(token, |tx| {
                    tx.state = TransactionState::Error;
                    tx.error_message = Some(message);
                })
                .await;
                false
            }
        }
    }

    /// Back to `Idle`. A payment still pending will not report into state.
    pub async fn reset_transaction_state(&self) {
        self.mutate(|s| {
            self.inner.payment_seq.fetch_add(1, Ordering::SeqCst);
            s.transaction = PaymentTransaction::default();
            s.is_processing = false;
        })
        .await;
    }

    pub async fn handle_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
                None => self.disconnect().await,
                Some(address) => {
                    debug!(address = %short_address(&address), "Wallet account changed");
                    self.mutate(|s| {
                        self.inner.account_epoch.fetch_add(1, Ordering::SeqCst);
                        s.session.address = Some(address);
                    })
                    .await;
                    self.update_balance().await;
                }
            },
            ProviderEvent::ChainChanged(hex) => {
                match parse_chain_id(&hex) {
                    Some(chain_id) => {
                        debug!(chain_id, "Wallet chain changed");
                        self.mutate(|s| s.session.chain_id = Some(chain_id)).await;
                    }
                    None => warn!(chain_id = %hex, "Ignoring unparseable chain id"),
                }
                self.update_balance().await;
            }
        }
    }

    /// Forward provider events into this store. Registers at most once.
    pub fn setup_event_listeners(&self) {
        if self.inner.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let provider = match self.provider() {
            Some(provider) => provider,
            None => {
                self.inner.listening.store(false, Ordering::SeqCst);
                return;
            }
        };

        let mut events = provider.subscribe();
        let weak = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let inner = match weak.upgrade() {
                            Some(inner) => inner,
                            None => break,
                        };
                        WalletStore { inner }.handle_event(event).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Wallet event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Wallet event listener stopped");
        });
    }

    fn provider(&self) -> Option<Arc<dyn WalletProvider>> {
        self.inner
            .provider
            .clone()
            .filter(|provider| provider.is_wallet_provider())
    }

    async fn mutate<R>(&self, f: impl FnOnce(&mut WalletSnapshot) -> R) -> R {
        let mut state = self.inner.state.write().await;
        let out = f(&mut state);
        self.inner.updates.send_replace(state.clone());
        out
    }

    /// Connect, recording any failure in the error message
    async fn connect_recorded(&self) -> Result<(), WalletError> {
        self.mutate(|s| s.transaction.error_message = None).await;

        match self.try_connect().await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(error = %err, "Wallet connection failed");
                let message = err.to_string();
                let failed = matches!(err, WalletError::ConnectionFailed(_));
                self.mutate(|s| {
                    s.transaction.error_message = Some(message);
                    if failed {
                        s.session.connected = false;
                    }
                })
                .await;
                Err(err)
            }
        }
    }

    async fn try_connect(&self) -> Result<(), WalletError> {
        let provider = match self.provider() {
            Some(provider) => provider,
            None => {
                self.mutate(|s| s.installed = false).await;
                return Err(WalletError::ProviderUnavailable);
            }
        };
        self.mutate(|s| s.installed = true).await;

        let accounts = provider
            .request_accounts()
            .await
            .map_err(WalletError::connection)?;
        let address = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;

        self.mutate(|s| {
            self.inner.account_epoch.fetch_add(1, Ordering::SeqCst);
            s.session.address = Some(address.clone());
            s.session.connected = true;
        })
        .await;

        let network = provider
            .get_network()
            .await
            .map_err(WalletError::connection)?;
        self.mutate(|s| s.session.chain_id = Some(network.chain_id))
            .await;

        self.update_balance().await;
        self.setup_event_listeners();

        info!(address = %short_address(&address), chain_id = network.chain_id, "Wallet connected");
        Ok(())
    }

    async fn submit_payment(&self, receiver: Option<&str>, token: u64) -> Result<String, WalletError> {
        let connected = self.inner.state.read().await.session.connected;
        if !connected {
            self.connect_recorded().await?;
        }

        let provider = self.provider().ok_or(WalletError::ProviderUnavailable)?;
        let value = self.inner.config.amount_wei()?;
        let to = receiver
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.inner.config.receiver)
            .to_string();

        info!(to = %short_address(&to), amount = %self.inner.config.amount_eth, "Submitting payment");

        let hash = provider
            .send_transaction(TransactionRequest { to, value })
            .await
            .map_err(WalletError::payment)?;

        self.mutate(|s| {
            if self.inner.payment_seq.load(Ordering::SeqCst) == token {
                s.transaction.hash = Some(hash.clone());
            }
        })
        .await;

        provider
            .wait_for_transaction(&hash)
            .await
            .map_err(WalletError::payment)?;

        Ok(hash)
    }

    /// Apply the outcome only if this payment is still the current one
    async fn finish_payment(&self, token: u64, f: impl FnOnce(&mut PaymentTransaction)) -> bool {
        self.mutate(|s| {
            if self.inner.payment_seq.load(Ordering::SeqCst) != token {
                return false;
            }
            f(&mut s.transaction);
            s.is_processing = false;
            true
        })
        .await
    }
}
