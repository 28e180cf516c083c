//! Tests for the wallet store
//!
//! These tests verify:
//! - Payment lifecycle from disconnected through confirmation
//! - Error classification for rejected and failed payments
//! - Event handling and one-time subscription
//! - Stale balance refreshes and reset payments are discarded

#[cfg(test)]
mod tests {
    use super::super::models::ZERO_ADDRESS;
    use super::super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::{broadcast, watch};

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";
    const TX_HASH: &str = "0xfeedbeef";
    const ONE_ETH: u128 = 1_000_000_000_000_000_000;

    struct MockProvider {
        installed: bool,
        accounts: Mutex<Result<Vec<String>, ProviderError>>,
        chain_id: u64,
        balances: Mutex<HashMap<String, u128>>,
        balance_delays: Mutex<HashMap<String, Duration>>,
        send_error: Mutex<Option<ProviderError>>,
        wait_error: Mutex<Option<ProviderError>>,
        wait_delay: Mutex<Option<Duration>>,
        sent: Mutex<Vec<TransactionRequest>>,
        balance_calls: AtomicUsize,
        subscribe_calls: AtomicUsize,
        events: broadcast::Sender<ProviderEvent>,
        observer: Mutex<Option<watch::Receiver<WalletSnapshot>>>,
        seen_on_send: Mutex<Option<WalletSnapshot>>,
        seen_on_wait: Mutex<Option<WalletSnapshot>>,
    }

    impl MockProvider {
        fn new() -> Self {
            let (events, _) = broadcast::channel(16);
            let mut balances = HashMap::new();
            balances.insert(ALICE.to_string(), ONE_ETH);
            balances.insert(BOB.to_string(), ONE_ETH / 2);

            Self {
                installed: true,
                accounts: Mutex::new(Ok(vec![ALICE.to_string(), BOB.to_string()])),
                chain_id: 11155111,
                balances: Mutex::new(balances),
                balance_delays: Mutex::new(HashMap::new()),
                send_error: Mutex::new(None),
                wait_error: Mutex::new(None),
                wait_delay: Mutex::new(None),
                sent: Mutex::new(Vec::new()),
                balance_calls: AtomicUsize::new(0),
                subscribe_calls: AtomicUsize::new(0),
                events,
                observer: Mutex::new(None),
                seen_on_send: Mutex::new(None),
                seen_on_wait: Mutex::new(None),
            }
        }

        fn not_a_wallet() -> Self {
            Self {
                installed: false,
                ..Self::new()
            }
        }

        fn observe(&self, store: &WalletStore) {
            *self.observer.lock().unwrap() = Some(store.subscribe());
        }

        fn current(&self) -> Option<WalletSnapshot> {
            self.observer
                .lock()
                .unwrap()
                .as_ref()
                .map(|rx| rx.borrow().clone())
        }

        fn emit(&self, event: ProviderEvent) {
            self.events.send(event).unwrap();
        }
    }

    #[async_trait]
    impl WalletProvider for MockProvider {
        fn is_wallet_provider(&self) -> bool {
            self.installed
        }

        async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
            self.accounts.lock().unwrap().clone()
        }

        async fn get_network(&self) -> Result<Network, ProviderError> {
            Ok(Network {
                chain_id: self.chain_id,
            })
        }

        async fn get_balance(&self, address: &str) -> Result<u128, ProviderError> {
            self.balance_calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.balance_delays.lock().unwrap().get(address).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.balances
                .lock()
                .unwrap()
                .get(address)
                .copied()
                .ok_or_else(|| ProviderError::rpc(-32000, "unknown account"))
        }

        async fn send_transaction(&self, tx: TransactionRequest) -> Result<String, ProviderError> {
            *self.seen_on_send.lock().unwrap() = self.current();
            if let Some(err) = self.send_error.lock().unwrap().clone() {
                return Err(err);
            }
            self.sent.lock().unwrap().push(tx);
            Ok(TX_HASH.to_string())
        }

        async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionReceipt, ProviderError> {
            let delay = *self.wait_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            *self.seen_on_wait.lock().unwrap() = self.current();
            if let Some(err) = self.wait_error.lock().unwrap().clone() {
                return Err(err);
            }

            let value = self.sent.lock().unwrap().last().map(|tx| tx.value).unwrap_or(0);
            if let Some(balance) = self.balances.lock().unwrap().get_mut(ALICE) {
                *balance -= value;
            }

            Ok(TransactionReceipt {
                hash: hash.to_string(),
                block_number: Some(1),
            })
        }

        fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
            self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
            self.events.subscribe()
        }
    }

    fn store_with(provider: Arc<MockProvider>) -> WalletStore {
        let store = WalletStore::new(
            Some(provider.clone() as Arc<dyn WalletProvider>),
            PaymentConfig::default(),
        );
        provider.observe(&store);
        store
    }

    async fn wait_until(store: &WalletStore, check: impl Fn(&WalletSnapshot) -> bool) {
        let mut rx = store.subscribe();
        let result = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if check(&rx.borrow_and_update()) {
                    return;
                }
                if rx.changed().await.is_err() {
                    return;
                }
            }
        })
        .await;
        assert!(result.is_ok(), "wallet state never reached the expected value");
    }

    #[tokio::test]
    async fn test_pay_when_disconnected_connects_and_succeeds() {
        let provider = Arc::new(MockProvider::new());
        let store = store_with(provider.clone());

        assert!(store.pay(None).await);

        let during_send = provider.seen_on_send.lock().unwrap().clone().unwrap();
        assert_eq!(during_send.transaction.state, TransactionState::Pending);
        assert!(during_send.is_processing);
        assert!(during_send.session.connected);
        assert!(during_send.transaction.hash.is_none());
        assert!(during_send.transaction.error_message.is_none());

        let during_wait = provider.seen_on_wait.lock().unwrap().clone().unwrap();
        assert_eq!(during_wait.transaction.state, TransactionState::Pending);
        assert_eq!(during_wait.transaction.hash.as_deref(), Some(TX_HASH));

        let sent = provider.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, ZERO_ADDRESS);
        assert_eq!(sent[0].value, 1_000_000_000_000_000);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.transaction.state, TransactionState::Success);
        assert_eq!(snapshot.transaction.hash.as_deref(), Some(TX_HASH));
        assert!(snapshot.transaction.error_message.is_none());
        assert!(!snapshot.is_processing);
        assert_eq!(snapshot.session.address.as_deref(), Some(ALICE));
        assert_eq!(snapshot.session.chain_id, Some(11155111));
        assert_eq!(snapshot.session.balance, "0.999");
    }

    #[tokio::test]
    async fn test_pay_uses_explicit_receiver() {
        let provider = Arc::new(MockProvider::new());
        let store = store_with(provider.clone());

        assert!(store.pay(Some(BOB)).await);
        assert_eq!(provider.sent.lock().unwrap()[0].to, BOB);
    }

    #[tokio::test]
    async fn test_user_rejection_is_reported() {
        for err in [
            ProviderError::rejected("user rejected transaction"),
            ProviderError::rpc(4001, "User denied transaction signature."),
        ] {
            let provider = Arc::new(MockProvider::new());
            *provider.send_error.lock().unwrap() = Some(err);
            let store = store_with(provider);

            assert!(!store.pay(None).await);

            let snapshot = store.snapshot().await;
            assert_eq!(snapshot.transaction.state, TransactionState::Error);
            assert_eq!(
                snapshot.transaction.error_message.as_deref(),
                Some("Transaction was rejected by user")
            );
            assert!(!snapshot.is_processing);
        }
    }

    #[tokio::test]
    async fn test_insufficient_funds_is_reported() {
        let provider = Arc::new(MockProvider::new());
        *provider.send_error.lock().unwrap() =
            Some(ProviderError::insufficient_funds("insufficient funds for gas * price + value"));
        let store = store_with(provider);

        assert!(!store.pay(None).await);
        assert_eq!(
            store.snapshot().await.transaction.error_message.as_deref(),
            Some("Insufficient funds for transaction")
        );
    }

    #[tokio::test]
    async fn test_other_failures_keep_their_message() {
        let provider = Arc::new(MockProvider::new());
        *provider.wait_error.lock().unwrap() = Some(ProviderError::other("execution reverted"));
        let store = store_with(provider);

        assert!(!store.pay(None).await);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.transaction.state, TransactionState::Error);
        assert_eq!(snapshot.transaction.hash.as_deref(), Some(TX_HASH));
        assert_eq!(
            snapshot.transaction.error_message.as_deref(),
            Some("execution reverted")
        );

        let provider = Arc::new(MockProvider::new());
        *provider.send_error.lock().unwrap() = Some(ProviderError::rpc(-32603, ""));
        let store = store_with(provider);

        assert!(!store.pay(None).await);
        assert_eq!(
            store.snapshot().await.transaction.error_message.as_deref(),
            Some("Transaction failed")
        );
    }

    #[tokio::test]
    async fn test_concurrent_pay_is_rejected() {
        let provider = Arc::new(MockProvider::new());
        *provider.wait_delay.lock().unwrap() = Some(Duration::from_millis(150));
        let store = store_with(provider.clone());

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.pay(None).await })
        };
        wait_until(&store, |s| s.transaction.state == TransactionState::Pending).await;

        assert!(!store.pay(None).await);
        assert!(first.await.unwrap());

        assert_eq!(provider.sent.lock().unwrap().len(), 1);
        assert_eq!(
            store.snapshot().await.transaction.state,
            TransactionState::Success
        );
    }

    #[tokio::test]
    async fn test_reset_discards_pending_payment_result() {
        let provider = Arc::new(MockProvider::new());
        *provider.wait_delay.lock().unwrap() = Some(Duration::from_millis(150));
        let store = store_with(provider);

        let pending = {
            let store = store.clone();
            tokio::spawn(async move { store.pay(None).await })
        };
        wait_until(&store, |s| s.transaction.hash.is_some()).await;

        store.reset_transaction_state().await;
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.transaction, PaymentTransaction::default());
        assert!(!snapshot.is_processing);

        assert!(pending.await.unwrap());

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.transaction.state, TransactionState::Idle);
        assert!(snapshot.transaction.hash.is_none());
        assert!(!snapshot.is_processing);
    }

    #[tokio::test]
    async fn test_disconnect_then_update_balance_is_noop() {
        let provider = Arc::new(MockProvider::new());
        let store = store_with(provider.clone());

        assert!(store.connect().await);
        assert_eq!(store.snapshot().await.session.balance, "1.0");

        store.disconnect().await;
        let calls = provider.balance_calls.load(Ordering::SeqCst);
        store.update_balance().await;

        assert_eq!(provider.balance_calls.load(Ordering::SeqCst), calls);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.session, WalletSession::default());
        assert_eq!(snapshot.session.balance, "0");
    }

    #[tokio::test]
    async fn test_event_subscription_registered_once() {
        let provider = Arc::new(MockProvider::new());
        let store = store_with(provider.clone());

        assert!(store.connect().await);
        store.disconnect().await;
        assert!(store.connect().await);
        store.setup_event_listeners();

        assert_eq!(provider.subscribe_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_events_update_state() {
        let provider = Arc::new(MockProvider::new());
        let store = store_with(provider.clone());
        assert!(store.connect().await);

        provider.emit(ProviderEvent::AccountsChanged(vec![BOB.to_string()]));
        wait_until(&store, |s| {
            s.session.address.as_deref() == Some(BOB) && s.session.balance == "0.5"
        })
        .await;

        provider.emit(ProviderEvent::ChainChanged("0x89".to_string()));
        wait_until(&store, |s| s.session.chain_id == Some(137)).await;
        assert_eq!(store.snapshot().await.network_name(), "Polygon Mainnet");

        provider.emit(ProviderEvent::AccountsChanged(vec![]));
        wait_until(&store, |s| !s.session.connected).await;
        assert_eq!(store.snapshot().await.session, WalletSession::default());
    }

    #[tokio::test]
    async fn test_unparseable_chain_id_is_ignored() {
        let provider = Arc::new(MockProvider::new());
        let store = store_with(provider);
        assert!(store.connect().await);

        store
            .handle_event(ProviderEvent::ChainChanged("mainnet".to_string()))
            .await;
        assert_eq!(store.snapshot().await.session.chain_id, Some(11155111));
    }

    #[tokio::test]
    async fn test_stale_balance_refresh_is_discarded() {
        let provider = Arc::new(MockProvider::new());
        let store = store_with(provider.clone());
        assert!(store.connect().await);

        provider
            .balance_delays
            .lock()
            .unwrap()
            .insert(ALICE.to_string(), Duration::from_millis(150));

        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.update_balance().await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;

        store
            .handle_event(ProviderEvent::AccountsChanged(vec![BOB.to_string()]))
            .await;
        slow.await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.session.address.as_deref(), Some(BOB));
        assert_eq!(snapshot.session.balance, "0.5");
    }

    #[tokio::test]
    async fn test_missing_provider() {
        let store = WalletStore::new(None, PaymentConfig::default());
        assert!(!store.check_provider_installed().await);
        assert!(!store.connect().await);

        let snapshot = store.snapshot().await;
        assert!(!snapshot.installed);
        assert_eq!(
            snapshot.transaction.error_message,
            Some(WalletError::ProviderUnavailable.to_string())
        );

        assert!(!store.pay(None).await);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.transaction.state, TransactionState::Error);
        assert!(!snapshot.is_processing);

        let store = store_with(Arc::new(MockProvider::not_a_wallet()));
        assert!(!store.check_provider_installed().await);
        assert!(!store.snapshot().await.installed);
    }

    #[tokio::test]
    async fn test_connect_without_accounts() {
        let provider = Arc::new(MockProvider::new());
        *provider.accounts.lock().unwrap() = Ok(vec![]);
        let store = store_with(provider);

        assert!(!store.connect().await);
        let snapshot = store.snapshot().await;
        assert!(!snapshot.session.connected);
        assert_eq!(
            snapshot.transaction.error_message.as_deref(),
            Some("No accounts found. Please connect your wallet.")
        );
    }

    #[tokio::test]
    async fn test_connect_error_messages() {
        let provider = Arc::new(MockProvider::new());
        *provider.accounts.lock().unwrap() =
            Err(ProviderError::rpc(-32002, "Request already pending"));
        let store = store_with(provider.clone());

        assert!(!store.connect().await);
        assert_eq!(
            store.snapshot().await.transaction.error_message.as_deref(),
            Some("Request already pending")
        );

        *provider.accounts.lock().unwrap() = Err(ProviderError::rpc(-32002, ""));
        assert!(!store.connect().await);
        assert_eq!(
            store.snapshot().await.transaction.error_message.as_deref(),
            Some("Failed to connect wallet")
        );

        // A later successful connect clears the message
        *provider.accounts.lock().unwrap() = Ok(vec![ALICE.to_string()]);
        assert!(store.connect().await);
        assert!(store.snapshot().await.transaction.error_message.is_none());
    }

    #[tokio::test]
    async fn test_invalid_payment_amount() {
        let provider = Arc::new(MockProvider::new());
        let store = WalletStore::new(
            Some(provider.clone() as Arc<dyn WalletProvider>),
            PaymentConfig {
                amount_eth: "lots".to_string(),
                receiver: ZERO_ADDRESS.to_string(),
            },
        );

        assert!(!store.pay(None).await);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.transaction.state, TransactionState::Error);
        assert!(snapshot
            .transaction
            .error_message
            .unwrap()
            .starts_with("Invalid payment configuration"));
        assert!(provider.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(network_name(None), "Unknown");
        assert_eq!(network_name(Some(1)), "Ethereum Mainnet");
        assert_eq!(network_name(Some(80001)), "Mumbai Testnet");
        assert_eq!(network_name(Some(42161)), "Chain ID: 42161");

        assert_eq!(short_address(ALICE), "0x1111...1111");
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_payment_config_defaults() {
        let config = PaymentConfig::default();
        assert_eq!(config.amount_eth, "0.001");
        assert_eq!(config.receiver, ZERO_ADDRESS);
        assert_eq!(config.amount_wei().unwrap(), 1_000_000_000_000_000);
    }

    #[test]
    fn test_parse_chain_id() {
        use super::super::provider::parse_chain_id;

        assert_eq!(parse_chain_id("0x1"), Some(1));
        assert_eq!(parse_chain_id("0xaa36a7"), Some(11155111));
        assert_eq!(parse_chain_id("137"), None);
        assert_eq!(parse_chain_id("0xzz"), None);
    }
}
