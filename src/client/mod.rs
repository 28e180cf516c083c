//! # Client Module
//!
//! The one container a client process builds at startup. It owns the
//! navigation guard and the user, wallet and theme stores; clones share
//! the same state.


use std::sync::Arc;
use tracing::info;

use crate::auth::{AuthBackend, BackendError};
use crate::navigation::{platform_routes, GuardConfig, NavigationGuard, NavigationOutcome, RouteTable};
use crate::profile::UserStore;
use crate::theme::{PreferenceStorage, ThemeStore};
use crate::wallet::{PaymentConfig, WalletProvider, WalletStore};

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub guard: GuardConfig,
    pub payment: PaymentConfig,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            guard: GuardConfig::from_env(),
            payment: PaymentConfig::from_env(),
        }
    }
}

/// Collaborators the client is wired to
pub struct ClientParts {
    pub backend: Arc<dyn AuthBackend>,
    pub wallet_provider: Option<Arc<dyn WalletProvider>>,
    pub storage: Arc<dyn PreferenceStorage>,
    pub os_prefers_dark: Option<bool>,
}

#[derive(Clone)]
pub struct ClientContext {
    routes: Arc<RouteTable>,
    guard: Arc<NavigationGuard>,
    user: UserStore,
    wallet: WalletStore,
    theme: ThemeStore,
}

impl ClientContext {
    pub fn new(parts: ClientParts, config: &ClientConfig) -> Self {
        let guard = NavigationGuard::new(parts.backend.clone(), &config.guard);

        Self {
            routes: Arc::new(platform_routes()),
            guard: Arc::new(guard),
            user: UserStore::new(parts.backend),
            wallet: WalletStore::new(parts.wallet_provider, config.payment.clone()),
            theme: ThemeStore::initialize(parts.storage, parts.os_prefers_dark),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn user(&self) -> &UserStore {
        &self.user
    }

    pub fn wallet(&self) -> &WalletStore {
        &self.wallet
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub async fn navigate(&self, path: &str) -> NavigationOutcome {
        self.guard.resolve_path(&self.routes, path).await
    }

    /// Reload the user's profile and roles. Cached role grants for the
    /// previous and the current user are dropped so the guard sees the
    /// same roles as the profile state.
    pub async fn refresh_user(&self) -> Result<(), BackendError> {
        let previous = self.user.user_id().await;

        self.user.fetch_user_data().await?;

        let current = self.user.user_id().await;
        for user_id in previous.iter().chain(current.iter()) {
            self.guard.invalidate_roles(user_id).await;
        }
        Ok(())
    }

    /// Forget local user and wallet state after the backend session ends
    pub async fn clear_user_state(&self) {
        self.user.clear().await;
        self.guard.clear_role_cache().await;
        self.wallet.disconnect().await;
        info!("Client user state cleared");
    }
}
