// src/theme/store.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::PreferenceStorage;

pub const THEME_KEY: &str = "theme";
pub const DARK: &str = "dark";
pub const LIGHT: &str = "light";

/// Dark/light preference, persisted under [`THEME_KEY`]
#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<ThemeInner>,
}

struct ThemeInner {
    storage: Arc<dyn PreferenceStorage>,
    is_dark: AtomicBool,
    /// Stands in for the document-level `dark` class
    dark_marker: AtomicBool,
}

impl ThemeStore {
    /// Stored `"dark"` wins, any other stored value means light. With
    /// nothing stored the OS preference decides, defaulting to light.
    pub fn initialize(storage: Arc<dyn PreferenceStorage>, os_prefers_dark: Option<bool>) -> Self {
        let saved = match storage.get(THEME_KEY) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "Failed to read saved theme");
                None
            }
        };

        let is_dark = match saved.as_deref() {
            Some(value) => value == DARK,
            None => os_prefers_dark.unwrap_or(false),
        };
        debug!(saved = ?saved, os_prefers_dark = ?os_prefers_dark, is_dark, "Theme initialized");

        let store = Self {
            inner: Arc::new(ThemeInner {
                storage,
                is_dark: AtomicBool::new(is_dark),
                dark_marker: AtomicBool::new(false),
            }),
        };
        store.apply_theme();
        store
    }

    pub fn is_dark(&self) -> bool {
        self.inner.is_dark.load(Ordering::SeqCst)
    }

    pub fn has_dark_marker(&self) -> bool {
        self.inner.dark_marker.load(Ordering::SeqCst)
    }

    /// Flip and apply immediately, returning the new value
    pub fn toggle(&self) -> bool {
        self.inner.is_dark.fetch_xor(true, Ordering::SeqCst);
        self.apply_theme();
        self.is_dark()
    }

    pub fn apply_theme(&self) {
        let is_dark = self.is_dark();
        self.inner.dark_marker.store(is_dark, Ordering::SeqCst);

        let value = if is_dark { DARK } else { LIGHT };
        if let Err(e) = self.inner.storage.set(THEME_KEY, value) {
            warn!(theme = value, error = %e, "Failed to persist theme");
        }
    }
}
