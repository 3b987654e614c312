//! Theme state controller.
//!
//! Owns the active [`ThemePreference`]. The stored value is read once at
//! construction; afterwards the in-memory value is authoritative and every
//! change is written back to the store and pushed to subscribers before the
//! mutating call returns.

use marketpulse_core::preference::{PreferenceStore, keys};
use marketpulse_core::theme::ThemePreference;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;

type Listener = Arc<dyn Fn(ThemePreference) + Send + Sync>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

fn lock(registry: &Mutex<ListenerRegistry>) -> MutexGuard<'_, ListenerRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Manages the theme preference shared by every view.
///
/// # Example
///
/// ```
/// use marketpulse_application::ThemeController;
/// use marketpulse_core::theme::ThemePreference;
/// # use marketpulse_core::preference::PreferenceStore;
/// # use std::sync::{Arc, Mutex};
/// # #[derive(Default)]
/// # struct Store(Mutex<Option<String>>);
/// # impl PreferenceStore for Store {
/// #     fn get(&self, _: &str) -> Option<String> { self.0.lock().unwrap().clone() }
/// #     fn set(&self, _: &str, v: &str) -> marketpulse_core::error::Result<()> {
/// #         *self.0.lock().unwrap() = Some(v.to_string()); Ok(())
/// #     }
/// #     fn remove(&self, _: &str) -> marketpulse_core::error::Result<()> { Ok(()) }
/// # }
///
/// let controller = ThemeController::new(Arc::new(Store::default()));
/// assert_eq!(controller.theme(), ThemePreference::Light);
/// assert_eq!(controller.toggle_theme(), ThemePreference::Dark);
/// ```
pub struct ThemeController {
    store: Arc<dyn PreferenceStore>,
    current: watch::Sender<ThemePreference>,
    registry: Arc<Mutex<ListenerRegistry>>,
}

impl ThemeController {
    /// Creates the controller, initializing from the store.
    ///
    /// A missing or unrecognized stored value yields `Light`.
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let stored = store.get(keys::THEME);
        let theme = ThemePreference::from_stored(stored.as_deref());

        if let Some(raw) = stored.as_deref()
            && raw != theme.as_str()
        {
            tracing::warn!("Unrecognized stored theme '{}', using {}", raw, theme);
        }

        let (current, _) = watch::channel(theme);
        Self {
            store,
            current,
            registry: Arc::new(Mutex::new(ListenerRegistry::default())),
        }
    }

    /// Returns the active theme.
    pub fn theme(&self) -> ThemePreference {
        *self.current.borrow()
    }

    /// Flips Light/Dark, persists, and notifies. Returns the new theme.
    pub fn toggle_theme(&self) -> ThemePreference {
        let mut next = ThemePreference::default();
        // Persisting under the channel's write lock keeps the store in the
        // same order as memory when several threads toggle at once.
        self.current.send_modify(|theme| {
            *theme = theme.toggled();
            next = *theme;
            self.persist(next);
        });
        self.notify(next);
        next
    }

    /// Selects `theme` explicitly. Returns `false` if it was already active,
    /// in which case nothing is persisted or notified.
    pub fn set_theme(&self, theme: ThemePreference) -> bool {
        let changed = self.current.send_if_modified(|current| {
            if *current == theme {
                return false;
            }
            *current = theme;
            self.persist(theme);
            true
        });
        if changed {
            self.notify(theme);
        }
        changed
    }

    /// Registers a callback invoked synchronously after every change.
    ///
    /// Callbacks run in registration order on the thread that changed the
    /// theme. Dropping the returned handle unregisters the callback.
    pub fn subscribe<F>(&self, listener: F) -> ThemeSubscription
    where
        F: Fn(ThemePreference) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));

        ThemeSubscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Receiver for async consumers; always holds the latest theme.
    pub fn watch(&self) -> watch::Receiver<ThemePreference> {
        self.current.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }

    fn persist(&self, theme: ThemePreference) {
        if let Err(e) = self.store.set(keys::THEME, theme.as_str()) {
            tracing::warn!("Failed to persist theme '{}': {}", theme, e);
        }
    }

    fn notify(&self, theme: ThemePreference) {
        tracing::info!(%theme, "Theme changed");

        // Snapshot first so a callback may subscribe or unsubscribe.
        let listeners: Vec<Listener> = lock(&self.registry)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(theme);
        }
    }
}

/// Handle returned by [`ThemeController::subscribe`].
#[must_use = "dropping the subscription unregisters the listener"]
pub struct ThemeSubscription {
    id: u64,
    registry: Weak<Mutex<ListenerRegistry>>,
}

impl Drop for ThemeSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
