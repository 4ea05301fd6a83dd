//! Light/dark theme synchronization with the host UI framework.
//!
//! The host exposes its color scheme as a single attribute on the root
//! document element and mutates it when the user toggles themes.  This
//! module abstracts that as the [`ThemeSource`] trait: `current()` reads
//! the scheme, `subscribe()` registers a change callback and returns an
//! unsubscribe handle.  The widget never observes the document itself —
//! that wiring lives in the host shim — but [`ThemeRelay`] provides a
//! ready-made in-process implementation the shim can publish into.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// The two color schemes the renderer ships stylesheets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Parses the host document's color-scheme attribute value.
    /// Unrecognized values return `None` so callers can keep the current
    /// scheme instead of guessing.
    pub fn from_attribute(value: &str) -> Option<ColorScheme> {
        match value {
            "light" => Some(ColorScheme::Light),
            "dark" => Some(ColorScheme::Dark),
            _ => None,
        }
    }

    /// The suffix used in theme-scoped CSS class names.
    pub fn css_suffix(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

/// Callback invoked on every scheme change.
pub type ThemeCallback = Box<dyn Fn(ColorScheme) + Send>;

/// A provider of the host's current color scheme.
#[cfg_attr(test, mockall::automock)]
pub trait ThemeSource {
    /// The scheme in effect right now.
    fn current(&self) -> ColorScheme;

    /// Registers a change callback.  Dropping (or cancelling) the
    /// returned subscription unregisters it.
    fn subscribe(&self, callback: ThemeCallback) -> ThemeSubscription;
}

/// Handle for an active theme subscription; unsubscribes on drop.
pub struct ThemeSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ThemeSubscription {
    /// Wraps an unsubscribe action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to tear down (static sources).
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribes explicitly (equivalent to dropping the handle).
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ThemeSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ThemeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[derive(Default)]
struct RelayInner {
    current: Mutex<ColorScheme>,
    subscribers: Mutex<HashMap<u64, ThemeCallback>>,
    next_id: AtomicU64,
}

/// In-process [`ThemeSource`] the host shim publishes scheme changes to.
///
/// Cloning shares the subscriber list, so the shim can keep one handle
/// for publishing while widgets subscribe through another.
///
/// Callbacks run synchronously inside [`ThemeRelay::publish`] and must
/// not subscribe or unsubscribe from within.
#[derive(Clone, Default)]
pub struct ThemeRelay {
    inner: Arc<RelayInner>,
}

impl ThemeRelay {
    /// A relay starting at the given scheme.
    pub fn new(initial: ColorScheme) -> Self {
        let relay = Self::default();
        *relay.inner.current.lock().expect("lock poisoned") = initial;
        relay
    }

    /// Publishes a scheme change.  No-ops (and notifies nobody) when the
    /// scheme did not actually change.
    pub fn publish(&self, scheme: ColorScheme) {
        {
            let mut current = self.inner.current.lock().expect("lock poisoned");
            if *current == scheme {
                return;
            }
            *current = scheme;
        }
        let subscribers = self.inner.subscribers.lock().expect("lock poisoned");
        for callback in subscribers.values() {
            callback(scheme);
        }
    }
}

impl ThemeSource for ThemeRelay {
    fn current(&self) -> ColorScheme {
        *self.inner.current.lock().expect("lock poisoned")
    }

    fn subscribe(&self, callback: ThemeCallback) -> ThemeSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .expect("lock poisoned")
            .insert(id, callback);

        let inner = Arc::clone(&self.inner);
        ThemeSubscription::new(move || {
            inner.subscribers.lock().expect("lock poisoned").remove(&id);
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_attribute_parses_known_values() {
        assert_eq!(ColorScheme::from_attribute("light"), Some(ColorScheme::Light));
        assert_eq!(ColorScheme::from_attribute("dark"), Some(ColorScheme::Dark));
    }

    #[test]
    fn test_from_attribute_rejects_unknown_values() {
        assert_eq!(ColorScheme::from_attribute("solarized"), None);
        assert_eq!(ColorScheme::from_attribute(""), None);
    }

    #[test]
    fn test_relay_reports_initial_scheme() {
        let relay = ThemeRelay::new(ColorScheme::Dark);
        assert_eq!(relay.current(), ColorScheme::Dark);
    }

    #[test]
    fn test_publish_notifies_subscribers() {
        let relay = ThemeRelay::new(ColorScheme::Light);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _sub = relay.subscribe(Box::new(move |scheme| {
            sink.lock().expect("lock poisoned").push(scheme);
        }));

        relay.publish(ColorScheme::Dark);
        relay.publish(ColorScheme::Light);

        assert_eq!(
            *seen.lock().expect("lock poisoned"),
            vec![ColorScheme::Dark, ColorScheme::Light]
        );
    }

    #[test]
    fn test_publish_same_scheme_does_not_notify() {
        let relay = ThemeRelay::new(ColorScheme::Light);
        let seen = Arc::new(Mutex::new(0usize));

        let sink = Arc::clone(&seen);
        let _sub = relay.subscribe(Box::new(move |_| {
            *sink.lock().expect("lock poisoned") += 1;
        }));

        relay.publish(ColorScheme::Light);
        assert_eq!(*seen.lock().expect("lock poisoned"), 0);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let relay = ThemeRelay::new(ColorScheme::Light);
        let seen = Arc::new(Mutex::new(0usize));

        let sink = Arc::clone(&seen);
        let sub = relay.subscribe(Box::new(move |_| {
            *sink.lock().expect("lock poisoned") += 1;
        }));
        drop(sub);

        relay.publish(ColorScheme::Dark);
        assert_eq!(*seen.lock().expect("lock poisoned"), 0);
    }

    #[test]
    fn test_mock_theme_source_subscribe() {
        // The trait seam stays mockable for component tests.
        let mut mock = MockThemeSource::new();
        mock.expect_current().return_const(ColorScheme::Dark);
        mock.expect_subscribe()
            .returning(|_| ThemeSubscription::noop());

        assert_eq!(mock.current(), ColorScheme::Dark);
        let _sub = mock.subscribe(Box::new(|_| {}));
    }
}
