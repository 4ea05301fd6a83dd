//! The headless dock widget: props in, presented model out.
//!
//! [`DockWidget`] owns the pieces the rendering shim needs: the live
//! layout model, the gating policy, the cached license validator, and
//! the current color scheme.  The shim feeds it prop updates and model
//! changes from the renderer, drives [`DockWidget::revalidate`] whenever
//! the key or tab count changes, and hands whatever
//! [`DockWidget::present`] returns to the docking renderer.
//!
//! License failures never surface as errors here — the widget silently
//! behaves as the free tier (see `flexdock-license`).  Likewise a model
//! the limiter cannot interpret falls back to the unmodified input with
//! a logged warning, so the render path is never interrupted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, info, warn};

use flexdock_core::{count_tabs, LayoutModel, ModelError, TabCount, DEFAULT_FREE_TAB_LIMIT};
use flexdock_license::{CachedValidator, LicenseClient, LicenseError, ValidationCache};

use crate::gating::{GateDecision, GatingPolicy, LicenseState};
use crate::theme::{ColorScheme, ThemeSource, ThemeSubscription};

/// Name this widget reports to the validation service.
pub const COMPONENT_NAME: &str = "FlexDock";

/// Callback invoked when the widget wants the host to persist a model.
pub type ModelChangeCallback = Box<dyn Fn(&LayoutModel) + Send>;

/// Construction-time properties of the widget.
#[derive(Debug, Clone)]
pub struct DockOptions {
    /// License key for the premium tier.  `None` locks the widget to the
    /// free tier without a network round.
    pub license_key: Option<String>,

    /// Validation endpoint override; the production endpoint when `None`.
    pub endpoint: Option<String>,

    /// Maximum number of tabs in the free tier.
    pub free_tab_limit: usize,

    /// Custom header content per tab id, substituted by the shim during
    /// tab rendering.
    pub headers: HashMap<String, Value>,

    /// Keep model state internal instead of round-tripping every change
    /// through the host.  When set, model changes do not invoke the
    /// model-change callback.
    pub use_internal_state: bool,

    /// Log gating decisions at info level.
    pub debug: bool,
}

impl Default for DockOptions {
    fn default() -> Self {
        Self {
            license_key: None,
            endpoint: None,
            free_tab_limit: DEFAULT_FREE_TAB_LIMIT,
            headers: HashMap::new(),
            use_internal_state: false,
            debug: false,
        }
    }
}

/// The headless dock widget.
pub struct DockWidget {
    options: DockOptions,
    model: LayoutModel,
    policy: GatingPolicy,
    validator: CachedValidator,
    color_scheme: Arc<Mutex<ColorScheme>>,
    on_model_change: Option<ModelChangeCallback>,
    // Held so the theme subscription outlives attach_theme().
    theme_subscription: Option<ThemeSubscription>,
}

impl DockWidget {
    /// Builds a widget with a fresh validator and cache.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Endpoint`] if the endpoint override is
    /// not a valid URL.  Everything else about validation is deferred —
    /// and infallible — until [`DockWidget::revalidate`].
    pub fn new(model: LayoutModel, options: DockOptions) -> Result<Self, LicenseError> {
        let client = match options.endpoint.as_deref() {
            Some(endpoint) => LicenseClient::from_endpoint_str(endpoint)?,
            None => LicenseClient::new(),
        };
        let validator = CachedValidator::new(client, Arc::new(ValidationCache::new()));
        Ok(Self::with_validator(model, options, validator))
    }

    /// Builds a widget around an injected validator (shared cache,
    /// custom client, or a test double).
    pub fn with_validator(
        model: LayoutModel,
        options: DockOptions,
        validator: CachedValidator,
    ) -> Self {
        let policy = GatingPolicy::new(options.free_tab_limit);
        Self {
            options,
            model,
            policy,
            validator,
            color_scheme: Arc::new(Mutex::new(ColorScheme::default())),
            on_model_change: None,
            theme_subscription: None,
        }
    }

    /// The live (ungated) model.
    pub fn model(&self) -> &LayoutModel {
        &self.model
    }

    /// Tab counts of the live model.
    pub fn tab_counts(&self) -> TabCount {
        count_tabs(&self.model)
    }

    /// Current license lifecycle state.
    pub fn license_state(&self) -> &LicenseState {
        self.policy.state()
    }

    /// Whether the most recent presentation was limited.
    pub fn was_limited(&self) -> bool {
        self.policy.was_limited()
    }

    /// Replaces the live model.  A change in tab count re-enters the
    /// validation lifecycle, since the count is part of what the server
    /// bills against.
    pub fn set_model(&mut self, model: LayoutModel) {
        let count_changed = count_tabs(&model).total != count_tabs(&self.model).total;
        self.model = model;
        if count_changed {
            self.policy.reset();
        }
    }

    /// Replaces the license key and restarts the validation lifecycle.
    pub fn set_license_key(&mut self, key: Option<String>) {
        if self.options.license_key != key {
            self.options.license_key = key;
            self.policy.reset();
        }
    }

    /// Registers the host's model-persistence callback.
    pub fn set_on_model_change(&mut self, callback: ModelChangeCallback) {
        self.on_model_change = Some(callback);
    }

    /// Runs one validation round for the current key and tab count.
    ///
    /// Safe to call repeatedly: results are cached per key, and a round
    /// superseded by a key/model change while in flight is discarded by
    /// the ticket guard instead of clobbering newer state.
    pub async fn revalidate(&mut self) {
        let Some(key) = self.options.license_key.clone() else {
            self.policy.mark_unlicensed("No API key provided");
            if self.options.debug {
                info!(
                    limit = self.options.free_tab_limit,
                    "no license key; free tier enforced"
                );
            }
            return;
        };

        let items_count = count_tabs(&self.model).total;
        let ticket = self.policy.begin_validation();
        let response = self
            .validator
            .check(Some(&key), COMPONENT_NAME, items_count)
            .await;

        if self.policy.complete_validation(ticket, &response) && self.options.debug {
            info!(
                valid = response.valid,
                message = %response.message,
                "license validation completed"
            );
        }
    }

    /// Gates the live model and returns what the renderer should show.
    pub fn present(&mut self) -> GateDecision<'_> {
        let decision = self.policy.select_model(&self.model);
        if decision.tier_changed && decision.limited && self.options.debug {
            warn!(
                limit = self.options.free_tab_limit,
                total = decision.counts.total,
                "layout limited to the free tier"
            );
        }
        decision
    }

    /// Gates a raw JSON model, for shims that keep the model untyped.
    ///
    /// A document the model cannot interpret is returned unchanged with
    /// a logged warning — a malformed model must degrade to "present as
    /// is", never break rendering.
    pub fn present_json(&mut self, raw: &Value) -> Value {
        let parsed = match LayoutModel::from_json(raw) {
            Ok(model) => model,
            Err(ModelError::Malformed(err)) => {
                warn!(error = %err, "unparseable layout model; presenting unmodified");
                return raw.clone();
            }
        };

        let decision = self.policy.select_model(&parsed);
        match decision.model.to_json() {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "gated model failed to serialize; presenting unmodified");
                raw.clone()
            }
        }
    }

    /// Routes a model change from the renderer: externally-persisted
    /// mode hands it to the host callback, internal-state mode stores it
    /// locally.
    pub fn apply_model_change(&mut self, updated: LayoutModel) {
        if !self.options.use_internal_state {
            if let Some(callback) = &self.on_model_change {
                debug!("forwarding model change to the host");
                callback(&updated);
                return;
            }
        }
        debug!("storing model change internally");
        self.set_model(updated);
    }

    /// Custom header content for a tab, if the host supplied one.
    pub fn header_for(&self, tab_id: &str) -> Option<&Value> {
        self.options.headers.get(tab_id)
    }

    /// The current color scheme.
    pub fn color_scheme(&self) -> ColorScheme {
        *self.color_scheme.lock().expect("lock poisoned")
    }

    /// Sets the color scheme directly (hosts without a theme source).
    pub fn set_color_scheme(&self, scheme: ColorScheme) {
        *self.color_scheme.lock().expect("lock poisoned") = scheme;
    }

    /// Adopts the source's current scheme and follows its changes until
    /// the widget is dropped or another source is attached.
    pub fn attach_theme(&mut self, source: &dyn ThemeSource) {
        self.set_color_scheme(source.current());
        let slot = Arc::clone(&self.color_scheme);
        let subscription = source.subscribe(Box::new(move |scheme| {
            *slot.lock().expect("lock poisoned") = scheme;
        }));
        self.theme_subscription = Some(subscription);
    }

    /// Theme-scoped class for the container element.
    pub fn container_class(&self) -> String {
        format!(
            "flexdock-container flexdock-{}",
            self.color_scheme().css_suffix()
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
