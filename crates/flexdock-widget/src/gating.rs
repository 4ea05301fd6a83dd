//! The gating policy: which model variant gets presented.
//!
//! Two independent inputs feed the decision:
//!
//! - the **license lifecycle** ([`LicenseState`]), driven by the async
//!   validation call; and
//! - the **tab count** of the live model versus the free-tier limit.
//!
//! A valid license always presents the unmodified model.  In every other
//! state — including while a validation is still in flight — a model over
//! the limit is presented through the free-tier limiter, so an expired or
//! slow license server degrades to free-tier behavior instead of an
//! unlimited flash.
//!
//! # Stale completions
//!
//! Validations are asynchronous, and the key (or the tab count the server
//! bills against) can change while one is in flight.  Each round is
//! therefore tagged with a [`ValidationTicket`]; completing with a ticket
//! that is no longer current is a no-op, so a superseded request can
//! never overwrite state belonging to newer inputs.

use std::borrow::Cow;

use flexdock_core::{count_tabs, limit_to_free_tier, LayoutModel, TabCount};
use flexdock_license::ValidationResponse;
use tracing::{debug, info};
use uuid::Uuid;

/// License lifecycle state.
///
/// ```text
/// Unvalidated ──► Validating ──► Valid
///      ▲              │    └───► Invalid
///      └──────────────┴─── reset() on key/count change
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseState {
    /// No validation has been attempted for the current inputs.
    Unvalidated,
    /// A validation round is in flight.
    Validating,
    /// The server confirmed the key.
    Valid {
        /// Server status message.
        message: String,
    },
    /// The key was rejected, missing, or the check failed.
    Invalid {
        /// Why (server message or local failure text).
        message: String,
    },
}

impl LicenseState {
    /// `true` only when the server has confirmed the key.
    pub fn is_valid(&self) -> bool {
        matches!(self, LicenseState::Valid { .. })
    }

    /// `true` once a validation round has settled either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, LicenseState::Valid { .. } | LicenseState::Invalid { .. })
    }

    /// The associated message, empty for unsettled states.
    pub fn message(&self) -> &str {
        match self {
            LicenseState::Valid { message } | LicenseState::Invalid { message } => message,
            _ => "",
        }
    }
}

/// Identifies one validation round.  Obtained from
/// [`GatingPolicy::begin_validation`] and redeemed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationTicket(Uuid);

/// The outcome of one gating decision.
#[derive(Debug)]
pub struct GateDecision<'a> {
    /// The model to hand to the renderer: borrowed when unmodified,
    /// owned when the limiter ran.
    pub model: Cow<'a, LayoutModel>,
    /// Whether the presented model differs from the original.
    pub limited: bool,
    /// Whether `limited` changed compared to the previous decision; the
    /// host should only re-notify indicators when this is set.
    pub tier_changed: bool,
    /// Tab counts of the *original* model.
    pub counts: TabCount,
}

/// Combines the license lifecycle with the tab-count check.
#[derive(Debug)]
pub struct GatingPolicy {
    free_tab_limit: usize,
    state: LicenseState,
    was_limited: bool,
    current_ticket: Option<Uuid>,
}

impl GatingPolicy {
    /// A fresh policy in `Unvalidated` with the given free-tier limit.
    pub fn new(free_tab_limit: usize) -> Self {
        Self {
            free_tab_limit,
            state: LicenseState::Unvalidated,
            was_limited: false,
            current_ticket: None,
        }
    }

    /// The configured free-tier tab limit.
    pub fn free_tab_limit(&self) -> usize {
        self.free_tab_limit
    }

    /// Current license lifecycle state.
    pub fn state(&self) -> &LicenseState {
        &self.state
    }

    /// Whether the most recent decision presented a limited model.
    pub fn was_limited(&self) -> bool {
        self.was_limited
    }

    /// Starts a validation round: transitions to `Validating` and returns
    /// the ticket that must accompany the completion.  Starting a new
    /// round invalidates any ticket still in flight.
    pub fn begin_validation(&mut self) -> ValidationTicket {
        let id = Uuid::new_v4();
        self.current_ticket = Some(id);
        self.state = LicenseState::Validating;
        debug!(ticket = %id, "validation round started");
        ValidationTicket(id)
    }

    /// Applies a validation verdict.
    ///
    /// Returns `false` — leaving the state untouched — when the ticket
    /// has been superseded by a newer round or a reset.
    pub fn complete_validation(
        &mut self,
        ticket: ValidationTicket,
        response: &ValidationResponse,
    ) -> bool {
        if self.current_ticket != Some(ticket.0) {
            debug!(ticket = %ticket.0, "discarding stale validation result");
            return false;
        }
        self.current_ticket = None;
        self.state = if response.valid {
            info!("license validated: {}", response.message);
            LicenseState::Valid {
                message: response.message.clone(),
            }
        } else {
            info!("license invalid: {}", response.message);
            LicenseState::Invalid {
                message: response.message.clone(),
            }
        };
        true
    }

    /// Settles immediately as `Invalid` without a network round (used
    /// when no key is configured at all).
    pub fn mark_unlicensed(&mut self, message: impl Into<String>) {
        self.current_ticket = None;
        self.state = LicenseState::Invalid {
            message: message.into(),
        };
    }

    /// Re-enters `Unvalidated`, dropping any in-flight ticket.  Called
    /// when the key or the billed item count changes.
    pub fn reset(&mut self) {
        self.current_ticket = None;
        self.state = LicenseState::Unvalidated;
    }

    /// Decides which model variant to present.
    ///
    /// `Valid` always presents the unmodified model; any other state
    /// presents the limiter output when the model exceeds the free-tier
    /// limit.
    pub fn select_model<'a>(&mut self, model: &'a LayoutModel) -> GateDecision<'a> {
        let counts = count_tabs(model);
        let exceeds = counts.total > self.free_tab_limit;
        let limited = exceeds && !self.state.is_valid();

        let chosen = if limited {
            Cow::Owned(limit_to_free_tier(model, self.free_tab_limit))
        } else {
            Cow::Borrowed(model)
        };

        let tier_changed = self.was_limited != limited;
        if tier_changed {
            self.was_limited = limited;
            debug!(limited, "presented tier changed");
        }

        GateDecision {
            model: chosen,
            limited,
            tier_changed,
            counts,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
