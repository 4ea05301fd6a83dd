//! # flexdock-license
//!
//! License-key validation for FlexDock's premium tier.
//!
//! The free tier caps the number of tabs; a valid license key lifts the
//! cap.  Keys are checked against a remote JSON-over-HTTP endpoint, and
//! results are cached per `(key, component)` so an unchanged key costs at
//! most one network round trip per process.
//!
//! # Failure philosophy
//!
//! A license check that cannot complete must never break rendering.  The
//! public entry points ([`LicenseClient::validate`] and
//! [`CachedValidator::check`]) therefore *always* resolve to a
//! [`ValidationResponse`]; transport failures, server rejections, and
//! unparseable bodies all map to `valid: false` with a descriptive
//! message, and the widget silently degrades to free-tier behavior.
//! The typed [`LicenseError`] taxonomy exists on the internal request
//! path only.

pub mod cache;
pub mod client;

pub use cache::{CachedValidator, ValidationCache};
pub use client::{LicenseClient, LicenseError, ValidationResponse, DEFAULT_VALIDATION_ENDPOINT};
