//! HTTP client for the license validation endpoint.
//!
//! Wire contract: `POST <endpoint>?key=<apiKey>` with a JSON body
//! `{"component_name": <str>, "items_count": <int>}`.  A successful
//! response carries `{"valid": bool, "message": str, "usage_count"?: int}`;
//! rejections use a non-2xx status with an optional `{"message"}` body.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// The production validation endpoint, used when no override is given.
pub const DEFAULT_VALIDATION_ENDPOINT: &str = "https://geomapindex.com/api/api-keys/validate";

/// Message returned when no key was supplied at all.
const MSG_NO_KEY: &str = "No API key provided";
/// Message used when the server rejects without its own message.
const MSG_REJECTED: &str = "API validation failed";
/// Message used for transport failures and unparseable bodies.
const MSG_TRANSPORT: &str = "API validation error";

/// Errors on the internal request path.
///
/// These never escape [`LicenseClient::validate`]; they are converted to
/// negative [`ValidationResponse`]s so callers cannot forget to degrade
/// gracefully.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The request could not be sent or the response body could not be
    /// read or decoded.
    #[error("license validation transport failure: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("license server rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic failure text when absent.
        message: String,
    },

    /// The endpoint override is not a valid URL.
    #[error("invalid validation endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// The verdict of a validation round, as consumed by the gating policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    /// Whether the key unlocks the premium tier.
    pub valid: bool,
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
    /// How many items the server has recorded for this key, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
}

impl ValidationResponse {
    /// The immediate verdict for a missing key (no network call).
    pub fn no_key() -> Self {
        Self::invalid(MSG_NO_KEY)
    }

    /// A negative verdict with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            usage_count: None,
        }
    }
}

/// JSON body sent with every validation request.
#[derive(Debug, Serialize)]
struct ValidationRequest<'a> {
    component_name: &'a str,
    items_count: usize,
}

/// Client for the remote license validation service.
///
/// Cheap to clone (the underlying connection pool is shared).
#[derive(Debug, Clone)]
pub struct LicenseClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl LicenseClient {
    /// Creates a client pointed at [`DEFAULT_VALIDATION_ENDPOINT`].
    pub fn new() -> Self {
        // The constant is a compile-time-known valid URL.
        let endpoint = Url::parse(DEFAULT_VALIDATION_ENDPOINT).expect("default endpoint is valid");
        Self::with_endpoint(endpoint)
    }

    /// Creates a client pointed at a custom endpoint.
    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Creates a client from an endpoint string (e.g. a component prop).
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Endpoint`] if the string is not a URL.
    pub fn from_endpoint_str(endpoint: &str) -> Result<Self, LicenseError> {
        Ok(Self::with_endpoint(Url::parse(endpoint)?))
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Validates a license key.  Never fails: every failure path resolves
    /// to a negative [`ValidationResponse`] (see the crate docs).
    ///
    /// A `None` or empty key short-circuits to
    /// `{valid: false, message: "No API key provided"}` without touching
    /// the network.
    pub async fn validate(
        &self,
        api_key: Option<&str>,
        component_name: &str,
        items_count: usize,
    ) -> ValidationResponse {
        let Some(key) = api_key.filter(|k| !k.is_empty()) else {
            return ValidationResponse::no_key();
        };

        match self.request(key, component_name, items_count).await {
            Ok(response) => {
                debug!(valid = response.valid, "license validation resolved");
                response
            }
            Err(LicenseError::Rejected { status, message }) => {
                warn!(status, %message, "license server rejected the key");
                ValidationResponse::invalid(message)
            }
            Err(err) => {
                warn!(error = %err, "license validation request failed");
                ValidationResponse::invalid(MSG_TRANSPORT)
            }
        }
    }

    /// The fallible request path behind [`LicenseClient::validate`].
    async fn request(
        &self,
        key: &str,
        component_name: &str,
        items_count: usize,
    ) -> Result<ValidationResponse, LicenseError> {
        // Rebuild the query so the key replaces anything already present
        // on the configured endpoint.
        let mut url = self.endpoint.clone();
        url.set_query(None);
        url.query_pairs_mut().append_pair("key", key);

        let response = self
            .http
            .post(url)
            .json(&ValidationRequest {
                component_name,
                items_count,
            })
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(MSG_REJECTED)
                .to_string();
            return Err(LicenseError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(ValidationResponse {
            valid: body.get("valid").and_then(Value::as_bool).unwrap_or(false),
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            usage_count: body.get("usage_count").and_then(Value::as_u64),
        })
    }
}

impl Default for LicenseClient {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
