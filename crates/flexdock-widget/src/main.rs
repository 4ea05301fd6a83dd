//! FlexDock gating tool — entry point.
//!
//! Reads a layout model from a JSON file, runs one license validation
//! round, and prints the model a renderer would actually be handed:
//! either the original document or its free-tier-limited variant.  This
//! is the same pipeline embedding hosts drive programmatically, exposed
//! as a CLI for integration checks and support diagnostics.
//!
//! # Usage
//!
//! ```text
//! flexdock [OPTIONS] <MODEL>
//!
//! Arguments:
//!   <MODEL>   Path to the layout model JSON file
//!
//! Options:
//!   --license-key <KEY>    License key for the premium tier
//!   --endpoint <URL>       Validation endpoint override
//!   --free-tab-limit <N>   Free-tier tab limit [default: 3]
//!   --pretty               Pretty-print the output JSON
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                 | Default      | Description               |
//! |--------------------------|--------------|---------------------------|
//! | `FLEXDOCK_LICENSE_KEY`   | (none)       | License key               |
//! | `FLEXDOCK_ENDPOINT`      | (production) | Validation endpoint       |
//! | `FLEXDOCK_FREE_TAB_LIMIT`| `3`          | Free-tier tab limit       |
//!
//! Validation never aborts the run: a missing key, a rejected key, or an
//! unreachable endpoint all degrade to the free tier, matching the
//! embedded behavior.  Only local problems (unreadable file, bad JSON
//! syntax, invalid endpoint URL) exit nonzero.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flexdock_core::{count_tabs, LayoutModel, DEFAULT_FREE_TAB_LIMIT};
use flexdock_widget::{DockOptions, DockWidget};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Gate a layout model through license validation and the free-tier limiter.
#[derive(Debug, Parser)]
#[command(
    name = "flexdock",
    about = "Validate a license and print the layout model a renderer would be handed",
    version
)]
struct Cli {
    /// Path to the layout model JSON file.
    model: PathBuf,

    /// License key for the premium tier.  Without one the free-tier
    /// limit applies unconditionally.
    #[arg(long, env = "FLEXDOCK_LICENSE_KEY")]
    license_key: Option<String>,

    /// Validation endpoint override (defaults to the production endpoint).
    #[arg(long, env = "FLEXDOCK_ENDPOINT")]
    endpoint: Option<String>,

    /// Free-tier tab limit.
    #[arg(long, default_value_t = DEFAULT_FREE_TAB_LIMIT, env = "FLEXDOCK_FREE_TAB_LIMIT")]
    free_tab_limit: usize,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    /// Converts the parsed CLI arguments into [`DockOptions`].
    fn into_dock_options(self) -> DockOptions {
        DockOptions {
            license_key: self.license_key,
            endpoint: self.endpoint,
            free_tab_limit: self.free_tab_limit,
            debug: true,
            ..DockOptions::default()
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls verbosity; default to info when absent.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let model_path = cli.model.clone();
    let pretty = cli.pretty;

    let raw = std::fs::read_to_string(&model_path)
        .with_context(|| format!("failed to read model file '{}'", model_path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("model file '{}' is not valid JSON", model_path.display()))?;
    let model = LayoutModel::from_json(&value)
        .with_context(|| format!("model file '{}' is not a layout model", model_path.display()))?;

    let counts = count_tabs(&model);
    info!(
        total = counts.total,
        border = counts.border_tabs,
        layout = counts.layout_tabs,
        "loaded layout model"
    );

    let mut widget = DockWidget::new(model, cli.into_dock_options())
        .context("invalid validation endpoint")?;

    widget.revalidate().await;
    let state = widget.license_state().clone();
    let decision = widget.present();

    info!(
        limited = decision.limited,
        state = ?state,
        "gating decision"
    );

    let output = decision
        .model
        .to_json()
        .context("failed to serialize the gated model")?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
