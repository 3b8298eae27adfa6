///
/// This module implements the full CLI interface for usage-gate—handling
/// command parsing, argument validation, main entrypoints, and user-visible
/// invocations.
///
/// All core business logic (actor resolution rules, gate state, policy) lives
/// in the [`usage-gate-core`] crate. This module is strictly for CLI glue,
/// ergonomic argument exposure, and wiring the right storage port to the
/// resolved actor.
///
/// ## Features
/// - Entry struct [`Cli`] defines all user-facing options and subcommands.
/// - Subcommand routing (`status`, `record`) and argument validation.
/// - Async entrypoint (`run`) for programmatic invocation and integration
///   testing.
/// - Logging, tracing, and structured error output at CLI level.
///
/// ## How To Use
/// - For command-line users: use the installed `usage-gate` binary with
///   `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// ## Extending
/// When adding features or subcommands, update [`Commands`] below and keep all
/// non-trivial business logic inside `usage-gate-core`.
///
/// ---
///
/// [`usage-gate-core`]: ../../usage-gate-core/
use crate::load_config::{load_config, CliConfig};
use crate::remote::RecordStoreClient;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use usage_gate_core::actor::{AccountId, Actor};
use usage_gate_core::contract::CounterStore;
use usage_gate_core::gate::{PolicyFlags, UsageGate};
use usage_gate_core::local_store::LocalCounterStore;

/// CLI for usage-gate: inspect and record per-actor transformation usage.
#[derive(Parser)]
#[clap(
    name = "usage-gate",
    version,
    about = "Track per-actor transformation counts and the email/subscription gates derived from them"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the stored usage count and gating flags for an actor
    Status {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Authenticated account id; omit for the anonymous actor
        #[clap(long)]
        user_id: Option<String>,
    },
    /// Record one completed transformation and print the resulting flags
    Record {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Authenticated account id; omit for the anonymous actor
        #[clap(long)]
        user_id: Option<String>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Status { config, user_id } => {
            let config = load_config(config)?;
            tracing::info!(command = "status", "Resolving actor and loading usage state");
            let actor = Actor::resolve(user_id.map(|id| AccountId::new(&id)));
            let store = select_store(&actor, &config)?;
            let mut gate = UsageGate::new(config.gate.clone());
            let flags = gate.initialize(&actor, store.as_ref()).await;
            print_summary(&actor, &gate, flags);
            Ok(())
        }
        Commands::Record { config, user_id } => {
            let config = load_config(config)?;
            tracing::info!(command = "record", "Resolving actor and recording usage");
            let actor = Actor::resolve(user_id.map(|id| AccountId::new(&id)));
            let store = select_store(&actor, &config)?;
            let mut gate = UsageGate::new(config.gate.clone());
            gate.initialize(&actor, store.as_ref()).await;
            let flags = gate.increment_usage(&actor, store.as_ref()).await;
            print_summary(&actor, &gate, flags);
            Ok(())
        }
    }
}

/// Pick the storage port for the resolved actor, once. The gate itself never
/// branches on actor kind.
fn select_store(actor: &Actor, config: &CliConfig) -> Result<Box<dyn CounterStore>> {
    if actor.is_authenticated() {
        let client = RecordStoreClient::new_from_env()
            .map_err(|e| anyhow::anyhow!("Failed to construct record store client from env: {e}"))?;
        Ok(Box::new(client))
    } else {
        Ok(Box::new(LocalCounterStore::new(&config.storage.local_dir)))
    }
}

fn print_summary(actor: &Actor, gate: &UsageGate, flags: PolicyFlags) {
    println!(
        "actor: {} count: {} requires_email: {} requires_subscription: {}",
        actor.storage_key(),
        gate.count(),
        flags.requires_email,
        flags.requires_subscription
    );
}
