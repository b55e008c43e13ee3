//! End User Stream Replay
//!
//! Rebuilds an end user from a dumped event stream and checks it the way
//! the repository does before a commit. Accepts either a JSON array of
//! stored envelopes or a JSON array of bare events.
//!
//! ```text
//! sp-replay --events stream.json
//! sp-replay --events stream.json --json
//! ```
//!
//! Exits non-zero when the stream is empty, cannot be replayed, or the
//! rebuilt end user breaks an invariant.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use sp_common::{init_logging, LogFormat};
use sp_config::ConfigLoader;
use sp_identity::usecase::EventEnvelope;
use sp_identity::{Aggregate, EndUserEvent, EndUserRoot};

/// End user stream replay
#[derive(Parser, Debug)]
#[command(name = "sp-replay")]
#[command(about = "Replay an end user event stream and verify its invariants")]
struct Args {
    /// JSON file holding the stream, oldest event first
    #[arg(long)]
    events: PathBuf,

    /// Config file; SAASPLAT_CONFIG and the search paths apply otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the rebuilt end user as JSON instead of a summary
    #[arg(long, default_value = "false")]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayReport {
    events: usize,
    end_user: EndUserRoot,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // No-op when run() already installed the configured subscriber
            init_logging("sp-replay", LogFormat::Text, "info");
            error!(error = %format!("{:#}", e), "Replay failed");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let loader = match &args.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("Failed to load configuration")?;

    let format = config
        .logging
        .format
        .parse::<LogFormat>()
        .map_err(|e| anyhow::anyhow!(e))?;
    init_logging("sp-replay", format, &config.logging.level);

    let events = read_events(&args.events)?;
    let count = events.len();
    info!(path = %args.events.display(), events = count, "Replaying end user stream");

    let root = EndUserRoot::rehydrate(events).context("Stream could not be replayed")?;
    root.ensure_invariants()
        .with_context(|| format!("End user {} breaks an invariant", root.id()))?;

    info!(end_user_id = %root.id(), version = root.version(), "Replay verified");

    if args.json {
        let report = ReplayReport {
            events: count,
            end_user: root,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&root, count);
    }
    Ok(())
}

/// Envelopes first, bare events as a fallback. An empty stream is an error.
fn read_events(path: &Path) -> Result<Vec<EndUserEvent>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let events: Vec<EndUserEvent> =
        match serde_json::from_str::<Vec<EventEnvelope<EndUserEvent>>>(&raw) {
            Ok(mut envelopes) => {
                envelopes.sort_by_key(|e| e.stream_version);
                envelopes.into_iter().map(|e| e.event).collect()
            }
            Err(_) => serde_json::from_str(&raw).with_context(|| {
                format!("{} is not a JSON array of end user events", path.display())
            })?,
        };

    if events.is_empty() {
        anyhow::bail!("{} holds no events", path.display());
    }
    Ok(events)
}

fn print_summary(root: &EndUserRoot, events: usize) {
    println!("end user     {}", root.id());
    println!("events       {}", events);
    println!("classified   {:?}", root.classification());
    println!("status       {:?}", root.status());
    println!("access       {:?}", root.access());
    if let Some(reason) = root.suspension_reason() {
        println!("suspended    {}", reason);
    }
    println!("roles        {}", root.roles().denormalize().join(", "));
    println!("features     {}", root.features().denormalize().join(", "));

    for membership in root.memberships() {
        let marker = if membership.is_default { "*" } else { " " };
        println!(
            "membership {} {} ({}) roles=[{}] features=[{}]",
            marker,
            membership.organization_id,
            membership.id,
            membership.roles.denormalize().join(", "),
            membership.features.denormalize().join(", "),
        );
    }
}
