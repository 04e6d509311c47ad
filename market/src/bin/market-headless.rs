//! Headless marketplace console for scripting and E2E testing.
//!
//! Reads `Command` JSON lines from stdin and writes `Response` lines to
//! stdout. Logging goes to stderr; stdout is reserved for the IPC protocol.
//!
//! Usage:
//!   market-headless [--keypair <path>]
//!
//! On startup, emits a `Ready` JSON line to stdout.

use std::io::Write;
use std::path::PathBuf;

use market::util::format_sol;
use market::{MarketAction, MarketConfig, MarketError, MarketResult, SharedAppState};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ── IPC types ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ReadyEvent {
    event: &'static str,
    wallet: Option<String>,
    cluster: String,
    endpoint: String,
    asset: String,
}

#[derive(Deserialize)]
#[serde(tag = "cmd")]
enum Command {
    CreateListing,
    CreateBid,
    DeleteBid,
    DeleteListing,
    Airdrop,
    Balance,
    Shutdown,
}

#[derive(Serialize)]
#[serde(tag = "status")]
enum Response {
    Ok { data: Option<serde_json::Value> },
    Err { message: String },
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Value of `--keypair <path>`, if given. A flag without a path is an error.
fn parse_keypair_arg(args: &[String]) -> MarketResult<Option<PathBuf>> {
    let Some(i) = args.iter().position(|a| a == "--keypair") else {
        return Ok(None);
    };
    match args.get(i + 1) {
        Some(path) if !path.starts_with("--") => Ok(Some(PathBuf::from(path))),
        _ => Err(MarketError::Config(
            "--keypair requires a path argument".to_string(),
        )),
    }
}

fn init_logging_stderr() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,solana_client=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

fn emit_json(value: &impl Serialize) -> MarketResult<()> {
    let line = serde_json::to_string(value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}").map_err(anyhow::Error::from)?;
    stdout.flush().map_err(anyhow::Error::from)?;
    Ok(())
}

async fn handle(state: &SharedAppState, cmd: Command) -> Response {
    let result = match cmd {
        Command::CreateListing => run_action(state, MarketAction::CreateListing).await,
        Command::CreateBid => run_action(state, MarketAction::CreateBid).await,
        Command::DeleteBid => run_action(state, MarketAction::DeleteBid).await,
        Command::DeleteListing => run_action(state, MarketAction::DeleteListing).await,
        Command::Airdrop => state
            .airdrop()
            .await
            .map(|sig| serde_json::json!({ "signature": sig })),
        Command::Balance => state.balance().await.map(|lamports| {
            serde_json::json!({ "lamports": lamports, "display": format_sol(lamports) })
        }),
        Command::Shutdown => Ok(serde_json::Value::Null),
    };

    match result {
        Ok(serde_json::Value::Null) => Response::Ok { data: None },
        Ok(data) => Response::Ok { data: Some(data) },
        Err(e) => {
            warn!("Command failed: {}", e);
            Response::Err {
                message: e.to_string(),
            }
        }
    }
}

async fn run_action(state: &SharedAppState, action: MarketAction) -> MarketResult<serde_json::Value> {
    let receipt = state.run(action).await?;
    Ok(serde_json::json!({
        "action": receipt.action.label(),
        "signature": receipt.signature.to_string(),
        "explorer_url": receipt.explorer_url,
    }))
}

// ── Main ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> MarketResult<()> {
    init_logging_stderr();

    let args: Vec<String> = std::env::args().collect();
    let mut config = MarketConfig::from_env()?;
    match parse_keypair_arg(&args) {
        Ok(Some(path)) => config.keypair_path = path,
        Ok(None) => {}
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    }
    info!("market-headless starting (cluster={})", config.cluster);

    let state = SharedAppState::from_config(config)?;
    if let Err(e) = state.connect_keypair_file() {
        error!("Wallet not connected: {}", e);
    }

    let status = state.wallet_status();
    emit_json(&ReadyEvent {
        event: "Ready",
        wallet: status.pubkey,
        cluster: status.cluster,
        endpoint: status.endpoint,
        asset: state.actions.asset().to_string(),
    })?;
    info!("Ready event emitted");

    // Command loop
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => {
                info!("stdin closed, shutting down");
                break;
            }
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let cmd: Command = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                emit_json(&Response::Err {
                    message: format!("Invalid command JSON: {e}"),
                })?;
                continue;
            }
        };

        let shutdown = matches!(cmd, Command::Shutdown);
        let response = handle(&state, cmd).await;
        emit_json(&response)?;
        if shutdown {
            info!("Shutdown command received");
            break;
        }
    }

    info!("Shutdown complete");
    Ok(())
}
