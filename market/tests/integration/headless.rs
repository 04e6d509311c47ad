//! Drives the `market-headless` binary over its stdio protocol.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use solana_sdk::signature::{write_keypair_file, Keypair};
use solana_sdk::signer::Signer;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

const LINE_TIMEOUT: Duration = Duration::from_secs(30);

struct Headless {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl Headless {
    fn spawn(keypair: &Path, extra_args: &[&str]) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_market-headless"))
            .args(extra_args)
            .env("MARKET_CLUSTER", "localnet")
            .env("MARKET_KEYPAIR", keypair)
            .env_remove("MARKET_RPC_URL")
            .env_remove("MARKET_ASSET_MINT")
            .env_remove("MARKET_BID_EXPIRY_SECS")
            .env_remove("MARKET_SKIP_PREFLIGHT")
            .env_remove("MARKET_SDK_CMD")
            .env("RUST_LOG", "warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("spawn market-headless");
        let stdin = child.stdin.take().unwrap();
        let stdout = BufReader::new(child.stdout.take().unwrap()).lines();
        Self {
            child,
            stdin,
            stdout,
        }
    }

    async fn next_json(&mut self) -> Value {
        let line = tokio::time::timeout(LINE_TIMEOUT, self.stdout.next_line())
            .await
            .expect("headless reply timed out")
            .unwrap()
            .expect("headless closed stdout");
        serde_json::from_str(&line).unwrap()
    }

    async fn send(&mut self, line: &str) -> Value {
        self.stdin.write_all(line.as_bytes()).await.unwrap();
        self.stdin.write_all(b"\n").await.unwrap();
        self.stdin.flush().await.unwrap();
        self.next_json().await
    }
}

fn missing_keypair() -> PathBuf {
    PathBuf::from("/nonexistent/market-headless/id.json")
}

#[tokio::test]
async fn test_ready_event_without_wallet() {
    let mut h = Headless::spawn(&missing_keypair(), &[]);

    let ready = h.next_json().await;

    assert_eq!(ready["event"], "Ready");
    assert!(ready["wallet"].is_null());
    assert_eq!(ready["cluster"], "localnet");
    assert_eq!(ready["asset"], market::config::DEFAULT_ASSET_MINT);
}

#[tokio::test]
async fn test_actions_without_wallet_answer_err() {
    let mut h = Headless::spawn(&missing_keypair(), &[]);
    h.next_json().await;

    for cmd in ["CreateListing", "CreateBid", "DeleteBid", "DeleteListing", "Balance"] {
        let reply = h.send(&format!(r#"{{"cmd":"{cmd}"}}"#)).await;
        assert_eq!(reply["status"], "Err", "{cmd}");
        assert_eq!(reply["message"], "Wallet not connected", "{cmd}");
    }
}

#[tokio::test]
async fn test_malformed_and_unknown_commands_answer_err() {
    let mut h = Headless::spawn(&missing_keypair(), &[]);
    h.next_json().await;

    let malformed = h.send("not json").await;
    assert_eq!(malformed["status"], "Err");
    assert!(malformed["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid command JSON"));

    let unknown = h.send(r#"{"cmd":"BuyEverything"}"#).await;
    assert_eq!(unknown["status"], "Err");

    // The loop keeps serving after bad input.
    let still_alive = h.send(r#"{"cmd":"CreateBid"}"#).await;
    assert_eq!(still_alive["status"], "Err");
}

#[tokio::test]
async fn test_shutdown_answers_ok_and_exits() {
    let mut h = Headless::spawn(&missing_keypair(), &[]);
    h.next_json().await;

    let reply = h.send(r#"{"cmd":"Shutdown"}"#).await;
    assert_eq!(reply["status"], "Ok");

    let status = tokio::time::timeout(LINE_TIMEOUT, h.child.wait())
        .await
        .expect("headless did not exit")
        .unwrap();
    assert!(status.success());
}

#[tokio::test]
async fn test_keypair_flag_connects_wallet() {
    let keypair = Keypair::new();
    let path = std::env::temp_dir().join(format!("market-headless-{}.json", keypair.pubkey()));
    write_keypair_file(&keypair, &path).unwrap();

    let mut h = Headless::spawn(&missing_keypair(), &["--keypair", path.to_str().unwrap()]);
    let ready = h.next_json().await;
    let _ = std::fs::remove_file(&path);

    assert_eq!(ready["wallet"], keypair.pubkey().to_string());
}

#[tokio::test]
async fn test_keypair_flag_without_path_fails_startup() {
    let mut h = Headless::spawn(&missing_keypair(), &["--keypair"]);

    let line = tokio::time::timeout(LINE_TIMEOUT, h.stdout.next_line())
        .await
        .expect("headless did not exit")
        .unwrap();
    assert!(line.is_none());

    let status = h.child.wait().await.unwrap();
    assert!(!status.success());
}
