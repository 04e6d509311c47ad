//! Utility functions shared across the marketplace crate.

use serde::de::DeserializeOwned;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::signature::Signature;

use crate::config::Cluster;
use crate::error::{MarketError, MarketResult};

const EXPLORER_BASE_URL: &str = "https://explorer.solana.com";

/// Explorer link for a transaction signature on `cluster`.
///
/// `rpc_url` is only used for localnet, where the explorer needs to be told
/// which endpoint to query.
pub fn explorer_tx_url(signature: &Signature, cluster: Cluster, rpc_url: &str) -> String {
    match cluster {
        Cluster::MainnetBeta => format!("{EXPLORER_BASE_URL}/tx/{signature}"),
        Cluster::Localnet => format!(
            "{EXPLORER_BASE_URL}/tx/{signature}?cluster=custom&customUrl={}",
            encode_query_value(rpc_url)
        ),
        other => format!("{EXPLORER_BASE_URL}/tx/{signature}?cluster={}", other.name()),
    }
}

fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Render lamports as SOL with full precision, e.g. `1.5 SOL`.
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let frac = lamports % LAMPORTS_PER_SOL;
    if frac == 0 {
        return format!("{whole} SOL");
    }
    let frac = format!("{frac:09}");
    format!("{whole}.{} SOL", frac.trim_end_matches('0'))
}

/// Deserialize JSON with a size limit to reject runaway output.
pub fn json_from_limited_slice<T: DeserializeOwned>(
    data: &[u8],
    max_bytes: usize,
) -> MarketResult<T> {
    if data.len() > max_bytes {
        return Err(MarketError::Validation(format!(
            "JSON payload too large: {} bytes (max {})",
            data.len(),
            max_bytes
        )));
    }
    serde_json::from_slice(data)
        .map_err(|e| MarketError::Serialization(format!("JSON deserialization failed: {e}")))
}
