//! Configuration constants for the marketplace console.
//!
//! This module centralizes magic numbers, environment variable names and the
//! runtime `MarketConfig` so both binaries resolve settings the same way.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;

use crate::error::{MarketError, MarketResult};
use crate::provider::ProviderOptions;

/// Mint of the asset every action operates on.
pub const DEFAULT_ASSET_MINT: &str = "E3nQYNBhTu7F2idxy5zceAFh5YMKXU6Uo3oeSeebhcWC";

/// Bids expire this many calendar years after submission unless a fixed
/// window is configured.
pub const BID_EXPIRY_YEARS: i32 = 1;

/// Bid amount placed by the create-bid action.
pub const DEFAULT_BID_LAMPORTS: u64 = LAMPORTS_PER_SOL;

/// Quantity listed by the create-listing action.
pub const DEFAULT_LISTING_QUANTITY: u64 = 1;

/// Amount requested by the airdrop helper.
pub const AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL;

/// Interval between transaction confirmation polls.
pub const CONFIRM_POLL_MS: u64 = 500;

/// Maximum confirmation polls before giving up.
pub const CONFIRM_MAX_POLLS: u32 = 60;

/// Maximum time the SDK sidecar may take to answer one request.
pub const SDK_TIMEOUT_SECS: u64 = 30;

/// Time to wait for a killed SDK sidecar to exit.
pub const SDK_REAP_TIMEOUT_SECS: u64 = 5;

/// Upper bound on the JSON an SDK sidecar may print.
pub const MAX_SDK_OUTPUT_BYTES: usize = 64 * 1024;

/// Default command used to run the SDK sidecar.
pub const DEFAULT_SDK_COMMAND: &str = "soundwork-ix";

/// Environment variable selecting the cluster (`devnet`, `testnet`, `mainnet-beta`, `localnet`).
pub const MARKET_CLUSTER_ENV: &str = "MARKET_CLUSTER";

/// Environment variable overriding the cluster's RPC URL.
pub const MARKET_RPC_URL_ENV: &str = "MARKET_RPC_URL";

/// Environment variable pointing at the wallet keypair file.
pub const MARKET_KEYPAIR_ENV: &str = "MARKET_KEYPAIR";

/// Environment variable overriding the asset mint.
pub const MARKET_ASSET_MINT_ENV: &str = "MARKET_ASSET_MINT";

/// Environment variable overriding the bid expiry window in seconds.
pub const MARKET_BID_EXPIRY_SECS_ENV: &str = "MARKET_BID_EXPIRY_SECS";

/// Environment variable disabling simulation before submission (`true`/`false`).
pub const MARKET_SKIP_PREFLIGHT_ENV: &str = "MARKET_SKIP_PREFLIGHT";

/// Environment variable overriding the SDK sidecar command line.
pub const MARKET_SDK_CMD_ENV: &str = "MARKET_SDK_CMD";

/// Network the console talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
}

impl Cluster {
    /// Public RPC endpoint for this cluster.
    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Name used in the `cluster` query parameter of explorer links.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::MainnetBeta => "mainnet-beta",
            Self::Localnet => "localnet",
        }
    }

    /// Whether the cluster hands out free airdrops.
    pub const fn supports_airdrop(self) -> bool {
        !matches!(self, Self::MainnetBeta)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cluster {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Self::Devnet),
            "testnet" => Ok(Self::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Self::MainnetBeta),
            "localnet" | "localhost" => Ok(Self::Localnet),
            other => Err(MarketError::Config(format!("Unknown cluster '{other}'"))),
        }
    }
}

/// Amount and lifetime of the bid placed by the create-bid action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidPolicy {
    pub amount_lamports: u64,
    /// Fixed expiry window. `None` means the same UTC date and time
    /// `BID_EXPIRY_YEARS` later.
    pub expiry_secs: Option<u64>,
}

impl Default for BidPolicy {
    fn default() -> Self {
        Self {
            amount_lamports: DEFAULT_BID_LAMPORTS,
            expiry_secs: None,
        }
    }
}

impl BidPolicy {
    /// Unix timestamp at which a bid placed at `now` expires.
    pub fn expiry_timestamp(&self, now: u64) -> i64 {
        match self.expiry_secs {
            Some(secs) => i64::try_from(now.saturating_add(secs)).unwrap_or(i64::MAX),
            None => add_calendar_years(i64::try_from(now).unwrap_or(i64::MAX), BID_EXPIRY_YEARS),
        }
    }
}

/// Shift a Unix timestamp by whole calendar years in UTC.
///
/// Feb 29 rolls over to Mar 1 when the target year has no leap day.
fn add_calendar_years(ts: i64, years: i32) -> i64 {
    let Some(start) = DateTime::<Utc>::from_timestamp(ts, 0) else {
        return i64::MAX;
    };
    let target = start.year().saturating_add(years);
    start
        .with_year(target)
        .or_else(|| (start + TimeDelta::days(1)).with_year(target))
        .map_or(i64::MAX, |t| t.timestamp())
}

/// Runtime configuration shared by the desktop and headless binaries.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub cluster: Cluster,
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    pub keypair_path: PathBuf,
    pub asset_mint: Pubkey,
    pub bid_policy: BidPolicy,
    pub listing_quantity: u64,
    pub skip_preflight: bool,
    /// Program plus arguments of the SDK sidecar.
    pub sdk_command: Vec<String>,
    pub sdk_timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        let cluster = Cluster::default();
        Self {
            cluster,
            rpc_url: cluster.default_rpc_url().to_string(),
            commitment: CommitmentConfig::confirmed(),
            keypair_path: default_keypair_path(),
            asset_mint: default_asset_mint(),
            bid_policy: BidPolicy::default(),
            listing_quantity: DEFAULT_LISTING_QUANTITY,
            skip_preflight: false,
            sdk_command: vec![DEFAULT_SDK_COMMAND.to_string()],
            sdk_timeout_secs: SDK_TIMEOUT_SECS,
        }
    }
}

impl MarketConfig {
    /// Resolve the configuration from `MARKET_*` environment variables.
    pub fn from_env() -> MarketResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> MarketResult<Self> {
        let mut config = Self::default();

        if let Some(cluster) = lookup(MARKET_CLUSTER_ENV) {
            config.cluster = cluster.parse()?;
            config.rpc_url = config.cluster.default_rpc_url().to_string();
        }
        if let Some(url) = lookup(MARKET_RPC_URL_ENV).filter(|s| !s.trim().is_empty()) {
            config.rpc_url = url.trim().to_string();
        }
        if let Some(path) = lookup(MARKET_KEYPAIR_ENV) {
            config.keypair_path = PathBuf::from(path);
        }
        if let Some(mint) = lookup(MARKET_ASSET_MINT_ENV) {
            config.asset_mint = Pubkey::from_str(mint.trim()).map_err(|e| {
                MarketError::Config(format!("{MARKET_ASSET_MINT_ENV} is not a valid pubkey: {e}"))
            })?;
        }
        if let Some(secs) = lookup(MARKET_BID_EXPIRY_SECS_ENV) {
            let expiry_secs: u64 = secs.trim().parse().map_err(|e| {
                MarketError::Config(format!("{MARKET_BID_EXPIRY_SECS_ENV} must be seconds: {e}"))
            })?;
            if expiry_secs == 0 {
                return Err(MarketError::Config(format!(
                    "{MARKET_BID_EXPIRY_SECS_ENV} must be greater than zero"
                )));
            }
            config.bid_policy.expiry_secs = Some(expiry_secs);
        }
        if let Some(flag) = lookup(MARKET_SKIP_PREFLIGHT_ENV) {
            config.skip_preflight = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => {
                    return Err(MarketError::Config(format!(
                        "{MARKET_SKIP_PREFLIGHT_ENV} must be true or false, got '{other}'"
                    )))
                }
            };
        }
        if let Some(cmd) = lookup(MARKET_SDK_CMD_ENV) {
            let parts: Vec<String> = cmd.split_whitespace().map(str::to_string).collect();
            if parts.is_empty() {
                return Err(MarketError::Config(format!("{MARKET_SDK_CMD_ENV} is empty")));
            }
            config.sdk_command = parts;
        }

        Ok(config)
    }

    /// Submission options handed to every provider.
    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            skip_preflight: self.skip_preflight,
            ..ProviderOptions::default()
        }
    }
}

/// The asset mint baked into the console.
pub fn default_asset_mint() -> Pubkey {
    // Compile-time constant, always valid base58.
    Pubkey::from_str(DEFAULT_ASSET_MINT).unwrap_or_default()
}

/// `~/.config/solana/id.json`, the Solana CLI's default keypair location.
pub fn default_keypair_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("solana")
        .join("id.json")
}
