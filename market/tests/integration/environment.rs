//! Process-environment configuration. These mutate global env vars, so they
//! run serially.

use market::config::{
    MARKET_BID_EXPIRY_SECS_ENV, MARKET_CLUSTER_ENV, MARKET_RPC_URL_ENV, MARKET_SDK_CMD_ENV,
};
use market::{Cluster, MarketConfig, MarketError};
use serial_test::serial;

const VARS: [&str; 4] = [
    MARKET_CLUSTER_ENV,
    MARKET_RPC_URL_ENV,
    MARKET_BID_EXPIRY_SECS_ENV,
    MARKET_SDK_CMD_ENV,
];

fn clear() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_reads_overrides() {
    clear();
    std::env::set_var(MARKET_CLUSTER_ENV, "localnet");
    std::env::set_var(MARKET_BID_EXPIRY_SECS_ENV, "86400");
    std::env::set_var(MARKET_SDK_CMD_ENV, "node ix.js");

    let config = MarketConfig::from_env().unwrap();
    clear();

    assert_eq!(config.cluster, Cluster::Localnet);
    assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
    assert_eq!(config.bid_policy.expiry_secs, Some(86_400));
    assert_eq!(config.sdk_command, vec!["node".to_string(), "ix.js".to_string()]);
}

#[test]
#[serial]
fn test_from_env_rejects_zero_expiry() {
    clear();
    std::env::set_var(MARKET_BID_EXPIRY_SECS_ENV, "0");

    let result = MarketConfig::from_env();
    clear();

    assert!(matches!(result, Err(MarketError::Config(_))));
}

#[test]
#[serial]
fn test_from_env_without_vars_is_default() {
    clear();
    let config = MarketConfig::from_env().unwrap();
    assert_eq!(config.cluster, Cluster::Devnet);
    assert_eq!(config.rpc_url, Cluster::Devnet.default_rpc_url());
}
