use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info, warn};

use crate::config::{MarketConfig, CONFIRM_MAX_POLLS, CONFIRM_POLL_MS};
use crate::error::MarketError;
use crate::provider::ProviderOptions;
use crate::traits::ChainConnection;

/// RPC send settings for one submission.
fn send_config(options: &ProviderOptions) -> RpcSendTransactionConfig {
    RpcSendTransactionConfig {
        skip_preflight: options.skip_preflight,
        preflight_commitment: Some(options.preflight_commitment.commitment),
        ..RpcSendTransactionConfig::default()
    }
}

/// JSON-RPC connection to a cluster.
pub struct RpcConnection {
    client: RpcClient,
}

impl RpcConnection {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        info!("Connecting to RPC endpoint {}", rpc_url);
        Self {
            client: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
        }
    }

    pub fn from_config(config: &MarketConfig) -> Self {
        Self::new(&config.rpc_url, config.commitment)
    }

    /// Poll until `signature` reaches `commitment`.
    async fn wait_for_confirmation(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<()> {
        for attempt in 1..=CONFIRM_MAX_POLLS {
            let confirmed = self
                .client
                .confirm_transaction_with_commitment(signature, commitment)
                .await
                .map_err(|e| MarketError::Rpc(format!("confirmTransaction failed: {e}")))?
                .value;
            if confirmed {
                debug!("Transaction {} confirmed after {} polls", signature, attempt);
                return Ok(());
            }
            if attempt % 10 == 0 {
                warn!(
                    "Still waiting for {} ({attempt}/{CONFIRM_MAX_POLLS})",
                    signature
                );
            }
            tokio::time::sleep(Duration::from_millis(CONFIRM_POLL_MS)).await;
        }
        Err(MarketError::Timeout(format!("Transaction {signature} was not confirmed")).into())
    }
}

#[async_trait]
impl ChainConnection for RpcConnection {
    fn endpoint(&self) -> String {
        self.client.url()
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        let hash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| MarketError::Rpc(format!("getLatestBlockhash failed: {e}")))?;
        Ok(hash)
    }

    async fn send_and_confirm(
        &self,
        transaction: &Transaction,
        options: &ProviderOptions,
    ) -> Result<Signature> {
        let signature = self
            .client
            .send_transaction_with_config(transaction, send_config(options))
            .await
            .map_err(|e| MarketError::Rpc(format!("sendTransaction failed: {e}")))?;
        self.wait_for_confirmation(&signature, options.commitment)
            .await?;
        Ok(signature)
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature> {
        let signature = self
            .client
            .request_airdrop(to, lamports)
            .await
            .map_err(|e| MarketError::Rpc(format!("requestAirdrop failed: {e}")))?;
        self.wait_for_confirmation(&signature, self.client.commitment())
            .await?;
        Ok(signature)
    }

    async fn balance(&self, key: &Pubkey) -> Result<u64> {
        let lamports = self
            .client
            .get_balance(key)
            .await
            .map_err(|e| MarketError::Rpc(format!("getBalance failed: {e}")))?;
        Ok(lamports)
    }
}
