//! Network connection abstraction.

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::provider::ProviderOptions;

/// Abstraction over a cluster RPC connection.
///
/// Used for reads and for submitting already-signed transactions.
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// RPC endpoint this connection talks to.
    fn endpoint(&self) -> String;

    /// Fetch a recent blockhash for signing.
    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Submit a signed transaction with the preflight settings in `options`
    /// and wait until it reaches `options.commitment`.
    async fn send_and_confirm(
        &self,
        transaction: &Transaction,
        options: &ProviderOptions,
    ) -> Result<Signature>;

    /// Ask the cluster faucet for `lamports`.
    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature>;

    /// Lamport balance of `key`.
    async fn balance(&self, key: &Pubkey) -> Result<u64>;
}
