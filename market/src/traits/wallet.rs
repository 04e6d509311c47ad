//! Wallet adapter abstraction.

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::marketplace::PendingTransaction;
use crate::provider::ProviderOptions;
use crate::traits::ChainConnection;

/// Abstraction over a connected wallet.
///
/// The wallet owns the signing key: it picks the fee payer and blockhash,
/// signs, and submits through the connection it is handed.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Public key of the connected account, or `None` while disconnected.
    fn public_key(&self) -> Option<Pubkey>;

    fn is_connected(&self) -> bool {
        self.public_key().is_some()
    }

    /// Sign `transaction` and send it through `connection` with `options`.
    ///
    /// Returns once the connection reports the transaction confirmed.
    async fn send_transaction(
        &self,
        transaction: PendingTransaction,
        connection: &dyn ChainConnection,
        options: &ProviderOptions,
    ) -> Result<Signature>;
}
