use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signature};
use solana_sdk::signer::Signer;
use tracing::{debug, info};

use crate::error::{MarketError, MarketResult};
use crate::marketplace::PendingTransaction;
use crate::provider::ProviderOptions;
use crate::traits::{ChainConnection, WalletAdapter};

/// Wallet that signs with a local keypair file, as the Solana CLI does.
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn from_file(path: &Path) -> MarketResult<Self> {
        let keypair = read_keypair_file(path).map_err(|e| {
            MarketError::Wallet(format!("Failed to read keypair {}: {e}", path.display()))
        })?;
        info!("Loaded wallet {} from {}", keypair.pubkey(), path.display());
        Ok(Self { keypair })
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl WalletAdapter for KeypairWallet {
    fn public_key(&self) -> Option<Pubkey> {
        Some(self.keypair.pubkey())
    }

    async fn send_transaction(
        &self,
        transaction: PendingTransaction,
        connection: &dyn ChainConnection,
        options: &ProviderOptions,
    ) -> Result<Signature> {
        let blockhash = connection.latest_blockhash().await?;
        let signed = transaction.sign(&self.keypair, blockhash)?;
        debug!(
            "Signed transaction with {} instruction(s) for {}",
            transaction.len(),
            connection.endpoint()
        );
        connection.send_and_confirm(&signed, options).await
    }
}
