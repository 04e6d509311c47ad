//! Mock wallet adapter for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use tokio::sync::RwLock;

use crate::error::MarketError;
use crate::marketplace::PendingTransaction;
use crate::provider::ProviderOptions;
use crate::traits::{ChainConnection, WalletAdapter};

/// A `send_transaction` call as the wallet saw it.
#[derive(Debug, Clone)]
pub struct SentTransaction {
    pub transaction: PendingTransaction,
    /// Address of the connection object the wallet was handed.
    pub connection_addr: usize,
    pub endpoint: String,
}

struct MockWalletInner {
    keypair: Keypair,
    connected: AtomicBool,
    sent: RwLock<Vec<SentTransaction>>,
    reject_with: RwLock<Option<String>>,
}

/// Wallet backed by a throwaway keypair that signs whatever it is given,
/// unless told to reject like a user dismissing the prompt.
#[derive(Clone)]
pub struct MockWallet {
    inner: Arc<MockWalletInner>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockWalletInner {
                keypair: Keypair::new(),
                connected: AtomicBool::new(true),
                sent: RwLock::new(Vec::new()),
                reject_with: RwLock::new(None),
            }),
        }
    }

    /// A wallet that has not been connected yet.
    pub fn disconnected() -> Self {
        let wallet = Self::new();
        wallet.set_connected(false);
        wallet
    }

    pub fn pubkey(&self) -> Pubkey {
        self.inner.keypair.pubkey()
    }

    pub fn set_connected(&self, connected: bool) {
        self.inner.connected.store(connected, Ordering::SeqCst);
    }

    /// Reject every following request with `reason`; `None` to accept again.
    pub async fn set_reject(&self, reason: Option<&str>) {
        *self.inner.reject_with.write().await = reason.map(str::to_string);
    }

    pub async fn sent(&self) -> Vec<SentTransaction> {
        self.inner.sent.read().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.inner.sent.read().await.len()
    }
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletAdapter for MockWallet {
    fn public_key(&self) -> Option<Pubkey> {
        self.inner
            .connected
            .load(Ordering::SeqCst)
            .then(|| self.inner.keypair.pubkey())
    }

    async fn send_transaction(
        &self,
        transaction: PendingTransaction,
        connection: &dyn ChainConnection,
        options: &ProviderOptions,
    ) -> Result<Signature> {
        if !self.inner.connected.load(Ordering::SeqCst) {
            return Err(MarketError::WalletNotConnected.into());
        }

        let connection_addr = std::ptr::from_ref(connection).cast::<()>() as usize;
        self.inner.sent.write().await.push(SentTransaction {
            transaction: transaction.clone(),
            connection_addr,
            endpoint: connection.endpoint(),
        });

        if let Some(reason) = self.inner.reject_with.read().await.clone() {
            bail!("{reason}");
        }

        let blockhash = connection.latest_blockhash().await?;
        let signed = transaction.sign(&self.inner.keypair, blockhash)?;
        connection.send_and_confirm(&signed, options).await
    }
}
