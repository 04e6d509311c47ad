//! Mock RPC connection for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tokio::sync::RwLock;

use crate::provider::ProviderOptions;
use crate::traits::ChainConnection;

#[derive(Debug)]
struct MockConnectionInner {
    endpoint: String,
    blockhash: Hash,
    submitted: RwLock<Vec<Transaction>>,
    submitted_options: RwLock<Vec<ProviderOptions>>,
    airdrops: RwLock<Vec<(Pubkey, u64)>>,
    balances: RwLock<HashMap<Pubkey, u64>>,
    fail_sends: AtomicBool,
    airdrop_counter: AtomicU64,
}

/// In-memory connection that accepts every signed transaction.
///
/// Submitted transactions are checked for a complete set of signatures and
/// kept for inspection. Airdrops credit the in-memory balance.
#[derive(Debug, Clone)]
pub struct MockConnection {
    inner: Arc<MockConnectionInner>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::with_endpoint("http://mock.invalid:8899")
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            inner: Arc::new(MockConnectionInner {
                endpoint: endpoint.to_string(),
                blockhash: Hash::new_unique(),
                submitted: RwLock::new(Vec::new()),
                submitted_options: RwLock::new(Vec::new()),
                airdrops: RwLock::new(Vec::new()),
                balances: RwLock::new(HashMap::new()),
                fail_sends: AtomicBool::new(false),
                airdrop_counter: AtomicU64::new(1),
            }),
        }
    }

    /// Blockhash handed out by `latest_blockhash`.
    pub fn blockhash(&self) -> Hash {
        self.inner.blockhash
    }

    /// Make `send_and_confirm` fail, as a dropped or rejected submission would.
    pub fn set_fail_sends(&self, fail: bool) {
        self.inner.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub async fn submitted(&self) -> Vec<Transaction> {
        self.inner.submitted.read().await.clone()
    }

    pub async fn submitted_count(&self) -> usize {
        self.inner.submitted.read().await.len()
    }

    /// Send options of each accepted submission, in order.
    pub async fn submitted_options(&self) -> Vec<ProviderOptions> {
        self.inner.submitted_options.read().await.clone()
    }

    pub async fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.inner.airdrops.read().await.clone()
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainConnection for MockConnection {
    fn endpoint(&self) -> String {
        self.inner.endpoint.clone()
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.inner.blockhash)
    }

    async fn send_and_confirm(
        &self,
        transaction: &Transaction,
        options: &ProviderOptions,
    ) -> Result<Signature> {
        if self.inner.fail_sends.load(Ordering::SeqCst) {
            bail!("Mock connection: send failure");
        }
        if !transaction.is_signed() {
            bail!("Mock connection: transaction is missing signatures");
        }
        if transaction.message.recent_blockhash != self.inner.blockhash {
            bail!("Mock connection: blockhash not found");
        }
        self.inner.submitted.write().await.push(transaction.clone());
        self.inner.submitted_options.write().await.push(*options);
        Ok(transaction.signatures[0])
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature> {
        let n = self.inner.airdrop_counter.fetch_add(1, Ordering::SeqCst);
        self.inner.airdrops.write().await.push((*to, lamports));
        *self.inner.balances.write().await.entry(*to).or_insert(0) += lamports;

        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&n.to_le_bytes());
        Ok(Signature::from(bytes))
    }

    async fn balance(&self, key: &Pubkey) -> Result<u64> {
        Ok(self
            .inner
            .balances
            .read()
            .await
            .get(key)
            .copied()
            .unwrap_or(0))
    }
}
