//! Marketplace SDK hosted in a sidecar process.
//!
//! The SDK ships as a JavaScript package, so it runs out of process. Each
//! SDK call spawns the configured command, writes one JSON request line to
//! its stdin and reads one JSON reply from its stdout: either an
//! `InstructionPayload` or `{"error": "..."}`.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::{MarketConfig, MAX_SDK_OUTPUT_BYTES, SDK_REAP_TIMEOUT_SECS};
use crate::error::{MarketError, MarketResult};
use crate::marketplace::{InstructionPayload, SdkRequest};
use crate::provider::Provider;
use crate::traits::{BidInstructions, ListingInstructions, MarketplaceSdk};
use crate::util::json_from_limited_slice;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SidecarEnvelope<'a> {
    rpc_url: String,
    commitment: CommitmentLevel,
    preflight_commitment: CommitmentLevel,
    skip_preflight: bool,
    payer: String,
    request: &'a SdkRequest,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SidecarReply {
    Instruction(InstructionPayload),
    Error { error: String },
}

/// How to launch the SDK process.
#[derive(Debug, Clone)]
pub struct SdkSidecar {
    program: String,
    args: Vec<String>,
    timeout_secs: u64,
}

impl SdkSidecar {
    pub fn new(command: &[String], timeout_secs: u64) -> MarketResult<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| MarketError::Config("SDK command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout_secs,
        })
    }

    /// Run one request for `provider` and return the instruction.
    pub async fn request(&self, provider: &Provider, request: &SdkRequest) -> MarketResult<Instruction> {
        let payer = provider.payer()?;
        let options = provider.options();
        let envelope = SidecarEnvelope {
            rpc_url: provider.connection().endpoint(),
            commitment: options.commitment.commitment,
            preflight_commitment: options.preflight_commitment.commitment,
            skip_preflight: options.skip_preflight,
            payer: payer.to_string(),
            request,
        };
        let mut line = serde_json::to_vec(&envelope)?;
        line.push(b'\n');

        info!("SDK {} via {}", request.action(), self.program);
        let output = self.spawn(&line).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("SDK sidecar exited with {}: {}", output.status, stderr.trim());
            return Err(MarketError::Sdk(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        match json_from_limited_slice::<SidecarReply>(&output.stdout, MAX_SDK_OUTPUT_BYTES)? {
            SidecarReply::Error { error } => Err(MarketError::Sdk(error)),
            SidecarReply::Instruction(payload) => {
                let ix = Instruction::try_from(payload)?;
                if let Some(foreign) = ix
                    .accounts
                    .iter()
                    .find(|meta| meta.is_signer && meta.pubkey != payer)
                {
                    return Err(MarketError::Validation(format!(
                        "SDK instruction requires signer {} that the wallet cannot provide",
                        foreign.pubkey
                    )));
                }
                debug!(
                    "SDK returned instruction for program {} with {} account(s)",
                    ix.program_id,
                    ix.accounts.len()
                );
                Ok(ix)
            }
        }
    }

    async fn spawn(&self, input: &[u8]) -> MarketResult<std::process::Output> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MarketError::Process(format!("Failed to spawn {}: {e}", self.program)))?;

        // A sidecar that exits without reading is reported through its
        // exit status, not as a write error.
        {
            let mut stdin = child.stdin.take().ok_or_else(|| {
                MarketError::Process(format!("Failed to open stdin pipe to {}", self.program))
            })?;
            if let Err(e) = stdin.write_all(input).await {
                warn!("Failed to write SDK request to {}: {}", self.program, e);
            }
        }

        let stdout_pipe = child.stdout.take().ok_or_else(|| {
            MarketError::Process(format!("stdout pipe not available on {}", self.program))
        })?;
        let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
            MarketError::Process(format!("stderr pipe not available on {}", self.program))
        })?;

        // One byte over the limit is enough for the size check to trip.
        let limit = u64::try_from(MAX_SDK_OUTPUT_BYTES).unwrap_or(u64::MAX) + 1;
        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = stdout_pipe.take(limit).read_to_end(&mut buf).await {
                warn!("Failed to read SDK sidecar stdout: {}", e);
            }
            buf
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = stderr_pipe.read_to_end(&mut buf).await {
                warn!("Failed to read SDK sidecar stderr: {}", e);
            }
            buf
        });

        match tokio::time::timeout(Duration::from_secs(self.timeout_secs), child.wait()).await {
            Ok(Ok(status)) => Ok(std::process::Output {
                status,
                stdout: stdout_task.await.unwrap_or_default(),
                stderr: stderr_task.await.unwrap_or_default(),
            }),
            Ok(Err(e)) => Err(MarketError::Process(format!(
                "Failed to wait for {}: {e}",
                self.program
            ))),
            Err(_) => {
                let _ = child.kill().await;
                match tokio::time::timeout(
                    Duration::from_secs(SDK_REAP_TIMEOUT_SECS),
                    child.wait(),
                )
                .await
                {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => error!("Failed to reap SDK sidecar: {}", e),
                    Err(_) => error!("Timeout waiting for SDK sidecar to exit after kill"),
                }
                Err(MarketError::Timeout(format!(
                    "SDK sidecar {} did not answer within {} seconds",
                    self.program, self.timeout_secs
                )))
            }
        }
    }
}

/// `MarketplaceSdk` backed by an `SdkSidecar`.
#[derive(Debug, Clone)]
pub struct SidecarSdk {
    sidecar: Arc<SdkSidecar>,
}

impl SidecarSdk {
    pub fn new(sidecar: SdkSidecar) -> Self {
        Self {
            sidecar: Arc::new(sidecar),
        }
    }

    pub fn from_config(config: &MarketConfig) -> MarketResult<Self> {
        Ok(Self::new(SdkSidecar::new(
            &config.sdk_command,
            config.sdk_timeout_secs,
        )?))
    }
}

impl MarketplaceSdk for SidecarSdk {
    fn bid_client(&self, provider: Arc<Provider>) -> Arc<dyn BidInstructions> {
        Arc::new(SidecarClient {
            sidecar: self.sidecar.clone(),
            provider,
        })
    }

    fn listing_client(&self, provider: Arc<Provider>) -> Arc<dyn ListingInstructions> {
        Arc::new(SidecarClient {
            sidecar: self.sidecar.clone(),
            provider,
        })
    }
}

struct SidecarClient {
    sidecar: Arc<SdkSidecar>,
    provider: Arc<Provider>,
}

impl SidecarClient {
    async fn call(&self, request: SdkRequest) -> Result<Instruction> {
        Ok(self.sidecar.request(&self.provider, &request).await?)
    }
}

#[async_trait]
impl BidInstructions for SidecarClient {
    async fn place_bid(
        &self,
        asset: &Pubkey,
        amount_lamports: u64,
        expiry_ts: i64,
    ) -> Result<Instruction> {
        self.call(SdkRequest::PlaceBid {
            asset: asset.to_string(),
            amount: amount_lamports,
            expiry_ts,
        })
        .await
    }

    async fn delete_bid(&self, asset: &Pubkey) -> Result<Instruction> {
        self.call(SdkRequest::DeleteBid {
            asset: asset.to_string(),
        })
        .await
    }
}

#[async_trait]
impl ListingInstructions for SidecarClient {
    async fn create_listing(&self, asset: &Pubkey, quantity: u64) -> Result<Instruction> {
        self.call(SdkRequest::CreateListing {
            asset: asset.to_string(),
            quantity,
        })
        .await
    }

    async fn delete_listing(&self, asset: &Pubkey) -> Result<Instruction> {
        self.call(SdkRequest::DeleteListing {
            asset: asset.to_string(),
        })
        .await
    }
}
