//! Wire shapes exchanged with the marketplace SDK.
//!
//! Requests are named after the SDK methods (`createListing`, `placeBid`, ...)
//! and instructions come back in the SDK's own JSON layout: base58 keys and
//! base64 instruction data.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use crate::error::MarketError;
use crate::marketplace::MarketAction;

/// One SDK call, tagged by method name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum SdkRequest {
    CreateListing {
        asset: String,
        quantity: u64,
    },
    DeleteListing {
        asset: String,
    },
    PlaceBid {
        asset: String,
        amount: u64,
        #[serde(rename = "expiryTs")]
        expiry_ts: i64,
    },
    DeleteBid {
        asset: String,
    },
}

impl SdkRequest {
    /// The console action this request belongs to.
    pub const fn action(&self) -> MarketAction {
        match self {
            Self::CreateListing { .. } => MarketAction::CreateListing,
            Self::DeleteListing { .. } => MarketAction::DeleteListing,
            Self::PlaceBid { .. } => MarketAction::CreateBid,
            Self::DeleteBid { .. } => MarketAction::DeleteBid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetaPayload {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// An unsigned instruction as printed by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionPayload {
    pub program_id: String,
    pub keys: Vec<AccountMetaPayload>,
    /// Base64 (standard alphabet, padded).
    pub data: String,
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, MarketError> {
    Pubkey::from_str(value)
        .map_err(|e| MarketError::Serialization(format!("Invalid {field} '{value}': {e}")))
}

impl TryFrom<InstructionPayload> for Instruction {
    type Error = MarketError;

    fn try_from(payload: InstructionPayload) -> Result<Self, Self::Error> {
        let program_id = parse_pubkey("programId", &payload.program_id)?;
        let accounts = payload
            .keys
            .iter()
            .map(|meta| {
                let pubkey = parse_pubkey("account key", &meta.pubkey)?;
                Ok(if meta.is_writable {
                    AccountMeta::new(pubkey, meta.is_signer)
                } else {
                    AccountMeta::new_readonly(pubkey, meta.is_signer)
                })
            })
            .collect::<Result<Vec<_>, MarketError>>()?;
        let data = data_encoding::BASE64
            .decode(payload.data.as_bytes())
            .map_err(|e| MarketError::Serialization(format!("Invalid instruction data: {e}")))?;

        Ok(Self {
            program_id,
            accounts,
            data,
        })
    }
}

impl From<&Instruction> for InstructionPayload {
    fn from(ix: &Instruction) -> Self {
        Self {
            program_id: ix.program_id.to_string(),
            keys: ix
                .accounts
                .iter()
                .map(|meta| AccountMetaPayload {
                    pubkey: meta.pubkey.to_string(),
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data: data_encoding::BASE64.encode(&ix.data),
        }
    }
}
