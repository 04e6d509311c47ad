use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

use crate::error::{MarketError, MarketResult};

/// An ordered bundle of unsigned instructions waiting for a wallet.
///
/// The wallet decides the fee payer and recent blockhash at submission
/// time, so nothing here is compiled into a message until it signs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingTransaction {
    instructions: Vec<Instruction>,
}

impl PendingTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction; instructions execute in insertion order.
    pub fn add(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Program ids touched by this transaction, in instruction order.
    pub fn program_ids(&self) -> Vec<Pubkey> {
        self.instructions.iter().map(|ix| ix.program_id).collect()
    }

    /// Compile and sign with `payer` as fee payer.
    pub fn sign(&self, payer: &Keypair, recent_blockhash: Hash) -> MarketResult<Transaction> {
        if self.instructions.is_empty() {
            return Err(MarketError::Validation(
                "Refusing to sign a transaction without instructions".to_string(),
            ));
        }
        let mut tx = Transaction::new_with_payer(&self.instructions, Some(&payer.pubkey()));
        tx.try_sign(&[payer], recent_blockhash)
            .map_err(|e| MarketError::Wallet(format!("Signing failed: {e}")))?;
        Ok(tx)
    }
}
