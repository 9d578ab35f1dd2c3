//! Distribution service - token airdrops and purchases
//!
//! The only writer to account balances. Orchestrates the external transfer
//! provider and the account store: tokens are credited strictly after the
//! provider confirms the on-chain transfer, so a failed transfer leaves the
//! balance untouched (no partial credit).

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::ports::TransferProvider;
use crate::services::store::AccountStore;

/// Distribution service for airdrop/purchase credits
pub struct DistributionService {
    store: Arc<AccountStore>,
    provider: Arc<dyn TransferProvider>,
}

impl DistributionService {
    pub fn new(store: Arc<AccountStore>, provider: Arc<dyn TransferProvider>) -> Self {
        Self { store, provider }
    }

    /// Airdrop `amount` tokens to the user identified by `external_id`.
    ///
    /// Creates the account if this is the user's first interaction. The
    /// provider call happens before any balance write; if it fails, the
    /// error propagates and the stored balance is unchanged.
    pub fn airdrop(&self, external_id: &str, wallet: &str, amount: i64) -> Result<DistributionResult> {
        if amount <= 0 {
            return Err(Error::invalid_input("distribution amount must be positive"));
        }
        if wallet.trim().is_empty() {
            return Err(Error::invalid_input("wallet address cannot be empty"));
        }

        let account = self.store.get_or_create(external_id)?;
        let receipt = self.provider.transfer(wallet.trim(), amount)?;
        let account = self.store.credit(account.id, amount)?;

        Ok(DistributionResult {
            account_id: account.id,
            provider: self.provider.name().to_string(),
            signature: receipt.signature,
            amount,
            new_balance: account.balance,
        })
    }
}

/// Outcome of a completed distribution
#[derive(Debug, Serialize)]
pub struct DistributionResult {
    pub account_id: Uuid,
    pub provider: String,
    pub signature: String,
    pub amount: i64,
    pub new_balance: i64,
}
