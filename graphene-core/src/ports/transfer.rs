//! Token transfer provider port
//!
//! Defines the interface to the external blockchain RPC client that moves
//! tokens on-chain. The store itself never talks to the network; the
//! DistributionService uses this trait and credits an account only after a
//! confirmed receipt comes back.

use crate::domain::result::Result;

/// Confirmation of a completed on-chain transfer
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    /// Transaction signature reported by the RPC client
    pub signature: String,
    /// Chain slot/block the transfer was confirmed in
    pub slot: u64,
}

/// Token transfer provider trait
///
/// Implementations submit a transfer and block until it is confirmed or
/// rejected. A returned error means no tokens moved.
pub trait TransferProvider: Send + Sync {
    /// Provider name (e.g. "solana", "mock")
    fn name(&self) -> &str;

    /// Transfer `amount` tokens to `wallet`, returning the confirmation
    fn transfer(&self, wallet: &str, amount: i64) -> Result<TransferReceipt>;
}
