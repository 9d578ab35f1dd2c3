//! Mock transfer provider for testing and demo mode
//!
//! Simulates the blockchain RPC client without touching the network.
//! Transfers either succeed with a synthetic signature or fail outright,
//! depending on configuration; sent transfers are recorded for assertions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::ports::{TransferProvider, TransferReceipt};

/// In-memory transfer provider
pub struct MockTransferProvider {
    fail_transfers: bool,
    counter: AtomicU64,
    sent: Mutex<Vec<(String, i64)>>,
}

impl MockTransferProvider {
    /// Provider where every transfer succeeds
    pub fn new() -> Self {
        Self {
            fail_transfers: false,
            counter: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Provider where every transfer is rejected
    pub fn failing() -> Self {
        Self {
            fail_transfers: true,
            counter: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Transfers confirmed so far, as (wallet, amount) pairs
    pub fn sent(&self) -> Vec<(String, i64)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockTransferProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferProvider for MockTransferProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn transfer(&self, wallet: &str, amount: i64) -> Result<TransferReceipt> {
        if self.fail_transfers {
            return Err(Error::Transfer("transfer rejected by RPC node".to_string()));
        }

        let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent.lock().unwrap().push((wallet.to_string(), amount));

        Ok(TransferReceipt {
            signature: format!("mock_sig_{:08}", seq),
            slot: 1000 + seq,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_transfer_recorded() {
        let provider = MockTransferProvider::new();
        let receipt = provider.transfer("wallet-1", 500).unwrap();
        assert!(receipt.signature.starts_with("mock_sig_"));
        assert_eq!(provider.sent(), vec![("wallet-1".to_string(), 500)]);
    }

    #[test]
    fn test_failing_provider_records_nothing() {
        let provider = MockTransferProvider::failing();
        assert!(provider.transfer("wallet-1", 500).is_err());
        assert!(provider.sent().is_empty());
    }

    #[test]
    fn test_signatures_are_unique() {
        let provider = MockTransferProvider::new();
        let a = provider.transfer("w", 1).unwrap();
        let b = provider.transfer("w", 1).unwrap();
        assert_ne!(a.signature, b.signature);
    }
}
