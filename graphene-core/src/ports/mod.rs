//! Ports - trait definitions for external collaborators

pub mod transfer;

pub use transfer::{TransferProvider, TransferReceipt};
