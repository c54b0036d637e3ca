//! Transfer engine: the single code path that mutates balances

pub mod engine;
pub mod error;
pub mod types;

pub use engine::TransferEngine;
pub use error::TransferError;
pub use types::{TransferCommand, TransferFlow, TransferOutcome, TransferResult};
