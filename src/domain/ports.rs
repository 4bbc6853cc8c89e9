use super::payment::{PaymentBatch, SubmissionReceipt};
use super::schedule::{ContractId, OutstandingBalance};
use crate::error::Result;
use async_trait::async_trait;

/// Supplies what is still owed on a rental contract.
#[async_trait]
pub trait ObligationSource: Send + Sync {
    /// Returns `None` when the contract is unknown to the source.
    async fn outstanding(&self, contract: &ContractId) -> Result<Option<OutstandingBalance>>;
}

/// Accepts a payment batch as a single submission.
#[async_trait]
pub trait PaymentSink: Send + Sync {
    async fn submit(&self, batch: PaymentBatch) -> Result<SubmissionReceipt>;
}

pub type ObligationSourceBox = Box<dyn ObligationSource>;
pub type PaymentSinkBox = Box<dyn PaymentSink>;
