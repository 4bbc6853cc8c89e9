use crate::domain::payment::{PaymentBatch, SubmissionReceipt};
use crate::domain::ports::{ObligationSource, PaymentSink};
use crate::domain::schedule::{ContractId, OutstandingBalance};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory payment schedule, keyed by contract.
///
/// Uses `Arc<RwLock<HashMap<ContractId, OutstandingBalance>>>` so clones share
/// the same schedule.
#[derive(Default, Clone)]
pub struct InMemoryObligationSource {
    balances: Arc<RwLock<HashMap<ContractId, OutstandingBalance>>>,
}

impl InMemoryObligationSource {
    /// Creates a new, empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was recorded for the balance's contract.
    pub async fn insert(&self, balance: OutstandingBalance) {
        let mut balances = self.balances.write().await;
        balances.insert(balance.contract.clone(), balance);
    }
}

impl From<Vec<OutstandingBalance>> for InMemoryObligationSource {
    fn from(balances: Vec<OutstandingBalance>) -> Self {
        let map = balances
            .into_iter()
            .map(|b| (b.contract.clone(), b))
            .collect();
        Self {
            balances: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl ObligationSource for InMemoryObligationSource {
    async fn outstanding(&self, contract: &ContractId) -> Result<Option<OutstandingBalance>> {
        let balances = self.balances.read().await;
        Ok(balances.get(contract).cloned())
    }
}

/// A thread-safe in-memory collection endpoint.
///
/// Keeps every submitted batch in arrival order; batch ids start at 1.
#[derive(Default, Clone)]
pub struct InMemoryPaymentSink {
    batches: Arc<RwLock<Vec<PaymentBatch>>>,
}

impl InMemoryPaymentSink {
    /// Creates a new, empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn batches(&self) -> Vec<PaymentBatch> {
        self.batches.read().await.clone()
    }
}

#[async_trait]
impl PaymentSink for InMemoryPaymentSink {
    async fn submit(&self, batch: PaymentBatch) -> Result<SubmissionReceipt> {
        let mut batches = self.batches.write().await;
        let records = batch.records.len();
        batches.push(batch);
        Ok(SubmissionReceipt {
            batch_id: batches.len() as u64,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::domain::obligation::FeeType;
    use crate::domain::payment::PaymentMethod;
    use crate::domain::schedule::FeeDue;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_in_memory_obligation_source() {
        let source = InMemoryObligationSource::new();
        let mut balance = OutstandingBalance::new(ContractId::new("C-1"));
        balance.fees.push(FeeDue {
            fee: FeeType::Platform,
            remaining: Money::new(dec!(25)),
        });

        source.insert(balance.clone()).await;
        let retrieved = source
            .outstanding(&ContractId::new("C-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved, balance);

        assert!(
            source
                .outstanding(&ContractId::new("C-2"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_in_memory_payment_sink_assigns_sequential_ids() {
        let sink = InMemoryPaymentSink::new();
        let batch = PaymentBatch {
            contract: ContractId::new("C-1"),
            method: PaymentMethod::Card,
            paid_on: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            reference: None,
            notes: None,
            receipt: None,
            records: Vec::new(),
        };

        let first = sink.submit(batch.clone()).await.unwrap();
        let second = sink.submit(batch).await.unwrap();
        assert_eq!(first.batch_id, 1);
        assert_eq!(second.batch_id, 2);
        assert_eq!(sink.batches().await.len(), 2);
    }
}
