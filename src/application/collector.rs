use super::allocator::allocate;
use crate::domain::allocation::{AllocationRequest, AllocationResult};
use crate::domain::money::Money;
use crate::domain::obligation::{Obligation, ObligationId};
use crate::domain::payment::{PaymentBatch, PaymentDetails, SubmissionReceipt};
use crate::domain::ports::{ObligationSourceBox, PaymentSinkBox};
use crate::domain::schedule::ContractId;
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

/// A user's request to pay against one contract.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub contract: ContractId,
    pub tendered: Money,
    /// Obligations to apply the payment to; `None` selects everything outstanding.
    pub selected: Option<Vec<ObligationId>>,
    pub forced_full: Vec<ObligationId>,
    pub paid_on: NaiveDate,
    pub details: PaymentDetails,
}

impl PaymentIntent {
    pub fn new(contract: ContractId, tendered: Money, paid_on: NaiveDate) -> Self {
        Self {
            contract,
            tendered,
            selected: None,
            forced_full: Vec::new(),
            paid_on,
            details: PaymentDetails::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionOutcome {
    /// The obligations the payment was allocated over, in schedule order.
    pub obligations: Vec<Obligation>,
    pub allocation: AllocationResult,
    pub batch: PaymentBatch,
    pub receipt: SubmissionReceipt,
}

/// Turns a payment intent into a submitted payment batch.
///
/// `PaymentCollector` owns the obligation source and the payment sink. One call
/// to [`PaymentCollector::collect`] reads the contract's outstanding balance,
/// allocates the tendered amount and submits every paid line in a single batch.
pub struct PaymentCollector {
    source: ObligationSourceBox,
    sink: PaymentSinkBox,
}

impl PaymentCollector {
    /// Creates a new `PaymentCollector` instance.
    ///
    /// # Arguments
    ///
    /// * `source` - Where outstanding installments and fees come from.
    /// * `sink` - Where payment batches are submitted.
    pub fn new(source: ObligationSourceBox, sink: PaymentSinkBox) -> Self {
        Self { source, sink }
    }

    /// Resolves the obligations an intent applies to, in schedule order.
    pub async fn obligations_for(&self, intent: &PaymentIntent) -> Result<Vec<Obligation>> {
        let balance = self
            .source
            .outstanding(&intent.contract)
            .await?
            .ok_or_else(|| PaymentError::ContractNotFound(intent.contract.to_string()))?;
        let outstanding = balance.obligations()?;

        match &intent.selected {
            None => Ok(outstanding),
            Some(selected) => {
                if let Some(missing) = selected
                    .iter()
                    .find(|id| !outstanding.iter().any(|o| &o.id == *id))
                {
                    return Err(PaymentError::UnknownObligation(missing.clone()));
                }
                Ok(outstanding
                    .into_iter()
                    .filter(|o| selected.contains(&o.id))
                    .collect())
            }
        }
    }

    /// Allocates the intent's amount and submits the resulting batch.
    ///
    /// Nothing is submitted when the allocation is rejected.
    pub async fn collect(&self, intent: PaymentIntent) -> Result<CollectionOutcome> {
        let obligations = self.obligations_for(&intent).await?;
        debug!(
            contract = %intent.contract,
            obligations = obligations.len(),
            "resolved obligations"
        );

        let request = AllocationRequest::new(intent.tendered, obligations)
            .with_forced_full(intent.forced_full);
        let allocation = allocate(&request)?;

        let batch = PaymentBatch::from_allocation(
            intent.contract,
            intent.paid_on,
            intent.details,
            &request.obligations,
            &allocation,
        );
        let receipt = self.sink.submit(batch.clone()).await?;
        info!(
            contract = %batch.contract,
            batch_id = receipt.batch_id,
            records = receipt.records,
            amount = %batch.total(),
            unallocated = %allocation.unallocated_remainder,
            "payment submitted"
        );

        Ok(CollectionOutcome {
            obligations: request.obligations,
            allocation,
            batch,
            receipt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::Settlement;
    use crate::domain::obligation::FeeType;
    use crate::domain::payment::PaymentMethod;
    use crate::domain::schedule::{FeeDue, InstallmentDue, OutstandingBalance};
    use crate::error::AllocationError;
    use crate::infrastructure::in_memory::{InMemoryObligationSource, InMemoryPaymentSink};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, 1).unwrap()
    }

    fn balance() -> OutstandingBalance {
        OutstandingBalance {
            contract: ContractId::new("C-100"),
            installments: vec![
                InstallmentDue {
                    sequence: 1,
                    due_date: date(1),
                    remaining: Money::ZERO,
                },
                InstallmentDue {
                    sequence: 2,
                    due_date: date(2),
                    remaining: Money::new(dec!(500)),
                },
                InstallmentDue {
                    sequence: 3,
                    due_date: date(3),
                    remaining: Money::new(dec!(500)),
                },
            ],
            fees: vec![FeeDue {
                fee: FeeType::Water,
                remaining: Money::new(dec!(100)),
            }],
        }
    }

    fn intent_for(contract: &str, tendered: Decimal) -> PaymentIntent {
        PaymentIntent::new(ContractId::new(contract), Money::new(tendered), date(10))
    }

    fn collector() -> (PaymentCollector, InMemoryPaymentSink) {
        let sink = InMemoryPaymentSink::new();
        let collector = PaymentCollector::new(
            Box::new(InMemoryObligationSource::from(vec![balance()])),
            Box::new(sink.clone()),
        );
        (collector, sink)
    }

    #[tokio::test]
    async fn test_collect_submits_paid_lines_once() {
        let (collector, sink) = collector();
        let mut intent = intent_for("C-100", dec!(250));
        intent.details.method = PaymentMethod::BankTransfer;

        let outcome = collector.collect(intent).await.unwrap();

        assert_eq!(outcome.allocation.lines.len(), 3);
        assert_eq!(outcome.batch.records.len(), 3);
        assert_eq!(outcome.batch.total(), Money::new(dec!(250)));
        assert_eq!(outcome.batch.records[0].note, "Installment #2 (partial)");
        assert_eq!(outcome.batch.records[2].note, "Water Fee");
        assert_eq!(outcome.receipt.batch_id, 1);

        let submitted = sink.batches().await;
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].method, PaymentMethod::BankTransfer);
    }

    #[tokio::test]
    async fn test_collect_respects_selection_and_forced_lines() {
        let (collector, _) = collector();
        let mut intent = intent_for("C-100", dec!(520));
        intent.selected = Some(vec![
            ObligationId::new("installment-3"),
            ObligationId::new("fee-water"),
        ]);
        intent.forced_full = vec![ObligationId::new("installment-3")];

        let outcome = collector.collect(intent).await.unwrap();
        let allocation = &outcome.allocation;

        assert_eq!(allocation.lines.len(), 2);
        let rent = allocation.line(&ObligationId::new("installment-3")).unwrap();
        assert_eq!(rent.settlement, Settlement::Full);
        let water = allocation.line(&ObligationId::new("fee-water")).unwrap();
        assert_eq!(water.allocated, Money::new(dec!(20)));
        assert_eq!(water.settlement, Settlement::Partial);
    }

    #[tokio::test]
    async fn test_overpayment_reports_remainder() {
        let (collector, _) = collector();
        let intent = intent_for("C-100", dec!(1200));

        let outcome = collector.collect(intent).await.unwrap();
        assert_eq!(outcome.allocation.unallocated_remainder, Money::new(dec!(100)));
        assert_eq!(outcome.batch.total(), Money::new(dec!(1100)));
    }

    #[tokio::test]
    async fn test_rejected_allocation_submits_nothing() {
        let (collector, sink) = collector();
        let mut intent = intent_for("C-100", dec!(300));
        intent.forced_full = vec![ObligationId::new("installment-2")];

        let result = collector.collect(intent).await;
        assert!(matches!(
            result,
            Err(PaymentError::AllocationError(
                AllocationError::InsufficientFundsForForcedItems { .. }
            ))
        ));
        assert!(sink.batches().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_contract_and_selection() {
        let (collector, _) = collector();

        let intent = intent_for("C-404", dec!(10));
        assert!(matches!(
            collector.collect(intent).await,
            Err(PaymentError::ContractNotFound(_))
        ));

        // A settled installment is no longer selectable.
        let mut intent = intent_for("C-100", dec!(10));
        intent.selected = Some(vec![ObligationId::new("installment-1")]);
        assert!(matches!(
            collector.collect(intent).await,
            Err(PaymentError::UnknownObligation(_))
        ));
    }
}
