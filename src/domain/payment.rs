use super::allocation::{AllocationResult, Settlement};
use super::money::Money;
use super::obligation::{Obligation, ObligationId, ObligationKind};
use super::schedule::ContractId;
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    BankTransfer,
    Card,
    Cheque,
}

/// One line of a submitted payment: money applied to a single obligation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRecord {
    pub obligation_reference: ObligationId,
    pub kind: ObligationKind,
    pub amount: Money,
    pub note: String,
}

/// Everything sent to the collection endpoint for one payment, in a single request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentBatch {
    pub contract: ContractId,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    pub reference: Option<String>,
    pub notes: Option<String>,
    /// Reference to an uploaded receipt, if any.
    pub receipt: Option<String>,
    pub records: Vec<PaymentRecord>,
}

/// Payment metadata that travels with the batch but plays no part in the allocation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub receipt: Option<String>,
}

impl PaymentBatch {
    /// Builds the batch from every allocation line that receives money.
    ///
    /// `obligations` supplies the labels used for the record notes.
    pub fn from_allocation(
        contract: ContractId,
        paid_on: NaiveDate,
        details: PaymentDetails,
        obligations: &[Obligation],
        allocation: &AllocationResult,
    ) -> Self {
        let records = allocation
            .paid_lines()
            .map(|line| {
                let label = obligations
                    .iter()
                    .find(|o| o.id == line.obligation_id)
                    .map(|o| o.label.as_str())
                    .unwrap_or_else(|| line.obligation_id.as_str());
                let note = match line.settlement {
                    Settlement::Partial => format!("{label} (partial)"),
                    _ => label.to_string(),
                };
                PaymentRecord {
                    obligation_reference: line.obligation_id.clone(),
                    kind: line.kind,
                    amount: line.allocated,
                    note,
                }
            })
            .collect();

        Self {
            contract,
            method: details.method,
            paid_on,
            reference: details.reference,
            notes: details.notes,
            receipt: details.receipt,
            records,
        }
    }

    pub fn total(&self) -> Money {
        self.records.iter().map(|r| r.amount).sum()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct SubmissionReceipt {
    pub batch_id: u64,
    pub records: usize,
}
