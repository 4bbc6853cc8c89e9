use super::money::{DueAmount, Money};
use super::obligation::{FeeType, Obligation};
use crate::error::PaymentError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct InstallmentDue {
    pub sequence: u32,
    pub due_date: NaiveDate,
    pub remaining: Money,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct FeeDue {
    pub fee: FeeType,
    pub remaining: Money,
}

/// What is still owed on a rental contract, as reported by the payment schedule.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OutstandingBalance {
    pub contract: ContractId,
    pub installments: Vec<InstallmentDue>,
    pub fees: Vec<FeeDue>,
}

impl OutstandingBalance {
    pub fn new(contract: ContractId) -> Self {
        Self {
            contract,
            installments: Vec::new(),
            fees: Vec::new(),
        }
    }

    pub fn total(&self) -> Money {
        self.installments
            .iter()
            .map(|i| i.remaining)
            .chain(self.fees.iter().map(|f| f.remaining))
            .sum()
    }

    /// Maps the schedule to obligations: installments by sequence, then fees.
    ///
    /// Settled entries (nothing remaining) are left out. A negative remaining
    /// amount, or an installment sequence or fee listed twice, is a schedule error.
    pub fn obligations(&self) -> Result<Vec<Obligation>, PaymentError> {
        let mut installments: Vec<&InstallmentDue> = self.installments.iter().collect();
        installments.sort_by_key(|i| i.sequence);
        if let Some(pair) = installments.windows(2).find(|w| w[0].sequence == w[1].sequence) {
            return Err(PaymentError::ValidationError(format!(
                "installment #{} is listed twice on contract {}",
                pair[0].sequence, self.contract
            )));
        }
        let mut fees = HashSet::new();
        if let Some(dup) = self.fees.iter().find(|f| !fees.insert(f.fee)) {
            return Err(PaymentError::ValidationError(format!(
                "{} fee is listed twice on contract {}",
                dup.fee, self.contract
            )));
        }

        let mut obligations = Vec::new();
        for installment in installments {
            let label = format!("installment #{}", installment.sequence);
            if let Some(due) = self.due(installment.remaining, &label)? {
                obligations.push(Obligation::installment(installment.sequence, due));
            }
        }
        for fee in &self.fees {
            if let Some(due) = self.due(fee.remaining, &format!("{} fee", fee.fee))? {
                obligations.push(Obligation::fee(fee.fee, due));
            }
        }
        Ok(obligations)
    }

    fn due(&self, remaining: Money, item: &str) -> Result<Option<DueAmount>, PaymentError> {
        if remaining == Money::ZERO {
            return Ok(None);
        }
        if !remaining.is_positive() {
            return Err(PaymentError::ValidationError(format!(
                "negative remaining amount {remaining} for {item} on contract {}",
                self.contract
            )));
        }
        DueAmount::new(remaining.value()).map(Some)
    }
}
