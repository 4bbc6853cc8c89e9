use crate::domain::money::Money;
use crate::domain::obligation::FeeType;
use crate::domain::schedule::{ContractId, FeeDue, InstallmentDue, OutstandingBalance};
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Installment,
    Fee,
}

/// One raw row of a payment schedule export.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ScheduleRow {
    pub contract: String,
    pub kind: RowKind,
    /// Installment sequence number or fee type.
    pub item: String,
    pub due_date: Option<NaiveDate>,
    pub remaining: Decimal,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ScheduleItem {
    Installment(InstallmentDue),
    Fee(FeeDue),
}

/// A validated schedule row.
#[derive(Debug, PartialEq, Clone)]
pub struct ScheduleEntry {
    pub contract: ContractId,
    pub item: ScheduleItem,
}

impl TryFrom<ScheduleRow> for ScheduleEntry {
    type Error = PaymentError;

    fn try_from(row: ScheduleRow) -> Result<Self> {
        if row.remaining < Decimal::ZERO {
            return Err(PaymentError::ValidationError(format!(
                "negative remaining amount {} for {} on contract {}",
                row.remaining, row.item, row.contract
            )));
        }
        let remaining = Money::new(row.remaining);

        let item = match row.kind {
            RowKind::Installment => {
                let sequence = row.item.parse::<u32>().map_err(|_| {
                    PaymentError::ValidationError(format!(
                        "installment sequence '{}' is not a number",
                        row.item
                    ))
                })?;
                let due_date = row.due_date.ok_or_else(|| {
                    PaymentError::ValidationError(format!(
                        "installment #{sequence} has no due date"
                    ))
                })?;
                ScheduleItem::Installment(InstallmentDue {
                    sequence,
                    due_date,
                    remaining,
                })
            }
            RowKind::Fee => {
                let fee = row
                    .item
                    .parse::<FeeType>()
                    .map_err(PaymentError::ValidationError)?;
                ScheduleItem::Fee(FeeDue { fee, remaining })
            }
        };

        Ok(Self {
            contract: ContractId::new(row.contract),
            item,
        })
    }
}

/// Reads payment schedule entries from a CSV source.
///
/// Expects the columns `contract, kind, item, due_date, remaining`. Whitespace is
/// trimmed and rows may omit trailing empty fields.
pub struct ScheduleReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ScheduleReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates entries.
    ///
    /// A bad row yields an error without ending the iteration.
    pub fn entries(self) -> impl Iterator<Item = Result<ScheduleEntry>> {
        self.reader.into_deserialize::<ScheduleRow>().map(|result| {
            let row = result?;
            ScheduleEntry::try_from(row)
        })
    }
}

/// Outstanding balances assembled from schedule entries, one per contract.
#[derive(Debug, Default)]
pub struct ScheduleBook {
    balances: BTreeMap<ContractId, OutstandingBalance>,
}

impl ScheduleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry to its contract's balance.
    ///
    /// An installment sequence or fee already recorded for the contract is
    /// rejected and leaves the balance untouched.
    pub fn insert(&mut self, entry: ScheduleEntry) -> Result<()> {
        let balance = self
            .balances
            .entry(entry.contract.clone())
            .or_insert_with(|| OutstandingBalance::new(entry.contract.clone()));
        match entry.item {
            ScheduleItem::Installment(installment) => {
                if balance
                    .installments
                    .iter()
                    .any(|i| i.sequence == installment.sequence)
                {
                    return Err(PaymentError::ValidationError(format!(
                        "duplicate row for installment #{} on contract {}",
                        installment.sequence, entry.contract
                    )));
                }
                balance.installments.push(installment);
            }
            ScheduleItem::Fee(fee) => {
                if balance.fees.iter().any(|f| f.fee == fee.fee) {
                    return Err(PaymentError::ValidationError(format!(
                        "duplicate row for {} fee on contract {}",
                        fee.fee, entry.contract
                    )));
                }
                balance.fees.push(fee);
            }
        }
        Ok(())
    }

    /// The balances, ordered by contract id.
    pub fn into_balances(self) -> Vec<OutstandingBalance> {
        self.balances.into_values().collect()
    }
}
