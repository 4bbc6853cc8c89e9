use super::money::{DueAmount, Money};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of an obligation, unique within one allocation call.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObligationId(String);

impl ObligationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObligationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObligationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    RentInstallment,
    Fee,
}

impl fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObligationKind::RentInstallment => f.write_str("rent_installment"),
            ObligationKind::Fee => f.write_str("fee"),
        }
    }
}

/// The fee catalog a rental contract can carry on top of its rent.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    Platform,
    Water,
    Office,
}

impl FeeType {
    fn slug(&self) -> &'static str {
        match self {
            FeeType::Platform => "platform",
            FeeType::Water => "water",
            FeeType::Office => "office",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            FeeType::Platform => "Platform",
            FeeType::Water => "Water",
            FeeType::Office => "Office",
        }
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FeeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "platform" => Ok(FeeType::Platform),
            "water" => Ok(FeeType::Water),
            "office" => Ok(FeeType::Office),
            other => Err(format!("unknown fee type '{other}'")),
        }
    }
}

/// Something owed on a contract that a payment may be applied to.
///
/// The label is carried through for payment notes only and never takes part in
/// the allocation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Obligation {
    pub id: ObligationId,
    pub kind: ObligationKind,
    pub label: String,
    pub due: DueAmount,
}

impl Obligation {
    pub fn new(
        id: impl Into<ObligationId>,
        kind: ObligationKind,
        label: impl Into<String>,
        due: DueAmount,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            due,
        }
    }

    pub fn installment(sequence: u32, due: DueAmount) -> Self {
        Self::new(
            ObligationId::new(format!("installment-{sequence}")),
            ObligationKind::RentInstallment,
            format!("Installment #{sequence}"),
            due,
        )
    }

    pub fn fee(fee: FeeType, due: DueAmount) -> Self {
        Self::new(
            ObligationId::new(format!("fee-{}", fee.slug())),
            ObligationKind::Fee,
            format!("{} Fee", fee.title()),
            due,
        )
    }

    pub fn due_money(&self) -> Money {
        self.due.money()
    }
}

impl From<String> for ObligationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
