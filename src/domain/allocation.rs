use super::money::Money;
use super::obligation::{Obligation, ObligationId, ObligationKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The parameters of one allocation call.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AllocationRequest {
    pub tendered: Money,
    pub obligations: Vec<Obligation>,
    /// Obligations the caller insists are paid in full. Treated as a set.
    #[serde(default)]
    pub forced_full: Vec<ObligationId>,
}

impl AllocationRequest {
    pub fn new(tendered: Money, obligations: Vec<Obligation>) -> Self {
        Self {
            tendered,
            obligations,
            forced_full: Vec::new(),
        }
    }

    pub fn with_forced_full(mut self, ids: impl IntoIterator<Item = ObligationId>) -> Self {
        self.forced_full.extend(ids);
        self
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Settlement {
    Full,
    Partial,
    Unpaid,
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Settlement::Full => f.write_str("full"),
            Settlement::Partial => f.write_str("partial"),
            Settlement::Unpaid => f.write_str("unpaid"),
        }
    }
}

/// One obligation's share of the tendered amount.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AllocationLine {
    pub obligation_id: ObligationId,
    pub kind: ObligationKind,
    pub allocated: Money,
    pub settlement: Settlement,
}

/// The outcome of one allocation call.
///
/// `lines` follows the input order of the obligations, one line each, and
/// `total_allocated() + unallocated_remainder` always equals the tendered amount.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AllocationResult {
    pub lines: Vec<AllocationLine>,
    pub unallocated_remainder: Money,
}

impl AllocationResult {
    pub fn total_allocated(&self) -> Money {
        self.lines.iter().map(|l| l.allocated).sum()
    }

    pub fn line(&self, id: &ObligationId) -> Option<&AllocationLine> {
        self.lines.iter().find(|l| &l.obligation_id == id)
    }

    /// Lines that actually receive money.
    pub fn paid_lines(&self) -> impl Iterator<Item = &AllocationLine> {
        self.lines.iter().filter(|l| l.allocated.is_positive())
    }
}
