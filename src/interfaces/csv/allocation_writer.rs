use crate::domain::allocation::AllocationResult;
use crate::domain::obligation::Obligation;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AllocationRow<'a> {
    obligation: &'a str,
    kind: String,
    label: &'a str,
    due: String,
    allocated: String,
    settlement: String,
}

/// Writes allocation lines as CSV, one row per obligation, followed by an
/// `unallocated` row carrying the cash left over.
pub struct AllocationWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AllocationWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// `obligations` must be the ones the allocation was computed from.
    pub fn write_allocation(
        &mut self,
        obligations: &[Obligation],
        allocation: &AllocationResult,
    ) -> Result<()> {
        for (obligation, line) in obligations.iter().zip(&allocation.lines) {
            self.writer.serialize(AllocationRow {
                obligation: line.obligation_id.as_str(),
                kind: line.kind.to_string(),
                label: &obligation.label,
                due: obligation.due_money().to_string(),
                allocated: line.allocated.to_string(),
                settlement: line.settlement.to_string(),
            })?;
        }
        self.writer.serialize(AllocationRow {
            obligation: "unallocated",
            kind: String::new(),
            label: "",
            due: String::new(),
            allocated: allocation.unallocated_remainder.to_string(),
            settlement: String::new(),
        })?;
        self.writer.flush()?;
        Ok(())
    }
}
