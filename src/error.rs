use crate::domain::money::Money;
use crate::domain::obligation::ObligationId;
use miette::Diagnostic;
use thiserror::Error;

/// Validation failures raised by the allocation engine before any computation.
///
/// All of them are user-correctable, so each carries a help line the caller can
/// render next to the message.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("nothing to pay: the tendered amount is zero")]
    #[diagnostic(
        code(allocation::empty_payment),
        help("enter an amount or select a line to pay in full")
    )]
    EmptyPayment,
    #[error("no obligations selected")]
    #[diagnostic(
        code(allocation::no_obligations),
        help("select at least one installment or fee")
    )]
    NoObligationsSelected,
    #[error("obligation {0} is selected more than once")]
    #[diagnostic(code(allocation::duplicate_obligation))]
    DuplicateObligationId(ObligationId),
    #[error("obligation {0} is marked to be paid in full but is not selected")]
    #[diagnostic(
        code(allocation::unknown_forced_id),
        help("select the obligation or remove its pay-in-full mark")
    )]
    UnknownForcedId(ObligationId),
    #[error("tendered {tendered} does not cover the {required} required by lines marked to be paid in full")]
    #[diagnostic(
        code(allocation::insufficient_funds),
        help("raise the amount or unmark some of the pay-in-full lines")
    )]
    InsufficientFundsForForcedItems { tendered: Money, required: Money },
    #[error("the selected amounts are too large to add up")]
    #[diagnostic(code(allocation::amount_overflow))]
    AmountOverflow,
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Allocation error: {0}")]
    AllocationError(#[from] AllocationError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Contract not found: {0}")]
    ContractNotFound(String),
    #[error("Obligation {0} is not outstanding on this contract")]
    UnknownObligation(ObligationId),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
