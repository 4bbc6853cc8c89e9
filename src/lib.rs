pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::allocator::allocate;
pub use domain::allocation::{AllocationLine, AllocationRequest, AllocationResult, Settlement};
pub use domain::money::{DueAmount, Money};
pub use domain::obligation::{Obligation, ObligationId, ObligationKind};
pub use error::{AllocationError, PaymentError};
