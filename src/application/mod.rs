//! Application layer: the allocation engine and the collection flow around it.
//!
//! [`allocator::allocate`] is a pure function over the domain types.
//! [`collector::PaymentCollector`] wires it between an obligation source and a
//! payment sink.

pub mod allocator;
pub mod collector;
