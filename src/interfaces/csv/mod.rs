//! CSV adapters: payment schedule exports in, allocation reports out.

pub mod allocation_writer;
pub mod schedule_reader;
