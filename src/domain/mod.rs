//! Domain layer: the value objects of a payment against a rental contract and
//! the ports through which obligations come in and payments go out.

pub mod allocation;
pub mod money;
pub mod obligation;
pub mod payment;
pub mod ports;
pub mod schedule;
