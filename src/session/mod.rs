//! Session history records supplied by the caller.

pub mod types;

pub use types::{mean, most_recent, PrModality, QuantityUnit, Round, Session};
