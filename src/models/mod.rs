#[cfg(test)]
mod tests;
mod transaction;

pub use transaction::{Payment, Transaction, TransactionKind};

/// Store-assigned document identifier. Opaque to this code.
pub type TransactionId = String;
