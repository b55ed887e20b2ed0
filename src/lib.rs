//! Duplicate-transaction reconciliation for a gas-cylinder retail ledger.
//!
//! The engine groups point-of-sale records that share gas type, quantity and
//! payment method within a fixed time window, keeps the earliest record of
//! each group, and either filters the rest out of a listing or deletes them
//! from the backing repository in one atomic batch. The bundled CLI runs the
//! same operations over a transaction CSV.

pub mod engine;
pub mod models;
pub mod storage;
