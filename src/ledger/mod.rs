//! Shared storage port: watermark, L1 dedup, and capture staging — all
//! backed by one SQLite connection.
//!
//! A real table rather than an append-only log, since the ledger must
//! answer `json_extract` predicates against prior rows and survive as a
//! permanent record rather than a disposable queue.

mod schema;
mod store;

pub use store::{Ledger, LedgerError};
