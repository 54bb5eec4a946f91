//! Shared utilities for the KuttaKoin ledger.

pub mod logging;

pub use logging::{init_logging, LogFormat};
