//! Fundamental types for the KuttaKoin ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identities, base-unit amounts, token parameters, and type-level errors.

pub mod address;
pub mod amount;
pub mod error;
pub mod params;

pub use address::AccountId;
pub use amount::{TokenAmount, TOKEN_DECIMALS, TOKEN_UNIT};
pub use error::TypeError;
pub use params::TokenParams;
