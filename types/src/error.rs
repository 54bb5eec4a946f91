//! Errors raised while constructing or parsing shared types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid account identity: {0:?}")]
    InvalidAccount(String),

    #[error("invalid token amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: &'static str },

    #[error("invalid token parameters: {0}")]
    InvalidParams(String),
}
