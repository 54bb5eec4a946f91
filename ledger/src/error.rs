use kutta_types::{AccountId, TokenAmount, TypeError};
use thiserror::Error;

/// Reasons a ledger operation is rejected.
///
/// Every variant is returned before the ledger is touched, so a rejected
/// operation always leaves balances, supply, allowances and parameters as
/// they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance in {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("mint of {requested} exceeds cap headroom of {headroom}")]
    CapExceeded {
        requested: TokenAmount,
        headroom: TokenAmount,
    },

    #[error("{caller} is not the ledger owner")]
    Unauthorized { caller: AccountId },

    #[error("block reward divisor must be positive")]
    InvalidDivisor,

    #[error("insufficient allowance for {spender} on {owner}: need {needed}, have {available}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("arithmetic overflow in ledger accounting")]
    Overflow,

    #[error(transparent)]
    Params(#[from] TypeError),
}
