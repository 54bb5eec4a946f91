//! Genesis: creating a ledger.
//!
//! The creator becomes the owner and receives the entire initial supply. The
//! cap, the reward ceiling and the token metadata are fixed from this point on.

use kutta_types::{AccountId, TokenParams};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::TokenLedger;

/// Configuration for creating a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// The creating account; becomes the owner.
    pub owner: AccountId,
    pub params: TokenParams,
}

impl GenesisConfig {
    /// Genesis with the KuttaKoin launch parameters.
    pub fn kutta(owner: AccountId) -> Self {
        Self {
            owner,
            params: TokenParams::kutta_defaults(),
        }
    }
}

/// Create a ledger, validating the parameters first.
pub fn create_ledger(config: &GenesisConfig) -> Result<TokenLedger, LedgerError> {
    let ledger = TokenLedger::from_genesis(config.owner.clone(), config.params.clone())?;
    tracing::info!(
        name = ledger.name(),
        symbol = ledger.symbol(),
        owner = %ledger.owner(),
        cap = %ledger.cap(),
        total_supply = %ledger.total_supply(),
        divisor = ledger.block_reward_divisor(),
        "ledger created"
    );
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LedgerEvent;
    use kutta_types::{TokenAmount, TypeError};

    #[test]
    fn genesis_credits_owner() {
        let owner = AccountId::new("creator");
        let ledger = create_ledger(&GenesisConfig::kutta(owner.clone())).unwrap();

        assert_eq!(ledger.owner(), &owner);
        assert_eq!(ledger.total_supply(), TokenAmount::from_tokens(15_084_700));
        assert_eq!(ledger.balance_of(&owner), ledger.total_supply());
        assert_eq!(ledger.cap(), TokenAmount::from_tokens(150_847_000));
        assert_eq!(ledger.name(), "KuttaKoin");
        assert_eq!(ledger.symbol(), "KUTTA");
        assert_eq!(ledger.decimals(), 18);
        assert_eq!(
            ledger.events(),
            &[LedgerEvent::Transfer {
                from: None,
                to: owner,
                amount: TokenAmount::from_tokens(15_084_700),
            }]
        );
    }

    #[test]
    fn genesis_with_zero_initial_supply_records_nothing() {
        let mut config = GenesisConfig::kutta(AccountId::new("creator"));
        config.params.initial_supply = TokenAmount::ZERO;
        let ledger = create_ledger(&config).unwrap();
        assert!(ledger.total_supply().is_zero());
        assert!(ledger.events().is_empty());
        assert_eq!(ledger.holder_count(), 0);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut config = GenesisConfig::kutta(AccountId::new("creator"));
        config.params.initial_block_reward_divisor = 0;
        let err = create_ledger(&config).unwrap_err();
        assert!(matches!(err, LedgerError::Params(TypeError::InvalidParams(_))));
    }
}
