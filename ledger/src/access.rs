//! Owner-gated operations.
//!
//! A single guard, [`TokenLedger::ensure_owner`], runs before any write in
//! each protected operation. Unauthorized calls are rejected outright.

use kutta_types::AccountId;

use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::ledger::TokenLedger;

impl TokenLedger {
    /// Reject `caller` unless it is the current owner.
    pub fn ensure_owner(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if *caller != self.owner {
            return Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    pub fn is_owner(&self, account: &AccountId) -> bool {
        *account == self.owner
    }

    /// Replace the block reward divisor. Owner only; the divisor must be positive.
    pub fn set_block_reward_divisor(
        &mut self,
        caller: &AccountId,
        divisor: u128,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        let previous = self.reward.set_divisor(divisor)?;
        self.events.emit(LedgerEvent::BlockRewardDivisorChanged {
            previous,
            current: divisor,
        });
        tracing::info!(previous, current = divisor, "block reward divisor changed");
        Ok(())
    }

    /// Hand ownership to `new_owner`. Owner only.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: &AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        let previous = std::mem::replace(&mut self.owner, new_owner.clone());
        self.events.emit(LedgerEvent::OwnershipTransferred {
            previous: previous.clone(),
            current: new_owner.clone(),
        });
        tracing::info!(previous = %previous, current = %new_owner, "ownership transferred");
        Ok(())
    }
}
