//! Block reward computation.
//!
//! Every successful transfer mints a small reward to its initiator:
//!
//! `reward = min((cap − total_supply) / divisor, max_block_reward)`
//!
//! Raising the divisor shrinks the reward; as supply approaches the cap the
//! headroom shrinks toward zero, so issuance decays on its own even with a
//! small divisor. The fixed ceiling bounds the reward when the divisor is set
//! very low.

use kutta_types::TokenAmount;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Reward for one transfer given the current supply position.
///
/// Integer division truncates. A zero divisor yields no reward rather than a
/// division fault; [`RewardController`] never holds one.
pub fn block_reward(
    cap: TokenAmount,
    total_supply: TokenAmount,
    divisor: u128,
    max_reward: TokenAmount,
) -> TokenAmount {
    if divisor == 0 {
        return TokenAmount::ZERO;
    }
    let remaining = cap.saturating_sub(total_supply);
    TokenAmount::new(remaining.raw() / divisor).min(max_reward)
}

/// Reward parameters held by a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardController {
    divisor: u128,
    max_reward: TokenAmount,
}

impl RewardController {
    pub fn new(divisor: u128, max_reward: TokenAmount) -> Result<Self, LedgerError> {
        if divisor == 0 {
            return Err(LedgerError::InvalidDivisor);
        }
        Ok(Self {
            divisor,
            max_reward,
        })
    }

    pub fn divisor(&self) -> u128 {
        self.divisor
    }

    pub fn max_reward(&self) -> TokenAmount {
        self.max_reward
    }

    /// Reward the next transfer would mint.
    pub fn reward_for(&self, cap: TokenAmount, total_supply: TokenAmount) -> TokenAmount {
        block_reward(cap, total_supply, self.divisor, self.max_reward)
    }

    /// Replace the divisor, returning the previous value.
    pub(crate) fn set_divisor(&mut self, divisor: u128) -> Result<u128, LedgerError> {
        if divisor == 0 {
            return Err(LedgerError::InvalidDivisor);
        }
        Ok(std::mem::replace(&mut self.divisor, divisor))
    }
}
