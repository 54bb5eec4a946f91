//! Token parameters fixed at genesis.
//!
//! Only the block reward divisor may change afterwards, and only through the
//! owner-gated ledger operation. Everything else here is immutable for the
//! lifetime of a ledger.

use crate::amount::{TokenAmount, TOKEN_DECIMALS};
use crate::error::TypeError;
use serde::{Deserialize, Serialize};

/// Parameters a ledger is created with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParams {
    /// Human-readable token name.
    pub name: String,

    /// Ticker symbol.
    pub symbol: String,

    /// Hard cap on total supply (base units).
    pub cap: TokenAmount,

    /// Supply credited to the owner at genesis (base units).
    pub initial_supply: TokenAmount,

    /// Divisor applied to the remaining headroom when computing the block reward.
    pub initial_block_reward_divisor: u128,

    /// Absolute ceiling on a single block reward, independent of the divisor.
    pub max_block_reward: TokenAmount,
}

impl TokenParams {
    pub const DEFAULT_NAME: &'static str = "KuttaKoin";
    pub const DEFAULT_SYMBOL: &'static str = "KUTTA";

    /// 150,847,000 tokens.
    pub const DEFAULT_CAP: TokenAmount = TokenAmount::from_tokens(150_847_000);

    /// 15,084,700 tokens (10% of the cap).
    pub const DEFAULT_INITIAL_SUPPLY: TokenAmount = TokenAmount::from_tokens(15_084_700);

    pub const DEFAULT_BLOCK_REWARD_DIVISOR: u128 = 1_000_000;

    /// 1,000 tokens.
    pub const DEFAULT_MAX_BLOCK_REWARD: TokenAmount = TokenAmount::from_tokens(1_000);

    /// KuttaKoin defaults: the configuration the token launches with.
    pub fn kutta_defaults() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            symbol: Self::DEFAULT_SYMBOL.to_string(),
            cap: Self::DEFAULT_CAP,
            initial_supply: Self::DEFAULT_INITIAL_SUPPLY,
            initial_block_reward_divisor: Self::DEFAULT_BLOCK_REWARD_DIVISOR,
            max_block_reward: Self::DEFAULT_MAX_BLOCK_REWARD,
        }
    }

    /// Decimal places used when presenting amounts.
    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS as u8
    }

    /// Check the parameters describe a constructible ledger.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.trim().is_empty() {
            return Err(TypeError::InvalidParams("name must not be empty".into()));
        }
        if self.symbol.trim().is_empty() {
            return Err(TypeError::InvalidParams("symbol must not be empty".into()));
        }
        if self.initial_supply > self.cap {
            return Err(TypeError::InvalidParams(format!(
                "initial supply {} exceeds cap {}",
                self.initial_supply, self.cap
            )));
        }
        if self.initial_block_reward_divisor == 0 {
            return Err(TypeError::InvalidParams(
                "block reward divisor must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TokenParams {
    fn default() -> Self {
        Self::kutta_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = TokenParams::kutta_defaults();
        params.validate().unwrap();
        assert_eq!(params.cap.whole_tokens(), 150_847_000);
        assert_eq!(params.initial_supply.whole_tokens(), 15_084_700);
        assert_eq!(params.initial_block_reward_divisor, 1_000_000);
        assert_eq!(params.max_block_reward.whole_tokens(), 1_000);
        assert_eq!(params.decimals(), 18);
    }

    #[test]
    fn initial_supply_above_cap_is_rejected() {
        let mut params = TokenParams::kutta_defaults();
        params.initial_supply = params.cap + TokenAmount::new(1);
        assert!(matches!(
            params.validate(),
            Err(TypeError::InvalidParams(_))
        ));
    }

    #[test]
    fn initial_supply_equal_to_cap_is_allowed() {
        let mut params = TokenParams::kutta_defaults();
        params.initial_supply = params.cap;
        params.validate().unwrap();
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let mut params = TokenParams::kutta_defaults();
        params.initial_block_reward_divisor = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn blank_symbol_is_rejected() {
        let mut params = TokenParams::kutta_defaults();
        params.symbol = " ".into();
        assert!(params.validate().is_err());
    }
}
