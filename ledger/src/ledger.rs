//! The token ledger state object.
//!
//! Holds the balance table, the allowance table, the running total supply and
//! the reward parameters. Every mutating operation takes the caller identity
//! explicitly, checks all of its preconditions first, and only then writes, so
//! a rejected call never leaves partial state behind.

use std::collections::{BTreeMap, VecDeque};

use kutta_types::{AccountId, TokenAmount, TokenParams};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent};
use crate::reward::RewardController;

/// Outcome of a successful transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Amount moved from sender to recipient.
    pub amount: TokenAmount,
    /// Block reward minted to the initiator (zero when nothing was issued).
    pub reward: TokenAmount,
}

/// A capped fungible-token ledger with transfer-driven issuance.
#[derive(Debug)]
pub struct TokenLedger {
    params: TokenParams,
    pub(crate) owner: AccountId,
    balances: BTreeMap<AccountId, TokenAmount>,
    allowances: BTreeMap<(AccountId, AccountId), TokenAmount>,
    total_supply: TokenAmount,
    pub(crate) reward: RewardController,
    pub(crate) events: EventBus,
}

impl TokenLedger {
    /// Build a ledger with the initial supply credited to `owner`.
    pub(crate) fn from_genesis(owner: AccountId, params: TokenParams) -> Result<Self, LedgerError> {
        params.validate()?;
        let reward =
            RewardController::new(params.initial_block_reward_divisor, params.max_block_reward)?;
        let initial_supply = params.initial_supply;

        let mut ledger = Self {
            params,
            owner: owner.clone(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            total_supply: TokenAmount::ZERO,
            reward,
            events: EventBus::new(),
        };
        if !initial_supply.is_zero() {
            ledger.balances.insert(owner.clone(), initial_supply);
            ledger.total_supply = initial_supply;
            ledger.events.emit(LedgerEvent::Transfer {
                from: None,
                to: owner,
                amount: initial_supply,
            });
        }
        Ok(ledger)
    }

    // ── Views ────────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.params.name
    }

    pub fn symbol(&self) -> &str {
        &self.params.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.params.decimals()
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn cap(&self) -> TokenAmount {
        self.params.cap
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    /// Supply that can still be issued before reaching the cap.
    pub fn headroom(&self) -> TokenAmount {
        self.params.cap.saturating_sub(self.total_supply)
    }

    pub fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> TokenAmount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Allowances in (owner, spender) order.
    pub fn allowances(&self) -> impl Iterator<Item = (&AccountId, &AccountId, TokenAmount)> {
        self.allowances
            .iter()
            .map(|((owner, spender), amount)| (owner, spender, *amount))
    }

    /// Reward the next successful transfer would mint.
    pub fn block_reward(&self) -> TokenAmount {
        self.reward.reward_for(self.params.cap, self.total_supply)
    }

    pub fn block_reward_divisor(&self) -> u128 {
        self.reward.divisor()
    }

    pub fn max_block_reward(&self) -> TokenAmount {
        self.reward.max_reward()
    }

    /// All accounts that have ever held a balance, in identity order.
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, TokenAmount)> {
        self.balances.iter().map(|(id, bal)| (id, *bal))
    }

    /// Number of accounts with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| !b.is_zero()).count()
    }

    /// Whether the balances add up to the total supply and the supply is within the cap.
    pub fn verify_supply(&self) -> bool {
        let sum = self
            .balances
            .values()
            .try_fold(TokenAmount::ZERO, |acc, bal| acc.checked_add(*bal));
        sum == Some(self.total_supply) && self.total_supply <= self.params.cap
    }

    /// Most recent events, oldest first. See [`EventBus`] for the retention bound.
    pub fn events(&self) -> &VecDeque<LedgerEvent> {
        self.events.events()
    }

    /// Limit how many events the ledger retains; zero keeps none.
    pub fn set_event_log_capacity(&mut self, capacity: usize) {
        self.events.set_capacity(capacity);
    }

    /// Events dropped from the log because it was full.
    pub fn evicted_events(&self) -> u64 {
        self.events.evicted()
    }

    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        self.events.drain()
    }

    /// Register a listener invoked synchronously for every future event.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Move `amount` from `caller` to `to`, then mint the block reward to `caller`.
    pub fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<Receipt, LedgerError> {
        self.move_balance(caller, to, amount)?;
        let reward = self.apply_reward(caller);
        tracing::debug!(
            from = %caller,
            to = %to,
            amount = %amount,
            reward = %reward,
            "transfer applied"
        );
        Ok(Receipt { amount, reward })
    }

    /// Move `amount` out of `from` on behalf of `caller`, consuming allowance.
    ///
    /// The block reward goes to `caller`, the account that initiated the move.
    pub fn transfer_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<Receipt, LedgerError> {
        let key = (from.clone(), caller.clone());
        let allowed = self.allowances.get(&key).copied().unwrap_or_default();
        let remaining_allowance =
            allowed
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::InsufficientAllowance {
                    owner: from.clone(),
                    spender: caller.clone(),
                    needed: amount,
                    available: allowed,
                })?;

        self.move_balance(from, to, amount)?;
        self.allowances.insert(key, remaining_allowance);
        let reward = self.apply_reward(caller);
        tracing::debug!(
            spender = %caller,
            from = %from,
            to = %to,
            amount = %amount,
            reward = %reward,
            "delegated transfer applied"
        );
        Ok(Receipt { amount, reward })
    }

    /// Allow `spender` to move up to `amount` out of `caller`'s balance.
    pub fn approve(&mut self, caller: &AccountId, spender: &AccountId, amount: TokenAmount) {
        self.allowances
            .insert((caller.clone(), spender.clone()), amount);
        self.events.emit(LedgerEvent::Approval {
            owner: caller.clone(),
            spender: spender.clone(),
            amount,
        });
        tracing::debug!(owner = %caller, spender = %spender, amount = %amount, "allowance set");
    }

    /// Mint `amount` directly to `to`. Owner only; bounded by the cap.
    pub fn mint_to_user(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;

        let headroom = self.headroom();
        if amount > headroom {
            return Err(LedgerError::CapExceeded {
                requested: amount,
                headroom,
            });
        }
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.balances.insert(to.clone(), new_balance);
        self.total_supply = new_supply;
        self.events.emit(LedgerEvent::Transfer {
            from: None,
            to: to.clone(),
            amount,
        });
        tracing::info!(to = %to, amount = %amount, total_supply = %new_supply, "owner mint");
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Debit `from` and credit `to`. Validates before the first write.
    fn move_balance(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                account: from.clone(),
                needed: amount,
                available,
            })?;

        if from != to {
            let credited = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?;
            self.balances.insert(from.clone(), debited);
            self.balances.insert(to.clone(), credited);
        }

        self.events.emit(LedgerEvent::Transfer {
            from: Some(from.clone()),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    /// Mint the current block reward to `recipient` if there is headroom for it.
    ///
    /// Never fails: when the reward is zero or would not fit under the cap,
    /// nothing is issued and zero is returned.
    fn apply_reward(&mut self, recipient: &AccountId) -> TokenAmount {
        let reward = self.block_reward();
        if reward.is_zero() {
            tracing::trace!(recipient = %recipient, "no block reward left to issue");
            return TokenAmount::ZERO;
        }

        let new_supply = match self.total_supply.checked_add(reward) {
            Some(supply) if supply <= self.params.cap => supply,
            _ => {
                tracing::trace!(reward = %reward, "block reward does not fit under cap");
                return TokenAmount::ZERO;
            }
        };
        let Some(new_balance) = self.balance_of(recipient).checked_add(reward) else {
            return TokenAmount::ZERO;
        };

        self.balances.insert(recipient.clone(), new_balance);
        self.total_supply = new_supply;
        self.events.emit(LedgerEvent::Transfer {
            from: None,
            to: recipient.clone(),
            amount: reward,
        });
        self.events.emit(LedgerEvent::RewardIssued {
            recipient: recipient.clone(),
            amount: reward,
        });
        reward
    }
}
