//! Ledger snapshots: the observable state captured at a point in time.
//!
//! The digest is computed deterministically from the captured content so two
//! snapshots of equal state always carry the same hash.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use kutta_types::{AccountId, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::ledger::TokenLedger;

type Blake2b256 = Blake2b<U32>;

/// A single non-zero balance captured in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account: AccountId,
    pub balance: TokenAmount,
}

/// A single non-zero allowance captured in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSnapshot {
    pub owner: AccountId,
    pub spender: AccountId,
    pub amount: TokenAmount,
}

/// Everything observable about a ledger except its event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 over every other field.
    #[serde(with = "hex::serde")]
    pub hash: [u8; 32],
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub owner: AccountId,
    pub cap: TokenAmount,
    pub total_supply: TokenAmount,
    pub block_reward_divisor: u128,
    pub max_block_reward: TokenAmount,
    /// Reward the next transfer would mint.
    pub block_reward: TokenAmount,
    /// Non-zero balances in account order.
    pub accounts: Vec<AccountSnapshot>,
    /// Non-zero allowances in (owner, spender) order.
    pub allowances: Vec<AllowanceSnapshot>,
}

impl LedgerSnapshot {
    pub fn capture(ledger: &TokenLedger) -> Self {
        let accounts = ledger
            .accounts()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(account, balance)| AccountSnapshot {
                account: account.clone(),
                balance,
            })
            .collect();
        let allowances = ledger
            .allowances()
            .filter(|(_, _, amount)| !amount.is_zero())
            .map(|(owner, spender, amount)| AllowanceSnapshot {
                owner: owner.clone(),
                spender: spender.clone(),
                amount,
            })
            .collect();

        let mut snap = Self {
            hash: [0u8; 32],
            name: ledger.name().to_string(),
            symbol: ledger.symbol().to_string(),
            decimals: ledger.decimals(),
            owner: ledger.owner().clone(),
            cap: ledger.cap(),
            total_supply: ledger.total_supply(),
            block_reward_divisor: ledger.block_reward_divisor(),
            max_block_reward: ledger.max_block_reward(),
            block_reward: ledger.block_reward(),
            accounts,
            allowances,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = Blake2b256::new();
        hash_str(&mut hasher, &self.name);
        hash_str(&mut hasher, &self.symbol);
        hasher.update([self.decimals]);
        hash_str(&mut hasher, self.owner.as_str());
        hasher.update(self.cap.raw().to_le_bytes());
        hasher.update(self.total_supply.raw().to_le_bytes());
        hasher.update(self.block_reward_divisor.to_le_bytes());
        hasher.update(self.max_block_reward.raw().to_le_bytes());
        hasher.update(self.block_reward.raw().to_le_bytes());
        hasher.update((self.accounts.len() as u64).to_le_bytes());
        for entry in &self.accounts {
            hash_str(&mut hasher, entry.account.as_str());
            hasher.update(entry.balance.raw().to_le_bytes());
        }
        hasher.update((self.allowances.len() as u64).to_le_bytes());
        for entry in &self.allowances {
            hash_str(&mut hasher, entry.owner.as_str());
            hash_str(&mut hasher, entry.spender.as_str());
            hasher.update(entry.amount.raw().to_le_bytes());
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the hash matches the captured content.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Sum of captured balances, `None` on overflow.
    pub fn balance_sum(&self) -> Option<TokenAmount> {
        self.accounts
            .iter()
            .try_fold(TokenAmount::ZERO, |acc, e| acc.checked_add(e.balance))
    }

    pub fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.accounts
            .iter()
            .find(|e| &e.account == account)
            .map(|e| e.balance)
            .unwrap_or_default()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> TokenAmount {
        self.allowances
            .iter()
            .find(|e| &e.owner == owner && &e.spender == spender)
            .map(|e| e.amount)
            .unwrap_or_default()
    }
}

/// Length-prefixed so adjacent strings cannot run together.
fn hash_str(hasher: &mut Blake2b256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

impl TokenLedger {
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::{create_ledger, GenesisConfig};

    fn owner() -> AccountId {
        AccountId::new("owner")
    }

    #[test]
    fn snapshot_matches_ledger() {
        let mut ledger = create_ledger(&GenesisConfig::kutta(owner())).unwrap();
        let alice = AccountId::new("alice");
        ledger.transfer(&owner(), &alice, TokenAmount::new(50)).unwrap();

        let snap = ledger.snapshot();
        assert!(snap.verify());
        assert_eq!(snap.account_count(), 2);
        assert_eq!(snap.balance_of(&alice), TokenAmount::new(50));
        assert_eq!(snap.balance_sum(), Some(snap.total_supply));
        assert_eq!(snap.block_reward, ledger.block_reward());
    }

    #[test]
    fn equal_state_gives_equal_hash() {
        let a = create_ledger(&GenesisConfig::kutta(owner())).unwrap();
        let b = create_ledger(&GenesisConfig::kutta(owner())).unwrap();
        assert_eq!(a.snapshot().hash, b.snapshot().hash);
    }

    #[test]
    fn hash_tracks_state_changes() {
        let mut ledger = create_ledger(&GenesisConfig::kutta(owner())).unwrap();
        let before = ledger.snapshot();
        ledger.set_block_reward_divisor(&owner(), 2).unwrap();
        let after = ledger.snapshot();
        assert_ne!(before.hash, after.hash);
    }

    #[test]
    fn tampered_snapshot_fails_verification() {
        let ledger = create_ledger(&GenesisConfig::kutta(owner())).unwrap();
        let mut snap = ledger.snapshot();
        snap.total_supply = snap.total_supply + TokenAmount::new(1);
        assert!(!snap.verify());
    }

    #[test]
    fn hash_serializes_as_hex() {
        let ledger = create_ledger(&GenesisConfig::kutta(owner())).unwrap();
        let snap = ledger.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains(&format!("\"hash\":\"{}\"", snap.hash_hex())));
        let back: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn allowances_are_captured_and_hashed() {
        let mut ledger = create_ledger(&GenesisConfig::kutta(owner())).unwrap();
        let bob = AccountId::new("bob");
        let before = ledger.snapshot();

        ledger.approve(&owner(), &bob, TokenAmount::new(10));
        let approved = ledger.snapshot();
        assert!(approved.verify());
        assert_ne!(approved.hash, before.hash);
        assert_eq!(approved.allowance(&owner(), &bob), TokenAmount::new(10));

        // Resetting to zero drops the entry again.
        ledger.approve(&owner(), &bob, TokenAmount::ZERO);
        let reset = ledger.snapshot();
        assert!(reset.allowances.is_empty());
        assert_eq!(reset.hash, before.hash);
    }

    #[test]
    fn rejected_delegated_transfer_leaves_snapshot_unchanged() {
        let mut ledger = create_ledger(&GenesisConfig::kutta(owner())).unwrap();
        let bob = AccountId::new("bob");
        let carol = AccountId::new("carol");
        ledger.approve(&owner(), &bob, TokenAmount::new(10));
        let before = ledger.snapshot();

        assert!(ledger
            .transfer_from(&bob, &owner(), &carol, TokenAmount::new(11))
            .is_err());
        assert_eq!(ledger.snapshot(), before);

        ledger
            .transfer_from(&bob, &owner(), &carol, TokenAmount::new(4))
            .unwrap();
        assert_eq!(ledger.snapshot().allowance(&owner(), &bob), TokenAmount::new(6));
    }
}
