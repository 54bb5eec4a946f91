//! Capped fungible-token ledger.
//!
//! One state object, three facets:
//! - the balance table and total supply, bounded by an immutable cap;
//! - the block reward minted to the initiator of every transfer, decaying as
//!   supply approaches the cap and scaled by an owner-set divisor;
//! - owner-gated control of minting, the divisor, and ownership itself.
//!
//! Operations run to completion one at a time (`&mut self`). Each checks all
//! of its preconditions before writing, so a rejected operation leaves no trace.

pub mod access;
pub mod error;
pub mod event;
pub mod genesis;
pub mod ledger;
pub mod reward;
pub mod snapshot;

pub use error::LedgerError;
pub use event::{EventBus, LedgerEvent, DEFAULT_EVENT_LOG_CAPACITY};
pub use genesis::{create_ledger, GenesisConfig};
pub use ledger::{Receipt, TokenLedger};
pub use reward::{block_reward, RewardController};
pub use snapshot::{AccountSnapshot, AllowanceSnapshot, LedgerSnapshot};
