//! Events recorded for every successful state transition.

use kutta_types::{AccountId, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Ledger-level events, appended in the order the mutations happen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Tokens moved between accounts. `from` is `None` for newly minted tokens.
    Transfer {
        from: Option<AccountId>,
        to: AccountId,
        amount: TokenAmount,
    },
    /// An allowance was set.
    Approval {
        owner: AccountId,
        spender: AccountId,
        amount: TokenAmount,
    },
    /// A block reward was minted to the initiator of a transfer.
    RewardIssued {
        recipient: AccountId,
        amount: TokenAmount,
    },
    /// The owner changed the block reward divisor.
    BlockRewardDivisorChanged { previous: u128, current: u128 },
    /// Ownership moved to a new account.
    OwnershipTransferred {
        previous: AccountId,
        current: AccountId,
    },
}

type Listener = Box<dyn Fn(&LedgerEvent) + Send + Sync>;

/// Events kept in the log before the oldest are evicted.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 4_096;

/// Synchronous fan-out of ledger events plus a bounded in-memory log.
///
/// Listeners are invoked inline on the emitting call; keep handlers fast.
/// Listeners see every event. The log keeps only the most recent `capacity`
/// events; a capacity of zero disables it.
pub struct EventBus {
    listeners: Vec<Listener>,
    log: VecDeque<LedgerEvent>,
    capacity: usize,
    /// Events pushed out of the log since creation.
    evicted: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            listeners: Vec::new(),
            log: VecDeque::new(),
            capacity,
            evicted: 0,
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        if self.log.len() >= self.capacity {
            self.log.pop_front();
            self.evicted += 1;
        }
        self.log.push_back(event);
    }

    /// Events recorded since creation or the last [`EventBus::drain`], oldest first.
    pub fn events(&self) -> &VecDeque<LedgerEvent> {
        &self.log
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<LedgerEvent> {
        self.log.drain(..).collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrink or grow the log. Shrinking evicts the oldest events.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.log.len() > capacity {
            self.log.pop_front();
            self.evicted += 1;
        }
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("log", &self.log.len())
            .field("capacity", &self.capacity)
            .field("evicted", &self.evicted)
            .finish()
    }
}
