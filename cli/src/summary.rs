//! Human-scale view of a ledger for `kutta info`.

use kutta_ledger::TokenLedger;
use serde::Serialize;

/// Amounts are rendered as decimal token strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub owner: String,
    pub cap: String,
    pub total_supply: String,
    pub headroom: String,
    pub block_reward_divisor: String,
    pub max_block_reward: String,
    pub block_reward: String,
    pub holders: usize,
}

impl LedgerSummary {
    pub fn of(ledger: &TokenLedger) -> Self {
        Self {
            name: ledger.name().to_string(),
            symbol: ledger.symbol().to_string(),
            decimals: ledger.decimals(),
            owner: ledger.owner().to_string(),
            cap: ledger.cap().format_units(),
            total_supply: ledger.total_supply().format_units(),
            headroom: ledger.headroom().format_units(),
            block_reward_divisor: ledger.block_reward_divisor().to_string(),
            max_block_reward: ledger.max_block_reward().format_units(),
            block_reward: ledger.block_reward().format_units(),
            holders: ledger.holder_count(),
        }
    }
}
