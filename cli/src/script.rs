//! Operation scripts: a JSON array of ledger operations replayed in order.
//!
//! ```json
//! [
//!   { "op": "transfer", "caller": "owner", "to": "alice", "amount": "50" },
//!   { "op": "set_divisor", "caller": "owner", "divisor": 2 }
//! ]
//! ```
//!
//! Amounts are decimal token strings and are scaled to base units before they
//! reach the ledger.

use kutta_ledger::{LedgerError, LedgerEvent, Receipt, TokenLedger};
use kutta_types::{AccountId, TokenAmount, TypeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    Transfer {
        caller: AccountId,
        to: AccountId,
        amount: String,
    },
    TransferFrom {
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: String,
    },
    Approve {
        caller: AccountId,
        spender: AccountId,
        amount: String,
    },
    Mint {
        caller: AccountId,
        to: AccountId,
        amount: String,
    },
    SetDivisor {
        caller: AccountId,
        divisor: u64,
    },
    TransferOwnership {
        caller: AccountId,
        new_owner: AccountId,
    },
}

impl ScriptOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::TransferFrom { .. } => "transfer_from",
            Self::Approve { .. } => "approve",
            Self::Mint { .. } => "mint",
            Self::SetDivisor { .. } => "set_divisor",
            Self::TransferOwnership { .. } => "transfer_ownership",
        }
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Amount(#[from] TypeError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result line printed for each replayed operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OpOutcome {
    pub index: usize,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Events the operation produced, amounts in base units.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<LedgerEvent>,
}

impl OpOutcome {
    fn from_result(
        index: usize,
        op: &ScriptOp,
        result: Result<Option<Receipt>, ScriptError>,
        events: Vec<LedgerEvent>,
    ) -> Self {
        let mut outcome = Self {
            index,
            op: op.name(),
            ok: result.is_ok(),
            amount: None,
            reward: None,
            error: None,
            events,
        };
        match result {
            Ok(Some(receipt)) => {
                outcome.amount = Some(receipt.amount.format_units());
                outcome.reward = Some(receipt.reward.format_units());
            }
            Ok(None) => {}
            Err(e) => outcome.error = Some(e.to_string()),
        }
        outcome
    }
}

/// Summary of a replay.
#[derive(Debug, Default)]
pub struct Replay {
    pub outcomes: Vec<OpOutcome>,
    pub rejected: usize,
    /// Set when replay stopped early on a rejection.
    pub halted: bool,
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptOp>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Apply a single operation. Transfers report their receipt.
pub fn apply_op(ledger: &mut TokenLedger, op: &ScriptOp) -> Result<Option<Receipt>, ScriptError> {
    match op {
        ScriptOp::Transfer { caller, to, amount } => {
            let amount = TokenAmount::parse_units(amount)?;
            Ok(Some(ledger.transfer(caller, to, amount)?))
        }
        ScriptOp::TransferFrom {
            caller,
            from,
            to,
            amount,
        } => {
            let amount = TokenAmount::parse_units(amount)?;
            Ok(Some(ledger.transfer_from(caller, from, to, amount)?))
        }
        ScriptOp::Approve {
            caller,
            spender,
            amount,
        } => {
            let amount = TokenAmount::parse_units(amount)?;
            ledger.approve(caller, spender, amount);
            Ok(None)
        }
        ScriptOp::Mint { caller, to, amount } => {
            let amount = TokenAmount::parse_units(amount)?;
            ledger.mint_to_user(caller, to, amount)?;
            Ok(None)
        }
        ScriptOp::SetDivisor { caller, divisor } => {
            ledger.set_block_reward_divisor(caller, u128::from(*divisor))?;
            Ok(None)
        }
        ScriptOp::TransferOwnership { caller, new_owner } => {
            ledger.transfer_ownership(caller, new_owner)?;
            Ok(None)
        }
    }
}

/// Replay `ops` in order. With `fail_fast`, stop after the first rejection.
///
/// The ledger's event log is drained after every operation so each outcome
/// carries exactly the events it caused. Events recorded before the replay
/// are discarded.
pub fn replay(ledger: &mut TokenLedger, ops: &[ScriptOp], fail_fast: bool) -> Replay {
    let mut replay = Replay::default();
    ledger.drain_events();
    for (index, op) in ops.iter().enumerate() {
        let result = apply_op(ledger, op);
        if let Err(e) = &result {
            tracing::debug!(index, op = op.name(), error = %e, "operation rejected");
            replay.rejected += 1;
        }
        let failed = result.is_err();
        let events = ledger.drain_events();
        replay
            .outcomes
            .push(OpOutcome::from_result(index, op, result, events));
        if failed && fail_fast {
            replay.halted = true;
            break;
        }
    }
    replay
}

#[cfg(test)]
mod tests {
    use super::*;
    use kutta_ledger::{create_ledger, GenesisConfig};

    fn ledger() -> TokenLedger {
        create_ledger(&GenesisConfig::kutta(AccountId::new("owner"))).unwrap()
    }

    #[test]
    fn parses_every_operation() {
        let json = r#"[
            {"op": "transfer", "caller": "owner", "to": "alice", "amount": "50"},
            {"op": "transfer_from", "caller": "bob", "from": "alice", "to": "carol", "amount": "1.5"},
            {"op": "approve", "caller": "alice", "spender": "bob", "amount": "10"},
            {"op": "mint", "caller": "owner", "to": "dave", "amount": "0.000000000000000001"},
            {"op": "set_divisor", "caller": "owner", "divisor": 2},
            {"op": "transfer_ownership", "caller": "owner", "new_owner": "alice"}
        ]"#;
        let ops = parse_script(json).unwrap();
        let names: Vec<_> = ops.iter().map(ScriptOp::name).collect();
        assert_eq!(
            names,
            [
                "transfer",
                "transfer_from",
                "approve",
                "mint",
                "set_divisor",
                "transfer_ownership"
            ]
        );
    }

    #[test]
    fn unknown_operation_fails_to_parse() {
        assert!(parse_script(r#"[{"op": "burn", "caller": "owner"}]"#).is_err());
    }

    #[test]
    fn blank_account_fails_to_parse() {
        assert!(parse_script(r#"[{"op": "transfer", "caller": " ", "to": "a", "amount": "1"}]"#)
            .is_err());
    }

    #[test]
    fn transfer_reports_scaled_amount_and_reward() {
        let mut ledger = ledger();
        let ops = parse_script(
            r#"[{"op": "transfer", "caller": "owner", "to": "alice", "amount": "50"}]"#,
        )
        .unwrap();

        let run = replay(&mut ledger, &ops, false);
        assert_eq!(run.rejected, 0);
        let outcome = &run.outcomes[0];
        assert!(outcome.ok);
        assert_eq!(outcome.amount.as_deref(), Some("50"));
        assert_eq!(outcome.reward.as_deref(), Some("135.7623"));
        assert_eq!(
            ledger.balance_of(&AccountId::new("alice")),
            TokenAmount::from_tokens(50)
        );
    }

    #[test]
    fn rejections_are_reported_and_replay_continues() {
        let mut ledger = ledger();
        let ops = parse_script(
            r#"[
                {"op": "mint", "caller": "alice", "to": "alice", "amount": "1"},
                {"op": "set_divisor", "caller": "owner", "divisor": 2}
            ]"#,
        )
        .unwrap();

        let run = replay(&mut ledger, &ops, false);
        assert_eq!(run.rejected, 1);
        assert!(!run.halted);
        assert!(!run.outcomes[0].ok);
        assert!(run.outcomes[0].error.as_deref().unwrap().contains("alice"));
        assert!(run.outcomes[1].ok);
        assert_eq!(ledger.block_reward_divisor(), 2);
    }

    #[test]
    fn fail_fast_stops_at_first_rejection() {
        let mut ledger = ledger();
        let ops = parse_script(
            r#"[
                {"op": "transfer", "caller": "alice", "to": "owner", "amount": "1"},
                {"op": "set_divisor", "caller": "owner", "divisor": 2}
            ]"#,
        )
        .unwrap();

        let run = replay(&mut ledger, &ops, true);
        assert!(run.halted);
        assert_eq!(run.outcomes.len(), 1);
        assert_eq!(ledger.block_reward_divisor(), 1_000_000);
    }

    #[test]
    fn bad_amount_is_rejected_without_touching_the_ledger() {
        let mut ledger = ledger();
        let before = ledger.snapshot();
        let op = ScriptOp::Transfer {
            caller: AccountId::new("owner"),
            to: AccountId::new("alice"),
            amount: "-3".into(),
        };
        assert!(matches!(apply_op(&mut ledger, &op), Err(ScriptError::Amount(_))));
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn approve_then_transfer_from() {
        let mut ledger = ledger();
        let ops = parse_script(
            r#"[
                {"op": "approve", "caller": "owner", "spender": "bob", "amount": "10"},
                {"op": "transfer_from", "caller": "bob", "from": "owner", "to": "carol", "amount": "4"},
                {"op": "transfer_from", "caller": "bob", "from": "owner", "to": "carol", "amount": "7"}
            ]"#,
        )
        .unwrap();

        let run = replay(&mut ledger, &ops, false);
        assert!(run.outcomes[0].ok && run.outcomes[1].ok);
        assert!(!run.outcomes[2].ok);
        assert_eq!(
            ledger.allowance(&AccountId::new("owner"), &AccountId::new("bob")),
            TokenAmount::from_tokens(6)
        );
    }

    #[test]
    fn outcome_lines_omit_empty_fields() {
        let mut ledger = ledger();
        let ops = parse_script(
            r#"[
                {"op": "set_divisor", "caller": "alice", "divisor": 5},
                {"op": "set_divisor", "caller": "owner", "divisor": 5}
            ]"#,
        )
        .unwrap();
        let run = replay(&mut ledger, &ops, false);

        let rejected = serde_json::to_string(&run.outcomes[0]).unwrap();
        assert_eq!(
            rejected,
            r#"{"index":0,"op":"set_divisor","ok":false,"error":"alice is not the ledger owner"}"#
        );
        let applied = serde_json::to_string(&run.outcomes[1]).unwrap();
        assert_eq!(
            applied,
            r#"{"index":1,"op":"set_divisor","ok":true,"events":[{"type":"block_reward_divisor_changed","previous":1000000,"current":5}]}"#
        );
    }

    #[test]
    fn each_outcome_carries_its_own_events() {
        let mut ledger = ledger();
        let ops = parse_script(
            r#"[
                {"op": "transfer", "caller": "owner", "to": "alice", "amount": "1"},
                {"op": "transfer", "caller": "bob", "to": "alice", "amount": "1"},
                {"op": "approve", "caller": "alice", "spender": "bob", "amount": "1"}
            ]"#,
        )
        .unwrap();
        let run = replay(&mut ledger, &ops, false);

        assert_eq!(run.outcomes[0].events.len(), 3);
        assert!(matches!(
            run.outcomes[0].events[2],
            LedgerEvent::RewardIssued { .. }
        ));
        assert!(run.outcomes[1].events.is_empty());
        assert_eq!(run.outcomes[2].events.len(), 1);
        assert!(ledger.events().is_empty());
    }
}
