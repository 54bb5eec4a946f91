#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use kutta_ledger::{create_ledger, GenesisConfig};
use kutta_types::{AccountId, TokenAmount, TokenParams};

const ACCOUNTS: [&str; 4] = ["owner", "alice", "bob", "carol"];

#[derive(Arbitrary, Debug)]
enum Op {
    Transfer { from: u8, to: u8, amount: u128 },
    TransferFrom { spender: u8, from: u8, to: u8, amount: u128 },
    Approve { owner: u8, spender: u8, amount: u128 },
    Mint { caller: u8, to: u8, amount: u128 },
    SetDivisor { caller: u8, divisor: u128 },
    TransferOwnership { caller: u8, new_owner: u8 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    cap: u128,
    initial_supply: u128,
    divisor: u128,
    max_reward: u128,
    ops: Vec<Op>,
}

fn account(i: u8) -> AccountId {
    AccountId::new(ACCOUNTS[i as usize % ACCOUNTS.len()])
}

// Drive arbitrary operation sequences over arbitrary genesis parameters.
// Nothing may panic, and the supply invariants must hold after every step.
fuzz_target!(|input: Input| {
    let params = TokenParams {
        cap: TokenAmount::new(input.cap),
        initial_supply: TokenAmount::new(input.initial_supply),
        initial_block_reward_divisor: input.divisor,
        max_block_reward: TokenAmount::new(input.max_reward),
        ..TokenParams::kutta_defaults()
    };
    let Ok(mut ledger) = create_ledger(&GenesisConfig {
        owner: account(0),
        params,
    }) else {
        return;
    };

    for op in input.ops.iter().take(256) {
        let supply = ledger.total_supply();
        let _ = match *op {
            Op::Transfer { from, to, amount } => ledger
                .transfer(&account(from), &account(to), TokenAmount::new(amount))
                .map(drop),
            Op::TransferFrom { spender, from, to, amount } => ledger
                .transfer_from(&account(spender), &account(from), &account(to), TokenAmount::new(amount))
                .map(drop),
            Op::Approve { owner, spender, amount } => {
                ledger.approve(&account(owner), &account(spender), TokenAmount::new(amount));
                Ok(())
            }
            Op::Mint { caller, to, amount } => {
                ledger.mint_to_user(&account(caller), &account(to), TokenAmount::new(amount))
            }
            Op::SetDivisor { caller, divisor } => {
                ledger.set_block_reward_divisor(&account(caller), divisor)
            }
            Op::TransferOwnership { caller, new_owner } => {
                ledger.transfer_ownership(&account(caller), &account(new_owner))
            }
        };

        assert!(ledger.verify_supply());
        assert!(ledger.total_supply() <= ledger.cap());
        assert!(ledger.total_supply() >= supply);
        assert!(ledger.block_reward() <= ledger.max_block_reward());
    }

    assert!(ledger.snapshot().verify());
    assert!(ledger.events().len() <= kutta_ledger::DEFAULT_EVENT_LOG_CAPACITY);
});
