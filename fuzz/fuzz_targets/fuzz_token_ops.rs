#![no_main]

use agora_token::VotingToken;
use agora_types::{Address, TimeIndex};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Mint { to: u8, amount: u32 },
    Transfer { from: u8, to: u8, amount: u32 },
    Delegate { from: u8, to: u8 },
    Tick { by: u8 },
}

fn account(i: u8) -> Address {
    Address::from_label(&format!("account{}", i % 6))
}

fuzz_target!(|ops: Vec<Op>| {
    let governor = Address::from_label("governor");
    let mut token = VotingToken::new(Address::from_label("token"), "Fuzz", "FZZ", governor);
    let mut now = 0u64;

    for op in ops {
        let at = TimeIndex::new(now);
        let _ = match op {
            Op::Mint { to, amount } => token.mint(&governor, account(to), amount as u128, at),
            Op::Transfer { from, to, amount } => {
                token.transfer(&account(from), account(to), amount as u128, at)
            }
            Op::Delegate { from, to } => token.delegate(&account(from), account(to), at),
            Op::Tick { by } => {
                now += by as u64;
                Ok(())
            }
        };

        // Delegated power can never exceed what exists.
        let power: u128 = (0..6).map(|i| token.get_votes(&account(i))).sum();
        assert!(power <= token.total_supply());
    }
});
