#![no_main]

use libfuzzer_sys::fuzz_target;

use kutta_types::TokenAmount;

// Amount parsing must never panic, and anything it accepts must format back
// to a string that parses to the same value.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(amount) = TokenAmount::parse_units(input) {
        let formatted = amount.format_units();
        assert_eq!(TokenAmount::parse_units(&formatted).ok(), Some(amount));
    }
});
