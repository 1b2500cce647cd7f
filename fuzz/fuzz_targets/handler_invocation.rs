#![no_main]

use hemlock_di::{extra, Container, DiError, ExtraArg, Resolver};
use libfuzzer_sys::fuzz_target;

// Splits a fixed handler's parameters between the container and a fuzzed
// number of extras of fuzzed types.
fuzz_target!(|data: &[u8]| {
    let mut container = Container::new();
    container.instance(7u8).instance(700u16).instance("registered".to_string());

    let extras: Vec<ExtraArg> = data
        .iter()
        .take(5)
        .map(|b| match b % 3 {
            0 => extra(*b),
            1 => extra(u16::from(*b)),
            _ => extra(format!("extra-{}", b)),
        })
        .collect();
    let supplied = extras.len();
    let kinds: Vec<u8> = data.iter().take(5).map(|b| b % 3).collect();

    let result = container.call(|a: u8, b: u16, c: String| (a, b, c), extras);

    if supplied > 3 {
        assert!(matches!(result, Err(DiError::Arity { .. })));
        return;
    }

    // Trailing parameters in order expect kinds 0 (u8), 1 (u16), 2 (String)
    let leading = 3 - supplied;
    let expected_kinds: Vec<u8> = (leading as u8..3).collect();
    if kinds != expected_kinds {
        assert!(matches!(result, Err(DiError::TypeMismatch(_))));
        return;
    }

    let (a, b, c) = result.unwrap();
    if leading >= 1 {
        assert_eq!(a, 7);
    }
    if leading >= 2 {
        assert_eq!(b, 700);
    }
    if leading >= 3 {
        assert_eq!(c, "registered");
    }
});
