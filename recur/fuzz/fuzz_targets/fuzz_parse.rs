#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Never panic; errors must point inside the input.
        if let Err(e) = recur::Rule::parse(s) {
            assert!(e.span().start <= e.span().end && e.span().end <= s.len());
            let _ = e.display_rich();
        }
    }
});
