#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(rule) = recur::Rule::parse(s) {
            let text = rule.to_string();
            let reparsed = recur::Rule::parse(&text).expect("rule text must be parseable");
            assert_eq!(rule, reparsed, "roundtrip changed the rule");
            assert_eq!(text, reparsed.to_string(), "roundtrip not idempotent");
        }
    }
});
