#![no_main]
use bgpmon_parser::parser::parse_bgpmon_message;
use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = str::from_utf8(data) {
        let _ = parse_bgpmon_message(s);
    }
});
