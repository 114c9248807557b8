#![no_main]
use bgpmon_parser::models::MESSAGE_DELIMITER;
use bgpmon_parser::FrameReassembler;
use libfuzzer_sys::fuzz_target;

// Every frame must end in the delimiter no matter how the input is split.
fuzz_target!(|data: &[u8]| {
    let split = data.first().copied().unwrap_or(1).max(1) as usize;
    let mut reassembler = FrameReassembler::with_max_buffer_len(Some(1 << 16));
    for chunk in data.chunks(split) {
        for frame in reassembler.feed(chunk) {
            assert!(frame.as_bytes().ends_with(MESSAGE_DELIMITER));
        }
    }
});
