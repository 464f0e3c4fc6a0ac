#![no_main]

use libfuzzer_sys::fuzz_target;

use interaction_polls::polls::option_id;

fuzz_target!(|data: &str| {
    // Option values come straight from the platform; parsing must never panic.
    if let Ok((poll_id, index)) = option_id::parse(data) {
        // Anything accepted must re-encode to something that parses the same.
        let encoded = option_id::encode(poll_id, index);
        assert_eq!(option_id::parse(&encoded).ok(), Some((poll_id, index)));
    }
});
