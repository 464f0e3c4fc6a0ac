#![no_main]

use libfuzzer_sys::fuzz_target;

use interaction_polls::polls::PollSettings;

fuzz_target!(|data: &str| {
    // Settings files are operator-supplied; loading must fail cleanly.
    if let Ok(settings) = PollSettings::from_json5(data) {
        assert!(settings.max_choices() > 0);
        let _ = settings.acknowledgement_for(data);
    }
});
