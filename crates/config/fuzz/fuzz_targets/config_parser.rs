//! Arbitrary config text must parse or fail cleanly, and whatever parses
//! must validate and serialize without panicking.
//!
//! Run with: cargo fuzz run config_parser

#![no_main]
use galleria_config::Config;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = toml::from_str::<Config>(s) {
            let _ = config.validate();
            let _ = config.storage.redacted();
            let _ = toml::to_string_pretty(&config);
        }
    }
});
