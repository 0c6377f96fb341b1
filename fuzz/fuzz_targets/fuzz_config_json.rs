//! Fuzz target: `ControlConfig::from_json`
//!
//! Feeds arbitrary bytes to the JSON override loader and verifies:
//! - No panics on malformed or hostile input
//! - Anything accepted also passes `validate()`
//! - An accepted config's correction window fits the sample buffer
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use greenhouse::config::{ControlConfig, MAX_WINDOW_SAMPLES};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = ControlConfig::from_json(text) {
        assert_eq!(cfg.validate(), Ok(()));
        assert!(cfg.window_samples() <= MAX_WINDOW_SAMPLES);
        assert!(cfg.daylight_start_hour < 24 && cfg.daylight_end_hour < 24);
    }
});
