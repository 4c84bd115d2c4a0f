#![no_main]
use firstfit_sim::{parse_script, run_script, SimConfig};
use libfuzzer_sys::fuzz_target;

// Arbitrary text must either fail to parse or run to completion
fuzz_target!(|input: &[u8]| {
    let Ok(text) = std::str::from_utf8(input) else {
        return;
    };

    let Ok(script) = parse_script(text) else {
        return;
    };

    let config = SimConfig {
        verify_invariants: true,
        ..SimConfig::default()
    };
    if let Ok(report) = run_script(&script, config) {
        let _ = report.text(true).to_string();
    }
});
