#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(scenario) = torcia_config::load_scenario_toml(data) {
        if scenario.validate().is_ok() {
            let _ = scenario.bottle_slots();
        }
    }
});
