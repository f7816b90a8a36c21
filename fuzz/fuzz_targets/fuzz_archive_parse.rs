#![no_main]

use gamearchive_rs::{ContentBundle, Registry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let registry = Registry::with_builtin_formats();

    // Every handler must give a verdict without panicking
    let _ = registry.identify_all(data, "fuzz.dat");

    let bundle = ContentBundle::new(data.to_vec());
    for handler in registry.find_handler(data, "fuzz.dat") {
        let archive = match handler.parse(&bundle) {
            Ok(a) => a,
            Err(_) => continue, // Expected for invalid data
        };

        // Read every file - should never panic
        for file in &archive {
            let _ = file.raw();
            let _ = file.content();
        }

        let _ = archive.listing();
        let _ = archive.find("LEVEL1.mbg");
        let _ = archive.find("");

        // Whatever parsed must also be checkable
        let _ = handler.check_limits(&archive);
    }
});
