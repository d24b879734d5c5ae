#![no_main]

use campusql_core::query::compile_str;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Ignore invalid UTF-8
    if let Ok(text) = std::str::from_utf8(data) {
        if text.len() > 10_000 {
            return;
        }

        // Must never panic; a compiled query must survive a round trip
        if let Ok(query) = compile_str(text) {
            let again = campusql_core::query::compile(&query.to_json())
                .expect("rendered query failed to compile");
            assert_eq!(again, query);
        }
    }
});
