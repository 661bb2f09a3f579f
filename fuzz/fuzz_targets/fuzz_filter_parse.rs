#![no_main]

use haystack_core::{Dict, Filter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(filter) = Filter::parse(text) {
        let _ = filter.include_local(&Dict::new());
        let _ = Filter::parse(&filter.to_string());
    }
});
