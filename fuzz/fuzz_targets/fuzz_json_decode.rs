#![no_main]

use haystack_core::json::{from_json_str, JsonCodec};
use haystack_core::Value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(val) = from_json_str(text) {
        let _ = Value::from_json(&val.to_json());
    }
});
