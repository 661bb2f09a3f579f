#![no_main]

use haystack_core::zinc;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = zinc::read_value(text);
    // Anything the reader accepts must re-read to the same grid.
    if let Ok(grid) = zinc::read_grid(text) {
        let again = zinc::read_grid(&zinc::write_grid(&grid));
        assert_eq!(again.as_ref().ok(), Some(&grid));
    }
});
