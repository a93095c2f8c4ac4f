#![no_main]

use libfuzzer_sys::fuzz_target;
use lvgl_image::{decode_to_rgba, parse_binary, parse_c_source, TrueColorDepth};

fuzz_target!(|data: &[u8]| {
    // Parsers and the decoder should never panic on arbitrary input
    if let Ok(parsed) = parse_binary(data) {
        let _ = decode_to_rgba(&parsed, TrueColorDepth::Rgb565);
    }
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(parsed) = parse_c_source(text) {
            let _ = decode_to_rgba(&parsed, TrueColorDepth::Rgb888);
        }
    }
});
