#![no_main]
use libfuzzer_sys::fuzz_target;
use segdump::formats::elf::segments::parse_program_headers;

fuzz_target!(|data: &[u8]| {
    if let Ok(headers) = parse_program_headers(data) {
        for h in &headers {
            let _ = segdump::dump::qualifies(h, segdump::DEFAULT_MIN_VADDR);
        }
    }
});
