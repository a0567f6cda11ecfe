#![no_main]

use libfuzzer_sys::fuzz_target;
use berec::Record;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut record) = Record::decode(data) {
        let _ = record.to_text_lines();
        let _ = record.encode();
    }
    if let Ok(mut record) = Record::decode_lazy(data) {
        let _ = record.encode();
        let _ = record.to_text_lines();
        let _ = record.encode();
    }
});
