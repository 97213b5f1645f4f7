#![no_main]

use libfuzzer_sys::fuzz_target;
use tagwise::parse_scalars::{parse_bool, parse_f64, parse_int_signed, parse_int_unsigned};

// Every scalar parser must return, never panic, on arbitrary text.
fuzz_target!(|data: &[u8]| {
    if data.len() > 4 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);

    let _ = parse_bool(&s);
    let _ = parse_f64(&s);
    let _ = parse_int_signed::<i8>(&s, "i8");
    let _ = parse_int_signed::<i128>(&s, "i128");
    let _ = parse_int_unsigned::<u16>(&s, "u16");
    if let Ok(v) = parse_int_unsigned::<u128>(&s, "u128") {
        assert_eq!(parse_int_unsigned::<u128>(&v.to_string(), "u128"), Ok(v));
    }
});
