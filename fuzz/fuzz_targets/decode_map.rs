#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use tagwise::{Registry, TagDecoder, record};

#[derive(Debug, Default)]
struct Leaf {
    flag: bool,
    small: u8,
    signed: i16,
    ratio: f32,
    items: Vec<String>,
}

record! {
    Leaf {
        flag: value { "name" = "flag", "decoder" = "bool" },
        small: value { "name" = "small", "decoder" = "uint" },
        signed: value { "name" = "signed", "decoder" = "int" },
        ratio: value { "name" = "ratio", "decoder" = "float" },
        items: value { "name" = "items", "decoder" = "csv" },
    }
}

#[derive(Debug, Default)]
struct Doc {
    name: String,
    leaf: Leaf,
    next: Option<Box<Doc>>,
}

record! {
    Doc {
        name: value {},
        leaf: record { "decoder" = "inline" },
        next: optional { "decoder" = "inline" },
    }
}

// Input is split into `key=value` lines; decoding may fail but must not panic, and the
// self-referential `next` chain must stop at the depth limit.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);
    let source: HashMap<String, String> = s
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

    let strict = data.first().is_some_and(|b| b & 1 == 1);
    let options = tagwise::options! {
        default_decoder: Some("string".to_owned()),
        strict_typing: strict,
        max_inline_depth: 16,
    };
    let decoder = TagDecoder::with_registry(options, Registry::with_builtins());
    let mut doc = Doc::default();
    let _ = decoder.decode_single(&mut doc, &source);
});
