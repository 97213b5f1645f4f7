use std::collections::HashMap;

use indoc::indoc;
use tagwise::{Error, Options, Registry, TagDecoder, record};

#[derive(Debug, Default, PartialEq)]
struct Settings {
    name: String,
    verbose: bool,
    retries: u8,
    offset: i32,
    ratio: f64,
    hosts: Vec<String>,
}

record! {
    Settings {
        name: value { "name" = "name" },
        verbose: value { "name" = "verbose", "decoder" = "bool" },
        retries: value { "name" = "retries", "decoder" = "uint" },
        offset: value { "name" = "offset", "decoder" = "int" },
        ratio: value { "name" = "ratio", "decoder" = "float" },
        hosts: value { "name" = "hosts", "decoder" = "csv" },
    }
}

fn decoder() -> TagDecoder {
    let options = tagwise::options! {
        default_decoder: Some("string".to_owned()),
    };
    TagDecoder::with_registry(options, Registry::with_builtins())
}

/// Parse `key=value` lines into a single-value source.
fn source(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .collect()
}

#[test]
fn builtins_decode_a_settings_file() {
    let text = indoc! {"
        name = api
        verbose = yes
        retries = 0x0A
        offset = -1_000
        ratio = 0.5
        hosts = a.example, b.example
    "};
    let mut settings = Settings::default();
    decoder().decode_single(&mut settings, &source(text)).unwrap();
    assert_eq!(
        settings,
        Settings {
            name: "api".to_owned(),
            verbose: true,
            retries: 10,
            offset: -1000,
            ratio: 0.5,
            hosts: vec!["a.example".to_owned(), "b.example".to_owned()],
        }
    );
}

#[test]
fn missing_keys_leave_zero_values() {
    let mut settings = Settings {
        verbose: true,
        retries: 3,
        ..Settings::default()
    };
    decoder().decode_single(&mut settings, &source("")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn wide_builtin_result_must_fit_the_field() {
    let mut settings = Settings::default();
    let err = decoder()
        .decode_single(&mut settings, &source("retries = 300"))
        .unwrap_err();
    assert!(matches!(err, Error::WrongType { assignment: false, cause: Some(_), .. }));
    assert_eq!(err.field(), Some("retries"));
}

#[test]
fn strict_typing_needs_matching_builtin() {
    let decoder = TagDecoder::with_registry(
        Options {
            strict_typing: true,
            default_decoder: Some("string".to_owned()),
            ..Options::default()
        },
        Registry::with_builtins(),
    );
    let mut settings = Settings::default();
    let err = decoder
        .decode_single(&mut settings, &source("name = api\nverbose = off\nretries = 1"))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::WrongType { assignment: true, returned_type: "u64", declared_type: "u8", .. }
    ));
    assert_eq!(settings.name, "api");
    assert!(!settings.verbose);
}

#[test]
fn malformed_input_is_a_decode_failure() {
    let mut settings = Settings::default();
    let err = decoder()
        .decode_single(&mut settings, &source("verbose = maybe"))
        .unwrap_err();
    assert!(matches!(err, Error::DecodeFailed { .. }));
    assert!(err.to_string().contains("invalid bool: `maybe`"));
}
