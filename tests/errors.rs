use std::collections::HashMap;
use std::error::Error as _;

use tagwise::{DecoderKind, Error, RegistryError, TagDecoder, Tags, Value, record};

#[derive(Debug, Default)]
struct Single {
    value: String,
}

record! {
    Single {
        value: value { "name" = "key", "decoder" = "never" },
    }
}

fn decoder() -> TagDecoder {
    let mut decoder = TagDecoder::default();
    decoder
        .register_single("always", |value, _, _| Ok(Value::some(value.to_owned())))
        .register_single("never", |_, _, _| Err("never decoder".into()));
    decoder
}

fn source() -> HashMap<String, String> {
    HashMap::from([("key".to_owned(), "value".to_owned())])
}

#[test]
fn failing_decoder_is_a_hard_stop_with_context() {
    let err = decoder().decode_single(&mut Single::default(), &source()).unwrap_err();

    assert!(matches!(err, Error::DecodeFailed { .. }));
    assert_eq!(err.field(), Some("value"));
    assert_eq!(err.decoder(), Some("never"));
    assert_eq!(err.key(), Some("key"));
    assert_eq!(err.kind(), DecoderKind::Single);
    assert_eq!(err.tags(), Tags::new(&[("name", "key"), ("decoder", "never")]));
    assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("never decoder"));
    assert_eq!(
        err.to_string(),
        "field `value`: failed to decode: never decoder (key `key`, decoder `never`)"
    );
}

#[test]
fn name_registered_twice_is_ambiguous() {
    let mut decoder = decoder();
    decoder.register_multi("never", |_, _, _| Ok(None));
    let err = decoder.decode_single(&mut Single::default(), &source()).unwrap_err();

    match &err {
        Error::UnknownDecoder { cause, .. } => {
            assert_eq!(cause, &RegistryError::Ambiguous { name: "never".to_owned() });
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.key(), Some("key"));
    assert_eq!(err.kind(), DecoderKind::Undefined);
}

#[test]
fn unregistered_name_is_unknown() {
    let mut decoder = decoder();
    decoder.registry_mut().unregister("never");
    let err = decoder.decode_single(&mut Single::default(), &source()).unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownDecoder { cause: RegistryError::Unknown { .. }, .. }
    ));
    assert!(err.to_string().contains("unknown decoder `never`"));
}

#[derive(Debug, Default)]
struct Partial {
    first: String,
    second: String,
    third: String,
}

record! {
    Partial {
        first: value { "name" = "key", "decoder" = "always" },
        second: value { "name" = "key", "decoder" = "never" },
        third: value { "name" = "key", "decoder" = "always" },
    }
}

#[test]
fn fields_before_the_failure_stay_written() {
    let mut partial = Partial::default();
    let err = decoder().decode_single(&mut partial, &source()).unwrap_err();
    assert_eq!(err.field(), Some("second"));
    assert_eq!(partial.first, "value");
    assert_eq!(partial.third, "");
}

#[test]
fn errors_work_with_anyhow() -> anyhow::Result<()> {
    let mut partial = Partial::default();
    let result: anyhow::Result<()> = decoder()
        .decode_single(&mut partial, &source())
        .map_err(anyhow::Error::from);
    let err = result.expect_err("decoding must fail");
    let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[1], "never decoder");

    let mut single = Single::default();
    let mut decoder = decoder();
    decoder.register_single("never", |value, _, _| Ok(Value::some(value.to_owned())));
    decoder.decode_single(&mut single, &source())?;
    assert_eq!(single.value, "value");
    Ok(())
}
