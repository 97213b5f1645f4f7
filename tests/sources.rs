use std::collections::{BTreeMap, HashMap};

use tagwise::{EnvSource, Options, Registry, Synthesized, TagDecoder, record};

#[derive(Debug, Default, PartialEq)]
struct Listener {
    host: String,
    ports: Vec<u16>,
    tags: Vec<String>,
}

record! {
    Listener {
        host: value { "name" = "HOST", "decoder" = "string" },
        ports: value { "name" = "PORTS", "decoder" = "ports" },
        tags: value { "name" = "TAGS", "decoder" = "list" },
    }
}

fn decoder() -> TagDecoder {
    let mut decoder = TagDecoder::with_registry(Options::default(), Registry::with_builtins());
    decoder.register_multi("ports", |values, _, _| {
        let ports = values
            .iter()
            .map(|v| v.parse::<u16>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tagwise::Value::some(ports))
    });
    decoder
}

#[test]
fn multi_only_source_hides_single_values() {
    let source: BTreeMap<String, Vec<String>> = BTreeMap::from([
        ("HOST".to_owned(), vec!["ignored".to_owned()]),
        ("PORTS".to_owned(), vec!["80".to_owned(), "443".to_owned()]),
        ("TAGS".to_owned(), vec!["edge".to_owned()]),
    ]);
    let mut listener = Listener::default();
    decoder().decode_multi(&mut listener, &source).unwrap();
    assert_eq!(
        listener,
        Listener {
            host: String::new(),
            ports: vec![80, 443],
            tags: vec!["edge".to_owned()],
        }
    );
}

#[test]
fn synthesized_source_answers_both_kinds() {
    let source = Synthesized::from_multi(HashMap::from([
        ("HOST".to_owned(), vec!["a.example".to_owned(), "b.example".to_owned()]),
        ("PORTS".to_owned(), vec!["8080".to_owned()]),
    ]));
    let mut listener = Listener::default();
    decoder().decode(&mut listener, &source).unwrap();
    assert_eq!(listener.host, "a.example");
    assert_eq!(listener.ports, [8080]);
    assert!(listener.tags.is_empty());
}

#[test]
fn borrowed_maps_are_sources() {
    let source: HashMap<&str, &str> = HashMap::from([("HOST", "localhost")]);
    let mut listener = Listener::default();
    decoder().decode_single(&mut listener, &source).unwrap();
    assert_eq!(listener.host, "localhost");
}

#[derive(Debug, Default)]
struct Package {
    name: String,
    version: Vec<String>,
    missing: String,
}

record! {
    Package {
        name: value { "name" = "NAME", "decoder" = "string" },
        version: value { "name" = "VERSION", "decoder" = "list" },
        missing: value { "name" = "TAGWISE_UNSET", "decoder" = "string" },
    }
}

// Cargo exports `CARGO_PKG_*` to the test process.
#[test]
fn environment_is_a_source() {
    let source = EnvSource {
        prefix: "CARGO_PKG_".to_owned(),
        separator: '.',
    };
    let mut package = Package::default();
    decoder().decode(&mut package, &source).unwrap();
    assert_eq!(package.name, env!("CARGO_PKG_NAME"));
    assert_eq!(package.version.join("."), env!("CARGO_PKG_VERSION"));
    assert_eq!(package.version.len(), 3);
    assert!(package.missing.is_empty());
}

#[test]
fn bad_multi_value_reports_multi_kind() {
    let source: HashMap<String, Vec<String>> =
        HashMap::from([("PORTS".to_owned(), vec!["80".to_owned(), "http".to_owned()])]);
    let err = decoder()
        .decode_multi(&mut Listener::default(), &source)
        .unwrap_err();
    assert_eq!(err.kind(), tagwise::DecoderKind::Multi);
    assert_eq!(err.key(), Some("PORTS"));
}
