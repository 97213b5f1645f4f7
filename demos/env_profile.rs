//! Reads a service profile from `PROFILE_*` environment variables.
//!
//! ```sh
//! PROFILE_USER=jane PROFILE_PORTS=80,443 cargo run --example env_profile
//! ```

use tagwise::{EnvSource, Options, Registry, TagDecoder, Value, record};

#[derive(Debug, Default)]
struct Limits {
    connections: u32,
    timeout_secs: f64,
}

record! {
    Limits {
        connections: value { "env" = "MAX_CONNECTIONS", "decoder" = "uint" },
        timeout_secs: value { "env" = "TIMEOUT", "decoder" = "float" },
    }
}

#[derive(Debug, Default)]
struct Profile {
    user: String,
    host: String,
    port: u16,
    ports: Vec<u16>,
    debug: bool,
    limits: Limits,
}

record! {
    Profile {
        user: value { "env" = "USER" },
        host: value { "env" = "HOST" },
        port: value { "env" = "PORT", "decoder" = "port" },
        ports: value { "env" = "PORTS", "decoder" = "ports" },
        debug: value { "env" = "DEBUG", "decoder" = "bool" },
        limits: record { "decoder" = "inline" },
    }
}

fn main() {
    let options = Options {
        name_tag: "env".to_owned(),
        default_decoder: Some("string".to_owned()),
        ..Options::default()
    };
    let mut decoder = TagDecoder::with_registry(options, Registry::with_builtins());
    decoder
        .register_single("port", |value, exists, _| {
            if !exists {
                return Ok(Value::some(22u16));
            }
            Ok(Value::some(value.parse::<u16>()?))
        })
        .register_multi("ports", |values, _, _| {
            let ports = values
                .iter()
                .filter(|v| !v.is_empty())
                .map(|v| v.parse::<u16>())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::some(ports))
        });

    let mut profile = Profile::default();
    match decoder.decode(&mut profile, &EnvSource::with_prefix("PROFILE_")) {
        Ok(()) => println!("{profile:#?}"),
        Err(err) => {
            eprintln!("invalid profile: {err}");
            std::process::exit(1);
        }
    }
}
