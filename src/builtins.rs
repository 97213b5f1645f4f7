//! Standard named decoders.
//!
//! | name     | kind   | result                                        |
//! |----------|--------|-----------------------------------------------|
//! | `string` | single | `String`                                      |
//! | `bool`   | single | `bool` (YAML 1.1 literals, `1`, `0`)          |
//! | `int`    | single | `i64` (sign, `0x`/`0o`/`0b`, `_` separators)  |
//! | `uint`   | single | `u64`                                         |
//! | `float`  | single | `f64` (incl. `.nan`, `.inf`)                  |
//! | `csv`    | single | `Vec<String>`, comma separated and trimmed    |
//! | `list`   | multi  | `Vec<String>`                                 |
//!
//! A missing key decodes to "no value", so the field receives its zero value when strict
//! typing is off. Numeric results rely on the conversion rules to reach narrower fields.

use crate::parse_scalars::{parse_bool, parse_f64, parse_int_signed, parse_int_unsigned};
use crate::registry::Registry;
use crate::value::Value;

pub const STRING: &str = "string";
pub const BOOL: &str = "bool";
pub const INT: &str = "int";
pub const UINT: &str = "uint";
pub const FLOAT: &str = "float";
pub const CSV: &str = "csv";
pub const LIST: &str = "list";

/// Register every built-in decoder into `registry`, replacing same-named entries.
pub fn register_builtins(registry: &mut Registry) {
    registry
        .register_single(STRING, |value, exists, _| {
            Ok(exists.then(|| Value::new(value.to_owned())))
        })
        .register_single(BOOL, |value, exists, _| {
            if !exists {
                return Ok(None);
            }
            Ok(Value::some(parse_bool(value)?))
        })
        .register_single(INT, |value, exists, _| {
            if !exists {
                return Ok(None);
            }
            Ok(Value::some(parse_int_signed::<i64>(value, "i64")?))
        })
        .register_single(UINT, |value, exists, _| {
            if !exists {
                return Ok(None);
            }
            Ok(Value::some(parse_int_unsigned::<u64>(value, "u64")?))
        })
        .register_single(FLOAT, |value, exists, _| {
            if !exists {
                return Ok(None);
            }
            Ok(Value::some(parse_f64(value)?))
        })
        .register_single(CSV, |value, exists, _| {
            if !exists || value.trim().is_empty() {
                return Ok(None);
            }
            let items: Vec<String> = value.split(',').map(|s| s.trim().to_owned()).collect();
            Ok(Value::some(items))
        })
        .register_multi(LIST, |values, exists, _| {
            Ok(exists.then(|| Value::new(values.to_vec())))
        });
}

impl Registry {
    /// A registry preloaded with the built-in decoders.
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new();
        register_builtins(&mut registry);
        registry
    }
}
