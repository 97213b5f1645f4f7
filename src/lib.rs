//! Tag-driven decoding of flat string maps into typed records.
//!
//! Supported:
//! - Records described through [`Record`], usually implemented with [`record!`].
//! - Per-field source key and decoder name taken from static tags, with fallbacks.
//! - Single-value and multi-value decoder functions, registered by name in a [`Registry`].
//! - Nested records (by value or as `Option<Box<_>>`) decoded inline from the same source.
//! - Strict typing (exact type only) or the conversion rules of [`Decodable`].
//! - A [`DataStore`] shared by every decoder within one decode call.
//!
//! Policies:
//! - Untagged fields are skipped unless a default decoder is configured.
//! - The first failing field stops the call; the target may be partially written.
//!
//! ```rust
//! use std::collections::HashMap;
//! use tagwise::{record, Options, Registry, TagDecoder};
//!
//! #[derive(Debug, Default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     debug: bool,
//! }
//!
//! record! {
//!     Server {
//!         host: value { "name" = "HOST", "decoder" = "string" },
//!         port: value { "name" = "PORT", "decoder" = "uint" },
//!         debug: value { "name" = "DEBUG", "decoder" = "bool" },
//!     }
//! }
//!
//! let decoder = TagDecoder::with_registry(Options::default(), Registry::with_builtins());
//! let source = HashMap::from([
//!     ("HOST".to_owned(), "localhost".to_owned()),
//!     ("PORT".to_owned(), "8080".to_owned()),
//! ]);
//!
//! let mut server = Server::default();
//! decoder.decode_single(&mut server, &source).unwrap();
//! assert_eq!(server.host, "localhost");
//! assert_eq!(server.port, 8080);
//! assert!(!server.debug);
//! ```

#[cfg(feature = "builtins")]
pub mod builtins;
mod context;
mod engine;
mod error;
mod macros;
mod options;
pub mod parse_scalars;
mod record;
mod registry;
pub mod source;
mod value;

pub use context::{Context, DataStore};
pub use engine::{DecodeReport, TagDecoder};
pub use error::{BoxError, ConvertError, DecoderKind, Error, FieldPosition, NO_VALUE, RegistryError};
pub use options::Options;
pub use record::{Field, OptionalRecord, Record, RecordSlot, Slot, Tags};
pub use registry::{DecodeResult, MultiDecoder, Registry, Resolved, SingleDecoder};
#[cfg(feature = "env")]
pub use source::EnvSource;
pub use source::{MultiSource, NoSource, SingleSource, Source, SplitSource, Synthesized};
pub use value::{Decodable, FieldValue, Value};
