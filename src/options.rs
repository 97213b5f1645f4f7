use serde::{Deserialize, Serialize};

/// Decode configuration.
///
/// Selects the tag keys the engine reads, the fallback rules for untagged fields, the
/// inline decoder name and the typing policy.
///
/// Example: decode a small `Profile` with custom `Options`.
///
/// ```rust
/// use std::collections::HashMap;
/// use tagwise::{record, TagDecoder, Value};
///
/// #[derive(Debug, Default)]
/// struct Profile {
///     user: String,
///     port: u16,
/// }
///
/// record! {
///     Profile {
///         user: value { "read" = "user" },
///         port: value { "read" = "port", "type" = "port" },
///     }
/// }
///
/// let options = tagwise::options! {
///     name_tag: "read".to_owned(),
///     decoder_tag: "type".to_owned(),
///     default_decoder: Some("string".to_owned()),
/// };
///
/// let mut decoder = TagDecoder::new(options);
/// decoder
///     .register_single("string", |value, _, _| Ok(Value::some(value.to_owned())))
///     .register_single("port", |value, exists, _| {
///         if !exists {
///             return Ok(Value::some(22));
///         }
///         Ok(Value::some(value.parse::<u16>()?))
///     });
///
/// let source = HashMap::from([("user".to_owned(), "jane".to_owned())]);
/// let mut profile = Profile::default();
/// decoder.decode_single(&mut profile, &source).unwrap();
/// assert_eq!(profile.user, "jane");
/// assert_eq!(profile.port, 22);
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Tag key holding the source key of a field.
    pub name_tag: String,
    /// If true, fields without a name tag are skipped instead of being read under their
    /// declared identifier. Default: false.
    pub strict_name_tag: bool,
    /// Tag key holding the decoder name of a field.
    pub decoder_tag: String,
    /// Decoder used for fields without a decoder tag. `None` skips such fields.
    pub default_decoder: Option<String>,
    /// Decoder name that makes the engine recurse into a nested record. `None` disables
    /// inlining.
    pub inline_decoder: Option<String>,
    /// If true, decoded values must have exactly the declared type of the field.
    /// If false, the conversion rules of [`crate::Decodable`] are applied and a "no value"
    /// result stores the zero value. Default: false.
    pub strict_typing: bool,
    /// Maximum nesting of inline records. Protects against self-referential optional
    /// records that would otherwise be materialized forever. Default: 64.
    pub max_inline_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name_tag: "name".to_owned(),
            strict_name_tag: false,
            decoder_tag: "decoder".to_owned(),
            default_decoder: None,
            inline_decoder: Some("inline".to_owned()),
            strict_typing: false,
            max_inline_depth: 64,
        }
    }
}

impl Options {
    /// Inline decoder name, if inlining is enabled.
    pub(crate) fn inline(&self) -> Option<&str> {
        self.inline_decoder.as_deref().filter(|name| !name.is_empty())
    }

    /// Default decoder name, if untagged fields are decoded.
    pub(crate) fn default_decoder(&self) -> Option<&str> {
        self.default_decoder.as_deref().filter(|name| !name.is_empty())
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("name_tag", &self.name_tag)
            .field("strict_name_tag", &self.strict_name_tag)
            .field("decoder_tag", &self.decoder_tag)
            .field("default_decoder", &self.default_decoder)
            .field("inline_decoder", &self.inline_decoder)
            .field("strict_typing", &self.strict_typing)
            .field("max_inline_depth", &self.max_inline_depth)
            .finish()
    }
}
