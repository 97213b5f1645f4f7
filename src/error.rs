//! Defines decode errors and the field position they are reported at.
use std::fmt;

use crate::record::Tags;

/// Boxed error returned by decoder functions and carried as a cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Type name reported when a decoder returned the "no value" sentinel.
pub const NO_VALUE: &str = "<no value>";

/// Which flavour of decoder function was active for a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecoderKind {
    /// No decoder was resolved yet.
    #[default]
    Undefined,
    /// A single-value decoder, fed from [`crate::SingleSource::lookup`].
    Single,
    /// A multi-value decoder, fed from [`crate::MultiSource::lookup_all`].
    Multi,
}

impl fmt::Display for DecoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderKind::Undefined => f.write_str("undefined"),
            DecoderKind::Single => f.write_str("single"),
            DecoderKind::Multi => f.write_str("multi"),
        }
    }
}

/// The field being processed when an error occurred.
///
/// Everything that was not resolved yet is `None` (or [`DecoderKind::Undefined`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPosition {
    pub(crate) field: Option<&'static str>,
    pub(crate) tags: Tags,
    pub(crate) key: Option<String>,
    pub(crate) decoder: Option<String>,
    pub(crate) kind: DecoderKind,
}

impl FieldPosition {
    /// Position at the start of processing `field`: nothing resolved yet.
    pub(crate) fn at(field: &'static str, tags: Tags) -> Self {
        Self {
            field: Some(field),
            tags,
            ..Self::default()
        }
    }

    /// Declared identifier of the field.
    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    /// Tag set attached to the field.
    pub fn tags(&self) -> Tags {
        self.tags
    }

    /// Source key that was (or was about to be) read.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Name of the decoder in use.
    pub fn decoder(&self) -> Option<&str> {
        self.decoder.as_deref()
    }

    /// Single or multi mode of the decoder in use.
    pub fn kind(&self) -> DecoderKind {
        self.kind
    }
}

/// Failure to resolve a decoder name in the [`crate::Registry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is registered as both a single-value and a multi-value decoder.
    Ambiguous { name: String },
    /// The name is not registered at all.
    Unknown { name: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Ambiguous { name } => {
                write!(f, "decoder `{name}` is registered as both single and multi")
            }
            RegistryError::Unknown { name } => write!(f, "unknown decoder `{name}`"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Failure to convert a decoded value into the declared type of a field.
#[derive(Debug)]
pub enum ConvertError {
    /// The conversion rules have no path from the returned type to the declared type.
    Unsupported,
    /// A numeric conversion was attempted, but the value does not fit the target.
    OutOfRange { value: String, target: &'static str },
    /// A user-provided conversion failed.
    Custom(BoxError),
}

impl ConvertError {
    /// Wrap an arbitrary error raised by a custom [`crate::Decodable::convert`].
    pub fn custom<E: Into<BoxError>>(err: E) -> Self {
        ConvertError::Custom(err.into())
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Unsupported => f.write_str("no conversion rule applies"),
            ConvertError::OutOfRange { value, target } => {
                write!(f, "value {value} is out of range for {target}")
            }
            ConvertError::Custom(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Custom(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Error returned by [`crate::TagDecoder`].
///
/// All variants except the two precondition failures carry the [`FieldPosition`]
/// that was active when decoding stopped.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The dynamic decode target was missing.
    NilTarget,
    /// The dynamic decode target does not hold a record.
    NotRecordReference { type_name: &'static str },
    /// A field tagged for inlining is neither a record nor an optional record.
    InlineTargetNotRecord {
        position: FieldPosition,
        declared_type: &'static str,
    },
    /// Inline recursion went deeper than [`crate::Options::max_inline_depth`].
    InlineDepthExceeded {
        position: FieldPosition,
        depth: usize,
    },
    /// The decoder name could not be resolved.
    UnknownDecoder {
        position: FieldPosition,
        cause: RegistryError,
    },
    /// The decoder function returned an error.
    DecodeFailed {
        position: FieldPosition,
        cause: BoxError,
    },
    /// The decoded value could not be converted (`assignment == false`) or
    /// assigned (`assignment == true`) to the field.
    WrongType {
        position: FieldPosition,
        assignment: bool,
        returned_type: &'static str,
        declared_type: &'static str,
        cause: Option<ConvertError>,
    },
}

impl Error {
    pub(crate) fn inline_not_record(position: FieldPosition, declared_type: &'static str) -> Self {
        Error::InlineTargetNotRecord {
            position,
            declared_type,
        }
    }

    pub(crate) fn unknown_decoder(position: FieldPosition, cause: RegistryError) -> Self {
        Error::UnknownDecoder { position, cause }
    }

    pub(crate) fn decode_failed(position: FieldPosition, cause: BoxError) -> Self {
        Error::DecodeFailed { position, cause }
    }

    /// `WrongType` raised while converting in non-strict mode.
    ///
    /// [`ConvertError::Unsupported`] is folded into "no cause".
    pub(crate) fn conversion(
        position: FieldPosition,
        returned_type: &'static str,
        declared_type: &'static str,
        cause: ConvertError,
    ) -> Self {
        let cause = match cause {
            ConvertError::Unsupported => None,
            other => Some(other),
        };
        Error::WrongType {
            position,
            assignment: false,
            returned_type,
            declared_type,
            cause,
        }
    }

    /// `WrongType` raised by the exact-type check of strict mode.
    pub(crate) fn assignment(
        position: FieldPosition,
        returned_type: &'static str,
        declared_type: &'static str,
    ) -> Self {
        Error::WrongType {
            position,
            assignment: true,
            returned_type,
            declared_type,
            cause: None,
        }
    }

    /// Position of the failing field, `None` for precondition failures.
    pub fn position(&self) -> Option<&FieldPosition> {
        match self {
            Error::NilTarget | Error::NotRecordReference { .. } => None,
            Error::InlineTargetNotRecord { position, .. }
            | Error::InlineDepthExceeded { position, .. }
            | Error::UnknownDecoder { position, .. }
            | Error::DecodeFailed { position, .. }
            | Error::WrongType { position, .. } => Some(position),
        }
    }

    /// Declared identifier of the failing field.
    pub fn field(&self) -> Option<&'static str> {
        self.position().and_then(FieldPosition::field)
    }

    /// Tags of the failing field (empty for precondition failures).
    pub fn tags(&self) -> Tags {
        self.position().map(FieldPosition::tags).unwrap_or_default()
    }

    /// Source key of the failing field, if it was resolved.
    pub fn key(&self) -> Option<&str> {
        self.position().and_then(FieldPosition::key)
    }

    /// Decoder name of the failing field, if it was resolved.
    pub fn decoder(&self) -> Option<&str> {
        self.position().and_then(FieldPosition::decoder)
    }

    /// Decoder mode of the failing field.
    pub fn kind(&self) -> DecoderKind {
        self.position().map(FieldPosition::kind).unwrap_or_default()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NilTarget => f.write_str("decode target is missing"),
            Error::NotRecordReference { type_name } => {
                write!(f, "decode target of type {type_name} is not a record")
            }
            Error::InlineTargetNotRecord {
                position,
                declared_type,
            } => fmt_with_position(
                f,
                &format!("field of type {declared_type} is tagged for inlining, but is not a record or optional record"),
                position,
            ),
            Error::InlineDepthExceeded { position, depth } => fmt_with_position(
                f,
                &format!("inline recursion exceeded depth {depth}"),
                position,
            ),
            Error::UnknownDecoder { position, cause } => {
                fmt_with_position(f, &cause.to_string(), position)
            }
            Error::DecodeFailed { position, cause } => {
                fmt_with_position(f, &format!("failed to decode: {cause}"), position)
            }
            Error::WrongType {
                position,
                assignment,
                returned_type,
                declared_type,
                cause,
            } => {
                let verb = if *assignment { "assign" } else { "convert" };
                let mut msg = format!("decoder returned {returned_type}, cannot {verb} to {declared_type}");
                if let Some(cause) = cause {
                    msg.push_str(": ");
                    msg.push_str(&cause.to_string());
                }
                fmt_with_position(f, &msg, position)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnknownDecoder { cause, .. } => Some(cause),
            Error::DecodeFailed { cause, .. } => Some(cause.as_ref()),
            Error::WrongType { cause, .. } => cause.as_ref().map(|c| c as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

/// Print a message suffixed with the field, key and decoder that are known.
fn fmt_with_position(f: &mut fmt::Formatter<'_>, msg: &str, position: &FieldPosition) -> fmt::Result {
    match position.field {
        Some(field) => write!(f, "field `{field}`: {msg}")?,
        None => write!(f, "{msg}")?,
    }
    if let Some(key) = &position.key {
        write!(f, " (key `{key}`")?;
        if let Some(decoder) = &position.decoder {
            write!(f, ", decoder `{decoder}`")?;
        }
        f.write_str(")")
    } else if let Some(decoder) = &position.decoder {
        write!(f, " (decoder `{decoder}`)")
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn position() -> FieldPosition {
        FieldPosition {
            field: Some("Port"),
            tags: Tags::new(&[("read", "port")]),
            key: Some("port".to_owned()),
            decoder: Some("port".to_owned()),
            kind: DecoderKind::Single,
        }
    }

    #[test]
    fn precondition_errors_have_no_position() {
        let err = Error::NilTarget;
        assert!(err.position().is_none());
        assert_eq!(err.field(), None);
        assert!(err.tags().is_empty());
        assert_eq!(err.kind(), DecoderKind::Undefined);
    }

    #[test]
    fn display_mentions_field_key_and_decoder() {
        let err = Error::decode_failed(position(), "bad digit".into());
        assert_eq!(
            err.to_string(),
            "field `Port`: failed to decode: bad digit (key `port`, decoder `port`)"
        );
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("bad digit"));
    }

    #[test]
    fn unsupported_conversion_has_no_cause() {
        let err = Error::conversion(position(), "alloc::string::String", "u16", ConvertError::Unsupported);
        assert!(matches!(err, Error::WrongType { assignment: false, cause: None, .. }));
        assert!(err.source().is_none());
        assert!(err.to_string().contains("cannot convert to u16"));
    }

    #[test]
    fn out_of_range_conversion_keeps_cause() {
        let cause = ConvertError::OutOfRange {
            value: "70000".to_owned(),
            target: "u16",
        };
        let err = Error::conversion(position(), "i64", "u16", cause);
        assert!(matches!(
            err,
            Error::WrongType { assignment: false, cause: Some(ConvertError::OutOfRange { .. }), .. }
        ));
        assert!(err.to_string().ends_with("out of range for u16 (key `port`, decoder `port`)"));
    }

    #[test]
    fn registry_error_is_the_source_of_unknown_decoder() {
        let err = Error::unknown_decoder(
            position(),
            RegistryError::Ambiguous {
                name: "port".to_owned(),
            },
        );
        let source = err.source().and_then(|s| s.downcast_ref::<RegistryError>());
        assert!(matches!(source, Some(RegistryError::Ambiguous { .. })));
    }
}
