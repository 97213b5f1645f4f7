//! The tag-driven decode loop.
//!
//! [`TagDecoder`] walks the fields of a [`Record`] in declaration order. For each field it
//! resolves a decoder name and a source key from the field tags, either recurses into a
//! nested record (inlining) or runs the named decoder, and stores the result according to
//! the typing policy of its [`Options`]. The first error stops the whole call.

use std::mem;

use crate::context::{Context, DataStore};
use crate::error::{DecoderKind, Error, FieldPosition, NO_VALUE};
use crate::options::Options;
use crate::record::{Field, Record, Slot};
use crate::registry::{DecodeResult, Registry, Resolved};
use crate::source::{MultiSource, NoSource, SingleSource, Source, SplitSource};
use crate::value::Value;

/// Counters collected during one top-level decode call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Fields looked at, inline fields and fields of nested records included.
    pub fields_visited: usize,
    /// Fields skipped for lack of a decoder tag or a name tag.
    pub fields_skipped: usize,
    /// Leaf fields that received a decoded or zero value.
    pub fields_assigned: usize,
    /// Nested records entered through the inline decoder.
    pub inline_records: usize,
    /// Deepest inline nesting reached; 0 when nothing was inlined.
    pub max_depth: usize,
}

/// Decodes records from a lookup source using a [`Registry`] of named decoders.
///
/// A `TagDecoder` is immutable while decoding and can be shared between threads; every
/// decode call carries its own positional state and [`DataStore`].
#[derive(Clone, Debug, Default)]
pub struct TagDecoder {
    options: Options,
    registry: Registry,
}

impl TagDecoder {
    /// A decoder with an empty registry.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            registry: Registry::new(),
        }
    }

    pub fn with_registry(options: Options, registry: Registry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// See [`Registry::register_single`].
    pub fn register_single<F>(&mut self, name: impl Into<String>, decoder: F) -> &mut Self
    where
        F: Fn(&str, bool, &mut Context<'_>) -> DecodeResult + Send + Sync + 'static,
    {
        self.registry.register_single(name, decoder);
        self
    }

    /// See [`Registry::register_multi`].
    pub fn register_multi<F>(&mut self, name: impl Into<String>, decoder: F) -> &mut Self
    where
        F: Fn(&[String], bool, &mut Context<'_>) -> DecodeResult + Send + Sync + 'static,
    {
        self.registry.register_multi(name, decoder);
        self
    }

    /// Decode `target` from `source` with a fresh [`DataStore`].
    pub fn decode<S>(&self, target: &mut dyn Record, source: &S) -> Result<(), Error>
    where
        S: Source + ?Sized,
    {
        let mut data = DataStore::new();
        self.decode_with_data(target, source, &mut data)
    }

    /// Decode `target` from `source`, sharing `data` with every decoder of the call.
    ///
    /// The store is not cleared, so values left by an earlier call are visible.
    pub fn decode_with_data<S>(
        &self,
        target: &mut dyn Record,
        source: &S,
        data: &mut DataStore,
    ) -> Result<(), Error>
    where
        S: Source + ?Sized,
    {
        self.decode_with_report(target, source, data).map(drop)
    }

    /// Like [`TagDecoder::decode_with_data`], returning counters about the call.
    pub fn decode_with_report<S>(
        &self,
        target: &mut dyn Record,
        source: &S,
        data: &mut DataStore,
    ) -> Result<DecodeReport, Error>
    where
        S: Source + ?Sized,
    {
        let mut report = DecodeReport::default();
        self.decode_record(target, source, data, 0, &mut report)
            .inspect_err(|err| tracing::debug!(field = err.field().unwrap_or_default(), error = %err, "decode failed"))?;
        tracing::debug!(
            visited = report.fields_visited,
            skipped = report.fields_skipped,
            assigned = report.fields_assigned,
            inline = report.inline_records,
            "decode finished"
        );
        Ok(report)
    }

    /// Decode from a source with only single values; multi decoders see absent keys.
    pub fn decode_single<S>(&self, target: &mut dyn Record, source: &S) -> Result<(), Error>
    where
        S: SingleSource + ?Sized,
    {
        self.decode(target, &SplitSource::single_only(source))
    }

    /// Decode from a source with only multi values; single decoders see absent keys.
    pub fn decode_multi<M>(&self, target: &mut dyn Record, source: &M) -> Result<(), Error>
    where
        M: MultiSource + ?Sized,
    {
        let source: SplitSource<NoSource, &M> = SplitSource::multi_only(source);
        self.decode(target, &source)
    }

    /// Decode into a dynamically held target.
    ///
    /// Fails with [`Error::NilTarget`] when there is no target and with
    /// [`Error::NotRecordReference`] when it does not hold a record built by
    /// [`Value::record`]. No field is processed in either case.
    pub fn decode_value<S>(
        &self,
        target: Option<&mut Value>,
        source: &S,
        data: &mut DataStore,
    ) -> Result<(), Error>
    where
        S: Source + ?Sized,
    {
        let target = target.ok_or(Error::NilTarget)?;
        let type_name = target.type_name();
        let record = target
            .as_record_mut()
            .ok_or(Error::NotRecordReference { type_name })?;
        self.decode_with_data(record, source, data)
    }

    fn decode_record<S>(
        &self,
        target: &mut dyn Record,
        source: &S,
        data: &mut DataStore,
        depth: usize,
        report: &mut DecodeReport,
    ) -> Result<(), Error>
    where
        S: Source + ?Sized,
    {
        let mut ctx = Context::new(data);
        for Field { name, tags, slot } in target.fields() {
            report.fields_visited += 1;
            ctx.position = FieldPosition::at(name, tags);

            let decoder = match tags
                .get(&self.options.decoder_tag)
                .or_else(|| self.options.default_decoder())
            {
                Some(decoder) => decoder,
                None => {
                    tracing::trace!(field = name, "no decoder for field, skipping");
                    report.fields_skipped += 1;
                    continue;
                }
            };
            ctx.position.decoder = Some(decoder.to_owned());

            if self.options.inline() == Some(decoder) {
                let next = depth + 1;
                if next > self.options.max_inline_depth {
                    return Err(Error::InlineDepthExceeded {
                        position: mem::take(&mut ctx.position),
                        depth: self.options.max_inline_depth,
                    });
                }
                let nested = match slot {
                    Slot::Record(record) => record.record_mut(),
                    Slot::Optional(optional) => {
                        if optional.is_none() {
                            tracing::trace!(field = name, "materializing optional record");
                        }
                        optional.record_or_insert()
                    }
                    Slot::Value(value) => {
                        let declared_type = value.declared_type();
                        return Err(Error::inline_not_record(mem::take(&mut ctx.position), declared_type));
                    }
                };
                tracing::debug!(field = name, depth = next, "inlining nested record");
                report.inline_records += 1;
                report.max_depth = report.max_depth.max(next);
                self.decode_record(nested, source, ctx.data_mut(), next, report)?;
                continue;
            }

            let key = match tags.get(&self.options.name_tag) {
                Some(key) => key,
                None if self.options.strict_name_tag => {
                    tracing::trace!(field = name, "no name tag for field, skipping");
                    report.fields_skipped += 1;
                    continue;
                }
                None => name,
            };
            ctx.position.key = Some(key.to_owned());

            let resolved = match self.registry.resolve(decoder) {
                Ok(resolved) => resolved,
                Err(cause) => return Err(Error::unknown_decoder(mem::take(&mut ctx.position), cause)),
            };

            let decoded = match resolved {
                Resolved::Single(decode) => {
                    ctx.position.kind = DecoderKind::Single;
                    let raw = source.lookup(key);
                    tracing::trace!(field = name, key, decoder, exists = raw.is_some(), "running single decoder");
                    decode(raw.as_deref().unwrap_or_default(), raw.is_some(), &mut ctx)
                }
                Resolved::Multi(decode) => {
                    ctx.position.kind = DecoderKind::Multi;
                    let raw = source.lookup_all(key);
                    tracing::trace!(field = name, key, decoder, exists = raw.is_some(), "running multi decoder");
                    decode(raw.as_deref().unwrap_or_default(), raw.is_some(), &mut ctx)
                }
            };
            let decoded = match decoded {
                Ok(decoded) => decoded,
                Err(cause) => return Err(Error::decode_failed(mem::take(&mut ctx.position), cause)),
            };

            let field = slot.into_value();
            let declared_type = field.declared_type();
            match decoded {
                None if self.options.strict_typing => {
                    return Err(Error::assignment(mem::take(&mut ctx.position), NO_VALUE, declared_type));
                }
                None => {
                    tracing::trace!(field = name, declared_type, "no value, assigning zero");
                    field.assign_zero();
                }
                Some(value) if self.options.strict_typing => {
                    let returned_type = value.type_name();
                    if field.assign_exact(value).is_err() {
                        return Err(Error::assignment(mem::take(&mut ctx.position), returned_type, declared_type));
                    }
                }
                Some(value) => {
                    let returned_type = value.type_name();
                    if let Err(cause) = field.assign_converted(value) {
                        return Err(Error::conversion(
                            mem::take(&mut ctx.position),
                            returned_type,
                            declared_type,
                            cause,
                        ));
                    }
                }
            }
            report.fields_assigned += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tracing_test::traced_test;

    use super::*;
    use crate::Tags;

    #[derive(Debug, Default)]
    struct Leaf {
        port: u16,
        ignored: String,
    }

    crate::record! {
        Leaf {
            port: value { "name" = "port", "decoder" = "port" },
            ignored: value {},
        }
    }

    fn decoder() -> TagDecoder {
        let mut decoder = TagDecoder::default();
        decoder.register_single("port", |value, exists, _| {
            if !exists {
                return Ok(Value::some(22u16));
            }
            Ok(Value::some(value.parse::<u16>()?))
        });
        decoder
    }

    #[test]
    fn report_counts_assigned_and_skipped_fields() {
        let source = HashMap::from([("port".to_owned(), "2222".to_owned())]);
        let mut leaf = Leaf::default();
        let report = decoder()
            .decode_with_report(&mut leaf, &SplitSource::single_only(&source), &mut DataStore::new())
            .unwrap();
        assert_eq!(leaf.port, 2222);
        assert_eq!(
            report,
            DecodeReport {
                fields_visited: 2,
                fields_skipped: 1,
                fields_assigned: 1,
                inline_records: 0,
                max_depth: 0,
            }
        );
    }

    #[test]
    fn decode_value_checks_preconditions() {
        let decoder = decoder();
        let mut data = DataStore::new();
        let source = SplitSource::<NoSource, NoSource>::default();

        let err = decoder.decode_value(None, &source, &mut data).unwrap_err();
        assert!(matches!(err, Error::NilTarget));

        let mut number = Value::new(5u32);
        let err = decoder.decode_value(Some(&mut number), &source, &mut data).unwrap_err();
        assert!(matches!(err, Error::NotRecordReference { type_name: "u32" }));

        let mut leaf = Value::record(Leaf::default());
        decoder.decode_value(Some(&mut leaf), &source, &mut data).unwrap();
        assert_eq!(leaf.downcast_ref::<Leaf>().map(|l| l.port), Some(22));
    }

    #[test]
    fn failing_decoder_reports_position() {
        let mut decoder = decoder();
        decoder.register_single("port", |_, _, _| Err("boom".into()));
        let mut leaf = Leaf::default();
        let err = decoder.decode_single(&mut leaf, &HashMap::<String, String>::new()).unwrap_err();
        assert_eq!(err.field(), Some("port"));
        assert_eq!(err.key(), Some("port"));
        assert_eq!(err.decoder(), Some("port"));
        assert_eq!(err.kind(), DecoderKind::Single);
        assert_eq!(err.tags(), Tags::new(&[("name", "port"), ("decoder", "port")]));
    }

    #[test]
    #[traced_test]
    fn skips_and_dispatches_are_traced() {
        let mut leaf = Leaf::default();
        decoder()
            .decode_single(&mut leaf, &HashMap::<String, String>::new())
            .unwrap();
        assert!(logs_contain("no decoder for field, skipping"));
        assert!(logs_contain("running single decoder"));
    }

    #[test]
    #[traced_test]
    fn failures_are_traced() {
        let mut decoder = decoder();
        decoder.register_single("port", |_, _, _| Err("boom".into()));
        let _ = decoder.decode_single(&mut Leaf::default(), &HashMap::<String, String>::new());
        assert!(logs_contain("decode failed"));
        assert!(logs_contain("boom"));
    }
}
