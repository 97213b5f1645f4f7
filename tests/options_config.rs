use indoc::indoc;
use tagwise::Options;

#[test]
fn options_load_from_json_with_defaults() {
    let json = indoc! {r#"
        {
            "name_tag": "env",
            "default_decoder": "string",
            "strict_typing": true
        }
    "#};
    let options: Options = serde_json::from_str(json).unwrap();
    assert_eq!(
        options,
        Options {
            name_tag: "env".to_owned(),
            default_decoder: Some("string".to_owned()),
            strict_typing: true,
            ..Options::default()
        }
    );
}

#[test]
fn null_inline_decoder_disables_inlining() {
    let options: Options = serde_json::from_str(r#"{ "inline_decoder": null }"#).unwrap();
    assert_eq!(options.inline_decoder, None);
    assert_eq!(options.decoder_tag, "decoder");
}

#[test]
fn options_serialize_in_field_order() {
    let value = serde_json::to_value(Options::default()).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .map(|o| o.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(
        keys,
        [
            "name_tag",
            "strict_name_tag",
            "decoder_tag",
            "default_decoder",
            "inline_decoder",
            "strict_typing",
            "max_inline_depth"
        ]
    );
    assert_eq!(value["inline_decoder"], "inline");
}

#[test]
fn options_macro_matches_struct_update() {
    let from_macro = tagwise::options! {
        strict_name_tag: true,
        max_inline_depth: 8,
    };
    let from_struct = Options {
        strict_name_tag: true,
        max_inline_depth: 8,
        ..Options::default()
    };
    assert_eq!(from_macro, from_struct);
}
