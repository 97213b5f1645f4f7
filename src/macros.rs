//! Public macros for building options and implementing [`crate::Record`].

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// Example:
///
/// ```rust
/// let options = tagwise::options! {
///     name_tag: "env".to_owned(),
///     strict_typing: true,
/// };
/// assert!(options.strict_typing);
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            #[allow(deprecated)]
            {
                opt.$field = $value;
            }
        )*
        opt
    }};
}

/// Implement [`crate::Record`] (and [`crate::Decodable`]) for a struct.
///
/// Every field is listed in declaration order with its kind and its tags:
/// - `value`: a leaf implementing [`crate::Decodable`];
/// - `record`: a nested record held by value;
/// - `optional`: a nested record held as `Option<Box<_>>`.
///
/// Fields that are not listed are invisible to the engine. The struct must implement
/// `Default`, which supplies its zero value.
///
/// ```rust
/// #[derive(Debug, Default)]
/// struct Server {
///     host: String,
///     port: u16,
///     aliases: Vec<String>,
/// }
///
/// tagwise::record! {
///     Server {
///         host: value { "name" = "HOST" },
///         port: value { "name" = "PORT", "decoder" = "port" },
///         aliases: value {},
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $ty:ty {
            $( $field:ident : $kind:ident { $( $key:literal = $val:literal ),* $(,)? } ),* $(,)?
        }
    ) => {
        impl $crate::Record for $ty {
            fn fields(&mut self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![
                    $(
                        $crate::Field::$kind(
                            ::std::stringify!($field),
                            $crate::Tags::new(&[ $( ($key, $val) ),* ]),
                            &mut self.$field,
                        )
                    ),*
                ]
            }
        }

        impl $crate::Decodable for $ty {}
    };
}
