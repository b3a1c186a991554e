//! Macros for declaring behavior states.

/// Generate `State`, `Display` and `FromStr` implementations for a plain enum.
///
/// Each variant's name is its string form, so the text definition loader
/// can parse state tokens such as `Chase` or `Hide`.
///
/// # Example
///
/// ```
/// use npcmind::state_enum;
/// use npcmind::core::State;
///
/// state_enum! {
///     pub enum Behavior {
///         Chase,
///         Avoid,
///         Hide,
///     }
/// }
///
/// assert_eq!(Behavior::Hide.name(), "Hide");
/// assert_eq!("Avoid".parse::<Behavior>().unwrap(), Behavior::Avoid);
/// assert!("Dance".parse::<Behavior>().is_err());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.pad($crate::core::State::name(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::core::ParseStateError;

            fn from_str(token: &str) -> ::std::result::Result<Self, Self::Err> {
                match token {
                    $(stringify!($variant) => Ok(Self::$variant),)*
                    _ => Err($crate::core::ParseStateError::new(token)),
                }
            }
        }
    };
}
