//! Closed-set string tokens used on the wire.
//!
//! Most protocol values (control names, hardware parameters, data types, …)
//! are drawn from fixed vocabularies. [`closed_set!`] generates an enum with
//! `as_str`, [`Display`](std::fmt::Display), [`FromStr`](std::str::FromStr)
//! and serde impls that all agree on the wire token.

macro_rules! closed_set {
    (
        $(#[doc = $doc:expr])*
        $name:ident, $kind:literal {
            $($(#[doc = $vdoc:expr])* $variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[doc = $vdoc])*
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            /// Every member of the set, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire token for this value.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::InvalidArgumentError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok(Self::$variant),)+
                    other => Err($crate::error::InvalidArgumentError::new($kind, other)),
                }
            }
        }
    };
}

pub(crate) use closed_set;
