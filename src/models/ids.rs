//! Newtype wrappers for identifiers returned by the banking API.
//!
//! These prevent accidentally comparing a transaction ID with an account
//! number at compile time. The API is not consistent about whether it sends
//! identifiers as JSON strings or integers, so both are accepted and kept as
//! strings.

use serde::{Deserialize, Deserializer, Serialize};

/// Wire representation of an identifier: either a string or an integer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    /// Identifier sent as a JSON string.
    Text(String),
    /// Identifier sent as a JSON integer.
    Number(i64),
}

impl RawIdentifier {
    /// Returns the identifier as a string.
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Deserializes an identifier sent either as a string or as an integer.
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawIdentifier::deserialize(deserializer).map(RawIdentifier::into_string)
}

/// Macro to define a newtype ID wrapping a `String` inner type.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(#[serde(deserialize_with = "deserialize_identifier")] String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_string_id! {
    /// Identifier of a transaction, issued by the banking API.
    ///
    /// This is the only reference shown on receipts and in the history
    /// table; the crate never generates one itself.
    TransactionId
}

define_string_id! {
    /// A bank account number.
    AccountNumber
}
