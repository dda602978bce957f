// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prefixed identifiers for runs and sleeps.

/// Characters used for the random part of generated ids.
///
/// Lowercase only so ids survive case-insensitive filesystems and URLs.
pub const ID_ALPHABET: [char; 36] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Length of the random part of generated ids
pub const ID_RANDOM_LEN: usize = 19;

/// Define one or more string id newtypes, each with its own prefix.
///
/// Generated ids are `{prefix}{19 random chars}` and stay within
/// `SmolStr`'s inline capacity for four-character prefixes. Ids compare
/// against plain strings and can key a map looked up by `&str`.
///
/// ```ignore
/// define_id! {
///     /// Identifies a run.
///     pub struct RunId("run-");
///     /// Identifies a sleep.
///     pub struct SleepId("slp-");
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    ($( $(#[$meta:meta])* pub struct $name:ident($prefix:literal); )+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(smol_str::SmolStr);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// A fresh random id.
            pub fn new() -> Self {
                // nanoid! takes its size as a single token tree
                let random =
                    nanoid::nanoid!({ $crate::id::ID_RANDOM_LEN }, &$crate::id::ID_ALPHABET);
                Self(smol_str::SmolStr::new(format!("{}{}", Self::PREFIX, random)))
            }

            /// Wrap an existing id without validating it.
            pub fn from_string(id: impl AsRef<str>) -> Self {
                Self(smol_str::SmolStr::new(id))
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::from_string(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::from_string(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.as_str()
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    )+};
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
