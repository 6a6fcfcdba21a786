//! Newtype domain identifiers.
//!
//! GitHub hands out opaque node ids for projects, fields, options, items and
//! issue content. They are all strings on the wire, which makes it easy to
//! pass an item id where a content id was expected. Each one is a distinct
//! newtype here so the compiler catches that mix-up.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when an empty string is deserialized into a string identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} must not be empty")]
pub struct EmptyIdentifier {
    kind: &'static str,
}

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// Deserialization goes through new(), so an empty string never gets in.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl TryFrom<String> for $name {
            type Error = EmptyIdentifier;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(EmptyIdentifier {
                    kind: stringify!($name),
                })
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — GitHub-integer-backed
// ---------------------------------------------------------------------------

/// The repository-scoped number of a GitHub Issue (`#42`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(u64);

impl IssueNumber {
    /// Creates a new issue number from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers — GitHub node ids (opaque strings)
// ---------------------------------------------------------------------------

string_id! {
    /// Opaque node id of a Projects V2 board (e.g. `"PVT_kwDOB..."`).
    ProjectId
}

string_id! {
    /// Opaque node id of a project field. Only the `Status` field's id is
    /// ever carried by this crate.
    FieldId
}

string_id! {
    /// Opaque id of one single-select option of the `Status` field.
    OptionId
}

string_id! {
    /// Opaque node id of a board item.
    ///
    /// Distinct from the issue it wraps: the same issue added to two boards
    /// has two different item ids.
    ItemId
}

string_id! {
    /// Opaque node id of the content (issue) backing a board item.
    ///
    /// This is what `addProjectV2ItemById` expects, not the issue number.
    ContentId
}

// ---------------------------------------------------------------------------
// Identifiers — human-facing names
// ---------------------------------------------------------------------------

string_id! {
    /// Title of a project board, used as the lookup key (e.g. `"Release 1"`).
    ///
    /// Matching is exact and case-sensitive.
    ProjectName
}

string_id! {
    /// Name of a `Status` option (e.g. `"Backlog"`, `"Ready"`, `"Blocked"`).
    ///
    /// Case-sensitive; the board schema decides which names exist.
    StatusName
}

string_id! {
    /// Login of the organization or user that owns the project board.
    Owner
}
