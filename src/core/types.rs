use serde::{Deserialize, Serialize};

/// Token standing in for "any single sign" in a compiled pattern
pub const WILDCARD: &str = "*";

/// Damage marker stripped from annotations before parsing
pub const DAMAGE_MARKER: char = 'X';

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a fragment (museum number)
    FragmentId
);

string_id!(
    /// Identifier of a corpus chapter
    ChapterId
);

string_id!(
    /// Identifier of the text a chapter belongs to
    TextId
);
