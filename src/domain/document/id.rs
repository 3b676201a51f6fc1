//! Typed document identifiers

use std::fmt::{Debug, Display};
use std::hash::Hash;

use uuid::Uuid;

/// Trait for types that identify a stored document
pub trait DocumentKey: Copy + Debug + Display + Send + Sync + Eq + Hash {
    /// Returns the underlying UUID
    fn as_uuid(&self) -> Uuid;
}

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl DocumentKey for $name {
            fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

document_id!(
    /// Identifier of a User document
    UserId
);

document_id!(
    /// Identifier of an Item document
    ItemId
);

document_id!(
    /// Identifier of a Comment document
    CommentId
);
