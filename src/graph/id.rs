//! Opaque identifiers.
//!
//! Serializes as a plain string (UUID or a caller-assigned semantic id),
//! following the teacher's `NodeId` pattern.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// A new random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// An id from a caller-supplied string (e.g. a stable semantic id).
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

opaque_id!(ElementId);
opaque_id!(SessionId);
opaque_id!(ViewId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_differ() {
        assert_ne!(ElementId::new(), ElementId::new());
    }

    #[test]
    fn semantic_id_round_trips() {
        let id = ElementId::from("entity:hinton");
        assert_eq!(id.as_str(), "entity:hinton");
        assert_eq!(id.to_string(), "entity:hinton");
    }
}
