//! Type-safe identifier wrappers around dense `u32` indices.
//!
//! Agents are numbered `0..n` by the landscape that places them, and blogs
//! are numbered in creation order by the registry. Both orders are the
//! enumeration orders the simulation relies on, so the identifiers are plain
//! indices rather than random UUIDs.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around a `u32` index with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create an identifier from its raw index.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Return the inner index value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }

            /// Return the identifier as a slice index.
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Build an identifier from a slice index.
            ///
            /// Returns `None` if the index does not fit into `u32`.
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index).ok().map(Self)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Stable identifier of an agent, owned by the landscape.
    AgentId
}

define_id! {
    /// Identifier of a blog, assigned by the blog registry in creation order.
    BlogId
}
