//! Strongly typed, zero-cost identifier wrappers.
//!
//! `NodeId` carries the (opaque) OSM node id and is used as a map key;
//! `EdgeId` indexes the dense edge pool, so it additionally offers
//! [`index`](EdgeId::index) for direct `Vec` access.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Key of a road-graph node.  OSM node ids are used verbatim; nodes
    /// minted by edge splitting count down from `u64::MAX - 1` so the two
    /// ranges cannot collide within one loaded dataset.
    pub struct NodeId(u64);
}

typed_id! {
    /// Index of a directed road-graph edge in the edge pool.
    pub struct EdgeId(u32);
}

impl EdgeId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
