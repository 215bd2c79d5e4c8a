//! Arena ids for model nodes and herd individuals.
//!
//! Both are `u32` slot numbers.  `u32::MAX` is reserved as the `INVALID`
//! sentinel, so an arena can hand out at most `u32::MAX` ids; allocation goes
//! through [`ModelId::from_index`] / [`IndividualId::from_index`], which
//! refuse anything past that instead of wrapping.

use std::fmt;

macro_rules! arena_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Never handed out by an arena.
            pub const INVALID: $name = $name(u32::MAX);

            /// The id of arena slot `index`, or `None` once the slot number
            /// no longer fits below the sentinel.
            #[inline]
            pub fn from_index(index: usize) -> Option<$name> {
                u32::try_from(index).ok().filter(|&n| n != u32::MAX).map($name)
            }

            /// Slot number in the owning arena.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

arena_id! {
    /// Slot of a model node in the `ModelTree` arena.  Slots are never reused
    /// while the tree lives, so a detached node's id stays dead.
    ModelId
}

arena_id! {
    /// One simulated individual, numbered from 0 in herd creation order.
    IndividualId
}

impl ModelId {
    /// The root slot of every tree.
    pub const ROOT: ModelId = ModelId(0);
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() { write!(f, "node #{}", self.0) } else { f.write_str("node #invalid") }
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "individual {}", self.0)
    }
}
