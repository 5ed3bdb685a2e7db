use std::ops::{BitAnd, BitOr, Not};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A set of up to 32 collision layers, as a bitmask.
///
/// The aim ray only hits colliders that are members of at least one of these layers. Backends
/// translate it to their own filtering type (e.g. Rapier's `Group` or Avian's `LayerMask`), which
/// all use the same 32 bit representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct StrafeLayerMask(pub u32);

impl StrafeLayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    /// Build a mask from layer indices (`0..32`).
    ///
    /// Indices outside that range are ignored.
    pub fn from_layers(layers: impl IntoIterator<Item = u32>) -> Self {
        Self(
            layers
                .into_iter()
                .filter(|layer| *layer < u32::BITS)
                .fold(0, |mask, layer| mask | (1 << layer)),
        )
    }

    pub fn contains(&self, layer: u32) -> bool {
        layer < u32::BITS && self.0 & (1 << layer) != 0
    }

    /// Check if the two masks share at least one layer.
    pub fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for StrafeLayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<u32> for StrafeLayerMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl BitOr for StrafeLayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for StrafeLayerMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Not for StrafeLayerMask {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}
