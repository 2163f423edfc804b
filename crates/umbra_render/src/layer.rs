//! Layer masks
//!
//! Every renderer lives on one of 32 layers; a mask selects a subset.

use serde::{Deserialize, Serialize};

/// Number of addressable layers
pub const MAX_LAYERS: u8 = 32;

/// Bit set of layers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NOTHING: Self = Self(0);
    pub const EVERYTHING: Self = Self(u32::MAX);

    /// Mask containing a single layer
    pub fn from_layer(layer: u8) -> Self {
        Self::NOTHING.with_layer(layer)
    }

    /// Mask containing the given layers
    pub fn from_layers(layers: &[u8]) -> Self {
        layers
            .iter()
            .fold(Self::NOTHING, |mask, &layer| mask.with_layer(layer))
    }

    /// Add a layer; out of range layers are ignored
    pub fn with_layer(self, layer: u8) -> Self {
        if layer >= MAX_LAYERS {
            return self;
        }
        Self(self.0 | (1 << layer))
    }

    /// Remove a layer
    pub fn without_layer(self, layer: u8) -> Self {
        if layer >= MAX_LAYERS {
            return self;
        }
        Self(self.0 & !(1 << layer))
    }

    /// Check if a layer is selected
    pub fn contains_layer(&self, layer: u8) -> bool {
        layer < MAX_LAYERS && (self.0 & (1 << layer)) != 0
    }

    /// Check if no layer is selected
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::EVERYTHING
    }
}

impl core::ops::BitOr for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers() {
        let mask = LayerMask::from_layers(&[0, 5, 31]);
        assert!(mask.contains_layer(0));
        assert!(mask.contains_layer(5));
        assert!(mask.contains_layer(31));
        assert!(!mask.contains_layer(1));
        assert!(!mask.contains_layer(32));

        let mask = mask.without_layer(5);
        assert!(!mask.contains_layer(5));
    }

    #[test]
    fn test_everything_and_nothing() {
        assert!(LayerMask::EVERYTHING.contains_layer(17));
        assert!(LayerMask::NOTHING.is_empty());
        assert_eq!(LayerMask::default(), LayerMask::EVERYTHING);
        assert_eq!(LayerMask::from_layer(40), LayerMask::NOTHING);
    }

    #[test]
    fn test_serde_as_bits() {
        let json = serde_json::to_string(&LayerMask::from_layers(&[0, 2])).unwrap();
        assert_eq!(json, "5");
        let mask: LayerMask = serde_json::from_str("8").unwrap();
        assert!(mask.contains_layer(3));
    }
}
