use bitflags::bitflags;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

bitflags! {
    /// Collision layer bits. A collider sits on one or more layers and carries a mask
    /// of the layers it interacts with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
    pub struct CollisionLayers: u32 {
        /// Default layer for new colliders
        const DEFAULT    = 0x0000_0001;

        /// Static world geometry
        const STATIC     = 0x0000_0002;

        /// Dynamic props
        const DYNAMIC    = 0x0000_0004;

        /// Player-controlled bodies
        const PLAYER     = 0x0000_0008;

        /// Non-player characters
        const NPC        = 0x0000_0010;

        /// Projectiles
        const PROJECTILE = 0x0000_0020;

        /// Trigger volumes
        const TRIGGER    = 0x0000_0040;

        /// Debris (often excluded from queries)
        const DEBRIS     = 0x0000_0080;

        /// Free for game-specific use
        const USER0      = 0x0001_0000;
        const USER1      = 0x0002_0000;
        const USER2      = 0x0004_0000;
        const USER3      = 0x0008_0000;

        /// All layers
        const ALL        = 0xFFFF_FFFF;
    }
}

impl CollisionLayers {
    /// The empty mask: interacts with nothing
    pub const NONE: Self = Self::empty();
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Type alias for a collision mask (which layers a collider interacts with)
pub type CollisionMask = CollisionLayers;

/// Two filters are compatible when each one's layer is accepted by the other's mask
#[inline]
pub fn layers_compatible(
    layer_a: CollisionLayers,
    mask_a: CollisionMask,
    layer_b: CollisionLayers,
    mask_b: CollisionMask,
) -> bool {
    layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_is_symmetric_and_mask_gated() {
        let player = CollisionLayers::PLAYER;
        let everything = CollisionLayers::ALL;
        let no_players = CollisionLayers::ALL - CollisionLayers::PLAYER;

        assert!(layers_compatible(player, everything, CollisionLayers::DEFAULT, everything));
        assert!(!layers_compatible(player, everything, CollisionLayers::DEFAULT, no_players));
        assert!(!layers_compatible(CollisionLayers::DEFAULT, no_players, player, everything));
        assert!(!layers_compatible(player, CollisionLayers::NONE, player, everything));
    }
}
