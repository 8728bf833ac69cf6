#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Wildgrove adapters.
//!
//! The engine collaborator owns sprites, tweens and input; this crate pins
//! down the policy it needs from the feature layer: how tiles are tinted
//! under fog, which texture key a facing selects, the shared sprite anchor
//! and tween timing, and how a cursor position maps back to a tile.

use std::collections::HashMap;
use std::time::Duration;

use glam::Vec2;
use thiserror::Error;
use wildgrove_core::{world_to_tile, Facing, GridLength, TileCoord, WorldPoint};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Tint applied to undiscovered tiles under fog.
pub const UNDISCOVERED_TINT: Color = Color::from_rgb_u8(0x57, 0x1f, 0x57);

/// Tint applied to discovered tiles.
pub const DISCOVERED_TINT: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

/// Tint applied to the tile currently hovered in selection mode.
pub const HOVER_TINT: Color = Color::from_rgb_u8(0x98, 0xfb, 0x98);

/// Resolves the tint for a tile from its discovery and hover state.
///
/// Hover wins over fog so the selection cursor stays readable on
/// unexplored ground.
#[must_use]
pub fn tile_tint(discovered: bool, hovered: bool) -> Color {
    if hovered {
        HOVER_TINT
    } else if discovered {
        DISCOVERED_TINT
    } else {
        UNDISCOVERED_TINT
    }
}

/// Shared presentation constants handed to sprite constructors.
///
/// These were ambient globals in earlier revisions; adapters now receive
/// them explicitly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentationConfig {
    /// Anchor applied to every sprite, in texture-relative coordinates.
    pub sprite_anchor: Vec2,
    /// Duration of the tween that carries an actor across one tile.
    pub step_tween: Duration,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            sprite_anchor: Vec2::new(0.5, 0.0),
            step_tween: Duration::from_millis(1_000),
        }
    }
}

/// Registry of texture keys populated by the asset-loading collaborator.
///
/// Actors register four keys, one per facing ordinal; the map registers the
/// frame names available in its tile atlas.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    actor_keys: HashMap<String, [String; 4]>,
    tile_frames: Vec<String>,
}

impl AssetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the facing-indexed texture keys for an actor or species.
    pub fn register_actor(&mut self, name: impl Into<String>, keys: [String; 4]) {
        let _ = self.actor_keys.insert(name.into(), keys);
    }

    /// Appends a frame name to the tile atlas listing.
    pub fn register_tile_frame(&mut self, frame: impl Into<String>) {
        self.tile_frames.push(frame.into());
    }

    /// Texture key an actor should display for the provided facing.
    pub fn texture_for(&self, name: &str, facing: Facing) -> Result<&str, AssetError> {
        self.actor_keys
            .get(name)
            .map(|keys| keys[facing.index() as usize].as_str())
            .ok_or_else(|| AssetError::UnknownActor(name.to_owned()))
    }

    /// Frame name at the provided index of the tile atlas.
    pub fn tile_frame(&self, index: usize) -> Result<&str, AssetError> {
        self.tile_frames
            .get(index)
            .map(String::as_str)
            .ok_or(AssetError::MissingTileFrame(index))
    }

    /// Number of registered tile frames.
    #[must_use]
    pub fn tile_frame_count(&self) -> usize {
        self.tile_frames.len()
    }
}

/// Errors raised when presentation lookups miss the registry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    /// No texture keys were registered under the requested name.
    #[error("no texture keys registered for actor '{0}'")]
    UnknownActor(String),
    /// The tile atlas has no frame at the requested index.
    #[error("tile atlas has no frame at index {0}")]
    MissingTileFrame(usize),
}

/// Maps a cursor position in world space back to the tile under it.
///
/// Returns `None` while the cursor sits outside the playable bounds.
/// Inside them, the cursor is offset by one tile edge on both axes before
/// conversion, matching the engine's isometric hit-test convention, and
/// lands on a clamped in-bounds coordinate.
#[must_use]
pub fn pick_tile(cursor: Vec2, tile_length: f32, length: GridLength) -> Option<TileCoord> {
    let extent = length.get() as f32 * tile_length;
    if cursor.x < 0.0 || cursor.y < 0.0 || cursor.x >= extent || cursor.y >= extent {
        return None;
    }

    let offset = WorldPoint::new(cursor.x + tile_length, cursor.y + tile_length);
    Some(world_to_tile(offset, tile_length, length))
}
