#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wildgrove feature layer.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. The crate also carries the pure grid math the
//! rest of the workspace is built on: converting continuous engine positions
//! to tile coordinates, clamping neighbor indices at the grid edge, and
//! reducing a pathfinder's waypoint list to a facing sequence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cardinal facing of an actor, ordinally encoded on the fixed cycle
/// `East(0), North(1), West(2), South(3)`.
///
/// Each increment is a 90° counterclockwise turn. The ordering is
/// load-bearing: the orientation tables that resolve facing-relative
/// neighbor tiles are keyed by this exact cycle, and the presentation layer
/// maps the ordinal straight to a texture key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    /// Movement toward increasing row indices.
    East = 0,
    /// Movement toward decreasing column indices.
    North = 1,
    /// Movement toward decreasing row indices.
    West = 2,
    /// Movement toward increasing column indices.
    South = 3,
}

impl Facing {
    /// Ordinal position of the facing on the counterclockwise cycle.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Facing at the provided ordinal, wrapping into the four-step cycle.
    #[must_use]
    pub const fn from_index(value: u8) -> Self {
        match value & 0b11 {
            0 => Self::East,
            1 => Self::North,
            2 => Self::West,
            _ => Self::South,
        }
    }

    /// Facing after a single 90° counterclockwise turn.
    #[must_use]
    pub const fn turned_left(self) -> Self {
        Self::from_index(self.index().wrapping_add(1))
    }

    /// Facing after a single 90° clockwise turn.
    #[must_use]
    pub const fn turned_right(self) -> Self {
        Self::from_index(self.index().wrapping_add(3))
    }

    /// Opposite facing.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::from_index(self.index().wrapping_add(2))
    }

    /// Iterates through all four facings in ordinal order.
    pub fn all() -> impl Iterator<Item = Facing> {
        [Self::East, Self::North, Self::West, Self::South].into_iter()
    }
}

/// Location of a single grid tile expressed as row and column coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord {
    row: u32,
    col: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.col
    }

    /// Computes the Chebyshev distance between two tile coordinates: the
    /// larger of the per-axis absolute differences.
    #[must_use]
    pub fn chebyshev_distance(self, other: TileCoord) -> u32 {
        self.row
            .abs_diff(other.row)
            .max(self.col.abs_diff(other.col))
    }
}

/// Side length of the square tile grid measured in whole tiles.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridLength(u32);

impl GridLength {
    /// Creates a new grid length wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying tile count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Continuous position in engine world units.
///
/// The engine collaborator reports an actor's *leading edge* here, not its
/// center: being anywhere past a cell's near edge counts as already being in
/// that cell, which is why [`world_to_tile`] rounds up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate along the row axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Coordinate along the column axis.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Unique identifier assigned to an actor by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a placed item by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Broad classification of a moving entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorClass {
    /// The player-controlled explorer. Exactly one per session.
    Player,
    /// An autonomously wandering animal.
    Animal,
}

/// Closed catalog of item behaviors invoked uniformly through
/// [`Command::ActivateItem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Edible flavor item with no world effect.
    Candy,
    /// Cosmetic dust with no world effect.
    Dust,
    /// Edible flavor item with no world effect.
    Lemon,
    /// Pocket lint with no world effect.
    Lint,
    /// Placeable camera that watches the tiles ahead of its facing and
    /// scans animals that step into view.
    Scanner,
}

impl ItemKind {
    /// Reports whether activating the item leaves a persistent watcher in
    /// the world rather than resolving immediately.
    #[must_use]
    pub const fn is_placeable_watcher(self) -> bool {
        matches!(self, Self::Scanner)
    }
}

/// Outcome of an item activation, reported through [`Event::ItemActivated`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemEffect {
    /// The item kind declares no behavior; activation did nothing.
    Inert,
    /// The item began (or refreshed) watching the tiles ahead of it.
    Scanning,
}

/// Clamped neighbor indices along a single grid axis.
///
/// At the grid edge the missing neighbor collapses onto the index itself, so
/// lookups built from a span can never leave the grid and never wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeighborSpan {
    minus: u32,
    plus: u32,
}

impl NeighborSpan {
    /// Computes the span for `index` on an axis of `length` tiles.
    ///
    /// `minus` is `index - 1` unless the index sits on the low edge;
    /// `plus` is `index + 1` unless it sits on the high edge.
    #[must_use]
    pub fn clamped(length: GridLength, index: u32) -> Self {
        debug_assert!(length.get() > 0, "axis length must be positive");
        debug_assert!(index < length.get(), "index {index} outside axis");
        Self {
            minus: if index > 0 { index - 1 } else { index },
            plus: if index + 1 < length.get() {
                index + 1
            } else {
                index
            },
        }
    }

    /// Index one step toward the low edge, clamped in bounds.
    #[must_use]
    pub const fn minus(&self) -> u32 {
        self.minus
    }

    /// Index one step toward the high edge, clamped in bounds.
    #[must_use]
    pub const fn plus(&self) -> u32 {
        self.plus
    }
}

/// Facing-relative record of the tiles surrounding an actor.
///
/// `front` is always the tile ahead in the actor's current facing; the other
/// slots rotate with it. At grid edges clamping may make two slots coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeighborTiles {
    /// Tile containing the actor.
    pub center: TileCoord,
    /// Tile ahead in the facing direction.
    pub front: TileCoord,
    /// Tile to the facing-relative left.
    pub left: TileCoord,
    /// Tile to the facing-relative right.
    pub right: TileCoord,
    /// Tile behind the actor.
    pub back: TileCoord,
}

/// Converts a continuous leading-edge position to tile coordinates.
///
/// Each axis divides by the tile edge length and rounds *up*: an actor whose
/// leading edge is anywhere inside a cell's far edge is treated as already
/// in the next cell. Results clamp to `[0, length - 1]` on both axes.
#[must_use]
pub fn world_to_tile(position: WorldPoint, tile_length: f32, length: GridLength) -> TileCoord {
    debug_assert!(tile_length > 0.0, "tile edge length must be positive");
    debug_assert!(length.get() > 0, "grid length must be positive");
    TileCoord::new(
        axis_tile_index(position.x(), tile_length, length),
        axis_tile_index(position.y(), tile_length, length),
    )
}

fn axis_tile_index(coordinate: f32, tile_length: f32, length: GridLength) -> u32 {
    let index = (coordinate / tile_length).ceil();
    if index <= 0.0 {
        return 0;
    }

    // `as` saturates, so oversized positions land on the far edge.
    (index as u32).min(length.get().saturating_sub(1))
}

/// Reduces a pathfinder's waypoint list to the facing assumed on each leg.
///
/// Every consecutive pair contributes exactly one facing, comparing the two
/// cells on one axis: a row decrease emits [`Facing::West`], a row increase
/// [`Facing::East`], otherwise a column decrease emits [`Facing::North`] and
/// a column increase [`Facing::South`]. A pair with no change on either axis
/// contributes nothing; the final waypoint is the destination and likewise
/// contributes nothing.
#[must_use]
pub fn reduce_waypoints(waypoints: &[TileCoord]) -> Vec<Facing> {
    let mut directions = Vec::with_capacity(waypoints.len().saturating_sub(1));
    for pair in waypoints.windows(2) {
        let from = pair[0];
        let to = pair[1];

        if to.row() < from.row() {
            directions.push(Facing::West);
        } else if to.row() > from.row() {
            directions.push(Facing::East);
        } else if to.col() < from.col() {
            directions.push(Facing::North);
        } else if to.col() > from.col() {
            directions.push(Facing::South);
        }
    }
    directions
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's tile grid using the provided dimensions.
    ConfigureTileGrid {
        /// Side length of the square grid in whole tiles.
        length: GridLength,
        /// Length of each square tile edge measured in world units.
        tile_length: f32,
        /// Whether tiles start hidden until explored.
        fog: bool,
    },
    /// Requests that a new actor be placed into the world.
    SpawnActor {
        /// Classification of the actor being spawned.
        class: ActorClass,
        /// Species label used by the presentation layer, if any.
        species: Option<String>,
        /// Tile the actor initially occupies.
        cell: TileCoord,
        /// Facing the actor initially assumes.
        facing: Facing,
        /// Whether the actor participates in orientation and visibility
        /// immediately. Manually controlled or not-yet-instantiated sprites
        /// spawn not ready.
        ready: bool,
    },
    /// Reports an actor's engine-side leading-edge position for this tick.
    SyncActor {
        /// Identifier of the actor being synchronized.
        actor: ActorId,
        /// Leading-edge position in world units.
        position: WorldPoint,
    },
    /// Requests that an actor assume the provided facing.
    FaceActor {
        /// Identifier of the actor turning.
        actor: ActorId,
        /// Facing the actor should assume.
        facing: Facing,
    },
    /// Requests that an actor begin moving toward the provided tile.
    StepActor {
        /// Identifier of the actor stepping.
        actor: ActorId,
        /// Tile the motion collaborator should carry the actor to.
        to: TileCoord,
        /// Facing assumed for the leg, when the leg changes it.
        facing: Option<Facing>,
    },
    /// Reveals every tile within a Chebyshev radius of the provided cell.
    RevealAround {
        /// Center of the reveal.
        cell: TileCoord,
        /// Chebyshev radius in tiles.
        radius: u32,
    },
    /// Requests that an actor's render visibility flag be updated.
    SetActorVisible {
        /// Identifier of the affected actor.
        actor: ActorId,
        /// Whether the presentation layer should draw the actor.
        visible: bool,
    },
    /// Suspends an actor's ambient wander behavior.
    SuspendWander {
        /// Identifier of the affected actor.
        actor: ActorId,
    },
    /// Re-enables an actor's ambient wander behavior.
    ResumeWander {
        /// Identifier of the affected actor.
        actor: ActorId,
    },
    /// Requests that an item be placed into the world.
    PlaceItem {
        /// Kind of item to place.
        kind: ItemKind,
        /// Tile the item occupies.
        cell: TileCoord,
        /// Facing the item assumes.
        facing: Facing,
    },
    /// Invokes a placed item's behavior.
    ActivateItem {
        /// Identifier of the item being activated.
        item: ItemId,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the tile grid was rebuilt.
    GridConfigured {
        /// Side length of the square grid in whole tiles.
        length: GridLength,
        /// Length of each square tile edge measured in world units.
        tile_length: f32,
        /// Whether fog of war is active for the session.
        fog: bool,
    },
    /// Confirms that an actor was placed into the world.
    ActorSpawned {
        /// Identifier assigned to the actor by the world.
        actor: ActorId,
        /// Classification of the spawned actor.
        class: ActorClass,
        /// Tile the actor initially occupies.
        cell: TileCoord,
        /// Facing the actor initially assumes.
        facing: Facing,
    },
    /// Reports that orientation derived a new tile for an actor.
    ActorEnteredTile {
        /// Identifier of the actor that crossed a tile boundary.
        actor: ActorId,
        /// Tile the actor previously occupied.
        from: TileCoord,
        /// Tile the actor occupies now.
        to: TileCoord,
    },
    /// Confirms that an actor assumed a new facing.
    ActorFaced {
        /// Identifier of the actor that turned.
        actor: ActorId,
        /// Facing the actor assumed.
        facing: Facing,
    },
    /// Announces a motion leg for the animation collaborator to carry out.
    ActorStepped {
        /// Identifier of the stepping actor.
        actor: ActorId,
        /// Tile the leg starts from.
        from: TileCoord,
        /// Tile the leg ends on.
        to: TileCoord,
        /// Facing assumed for the leg, when the leg changes it.
        facing: Option<Facing>,
    },
    /// Reports the tiles newly revealed by a [`Command::RevealAround`].
    TilesRevealed {
        /// Cells whose `discovered` flag flipped to true, in row-major order.
        cells: Vec<TileCoord>,
    },
    /// Confirms that an actor's render visibility flag changed.
    ActorVisibilityChanged {
        /// Identifier of the affected actor.
        actor: ActorId,
        /// Whether the presentation layer should draw the actor.
        visible: bool,
    },
    /// Confirms that an item was placed into the world.
    ItemPlaced {
        /// Identifier assigned to the item by the world.
        item: ItemId,
        /// Kind of the placed item.
        kind: ItemKind,
        /// Tile the item occupies.
        cell: TileCoord,
    },
    /// Reports the outcome of an item activation.
    ItemActivated {
        /// Identifier of the activated item.
        item: ItemId,
        /// What the activation did.
        effect: ItemEffect,
    },
    /// Confirms that a watching scanner captured an animal.
    AnimalScanned {
        /// Identifier of the scanned animal.
        actor: ActorId,
        /// Identifier of the scanner that captured it.
        item: ItemId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    #[test]
    fn facing_ordinals_follow_counterclockwise_cycle() {
        assert_eq!(Facing::East.index(), 0);
        assert_eq!(Facing::North.index(), 1);
        assert_eq!(Facing::West.index(), 2);
        assert_eq!(Facing::South.index(), 3);

        for facing in Facing::all() {
            assert_eq!(facing.turned_left().index(), (facing.index() + 1) & 0b11);
            assert_eq!(facing.turned_left().turned_right(), facing);
            assert_eq!(facing.reversed().reversed(), facing);
        }
    }

    #[test]
    fn chebyshev_distance_takes_larger_axis() {
        let origin = TileCoord::new(2, 2);
        assert_eq!(origin.chebyshev_distance(TileCoord::new(2, 2)), 0);
        assert_eq!(origin.chebyshev_distance(TileCoord::new(3, 1)), 1);
        assert_eq!(origin.chebyshev_distance(TileCoord::new(5, 3)), 3);
        assert_eq!(TileCoord::new(5, 3).chebyshev_distance(origin), 3);
    }

    #[test]
    fn neighbor_span_stays_inside_axis() {
        for length in 1..6 {
            let length = GridLength::new(length);
            for index in 0..length.get() {
                let span = NeighborSpan::clamped(length, index);
                assert!(span.minus() <= index, "minus exceeded index");
                assert!(span.plus() >= index, "plus fell below index");
                assert!(span.plus() < length.get(), "plus left the axis");
            }
        }
    }

    #[test]
    fn neighbor_span_collapses_on_edges() {
        let length = GridLength::new(5);
        let low = NeighborSpan::clamped(length, 0);
        assert_eq!(low.minus(), 0);
        assert_eq!(low.plus(), 1);

        let high = NeighborSpan::clamped(length, 4);
        assert_eq!(high.minus(), 3);
        assert_eq!(high.plus(), 4);
    }

    #[test]
    fn world_to_tile_rounds_up_per_axis() {
        let cell = world_to_tile(WorldPoint::new(160.0, 160.0), 32.0, GridLength::new(10));
        assert_eq!(cell, TileCoord::new(5, 5));

        let partial = world_to_tile(WorldPoint::new(33.0, 0.0), 32.0, GridLength::new(10));
        assert_eq!(partial, TileCoord::new(2, 0));
    }

    #[test]
    fn world_to_tile_clamps_to_grid() {
        let length = GridLength::new(4);
        let far = world_to_tile(WorldPoint::new(4096.0, -64.0), 32.0, length);
        assert_eq!(far, TileCoord::new(3, 0));

        for x in 0..20 {
            let cell = world_to_tile(WorldPoint::new(x as f32 * 10.0, 5.0), 32.0, length);
            assert!(cell.row() < length.get());
            assert!(cell.col() < length.get());
        }
    }

    #[test]
    fn reduce_waypoints_emits_one_facing_per_leg() {
        let waypoints = [
            TileCoord::new(2, 2),
            TileCoord::new(3, 2),
            TileCoord::new(3, 3),
            TileCoord::new(2, 3),
            TileCoord::new(2, 2),
        ];
        assert_eq!(
            reduce_waypoints(&waypoints),
            vec![Facing::East, Facing::South, Facing::West, Facing::North]
        );
    }

    #[test]
    fn reduce_waypoints_skips_degenerate_pairs() {
        let waypoints = [
            TileCoord::new(2, 2),
            TileCoord::new(3, 2),
            TileCoord::new(3, 2),
            TileCoord::new(3, 3),
        ];
        assert_eq!(
            reduce_waypoints(&waypoints),
            vec![Facing::East, Facing::South]
        );
    }

    #[test]
    fn reduce_waypoints_handles_trivial_lists() {
        assert!(reduce_waypoints(&[]).is_empty());
        assert!(reduce_waypoints(&[TileCoord::new(1, 1)]).is_empty());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: serde::Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tile_coord_round_trips_through_bincode() {
        assert_round_trip(&TileCoord::new(5, 7));
    }

    #[test]
    fn item_kind_round_trips_through_bincode() {
        assert_round_trip(&ItemKind::Scanner);
    }
}
