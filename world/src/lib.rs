#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Wildgrove.
//!
//! The world owns the tile grid, the actors roaming it, and the items placed
//! on it. Adapters submit [`Command`] values through [`apply`]; the world
//! mutates itself deterministically and broadcasts [`Event`] values for
//! systems to react to. Actual motion is the animation collaborator's job:
//! the world announces steps ([`Event::ActorStepped`]) and learns where
//! sprites ended up through per-tick [`Command::SyncActor`] reports, from
//! which it re-derives tile coordinates and facing-keyed neighbor tiles.

mod items;
mod orientation;

use wildgrove_core::{
    ActorClass, ActorId, Command, Event, Facing, GridLength, ItemEffect, ItemId, ItemKind,
    NeighborTiles, TileCoord, WorldPoint,
};

const DEFAULT_GRID_LENGTH: GridLength = GridLength::new(10);
const DEFAULT_TILE_LENGTH: f32 = 32.0;
const DEFAULT_FOG: bool = true;

/// A single cell of the square grid map.
///
/// Row and column are fixed at construction. `blocked` is set once by the
/// generator; `discovered` is monotonic and never reverts to `false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    row: u32,
    col: u32,
    blocked: bool,
    discovered: bool,
}

impl Tile {
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

    /// Whether the tile is impassable.
    #[must_use]
    pub const fn blocked(&self) -> bool {
        self.blocked
    }

    /// Whether the tile has been revealed to the player.
    #[must_use]
    pub const fn discovered(&self) -> bool {
        self.discovered
    }

    /// Coordinate of the tile.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        TileCoord::new(self.row, self.col)
    }
}

/// Square tile grid with per-tile passability and fog-of-war state.
///
/// Immutable in shape after construction; only tile `discovered` flags
/// mutate over a session.
#[derive(Clone, Debug)]
pub struct TileGrid {
    length: GridLength,
    tile_length: f32,
    fog: bool,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Generates a `length x length` grid. The border ring is blocked, the
    /// interior passable; every tile starts discovered unless fog is on.
    #[must_use]
    pub fn generate(length: GridLength, tile_length: f32, fog: bool) -> Self {
        debug_assert!(length.get() > 0, "grid length must be positive");
        debug_assert!(tile_length > 0.0, "tile edge length must be positive");

        let capacity_u64 = u64::from(length.get()) * u64::from(length.get());
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let last = length.get().saturating_sub(1);

        let mut tiles = Vec::with_capacity(capacity);
        for row in 0..length.get() {
            for col in 0..length.get() {
                let blocked = row == 0 || row == last || col == 0 || col == last;
                tiles.push(Tile {
                    row,
                    col,
                    blocked,
                    discovered: !fog,
                });
            }
        }

        Self {
            length,
            tile_length,
            fog,
            tiles,
        }
    }

    /// Side length of the grid in whole tiles.
    #[must_use]
    pub const fn length(&self) -> GridLength {
        self.length
    }

    /// Length of a single square tile edge in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Whether fog of war is active for the session.
    #[must_use]
    pub const fn fog(&self) -> bool {
        self.fog
    }

    /// Total extent of the grid along either axis in world units. The
    /// engine collaborator uses this for its physics bounds.
    #[must_use]
    pub const fn world_extent(&self) -> f32 {
        self.length.get() as f32 * self.tile_length
    }

    /// World-space anchor of a tile: the position an actor parked exactly
    /// on the cell reports as its leading edge.
    #[must_use]
    pub fn tile_anchor(&self, cell: TileCoord) -> WorldPoint {
        WorldPoint::new(
            cell.row() as f32 * self.tile_length,
            cell.col() as f32 * self.tile_length,
        )
    }

    /// Returns the tile at the provided coordinate, if it lies on the grid.
    #[must_use]
    pub fn tile(&self, cell: TileCoord) -> Option<&Tile> {
        self.index(cell).and_then(|offset| self.tiles.get(offset))
    }

    /// Dense passability matrix for the pathfinding collaborator, indexed
    /// `[row][col]`: `1` is passable, `0` is blocked.
    #[must_use]
    pub fn passability(&self) -> Vec<Vec<u8>> {
        let width = usize::try_from(self.length.get()).unwrap_or(0);
        self.tiles
            .chunks(width.max(1))
            .map(|row| row.iter().map(|tile| u8::from(!tile.blocked)).collect())
            .collect()
    }

    /// Marks every tile within the Chebyshev `radius` of `cell` discovered
    /// and returns the newly revealed coordinates in row-major order.
    /// Discovery is monotonic; already-revealed tiles are untouched.
    pub(crate) fn reveal_around(&mut self, cell: TileCoord, radius: u32) -> Vec<TileCoord> {
        debug_assert!(self.tile(cell).is_some(), "reveal center outside grid");

        let last = self.length.get().saturating_sub(1);
        let low_row = cell.row().saturating_sub(radius);
        let high_row = cell.row().saturating_add(radius).min(last);
        let low_col = cell.col().saturating_sub(radius);
        let high_col = cell.col().saturating_add(radius).min(last);

        let mut revealed = Vec::new();
        for row in low_row..=high_row {
            for col in low_col..=high_col {
                if let Some(offset) = self.index(TileCoord::new(row, col)) {
                    let tile = &mut self.tiles[offset];
                    if !tile.discovered {
                        tile.discovered = true;
                        revealed.push(TileCoord::new(row, col));
                    }
                }
            }
        }
        revealed
    }

    fn index(&self, cell: TileCoord) -> Option<usize> {
        if cell.row() < self.length.get() && cell.col() < self.length.get() {
            let row = usize::try_from(cell.row()).ok()?;
            let col = usize::try_from(cell.col()).ok()?;
            let width = usize::try_from(self.length.get()).ok()?;
            Some(row * width + col)
        } else {
            None
        }
    }
}

/// Represents the authoritative Wildgrove world state.
#[derive(Debug)]
pub struct World {
    grid: TileGrid,
    actors: Vec<Actor>,
    items: Vec<PlacedItem>,
    next_actor_id: u32,
    next_item_id: u32,
}

impl World {
    /// Creates a new world with the default fogged grid and no population.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: TileGrid::generate(DEFAULT_GRID_LENGTH, DEFAULT_TILE_LENGTH, DEFAULT_FOG),
            actors: Vec::new(),
            items: Vec::new(),
            next_actor_id: 0,
            next_item_id: 0,
        }
    }

    fn actor_index(&self, actor: ActorId) -> Option<usize> {
        self.actors.iter().position(|entry| entry.id == actor)
    }

    fn item_index(&self, item: ItemId) -> Option<usize> {
        self.items.iter().position(|entry| entry.id == item)
    }

    fn spawn_actor(
        &mut self,
        class: ActorClass,
        species: Option<String>,
        cell: TileCoord,
        facing: Facing,
        ready: bool,
        out_events: &mut Vec<Event>,
    ) {
        if self.grid.tile(cell).is_none() {
            debug_assert!(false, "spawn cell outside the grid");
            return;
        }

        let id = ActorId::new(self.next_actor_id);
        self.next_actor_id += 1;

        let position = self.grid.tile_anchor(cell);
        let neighbors = orientation::resolve_neighbors(facing, cell, &self.grid);
        let visible = matches!(class, ActorClass::Player) || !self.grid.fog();

        self.actors.push(Actor {
            id,
            class,
            species,
            position,
            cell,
            facing,
            neighbors,
            ready,
            visible,
            wander_suspended: false,
            scanned: false,
        });
        out_events.push(Event::ActorSpawned {
            actor: id,
            class,
            cell,
            facing,
        });
    }

    fn sync_actor(&mut self, actor: ActorId, position: WorldPoint, out_events: &mut Vec<Event>) {
        let Some(index) = self.actor_index(actor) else {
            debug_assert!(false, "sync for unknown actor");
            return;
        };

        self.actors[index].position = position;
        if !self.actors[index].ready {
            return;
        }

        let facing = self.actors[index].facing;
        let neighbors = orientation::orient(position, facing, &self.grid);
        let from = self.actors[index].cell;
        let to = neighbors.center;
        self.actors[index].cell = to;
        self.actors[index].neighbors = neighbors;

        if from != to {
            out_events.push(Event::ActorEnteredTile { actor, from, to });
            self.capture_if_watched(index, out_events);
        }
    }

    fn face_actor(&mut self, actor: ActorId, facing: Facing, out_events: &mut Vec<Event>) {
        let Some(index) = self.actor_index(actor) else {
            debug_assert!(false, "turn for unknown actor");
            return;
        };

        if self.actors[index].facing == facing {
            return;
        }

        self.actors[index].facing = facing;
        if self.actors[index].ready {
            self.actors[index].neighbors =
                orientation::resolve_neighbors(facing, self.actors[index].cell, &self.grid);
        }
        out_events.push(Event::ActorFaced { actor, facing });
    }

    fn step_actor(
        &mut self,
        actor: ActorId,
        to: TileCoord,
        facing: Option<Facing>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self.actor_index(actor) else {
            debug_assert!(false, "step for unknown actor");
            return;
        };
        if self.grid.tile(to).is_none() {
            debug_assert!(false, "step target outside the grid");
            return;
        }

        if let Some(facing) = facing {
            self.actors[index].facing = facing;
            if self.actors[index].ready {
                self.actors[index].neighbors =
                    orientation::resolve_neighbors(facing, self.actors[index].cell, &self.grid);
            }
        }

        let from = self.actors[index].cell;
        out_events.push(Event::ActorStepped {
            actor,
            from,
            to,
            facing,
        });
    }

    fn set_actor_visible(&mut self, actor: ActorId, visible: bool, out_events: &mut Vec<Event>) {
        let Some(index) = self.actor_index(actor) else {
            debug_assert!(false, "visibility for unknown actor");
            return;
        };

        if self.actors[index].visible == visible {
            return;
        }
        self.actors[index].visible = visible;
        out_events.push(Event::ActorVisibilityChanged { actor, visible });
    }

    fn set_wander_suspended(&mut self, actor: ActorId, suspended: bool) {
        let Some(index) = self.actor_index(actor) else {
            debug_assert!(false, "wander flag for unknown actor");
            return;
        };
        self.actors[index].wander_suspended = suspended;
    }

    fn place_item(
        &mut self,
        kind: ItemKind,
        cell: TileCoord,
        facing: Facing,
        out_events: &mut Vec<Event>,
    ) {
        if self.grid.tile(cell).is_none() {
            debug_assert!(false, "item cell outside the grid");
            return;
        }

        let id = ItemId::new(self.next_item_id);
        self.next_item_id += 1;

        let neighbors = orientation::resolve_neighbors(facing, cell, &self.grid);
        self.items.push(PlacedItem {
            id,
            kind,
            cell,
            facing,
            neighbors,
            watching: false,
        });
        out_events.push(Event::ItemPlaced {
            item: id,
            kind,
            cell,
        });
    }

    fn activate_item(&mut self, item: ItemId, out_events: &mut Vec<Event>) {
        let Some(index) = self.item_index(item) else {
            debug_assert!(false, "activation for unknown item");
            return;
        };

        let effect = items::activation_effect(self.items[index].kind);
        out_events.push(Event::ItemActivated { item, effect });

        if effect != ItemEffect::Scanning {
            return;
        }

        self.items[index].watching = true;
        let facing = self.items[index].facing;
        let neighbors = self.items[index].neighbors;
        let watched = items::watched_tiles(facing, &neighbors, &self.grid);

        for index in 0..self.actors.len() {
            let subject = &self.actors[index];
            if subject.class == ActorClass::Animal
                && !subject.scanned
                && watched.contains(&subject.cell)
            {
                self.actors[index].scanned = true;
                out_events.push(Event::AnimalScanned {
                    actor: self.actors[index].id,
                    item,
                });
            }
        }
    }

    fn capture_if_watched(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let subject = &self.actors[index];
        if subject.class != ActorClass::Animal || subject.scanned {
            return;
        }

        let cell = subject.cell;
        let Some(item) = self.watching_scanner_over(cell) else {
            return;
        };
        self.actors[index].scanned = true;
        out_events.push(Event::AnimalScanned {
            actor: self.actors[index].id,
            item,
        });
    }

    fn watching_scanner_over(&self, cell: TileCoord) -> Option<ItemId> {
        self.items.iter().find_map(|item| {
            if item.watching
                && items::watched_tiles(item.facing, &item.neighbors, &self.grid).contains(&cell)
            {
                Some(item.id)
            } else {
                None
            }
        })
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureTileGrid {
            length,
            tile_length,
            fog,
        } => {
            world.grid = TileGrid::generate(length, tile_length, fog);
            world.actors.clear();
            world.items.clear();
            world.next_actor_id = 0;
            world.next_item_id = 0;
            out_events.push(Event::GridConfigured {
                length,
                tile_length,
                fog,
            });
        }
        Command::SpawnActor {
            class,
            species,
            cell,
            facing,
            ready,
        } => world.spawn_actor(class, species, cell, facing, ready, out_events),
        Command::SyncActor { actor, position } => world.sync_actor(actor, position, out_events),
        Command::FaceActor { actor, facing } => world.face_actor(actor, facing, out_events),
        Command::StepActor { actor, to, facing } => {
            world.step_actor(actor, to, facing, out_events);
        }
        Command::RevealAround { cell, radius } => {
            let revealed = world.grid.reveal_around(cell, radius);
            if !revealed.is_empty() {
                out_events.push(Event::TilesRevealed { cells: revealed });
            }
        }
        Command::SetActorVisible { actor, visible } => {
            world.set_actor_visible(actor, visible, out_events);
        }
        Command::SuspendWander { actor } => world.set_wander_suspended(actor, true),
        Command::ResumeWander { actor } => world.set_wander_suspended(actor, false),
        Command::PlaceItem { kind, cell, facing } => {
            world.place_item(kind, cell, facing, out_events);
        }
        Command::ActivateItem { item } => world.activate_item(item, out_events),
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{TileGrid, World};
    use wildgrove_core::{
        ActorClass, ActorId, Facing, ItemId, ItemKind, NeighborTiles, TileCoord, WorldPoint,
    };

    /// Provides read-only access to the world's tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Dense passability matrix handed to the pathfinding collaborator:
    /// `1` is passable, `0` is blocked, indexed `[row][col]`.
    #[must_use]
    pub fn passability(world: &World) -> Vec<Vec<u8>> {
        world.grid.passability()
    }

    /// Whether the tile at `cell` has been revealed. Out-of-grid cells
    /// report `false`.
    #[must_use]
    pub fn discovered(world: &World, cell: TileCoord) -> bool {
        world.grid.tile(cell).is_some_and(super::Tile::discovered)
    }

    /// Captures a read-only view of all actors, ordered by identifier.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        let mut snapshots: Vec<ActorSnapshot> = world
            .actors
            .iter()
            .map(|actor| ActorSnapshot {
                id: actor.id,
                class: actor.class,
                species: actor.species.clone(),
                position: actor.position,
                cell: actor.cell,
                facing: actor.facing,
                neighbors: actor.neighbors,
                ready: actor.ready,
                visible: actor.visible,
                wander_suspended: actor.wander_suspended,
                scanned: actor.scanned,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        ActorView { snapshots }
    }

    /// Snapshot of the player actor, if one has been spawned.
    #[must_use]
    pub fn player(world: &World) -> Option<ActorSnapshot> {
        actor_view(world)
            .into_vec()
            .into_iter()
            .find(|snapshot| snapshot.class == ActorClass::Player)
    }

    /// Captures a read-only view of all placed items, ordered by identifier.
    #[must_use]
    pub fn item_view(world: &World) -> ItemView {
        let mut snapshots: Vec<ItemSnapshot> = world
            .items
            .iter()
            .map(|item| ItemSnapshot {
                id: item.id,
                kind: item.kind,
                cell: item.cell,
                facing: item.facing,
                watching: item.watching,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        ItemView { snapshots }
    }

    /// Read-only snapshot describing all actors in the world.
    #[derive(Clone, Debug, Default)]
    pub struct ActorView {
        snapshots: Vec<ActorSnapshot>,
    }

    impl ActorView {
        /// Creates a view from the provided snapshots, ordering them by
        /// identifier. Intended for tests and adapters that fabricate state.
        #[must_use]
        pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
            snapshots.sort_by_key(|snapshot| snapshot.id);
            Self { snapshots }
        }

        /// Iterator over the captured snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<ActorSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single actor's state used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct ActorSnapshot {
        /// Unique identifier assigned to the actor.
        pub id: ActorId,
        /// Classification of the actor.
        pub class: ActorClass,
        /// Species label used by the presentation layer, if any.
        pub species: Option<String>,
        /// Last leading-edge position reported by the engine collaborator.
        pub position: WorldPoint,
        /// Tile currently containing the actor's leading edge.
        pub cell: TileCoord,
        /// Facing the actor currently assumes.
        pub facing: Facing,
        /// Facing-relative neighbor tiles around the actor.
        pub neighbors: NeighborTiles,
        /// Whether the actor participates in orientation and visibility.
        pub ready: bool,
        /// Whether the presentation layer should draw the actor.
        pub visible: bool,
        /// Whether ambient wander behavior is currently suspended.
        pub wander_suspended: bool,
        /// Whether a scanner has captured this animal.
        pub scanned: bool,
    }

    /// Read-only snapshot describing all placed items.
    #[derive(Clone, Debug, Default)]
    pub struct ItemView {
        snapshots: Vec<ItemSnapshot>,
    }

    impl ItemView {
        /// Creates a view from the provided snapshots, ordering them by
        /// identifier. Intended for tests and adapters that fabricate state.
        #[must_use]
        pub fn from_snapshots(mut snapshots: Vec<ItemSnapshot>) -> Self {
            snapshots.sort_by_key(|snapshot| snapshot.id);
            Self { snapshots }
        }

        /// Iterator over the captured snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &ItemSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<ItemSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single placed item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ItemSnapshot {
        /// Unique identifier assigned to the item.
        pub id: ItemId,
        /// Kind of the placed item.
        pub kind: ItemKind,
        /// Tile the item occupies.
        pub cell: TileCoord,
        /// Facing the item assumes.
        pub facing: Facing,
        /// Whether the item is currently watching for animals.
        pub watching: bool,
    }
}

#[derive(Clone, Debug)]
struct Actor {
    id: ActorId,
    class: ActorClass,
    species: Option<String>,
    position: WorldPoint,
    cell: TileCoord,
    facing: Facing,
    neighbors: NeighborTiles,
    ready: bool,
    visible: bool,
    wander_suspended: bool,
    scanned: bool,
}

#[derive(Clone, Debug)]
struct PlacedItem {
    id: ItemId,
    kind: ItemKind,
    cell: TileCoord,
    facing: Facing,
    neighbors: NeighborTiles,
    watching: bool,
}
