//! Facing-keyed neighbor resolution used by the world crate.

use wildgrove_core::{Facing, NeighborSpan, NeighborTiles, TileCoord, WorldPoint, world_to_tile};

use crate::TileGrid;

/// Derives an actor's tile coordinates and facing-relative neighbor record
/// from its continuous leading-edge position.
///
/// Precondition: the actor is ready (instantiated and not manually driven).
/// Callers gate on the readiness flag; this function itself is pure.
pub(crate) fn orient(position: WorldPoint, facing: Facing, grid: &TileGrid) -> NeighborTiles {
    let cell = world_to_tile(position, grid.tile_length(), grid.length());
    resolve_neighbors(facing, cell, grid)
}

/// Resolves the four facing-relative neighbor slots around `cell`.
///
/// The row in the fixed table below is selected by the facing ordinal; the
/// `(minus, plus)` spans clamp at grid edges, so every slot always lands on
/// an in-bounds tile (possibly the center's row or column itself).
///
/// | facing   | front | left | right | back |
/// |----------|-------|------|-------|------|
/// | East(0)  | row+  | col- | col+  | row- |
/// | North(1) | col-  | row- | row+  | col+ |
/// | West(2)  | row-  | col+ | col-  | row+ |
/// | South(3) | col+  | row+ | row-  | col- |
pub(crate) fn resolve_neighbors(facing: Facing, cell: TileCoord, grid: &TileGrid) -> NeighborTiles {
    let rows = NeighborSpan::clamped(grid.length(), cell.row());
    let cols = NeighborSpan::clamped(grid.length(), cell.col());

    let row_minus = TileCoord::new(rows.minus(), cell.col());
    let row_plus = TileCoord::new(rows.plus(), cell.col());
    let col_minus = TileCoord::new(cell.row(), cols.minus());
    let col_plus = TileCoord::new(cell.row(), cols.plus());

    let (front, left, right, back) = match facing {
        Facing::East => (row_plus, col_minus, col_plus, row_minus),
        Facing::North => (col_minus, row_minus, row_plus, col_plus),
        Facing::West => (row_minus, col_plus, col_minus, row_plus),
        Facing::South => (col_plus, row_plus, row_minus, col_minus),
    };

    NeighborTiles {
        center: cell,
        front,
        left,
        right,
        back,
    }
}

/// Tile one further step beyond `front` along the facing axis, clamped in
/// bounds. Scanners watch this tile in addition to the front tile.
pub(crate) fn beyond_front(facing: Facing, front: TileCoord, grid: &TileGrid) -> TileCoord {
    let rows = NeighborSpan::clamped(grid.length(), front.row());
    let cols = NeighborSpan::clamped(grid.length(), front.col());

    match facing {
        Facing::East => TileCoord::new(rows.plus(), front.col()),
        Facing::North => TileCoord::new(front.row(), cols.minus()),
        Facing::West => TileCoord::new(rows.minus(), front.col()),
        Facing::South => TileCoord::new(front.row(), cols.plus()),
    }
}
