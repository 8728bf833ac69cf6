//! Item behavior catalog.
//!
//! Items share a uniform activation entry point; most kinds are flavor
//! objects with no world effect, while the scanner leaves a persistent
//! watcher that captures animals walking into its line of sight.

use wildgrove_core::{Facing, ItemEffect, ItemKind, NeighborTiles, TileCoord};

use crate::{orientation, TileGrid};

/// Resolves what activating an item of `kind` does.
pub(crate) fn activation_effect(kind: ItemKind) -> ItemEffect {
    if kind.is_placeable_watcher() {
        ItemEffect::Scanning
    } else {
        ItemEffect::Inert
    }
}

/// Tiles observed by a watching scanner: its front tile plus the tile one
/// further step along the facing axis. Both clamp at the grid edge, so a
/// scanner aimed off the map simply watches a shorter line.
pub(crate) fn watched_tiles(
    facing: Facing,
    neighbors: &NeighborTiles,
    grid: &TileGrid,
) -> [TileCoord; 2] {
    let front = neighbors.front;
    [front, orientation::beyond_front(facing, front, grid)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileGrid;
    use wildgrove_core::GridLength;

    #[test]
    fn only_the_scanner_watches() {
        assert_eq!(activation_effect(ItemKind::Scanner), ItemEffect::Scanning);
        assert_eq!(activation_effect(ItemKind::Candy), ItemEffect::Inert);
        assert_eq!(activation_effect(ItemKind::Lint), ItemEffect::Inert);
    }

    #[test]
    fn scanner_watches_two_tiles_ahead() {
        let grid = TileGrid::generate(GridLength::new(5), 32.0, false);
        let neighbors = orientation::resolve_neighbors(Facing::East, TileCoord::new(1, 2), &grid);

        let watched = watched_tiles(Facing::East, &neighbors, &grid);
        assert_eq!(watched, [TileCoord::new(2, 2), TileCoord::new(3, 2)]);
    }

    #[test]
    fn watch_line_shortens_at_the_edge() {
        let grid = TileGrid::generate(GridLength::new(5), 32.0, false);
        let neighbors = orientation::resolve_neighbors(Facing::East, TileCoord::new(3, 2), &grid);

        let watched = watched_tiles(Facing::East, &neighbors, &grid);
        assert_eq!(watched, [TileCoord::new(4, 2), TileCoord::new(4, 2)]);
    }
}
