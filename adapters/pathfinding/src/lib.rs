#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid pathfinding collaborator for Wildgrove.
//!
//! The feature layer treats route search as a black box: callers hand over
//! the world's passability matrix plus start and goal cells and receive an
//! ordered waypoint list or nothing. This crate is the stand-in
//! implementation, a plain breadth-first search producing shortest paths in
//! step count.

use std::collections::VecDeque;

use wildgrove_core::TileCoord;

/// Searches for a route from `start` to `goal` over the passability matrix
/// (`1` passable, `0` blocked, indexed `[row][col]`).
///
/// Returns the waypoint list including the start cell, or `None` when no
/// route exists; callers treat `None` as "do nothing". Ties between
/// equally short routes break deterministically by neighbor visit order.
#[must_use]
pub fn find_path(
    passability: &[Vec<u8>],
    start: TileCoord,
    goal: TileCoord,
) -> Option<Vec<TileCoord>> {
    let rows = u32::try_from(passability.len()).ok()?;
    let cols = u32::try_from(passability.first().map_or(0, Vec::len)).ok()?;
    if rows == 0 || cols == 0 {
        return None;
    }

    if !is_passable(passability, start) || !is_passable(passability, goal) {
        return None;
    }

    if start == goal {
        return Some(vec![start]);
    }

    let width = usize::try_from(cols).ok()?;
    let cell_count = width.checked_mul(usize::try_from(rows).ok()?)?;
    let mut predecessors: Vec<Option<TileCoord>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];

    let start_index = index(width, start)?;
    visited[start_index] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for neighbor in neighbors(cell, rows, cols) {
            let Some(offset) = index(width, neighbor) else {
                continue;
            };
            if visited[offset] || !is_passable(passability, neighbor) {
                continue;
            }

            visited[offset] = true;
            predecessors[offset] = Some(cell);

            if neighbor == goal {
                return Some(reconstruct(&predecessors, width, start, goal));
            }
            queue.push_back(neighbor);
        }
    }

    None
}

fn reconstruct(
    predecessors: &[Option<TileCoord>],
    width: usize,
    start: TileCoord,
    goal: TileCoord,
) -> Vec<TileCoord> {
    let mut waypoints = vec![goal];
    let mut cursor = goal;

    while cursor != start {
        let Some(previous) = index(width, cursor).and_then(|offset| predecessors[offset]) else {
            break;
        };
        waypoints.push(previous);
        cursor = previous;
    }

    waypoints.reverse();
    waypoints
}

fn is_passable(passability: &[Vec<u8>], cell: TileCoord) -> bool {
    passability
        .get(cell.row() as usize)
        .and_then(|row| row.get(cell.col() as usize))
        .is_some_and(|value| *value == 1)
}

fn neighbors(cell: TileCoord, rows: u32, cols: u32) -> impl Iterator<Item = TileCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(TileCoord::new(row, cell.col()));
        count += 1;
    }

    if let Some(col) = cell.col().checked_sub(1) {
        candidates[count] = Some(TileCoord::new(cell.row(), col));
        count += 1;
    }

    if cell.row() + 1 < rows {
        candidates[count] = Some(TileCoord::new(cell.row() + 1, cell.col()));
        count += 1;
    }

    if cell.col() + 1 < cols {
        candidates[count] = Some(TileCoord::new(cell.row(), cell.col() + 1));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: TileCoord) -> Option<usize> {
    let row = usize::try_from(cell.row()).ok()?;
    let col = usize::try_from(cell.col()).ok()?;
    row.checked_mul(width)?.checked_add(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(length: usize) -> Vec<Vec<u8>> {
        // Blocked border ring, passable interior, matching the world's
        // generated layout.
        (0..length)
            .map(|row| {
                (0..length)
                    .map(|col| {
                        u8::from(
                            row != 0 && row != length - 1 && col != 0 && col != length - 1,
                        )
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn finds_a_straight_corridor() {
        let grid = open_grid(6);
        let path = find_path(&grid, TileCoord::new(1, 1), TileCoord::new(4, 1))
            .expect("route exists");

        assert_eq!(
            path,
            vec![
                TileCoord::new(1, 1),
                TileCoord::new(2, 1),
                TileCoord::new(3, 1),
                TileCoord::new(4, 1),
            ]
        );
    }

    #[test]
    fn routes_around_walls() {
        let mut grid = open_grid(6);
        grid[2][1] = 0;
        grid[2][2] = 0;
        grid[2][3] = 0;

        let path = find_path(&grid, TileCoord::new(1, 1), TileCoord::new(3, 1))
            .expect("route exists");

        assert_eq!(path.first(), Some(&TileCoord::new(1, 1)));
        assert_eq!(path.last(), Some(&TileCoord::new(3, 1)));
        assert!(
            !path.contains(&TileCoord::new(2, 1)),
            "blocked cell must be avoided"
        );
        for pair in path.windows(2) {
            assert_eq!(
                pair[0].chebyshev_distance(pair[1]),
                1,
                "waypoints must be adjacent"
            );
            assert!(
                pair[0].row() == pair[1].row() || pair[0].col() == pair[1].col(),
                "moves stay cardinal"
            );
        }
    }

    #[test]
    fn reports_unreachable_goals() {
        let mut grid = open_grid(6);
        // Seal the goal into its own pocket.
        grid[3][3] = 0;
        grid[3][4] = 0;
        grid[4][3] = 0;
        assert!(find_path(&grid, TileCoord::new(1, 1), TileCoord::new(4, 4)).is_none());
    }

    #[test]
    fn blocked_endpoints_yield_no_route() {
        let grid = open_grid(6);
        assert!(find_path(&grid, TileCoord::new(0, 0), TileCoord::new(3, 3)).is_none());
        assert!(find_path(&grid, TileCoord::new(1, 1), TileCoord::new(0, 3)).is_none());
    }

    #[test]
    fn trivial_route_is_the_start_cell() {
        let grid = open_grid(4);
        assert_eq!(
            find_path(&grid, TileCoord::new(1, 1), TileCoord::new(1, 1)),
            Some(vec![TileCoord::new(1, 1)])
        );
    }
}
