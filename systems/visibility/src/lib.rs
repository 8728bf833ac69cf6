#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fog-of-war system that reveals terrain around the player and decides
//! which animals the presentation layer should draw.

use wildgrove_core::{ActorClass, Command, Event, TileCoord};
use wildgrove_world::query::ActorView;

/// Chebyshev radius revealed around the player each tick.
const REVEAL_RADIUS: u32 = 1;

/// Chebyshev radius within which an animal is visible regardless of
/// discovery state.
const PROXIMITY_RADIUS: u32 = 1;

/// Pure system that reacts to clock ticks and emits fog-of-war commands.
#[derive(Debug, Default)]
pub struct Visibility;

impl Visibility {
    /// Consumes events and immutable views to emit reveal and visibility
    /// commands.
    ///
    /// Runs once per [`Event::TimeAdvanced`] batch: the ready player's
    /// surroundings are revealed, then every ready animal's render
    /// visibility is re-decided. Idle while fog is off or the player is not
    /// ready.
    pub fn handle<F>(
        &self,
        events: &[Event],
        actor_view: &ActorView,
        fog: bool,
        is_discovered: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(TileCoord) -> bool,
    {
        if !fog {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let Some(player) = actor_view
            .iter()
            .find(|snapshot| snapshot.class == ActorClass::Player && snapshot.ready)
        else {
            return;
        };

        out.push(Command::RevealAround {
            cell: player.cell,
            radius: REVEAL_RADIUS,
        });

        for animal in actor_view
            .iter()
            .filter(|snapshot| snapshot.class == ActorClass::Animal && snapshot.ready)
        {
            let visible = npc_visible(animal.cell, player.cell, is_discovered(animal.cell));
            if visible != animal.visible {
                out.push(Command::SetActorVisible {
                    actor: animal.id,
                    visible,
                });
            }
        }
    }
}

/// Decides whether an animal should be rendered.
///
/// An animal is visible when it stands within one tile of the player on both
/// axes, or when its center tile has already been discovered. Proximity
/// alone suffices even on unexplored ground.
#[must_use]
pub fn npc_visible(npc: TileCoord, player: TileCoord, center_discovered: bool) -> bool {
    npc.chebyshev_distance(player) <= PROXIMITY_RADIUS || center_discovered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proximity_reveals_regardless_of_discovery() {
        let player = TileCoord::new(2, 2);
        assert!(npc_visible(TileCoord::new(3, 3), player, false));
        assert!(npc_visible(TileCoord::new(2, 2), player, false));
    }

    #[test]
    fn distant_animals_depend_on_discovery() {
        let player = TileCoord::new(2, 2);
        assert!(!npc_visible(TileCoord::new(4, 2), player, false));
        assert!(npc_visible(TileCoord::new(4, 2), player, true));
    }
}
