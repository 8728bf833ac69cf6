use wildgrove_core::{ActorClass, Command, Event, Facing, GridLength, TileCoord};
use wildgrove_system_movement::Movement;
use wildgrove_world::{self as world, query, World};

/// Replays the same scripted path-following session twice and demands
/// identical event logs. The whole stack is deterministic: any divergence
/// means hidden state leaked into the world or the follower.
#[test]
fn replays_produce_identical_event_logs() {
    let first = replay();
    let second = replay();
    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first
            .iter()
            .any(|event| matches!(event, Event::ActorStepped { .. })),
        "scripted session should exercise stepping"
    );
}

fn replay() -> Vec<Event> {
    let mut world = World::new();
    let mut log = Vec::new();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureTileGrid {
            length: GridLength::new(8),
            tile_length: 32.0,
            fog: true,
        },
        &mut events,
    );
    log.extend(events.drain(..));

    world::apply(
        &mut world,
        Command::SpawnActor {
            class: ActorClass::Player,
            species: None,
            cell: TileCoord::new(1, 1),
            facing: Facing::East,
            ready: true,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnActor {
            class: ActorClass::Animal,
            species: Some("owl".to_owned()),
            cell: TileCoord::new(5, 5),
            facing: Facing::North,
            ready: true,
        },
        &mut events,
    );
    log.extend(events.drain(..));

    let animal = query::actor_view(&world)
        .into_vec()
        .into_iter()
        .find(|snapshot| snapshot.class == ActorClass::Animal)
        .expect("animal spawned")
        .id;

    let mut movement = Movement::default();
    let mut commands = Vec::new();
    movement.start_path(
        animal,
        vec![
            TileCoord::new(5, 5),
            TileCoord::new(4, 5),
            TileCoord::new(4, 4),
            TileCoord::new(3, 4),
        ],
        &mut commands,
    );

    while !commands.is_empty() {
        let mut stepped = Vec::new();
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
            for event in &events {
                if let Event::ActorStepped { actor, to, .. } = event {
                    stepped.push((*actor, *to));
                }
            }
            log.extend(events.drain(..));
        }

        for (actor, to) in stepped {
            let anchor = query::tile_grid(&world).tile_anchor(to);
            world::apply(
                &mut world,
                Command::SyncActor {
                    actor,
                    position: anchor,
                },
                &mut events,
            );
            log.extend(events.drain(..));
            movement.advance(actor, &mut commands);
        }
    }

    log
}
