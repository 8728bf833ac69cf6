use wildgrove_core::{ActorClass, Command, Event, Facing, GridLength, TileCoord};
use wildgrove_system_movement::Movement;
use wildgrove_world::{self as world, query, World};

fn configure(world: &mut World, length: u32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::ConfigureTileGrid {
            length: GridLength::new(length),
            tile_length: 32.0,
            fog: false,
        },
        &mut events,
    );
}

fn spawn_animal(world: &mut World, cell: TileCoord) -> wildgrove_core::ActorId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnActor {
            class: ActorClass::Animal,
            species: Some("fox".to_owned()),
            cell,
            facing: Facing::East,
            ready: true,
        },
        &mut events,
    );
    match events.first() {
        Some(Event::ActorSpawned { actor, .. }) => *actor,
        other => panic!("expected spawn confirmation, got {other:?}"),
    }
}

/// Applies pending commands and simulates the animation collaborator:
/// every announced step completes immediately, reporting the sprite's new
/// position and firing the motion-complete callback.
fn drive(world: &mut World, movement: &mut Movement, mut commands: Vec<Command>) -> Vec<Event> {
    let mut log = Vec::new();

    while !commands.is_empty() {
        let mut stepped = Vec::new();
        for command in commands.drain(..) {
            let mut events = Vec::new();
            world::apply(world, command, &mut events);
            for event in &events {
                if let Event::ActorStepped { actor, to, .. } = event {
                    stepped.push((*actor, *to));
                }
            }
            log.extend(events);
        }

        for (actor, to) in stepped {
            let anchor = query::tile_grid(world).tile_anchor(to);
            let mut events = Vec::new();
            world::apply(
                world,
                Command::SyncActor {
                    actor,
                    position: anchor,
                },
                &mut events,
            );
            log.extend(events);
            movement.advance(actor, &mut commands);
        }
    }

    log
}

#[test]
fn follower_walks_the_actor_to_the_destination() {
    let mut world = World::new();
    configure(&mut world, 6);
    let actor = spawn_animal(&mut world, TileCoord::new(1, 1));

    let waypoints = vec![
        TileCoord::new(1, 1),
        TileCoord::new(2, 1),
        TileCoord::new(3, 1),
        TileCoord::new(3, 2),
    ];

    let mut movement = Movement::default();
    let mut commands = Vec::new();
    movement.start_path(actor, waypoints, &mut commands);
    let log = drive(&mut world, &mut movement, commands);

    let snapshot = query::actor_view(&world)
        .into_vec()
        .into_iter()
        .find(|entry| entry.id == actor)
        .expect("animal exists");

    assert_eq!(snapshot.cell, TileCoord::new(3, 2));
    assert!(!snapshot.wander_suspended, "wander resumes after the path");
    assert!(!movement.is_following(actor));

    let legs: Vec<TileCoord> = log
        .iter()
        .filter_map(|event| match event {
            Event::ActorStepped { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        legs,
        vec![
            TileCoord::new(1, 1),
            TileCoord::new(2, 1),
            TileCoord::new(3, 1),
            TileCoord::new(3, 2),
        ]
    );
}

#[test]
fn wander_is_suspended_while_following() {
    let mut world = World::new();
    configure(&mut world, 6);
    let actor = spawn_animal(&mut world, TileCoord::new(1, 1));

    let mut movement = Movement::default();
    let mut commands = Vec::new();
    movement.start_path(
        actor,
        vec![TileCoord::new(1, 1), TileCoord::new(1, 2)],
        &mut commands,
    );

    // Apply only the synchronous batch; the path is still in flight.
    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
    }

    let snapshot = query::actor_view(&world)
        .into_vec()
        .into_iter()
        .find(|entry| entry.id == actor)
        .expect("animal exists");
    assert!(snapshot.wander_suspended);
    assert!(movement.is_following(actor));
}

#[test]
fn facing_follows_the_leg_directions() {
    let mut world = World::new();
    configure(&mut world, 6);
    let actor = spawn_animal(&mut world, TileCoord::new(1, 1));

    let waypoints = vec![
        TileCoord::new(1, 1),
        TileCoord::new(1, 2),
        TileCoord::new(2, 2),
    ];

    let mut movement = Movement::default();
    let mut commands = Vec::new();
    movement.start_path(actor, waypoints, &mut commands);
    let log = drive(&mut world, &mut movement, commands);

    let facings: Vec<Option<Facing>> = log
        .iter()
        .filter_map(|event| match event {
            Event::ActorStepped { facing, .. } => Some(*facing),
            _ => None,
        })
        .collect();
    assert_eq!(
        facings,
        vec![Some(Facing::South), Some(Facing::East), None]
    );

    let snapshot = query::actor_view(&world)
        .into_vec()
        .into_iter()
        .find(|entry| entry.id == actor)
        .expect("animal exists");
    assert_eq!(snapshot.facing, Facing::East);
}
