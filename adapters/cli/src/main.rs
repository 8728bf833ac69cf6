#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line driver that exercises the Wildgrove feature layer headlessly.
//!
//! The binary stands in for the engine collaborator: it feeds the world
//! per-frame position syncs, completes every announced motion leg
//! instantly, runs the fog-of-war and wander systems each tick, and walks
//! the player across the grid via the pathfinding collaborator. The final
//! fog view and actor table land on stdout.

mod layout_transfer;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use layout_transfer::{LayoutItem, MapLayoutSnapshot};
use wildgrove_core::{
    ActorClass, Command, Event, Facing, GridLength, ItemEffect, ItemKind, TileCoord,
};
use wildgrove_pathfinding::find_path;
use wildgrove_rendering::{pick_tile, tile_tint};
use wildgrove_system_movement::Movement;
use wildgrove_system_visibility::Visibility;
use wildgrove_system_wander::{Config as WanderConfig, Wander};
use wildgrove_world::{self as world, query, World};

const TILE_LENGTH: f32 = 32.0;
const TICK: Duration = Duration::from_millis(100);
const SPECIES: [&str; 3] = ["fox", "owl", "hare"];

#[derive(Debug, Parser)]
#[command(name = "wildgrove", about = "Headless Wildgrove feature-layer demo")]
struct Args {
    /// Side length of the square grid in tiles.
    #[arg(long, default_value_t = 9)]
    length: u32,

    /// Disable fog of war.
    #[arg(long)]
    no_fog: bool,

    /// Seed for scenario setup and wander timing.
    #[arg(long, default_value_t = 0x5eed_cafe)]
    seed: u64,

    /// Number of animals to spawn.
    #[arg(long, default_value_t = 3)]
    animals: u32,

    /// Number of fixed ticks to simulate before the pathfind demo.
    #[arg(long, default_value_t = 40)]
    ticks: u32,

    /// Restore a grid-and-items layout exported earlier.
    #[arg(long)]
    import_layout: Option<String>,

    /// Print the current layout as a transfer string and exit.
    #[arg(long)]
    export_layout: bool,

    /// Probe which tile sits under a world-space cursor position.
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    cursor: Option<Vec<f32>>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut session = Session::new(args.seed);
    setup(&mut session, &args)?;

    if args.export_layout {
        println!("{}", export_layout(&session.world));
        return Ok(());
    }

    for _ in 0..args.ticks {
        let _ = session.tick();
    }

    activate_items(&mut session);
    walk_player_to_corner(&mut session);

    print_report(&session.world);
    if let Some(cursor) = &args.cursor {
        probe_cursor(&session.world, Vec2::new(cursor[0], cursor[1]));
    }
    Ok(())
}

struct Session {
    world: World,
    visibility: Visibility,
    wander: Wander,
    movement: Movement,
}

impl Session {
    fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            visibility: Visibility::default(),
            wander: Wander::new(WanderConfig::new(seed)),
            movement: Movement::default(),
        }
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    /// One fixed tick: clock, engine position syncs, fog pass, wander pass.
    fn tick(&mut self) -> Vec<Event> {
        let mut log = self.apply(Command::Tick { dt: TICK });

        let snapshots = query::actor_view(&self.world).into_vec();
        for snapshot in &snapshots {
            log.extend(self.apply(Command::SyncActor {
                actor: snapshot.id,
                position: snapshot.position,
            }));
        }

        let actor_view = query::actor_view(&self.world);
        let fog = query::tile_grid(&self.world).fog();
        let mut commands = Vec::new();
        self.visibility.handle(
            &log,
            &actor_view,
            fog,
            |cell| query::discovered(&self.world, cell),
            &mut commands,
        );
        for command in commands {
            log.extend(self.apply(command));
        }

        let actor_view = query::actor_view(&self.world);
        let mut commands = Vec::new();
        self.wander.handle(&log, &actor_view, &mut commands);
        for command in commands {
            log.extend(self.apply(command));
        }

        log
    }

    /// Drives a started path to completion, ticking once per finished leg.
    fn drive_path(&mut self, mut commands: Vec<Command>) {
        while !commands.is_empty() {
            let mut stepped = Vec::new();
            for command in commands.drain(..) {
                let events = self.apply(command);
                for event in &events {
                    if let Event::ActorStepped { actor, to, .. } = event {
                        stepped.push((*actor, *to));
                    }
                }
            }

            for (actor, to) in stepped {
                let anchor = query::tile_grid(&self.world).tile_anchor(to);
                let _ = self.apply(Command::SyncActor {
                    actor,
                    position: anchor,
                });
                let _ = self.tick();
                self.movement.advance(actor, &mut commands);
            }
        }
    }
}

fn setup(session: &mut Session, args: &Args) -> Result<()> {
    let (length, tile_length, fog, items) = match &args.import_layout {
        Some(encoded) => {
            let snapshot =
                MapLayoutSnapshot::decode(encoded).context("decoding layout transfer string")?;
            (
                GridLength::new(snapshot.length),
                snapshot.tile_length,
                snapshot.fog,
                snapshot.items,
            )
        }
        None => (
            GridLength::new(args.length),
            TILE_LENGTH,
            !args.no_fog,
            default_items(args.length),
        ),
    };

    if length.get() < 3 {
        bail!("grid length must be at least 3 to leave a passable interior");
    }

    let _ = session.apply(Command::ConfigureTileGrid {
        length,
        tile_length,
        fog,
    });
    for item in &items {
        let _ = session.apply(Command::PlaceItem {
            kind: item.kind,
            cell: item.cell,
            facing: item.facing,
        });
    }

    let _ = session.apply(Command::SpawnActor {
        class: ActorClass::Player,
        species: None,
        cell: TileCoord::new(1, 1),
        facing: Facing::East,
        ready: true,
    });

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for index in 0..args.animals {
        let row = rng.gen_range(1..length.get() - 1);
        let col = rng.gen_range(1..length.get() - 1);
        let species = SPECIES[index as usize % SPECIES.len()];
        let _ = session.apply(Command::SpawnActor {
            class: ActorClass::Animal,
            species: Some(species.to_owned()),
            cell: TileCoord::new(row, col),
            facing: Facing::South,
            ready: true,
        });
    }

    Ok(())
}

fn default_items(length: u32) -> Vec<LayoutItem> {
    let center = length / 2;
    vec![
        LayoutItem {
            kind: ItemKind::Scanner,
            cell: TileCoord::new(center, center),
            facing: Facing::East,
        },
        LayoutItem {
            kind: ItemKind::Candy,
            cell: TileCoord::new(1, 2),
            facing: Facing::South,
        },
    ]
}

fn export_layout(world: &World) -> String {
    let grid = query::tile_grid(world);
    let items = query::item_view(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| LayoutItem {
            kind: snapshot.kind,
            cell: snapshot.cell,
            facing: snapshot.facing,
        })
        .collect();

    MapLayoutSnapshot {
        length: grid.length().get(),
        tile_length: grid.tile_length(),
        fog: grid.fog(),
        items,
    }
    .encode()
}

fn activate_items(session: &mut Session) {
    let items = query::item_view(&session.world).into_vec();
    for snapshot in items {
        let events = session.apply(Command::ActivateItem { item: snapshot.id });
        for event in events {
            match event {
                Event::ItemActivated {
                    item,
                    effect: ItemEffect::Inert,
                } => log::warn!("item {} is using the builtin action", item.get()),
                Event::AnimalScanned { actor, item } => {
                    log::info!("scanner {} captured animal {}", item.get(), actor.get());
                }
                _ => {}
            }
        }
    }
}

fn walk_player_to_corner(session: &mut Session) {
    let Some(player) = query::player(&session.world) else {
        return;
    };
    let length = query::tile_grid(&session.world).length();
    let goal = TileCoord::new(length.get() - 2, length.get() - 2);

    match find_path(&query::passability(&session.world), player.cell, goal) {
        None => log::warn!(
            "path not found from ({}, {}) to ({}, {})",
            player.cell.row(),
            player.cell.col(),
            goal.row(),
            goal.col()
        ),
        Some(waypoints) => {
            let mut commands = Vec::new();
            session.movement.start_path(player.id, waypoints, &mut commands);
            session.drive_path(commands);
        }
    }
}

fn render_map(world: &World) -> String {
    let grid = query::tile_grid(world);
    let actors = query::actor_view(world).into_vec();
    let items = query::item_view(world).into_vec();
    let length = grid.length().get();

    let mut out = String::new();
    for row in 0..length {
        for col in 0..length {
            let cell = TileCoord::new(row, col);
            let player_here = actors
                .iter()
                .any(|actor| actor.class == ActorClass::Player && actor.cell == cell);
            let animal_here = actors
                .iter()
                .any(|actor| actor.class == ActorClass::Animal && actor.cell == cell && actor.visible);
            let item_here = items.iter().any(|item| item.cell == cell);
            let blocked = grid.tile(cell).is_some_and(|tile| tile.blocked());

            let glyph = if player_here {
                '@'
            } else if animal_here {
                'a'
            } else if !query::discovered(world, cell) {
                '~'
            } else if item_here {
                '+'
            } else if blocked {
                '#'
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn print_report(world: &World) {
    println!("{}", render_map(world));
    for snapshot in query::actor_view(world).into_vec() {
        let class = match snapshot.class {
            ActorClass::Player => "player",
            ActorClass::Animal => "animal",
        };
        println!(
            "actor {:>2} {:<6} cell=({}, {}) facing={:?} visible={} scanned={}",
            snapshot.id.get(),
            class,
            snapshot.cell.row(),
            snapshot.cell.col(),
            snapshot.facing,
            snapshot.visible,
            snapshot.scanned
        );
    }
}

fn probe_cursor(world: &World, cursor: Vec2) {
    let grid = query::tile_grid(world);
    match pick_tile(cursor, grid.tile_length(), grid.length()) {
        Some(cell) => {
            let tint = tile_tint(query::discovered(world, cell), true);
            println!(
                "cursor ({}, {}) hovers tile ({}, {}) tint=({:.2}, {:.2}, {:.2})",
                cursor.x,
                cursor.y,
                cell.row(),
                cell.col(),
                tint.red,
                tint.green,
                tint.blue
            );
        }
        None => println!("cursor ({}, {}) is outside the world bounds", cursor.x, cursor.y),
    }
}
