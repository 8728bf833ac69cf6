#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ambient wander system that turns idle animals at randomized intervals.
//!
//! Every `3s + n` of simulated time, where `n` is redrawn below three
//! seconds at each firing, a ready animal whose wander is not suspended
//! assumes a random facing. The path follower suspends an animal's wander
//! while walking it; suspension drops the timer, resumption re-arms it
//! fresh. Randomness comes from a seeded LCG so replays are exact.

use std::collections::BTreeMap;
use std::time::Duration;

use wildgrove_core::{ActorClass, ActorId, Command, Event, Facing};
use wildgrove_world::query::ActorView;

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

const BASE_INTERVAL: Duration = Duration::from_secs(3);
const JITTER_RANGE_MS: u64 = 3_000;

/// Configuration parameters required to construct the wander system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically emits facing changes for idle animals.
#[derive(Debug)]
pub struct Wander {
    rng_state: u64,
    timers: BTreeMap<ActorId, Timer>,
}

impl Wander {
    /// Creates a new wander system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng_state: config.rng_seed,
            timers: BTreeMap::new(),
        }
    }

    /// Consumes events and the actor view to emit facing commands.
    pub fn handle(&mut self, events: &[Event], actor_view: &ActorView, out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = elapsed.saturating_add(*dt);
            }
        }
        if elapsed.is_zero() {
            return;
        }

        // Suspension and despawn reclaim the timer; it re-arms from zero
        // once the actor wanders again.
        self.timers.retain(|actor, _| {
            actor_view.iter().any(|snapshot| {
                snapshot.id == *actor
                    && snapshot.class == ActorClass::Animal
                    && snapshot.ready
                    && !snapshot.wander_suspended
            })
        });

        for snapshot in actor_view.iter() {
            if snapshot.class != ActorClass::Animal
                || !snapshot.ready
                || snapshot.wander_suspended
            {
                continue;
            }

            if !self.timers.contains_key(&snapshot.id) {
                let interval = self.next_interval();
                let _ = self.timers.insert(
                    snapshot.id,
                    Timer {
                        accumulated: Duration::ZERO,
                        interval,
                    },
                );
            }

            if let Some(timer) = self.timers.get_mut(&snapshot.id) {
                timer.accumulated = timer.accumulated.saturating_add(elapsed);
            }

            let due = self
                .timers
                .get(&snapshot.id)
                .is_some_and(|timer| timer.accumulated >= timer.interval);
            if due {
                let facing = self.random_facing();
                let interval = self.next_interval();
                if let Some(timer) = self.timers.get_mut(&snapshot.id) {
                    timer.accumulated = Duration::ZERO;
                    timer.interval = interval;
                }
                out.push(Command::FaceActor {
                    actor: snapshot.id,
                    facing,
                });
            }
        }
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }

    fn next_interval(&mut self) -> Duration {
        let jitter = self.advance_rng() % JITTER_RANGE_MS;
        BASE_INTERVAL.saturating_add(Duration::from_millis(jitter))
    }

    fn random_facing(&mut self) -> Facing {
        Facing::from_index((self.advance_rng() % 4) as u8)
    }
}

#[derive(Debug)]
struct Timer {
    accumulated: Duration,
    interval: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildgrove_core::{NeighborTiles, TileCoord, WorldPoint};
    use wildgrove_world::query::ActorSnapshot;

    fn animal(id: u32, suspended: bool) -> ActorSnapshot {
        let cell = TileCoord::new(2, 2);
        let neighbors = NeighborTiles {
            center: cell,
            front: TileCoord::new(3, 2),
            left: TileCoord::new(2, 1),
            right: TileCoord::new(2, 3),
            back: TileCoord::new(1, 2),
        };
        ActorSnapshot {
            id: ActorId::new(id),
            class: ActorClass::Animal,
            species: None,
            position: WorldPoint::new(64.0, 64.0),
            cell,
            facing: Facing::East,
            neighbors,
            ready: true,
            visible: true,
            wander_suspended: suspended,
            scanned: false,
        }
    }

    fn tick(dt_ms: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(dt_ms),
        }]
    }

    #[test]
    fn idle_animals_turn_after_the_interval_elapses() {
        let mut wander = Wander::new(Config::new(0x5eed));
        let view = ActorView::from_snapshots(vec![animal(0, false)]);

        let mut out = Vec::new();
        wander.handle(&tick(1_000), &view, &mut out);
        assert!(out.is_empty(), "one second is below the base interval");

        wander.handle(&tick(6_000), &view, &mut out);
        assert_eq!(out.len(), 1, "accumulated time passed the interval");
        assert!(matches!(
            out[0],
            Command::FaceActor {
                actor,
                ..
            } if actor == ActorId::new(0)
        ));
    }

    #[test]
    fn suspended_animals_never_turn() {
        let mut wander = Wander::new(Config::new(0x5eed));
        let view = ActorView::from_snapshots(vec![animal(0, true)]);

        let mut out = Vec::new();
        wander.handle(&tick(10_000), &view, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn suspension_drops_accumulated_time() {
        let mut wander = Wander::new(Config::new(0x5eed));
        let mut out = Vec::new();

        // Build up nearly a full interval, then suspend: the timer is
        // reclaimed and the animal restarts from zero on resumption.
        let idle = ActorView::from_snapshots(vec![animal(0, false)]);
        wander.handle(&tick(2_900), &idle, &mut out);
        assert!(out.is_empty());

        let suspended = ActorView::from_snapshots(vec![animal(0, true)]);
        wander.handle(&tick(10_000), &suspended, &mut out);
        assert!(out.is_empty());

        wander.handle(&tick(2_900), &idle, &mut out);
        assert!(out.is_empty(), "fresh timer starts over after resumption");
    }

    #[test]
    fn seeded_runs_repeat_exactly() {
        let view = ActorView::from_snapshots(vec![animal(0, false), animal(1, false)]);

        let mut first = Vec::new();
        let mut wander = Wander::new(Config::new(42));
        for _ in 0..10 {
            wander.handle(&tick(1_500), &view, &mut first);
        }

        let mut second = Vec::new();
        let mut wander = Wander::new(Config::new(42));
        for _ in 0..10 {
            wander.handle(&tick(1_500), &view, &mut second);
        }

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
