#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path-follower system that walks actors through a pathfinder's waypoint
//! list one motion-complete event at a time.
//!
//! Traversal is not a blocking wait: each leg is announced as a
//! [`Command::StepActor`] and the follower sits idle until the animation
//! collaborator reports the motion finished, at which point the driving
//! adapter calls [`Movement::advance`]. The per-actor state machine is
//! `Idle -> Following -> Idle` and re-entrant; starting a new path while one
//! is in progress replaces it.

use std::collections::{BTreeMap, VecDeque};

use wildgrove_core::{reduce_waypoints, ActorId, Command, Facing, TileCoord};

/// Pure system that turns waypoint lists into step commands.
#[derive(Debug, Default)]
pub struct Movement {
    followers: BTreeMap<ActorId, Follower>,
}

impl Movement {
    /// Begins following a path produced by the pathfinding collaborator.
    ///
    /// Precondition: `waypoints` is non-empty and begins at the actor's
    /// current cell (the collaborator's contract). When the pathfinder
    /// reports no route this function is simply never called.
    ///
    /// Suspends the actor's ambient wander, then consumes the first waypoint
    /// synchronously: the actor is stepped onto it while assuming the first
    /// leg's facing, and both queues are popped.
    pub fn start_path(
        &mut self,
        actor: ActorId,
        waypoints: Vec<TileCoord>,
        out: &mut Vec<Command>,
    ) {
        debug_assert!(
            !waypoints.is_empty(),
            "a path contains at least the start cell"
        );
        if waypoints.is_empty() {
            return;
        }

        let mut directions: VecDeque<Facing> = reduce_waypoints(&waypoints).into();
        let mut waypoints: VecDeque<TileCoord> = waypoints.into();

        out.push(Command::SuspendWander { actor });

        let first = waypoints.pop_front();
        let facing = directions.pop_front();
        if let Some(to) = first {
            out.push(Command::StepActor { actor, to, facing });
        }

        let _ = self.followers.insert(
            actor,
            Follower {
                waypoints,
                directions,
            },
        );
    }

    /// Advances a following actor by one leg.
    ///
    /// Invoked whenever the actor's current motion completes. While both
    /// queues hold entries the next waypoint and facing pop together; the
    /// very last waypoint is consumed with no facing change and returns the
    /// actor to idle, re-enabling ambient wander.
    pub fn advance(&mut self, actor: ActorId, out: &mut Vec<Command>) {
        let Some(follower) = self.followers.get_mut(&actor) else {
            return;
        };

        match (
            follower.waypoints.pop_front(),
            follower.directions.pop_front(),
        ) {
            (Some(to), Some(facing)) => out.push(Command::StepActor {
                actor,
                to,
                facing: Some(facing),
            }),
            (Some(to), None) => {
                out.push(Command::StepActor {
                    actor,
                    to,
                    facing: None,
                });
                self.finish(actor, out);
            }
            (None, _) => self.finish(actor, out),
        }
    }

    /// Reports whether the actor currently has a path in progress.
    #[must_use]
    pub fn is_following(&self, actor: ActorId) -> bool {
        self.followers.contains_key(&actor)
    }

    fn finish(&mut self, actor: ActorId, out: &mut Vec<Command>) {
        let _ = self.followers.remove(&actor);
        out.push(Command::ResumeWander { actor });
    }
}

#[derive(Debug)]
struct Follower {
    waypoints: VecDeque<TileCoord>,
    directions: VecDeque<Facing>,
}
