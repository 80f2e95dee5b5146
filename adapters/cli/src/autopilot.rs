//! Seeded stand-in for a human player.

use std::time::Duration;

use maze_chase_core::{intersects, Direction, Rect, LEGALITY_EPSILON};
use maze_chase_world::{query, World};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Steers the agent toward the nearest remaining pickup, occasionally
/// wandering off at random so it does not loop forever around a wall.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    wander_probability: f64,
}

impl Autopilot {
    pub(crate) fn new(seed: u64, wander_probability: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            wander_probability: wander_probability.clamp(0.0, 1.0),
        }
    }

    /// Direction to request for the coming tick, or `None` when the agent
    /// is absent, boxed in or has nothing left to collect.
    pub(crate) fn decide(&mut self, world: &World, dt: Duration) -> Option<Direction> {
        let entity = query::agent(world).filter(|entity| entity.is_active())?;
        let agent = entity.as_agent()?;
        let bounds = entity.bounds();
        let step = agent.speed() * dt.as_secs_f32();

        let legal: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|direction| !is_blocked(world, &bounds.stepped(*direction, step)))
            .collect();
        let reverse = agent.heading().map(Direction::opposite);
        let forward: Vec<Direction> = legal
            .iter()
            .copied()
            .filter(|direction| Some(*direction) != reverse)
            .collect();
        let candidates = if forward.is_empty() { legal } else { forward };

        let (target_x, target_y) = nearest_pickup(world, &bounds)?;
        if self.rng.gen_bool(self.wander_probability) {
            return candidates.choose(&mut self.rng).copied();
        }

        candidates.into_iter().min_by(|a, b| {
            let da = manhattan(bounds.stepped(*a, step).center(), (target_x, target_y));
            let db = manhattan(bounds.stepped(*b, step).center(), (target_x, target_y));
            da.total_cmp(&db)
        })
    }
}

fn is_blocked(world: &World, target: &Rect) -> bool {
    query::active_entities(world)
        .filter(|entity| entity.is_solid() && entity.as_blocker().is_some())
        .any(|entity| intersects(target, &entity.bounds(), LEGALITY_EPSILON))
}

fn nearest_pickup(world: &World, from: &Rect) -> Option<(f32, f32)> {
    let origin = from.center();
    query::active_entities(world)
        .filter(|entity| entity.as_collectible().is_some())
        .map(|entity| entity.bounds().center())
        .min_by(|a, b| manhattan(origin, *a).total_cmp(&manhattan(origin, *b)))
}

fn manhattan(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}
