#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuer decision system.
//!
//! Every tick the world asks [`PursuerAi::steer`] which heading a pursuer
//! should take. The system never mutates the world: it inspects the
//! pursuer's own state, looks one step ahead in each candidate direction
//! through the [`Surroundings`] view supplied by the world, and answers with
//! a [`Steering`] decision. All randomness is drawn from the generator lent
//! by the caller so replays stay reproducible.

use maze_chase_core::{Direction, PursuerKind, PursuerMode, Rect};
use rand::{seq::SliceRandom, Rng};

/// Read-only view of the maze consulted while steering.
pub trait Surroundings {
    /// Reports whether `ahead` would overlap an active solid blocker.
    ///
    /// When `gate_authorized` is set the gate blocker is ignored.
    fn is_blocked(&self, ahead: &Rect, gate_authorized: bool) -> bool;

    /// Position and heading of the agent, if one is present.
    fn quarry(&self) -> Option<Quarry>;

    /// Bounds reached by moving `distance` along `direction`.
    ///
    /// Worlds that quantize movement override this so lookahead lands exactly
    /// where the move would.
    fn step(&self, bounds: &Rect, direction: Direction, distance: f32) -> Rect {
        bounds.stepped(direction, distance)
    }
}

/// Decision returned by [`PursuerAi::steer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Steering {
    /// Keep moving along the current heading.
    Keep,
    /// Apply this heading before moving.
    Turn(Direction),
    /// No direction is legal; stay in place this tick.
    Hold,
}

impl Steering {
    fn from_choice(choice: Option<Direction>) -> Self {
        choice.map_or(Self::Hold, Self::Turn)
    }
}

/// Observable state of the agent that pursuers hunt or flee.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quarry {
    /// Current bounds of the agent.
    pub bounds: Rect,
    /// Applied heading of the agent, if moving.
    pub heading: Option<Direction>,
}

/// Snapshot of the pursuer being steered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuerState {
    /// Current bounds of the pursuer.
    pub bounds: Rect,
    /// Applied heading, if moving.
    pub heading: Option<Direction>,
    /// Personality selecting the chase heuristic.
    pub kind: PursuerKind,
    /// Current behavioural mode.
    pub mode: PursuerMode,
    /// Current speed in world units per second.
    pub speed: f32,
    /// Distance left over from the previous tick, added to this tick's step.
    pub carry: f32,
    /// Whether the pursuer currently holds a gate pass.
    pub gate_authorized: bool,
}

/// Tunables of the decision system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    gate_exit: Direction,
    patrol_turn_probability: f64,
    ambush_lead: f32,
    heading_bias: f32,
    tie_epsilon: f32,
}

impl Config {
    /// Creates the default tuning with the provided gate exit direction.
    #[must_use]
    pub const fn new(gate_exit: Direction) -> Self {
        Self {
            gate_exit,
            patrol_turn_probability: 0.5,
            ambush_lead: 2.0,
            heading_bias: 1e-4,
            tie_epsilon: 1e-6,
        }
    }

    /// Replaces the direction authorized pursuers leave the pen through.
    #[must_use]
    pub const fn with_gate_exit(mut self, gate_exit: Direction) -> Self {
        self.gate_exit = gate_exit;
        self
    }

    /// Replaces the per-tick probability that a patrolling pursuer turns at
    /// a junction.
    #[must_use]
    pub const fn with_patrol_turn_probability(mut self, probability: f64) -> Self {
        self.patrol_turn_probability = probability;
        self
    }

    /// Direction authorized pursuers leave the pen through.
    #[must_use]
    pub const fn gate_exit(&self) -> Direction {
        self.gate_exit
    }

    /// Distance ambushers aim ahead of the agent, in agent widths.
    #[must_use]
    pub const fn ambush_lead(&self) -> f32 {
        self.ambush_lead
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Direction::South)
    }
}

/// Pure system choosing pursuer headings.
#[derive(Clone, Copy, Debug, Default)]
pub struct PursuerAi {
    config: Config,
}

impl PursuerAi {
    /// Creates a decision system using the supplied tuning.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Decides how `pursuer` should move during the next `dt` seconds.
    pub fn steer<S, R>(
        &self,
        pursuer: &PursuerState,
        surroundings: &S,
        dt: f32,
        rng: &mut R,
    ) -> Steering
    where
        S: Surroundings + ?Sized,
        R: Rng + ?Sized,
    {
        let ahead = Lookahead {
            pursuer,
            surroundings,
            step: pursuer.speed * dt + pursuer.carry,
        };

        if pursuer.gate_authorized {
            return self.leave_pen(&ahead);
        }

        match pursuer.mode {
            PursuerMode::Fear => self.flee(&ahead, rng),
            PursuerMode::Chase => self.chase(&ahead, rng),
        }
    }

    fn leave_pen<S>(&self, ahead: &Lookahead<'_, S>) -> Steering
    where
        S: Surroundings + ?Sized,
    {
        let exit = self.config.gate_exit;
        if ahead.is_legal(exit) {
            return Steering::Turn(exit);
        }

        let legal = ahead.legal_directions();
        let reverse = ahead.pursuer.heading.map(Direction::opposite);
        Steering::from_choice(
            legal
                .iter()
                .copied()
                .find(|direction| Some(*direction) != reverse)
                .or_else(|| legal.first().copied()),
        )
    }

    fn flee<S, R>(&self, ahead: &Lookahead<'_, S>, rng: &mut R) -> Steering
    where
        S: Surroundings + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(quarry) = ahead.surroundings.quarry() else {
            return self.patrol(ahead, rng);
        };
        let heading = ahead.pursuer.heading;
        let legal = ahead.legal_directions();
        if legal.is_empty() {
            return Steering::Hold;
        }
        if holds_corridor(&legal, heading) {
            return Steering::Keep;
        }

        let (target_x, target_y) = quarry.bounds.center();
        let candidates = forward_candidates(&legal, heading);
        Steering::from_choice(self.pick_best(&candidates, heading, rng, |direction| {
            -ahead.distance_after(direction, target_x, target_y)
        }))
    }

    fn chase<S, R>(&self, ahead: &Lookahead<'_, S>, rng: &mut R) -> Steering
    where
        S: Surroundings + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(quarry) = ahead.surroundings.quarry() else {
            return self.patrol(ahead, rng);
        };

        let (center_x, center_y) = quarry.bounds.center();
        match ahead.pursuer.kind {
            PursuerKind::A => self.patrol(ahead, rng),
            PursuerKind::B | PursuerKind::C => {
                let (lead_x, lead_y) = quarry.heading.map_or((0.0, 0.0), |heading| {
                    let (dx, dy) = heading.unit();
                    let lead = quarry.bounds.w * self.config.ambush_lead;
                    (dx * lead, dy * lead)
                });
                self.approach(ahead, center_x + lead_x, center_y + lead_y, rng)
            }
            PursuerKind::D => self.approach(ahead, center_x, center_y, rng),
        }
    }

    fn patrol<S, R>(&self, ahead: &Lookahead<'_, S>, rng: &mut R) -> Steering
    where
        S: Surroundings + ?Sized,
        R: Rng + ?Sized,
    {
        let heading = ahead.pursuer.heading;
        let legal = ahead.legal_directions();
        if legal.is_empty() {
            return Steering::Hold;
        }

        let heading_legal = heading.is_some_and(|current| legal.contains(&current));
        if heading_legal && !is_junction(&legal) {
            return Steering::Keep;
        }

        let probability = self.config.patrol_turn_probability.clamp(0.0, 1.0);
        if heading_legal && !rng.gen_bool(probability) {
            return Steering::Keep;
        }

        Steering::from_choice(forward_candidates(&legal, heading).choose(rng).copied())
    }

    fn approach<S, R>(
        &self,
        ahead: &Lookahead<'_, S>,
        target_x: f32,
        target_y: f32,
        rng: &mut R,
    ) -> Steering
    where
        S: Surroundings + ?Sized,
        R: Rng + ?Sized,
    {
        let heading = ahead.pursuer.heading;
        let legal = ahead.legal_directions();
        if legal.is_empty() {
            return Steering::Hold;
        }
        if holds_corridor(&legal, heading) {
            return Steering::Keep;
        }

        let candidates = forward_candidates(&legal, heading);
        Steering::from_choice(self.pick_best(&candidates, heading, rng, |direction| {
            ahead.distance_after(direction, target_x, target_y)
        }))
    }

    /// Picks the candidate with the lowest cost, favouring the current
    /// heading by `heading_bias` and breaking remaining ties at random.
    fn pick_best<R, F>(
        &self,
        candidates: &[Direction],
        heading: Option<Direction>,
        rng: &mut R,
        cost: F,
    ) -> Option<Direction>
    where
        R: Rng + ?Sized,
        F: Fn(Direction) -> f32,
    {
        let epsilon = self.config.tie_epsilon;
        let mut best = f32::INFINITY;
        let mut best_directions: Vec<Direction> = Vec::with_capacity(candidates.len());

        for &direction in candidates {
            let mut score = cost(direction);
            if Some(direction) == heading {
                score -= self.config.heading_bias;
            }

            if score < best - epsilon {
                best = score;
                best_directions.clear();
                best_directions.push(direction);
            } else if (score - best).abs() <= epsilon {
                best_directions.push(direction);
            }
        }

        best_directions.choose(rng).copied()
    }
}

struct Lookahead<'a, S: ?Sized> {
    pursuer: &'a PursuerState,
    surroundings: &'a S,
    step: f32,
}

impl<S> Lookahead<'_, S>
where
    S: Surroundings + ?Sized,
{
    fn next_bounds(&self, direction: Direction) -> Rect {
        self.surroundings
            .step(&self.pursuer.bounds, direction, self.step)
    }

    fn is_legal(&self, direction: Direction) -> bool {
        let next = self.next_bounds(direction);
        !self
            .surroundings
            .is_blocked(&next, self.pursuer.gate_authorized)
    }

    fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_legal(*direction))
            .collect()
    }

    /// Manhattan distance between the pursuer's center after one step and
    /// the target point.
    fn distance_after(&self, direction: Direction, target_x: f32, target_y: f32) -> f32 {
        let (x, y) = self.next_bounds(direction).center();
        (x - target_x).abs() + (y - target_y).abs()
    }
}

/// A straight corridor: exactly two opposite exits, one of them ahead.
fn holds_corridor(legal: &[Direction], heading: Option<Direction>) -> bool {
    match (legal, heading) {
        ([first, second], Some(current)) => {
            first.opposite() == *second && (current == *first || current == *second)
        }
        _ => false,
    }
}

/// A corner or an intersection offers a genuine choice of heading.
fn is_junction(legal: &[Direction]) -> bool {
    match legal {
        [] | [_] => false,
        [first, second] => first.opposite() != *second,
        _ => true,
    }
}

/// Legal directions without the reverse of `heading`, unless reversing is
/// the only way out.
fn forward_candidates(legal: &[Direction], heading: Option<Direction>) -> Vec<Direction> {
    let reverse = heading.map(Direction::opposite);
    let forward: Vec<Direction> = legal
        .iter()
        .copied()
        .filter(|direction| Some(*direction) != reverse)
        .collect();
    if forward.is_empty() {
        legal.to_vec()
    } else {
        forward
    }
}

#[cfg(test)]
mod tests {
    use super::{forward_candidates, holds_corridor, is_junction};
    use maze_chase_core::Direction::{East, North, South, West};

    #[test]
    fn corridor_requires_heading_along_it() {
        assert!(holds_corridor(&[East, West], Some(East)));
        assert!(!holds_corridor(&[East, West], Some(North)));
        assert!(!holds_corridor(&[East, West], None));
        assert!(!holds_corridor(&[East, North], Some(East)));
    }

    #[test]
    fn junction_detection_distinguishes_corners() {
        assert!(is_junction(&[East, North]));
        assert!(is_junction(&[East, West, South]));
        assert!(!is_junction(&[North, South]));
        assert!(!is_junction(&[North]));
    }

    #[test]
    fn reverse_is_kept_only_for_dead_ends() {
        assert_eq!(forward_candidates(&[East, West], Some(East)), vec![East]);
        assert_eq!(forward_candidates(&[West], Some(East)), vec![West]);
        assert_eq!(forward_candidates(&[North, West], None), vec![North, West]);
    }
}
