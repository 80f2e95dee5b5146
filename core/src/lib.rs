#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes them through its `apply`
//! entry point, and every observable change is announced as an [`Event`] on
//! an [`EventBus`] that presentation layers and the scoring collaborator
//! subscribe to.
//!
//! All geometry is expressed in normalized world units: a level fits inside
//! the `[-1, 1] x [-1, 1]` square, `x` grows toward the east and `y` grows
//! toward the south.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod bus;

pub use bus::{EventBus, EventLog, EventSink, SubscriptionToken};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Shrink applied to one-step legality checks so that entities sliding along
/// a wall edge are not reported as touching it.
///
/// Used for agent turning, pursuer move legality and gate contact tracking.
pub const LEGALITY_EPSILON: f32 = 0.0003;

/// Axis-aligned rectangle in world units. `(x, y)` is the north-west corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Western edge of the rectangle.
    pub x: f32,
    /// Northern edge of the rectangle.
    pub y: f32,
    /// Extent along the x axis.
    pub w: f32,
    /// Extent along the y axis.
    pub h: f32,
}

impl Rect {
    /// Creates a rectangle from its north-west corner and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Surface covered by the rectangle.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Returns the rectangle shifted by the provided offsets.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Returns the rectangle moved `distance` units along `direction`.
    #[must_use]
    pub fn stepped(&self, direction: Direction, distance: f32) -> Self {
        let (dx, dy) = direction.unit();
        self.translated(dx * distance, dy * distance)
    }

    /// Smallest rectangle covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.w).max(other.x + other.w);
        let bottom = (self.y + self.h).max(other.y + other.h);
        Self::new(x, y, right - x, bottom - y)
    }
}

/// Reports whether two rectangles overlap.
///
/// `epsilon` shrinks the comparison on every edge; with `epsilon == 0.0`
/// rectangles that merely share an edge do not intersect.
#[must_use]
pub fn intersects(a: &Rect, b: &Rect, epsilon: f32) -> bool {
    let x_overlap = a.x < b.x + b.w - epsilon && b.x < a.x + a.w - epsilon;
    let y_overlap = a.y < b.y + b.h - epsilon && b.y < a.y + a.h - epsilon;
    x_overlap && y_overlap
}

/// Surface shared by two rectangles, or zero when they are disjoint.
#[must_use]
pub fn overlap_area(a: &Rect, b: &Rect) -> f32 {
    let width = (a.x + a.w).min(b.x + b.w) - a.x.max(b.x);
    let height = (a.y + a.h).min(b.y + b.h) - a.y.max(b.y);
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    width * height
}

/// Fraction of the smaller rectangle covered by the overlap, in `[0, 1]`.
///
/// Degenerate rectangles (zero or negative area) always report zero.
#[must_use]
pub fn overlap_ratio(a: &Rect, b: &Rect) -> f32 {
    let shared = overlap_area(a, b);
    if shared <= 0.0 {
        return 0.0;
    }

    let area_a = a.area();
    let area_b = b.area();
    if area_a <= 0.0 || area_b <= 0.0 {
        return 0.0;
    }

    shared / area_a.min(area_b)
}

/// Cardinal movement directions available to moving entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing `y` (toward the first layout row).
    North,
    /// Movement toward increasing `x`.
    East,
    /// Movement toward increasing `y`.
    South,
    /// Movement toward decreasing `x`.
    West,
}

impl Direction {
    /// Every direction in the order candidates are evaluated.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit vector `(dx, dy)` of the direction.
    #[must_use]
    pub const fn unit(self) -> (f32, f32) {
        match self {
            Self::North => (0.0, -1.0),
            Self::East => (1.0, 0.0),
            Self::South => (0.0, 1.0),
            Self::West => (-1.0, 0.0),
        }
    }
}

/// Unique identifier assigned to an entity by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Sentinel returned when no entity was registered.
    pub const UNASSIGNED: EntityId = EntityId(0);

    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the identifier is the unassigned sentinel.
    #[must_use]
    pub const fn is_unassigned(&self) -> bool {
        self.0 == 0
    }
}

/// Fixed personality of a pursuer, selecting its chase heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuerKind {
    /// Patrols corridors and turns at random junctions.
    A,
    /// Ambushes a point ahead of the agent.
    B,
    /// Ambushes a point ahead of the agent.
    C,
    /// Heads straight for the agent.
    D,
}

impl PursuerKind {
    /// Every kind in the order pursuers are instantiated per spawn tile.
    pub const ALL: [PursuerKind; 4] = [
        PursuerKind::A,
        PursuerKind::B,
        PursuerKind::C,
        PursuerKind::D,
    ];
}

/// Behavioural mode of a pursuer, toggled globally by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuerMode {
    /// Hunts the agent using the kind-specific heuristic.
    Chase,
    /// Flees the agent and may be captured.
    Fear,
}

/// Categories of collectible pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Low-value pickup.
    Coin,
    /// High-value pickup that frightens every pursuer.
    Fruit,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one fixed step.
    Tick {
        /// Duration of simulated time covered by the step.
        dt: Duration,
    },
    /// Buffers a direction request for the agent.
    SteerAgent {
        /// Direction the player asked for.
        direction: Direction,
    },
    /// Advances to the next level, reloading the current layout.
    AdvanceLevel,
    /// Clears every entity without reloading.
    ResetLevel,
    /// Restores the configured number of lives.
    ResetLives,
}

/// Events broadcast while the world processes commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the step.
        dt: Duration,
    },
    /// An active entity took part in a simulation step.
    Ticked {
        /// Entity that was updated.
        entity: EntityId,
    },
    /// A moving entity changed position.
    Moved {
        /// Entity that moved.
        entity: EntityId,
        /// Bounds occupied after the move.
        bounds: Rect,
    },
    /// A moving entity changed its applied heading.
    DirectionChanged {
        /// Entity that turned.
        entity: EntityId,
        /// Heading now in effect.
        direction: Direction,
    },
    /// A pursuer switched behavioural mode.
    ModeChanged {
        /// Pursuer whose mode changed.
        entity: EntityId,
        /// Mode now in effect.
        mode: PursuerMode,
    },
    /// Something worth points was collected or captured.
    Collected {
        /// Collected entity.
        entity: EntityId,
        /// Points awarded before any multiplier.
        value: i32,
    },
    /// The agent was hit by a pursuer.
    Died {
        /// The agent entity.
        entity: EntityId,
        /// Points applied as a penalty (negative).
        value: i32,
    },
    /// A level finished loading.
    LevelLoaded {
        /// One-based index of the loaded level.
        level: u32,
    },
    /// A pursuer was granted passage through the gate.
    PursuerReleased {
        /// Pursuer that may now cross the gate.
        entity: EntityId,
    },
    /// Fear mode started or was refreshed.
    FearStarted {
        /// Time fear mode will last.
        duration: Duration,
    },
    /// Fear mode ended and every pursuer resumed chasing.
    FearEnded,
}

#[cfg(test)]
mod tests {
    use super::{intersects, overlap_area, overlap_ratio, Direction, EntityId, Rect};
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(Rect::new(5.0, 5.0, 10.0, 10.0), true)]
    #[case(Rect::new(10.0, 0.0, 5.0, 5.0), false)]
    #[case(Rect::new(0.0, 10.0, 5.0, 5.0), false)]
    #[case(Rect::new(11.0, 0.0, 5.0, 5.0), false)]
    #[case(Rect::new(2.0, 2.0, 1.0, 1.0), true)]
    fn intersection_against_reference_box(#[case] other: Rect, #[case] expected: bool) {
        let reference = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(intersects(&reference, &other, 0.0), expected);
    }

    #[test]
    fn epsilon_ignores_grazing_contact() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(0.9999, 0.0, 1.0, 1.0);
        assert!(intersects(&a, &b, 0.0));
        assert!(!intersects(&a, &b, 0.0003));
    }

    #[test]
    fn overlap_ratio_uses_smaller_rectangle() {
        let large = Rect::new(0.0, 0.0, 10.0, 10.0);
        let small = Rect::new(1.0, 1.0, 2.0, 2.0);
        assert_relative_eq!(overlap_area(&large, &small), 4.0);
        assert_relative_eq!(overlap_ratio(&large, &small), 1.0);

        let half = Rect::new(9.0, 0.0, 2.0, 2.0);
        assert_relative_eq!(overlap_ratio(&large, &half), 0.5);
    }

    #[test]
    fn overlap_ratio_is_zero_for_degenerate_rectangles() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let flat = Rect::new(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(overlap_ratio(&a, &flat), 0.0);
    }

    #[test]
    fn stepping_follows_unit_vectors() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        let north = rect.stepped(Direction::North, 0.5);
        assert_relative_eq!(north.y, -0.5);
        let east = rect.stepped(Direction::East, 0.25);
        assert_relative_eq!(east.x, 0.25);
    }

    #[test]
    fn opposite_round_trips() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn union_covers_both_rectangles() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 0.0, 1.0, 1.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn unassigned_sentinel_is_zero() {
        assert!(EntityId::UNASSIGNED.is_unassigned());
        assert!(!EntityId::new(1).is_unassigned());
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-10.0f32..10.0, -10.0f32..10.0, 0.0f32..5.0, 0.0f32..5.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn intersection_is_symmetric(a in rect_strategy(), b in rect_strategy(), epsilon in 0.0f32..0.01) {
            prop_assert_eq!(intersects(&a, &b, epsilon), intersects(&b, &a, epsilon));
        }

        #[test]
        fn overlap_ratio_stays_within_unit_interval(a in rect_strategy(), b in rect_strategy()) {
            let ratio = overlap_ratio(&a, &b);
            prop_assert!((0.0..=1.0 + 1e-4).contains(&ratio));
        }
    }
}
