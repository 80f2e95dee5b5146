//! Simulated objects and their per-kind state.

use maze_chase_core::{
    CollectibleKind, Direction, EntityId, Event, PursuerKind, PursuerMode, Rect,
};

use crate::lanes::Lanes;

/// Any object registered with the world.
///
/// The shared attributes (identity, bounds and the three flags) live on the
/// entity itself; the closed [`Body`] variant carries the kind-specific state
/// inspected by the collision and overlap passes.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    id: EntityId,
    bounds: Rect,
    active: bool,
    solid: bool,
    visible: bool,
    body: Body,
}

/// Kind-specific state of an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// The player-controlled avatar.
    Agent(Agent),
    /// A mode-switching pursuer.
    Pursuer(Pursuer),
    /// A one-shot pickup.
    Collectible(Collectible),
    /// Static geometry that blocks movement.
    Blocker(Blocker),
    /// Inert object without gameplay behaviour.
    Scenery,
}

/// State of the player avatar.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    heading: Option<Direction>,
    desired: Option<Direction>,
    speed: f32,
    base_speed: f32,
    carry: f32,
    spawn: Rect,
}

impl Agent {
    /// Heading currently applied to movement.
    #[must_use]
    pub const fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Last direction requested by the player.
    #[must_use]
    pub const fn desired(&self) -> Option<Direction> {
        self.desired
    }

    /// Current speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Speed the agent returns to after modifiers.
    #[must_use]
    pub const fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Bounds restored when the agent respawns.
    #[must_use]
    pub const fn spawn(&self) -> Rect {
        self.spawn
    }

    pub(crate) const fn carry(&self) -> f32 {
        self.carry
    }
}

/// State of a pursuer.
#[derive(Clone, Debug, PartialEq)]
pub struct Pursuer {
    kind: PursuerKind,
    mode: PursuerMode,
    heading: Option<Direction>,
    speed: f32,
    base_speed: f32,
    carry: f32,
    spawn: Rect,
    value: i32,
}

impl Pursuer {
    /// Personality selecting the chase heuristic.
    #[must_use]
    pub const fn kind(&self) -> PursuerKind {
        self.kind
    }

    /// Current behavioural mode.
    #[must_use]
    pub const fn mode(&self) -> PursuerMode {
        self.mode
    }

    /// Heading currently applied to movement.
    #[must_use]
    pub const fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Current speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Speed used while chasing.
    #[must_use]
    pub const fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Bounds restored when the pursuer respawns.
    #[must_use]
    pub const fn spawn(&self) -> Rect {
        self.spawn
    }

    /// Points awarded for capturing the pursuer.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    pub(crate) const fn carry(&self) -> f32 {
        self.carry
    }
}

/// State of a pickup.
#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    kind: CollectibleKind,
    value: i32,
}

impl Collectible {
    /// Category of the pickup.
    #[must_use]
    pub const fn kind(&self) -> CollectibleKind {
        self.kind
    }

    /// Points awarded on collection.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }
}

/// State of a static blocker.
#[derive(Clone, Debug, PartialEq)]
pub struct Blocker {
    gate: bool,
}

impl Blocker {
    /// Whether this blocker is the pen gate pursuers may be authorized to cross.
    #[must_use]
    pub const fn is_gate(&self) -> bool {
        self.gate
    }
}

impl Entity {
    const fn with_body(bounds: Rect, solid: bool, body: Body) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            bounds,
            active: true,
            solid,
            visible: true,
            body,
        }
    }

    /// Creates a solid agent that respawns at `bounds`.
    #[must_use]
    pub const fn agent(bounds: Rect, speed: f32) -> Self {
        Self::with_body(
            bounds,
            true,
            Body::Agent(Agent {
                heading: None,
                desired: None,
                speed,
                base_speed: speed,
                carry: 0.0,
                spawn: bounds,
            }),
        )
    }

    /// Creates a non-solid chasing pursuer that respawns at `bounds`.
    #[must_use]
    pub const fn pursuer(bounds: Rect, kind: PursuerKind, speed: f32, value: i32) -> Self {
        Self::with_body(
            bounds,
            false,
            Body::Pursuer(Pursuer {
                kind,
                mode: PursuerMode::Chase,
                heading: None,
                speed,
                base_speed: speed,
                carry: 0.0,
                spawn: bounds,
                value,
            }),
        )
    }

    /// Creates a low-value pickup.
    #[must_use]
    pub const fn coin(bounds: Rect, value: i32) -> Self {
        Self::collectible(bounds, CollectibleKind::Coin, value)
    }

    /// Creates a high-value pickup.
    #[must_use]
    pub const fn fruit(bounds: Rect, value: i32) -> Self {
        Self::collectible(bounds, CollectibleKind::Fruit, value)
    }

    const fn collectible(bounds: Rect, kind: CollectibleKind, value: i32) -> Self {
        Self::with_body(bounds, false, Body::Collectible(Collectible { kind, value }))
    }

    /// Creates a solid wall segment.
    #[must_use]
    pub const fn blocker(bounds: Rect) -> Self {
        Self::with_body(bounds, true, Body::Blocker(Blocker { gate: false }))
    }

    /// Creates the invisible, solid pen gate.
    #[must_use]
    pub fn gate(bounds: Rect) -> Self {
        let mut entity = Self::blocker(bounds);
        entity.make_gate();
        entity
    }

    /// Creates an inert object.
    #[must_use]
    pub const fn scenery(bounds: Rect, solid: bool) -> Self {
        Self::with_body(bounds, solid, Body::Scenery)
    }

    /// Moves the entity to `bounds` and, for agents and pursuers, records
    /// them as the respawn location.
    #[must_use]
    pub fn spawned_at(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        match &mut self.body {
            Body::Agent(agent) => agent.spawn = bounds,
            Body::Pursuer(pursuer) => pursuer.spawn = bounds,
            Body::Collectible(_) | Body::Blocker(_) | Body::Scenery => {}
        }
        self
    }

    /// Identifier assigned by the world, or the unassigned sentinel.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Current bounds.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether the entity participates in the simulation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the entity takes part in hard collisions.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.solid
    }

    /// Rendering hint; irrelevant to the simulation.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Kind-specific state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Agent state, if the entity is the agent.
    #[must_use]
    pub const fn as_agent(&self) -> Option<&Agent> {
        match &self.body {
            Body::Agent(agent) => Some(agent),
            _ => None,
        }
    }

    /// Pursuer state, if the entity is a pursuer.
    #[must_use]
    pub const fn as_pursuer(&self) -> Option<&Pursuer> {
        match &self.body {
            Body::Pursuer(pursuer) => Some(pursuer),
            _ => None,
        }
    }

    /// Pickup state, if the entity is a collectible.
    #[must_use]
    pub const fn as_collectible(&self) -> Option<&Collectible> {
        match &self.body {
            Body::Collectible(collectible) => Some(collectible),
            _ => None,
        }
    }

    /// Blocker state, if the entity is a blocker.
    #[must_use]
    pub const fn as_blocker(&self) -> Option<&Blocker> {
        match &self.body {
            Body::Blocker(blocker) => Some(blocker),
            _ => None,
        }
    }

    /// Whether the entity is the pen gate.
    #[must_use]
    pub const fn is_gate(&self) -> bool {
        matches!(&self.body, Body::Blocker(Blocker { gate: true }))
    }

    /// Replaces the bounds without emitting events.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Toggles participation in the simulation.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Toggles participation in hard collisions.
    pub fn set_solid(&mut self, solid: bool) {
        self.solid = solid;
    }

    /// Toggles the rendering hint.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Collects a pickup, deactivating it.
    ///
    /// Returns `true` and emits [`Event::Collected`] only the first time;
    /// inactive entities and non-collectibles are left untouched.
    pub fn collect(&mut self, out: &mut Vec<Event>) -> bool {
        let Body::Collectible(collectible) = &self.body else {
            return false;
        };
        if !self.active {
            return false;
        }

        self.active = false;
        out.push(Event::Collected {
            entity: self.id,
            value: collectible.value,
        });
        true
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub(crate) fn make_gate(&mut self) {
        if let Body::Blocker(blocker) = &mut self.body {
            blocker.gate = true;
            self.solid = true;
            self.visible = false;
        }
    }

    pub(crate) fn demote_gate(&mut self) {
        if let Body::Blocker(blocker) = &mut self.body {
            blocker.gate = false;
        }
    }

    /// Advances the entity by `dt` seconds along its applied heading,
    /// stopping on the next lane boundary when `lanes` is given. Distance cut
    /// off at a boundary is added to the following step.
    pub(crate) fn update(&mut self, dt: f32, lanes: Option<&Lanes>, out: &mut Vec<Event>) {
        if !self.active {
            return;
        }
        out.push(Event::Ticked { entity: self.id });

        let (heading, speed, carry) = match &mut self.body {
            Body::Agent(Agent {
                heading: Some(heading),
                speed,
                carry,
                ..
            })
            | Body::Pursuer(Pursuer {
                heading: Some(heading),
                speed,
                carry,
                ..
            }) => (*heading, *speed, carry),
            _ => return,
        };

        let distance = speed * dt + *carry;
        let (bounds, leftover) = match lanes {
            Some(lanes) => lanes.step(self.bounds, heading, distance),
            None => (self.bounds.stepped(heading, distance), 0.0),
        };
        *carry = leftover;
        self.bounds = bounds;
        out.push(Event::Moved {
            entity: self.id,
            bounds,
        });
    }

    /// Keeps an active mover in place for one tick.
    pub(crate) fn hold(&mut self, out: &mut Vec<Event>) {
        if !self.active {
            return;
        }
        out.push(Event::Ticked { entity: self.id });
        match &mut self.body {
            Body::Agent(agent) => agent.carry = 0.0,
            Body::Pursuer(pursuer) => pursuer.carry = 0.0,
            Body::Collectible(_) | Body::Blocker(_) | Body::Scenery => {}
        }
    }

    pub(crate) fn set_desired_direction(&mut self, direction: Direction) {
        if let Body::Agent(agent) = &mut self.body {
            agent.desired = Some(direction);
        }
    }

    /// Applies a heading to an agent or pursuer, announcing actual changes.
    pub(crate) fn set_heading(&mut self, direction: Direction, out: &mut Vec<Event>) {
        let heading = match &mut self.body {
            Body::Agent(agent) => &mut agent.heading,
            Body::Pursuer(pursuer) => &mut pursuer.heading,
            Body::Collectible(_) | Body::Blocker(_) | Body::Scenery => return,
        };
        if *heading == Some(direction) {
            return;
        }

        *heading = Some(direction);
        out.push(Event::DirectionChanged {
            entity: self.id,
            direction,
        });
    }

    /// Switches a pursuer's mode. Entering fear reverses the heading and
    /// damps the speed; leaving it restores the base speed.
    pub(crate) fn set_pursuer_mode(
        &mut self,
        mode: PursuerMode,
        fear_damping: f32,
        out: &mut Vec<Event>,
    ) {
        let Body::Pursuer(pursuer) = &mut self.body else {
            return;
        };
        if pursuer.mode == mode {
            return;
        }

        pursuer.mode = mode;
        match mode {
            PursuerMode::Fear => {
                pursuer.speed = pursuer.base_speed * fear_damping;
                if let Some(heading) = pursuer.heading {
                    let reversed = heading.opposite();
                    pursuer.heading = Some(reversed);
                    out.push(Event::DirectionChanged {
                        entity: self.id,
                        direction: reversed,
                    });
                }
            }
            PursuerMode::Chase => pursuer.speed = pursuer.base_speed,
        }

        out.push(Event::ModeChanged {
            entity: self.id,
            mode,
        });
    }

    /// Returns an agent or pursuer to its spawn bounds, clearing its
    /// headings. Pursuers resume chasing.
    pub(crate) fn reset_to_spawn(&mut self, out: &mut Vec<Event>) {
        let spawn = match &mut self.body {
            Body::Agent(agent) => {
                agent.heading = None;
                agent.desired = None;
                agent.carry = 0.0;
                agent.spawn
            }
            Body::Pursuer(pursuer) => {
                if pursuer.mode != PursuerMode::Chase {
                    pursuer.mode = PursuerMode::Chase;
                    out.push(Event::ModeChanged {
                        entity: self.id,
                        mode: PursuerMode::Chase,
                    });
                }
                pursuer.speed = pursuer.base_speed;
                pursuer.heading = None;
                pursuer.carry = 0.0;
                pursuer.spawn
            }
            Body::Collectible(_) | Body::Blocker(_) | Body::Scenery => return,
        };

        self.bounds = spawn;
        out.push(Event::Moved {
            entity: self.id,
            bounds: spawn,
        });
    }

    /// Multiplies the base speed of an agent or pursuer.
    pub(crate) fn scale_speed(&mut self, factor: f32) {
        match &mut self.body {
            Body::Agent(agent) => {
                agent.base_speed *= factor;
                agent.speed = agent.base_speed;
            }
            Body::Pursuer(pursuer) => {
                pursuer.base_speed *= factor;
                pursuer.speed = pursuer.base_speed;
            }
            Body::Collectible(_) | Body::Blocker(_) | Body::Scenery => {}
        }
    }
}
