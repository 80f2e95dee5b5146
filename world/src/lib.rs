#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.
//!
//! The world owns the entity registry and runs the fixed per-tick pipeline:
//! pen releases, agent turning, movement, hard collisions, push-out, soft
//! overlaps, overlap resolution and the fear countdown. Every observable
//! change is published on the world's [`EventBus`] once the tick completes.

use std::time::Duration;

use maze_chase_core::{
    intersects, overlap_ratio, CollectibleKind, Command, Direction, EntityId, Event, EventBus,
    PursuerKind, PursuerMode, Rect, LEGALITY_EPSILON,
};
use maze_chase_system_pursuer_ai::{
    Config as SteeringConfig, PursuerAi, PursuerState, Quarry, Steering, Surroundings,
};
use tracing::debug;

mod config;
mod context;
mod entity;
mod factory;
mod lanes;
mod release;
mod tiles;

pub use config::{DifficultyCurve, WorldConfig};
pub use context::{SimClock, SimContext};
pub use entity::{Agent, Blocker, Body, Collectible, Entity, Pursuer};
pub use factory::{EntityFactory, StandardFactory};
pub use tiles::{LayoutError, TileCoord, TileLayout, TileType, CLASSIC_LAYOUT};

use lanes::Lanes;
use release::ReleaseScheduler;

const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Pen spawn offsets as a fraction of tile width, in pursuer kind order.
const PEN_OFFSETS: [f32; 4] = [-0.25, 0.25, -0.25, 0.25];

/// Unordered pair of interacting entities, lower identifier first.
pub type EntityPair = (EntityId, EntityId);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct FearTimer {
    active: bool,
    remaining: f32,
}

/// Outcome of the agent overlapping another entity.
enum Contact {
    Collect(CollectibleKind),
    Capture,
    Hit,
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    factory: Option<Box<dyn EntityFactory>>,
    config: WorldConfig,
    context: SimContext,
    bus: EventBus,
    ai: PursuerAi,
    entities: Vec<Entity>,
    next_id: u32,
    collisions: Vec<EntityPair>,
    overlaps: Vec<EntityPair>,
    layout: Option<TileLayout>,
    lanes: Option<Lanes>,
    level: u32,
    lives: u32,
    fear: FearTimer,
    fear_duration: f32,
    gate: Option<EntityId>,
    release: ReleaseScheduler,
    outbox: Vec<Event>,
}

impl World {
    /// Creates an empty world with the default configuration and seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default(), SimContext::seeded(DEFAULT_SEED))
    }

    /// Creates an empty world using the stock entity factory.
    #[must_use]
    pub fn with_config(config: WorldConfig, context: SimContext) -> Self {
        let factory = StandardFactory::new(&config);
        Self::with_factory(Some(Box::new(factory)), config, context)
    }

    /// Creates an empty world with an explicit factory. Without one, level
    /// loading leaves the registry empty.
    #[must_use]
    pub fn with_factory(
        factory: Option<Box<dyn EntityFactory>>,
        config: WorldConfig,
        context: SimContext,
    ) -> Self {
        Self {
            factory,
            ai: PursuerAi::new(SteeringConfig::new(config.gate_exit)),
            release: ReleaseScheduler::new(config.release_delays_secs.clone()),
            lives: config.starting_lives,
            fear_duration: config.fear_duration_secs,
            bus: EventBus::new(),
            entities: Vec::new(),
            next_id: 1,
            collisions: Vec::new(),
            overlaps: Vec::new(),
            layout: None,
            lanes: None,
            level: 1,
            fear: FearTimer::default(),
            gate: None,
            outbox: Vec::new(),
            context,
            config,
        }
    }

    /// Handle onto the bus the world publishes on. Subscribe sinks through
    /// it; the world never owns them.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Registers an entity and returns its new identifier.
    ///
    /// `None` is ignored and yields [`EntityId::UNASSIGNED`]. Only the first
    /// gate registered is treated as the gate; later ones act as plain walls.
    pub fn add_entity(&mut self, entity: impl Into<Option<Entity>>) -> EntityId {
        let Some(mut entity) = entity.into() else {
            return EntityId::UNASSIGNED;
        };

        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        entity.assign_id(id);

        if entity.is_gate() {
            if self.gate.is_none() {
                self.gate = Some(id);
            } else {
                entity.demote_gate();
            }
        }

        self.entities.push(entity);
        id
    }

    /// Removes an entity, reporting whether it was registered.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(index) = position_of(&self.entities, id) else {
            return false;
        };

        let _ = self.entities.remove(index);
        if self.gate == Some(id) {
            self.gate = None;
        }
        true
    }

    /// Mutable access to a registered entity.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = position_of(&self.entities, id)?;
        self.entities.get_mut(index)
    }

    /// Records the player's requested direction on the agent.
    pub fn set_agent_direction(&mut self, direction: Direction) {
        if let Some(agent) = self
            .entities
            .iter_mut()
            .find(|entity| entity.as_agent().is_some())
        {
            agent.set_desired_direction(direction);
        }
    }

    /// Applies the agent's requested direction if one step of length
    /// `speed · dt` that way is free of walls. Returns whether it turned.
    pub fn check_agent_desired_direction(&mut self, dt: Duration) -> bool {
        let turned = self.turn_agent(dt.as_secs_f32());
        self.flush_events();
        turned
    }

    /// Reports whether a pursuer could take one step of length
    /// `speed · dt` in `direction`. The gate only counts as open for
    /// pursuers holding a pass.
    #[must_use]
    pub fn is_pursuer_move_legal(&self, id: EntityId, direction: Direction, dt: Duration) -> bool {
        let Some(entity) = query::entity(self, id) else {
            return false;
        };
        let Some(pursuer) = entity.as_pursuer() else {
            return false;
        };

        let target = clamped_step(
            self.lanes.as_ref(),
            entity.bounds(),
            direction,
            pursuer.speed() * dt.as_secs_f32() + pursuer.carry(),
        );
        let passable = self.passable_gate(id);
        !is_walled(&self.entities, &target, passable)
    }

    /// Authorizes a pursuer to cross the gate until it has passed through.
    pub fn grant_gate_pass(&mut self, id: EntityId) {
        self.release.grant(id);
    }

    /// Advances the simulation by `dt`.
    pub fn update(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        self.outbox.push(Event::TimeAdvanced { dt });

        self.update_release();
        let _ = self.turn_agent(seconds);
        self.update_entities(seconds);
        self.detect_collisions();
        self.resolve_collisions();
        self.detect_overlaps();
        self.resolve_overlaps();
        self.update_fear_timer(seconds);

        self.context.advance(dt);
        self.flush_events();
    }

    /// Builds a level from `layout`, replacing the current registry.
    pub fn load_level(&mut self, layout: &TileLayout) {
        self.clear_registry();
        self.layout = Some(layout.clone());
        if self.config.snap_to_lanes {
            self.lanes = Some(Lanes::from_layout(layout));
        }

        let exit = layout.gate_exit().unwrap_or(self.config.gate_exit);
        self.ai = PursuerAi::new(self.ai.config().with_gate_exit(exit));
        self.fear_duration = self
            .config
            .difficulty
            .fear_duration(self.config.fear_duration_secs, self.level);

        let Some(mut factory) = self.factory.take() else {
            debug!(level = self.level, "no entity factory, level left empty");
            return;
        };

        for (coord, tile) in layout.tiles() {
            let rect = layout.tile_rect(coord);
            match tile {
                TileType::Empty => {}
                TileType::Wall => {
                    let _ = self.add_entity(factory.create_blocker().map(|e| e.spawned_at(rect)));
                }
                TileType::Coin => {
                    let _ = self.add_entity(factory.create_coin().map(|e| e.spawned_at(rect)));
                }
                TileType::Fruit => {
                    let _ = self.add_entity(factory.create_fruit().map(|e| e.spawned_at(rect)));
                }
                TileType::AgentSpawn => {
                    let _ = self.add_entity(factory.create_agent().map(|e| e.spawned_at(rect)));
                }
                TileType::PursuerSpawn => self.spawn_pursuers(&mut *factory, rect),
                TileType::Gate => self.extend_gate(&mut *factory, rect),
            }
        }
        self.factory = Some(factory);

        let multiplier = self.config.difficulty.speed_multiplier(self.level);
        for entity in &mut self.entities {
            entity.scale_speed(multiplier);
        }

        self.release.restart(self.context.now());
        debug!(
            level = self.level,
            entities = self.entities.len(),
            speed_multiplier = multiplier,
            fear_secs = self.fear_duration,
            "level loaded"
        );
        self.outbox.push(Event::LevelLoaded { level: self.level });
        self.flush_events();
    }

    /// Moves on to the next level, reloading the current layout if any.
    pub fn advance_level(&mut self) {
        self.level = self.level.saturating_add(1);
        self.reset_level();
        if let Some(layout) = self.layout.take() {
            self.load_level(&layout);
        }
    }

    /// Empties the registry and the interaction caches.
    pub fn reset_level(&mut self) {
        self.clear_registry();
    }

    /// Restores the starting lives.
    pub fn reset_lives(&mut self) {
        self.lives = self.config.starting_lives;
    }

    fn clear_registry(&mut self) {
        self.entities.clear();
        self.next_id = 1;
        self.collisions.clear();
        self.overlaps.clear();
        self.gate = None;
        self.lanes = None;
        self.release.clear();
        self.fear = FearTimer::default();
    }

    fn spawn_pursuers(&mut self, factory: &mut dyn EntityFactory, rect: Rect) {
        for (kind, offset) in PursuerKind::ALL.into_iter().zip(PEN_OFFSETS) {
            let bounds = rect.translated(rect.w * offset, 0.0);
            let id = self.add_entity(factory.create_pursuer(kind).map(|e| e.spawned_at(bounds)));
            if !id.is_unassigned() {
                self.release.enqueue(id);
            }
        }
    }

    /// Gate tiles merge into a single gate spanning all of them.
    fn extend_gate(&mut self, factory: &mut dyn EntityFactory, rect: Rect) {
        if let Some(id) = self.gate {
            if let Some(gate) = self.entity_mut(id) {
                let merged = gate.bounds().union(&rect);
                gate.set_bounds(merged);
                return;
            }
        }

        let gate = factory.create_blocker().map(|mut entity| {
            entity.make_gate();
            entity.spawned_at(rect)
        });
        let _ = self.add_entity(gate);
    }

    fn passable_gate(&self, pursuer: EntityId) -> Option<EntityId> {
        if self.release.is_authorized(pursuer) {
            self.gate
        } else {
            None
        }
    }

    fn gate_exit(&self) -> Direction {
        self.ai.config().gate_exit()
    }

    fn update_release(&mut self) {
        let gate = self
            .gate
            .and_then(|id| position_of(&self.entities, id))
            .and_then(|index| self.entities.get(index))
            .map(Entity::bounds);

        let entities = &self.entities;
        let released = self.release.update(self.context.now(), gate, |id| {
            position_of(entities, id)
                .and_then(|index| entities.get(index))
                .filter(|entity| entity.is_active() && entity.as_pursuer().is_some())
                .map(Entity::bounds)
        });

        let exit = self.gate_exit();
        for id in released {
            if let Some(pursuer) = position_of(&self.entities, id)
                .and_then(|index| self.entities.get_mut(index))
            {
                if pursuer.as_pursuer().is_some_and(|p| p.heading().is_none()) {
                    pursuer.set_heading(exit, &mut self.outbox);
                }
            }
            debug!(pursuer = id.get(), "pursuer released from pen");
            self.outbox.push(Event::PursuerReleased { entity: id });
        }
    }

    fn turn_agent(&mut self, dt: f32) -> bool {
        let Some(index) = self
            .entities
            .iter()
            .position(|entity| entity.is_active() && entity.as_agent().is_some())
        else {
            return false;
        };
        let entity = &self.entities[index];
        let Some(agent) = entity.as_agent() else {
            return false;
        };
        let Some(desired) = agent.desired() else {
            return false;
        };
        if agent.heading() == Some(desired) {
            return false;
        }

        let target = clamped_step(
            self.lanes.as_ref(),
            entity.bounds(),
            desired,
            agent.speed() * dt + agent.carry(),
        );
        if is_walled(&self.entities, &target, None) {
            return false;
        }

        self.entities[index].set_heading(desired, &mut self.outbox);
        true
    }

    fn update_entities(&mut self, dt: f32) {
        for index in 0..self.entities.len() {
            if !self.entities[index].is_active() {
                continue;
            }
            match self.steer_pursuer(index, dt) {
                Some(Steering::Hold) => {
                    self.entities[index].hold(&mut self.outbox);
                    continue;
                }
                Some(Steering::Turn(heading)) => {
                    self.entities[index].set_heading(heading, &mut self.outbox);
                }
                Some(Steering::Keep) | None => {}
            }
            self.entities[index].update(dt, self.lanes.as_ref(), &mut self.outbox);
        }
    }

    fn steer_pursuer(&mut self, index: usize, dt: f32) -> Option<Steering> {
        let entity = self.entities.get(index)?;
        let pursuer = entity.as_pursuer()?;
        let gate_authorized = self.release.is_authorized(entity.id());
        let state = PursuerState {
            bounds: entity.bounds(),
            heading: pursuer.heading(),
            kind: pursuer.kind(),
            mode: pursuer.mode(),
            speed: pursuer.speed(),
            carry: pursuer.carry(),
            gate_authorized,
        };
        let view = MazeView {
            entities: &self.entities,
            gate: self.gate,
            lanes: self.lanes.as_ref(),
        };
        Some(self.ai.steer(&state, &view, dt, self.context.rng_mut()))
    }

    fn detect_collisions(&mut self) {
        collect_pairs(&self.entities, &mut self.collisions, |first, second| {
            first.is_solid() && second.is_solid() && intersects(&first.bounds(), &second.bounds(), 0.0)
        });
    }

    /// Pushes the agent out of any blocker it ran into, along the axis of
    /// least penetration.
    fn resolve_collisions(&mut self) {
        for pair_index in 0..self.collisions.len() {
            let (first, second) = self.collisions[pair_index];
            let (Some(a), Some(b)) = (
                position_of(&self.entities, first),
                position_of(&self.entities, second),
            ) else {
                continue;
            };
            let Some((agent, other)) = self.agent_pair(a, b) else {
                continue;
            };
            if self.entities[other].as_blocker().is_none() {
                continue;
            }

            let wall = self.entities[other].bounds();
            let corrected = push_out(self.entities[agent].bounds(), &wall);
            let entity = &mut self.entities[agent];
            entity.set_bounds(corrected);
            self.outbox.push(Event::Moved {
                entity: entity.id(),
                bounds: corrected,
            });
        }
    }

    fn detect_overlaps(&mut self) {
        let threshold = self.config.min_overlap_ratio;
        collect_pairs(&self.entities, &mut self.overlaps, |first, second| {
            let (a, b) = (first.bounds(), second.bounds());
            intersects(&a, &b, 0.0) && overlap_ratio(&a, &b) >= threshold
        });
    }

    fn resolve_overlaps(&mut self) {
        for pair_index in 0..self.overlaps.len() {
            let (first, second) = self.overlaps[pair_index];
            let (Some(a), Some(b)) = (
                position_of(&self.entities, first),
                position_of(&self.entities, second),
            ) else {
                continue;
            };
            let Some((agent, other)) = self.agent_pair(a, b) else {
                continue;
            };
            if !self.entities[agent].is_active() || !self.entities[other].is_active() {
                continue;
            }

            let contact = match self.entities[other].body() {
                Body::Collectible(collectible) => Contact::Collect(collectible.kind()),
                Body::Pursuer(pursuer) if pursuer.mode() == PursuerMode::Fear => Contact::Capture,
                Body::Pursuer(_) => Contact::Hit,
                Body::Agent(_) | Body::Blocker(_) | Body::Scenery => continue,
            };

            match contact {
                Contact::Collect(kind) => {
                    if self.entities[other].collect(&mut self.outbox) && kind == CollectibleKind::Fruit {
                        self.start_fear();
                    }
                }
                Contact::Capture => self.capture_pursuer(other),
                Contact::Hit => {
                    self.hit_agent(agent);
                    break;
                }
            }
        }
    }

    fn agent_pair(&self, a: usize, b: usize) -> Option<(usize, usize)> {
        let is_agent = |index: usize| self.entities[index].as_agent().is_some();
        if is_agent(a) {
            Some((a, b))
        } else if is_agent(b) {
            Some((b, a))
        } else {
            None
        }
    }

    fn start_fear(&mut self) {
        self.fear = FearTimer {
            active: true,
            remaining: self.fear_duration,
        };
        let damping = self.config.fear_speed_factor;
        for entity in self.entities.iter_mut().filter(|entity| entity.is_active()) {
            entity.set_pursuer_mode(PursuerMode::Fear, damping, &mut self.outbox);
        }

        debug!(seconds = self.fear_duration, "fear mode started");
        self.outbox.push(Event::FearStarted {
            duration: Duration::try_from_secs_f32(self.fear_duration).unwrap_or_default(),
        });
    }

    fn stop_fear(&mut self) {
        let was_active = self.fear.active;
        self.fear = FearTimer::default();
        let damping = self.config.fear_speed_factor;
        for entity in &mut self.entities {
            entity.set_pursuer_mode(PursuerMode::Chase, damping, &mut self.outbox);
        }

        if was_active {
            debug!("fear mode ended");
            self.outbox.push(Event::FearEnded);
        }
    }

    fn capture_pursuer(&mut self, index: usize) {
        let exit = self.gate_exit();
        let entity = &mut self.entities[index];
        let id = entity.id();
        let value = entity.as_pursuer().map_or(0, Pursuer::value);

        self.outbox.push(Event::Collected { entity: id, value });
        entity.reset_to_spawn(&mut self.outbox);
        entity.set_heading(exit, &mut self.outbox);
        self.release.grant(id);
        debug!(pursuer = id.get(), value, "pursuer captured");
    }

    fn hit_agent(&mut self, agent: usize) {
        self.lives = self.lives.saturating_sub(1);
        let id = self.entities[agent].id();
        self.outbox.push(Event::Died {
            entity: id,
            value: self.config.death_value,
        });
        self.entities[agent].reset_to_spawn(&mut self.outbox);

        self.stop_fear();
        for entity in self
            .entities
            .iter_mut()
            .filter(|entity| entity.is_active() && entity.as_pursuer().is_some())
        {
            entity.reset_to_spawn(&mut self.outbox);
        }
        self.release.restart(self.context.now());
        debug!(lives = self.lives, "agent caught");
    }

    fn update_fear_timer(&mut self, dt: f32) {
        if !self.fear.active {
            return;
        }
        self.fear.remaining -= dt;
        if self.fear.remaining <= 0.0 {
            self.stop_fear();
        }
    }

    fn flush_events(&mut self) {
        self.bus.publish_all(&mut self.outbox);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Maze as seen by the pursuer decision system.
struct MazeView<'a> {
    entities: &'a [Entity],
    gate: Option<EntityId>,
    lanes: Option<&'a Lanes>,
}

impl Surroundings for MazeView<'_> {
    fn is_blocked(&self, target: &Rect, gate_authorized: bool) -> bool {
        let passable = if gate_authorized { self.gate } else { None };
        is_walled(self.entities, target, passable)
    }

    fn quarry(&self) -> Option<Quarry> {
        self.entities
            .iter()
            .filter(|entity| entity.is_active())
            .find_map(|entity| {
                entity.as_agent().map(|agent| Quarry {
                    bounds: entity.bounds(),
                    heading: agent.heading(),
                })
            })
    }

    fn step(&self, bounds: &Rect, direction: Direction, distance: f32) -> Rect {
        clamped_step(self.lanes, *bounds, direction, distance)
    }
}

/// Identifiers grow monotonically, so the registry stays sorted by id.
fn position_of(entities: &[Entity], id: EntityId) -> Option<usize> {
    entities.binary_search_by_key(&id, Entity::id).ok()
}

/// Bounds a mover would occupy after one step, stopping on lanes like the
/// move itself.
fn clamped_step(lanes: Option<&Lanes>, bounds: Rect, direction: Direction, distance: f32) -> Rect {
    match lanes {
        Some(lanes) => lanes.step(bounds, direction, distance).0,
        None => bounds.stepped(direction, distance),
    }
}

/// Whether `target` overlaps an active solid blocker other than `passable`.
fn is_walled(entities: &[Entity], target: &Rect, passable: Option<EntityId>) -> bool {
    entities
        .iter()
        .filter(|entity| entity.is_active() && entity.is_solid() && entity.as_blocker().is_some())
        .filter(|entity| Some(entity.id()) != passable)
        .any(|entity| intersects(target, &entity.bounds(), LEGALITY_EPSILON))
}

fn collect_pairs<F>(entities: &[Entity], out: &mut Vec<EntityPair>, mut accept: F)
where
    F: FnMut(&Entity, &Entity) -> bool,
{
    out.clear();
    for (index, first) in entities.iter().enumerate() {
        if !first.is_active() {
            continue;
        }
        for second in entities.iter().skip(index + 1) {
            if second.is_active() && accept(first, second) {
                out.push((first.id(), second.id()));
            }
        }
    }
}

fn push_out(mover: Rect, wall: &Rect) -> Rect {
    let (mover_x, mover_y) = mover.center();
    let (wall_x, wall_y) = wall.center();
    let dx = mover_x - wall_x;
    let dy = mover_y - wall_y;
    let overlap_x = (mover.w + wall.w) / 2.0 - dx.abs();
    let overlap_y = (mover.h + wall.h) / 2.0 - dy.abs();

    let mut corrected = mover;
    if overlap_x < overlap_y {
        corrected.x = if dx > 0.0 {
            wall.x + wall.w
        } else {
            wall.x - mover.w
        };
    } else {
        corrected.y = if dy > 0.0 {
            wall.y + wall.h
        } else {
            wall.y - mover.h
        };
    }
    corrected
}

/// Applies the provided command to the world.
pub fn apply(world: &mut World, command: Command) {
    match command {
        Command::Tick { dt } => world.update(dt),
        Command::SteerAgent { direction } => world.set_agent_direction(direction),
        Command::AdvanceLevel => world.advance_level(),
        Command::ResetLevel => world.reset_level(),
        Command::ResetLives => world.reset_lives(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use maze_chase_core::EntityId;

    use super::{position_of, Entity, EntityPair, TileLayout, World, WorldConfig};

    /// Every registered entity, in registration order.
    #[must_use]
    pub fn entities(world: &World) -> &[Entity] {
        &world.entities
    }

    /// Entities currently participating in the simulation.
    pub fn active_entities(world: &World) -> impl Iterator<Item = &Entity> {
        world.entities.iter().filter(|entity| entity.is_active())
    }

    /// Looks up a registered entity.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<&Entity> {
        position_of(&world.entities, id).and_then(|index| world.entities.get(index))
    }

    /// The first registered agent, if any.
    #[must_use]
    pub fn agent(world: &World) -> Option<&Entity> {
        world.entities.iter().find(|entity| entity.as_agent().is_some())
    }

    /// Every registered pursuer.
    pub fn pursuers(world: &World) -> impl Iterator<Item = &Entity> {
        world
            .entities
            .iter()
            .filter(|entity| entity.as_pursuer().is_some())
    }

    /// The pen gate, if the level has one.
    #[must_use]
    pub fn gate(world: &World) -> Option<&Entity> {
        world.gate.and_then(|id| entity(world, id))
    }

    /// Whether a pursuer currently holds a gate pass.
    #[must_use]
    pub fn can_pursuer_pass_gate(world: &World, id: EntityId) -> bool {
        world.release.is_authorized(id)
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// One-based number of the current level.
    #[must_use]
    pub fn current_level(world: &World) -> u32 {
        world.level
    }

    /// Whether the agent has run out of lives.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.lives == 0
    }

    /// Whether no active collectible remains.
    #[must_use]
    pub fn is_level_cleared(world: &World) -> bool {
        !active_entities(world).any(|entity| entity.as_collectible().is_some())
    }

    /// Solid pairs that intersected during the last update.
    #[must_use]
    pub fn last_collisions(world: &World) -> &[EntityPair] {
        &world.collisions
    }

    /// Pairs whose overlap ratio crossed the threshold during the last
    /// update.
    #[must_use]
    pub fn last_overlaps(world: &World) -> &[EntityPair] {
        &world.overlaps
    }

    /// Whether fear mode is running.
    #[must_use]
    pub fn is_fear_active(world: &World) -> bool {
        world.fear.active
    }

    /// Time left in fear mode; zero when inactive.
    #[must_use]
    pub fn fear_remaining(world: &World) -> Duration {
        if !world.fear.active {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f32(world.fear.remaining).unwrap_or_default()
    }

    /// Simulation time accumulated by updates.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.context.now()
    }

    /// Layout the current level was built from.
    #[must_use]
    pub fn tile_layout(world: &World) -> Option<&TileLayout> {
        world.layout.as_ref()
    }

    /// Configuration in effect.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }
}
