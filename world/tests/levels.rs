use std::{cell::RefCell, rc::Rc, time::Duration};

use approx::assert_relative_eq;
use maze_chase_core::{Command, EntityId, Event, EventLog, PursuerKind, Rect};
use maze_chase_world::{
    apply, query, Entity, EntityFactory, SimContext, StandardFactory, TileLayout, TileType, World,
    WorldConfig,
};
use rstest::rstest;

const FRAME: Duration = Duration::from_millis(16);

fn classic_world() -> World {
    let mut world = World::with_config(WorldConfig::default(), SimContext::seeded(3));
    world.load_level(&TileLayout::classic());
    world
}

fn count(world: &World, predicate: impl Fn(&Entity) -> bool) -> usize {
    query::entities(world).iter().filter(|entity| predicate(entity)).count()
}

#[test]
fn classic_level_builds_one_entity_per_tile() {
    let layout = TileLayout::classic();
    let world = classic_world();

    assert_eq!(
        count(&world, |e| e.as_blocker().is_some() && !e.is_gate()),
        layout.count(TileType::Wall)
    );
    assert_eq!(
        count(&world, |e| e.as_collectible().is_some()),
        layout.count(TileType::Coin) + layout.count(TileType::Fruit)
    );
    assert_eq!(count(&world, |e| e.as_agent().is_some()), 1);
    assert_eq!(query::pursuers(&world).count(), 4);
    assert_eq!(count(&world, Entity::is_gate), 1);
    assert!(!query::is_level_cleared(&world));
}

#[test]
fn registry_ids_are_strictly_increasing() {
    let world = classic_world();
    let ids: Vec<EntityId> = query::entities(&world).iter().map(Entity::id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(ids.first(), Some(&EntityId::new(1)));
}

#[test]
fn gate_tiles_merge_into_one_blocker() {
    let layout = TileLayout::classic();
    let world = classic_world();
    let gate = query::gate(&world).map(Entity::bounds).unwrap_or_default();

    assert!(!query::gate(&world).is_some_and(Entity::is_visible));
    assert_relative_eq!(gate.w, 2.0 * layout.tile_size(), epsilon = 1e-6);
    assert_relative_eq!(gate.h, layout.tile_size(), epsilon = 1e-6);
}

#[test]
fn pursuers_spawn_in_kind_order_around_pen() {
    let world = classic_world();
    let kinds: Vec<PursuerKind> = query::pursuers(&world)
        .filter_map(|entity| entity.as_pursuer().map(|pursuer| pursuer.kind()))
        .collect();
    assert_eq!(kinds, PursuerKind::ALL.to_vec());

    let xs: Vec<f32> = query::pursuers(&world).map(|entity| entity.bounds().x).collect();
    assert!(xs[0] < xs[1]);
    assert_relative_eq!(xs[0], xs[2]);
    assert_relative_eq!(xs[1], xs[3]);
}

#[test]
fn first_two_pursuers_are_released_immediately() {
    let mut world = classic_world();
    let log = Rc::new(RefCell::new(EventLog::new()));
    let _ = world.event_bus().subscribe(&log);
    let pursuers: Vec<EntityId> = query::pursuers(&world).map(Entity::id).collect();

    world.update(FRAME);

    let authorized: Vec<bool> = pursuers
        .iter()
        .map(|id| query::can_pursuer_pass_gate(&world, *id))
        .collect();
    assert_eq!(authorized, vec![true, true, false, false]);
    let released = log
        .borrow()
        .events()
        .iter()
        .filter(|event| matches!(event, Event::PursuerReleased { .. }))
        .count();
    assert_eq!(released, 2);
}

#[test]
fn released_pursuer_leaves_the_pen() {
    let mut world = classic_world();
    let first = query::pursuers(&world).map(Entity::id).next();
    let gate = query::gate(&world).map(Entity::bounds).unwrap_or_default();

    let mut cleared_gate = false;
    for _ in 0..180 {
        world.update(FRAME);
        let y = first
            .and_then(|id| query::entity(&world, id))
            .map_or(f32::MIN, |entity| entity.bounds().y);
        cleared_gate |= y >= gate.y + gate.h - 1e-4;
    }

    assert!(cleared_gate);
    assert!(first.is_some_and(|id| !query::can_pursuer_pass_gate(&world, id)));
}

#[test]
fn loading_emits_level_loaded() {
    let mut world = World::new();
    let log = Rc::new(RefCell::new(EventLog::new()));
    let _ = world.event_bus().subscribe(&log);

    world.load_level(&TileLayout::classic());

    assert_eq!(log.borrow().events().last(), Some(&Event::LevelLoaded { level: 1 }));
}

#[test]
fn missing_factory_leaves_level_empty() {
    let mut world = World::with_factory(None, WorldConfig::default(), SimContext::seeded(0));
    world.load_level(&TileLayout::classic());
    assert!(query::entities(&world).is_empty());
}

#[derive(Debug, Default)]
struct CoinlessFactory {
    inner: StandardFactory,
}

impl EntityFactory for CoinlessFactory {
    fn create_agent(&mut self) -> Option<Entity> {
        self.inner.create_agent()
    }

    fn create_pursuer(&mut self, kind: PursuerKind) -> Option<Entity> {
        self.inner.create_pursuer(kind)
    }

    fn create_coin(&mut self) -> Option<Entity> {
        None
    }

    fn create_fruit(&mut self) -> Option<Entity> {
        self.inner.create_fruit()
    }

    fn create_blocker(&mut self) -> Option<Entity> {
        self.inner.create_blocker()
    }
}

#[test]
fn factory_can_skip_tiles() {
    let mut world = World::with_factory(
        Some(Box::new(CoinlessFactory::default())),
        WorldConfig::default(),
        SimContext::seeded(0),
    );
    world.load_level(&TileLayout::classic());

    assert_eq!(count(&world, |e| e.as_collectible().is_some()), 2);
}

#[derive(Debug, Default)]
struct AgentlessFactory {
    inner: StandardFactory,
}

impl EntityFactory for AgentlessFactory {
    fn create_agent(&mut self) -> Option<Entity> {
        None
    }

    fn create_pursuer(&mut self, kind: PursuerKind) -> Option<Entity> {
        self.inner.create_pursuer(kind)
    }

    fn create_coin(&mut self) -> Option<Entity> {
        self.inner.create_coin()
    }

    fn create_fruit(&mut self) -> Option<Entity> {
        self.inner.create_fruit()
    }

    fn create_blocker(&mut self) -> Option<Entity> {
        self.inner.create_blocker()
    }
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(7)]
#[case(42)]
fn every_pursuer_reaches_the_maze(#[case] seed: u64) {
    let mut world = World::with_factory(
        Some(Box::new(AgentlessFactory::default())),
        WorldConfig::default(),
        SimContext::seeded(seed),
    );
    world.load_level(&TileLayout::classic());
    let gate = query::gate(&world).map(Entity::bounds).unwrap_or_default();
    let ids: Vec<EntityId> = query::pursuers(&world).map(Entity::id).collect();
    assert_eq!(ids.len(), 4);

    // The last pursuer leaves the pen ten seconds in.
    let mut escaped = [false; 4];
    for _ in 0..1000 {
        world.update(FRAME);
        for (slot, id) in escaped.iter_mut().zip(&ids) {
            let y = query::entity(&world, *id).map_or(f32::MIN, |e| e.bounds().y);
            *slot |= y >= gate.y + gate.h - 1e-4;
        }
    }

    assert_eq!(escaped, [true; 4]);
    assert!(ids.iter().all(|id| !query::can_pursuer_pass_gate(&world, *id)));
}

#[test]
fn advancing_reloads_layout_with_faster_movers() {
    let mut world = classic_world();
    let before = query::agent(&world)
        .and_then(Entity::as_agent)
        .map(|agent| agent.base_speed())
        .unwrap_or_default();

    apply(&mut world, Command::AdvanceLevel);

    assert_eq!(query::current_level(&world), 2);
    assert_eq!(query::pursuers(&world).count(), 4);
    let after = query::agent(&world)
        .and_then(Entity::as_agent)
        .map(|agent| agent.base_speed())
        .unwrap_or_default();
    assert_relative_eq!(after, before * 1.1, epsilon = 1e-6);
}

#[test]
fn advancing_without_layout_only_bumps_level() {
    let mut world = World::new();
    let _ = world.add_entity(Entity::blocker(Rect::new(0.0, 0.0, 0.1, 0.1)));

    world.advance_level();

    assert_eq!(query::current_level(&world), 2);
    assert!(query::entities(&world).is_empty());
}
