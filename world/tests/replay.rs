use std::{cell::RefCell, rc::Rc, time::Duration};

use maze_chase_core::{Command, Direction, Event, EventLog};
use maze_chase_world::{apply, query, Entity, SimContext, TileLayout, World, WorldConfig};

const SCRIPT: [Direction; 6] = [
    Direction::East,
    Direction::North,
    Direction::West,
    Direction::South,
    Direction::East,
    Direction::South,
];

fn run(seed: u64, ticks: usize) -> (Vec<Entity>, Vec<Event>) {
    let mut world = World::with_config(WorldConfig::default(), SimContext::seeded(seed));
    let log = Rc::new(RefCell::new(EventLog::new()));
    let _ = world.event_bus().subscribe(&log);
    world.load_level(&TileLayout::classic());

    for tick in 0..ticks {
        if tick % 45 == 0 {
            let direction = SCRIPT[(tick / 45) % SCRIPT.len()];
            apply(&mut world, Command::SteerAgent { direction });
        }
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
        );
    }

    let entities = query::entities(&world).to_vec();
    let events = log.borrow_mut().take();
    (entities, events)
}

#[test]
fn identical_seeds_replay_identically() {
    let (first_entities, first_events) = run(42, 900);
    let (second_entities, second_events) = run(42, 900);

    assert_eq!(first_entities, second_entities);
    assert_eq!(first_events, second_events);
}

#[test]
fn replay_covers_pursuer_movement() {
    let (_, events) = run(42, 300);
    let pursuer_moves = events
        .iter()
        .filter(|event| matches!(event, Event::DirectionChanged { .. }))
        .count();
    assert!(pursuer_moves > 0);
}
