//! Construction of level entities.

use std::fmt;

use maze_chase_core::{PursuerKind, Rect};

use crate::{Entity, WorldConfig};

/// Builds the entities a level layout asks for.
///
/// Factories produce entities at default bounds; the world places them on
/// their tiles. Returning `None` skips the tile.
pub trait EntityFactory: fmt::Debug {
    /// Creates the player avatar.
    fn create_agent(&mut self) -> Option<Entity>;

    /// Creates a pursuer of the given personality.
    fn create_pursuer(&mut self, kind: PursuerKind) -> Option<Entity>;

    /// Creates a coin.
    fn create_coin(&mut self) -> Option<Entity>;

    /// Creates a fruit.
    fn create_fruit(&mut self) -> Option<Entity>;

    /// Creates a wall segment.
    fn create_blocker(&mut self) -> Option<Entity>;
}

/// Factory producing the stock entity set from a [`WorldConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct StandardFactory {
    agent_speed: f32,
    pursuer_speed: f32,
    pursuer_value: i32,
    coin_value: i32,
    fruit_value: i32,
}

impl StandardFactory {
    /// Creates a factory using the speeds and values of `config`.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            agent_speed: config.agent_speed,
            pursuer_speed: config.pursuer_speed,
            pursuer_value: config.pursuer_value,
            coin_value: config.coin_value,
            fruit_value: config.fruit_value,
        }
    }
}

impl Default for StandardFactory {
    fn default() -> Self {
        Self::new(&WorldConfig::default())
    }
}

impl EntityFactory for StandardFactory {
    fn create_agent(&mut self) -> Option<Entity> {
        Some(Entity::agent(Rect::default(), self.agent_speed))
    }

    fn create_pursuer(&mut self, kind: PursuerKind) -> Option<Entity> {
        Some(Entity::pursuer(
            Rect::default(),
            kind,
            self.pursuer_speed,
            self.pursuer_value,
        ))
    }

    fn create_coin(&mut self) -> Option<Entity> {
        Some(Entity::coin(Rect::default(), self.coin_value))
    }

    fn create_fruit(&mut self) -> Option<Entity> {
        Some(Entity::fruit(Rect::default(), self.fruit_value))
    }

    fn create_blocker(&mut self) -> Option<Entity> {
        Some(Entity::blocker(Rect::default()))
    }
}
