#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score keeping driven by simulation events.
//!
//! [`Score`] listens to the world's event stream: pickups and captures earn
//! points scaled by how quickly they follow the previous one, simulated time
//! slowly drains the total, and deaths apply their penalty. The total never
//! drops below zero.

use std::time::Duration;

use maze_chase_core::{Event, EventSink};

mod highscores;

pub use highscores::{Highscores, HIGHSCORE_SLOTS};

/// Configuration parameters required to construct the scoring system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    combo_windows: [(Duration, u32); 3],
    decay_per_second: f64,
    level_clear_bonus: u32,
}

impl Config {
    /// Creates the stock tuning: pickups within 0.5 s, 1 s and 2 s of the
    /// previous one score ×4, ×3 and ×2, and one point drains per second.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            combo_windows: [
                (Duration::from_millis(500), 4),
                (Duration::from_secs(1), 3),
                (Duration::from_secs(2), 2),
            ],
            decay_per_second: 1.0,
            level_clear_bonus: 1000,
        }
    }

    /// Replaces the number of points drained per simulated second.
    #[must_use]
    pub const fn with_decay_rate(mut self, points_per_second: f64) -> Self {
        self.decay_per_second = points_per_second;
        self
    }

    /// Replaces the bonus awarded for clearing a level.
    #[must_use]
    pub const fn with_level_clear_bonus(mut self, bonus: u32) -> Self {
        self.level_clear_bonus = bonus;
        self
    }

    /// Multiplier earned by a pickup made `gap` after the previous one.
    #[must_use]
    pub fn combo_multiplier(&self, gap: Duration) -> u32 {
        self.combo_windows
            .iter()
            .find(|(window, _)| gap < *window)
            .map_or(1, |(_, multiplier)| *multiplier)
    }

    /// Bonus awarded for clearing a level.
    #[must_use]
    pub const fn level_clear_bonus(&self) -> u32 {
        self.level_clear_bonus
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Running score of a game.
#[derive(Clone, Debug, Default)]
pub struct Score {
    config: Config,
    value: u64,
    now: Duration,
    last_pickup: Option<Duration>,
    decay_debt: f64,
}

impl Score {
    /// Creates an empty score using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current total.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Adds `points`, which may be negative; the total is floored at zero.
    pub fn add(&mut self, points: i64) {
        self.value = if points >= 0 {
            self.value.saturating_add(points.unsigned_abs())
        } else {
            self.value.saturating_sub(points.unsigned_abs())
        };
    }

    /// Credits the configured level-clear bonus.
    pub fn award_level_clear(&mut self) {
        self.add(i64::from(self.config.level_clear_bonus));
    }

    /// Clears the total and the combo and decay state.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Consumes a batch of events in order.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            self.on_event(event);
        }
    }

    fn collect(&mut self, value: i32) {
        let multiplier = self
            .last_pickup
            .map_or(1, |last| self.config.combo_multiplier(self.now.saturating_sub(last)));
        self.last_pickup = Some(self.now);
        self.add(i64::from(value) * i64::from(multiplier));
    }

    fn decay(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
        self.decay_debt += self.config.decay_per_second * dt.as_secs_f64();

        let whole = self.decay_debt.floor();
        if whole >= 1.0 {
            self.decay_debt -= whole;
            self.value = self.value.saturating_sub(whole as u64);
        }
    }
}

impl EventSink for Score {
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::TimeAdvanced { dt } => self.decay(*dt),
            Event::Collected { value, .. } => self.collect(*value),
            Event::Died { value, .. } => self.add(i64::from(*value)),
            _ => {}
        }
    }
}
