//! Tile lanes that quantize movement on a loaded layout.

use maze_chase_core::{Direction, Rect};

use crate::{TileCoord, TileLayout};

/// Tolerance, in tiles, below which a position counts as sitting on a lane.
const ON_LANE: f32 = 1e-3;

/// Grid of tile boundaries derived from a layout.
///
/// A step never carries a mover past the next boundary along its heading, so
/// every mover comes to rest exactly aligned once per tile and perpendicular
/// openings become reachable. The distance cut off at a boundary is handed
/// back so the mover can spend it on its next step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Lanes {
    origin_x: f32,
    origin_y: f32,
    size: f32,
}

impl Lanes {
    pub(crate) fn from_layout(layout: &TileLayout) -> Self {
        let first = layout.tile_rect(TileCoord::new(0, 0));
        Self {
            origin_x: first.x,
            origin_y: first.y,
            size: layout.tile_size(),
        }
    }

    /// Moves `bounds` up to `distance` along `heading`, stopping on the
    /// first lane boundary reached. Returns the new bounds and the distance
    /// left unused.
    pub(crate) fn step(&self, bounds: Rect, heading: Direction, distance: f32) -> (Rect, f32) {
        if self.size <= 0.0 {
            return (bounds.stepped(heading, distance), 0.0);
        }

        let (dx, dy) = heading.unit();
        let horizontal = dx != 0.0;
        let sign = dx + dy;
        let (position, origin) = if horizontal {
            (bounds.x, self.origin_x)
        } else {
            (bounds.y, self.origin_y)
        };

        let cells = (position - origin) / self.size;
        let next_cell = if sign > 0.0 {
            (cells + ON_LANE).floor() + 1.0
        } else {
            (cells - ON_LANE).ceil() - 1.0
        };
        let lane = origin + next_cell * self.size;
        let target = position + sign * distance;
        let crossed = if sign > 0.0 {
            target >= lane
        } else {
            target <= lane
        };
        let (reached, leftover) = if crossed {
            (lane, (target - lane).abs())
        } else {
            (target, 0.0)
        };

        let moved = if horizontal {
            Rect { x: reached, ..bounds }
        } else {
            Rect { y: reached, ..bounds }
        };
        (moved, leftover)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use maze_chase_core::{Direction, Rect};

    use super::Lanes;

    const LANES: Lanes = Lanes {
        origin_x: 0.0,
        origin_y: 0.0,
        size: 1.0,
    };

    #[test]
    fn short_steps_move_freely() {
        let (moved, leftover) = LANES.step(Rect::new(0.25, 0.0, 1.0, 1.0), Direction::East, 0.5);
        assert_relative_eq!(moved.x, 0.75);
        assert_relative_eq!(moved.y, 0.0);
        assert_relative_eq!(leftover, 0.0);
    }

    #[test]
    fn steps_stop_on_the_next_boundary() {
        let (east, leftover) = LANES.step(Rect::new(0.75, 0.0, 1.0, 1.0), Direction::East, 0.5);
        assert_relative_eq!(east.x, 1.0);
        assert_relative_eq!(leftover, 0.25);

        let (north, leftover) = LANES.step(Rect::new(0.0, 2.25, 1.0, 1.0), Direction::North, 0.5);
        assert_relative_eq!(north.y, 2.0);
        assert_relative_eq!(leftover, 0.25);
    }

    #[test]
    fn aligned_movers_leave_their_lane() {
        let (west, _) = LANES.step(Rect::new(3.0, 0.0, 1.0, 1.0), Direction::West, 0.25);
        assert_relative_eq!(west.x, 2.75);

        let (south, _) = LANES.step(Rect::new(0.0, 0.9999, 1.0, 1.0), Direction::South, 0.5);
        assert_relative_eq!(south.y, 1.4999, epsilon = 1e-5);
    }
}
