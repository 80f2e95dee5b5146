//! ASCII tile layouts and their mapping into world space.

use std::str::FromStr;

use maze_chase_core::{Direction, Rect};
use thiserror::Error;

/// Built-in 20×11 maze.
pub const CLASSIC_LAYOUT: &str = "\
####################
#....#........#...F#
#.##.#.######.#.##.#
#.#..............#.#
#.#.##.######.##.#.#
#.P....# G  #......#
#.#.##.##DD##.##.#.#
#.#..............#.#
#.##.#.######.#.##.#
#F...#........#....#
####################";

/// Full width of the world square along the layout's longer axis.
const WORLD_EXTENT: f32 = 2.0;

/// Kind of a single layout cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileType {
    /// Open floor.
    Empty,
    /// Impassable wall.
    Wall,
    /// Floor holding a coin.
    Coin,
    /// Floor holding a fruit.
    Fruit,
    /// Agent spawn point.
    AgentSpawn,
    /// Spawn point of the pursuer pen.
    PursuerSpawn,
    /// Part of the pen gate.
    Gate,
}

impl TileType {
    /// Decodes a layout glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            ' ' => Some(Self::Empty),
            '#' => Some(Self::Wall),
            '.' => Some(Self::Coin),
            'F' => Some(Self::Fruit),
            'P' => Some(Self::AgentSpawn),
            'G' => Some(Self::PursuerSpawn),
            'D' => Some(Self::Gate),
            _ => None,
        }
    }

    /// Glyph representing the tile in a layout.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall => '#',
            Self::Coin => '.',
            Self::Fruit => 'F',
            Self::AgentSpawn => 'P',
            Self::PursuerSpawn => 'G',
            Self::Gate => 'D',
        }
    }
}

/// Location of a tile within a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a coordinate from a column and a row.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column, growing eastwards.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row, growing southwards.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Failure to decode an ASCII layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The text contained no rows.
    #[error("layout contains no rows")]
    Empty,
    /// A row's width differs from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Offending row.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A glyph outside the layout alphabet.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Column of the glyph.
        column: u32,
        /// Row of the glyph.
        row: u32,
    },
}

/// Rectangular grid of tiles describing a level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileLayout {
    columns: u32,
    rows: u32,
    tiles: Vec<TileType>,
}

impl TileLayout {
    /// Decodes a layout from rows of glyphs.
    ///
    /// Blank lines are skipped and Windows line endings tolerated; every
    /// remaining row must match the width of the first.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(LayoutError::Empty);
        };

        let columns = first.chars().count() as u32;
        let mut tiles = Vec::with_capacity(columns as usize * lines.len());
        for (row, line) in (0u32..).zip(&lines) {
            let found = line.chars().count() as u32;
            if found != columns {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }

            for (column, glyph) in (0u32..).zip(line.chars()) {
                let tile = TileType::from_glyph(glyph).ok_or(LayoutError::UnknownGlyph {
                    glyph,
                    column,
                    row,
                })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            columns,
            rows: lines.len() as u32,
            tiles,
        })
    }

    /// The built-in maze.
    #[must_use]
    pub fn classic() -> Self {
        Self::parse(CLASSIC_LAYOUT).unwrap_or_default()
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile at `coord`; coordinates outside the grid read as walls.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> TileType {
        if coord.column >= self.columns || coord.row >= self.rows {
            return TileType::Wall;
        }
        let index = coord.row as usize * self.columns as usize + coord.column as usize;
        self.tiles.get(index).copied().unwrap_or(TileType::Wall)
    }

    /// Edge length of a square tile in world units.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        WORLD_EXTENT / self.columns.max(self.rows).max(1) as f32
    }

    /// World-space bounds of the tile at `coord`, with the grid centred on
    /// the origin.
    #[must_use]
    pub fn tile_rect(&self, coord: TileCoord) -> Rect {
        let size = self.tile_size();
        let width = size * self.columns as f32;
        let height = size * self.rows as f32;
        Rect::new(
            -width / 2.0 + coord.column as f32 * size,
            -height / 2.0 + coord.row as f32 * size,
            size,
            size,
        )
    }

    /// Iterates tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, TileType)> + '_ {
        let columns = self.columns.max(1);
        (0u32..).zip(&self.tiles).map(move |(index, tile)| {
            (TileCoord::new(index % columns, index / columns), *tile)
        })
    }

    /// Number of tiles of the given type.
    #[must_use]
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|candidate| **candidate == tile).count()
    }

    /// Direction leading from the first pursuer spawn through the gate, if
    /// the layout has both.
    #[must_use]
    pub fn gate_exit(&self) -> Option<Direction> {
        let (spawn, _) = self
            .tiles()
            .find(|(_, tile)| *tile == TileType::PursuerSpawn)?;

        let gate: Vec<TileCoord> = self
            .tiles()
            .filter(|(_, tile)| *tile == TileType::Gate)
            .map(|(coord, _)| coord)
            .collect();
        if gate.is_empty() {
            return None;
        }

        let count = gate.len() as f32;
        let gate_column = gate.iter().map(|coord| coord.column as f32).sum::<f32>() / count;
        let gate_row = gate.iter().map(|coord| coord.row as f32).sum::<f32>() / count;
        let dx = gate_column - spawn.column as f32;
        let dy = gate_row - spawn.row as f32;

        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy > 0.0 {
            Direction::South
        } else {
            Direction::North
        };
        Some(direction)
    }
}

impl FromStr for TileLayout {
    type Err = LayoutError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutError, TileCoord, TileLayout, TileType, WORLD_EXTENT};
    use approx::assert_relative_eq;
    use maze_chase_core::Direction;
    use rstest::rstest;

    #[test]
    fn classic_layout_parses() {
        let layout = TileLayout::classic();
        assert_eq!(layout.columns(), 20);
        assert_eq!(layout.rows(), 11);
        assert_eq!(layout.count(TileType::AgentSpawn), 1);
        assert_eq!(layout.count(TileType::PursuerSpawn), 1);
        assert_eq!(layout.count(TileType::Gate), 2);
        assert_eq!(layout.count(TileType::Fruit), 2);
    }

    #[test]
    fn classic_gate_leads_south() {
        assert_eq!(TileLayout::classic().gate_exit(), Some(Direction::South));
    }

    #[rstest]
    #[case("", LayoutError::Empty)]
    #[case("##\n#", LayoutError::RaggedRow { row: 1, expected: 2, found: 1 })]
    #[case("#x", LayoutError::UnknownGlyph { glyph: 'x', column: 1, row: 0 })]
    fn malformed_layouts_are_rejected(#[case] text: &str, #[case] expected: LayoutError) {
        assert_eq!(TileLayout::parse(text), Err(expected));
    }

    #[test]
    fn grid_is_centred_on_origin() {
        let layout: TileLayout = "#.#\n. .".parse().unwrap_or_default();
        let size = layout.tile_size();
        assert_relative_eq!(size, 2.0 / 3.0);

        let first = layout.tile_rect(TileCoord::new(0, 0));
        let last = layout.tile_rect(TileCoord::new(2, 1));
        assert_relative_eq!(first.x, -1.0);
        assert_relative_eq!(first.y, -2.0 / 3.0);
        assert_relative_eq!(last.x + last.w, 1.0, epsilon = 1e-6);
        assert_relative_eq!(last.y + last.h, 2.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn longer_axis_spans_the_whole_world() {
        let layout = TileLayout::classic();
        let first = layout.tile_rect(TileCoord::new(0, 0));
        let last = layout.tile_rect(TileCoord::new(layout.columns() - 1, 0));
        assert_relative_eq!(last.x + last.w - first.x, WORLD_EXTENT, epsilon = 1e-5);
    }

    #[test]
    fn out_of_range_tiles_read_as_walls() {
        let layout: TileLayout = "  ".parse().unwrap_or_default();
        assert_eq!(layout.tile(TileCoord::new(1, 0)), TileType::Empty);
        assert_eq!(layout.tile(TileCoord::new(2, 0)), TileType::Wall);
    }

    #[test]
    fn gate_exit_follows_gate_position() {
        let layout: TileLayout = "#D#\n#G#\n###".parse().unwrap_or_default();
        assert_eq!(layout.gate_exit(), Some(Direction::North));

        let gateless: TileLayout = "#G#".parse().unwrap_or_default();
        assert_eq!(gateless.gate_exit(), None);
    }
}
