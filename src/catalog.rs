use std::{fmt, str::FromStr};

use crate::generator::{
    rules::Tileset,
    socket::{SocketLabel, Sockets},
    tile::Tile,
};

const WIRE: &str = "wire";
const BLANK: &str = "blank";

/// Named tileset patterns, each with its own adjacency rules
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pattern {
    /// Box-drawing circuit traces. Wire ends always meet wire ends.
    Circuit,
    /// Walls and paths. A wall never touches a path.
    Maze,
    /// Four shades as numeric levels. Neighbouring shades differ by at most one level.
    Gradient,
    /// Decorative glyphs with unlabeled sockets: anything goes next to anything.
    Mosaic,
}

/// Returned when parsing an unknown [`Pattern`] name
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown pattern '{0}', expected one of: circuit, maze, gradient, mosaic")]
pub struct UnknownPatternError(pub String);

impl Pattern {
    /// All the patterns of the catalog
    pub const ALL: [Pattern; 4] = [
        Pattern::Circuit,
        Pattern::Maze,
        Pattern::Gradient,
        Pattern::Mosaic,
    ];

    /// Returns the lowercase name of the pattern
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Circuit => "circuit",
            Pattern::Maze => "maze",
            Pattern::Gradient => "gradient",
            Pattern::Mosaic => "mosaic",
        }
    }

    /// Returns the tiles of the pattern, in order
    pub fn tiles(&self) -> Vec<Tile> {
        match self {
            Pattern::Circuit => circuit_tiles(),
            Pattern::Maze => vec![
                Sockets::Mono(SocketLabel::tag("wall"))
                    .new_tile('█')
                    .with_weight(2.)
                    .with_name("wall"),
                Sockets::Mono(SocketLabel::tag("path"))
                    .new_tile(' ')
                    .with_name("path"),
            ],
            Pattern::Gradient => [('░', 2.), ('▒', 1.5), ('▓', 1.), ('█', 0.5)]
                .into_iter()
                .zip(0..)
                .map(|((symbol, weight), level)| {
                    Sockets::Mono(SocketLabel::Level(level))
                        .new_tile(symbol)
                        .with_weight(weight)
                })
                .collect(),
            Pattern::Mosaic => [('◆', 1.), ('◇', 1.), ('●', 0.5), ('○', 0.5)]
                .into_iter()
                .map(|(symbol, weight)| {
                    Sockets::Mono(SocketLabel::Unlabeled)
                        .new_tile(symbol)
                        .with_weight(weight)
                })
                .collect(),
        }
    }

    /// Returns the [`Tileset`] of the pattern
    pub fn tileset(&self) -> Tileset {
        // Catalog tiles are non-empty with positive weights.
        match Tileset::new(self.tiles()) {
            Ok(tileset) => tileset,
            Err(err) => unreachable!("catalog pattern {} is invalid: {}", self, err),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Pattern {
    type Err = UnknownPatternError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|pattern| pattern.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| UnknownPatternError(name.to_string()))
    }
}

/// Every combination of wire/blank sides is covered, so a circuit can never reach a contradiction.
fn circuit_tiles() -> Vec<Tile> {
    // (symbol, north, east, south, west, weight)
    const CIRCUIT: &[(char, bool, bool, bool, bool, f32)] = &[
        ('·', false, false, false, false, 3.),
        ('─', false, true, false, true, 2.),
        ('│', true, false, true, false, 2.),
        ('┌', false, true, true, false, 1.),
        ('┐', false, false, true, true, 1.),
        ('└', true, true, false, false, 1.),
        ('┘', true, false, false, true, 1.),
        ('┬', false, true, true, true, 1.),
        ('├', true, true, true, false, 1.),
        ('┤', true, false, true, true, 1.),
        ('┴', true, true, false, true, 1.),
        ('┼', true, true, true, true, 1.),
        // Dead ends
        ('╵', true, false, false, false, 0.25),
        ('╶', false, true, false, false, 0.25),
        ('╷', false, false, true, false, 0.25),
        ('╴', false, false, false, true, 0.25),
    ];
    let side = |wired: bool| Some(SocketLabel::tag(if wired { WIRE } else { BLANK }));
    CIRCUIT
        .iter()
        .map(|&(symbol, north, east, south, west, weight)| {
            Sockets::Simple {
                north: side(north),
                east: side(east),
                south: side(south),
                west: side(west),
            }
            .new_tile(symbol)
            .with_weight(weight)
        })
        .collect()
}
