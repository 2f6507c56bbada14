use std::fmt;

use crate::grid::direction::Direction;

use super::tile::Tile;

/// Compatibility label carried by a socket.
///
/// Two facing sockets connect when:
/// - both are [`SocketLabel::Unlabeled`]
/// - both are [`SocketLabel::Tag`] with identical tags
/// - both are [`SocketLabel::Level`] with levels differing by at most 1
///
/// Any other combination does not connect.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SocketLabel {
    /// Connects to any other unlabeled socket
    Unlabeled,
    /// Connects to the exact same tag only
    Tag(String),
    /// Connects to any level in `level - 1..=level + 1`
    Level(i32),
}

impl SocketLabel {
    /// Shorthand for [`SocketLabel::Tag`]
    pub fn tag<S: Into<String>>(tag: S) -> Self {
        SocketLabel::Tag(tag.into())
    }

    /// Returns `true` if a socket with this label can face a socket with the `other` label.
    ///
    /// The relation is symmetric.
    pub fn connects_to(&self, other: &SocketLabel) -> bool {
        match (self, other) {
            (SocketLabel::Unlabeled, SocketLabel::Unlabeled) => true,
            (SocketLabel::Tag(a), SocketLabel::Tag(b)) => a == b,
            (SocketLabel::Level(a), SocketLabel::Level(b)) => {
                (i64::from(*a) - i64::from(*b)).abs() <= 1
            }
            _ => false,
        }
    }
}

impl fmt::Display for SocketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketLabel::Unlabeled => write!(f, "*"),
            SocketLabel::Tag(tag) => write!(f, "{}", tag),
            SocketLabel::Level(level) => write!(f, "L{}", level),
        }
    }
}

impl From<&str> for SocketLabel {
    fn from(tag: &str) -> Self {
        SocketLabel::Tag(tag.to_string())
    }
}

impl From<i32> for SocketLabel {
    fn from(level: i32) -> Self {
        SocketLabel::Level(level)
    }
}

/// Socket declarations used to create a [`Tile`]
///
/// ### Example
/// ```
/// use glyph_wfc::generator::socket::{SocketLabel, Sockets};
///
/// let wall = Sockets::Mono(SocketLabel::tag("wall")).new_tile('█').with_weight(2.);
/// let corner = Sockets::Simple {
///     north: None,
///     east: Some("wire".into()),
///     south: Some("wire".into()),
///     west: None,
/// }
/// .new_tile('┌');
/// assert!(wall.socket(glyph_wfc::grid::direction::Direction::North).is_some());
/// assert!(corner.socket(glyph_wfc::grid::direction::Direction::North).is_none());
/// ```
#[derive(Clone, Debug)]
pub enum Sockets {
    /// The same label on all four sides
    Mono(SocketLabel),
    /// One optional socket per side. A missing socket never connects to anything.
    Simple {
        north: Option<SocketLabel>,
        east: Option<SocketLabel>,
        south: Option<SocketLabel>,
        west: Option<SocketLabel>,
    },
}

impl Sockets {
    /// Creates a [`Tile`] with these sockets, rendered as `symbol`, with a weight of 1.0
    pub fn new_tile(self, symbol: char) -> Tile {
        Tile::new(symbol, self.into())
    }
}

impl Into<[Option<SocketLabel>; 4]> for Sockets {
    fn into(self) -> [Option<SocketLabel>; 4] {
        match self {
            Sockets::Mono(label) => [
                Some(label.clone()),
                Some(label.clone()),
                Some(label.clone()),
                Some(label),
            ],
            Sockets::Simple {
                north,
                east,
                south,
                west,
            } => [north, east, south, west],
        }
    }
}

/// Answers "can `from` be adjacent to `to` when `to` lies in `direction` from `from` ?"
///
/// `from` is checked on its `direction` side and `to` on the opposite side. A missing socket on either side means no connection.
pub fn can_connect(from: &Tile, to: &Tile, direction: Direction) -> bool {
    match (from.socket(direction), to.socket(direction.opposite())) {
        (Some(from_label), Some(to_label)) => from_label.connects_to(to_label),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::direction::{Direction, CARDINAL_DIRECTIONS};

    use super::{can_connect, SocketLabel, Sockets};

    #[test]
    fn unlabeled_sockets_connect_to_each_other_only() {
        let free = Sockets::Mono(SocketLabel::Unlabeled).new_tile('.');
        let tagged = Sockets::Mono(SocketLabel::tag("a")).new_tile('a');
        let leveled = Sockets::Mono(SocketLabel::Level(0)).new_tile('0');
        for &dir in CARDINAL_DIRECTIONS {
            assert!(can_connect(&free, &free, dir));
            assert!(!can_connect(&free, &tagged, dir));
            assert!(!can_connect(&tagged, &free, dir));
            assert!(!can_connect(&free, &leveled, dir));
        }
    }

    #[test]
    fn tags_must_be_identical() {
        let wall = Sockets::Mono("wall".into()).new_tile('#');
        let path = Sockets::Mono("path".into()).new_tile(' ');
        assert!(can_connect(&wall, &wall, Direction::North));
        assert!(can_connect(&path, &path, Direction::East));
        assert!(!can_connect(&wall, &path, Direction::North));
        assert!(!can_connect(&path, &wall, Direction::South));
    }

    #[test]
    fn levels_connect_within_one_step() {
        let levels: Vec<_> = (0..4)
            .map(|level| Sockets::Mono(SocketLabel::Level(level)).new_tile('x'))
            .collect();
        for (a, tile_a) in levels.iter().enumerate() {
            for (b, tile_b) in levels.iter().enumerate() {
                let expected = (a as i32 - b as i32).abs() <= 1;
                assert_eq!(can_connect(tile_a, tile_b, Direction::West), expected);
            }
        }
    }

    #[test]
    fn extreme_levels_do_not_overflow() {
        let low = SocketLabel::Level(i32::MIN);
        let high = SocketLabel::Level(i32::MAX);
        assert!(!low.connects_to(&high));
        assert!(high.connects_to(&high));
    }

    #[test]
    fn missing_socket_never_connects() {
        let horizontal = Sockets::Simple {
            north: None,
            east: Some("wire".into()),
            south: None,
            west: Some("wire".into()),
        }
        .new_tile('─');
        let cross = Sockets::Mono("wire".into()).new_tile('┼');
        assert!(can_connect(&horizontal, &cross, Direction::East));
        assert!(can_connect(&cross, &horizontal, Direction::West));
        assert!(!can_connect(&horizontal, &cross, Direction::North));
        // `cross` exposes a socket northward but `horizontal` has none on its south side
        assert!(!can_connect(&cross, &horizontal, Direction::North));
    }

    #[test]
    fn direction_is_checked_against_the_opposite_side() {
        let top_only = Sockets::Simple {
            north: Some("a".into()),
            east: None,
            south: None,
            west: None,
        }
        .new_tile('^');
        let bottom_only = Sockets::Simple {
            north: None,
            east: None,
            south: Some("a".into()),
            west: None,
        }
        .new_tile('v');
        // `bottom_only` lies north of `top_only`
        assert!(can_connect(&top_only, &bottom_only, Direction::North));
        assert!(can_connect(&bottom_only, &top_only, Direction::South));
        assert!(!can_connect(&top_only, &bottom_only, Direction::South));
    }
}
