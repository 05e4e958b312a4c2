//! Cell kinds and ray directions
//!
//! Every per-kind table (rotation, flip, edge set) is an exhaustive `match`,
//! so a new kind cannot be added without touching all of them.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Occupancy of one grid cell
///
/// The diagonal kinds are named by their solid corner: `TriTL` fills the
/// top-left half of the cell, with the hypotenuse running from the top-right
/// corner to the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Block,
    TriTL,
    TriTR,
    TriBR,
    TriBL,
    Absorb,
}

/// Which axis-aligned sides of a cell are solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Edges {
    const NONE: Self = Self::new(false, false, false, false);
    const ALL: Self = Self::new(true, true, true, true);

    pub const fn new(top: bool, right: bool, bottom: bool, left: bool) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Whether the side facing `dir` is solid (`Up` is the top side)
    #[inline]
    pub fn facing(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }
}

impl CellKind {
    pub const ALL: [CellKind; 7] = [
        CellKind::Empty,
        CellKind::Block,
        CellKind::TriTL,
        CellKind::TriTR,
        CellKind::TriBR,
        CellKind::TriBL,
        CellKind::Absorb,
    ];

    /// The four half-cell kinds
    pub const DIAGONALS: [CellKind; 4] = [
        CellKind::TriTL,
        CellKind::TriTR,
        CellKind::TriBR,
        CellKind::TriBL,
    ];

    #[inline]
    pub fn is_empty(self) -> bool {
        self == CellKind::Empty
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            CellKind::TriTL | CellKind::TriTR | CellKind::TriBR | CellKind::TriBL
        )
    }

    /// Kind after the containing pattern is turned 90° clockwise
    pub fn rotated_cw(self) -> CellKind {
        match self {
            CellKind::Empty => CellKind::Empty,
            CellKind::Block => CellKind::Block,
            CellKind::Absorb => CellKind::Absorb,
            CellKind::TriTL => CellKind::TriTR,
            CellKind::TriTR => CellKind::TriBR,
            CellKind::TriBR => CellKind::TriBL,
            CellKind::TriBL => CellKind::TriTL,
        }
    }

    /// Kind after the containing pattern is mirrored left-to-right
    pub fn flipped_h(self) -> CellKind {
        match self {
            CellKind::Empty => CellKind::Empty,
            CellKind::Block => CellKind::Block,
            CellKind::Absorb => CellKind::Absorb,
            CellKind::TriTL => CellKind::TriTR,
            CellKind::TriTR => CellKind::TriTL,
            CellKind::TriBR => CellKind::TriBL,
            CellKind::TriBL => CellKind::TriBR,
        }
    }

    /// Solid sides used for adjacency checks. A half-cell is solid on the two
    /// sides that meet at its filled corner, never along its hypotenuse.
    pub fn edges(self) -> Edges {
        match self {
            CellKind::Empty => Edges::NONE,
            CellKind::Block | CellKind::Absorb => Edges::ALL,
            CellKind::TriTL => Edges::new(true, false, false, true),
            CellKind::TriTR => Edges::new(true, true, false, false),
            CellKind::TriBR => Edges::new(false, true, true, false),
            CellKind::TriBL => Edges::new(false, false, true, true),
        }
    }

    /// Single-character glyph for text rendering
    pub fn glyph(self) -> char {
        match self {
            CellKind::Empty => '·',
            CellKind::Block => '█',
            CellKind::TriTL => '◤',
            CellKind::TriTR => '◥',
            CellKind::TriBR => '◢',
            CellKind::TriBL => '◣',
            CellKind::Absorb => '▓',
        }
    }

    /// Inverse of [`CellKind::glyph`]; `.` is also accepted for `Empty`
    pub fn from_glyph(c: char) -> Option<CellKind> {
        match c {
            '·' | '.' => Some(CellKind::Empty),
            '█' | '#' => Some(CellKind::Block),
            '◤' => Some(CellKind::TriTL),
            '◥' => Some(CellKind::TriTR),
            '◢' => Some(CellKind::TriBR),
            '◣' => Some(CellKind::TriBL),
            '▓' | 'X' => Some(CellKind::Absorb),
            _ => None,
        }
    }
}

/// Direction of ray travel (screen coordinates, `y` grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    #[inline]
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    #[inline]
    pub fn turn_cw(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Unit grid offset for one step
    #[inline]
    pub fn step(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Right => IVec2::X,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
        }
    }

    /// Direction of the unit offset `delta`, if it is one
    pub fn from_step(delta: IVec2) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.step() == delta)
    }
}
