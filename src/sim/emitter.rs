//! Perimeter emitters
//!
//! An emitter is addressed by its board side letter and a 1-based index along
//! that side: `T3` is above the third column, `R10` right of the tenth row.

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cell::Direction;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitterParseError {
    #[error("empty emitter id")]
    Empty,
    #[error("unknown board side {0:?} (expected T, B, L or R)")]
    UnknownSide(char),
    #[error("bad emitter index {0:?}")]
    BadIndex(String),
    #[error("emitter {id} is outside a {width}x{height} board")]
    OutOfRange { id: String, width: i32, height: i32 },
}

/// Board side an emitter sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn letter(self) -> char {
        match self {
            Side::Top => 'T',
            Side::Bottom => 'B',
            Side::Left => 'L',
            Side::Right => 'R',
        }
    }

    pub fn from_letter(c: char) -> Option<Side> {
        match c {
            'T' => Some(Side::Top),
            'B' => Some(Side::Bottom),
            'L' => Some(Side::Left),
            'R' => Some(Side::Right),
            _ => None,
        }
    }

    /// Direction a ray launched from this side travels
    pub fn inward(self) -> Direction {
        match self {
            Side::Top => Direction::Down,
            Side::Bottom => Direction::Up,
            Side::Left => Direction::Right,
            Side::Right => Direction::Left,
        }
    }
}

/// A launch/exit point on the board perimeter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Emitter {
    pub side: Side,
    /// 1-based column (top/bottom) or row (left/right)
    pub index: u32,
}

impl Emitter {
    pub fn new(side: Side, index: u32) -> Self {
        Self { side, index }
    }

    /// Parse and check that the emitter exists on a `board`-sized grid
    pub fn parse_on(id: &str, board: IVec2) -> Result<Self, EmitterParseError> {
        let emitter: Emitter = id.parse()?;
        if emitter.fits(board) {
            Ok(emitter)
        } else {
            Err(EmitterParseError::OutOfRange {
                id: id.to_string(),
                width: board.x,
                height: board.y,
            })
        }
    }

    /// Whether this emitter exists on a `board`-sized grid
    pub fn fits(&self, board: IVec2) -> bool {
        let len = match self.side {
            Side::Top | Side::Bottom => board.x,
            Side::Left | Side::Right => board.y,
        };
        self.index >= 1 && i64::from(self.index) <= i64::from(len)
    }

    /// Off-board cell the ray starts from, and its initial direction.
    /// `None` if the emitter does not exist on a `board`-sized grid.
    pub fn origin(&self, board: IVec2) -> Option<(IVec2, Direction)> {
        if !self.fits(board) {
            return None;
        }
        let i = i32::try_from(self.index).ok()? - 1;
        let pos = match self.side {
            Side::Top => IVec2::new(i, -1),
            Side::Bottom => IVec2::new(i, board.y),
            Side::Left => IVec2::new(-1, i),
            Side::Right => IVec2::new(board.x, i),
        };
        Some((pos, self.side.inward()))
    }

    /// Emitter for an off-board cell a ray has just stepped into, if it is
    /// orthogonally adjacent to the board
    pub fn at_exit(pos: IVec2, board: IVec2) -> Option<Emitter> {
        let index = |v: i32| u32::try_from(v + 1).ok();
        if pos.y < 0 && (0..board.x).contains(&pos.x) {
            index(pos.x).map(|i| Emitter::new(Side::Top, i))
        } else if pos.y >= board.y && (0..board.x).contains(&pos.x) {
            index(pos.x).map(|i| Emitter::new(Side::Bottom, i))
        } else if pos.x < 0 && (0..board.y).contains(&pos.y) {
            index(pos.y).map(|i| Emitter::new(Side::Left, i))
        } else if pos.x >= board.x && (0..board.y).contains(&pos.y) {
            index(pos.y).map(|i| Emitter::new(Side::Right, i))
        } else {
            None
        }
    }

    /// Every emitter on a `board`-sized grid (`2W + 2H` of them), in
    /// `T1, B1, T2, B2, …, L1, R1, L2, R2, …` order
    pub fn all(board: IVec2) -> Vec<Emitter> {
        let (w, h) = (board.x.max(0) as u32, board.y.max(0) as u32);
        let mut out = Vec::with_capacity(2 * (w + h) as usize);
        for i in 1..=w {
            out.push(Emitter::new(Side::Top, i));
            out.push(Emitter::new(Side::Bottom, i));
        }
        for i in 1..=h {
            out.push(Emitter::new(Side::Left, i));
            out.push(Emitter::new(Side::Right, i));
        }
        out
    }
}

impl fmt::Display for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.letter(), self.index)
    }
}

impl FromStr for Emitter {
    type Err = EmitterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(EmitterParseError::Empty)?;
        let side = Side::from_letter(letter.to_ascii_uppercase())
            .ok_or(EmitterParseError::UnknownSide(letter))?;
        let rest = chars.as_str();
        let bad_index = || EmitterParseError::BadIndex(rest.to_string());
        // Canonical digits only, so every id formats back to itself
        if rest.starts_with('0') || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad_index());
        }
        let index: u32 = rest.parse().map_err(|_| bad_index())?;
        Ok(Emitter::new(side, index))
    }
}

impl TryFrom<String> for Emitter {
    type Error = EmitterParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Emitter> for String {
    fn from(emitter: Emitter) -> Self {
        emitter.to_string()
    }
}
