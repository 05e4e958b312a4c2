//! Gem shapes on the discrete grid
//!
//! A [`Pattern`] is an immutable, rectangular block of [`CellKind`]s. Turning
//! or mirroring one always builds a new value.

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cell::CellKind;

/// Malformed shape data
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Jagged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell glyph {0:?}")]
    UnknownGlyph(char),
}

/// A rectangular grid of cell kinds (rows × cols, both at least 1)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<CellKind>>", into = "Vec<Vec<CellKind>>")]
pub struct Pattern {
    rows: usize,
    cols: usize,
    /// Row-major
    cells: Vec<CellKind>,
}

impl Pattern {
    /// Build from rows, rejecting empty or jagged input
    pub fn new(rows: Vec<Vec<CellKind>>) -> Result<Self, PatternError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(PatternError::Empty);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != cols {
                return Err(PatternError::Jagged {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Build from a fixed-size array; shape is checked at compile time
    pub fn from_array<const R: usize, const C: usize>(rows: [[CellKind; C]; R]) -> Self {
        const { assert!(R > 0 && C > 0, "pattern must be at least 1x1") };
        Self {
            rows: R,
            cols: C,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    /// The canonical 1×1 empty pattern
    pub fn blank() -> Self {
        Self::from_array([[CellKind::Empty]])
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Bounding box size as (width, height)
    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.cols as i32, self.rows as i32)
    }

    /// Cell at (`row`, `col`); out-of-range reads are `Empty`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> CellKind {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            CellKind::Empty
        }
    }

    /// Non-empty cells with their offset from the top-left corner (x = col, y = row)
    pub fn filled(&self) -> impl Iterator<Item = (IVec2, CellKind)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, &kind)| {
            (!kind.is_empty()).then(|| {
                let offset = IVec2::new((i % self.cols) as i32, (i / self.cols) as i32);
                (offset, kind)
            })
        })
    }

    /// True if every cell is `Empty`
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|k| k.is_empty())
    }

    /// Turn 90° clockwise. Cell (r, c) moves to (c, rows-1-r) and each
    /// half-cell turns with it.
    pub fn rotate_cw(&self) -> Self {
        let (rows, cols) = (self.cols, self.rows);
        let mut cells = vec![CellKind::Empty; rows * cols];
        for r in 0..self.rows {
            for c in 0..self.cols {
                cells[c * cols + (self.rows - 1 - r)] = self.get(r, c).rotated_cw();
            }
        }
        Self { rows, cols, cells }
    }

    /// Mirror left-to-right
    pub fn flip_horizontal(&self) -> Self {
        let cells = self
            .cells
            .chunks(self.cols)
            .flat_map(|row| row.iter().rev().map(|k| k.flipped_h()))
            .collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Mirror first (if `flipped`), then turn `quarter_turns` times clockwise
    pub fn oriented(&self, quarter_turns: u8, flipped: bool) -> Self {
        let mut pattern = if flipped {
            self.flip_horizontal()
        } else {
            self.clone()
        };
        for _ in 0..quarter_turns % 4 {
            pattern = pattern.rotate_cw();
        }
        pattern
    }

    /// True if the mirror image cannot be reached by rotation alone
    pub fn is_flippable(&self) -> bool {
        let flipped = self.flip_horizontal();
        let mut current = self.clone();
        for _ in 0..4 {
            if current == flipped {
                return false;
            }
            current = current.rotate_cw();
        }
        true
    }

    /// Trim all-empty border rows and columns. A blank pattern crops to
    /// [`Pattern::blank`].
    pub fn crop(&self) -> Self {
        let mut min = IVec2::new(self.cols as i32, self.rows as i32);
        let mut max = IVec2::splat(-1);
        for (offset, _) in self.filled() {
            min = min.min(offset);
            max = max.max(offset);
        }
        if max.x < 0 {
            return Self::blank();
        }

        let rows = (max.y - min.y + 1) as usize;
        let cols = (max.x - min.x + 1) as usize;
        let mut cells = Vec::with_capacity(rows * cols);
        for r in min.y as usize..=max.y as usize {
            for c in min.x as usize..=max.x as usize {
                cells.push(self.get(r, c));
            }
        }
        Self { rows, cols, cells }
    }

    /// Same shape with every filled cell replaced by `kind`
    pub fn with_filled_as(&self, kind: CellKind) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|&k| if k.is_empty() { k } else { kind })
            .collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Rows as nested vectors
    pub fn to_rows(&self) -> Vec<Vec<CellKind>> {
        self.cells.chunks(self.cols).map(<[CellKind]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<CellKind>>> for Pattern {
    type Error = PatternError;

    fn try_from(rows: Vec<Vec<CellKind>>) -> Result<Self, Self::Error> {
        Pattern::new(rows)
    }
}

impl From<Pattern> for Vec<Vec<CellKind>> {
    fn from(pattern: Pattern) -> Self {
        pattern.to_rows()
    }
}

/// Parses one row per non-blank line using [`CellKind::glyph`] characters
impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| CellKind::from_glyph(c).ok_or(PatternError::UnknownGlyph(c)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Pattern::new(rows)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for kind in row {
                write!(f, "{}", kind.glyph())?;
            }
        }
        Ok(())
    }
}
