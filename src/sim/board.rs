//! Painted board: a grid of cell kinds plus the gem that owns each cell
//!
//! A board is a projection of a placement list and is rebuilt from scratch
//! whenever the placements change. Legality is checked on placements before
//! painting; painting itself does not enforce it.

use glam::IVec2;

use super::cell::CellKind;
use super::color::ColorSet;
use super::gem::Placement;
use crate::on_board;

/// Per-gem data the tracer needs
#[derive(Debug, Clone, PartialEq, Eq)]
struct Owner {
    id: u32,
    base_colors: ColorSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: IVec2,
    cells: Vec<CellKind>,
    /// Index into `owners` for each cell
    owner_of: Vec<Option<usize>>,
    owners: Vec<Owner>,
}

impl Board {
    /// An all-empty board
    pub fn empty(size: IVec2) -> Self {
        let len = size.x.max(0) as usize * size.y.max(0) as usize;
        Self {
            size,
            cells: vec![CellKind::Empty; len],
            owner_of: vec![None; len],
            owners: Vec::new(),
        }
    }

    /// Paint every placement in order. Cells outside the board are dropped;
    /// a later placement overwrites an earlier one on the same cell.
    pub fn paint(size: IVec2, placements: &[Placement]) -> Self {
        let mut board = Self::empty(size);
        for placement in placements {
            board.paint_one(placement);
        }
        board
    }

    fn paint_one(&mut self, placement: &Placement) {
        let owner = self.owners.len();
        self.owners.push(Owner {
            id: placement.id,
            base_colors: placement.base_colors.clone(),
        });
        for (pos, kind) in placement.cells() {
            if let Some(i) = self.index(pos) {
                self.cells[i] = kind;
                self.owner_of[i] = Some(owner);
            }
        }
    }

    #[inline]
    fn index(&self, pos: IVec2) -> Option<usize> {
        on_board(pos, self.size)
            .then(|| pos.y as usize * self.size.x as usize + pos.x as usize)
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        self.size
    }

    #[inline]
    pub fn contains(&self, pos: IVec2) -> bool {
        on_board(pos, self.size)
    }

    /// Cell kind at `pos`; off-board reads are `Empty`
    #[inline]
    pub fn get(&self, pos: IVec2) -> CellKind {
        self.index(pos).map_or(CellKind::Empty, |i| self.cells[i])
    }

    /// Id of the placement painted at `pos`
    pub fn owner_id(&self, pos: IVec2) -> Option<u32> {
        self.owner_slot(pos).map(|o| self.owners[o].id)
    }

    /// Base colors of the placement painted at `pos`
    pub fn owner_colors(&self, pos: IVec2) -> Option<&ColorSet> {
        self.owner_slot(pos).map(|o| &self.owners[o].base_colors)
    }

    /// Dense per-board owner index, usable for de-duplicating hits
    pub(crate) fn owner_slot(&self, pos: IVec2) -> Option<usize> {
        self.index(pos).and_then(|i| self.owner_of[i])
    }

    /// Number of painted placements
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Text rendering, one line per row
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 4);
        for y in 0..self.size.y {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.size.x {
                out.push(self.get(IVec2::new(x, y)).glyph());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::BaseColor;
    use crate::sim::gem::{GemCatalog, names};

    #[test]
    fn test_paint_sets_cells_and_owners() {
        let catalog = GemCatalog::standard();
        let red = Placement::new(7, catalog.get(names::RED).unwrap(), IVec2::new(1, 2));
        let board = Board::paint(IVec2::new(5, 4), &[red]);

        assert_eq!(board.get(IVec2::new(1, 2)), CellKind::TriBR);
        assert_eq!(board.get(IVec2::new(2, 2)), CellKind::Block);
        assert_eq!(board.get(IVec2::new(3, 2)), CellKind::TriTL);
        assert_eq!(board.get(IVec2::new(0, 2)), CellKind::Empty);
        assert_eq!(board.owner_id(IVec2::new(3, 2)), Some(7));
        assert_eq!(board.owner_id(IVec2::new(0, 0)), None);
        assert!(board.owner_colors(IVec2::new(2, 2)).unwrap().contains(BaseColor::Red));
        assert_eq!(board.owner_count(), 1);
    }

    #[test]
    fn test_paint_clips_off_board() {
        let catalog = GemCatalog::standard();
        let red = Placement::new(1, catalog.get(names::RED).unwrap(), IVec2::new(3, 0));
        let board = Board::paint(IVec2::new(4, 1), &[red]);
        assert_eq!(board.render(), "···◢");
        assert_eq!(board.get(IVec2::new(4, 0)), CellKind::Empty);
        assert!(!board.contains(IVec2::new(4, 0)));
    }

    #[test]
    fn test_empty_board() {
        let board = Board::empty(IVec2::new(2, 2));
        assert_eq!(board.render(), "··\n··");
        assert_eq!(board.owner_count(), 0);
    }
}
