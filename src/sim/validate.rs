//! Placement legality between gem instances
//!
//! Works on placements directly, never on a painted board. Two regimes:
//! absorbing gems keep a one-cell moat on every side including corners;
//! everything else only collides on a shared cell or on two solid edges
//! pressed together.

use glam::IVec2;

use super::cell::Direction;
use super::gem::Placement;

/// Whether `candidate` may sit where it is, given the other gems on a
/// `board`-sized grid. A gem in `others` with the candidate's id is skipped,
/// so a gem can be checked against the layout it is being moved within.
pub fn is_valid(candidate: &Placement, others: &[Placement], board: IVec2) -> bool {
    if !in_bounds(candidate, board) {
        return false;
    }
    others
        .iter()
        .filter(|other| other.id != candidate.id)
        .all(|other| !gems_collide(candidate, other))
}

/// Bounding box lies entirely on the board
pub fn in_bounds(placement: &Placement, board: IVec2) -> bool {
    placement.anchor.cmpge(IVec2::ZERO).all() && placement.max().cmple(board).all()
}

/// Collision test between two placements. Symmetric in its arguments.
pub fn gems_collide(a: &Placement, b: &Placement) -> bool {
    // Cells are integer-aligned, so boxes separated by a gap of at least one
    // cell also keep every pair of cells at Chebyshev distance 2 or more.
    if boxes_apart(a, b) {
        return false;
    }

    if a.absorbs || b.absorbs {
        return a
            .cells()
            .any(|(pa, _)| b.cells().any(|(pb, _)| chebyshev(pa, pb) <= 1));
    }

    for (pa, ka) in a.cells() {
        for (pb, kb) in b.cells() {
            if pa == pb {
                return true;
            }
            // Orthogonal neighbours collide only when both touching edges are solid
            if let Some(dir) = Direction::from_step(pb - pa) {
                if ka.edges().facing(dir) && kb.edges().facing(dir.reverse()) {
                    return true;
                }
            }
        }
    }
    false
}

/// Bounding boxes leave at least one empty column or row between them
#[inline]
fn boxes_apart(a: &Placement, b: &Placement) -> bool {
    a.max().x < b.anchor.x || b.max().x < a.anchor.x || a.max().y < b.anchor.y || b.max().y < a.anchor.y
}

#[inline]
fn chebyshev(a: IVec2, b: IVec2) -> i32 {
    (a - b).abs().max_element()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
    use crate::sim::cell::CellKind::*;
    use crate::sim::color::ColorSet;
    use crate::sim::gem::{GemCatalog, GemDef, names};
    use crate::sim::pattern::Pattern;

    const BOARD: IVec2 = IVec2::new(GRID_WIDTH, GRID_HEIGHT);

    fn block() -> GemDef {
        GemDef::new("BLOCK", "#000", ColorSet::new(), Pattern::from_array([[Block]]))
    }

    fn hole() -> GemDef {
        GemDef::absorbing("HOLE", "#000", Pattern::from_array([[Absorb]]))
    }

    fn at(id: u32, def: &GemDef, x: i32, y: i32) -> Placement {
        Placement::new(id, def, IVec2::new(x, y))
    }

    #[test]
    fn test_blocks_edge_to_edge_collide() {
        let b = block();
        let a = at(0, &b, 3, 4);
        let c = at(1, &b, 4, 4);
        assert!(gems_collide(&a, &c));
        assert!(!is_valid(&c, &[a.clone()], BOARD));

        let below = at(2, &b, 3, 5);
        assert!(gems_collide(&a, &below));
    }

    #[test]
    fn test_blocks_corner_to_corner_are_fine() {
        let b = block();
        let a = at(0, &b, 3, 4);
        let c = at(1, &b, 4, 5);
        assert!(!gems_collide(&a, &c));
        assert!(is_valid(&c, &[a], BOARD));
    }

    #[test]
    fn test_hypotenuses_may_face() {
        let catalog = GemCatalog::standard();
        let red = catalog.get(names::RED).unwrap();
        // ◢█◤ then ◢█◤: the ◤ at (2,0) meets the ◢ at (3,0) along open edges
        let a = at(0, red, 0, 0);
        let b = at(1, red, 3, 0);
        assert!(!gems_collide(&a, &b));
        assert!(is_valid(&b, &[a.clone()], BOARD));

        // One further left overlaps
        let c = at(2, red, 2, 0);
        assert!(gems_collide(&a, &c));
    }

    #[test]
    fn test_triangle_solid_edge_against_block() {
        // ◤ at (2,0) has a solid left edge; a block at (1,0) touches it
        let tri = GemDef::new("TRI", "#fff", ColorSet::new(), Pattern::from_array([[TriTL]]));
        let b = block();
        let t = at(0, &tri, 2, 0);
        assert!(gems_collide(&t, &at(1, &b, 1, 0)));
        assert!(!gems_collide(&t, &at(1, &b, 2, 1)));
        assert!(!gems_collide(&t, &at(1, &b, 3, 0)));
        assert!(gems_collide(&t, &at(1, &b, 2, -1)));
    }

    #[test]
    fn test_absorber_keeps_a_moat() {
        let h = hole();
        let b = block();
        let a = at(0, &h, 3, 4);

        // Diagonal neighbour is illegal next to an absorber
        assert!(gems_collide(&a, &at(1, &b, 4, 5)));
        assert!(gems_collide(&at(1, &b, 2, 3), &a));
        // Two cells away is fine
        assert!(!gems_collide(&a, &at(1, &b, 5, 5)));
        // Holes keep the moat between themselves too
        assert!(gems_collide(&a, &at(1, &h, 4, 3)));
    }

    #[test]
    fn test_bounds() {
        let catalog = GemCatalog::standard();
        let blue = catalog.get(names::BLUE).unwrap();
        assert!(is_valid(&at(0, blue, 4, 8), &[], BOARD));
        assert!(!is_valid(&at(0, blue, 5, 8), &[], BOARD));
        assert!(!is_valid(&at(0, blue, 4, 9), &[], BOARD));
        assert!(!is_valid(&at(0, blue, -1, 0), &[], BOARD));
    }

    #[test]
    fn test_same_id_is_skipped() {
        let b = block();
        let placed = at(5, &b, 3, 4);
        let moved = at(5, &b, 4, 4);
        assert!(is_valid(&moved, &[placed.clone()], BOARD));

        let other = at(6, &b, 4, 4);
        assert!(!is_valid(&other, &[placed], BOARD));
    }

    #[test]
    fn test_overlap() {
        let catalog = GemCatalog::standard();
        let diamond = catalog.get(names::WHITE_DIAMOND).unwrap();
        let a = at(0, diamond, 2, 2);
        let b = at(1, diamond, 3, 3);
        assert!(gems_collide(&a, &b));
        assert!(gems_collide(&b, &a));
    }
}
