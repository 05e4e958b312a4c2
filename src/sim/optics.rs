//! Ray reflection off cell kinds
//!
//! Half-cells behave as 45° mirrors seen from their open side: a ray entering
//! through one of the two open sides leaves at a right angle. A ray entering
//! through a solid side travels along the mirror edge-on and passes through.

use serde::{Deserialize, Serialize};

use super::cell::{CellKind, Direction};

/// Outcome of a ray meeting a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reflection {
    /// Continue in the returned direction
    Turn(Direction),
    /// Continue unchanged
    PassThrough,
    /// The ray stops here
    Absorbed,
}

/// Outgoing behaviour for a ray travelling `dir` into a cell of `kind`
///
/// Total over every kind and direction. The tracer stops on `Absorb` before
/// asking, but the answer is still defined.
pub fn reflect(kind: CellKind, dir: Direction) -> Reflection {
    use Direction::*;
    use Reflection::*;

    match (kind, dir) {
        (CellKind::Empty, _) => PassThrough,
        (CellKind::Absorb, _) => Absorbed,
        (CellKind::Block, d) => Turn(d.reverse()),

        // '/' mirror, solid top-left: open bottom and right
        (CellKind::TriTL, Up) => Turn(Right),
        (CellKind::TriTL, Left) => Turn(Down),
        (CellKind::TriTL, Down | Right) => PassThrough,

        // '\' mirror, solid top-right: open bottom and left
        (CellKind::TriTR, Up) => Turn(Left),
        (CellKind::TriTR, Right) => Turn(Down),
        (CellKind::TriTR, Down | Left) => PassThrough,

        // '/' mirror, solid bottom-right: open top and left
        (CellKind::TriBR, Down) => Turn(Left),
        (CellKind::TriBR, Right) => Turn(Up),
        (CellKind::TriBR, Up | Left) => PassThrough,

        // '\' mirror, solid bottom-left: open top and right
        (CellKind::TriBL, Down) => Turn(Right),
        (CellKind::TriBL, Left) => Turn(Up),
        (CellKind::TriBL, Up | Right) => PassThrough,
    }
}
