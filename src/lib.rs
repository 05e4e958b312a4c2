//! Gemlight - a light-ray deduction puzzle
//!
//! Core modules:
//! - `sim`: Deterministic puzzle engine (shapes, ray tracing, placement, generation)
//! - `settings`: Board configuration and difficulty presets
//! - `platform`: Browser bindings (wasm32 only)

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings};

use glam::{IVec2, Vec2};

/// Board configuration constants
pub mod consts {
    /// Reference board dimensions (cells)
    pub const GRID_WIDTH: i32 = 8;
    pub const GRID_HEIGHT: i32 = 10;

    /// Largest board area accepted from settings
    pub const MAX_BOARD_CELLS: i32 = 4096;

    /// Tracer step bound; a ray still inside the board after this many steps
    /// is reported as undetermined
    pub const MAX_TRACE_STEPS: u32 = 100;

    /// Generator retry bounds
    pub const MAX_LAYOUT_ATTEMPTS: u32 = 500;
    pub const MAX_GEM_ATTEMPTS: u32 = 200;
}

/// Clamp a gem anchor so a `size`-sized bounding box stays on a `board`-sized grid.
///
/// Boxes larger than the board are pinned to the origin.
#[inline]
pub fn clamp_anchor(anchor: IVec2, size: IVec2, board: IVec2) -> IVec2 {
    let max = (board - size).max(IVec2::ZERO);
    anchor.clamp(IVec2::ZERO, max)
}

/// Center of a grid cell in board units (for path rendering)
#[inline]
pub fn cell_center(cell: IVec2) -> Vec2 {
    cell.as_vec2() + Vec2::splat(0.5)
}

/// True if `pos` lies on a `board`-sized grid
#[inline]
pub fn on_board(pos: IVec2, board: IVec2) -> bool {
    pos.x >= 0 && pos.y >= 0 && pos.x < board.x && pos.y < board.y
}
