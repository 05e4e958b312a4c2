//! Deterministic puzzle engine
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Boards are repainted from placement lists, never patched
//! - Stable iteration order (by placement id, then emitter order)
//! - No rendering or platform dependencies

pub mod board;
pub mod cell;
pub mod color;
pub mod custom;
pub mod emitter;
pub mod gem;
pub mod generate;
pub mod optics;
pub mod pattern;
pub mod state;
pub mod trace;
pub mod validate;

pub use board::Board;
pub use cell::{CellKind, Direction, Edges};
pub use color::{BaseColor, ColorSet, MixedColor, mix};
pub use custom::{CustomLevel, CustomLevelError, GemColor, ShapeTemplate};
pub use emitter::{Emitter, EmitterParseError, Side};
pub use gem::{GemCatalog, GemDef, Placement};
pub use generate::{GenerateError, LayoutGenerator, SecretLayout};
pub use optics::{Reflection, reflect};
pub use pattern::{Pattern, PatternError};
pub use state::{ProbeRecord, Puzzle, PuzzleError, PuzzlePhase};
pub use trace::{Exit, TraceResult, all_emitters_match, trace, trace_all};
pub use validate::{gems_collide, is_valid};
