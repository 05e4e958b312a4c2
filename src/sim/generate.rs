//! Secret layout generation
//!
//! Places the required gems one at a time at random orientations and
//! positions, checking each against the gems already placed. A gem that
//! cannot be placed within its budget throws the whole attempt away, and so
//! does a finished layout that traps any ray until the step bound.

use glam::IVec2;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use super::board::Board;
use super::emitter::Emitter;
use super::gem::{GemCatalog, GemDef, Placement};
use super::trace::{Exit, trace};
use super::validate::is_valid;
use crate::consts::{
    GRID_HEIGHT, GRID_WIDTH, MAX_GEM_ATTEMPTS, MAX_LAYOUT_ATTEMPTS, MAX_TRACE_STEPS,
};
use crate::settings::Settings;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("could not place every gem after {attempts} layout attempts")]
    Exhausted { attempts: u32 },
    #[error("unknown gem {0:?}")]
    UnknownGem(String),
}

/// A complete hidden arrangement and its painted board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretLayout {
    pub placements: Vec<Placement>,
    #[serde(skip)]
    pub board: Board,
}

/// Bounded random placement search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutGenerator {
    pub board: IVec2,
    /// Outer retries, each starting from an empty board
    pub layout_attempts: u32,
    /// Retries per gem within one layout attempt
    pub gem_attempts: u32,
    /// Step bound used to reject layouts that trap a ray
    pub max_trace_steps: u32,
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        Self {
            board: IVec2::new(GRID_WIDTH, GRID_HEIGHT),
            layout_attempts: MAX_LAYOUT_ATTEMPTS,
            gem_attempts: MAX_GEM_ATTEMPTS,
            max_trace_steps: MAX_TRACE_STEPS,
        }
    }
}

impl LayoutGenerator {
    pub fn new(board: IVec2, layout_attempts: u32, gem_attempts: u32) -> Self {
        Self {
            board,
            layout_attempts,
            gem_attempts,
            max_trace_steps: MAX_TRACE_STEPS,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_trace_steps: settings.max_trace_steps,
            ..Self::new(settings.board(), settings.layout_attempts, settings.gem_attempts)
        }
    }

    /// Place every gem in `names`, in order. Placement ids are list indices.
    pub fn generate<S, R>(
        &self,
        catalog: &GemCatalog,
        names: &[S],
        rng: &mut R,
    ) -> Result<SecretLayout, GenerateError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let defs = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                catalog
                    .get(name)
                    .ok_or_else(|| GenerateError::UnknownGem(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for attempt in 1..=self.layout_attempts {
            let Some(placements) = self.try_layout(&defs, rng) else {
                log::debug!("Layout attempt {attempt} failed, starting over");
                continue;
            };
            let board = Board::paint(self.board, &placements);
            if let Some(emitter) = self.trapped_ray(&board) {
                log::debug!("Layout attempt {attempt} traps the ray from {emitter}, starting over");
                continue;
            }
            log::info!(
                "Placed {} gems on a {}x{} board after {} attempt(s)",
                placements.len(),
                self.board.x,
                self.board.y,
                attempt
            );
            return Ok(SecretLayout { placements, board });
        }

        log::warn!(
            "Gave up placing {} gems after {} layout attempts",
            defs.len(),
            self.layout_attempts
        );
        Err(GenerateError::Exhausted {
            attempts: self.layout_attempts,
        })
    }

    /// First emitter whose ray is still on the board after the step bound
    fn trapped_ray(&self, board: &Board) -> Option<Emitter> {
        Emitter::all(self.board)
            .into_iter()
            .find(|&e| trace(board, e, self.max_trace_steps).exit == Exit::Undetermined)
    }

    fn try_layout<R: Rng + ?Sized>(&self, defs: &[&GemDef], rng: &mut R) -> Option<Vec<Placement>> {
        let mut placed = Vec::with_capacity(defs.len());
        for (id, def) in defs.iter().enumerate() {
            let placement = self.try_gem(id as u32, def, &placed, rng)?;
            placed.push(placement);
        }
        Some(placed)
    }

    fn try_gem<R: Rng + ?Sized>(
        &self,
        id: u32,
        def: &GemDef,
        placed: &[Placement],
        rng: &mut R,
    ) -> Option<Placement> {
        let flippable = def.is_flippable();
        for _ in 0..self.gem_attempts {
            let turns = rng.random_range(0..4u8);
            let flipped = flippable && rng.random_bool(0.5);
            let mut candidate = Placement::oriented(id, def, IVec2::ZERO, turns, flipped);

            let slack = self.board - candidate.size();
            if slack.x < 0 || slack.y < 0 {
                continue;
            }
            candidate.anchor = IVec2::new(
                rng.random_range(0..=slack.x),
                rng.random_range(0..=slack.y),
            );

            if is_valid(&candidate, placed, self.board) {
                candidate.valid = true;
                return Some(candidate);
            }
        }
        log::debug!("No room for {} after {} tries", def.name, self.gem_attempts);
        None
    }
}
