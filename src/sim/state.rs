//! Puzzle session state
//!
//! One `Puzzle` owns a secret layout, the player's attempt at reconstructing
//! it, and the log of probes fired so far. Boards are repainted from the
//! placement lists whenever they are needed.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::board::Board;
use super::custom::{CustomLevel, CustomLevelError};
use super::emitter::{Emitter, EmitterParseError};
use super::gem::{GemCatalog, Placement};
use super::generate::{GenerateError, LayoutGenerator, SecretLayout};
use super::trace::{TraceResult, all_emitters_match, trace};
use super::validate::is_valid;
use crate::clamp_anchor;
use crate::settings::{Difficulty, Settings, SettingsError};

/// Current phase of a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PuzzlePhase {
    /// Probing and editing allowed
    Playing,
    /// Submitted layout matched on every emitter
    Solved,
    /// Submitted layout did not match
    Failed,
    GaveUp,
}

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    CustomLevel(#[from] CustomLevelError),
    #[error(transparent)]
    Emitter(#[from] EmitterParseError),
    #[error("no player gem with id {0}")]
    UnknownId(u32),
    #[error("gem {0:?} is not part of this puzzle")]
    NotInLevel(String),
    #[error("every {0:?} gem is already on the board")]
    AlreadyPlaced(String),
    #[error("not every gem is placed validly yet")]
    Incomplete,
    #[error("the puzzle is over")]
    NotPlaying,
}

/// One fired probe: what the hidden layout did and what the player's layout does
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeRecord {
    pub emitter: Emitter,
    pub secret: TraceResult,
    pub player: TraceResult,
}

#[derive(Debug, Clone)]
pub struct Puzzle {
    settings: Settings,
    catalog: GemCatalog,
    /// Gems hidden in this puzzle, in generation order
    gem_names: Vec<String>,
    secret: SecretLayout,
    player: Vec<Placement>,
    next_id: u32,
    probes: Vec<ProbeRecord>,
    phase: PuzzlePhase,
}

impl Puzzle {
    /// Generate a puzzle hiding `gem_names` from `catalog`
    pub fn new(
        settings: Settings,
        catalog: GemCatalog,
        gem_names: Vec<String>,
        seed: u64,
    ) -> Result<Self, PuzzleError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let secret = LayoutGenerator::from_settings(&settings).generate(&catalog, &gem_names, &mut rng)?;
        log::info!(
            "New {} puzzle (seed {seed}) hiding {} gems",
            settings.difficulty.as_str(),
            gem_names.len()
        );

        Ok(Self {
            settings,
            catalog,
            gem_names,
            secret,
            player: Vec::new(),
            next_id: 0,
            probes: Vec::new(),
            phase: PuzzlePhase::Playing,
        })
    }

    /// Standard gems at the settings' difficulty
    pub fn from_difficulty(settings: Settings, seed: u64) -> Result<Self, PuzzleError> {
        let names = settings
            .difficulty
            .gem_set()
            .iter()
            .map(|n| n.to_string())
            .collect();
        Self::new(settings, GemCatalog::standard(), names, seed)
    }

    /// Gems from a custom level
    pub fn from_custom(settings: Settings, level: CustomLevel, seed: u64) -> Result<Self, PuzzleError> {
        let (catalog, names) = level.into_catalog()?;
        let settings = Settings {
            difficulty: Difficulty::Custom,
            ..settings
        };
        Self::new(settings, catalog, names, seed)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &GemCatalog {
        &self.catalog
    }

    pub fn gem_names(&self) -> &[String] {
        &self.gem_names
    }

    pub fn phase(&self) -> PuzzlePhase {
        self.phase
    }

    /// Hidden placements (for end-of-game reveal)
    pub fn secret(&self) -> &[Placement] {
        &self.secret.placements
    }

    pub fn secret_board(&self) -> &Board {
        &self.secret.board
    }

    pub fn player_gems(&self) -> &[Placement] {
        &self.player
    }

    pub fn player_gem(&self, id: u32) -> Option<&Placement> {
        self.player.iter().find(|p| p.id == id)
    }

    /// Freshly painted board of the player's gems
    pub fn player_board(&self) -> Board {
        Board::paint(self.settings.board(), &self.player)
    }

    pub fn probes(&self) -> &[ProbeRecord] {
        &self.probes
    }

    pub fn probe_count(&self) -> u32 {
        self.probes.len() as u32
    }

    fn ensure_playing(&self) -> Result<(), PuzzleError> {
        if self.phase == PuzzlePhase::Playing {
            Ok(())
        } else {
            Err(PuzzleError::NotPlaying)
        }
    }

    /// Fire a ray from `emitter` through both layouts and log the outcome
    pub fn probe(&mut self, emitter: Emitter) -> Result<&ProbeRecord, PuzzleError> {
        self.ensure_playing()?;
        let board = self.settings.board();
        if !emitter.fits(board) {
            return Err(EmitterParseError::OutOfRange {
                id: emitter.to_string(),
                width: board.x,
                height: board.y,
            }
            .into());
        }

        let steps = self.settings.max_trace_steps;
        let record = ProbeRecord {
            emitter,
            secret: trace(&self.secret.board, emitter, steps),
            player: trace(&self.player_board(), emitter, steps),
        };
        log::debug!(
            "Probe {} from {emitter}: exit {} [{}]",
            self.probes.len() + 1,
            record.secret.exit,
            record.secret.color_key()
        );
        self.probes.push(record);
        Ok(&self.probes[self.probes.len() - 1])
    }

    /// [`Puzzle::probe`] by emitter id
    pub fn probe_id(&mut self, id: &str) -> Result<&ProbeRecord, PuzzleError> {
        let emitter = Emitter::parse_on(id, self.settings.board())?;
        self.probe(emitter)
    }

    /// Put one of the level's gems on the board in its base orientation.
    /// Returns the new gem's id.
    pub fn add_gem(&mut self, name: &str, x: i32, y: i32) -> Result<u32, PuzzleError> {
        self.ensure_playing()?;
        let required = self.gem_names.iter().filter(|n| *n == name).count();
        let def = match self.catalog.get(name) {
            Some(def) if required > 0 => def,
            _ => return Err(PuzzleError::NotInLevel(name.to_string())),
        };
        let placed = self.player.iter().filter(|p| p.gem == name).count();
        if placed >= required {
            return Err(PuzzleError::AlreadyPlaced(name.to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;
        let anchor = clamp_anchor(IVec2::new(x, y), def.pattern.size(), self.settings.board());
        self.player.push(Placement::new(id, def, anchor));
        self.revalidate();
        Ok(id)
    }

    fn gem_mut(&mut self, id: u32) -> Result<&mut Placement, PuzzleError> {
        self.player
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PuzzleError::UnknownId(id))
    }

    /// Move a gem's anchor, keeping it on the board
    pub fn move_gem(&mut self, id: u32, x: i32, y: i32) -> Result<(), PuzzleError> {
        self.ensure_playing()?;
        let board = self.settings.board();
        let gem = self.gem_mut(id)?;
        gem.anchor = clamp_anchor(IVec2::new(x, y), gem.size(), board);
        self.revalidate();
        Ok(())
    }

    /// Turn a gem clockwise about the center of its bounding box
    pub fn rotate_gem(&mut self, id: u32) -> Result<(), PuzzleError> {
        self.ensure_playing()?;
        let board = self.settings.board();
        let gem = self.gem_mut(id)?;
        let before = gem.size();
        gem.rotate_cw();
        let after = gem.size();
        // round(anchor + (before - after) / 2), halves rounding up
        let anchor = (gem.anchor * 2 + before - after + IVec2::ONE).div_euclid(IVec2::splat(2));
        gem.anchor = clamp_anchor(anchor, after, board);
        self.revalidate();
        Ok(())
    }

    /// Mirror a gem in place. Returns `false` without changing anything when
    /// the shape's mirror image is one of its rotations.
    pub fn flip_gem(&mut self, id: u32) -> Result<bool, PuzzleError> {
        self.ensure_playing()?;
        let board = self.settings.board();
        let gem = self.gem_mut(id)?;
        if !gem.pattern.is_flippable() {
            return Ok(false);
        }
        gem.flip();
        gem.anchor = clamp_anchor(gem.anchor, gem.size(), board);
        self.revalidate();
        Ok(true)
    }

    pub fn remove_gem(&mut self, id: u32) -> Result<Placement, PuzzleError> {
        self.ensure_playing()?;
        let index = self
            .player
            .iter()
            .position(|p| p.id == id)
            .ok_or(PuzzleError::UnknownId(id))?;
        let removed = self.player.remove(index);
        self.revalidate();
        Ok(removed)
    }

    /// Whether `candidate` could sit among the player's current gems
    pub fn can_place(&self, candidate: &Placement) -> bool {
        is_valid(candidate, &self.player, self.settings.board())
    }

    fn revalidate(&mut self) {
        let board = self.settings.board();
        let flags: Vec<bool> = self
            .player
            .iter()
            .map(|p| is_valid(p, &self.player, board))
            .collect();
        for (gem, valid) in self.player.iter_mut().zip(flags) {
            gem.valid = valid;
        }
    }

    /// Every hidden gem has a validly placed counterpart
    pub fn can_check(&self) -> bool {
        let mut placed: Vec<&str> = self.player.iter().map(|p| p.gem.as_str()).collect();
        let mut required: Vec<&str> = self.gem_names.iter().map(String::as_str).collect();
        placed.sort_unstable();
        required.sort_unstable();
        placed == required && self.player.iter().all(|p| p.valid)
    }

    /// Submit the player's layout. Ends the puzzle either way.
    pub fn check_solution(&mut self) -> Result<bool, PuzzleError> {
        self.ensure_playing()?;
        if !self.can_check() {
            return Err(PuzzleError::Incomplete);
        }
        let solved = all_emitters_match(
            &self.secret.board,
            &self.player_board(),
            self.settings.max_trace_steps,
        );
        self.phase = if solved {
            PuzzlePhase::Solved
        } else {
            PuzzlePhase::Failed
        };
        log::info!(
            "Solution {} after {} probes",
            if solved { "accepted" } else { "rejected" },
            self.probes.len()
        );
        Ok(solved)
    }

    pub fn give_up(&mut self) {
        if self.phase == PuzzlePhase::Playing {
            log::info!("Gave up after {} probes", self.probes.len());
            self.phase = PuzzlePhase::GaveUp;
        }
    }

    /// Rating tier for the probes fired so far
    pub fn rating(&self) -> u32 {
        self.settings.difficulty.rating(self.probe_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::custom::{GemColor, ShapeTemplate};
    use crate::sim::gem::names;
    use crate::sim::trace::Exit;

    fn normal(seed: u64) -> Puzzle {
        Puzzle::from_difficulty(Settings::default(), seed).unwrap()
    }

    /// Rebuild the secret layout through the editing operations
    fn copy_secret(puzzle: &mut Puzzle) {
        let secret = puzzle.secret().to_vec();
        for gem in &secret {
            let id = puzzle.add_gem(&gem.gem, 0, 0).unwrap();
            if gem.flipped {
                assert!(puzzle.flip_gem(id).unwrap());
            }
            for _ in 0..gem.quarter_turns {
                puzzle.rotate_gem(id).unwrap();
            }
            puzzle.move_gem(id, gem.anchor.x, gem.anchor.y).unwrap();
            assert_eq!(puzzle.player_gem(id).unwrap().pattern, gem.pattern);
        }
    }

    #[test]
    fn test_new_puzzle() {
        let puzzle = normal(1);
        assert_eq!(puzzle.phase(), PuzzlePhase::Playing);
        assert_eq!(puzzle.secret().len(), 5);
        assert!(puzzle.player_gems().is_empty());
        assert_eq!(puzzle.probe_count(), 0);
        assert!(!puzzle.can_check());
    }

    #[test]
    fn test_probe_logs_both_layouts() {
        let mut puzzle = normal(2);
        let record = puzzle.probe_id("T1").unwrap().clone();
        assert_eq!(record.emitter.to_string(), "T1");
        // The player board is empty, so the player's ray runs straight across
        assert_eq!(record.player.exit.to_string(), "B1");
        assert_eq!(puzzle.probe_count(), 1);
        assert_eq!(puzzle.probes()[0], record);

        assert!(matches!(
            puzzle.probe_id("T9"),
            Err(PuzzleError::Emitter(EmitterParseError::OutOfRange { .. }))
        ));
        assert_eq!(puzzle.probe_count(), 1);
    }

    #[test]
    fn test_add_gem_rules() {
        let mut puzzle = normal(3);
        let id = puzzle.add_gem(names::RED, 100, -5).unwrap();
        // Clamped so the 3x1 pattern fits
        assert_eq!(puzzle.player_gem(id).unwrap().anchor, IVec2::new(5, 0));

        assert!(matches!(
            puzzle.add_gem(names::RED, 0, 0),
            Err(PuzzleError::AlreadyPlaced(_))
        ));
        assert!(matches!(
            puzzle.add_gem(names::BLACK, 0, 0),
            Err(PuzzleError::NotInLevel(_))
        ));
        assert!(matches!(
            puzzle.add_gem("GREEN", 0, 0),
            Err(PuzzleError::NotInLevel(_))
        ));
    }

    #[test]
    fn test_rotate_about_center() {
        let mut puzzle = normal(4);
        let id = puzzle.add_gem(names::RED, 3, 4).unwrap();
        // 3x1 at (3,4) has center (4.5, 4.5); 1x3 around it starts at (4, 3)
        puzzle.rotate_gem(id).unwrap();
        let gem = puzzle.player_gem(id).unwrap();
        assert_eq!(gem.size(), IVec2::new(1, 3));
        assert_eq!(gem.anchor, IVec2::new(4, 3));

        // Back to 3x1: center (4.5, 4.5) again
        puzzle.rotate_gem(id).unwrap();
        assert_eq!(puzzle.player_gem(id).unwrap().anchor, IVec2::new(3, 4));

        // Near the edge the result is clamped
        let blue = puzzle.add_gem(names::BLUE, 4, 8).unwrap();
        puzzle.rotate_gem(blue).unwrap();
        let gem = puzzle.player_gem(blue).unwrap();
        assert_eq!(gem.size(), IVec2::new(2, 4));
        assert_eq!(gem.anchor, IVec2::new(5, 6));
    }

    #[test]
    fn test_flip_symmetric_gem_is_noop() {
        let mut puzzle = normal(5);
        let id = puzzle.add_gem(names::WHITE_DIAMOND, 2, 2).unwrap();
        let before = puzzle.player_gem(id).unwrap().clone();
        assert!(!puzzle.flip_gem(id).unwrap());
        assert_eq!(puzzle.player_gem(id).unwrap(), &before);

        let red = puzzle.add_gem(names::RED, 2, 6).unwrap();
        assert!(puzzle.flip_gem(red).unwrap());
        assert!(puzzle.player_gem(red).unwrap().flipped);
    }

    #[test]
    fn test_validity_tracks_edits() {
        let mut puzzle = normal(6);
        let a = puzzle.add_gem(names::RED, 0, 0).unwrap();
        let b = puzzle.add_gem(names::YELLOW, 1, 0).unwrap();
        assert!(!puzzle.player_gem(a).unwrap().valid);
        assert!(!puzzle.player_gem(b).unwrap().valid);

        puzzle.move_gem(b, 5, 5).unwrap();
        assert!(puzzle.player_gem(a).unwrap().valid);
        assert!(puzzle.player_gem(b).unwrap().valid);

        let candidate = puzzle.player_gem(a).unwrap().clone();
        let mut clash = candidate.clone();
        clash.id = 99;
        assert!(!puzzle.can_place(&clash));
        assert!(puzzle.can_place(&candidate));

        puzzle.remove_gem(a).unwrap();
        assert!(matches!(puzzle.remove_gem(a), Err(PuzzleError::UnknownId(_))));
    }

    #[test]
    fn test_copying_secret_solves() {
        let mut puzzle = normal(7);
        copy_secret(&mut puzzle);
        assert!(puzzle.can_check());
        assert!(puzzle.check_solution().unwrap());
        assert_eq!(puzzle.phase(), PuzzlePhase::Solved);
        assert!(matches!(puzzle.probe_id("T1"), Err(PuzzleError::NotPlaying)));
    }

    #[test]
    fn test_incomplete_submission_is_refused() {
        let mut puzzle = normal(8);
        puzzle.add_gem(names::RED, 0, 0).unwrap();
        assert!(matches!(puzzle.check_solution(), Err(PuzzleError::Incomplete)));
        assert_eq!(puzzle.phase(), PuzzlePhase::Playing);
    }

    #[test]
    fn test_give_up() {
        let mut puzzle = normal(9);
        puzzle.probe_id("L3").unwrap();
        puzzle.give_up();
        assert_eq!(puzzle.phase(), PuzzlePhase::GaveUp);
        assert!(matches!(puzzle.add_gem(names::RED, 0, 0), Err(PuzzleError::NotPlaying)));
        assert_eq!(puzzle.rating(), 1);
    }

    #[test]
    fn test_rating_follows_probe_count() {
        let mut puzzle = normal(10);
        for _ in 0..11 {
            puzzle.probe_id("T1").unwrap();
        }
        assert_eq!(puzzle.rating(), 2);
    }

    #[test]
    fn test_custom_puzzle() {
        let mut level = CustomLevel::new();
        level.add(GemColor::Red, &ShapeTemplate::Bar).unwrap();
        level.add(GemColor::Yellow, &ShapeTemplate::Small).unwrap();
        level.add(GemColor::Blue, &ShapeTemplate::Square).unwrap();
        level.add(GemColor::White, &ShapeTemplate::SmallTriangle).unwrap();
        level.add(GemColor::Black, &ShapeTemplate::Absorber).unwrap();

        let mut puzzle = Puzzle::from_custom(Settings::default(), level, 11).unwrap();
        assert_eq!(puzzle.settings().difficulty, Difficulty::Custom);
        assert_eq!(puzzle.secret().len(), 5);

        let hole = puzzle.secret().iter().find(|p| p.absorbs).unwrap().clone();
        assert!(hole.gem.starts_with("CUSTOM_BLACK_ABSORBER_"));

        for emitter in Emitter::all(puzzle.settings().board()) {
            let record = puzzle.probe(emitter).unwrap();
            if record.secret.exit == Exit::Absorbed {
                assert!(record.secret.absorbed);
                assert!(record.secret.colors.is_empty());
            }
        }
        assert_eq!(puzzle.probe_count(), 36);
    }

    #[test]
    fn test_invalid_custom_level() {
        let mut level = CustomLevel::new();
        level.add(GemColor::Red, &ShapeTemplate::Bar).unwrap();
        assert!(matches!(
            Puzzle::from_custom(Settings::default(), level, 1),
            Err(PuzzleError::CustomLevel(_))
        ));
    }

    #[test]
    fn test_generation_failure_propagates() {
        let settings = Settings {
            width: 2,
            height: 2,
            layout_attempts: 2,
            gem_attempts: 2,
            ..Settings::default()
        };
        assert!(matches!(
            Puzzle::from_difficulty(settings, 1),
            Err(PuzzleError::Generate(GenerateError::Exhausted { attempts: 2 }))
        ));
    }

    #[test]
    fn test_oversized_board_is_rejected() {
        let settings = Settings {
            width: 70_000,
            height: 70_000,
            difficulty: Difficulty::Training,
            ..Settings::default()
        };
        assert!(matches!(
            Puzzle::from_difficulty(settings, 1),
            Err(PuzzleError::Settings(SettingsError::InvalidBoard { .. }))
        ));
    }
}
