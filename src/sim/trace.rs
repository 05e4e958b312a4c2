//! Light ray tracing
//!
//! A ray starts just outside the board at an emitter and advances one cell per
//! step. It leaves when it steps off the board, stops on an absorbing cell, or
//! gives up after a fixed number of steps.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::color::{self, ColorSet, MixedColor};
use super::emitter::Emitter;
use super::optics::{Reflection, reflect};
use crate::cell_center;

/// How a ray ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Exit {
    /// Left the board at this emitter
    Emitter(Emitter),
    /// Stopped by an absorbing gem
    Absorbed,
    /// Still on the board after the step bound
    Undetermined,
    /// Launched from an emitter that does not exist on this board
    Invalid,
}

impl Exit {
    const ABSORBED: &'static str = "Absorbed";
    const UNDETERMINED: &'static str = "Loop?";
    const INVALID: &'static str = "Error";

    pub fn emitter(&self) -> Option<Emitter> {
        match self {
            Exit::Emitter(e) => Some(*e),
            _ => None,
        }
    }
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exit::Emitter(e) => write!(f, "{e}"),
            Exit::Absorbed => f.write_str(Self::ABSORBED),
            Exit::Undetermined => f.write_str(Self::UNDETERMINED),
            Exit::Invalid => f.write_str(Self::INVALID),
        }
    }
}

impl TryFrom<String> for Exit {
    type Error = super::emitter::EmitterParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            Self::ABSORBED => Ok(Exit::Absorbed),
            Self::UNDETERMINED => Ok(Exit::Undetermined),
            Self::INVALID => Ok(Exit::Invalid),
            id => id.parse().map(Exit::Emitter),
        }
    }
}

impl From<Exit> for String {
    fn from(exit: Exit) -> Self {
        exit.to_string()
    }
}

/// Everything observable about one ray
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    pub exit: Exit,
    /// Polyline in board units: entry edge, each struck cell center, exit edge
    pub path: Vec<Vec2>,
    /// Base colors of every gem touched (empty when absorbed)
    pub colors: ColorSet,
    pub absorbed: bool,
}

impl TraceResult {
    fn ended(exit: Exit, path: Vec<Vec2>, colors: ColorSet) -> Self {
        Self {
            exit,
            path,
            colors,
            absorbed: exit == Exit::Absorbed,
        }
    }

    /// Sorted color key used for comparisons
    pub fn color_key(&self) -> String {
        self.colors.key()
    }

    /// Color to show for this ray
    pub fn display_color(&self) -> MixedColor {
        if self.absorbed {
            color::ABSORBED
        } else {
            self.colors.mixed()
        }
    }

    /// Same exit and same colors; the path is not compared
    pub fn same_outcome(&self, other: &TraceResult) -> bool {
        self.exit == other.exit && self.color_key() == other.color_key()
    }
}

/// Trace one ray from `emitter` across `board`
pub fn trace(board: &Board, emitter: Emitter, max_steps: u32) -> TraceResult {
    let size = board.size();
    let Some((mut pos, mut dir)) = emitter.origin(size) else {
        log::warn!("Emitter {emitter} does not exist on a {}x{} board", size.x, size.y);
        return TraceResult::ended(Exit::Invalid, Vec::new(), ColorSet::new());
    };
    let mut path = vec![cell_center(pos) + dir.step().as_vec2() * 0.5];
    let mut colors = ColorSet::new();
    // Each gem tints the ray at most once, however many of its cells are hit
    let mut touched = vec![false; board.owner_count()];

    for _ in 0..max_steps {
        pos += dir.step();

        if !board.contains(pos) {
            path.push(cell_center(pos) - dir.step().as_vec2() * 0.5);
            let exit = Emitter::at_exit(pos, size).map_or(Exit::Undetermined, Exit::Emitter);
            return TraceResult::ended(exit, path, colors);
        }

        let kind = board.get(pos);
        if kind.is_empty() {
            continue;
        }
        path.push(cell_center(pos));

        if let Some(slot) = board.owner_slot(pos) {
            if !touched[slot] {
                touched[slot] = true;
                if let Some(tint) = board.owner_colors(pos) {
                    colors.extend(tint);
                }
            }
        }

        match reflect(kind, dir) {
            Reflection::Absorbed => {
                return TraceResult::ended(Exit::Absorbed, path, ColorSet::new());
            }
            Reflection::PassThrough => {}
            Reflection::Turn(next) => dir = next,
        }
    }

    log::debug!("Ray from {emitter} still on the board after {max_steps} steps");
    TraceResult::ended(Exit::Undetermined, path, colors)
}

/// Trace every emitter on the board, in [`Emitter::all`] order
pub fn trace_all(board: &Board, max_steps: u32) -> Vec<(Emitter, TraceResult)> {
    Emitter::all(board.size())
        .into_iter()
        .map(|e| (e, trace(board, e, max_steps)))
        .collect()
}

/// True if every emitter gives the same exit and colors on both boards
pub fn all_emitters_match(secret: &Board, player: &Board, max_steps: u32) -> bool {
    if secret.size() != player.size() {
        return false;
    }
    Emitter::all(secret.size()).into_iter().all(|emitter| {
        let expected = trace(secret, emitter, max_steps);
        let actual = trace(player, emitter, max_steps);
        let same = expected.same_outcome(&actual);
        if !same {
            log::debug!(
                "Mismatch at {emitter}: expected {} [{}], got {} [{}]",
                expected.exit,
                expected.color_key(),
                actual.exit,
                actual.color_key()
            );
        }
        same
    })
}
