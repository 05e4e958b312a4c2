//! Gem definitions and placed gem instances

use std::collections::BTreeMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::cell::CellKind::{self, *};
use super::color::{BaseColor, ColorSet};
use super::pattern::{Pattern, PatternError};

/// Standard gem names
pub mod names {
    pub const YELLOW: &str = "YELLOW";
    pub const RED: &str = "RED";
    pub const BLUE: &str = "BLUE";
    pub const WHITE_DIAMOND: &str = "WHITE_DIAMOND";
    pub const WHITE_TRIANGLE: &str = "WHITE_TRIANGLE";
    pub const TRANSPARENT: &str = "TRANSPARENT";
    pub const BLACK: &str = "BLACK";
}

/// Display colors of the standard gems
pub mod hex {
    pub const YELLOW: &str = "#f1c40f";
    pub const RED: &str = "#e74c3c";
    pub const BLUE: &str = "#3498db";
    pub const WHITE: &str = "#ecf0f1";
    pub const TRANSPARENT: &str = "#95a5a6";
    pub const BLACK: &str = "#1d1d1d";
}

/// Immutable gem template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemDef {
    pub name: String,
    /// Display color (CSS hex)
    pub color: String,
    /// Colors added to a ray that touches this gem; empty for transparent and black gems
    pub base_colors: ColorSet,
    /// Rays that touch this gem stop
    #[serde(default)]
    pub absorbs: bool,
    /// Base orientation
    pub pattern: Pattern,
}

impl GemDef {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        base_colors: ColorSet,
        pattern: Pattern,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            base_colors,
            absorbs: false,
            pattern,
        }
    }

    /// A colorless gem that swallows rays
    pub fn absorbing(name: impl Into<String>, color: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            absorbs: true,
            ..Self::new(name, color, ColorSet::new(), pattern)
        }
    }

    /// Build from raw rows, failing on malformed shape data
    pub fn from_rows(
        name: impl Into<String>,
        color: impl Into<String>,
        base_colors: ColorSet,
        rows: Vec<Vec<CellKind>>,
    ) -> Result<Self, PatternError> {
        Ok(Self::new(name, color, base_colors, Pattern::new(rows)?))
    }

    /// Whether the base shape has a mirror image distinct from its rotations
    pub fn is_flippable(&self) -> bool {
        self.pattern.is_flippable()
    }
}

/// Named gem templates a level draws from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemCatalog {
    gems: BTreeMap<String, GemDef>,
}

impl GemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven shipped gems
    pub fn standard() -> Self {
        let big_triangle = Pattern::from_array([
            [Empty, TriBR, TriBL, Empty],
            [TriBR, Block, Block, TriBL],
        ]);

        let mut catalog = Self::new();
        // Right triangle in a 2x2 box
        catalog.insert(GemDef::new(
            names::YELLOW,
            hex::YELLOW,
            [BaseColor::Yellow].into(),
            Pattern::from_array([[TriBL, Empty], [Block, TriBL]]),
        ));
        // Parallelogram, 3x1
        catalog.insert(GemDef::new(
            names::RED,
            hex::RED,
            [BaseColor::Red].into(),
            Pattern::from_array([[TriBR, Block, TriTL]]),
        ));
        // Isosceles triangle, base 4 height 2
        catalog.insert(GemDef::new(
            names::BLUE,
            hex::BLUE,
            [BaseColor::Blue].into(),
            big_triangle.clone(),
        ));
        catalog.insert(GemDef::new(
            names::WHITE_DIAMOND,
            hex::WHITE,
            [BaseColor::White].into(),
            Pattern::from_array([[TriBR, TriBL], [TriTR, TriTL]]),
        ));
        catalog.insert(GemDef::new(
            names::WHITE_TRIANGLE,
            hex::WHITE,
            [BaseColor::White].into(),
            big_triangle,
        ));
        // Small triangle, base 2 height 1
        catalog.insert(GemDef::new(
            names::TRANSPARENT,
            hex::TRANSPARENT,
            ColorSet::new(),
            Pattern::from_array([[TriBR, TriBL]]),
        ));
        catalog.insert(GemDef::absorbing(
            names::BLACK,
            hex::BLACK,
            Pattern::from_array([[Absorb, Absorb]]),
        ));
        catalog
    }

    /// Add or replace a definition
    pub fn insert(&mut self, def: GemDef) {
        self.gems.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&GemDef> {
        self.gems.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.gems.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GemDef> {
        self.gems.values()
    }
}

/// A gem instance on the board
///
/// The pattern is always the definition's base pattern oriented by
/// `flipped` then `quarter_turns`; moving or turning replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Unique within one layout
    pub id: u32,
    /// Definition name
    pub gem: String,
    /// Top-left of the bounding box
    pub anchor: IVec2,
    pub quarter_turns: u8,
    pub flipped: bool,
    pub pattern: Pattern,
    /// Copied from the definition so a layout is self-contained
    pub base_colors: ColorSet,
    pub absorbs: bool,
    /// Result of the last placement check
    #[serde(default)]
    pub valid: bool,
}

impl Placement {
    /// Place `def` in its base orientation
    pub fn new(id: u32, def: &GemDef, anchor: IVec2) -> Self {
        Self::oriented(id, def, anchor, 0, false)
    }

    pub fn oriented(id: u32, def: &GemDef, anchor: IVec2, quarter_turns: u8, flipped: bool) -> Self {
        let quarter_turns = quarter_turns % 4;
        Self {
            id,
            gem: def.name.clone(),
            anchor,
            quarter_turns,
            flipped,
            pattern: def.pattern.oriented(quarter_turns, flipped),
            base_colors: def.base_colors.clone(),
            absorbs: def.absorbs,
            valid: false,
        }
    }

    /// Bounding box size (width, height)
    #[inline]
    pub fn size(&self) -> IVec2 {
        self.pattern.size()
    }

    /// Exclusive bottom-right corner of the bounding box
    #[inline]
    pub fn max(&self) -> IVec2 {
        self.anchor + self.size()
    }

    /// Board coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, CellKind)> + '_ {
        self.pattern
            .filled()
            .map(move |(offset, kind)| (self.anchor + offset, kind))
    }

    /// Turn 90° clockwise in place, keeping the anchor
    pub fn rotate_cw(&mut self) {
        self.quarter_turns = (self.quarter_turns + 1) % 4;
        self.pattern = self.pattern.rotate_cw();
    }

    /// Mirror in place, keeping the anchor.
    ///
    /// Mirroring after `k` turns equals turning `-k` times after mirroring,
    /// so the stored orientation stays in flip-then-rotate form.
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
        self.quarter_turns = (4 - self.quarter_turns) % 4;
        self.pattern = self.pattern.flip_horizontal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = GemCatalog::standard();
        assert_eq!(catalog.len(), 7);

        let black = catalog.get(names::BLACK).unwrap();
        assert!(black.absorbs);
        assert!(black.base_colors.is_empty());

        let clear = catalog.get(names::TRANSPARENT).unwrap();
        assert!(!clear.absorbs);
        assert!(clear.base_colors.is_empty());

        let red = catalog.get(names::RED).unwrap();
        assert!(red.base_colors.contains(BaseColor::Red));
        assert_eq!(red.pattern.size(), IVec2::new(3, 1));
        assert!(red.is_flippable());

        assert!(!catalog.get(names::WHITE_DIAMOND).unwrap().is_flippable());
        assert!(catalog.get("GREEN").is_none());
    }

    #[test]
    fn test_from_rows_rejects_jagged() {
        let err = GemDef::from_rows("BAD", "#000", ColorSet::new(), vec![vec![Block], vec![]]);
        assert!(matches!(err, Err(PatternError::Jagged { .. })));
    }

    #[test]
    fn test_placement_cells_are_offset_by_anchor() {
        let catalog = GemCatalog::standard();
        let p = Placement::new(1, catalog.get(names::RED).unwrap(), IVec2::new(2, 5));
        let cells: Vec<_> = p.cells().collect();
        assert_eq!(
            cells,
            vec![
                (IVec2::new(2, 5), TriBR),
                (IVec2::new(3, 5), Block),
                (IVec2::new(4, 5), TriTL)
            ]
        );
        assert_eq!(p.max(), IVec2::new(5, 6));
    }

    #[test]
    fn test_flip_keeps_orientation_consistent() {
        let catalog = GemCatalog::standard();
        let def = catalog.get(names::YELLOW).unwrap();
        let mut p = Placement::oriented(1, def, IVec2::ZERO, 1, false);
        p.flip();
        assert_eq!(p.pattern, def.pattern.oriented(p.quarter_turns, p.flipped));
        p.rotate_cw();
        assert_eq!(p.pattern, def.pattern.oriented(p.quarter_turns, p.flipped));
        p.flip();
        assert_eq!(p.pattern, def.pattern.oriented(p.quarter_turns, p.flipped));
    }
}
