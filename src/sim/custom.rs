//! Custom level builder
//!
//! A custom level is a hand-picked list of gems, each a color paired with a
//! shape. The list must satisfy a fixed set of composition rules before it
//! can be turned into a catalog for a puzzle.

use thiserror::Error;

use super::cell::CellKind::*;
use super::color::{BaseColor, ColorSet};
use super::gem::{GemCatalog, GemDef, hex};
use super::pattern::Pattern;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustomLevelError {
    #[error("designed shape has no filled cells")]
    EmptyDesign,
    #[error("exactly one {} gem is required, found {found}", color.as_str())]
    ExactlyOne { color: GemColor, found: usize },
    #[error("at least one white gem is required")]
    NoWhite,
    #[error("at most {max} {} gems are allowed, found {found}", color.as_str())]
    TooMany {
        color: GemColor,
        max: usize,
        found: usize,
    },
    #[error("a custom level needs at least one gem")]
    Empty,
}

/// Color choice for a custom gem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemColor {
    Red,
    Yellow,
    Blue,
    White,
    Transparent,
    /// Absorbs rays; every filled cell becomes an absorbing cell
    Black,
}

impl GemColor {
    pub const ALL: [GemColor; 6] = [
        GemColor::Red,
        GemColor::Yellow,
        GemColor::Blue,
        GemColor::White,
        GemColor::Transparent,
        GemColor::Black,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GemColor::Red => "RED",
            GemColor::Yellow => "YELLOW",
            GemColor::Blue => "BLUE",
            GemColor::White => "WHITE",
            GemColor::Transparent => "TRANSPARENT",
            GemColor::Black => "BLACK",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            GemColor::Red => hex::RED,
            GemColor::Yellow => hex::YELLOW,
            GemColor::Blue => hex::BLUE,
            GemColor::White => hex::WHITE,
            GemColor::Transparent => hex::TRANSPARENT,
            GemColor::Black => hex::BLACK,
        }
    }

    pub fn base_colors(&self) -> ColorSet {
        match self {
            GemColor::Red => [BaseColor::Red].into(),
            GemColor::Yellow => [BaseColor::Yellow].into(),
            GemColor::Blue => [BaseColor::Blue].into(),
            GemColor::White => [BaseColor::White].into(),
            GemColor::Transparent | GemColor::Black => ColorSet::new(),
        }
    }
}

/// Shapes offered to custom gems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeTemplate {
    RightTriangle,
    Parallelogram,
    BigTriangle,
    Diamond,
    SmallTriangle,
    Absorber,
    L,
    T,
    Square,
    Bar,
    Small,
    /// Free-form shape drawn by the player
    Designed(Pattern),
}

impl ShapeTemplate {
    /// Every built-in shape
    pub fn presets() -> [ShapeTemplate; 11] {
        [
            ShapeTemplate::RightTriangle,
            ShapeTemplate::Parallelogram,
            ShapeTemplate::BigTriangle,
            ShapeTemplate::Diamond,
            ShapeTemplate::SmallTriangle,
            ShapeTemplate::Absorber,
            ShapeTemplate::L,
            ShapeTemplate::T,
            ShapeTemplate::Square,
            ShapeTemplate::Bar,
            ShapeTemplate::Small,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            ShapeTemplate::RightTriangle => "RTRIANGLE",
            ShapeTemplate::Parallelogram => "PARALLEL",
            ShapeTemplate::BigTriangle => "BIG_TRIANGLE",
            ShapeTemplate::Diamond => "DIAMOND",
            ShapeTemplate::SmallTriangle => "SMALL_TRIANGLE",
            ShapeTemplate::Absorber => "ABSORBER",
            ShapeTemplate::L => "L",
            ShapeTemplate::T => "T",
            ShapeTemplate::Square => "SQUARE",
            ShapeTemplate::Bar => "BAR",
            ShapeTemplate::Small => "SMALL",
            ShapeTemplate::Designed(_) => "DESIGN",
        }
    }

    /// Concrete pattern. Designed shapes are cropped and must not be blank.
    pub fn pattern(&self) -> Result<Pattern, CustomLevelError> {
        let pattern = match self {
            ShapeTemplate::RightTriangle => Pattern::from_array([[TriBL, Empty], [Block, TriBL]]),
            ShapeTemplate::Parallelogram => Pattern::from_array([[TriBR, Block, TriTL]]),
            ShapeTemplate::BigTriangle => Pattern::from_array([
                [Empty, TriBR, TriBL, Empty],
                [TriBR, Block, Block, TriBL],
            ]),
            ShapeTemplate::Diamond => Pattern::from_array([[TriBR, TriBL], [TriTR, TriTL]]),
            ShapeTemplate::SmallTriangle => Pattern::from_array([[TriBR, TriBL]]),
            ShapeTemplate::Absorber => Pattern::from_array([[Absorb, Absorb]]),
            ShapeTemplate::L => Pattern::from_array([[TriBR, TriBL], [Block, TriTL]]),
            ShapeTemplate::T => Pattern::from_array([
                [TriBR, Block, TriBL],
                [TriTR, Block, TriTL],
            ]),
            ShapeTemplate::Square => Pattern::from_array([[TriBR, Block], [Block, TriTL]]),
            ShapeTemplate::Bar => Pattern::from_array([[TriBL], [Block], [TriTL]]),
            ShapeTemplate::Small => Pattern::from_array([[TriTR, TriBL]]),
            ShapeTemplate::Designed(design) => {
                let cropped = design.crop();
                if cropped.is_blank() {
                    return Err(CustomLevelError::EmptyDesign);
                }
                cropped
            }
        };
        Ok(pattern)
    }
}

/// Gems chosen for a custom level, in placement order
#[derive(Debug, Clone, Default)]
pub struct CustomLevel {
    gems: Vec<(GemColor, GemDef)>,
    serial: u32,
}

impl CustomLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gem and return its definition
    pub fn add(&mut self, color: GemColor, shape: &ShapeTemplate) -> Result<&GemDef, CustomLevelError> {
        let pattern = shape.pattern()?;
        self.serial += 1;
        let name = format!("CUSTOM_{}_{}_{}", color.as_str(), shape.key(), self.serial);

        let def = match color {
            GemColor::Black => GemDef::absorbing(name, color.hex(), pattern.with_filled_as(Absorb)),
            _ => GemDef::new(name, color.hex(), color.base_colors(), pattern),
        };
        log::debug!("Custom gem added: {}", def.name);
        self.gems.push((color, def));
        Ok(&self.gems[self.gems.len() - 1].1)
    }

    /// Remove the gem at `index`
    pub fn remove(&mut self, index: usize) -> Option<GemDef> {
        (index < self.gems.len()).then(|| self.gems.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GemColor, &GemDef)> {
        self.gems.iter().map(|(c, d)| (*c, d))
    }

    fn count(&self, color: GemColor) -> usize {
        self.gems.iter().filter(|(c, _)| *c == color).count()
    }

    /// Check the composition rules, reporting the first one broken
    pub fn validate(&self) -> Result<(), CustomLevelError> {
        for color in [GemColor::Red, GemColor::Yellow, GemColor::Blue] {
            let found = self.count(color);
            if found != 1 {
                return Err(CustomLevelError::ExactlyOne { color, found });
            }
        }

        let white = self.count(GemColor::White);
        if white == 0 {
            return Err(CustomLevelError::NoWhite);
        }
        for (color, max, found) in [
            (GemColor::White, 2, white),
            (GemColor::Transparent, 2, self.count(GemColor::Transparent)),
            (GemColor::Black, 1, self.count(GemColor::Black)),
        ] {
            if found > max {
                return Err(CustomLevelError::TooMany { color, max, found });
            }
        }

        if self.is_empty() {
            return Err(CustomLevelError::Empty);
        }
        Ok(())
    }

    /// Validate and produce the catalog plus the ordered gem names to hide
    pub fn into_catalog(self) -> Result<(GemCatalog, Vec<String>), CustomLevelError> {
        self.validate()?;
        let mut catalog = GemCatalog::new();
        let mut names = Vec::with_capacity(self.gems.len());
        for (_, def) in self.gems {
            names.push(def.name.clone());
            catalog.insert(def);
        }
        log::info!("Custom level ready with {} gems", names.len());
        Ok((catalog, names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_level() -> CustomLevel {
        let mut level = CustomLevel::new();
        level.add(GemColor::Red, &ShapeTemplate::Parallelogram).unwrap();
        level.add(GemColor::Yellow, &ShapeTemplate::RightTriangle).unwrap();
        level.add(GemColor::Blue, &ShapeTemplate::T).unwrap();
        level.add(GemColor::White, &ShapeTemplate::Diamond).unwrap();
        level
    }

    #[test]
    fn test_presets_are_well_formed() {
        for shape in ShapeTemplate::presets() {
            let pattern = shape.pattern().unwrap();
            assert!(!pattern.is_blank(), "{}", shape.key());
            assert_eq!(pattern, pattern.crop(), "{}", shape.key());
        }
    }

    #[test]
    fn test_designed_shape_is_cropped() {
        let design = Pattern::from_array([
            [Empty, Empty, Empty],
            [Empty, Block, TriTL],
            [Empty, Empty, Empty],
        ]);
        let pattern = ShapeTemplate::Designed(design).pattern().unwrap();
        assert_eq!(pattern, Pattern::from_array([[Block, TriTL]]));

        let blank = ShapeTemplate::Designed(Pattern::from_array([[Empty, Empty]]));
        assert_eq!(blank.pattern(), Err(CustomLevelError::EmptyDesign));
    }

    #[test]
    fn test_black_gem_absorbs() {
        let mut level = CustomLevel::new();
        let def = level.add(GemColor::Black, &ShapeTemplate::L).unwrap();
        assert!(def.absorbs);
        assert!(def.base_colors.is_empty());
        assert!(def.pattern.filled().all(|(_, k)| k == Absorb));
        assert_eq!(def.pattern.filled().count(), 4);
        assert!(def.name.starts_with("CUSTOM_BLACK_L_"));
    }

    #[test]
    fn test_names_are_unique() {
        let mut level = CustomLevel::new();
        let a = level.add(GemColor::White, &ShapeTemplate::Bar).unwrap().name.clone();
        let b = level.add(GemColor::White, &ShapeTemplate::Bar).unwrap().name.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rules_in_order() {
        assert_eq!(
            CustomLevel::new().validate(),
            Err(CustomLevelError::ExactlyOne {
                color: GemColor::Red,
                found: 0
            })
        );

        let mut level = valid_level();
        assert_eq!(level.validate(), Ok(()));

        level.add(GemColor::Red, &ShapeTemplate::Small).unwrap();
        assert_eq!(
            level.validate(),
            Err(CustomLevelError::ExactlyOne {
                color: GemColor::Red,
                found: 2
            })
        );
        level.remove(4).unwrap();

        // Drop the white diamond
        level.remove(3).unwrap();
        assert_eq!(level.validate(), Err(CustomLevelError::NoWhite));

        for _ in 0..3 {
            level.add(GemColor::White, &ShapeTemplate::Small).unwrap();
        }
        assert!(matches!(
            level.validate(),
            Err(CustomLevelError::TooMany { color: GemColor::White, max: 2, found: 3 })
        ));
    }

    #[test]
    fn test_transparent_and_black_limits() {
        let mut level = valid_level();
        for _ in 0..3 {
            level.add(GemColor::Transparent, &ShapeTemplate::SmallTriangle).unwrap();
        }
        assert!(matches!(
            level.validate(),
            Err(CustomLevelError::TooMany { color: GemColor::Transparent, .. })
        ));

        let mut level = valid_level();
        level.add(GemColor::Black, &ShapeTemplate::Absorber).unwrap();
        assert_eq!(level.validate(), Ok(()));
        level.add(GemColor::Black, &ShapeTemplate::Absorber).unwrap();
        assert!(matches!(
            level.validate(),
            Err(CustomLevelError::TooMany { color: GemColor::Black, .. })
        ));
    }

    #[test]
    fn test_into_catalog() {
        let level = valid_level();
        let expected: Vec<String> = level.iter().map(|(_, d)| d.name.clone()).collect();
        let (catalog, names) = level.into_catalog().unwrap();
        assert_eq!(names, expected);
        assert_eq!(catalog.len(), 4);
        assert!(names.iter().all(|n| catalog.contains(n)));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut level = valid_level();
        assert!(level.remove(10).is_none());
        assert_eq!(level.len(), 4);
    }
}
