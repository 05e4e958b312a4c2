//! Base colors and the mixing table
//!
//! A ray collects the base colors of every gem it touches. The collected set
//! is reduced to one display color through a closed table keyed by the sorted,
//! comma-joined base color names (`"BLUE,RED"` is purple).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Elemental gem colors. Variant order matches the lexical order of the names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BaseColor {
    Blue,
    Red,
    White,
    Yellow,
}

impl BaseColor {
    pub const ALL: [BaseColor; 4] = [
        BaseColor::Blue,
        BaseColor::Red,
        BaseColor::White,
        BaseColor::Yellow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseColor::Blue => "BLUE",
            BaseColor::Red => "RED",
            BaseColor::White => "WHITE",
            BaseColor::Yellow => "YELLOW",
        }
    }
}

/// A set of base colors, always iterated in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorSet(BTreeSet<BaseColor>);

impl ColorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, color: BaseColor) -> bool {
        self.0.insert(color)
    }

    pub fn extend(&mut self, other: &ColorSet) {
        self.0.extend(other.iter());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, color: BaseColor) -> bool {
        self.0.contains(&color)
    }

    pub fn iter(&self) -> impl Iterator<Item = BaseColor> + '_ {
        self.0.iter().copied()
    }

    /// Canonical mixing key: sorted names joined by commas, empty for no color
    pub fn key(&self) -> String {
        self.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(",")
    }

    /// Display color for this combination
    pub fn mixed(&self) -> MixedColor {
        mix(&self.key())
    }
}

impl FromIterator<BaseColor> for ColorSet {
    fn from_iter<I: IntoIterator<Item = BaseColor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[BaseColor; N]> for ColorSet {
    fn from(colors: [BaseColor; N]) -> Self {
        colors.into_iter().collect()
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A display color with a human-readable name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MixedColor {
    pub hex: &'static str,
    pub name: &'static str,
}

impl MixedColor {
    const fn new(hex: &'static str, name: &'static str) -> Self {
        Self { hex, name }
    }
}

/// Ray that touched no colored gem
pub const COLORLESS: MixedColor = MixedColor::new("#95a5a6", "colorless");
/// Ray that ended in an absorbing gem
pub const ABSORBED: MixedColor = MixedColor::new("#17202a", "absorbed");
/// Key outside the closed table (only reachable with a foreign color alphabet)
pub const UNKNOWN_MIXTURE: MixedColor = MixedColor::new("#ff00ff", "unknown mixture");

/// Look up a mixing key as produced by [`ColorSet::key`]
pub fn mix(key: &str) -> MixedColor {
    match key {
        "" => COLORLESS,
        "BLUE" => MixedColor::new("#3498db", "blue"),
        "RED" => MixedColor::new("#e74c3c", "red"),
        "WHITE" => MixedColor::new("#ecf0f1", "white"),
        "YELLOW" => MixedColor::new("#f1c40f", "yellow"),
        "BLUE,RED" => MixedColor::new("#9b59b6", "purple"),
        "BLUE,WHITE" => MixedColor::new("#5dade2", "sky blue"),
        "BLUE,YELLOW" => MixedColor::new("#2ecc71", "green"),
        "RED,WHITE" => MixedColor::new("#ff8a80", "light red"),
        "RED,YELLOW" => MixedColor::new("#e67e22", "orange"),
        "WHITE,YELLOW" => MixedColor::new("#ffff8d", "light yellow"),
        "BLUE,RED,WHITE" => MixedColor::new("#ba68c8", "light purple"),
        "BLUE,RED,YELLOW" => MixedColor::new("#34495e", "dark gray"),
        "BLUE,WHITE,YELLOW" => MixedColor::new("#81c784", "light green"),
        "RED,WHITE,YELLOW" => MixedColor::new("#ffb74d", "light orange"),
        "BLUE,RED,WHITE,YELLOW" => MixedColor::new("#9e9e9e", "gray"),
        _ => UNKNOWN_MIXTURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_sorted() {
        let set: ColorSet = [BaseColor::Yellow, BaseColor::Blue, BaseColor::Red].into();
        assert_eq!(set.key(), "BLUE,RED,YELLOW");
        assert_eq!(ColorSet::new().key(), "");
    }

    #[test]
    fn test_every_subset_is_in_table() {
        // 15 non-empty subsets of the 4 base colors
        let mut names = Vec::new();
        for mask in 1u8..16 {
            let set: ColorSet = BaseColor::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, c)| c)
                .collect();
            let mixed = set.mixed();
            assert_ne!(mixed, UNKNOWN_MIXTURE, "{}", set.key());
            assert_ne!(mixed, COLORLESS);
            names.push(mixed.name);
        }
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 15);
    }

    #[test]
    fn test_empty_and_unknown_keys() {
        assert_eq!(mix(""), COLORLESS);
        assert_eq!(mix("GREEN"), UNKNOWN_MIXTURE);
        assert_eq!(mix("RED,BLUE"), UNKNOWN_MIXTURE); // not canonical
    }

    #[test]
    fn test_insert_dedups() {
        let mut set = ColorSet::new();
        assert!(set.insert(BaseColor::Red));
        assert!(!set.insert(BaseColor::Red));
        assert_eq!(set.len(), 1);
        assert_eq!(set.mixed().name, "red");
    }

    #[test]
    fn test_serde_names() {
        let set: ColorSet = [BaseColor::White, BaseColor::Blue].into();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["BLUE","WHITE"]"#);
    }
}
