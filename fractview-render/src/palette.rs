use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RenderError;

/// Largest palette the fragment program's `palette` uniform array can hold.
pub const MAX_PALETTE_COLORS: usize = 10;

/// Name of the palette active at startup.
pub const DEFAULT_PALETTE: &str = "Classic";

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// An ordered list of 8-bit RGB colors, interpolated across by the coloring
/// function of the fragment program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    name: String,
    colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Build a palette with 1 to [`MAX_PALETTE_COLORS`] colors.
    pub fn new(name: impl Into<String>, colors: Vec<[u8; 3]>) -> crate::Result<Self> {
        let name = name.into();
        if colors.is_empty() || colors.len() > MAX_PALETTE_COLORS {
            return Err(RenderError::InvalidPalette {
                reason: format!(
                    "{} colors (expected 1..={MAX_PALETTE_COLORS})",
                    colors.len()
                ),
                name,
            });
        }
        Ok(Self { name, colors })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors scaled to `[0, 1]`, ready for a `vec3` uniform array.
    pub fn normalized(&self) -> Vec<[f32; 3]> {
        self.colors
            .iter()
            .map(|c| [c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0])
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        classic()
    }
}

/// On-disk form; validated through [`Palette::new`].
#[derive(Deserialize)]
struct PaletteFile {
    name: String,
    colors: Vec<[u8; 3]>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Named palettes in insertion order.
#[derive(Debug, Clone)]
pub struct PaletteStore {
    palettes: Vec<Palette>,
}

impl PaletteStore {
    pub fn empty() -> Self {
        Self {
            palettes: Vec::new(),
        }
    }

    pub fn with_builtins() -> Self {
        Self {
            palettes: builtin_palettes(),
        }
    }

    pub fn get(&self, name: &str) -> crate::Result<&Palette> {
        self.palettes
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| RenderError::PaletteNotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.palettes.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Add a palette, replacing any existing palette with the same name.
    pub fn insert(&mut self, palette: Palette) {
        match self.palettes.iter_mut().find(|p| p.name == palette.name) {
            Some(existing) => {
                debug!(name = %palette.name, "Replacing palette");
                *existing = palette;
            }
            None => self.palettes.push(palette),
        }
    }

    /// Add custom palettes from a JSON array of `{"name": .., "colors": [[r,g,b], ..]}`.
    ///
    /// Either all palettes in the document are added or none are.
    pub fn add_from_json(&mut self, json: &str) -> crate::Result<usize> {
        let files: Vec<PaletteFile> =
            serde_json::from_str(json).map_err(|e| RenderError::InvalidPalette {
                name: "<json>".to_string(),
                reason: e.to_string(),
            })?;
        let palettes = files
            .into_iter()
            .map(|f| Palette::new(f.name, f.colors))
            .collect::<crate::Result<Vec<_>>>()?;
        let count = palettes.len();
        for p in palettes {
            self.insert(p);
        }
        info!("Loaded {count} custom palette(s)");
        Ok(count)
    }
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ---------------------------------------------------------------------------
// Built-in palettes
// ---------------------------------------------------------------------------

/// Return all built-in palettes, default first.
pub fn builtin_palettes() -> Vec<Palette> {
    vec![
        classic(),
        fiery_nebula(),
        arctic_ice(),
        psychedelic_trip(),
        royal_gold(),
        forest_floor(),
        grayscale(),
    ]
}

fn builtin(name: &str, colors: &[[u8; 3]]) -> Palette {
    // Built-in tables are all within 1..=MAX_PALETTE_COLORS.
    Palette {
        name: name.to_string(),
        colors: colors.to_vec(),
    }
}

fn classic() -> Palette {
    builtin(
        "Classic",
        &[
            [255, 255, 255],
            [224, 224, 224],
            [192, 192, 192],
            [160, 160, 160],
            [128, 128, 128],
            [96, 96, 96],
            [64, 64, 64],
            [32, 32, 32],
            [0, 0, 0],
        ],
    )
}

fn fiery_nebula() -> Palette {
    builtin(
        "Fiery Nebula",
        &[
            [0, 0, 0],
            [25, 7, 26],
            [139, 0, 0],
            [255, 69, 0],
            [255, 140, 0],
            [255, 165, 0],
            [255, 215, 0],
            [255, 255, 0],
            [255, 255, 224],
            [255, 255, 255],
        ],
    )
}

fn arctic_ice() -> Palette {
    builtin(
        "Arctic Ice",
        &[
            [0, 0, 0],
            [7, 25, 42],
            [14, 49, 81],
            [20, 74, 121],
            [48, 120, 179],
            [100, 164, 218],
            [154, 209, 255],
            [200, 230, 255],
            [230, 245, 255],
            [255, 255, 255],
        ],
    )
}

fn psychedelic_trip() -> Palette {
    builtin(
        "Psychedelic Trip",
        &[
            [255, 0, 255],
            [148, 0, 211],
            [75, 0, 130],
            [0, 0, 255],
            [0, 255, 0],
            [255, 255, 0],
            [255, 127, 0],
            [255, 0, 0],
        ],
    )
}

fn royal_gold() -> Palette {
    builtin(
        "Royal Gold",
        &[
            [19, 11, 36],
            [45, 20, 60],
            [87, 39, 87],
            [145, 78, 109],
            [203, 128, 131],
            [244, 181, 153],
            [255, 217, 169],
            [255, 239, 192],
            [240, 240, 240],
        ],
    )
}

fn forest_floor() -> Palette {
    builtin(
        "Forest Floor",
        &[
            [20, 30, 10],
            [34, 52, 23],
            [53, 75, 34],
            [87, 101, 48],
            [130, 125, 64],
            [101, 67, 33],
            [60, 41, 20],
            [30, 20, 10],
        ],
    )
}

fn grayscale() -> Palette {
    builtin(
        "Grayscale",
        &[
            [0, 0, 0],
            [32, 32, 32],
            [64, 64, 64],
            [96, 96, 96],
            [128, 128, 128],
            [160, 160, 160],
            [192, 192, 192],
            [224, 224, 224],
            [255, 255, 255],
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid_and_unique() {
        let store = PaletteStore::with_builtins();
        assert_eq!(store.len(), 7);
        let names: Vec<&str> = store.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
        for p in builtin_palettes() {
            assert!(!p.is_empty() && p.len() <= MAX_PALETTE_COLORS, "{}", p.name());
        }
        assert_eq!(names[0], DEFAULT_PALETTE);
    }

    #[test]
    fn normalized_is_unit_range() {
        let p = PaletteStore::with_builtins().get("Fiery Nebula").unwrap().clone();
        let n = p.normalized();
        assert_eq!(n.len(), 10);
        assert_eq!(n[0], [0.0, 0.0, 0.0]);
        assert_eq!(n[9], [1.0, 1.0, 1.0]);
        assert!(n.iter().flatten().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(matches!(
            Palette::new("none", vec![]),
            Err(RenderError::InvalidPalette { .. })
        ));
        assert!(Palette::new("big", vec![[0, 0, 0]; 11]).is_err());
        assert!(Palette::new("ten", vec![[0, 0, 0]; 10]).is_ok());
    }

    #[test]
    fn unknown_name_is_not_found() {
        let store = PaletteStore::default();
        assert!(matches!(
            store.get("Nope"),
            Err(RenderError::PaletteNotFound(n)) if n == "Nope"
        ));
    }

    #[test]
    fn json_palettes_are_added_or_replaced() {
        let mut store = PaletteStore::with_builtins();
        let json = r#"[
            {"name": "Sunset", "colors": [[255, 94, 77], [255, 195, 113]]},
            {"name": "Classic", "colors": [[1, 2, 3]]}
        ]"#;
        assert_eq!(store.add_from_json(json).unwrap(), 2);
        assert_eq!(store.len(), 8);
        assert_eq!(store.get("Classic").unwrap().colors(), &[[1, 2, 3]]);
        assert_eq!(store.get("Sunset").unwrap().len(), 2);
    }

    #[test]
    fn invalid_json_palette_adds_nothing() {
        let mut store = PaletteStore::with_builtins();
        let json = r#"[
            {"name": "Ok", "colors": [[0, 0, 0]]},
            {"name": "Empty", "colors": []}
        ]"#;
        assert!(store.add_from_json(json).is_err());
        assert!(store.add_from_json("not json").is_err());
        assert_eq!(store.len(), 7);
        assert!(store.get("Ok").is_err());
    }
}
