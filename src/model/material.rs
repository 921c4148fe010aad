//! Material identities and the per-run registry
//!
//! A [`Material`] is an identity (unique name) plus display properties used
//! by external plotting/export collaborators. Materials carry no behavior
//! beyond lookup.
//!
//! The [`MaterialRegistry`] is an explicitly passed, immutable value: one
//! registry per run, no process-wide defaults. The registry's insertion
//! order is stable and drives the index layout of every per-material vector
//! in the simulation result, so "material 0" means the same thing in the
//! flow series, the composition series and the belt occupancy matrix.

use std::fmt;

// =================================================================================================
// Display Color
// =================================================================================================

/// RGB display color for a material
///
/// Used by external plotting collaborators; the simulation core itself never
/// interprets it. Round-trips through the `#RRGGBB` hex form commonly found
/// in case files.
///
/// # Example
///
/// ```rust
/// use belt_rs::model::Color;
///
/// let rust_red = Color::new(178, 34, 34);
/// assert_eq!(rust_red.to_string(), "#B22222");
/// assert_eq!(Color::from_hex("#B22222"), Some(rust_red));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from RGB components
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string
    ///
    /// Returns `None` for malformed input.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;

        Some(Self { r, g, b })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

// =================================================================================================
// Material
// =================================================================================================

/// A material handled by the plant
///
/// Identity is the unique `name`; silos reference materials by name. A
/// material is immutable once any silo references it.
///
/// # Example
///
/// ```rust
/// use belt_rs::model::{Color, Material};
///
/// let ore = Material::new("Iron Ore", Color::new(139, 69, 19))
///     .with_description("High-grade iron ore");
/// assert_eq!(ore.name(), "Iron Ore");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    color: Color,
    description: Option<String>,
}

impl Material {
    /// Create a material with a name and display color
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            description: None,
        }
    }

    /// Builder pattern: attach a free-text description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Unique material name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Optional description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

// =================================================================================================
// Material Registry
// =================================================================================================

/// Immutable per-run material registry
///
/// Holds the materials in a stable order. Index positions returned by
/// [`index_of`](MaterialRegistry::index_of) are the row indices of every
/// per-material vector and matrix produced by the engine.
///
/// # Design
///
/// The registry is a plain value passed into each run. There is no shared
/// default list and no interior mutability; two runs with the same registry
/// value see the same material layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    /// Create a registry from a list of materials
    ///
    /// Name uniqueness is checked by the validator, not here; registry
    /// construction never fails.
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    /// Number of registered materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials in registry order
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material names in registry order
    pub fn names(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.name()).collect()
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name() == name)
    }

    /// Stable index of a material name, if registered
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name() == name)
    }

    /// Check whether a name resolves in this registry
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::new(18, 52, 86);
        assert_eq!(color.to_string(), "#123456");
        assert_eq!(Color::from_hex("#123456"), Some(color));
        assert_eq!(Color::from_hex("123456"), Some(color));
    }

    #[test]
    fn test_color_from_hex_rejects_malformed() {
        assert_eq!(Color::from_hex(""), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#12345G"), None);
        assert_eq!(Color::from_hex("#1234567"), None);
    }

    #[test]
    fn test_material_accessors() {
        let material = Material::new("Limestone", Color::new(200, 200, 190))
            .with_description("Flux");

        assert_eq!(material.name(), "Limestone");
        assert_eq!(material.color(), Color::new(200, 200, 190));
        assert_eq!(material.description(), Some("Flux"));
    }

    #[test]
    fn test_registry_lookup_and_order() {
        let registry = MaterialRegistry::new(vec![
            Material::new("A", Color::new(1, 1, 1)),
            Material::new("B", Color::new(2, 2, 2)),
            Material::new("C", Color::new(3, 3, 3)),
        ]);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.index_of("A"), Some(0));
        assert_eq!(registry.index_of("C"), Some(2));
        assert_eq!(registry.index_of("D"), None);
        assert!(registry.contains("B"));
        assert_eq!(registry.names(), vec!["A", "B", "C"]);
        assert_eq!(registry.get("B").unwrap().color(), Color::new(2, 2, 2));
    }

    #[test]
    fn test_empty_registry() {
        let registry = MaterialRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(!registry.contains("anything"));
    }
}
