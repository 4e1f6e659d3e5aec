use glam::Vec3;

/// Densities below this are treated as zero to avoid dividing by nothing.
const DENSITY_EPSILON: f32 = f32::EPSILON;

/// Sediment material types in the pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SedimentMaterial {
    QuartzSand,
    Magnetite,
}

impl SedimentMaterial {
    /// Specific gravity relative to water.
    pub fn specific_gravity(&self) -> f32 {
        match self {
            SedimentMaterial::QuartzSand => 2.65,
            SedimentMaterial::Magnetite => 5.2,
        }
    }
}

/// A slug of water poured into the pan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterParticle {
    mass: f32,
    density: f32,
}

impl WaterParticle {
    pub fn new(mass: f32, density: f32) -> Self {
        Self { mass, density }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    /// Volume occupied by this particle, zero for a degenerate density.
    pub fn volume(&self) -> f32 {
        if self.density <= DENSITY_EPSILON {
            0.0
        } else {
            self.mass / self.density
        }
    }
}

/// A grain of sediment. Lighter grains wash out first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SedimentParticle {
    mass: f32,
    density: f32,
}

impl SedimentParticle {
    pub fn new(mass: f32, density: f32) -> Self {
        Self { mass, density }
    }

    pub fn of_material(material: SedimentMaterial, mass: f32) -> Self {
        Self::new(mass, material.specific_gravity())
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn density(&self) -> f32 {
        self.density
    }
}

/// Stable handle for a gold particle held by a [`crate::PanContents`].
///
/// Handles are never reused, so a handle to a collected or rinsed particle
/// stays invalid forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GoldId(pub(crate) u32);

impl GoldId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// A gold flake or nugget buried in the sediment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoldParticle {
    mass: f32,
    density: f32,
    value_per_gram: f32,
    reveal_ratio: f32,
    local_position: Vec3,
    revealed: bool,
}

impl GoldParticle {
    pub const DEFAULT_DENSITY: f32 = 19.3;
    pub const DEFAULT_VALUE_PER_GRAM: f32 = 55.0;
    pub const DEFAULT_REVEAL_RATIO: f32 = 0.35;

    pub fn new(mass: f32, density: f32) -> Self {
        Self {
            mass,
            density,
            value_per_gram: Self::DEFAULT_VALUE_PER_GRAM,
            reveal_ratio: Self::DEFAULT_REVEAL_RATIO,
            local_position: Vec3::ZERO,
            revealed: false,
        }
    }

    /// Gold that surfaces once normalized sediment drops to `reveal_ratio`.
    pub fn with_reveal(
        mass: f32,
        density: f32,
        reveal_ratio: f32,
        local_position: Vec3,
        value_per_gram: f32,
    ) -> Self {
        Self {
            mass,
            density,
            value_per_gram: value_per_gram.max(0.0),
            reveal_ratio: reveal_ratio.clamp(0.0, 1.0),
            local_position,
            revealed: false,
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn value_per_gram(&self) -> f32 {
        self.value_per_gram
    }

    pub fn estimated_value(&self) -> f32 {
        self.mass * self.value_per_gram
    }

    pub fn reveal_ratio(&self) -> f32 {
        self.reveal_ratio
    }

    /// Offset of the nugget inside the pan, used to place its pickup proxy.
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    // One-way: nothing un-reveals a particle.
    pub(crate) fn mark_revealed(&mut self) {
        self.revealed = true;
    }
}

impl Default for GoldParticle {
    fn default() -> Self {
        Self::new(1.0, Self::DEFAULT_DENSITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_volume() {
        let water = WaterParticle::new(2.0, 4.0);
        assert!((water.volume() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_density_water_has_no_volume() {
        assert_eq!(WaterParticle::new(3.0, 0.0).volume(), 0.0);
        assert_eq!(WaterParticle::new(3.0, -1.0).volume(), 0.0);
    }

    #[test]
    fn test_gold_clamps_reveal_ratio_and_value() {
        let gold = GoldParticle::with_reveal(2.0, 19.3, 1.7, Vec3::X, -5.0);
        assert_eq!(gold.reveal_ratio(), 1.0);
        assert_eq!(gold.value_per_gram(), 0.0);
        assert_eq!(gold.estimated_value(), 0.0);

        let gold = GoldParticle::with_reveal(2.0, 19.3, -0.2, Vec3::X, 10.0);
        assert_eq!(gold.reveal_ratio(), 0.0);
        assert!((gold.estimated_value() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_gold_defaults() {
        let gold = GoldParticle::default();
        assert_eq!(gold.density(), 19.3);
        assert_eq!(gold.reveal_ratio(), 0.35);
        assert!((gold.estimated_value() - 55.0).abs() < 1e-6);
        assert!(!gold.is_revealed());
    }

    #[test]
    fn test_sediment_material_density() {
        let sand = SedimentParticle::of_material(SedimentMaterial::QuartzSand, 0.1);
        let magnetite = SedimentParticle::of_material(SedimentMaterial::Magnetite, 0.1);
        assert!(sand.density() < magnetite.density());
    }
}
