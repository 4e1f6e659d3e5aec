use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::materials::{GoldParticle, SedimentMaterial, SedimentParticle};

/// Average mass of one gold flake in grams.
const GOLD_FLAKE_GRAMS: f32 = 0.05;
const MAX_GOLD_PARTICLES: usize = 150;

/// Sample to pan (a scoop of pay dirt).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanSample {
    pub total_mass_grams: f32,
    pub gold_content_grams: f32,
    pub particle_count: usize,
    #[serde(default = "default_value_per_gram")]
    pub value_per_gram: f32,
    /// Gold reveal ratios are drawn uniformly from this range.
    #[serde(default = "default_reveal_range")]
    pub reveal_ratio_range: (f32, f32),
    /// Radius of the disk gold is scattered over, in pan-local meters.
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f32,
}

fn default_value_per_gram() -> f32 {
    GoldParticle::DEFAULT_VALUE_PER_GRAM
}
fn default_reveal_range() -> (f32, f32) {
    (0.2, 0.6)
}
fn default_spawn_radius() -> f32 {
    0.16
}

/// Particles produced from a [`PanSample`].
#[derive(Clone, Debug, Default)]
pub struct PanLoad {
    pub sediment: Vec<SedimentParticle>,
    pub gold: Vec<GoldParticle>,
}

impl PanSample {
    /// Tutorial sample (rich, easy).
    pub fn tutorial() -> Self {
        Self {
            total_mass_grams: 250.0,
            gold_content_grams: 10.0,
            particle_count: 200,
            value_per_gram: default_value_per_gram(),
            reveal_ratio_range: (0.4, 0.8),
            spawn_radius: default_spawn_radius(),
        }
    }

    /// Standard sample (more realistic).
    pub fn standard() -> Self {
        Self {
            total_mass_grams: 250.0,
            gold_content_grams: 2.0,
            particle_count: 300,
            value_per_gram: default_value_per_gram(),
            reveal_ratio_range: default_reveal_range(),
            spawn_radius: default_spawn_radius(),
        }
    }

    pub fn gold_count(&self) -> usize {
        let count = (self.gold_content_grams.max(0.0) / GOLD_FLAKE_GRAMS).round() as usize;
        count.min(MAX_GOLD_PARTICLES)
    }

    /// Generate particles for this sample.
    pub fn spawn(&self, rng: &mut impl Rng) -> PanLoad {
        let sand_count = (self.particle_count as f32 * 0.6) as usize;
        let magnetite_count = (self.particle_count as f32 * 0.25) as usize;
        let sediment_count = sand_count + magnetite_count;
        let grain_mass = if sediment_count == 0 {
            0.0
        } else {
            (self.total_mass_grams - self.gold_content_grams).max(0.0) / sediment_count as f32
        };

        let mut sediment = Vec::with_capacity(sediment_count);
        for _ in 0..sand_count {
            sediment.push(Self::random_grain(rng, SedimentMaterial::QuartzSand, grain_mass));
        }
        for _ in 0..magnetite_count {
            sediment.push(Self::random_grain(rng, SedimentMaterial::Magnetite, grain_mass));
        }

        let gold_count = self.gold_count();
        let flake_mass = if gold_count == 0 {
            0.0
        } else {
            self.gold_content_grams / gold_count as f32
        };
        let (lo, hi) = self.reveal_range();

        let mut gold = Vec::with_capacity(gold_count);
        for _ in 0..gold_count {
            let reveal_ratio = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            gold.push(GoldParticle::with_reveal(
                flake_mass,
                GoldParticle::DEFAULT_DENSITY,
                reveal_ratio,
                Self::random_in_disk(rng, self.spawn_radius),
                self.value_per_gram,
            ));
        }

        PanLoad { sediment, gold }
    }

    fn reveal_range(&self) -> (f32, f32) {
        let (a, b) = self.reveal_ratio_range;
        let (a, b) = (a.clamp(0.0, 1.0), b.clamp(0.0, 1.0));
        (a.min(b), a.max(b))
    }

    // Mass jitters ±20% around the mean so density alone doesn't order grains.
    fn random_grain(rng: &mut impl Rng, material: SedimentMaterial, mean_mass: f32) -> SedimentParticle {
        let mass = mean_mass * rng.gen_range(0.8f32..1.2);
        SedimentParticle::of_material(material, mass)
    }

    fn random_in_disk(rng: &mut impl Rng, radius: f32) -> Vec3 {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let r = rng.gen::<f32>().sqrt() * radius.max(0.0);

        Vec3::new(r * angle.cos(), rng.gen_range(-0.01..0.01), r * angle.sin())
    }
}

impl Default for PanSample {
    fn default() -> Self {
        Self::standard()
    }
}
