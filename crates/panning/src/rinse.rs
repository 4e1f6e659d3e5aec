use serde::{Deserialize, Serialize};

use crate::contents::PanContents;
use crate::presenter::NuggetPresenter;

/// When and how fast gold washes over the lip of the pan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RinseConfig {
    /// Minimum water volume before gold can be rinsed out.
    #[serde(default = "default_water_volume_threshold")]
    pub water_volume_threshold: f32,
    /// Normalized sediment at or below which gold is exposed to the rinse.
    #[serde(default = "default_sediment_normalized_threshold")]
    pub sediment_normalized_threshold: f32,
    /// Gold particles lost per second while rinsing.
    #[serde(default = "default_gold_release_rate")]
    pub gold_release_rate: f32,
}

fn default_water_volume_threshold() -> f32 {
    0.5
}
fn default_sediment_normalized_threshold() -> f32 {
    0.1
}
fn default_gold_release_rate() -> f32 {
    1.0
}

impl Default for RinseConfig {
    fn default() -> Self {
        Self {
            water_volume_threshold: default_water_volume_threshold(),
            sediment_normalized_threshold: default_sediment_normalized_threshold(),
            gold_release_rate: default_gold_release_rate(),
        }
    }
}

/// Releases gold from the tail of the pan while there is plenty of water and
/// little sediment left to hold it back.
#[derive(Clone, Debug)]
pub struct RinseGate {
    config: RinseConfig,
    accumulator: f32,
}

impl RinseGate {
    pub fn new(mut config: RinseConfig) -> Self {
        config.sediment_normalized_threshold = config.sediment_normalized_threshold.clamp(0.0, 1.0);
        Self {
            config,
            accumulator: 0.0,
        }
    }

    pub fn config(&self) -> &RinseConfig {
        &self.config
    }

    /// Fractional gold owed to the rinse but not yet removed.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn is_open<P: NuggetPresenter>(&self, contents: &PanContents<P>) -> bool {
        contents.water_volume() >= self.config.water_volume_threshold
            && contents.sediment_normalized() <= self.config.sediment_normalized_threshold
    }

    /// Advance the gate by `dt`. Returns how many gold particles were rinsed.
    pub fn update<P: NuggetPresenter>(&mut self, contents: &mut PanContents<P>, dt: f32) -> usize {
        if !self.is_open(contents) {
            // No grace period: closing the gate forfeits partial progress.
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += (self.config.gold_release_rate * dt).max(0.0);
        let whole = self.accumulator.floor();
        if whole < 1.0 {
            return 0;
        }

        self.accumulator -= whole;
        let removed = contents.remove_gold(whole as usize);
        if removed > 0 {
            log::info!("rinse washed away {} gold", removed);
        }
        removed
    }
}

impl Default for RinseGate {
    fn default() -> Self {
        Self::new(RinseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{GoldParticle, SedimentParticle, WaterParticle};

    fn rinse_ready_pan() -> PanContents {
        let mut pan = PanContents::new();
        pan.set_sediment(vec![SedimentParticle::new(1.0, 2.65); 20]);
        pan.remove_lightest_sediment(19);
        pan.set_gold(vec![GoldParticle::default(); 3]);
        pan.set_water([WaterParticle::new(0.6, 1.0)]);
        pan
    }

    #[test]
    fn test_closed_gate_resets_accumulator() {
        let mut pan = rinse_ready_pan();
        let mut gate = RinseGate::default();

        gate.update(&mut pan, 0.5);
        assert!((gate.accumulator() - 0.5).abs() < 1e-6);

        pan.clear_water();
        assert_eq!(gate.update(&mut pan, 0.5), 0);
        assert_eq!(gate.accumulator(), 0.0);
        assert_eq!(pan.gold_count(), 3);
    }

    #[test]
    fn test_needs_both_water_and_low_sediment() {
        let mut pan = PanContents::new();
        pan.set_sediment(vec![SedimentParticle::new(1.0, 2.65); 10]);
        pan.set_water([WaterParticle::new(5.0, 1.0)]);
        let gate = RinseGate::default();
        assert!(!gate.is_open(&pan));

        pan.remove_lightest_sediment(9);
        assert!(gate.is_open(&pan));

        pan.set_water([WaterParticle::new(0.4, 1.0)]);
        assert!(!gate.is_open(&pan));
    }

    #[test]
    fn test_negative_rate_removes_nothing() {
        let mut pan = rinse_ready_pan();
        let mut gate = RinseGate::new(RinseConfig {
            gold_release_rate: -3.0,
            ..Default::default()
        });
        for _ in 0..10 {
            gate.update(&mut pan, 1.0);
        }
        assert_eq!(pan.gold_count(), 3);
        assert_eq!(gate.accumulator(), 0.0);
    }
}
