//! Maps pan motion onto settling and sediment loss.
//!
//! Each tick the analyzer turns an angular-speed sample into a heavy/light
//! settling pair, decides whether the pan is being shaken, washes out light
//! sediment while it is, and runs the rinse gate.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::contents::PanContents;
use crate::events::PanEvent;
use crate::presenter::NuggetPresenter;
use crate::rinse::{RinseConfig, RinseGate};

const SPEED_EPSILON: f32 = f32::EPSILON;

/// Monotonic response over a normalized input in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseCurve {
    /// Cubic ease with flat tangents at both ends.
    EaseInOut { start: f32, end: f32 },
    Linear { start: f32, end: f32 },
}

impl ResponseCurve {
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            ResponseCurve::EaseInOut { start, end } => {
                let s = t * t * (3.0 - 2.0 * t);
                start + (end - start) * s
            }
            ResponseCurve::Linear { start, end } => start + (end - start) * t,
        }
    }
}

fn default_heavy_curve() -> ResponseCurve {
    ResponseCurve::EaseInOut {
        start: 0.0,
        end: 1.0,
    }
}
fn default_light_curve() -> ResponseCurve {
    ResponseCurve::EaseInOut {
        start: 1.0,
        end: 0.0,
    }
}
fn default_max_angular_speed() -> f32 {
    10.0
}
fn default_shake_threshold() -> f32 {
    1.25
}
fn default_sediment_removal_rate() -> f32 {
    6.0
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Angular speed (rad/s) that maps to full settling response.
    #[serde(default = "default_max_angular_speed")]
    pub max_angular_speed: f32,
    /// Angular speed at or above which the pan counts as shaking.
    #[serde(default = "default_shake_threshold")]
    pub shake_threshold: f32,
    #[serde(default = "default_heavy_curve")]
    pub heavy_settling: ResponseCurve,
    #[serde(default = "default_light_curve")]
    pub light_settling: ResponseCurve,
    /// Sediment particles washed out per second of shaking.
    #[serde(default = "default_sediment_removal_rate")]
    pub sediment_removal_rate: f32,
    #[serde(default)]
    pub rinse: RinseConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_angular_speed: default_max_angular_speed(),
            shake_threshold: default_shake_threshold(),
            heavy_settling: default_heavy_curve(),
            light_settling: default_light_curve(),
            sediment_removal_rate: default_sediment_removal_rate(),
            rinse: RinseConfig::default(),
        }
    }
}

/// What one tick did to the pan.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    pub shaking: bool,
    pub heavy_settling: f32,
    pub light_settling: f32,
    pub sediment_removed: usize,
    pub gold_rinsed: usize,
}

#[derive(Clone, Debug)]
pub struct MotionAnalyzer {
    config: MotionConfig,
    rinse: RinseGate,
    sediment_accumulator: f32,
    shaking: bool,
}

impl MotionAnalyzer {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            rinse: RinseGate::new(config.rinse),
            config,
            sediment_accumulator: 0.0,
            shaking: false,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn shake_threshold(&self) -> f32 {
        self.config.shake_threshold
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    pub fn sediment_accumulator(&self) -> f32 {
        self.sediment_accumulator
    }

    pub fn rinse_gate(&self) -> &RinseGate {
        &self.rinse
    }

    /// Normalized speed in [0, 1]; zero when the configured maximum is degenerate.
    pub fn normalized_speed(&self, angular_speed: f32) -> f32 {
        if self.config.max_angular_speed <= SPEED_EPSILON {
            return 0.0;
        }
        let normalized = angular_speed / self.config.max_angular_speed;
        if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        }
    }

    /// Tick from an angular velocity vector, using its magnitude as the speed.
    pub fn tick_with_velocity<P: NuggetPresenter>(
        &mut self,
        contents: &mut PanContents<P>,
        dt: f32,
        angular_velocity: Vec3,
    ) -> TickReport {
        self.tick(contents, dt, angular_velocity.length())
    }

    pub fn tick<P: NuggetPresenter>(
        &mut self,
        contents: &mut PanContents<P>,
        dt: f32,
        angular_speed: f32,
    ) -> TickReport {
        let dt = dt.max(0.0);
        let normalized_speed = self.normalized_speed(angular_speed);

        let heavy = self.config.heavy_settling.evaluate(normalized_speed);
        let light = self.config.light_settling.evaluate(normalized_speed);
        contents.apply_settling(heavy, light);

        let shaking = angular_speed >= self.config.shake_threshold;
        let mut sediment_removed = 0;
        if shaking {
            self.sediment_accumulator += (self.config.sediment_removal_rate * dt).max(0.0);
            let whole = self.sediment_accumulator.floor();
            if whole >= 1.0 {
                sediment_removed = contents.remove_lightest_sediment(whole as usize);
                self.sediment_accumulator -= whole;
            }
        } else {
            self.sediment_accumulator = (self.sediment_accumulator - dt).max(0.0);
        }

        let gold_rinsed = self.rinse.update(contents, dt);

        if shaking != self.shaking {
            self.shaking = shaking;
            log::debug!("shake state changed: {}", shaking);
            contents.publish(PanEvent::ShakeStateChanged { shaking });
        }

        TickReport {
            shaking,
            heavy_settling: heavy,
            light_settling: light,
            sediment_removed,
            gold_rinsed,
        }
    }
}

impl Default for MotionAnalyzer {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::materials::SedimentParticle;

    #[test]
    fn test_ease_in_out_endpoints_and_midpoint() {
        let curve = default_heavy_curve();
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(1.0), 1.0);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(curve.evaluate(2.0), 1.0);

        let light = default_light_curve();
        assert_eq!(light.evaluate(0.0), 1.0);
        assert!(light.evaluate(0.25) > light.evaluate(0.75));
    }

    #[test]
    fn test_normalized_speed_clamps_and_guards_zero_max() {
        let analyzer = MotionAnalyzer::default();
        assert_eq!(analyzer.normalized_speed(20.0), 1.0);
        assert_eq!(analyzer.normalized_speed(-1.0), 0.0);
        assert!((analyzer.normalized_speed(5.0) - 0.5).abs() < 1e-6);

        let degenerate = MotionAnalyzer::new(MotionConfig {
            max_angular_speed: 0.0,
            ..Default::default()
        });
        assert_eq!(degenerate.normalized_speed(5.0), 0.0);
    }

    #[test]
    fn test_settling_forwarded_every_tick() {
        let log = EventLog::new();
        let mut pan = PanContents::new();
        pan.subscribe(log.clone());
        let mut analyzer = MotionAnalyzer::default();

        analyzer.tick(&mut pan, 0.1, 10.0);
        analyzer.tick(&mut pan, 0.1, 10.0);

        let settling = log.count(|e| matches!(e, PanEvent::SettlingChanged { .. }));
        assert_eq!(settling, 2);
        assert_eq!(pan.heavy_settling_bias(), 1.0);
        assert_eq!(pan.light_settling_bias(), 0.0);
    }

    #[test]
    fn test_accumulator_decays_when_still() {
        let mut pan = PanContents::new();
        pan.set_sediment(vec![SedimentParticle::new(1.0, 2.65); 10]);
        let mut analyzer = MotionAnalyzer::new(MotionConfig {
            sediment_removal_rate: 2.0,
            ..Default::default()
        });

        analyzer.tick(&mut pan, 0.25, 5.0);
        assert!((analyzer.sediment_accumulator() - 0.5).abs() < 1e-6);

        analyzer.tick(&mut pan, 0.25, 0.0);
        assert!((analyzer.sediment_accumulator() - 0.25).abs() < 1e-6);

        analyzer.tick(&mut pan, 1.0, 0.0);
        assert_eq!(analyzer.sediment_accumulator(), 0.0);
        assert_eq!(pan.sediment_count(), 10);
    }

    #[test]
    fn test_velocity_magnitude_is_the_speed() {
        let mut pan = PanContents::new();
        let mut analyzer = MotionAnalyzer::default();
        let report = analyzer.tick_with_velocity(&mut pan, 0.1, Vec3::new(0.0, 3.0, 4.0));
        assert!(report.shaking);
        assert!((report.heavy_settling - 0.5).abs() < 1e-6);
    }
}
