use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Player input state for panning controls.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanInput {
    /// Pan tilt angle in radians (x: left/right, y: forward/back).
    pub tilt: Vec2,
    /// Swirl speed in RPM.
    pub swirl_rpm: f32,
    /// Add water action.
    pub add_water: bool,
    /// Shake pan action.
    pub shake: bool,
    /// Dump the water out of the pan.
    pub dump: bool,
}

impl PanInput {
    /// Maximum tilt angle in radians (~30 degrees).
    pub const MAX_TILT: f32 = 0.52;

    pub fn clamp_tilt(&mut self) {
        self.tilt.x = self.tilt.x.clamp(-Self::MAX_TILT, Self::MAX_TILT);
        self.tilt.y = self.tilt.y.clamp(-Self::MAX_TILT, Self::MAX_TILT);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "default_tilt_speed")]
    pub tilt_speed: f32,
    #[serde(default = "default_swirl_speed")]
    pub swirl_speed: f32,
    /// Angular speed range (rad/s) of a single shake jolt.
    #[serde(default = "default_shake_jolt")]
    pub shake_jolt: (f32, f32),
    /// Water added per `add_water` press.
    #[serde(default = "default_water_per_pour")]
    pub water_per_pour: f32,
}

fn default_tilt_speed() -> f32 {
    5.0
}
fn default_swirl_speed() -> f32 {
    10.0
}
fn default_shake_jolt() -> (f32, f32) {
    (3.0, 6.0)
}

/// Upper bound on a shake jolt, in rad/s.
const MAX_SHAKE_JOLT: f32 = 1000.0;
fn default_water_per_pour() -> f32 {
    0.3
}

impl ControlConfig {
    /// Shake jolt range that is safe to sample: finite, non-negative and ordered.
    /// A range with a non-finite bound falls back to the default.
    pub fn sanitized_shake_jolt(&self) -> (f32, f32) {
        let (lo, hi) = self.shake_jolt;
        if !lo.is_finite() || !hi.is_finite() {
            log::warn!("shake jolt ({}, {}) is not finite; using default", lo, hi);
            return default_shake_jolt();
        }
        let lo = lo.clamp(0.0, MAX_SHAKE_JOLT);
        let hi = hi.clamp(0.0, MAX_SHAKE_JOLT);
        (lo.min(hi), lo.max(hi))
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tilt_speed: default_tilt_speed(),
            swirl_speed: default_swirl_speed(),
            shake_jolt: default_shake_jolt(),
            water_per_pour: default_water_per_pour(),
        }
    }
}

/// Smoothed pan orientation, the motion source for the analyzer.
#[derive(Clone, Debug)]
pub struct PanMotion {
    config: ControlConfig,
    pub current_tilt: Vec2,
    pub current_swirl: f32,
}

impl PanMotion {
    pub fn new(mut config: ControlConfig) -> Self {
        config.shake_jolt = config.sanitized_shake_jolt();
        Self {
            config,
            current_tilt: Vec2::ZERO,
            current_swirl: 0.0,
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Ease toward the input and return the pan's angular velocity.
    pub fn update(&mut self, input: &PanInput, dt: f32, rng: &mut impl Rng) -> Vec3 {
        if dt <= 0.0 {
            return Vec3::ZERO;
        }

        let mut input = *input;
        input.clamp_tilt();

        let previous_tilt = self.current_tilt;
        let blend = (dt * self.config.tilt_speed).min(1.0);
        self.current_tilt = self.current_tilt.lerp(input.tilt, blend);
        let tilt_rate = (self.current_tilt - previous_tilt) / dt;

        let swirl_blend = (dt * self.config.swirl_speed).min(1.0);
        self.current_swirl += (input.swirl_rpm - self.current_swirl) * swirl_blend;
        let omega = self.current_swirl * std::f32::consts::TAU / 60.0;

        let mut angular_velocity = Vec3::new(tilt_rate.x, omega, tilt_rate.y);

        if input.shake {
            let (lo, hi) = self.config.shake_jolt;
            let magnitude = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            let axis = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-0.2..0.2),
                rng.gen_range(-1.0..1.0),
            )
            .try_normalize()
            .unwrap_or(Vec3::X);
            angular_velocity += axis * magnitude;
        }

        angular_velocity
    }
}

impl Default for PanMotion {
    fn default() -> Self {
        Self::new(ControlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_still_pan_has_no_motion() {
        let mut motion = PanMotion::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let w = motion.update(&PanInput::default(), 1.0 / 60.0, &mut rng);
        assert_eq!(w, Vec3::ZERO);
    }

    #[test]
    fn test_swirl_converges_to_input() {
        let mut motion = PanMotion::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let input = PanInput {
            swirl_rpm: 60.0,
            ..Default::default()
        };
        let mut w = Vec3::ZERO;
        for _ in 0..120 {
            w = motion.update(&input, 1.0 / 60.0, &mut rng);
        }
        assert!((w.y - std::f32::consts::TAU).abs() < 1e-2);
    }

    #[test]
    fn test_tilt_is_clamped() {
        let mut motion = PanMotion::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let input = PanInput {
            tilt: Vec2::new(3.0, -3.0),
            ..Default::default()
        };
        for _ in 0..200 {
            motion.update(&input, 1.0 / 30.0, &mut rng);
        }
        assert!(motion.current_tilt.x <= PanInput::MAX_TILT + 1e-5);
        assert!(motion.current_tilt.y >= -PanInput::MAX_TILT - 1e-5);
    }

    #[test]
    fn test_shake_jolt_is_sanitized() {
        let jolt = |lo: f32, hi: f32| {
            PanMotion::new(ControlConfig {
                shake_jolt: (lo, hi),
                ..Default::default()
            })
            .config()
            .shake_jolt
        };
        assert_eq!(jolt(1.0, f32::INFINITY), (3.0, 6.0));
        assert_eq!(jolt(f32::NAN, 2.0), (3.0, 6.0));
        assert_eq!(jolt(-3.0e38, 3.0e38), (0.0, MAX_SHAKE_JOLT));
        assert_eq!(jolt(8.0, 2.0), (2.0, 8.0));
        assert_eq!(jolt(4.0, 5.0), (4.0, 5.0));
    }

    #[test]
    fn test_shake_jolt_is_at_least_minimum() {
        let mut motion = PanMotion::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let input = PanInput {
            shake: true,
            ..Default::default()
        };
        for _ in 0..50 {
            let w = motion.update(&input, 1.0 / 60.0, &mut rng);
            assert!(w.length() >= 3.0 - 1e-4);
            assert!(w.length() <= 6.0 + 1e-4);
        }
    }
}
