use serde::{Deserialize, Serialize};

use crate::contents::PanContents;
use crate::events::{PanEvent, PanListener};
use crate::presenter::NuggetPresenter;

/// Anything that can emit fluid particles at a given rate.
pub trait BirthRateSink {
    fn set_birth_rate(&mut self, birth_rate_per_second: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmitterConfig {
    #[serde(default = "default_max_birth_rate")]
    pub max_birth_rate: f32,
    /// Water volume that drives emitters at `max_birth_rate`.
    #[serde(default = "default_volume_for_max_birth_rate")]
    pub volume_for_max_birth_rate: f32,
}

fn default_max_birth_rate() -> f32 {
    400.0
}
fn default_volume_for_max_birth_rate() -> f32 {
    1.0
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_birth_rate: default_max_birth_rate(),
            volume_for_max_birth_rate: default_volume_for_max_birth_rate(),
        }
    }
}

impl EmitterConfig {
    pub fn birth_rate_for(&self, volume: f32) -> f32 {
        if self.volume_for_max_birth_rate <= f32::EPSILON {
            return 0.0;
        }
        (volume / self.volume_for_max_birth_rate).clamp(0.0, 1.0) * self.max_birth_rate
    }
}

/// Keeps every attached emitter's birth rate in step with the pan's water.
pub struct FluidEmitterDriver {
    config: EmitterConfig,
    sinks: Vec<Box<dyn BirthRateSink>>,
}

impl FluidEmitterDriver {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: impl BirthRateSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn sync(&mut self, volume: f32) {
        let rate = self.config.birth_rate_for(volume);
        for sink in self.sinks.iter_mut() {
            sink.set_birth_rate(rate);
        }
    }

    /// Push the current volume to every sink, then follow the pan's changes.
    pub fn attach<P: NuggetPresenter>(mut self, contents: &mut PanContents<P>) {
        self.sync(contents.water_volume());
        contents.subscribe(self);
    }
}

impl PanListener for FluidEmitterDriver {
    fn on_event(&mut self, event: &PanEvent) {
        if let PanEvent::WaterVolumeChanged { volume } = event {
            self.sync(*volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::WaterParticle;
    use std::cell::Cell;
    use std::rc::Rc;

    struct SharedRate(Rc<Cell<f32>>);

    impl BirthRateSink for SharedRate {
        fn set_birth_rate(&mut self, birth_rate_per_second: f32) {
            self.0.set(birth_rate_per_second);
        }
    }

    #[test]
    fn test_birth_rate_scales_and_clamps() {
        let config = EmitterConfig::default();
        assert_eq!(config.birth_rate_for(0.0), 0.0);
        assert!((config.birth_rate_for(0.25) - 100.0).abs() < 1e-4);
        assert_eq!(config.birth_rate_for(3.0), 400.0);
    }

    #[test]
    fn test_degenerate_volume_gives_zero_rate() {
        let config = EmitterConfig {
            max_birth_rate: 400.0,
            volume_for_max_birth_rate: 0.0,
        };
        assert_eq!(config.birth_rate_for(1.0), 0.0);
    }

    #[test]
    fn test_driver_follows_water_volume() {
        let rate = Rc::new(Cell::new(-1.0));
        let mut pan = PanContents::new();

        FluidEmitterDriver::new(EmitterConfig::default())
            .with_sink(SharedRate(Rc::clone(&rate)))
            .attach(&mut pan);
        assert_eq!(rate.get(), 0.0);

        pan.add_water(WaterParticle::new(0.5, 1.0));
        assert!((rate.get() - 200.0).abs() < 1e-3);

        pan.clear_water();
        assert_eq!(rate.get(), 0.0);
    }
}
