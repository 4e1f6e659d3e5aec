//! Hand tools the player carries between the creek and the pan.

use serde::{Deserialize, Serialize};

use crate::materials::WaterParticle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolState {
    #[default]
    Idle,
    Scooping,
    Carrying,
    Pouring,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToolEvent {
    StateChanged(ToolState),
    /// Normalized fill in [0, 1].
    FillChanged(f32),
    ScoopStarted,
    ScoopEnded,
    PourStarted,
    PourEnded,
}

/// Scoop parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoopSpec {
    #[serde(default = "default_max_water_volume")]
    pub max_water_volume: f32,
    #[serde(default = "default_fill_rate")]
    pub fill_rate_per_second: f32,
    /// Time the scoop must sit in the water before it starts filling.
    #[serde(default = "default_dwell_time")]
    pub dwell_time: f32,
}

fn default_max_water_volume() -> f32 {
    1.0
}
fn default_fill_rate() -> f32 {
    0.25
}
fn default_dwell_time() -> f32 {
    0.5
}

impl Default for ScoopSpec {
    fn default() -> Self {
        Self {
            max_water_volume: default_max_water_volume(),
            fill_rate_per_second: default_fill_rate(),
            dwell_time: default_dwell_time(),
        }
    }
}

/// A scoop that fills from the creek and pours into the pan.
#[derive(Clone, Debug, Default)]
pub struct ScoopingTool {
    spec: ScoopSpec,
    state: ToolState,
    water_volume: f32,
    dwell_timer: f32,
    inside_water: bool,
    events: Vec<ToolEvent>,
}

impl ScoopingTool {
    pub fn new(spec: ScoopSpec) -> Self {
        Self {
            spec,
            ..Default::default()
        }
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn water_volume(&self) -> f32 {
        self.water_volume
    }

    pub fn normalized_fill(&self) -> f32 {
        if self.spec.max_water_volume <= f32::EPSILON {
            0.0
        } else {
            self.water_volume / self.spec.max_water_volume
        }
    }

    /// Drain queued tool events in the order they happened.
    pub fn take_events(&mut self) -> Vec<ToolEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn enter_water(&mut self) {
        self.inside_water = true;
        self.dwell_timer = 0.0;
    }

    pub fn exit_water(&mut self) {
        self.inside_water = false;
        self.dwell_timer = 0.0;
    }

    pub fn begin_scooping(&mut self) {
        if !matches!(self.state, ToolState::Idle | ToolState::Carrying) {
            return;
        }
        self.change_state(ToolState::Scooping);
        self.events.push(ToolEvent::ScoopStarted);
    }

    pub fn end_scooping(&mut self) {
        if self.state != ToolState::Scooping {
            return;
        }
        self.change_state(ToolState::Carrying);
        self.events.push(ToolEvent::ScoopEnded);
    }

    pub fn enter_carry_state(&mut self) {
        self.change_state(ToolState::Carrying);
    }

    pub fn start_pouring(&mut self) {
        if self.state == ToolState::Pouring {
            return;
        }
        self.change_state(ToolState::Pouring);
        self.events.push(ToolEvent::PourStarted);
    }

    pub fn stop_pouring(&mut self) {
        if self.state != ToolState::Pouring {
            return;
        }
        self.change_state(ToolState::Carrying);
        self.events.push(ToolEvent::PourEnded);
    }

    pub fn return_to_idle(&mut self) {
        self.change_state(ToolState::Idle);
    }

    pub fn update(&mut self, dt: f32) {
        if self.state != ToolState::Scooping || !self.inside_water {
            self.dwell_timer = 0.0;
            return;
        }

        self.dwell_timer += dt;
        if self.dwell_timer >= self.spec.dwell_time {
            self.add_water(dt * self.spec.fill_rate_per_second);
        }
    }

    /// Empty the scoop while pouring. Water is poured at unit density.
    pub fn pour(&mut self) -> Option<WaterParticle> {
        if self.state != ToolState::Pouring || self.water_volume <= 0.0 {
            return None;
        }
        let volume = std::mem::take(&mut self.water_volume);
        self.events.push(ToolEvent::FillChanged(0.0));
        Some(WaterParticle::new(volume, 1.0))
    }

    fn add_water(&mut self, amount: f32) {
        self.water_volume = (self.water_volume + amount).clamp(0.0, self.spec.max_water_volume);
        self.events
            .push(ToolEvent::FillChanged(self.normalized_fill().clamp(0.0, 1.0)));
    }

    fn change_state(&mut self, state: ToolState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.events.push(ToolEvent::StateChanged(state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoop_fills_after_dwell() {
        let mut scoop = ScoopingTool::new(ScoopSpec::default());
        scoop.begin_scooping();
        scoop.enter_water();

        scoop.update(0.25);
        assert_eq!(scoop.water_volume(), 0.0);
        scoop.update(0.25);
        assert!(scoop.water_volume() > 0.0);

        for _ in 0..100 {
            scoop.update(0.25);
        }
        assert_eq!(scoop.normalized_fill(), 1.0);
    }

    #[test]
    fn test_leaving_water_resets_dwell() {
        let mut scoop = ScoopingTool::default();
        scoop.begin_scooping();
        scoop.enter_water();
        scoop.update(0.4);
        scoop.exit_water();
        scoop.enter_water();
        scoop.update(0.4);
        assert_eq!(scoop.water_volume(), 0.0);
    }

    #[test]
    fn test_state_machine_guards() {
        let mut scoop = ScoopingTool::default();
        scoop.start_pouring();
        scoop.begin_scooping();
        assert_eq!(scoop.state(), ToolState::Pouring);

        scoop.stop_pouring();
        assert_eq!(scoop.state(), ToolState::Carrying);
        scoop.begin_scooping();
        assert_eq!(scoop.state(), ToolState::Scooping);

        let events = scoop.take_events();
        assert_eq!(
            events,
            vec![
                ToolEvent::StateChanged(ToolState::Pouring),
                ToolEvent::PourStarted,
                ToolEvent::StateChanged(ToolState::Carrying),
                ToolEvent::PourEnded,
                ToolEvent::StateChanged(ToolState::Scooping),
                ToolEvent::ScoopStarted,
            ]
        );
    }

    #[test]
    fn test_pour_empties_into_water_particle() {
        let mut scoop = ScoopingTool::new(ScoopSpec {
            dwell_time: 0.0,
            ..Default::default()
        });
        scoop.begin_scooping();
        scoop.enter_water();
        scoop.update(2.0);
        scoop.end_scooping();

        assert!(scoop.pour().is_none());
        scoop.start_pouring();
        let water = scoop.pour().map(|w| w.volume());
        assert_eq!(water, Some(0.5));
        assert_eq!(scoop.water_volume(), 0.0);
    }
}
