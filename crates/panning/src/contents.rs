//! Particle ledger for the pan.
//!
//! `PanContents` owns every water, sediment and gold particle in the pan and is
//! the only thing that mutates them. Sediment removal drives the milestone
//! ladder and gold reveal; gold leaves either through [`PanContents::try_collect`]
//! (paid out by the caller) or [`PanContents::remove_gold`] (rinsed away, unpaid).

use rustc_hash::FxHashMap;

use crate::events::{EventBus, PanEvent, PanListener};
use crate::materials::{GoldId, GoldParticle, SedimentParticle, WaterParticle};
use crate::milestones::{default_milestones, Milestone, MilestoneLadder};
use crate::presenter::{HeadlessPresenter, NuggetPresenter};

/// Float comparison with the same tolerance game engines use for "approximately".
pub(crate) fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0)
}

/// Gold handed back by a successful collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollectedGold {
    pub id: GoldId,
    pub particle: GoldParticle,
}

/// Everything currently held in the pan.
pub struct PanContents<P: NuggetPresenter = HeadlessPresenter> {
    water: Vec<WaterParticle>,
    sediment: Vec<SedimentParticle>,
    /// Insertion ordered; the tail is the most recently added gold.
    gold: Vec<(GoldId, GoldParticle)>,
    nuggets: FxHashMap<GoldId, P::Handle>,
    presenter: P,
    milestones: MilestoneLadder,
    events: EventBus,

    water_volume: f32,
    heavy_settling_bias: f32,
    light_settling_bias: f32,
    initial_sediment_count: usize,
    initial_gold_count: usize,
    next_gold_id: u32,
}

impl PanContents<HeadlessPresenter> {
    /// Empty pan with the default milestone ladder and no visuals.
    pub fn new() -> Self {
        Self::with_presenter(HeadlessPresenter, default_milestones())
    }
}

impl Default for PanContents<HeadlessPresenter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: NuggetPresenter> PanContents<P> {
    pub fn with_presenter(presenter: P, milestones: Vec<Milestone>) -> Self {
        Self {
            water: Vec::new(),
            sediment: Vec::new(),
            gold: Vec::new(),
            nuggets: FxHashMap::default(),
            presenter,
            milestones: MilestoneLadder::new(milestones),
            events: EventBus::new(),
            water_volume: 0.0,
            heavy_settling_bias: 0.0,
            light_settling_bias: 0.0,
            initial_sediment_count: 0,
            initial_gold_count: 0,
            next_gold_id: 0,
        }
    }

    /// Register a listener; events reach listeners in subscription order.
    pub fn subscribe(&mut self, listener: impl PanListener + 'static) {
        self.events.subscribe(Box::new(listener));
    }

    pub(crate) fn publish(&mut self, event: PanEvent) {
        self.events.publish(event);
    }

    /// Replace the milestone table. Fired memory starts over.
    pub fn set_milestones(&mut self, milestones: Vec<Milestone>) {
        self.milestones = MilestoneLadder::new(milestones);
    }

    pub fn milestones(&self) -> &MilestoneLadder {
        &self.milestones
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    // ========================================================================
    // Bulk replacement
    // ========================================================================

    pub fn set_sediment(&mut self, particles: impl IntoIterator<Item = SedimentParticle>) {
        self.sediment.clear();
        self.sediment.extend(particles);
        self.milestones.reset();
        self.sync_initial_counts();
        self.evaluate_sediment_milestones();
    }

    /// Replace all gold, destroying existing nugget proxies first.
    ///
    /// Returns the handles of the new particles in the order given.
    pub fn set_gold(&mut self, particles: impl IntoIterator<Item = GoldParticle>) -> Vec<GoldId> {
        for (_, handle) in self.nuggets.drain() {
            self.presenter.despawn(handle);
        }

        self.gold.clear();
        let mut ids = Vec::new();
        for particle in particles {
            let id = GoldId(self.next_gold_id);
            self.next_gold_id += 1;
            self.gold.push((id, particle));
            ids.push(id);
        }

        self.milestones.reset();
        self.sync_initial_counts();
        self.evaluate_sediment_milestones();
        ids
    }

    pub fn set_water(&mut self, particles: impl IntoIterator<Item = WaterParticle>) {
        self.water.clear();
        self.water.extend(particles);
        self.recalculate_water_volume();
    }

    /// Raise the high-water marks used for normalization to the current counts.
    pub fn sync_initial_counts(&mut self) {
        self.initial_sediment_count = self.initial_sediment_count.max(self.sediment.len());
        self.initial_gold_count = self.initial_gold_count.max(self.gold.len());
    }

    // ========================================================================
    // Incremental mutation
    // ========================================================================

    pub fn add_water(&mut self, particle: WaterParticle) {
        self.water.push(particle);
        self.recalculate_water_volume();
    }

    pub fn clear_water(&mut self) {
        if self.water.is_empty() {
            return;
        }
        self.water.clear();
        self.recalculate_water_volume();
    }

    /// Wash out the `count` lowest-density grains. Returns how many went.
    pub fn remove_lightest_sediment(&mut self, count: usize) -> usize {
        if count == 0 || self.sediment.is_empty() {
            return 0;
        }

        let count = count.min(self.sediment.len());
        // Stable, so equal densities keep their relative order.
        self.sediment.sort_by(|a, b| a.density().total_cmp(&b.density()));
        self.sediment.drain(..count);
        log::debug!("removed {} sediment, {} left", count, self.sediment.len());

        self.evaluate_sediment_milestones();
        count
    }

    /// Remove the `count` most recently added gold particles without paying
    /// them out. Returns how many went.
    pub fn remove_gold(&mut self, count: usize) -> usize {
        if count == 0 || self.gold.is_empty() {
            return 0;
        }

        let count = count.min(self.gold.len());
        for _ in 0..count {
            if let Some((id, _)) = self.gold.pop() {
                self.despawn_nugget(id);
                log::debug!("gold {:?} rinsed out of the pan", id);
            }
        }
        count
    }

    /// Hand a revealed gold particle to the caller.
    ///
    /// Fails when `id` is not in the pan (never was, or already left) or the
    /// particle has not been revealed. On success the particle leaves the pan
    /// and a single [`PanEvent::GoldCollected`] is published.
    pub fn try_collect(&mut self, id: GoldId) -> Option<CollectedGold> {
        let index = self.gold.iter().position(|(gold_id, _)| *gold_id == id)?;
        if !self.gold[index].1.is_revealed() {
            return None;
        }

        let (id, particle) = self.gold.remove(index);
        self.despawn_nugget(id);
        log::info!(
            "collected gold {:?}: {:.2}g worth {:.2}",
            id,
            particle.mass(),
            particle.estimated_value()
        );
        self.events.publish(PanEvent::GoldCollected { id, particle });
        Some(CollectedGold { id, particle })
    }

    /// Store and republish the current settling biases.
    pub fn apply_settling(&mut self, heavy: f32, light: f32) {
        self.heavy_settling_bias = heavy;
        self.light_settling_bias = light;
        self.events.publish(PanEvent::SettlingChanged { heavy, light });
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn water_particles(&self) -> &[WaterParticle] {
        &self.water
    }

    pub fn sediment_particles(&self) -> &[SedimentParticle] {
        &self.sediment
    }

    /// Gold in insertion order.
    pub fn gold_particles(&self) -> impl Iterator<Item = (GoldId, &GoldParticle)> + '_ {
        self.gold.iter().map(|(id, particle)| (*id, particle))
    }

    pub fn revealed_gold(&self) -> impl Iterator<Item = (GoldId, &GoldParticle)> + '_ {
        self.gold_particles().filter(|(_, p)| p.is_revealed())
    }

    pub fn gold(&self, id: GoldId) -> Option<&GoldParticle> {
        self.gold
            .iter()
            .find(|(gold_id, _)| *gold_id == id)
            .map(|(_, particle)| particle)
    }

    /// Whether a nugget proxy currently exists for `id`.
    pub fn has_nugget(&self, id: GoldId) -> bool {
        self.nuggets.contains_key(&id)
    }

    pub fn nugget(&self, id: GoldId) -> Option<&P::Handle> {
        self.nuggets.get(&id)
    }

    pub fn water_volume(&self) -> f32 {
        self.water_volume
    }

    pub fn heavy_settling_bias(&self) -> f32 {
        self.heavy_settling_bias
    }

    pub fn light_settling_bias(&self) -> f32 {
        self.light_settling_bias
    }

    pub fn water_count(&self) -> usize {
        self.water.len()
    }

    pub fn sediment_count(&self) -> usize {
        self.sediment.len()
    }

    pub fn gold_count(&self) -> usize {
        self.gold.len()
    }

    pub fn initial_sediment_count(&self) -> usize {
        self.initial_sediment_count
    }

    pub fn initial_gold_count(&self) -> usize {
        self.initial_gold_count
    }

    /// Sediment left relative to the largest load ever held, in [0, 1].
    pub fn sediment_normalized(&self) -> f32 {
        normalized(self.sediment.len(), self.initial_sediment_count)
    }

    /// Gold left relative to the largest load ever held, in [0, 1].
    pub fn gold_normalized(&self) -> f32 {
        normalized(self.gold.len(), self.initial_gold_count)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn recalculate_water_volume(&mut self) {
        let total: f32 = self.water.iter().map(WaterParticle::volume).sum();
        if !approximately(total, self.water_volume) {
            self.water_volume = total;
            self.events.publish(PanEvent::WaterVolumeChanged { volume: total });
        }
    }

    fn evaluate_sediment_milestones(&mut self) {
        self.sync_initial_counts();

        if self.initial_sediment_count == 0 {
            // Nothing was ever buried, so everything is already exposed.
            self.reveal_gold(0.0);
            return;
        }

        let remaining = self.sediment_normalized();
        for crossing in self.milestones.evaluate(remaining) {
            let milestone = crossing.milestone;
            log::info!(
                "sediment milestone {:.2} reached ({:.2} remaining)",
                milestone.threshold,
                remaining
            );
            self.events.publish(PanEvent::SedimentMilestoneReached {
                threshold: milestone.threshold,
                remaining,
            });
            if milestone.shake_cue {
                self.events.publish(PanEvent::ShakeCue { remaining });
            }
            if milestone.sparkle_cue {
                self.events.publish(PanEvent::SparkleCue { remaining });
            }
        }

        self.reveal_gold(remaining);
    }

    fn reveal_gold(&mut self, remaining: f32) {
        for (id, particle) in self.gold.iter_mut() {
            if particle.is_revealed() || remaining > particle.reveal_ratio() {
                continue;
            }

            let id = *id;
            particle.mark_revealed();
            if !self.nuggets.contains_key(&id) {
                if let Some(handle) = self.presenter.spawn(id, particle.local_position()) {
                    self.nuggets.insert(id, handle);
                }
            }
            log::info!("gold {:?} revealed at {:.2} sediment remaining", id, remaining);
            self.events.publish(PanEvent::GoldRevealed {
                id,
                particle: *particle,
            });
        }
    }

    fn despawn_nugget(&mut self, id: GoldId) {
        if let Some(handle) = self.nuggets.remove(&id) {
            self.presenter.despawn(handle);
        }
    }
}

fn normalized(count: usize, initial: usize) -> f32 {
    if initial == 0 {
        0.0
    } else {
        (count as f32 / initial as f32).clamp(0.0, 1.0)
    }
}
