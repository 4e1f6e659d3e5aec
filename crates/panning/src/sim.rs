use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PanConfig;
use crate::contents::PanContents;
use crate::controls::{PanInput, PanMotion};
use crate::economy::GoldEconomy;
use crate::journal::{ProspectingEntry, ProspectingJournal};
use crate::materials::{GoldId, WaterParticle};
use crate::motion::{MotionAnalyzer, TickReport};
use crate::presenter::{HeadlessPresenter, NuggetPresenter};

/// Water poured from the creek, in the same units as [`WaterParticle::volume`].
const WATER_DENSITY: f32 = 1.0;

/// Pan simulation state: one panning session from loading dirt to the last nugget.
pub struct PanSim<P: NuggetPresenter = HeadlessPresenter> {
    pub contents: PanContents<P>,
    pub analyzer: MotionAnalyzer,
    pub motion: PanMotion,
    pub economy: GoldEconomy,
    pub journal: ProspectingJournal,
    pub gold_spawned: usize,
    pub time_elapsed: f32,
    water_per_pour: f32,
    rng: StdRng,
}

impl PanSim<HeadlessPresenter> {
    pub fn new(config: &PanConfig, seed: u64) -> Self {
        Self::with_presenter(config, HeadlessPresenter, seed)
    }
}

impl<P: NuggetPresenter> PanSim<P> {
    /// Build a session and load the configured sample into the pan.
    pub fn with_presenter(config: &PanConfig, presenter: P, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let load = config.sample.spawn(&mut rng);
        let gold_spawned = load.gold.len();

        let mut contents = PanContents::with_presenter(presenter, config.milestones.clone());
        contents.set_sediment(load.sediment);
        contents.set_gold(load.gold);

        log::info!(
            "loaded pan: {} sediment, {} gold",
            contents.sediment_count(),
            gold_spawned
        );

        Self {
            contents,
            analyzer: MotionAnalyzer::new(config.motion),
            motion: PanMotion::new(config.controls),
            economy: GoldEconomy::new(config.economy.clone()),
            journal: ProspectingJournal::new(),
            gold_spawned,
            time_elapsed: 0.0,
            water_per_pour: config.controls.water_per_pour,
            rng,
        }
    }

    pub fn update(&mut self, input: &PanInput, dt: f32) -> TickReport {
        self.time_elapsed += dt.max(0.0);

        let angular_velocity = self.motion.update(input, dt, &mut self.rng);

        if input.add_water {
            self.contents
                .add_water(WaterParticle::new(self.water_per_pour * WATER_DENSITY, WATER_DENSITY));
        }
        if input.dump {
            self.contents.clear_water();
        }

        self.analyzer
            .tick_with_velocity(&mut self.contents, dt, angular_velocity)
    }

    /// Pick a revealed nugget out of the pan and bank it.
    pub fn collect(&mut self, id: GoldId, world_position: Vec3) -> Option<ProspectingEntry> {
        let collected = self.contents.try_collect(id)?;
        Some(
            self.journal
                .record_find(&collected.particle, world_position, Some(&mut self.economy)),
        )
    }

    /// Pick every nugget that is currently showing. Returns how many were taken.
    pub fn collect_revealed(&mut self) -> usize {
        let revealed: Vec<(GoldId, Vec3)> = self
            .contents
            .revealed_gold()
            .map(|(id, gold)| (id, gold.local_position()))
            .collect();

        revealed
            .into_iter()
            .filter(|&(id, position)| self.collect(id, position).is_some())
            .count()
    }

    pub fn gold_remaining(&self) -> usize {
        self.contents.gold_count()
    }

    /// Share of the spawned gold that ended up in the journal.
    pub fn recovery_percent(&self) -> f32 {
        if self.gold_spawned == 0 {
            return 0.0;
        }
        (self.journal.entries().len() as f32 / self.gold_spawned as f32) * 100.0
    }
}
