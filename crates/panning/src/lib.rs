//! Gold panning minigame core.
//!
//! A pan holds water, sediment and gold particles. Shaking the pan washes out
//! the lightest sediment, which walks a ladder of one-shot milestones and
//! reveals gold as the dirt thins out. Revealed gold can be picked out by the
//! player, or lost over the lip once there is plenty of water and little
//! sediment left to hold it.
//!
//! This crate is framework-agnostic: visuals plug in through
//! [`NuggetPresenter`], fluid emitters through [`BirthRateSink`], and cue or
//! scoring consumers through [`PanListener`].
//!
//! # Example
//!
//! ```
//! use panning::{GoldParticle, MotionAnalyzer, PanContents, SedimentParticle};
//! use glam::Vec3;
//!
//! let mut pan = PanContents::new();
//! pan.set_sediment(vec![SedimentParticle::new(1.0, 2.65); 10]);
//! let ids = pan.set_gold([GoldParticle::with_reveal(5.0, 19.3, 0.5, Vec3::ZERO, 55.0)]);
//!
//! let mut analyzer = MotionAnalyzer::default();
//! let shaking = analyzer.shake_threshold() + 1.0;
//! while pan.sediment_normalized() > 0.2 {
//!     analyzer.tick(&mut pan, 0.25, shaking);
//! }
//!
//! let collected = pan.try_collect(ids[0]).expect("gold should be showing");
//! assert_eq!(collected.id, ids[0]);
//! ```

pub mod config;
pub mod contents;
pub mod controls;
pub mod economy;
pub mod emitter;
pub mod events;
pub mod journal;
pub mod materials;
pub mod milestones;
pub mod motion;
pub mod presenter;
pub mod rinse;
pub mod sample;
pub mod sim;
pub mod tools;

pub use config::PanConfig;
pub use contents::{CollectedGold, PanContents};
pub use controls::{ControlConfig, PanInput, PanMotion};
pub use economy::{Deposit, EconomyConfig, GoldEconomy, ToolUnlock};
pub use emitter::{BirthRateSink, EmitterConfig, FluidEmitterDriver};
pub use events::{EventBus, EventLog, PanEvent, PanListener};
pub use journal::{ProspectingEntry, ProspectingJournal};
pub use materials::{GoldId, GoldParticle, SedimentMaterial, SedimentParticle, WaterParticle};
pub use milestones::{default_milestones, Milestone, MilestoneLadder};
pub use motion::{MotionAnalyzer, MotionConfig, ResponseCurve, TickReport};
pub use presenter::{HeadlessPresenter, NuggetPresenter};
pub use rinse::{RinseConfig, RinseGate};
pub use sample::{PanLoad, PanSample};
pub use sim::PanSim;
pub use tools::{ScoopSpec, ScoopingTool, ToolEvent, ToolState};
