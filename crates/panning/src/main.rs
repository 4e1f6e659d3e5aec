//! Headless gold panning session.
//!
//! Loads a config (JSON or YAML, tutorial defaults otherwise), shakes the pan
//! until the dirt is gone while picking out nuggets as they show, then swirls
//! with plenty of water to see what washes away.
//!
//! Usage: `pan-sim [config.json|config.yaml] [seed]`

use std::path::Path;

use panning::{
    BirthRateSink, EventLog, FluidEmitterDriver, PanConfig, PanEvent, PanInput, PanSim,
};

const DT: f32 = 1.0 / 30.0;
const SHAKE_SECONDS: f32 = 60.0;
const RINSE_SECONDS: f32 = 10.0;

struct LoggedEmitter;

impl BirthRateSink for LoggedEmitter {
    fn set_birth_rate(&mut self, birth_rate_per_second: f32) {
        log::debug!("water emitter birth rate -> {:.1}/s", birth_rate_per_second);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PanConfig::load(Path::new(&path))?,
        None => PanConfig::tutorial(),
    };
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(42);

    let mut sim = PanSim::new(&config, seed);
    let cues = EventLog::new();
    sim.contents.subscribe(cues.clone());
    FluidEmitterDriver::new(config.emitter)
        .with_sink(LoggedEmitter)
        .attach(&mut sim.contents);

    println!(
        "Pan loaded: {} sediment, {} gold (seed {})",
        sim.contents.sediment_count(),
        sim.gold_spawned,
        seed
    );

    // Water first so the rinse has something to work with later.
    let pour = PanInput {
        add_water: true,
        ..Default::default()
    };
    for _ in 0..3 {
        sim.update(&pour, DT);
    }

    let shake = PanInput {
        shake: true,
        swirl_rpm: 20.0,
        ..Default::default()
    };
    let mut picked = 0;
    let mut t = 0.0;
    while t < SHAKE_SECONDS && sim.contents.sediment_count() > 0 {
        sim.update(&shake, DT);
        // The player only reaches in while there is still dirt to hold gold back.
        if sim.contents.sediment_normalized() > config.motion.rinse.sediment_normalized_threshold {
            picked += sim.collect_revealed();
        }
        t += DT;
    }

    let swirl = PanInput {
        swirl_rpm: 30.0,
        ..Default::default()
    };
    let mut rinsed = 0;
    let mut t = 0.0;
    while t < RINSE_SECONDS && sim.gold_remaining() > 0 {
        rinsed += sim.update(&swirl, DT).gold_rinsed;
        t += DT;
    }
    picked += sim.collect_revealed();

    let milestones = cues.count(|e| matches!(e, PanEvent::SedimentMilestoneReached { .. }));
    let sparkles = cues.count(|e| matches!(e, PanEvent::SparkleCue { .. }));
    let shakes = cues.count(|e| matches!(e, PanEvent::ShakeStateChanged { shaking: true }));

    println!("Session time:   {:.1}s", sim.time_elapsed);
    println!("Milestones:     {} ({} sparkle cues, {} shake bouts)", milestones, sparkles, shakes);
    println!("Nuggets picked: {}", picked);
    println!("Gold rinsed:    {}", rinsed);
    println!("Recovery:       {:.1}%", sim.recovery_percent());
    println!("Balance:        {:.2}", sim.economy.balance());
    for unlock in sim.economy.tool_unlocks().iter().filter(|u| u.unlocked) {
        println!("Unlocked:       {}", unlock.id);
    }

    Ok(())
}
