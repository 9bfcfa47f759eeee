//! lobby: headless run of one elevator challenge.
//!
//! ```text
//! lobby [PRESET_INDEX | CHALLENGE.json] [TIME_SCALE]
//! ```
//!
//! Runs the chosen challenge with a collective dispatcher, writes
//! `output/lobby/stats.csv` and `output/lobby/outcome.csv`, and prints a
//! summary.  `RUST_LOG` controls log verbosity (default `info`).

mod collective;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use lift_control::ControlError;
use lift_core::{ElevatorId, PassengerId};
use lift_output::{CsvWriter, StatsOutputObserver};
use lift_sim::{Challenge, Controller, EndCondition, Outcome, SimObserver, Statistics, presets};

use collective::Collective;

// ── Constants ─────────────────────────────────────────────────────────────────

const FRAME_DT:      f64 = 1.0 / 60.0;
/// Perpetual challenges are cut off after this much simulated time.
const MAX_SIM_SECS:  f64 = 300.0;
const OUTPUT_DIR:    &str = "output/lobby";

// ── Observers ─────────────────────────────────────────────────────────────────

/// Shares the CSV observer with the controller so errors can be read back.
struct SharedOutput(Rc<RefCell<StatsOutputObserver<CsvWriter>>>);

impl SimObserver for SharedOutput {
    fn on_stats(&mut self, stats: &Statistics) {
        self.0.borrow_mut().on_stats(stats);
    }

    fn on_challenge_ended(&mut self, outcome: Outcome, stats: &Statistics) {
        self.0.borrow_mut().on_challenge_ended(outcome, stats);
    }
}

/// Counts deliveries and logs each one at debug level.
struct Deliveries(Rc<RefCell<u64>>);

impl SimObserver for Deliveries {
    fn on_passengers_exited(
        &mut self,
        elevator:   ElevatorId,
        floor:      u32,
        passengers: &[PassengerId],
    ) {
        *self.0.borrow_mut() += passengers.len() as u64;
        debug!(%elevator, floor, count = passengers.len(), "delivered");
    }

    fn on_user_code_error(&mut self, error: &ControlError) {
        warn!(%error, "dispatcher error");
    }
}

// ── Arguments ─────────────────────────────────────────────────────────────────

fn load_challenge(arg: Option<&str>) -> Result<Challenge> {
    let all = presets();
    let Some(arg) = arg else {
        return Ok(all[0].clone());
    };
    if let Ok(index) = arg.parse::<usize>() {
        return match all.get(index) {
            Some(c) => Ok(c.clone()),
            None => bail!("preset {index} does not exist (0..{})", all.len()),
        };
    }
    let text = std::fs::read_to_string(arg).with_context(|| format!("reading {arg}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {arg}"))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let challenge = load_challenge(args.first().map(String::as_str))?;
    let time_scale: f64 = match args.get(1) {
        Some(s) => s.parse().with_context(|| format!("invalid time scale {s:?}"))?,
        None => 1.0,
    };

    println!("=== lobby: elevator challenge ===");
    println!(
        "Floors: {}  |  Elevators: {}  |  Spawn rate: {}/s  |  Seed: {}",
        challenge.config.floor_count,
        challenge.config.elevator_count,
        challenge.config.spawn_rate,
        challenge.config.seed
    );
    println!("Goal: {}", challenge.goal.describe());
    println!();

    // 1. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let output = Rc::new(RefCell::new(StatsOutputObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?)));
    let delivered = Rc::new(RefCell::new(0u64));

    // 2. Controller.
    let mut controller = Controller::new();
    controller.subscribe(Box::new(SharedOutput(Rc::clone(&output))));
    controller.subscribe(Box::new(Deliveries(Rc::clone(&delivered))));
    controller.initialize_challenge(challenge.config.clone(), challenge.goal)?;
    let applied_scale = controller.set_time_scale(time_scale);
    controller.start(Collective)?;
    info!(time_scale = applied_scale, "running");

    // 3. Run.
    let t0 = Instant::now();
    let mut simulated = 0.0;
    while !controller.is_challenge_ended() && simulated < MAX_SIM_SECS {
        simulated += controller.frame(FRAME_DT);
    }
    let wall = t0.elapsed();

    let mut output = output.borrow_mut();
    if !controller.is_challenge_ended() {
        output.finish();
    }
    if let Some(e) = output.take_error() {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    let Some(engine) = controller.engine() else {
        bail!("controller lost its engine");
    };
    let stats = engine.stats();
    let outcome = engine.outcome().map_or("unfinished", Outcome::as_str);
    println!("Simulated {:.1} s in {:.3} s wall time", stats.elapsed, wall.as_secs_f64());
    println!("  outcome        : {outcome}");
    println!("  transported    : {} ({} seen by observer)", stats.transported, delivered.borrow());
    println!("  per second     : {:.3}", stats.transported_per_sec);
    println!("  avg wait       : {:.2} s", stats.avg_wait);
    println!("  max wait       : {:.2} s", stats.max_wait);
    println!("  moves          : {}", stats.move_count);
    println!("  still waiting  : {}", engine.passengers().iter().filter(|p| p.transported_at.is_none()).count());
    println!("  stats.csv      : {} rows", output.rows_written());

    Ok(())
}
