//! Vlok Replay Tool
//!
//! Runs a scripted demo session and verifies that replaying its recording
//! reproduces the same world, or replays an existing recording file.
//!
//! ```text
//! vlok-replay                 demo session, saved if ./recordings exists
//! vlok-replay <file.mln>      replay a recording
//! vlok-replay --latest        replay the newest file in ./recordings
//! ```
//!
//! World parameters come from the JSON file named by `VLOK_CONFIG`, if set.

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vlok::{
    FailurePolicy, Int, PlayerInput, Pt, Recording, RecordingStore, VERSION, TICK_RATE,
    core::unit::UNIT,
    game::{
        state::{Intent, World, WorldConfig},
        recording::DEFAULT_RECORDINGS_DIR,
        tick::{replay, tick, verify_replay},
    },
};

const DEMO_FRAMES: i64 = 1800;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Vlok Simulation v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = WorldConfig::from_env().context("loading world config")?;
    let store = RecordingStore::new(DEFAULT_RECORDINGS_DIR, FailurePolicy::BestEffort { max_attempts: 3 });

    match std::env::args().nth(1).as_deref() {
        None => demo_session(&config, &store),
        Some("--latest") => match store.latest_recording()? {
            Some(path) => replay_file(&config, &store, &path),
            None => bail!("no recordings found in {}", store.dir().display()),
        },
        Some(path) => replay_file(&config, &store, std::path::Path::new(path)),
    }
}

/// Replay a recording file and report the final state.
fn replay_file(config: &WorldConfig, store: &RecordingStore, path: &std::path::Path) -> anyhow::Result<()> {
    info!("=== Replaying {} ===", path.display());
    let recording = store
        .load(path)
        .with_context(|| format!("loading {}", path.display()))?;

    info!("Seed: {}, difficulty: {}, frames: {}", recording.seed, recording.difficulty, recording.len());
    info!("Recording Hash: {}", hex::encode(recording.compute_hash()));

    let world = replay(&recording, config)?;
    report(&world);
    Ok(())
}

/// Scripted session exercising every input kind.
fn demo_session(config: &WorldConfig, store: &RecordingStore) -> anyhow::Result<()> {
    info!("=== Starting Demo Session ===");

    let seed = Int::new(12345);
    let difficulty = Int::new(40);
    let mut world = World::new(seed, difficulty, config)?;
    let mut recording = Recording::new(seed, difficulty);

    info!("RNG Seed: {}", seed);
    info!("Obstacles: {}", world.obstacles.count());
    info!("Character at {}, food at {}", world.character.pos, world.food.pos);

    let mut last_report = 0;
    for t in 0..DEMO_FRAMES {
        let input = demo_input(&world, t);
        let outcome = tick(&mut world, &input)?;
        recording.push(input);

        if outcome.ate_food {
            info!("Frame {}: food eaten, new food at {}", t, world.food.pos);
        }
        if t - last_report >= 600 {
            info!("Frame {}: character at {}, {} food eaten", t, world.character.pos, world.food_eaten);
            last_report = t;
        }
    }

    info!("=== Session Results ===");
    let hash = report(&world);

    // Round-trip through the wire format before verifying.
    let bytes = recording.to_bytes()?;
    info!("Recording: {} frames, {} bytes", recording.len(), bytes.len());
    let decoded = Recording::from_bytes(&bytes)?;

    info!("=== Verifying Determinism ===");
    match verify_replay(&decoded, config, &hash) {
        Ok(_) => info!("DETERMINISM VERIFIED: Hashes match!"),
        Err(e) => {
            warn!("DETERMINISM FAILURE: {}", e);
            return Err(e.into());
        }
    }

    match store.save_new(&recording)? {
        Some(path) => info!("Saved recording to {}", path.display()),
        None => info!("Recording directory {} not found, not saving", store.dir().display()),
    }
    Ok(())
}

/// Mostly chase the food; every few seconds grab the character and drop it
/// somewhere else, or steer it by hand for a while.
fn demo_input(world: &World, t: i64) -> PlayerInput {
    let drop_at = Pt::from_ints((t * 37 % 60 + 10) * UNIT, (t * 53 % 60 + 10) * UNIT);
    match t % 300 {
        100 => PlayerInput::pick_at(world.character.pos),
        101..=119 => PlayerInput::at(drop_at),
        120 => PlayerInput::release_at(drop_at),
        200 => PlayerInput::with_intent(Intent::MoveRight),
        230 => PlayerInput::with_intent(Intent::MoveDown),
        260 => PlayerInput::with_intent(Intent::MoveToFood),
        _ => PlayerInput::idle(),
    }
}

fn report(world: &World) -> vlok::core::hash::StateHash {
    let hash = world.compute_hash();
    info!("Frames: {}", world.time_step);
    info!("Food eaten: {}", world.food_eaten);
    info!("Character at {}, health {}", world.character.pos, world.character.health);
    info!("Final State Hash: {}", hex::encode(hash));
    hash
}
