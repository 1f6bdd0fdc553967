//! Session Recording
//!
//! A recording is everything needed to reproduce a session: the seed, the
//! difficulty and every frame's input, in order.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────┬──────────────┬────────────┬──────────────────────────┐
//! │ seed i64 │ difficulty   │ len u64    │ len × PlayerInput (23 B)  │
//! │ 8 bytes  │ i64, 8 bytes │ 8 bytes    │ pos 2×i64, 7 flag bytes   │
//! └──────────┴──────────────┴────────────┴──────────────────────────┘
//!   all little-endian, no padding, nothing after the last input
//! ```
//!
//! Recordings are stored as `recorded-inputs-YYYY-MM-DD-NNNNNN.mln` files.
//! Reading and writing them is the only place where a best-effort retry
//! policy is allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use bincode::Options;
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::core::hash::{StateHash, StateHasher};
use crate::core::int::Int;
use crate::error::{Result, SimError};
use crate::game::input::PlayerInput;

/// Default directory for recordings, relative to the working directory.
pub const DEFAULT_RECORDINGS_DIR: &str = "recordings";

/// Recording file extension.
pub const RECORDING_EXTENSION: &str = "mln";

const MAX_FILES_PER_DAY: u32 = 1_000_000;

/// Pause between best-effort attempts.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Fixed-width little-endian codec; trailing bytes are an error.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

// =============================================================================
// RECORDING
// =============================================================================

/// A recorded session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// World seed.
    pub seed: Int,
    /// World difficulty.
    pub difficulty: Int,
    /// One input per frame.
    pub inputs: Vec<PlayerInput>,
}

impl Recording {
    /// Size of the fixed header in bytes.
    pub const HEADER_SIZE: usize = 24;

    /// Empty recording for a world built from `seed` and `difficulty`.
    pub fn new(seed: Int, difficulty: Int) -> Self {
        Self {
            seed,
            difficulty,
            inputs: Vec::with_capacity(3600), // one minute at 60 Hz
        }
    }

    /// Record the next frame's input.
    pub fn push(&mut self, input: PlayerInput) {
        self.inputs.push(input);
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True if no frame was recorded.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Encoded size in bytes.
    pub fn encoded_size(&self) -> usize {
        Self::HEADER_SIZE + self.inputs.len() * PlayerInput::SIZE
    }

    /// Serialize to the binary session format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(codec().serialize(self)?)
    }

    /// Deserialize from the binary session format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(codec().deserialize(bytes)?)
    }

    /// Fingerprint of the recording itself (not of the replayed state).
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_recording();
        hasher.update_int(self.seed);
        hasher.update_int(self.difficulty);
        hasher.update_u64(self.inputs.len() as u64);
        for input in &self.inputs {
            hasher.update_pt(input.position);
            for flag in [
                input.pick,
                input.release,
                input.move_left,
                input.move_right,
                input.move_up,
                input.move_down,
                input.move_to_food,
            ] {
                hasher.update_bool(flag);
            }
        }
        hasher.finalize()
    }
}

// =============================================================================
// FAILURE POLICY
// =============================================================================

/// How the recording store reacts to I/O and decode failures.
///
/// Errors raised by the simulation itself are never retried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Fail on the first error.
    #[default]
    Strict,
    /// Retry up to `max_attempts` times in total, logging each failure.
    BestEffort {
        /// Total attempts, including the first.
        max_attempts: u32,
    },
}

impl FailurePolicy {
    /// Run `op` under this policy, sleeping [`RETRY_BACKOFF`] between
    /// attempts.
    pub fn run<T>(&self, what: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let max_attempts = match *self {
            FailurePolicy::Strict => 1,
            FailurePolicy::BestEffort { max_attempts } => max_attempts.max(1),
        };

        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_kernel_failure() && attempt < max_attempts => {
                    warn!(attempt, max_attempts, error = %e, "{} failed, retrying", what);
                    attempt += 1;
                    thread::sleep(RETRY_BACKOFF);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Directory of recording files.
#[derive(Clone, Debug)]
pub struct RecordingStore {
    dir: PathBuf,
    policy: FailurePolicy,
}

impl Default for RecordingStore {
    fn default() -> Self {
        Self::new(DEFAULT_RECORDINGS_DIR, FailurePolicy::default())
    }
}

impl RecordingStore {
    /// Store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, policy: FailurePolicy) -> Self {
        Self { dir: dir.into(), policy }
    }

    /// Store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Failure policy for file operations.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// True if the directory exists. Recording is off otherwise.
    pub fn is_enabled(&self) -> bool {
        self.dir.is_dir()
    }

    /// File name for the `index`-th recording of `date`.
    pub fn file_name(date: NaiveDate, index: u32) -> String {
        format!(
            "recorded-inputs-{}-{:06}.{}",
            date.format("%Y-%m-%d"),
            index,
            RECORDING_EXTENSION
        )
    }

    /// First unused recording path for today, or `None` if the store
    /// directory does not exist.
    pub fn new_recording_path(&self) -> Result<Option<PathBuf>> {
        self.new_recording_path_for(chrono::Local::now().date_naive())
    }

    /// First unused recording path for `date`.
    pub fn new_recording_path_for(&self, date: NaiveDate) -> Result<Option<PathBuf>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        for index in 0..MAX_FILES_PER_DAY {
            let path = self.dir.join(Self::file_name(date, index));
            if !path.exists() {
                return Ok(Some(path));
            }
        }
        Err(SimError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free recording file name for {}", date),
        )))
    }

    /// Most recent recording: the lexicographically last `.mln` file.
    pub fn latest_recording(&self) -> Result<Option<PathBuf>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        self.policy.run("listing recordings", || {
            let mut latest: Option<PathBuf> = None;
            for entry in fs::read_dir(&self.dir)? {
                let path = entry?.path();
                let is_recording = path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(RECORDING_EXTENSION);
                if is_recording && latest.as_ref().map_or(true, |l| path.file_name() > l.file_name()) {
                    latest = Some(path);
                }
            }
            Ok(latest)
        })
    }

    /// Write `recording` to `path`.
    pub fn save(&self, recording: &Recording, path: &Path) -> Result<()> {
        let bytes = recording.to_bytes()?;
        self.policy.run("saving recording", || Ok(fs::write(path, &bytes)?))?;
        info!(path = %path.display(), frames = recording.len(), "recording saved");
        Ok(())
    }

    /// Save `recording` under a fresh name; `None` if the store is disabled.
    pub fn save_new(&self, recording: &Recording) -> Result<Option<PathBuf>> {
        match self.new_recording_path()? {
            Some(path) => {
                self.save(recording, &path)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    /// Read and decode the recording at `path`.
    pub fn load(&self, path: &Path) -> Result<Recording> {
        self.policy.run("loading recording", || {
            let bytes = fs::read(path)?;
            Recording::from_bytes(&bytes)
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
