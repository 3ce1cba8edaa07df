//! Run configuration read from the environment.
//!
//! - `SNAKE_TICK_MS`: tick interval in milliseconds (default 130, clamped to >= 10)
//! - `SNAKE_SEED`: RNG seed (default: derived from the system clock)
//! - `SNAKE_LOCKSTEP`: `1`/`true` makes the headless adapter advance only on `step`

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::types::{MIN_TICK_MS, TICK_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub tick_ms: u32,
    pub seed: u32,
    pub lockstep: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            seed: 1,
            lockstep: false,
        }
    }
}

impl RunConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a closure over a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tick_ms = lookup("SNAKE_TICK_MS")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(TICK_MS)
            .max(MIN_TICK_MS);

        let seed = lookup("SNAKE_SEED")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or_else(clock_seed);

        let lockstep = lookup("SNAKE_LOCKSTEP")
            .map(|v| {
                let v = v.trim();
                v == "1" || v.eq_ignore_ascii_case("true")
            })
            .unwrap_or(false);

        Self {
            tick_ms,
            seed,
            lockstep,
        }
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_ms as u64)
    }
}

fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    nanos ^ std::process::id().rotate_left(16)
}
