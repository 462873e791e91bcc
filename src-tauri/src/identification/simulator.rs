use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::time::{self, Duration, MissedTickBehavior};

use crate::models::{CapturePayload, CatalogEntry, Source, VideoResult};
use crate::store::TICK_PROGRESS_CAP;

use super::{IdentificationError, Identifier, ProgressReporter, CATALOG};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Timing and odds of the simulated backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatorConfig {
    pub tick_interval_ms: u64,
    /// Each tick adds a uniform increment in `[0, max_increment)`.
    pub max_increment: f64,
    /// Total time to a verdict is `base_delay_ms + [0, delay_jitter_ms)`.
    pub base_delay_ms: u64,
    pub delay_jitter_ms: u64,
    pub failure_rate: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            max_increment: 15.0,
            base_delay_ms: 3000,
            delay_jitter_ms: 2000,
            failure_rate: 0.1,
        }
    }
}

/// Stand-in backend: waits a random while, then picks a catalog movie at
/// random or reports no match.
pub struct MockIdentifier {
    config: SimulatorConfig,
    catalog: &'static [CatalogEntry],
    rng: Mutex<StdRng>,
}

impl MockIdentifier {
    pub fn new(config: SimulatorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: SimulatorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimulatorConfig, rng: StdRng) -> Self {
        Self {
            config,
            catalog: &CATALOG,
            rng: Mutex::new(rng),
        }
    }

    fn with_rng_mut<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    fn total_delay(&self) -> Duration {
        let jitter = if self.config.delay_jitter_ms == 0 {
            0
        } else {
            self.with_rng_mut(|rng| rng.gen_range(0..self.config.delay_jitter_ms))
        };
        Duration::from_millis(self.config.base_delay_ms + jitter)
    }

    fn next_increment(&self) -> f64 {
        if self.config.max_increment <= 0.0 {
            return 0.0;
        }
        self.with_rng_mut(|rng| rng.gen_range(0.0..self.config.max_increment))
    }

    /// The verdict alone, without any waiting.
    pub fn draw(&self, source: Source) -> Result<VideoResult, IdentificationError> {
        let failure_rate = self.config.failure_rate.clamp(0.0, 1.0);
        self.with_rng_mut(|rng| {
            if rng.gen_bool(failure_rate) {
                return Err(IdentificationError::NoMatch);
            }
            self.catalog
                .choose(rng)
                .map(|entry| entry.stamp(source, Utc::now()))
                .ok_or(IdentificationError::NoMatch)
        })
    }
}

impl Identifier for MockIdentifier {
    async fn identify(
        &self,
        payload: &CapturePayload,
        source: Source,
        progress: ProgressReporter,
    ) -> Result<VideoResult, IdentificationError> {
        let total_delay = self.total_delay();
        log_info!(
            "Identifying recording {} from {} (simulated {}ms)",
            payload.id,
            source.as_str(),
            total_delay.as_millis()
        );

        let deadline = time::sleep(total_delay);
        tokio::pin!(deadline);

        let tick_interval = Duration::from_millis(self.config.tick_interval_ms.max(1));
        let mut ticker = time::interval_at(time::Instant::now() + tick_interval, tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ticking = true;
        while ticking {
            tokio::select! {
                _ = &mut deadline => break,
                _ = ticker.tick() => {
                    ticking = progress.advance(self.next_increment()) < TICK_PROGRESS_CAP;
                }
            }
        }
        if !ticking {
            deadline.await;
        }

        let verdict = self.draw(source);
        match &verdict {
            Ok(result) => log_info!("Recording {} matched \"{}\"", payload.id, result.title),
            Err(err) => log_warn!("Recording {} not identified: {err}", payload.id),
        }
        verdict
    }
}
