use std::sync::Mutex;

use energy_client::domain::{Horizon, PredictionSeries, Provenance};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

use crate::pipeline::PipelineError;

/// Bounds of a synthetic series: values fall in `[baseline, baseline + spread]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FallbackRange {
    pub baseline: f64,
    pub spread: f64,
}

impl FallbackRange {
    /// Meter-level hourly predictions.
    pub const METER: FallbackRange = FallbackRange {
        baseline: 20.0,
        spread: 50.0,
    };
    /// City-level predictions.
    pub const CITY: FallbackRange = FallbackRange {
        baseline: 200.0,
        spread: 50.0,
    };

    /// Finite, non-negative spread, and an upper bound that does not overflow.
    pub fn is_valid(&self) -> bool {
        self.baseline.is_finite()
            && self.spread.is_finite()
            && self.spread >= 0.0
            && (self.baseline + self.spread).is_finite()
    }

    /// Sampling bounds. A non-finite baseline becomes 0; a spread that is
    /// negative, non-finite or overflows collapses the range to the baseline.
    fn bounds(&self) -> (f64, f64) {
        let low = if self.baseline.is_finite() {
            self.baseline
        } else {
            0.0
        };
        let high = low + self.spread;
        if high.is_finite() && high >= low {
            (low, high)
        } else {
            (low, low)
        }
    }
}

/// Last-resort substitute for prediction series.
pub struct FallbackSynthesizer {
    rng: Mutex<StdRng>,
}

impl FallbackSynthesizer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence, for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// `horizon.hours()` uniform values within `range`.
    pub fn synthesize(&self, horizon: Horizon, range: FallbackRange) -> Vec<f64> {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (low, high) = range.bounds();
        (0..horizon.hours())
            .map(|_| rng.gen_range(low..=high))
            .collect()
    }

    /// Substitute prediction for a failed source, tagged and logged as fallback.
    pub fn substitute(
        &self,
        source: &str,
        horizon: Horizon,
        range: FallbackRange,
        cause: &PipelineError,
    ) -> PredictionSeries {
        tracing::warn!(
            source,
            horizon = horizon.as_str(),
            provenance = Provenance::Fallback.as_str(),
            error = %cause,
            "prediction source unavailable, substituting fallback series"
        );
        metrics::counter!("fallback_series_total", "source" => source.to_string()).increment(1);

        PredictionSeries {
            horizon,
            values: self.synthesize(horizon, range),
            provenance: Provenance::Fallback,
        }
    }
}

impl Default for FallbackSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
