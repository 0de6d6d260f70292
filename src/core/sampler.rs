use rand::Rng;
use rand::rngs::StdRng;

use super::types::ReturnRange;

pub const RETURN_FLOOR: f64 = -90.0;
const JITTER_SHARE: f64 = 0.2;

/// Source of uniform draws for the engine. Seeded runs pass a `StdRng`;
/// tests script the sequence directly.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    fn uniform_between(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.uniform()
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.uniform() < probability
    }
}

impl RandomSource for StdRng {
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// One annual return in percent. The base is uniform over the range, then
/// jittered by up to +/-20% of itself (scaled by `volatility_factor`), so the
/// result can leave the stated range. Floored at -90%.
pub fn sample_return(
    range: ReturnRange,
    volatility_factor: f64,
    rng: &mut impl RandomSource,
) -> f64 {
    let base = rng.uniform_between(range.min, range.max);
    let jitter = (rng.uniform() * 2.0 - 1.0) * JITTER_SHARE * base * volatility_factor;
    (base + jitter).max(RETURN_FLOOR)
}
