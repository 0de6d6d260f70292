//! Crash / correction / recovery process for the volatile value track.
//!
//! The state is a plain value owned by one projection run. [`step`] is pure
//! apart from the random draws it takes, so each transition can be exercised
//! on its own.

use super::sampler::RandomSource;
use super::types::InstrumentClass;

pub const CRASH_PROBABILITY: f64 = 0.187;
pub const CORRECTION_PROBABILITY: f64 = 0.5;

const CRASH_RECOVERY_YEARS: (f64, f64) = (1.0, 1.7);
const CORRECTION_YEARS: (f64, f64) = (0.5, 0.83);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ShockKind {
    Crash,
    Correction,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Normal,
    CrashActive,
    Recovering,
    CorrectionActive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecoveryState {
    pub is_recovering: bool,
    /// Volatile value before the crash; recovery closes the gap toward it.
    pub target_value: f64,
    pub recovery_time_remaining: f64,
    pub total_recovery_time: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrectionState {
    pub is_in_correction: bool,
    pub correction_time_remaining: f64,
    pub total_correction_time: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShockState {
    pub recovery: RecoveryState,
    pub correction: CorrectionState,
}

impl ShockState {
    /// No shock may start unless this holds.
    pub fn is_quiet(&self) -> bool {
        !self.recovery.is_recovering && !self.correction.is_in_correction
    }
}

/// What one simulated year looks like to the value tracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearShock {
    pub phase: Phase,
    /// Share of the remaining gap to `recovery_target` closed this year.
    pub recovery_step: f64,
    pub recovery_target: f64,
    pub recovery_progress: Option<f64>,
    pub correction_recovery_progress: Option<f64>,
    pub recovery_time_remaining: f64,
    pub correction_time_remaining: f64,
}

impl YearShock {
    fn normal() -> Self {
        Self {
            phase: Phase::Normal,
            recovery_step: 0.0,
            recovery_target: 0.0,
            recovery_progress: None,
            correction_recovery_progress: None,
            recovery_time_remaining: 0.0,
            correction_time_remaining: 0.0,
        }
    }

    /// Shock that started this year, if any.
    pub fn started(&self) -> Option<ShockKind> {
        match self.phase {
            Phase::CrashActive => Some(ShockKind::Crash),
            Phase::CorrectionActive => Some(ShockKind::Correction),
            Phase::Normal | Phase::Recovering => None,
        }
    }

    /// Only years after the crash count; the crash year itself reports the crash.
    pub fn is_recovery_year(&self) -> bool {
        self.phase == Phase::Recovering
    }

    /// End-of-year volatile value of one instrument.
    ///
    /// `weight` is the instrument's share of the portfolio (0..=1) and
    /// `volatile_total` the whole volatile track at the start of the year.
    pub fn volatile_outcome(
        &self,
        weight: f64,
        volatile_total: f64,
        annual_return: f64,
        drawdown: Option<f64>,
        contribution: f64,
    ) -> f64 {
        let share = volatile_total * weight;
        match self.phase {
            Phase::Normal => share * (1.0 + annual_return / 100.0) + contribution,
            Phase::CrashActive | Phase::CorrectionActive => {
                apply_drawdown(share, drawdown.unwrap_or(0.0)) + contribution
            }
            Phase::Recovering => {
                let target_share = self.recovery_target * weight;
                share + (target_share - share).max(0.0) * self.recovery_step + contribution
            }
        }
    }
}

/// Advances the process by one year. `volatile_value` is the volatile track
/// at the start of the year and becomes the recovery target if a crash hits.
pub fn step(
    state: ShockState,
    year: u32,
    volatile_value: f64,
    rng: &mut impl RandomSource,
) -> (ShockState, YearShock) {
    if !state.is_quiet() {
        if state.recovery.is_recovering {
            return continue_recovery(state, year);
        }
        // corrections never outlive their starting year
        let next = ShockState {
            correction: CorrectionState::default(),
            ..state
        };
        let shock = YearShock {
            correction_recovery_progress: Some(1.0),
            ..YearShock::normal()
        };
        return (next, shock);
    }

    if rng.chance(CRASH_PROBABILITY) {
        return start_crash(state, year, volatile_value, rng);
    }

    if rng.chance(CORRECTION_PROBABILITY) {
        return start_correction(state, year, rng);
    }

    (state, YearShock::normal())
}

fn start_crash(
    state: ShockState,
    year: u32,
    volatile_value: f64,
    rng: &mut impl RandomSource,
) -> (ShockState, YearShock) {
    let duration = rng.uniform_between(CRASH_RECOVERY_YEARS.0, CRASH_RECOVERY_YEARS.1);
    tracing::debug!(year, duration, "crash started");

    if duration <= 1.0 {
        let next = ShockState {
            recovery: RecoveryState {
                total_recovery_time: duration,
                ..RecoveryState::default()
            },
            ..state
        };
        let shock = YearShock {
            phase: Phase::CrashActive,
            recovery_progress: Some(1.0),
            ..YearShock::normal()
        };
        return (next, shock);
    }

    let remaining = duration - 1.0;
    let next = ShockState {
        recovery: RecoveryState {
            is_recovering: true,
            target_value: volatile_value,
            recovery_time_remaining: remaining,
            total_recovery_time: duration,
        },
        ..state
    };
    let shock = YearShock {
        phase: Phase::CrashActive,
        recovery_target: volatile_value,
        recovery_progress: Some(1.0 / duration),
        recovery_time_remaining: remaining,
        ..YearShock::normal()
    };
    (next, shock)
}

fn continue_recovery(state: ShockState, year: u32) -> (ShockState, YearShock) {
    let recovery = state.recovery;
    let before = recovery.recovery_time_remaining;
    let completes = before <= 1.0;
    let remaining = if completes { 0.0 } else { before - 1.0 };
    let recovery_step = if completes || before <= 0.0 {
        1.0
    } else {
        1.0 / before
    };
    let progress = if completes || recovery.total_recovery_time <= 0.0 {
        1.0
    } else {
        ((recovery.total_recovery_time - remaining) / recovery.total_recovery_time).clamp(0.0, 1.0)
    };

    if completes {
        tracing::debug!(year, "crash recovery completed");
    }

    let next = ShockState {
        recovery: if completes {
            RecoveryState {
                total_recovery_time: recovery.total_recovery_time,
                ..RecoveryState::default()
            }
        } else {
            RecoveryState {
                recovery_time_remaining: remaining,
                ..recovery
            }
        },
        ..state
    };
    let shock = YearShock {
        phase: Phase::Recovering,
        recovery_step,
        recovery_target: recovery.target_value,
        recovery_progress: Some(progress),
        recovery_time_remaining: remaining,
        ..YearShock::normal()
    };
    (next, shock)
}

fn start_correction(
    state: ShockState,
    year: u32,
    rng: &mut impl RandomSource,
) -> (ShockState, YearShock) {
    let duration = rng.uniform_between(CORRECTION_YEARS.0, CORRECTION_YEARS.1);
    tracing::debug!(year, duration, "correction started");

    // Resolved within the year whatever the drawn duration.
    let next = ShockState {
        correction: CorrectionState {
            is_in_correction: false,
            correction_time_remaining: 0.0,
            total_correction_time: duration,
        },
        ..state
    };
    let shock = YearShock {
        phase: Phase::CorrectionActive,
        correction_recovery_progress: Some(1.0),
        ..YearShock::normal()
    };
    (next, shock)
}

/// Drawdown magnitude range in percent. Gold ranges are gains.
fn drawdown_range(class: InstrumentClass, kind: ShockKind) -> (f64, f64) {
    use InstrumentClass::*;
    match (kind, class) {
        (ShockKind::Crash, BroadEtf) => (15.0, 25.0),
        (ShockKind::Crash, SectorEtf) => (25.0, 40.0),
        (ShockKind::Crash, GrowthStock) => (25.0, 35.0),
        (ShockKind::Crash, CryptoEtf | Crypto | Options | Leveraged | Moonshot) => (35.0, 45.0),
        (ShockKind::Crash, Gold) => (5.0, 15.0),
        (ShockKind::Correction, BroadEtf) => (8.0, 12.0),
        (ShockKind::Correction, SectorEtf) => (12.0, 18.0),
        (ShockKind::Correction, GrowthStock) => (10.0, 15.0),
        (ShockKind::Correction, CryptoEtf | Crypto | Options | Leveraged | Moonshot) => {
            (18.0, 30.0)
        }
        (ShockKind::Correction, Gold) => (2.0, 5.0),
    }
}

/// Drawdown in percent for one instrument. Gold hedges: its drawdown is
/// negative, which `apply_drawdown` turns into a gain.
pub fn draw_drawdown(class: InstrumentClass, kind: ShockKind, rng: &mut impl RandomSource) -> f64 {
    let (low, high) = drawdown_range(class, kind);
    let magnitude = rng.uniform_between(low, high);
    if class == InstrumentClass::Gold {
        -magnitude
    } else {
        magnitude
    }
}

pub fn apply_drawdown(allocation: f64, drawdown: f64) -> f64 {
    allocation * (1.0 - drawdown / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::testing::ScriptedSource;
    use proptest::prelude::{any, prop_assert, proptest};
    use proptest::sample::select;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f64 = 1e-9;

    const ALL_CLASSES: [InstrumentClass; 9] = [
        InstrumentClass::BroadEtf,
        InstrumentClass::SectorEtf,
        InstrumentClass::GrowthStock,
        InstrumentClass::CryptoEtf,
        InstrumentClass::Crypto,
        InstrumentClass::Gold,
        InstrumentClass::Options,
        InstrumentClass::Leveraged,
        InstrumentClass::Moonshot,
    ];

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn quiet_year_without_shock_draws_twice() {
        let mut rng = ScriptedSource::constant(0.9);
        let (next, shock) = step(ShockState::default(), 1, 1000.0, &mut rng);

        assert_eq!(shock.phase, Phase::Normal);
        assert_eq!(next, ShockState::default());
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn long_crash_enters_recovery_with_pre_crash_target() {
        // crash (0.1 < 0.187), duration = 1.0 + 0.7 * 0.5 = 1.35
        let mut rng = ScriptedSource::new(&[0.1, 0.5]);
        let (next, shock) = step(ShockState::default(), 3, 2_000.0, &mut rng);

        assert_eq!(shock.phase, Phase::CrashActive);
        assert_eq!(shock.started(), Some(ShockKind::Crash));
        assert!(!shock.is_recovery_year());
        assert!(next.recovery.is_recovering);
        assert_approx(next.recovery.target_value, 2_000.0);
        assert_approx(next.recovery.total_recovery_time, 1.35);
        assert_approx(next.recovery.recovery_time_remaining, 0.35);
        assert_approx(shock.recovery_progress.expect("progress"), 1.0 / 1.35);
        assert!(!next.is_quiet());
    }

    #[test]
    fn crash_of_exactly_one_year_resolves_in_place() {
        let mut rng = ScriptedSource::new(&[0.1, 0.0]);
        let (next, shock) = step(ShockState::default(), 1, 500.0, &mut rng);

        assert_eq!(shock.phase, Phase::CrashActive);
        assert_eq!(shock.recovery_progress, Some(1.0));
        assert!(!shock.is_recovery_year());
        assert!(next.is_quiet());
    }

    #[test]
    fn recovery_blocks_new_shocks_and_completes() {
        let state = ShockState {
            recovery: RecoveryState {
                is_recovering: true,
                target_value: 1_500.0,
                recovery_time_remaining: 0.4,
                total_recovery_time: 1.4,
            },
            ..ShockState::default()
        };
        // would be a crash if the machine were allowed to draw
        let mut rng = ScriptedSource::constant(0.0);
        let (next, shock) = step(state, 2, 1_000.0, &mut rng);

        assert_eq!(rng.draws(), 0);
        assert_eq!(shock.phase, Phase::Recovering);
        assert_eq!(shock.started(), None);
        assert_approx(shock.recovery_step, 1.0);
        assert_eq!(shock.recovery_progress, Some(1.0));
        assert!(next.is_quiet());
        assert_approx(next.recovery.total_recovery_time, 1.4);
    }

    #[test]
    fn long_recovery_decrements_one_year_at_a_time() {
        let state = ShockState {
            recovery: RecoveryState {
                is_recovering: true,
                target_value: 1_000.0,
                recovery_time_remaining: 1.5,
                total_recovery_time: 2.5,
            },
            ..ShockState::default()
        };
        let mut rng = ScriptedSource::constant(0.0);
        let (next, shock) = step(state, 2, 800.0, &mut rng);

        assert!(next.recovery.is_recovering);
        assert_approx(next.recovery.recovery_time_remaining, 0.5);
        assert_approx(shock.recovery_step, 1.0 / 1.5);
        assert_approx(shock.recovery_progress.expect("progress"), 2.0 / 2.5);

        let (done, last) = step(next, 3, 900.0, &mut rng);
        assert!(done.is_quiet());
        assert_eq!(last.recovery_progress, Some(1.0));
    }

    #[test]
    fn correction_resolves_within_the_year() {
        // no crash (0.3), correction (0.3 < 0.5), duration 0.5 + 0.33 * 0.3
        let mut rng = ScriptedSource::constant(0.3);
        let (next, shock) = step(ShockState::default(), 4, 1_000.0, &mut rng);

        assert_eq!(shock.phase, Phase::CorrectionActive);
        assert_eq!(shock.started(), Some(ShockKind::Correction));
        assert_eq!(shock.correction_recovery_progress, Some(1.0));
        assert!(!next.correction.is_in_correction);
        assert_approx(next.correction.total_correction_time, 0.5 + 0.33 * 0.3);
        assert!(next.is_quiet());
    }

    #[test]
    fn lingering_correction_blocks_shocks_for_one_year() {
        let state = ShockState {
            correction: CorrectionState {
                is_in_correction: true,
                correction_time_remaining: 0.2,
                total_correction_time: 0.7,
            },
            ..ShockState::default()
        };
        let mut rng = ScriptedSource::constant(0.0);
        let (next, shock) = step(state, 5, 1_000.0, &mut rng);

        assert_eq!(rng.draws(), 0);
        assert_eq!(shock.phase, Phase::Normal);
        assert!(next.is_quiet());
    }

    #[test]
    fn drawdown_ranges_per_shock_and_class() {
        use InstrumentClass::*;
        let rows = [
            (ShockKind::Crash, BroadEtf, 15.0, 25.0),
            (ShockKind::Crash, SectorEtf, 25.0, 40.0),
            (ShockKind::Crash, GrowthStock, 25.0, 35.0),
            (ShockKind::Crash, CryptoEtf, 35.0, 45.0),
            (ShockKind::Crash, Crypto, 35.0, 45.0),
            (ShockKind::Crash, Options, 35.0, 45.0),
            (ShockKind::Crash, Leveraged, 35.0, 45.0),
            (ShockKind::Crash, Moonshot, 35.0, 45.0),
            (ShockKind::Crash, Gold, -5.0, -15.0),
            (ShockKind::Correction, BroadEtf, 8.0, 12.0),
            (ShockKind::Correction, SectorEtf, 12.0, 18.0),
            (ShockKind::Correction, GrowthStock, 10.0, 15.0),
            (ShockKind::Correction, CryptoEtf, 18.0, 30.0),
            (ShockKind::Correction, Crypto, 18.0, 30.0),
            (ShockKind::Correction, Options, 18.0, 30.0),
            (ShockKind::Correction, Leveraged, 18.0, 30.0),
            (ShockKind::Correction, Moonshot, 18.0, 30.0),
            (ShockKind::Correction, Gold, -2.0, -5.0),
        ];
        assert_eq!(rows.len(), ALL_CLASSES.len() * 2);

        for (kind, class, low_end, high_end) in rows {
            let low = draw_drawdown(class, kind, &mut ScriptedSource::constant(0.0));
            let high = draw_drawdown(class, kind, &mut ScriptedSource::constant(1.0 - f64::EPSILON));
            assert!(
                (low - low_end).abs() <= EPS && (high - high_end).abs() <= 1e-6,
                "{kind:?} {class:?}: got {low}..{high}, expected {low_end}..{high_end}"
            );
        }
    }

    #[test]
    fn volatile_outcome_per_phase() {
        let mut shock = YearShock::normal();
        assert_approx(shock.volatile_outcome(0.5, 1_000.0, 10.0, None, 20.0), 570.0);

        shock.phase = Phase::CrashActive;
        assert_approx(shock.volatile_outcome(0.5, 1_000.0, 10.0, Some(20.0), 20.0), 420.0);
        assert_approx(shock.volatile_outcome(0.5, 1_000.0, 10.0, Some(-10.0), 0.0), 550.0);

        shock.phase = Phase::Recovering;
        shock.recovery_target = 1_600.0;
        shock.recovery_step = 0.5;
        // held 500, target share 800, closes half the gap
        assert_approx(shock.volatile_outcome(0.5, 1_000.0, 10.0, None, 0.0), 650.0);
    }

    proptest! {
        #[test]
        fn prop_gold_always_gains_in_shocks(seed in any::<u64>(), crash in any::<bool>()) {
            let kind = if crash { ShockKind::Crash } else { ShockKind::Correction };
            let mut rng = StdRng::seed_from_u64(seed);
            let drawdown = draw_drawdown(InstrumentClass::Gold, kind, &mut rng);
            prop_assert!(drawdown < 0.0);
            prop_assert!(apply_drawdown(100.0, drawdown) > 100.0);
        }

        #[test]
        fn prop_non_gold_drawdowns_reduce_value(
            seed in any::<u64>(),
            class in select(ALL_CLASSES.to_vec()),
            crash in any::<bool>(),
        ) {
            let kind = if crash { ShockKind::Crash } else { ShockKind::Correction };
            let mut rng = StdRng::seed_from_u64(seed);
            let drawdown = draw_drawdown(class, kind, &mut rng);
            if class != InstrumentClass::Gold {
                prop_assert!(drawdown > 0.0 && drawdown < 100.0);
                prop_assert!(apply_drawdown(100.0, drawdown) < 100.0);
            }
        }

        #[test]
        fn prop_no_shock_starts_while_recovering(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = ShockState::default();
            for year in 1..=60 {
                let quiet_before = state.is_quiet();
                let (next, shock) = step(state, year, 1_000.0, &mut rng);
                if !quiet_before {
                    prop_assert!(shock.started().is_none(), "shock started in year {year} while busy");
                }
                prop_assert!(!(shock.started().is_some() && shock.is_recovery_year()));
                if let Some(progress) = shock.recovery_progress {
                    prop_assert!((0.0..=1.0).contains(&progress));
                }
                state = next;
            }
        }
    }
}
