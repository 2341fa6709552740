//! Synthetic vital-sign synthesis.
//!
//! Produces readings that land in a chosen severity band. The bands are
//! defined against the thresholds in [`crate::severity`], so every reading
//! built for a target classifies back to that same target.
//!
//! A non-normal reading is caused by exactly one dimension (heart rate,
//! oxygen saturation or blood pressure), picked uniformly; the other two are
//! drawn from their normal bands.
//!
//! All functions take the random source explicitly so callers can seed it.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::severity::Severity;
use crate::vitals::VitalValues;

// ---------------------------------------------------------------------------
// Target distribution
// ---------------------------------------------------------------------------

/// Share of ticks that target a normal reading.
pub const NORMAL_SHARE: f64 = 0.60;
/// Share of ticks that target a warning reading.
pub const WARNING_SHARE: f64 = 0.30;
/// Share of ticks that target a critical reading.
pub const CRITICAL_SHARE: f64 = 0.10;

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

pub const HEART_RATE_NORMAL: RangeInclusive<i32> = 60..=99;
pub const HEART_RATE_WARNING: RangeInclusive<i32> = 105..=120;
pub const HEART_RATE_CRITICAL: RangeInclusive<i32> = 130..=160;

pub const OXYGEN_NORMAL: RangeInclusive<i32> = 96..=100;
pub const OXYGEN_WARNING: RangeInclusive<i32> = 90..=95;
pub const OXYGEN_CRITICAL: RangeInclusive<i32> = 85..=89;

/// Minimum gap between systolic and diastolic pressure.
pub const MIN_PULSE_PRESSURE: i32 = 20;
/// Diastolic floor for every synthesized pair.
pub const DIASTOLIC_FLOOR: i32 = 50;

/// The single dimension responsible for a non-normal reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    HeartRate,
    OxygenSaturation,
    BloodPressure,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::HeartRate,
        Dimension::OxygenSaturation,
        Dimension::BloodPressure,
    ];
}

/// One synthesized reading plus how it was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticReading {
    pub values: VitalValues,
    pub target: Severity,
    /// `None` for normal targets.
    pub cause: Option<Dimension>,
}

/// Draw a target severity: 60% normal, 30% warning, 10% critical.
pub fn pick_severity<R: Rng + ?Sized>(rng: &mut R) -> Severity {
    let roll: f64 = rng.random();
    if roll < NORMAL_SHARE {
        Severity::Normal
    } else if roll < NORMAL_SHARE + WARNING_SHARE {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

/// Pick the dimension that carries an abnormal reading.
pub fn pick_dimension<R: Rng + ?Sized>(rng: &mut R) -> Dimension {
    Dimension::ALL[rng.random_range(0..Dimension::ALL.len())]
}

/// Draw a target severity and synthesize a reading for it.
pub fn next_reading<R: Rng + ?Sized>(rng: &mut R) -> SyntheticReading {
    let target = pick_severity(rng);
    synthesize(rng, target)
}

/// Synthesize a reading that classifies as `target`.
pub fn synthesize<R: Rng + ?Sized>(rng: &mut R, target: Severity) -> SyntheticReading {
    let cause = match target {
        Severity::Normal => None,
        Severity::Warning | Severity::Critical => Some(pick_dimension(rng)),
    };

    let band_for = |dimension: Dimension| match cause {
        Some(c) if c == dimension => target,
        _ => Severity::Normal,
    };

    let heart_rate = rng.random_range(heart_rate_band(band_for(Dimension::HeartRate)));
    let oxygen_saturation = rng.random_range(oxygen_band(band_for(Dimension::OxygenSaturation)));
    let (systolic, diastolic) = blood_pressure(rng, band_for(Dimension::BloodPressure));

    SyntheticReading {
        values: VitalValues {
            heart_rate,
            systolic,
            diastolic,
            oxygen_saturation,
        },
        target,
        cause,
    }
}

fn heart_rate_band(severity: Severity) -> RangeInclusive<i32> {
    match severity {
        Severity::Normal => HEART_RATE_NORMAL,
        Severity::Warning => HEART_RATE_WARNING,
        Severity::Critical => HEART_RATE_CRITICAL,
    }
}

fn oxygen_band(severity: Severity) -> RangeInclusive<i32> {
    match severity {
        Severity::Normal => OXYGEN_NORMAL,
        Severity::Warning => OXYGEN_WARNING,
        Severity::Critical => OXYGEN_CRITICAL,
    }
}

/// Synthesize a systolic/diastolic pair in the given band.
///
/// Warning and critical bands have two shapes each: one driven by systolic
/// pressure, one by diastolic pressure, chosen with equal probability.
pub fn blood_pressure<R: Rng + ?Sized>(rng: &mut R, severity: Severity) -> (i32, i32) {
    let (systolic, diastolic) = match severity {
        Severity::Normal => (rng.random_range(95..=119), rng.random_range(60..=79)),
        Severity::Warning => {
            if rng.random_bool(0.5) {
                (rng.random_range(120..=139), rng.random_range(70..=89))
            } else {
                (rng.random_range(110..=139), rng.random_range(80..=89))
            }
        }
        Severity::Critical => {
            if rng.random_bool(0.5) {
                (rng.random_range(140..=180), rng.random_range(80..=100))
            } else {
                (rng.random_range(130..=170), rng.random_range(91..=110))
            }
        }
    };
    plausible_pair(systolic, diastolic)
}

/// Clamp diastolic to at most `systolic - 20` and at least 50.
///
/// Every band above keeps systolic >= 95, so both bounds hold at once.
pub fn plausible_pair(systolic: i32, diastolic: i32) -> (i32, i32) {
    let diastolic = diastolic.min(systolic - MIN_PULSE_PRESSURE);
    (systolic, diastolic.max(DIASTOLIC_FLOOR))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::severity::{blood_pressure_severity, heart_rate_severity, oxygen_severity};

    const DRAWS: usize = 20_000;

    #[test]
    fn every_reading_classifies_as_its_target() {
        let mut rng = StdRng::seed_from_u64(7);
        for target in Severity::ALL {
            for _ in 0..DRAWS / 3 {
                let reading = synthesize(&mut rng, target);
                assert_eq!(
                    reading.values.severity(),
                    target,
                    "reading {:?} drifted from its target",
                    reading
                );
            }
        }
    }

    #[test]
    fn abnormal_readings_have_exactly_one_cause() {
        let mut rng = StdRng::seed_from_u64(11);
        for target in [Severity::Warning, Severity::Critical] {
            for _ in 0..2_000 {
                let reading = synthesize(&mut rng, target);
                let v = reading.values;
                let per_dimension = [
                    (Dimension::HeartRate, heart_rate_severity(v.heart_rate)),
                    (Dimension::OxygenSaturation, oxygen_severity(v.oxygen_saturation)),
                    (
                        Dimension::BloodPressure,
                        blood_pressure_severity(v.systolic, v.diastolic),
                    ),
                ];
                for (dimension, severity) in per_dimension {
                    if Some(dimension) == reading.cause {
                        assert_eq!(severity, target);
                    } else {
                        assert_eq!(severity, Severity::Normal);
                    }
                }
            }
        }
    }

    #[test]
    fn normal_readings_have_no_cause() {
        let mut rng = StdRng::seed_from_u64(3);
        let reading = synthesize(&mut rng, Severity::Normal);
        assert!(reading.cause.is_none());
    }

    #[test]
    fn blood_pressure_pairs_are_plausible() {
        let mut rng = StdRng::seed_from_u64(42);
        for severity in Severity::ALL {
            for _ in 0..DRAWS / 3 {
                let (sys, dia) = blood_pressure(&mut rng, severity);
                assert!(dia <= sys - MIN_PULSE_PRESSURE, "{sys}/{dia}");
                assert!(dia >= DIASTOLIC_FLOOR, "{sys}/{dia}");
            }
        }
    }

    #[test]
    fn plausible_pair_clamps_both_ends() {
        assert_eq!(plausible_pair(95, 79), (95, 75));
        assert_eq!(plausible_pair(120, 40), (120, 50));
        assert_eq!(plausible_pair(140, 90), (140, 90));
    }

    #[test]
    fn severity_distribution_matches_weights() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0usize; 3];
        for _ in 0..DRAWS {
            let idx = match pick_severity(&mut rng) {
                Severity::Normal => 0,
                Severity::Warning => 1,
                Severity::Critical => 2,
            };
            counts[idx] += 1;
        }
        let share = |n: usize| n as f64 / DRAWS as f64;
        assert!((share(counts[0]) - NORMAL_SHARE).abs() < 0.02, "{counts:?}");
        assert!((share(counts[1]) - WARNING_SHARE).abs() < 0.02, "{counts:?}");
        assert!((share(counts[2]) - CRITICAL_SHARE).abs() < 0.02, "{counts:?}");
    }

    #[test]
    fn causes_are_spread_across_dimensions() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = [0usize; 3];
        for _ in 0..3_000 {
            match pick_dimension(&mut rng) {
                Dimension::HeartRate => seen[0] += 1,
                Dimension::OxygenSaturation => seen[1] += 1,
                Dimension::BloodPressure => seen[2] += 1,
            }
        }
        for count in seen {
            assert!((800..=1200).contains(&count), "{seen:?}");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            assert_eq!(next_reading(&mut a), next_reading(&mut b));
        }
    }
}
