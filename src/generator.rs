//! Synthetic illuminance generator
//!
//! Produces indoor/outdoor lux readings that loosely follow the sun: a
//! midday peak, softer morning and evening bands, and dim nights. Every call
//! draws fresh values; nothing is carried between calls.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::control::is_daytime;

/// One pair of readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub indoor_lux: f64,
    pub outdoor_lux: f64,
}

/// Generate readings for the given hour of day (0-23)
pub fn generate<R: Rng + ?Sized>(hour: u32, rng: &mut R) -> Readings {
    let (indoor, outdoor) = if is_daytime(hour) {
        let indoor = match hour {
            11..=15 => rng.gen_range(INDOOR_PEAK),
            7..=10 => rng.gen_range(INDOOR_MORNING),
            _ => rng.gen_range(INDOOR_EVENING),
        };
        (indoor, rng.gen_range(OUTDOOR_DAY))
    } else {
        let indoor = match hour {
            21..=23 => rng.gen_range(INDOOR_EARLY_NIGHT),
            _ => rng.gen_range(INDOOR_LATE_NIGHT),
        };
        (indoor, rng.gen_range(OUTDOOR_NIGHT))
    };

    let indoor = indoor + rng.gen_range(INDOOR_JITTER);
    let outdoor = outdoor + rng.gen_range(OUTDOOR_JITTER);

    Readings {
        indoor_lux: f64::from(indoor.max(0)),
        outdoor_lux: f64::from(outdoor.max(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(hour: u32, n: usize) -> Vec<Readings> {
        let mut rng = StdRng::seed_from_u64(u64::from(hour) * 7919 + 17);
        (0..n).map(|_| generate(hour, &mut rng)).collect()
    }

    fn indoor_bounds(readings: &[Readings]) -> (f64, f64) {
        readings.iter().fold((f64::MAX, f64::MIN), |(lo, hi), r| {
            (lo.min(r.indoor_lux), hi.max(r.indoor_lux))
        })
    }

    #[test]
    fn test_readings_never_negative() {
        for hour in 0..24 {
            for r in sample(hour, 500) {
                assert!(r.indoor_lux >= 0.0, "hour {} indoor {}", hour, r.indoor_lux);
                assert!(r.outdoor_lux >= 0.0, "hour {} outdoor {}", hour, r.outdoor_lux);
            }
        }
    }

    #[test]
    fn test_peak_band() {
        let (lo, hi) = indoor_bounds(&sample(13, 1000));
        assert!(lo >= 1950.0 && hi < 4050.0, "peak range {}..{}", lo, hi);
    }

    #[test]
    fn test_morning_and_evening_bands() {
        let (lo, hi) = indoor_bounds(&sample(8, 1000));
        assert!(lo >= 750.0 && hi < 2550.0, "morning range {}..{}", lo, hi);

        let (lo, hi) = indoor_bounds(&sample(18, 1000));
        assert!(lo >= 450.0 && hi < 2050.0, "evening range {}..{}", lo, hi);
    }

    #[test]
    fn test_night_bands() {
        let (lo, hi) = indoor_bounds(&sample(22, 1000));
        assert!(lo >= 50.0 && hi < 650.0, "early night range {}..{}", lo, hi);

        let (lo, hi) = indoor_bounds(&sample(2, 1000));
        assert!(lo >= 0.0 && hi < 450.0, "late night range {}..{}", lo, hi);
    }

    #[test]
    fn test_outdoor_day_night_split() {
        for r in sample(12, 500) {
            assert!(r.outdoor_lux >= 9000.0 && r.outdoor_lux < 101_000.0);
        }
        // Night outdoor jitter is larger than the base range, so most values floor at zero
        for r in sample(3, 500) {
            assert!(r.outdoor_lux < 1100.0);
        }
    }

    #[test]
    fn test_readings_are_whole_lux() {
        for r in sample(16, 200) {
            assert_eq!(r.indoor_lux.fract(), 0.0);
            assert_eq!(r.outdoor_lux.fract(), 0.0);
        }
    }
}
