//! Fixed operating constants for the greenhouse lighting controller
//!
//! None of these are runtime-configurable: the control room runs on the
//! same day window, thresholds and refresh cadence everywhere.

use std::ops::Range;
use std::time::Duration;

/// First hour (inclusive) of the daytime window
pub const DAY_START_HOUR: u32 = 7;
/// Hour (exclusive) at which night begins
pub const DAY_END_HOUR: u32 = 21;

/// Indoor lux above which the automatic policy switches the light off during the day
pub const DAY_THRESHOLD_LUX: f64 = 2500.0;
/// Indoor lux above which the automatic policy switches the light off at night
pub const NIGHT_THRESHOLD_LUX: f64 = 500.0;

/// Upper bound of the illuminance gauge
pub const PROGRESS_MAX_LUX: f64 = 4000.0;

/// Maximum number of entries kept in the event log
pub const LOG_CAPACITY: usize = 150;
/// Characters of a new message compared against the newest entry for dedup
pub const DEDUP_PREFIX_CHARS: usize = 20;

/// Clock display refresh
pub const CLOCK_INTERVAL: Duration = Duration::from_millis(1000);
/// Sensor refresh and control evaluation
pub const DATA_INTERVAL: Duration = Duration::from_millis(3000);

/// Cosmetic status of the (simulated) OPC server link
pub const OPC_STATUS: &str = "OK";

// Generator ranges, in lux. Upper bounds are exclusive.
pub const INDOOR_PEAK: Range<i32> = 2000..4000;
pub const INDOOR_MORNING: Range<i32> = 800..2500;
pub const INDOOR_EVENING: Range<i32> = 500..2000;
pub const INDOOR_EARLY_NIGHT: Range<i32> = 100..600;
pub const INDOOR_LATE_NIGHT: Range<i32> = 50..400;
pub const OUTDOOR_DAY: Range<i32> = 10_000..100_000;
pub const OUTDOOR_NIGHT: Range<i32> = 0..100;
pub const INDOOR_JITTER: Range<i32> = -50..50;
pub const OUTDOOR_JITTER: Range<i32> = -1000..1000;
