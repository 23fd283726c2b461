//! Presentation projection
//!
//! Turns [`SystemState`] and the [`EventLog`] into plain display values. The
//! terminal front end only maps these onto widgets and colors.

use crate::config::{OPC_STATUS, PROGRESS_MAX_LUX};
use crate::control::{is_daytime, threshold_for};
use crate::event_log::EventLog;
use crate::SystemState;

/// Indoor illuminance relative to the active threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuxLevel {
    /// Above threshold (red)
    High,
    /// Below half the threshold (orange)
    Low,
    /// Between the two (green)
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightIndicator {
    On,
    Off,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub indoor_text: String,
    pub outdoor_text: String,
    /// Indoor lux clamped to [0, PROGRESS_MAX_LUX]
    pub progress: f64,
    pub lux_level: LuxLevel,
    pub light: LightIndicator,
    pub status_lines: Vec<String>,
    pub footer: String,
    /// Formatted log lines, newest first
    pub log_lines: Vec<String>,
}

impl DisplayModel {
    /// Gauge fill in [0.0, 1.0]
    pub fn progress_ratio(&self) -> f64 {
        self.progress / PROGRESS_MAX_LUX
    }
}

fn light_label(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

pub fn lux_level(indoor_lux: f64, threshold: f64) -> LuxLevel {
    if indoor_lux > threshold {
        LuxLevel::High
    } else if indoor_lux < threshold * 0.5 {
        LuxLevel::Low
    } else {
        LuxLevel::Normal
    }
}

/// Project state for display at the given hour of day
pub fn render(state: &SystemState, log: &EventLog, hour: u32) -> DisplayModel {
    let light = light_label(state.is_light_on);
    let day_label = if is_daytime(hour) { "DAY" } else { "NIGHT" };
    let (updated, updated_short) = match state.last_update {
        Some(t) => (t.format("%H:%M:%S").to_string(), t.format("%H:%M").to_string()),
        None => ("--:--:--".to_string(), "--:--".to_string()),
    };

    let footer = if state.system_enabled {
        format!("OPC: {} | Mode: {} | Light: {} | {}", OPC_STATUS, state.mode, light, updated_short)
    } else {
        "SYSTEM DISABLED".to_string()
    };

    DisplayModel {
        indoor_text: format!("{:.0} lx", state.indoor_lux),
        outdoor_text: format!("{:.0} lx", state.outdoor_lux),
        progress: state.indoor_lux.clamp(0.0, PROGRESS_MAX_LUX),
        lux_level: lux_level(state.indoor_lux, threshold_for(hour)),
        light: if state.is_light_on { LightIndicator::On } else { LightIndicator::Off },
        status_lines: vec![
            format!("Mode: {}", state.mode),
            format!("Lighting: {}", light),
            format!("Time of day: {}", day_label),
            format!("Updated: {}", updated),
        ],
        footer,
        log_lines: log.entries().map(ToString::to_string).collect(),
    }
}
