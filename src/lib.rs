//! # greenhouse-lights - Greenhouse Lighting Controller Simulator
//!
//! Simulates the supplementary lighting controller of a greenhouse. Synthetic
//! indoor/outdoor illuminance readings are generated from the wall-clock hour,
//! a three-mode policy decides whether the grow lights are on, and every
//! decision lands in a bounded operator event log.
//!
//! ## Architecture
//! Two periodic ticks drive everything:
//! 1. Clock tick (1 s) - refreshes the displayed time
//! 2. Data tick (3 s) - generate readings, apply the control policy, redraw
//!
//! Operator commands (forced on, forced off, auto, clear log) are applied to
//! the same [`control::Controller`] between ticks. All of it runs on one thread;
//! [`scheduler::Scheduler`] turns elapsed time into discrete [`scheduler::Tick`]s
//! so the controller can be driven without a real clock.

use std::sync::Arc;
use chrono::{DateTime, Local};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod control;
pub mod display;
pub mod event_log;
pub mod generator;
pub mod scheduler;

#[cfg(feature = "standalone")]
pub mod tui;

pub use control::{Controller, ModeCommand, PolicyEvent, TickOutcome};
pub use event_log::{EventLog, LogEntry};

/// Lighting control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightingMode {
    /// Light follows measured indoor lux against the day/night threshold
    #[default]
    Auto,
    /// Operator override: light held on
    ForcedOn,
    /// Operator override: light held off
    ForcedOff,
}

impl std::fmt::Display for LightingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightingMode::Auto => write!(f, "Auto"),
            LightingMode::ForcedOn => write!(f, "Manual ON"),
            LightingMode::ForcedOff => write!(f, "Manual OFF"),
        }
    }
}

/// Complete controller state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    /// Master enable. Nothing in the operator surface clears it; when false
    /// data ticks and mode commands are skipped.
    pub system_enabled: bool,
    /// Grow light output
    pub is_light_on: bool,
    /// Current control mode
    pub mode: LightingMode,
    /// Last indoor reading (lux, >= 0)
    pub indoor_lux: f64,
    /// Last outdoor reading (lux, >= 0)
    pub outdoor_lux: f64,
    /// Time of the last data refresh, `None` until the first data tick
    pub last_update: Option<DateTime<Local>>,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            system_enabled: true,
            is_light_on: false,
            mode: LightingMode::Auto,
            indoor_lux: 0.0,
            outdoor_lux: 0.0,
            last_update: None,
        }
    }
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Controller handle shared between the front end and whatever drives ticks
pub type SharedController = Arc<RwLock<Controller>>;

/// Create a controller with its startup log lines, ready to be ticked
pub fn create_controller() -> SharedController {
    Arc::new(RwLock::new(Controller::new(Local::now())))
}
