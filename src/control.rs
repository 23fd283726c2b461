//! Lighting control policy and the controller that owns system state
//!
//! [`apply_policy`] is the whole decision: a total function of mode, indoor
//! lux, threshold and current light state. [`Controller`] wraps it with the
//! generator and the event log and is the only place state is mutated.

use chrono::{DateTime, Local, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::*;
use crate::event_log::EventLog;
use crate::generator::{self, Readings};
use crate::{LightingMode, SystemState};

/// Daytime is [07:00, 21:00)
pub fn is_daytime(hour: u32) -> bool {
    (DAY_START_HOUR..DAY_END_HOUR).contains(&hour)
}

/// Indoor lux above which the automatic policy wants the light off
pub fn threshold_for(hour: u32) -> f64 {
    if is_daytime(hour) {
        DAY_THRESHOLD_LUX
    } else {
        NIGHT_THRESHOLD_LUX
    }
}

/// A light state change made by the policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PolicyEvent {
    /// Auto: indoor lux exceeded the threshold
    AutoOff { indoor_lux: f64, threshold: f64 },
    /// Auto: indoor lux at or below the threshold
    AutoOn { indoor_lux: f64, threshold: f64 },
    ForcedOn,
    ForcedOff,
}

impl std::fmt::Display for PolicyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyEvent::AutoOff { indoor_lux, threshold } => write!(
                f,
                "Auto: light OFF ({:.0} lx > threshold {:.0} lx)",
                indoor_lux, threshold
            ),
            PolicyEvent::AutoOn { indoor_lux, threshold } => write!(
                f,
                "Auto: light ON ({:.0} lx <= threshold {:.0} lx)",
                indoor_lux, threshold
            ),
            PolicyEvent::ForcedOn => write!(f, "Manual: light ON"),
            PolicyEvent::ForcedOff => write!(f, "Manual: light OFF"),
        }
    }
}

/// Outcome of one policy evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub light_on: bool,
    /// Present only when the light state actually changed
    pub event: Option<PolicyEvent>,
}

/// Decide the light state for one tick
pub fn apply_policy(mode: LightingMode, indoor_lux: f64, threshold: f64, is_light_on: bool) -> Decision {
    let unchanged = Decision { light_on: is_light_on, event: None };

    match mode {
        LightingMode::Auto => {
            if indoor_lux > threshold {
                if is_light_on {
                    return Decision {
                        light_on: false,
                        event: Some(PolicyEvent::AutoOff { indoor_lux, threshold }),
                    };
                }
            } else if !is_light_on {
                return Decision {
                    light_on: true,
                    event: Some(PolicyEvent::AutoOn { indoor_lux, threshold }),
                };
            }
            unchanged
        }
        LightingMode::ForcedOn if !is_light_on => Decision {
            light_on: true,
            event: Some(PolicyEvent::ForcedOn),
        },
        LightingMode::ForcedOff if is_light_on => Decision {
            light_on: false,
            event: Some(PolicyEvent::ForcedOff),
        },
        LightingMode::ForcedOn | LightingMode::ForcedOff => unchanged,
    }
}

/// Operator mode commands (the three control buttons)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeCommand {
    SetAuto,
    SetForcedOn,
    SetForcedOff,
}

impl ModeCommand {
    pub fn target(self) -> LightingMode {
        match self {
            ModeCommand::SetAuto => LightingMode::Auto,
            ModeCommand::SetForcedOn => LightingMode::ForcedOn,
            ModeCommand::SetForcedOff => LightingMode::ForcedOff,
        }
    }

    /// Operator line followed by the notice line
    fn log_lines(self) -> [&'static str; 2] {
        match self {
            ModeCommand::SetAuto => [
                "OPERATOR: automatic mode enabled",
                "Control returned to the lux schedule",
            ],
            ModeCommand::SetForcedOn => [
                "OPERATOR: forced lighting ON",
                "WARNING: automatic control disabled",
            ],
            ModeCommand::SetForcedOff => [
                "OPERATOR: forced lighting OFF",
                "WARNING: automatic control disabled",
            ],
        }
    }
}

/// Result of a data tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// System disabled, nothing was read or changed
    Disabled,
    Updated {
        readings: Readings,
        event: Option<PolicyEvent>,
    },
}

/// Owner of [`SystemState`] and the [`EventLog`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controller {
    state: SystemState,
    log: EventLog,
}

impl Controller {
    /// Fresh controller in automatic mode with the startup banner logged
    pub fn new(now: DateTime<Local>) -> Self {
        let mut log = EventLog::new();
        log.append("Greenhouse lighting control started", now);
        log.append("Operating mode: automatic", now);
        log.append(
            format!(
                "Daytime {:02}:00 - {:02}:00, thresholds: day {:.0} lx, night {:.0} lx",
                DAY_START_HOUR, DAY_END_HOUR, DAY_THRESHOLD_LUX, NIGHT_THRESHOLD_LUX
            ),
            now,
        );
        log.append(format!("OPC server: connected ({})", OPC_STATUS), now);

        info!("lighting controller started");
        Self { state: SystemState::new(), log }
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Generate new readings and run the policy on them
    pub fn data_tick<R: Rng + ?Sized>(&mut self, now: DateTime<Local>, rng: &mut R) -> TickOutcome {
        if !self.state.system_enabled {
            warn!("data tick skipped: system disabled");
            return TickOutcome::Disabled;
        }

        let readings = generator::generate(now.hour(), rng);
        self.state.indoor_lux = readings.indoor_lux;
        self.state.outdoor_lux = readings.outdoor_lux;
        self.state.last_update = Some(now);
        debug!(
            indoor_lux = readings.indoor_lux,
            outdoor_lux = readings.outdoor_lux,
            "readings updated"
        );

        let event = self.apply_control_logic(now);
        TickOutcome::Updated { readings, event }
    }

    /// Run the policy against the current readings, logging any change
    pub fn apply_control_logic(&mut self, now: DateTime<Local>) -> Option<PolicyEvent> {
        let threshold = threshold_for(now.hour());
        let decision = apply_policy(
            self.state.mode,
            self.state.indoor_lux,
            threshold,
            self.state.is_light_on,
        );
        self.state.is_light_on = decision.light_on;

        if let Some(event) = decision.event {
            info!(
                mode = %self.state.mode,
                light_on = decision.light_on,
                indoor_lux = self.state.indoor_lux,
                threshold,
                "light switched"
            );
            self.log.append(event.to_string(), now);
        }
        decision.event
    }

    /// Apply an operator mode command.
    ///
    /// Forced modes set the light immediately; Auto leaves it for the next
    /// data tick. Repeating the current mode is a no-op. Returns whether
    /// anything changed.
    pub fn command(&mut self, command: ModeCommand, now: DateTime<Local>) -> bool {
        if !self.state.system_enabled {
            warn!(?command, "command ignored: system disabled");
            return false;
        }

        let target = command.target();
        if self.state.mode == target {
            debug!(?command, "command ignored: mode already active");
            return false;
        }

        self.state.mode = target;
        match target {
            LightingMode::ForcedOn => self.state.is_light_on = true,
            LightingMode::ForcedOff => self.state.is_light_on = false,
            LightingMode::Auto => {}
        }

        info!(mode = %target, light_on = self.state.is_light_on, "operator changed mode");
        for line in command.log_lines() {
            self.log.append(line, now);
        }
        true
    }

    pub fn clear_log(&mut self, now: DateTime<Local>) {
        self.log.clear(now);
        info!("event log cleared");
    }

    /// Record that the controller is going away
    pub fn shutdown(&mut self, now: DateTime<Local>) {
        self.log.append("Greenhouse lighting control stopped", now);
        info!("lighting controller stopped");
    }
}
