//! Wiper command submission: `Idle -> Processing -> {Success, Error} -> Idle`.

use std::time::Duration;

use shared::{
    domain::{WiperSpeed, WiperTarget},
    error::PanelError,
    protocol::{CommandAck, WiperCommand},
};
use tracing::{info, warn};

use crate::{
    feedback::{ActivateFeedback, FEEDBACK_REVERT},
    scheduler::{TimerAction, TimerQueue},
    state::PanelState,
    status::{StatusKind, SENDING_MESSAGE},
};

/// Current input selection of the activation control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSelection {
    pub wiper_type: WiperTarget,
    pub speed: WiperSpeed,
    /// Raw text of the cycle field.
    pub cycles: String,
}

impl PanelSelection {
    pub fn new(wiper_type: WiperTarget, speed: WiperSpeed, cycles: impl Into<String>) -> Self {
        Self {
            wiper_type,
            speed,
            cycles: cycles.into(),
        }
    }

    pub fn to_command(&self) -> WiperCommand {
        WiperCommand {
            wiper_type: self.wiper_type,
            speed: self.speed,
            cycles: parse_cycles(&self.cycles),
        }
    }
}

/// Leading-integer parse of the cycle field. Trailing garbage is ignored;
/// no digits at all, or a value outside `i64`, yields `None`. Zero and
/// negative counts are passed through.
pub fn parse_cycles(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    format!("{sign}{}", &rest[..digits_len]).parse().ok()
}

#[derive(Debug, Default)]
pub struct CommandDispatcher {
    submitted: u64,
}

impl CommandDispatcher {
    /// Builds the command from the selection and enters Processing.
    pub fn begin(&mut self, state: &mut PanelState, selection: &PanelSelection) -> WiperCommand {
        let command = selection.to_command();
        self.submitted += 1;
        if command.cycles.is_none() {
            warn!(raw = %selection.cycles, "command: cycle count is not a number; sending null");
        }
        state.status.set_status(StatusKind::Processing, SENDING_MESSAGE);
        info!(
            seq = self.submitted,
            wiper_type = command.wiper_type.as_str(),
            speed = command.speed.as_str(),
            cycles = ?command.cycles,
            "command: sending to wiper system"
        );
        command
    }

    /// Applies the actuator response. Any decoded body counts as success; the
    /// HTTP status of the response is not consulted.
    pub fn complete(
        &mut self,
        state: &mut PanelState,
        command: &WiperCommand,
        result: Result<CommandAck, PanelError>,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> StatusKind {
        let kind = match result {
            Ok(_) => {
                state.status.set_status(
                    StatusKind::Success,
                    format!(
                        "Command sent successfully! Wiper: {}, Speed: {}, Cycles: {}",
                        command.wiper_type,
                        command.speed,
                        command.cycles_label()
                    ),
                );
                for &blade in command.wiper_type.blades() {
                    state
                        .blade_mut(blade)
                        .start(blade, command.speed, command.cycles, now, timers);
                }
                state.activate.feedback = ActivateFeedback::Sent;
                info!(wiper_type = command.wiper_type.as_str(), "command: accepted");
                StatusKind::Success
            }
            Err(err) => {
                state
                    .status
                    .set_status(StatusKind::Error, format!("Error: {err}"));
                state.activate.feedback = ActivateFeedback::Failed;
                warn!(kind = err.kind(), error = %err, "command: submission failed");
                StatusKind::Error
            }
        };
        timers.schedule(now + FEEDBACK_REVERT, TimerAction::RevertActivateControl);
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cycles_follows_leading_integer_rules() {
        assert_eq!(parse_cycles("3"), Some(3));
        assert_eq!(parse_cycles("  12abc"), Some(12));
        assert_eq!(parse_cycles("3.7"), Some(3));
        assert_eq!(parse_cycles("+5"), Some(5));
        assert_eq!(parse_cycles("-2"), Some(-2));
        assert_eq!(parse_cycles(""), None);
        assert_eq!(parse_cycles("abc"), None);
        assert_eq!(parse_cycles("-"), None);
        assert_eq!(parse_cycles("99999999999999999999"), None);
    }

    #[test]
    fn selection_builds_wire_command() {
        let selection = PanelSelection::new(WiperTarget::Back, WiperSpeed::Fast, "3");
        assert_eq!(
            selection.to_command(),
            WiperCommand {
                wiper_type: WiperTarget::Back,
                speed: WiperSpeed::Fast,
                cycles: Some(3),
            }
        );
    }
}
