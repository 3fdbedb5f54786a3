//! Line-driven stand-in for the panel's refresh and activation controls.

use panel_core::{
    animator::SensorField, motion::BladeMotion, PanelInput, PanelSelection, PanelState,
};
use shared::domain::{WiperSpeed, WiperTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Input(PanelInput),
    Status,
    Quit,
}

pub const HELP: &str =
    "commands: refresh | activate <front|back|both> <normal|fast> <cycles> | status | quit";

pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb {
        "refresh" => ConsoleCommand::Input(PanelInput::Refresh),
        "status" => ConsoleCommand::Status,
        "quit" | "exit" => ConsoleCommand::Quit,
        "activate" => {
            let raw_target = words.next().unwrap_or("front");
            let wiper_type = WiperTarget::parse(raw_target)
                .ok_or_else(|| format!("unknown wiper '{raw_target}'"))?;
            let speed = WiperSpeed::from_selection(words.next().unwrap_or("normal"));
            // The cycle field is forwarded untouched; parsing happens at dispatch.
            let cycles = words.next().unwrap_or_default();
            ConsoleCommand::Input(PanelInput::Activate(PanelSelection::new(
                wiper_type, speed, cycles,
            )))
        }
        other => return Err(format!("unknown command '{other}'; {HELP}")),
    };
    Ok(Some(command))
}

fn render_blade(blade: &BladeMotion) -> String {
    match (blade.class(), blade.ends_at()) {
        (Some(class), Some(ends_at)) => {
            format!("{} until {}ms", class.as_str(), ends_at.as_millis())
        }
        _ => "resting".to_string(),
    }
}

pub fn render_state(state: &PanelState) -> String {
    let temperature = state.field(SensorField::Temperature);
    let humidity = state.field(SensorField::Humidity);
    format!(
        "[{}] {} | temp {}{}{} | humidity {}{}{} | at {} | front {} | rear {} | refresh {}{} | {}",
        state.status.kind().container_class(),
        state.status.message(),
        temperature.text(),
        SensorField::Temperature.unit(),
        if temperature.is_highlighted() { "*" } else { "" },
        humidity.text(),
        SensorField::Humidity.unit(),
        if humidity.is_highlighted() { "*" } else { "" },
        state.timestamp,
        render_blade(&state.front_blade),
        render_blade(&state.rear_blade),
        state.refresh.icon.icon_class(),
        if state.refresh.rotating { " (spinning)" } else { "" },
        state.activate.feedback.label(),
    )
}
