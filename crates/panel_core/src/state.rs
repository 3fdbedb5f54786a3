//! Owned panel state mutated by the poller, the dispatcher and fired timers.

use serde::Serialize;
use shared::domain::Blade;

use crate::{
    animator::{DisplayedValue, SensorField, PLACEHOLDER},
    feedback::{ActivateControl, RefreshControl},
    motion::BladeMotion,
    status::StatusIndicator,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelState {
    pub status: StatusIndicator,
    pub temperature: DisplayedValue,
    pub humidity: DisplayedValue,
    pub timestamp: String,
    pub front_blade: BladeMotion,
    pub rear_blade: BladeMotion,
    pub refresh: RefreshControl,
    pub activate: ActivateControl,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            status: StatusIndicator::default(),
            temperature: DisplayedValue::default(),
            humidity: DisplayedValue::default(),
            timestamp: PLACEHOLDER.to_string(),
            front_blade: BladeMotion::default(),
            rear_blade: BladeMotion::default(),
            refresh: RefreshControl::default(),
            activate: ActivateControl::default(),
        }
    }
}

impl PanelState {
    pub fn field(&self, field: SensorField) -> &DisplayedValue {
        match field {
            SensorField::Temperature => &self.temperature,
            SensorField::Humidity => &self.humidity,
        }
    }

    pub fn field_mut(&mut self, field: SensorField) -> &mut DisplayedValue {
        match field {
            SensorField::Temperature => &mut self.temperature,
            SensorField::Humidity => &mut self.humidity,
        }
    }

    pub fn blade(&self, blade: Blade) -> &BladeMotion {
        match blade {
            Blade::Front => &self.front_blade,
            Blade::Rear => &self.rear_blade,
        }
    }

    pub fn blade_mut(&mut self, blade: Blade) -> &mut BladeMotion {
        match blade {
            Blade::Front => &mut self.front_blade,
            Blade::Rear => &mut self.rear_blade,
        }
    }
}
