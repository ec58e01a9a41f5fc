use serde::{Deserialize, Serialize};
use std::fmt;

use crate::widgets::indicator::IndicatorLabel;
use crate::widgets::kind::WidgetKind;
use crate::widgets::ports::PortSet;

/// Structured result of reading one widget. Produced fresh per extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum ReadData {
    BatteryHolder { batteries: u8 },
    Indicator { lit: bool, label: IndicatorLabel },
    PortPlate { ports: PortSet },
    SerialNumber { serial: String },
}

impl ReadData {
    pub fn kind(&self) -> WidgetKind {
        match self {
            ReadData::BatteryHolder { .. } => WidgetKind::BatteryHolder,
            ReadData::Indicator { .. } => WidgetKind::Indicator,
            ReadData::PortPlate { .. } => WidgetKind::PortPlate,
            ReadData::SerialNumber { .. } => WidgetKind::SerialNumber,
        }
    }
}

impl fmt::Display for ReadData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadData::BatteryHolder { batteries } => write!(f, "{} batteries", batteries),
            ReadData::Indicator { lit, label } => {
                write!(f, "{} {}", if *lit { "lit" } else { "unlit" }, label)
            }
            ReadData::PortPlate { ports } => write!(f, "ports: {}", ports),
            ReadData::SerialNumber { serial } => write!(f, "serial {}", serial),
        }
    }
}
