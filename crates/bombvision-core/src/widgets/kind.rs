use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    BatteryHolder,
    Indicator,
    PortPlate,
    SerialNumber,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 4] = [
        WidgetKind::BatteryHolder,
        WidgetKind::Indicator,
        WidgetKind::PortPlate,
        WidgetKind::SerialNumber,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::BatteryHolder => "battery holder",
            WidgetKind::Indicator => "indicator",
            WidgetKind::PortPlate => "port plate",
            WidgetKind::SerialNumber => "serial number",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
