pub mod data;
pub mod indicator;
pub mod kind;
pub mod ports;

pub use data::ReadData;
pub use indicator::IndicatorLabel;
pub use kind::WidgetKind;
pub use ports::{PortSet, PortType};
