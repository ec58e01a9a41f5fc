//! Data model shared by the recognition pipeline and its callers.
//!
//! Nothing in here touches pixels: these are the values a widget reader
//! produces and the calibration flags it consumes.

pub mod lights;
pub mod widgets;

pub use lights::LightsState;
pub use widgets::{IndicatorLabel, PortSet, PortType, ReadData, WidgetKind};
