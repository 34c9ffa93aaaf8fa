pub mod projector;
pub mod viewport;

pub use projector::{RadarAngle, RadarBlip, RadarConfig, RadarOffset, RadarProjector};
pub use viewport::{Gesture, PanZoom, ViewportLimits};
