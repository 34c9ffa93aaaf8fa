//! Geometry core for the geo-NFT scout.
//!
//! The map view and the radar widget answer the same questions about a pair of
//! points (how far, which way). Both go through this crate so the two displays
//! never disagree.

pub mod map;
pub mod math;
pub mod model;
pub mod prelude;
pub mod radar;
pub mod telemetry;
pub mod wallet;

pub use math::{GeoMath, ZoomHeuristic, ZoomTable};
pub use model::{GeoPoint, NftRecord, RawNftRecord};
pub use prelude::{ScoutError, ScoutResult};
pub use radar::{PanZoom, RadarBlip, RadarConfig, RadarOffset, RadarProjector};
