pub mod geo;
pub mod zoom;

pub use geo::{GeoMath, EARTH_MEAN_RADIUS_M};
pub use zoom::{radius_framing_zoom, two_point_framing_zoom, ZoomHeuristic, ZoomStep, ZoomTable};
