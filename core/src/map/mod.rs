pub mod session;
pub mod view;

pub use session::{MapBackend, MapConfig, MapSession};
pub use view::{DistanceView, MapFrame, MapMarker, MarkerKind};
