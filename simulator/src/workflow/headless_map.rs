use log::debug;
use scoutcore::map::{MapBackend, MapConfig, MapFrame, MarkerKind};
use scoutcore::prelude::ScoutResult;

/// Map backend for offline runs: records the camera and marker commands a
/// real mapping library would receive.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    pub commands: Vec<String>,
}

#[derive(Debug)]
pub struct HeadlessHandle {
    style: String,
}

impl MapBackend for HeadlessMap {
    type Handle = HeadlessHandle;

    fn create(&mut self, config: &MapConfig) -> ScoutResult<HeadlessHandle> {
        self.commands.push(format!("create style={}", config.style));
        Ok(HeadlessHandle {
            style: config.style.clone(),
        })
    }

    fn apply(&mut self, handle: &mut HeadlessHandle, frame: &MapFrame) -> ScoutResult<()> {
        self.commands.push(format!(
            "camera {} zoom {} [{}]",
            frame.camera, frame.zoom, handle.style
        ));
        for marker in &frame.markers {
            let kind = match marker.kind {
                MarkerKind::Observer => "observer",
                MarkerKind::Target => "target",
            };
            self.commands
                .push(format!("marker {} {}", kind, marker.position));
        }
        self.commands.push(format!(
            "geofence r={:.0}m in_range={}",
            frame.geofence_radius_m, frame.in_range
        ));
        debug!("headless map applied frame: {}", frame.label);
        Ok(())
    }

    fn release(&mut self, handle: HeadlessHandle) {
        self.commands.push(format!("release style={}", handle.style));
    }
}
