use crate::workflow::config::WorkflowConfig;
use crate::workflow::headless_map::HeadlessMap;
use anyhow::Context;
use scoutcore::map::{DistanceView, MapFrame, MapSession};
use scoutcore::model::{validate_batch, GeoPoint, NftRecord, RawNftRecord};
use scoutcore::radar::{RadarBlip, RadarProjector};
use std::cmp::Ordering;

pub struct WorkflowResult {
    pub blips: Vec<RadarBlip>,
    pub target: Option<NftRecord>,
    pub frame: Option<MapFrame>,
    pub accepted: usize,
    pub rejected: usize,
    pub notes: Vec<String>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Validates the records, lays out the radar and frames the nearest drop
    /// on the map.
    pub fn execute(&self, raw: Vec<RawNftRecord>) -> anyhow::Result<WorkflowResult> {
        let projector =
            RadarProjector::new(self.config.radar.clone()).context("building radar projector")?;
        let observer = self.config.observer;

        let batch = validate_batch(raw);
        let mut notes: Vec<String> = batch
            .rejected
            .iter()
            .map(|rejection| format!("record #{} rejected: {}", rejection.index, rejection.reason))
            .collect();

        let blips = projector.layout(observer, &batch.accepted);
        if observer.is_none() && !blips.is_empty() {
            notes.push("observer unknown: blip directions are placeholders".into());
        }

        let target = nearest(&batch.accepted, observer);
        let frame = target.as_ref().map(|target| {
            DistanceView::new(self.config.zoom.clone()).frame(observer, target)
        });

        if let (Some(frame), Some(map_config)) = (frame.as_ref(), self.config.map_config()?) {
            let mut session = MapSession::new(HeadlessMap::default(), map_config);
            session.render(frame).context("rendering distance view")?;
            notes.extend(session.close().commands);
        }

        Ok(WorkflowResult {
            blips,
            target,
            frame,
            accepted: batch.accepted.len(),
            rejected: batch.rejected.len(),
            notes,
        })
    }
}

/// Closest record with a known distance; records without one sort last.
fn nearest(records: &[NftRecord], observer: Option<GeoPoint>) -> Option<NftRecord> {
    records
        .iter()
        .min_by(|a, b| {
            match (a.distance_from(observer), b.distance_from(observer)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.id.cmp(&b.id))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::build_drop_field;
    use crate::workflow::config::MapSettings;

    #[test]
    fn runner_lays_out_every_valid_record() {
        let cfg = WorkflowConfig::from_args(Some(GeoPoint::new(0.0, 0.0)), 8, 1);
        let runner = Runner::new(cfg.clone());
        let mut raw = build_drop_field(&cfg.generator).unwrap();
        raw.push(RawNftRecord::default());

        let result = runner.execute(raw).unwrap();
        assert_eq!(result.accepted, 8);
        assert_eq!(result.rejected, 1);
        assert_eq!(result.blips.len(), 8);
        assert!(result.blips.iter().all(|b| b.direction_known && b.offset.radial_px <= 50.0));

        let nearest = result.target.unwrap();
        let min = result
            .blips
            .iter()
            .filter_map(|b| b.distance_m)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.frame.unwrap().distance_m, Some(min));
        assert!(nearest.distance_from(cfg.observer).is_some());
    }

    #[test]
    fn runner_without_observer_marks_directions_unknown() {
        let cfg = WorkflowConfig::from_args(None, 4, 2);
        let raw = build_drop_field(&cfg.generator).unwrap();
        let result = Runner::new(cfg).execute(raw).unwrap();
        assert!(result.blips.iter().all(|b| !b.direction_known));
        assert!(result.notes.iter().any(|n| n.contains("observer unknown")));
    }

    #[test]
    fn runner_renders_headless_map_when_configured() {
        let mut cfg = WorkflowConfig::from_args(Some(GeoPoint::new(0.0, 0.0)), 2, 5);
        cfg.map = Some(MapSettings {
            access_token: Some("pk.test".into()),
            style: Some("dark".into()),
        });
        let raw = build_drop_field(&cfg.generator).unwrap();
        let result = Runner::new(cfg).execute(raw).unwrap();
        assert_eq!(result.notes.first().map(String::as_str), Some("create style=dark"));
        assert_eq!(result.notes.last().map(String::as_str), Some("release style=dark"));
    }

    #[test]
    fn runner_fails_on_map_section_without_token() {
        let mut cfg = WorkflowConfig::from_args(Some(GeoPoint::new(0.0, 0.0)), 2, 5);
        cfg.map = Some(MapSettings::default());
        let raw = build_drop_field(&cfg.generator).unwrap();
        assert!(Runner::new(cfg).execute(raw).is_err());
    }
}
