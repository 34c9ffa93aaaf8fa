use crate::workflow::runner::WorkflowResult;
use scoutcore::map::MapFrame;
use scoutcore::model::{GeoPoint, NftRecord};
use scoutcore::radar::{RadarBlip, RadarConfig, ViewportLimits};
use serde::{Deserialize, Serialize};

/// Snapshot served to the visualizer on `GET /payload`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub observer: Option<GeoPoint>,
    pub radar: RadarConfig,
    pub viewport: ViewportLimits,
    pub blips: Vec<RadarBlip>,
    pub target: Option<NftRecord>,
    pub frame: Option<MapFrame>,
    pub accepted: usize,
    pub rejected: usize,
    pub notes: Vec<String>,
    /// Masked keys of wallets imported through the bridge.
    pub wallets: Vec<String>,
}

impl VisualizationModel {
    pub fn from_result(
        result: WorkflowResult,
        observer: Option<GeoPoint>,
        radar: RadarConfig,
        viewport: ViewportLimits,
    ) -> Self {
        Self {
            observer,
            radar,
            viewport,
            blips: result.blips,
            target: result.target,
            frame: result.frame,
            accepted: result.accepted,
            rejected: result.rejected,
            notes: result.notes,
            wallets: Vec::new(),
        }
    }
}
