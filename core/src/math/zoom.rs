use crate::prelude::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};

/// Radius-of-interest framing: keeps the whole geofence visible.
const RADIUS_FRAMING_STEPS: [(f64, u8); 7] = [
    (50_000.0, 9),
    (20_000.0, 10),
    (10_000.0, 11),
    (5_000.0, 12),
    (2_000.0, 13),
    (1_000.0, 14),
    (500.0, 15),
];
const RADIUS_FRAMING_FALLBACK: u8 = 16;

/// Two-point framing: keeps observer and target on screen together.
const TWO_POINT_FRAMING_STEPS: [(f64, u8); 3] = [(1_000.0, 12), (500.0, 13), (100.0, 14)];
const TWO_POINT_FRAMING_FALLBACK: u8 = 16;

/// Distances strictly greater than `above_m` map to `zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomStep {
    pub above_m: f64,
    pub zoom: u8,
}

/// Ordered threshold table, highest threshold first. The first step whose
/// threshold is exceeded wins; anything below the last step gets `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ZoomTableSpec", into = "ZoomTableSpec")]
pub struct ZoomTable {
    steps: Vec<ZoomStep>,
    fallback: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ZoomTableSpec {
    steps: Vec<ZoomStep>,
    fallback: u8,
}

impl TryFrom<ZoomTableSpec> for ZoomTable {
    type Error = ScoutError;

    fn try_from(spec: ZoomTableSpec) -> Result<Self, Self::Error> {
        ZoomTable::new(spec.steps, spec.fallback)
    }
}

impl From<ZoomTable> for ZoomTableSpec {
    fn from(table: ZoomTable) -> Self {
        Self {
            steps: table.steps,
            fallback: table.fallback,
        }
    }
}

impl ZoomTable {
    /// Builds a table. Zoom must rise strictly as the threshold falls, and the
    /// fallback must be closer than the last step.
    pub fn new(steps: Vec<ZoomStep>, fallback: u8) -> ScoutResult<Self> {
        for step in &steps {
            if !step.above_m.is_finite() {
                return Err(ScoutError::Config(format!(
                    "zoom threshold {} is not finite",
                    step.above_m
                )));
            }
        }
        for pair in steps.windows(2) {
            if pair[1].above_m >= pair[0].above_m {
                return Err(ScoutError::Config(format!(
                    "zoom thresholds must be strictly descending ({} then {})",
                    pair[0].above_m, pair[1].above_m
                )));
            }
            if pair[1].zoom <= pair[0].zoom {
                return Err(ScoutError::Config(format!(
                    "zoom {} above {}m is not closer than zoom {} above {}m",
                    pair[1].zoom, pair[1].above_m, pair[0].zoom, pair[0].above_m
                )));
            }
        }
        if let Some(last) = steps.last() {
            if fallback <= last.zoom {
                return Err(ScoutError::Config(format!(
                    "fallback zoom {} is not closer than the last step ({})",
                    fallback, last.zoom
                )));
            }
        }
        Ok(Self { steps, fallback })
    }

    pub fn radius_framing() -> Self {
        Self::from_constants(&RADIUS_FRAMING_STEPS, RADIUS_FRAMING_FALLBACK)
    }

    pub fn two_point_framing() -> Self {
        Self::from_constants(&TWO_POINT_FRAMING_STEPS, TWO_POINT_FRAMING_FALLBACK)
    }

    fn from_constants(steps: &[(f64, u8)], fallback: u8) -> Self {
        Self {
            steps: steps
                .iter()
                .map(|&(above_m, zoom)| ZoomStep { above_m, zoom })
                .collect(),
            fallback,
        }
    }

    /// Zoom level for a distance-like input. Negative, zero and NaN inputs land
    /// in the fallback bucket.
    pub fn zoom_for(&self, meters: f64) -> u8 {
        self.steps
            .iter()
            .find(|step| meters > step.above_m)
            .map(|step| step.zoom)
            .unwrap_or(self.fallback)
    }
}

/// Both framing policies used by the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomHeuristic {
    pub radius: ZoomTable,
    pub two_point: ZoomTable,
}

impl Default for ZoomHeuristic {
    fn default() -> Self {
        Self {
            radius: ZoomTable::radius_framing(),
            two_point: ZoomTable::two_point_framing(),
        }
    }
}

impl ZoomHeuristic {
    pub fn radius_framing_zoom(&self, radius_m: f64) -> u8 {
        self.radius.zoom_for(radius_m)
    }

    pub fn two_point_framing_zoom(&self, distance_m: f64) -> u8 {
        self.two_point.zoom_for(distance_m)
    }
}

pub fn radius_framing_zoom(radius_m: f64) -> u8 {
    ZoomTable::radius_framing().zoom_for(radius_m)
}

pub fn two_point_framing_zoom(distance_m: f64) -> u8 {
    ZoomTable::two_point_framing().zoom_for(distance_m)
}
