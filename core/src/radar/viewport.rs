use crate::prelude::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 1.2;

/// Pan/zoom state of an interactive radar. Only changes in response to a
/// user gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanZoom {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for PanZoom {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl PanZoom {
    /// Maps a radar-local offset (pixels from the centre) through the view.
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.zoom + self.pan_x, y * self.zoom + self.pan_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    ZoomIn,
    ZoomOut,
    /// Scroll wheel; positive is away from the user (zoom in).
    Wheel(f64),
    Drag { dx: f64, dy: f64 },
    Reset,
}

/// Zoom bounds and step. Deserialisation goes through `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportLimitsSpec", into = "ViewportLimitsSpec")]
pub struct ViewportLimits {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct ViewportLimitsSpec {
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl Default for ViewportLimitsSpec {
    fn default() -> Self {
        ViewportLimits::default().into()
    }
}

impl From<ViewportLimits> for ViewportLimitsSpec {
    fn from(limits: ViewportLimits) -> Self {
        Self {
            min_zoom: limits.min_zoom,
            max_zoom: limits.max_zoom,
            zoom_step: limits.zoom_step,
        }
    }
}

impl TryFrom<ViewportLimitsSpec> for ViewportLimits {
    type Error = ScoutError;

    fn try_from(spec: ViewportLimitsSpec) -> Result<Self, Self::Error> {
        let limits = Self {
            min_zoom: spec.min_zoom,
            max_zoom: spec.max_zoom,
            zoom_step: spec.zoom_step,
        };
        limits.validate()?;
        Ok(limits)
    }
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl ViewportLimits {
    /// Requires finite `0 < min_zoom <= max_zoom` and `zoom_step > 1`.
    pub fn validate(&self) -> ScoutResult<()> {
        let finite = self.min_zoom.is_finite() && self.max_zoom.is_finite();
        if !finite || self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(ScoutError::Config(format!(
                "viewport zoom range [{}, {}] is invalid",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ScoutError::Config(format!(
                "viewport zoom step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }

    pub fn apply(&self, state: PanZoom, gesture: Gesture) -> PanZoom {
        match gesture {
            Gesture::ZoomIn => self.with_zoom(state, state.zoom * self.zoom_step),
            Gesture::ZoomOut => self.with_zoom(state, state.zoom / self.zoom_step),
            Gesture::Wheel(delta) if delta > 0.0 => self.apply(state, Gesture::ZoomIn),
            Gesture::Wheel(delta) if delta < 0.0 => self.apply(state, Gesture::ZoomOut),
            Gesture::Wheel(_) => state,
            Gesture::Drag { dx, dy } if dx.is_finite() && dy.is_finite() => PanZoom {
                pan_x: state.pan_x + dx,
                pan_y: state.pan_y + dy,
                ..state
            },
            Gesture::Drag { .. } => state,
            Gesture::Reset => PanZoom::default(),
        }
    }

    fn with_zoom(&self, state: PanZoom, zoom: f64) -> PanZoom {
        PanZoom {
            zoom: zoom.clamp(self.min_zoom, self.max_zoom),
            ..state
        }
    }
}
