use crate::math::GeoMath;
use crate::model::{GeoPoint, NftRecord};
use crate::prelude::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};

/// Display parameters for a circular radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Metres per pixel when the observer position is known.
    pub scale_divisor: f64,
    /// Outer ring for geolocated blips.
    pub max_radius_px: f64,
    /// Distance mapped to the outer ring when the observer is unknown.
    pub fallback_max_distance_m: f64,
    /// Outer ring for direction-unknown blips.
    pub display_radius_px: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            scale_divisor: 1_000.0,
            max_radius_px: 50.0,
            fallback_max_distance_m: 5_000.0,
            display_radius_px: 50.0,
        }
    }
}

impl RadarConfig {
    pub fn validate(&self) -> ScoutResult<()> {
        if !(self.scale_divisor > 0.0) {
            return Err(ScoutError::Config(format!(
                "radar scale divisor must be positive, got {}",
                self.scale_divisor
            )));
        }
        if !(self.fallback_max_distance_m > 0.0) {
            return Err(ScoutError::Config(format!(
                "radar fallback distance must be positive, got {}",
                self.fallback_max_distance_m
            )));
        }
        if !(self.max_radius_px >= 0.0) || !(self.display_radius_px >= 0.0) {
            return Err(ScoutError::Config("radar radii must be non-negative".into()));
        }
        Ok(())
    }
}

/// Direction of a blip. `Unknown` is returned whenever the observer position
/// is missing; callers decide how to place such blips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "degrees", rename_all = "snake_case")]
pub enum RadarAngle {
    Bearing(f64),
    Unknown,
}

impl RadarAngle {
    pub fn degrees(&self) -> Option<f64> {
        match self {
            RadarAngle::Bearing(degrees) => Some(*degrees),
            RadarAngle::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarOffset {
    pub angle: RadarAngle,
    pub radial_px: f64,
}

impl RadarOffset {
    /// Pixel offset from the radar centre, north up and y growing downward.
    pub fn to_screen(&self) -> Option<(f64, f64)> {
        self.angle
            .degrees()
            .map(|degrees| polar_to_screen(degrees, self.radial_px))
    }
}

/// A blip ready to draw. `display_angle_deg` is the true bearing when
/// `direction_known`, otherwise an even slot around the ring. Records with no
/// distance at all sit on the outer ring with `distance_known` cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarBlip {
    pub id: String,
    pub name: String,
    pub collection: String,
    pub distance_m: Option<f64>,
    pub offset: RadarOffset,
    pub direction_known: bool,
    pub distance_known: bool,
    pub display_angle_deg: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct RadarProjector {
    config: RadarConfig,
}

impl RadarProjector {
    pub fn new(config: RadarConfig) -> ScoutResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    /// Projects one target. With an origin the angle is the true bearing and
    /// the radius is `distance / scale_divisor` capped at `max_radius_px`.
    /// Without one the radius is scaled against `fallback_max_distance_m` and
    /// the angle is `Unknown`.
    pub fn project(&self, origin: Option<GeoPoint>, target: GeoPoint, distance_m: f64) -> RadarOffset {
        let distance_m = if distance_m < 0.0 { 0.0 } else { distance_m };
        match origin {
            Some(origin) => RadarOffset {
                angle: RadarAngle::Bearing(GeoMath::bearing(origin, target)),
                radial_px: (distance_m / self.config.scale_divisor)
                    .min(self.config.max_radius_px),
            },
            None => {
                let max = self.config.fallback_max_distance_m;
                RadarOffset {
                    angle: RadarAngle::Unknown,
                    radial_px: distance_m.min(max) / max * self.config.display_radius_px,
                }
            }
        }
    }

    /// Lays out a full set of records. Direction-unknown blips are spread
    /// evenly in ascending (distance, id) order so repeated renders of the
    /// same data are identical.
    pub fn layout(&self, observer: Option<GeoPoint>, records: &[NftRecord]) -> Vec<RadarBlip> {
        let mut blips: Vec<RadarBlip> = records
            .iter()
            .map(|record| {
                let distance_m = record.distance_from(observer);
                let offset = match distance_m {
                    Some(distance_m) => self.project(observer, record.location, distance_m),
                    None => RadarOffset {
                        angle: RadarAngle::Unknown,
                        radial_px: self.config.display_radius_px,
                    },
                };
                RadarBlip {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    collection: record.collection.clone(),
                    distance_m,
                    offset,
                    direction_known: offset.angle.degrees().is_some(),
                    distance_known: distance_m.is_some(),
                    display_angle_deg: offset.angle.degrees().unwrap_or(0.0),
                    x: 0.0,
                    y: 0.0,
                }
            })
            .collect();

        let mut unknown: Vec<usize> = blips
            .iter()
            .enumerate()
            .filter(|(_, blip)| !blip.direction_known)
            .map(|(idx, _)| idx)
            .collect();
        unknown.sort_by(|&a, &b| {
            let (a, b) = (&blips[a], &blips[b]);
            a.offset
                .radial_px
                .total_cmp(&b.offset.radial_px)
                .then_with(|| a.id.cmp(&b.id))
        });
        let slot = 360.0 / unknown.len().max(1) as f64;
        for (position, idx) in unknown.into_iter().enumerate() {
            blips[idx].display_angle_deg = position as f64 * slot;
        }

        for blip in &mut blips {
            let (x, y) = polar_to_screen(blip.display_angle_deg, blip.offset.radial_px);
            blip.x = x;
            blip.y = y;
        }
        blips
    }
}

fn polar_to_screen(degrees: f64, radius: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (radius * radians.sin(), -radius * radians.cos())
}
