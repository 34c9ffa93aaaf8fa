use crate::prelude::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude/longitude pair in degrees.
///
/// `new` performs no range check so the geometry functions stay total; use
/// `checked` where coordinates enter from outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn checked(latitude: f64, longitude: f64) -> ScoutResult<Self> {
        let point = Self::new(latitude, longitude);
        if point.is_valid() {
            Ok(point)
        } else {
            Err(ScoutError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Finite and within [-90, 90] x [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_accepts_range_edges() {
        assert!(GeoPoint::checked(90.0, -180.0).is_ok());
        assert!(GeoPoint::checked(-90.0, 180.0).is_ok());
    }

    #[test]
    fn checked_rejects_out_of_range_and_nan() {
        assert!(matches!(
            GeoPoint::checked(91.0, 0.0),
            Err(ScoutError::InvalidCoordinate { .. })
        ));
        assert!(GeoPoint::checked(0.0, 180.5).is_err());
        assert!(GeoPoint::checked(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn display_uses_six_decimals() {
        assert_eq!(GeoPoint::new(1.5, -2.25).to_string(), "(1.500000, -2.250000)");
    }
}
