use crate::model::GeoPoint;

/// Mean Earth radius in metres.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle helpers on a spherical Earth. All functions are total: bad
/// input yields a meaningless number, never a panic.
pub struct GeoMath;

impl GeoMath {
    /// Haversine distance in metres. Symmetric bit-for-bit in its arguments.
    pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
        let (lat1, lon1) = a.to_radians();
        let (lat2, lon2) = b.to_radians();

        // abs() keeps the result identical when the arguments are swapped
        let d_lat = (lat2 - lat1).abs();
        let d_lon = (lon2 - lon1).abs();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let h = if h > 1.0 { 1.0 } else { h };

        2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
    }

    /// Initial bearing (forward azimuth) in degrees, clockwise from true north,
    /// normalised to [0, 360). Coincident points yield 0.
    pub fn bearing(origin: GeoPoint, target: GeoPoint) -> f64 {
        let (lat1, lon1) = origin.to_radians();
        let (lat2, lon2) = target.to_radians();
        let d_lon = lon2 - lon1;

        let east = d_lon.sin() * lat2.cos();
        let north = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        if east == 0.0 && north == 0.0 {
            return 0.0;
        }

        let degrees = (east.atan2(north).to_degrees() + 360.0) % 360.0;
        // -0.0 and rounding up to exactly 360 both collapse to 0
        if degrees >= 360.0 || degrees == 0.0 {
            0.0
        } else {
            degrees
        }
    }

    /// Point reached by travelling `distance_m` from `origin` along the
    /// great circle with initial bearing `bearing_deg`.
    pub fn destination(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
        let (lat1, lon1) = origin.to_radians();
        let theta = bearing_deg.to_radians();
        let delta = distance_m / EARTH_MEAN_RADIUS_M;

        let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

        GeoPoint::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
    }

    /// Great-circle midpoint, used to centre a camera on two points.
    pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
        let (lat1, lon1) = a.to_radians();
        let (lat2, lon2) = b.to_radians();
        let d_lon = lon2 - lon1;

        let bx = lat2.cos() * d_lon.cos();
        let by = lat2.cos() * d_lon.sin();
        let lat = (lat1.sin() + lat2.sin()).atan2(((lat1.cos() + bx).powi(2) + by * by).sqrt());
        let lon = lon1 + by.atan2(lat1.cos() + bx);

        GeoPoint::new(lat.to_degrees(), normalize_longitude(lon.to_degrees()))
    }
}

fn normalize_longitude(degrees: f64) -> f64 {
    let wrapped = (degrees + 540.0) % 360.0 - 180.0;
    if wrapped == -180.0 && degrees > 0.0 {
        180.0
    } else {
        wrapped
    }
}
